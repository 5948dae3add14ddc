pub mod allocation;
pub mod pool;
pub mod vesting;

pub use allocation::{CategoryRelease, ReleasePoint, TokenAllocation, Tokenomics};
pub use pool::LiquidityPool;
pub use vesting::{VestingEntry, VestingSchedule};
