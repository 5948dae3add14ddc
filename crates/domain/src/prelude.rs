//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use tokenomics_lab_domain::prelude::*;
//! ```

// Entities
pub use crate::entities::{
    CategoryRelease, LiquidityPool, ReleasePoint, TokenAllocation, Tokenomics, VestingEntry,
    VestingSchedule,
};

// Errors
pub use crate::error::{Result, TokenomicsError};

// Math
pub use crate::math::constant_product::{TradeQuote, constant_product_trade};
pub use crate::math::dcf::{CashFlowSchedule, DcfValuation, dcf_value};
pub use crate::math::market_sizing::MarketFunnel;
pub use crate::math::vesting::{accumulate_vesting, category_allocation, released_tokens};

// Metrics
pub use crate::metrics::{NEUTRAL_RSI, relative_strength_index};

// Value objects
pub use crate::value_objects::Price;
