pub mod constant_product;
pub mod dcf;
pub mod market_sizing;
pub mod vesting;
