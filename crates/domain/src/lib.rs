//! Domain model for token economy design.
//!
//! This crate holds the typed value objects, the error taxonomy and the
//! closed-form formulas used across the workspace:
//! - Vesting schedules and cumulative release accounting
//! - Token supply distribution and release timelines
//! - Constant-product pool trade quotes and slippage
//! - Discounted cash flow valuation
//! - Market sizing funnels
//! - Momentum indicators

/// Prelude module for convenient imports.
pub mod prelude;

/// Domain entities.
pub mod entities;
/// Error types.
pub mod error;
/// Closed-form math.
pub mod math;
/// Market indicators.
pub mod metrics;
/// Value objects.
pub mod value_objects;

pub use error::{Result, TokenomicsError};
