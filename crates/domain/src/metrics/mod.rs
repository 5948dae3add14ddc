pub mod rsi;

pub use rsi::{NEUTRAL_RSI, relative_strength_index};
