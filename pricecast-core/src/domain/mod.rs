//! Domain types shared across the quant core.

pub mod bar;

pub use bar::{closes, is_ascending, PriceBar};
