//! Shared utilities and types used across the RPC and program modules.

pub mod price;
pub mod types;

// Re-export commonly used items
pub use price::{
    price_to_subticks, price_to_subticks_exact, size_to_quantums, size_to_quantums_exact,
};
pub use types::*;
