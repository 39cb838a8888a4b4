//! Type definitions for dYdX v4 order placement.
//!
//! This module contains the protobuf enums of the CLOB module and the
//! caller-facing parameter structs used to place orders.

use std::fmt;
use std::str::FromStr;

use crate::program::error::SdkError;

// ============================================================================
// Enums
// ============================================================================

/// Order side (`dydxprotocol.clob.Order.Side`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum OrderSide {
    /// Default value; rejected by validation
    Unspecified = 0,
    /// Buy (long)
    Buy = 1,
    /// Sell (short)
    Sell = 2,
}

impl OrderSide {
    /// Protobuf enum name.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Unspecified => "SIDE_UNSPECIFIED",
            Self::Buy => "SIDE_BUY",
            Self::Sell => "SIDE_SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str_name())
    }
}

impl FromStr for OrderSide {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" | "bid" | "long" | "side_buy" => Ok(Self::Buy),
            "sell" | "ask" | "short" | "side_sell" => Ok(Self::Sell),
            _ => Err(SdkError::InvalidOrder(format!("unknown side '{}'", s))),
        }
    }
}

/// Time in force (`dydxprotocol.clob.Order.TimeInForce`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum TimeInForce {
    /// Good until the order expires
    Unspecified = 0,
    /// Immediate or cancel
    Ioc = 1,
    /// Maker only
    PostOnly = 2,
    /// Fill or kill
    FillOrKill = 3,
}

/// Condition type (`dydxprotocol.clob.Order.ConditionType`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ConditionType {
    Unspecified = 0,
    StopLoss = 1,
    TakeProfit = 2,
}

/// What `place_order` does with a built transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionMode {
    /// Build and validate the unsigned transaction, report a synthetic result
    #[default]
    Validate,
    /// Sign the transaction and broadcast it with `broadcast_tx_sync`
    Broadcast,
}

// ============================================================================
// Parameter Structs
// ============================================================================

/// Parameters for placing a short-term order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderParams {
    /// Market pair ID (0 for BTC-USD)
    pub clob_pair_id: u32,
    /// Buy or sell
    pub side: OrderSide,
    /// Order size in base quantums
    pub quantums: u64,
    /// Price in subticks
    pub subticks: u64,
    /// Block height until which the order is valid
    pub good_til_block: u32,
    /// Sub-account number (usually 0)
    pub subaccount_number: u32,
}

impl OrderParams {
    /// Parameters for a buy order on sub-account 0.
    pub fn buy(clob_pair_id: u32, quantums: u64, subticks: u64, good_til_block: u32) -> Self {
        Self {
            clob_pair_id,
            side: OrderSide::Buy,
            quantums,
            subticks,
            good_til_block,
            subaccount_number: 0,
        }
    }

    /// Parameters for a sell order on sub-account 0.
    pub fn sell(clob_pair_id: u32, quantums: u64, subticks: u64, good_til_block: u32) -> Self {
        Self {
            side: OrderSide::Sell,
            ..Self::buy(clob_pair_id, quantums, subticks, good_til_block)
        }
    }

    /// Expiry block for an order placed at `current_height`, `blocks` later.
    ///
    /// Zero blocks yields `current_height` itself. The usual window of
    /// [`DEFAULT_EXPIRY_BLOCKS`] comes from `[order] expiry_blocks`.
    /// Saturates at `u32::MAX`.
    ///
    /// [`DEFAULT_EXPIRY_BLOCKS`]: crate::program::constants::DEFAULT_EXPIRY_BLOCKS
    pub fn expiry_from(current_height: u64, blocks: u32) -> u32 {
        u32::try_from(current_height.saturating_add(blocks as u64)).unwrap_or(u32::MAX)
    }
}
