//! Order messages of the dYdX v4 CLOB module.
//!
//! The structs here are the protobuf wire types of `dydxprotocol.clob`
//! (`Order`, `OrderId`, `MsgPlaceOrder`) and `dydxprotocol.subaccounts`
//! (`SubaccountId`), plus the structural validation the chain applies
//! before accepting a `MsgPlaceOrder`.

use prost::Message;

use crate::program::constants::{order_flags, MAX_SUBACCOUNT_NUMBER, MSG_PLACE_ORDER_TYPE_URL};
use crate::program::error::{SdkError, SdkResult};
use crate::program::tx::Any;
use crate::program::types::{ConditionType, OrderParams, OrderSide, TimeInForce};
use crate::wallet::AddressCodec;

// ============================================================================
// Wire types
// ============================================================================

/// Sub-account identifier: owner address plus sub-account number.
#[derive(Clone, PartialEq, Message)]
pub struct SubaccountId {
    /// Bech32 owner address
    #[prost(string, tag = "1")]
    pub owner: String,
    /// Sub-account number (0-127)
    #[prost(uint32, tag = "2")]
    pub number: u32,
}

/// Unique order identifier.
#[derive(Clone, PartialEq, Message)]
pub struct OrderId {
    #[prost(message, optional, tag = "1")]
    pub subaccount_id: Option<SubaccountId>,
    /// Client-assigned ID
    #[prost(fixed32, tag = "2")]
    pub client_id: u32,
    /// Order lifetime flags (see [`order_flags`])
    #[prost(uint32, tag = "3")]
    pub order_flags: u32,
    /// Market pair ID
    #[prost(uint32, tag = "4")]
    pub clob_pair_id: u32,
}

/// A CLOB order.
#[derive(Clone, PartialEq, Message)]
pub struct Order {
    #[prost(message, optional, tag = "1")]
    pub order_id: Option<OrderId>,
    #[prost(enumeration = "OrderSide", tag = "2")]
    pub side: i32,
    /// Size in base quantums
    #[prost(uint64, tag = "3")]
    pub quantums: u64,
    /// Price in subticks
    #[prost(uint64, tag = "4")]
    pub subticks: u64,
    #[prost(oneof = "order::GoodTilOneof", tags = "5, 6")]
    pub good_til_oneof: Option<order::GoodTilOneof>,
    #[prost(enumeration = "TimeInForce", tag = "7")]
    pub time_in_force: i32,
    #[prost(bool, tag = "8")]
    pub reduce_only: bool,
    #[prost(uint32, tag = "9")]
    pub client_metadata: u32,
    #[prost(enumeration = "ConditionType", tag = "10")]
    pub condition_type: i32,
    #[prost(uint64, tag = "11")]
    pub conditional_order_trigger_subticks: u64,
}

pub mod order {
    /// Order expiry: block height for short-term orders, block time otherwise.
    #[derive(Clone, Copy, PartialEq, Eq, prost::Oneof)]
    pub enum GoodTilOneof {
        #[prost(uint32, tag = "5")]
        GoodTilBlock(u32),
        #[prost(fixed32, tag = "6")]
        GoodTilBlockTime(u32),
    }
}

/// `MsgPlaceOrder`: the transaction message that places one order.
#[derive(Clone, PartialEq, Message)]
pub struct MsgPlaceOrder {
    #[prost(message, optional, tag = "1")]
    pub order: Option<Order>,
}

// ============================================================================
// Construction
// ============================================================================

impl Order {
    /// Build a short-term order owned by `owner` from caller parameters.
    pub fn short_term(owner: &str, client_id: u32, params: &OrderParams) -> Self {
        Self {
            order_id: Some(OrderId {
                subaccount_id: Some(SubaccountId {
                    owner: owner.to_string(),
                    number: params.subaccount_number,
                }),
                client_id,
                order_flags: order_flags::SHORT_TERM,
                clob_pair_id: params.clob_pair_id,
            }),
            side: params.side as i32,
            quantums: params.quantums,
            subticks: params.subticks,
            good_til_oneof: Some(order::GoodTilOneof::GoodTilBlock(params.good_til_block)),
            time_in_force: TimeInForce::Unspecified as i32,
            reduce_only: false,
            client_metadata: 0,
            condition_type: ConditionType::Unspecified as i32,
            conditional_order_trigger_subticks: 0,
        }
    }

    /// Client-assigned ID, or 0 if the order ID is missing.
    pub fn client_id(&self) -> u32 {
        self.order_id.as_ref().map(|id| id.client_id).unwrap_or_default()
    }

    /// Decoded side.
    pub fn order_side(&self) -> SdkResult<OrderSide> {
        OrderSide::try_from(self.side).map_err(|_| SdkError::InvalidSide(self.side))
    }
}

impl MsgPlaceOrder {
    /// Protobuf type URL.
    pub const TYPE_URL: &'static str = MSG_PLACE_ORDER_TYPE_URL;

    pub fn new(order: Order) -> Self {
        Self { order: Some(order) }
    }

    /// Wrap into an `Any` for inclusion in a transaction body.
    pub fn to_any(&self) -> Any {
        Any {
            type_url: Self::TYPE_URL.to_string(),
            value: self.encode_to_vec(),
        }
    }

    /// Unwrap from an `Any`, checking the type URL.
    pub fn from_any(any: &Any) -> SdkResult<Self> {
        if any.type_url != Self::TYPE_URL {
            return Err(SdkError::InvalidTransaction(format!(
                "expected {}, got {}",
                Self::TYPE_URL,
                any.type_url
            )));
        }
        Ok(Self::decode(any.value.as_slice())?)
    }

    /// Stateless validation of the message, mirroring the chain's checks.
    ///
    /// Rejects a missing order or order ID, an invalid owner address, a
    /// sub-account number above 127, an unspecified side, zero size or
    /// price, and a short-term order without a positive `GoodTilBlock`.
    pub fn validate_basic(&self, codec: &AddressCodec) -> SdkResult<()> {
        let order = self
            .order
            .as_ref()
            .ok_or_else(|| SdkError::InvalidOrder("order is missing".to_string()))?;
        let order_id = order
            .order_id
            .as_ref()
            .ok_or_else(|| SdkError::InvalidOrder("order ID is missing".to_string()))?;
        let subaccount = order_id
            .subaccount_id
            .as_ref()
            .ok_or_else(|| SdkError::InvalidOrder("subaccount ID is missing".to_string()))?;

        codec
            .validate(&subaccount.owner)
            .map_err(|e| SdkError::InvalidOrder(format!("invalid owner: {}", e)))?;

        if subaccount.number > MAX_SUBACCOUNT_NUMBER {
            return Err(SdkError::InvalidOrder(format!(
                "subaccount number {} exceeds {}",
                subaccount.number, MAX_SUBACCOUNT_NUMBER
            )));
        }

        match OrderSide::try_from(order.side) {
            Ok(OrderSide::Buy) | Ok(OrderSide::Sell) => {}
            _ => {
                return Err(SdkError::InvalidOrder(format!(
                    "invalid order side {}",
                    order.side
                )))
            }
        }

        if order.quantums == 0 {
            return Err(SdkError::InvalidOrder("order size in base quantums cannot be 0".to_string()));
        }
        if order.subticks == 0 {
            return Err(SdkError::InvalidOrder("order subticks cannot be 0".to_string()));
        }

        if order_id.order_flags == order_flags::SHORT_TERM {
            match order.good_til_oneof {
                Some(order::GoodTilOneof::GoodTilBlock(block)) if block > 0 => {}
                Some(order::GoodTilOneof::GoodTilBlock(_)) => {
                    return Err(SdkError::InvalidOrder("GoodTilBlock cannot be 0".to_string()))
                }
                _ => {
                    return Err(SdkError::InvalidOrder(
                        "short-term orders must use GoodTilBlock".to_string(),
                    ))
                }
            }
        }

        if TimeInForce::try_from(order.time_in_force).is_err() {
            return Err(SdkError::InvalidOrder(format!(
                "invalid time in force {}",
                order.time_in_force
            )));
        }

        Ok(())
    }
}
