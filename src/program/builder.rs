//! Fluent builder for order parameters.

use crate::program::constants::DEFAULT_CLOB_PAIR_ID;
use crate::program::error::{SdkError, SdkResult};
use crate::program::types::{OrderParams, OrderSide};
use crate::shared::price::{price_to_subticks, size_to_quantums};

/// Builder for [`OrderParams`] with a fluent API.
///
/// Size and price can be given either in protocol units (`quantums`,
/// `subticks`) or in human units together with the market's step and tick
/// sizes.
///
/// # Example
///
/// ```rust,ignore
/// use dydx_client::prelude::*;
///
/// let params = OrderBuilder::new()
///     .clob_pair_id(0)
///     .buy()
///     .size(0.001, 0.00001)
///     .price(30000.0, 0.01)
///     .good_til_block(current_height as u32 + 200)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderBuilder {
    clob_pair_id: u32,
    side: Option<OrderSide>,
    quantums: Option<u64>,
    subticks: Option<u64>,
    good_til_block: Option<u32>,
    subaccount_number: u32,
}

impl Default for OrderBuilder {
    fn default() -> Self {
        Self {
            clob_pair_id: DEFAULT_CLOB_PAIR_ID,
            side: None,
            quantums: None,
            subticks: None,
            good_til_block: None,
            subaccount_number: 0,
        }
    }
}

impl OrderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the market (defaults to 0, BTC-USD).
    pub fn clob_pair_id(mut self, clob_pair_id: u32) -> Self {
        self.clob_pair_id = clob_pair_id;
        self
    }

    pub fn buy(mut self) -> Self {
        self.side = Some(OrderSide::Buy);
        self
    }

    pub fn sell(mut self) -> Self {
        self.side = Some(OrderSide::Sell);
        self
    }

    pub fn side(mut self, side: OrderSide) -> Self {
        self.side = Some(side);
        self
    }

    /// Set the size in base quantums.
    pub fn quantums(mut self, quantums: u64) -> Self {
        self.quantums = Some(quantums);
        self
    }

    /// Set the price in subticks.
    pub fn subticks(mut self, subticks: u64) -> Self {
        self.subticks = Some(subticks);
        self
    }

    /// Set the size in base units, converted with the market's step size.
    pub fn size(mut self, size: f64, step_size: f64) -> Self {
        self.quantums = Some(size_to_quantums(size, step_size));
        self
    }

    /// Set the price in quote units, converted with the market's tick size.
    pub fn price(mut self, price: f64, tick_size: f64) -> Self {
        self.subticks = Some(price_to_subticks(price, tick_size));
        self
    }

    /// Set the last block at which the order may be filled (required).
    pub fn good_til_block(mut self, block: u32) -> Self {
        self.good_til_block = Some(block);
        self
    }

    /// Set `good_til_block` relative to the current height.
    pub fn expires_after(self, current_height: u64, blocks: u32) -> Self {
        self.good_til_block(OrderParams::expiry_from(current_height, blocks))
    }

    pub fn subaccount_number(mut self, number: u32) -> Self {
        self.subaccount_number = number;
        self
    }

    /// Build the order parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::MissingField`] if side, size, price, or expiry
    /// has not been set. Value checks (zero size, bad side) happen later,
    /// in message validation.
    pub fn build(self) -> SdkResult<OrderParams> {
        Ok(OrderParams {
            clob_pair_id: self.clob_pair_id,
            side: self
                .side
                .ok_or_else(|| SdkError::MissingField("side (call .buy() or .sell())".to_string()))?,
            quantums: self
                .quantums
                .ok_or_else(|| SdkError::MissingField("quantums".to_string()))?,
            subticks: self
                .subticks
                .ok_or_else(|| SdkError::MissingField("subticks".to_string()))?,
            good_til_block: self
                .good_til_block
                .ok_or_else(|| SdkError::MissingField("good_til_block".to_string()))?,
            subaccount_number: self.subaccount_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_with_human_units() {
        let params = OrderBuilder::new()
            .buy()
            .size(0.001, 0.00001)
            .price(30000.0, 0.01)
            .expires_after(1000, 200)
            .build()
            .unwrap();

        assert_eq!(params, OrderParams::buy(0, 100, 3_000_000, 1200));
    }

    #[test]
    fn test_builder_with_protocol_units() {
        let params = OrderBuilder::new()
            .clob_pair_id(1)
            .sell()
            .quantums(10)
            .subticks(20)
            .good_til_block(30)
            .subaccount_number(2)
            .build()
            .unwrap();

        assert_eq!(params.side, OrderSide::Sell);
        assert_eq!(params.clob_pair_id, 1);
        assert_eq!(params.subaccount_number, 2);
    }

    #[test]
    fn test_builder_missing_fields() {
        let err = OrderBuilder::new().quantums(1).subticks(1).good_til_block(1).build().unwrap_err();
        assert!(matches!(err, SdkError::MissingField(ref f) if f.starts_with("side")));

        let err = OrderBuilder::new().buy().subticks(1).good_til_block(1).build().unwrap_err();
        assert!(matches!(err, SdkError::MissingField(ref f) if f == "quantums"));

        let err = OrderBuilder::new().buy().quantums(1).subticks(1).build().unwrap_err();
        assert!(matches!(err, SdkError::MissingField(ref f) if f == "good_til_block"));
    }
}
