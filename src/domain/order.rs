use crate::error::SimulatorError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a positive order amount.
///
/// Wraps `rust_decimal::Decimal` so that an order can never carry a zero or
/// negative total into the payment step.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, SimulatorError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(SimulatorError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

/// The incoming order. Its id doubles as the correlation key of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub amount: Amount,
    pub customer_id: String,
}

impl Order {
    pub fn new(
        order_id: impl Into<String>,
        amount: Decimal,
        customer_id: impl Into<String>,
    ) -> Result<Self, SimulatorError> {
        let order_id = order_id.into();
        if order_id.is_empty() {
            return Err(SimulatorError::ValidationError(
                "Order id must not be empty".to_string(),
            ));
        }
        Ok(Self {
            order_id,
            amount: Amount::new(amount)?,
            customer_id: customer_id.into(),
        })
    }
}

/// The three scripted runs of the order process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Payment approved, stock available.
    Happy,
    /// Payment over the authorization limit.
    Reject,
    /// Payment approved but the order id maps to an empty shelf.
    #[value(name = "nostock")]
    NoStock,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Happy, Scenario::Reject, Scenario::NoStock];

    pub fn label(&self) -> &'static str {
        match self {
            Scenario::Happy => "happy",
            Scenario::Reject => "reject",
            Scenario::NoStock => "nostock",
        }
    }

    /// Builds the order this scenario submits.
    pub fn order(&self) -> Result<Order, SimulatorError> {
        let (order_id, amount, customer_id) = match self {
            Scenario::Happy => ("A-1001", dec!(125), "C-123"),
            Scenario::Reject => ("A-1002", dec!(250), "C-456"),
            Scenario::NoStock => ("A-1007", dec!(125), "C-789"),
        };
        Order::new(order_id, amount, customer_id)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
