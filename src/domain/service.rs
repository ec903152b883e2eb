use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of the payment provider's authorization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    pub approved: bool,
    pub auth_id: Option<String>,
    pub reason: String,
}

/// Outcome of the inventory reservation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub reserved: bool,
    pub reservation_id: Option<String>,
    pub reason: String,
}

/// Outcome of the compensating refund call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    pub refunded: bool,
    pub refund_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Confirmed,
    Rejected,
}

impl ReplyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyStatus::Confirmed => "confirmed",
            ReplyStatus::Rejected => "rejected",
        }
    }
}

pub const CONFIRMED_MESSAGE: &str = "Order confirmed";
pub const PAYMENT_FAILED_MESSAGE: &str = "Order rejected - payment failed";
pub const OUT_OF_STOCK_MESSAGE: &str = "Order rejected - out of stock (payment refunded)";

/// The final answer sent back to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub status: ReplyStatus,
    pub message: String,
    pub ts: DateTime<Utc>,
}

impl Reply {
    pub fn confirmed() -> Self {
        Self::new(ReplyStatus::Confirmed, CONFIRMED_MESSAGE)
    }

    pub fn payment_failed() -> Self {
        Self::new(ReplyStatus::Rejected, PAYMENT_FAILED_MESSAGE)
    }

    pub fn out_of_stock() -> Self {
        Self::new(ReplyStatus::Rejected, OUT_OF_STOCK_MESSAGE)
    }

    fn new(status: ReplyStatus, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
            ts: Utc::now(),
        }
    }
}

/// A service result paired with the time the call took.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation<T> {
    pub result: T,
    pub elapsed: Duration,
}
