use crate::domain::order::Order;
use crate::domain::ports::{InventoryService, PaymentService};
use crate::domain::service::{Authorization, Invocation, Refund, Reservation};
use crate::domain::speed::SpeedFactor;
use crate::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;
use tokio::time::Instant;

/// Highest amount the simulated payment provider approves.
pub const AUTHORIZATION_LIMIT: Decimal = dec!(200);

/// A simulated network delay: `base` plus a uniform random share of `spread`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Latency {
    pub base: Duration,
    pub spread: Duration,
}

impl Latency {
    pub const fn new(base_ms: u64, spread_ms: u64) -> Self {
        Self {
            base: Duration::from_millis(base_ms),
            spread: Duration::from_millis(spread_ms),
        }
    }

    pub const fn fixed(ms: u64) -> Self {
        Self::new(ms, 0)
    }

    pub fn sample(&self) -> Duration {
        if self.spread.is_zero() {
            return self.base;
        }
        let jitter = rand::thread_rng().gen_range(Duration::ZERO..self.spread);
        self.base + jitter
    }
}

/// Per-call latency of the simulated partner services.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyProfile {
    pub authorize: Latency,
    pub reserve: Latency,
    pub refund: Latency,
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            authorize: Latency::new(400, 500),
            reserve: Latency::new(300, 500),
            refund: Latency::new(250, 300),
        }
    }
}

impl LatencyProfile {
    /// Same fixed delay for every call. Useful to make runs reproducible.
    pub const fn fixed(ms: u64) -> Self {
        Self {
            authorize: Latency::fixed(ms),
            reserve: Latency::fixed(ms),
            refund: Latency::fixed(ms),
        }
    }
}

fn stamped(prefix: &str) -> String {
    format!("{prefix}_{}", Utc::now().timestamp_millis())
}

/// Payment provider stand-in. Approves any order up to `AUTHORIZATION_LIMIT`.
#[derive(Debug, Clone)]
pub struct SimulatedPaymentService {
    speed: SpeedFactor,
    latency: LatencyProfile,
}

impl SimulatedPaymentService {
    pub fn new(speed: SpeedFactor, latency: LatencyProfile) -> Self {
        Self { speed, latency }
    }
}

#[async_trait]
impl PaymentService for SimulatedPaymentService {
    async fn authorize(&self, order: &Order) -> Result<Invocation<Authorization>> {
        let start = Instant::now();
        self.speed.wait(self.latency.authorize.sample()).await;

        let approved = order.amount.value() <= AUTHORIZATION_LIMIT;
        let result = Authorization {
            approved,
            auth_id: approved.then(|| stamped("AUTH")),
            reason: if approved {
                "Payment approved".to_string()
            } else {
                "Payment rejected (over limit)".to_string()
            },
        };
        tracing::debug!(order_id = %order.order_id, approved, "authorize");
        Ok(Invocation {
            result,
            elapsed: start.elapsed(),
        })
    }

    async fn refund(&self, auth: Option<&Authorization>) -> Result<Invocation<Refund>> {
        let start = Instant::now();
        self.speed.wait(self.latency.refund.sample()).await;

        let refunded = auth.is_some_and(|a| a.auth_id.is_some());
        tracing::debug!(refunded, "refund");
        Ok(Invocation {
            result: Refund {
                refunded,
                refund_id: stamped("REF"),
            },
            elapsed: start.elapsed(),
        })
    }
}

/// Inventory stand-in. Any order id ending in `7` is out of stock.
#[derive(Debug, Clone)]
pub struct SimulatedInventoryService {
    speed: SpeedFactor,
    latency: LatencyProfile,
}

impl SimulatedInventoryService {
    pub fn new(speed: SpeedFactor, latency: LatencyProfile) -> Self {
        Self { speed, latency }
    }
}

#[async_trait]
impl InventoryService for SimulatedInventoryService {
    async fn reserve(&self, order: &Order) -> Result<Invocation<Reservation>> {
        let start = Instant::now();
        self.speed.wait(self.latency.reserve.sample()).await;

        let reserved = !order.order_id.ends_with('7');
        let result = Reservation {
            reserved,
            reservation_id: reserved.then(|| stamped("RES")),
            reason: if reserved {
                "Inventory reserved".to_string()
            } else {
                "Out of stock".to_string()
            },
        };
        tracing::debug!(order_id = %order.order_id, reserved, "reserve");
        Ok(Invocation {
            result,
            elapsed: start.elapsed(),
        })
    }
}
