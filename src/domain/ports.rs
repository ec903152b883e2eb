use super::order::Order;
use super::process::{Kpis, ProcessStatus, TimelineEvent};
use super::service::{Authorization, Invocation, Refund, Reservation};
use super::step::StepCard;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PaymentService: Send + Sync {
    async fn authorize(&self, order: &Order) -> Result<Invocation<Authorization>>;
    async fn refund(&self, auth: Option<&Authorization>) -> Result<Invocation<Refund>>;
}

#[async_trait]
pub trait InventoryService: Send + Sync {
    async fn reserve(&self, order: &Order) -> Result<Invocation<Reservation>>;
}

/// Receives the live progress of a run, in the order it happens.
pub trait ProcessObserver: Send + Sync {
    fn step_changed(&self, card: &StepCard);
    fn event_recorded(&self, event: &TimelineEvent);
    fn status_changed(&self, status: ProcessStatus);
    fn kpis_updated(&self, _kpis: &Kpis) {}
}

pub type PaymentServiceBox = Box<dyn PaymentService>;
pub type InventoryServiceBox = Box<dyn InventoryService>;
pub type ProcessObserverBox = Box<dyn ProcessObserver>;
