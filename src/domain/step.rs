use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// The activities of the order process, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepId {
    Receive,
    Payment,
    Decision,
    Inventory,
    Refund,
    Reply,
}

impl StepId {
    pub const ALL: [StepId; 6] = [
        StepId::Receive,
        StepId::Payment,
        StepId::Decision,
        StepId::Inventory,
        StepId::Refund,
        StepId::Reply,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::Receive => "receive",
            StepId::Payment => "payment",
            StepId::Decision => "decision",
            StepId::Inventory => "inventory",
            StepId::Refund => "refund",
            StepId::Reply => "reply",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StepId::Receive => "Receive Request",
            StepId::Payment => "Authorize Payment",
            StepId::Decision => "Payment Approved?",
            StepId::Inventory => "Reserve Inventory",
            StepId::Refund => "Refund Payment (Comp.)",
            StepId::Reply => "Reply",
        }
    }

    /// Description shown while the step has not run yet.
    pub fn idle_description(&self) -> &'static str {
        match self {
            StepId::Receive => "Processing incoming request",
            StepId::Payment => "Authorizing with payment provider",
            StepId::Decision => "Evaluating authorization",
            StepId::Inventory => "Reserving items in stock",
            StepId::Refund => "Compensating previous payment",
            StepId::Reply => "Sending final response",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepState {
    #[default]
    Pending,
    Running,
    Success(Option<Duration>),
    Error(Option<Duration>),
}

impl StepState {
    pub fn label(&self) -> String {
        match self {
            StepState::Pending => "Pending".to_string(),
            StepState::Running => "Running".to_string(),
            StepState::Success(Some(d)) if !d.is_zero() => {
                format!("OK • {:.2}s", d.as_secs_f64())
            }
            StepState::Success(_) => "OK".to_string(),
            StepState::Error(Some(d)) if !d.is_zero() => {
                format!("Error • {:.2}s", d.as_secs_f64())
            }
            StepState::Error(_) => "Error".to_string(),
        }
    }
}

impl Serialize for StepState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.label())
    }
}

/// One card of the step board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepCard {
    pub id: StepId,
    pub state: StepState,
    pub detail: String,
}

impl StepCard {
    fn pending(id: StepId) -> Self {
        Self {
            id,
            state: StepState::Pending,
            detail: id.idle_description().to_string(),
        }
    }
}

/// Holds a card for every step, always in `StepId::ALL` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StepBoard {
    cards: Vec<StepCard>,
}

impl Default for StepBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StepBoard {
    pub fn new() -> Self {
        Self {
            cards: StepId::ALL.into_iter().map(StepCard::pending).collect(),
        }
    }

    /// Puts every card back to pending with its idle description.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Moves a card to `state`. The detail text is only replaced when one is given.
    pub fn set(&mut self, id: StepId, state: StepState, detail: Option<&str>) -> &StepCard {
        // Cards are built from StepId::ALL, which follows declaration order.
        let card = &mut self.cards[id as usize];
        card.state = state;
        if let Some(detail) = detail {
            card.detail = detail.to_string();
        }
        card
    }

    pub fn get(&self, id: StepId) -> Option<&StepCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn cards(&self) -> &[StepCard] {
        &self.cards
    }
}
