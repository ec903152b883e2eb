use crate::domain::ports::ProcessObserver;
use crate::domain::process::{Kpis, ProcessStatus, TimelineEvent};
use crate::domain::step::{StepCard, StepId, StepState};
use std::sync::{Arc, Mutex, PoisonError};

/// One observed notification, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    Step(StepCard),
    Event(TimelineEvent),
    Status(ProcessStatus),
    Kpis(Kpis),
}

/// A thread-safe observer that keeps every notification in memory.
///
/// Clones share the same log, so a clone can be handed to the runner while
/// the original is kept around to inspect what happened.
#[derive(Default, Clone)]
pub struct RecordingObserver {
    log: Arc<Mutex<Vec<Observation>>>,
}

impl RecordingObserver {
    /// Creates a new, empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, observation: Observation) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observation);
    }

    pub fn observations(&self) -> Vec<Observation> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn events(&self) -> Vec<TimelineEvent> {
        self.observations()
            .into_iter()
            .filter_map(|o| match o {
                Observation::Event(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<ProcessStatus> {
        self.observations()
            .into_iter()
            .filter_map(|o| match o {
                Observation::Status(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn kpis(&self) -> Vec<Kpis> {
        self.observations()
            .into_iter()
            .filter_map(|o| match o {
                Observation::Kpis(k) => Some(k),
                _ => None,
            })
            .collect()
    }

    /// The sequence of states a single step went through.
    pub fn step_states(&self, id: StepId) -> Vec<StepState> {
        self.observations()
            .into_iter()
            .filter_map(|o| match o {
                Observation::Step(card) if card.id == id => Some(card.state),
                _ => None,
            })
            .collect()
    }
}

impl ProcessObserver for RecordingObserver {
    fn step_changed(&self, card: &StepCard) {
        self.push(Observation::Step(card.clone()));
    }

    fn event_recorded(&self, event: &TimelineEvent) {
        self.push(Observation::Event(event.clone()));
    }

    fn status_changed(&self, status: ProcessStatus) {
        self.push(Observation::Status(status));
    }

    fn kpis_updated(&self, kpis: &Kpis) {
        self.push(Observation::Kpis(*kpis));
    }
}
