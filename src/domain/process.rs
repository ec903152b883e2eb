use super::order::{Order, Scenario};
use super::service::{Authorization, Refund, Reply, Reservation};
use super::step::StepBoard;
use crate::error::Result;
use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Info,
    Success,
    Error,
}

/// An entry of the run's timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEvent {
    pub at: DateTime<Local>,
    pub message: String,
    pub kind: EventKind,
    #[serde(rename = "ms", serialize_with = "serialize_millis")]
    pub elapsed: Option<Duration>,
}

impl TimelineEvent {
    pub fn new(message: impl Into<String>, kind: EventKind, elapsed: Option<Duration>) -> Self {
        Self {
            at: Local::now(),
            message: message.into(),
            kind,
            elapsed,
        }
    }
}

fn serialize_millis<S>(
    elapsed: &Option<Duration>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match elapsed {
        Some(d) => serializer.serialize_f64(d.as_micros() as f64 / 1000.0),
        None => serializer.serialize_none(),
    }
}

/// Variables written by the process as it runs. Unset ones are left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessVariables {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<Authorization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Reservation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compensation: Option<Refund>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<Reply>,
}

impl ProcessVariables {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        if self.is_empty() {
            return Ok("{}".to_string());
        }
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    #[default]
    Ready,
    Running,
    Finished,
    Error,
}

impl ProcessStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ProcessStatus::Ready => "Ready",
            ProcessStatus::Running => "Running",
            ProcessStatus::Finished => "Finished",
            ProcessStatus::Error => "Error",
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    #[serde(rename = "runtimeMs", serialize_with = "serialize_runtime")]
    pub runtime: Duration,
    pub executed_steps: u32,
    pub retries: u32,
}

fn serialize_runtime<S>(runtime: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(runtime.as_millis() as u64)
}

impl fmt::Display for Kpis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "runtime {:.1}s · steps {} · retries {}",
            self.runtime.as_secs_f64(),
            self.executed_steps,
            self.retries
        )
    }
}

/// Everything a finished run leaves behind.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    pub scenario: Scenario,
    pub status: ProcessStatus,
    pub steps: StepBoard,
    pub events: Vec<TimelineEvent>,
    pub variables: ProcessVariables,
    pub kpis: Kpis,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_variables_render_as_braces() {
        let vars = ProcessVariables::default();
        assert!(vars.is_empty());
        assert_eq!(vars.to_pretty_json().unwrap(), "{}");
    }

    #[test]
    fn test_variables_skip_unset_keys() {
        let vars = ProcessVariables {
            order: Some(Scenario::Happy.order().unwrap()),
            ..Default::default()
        };
        let json: serde_json::Value =
            serde_json::from_str(&vars.to_pretty_json().unwrap()).unwrap();
        assert!(json.get("order").is_some());
        assert!(json.get("auth").is_none());
        assert!(json.get("reply").is_none());
    }

    #[test]
    fn test_kpis_display() {
        let kpis = Kpis {
            runtime: Duration::from_millis(1840),
            executed_steps: 5,
            retries: 0,
        };
        assert_eq!(kpis.to_string(), "runtime 1.8s · steps 5 · retries 0");
    }

    #[test]
    fn test_event_serializes_millis() {
        let event = TimelineEvent::new(
            "Payment authorized",
            EventKind::Success,
            Some(Duration::from_millis(450)),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "success");
        assert_eq!(json["ms"].as_f64(), Some(450.0));

        let info = TimelineEvent::new("Request received", EventKind::Info, None);
        let json = serde_json::to_value(&info).unwrap();
        assert!(json["ms"].is_null());
    }
}
