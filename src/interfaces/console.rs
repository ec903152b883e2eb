use crate::domain::ports::ProcessObserver;
use crate::domain::process::{EventKind, ProcessReport, ProcessStatus, TimelineEvent};
use crate::domain::step::{StepCard, StepState};
use crate::error::Result;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Writes the live progress of a run as plain text lines.
///
/// Pending transitions (the board reset at the start of a run) are not
/// printed; every other step change, every timeline event and every status
/// change is.
pub struct ConsoleRenderer<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_line(&self, line: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        // Progress output is best effort; a closed pipe must not abort the run.
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }
}

impl<W: Write + Send> ProcessObserver for ConsoleRenderer<W> {
    fn step_changed(&self, card: &StepCard) {
        if card.state == StepState::Pending {
            return;
        }
        self.write_line(&format!(
            "  [{:<9}] {:<24} {}",
            card.id.as_str(),
            card.state.label(),
            card.detail
        ));
    }

    fn event_recorded(&self, event: &TimelineEvent) {
        self.write_line(&format_event(event));
    }

    fn status_changed(&self, status: ProcessStatus) {
        self.write_line(&format!("status: {status}"));
    }
}

fn event_marker(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Info => "·",
        EventKind::Success => "✓",
        EventKind::Error => "✗",
    }
}

pub fn format_event(event: &TimelineEvent) -> String {
    let mut line = format!(
        "{} {} {}",
        event.at.format("%H:%M:%S"),
        event_marker(event.kind),
        event.message
    );
    if let Some(elapsed) = event.elapsed {
        line.push_str(&format!(" ({:.2}s)", elapsed.as_secs_f64()));
    }
    line
}

/// Writes the end-of-run summary: the step board, the KPIs and the variables.
pub fn write_summary<W: Write>(out: &mut W, report: &ProcessReport) -> Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "Scenario {} ({}) finished with status {}",
        report.scenario,
        report
            .variables
            .order
            .as_ref()
            .map(|o| o.order_id.as_str())
            .unwrap_or("-"),
        report.status
    )?;
    writeln!(out, "Steps:")?;
    for card in report.steps.cards() {
        writeln!(
            out,
            "  {:<24} {:<16} {}",
            card.id.name(),
            card.state.label(),
            card.detail
        )?;
    }
    writeln!(out, "KPIs: {}", report.kpis)?;
    writeln!(out, "Variables:")?;
    writeln!(out, "{}", report.variables.to_pretty_json()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::Scenario;
    use crate::domain::process::{Kpis, ProcessVariables};
    use crate::domain::step::{StepBoard, StepId};
    use std::time::Duration;

    #[test]
    fn test_pending_steps_are_not_printed() {
        let renderer = ConsoleRenderer::new(Vec::new());
        let mut board = StepBoard::new();
        renderer.step_changed(board.get(StepId::Receive).unwrap());
        let card = board.set(StepId::Receive, StepState::Running, Some("Processing"));
        renderer.step_changed(card);

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("[receive  ] Running"));
        assert!(out.contains("Processing"));
    }

    #[test]
    fn test_event_line_includes_elapsed() {
        let event = TimelineEvent::new(
            "Payment authorized",
            EventKind::Success,
            Some(Duration::from_millis(640)),
        );
        let line = format_event(&event);
        assert!(line.ends_with("✓ Payment authorized (0.64s)"));

        let info = TimelineEvent::new("Request received", EventKind::Info, None);
        assert!(format_event(&info).ends_with("· Request received"));
    }

    #[test]
    fn test_status_line() {
        let renderer = ConsoleRenderer::new(Vec::new());
        renderer.status_changed(ProcessStatus::Finished);
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out, "status: Finished\n");
    }

    #[test]
    fn test_summary_lists_every_step() {
        let mut steps = StepBoard::new();
        steps.set(
            StepId::Receive,
            StepState::Success(Some(Duration::from_millis(120))),
            Some("Request processed"),
        );
        let report = ProcessReport {
            scenario: Scenario::Happy,
            status: ProcessStatus::Finished,
            steps,
            events: Vec::new(),
            variables: ProcessVariables {
                order: Some(Scenario::Happy.order().unwrap()),
                ..Default::default()
            },
            kpis: Kpis {
                runtime: Duration::from_millis(1500),
                executed_steps: 1,
                retries: 0,
            },
        };

        let mut out = Vec::new();
        write_summary(&mut out, &report).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("Scenario happy (A-1001) finished with status Finished"));
        for id in StepId::ALL {
            assert!(out.contains(id.name()));
        }
        assert!(out.contains("OK • 0.12s"));
        assert!(out.contains("KPIs: runtime 1.5s · steps 1 · retries 0"));
        assert!(out.contains(r#""orderId": "A-1001""#));
    }
}
