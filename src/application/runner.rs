use crate::domain::order::{Order, Scenario};
use crate::domain::ports::{
    InventoryServiceBox, PaymentServiceBox, ProcessObserver, ProcessObserverBox,
};
use crate::domain::process::{
    EventKind, Kpis, ProcessReport, ProcessStatus, ProcessVariables, TimelineEvent,
};
use crate::domain::service::{Reply, ReplyStatus};
use crate::domain::speed::SpeedFactor;
use crate::domain::step::{StepBoard, StepId, StepState};
use crate::error::{Result, SimulatorError};
use crate::infrastructure::simulated::{
    LatencyProfile, SimulatedInventoryService, SimulatedPaymentService,
};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::Instrument;

const RECEIVE_PAUSE: Duration = Duration::from_millis(120);
const DECISION_PAUSE: Duration = Duration::from_millis(80);
const REPLY_PAUSE: Duration = Duration::from_millis(180);
const COMPENSATED_REPLY_PAUSE: Duration = Duration::from_millis(160);

/// Settings of a simulated run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunnerConfig {
    pub speed: SpeedFactor,
    pub latency: LatencyProfile,
}

/// Drives the order process through one of the scripted scenarios.
///
/// The flow is receive, authorize payment, decide, reserve inventory, reply.
/// When the reservation fails after an approved payment, the payment is
/// refunded before the rejection goes out. Only one run can be in flight
/// at a time; progress is pushed to the observer as it happens.
pub struct ScenarioRunner {
    payment: PaymentServiceBox,
    inventory: InventoryServiceBox,
    observer: ProcessObserverBox,
    speed: SpeedFactor,
    current: Mutex<Option<Scenario>>,
}

impl ScenarioRunner {
    /// Creates a new `ScenarioRunner` instance.
    ///
    /// # Arguments
    ///
    /// * `payment` - The payment provider used for authorization and refunds.
    /// * `inventory` - The inventory service used for reservations.
    /// * `observer` - Receives step changes, timeline events and status updates.
    /// * `speed` - Scales the runner's own pauses.
    pub fn new(
        payment: PaymentServiceBox,
        inventory: InventoryServiceBox,
        observer: ProcessObserverBox,
        speed: SpeedFactor,
    ) -> Self {
        Self {
            payment,
            inventory,
            observer,
            speed,
            current: Mutex::new(None),
        }
    }

    /// Creates a runner backed by the simulated partner services.
    pub fn simulated(config: RunnerConfig, observer: ProcessObserverBox) -> Self {
        Self::new(
            Box::new(SimulatedPaymentService::new(config.speed, config.latency)),
            Box::new(SimulatedInventoryService::new(config.speed, config.latency)),
            observer,
            config.speed,
        )
    }

    /// The scenario currently in flight, if any.
    pub fn current(&self) -> Option<Scenario> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `scenario` to completion and returns what it produced.
    ///
    /// Fails with `ScenarioInProgress` when another run has not finished yet.
    /// A failing service call ends the run with status `Error` and its error
    /// is returned.
    pub async fn run(&self, scenario: Scenario) -> Result<ProcessReport> {
        let _guard = self.begin(scenario)?;
        let order = scenario.order()?;
        let span = tracing::info_span!("scenario", %scenario, order_id = %order.order_id);

        async move {
            tracing::info!("run started");
            let mut run = Run::start(self.observer.as_ref());

            match self.execute(&mut run, order).await {
                Ok(()) => {
                    let kpis = run.finish();
                    tracing::info!(steps = kpis.executed_steps, "run finished");
                    Ok(run.into_report(scenario, kpis))
                }
                Err(e) => {
                    run.fail(&e);
                    tracing::error!(error = %e, "run failed");
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    fn begin(&self, scenario: Scenario) -> Result<RunGuard<'_>> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(running) = *current {
            tracing::warn!(%running, requested = %scenario, "run rejected");
            return Err(SimulatorError::ScenarioInProgress(running.to_string()));
        }
        *current = Some(scenario);
        Ok(RunGuard {
            slot: &self.current,
        })
    }

    async fn execute(&self, run: &mut Run<'_>, order: Order) -> Result<()> {
        // receive
        let t = Instant::now();
        run.step(StepId::Receive, StepState::Running, "Processing incoming request…");
        run.event("Request received", EventKind::Info, None);
        self.speed.wait(RECEIVE_PAUSE).await;
        run.vars.order = Some(order.clone());
        let ms = t.elapsed();
        run.step(StepId::Receive, StepState::Success(Some(ms)), "Request processed");
        run.event("Request processed", EventKind::Success, Some(ms));
        run.count_step();

        // invoke: authorize payment
        run.step(StepId::Payment, StepState::Running, "Contacting payment provider…");
        run.event("Payment authorization started", EventKind::Info, None);
        let auth = self.payment.authorize(&order).await?;
        let approved = auth.result.approved;
        if approved {
            let ms = auth.elapsed;
            run.step(StepId::Payment, StepState::Success(Some(ms)), "Payment authorized");
            run.event("Payment authorized", EventKind::Success, Some(ms));
        } else {
            let ms = auth.elapsed;
            run.step(StepId::Payment, StepState::Error(Some(ms)), "Payment rejected");
            run.event(
                format!("Payment rejected: {}", auth.result.reason),
                EventKind::Error,
                Some(ms),
            );
        }
        run.vars.auth = Some(auth.result);
        run.count_step();

        // if: payment approved?
        let t = Instant::now();
        run.step(StepId::Decision, StepState::Running, "Evaluating payment result…");
        self.speed.wait(DECISION_PAUSE).await;
        let ms = t.elapsed();
        if !approved {
            run.step(
                StepId::Decision,
                StepState::Success(Some(ms)),
                "Payment not approved → skip reservation",
            );
            // Not counted: only the approved branch counts the decision.
            run.event("Decision: rejection path", EventKind::Error, Some(ms));

            self.reply(run, "Sending rejection…", REPLY_PAUSE, Reply::payment_failed)
                .await;
            return Ok(());
        }
        run.step(StepId::Decision, StepState::Success(Some(ms)), "Payment approved → continue");
        run.event("Decision: approved path", EventKind::Success, Some(ms));
        run.count_step();

        // invoke: reserve inventory
        run.step(StepId::Inventory, StepState::Running, "Checking inventory…");
        run.event("Inventory reservation started", EventKind::Info, None);
        let reservation = self.inventory.reserve(&order).await?;
        let reserved = reservation.result.reserved;
        let reason = reservation.result.reason.clone();
        run.vars.inventory = Some(reservation.result);

        if reserved {
            let ms = reservation.elapsed;
            run.step(StepId::Inventory, StepState::Success(Some(ms)), "Inventory reserved");
            run.event("Inventory reserved", EventKind::Success, Some(ms));
            run.count_step();

            self.reply(run, "Sending confirmation…", REPLY_PAUSE, Reply::confirmed)
                .await;
            return Ok(());
        }

        let ms = reservation.elapsed;
        run.step(StepId::Inventory, StepState::Error(Some(ms)), "Inventory unavailable");
        run.event(format!("Inventory failed: {reason}"), EventKind::Error, Some(ms));
        run.count_step();

        // compensation: undo the authorization
        run.step(StepId::Refund, StepState::Running, "Compensating: refunding payment…");
        run.event("Compensation started (refund)", EventKind::Info, None);
        let refund = self.payment.refund(run.vars.auth.as_ref()).await?;
        let (state, message, kind) = if refund.result.refunded {
            (StepState::Success(Some(refund.elapsed)), "Refund complete", EventKind::Success)
        } else {
            (StepState::Error(Some(refund.elapsed)), "Refund failed", EventKind::Error)
        };
        run.vars.compensation = Some(refund.result);
        run.step(StepId::Refund, state, message);
        run.event(message, kind, Some(refund.elapsed));
        run.count_step();

        self.reply(
            run,
            "Sending rejection…",
            COMPENSATED_REPLY_PAUSE,
            Reply::out_of_stock,
        )
        .await;
        Ok(())
    }

    async fn reply(&self, run: &mut Run<'_>, sending: &str, pause: Duration, build: fn() -> Reply) {
        let t = Instant::now();
        run.step(StepId::Reply, StepState::Running, sending);
        self.speed.wait(pause).await;

        let reply = build();
        let (detail, event) = match reply.status {
            ReplyStatus::Confirmed => ("Confirmation sent", "Order confirmation sent"),
            ReplyStatus::Rejected => ("Rejection sent", "Order rejection sent"),
        };
        run.vars.reply = Some(reply);
        let ms = t.elapsed();
        run.step(StepId::Reply, StepState::Success(Some(ms)), detail);
        run.event(event, EventKind::Success, Some(ms));
        run.count_step();
    }
}

/// Releases the runner when a run ends, including when its future is dropped.
struct RunGuard<'a> {
    slot: &'a Mutex<Option<Scenario>>,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// State of a single run. Rebuilt from scratch every time.
struct Run<'a> {
    observer: &'a dyn ProcessObserver,
    board: StepBoard,
    events: Vec<TimelineEvent>,
    vars: ProcessVariables,
    executed_steps: u32,
    started: Instant,
    status: ProcessStatus,
}

impl<'a> Run<'a> {
    fn start(observer: &'a dyn ProcessObserver) -> Self {
        let run = Self {
            observer,
            board: StepBoard::new(),
            events: Vec::new(),
            vars: ProcessVariables::default(),
            executed_steps: 0,
            started: Instant::now(),
            status: ProcessStatus::Running,
        };
        observer.status_changed(ProcessStatus::Running);
        for card in run.board.cards() {
            observer.step_changed(card);
        }
        observer.kpis_updated(&run.kpis());
        run
    }

    fn step(&mut self, id: StepId, state: StepState, detail: &str) {
        let card = self.board.set(id, state, Some(detail));
        self.observer.step_changed(card);
    }

    fn event(&mut self, message: impl Into<String>, kind: EventKind, elapsed: Option<Duration>) {
        let event = TimelineEvent::new(message, kind, elapsed);
        self.observer.event_recorded(&event);
        self.events.push(event);
    }

    fn count_step(&mut self) {
        self.executed_steps += 1;
        self.observer.kpis_updated(&self.kpis());
    }

    fn kpis(&self) -> Kpis {
        Kpis {
            runtime: self.started.elapsed(),
            executed_steps: self.executed_steps,
            retries: 0,
        }
    }

    /// Closes the run and returns the final KPIs, which the report keeps as-is.
    fn finish(&mut self) -> Kpis {
        let kpis = self.kpis();
        self.observer.kpis_updated(&kpis);
        self.event("Process completed", EventKind::Success, Some(kpis.runtime));
        self.set_status(ProcessStatus::Finished);
        kpis
    }

    fn fail(&mut self, error: &SimulatorError) {
        self.event(format!("Process failed: {error}"), EventKind::Error, None);
        self.set_status(ProcessStatus::Error);
    }

    fn set_status(&mut self, status: ProcessStatus) {
        self.status = status;
        self.observer.status_changed(status);
    }

    fn into_report(self, scenario: Scenario, kpis: Kpis) -> ProcessReport {
        ProcessReport {
            scenario,
            status: self.status,
            steps: self.board,
            events: self.events,
            variables: self.vars,
            kpis,
        }
    }
}
