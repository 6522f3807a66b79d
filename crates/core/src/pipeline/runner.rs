//! Pipeline runner: subscribes each step to its topic and drives events
//! through it until shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::bus::{BusError, EventBus, PipelineEvent};
use crate::job::{apply_patch, JobPatch, JobStatus, JobStore};

use super::error::StepError;
use super::step::{Correlation, PipelineStep};

/// Owns the step worker tasks.
///
/// Each registered step gets one task consuming its topic sequentially, so
/// events for the same stage are handled in arrival order. Failure handling
/// is centralized here: every step records and notifies the same way.
pub struct PipelineRunner {
    store: Arc<dyn JobStore>,
    bus: Arc<EventBus>,
    steps: Vec<Arc<dyn PipelineStep>>,
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
}

impl PipelineRunner {
    pub fn new(store: Arc<dyn JobStore>, bus: Arc<EventBus>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            store,
            bus,
            steps: Vec::new(),
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        }
    }

    /// Register a step before starting.
    pub fn with_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Subscribe every step and spawn its worker task.
    pub fn start(&self) -> Result<(), BusError> {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Pipeline runner already running");
            return Ok(());
        }

        info!(steps = self.steps.len(), "Starting pipeline runner");

        for step in &self.steps {
            let mut rx = self.bus.subscribe(step.topic())?;
            let step = Arc::clone(step);
            let store = Arc::clone(&self.store);
            let bus = Arc::clone(&self.bus);
            let running = Arc::clone(&self.running);
            let mut shutdown_rx = self.shutdown_tx.subscribe();

            tokio::spawn(async move {
                debug!(step = step.name(), topic = %step.topic(), "Step worker started");
                loop {
                    tokio::select! {
                        _ = shutdown_rx.recv() => {
                            break;
                        }
                        event = rx.recv() => {
                            let Some(event) = event else {
                                break;
                            };
                            if !running.load(Ordering::Relaxed) {
                                break;
                            }
                            handle_event(step.as_ref(), store.as_ref(), &bus, event).await;
                        }
                    }
                }
                debug!(step = step.name(), "Step worker stopped");
            });
        }

        info!("Pipeline runner started");
        Ok(())
    }

    /// Signal all step workers to stop.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Pipeline runner not running");
            return;
        }

        info!("Stopping pipeline runner");
        let _ = self.shutdown_tx.send(());
    }
}

/// Run one event through a step, publishing the follow-up event or the
/// step's error event.
pub async fn handle_event(
    step: &dyn PipelineStep,
    store: &dyn JobStore,
    bus: &EventBus,
    event: PipelineEvent,
) {
    let Some(correlation) = step.correlation(&event) else {
        error!(
            step = step.name(),
            topic = %event.topic(),
            "Event is not this step's input, nobody to notify"
        );
        return;
    };

    // A job that already reached a terminal state is never reprocessed.
    match store.get(&correlation.job_id) {
        Ok(Some(job)) if job.status.is_terminal() => {
            debug!(
                step = step.name(),
                job_id = %correlation.job_id,
                status = %job.status,
                "Stale event for terminal job, ignored"
            );
            return;
        }
        Ok(_) => {}
        Err(e) => {
            warn!(
                step = step.name(),
                job_id = %correlation.job_id,
                error = %e,
                "Job lookup failed before step, continuing"
            );
        }
    }

    match step.run(event).await {
        Ok(next) => bus.publish(next),
        Err(err) => handle_failure(step, store, bus, &correlation, err),
    }
}

/// Uniform failure propagation: record the cause on the job, then publish
/// the step's error event.
fn handle_failure(
    step: &dyn PipelineStep,
    store: &dyn JobStore,
    bus: &EventBus,
    correlation: &Correlation,
    err: StepError,
) {
    let (status, reason, notice) = match err {
        StepError::Business { reason, notice } => (JobStatus::Failed, reason, notice),
        StepError::Configuration(message) | StepError::Operational(message) => (
            JobStatus::Error,
            message,
            Some(step.failure_notice().to_string()),
        ),
    };

    error!(
        step = step.name(),
        job_id = %correlation.job_id,
        status = %status,
        error = %reason,
        "Step failed"
    );

    if let Err(e) = apply_patch(store, &correlation.job_id, JobPatch::failure(status, &reason)) {
        error!(
            step = step.name(),
            job_id = %correlation.job_id,
            error = %e,
            "Failed to record step failure"
        );
    }

    bus.publish(step.error_event(correlation, notice));
}
