//! Simulated order placement.
//!
//! There is no real order backend. Submitting puts the shopper's checkout
//! into `Pending`, then a background task waits out the processing delay,
//! asks the outcome policy for an answer and feeds it back into the session:
//! 1. Lock the session and start the submission (refused while pending)
//! 2. Spawn a task that sleeps for the processing delay
//! 3. Draw the outcome and resolve the session under its lock

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, instrument, warn};
use tringl_core::{OrderOutcome, OutcomePolicy, Resolution, SubmissionTicket, SubmitError};

use crate::config::OrderConfig;
use crate::services::checkouts::SharedCheckout;

/// Succeeds with a fixed probability, drawn from the thread-local RNG.
#[derive(Debug, Clone, Copy)]
pub struct RandomOutcome {
    success_rate: f64,
}

impl RandomOutcome {
    /// Create a policy succeeding with probability `success_rate`.
    ///
    /// Values outside `0.0..=1.0` are clamped.
    #[must_use]
    pub fn new(success_rate: f64) -> Self {
        let success_rate = if success_rate.is_nan() {
            0.0
        } else {
            success_rate.clamp(0.0, 1.0)
        };
        Self { success_rate }
    }

    #[must_use]
    pub const fn success_rate(&self) -> f64 {
        self.success_rate
    }
}

impl OutcomePolicy for RandomOutcome {
    fn decide(&self) -> OrderOutcome {
        if rand::rng().random_bool(self.success_rate) {
            OrderOutcome::Succeeded
        } else {
            OrderOutcome::Failed
        }
    }
}

/// A submission that has been accepted and is waiting for its outcome.
#[derive(Debug)]
pub struct PendingOrder {
    ticket: SubmissionTicket,
    task: JoinHandle<Resolution>,
}

impl PendingOrder {
    #[must_use]
    pub const fn ticket(&self) -> SubmissionTicket {
        self.ticket
    }

    /// Wait for the outcome to be applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the background task panicked or was aborted.
    pub async fn outcome(self) -> Result<Resolution, JoinError> {
        self.task.await
    }
}

/// Order placement service.
#[derive(Clone)]
pub struct OrderService {
    policy: Arc<dyn OutcomePolicy>,
    processing_delay: Duration,
}

impl OrderService {
    /// Create a service with an explicit policy and delay.
    #[must_use]
    pub fn new(policy: Arc<dyn OutcomePolicy>, processing_delay: Duration) -> Self {
        Self {
            policy,
            processing_delay,
        }
    }

    /// Create the production service: random outcomes at the configured rate.
    #[must_use]
    pub fn from_config(config: &OrderConfig) -> Self {
        Self::new(
            Arc::new(RandomOutcome::new(config.success_rate)),
            config.processing_delay,
        )
    }

    #[must_use]
    pub const fn processing_delay(&self) -> Duration {
        self.processing_delay
    }

    /// Submit the order held by `checkout`.
    ///
    /// The session is `Pending` when this returns. The outcome is applied
    /// by a background task after the processing delay.
    ///
    /// # Errors
    ///
    /// Returns the session's [`SubmitError`] if a submission is already in
    /// flight, the shipping form is incomplete or the cart is empty. No task
    /// is started in that case.
    #[instrument(skip(self, checkout))]
    pub async fn submit(&self, checkout: SharedCheckout) -> Result<PendingOrder, SubmitError> {
        let ticket = checkout.lock().await.submit()?;
        info!(
            generation = ticket.generation(),
            delay_ms = u64::try_from(self.processing_delay.as_millis()).unwrap_or(u64::MAX),
            "Order submitted"
        );

        let policy = Arc::clone(&self.policy);
        let delay = self.processing_delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let outcome = policy.decide();
            let resolution = checkout.lock().await.resolve(ticket, outcome);
            log_resolution(ticket, &resolution);
            resolution
        });

        Ok(PendingOrder { ticket, task })
    }

    /// Abandon the pending submission of `checkout`, if any.
    ///
    /// The background task still wakes up, but its outcome is discarded.
    #[instrument(skip(self, checkout))]
    pub async fn cancel(&self, checkout: &SharedCheckout) -> bool {
        let cancelled = checkout.lock().await.cancel();
        if cancelled {
            info!("Pending order cancelled");
        }
        cancelled
    }
}

fn log_resolution(ticket: SubmissionTicket, resolution: &Resolution) {
    match resolution {
        Resolution::Placed(order) => info!(
            generation = ticket.generation(),
            order_id = %order.id,
            total = %order.total,
            lines = order.lines.len(),
            "Order placed"
        ),
        Resolution::Failed => warn!(
            generation = ticket.generation(),
            "Order placement failed, cart kept for retry"
        ),
        Resolution::Discarded => debug!(
            generation = ticket.generation(),
            "Discarding outcome of a cancelled submission"
        ),
    }
}
