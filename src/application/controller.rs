use crate::config::CheckoutConfig;
use crate::domain::order::{OrderField, OrderFormInput, OrderPayload};
use crate::domain::payment::{PAYMENT_FAILED_MESSAGE, PaymentToken};
use crate::domain::ports::{CardInputBox, OrderRelayBox, PaymentProviderBox, UiPortRef};
use crate::domain::validation::{self, ValidationError};
use crate::error::{CheckoutError, Result};
use chrono::Local;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub const PROCESSING_MESSAGE: &str = "Processing payment...";
pub const PAYMENT_UNAVAILABLE_MESSAGE: &str =
    "Payment system unavailable. Please try again later or contact us directly.";
pub const ORDER_SUBMITTED_MESSAGE: &str =
    "Order submitted successfully! In a real implementation, your order would be processed now.";
pub const ORDER_RELAY_FAILED_MESSAGE: &str =
    "Your payment was accepted but the order could not be sent. Please contact us directly.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// Not initialized, or the page has no payment form.
    Idle,
    Initializing,
    Ready,
    Submitting,
    /// The payment provider could not be set up. Terminal for this page.
    Degraded,
}

/// What happened to one submit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission was already in flight; the control is inert.
    Ignored,
    Rejected(ValidationError),
    /// The form is valid and no payment wiring exists, so the page submits it itself.
    Delegated,
    PaymentUnavailable,
    Declined(String),
    Submitted(PaymentToken),
    RelayFailed(String),
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitOutcome::Ignored => write!(f, "ignored"),
            SubmitOutcome::Rejected(reason) => write!(f, "rejected: {reason}"),
            SubmitOutcome::Delegated => write!(f, "delegated to form submission"),
            SubmitOutcome::PaymentUnavailable => write!(f, "payment unavailable"),
            SubmitOutcome::Declined(message) => write!(f, "declined: {message}"),
            SubmitOutcome::Submitted(token) => write!(f, "submitted ({token})"),
            SubmitOutcome::RelayFailed(message) => write!(f, "relay failed: {message}"),
        }
    }
}

/// Drives one checkout page: wires the card input, validates submissions,
/// tokenizes the card and hands the finished order to the relay.
///
/// Only one submission runs at a time. While it is in flight the submit control
/// is disabled and further submit events return [`SubmitOutcome::Ignored`].
pub struct CheckoutController {
    config: CheckoutConfig,
    provider: PaymentProviderBox,
    relay: OrderRelayBox,
    ui: UiPortRef,
    card: OnceLock<CardInputBox>,
    state: Mutex<WorkflowState>,
    error_dismissal: Arc<Mutex<ErrorDismissal>>,
}

#[derive(Default)]
struct ErrorDismissal {
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl CheckoutController {
    pub fn new(
        config: CheckoutConfig,
        provider: PaymentProviderBox,
        relay: OrderRelayBox,
        ui: UiPortRef,
    ) -> Self {
        Self {
            config,
            provider,
            relay,
            ui,
            card: OnceLock::new(),
            state: Mutex::new(WorkflowState::Idle),
            error_dismissal: Arc::new(Mutex::new(ErrorDismissal::default())),
        }
    }

    pub fn state(&self) -> WorkflowState {
        *self.lock_state()
    }

    /// Creates the payment client and mounts the card input.
    ///
    /// Does nothing when the page has no payment form or the controller was
    /// already initialized. A failure leaves the controller `Degraded` and puts
    /// [`PAYMENT_UNAVAILABLE_MESSAGE`] in the card mount; it is not retried.
    pub async fn initialize(&self) -> Result<()> {
        if !self.ui.has_payment_form() {
            debug!("No payment form on page, skipping payment setup");
            return Ok(());
        }

        {
            let mut state = self.lock_state();
            if *state != WorkflowState::Idle {
                return Ok(());
            }
            *state = WorkflowState::Initializing;
        }

        match self.attach_card().await {
            Ok(card) => {
                // Only the Idle -> Initializing transition above reaches this point.
                let _ = self.card.set(card);
                self.set_state(WorkflowState::Ready);
                info!(mount = %self.config.card_mount, "Card input attached");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Payment initialization failed");
                self.ui.show_card_message(PAYMENT_UNAVAILABLE_MESSAGE);
                self.set_state(WorkflowState::Degraded);
                Err(e)
            }
        }
    }

    async fn attach_card(&self) -> Result<CardInputBox> {
        let client = self
            .provider
            .create_client(&self.config.application_id, &self.config.location_id)
            .await?;
        let card = client.create_card_input().await?;
        card.attach(&self.config.card_mount).await?;
        Ok(card)
    }

    /// Handles one submit event of the order form.
    pub async fn handle_submit(&self) -> SubmitOutcome {
        let input = self.read_form();

        {
            let mut state = self.lock_state();
            match *state {
                WorkflowState::Submitting | WorkflowState::Initializing => {
                    debug!(state = ?*state, "Submit ignored");
                    return SubmitOutcome::Ignored;
                }
                WorkflowState::Idle | WorkflowState::Ready | WorkflowState::Degraded => {}
            }

            if let Err(reason) = validation::check(&input, Local::now().date_naive()) {
                drop(state);
                info!(%reason, "Order form rejected");
                self.show_validation_error(reason);
                return SubmitOutcome::Rejected(reason);
            }

            match *state {
                WorkflowState::Idle => return SubmitOutcome::Delegated,
                WorkflowState::Degraded => return SubmitOutcome::PaymentUnavailable,
                _ => *state = WorkflowState::Submitting,
            }
        }

        self.dismiss_form_error();
        self.ui.set_submit_enabled(false);
        self.ui.show_status(PROCESSING_MESSAGE);

        let outcome = match self.tokenize().await {
            Ok(token) => {
                debug!(%token, "Payment token received");
                if !self.config.processing_delay.is_zero() {
                    tokio::time::sleep(self.config.processing_delay).await;
                }
                self.ui.clear_status();
                self.submit_order(input, token).await
            }
            Err(message) => {
                self.ui.show_status(&message);
                SubmitOutcome::Declined(message)
            }
        };

        self.ui.set_submit_enabled(true);
        self.set_state(WorkflowState::Ready);
        outcome
    }

    /// Returns the token, or the message the user should see.
    async fn tokenize(&self) -> std::result::Result<PaymentToken, String> {
        let Some(card) = self.card.get() else {
            error!("Submitting without an attached card input");
            return Err(PAYMENT_FAILED_MESSAGE.to_string());
        };

        let result = match self.config.tokenize_timeout {
            Some(limit) => tokio::time::timeout(limit, card.tokenize())
                .await
                .unwrap_or(Err(CheckoutError::TimeoutError(limit.as_millis()))),
            None => card.tokenize().await,
        };

        match result {
            Ok(result) => result.into_token().inspect_err(|message| {
                warn!(%message, "Tokenization rejected");
            }),
            Err(e) => {
                error!(error = %e, "Tokenization failed");
                Err(PAYMENT_FAILED_MESSAGE.to_string())
            }
        }
    }

    async fn submit_order(&self, input: OrderFormInput, token: PaymentToken) -> SubmitOutcome {
        let payload = OrderPayload::new(input, token.clone());
        match self.relay.submit(payload).await {
            Ok(()) => {
                info!(%token, "Order submitted");
                self.ui.notify(ORDER_SUBMITTED_MESSAGE);
                self.ui.reset_form();
                self.ui.scroll_to_top();
                SubmitOutcome::Submitted(token)
            }
            Err(e) => {
                error!(error = %e, "Order relay failed");
                self.ui.show_status(ORDER_RELAY_FAILED_MESSAGE);
                SubmitOutcome::RelayFailed(e.to_string())
            }
        }
    }

    fn read_form(&self) -> OrderFormInput {
        let mut input = OrderFormInput::default();
        for field in OrderField::ALL {
            input.set(field, self.ui.field_value(field));
        }
        input
    }

    /// Shows `reason` in the form error region and schedules its removal.
    ///
    /// Each message bumps the dismissal generation under the lock; a timer only
    /// clears the region if its generation is still current.
    fn show_validation_error(&self, reason: ValidationError) {
        let mut dismissal = self.lock_dismissal();
        if let Some(previous) = dismissal.timer.take() {
            previous.abort();
        }
        dismissal.generation += 1;

        self.ui.show_form_error(&reason.to_string());
        self.ui.scroll_to_form_error();

        let ui = self.ui.clone();
        let shared = self.error_dismissal.clone();
        let generation = dismissal.generation;
        let dismiss_after = self.config.error_dismiss_after;
        dismissal.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(dismiss_after).await;
            let mut dismissal = shared.lock().unwrap_or_else(PoisonError::into_inner);
            if dismissal.generation == generation {
                dismissal.timer = None;
                ui.clear_form_error();
            }
        }));
    }

    fn dismiss_form_error(&self) {
        let mut dismissal = self.lock_dismissal();
        if let Some(pending) = dismissal.timer.take() {
            pending.abort();
            dismissal.generation += 1;
            self.ui.clear_form_error();
        }
    }

    fn lock_dismissal(&self) -> MutexGuard<'_, ErrorDismissal> {
        self.error_dismissal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_state(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, next: WorkflowState) {
        let mut state = self.lock_state();
        debug!(from = ?*state, to = ?next, "Workflow transition");
        *state = next;
    }
}
