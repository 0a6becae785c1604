use crate::domain::order::{OrderField, OrderFormInput, OrderPayload};
use crate::domain::ports::{OrderRelay, UiPort};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::RwLock;

/// A write made to the page surface, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SubmitEnabled(bool),
    Status(String),
    StatusCleared,
    FormError(String),
    FormErrorCleared,
    ScrolledToFormError,
    CardMessage(String),
    Notified(String),
    FormReset,
    ScrolledToTop,
}

#[derive(Debug)]
struct FormState {
    fields: OrderFormInput,
    submit_enabled: bool,
    status: Option<String>,
    form_error: Option<String>,
    card_message: Option<String>,
    events: Option<Vec<UiEvent>>,
}

impl FormState {
    fn record(&mut self, event: UiEvent) {
        if let Some(events) = &mut self.events {
            events.push(event);
        }
    }
}

/// An order page held in memory.
///
/// Keeps the current field values and region contents. A page built with
/// [`InMemoryForm::recording`] also logs every write as a [`UiEvent`]; the
/// default page keeps no history, so a long batch runs in constant memory.
#[derive(Debug)]
pub struct InMemoryForm {
    state: Mutex<FormState>,
    has_payment_form: bool,
}

impl Default for InMemoryForm {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryForm {
    /// Creates an empty page that includes a payment form.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FormState {
                fields: OrderFormInput::default(),
                submit_enabled: true,
                status: None,
                form_error: None,
                card_message: None,
                events: None,
            }),
            has_payment_form: true,
        }
    }

    /// Creates an empty page with a payment form that logs every write.
    pub fn recording() -> Self {
        let form = Self::new();
        form.lock().events = Some(Vec::new());
        form
    }

    /// Creates a page with only the order form.
    pub fn without_payment_form() -> Self {
        Self {
            has_payment_form: false,
            ..Self::new()
        }
    }

    /// Types every value of `input` into the form.
    pub fn fill(&self, input: &OrderFormInput) {
        self.lock().fields = input.clone();
    }

    pub fn set_field(&self, field: OrderField, value: impl Into<String>) {
        self.lock().fields.set(field, value);
    }

    pub fn submit_enabled(&self) -> bool {
        self.lock().submit_enabled
    }

    pub fn status(&self) -> Option<String> {
        self.lock().status.clone()
    }

    pub fn form_error(&self) -> Option<String> {
        self.lock().form_error.clone()
    }

    pub fn card_message(&self) -> Option<String> {
        self.lock().card_message.clone()
    }

    /// Writes logged so far; always empty unless the page is recording.
    pub fn events(&self) -> Vec<UiEvent> {
        self.lock().events.clone().unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UiPort for InMemoryForm {
    fn field_value(&self, field: OrderField) -> String {
        self.lock().fields.get(field).to_string()
    }

    fn reset_form(&self) {
        let mut state = self.lock();
        state.fields = OrderFormInput::default();
        state.record(UiEvent::FormReset);
    }

    fn has_payment_form(&self) -> bool {
        self.has_payment_form
    }

    fn set_submit_enabled(&self, enabled: bool) {
        let mut state = self.lock();
        state.submit_enabled = enabled;
        state.record(UiEvent::SubmitEnabled(enabled));
    }

    fn show_status(&self, message: &str) {
        let mut state = self.lock();
        state.status = Some(message.to_string());
        state.record(UiEvent::Status(message.to_string()));
    }

    fn clear_status(&self) {
        let mut state = self.lock();
        state.status = None;
        state.record(UiEvent::StatusCleared);
    }

    fn show_form_error(&self, message: &str) {
        let mut state = self.lock();
        state.form_error = Some(message.to_string());
        state.record(UiEvent::FormError(message.to_string()));
    }

    fn clear_form_error(&self) {
        let mut state = self.lock();
        state.form_error = None;
        state.record(UiEvent::FormErrorCleared);
    }

    fn scroll_to_form_error(&self) {
        self.lock().record(UiEvent::ScrolledToFormError);
    }

    fn show_card_message(&self, message: &str) {
        let mut state = self.lock();
        state.card_message = Some(message.to_string());
        state.record(UiEvent::CardMessage(message.to_string()));
    }

    fn notify(&self, message: &str) {
        self.lock().record(UiEvent::Notified(message.to_string()));
    }

    fn scroll_to_top(&self) {
        self.lock().record(UiEvent::ScrolledToTop);
    }
}

/// An order relay that keeps every payload it receives.
///
/// Clones share the same log. A relay built with [`RecordingRelay::failing`]
/// rejects every submission instead.
#[derive(Default, Clone)]
pub struct RecordingRelay {
    payloads: Arc<RwLock<Vec<OrderPayload>>>,
    failure: Option<String>,
}

impl RecordingRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    pub async fn payloads(&self) -> Vec<OrderPayload> {
        self.payloads.read().await.clone()
    }
}

#[async_trait]
impl OrderRelay for RecordingRelay {
    async fn submit(&self, payload: OrderPayload) -> Result<()> {
        if let Some(reason) = &self.failure {
            return Err(CheckoutError::RelayError(reason.clone()));
        }
        self.payloads.write().await.push(payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::PaymentToken;

    #[test]
    fn test_form_records_writes_in_order() {
        let form = InMemoryForm::recording();
        form.set_submit_enabled(false);
        form.show_status("Processing payment...");
        form.clear_status();
        form.set_submit_enabled(true);

        assert_eq!(
            form.events(),
            vec![
                UiEvent::SubmitEnabled(false),
                UiEvent::Status("Processing payment...".into()),
                UiEvent::StatusCleared,
                UiEvent::SubmitEnabled(true),
            ]
        );
        assert!(form.status().is_none());
        assert!(form.submit_enabled());
    }

    #[test]
    fn test_default_form_keeps_no_history() {
        let form = InMemoryForm::new();
        for _ in 0..1000 {
            form.set_submit_enabled(false);
            form.show_status("Processing payment...");
            form.clear_status();
            form.notify("Order submitted");
            form.reset_form();
            form.scroll_to_top();
            form.set_submit_enabled(true);
        }

        assert!(form.events().is_empty());
        assert!(form.lock().events.is_none());
        assert!(form.submit_enabled());
        assert!(form.status().is_none());
    }

    #[test]
    fn test_reset_clears_fields() {
        let form = InMemoryForm::new();
        form.set_field(OrderField::Name, "Jane");
        assert_eq!(form.field_value(OrderField::Name), "Jane");

        form.reset_form();
        assert_eq!(form.field_value(OrderField::Name), "");
    }

    #[test]
    fn test_without_payment_form() {
        assert!(InMemoryForm::new().has_payment_form());
        assert!(!InMemoryForm::without_payment_form().has_payment_form());
    }

    #[tokio::test]
    async fn test_recording_relay_shares_log_between_clones() {
        let relay = RecordingRelay::new();
        let handle = relay.clone();
        let payload = OrderPayload::new(OrderFormInput::default(), PaymentToken::new("tok_1"));

        relay.submit(payload.clone()).await.unwrap();

        assert_eq!(handle.payloads().await, vec![payload]);
    }

    #[tokio::test]
    async fn test_failing_relay_rejects() {
        let relay = RecordingRelay::failing("relay offline");
        let payload = OrderPayload::new(OrderFormInput::default(), PaymentToken::new("tok_1"));

        let result = relay.submit(payload).await;

        assert!(matches!(result, Err(CheckoutError::RelayError(_))));
        assert!(relay.payloads().await.is_empty());
    }
}
