use super::order::{OrderField, OrderPayload};
use super::payment::TokenizeResult;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Entry point of the hosted payment SDK.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_client(
        &self,
        application_id: &str,
        location_id: &str,
    ) -> Result<PaymentClientBox>;
}

#[async_trait]
pub trait PaymentClient: Send + Sync {
    async fn create_card_input(&self) -> Result<CardInputBox>;
}

/// Card entry element owned by the provider; the page never sees raw card data.
#[async_trait]
pub trait CardInput: Send + Sync {
    async fn attach(&self, mount_selector: &str) -> Result<()>;
    async fn tokenize(&self) -> Result<TokenizeResult>;
}

/// Out-of-band delivery of a finished order.
#[async_trait]
pub trait OrderRelay: Send + Sync {
    async fn submit(&self, payload: OrderPayload) -> Result<()>;
}

/// The page surface the checkout reads from and writes to.
pub trait UiPort: Send + Sync {
    fn field_value(&self, field: OrderField) -> String;
    fn reset_form(&self);
    fn has_payment_form(&self) -> bool;

    fn set_submit_enabled(&self, enabled: bool);

    fn show_status(&self, message: &str);
    fn clear_status(&self);

    fn show_form_error(&self, message: &str);
    fn clear_form_error(&self);
    /// Brings the form error region into view.
    fn scroll_to_form_error(&self);

    /// Replaces the card mount's content with a plain message.
    fn show_card_message(&self, message: &str);

    fn notify(&self, message: &str);
    fn scroll_to_top(&self);
}

pub type PaymentProviderBox = Box<dyn PaymentProvider>;
pub type PaymentClientBox = Box<dyn PaymentClient>;
pub type CardInputBox = Box<dyn CardInput>;
pub type OrderRelayBox = Box<dyn OrderRelay>;
pub type UiPortRef = Arc<dyn UiPort>;
