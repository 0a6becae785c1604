mod common;

use common::{GOOD_CARD, valid_form};
use order_checkout::application::controller::{CheckoutController, SubmitOutcome};
use order_checkout::config::CheckoutConfig;
use order_checkout::domain::ports::{OrderRelayBox, PaymentProviderBox, UiPortRef};
use order_checkout::infrastructure::in_memory::{InMemoryForm, RecordingRelay};
use order_checkout::infrastructure::sandbox::SandboxPaymentProvider;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let form = Arc::new(InMemoryForm::new());
    form.fill(&valid_form());
    let sandbox = SandboxPaymentProvider::new();
    sandbox.card_entry().enter(GOOD_CARD);
    let relay = RecordingRelay::new();

    let provider: PaymentProviderBox = Box::new(sandbox);
    let order_relay: OrderRelayBox = Box::new(relay.clone());
    let ui: UiPortRef = form.clone();

    let controller = Arc::new(CheckoutController::new(
        CheckoutConfig::new("sandbox-app", "LOC1").with_processing_delay(Duration::ZERO),
        provider,
        order_relay,
        ui,
    ));

    // The controller must be Send + Sync to be driven from spawned tasks.
    let handle = tokio::spawn({
        let controller = controller.clone();
        async move {
            controller.initialize().await.unwrap();
            controller.handle_submit().await
        }
    });

    let outcome = handle.await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Submitted(_)));
    assert_eq!(relay.payloads().await.len(), 1);
}
