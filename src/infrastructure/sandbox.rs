use crate::domain::payment::TokenizeResult;
use crate::domain::ports::{
    CardInput, CardInputBox, PaymentClient, PaymentClientBox, PaymentProvider,
};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

pub const SANDBOX_APPLICATION_PREFIX: &str = "sandbox-";

/// Numbers ending in this suffix are declined.
pub const DECLINE_SUFFIX: &str = "0002";

/// Shared handle to the number typed into sandbox card inputs.
#[derive(Debug, Clone, Default)]
pub struct SandboxCardEntry {
    number: Arc<Mutex<String>>,
}

impl SandboxCardEntry {
    pub fn enter(&self, number: impl Into<String>) {
        *self.number.lock().unwrap_or_else(PoisonError::into_inner) = number.into();
    }

    fn digits(&self) -> String {
        self.number
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .chars()
            .filter(char::is_ascii_digit)
            .collect()
    }
}

/// Deterministic stand-in for the hosted payment SDK in sandbox mode.
///
/// Application ids must carry the `sandbox-` prefix and a location id must be
/// given. Card numbers are Luhn checked; valid numbers ending in `0002` are
/// declined, the rest tokenize to `cnon:sandbox-NNNNNN`.
#[derive(Debug, Clone, Default)]
pub struct SandboxPaymentProvider {
    entry: SandboxCardEntry,
    issued: Arc<AtomicU64>,
    unreachable: bool,
}

impl SandboxPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that cannot be reached; every client creation fails.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn card_entry(&self) -> SandboxCardEntry {
        self.entry.clone()
    }
}

#[async_trait]
impl PaymentProvider for SandboxPaymentProvider {
    async fn create_client(
        &self,
        application_id: &str,
        location_id: &str,
    ) -> Result<PaymentClientBox> {
        if self.unreachable {
            return Err(CheckoutError::ProviderInitError(
                "payment provider unreachable".to_string(),
            ));
        }
        if !application_id.starts_with(SANDBOX_APPLICATION_PREFIX) {
            return Err(CheckoutError::ProviderInitError(format!(
                "invalid sandbox application id '{application_id}'"
            )));
        }
        if location_id.is_empty() {
            return Err(CheckoutError::ProviderInitError(
                "missing location id".to_string(),
            ));
        }

        debug!(application_id, location_id, "Sandbox client created");
        Ok(Box::new(SandboxClient {
            entry: self.entry.clone(),
            issued: self.issued.clone(),
        }))
    }
}

struct SandboxClient {
    entry: SandboxCardEntry,
    issued: Arc<AtomicU64>,
}

#[async_trait]
impl PaymentClient for SandboxClient {
    async fn create_card_input(&self) -> Result<CardInputBox> {
        Ok(Box::new(SandboxCard {
            entry: self.entry.clone(),
            issued: self.issued.clone(),
            attached: AtomicBool::new(false),
        }))
    }
}

struct SandboxCard {
    entry: SandboxCardEntry,
    issued: Arc<AtomicU64>,
    attached: AtomicBool,
}

#[async_trait]
impl CardInput for SandboxCard {
    async fn attach(&self, mount_selector: &str) -> Result<()> {
        if mount_selector.len() < 2 || !mount_selector.starts_with('#') {
            return Err(CheckoutError::ProviderInitError(format!(
                "mount point '{mount_selector}' not found"
            )));
        }
        self.attached.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn tokenize(&self) -> Result<TokenizeResult> {
        if !self.attached.load(Ordering::SeqCst) {
            return Err(CheckoutError::TokenizationError(
                "card input is not attached".to_string(),
            ));
        }

        let digits = self.entry.digits();
        if digits.is_empty() {
            return Ok(TokenizeResult::rejected(
                "INVALID",
                &["Card number is required."],
            ));
        }
        if !(12..=19).contains(&digits.len()) || !passes_luhn(&digits) {
            return Ok(TokenizeResult::rejected(
                "INVALID",
                &["Card number is not valid."],
            ));
        }
        if digits.ends_with(DECLINE_SUFFIX) {
            return Ok(TokenizeResult::rejected("ERROR", &["Card declined"]));
        }

        let serial = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(TokenizeResult::ok(format!("cnon:sandbox-{serial:06}")))
    }
}

fn passes_luhn(digits: &str) -> bool {
    let sum: u32 = digits
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::PaymentToken;

    async fn attached_card(provider: &SandboxPaymentProvider) -> CardInputBox {
        let client = provider
            .create_client("sandbox-sq0idb-test", "LOC1")
            .await
            .unwrap();
        let card = client.create_card_input().await.unwrap();
        card.attach("#card-container").await.unwrap();
        card
    }

    #[test]
    fn test_luhn() {
        assert!(passes_luhn("4111111111111111"));
        assert!(passes_luhn("4000000000000002"));
        assert!(!passes_luhn("4111111111111112"));
    }

    #[tokio::test]
    async fn test_rejects_non_sandbox_application_id() {
        let provider = SandboxPaymentProvider::new();
        let result = provider.create_client("sq0idp-live", "LOC1").await;
        assert!(matches!(result, Err(CheckoutError::ProviderInitError(_))));
    }

    #[tokio::test]
    async fn test_rejects_missing_location() {
        let provider = SandboxPaymentProvider::new();
        let result = provider.create_client("sandbox-app", "").await;
        assert!(matches!(result, Err(CheckoutError::ProviderInitError(_))));
    }

    #[tokio::test]
    async fn test_unreachable_provider() {
        let provider = SandboxPaymentProvider::unreachable();
        let result = provider.create_client("sandbox-app", "LOC1").await;
        assert!(matches!(result, Err(CheckoutError::ProviderInitError(_))));
    }

    #[tokio::test]
    async fn test_attach_requires_id_selector() {
        let provider = SandboxPaymentProvider::new();
        let client = provider.create_client("sandbox-app", "LOC1").await.unwrap();
        let card = client.create_card_input().await.unwrap();

        assert!(card.attach("card-container").await.is_err());
        assert!(matches!(
            card.tokenize().await,
            Err(CheckoutError::TokenizationError(_))
        ));
    }

    #[tokio::test]
    async fn test_tokenize_outcomes() {
        let provider = SandboxPaymentProvider::new();
        let entry = provider.card_entry();
        let card = attached_card(&provider).await;

        entry.enter("4111 1111 1111 1111");
        assert_eq!(
            card.tokenize().await.unwrap().into_token(),
            Ok(PaymentToken::new("cnon:sandbox-000001"))
        );

        entry.enter("4000 0000 0000 0002");
        assert_eq!(
            card.tokenize().await.unwrap().into_token(),
            Err("Card declined".to_string())
        );

        entry.enter("4111 1111 1111 1112");
        assert_eq!(
            card.tokenize().await.unwrap().into_token(),
            Err("Card number is not valid.".to_string())
        );

        entry.enter("");
        assert_eq!(
            card.tokenize().await.unwrap().into_token(),
            Err("Card number is required.".to_string())
        );

        entry.enter("5105105105105100");
        assert_eq!(
            card.tokenize().await.unwrap().into_token(),
            Ok(PaymentToken::new("cnon:sandbox-000002"))
        );
    }
}
