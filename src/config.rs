use std::time::Duration;

/// Default selector of the element the card input is mounted into.
pub const DEFAULT_CARD_MOUNT: &str = "#card-container";

/// Settings for one checkout page.
///
/// Identifiers are supplied by the embedding page (or the CLI); nothing here is
/// read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutConfig {
    /// Application id issued by the payment provider.
    pub application_id: String,
    /// Merchant location the payments are taken for.
    pub location_id: String,
    /// Selector of the card input mount point.
    pub card_mount: String,
    /// Simulated round trip between tokenization and order hand-off.
    pub processing_delay: Duration,
    /// Upper bound on a single tokenize call. `None` waits forever.
    pub tokenize_timeout: Option<Duration>,
    /// How long a validation message stays visible.
    pub error_dismiss_after: Duration,
}

impl CheckoutConfig {
    pub fn new(application_id: impl Into<String>, location_id: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            location_id: location_id.into(),
            ..Self::default()
        }
    }

    pub fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.processing_delay = delay;
        self
    }

    pub fn with_tokenize_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.tokenize_timeout = timeout;
        self
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            application_id: String::new(),
            location_id: String::new(),
            card_mount: DEFAULT_CARD_MOUNT.to_string(),
            processing_delay: Duration::from_millis(1500),
            tokenize_timeout: Some(Duration::from_secs(60)),
            error_dismiss_after: Duration::from_secs(5),
        }
    }
}
