use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Message shown whenever the provider gives no usable reason for a failed payment.
pub const PAYMENT_FAILED_MESSAGE: &str = "Payment processing failed. Please try again.";

/// Opaque single-use reference to the card details, issued by the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PaymentToken(String);

impl PaymentToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeStatus {
    Ok,
    Other(String),
}

impl<'de> Deserialize<'de> for TokenizeStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let status = String::deserialize(deserializer)?;
        if status == "OK" {
            Ok(TokenizeStatus::Ok)
        } else {
            Ok(TokenizeStatus::Other(status))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenizeErrorDetail {
    pub message: String,
}

/// What the card input reports back from a tokenize call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenizeResult {
    pub status: TokenizeStatus,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub errors: Vec<TokenizeErrorDetail>,
}

impl TokenizeResult {
    pub fn ok(token: impl Into<String>) -> Self {
        Self {
            status: TokenizeStatus::Ok,
            token: Some(token.into()),
            errors: Vec::new(),
        }
    }

    pub fn rejected(status: impl Into<String>, messages: &[&str]) -> Self {
        Self {
            status: TokenizeStatus::Other(status.into()),
            token: None,
            errors: messages
                .iter()
                .map(|message| TokenizeErrorDetail {
                    message: message.to_string(),
                })
                .collect(),
        }
    }

    /// Converts the provider's answer into a token or the message to show the user.
    ///
    /// A rejection surfaces the first reported error; anything else unusable
    /// (including an `OK` without a token) falls back to [`PAYMENT_FAILED_MESSAGE`].
    pub fn into_token(self) -> Result<PaymentToken, String> {
        match (self.status, self.token) {
            (TokenizeStatus::Ok, Some(token)) => Ok(PaymentToken(token)),
            _ => Err(self
                .errors
                .into_iter()
                .next()
                .map(|error| error.message)
                .unwrap_or_else(|| PAYMENT_FAILED_MESSAGE.to_string())),
        }
    }
}
