//! Outbound payment gateway clients.
//!
//! Stripe (payment intents + signed webhooks) and Razorpay (orders + client-side
//! signature verification) run side by side; either may be left unconfigured.

pub mod razorpay;
pub mod signature;
pub mod stripe;

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::Config;

pub use razorpay::RazorpayGateway;
pub use stripe::StripeGateway;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gateway rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// The configured gateways, shared by the payment and refund services
#[derive(Clone, Default)]
pub struct Gateways {
    pub stripe: Option<StripeGateway>,
    pub razorpay: Option<RazorpayGateway>,
}

impl Gateways {
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            stripe: config
                .stripe
                .clone()
                .map(|c| StripeGateway::new(client.clone(), c)),
            razorpay: config
                .razorpay
                .clone()
                .map(|c| RazorpayGateway::new(client.clone(), c)),
        })
    }
}

/// Decode a successful response, or turn the gateway's error body into `Rejected`
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Rejected {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Stripe reports `error.message`, Razorpay `error.description`
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            let err = v.get("error")?;
            err.get("message")
                .or_else(|| err.get("description"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}
