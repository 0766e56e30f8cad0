use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use super::{read_json, signature, GatewayError};
use crate::config::StripeConfig;

const API_BASE: &str = "https://api.stripe.com";

/// Maximum age of a webhook timestamp, in seconds
pub const WEBHOOK_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Refund {
    pub id: String,
}

/// A verified webhook event; only the fields this service reads
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: WebhookData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub object: WebhookObject,
}

#[derive(Debug, Deserialize)]
pub struct WebhookObject {
    pub id: String,
    #[serde(default)]
    pub metadata: IntentMetadata,
}

/// Metadata attached when the intent was created
#[derive(Debug, Default, Deserialize)]
pub struct IntentMetadata {
    pub application_id: Option<String>,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum WebhookError {
    #[error("malformed signature header")]
    MalformedHeader,
    #[error("timestamp outside tolerance")]
    Expired,
    #[error("no matching signature")]
    Mismatch,
}

#[derive(Clone)]
pub struct StripeGateway {
    client: reqwest::Client,
    config: StripeConfig,
    api_base: String,
}

impl StripeGateway {
    pub fn new(client: reqwest::Client, config: StripeConfig) -> Self {
        Self {
            client,
            config,
            api_base: API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn currency(&self) -> &str {
        &self.config.currency
    }

    pub fn webhook_secret(&self) -> Option<&str> {
        self.config.webhook_secret.as_deref()
    }

    pub async fn create_payment_intent(
        &self,
        amount_cents: i32,
        application_id: Uuid,
        receipt_email: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        debug!("Stripe: creating payment intent for application {}", application_id);

        let params = [
            ("amount", amount_cents.to_string()),
            ("currency", self.config.currency.clone()),
            ("metadata[application_id]", application_id.to_string()),
            ("receipt_email", receipt_email.to_string()),
        ];

        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(&self.config.secret_key)
            .form(&params)
            .send()
            .await?;

        read_json(response).await
    }

    /// Refund an intent; Stripe replays the first result for a repeated `idempotency_key`
    pub async fn create_refund(
        &self,
        payment_intent_id: &str,
        amount_cents: i32,
        idempotency_key: &str,
    ) -> Result<Refund, GatewayError> {
        debug!("Stripe: refunding payment intent {} ({})", payment_intent_id, idempotency_key);

        let params = [
            ("payment_intent", payment_intent_id.to_string()),
            ("amount", amount_cents.to_string()),
        ];

        let response = self
            .client
            .post(format!("{}/v1/refunds", self.api_base))
            .bearer_auth(&self.config.secret_key)
            .header("Idempotency-Key", idempotency_key)
            .form(&params)
            .send()
            .await?;

        read_json(response).await
    }
}

/// Verify a `Stripe-Signature` header (`t=<unix>,v1=<hex>[,v1=<hex>...]`)
///
/// The signed payload is `"{t}.{body}"`. Any `v1` entry may match; other
/// schemes (`v0`) are ignored.
pub fn verify_webhook(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
    tolerance_secs: i64,
) -> Result<(), WebhookError> {
    let mut timestamp: Option<&str> = None;
    let mut signatures = Vec::new();

    for item in header.split(',') {
        match item.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(WebhookError::MalformedHeader)?;
    let issued_at: i64 = timestamp.parse().map_err(|_| WebhookError::MalformedHeader)?;
    if signatures.is_empty() {
        return Err(WebhookError::MalformedHeader);
    }

    let parts = [timestamp.as_bytes(), b".".as_slice(), payload];
    let matched = signatures
        .iter()
        .any(|sig| signature::verify_hmac_sha256_hex(secret.as_bytes(), &parts, sig));
    if !matched {
        return Err(WebhookError::Mismatch);
    }

    if (now - issued_at).abs() > tolerance_secs {
        return Err(WebhookError::Expired);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};

    const BODY: &[u8] = br#"{"id":"evt_1","type":"payment_intent.succeeded"}"#;
    // HMAC-SHA256("whsec_test", "1700000000." + BODY)
    const SIG: &str = "001ce3ef73e456cedaab328328720d3ad59defb8bbd0f1518f46c04ad4ac0bb7";

    #[test]
    fn accepts_valid_signature() {
        let header = format!("t=1700000000,v1={}", SIG);
        assert_eq!(
            verify_webhook(BODY, &header, "whsec_test", 1_700_000_100, WEBHOOK_TOLERANCE_SECS),
            Ok(())
        );
    }

    #[test]
    fn any_v1_entry_may_match() {
        let header = format!("t=1700000000,v1=deadbeef,v0=abc,v1={}", SIG);
        assert!(verify_webhook(BODY, &header, "whsec_test", 1_700_000_000, 300).is_ok());
    }

    #[test]
    fn rejects_tampered_body_and_wrong_secret() {
        let header = format!("t=1700000000,v1={}", SIG);
        let tampered = br#"{"id":"evt_2","type":"payment_intent.succeeded"}"#;
        assert_eq!(
            verify_webhook(tampered, &header, "whsec_test", 1_700_000_000, 300),
            Err(WebhookError::Mismatch)
        );
        assert_eq!(
            verify_webhook(BODY, &header, "whsec_other", 1_700_000_000, 300),
            Err(WebhookError::Mismatch)
        );
    }

    #[test]
    fn rejects_stale_timestamps() {
        let header = format!("t=1700000000,v1={}", SIG);
        assert_eq!(
            verify_webhook(BODY, &header, "whsec_test", 1_700_000_301, 300),
            Err(WebhookError::Expired)
        );
    }

    #[test]
    fn rejects_malformed_headers() {
        assert_eq!(
            verify_webhook(BODY, "v1=abc", "whsec_test", 0, 300),
            Err(WebhookError::MalformedHeader)
        );
        assert_eq!(
            verify_webhook(BODY, "t=1700000000", "whsec_test", 0, 300),
            Err(WebhookError::MalformedHeader)
        );
        assert_eq!(
            verify_webhook(BODY, "t=soon,v1=abc", "whsec_test", 0, 300),
            Err(WebhookError::MalformedHeader)
        );
    }

    #[test]
    fn parses_event_payload() {
        let event: WebhookEvent = serde_json::from_str(
            r#"{"id":"evt_1","type":"payment_intent.succeeded","data":{"object":{"id":"pi_123","amount":1000}}}"#,
        )
        .unwrap();
        assert_eq!(event.kind, "payment_intent.succeeded");
        assert_eq!(event.data.object.id, "pi_123");
        assert!(event.data.object.metadata.application_id.is_none());

        let event: WebhookEvent = serde_json::from_str(
            r#"{"type":"payment_intent.succeeded","data":{"object":{"id":"pi_9","metadata":{"application_id":"a1"}}}}"#,
        )
        .unwrap();
        assert_eq!(event.data.object.metadata.application_id.as_deref(), Some("a1"));
    }

    async fn record_refund(req: HttpRequest, seen: web::Data<Mutex<Vec<String>>>) -> HttpResponse {
        let key = req
            .headers()
            .get("Idempotency-Key")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        seen.lock().unwrap().push(key);
        HttpResponse::Ok().json(serde_json::json!({ "id": "re_1", "object": "refund" }))
    }

    #[actix_web::test]
    async fn refunds_carry_idempotency_key() {
        let seen = web::Data::new(Mutex::new(Vec::<String>::new()));
        let data = seen.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/v1/refunds", web::post().to(record_refund))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        let gateway = StripeGateway::new(
            reqwest::Client::new(),
            StripeConfig {
                secret_key: "sk_test_key".into(),
                webhook_secret: None,
                currency: "usd".into(),
            },
        )
        .with_api_base(format!("http://{}", addr));

        for _ in 0..2 {
            let refund = gateway.create_refund("pi_1", 1000, "refund_abc").await.unwrap();
            assert_eq!(refund.id, "re_1");
        }
        assert_eq!(*seen.lock().unwrap(), vec!["refund_abc".to_string(), "refund_abc".to_string()]);

        handle.stop(true).await;
    }
}
