use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{read_json, signature, GatewayError};
use crate::config::RazorpayConfig;

const API_BASE: &str = "https://api.razorpay.com";

#[derive(Debug, Serialize)]
struct OrderRequest<'a> {
    amount: i32,
    currency: &'a str,
    receipt: String,
    notes: OrderNotes,
}

#[derive(Debug, Serialize)]
struct OrderNotes {
    application_id: String,
}

#[derive(Debug, Deserialize)]
pub struct Order {
    pub id: String,
    pub currency: String,
}

#[derive(Debug, Serialize)]
struct RefundRequest<'a> {
    amount: i32,
    receipt: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct Refund {
    pub id: String,
    pub receipt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefundList {
    items: Vec<Refund>,
}

#[derive(Clone)]
pub struct RazorpayGateway {
    client: reqwest::Client,
    config: RazorpayConfig,
    api_base: String,
}

impl RazorpayGateway {
    pub fn new(client: reqwest::Client, config: RazorpayConfig) -> Self {
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

    pub fn key_id(&self) -> &str {
        &self.config.key_id
    }

    pub fn currency(&self) -> &str {
        &self.config.currency
    }

    /// Create an order; `receipt` is our payment id
    pub async fn create_order(
        &self,
        amount: i32,
        receipt: Uuid,
        application_id: Uuid,
    ) -> Result<Order, GatewayError> {
        debug!("Razorpay: creating order for application {}", application_id);

        let response = self
            .client
            .post(format!("{}/v1/orders", self.api_base))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&OrderRequest {
                amount,
                currency: &self.config.currency,
                receipt: receipt.to_string(),
                notes: OrderNotes {
                    application_id: application_id.to_string(),
                },
            })
            .send()
            .await?;

        read_json(response).await
    }

    /// Refund a captured payment once per `receipt`
    ///
    /// Razorpay has no idempotency header, so an existing refund carrying the
    /// same receipt is returned instead of creating another.
    pub async fn refund_payment(
        &self,
        payment_id: &str,
        amount: i32,
        receipt: &str,
    ) -> Result<Refund, GatewayError> {
        if let Some(existing) = self.find_refund(payment_id, receipt).await? {
            debug!("Razorpay: payment {} already refunded as {}", payment_id, existing.id);
            return Ok(existing);
        }

        debug!("Razorpay: refunding payment {} ({})", payment_id, receipt);
        let response = self
            .client
            .post(format!("{}/v1/payments/{}/refund", self.api_base, payment_id))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&RefundRequest { amount, receipt })
            .send()
            .await?;

        read_json(response).await
    }

    async fn find_refund(
        &self,
        payment_id: &str,
        receipt: &str,
    ) -> Result<Option<Refund>, GatewayError> {
        let response = self
            .client
            .get(format!("{}/v1/payments/{}/refunds", self.api_base, payment_id))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .send()
            .await?;

        let list: RefundList = read_json(response).await?;
        Ok(list
            .items
            .into_iter()
            .find(|r| r.receipt.as_deref() == Some(receipt)))
    }

    pub fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> bool {
        verify_payment_signature(&self.config.key_secret, order_id, payment_id, signature)
    }
}

/// Checkout signature: hex(HMAC-SHA256(key_secret, "{order_id}|{payment_id}"))
pub fn verify_payment_signature(
    key_secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    signature::verify_hmac_sha256_hex(
        key_secret.as_bytes(),
        &[order_id.as_bytes(), b"|".as_slice(), payment_id.as_bytes()],
        signature,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use actix_web::{web, App, HttpResponse, HttpServer};

    // HMAC-SHA256("rzp_secret", "order_9A33XWu170gUtm|pay_29QQoUBi66xm2f")
    const SIG: &str = "5563f19ec4d93d6c7d557cd0c9b3d5ad957214e81bfae70bfd8964b91313abbc";

    #[test]
    fn accepts_checkout_signature() {
        assert!(verify_payment_signature(
            "rzp_secret",
            "order_9A33XWu170gUtm",
            "pay_29QQoUBi66xm2f",
            SIG
        ));
    }

    #[test]
    fn rejects_swapped_ids_and_wrong_secret() {
        assert!(!verify_payment_signature(
            "rzp_secret",
            "pay_29QQoUBi66xm2f",
            "order_9A33XWu170gUtm",
            SIG
        ));
        assert!(!verify_payment_signature(
            "other_secret",
            "order_9A33XWu170gUtm",
            "pay_29QQoUBi66xm2f",
            SIG
        ));
    }

    #[test]
    fn order_request_shape() {
        let body = serde_json::to_value(OrderRequest {
            amount: 1000,
            currency: "INR",
            receipt: "r1".into(),
            notes: OrderNotes {
                application_id: "a1".into(),
            },
        })
        .unwrap();
        assert_eq!(body["amount"], 1000);
        assert_eq!(body["notes"]["application_id"], "a1");
    }

    #[derive(Default)]
    struct Ledger {
        refunds: Mutex<Vec<serde_json::Value>>,
    }

    async fn list_refunds(ledger: web::Data<Ledger>) -> HttpResponse {
        let items = ledger.refunds.lock().unwrap().clone();
        HttpResponse::Ok().json(serde_json::json!({
            "entity": "collection",
            "count": items.len(),
            "items": items,
        }))
    }

    async fn create_refund(
        ledger: web::Data<Ledger>,
        body: web::Json<serde_json::Value>,
    ) -> HttpResponse {
        let mut refunds = ledger.refunds.lock().unwrap();
        let refund = serde_json::json!({
            "id": format!("rfnd_{}", refunds.len() + 1),
            "entity": "refund",
            "amount": body["amount"],
            "receipt": body["receipt"],
        });
        refunds.push(refund.clone());
        HttpResponse::Ok().json(refund)
    }

    #[actix_web::test]
    async fn repeated_refund_reuses_receipt() {
        let ledger = web::Data::new(Ledger::default());
        let data = ledger.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/v1/payments/{id}/refunds", web::get().to(list_refunds))
                .route("/v1/payments/{id}/refund", web::post().to(create_refund))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        let gateway = RazorpayGateway::new(
            reqwest::Client::new(),
            RazorpayConfig {
                key_id: "rzp_test".into(),
                key_secret: "rzp_secret".into(),
                currency: "INR".into(),
            },
        )
        .with_api_base(format!("http://{}", addr));

        let first = gateway.refund_payment("pay_1", 1000, "refund_a").await.unwrap();
        let again = gateway.refund_payment("pay_1", 1000, "refund_a").await.unwrap();
        assert_eq!(first.id, "rfnd_1");
        assert_eq!(again.id, "rfnd_1");

        let other = gateway.refund_payment("pay_1", 500, "refund_b").await.unwrap();
        assert_eq!(other.id, "rfnd_2");
        assert_eq!(ledger.refunds.lock().unwrap().len(), 2);

        handle.stop(true).await;
    }
}
