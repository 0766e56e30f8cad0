use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use sqlx::{Pool, Postgres};
use tracing::error;

use crate::gateway::Gateways;

/// Which payment gateways this instance can charge through
#[derive(Serialize)]
struct GatewayStatus {
    stripe: bool,
    razorpay: bool,
}

impl From<&Gateways> for GatewayStatus {
    fn from(gateways: &Gateways) -> Self {
        Self {
            stripe: gateways.stripe.is_some(),
            razorpay: gateways.razorpay.is_some(),
        }
    }
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    gateways: Option<GatewayStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint
///
/// Database connectivity plus the configured payment gateways.
/// Use for load balancers and uptime monitors.
#[get("/health")]
async fn health_check(
    pool: web::Data<Pool<Postgres>>,
    gateways: web::Data<Gateways>,
) -> impl Responder {
    match sqlx::query("SELECT 1")
        .fetch_one(pool.get_ref())
        .await
    {
        Ok(_) => {
            HttpResponse::Ok().json(HealthResponse {
                status: "healthy".to_string(),
                database: "connected".to_string(),
                gateways: Some(GatewayStatus::from(gateways.get_ref())),
                error: None,
            })
        }
        Err(e) => {
            error!("Health check failed: {:?}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "unhealthy".to_string(),
                database: "disconnected".to_string(),
                gateways: Some(GatewayStatus::from(gateways.get_ref())),
                error: Some(format!("Database error: {}", e)),
            })
        }
    }
}

/// Readiness check endpoint
///
/// Checks if service is ready to accept traffic (includes database check).
/// Use for Kubernetes readiness checks - removes from load balancer if this fails.
///
/// Returns 503 if dependencies unavailable, but process will recover when they return.
#[get("/ready")]
async fn readiness_check(pool: web::Data<Pool<Postgres>>) -> impl Responder {
    match sqlx::query("SELECT 1")
        .fetch_one(pool.get_ref())
        .await
    {
        Ok(_) => {
            HttpResponse::Ok().json(HealthResponse {
                status: "ready".to_string(),
                database: "connected".to_string(),
                gateways: None,
                error: None,
            })
        }
        Err(e) => {
            error!("Readiness check failed: database unavailable: {:?}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "not_ready".to_string(),
                database: "disconnected".to_string(),
                gateways: None,
                error: Some(format!("Database unavailable: {}", e)),
            })
        }
    }
}

/// Liveness check endpoint
///
/// Simple check that the process is alive. Does not check dependencies.
/// Use for Kubernetes liveness checks - restarts pod if this fails.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
        database: "not_checked".to_string(),
        gateways: None,
        error: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn liveness_skips_dependencies() {
        let app = test::init_service(App::new().configure(health_config)).await;
        let req = test::TestRequest::get().uri("/live").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "alive");
        assert_eq!(body["database"], "not_checked");
        assert!(body.get("gateways").is_none());
    }

    #[actix_web::test]
    async fn reports_configured_gateways() {
        let status = GatewayStatus::from(&Gateways::default());
        assert!(!status.stripe);
        assert!(!status.razorpay);
    }
}
