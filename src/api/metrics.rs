use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::database::MongoDB;
use crate::models::Role;
use crate::services::role_registry;
use crate::services::user_service::USERS_COLLECTION;

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "System metrics", body = MetricsResponse)
    )
)]
pub async fn get_metrics(db: web::Data<MongoDB>) -> HttpResponse {
    let requests = REQUEST_COUNT.load(Ordering::Relaxed);
    let errors = ERROR_COUNT.load(Ordering::Relaxed);

    let mut metrics = format!(
        "# HELP http_requests_total Total number of HTTP requests\n\
         # TYPE http_requests_total counter\n\
         http_requests_total {}\n\
         \n\
         # HELP http_errors_total Total number of HTTP errors\n\
         # TYPE http_errors_total counter\n\
         http_errors_total {}\n",
        requests, errors
    );

    // Document counts per collection; estimated is fine for a gauge.
    metrics.push_str(
        "\n# HELP clinic_documents_total Documents per collection\n\
         # TYPE clinic_documents_total gauge\n",
    );

    let users = db.collection::<mongodb::bson::Document>(USERS_COLLECTION);
    if let Ok(count) = users.estimated_document_count().await {
        metrics.push_str(&format!(
            "clinic_documents_total{{collection=\"{}\"}} {}\n",
            USERS_COLLECTION, count
        ));
    }

    for role in Role::ALL {
        let desc = role_registry::descriptor(role);
        let collection = db.collection::<mongodb::bson::Document>(desc.collection);
        if let Ok(count) = collection.estimated_document_count().await {
            metrics.push_str(&format!(
                "clinic_documents_total{{collection=\"{}\"}} {}\n",
                desc.collection, count
            ));
        }
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics)
}
