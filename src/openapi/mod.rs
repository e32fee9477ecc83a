use axum::response::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FarmTrace API",
        version = "1.0.0",
        description = r#"
# FarmTrace Provenance API

Resolves the code printed on a product label into the batch's traceability
record: origin farm, certifications, processing, storage and distribution.

Absent optional fields are omitted from the response instead of being sent as
`null`.
"#
    ),
    paths(
        crate::handlers::trace::get_trace,
        crate::health::health_check,
    ),
    components(
        schemas(
            crate::ApiResponse<crate::dto::ProvenanceRecord>,
            crate::dto::ProvenanceRecord,
            crate::dto::Overview,
            crate::dto::CertificationEntry,
            crate::dto::ProcessingEntry,
            crate::dto::StorageEntry,
            crate::dto::ShippingEntry,
            crate::health::HealthReport,
            crate::health::HealthStatus,
            crate::errors::ErrorResponse
        )
    ),
    tags(
        (name = "trace", description = "Batch provenance lookup"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDocV1;

/// Serves the generated OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDocV1::openapi())
}
