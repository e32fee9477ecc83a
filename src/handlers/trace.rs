use crate::{dto::ProvenanceRecord, errors::ServiceError, ApiResponse, ApiResult, AppState};
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

/// Longest code accepted from a scanner.
pub const MAX_CODE_LEN: u64 = 128;

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct TraceCode {
    /// Batch code printed on the product label
    #[validate(length(min = 1, max = "MAX_CODE_LEN"))]
    pub code: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/trace/{code}",
    params(TraceCode),
    responses(
        (status = 200, description = "Traceability record", body = ApiResponse<ProvenanceRecord>),
        (status = 400, description = "Blank code", body = crate::errors::ErrorResponse),
        (status = 404, description = "No batch carries this code", body = crate::errors::ErrorResponse),
        (status = 503, description = "Record could not be assembled", body = crate::errors::ErrorResponse)
    ),
    tag = "trace"
)]
pub async fn get_trace(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<ProvenanceRecord> {
    let request = TraceCode {
        code: code.trim().to_string(),
    };
    request
        .validate()
        .map_err(|e| ServiceError::BadRequest(e.to_string()))?;

    let record = state.provenance.trace(&request.code).await?;
    Ok(Json(ApiResponse::success(record)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", false)]
    #[case("BATCH-001", true)]
    fn code_length_is_bounded(#[case] code: &str, #[case] valid: bool) {
        let request = TraceCode { code: code.into() };
        assert_eq!(request.validate().is_ok(), valid);
    }

    #[test]
    fn code_at_the_limit_is_accepted() {
        let request = TraceCode {
            code: "X".repeat(MAX_CODE_LEN as usize),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn overlong_code_is_rejected() {
        let request = TraceCode {
            code: "X".repeat(MAX_CODE_LEN as usize + 1),
        };
        assert!(request.validate().is_err());
    }
}
