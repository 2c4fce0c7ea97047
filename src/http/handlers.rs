use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::http::server::AppState;

/// `GET /{cep}`: race the providers and return the winning document.
///
/// The code is passed on verbatim; only an absent or undecodable path
/// segment is refused here.
pub async fn lookup_address(
    State(state): State<AppState>,
    cep: Result<Path<String>, PathRejection>,
) -> Response {
    let cep = match cep {
        Ok(Path(cep)) if !cep.is_empty() => cep,
        Ok(_) => return StatusCode::BAD_REQUEST.into_response(),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected postal code path segment");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let resolver = state.resolver.load_full();
    match resolver.resolve(&cep).await {
        Ok(record) => {
            tracing::debug!(
                cep = %cep,
                answered_cep = record.postal_code(),
                source = record.source(),
                "Address resolved"
            );
            Json(record).into_response()
        }
        Err(e) => {
            tracing::warn!(cep = %cep, kind = %e.kind(), error = %e, "Address resolution failed");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// `GET /`: no postal code in the path.
pub async fn missing_postal_code() -> StatusCode {
    StatusCode::BAD_REQUEST
}
