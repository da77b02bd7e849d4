use crate::models::ErrorResponse;
use actix_web::HttpResponse;
use dossier_engine::EngineError;
use serde::Serialize;

/// Maps an engine failure to its HTTP status with an `{"error": ..}` body.
pub fn error_response(err: &EngineError) -> HttpResponse {
    let body = ErrorResponse {
        error: err.to_string(),
    };
    match err {
        EngineError::NotFound(_) => HttpResponse::NotFound().json(body),
        EngineError::Forbidden(_) => HttpResponse::Forbidden().json(body),
        EngineError::PreconditionFailed(_) => HttpResponse::PreconditionFailed().json(body),
        EngineError::BadRequest(_) => HttpResponse::BadRequest().json(body),
        EngineError::Conflict(_) => HttpResponse::Conflict().json(body),
        EngineError::InternalFailure(_) | EngineError::Llm(_) | EngineError::Storage(_) => {
            tracing::error!(error = %err, "Request failed");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

pub fn respond<T: Serialize>(result: Result<T, EngineError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}

pub fn respond_created<T: Serialize>(result: Result<T, EngineError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Created().json(value),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use dossier_engine::StorageError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (EngineError::NotFound("p".into()), StatusCode::NOT_FOUND),
            (EngineError::Forbidden("p".into()), StatusCode::FORBIDDEN),
            (
                EngineError::PreconditionFailed("llm".into()),
                StatusCode::PRECONDITION_FAILED,
            ),
            (EngineError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (EngineError::Conflict("v".into()), StatusCode::CONFLICT),
            (
                EngineError::InternalFailure("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                EngineError::Storage(StorageError::OperationFailed("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(error_response(&err).status(), status, "{}", err);
        }
    }
}
