use crate::models::ErrorResponse;
use actix_web::{HttpRequest, HttpResponse};

pub const USER_HEADER: &str = "x-user-id";

/// Identity of the caller, taken from the `x-user-id` header.
pub fn caller_id(req: &HttpRequest) -> Result<String, HttpResponse> {
    req.headers()
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            HttpResponse::Unauthorized().json(ErrorResponse {
                error: format!("Missing {} header", USER_HEADER),
            })
        })
}
