//! Gate rejection types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Reasons the gate refuses a request.
///
/// Every kind maps to 401 with a JSON body; none of them touch cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    /// Neither bearer header nor cookie carried a token.
    MissingToken,
    /// Verification failed for a reason other than expiry.
    InvalidToken,
    /// Token expired and its refresh window has closed.
    ExpiredUnrefreshable,
    /// Token was close to expiry and the proactive refresh failed.
    RefreshFailed,
    /// Claims could not be read after successful verification.
    ClaimsUnreadable,
}

impl GateError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    pub fn message(&self) -> &'static str {
        match self {
            GateError::MissingToken => "Token no proporcionado",
            GateError::InvalidToken => "Token inválido",
            GateError::ExpiredUnrefreshable => "Sesión expirada, reingrese",
            GateError::RefreshFailed => "No se pudo refrescar token",
            GateError::ClaimsUnreadable => "No se pudo leer token",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
