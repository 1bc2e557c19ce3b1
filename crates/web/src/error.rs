//! HTTP mapping of engine errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use chess_duel_core::{Color, Error};

#[derive(Debug)]
pub enum AppError {
    Core(Error),
    IllegalMove(String),
    BadRequest(String),
    /// The computer plays this color and is to move.
    AiToMove(Color),
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError::Core(err)
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Core(Error::GameOver | Error::NotYourTurn { .. }) => StatusCode::CONFLICT,
            AppError::Core(
                Error::InvalidSquare { .. }
                | Error::EmptySquare(_)
                | Error::InvalidPromotion(_)
                | Error::Notation(_),
            ) => StatusCode::BAD_REQUEST,
            AppError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::IllegalMove(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AiToMove(_) => StatusCode::CONFLICT,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Core(err) => err.to_string(),
            AppError::IllegalMove(msg) | AppError::BadRequest(msg) => msg.clone(),
            AppError::AiToMove(color) => format!("the computer plays {} and is to move", color),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_duel_core::Square;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::from(Error::GameOver).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::from(Error::NotYourTurn {
                expected: Color::White,
                found: Color::Black,
            })
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(Error::EmptySquare(Square::new(3, 3).unwrap())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::AiToMove(Color::Black).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::IllegalMove("e2-e5".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::from(Error::Config("bad".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
