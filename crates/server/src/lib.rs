use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::{EngineError, Role, users};

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener};

mod contributions;
mod payments;
mod reminders;
mod server;

pub enum ServerError {
    Engine(EngineError),
    Forbidden,
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::InvalidState(_) => StatusCode::CONFLICT,
        EngineError::InvalidReference(_) => StatusCode::BAD_REQUEST,
        EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Forbidden => (StatusCode::FORBIDDEN, "not enough privileges".to_string()),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// Only association officers may review payments or trigger billing.
fn require_admin(user: &users::Model) -> Result<(), ServerError> {
    let role = Role::try_from(user.role.as_str()).map_err(ServerError::Engine)?;
    if !role.is_admin() {
        return Err(ServerError::Forbidden);
    }
    Ok(())
}
