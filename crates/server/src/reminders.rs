//! Reminder trigger endpoint

use api_types::reminder::RemindersResponse;
use axum::{Extension, Json, extract::State};
use chrono::Utc;

use crate::{ServerError, require_admin, server::ServerState};
use engine::users;

pub async fn send(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<RemindersResponse>, ServerError> {
    require_admin(&user)?;

    let sent = state.engine.send_reminders(Utc::now()).await?;
    Ok(Json(RemindersResponse { sent }))
}
