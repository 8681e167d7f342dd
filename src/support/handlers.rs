use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument};

use super::{
    dto::{SupportMessageRequest, SupportMessageResponse},
    repo,
};
use crate::{error::AppError, state::AppState};

pub fn support_routes() -> Router<AppState> {
    Router::new().route("/support/send_message", post(send_message))
}

#[instrument(skip(state, payload))]
pub async fn send_message(
    State(state): State<AppState>,
    Json(payload): Json<SupportMessageRequest>,
) -> Result<Json<SupportMessageResponse>, AppError> {
    let msg = payload.validate()?;
    let id = repo::insert(&state.db, &msg).await?;
    info!(message_id = id, "support message stored");
    Ok(Json(SupportMessageResponse {
        message: "Message sent successfully!",
    }))
}
