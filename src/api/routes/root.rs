use axum::Json;

use crate::api::MessageResponse;

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(
        "Welcome to Clash of Clans Bonus Tracker API",
    ))
}
