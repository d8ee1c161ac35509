//! User ingest handlers.

use axum::Json;
use axum::extract::State;

use telehub_service::user::CreateUserRequest as NewUser;

use crate::dto::request::{CreateUserRequest, GetUserRequest};
use crate::dto::response::{CreateUserResponse, GetUserResponse, STATUS_ERROR, STATUS_SUCCESS};
use crate::state::AppState;

/// POST /api/rpc/CreateUser
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Json<CreateUserResponse> {
    let result = state
        .user_service
        .create_user(NewUser {
            name: req.name,
            email: req.email,
        })
        .await;

    Json(match result {
        Ok(user_id) => CreateUserResponse {
            user_id,
            status: STATUS_SUCCESS.to_string(),
            error: String::new(),
        },
        Err(e) => CreateUserResponse {
            user_id: 0,
            status: STATUS_ERROR.to_string(),
            error: e.to_string(),
        },
    })
}

/// POST /api/rpc/GetUser
pub async fn get_user(
    State(state): State<AppState>,
    Json(req): Json<GetUserRequest>,
) -> Json<GetUserResponse> {
    Json(match state.user_service.get_user(req.user_id).await {
        Ok(user) => GetUserResponse {
            user_id: user.id,
            name: user.name,
            email: user.email,
            error: String::new(),
        },
        Err(e) => GetUserResponse {
            user_id: req.user_id,
            name: String::new(),
            email: String::new(),
            error: e.to_string(),
        },
    })
}
