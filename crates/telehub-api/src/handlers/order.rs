//! Order ingest handlers.

use axum::Json;
use axum::extract::State;

use telehub_service::order::CreateOrderRequest as NewOrder;

use crate::dto::request::CreateOrderRequest;
use crate::dto::response::{CreateOrderResponse, STATUS_ERROR, STATUS_SUCCESS};
use crate::state::AppState;

/// POST /api/rpc/CreateOrder
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Json<CreateOrderResponse> {
    let result = state
        .order_service
        .create_order(NewOrder {
            user_id: req.user_id,
            product: req.product,
        })
        .await;

    Json(match result {
        Ok(order_id) => CreateOrderResponse {
            order_id,
            status: STATUS_SUCCESS.to_string(),
            error: String::new(),
        },
        Err(e) => CreateOrderResponse {
            order_id: 0,
            status: STATUS_ERROR.to_string(),
            error: e.to_string(),
        },
    })
}
