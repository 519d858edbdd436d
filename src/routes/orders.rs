use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};

use crate::{
    dto::orders::{CreateOrderItemRequest, OrderList, OrderWithItems, UpdateOrderStatusRequest},
    error::AppResult,
    models::{Order, OrderItem},
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/", post(create_order_item))
        .route("/item/{order_item_id}", get(get_order_by_item))
        .route("/{id}/status", patch(update_order_status))
}

#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "List all orders", body = ApiResponse<OrderList>)
    ),
    tag = "Orders"
)]
pub async fn list_orders(State(state): State<AppState>) -> AppResult<Json<ApiResponse<OrderList>>> {
    Ok(Json(order_service::list_orders(&state).await?))
}

#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderItemRequest,
    responses(
        (status = 200, description = "Create an order item (and its order)", body = ApiResponse<OrderItem>),
        (status = 400, description = "Insufficient stock"),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Validation error"),
    ),
    tag = "Orders"
)]
pub async fn create_order_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderItemRequest>,
) -> AppResult<Json<ApiResponse<OrderItem>>> {
    Ok(Json(
        order_service::create_order_item(&state, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/orders/item/{order_item_id}",
    params(
        ("order_item_id" = i32, Path, description = "Order item ID")
    ),
    responses(
        (status = 200, description = "Order owning the item, with all its items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "OrderItem or Order not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order_by_item(
    Path(order_item_id): Path<i32>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    Ok(Json(
        order_service::get_order_by_item(&state, order_item_id).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/orders/{id}/status",
    params(
        ("id" = i32, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order with updated status", body = ApiResponse<Order>),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Validation error"),
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    Ok(Json(
        order_service::update_order_status(&state, id, payload).await?,
    ))
}
