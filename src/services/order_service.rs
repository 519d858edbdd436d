use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::{
    dto::orders::{
        CreateOrderItemRequest, CreateOrderRequest, OrderList, OrderWithItems,
        UpdateOrderStatusRequest,
    },
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Status assigned to orders created through the order-item endpoint.
pub const DEFAULT_ORDER_STATUS: &str = "in progress";

pub async fn list_orders(state: &AppState) -> AppResult<ApiResponse<OrderList>> {
    let items: Vec<Order> = Orders::find()
        .order_by_asc(OrderCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(items.len() as i64);
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    payload.validate()?;

    let order = insert_order(&state.orm, &payload.status).await?;
    tracing::debug!(order_id = order.id, "order created");

    Ok(ApiResponse::success(
        "Order created",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

/// Creates the order, the order item, and the stock decrement as one
/// transaction; the conditional decrement keeps concurrent requests from
/// taking the same units.
pub async fn create_order_item(
    state: &AppState,
    payload: CreateOrderItemRequest,
) -> AppResult<ApiResponse<OrderItem>> {
    payload.validate()?;

    let txn = state.orm.begin().await?;

    let product = Products::find_by_id(payload.product_id).one(&txn).await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound("Product")),
    };

    if product.stock < payload.quantity {
        return Err(AppError::InsufficientStock {
            available: product.stock,
            requested: payload.quantity,
        });
    }

    let updated = Products::update_many()
        .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(payload.quantity))
        .filter(ProdCol::Id.eq(payload.product_id))
        .filter(ProdCol::Stock.gte(payload.quantity))
        .exec(&txn)
        .await?;

    if updated.rows_affected == 0 {
        // A concurrent request took the stock between the read and the update.
        let available = Products::find_by_id(payload.product_id)
            .one(&txn)
            .await?
            .map(|p| p.stock)
            .unwrap_or(0);
        return Err(AppError::InsufficientStock {
            available,
            requested: payload.quantity,
        });
    }

    let order = insert_order(&txn, DEFAULT_ORDER_STATUS).await?;

    let item = OrderItemActive {
        id: NotSet,
        order_id: Set(order.id),
        product_id: Set(payload.product_id),
        quantity: Set(payload.quantity),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    tracing::debug!(
        order_id = order.id,
        order_item_id = item.id,
        product_id = payload.product_id,
        quantity = payload.quantity,
        "order item created"
    );

    Ok(ApiResponse::success(
        "Order item created",
        order_item_from_entity(item),
        Some(Meta::empty()),
    ))
}

pub async fn get_order_by_item(
    state: &AppState,
    order_item_id: i32,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let item = OrderItems::find_by_id(order_item_id).one(&state.orm).await?;
    let item = match item {
        Some(i) => i,
        None => return Err(AppError::NotFound("OrderItem")),
    };

    let order = Orders::find_by_id(item.order_id).one(&state.orm).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound("Order")),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Order",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    id: i32,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    payload.validate()?;

    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound("Order")),
    };

    let mut active: OrderActive = order.into();
    active.status = Set(payload.status);
    let order = active.update(&state.orm).await?;
    tracing::debug!(order_id = order.id, status = %order.status, "order status updated");

    Ok(ApiResponse::success(
        "Status updated",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

async fn insert_order<C: ConnectionTrait>(
    conn: &C,
    status: &str,
) -> Result<OrderModel, sea_orm::DbErr> {
    OrderActive {
        id: NotSet,
        status: Set(status.to_owned()),
        created_at: NotSet,
    }
    .insert(conn)
    .await
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
    }
}
