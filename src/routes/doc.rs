use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        orders::{CreateOrderItemRequest, CreateOrderRequest, OrderList, OrderWithItems, UpdateOrderStatusRequest},
        products::{CreateProductRequest, ProductList},
    },
    models::{Order, OrderItem, Product},
    response::{ApiResponse, Meta},
    routes::{health, orders, products},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        orders::list_orders,
        orders::create_order_item,
        orders::get_order_by_item,
        orders::update_order_status,
    ),
    components(
        schemas(
            Product,
            Order,
            OrderItem,
            CreateProductRequest,
            CreateOrderRequest,
            CreateOrderItemRequest,
            UpdateOrderStatusRequest,
            ProductList,
            OrderList,
            OrderWithItems,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Order>,
            ApiResponse<OrderItem>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithItems>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
