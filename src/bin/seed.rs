use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

use axum_order_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::products::{ActiveModel as ProductActive, Entity as Products},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let existing = Products::find().count(&orm).await?;
    if existing > 0 {
        println!("Products already present ({existing}), skipping seed");
        return Ok(());
    }

    let products = vec![
        ("Axum Hoodie", "Warm hoodie for Rustaceans", Decimal::new(5500, 2), 50),
        ("Ferris Mug", "Coffee tastes better with Ferris", Decimal::new(1200, 2), 100),
        ("Rust Sticker Pack", "Decorate your laptop", Decimal::new(500, 2), 200),
        ("E-book: Async Rust", "Learn async Rust patterns", Decimal::new(2500, 2), 75),
    ];

    for (title, description, price, stock) in products {
        ProductActive {
            id: NotSet,
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            price: Set(price),
            stock: Set(stock),
        }
        .insert(&orm)
        .await?;
        println!("Seeded product {title}");
    }

    Ok(())
}
