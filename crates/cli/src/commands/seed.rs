//! Catalog seeding command.
//!
//! Inserts a small sample menu so a fresh environment has something to
//! order. Running it twice inserts duplicates; it is meant for empty
//! development databases.

use rust_decimal::Decimal;
use tracing::info;

use comanda_server::db::{ProductInput, ProductRepository};

/// Sample menu: (name, description, price in cents, category).
const SAMPLE_MENU: &[(&str, &str, i64, &str)] = &[
    (
        "Tacos al pastor",
        "Tres tacos de cerdo adobado con piña, cebolla y cilantro",
        9500,
        "Platos fuertes",
    ),
    (
        "Quesadilla de flor de calabaza",
        "Tortilla hecha a mano con queso Oaxaca",
        7000,
        "Antojitos",
    ),
    (
        "Pozole rojo",
        "Con carne de cerdo, lechuga, rábano y orégano",
        12000,
        "Platos fuertes",
    ),
    (
        "Guacamole con totopos",
        "Aguacate fresco con jitomate, cebolla y chile serrano",
        8500,
        "Entradas",
    ),
    ("Agua de horchata", "Vaso grande", 3500, "Bebidas"),
    ("Café de olla", "Con canela y piloncillo", 4000, "Bebidas"),
    (
        "Flan napolitano",
        "Con caramelo de la casa",
        5500,
        "Postres",
    ),
];

/// Seed the catalog with the sample menu.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let repo = ProductRepository::new(&pool);

    for (name, description, cents, category) in SAMPLE_MENU {
        let product = repo
            .create(ProductInput {
                name: (*name).to_string(),
                description: (*description).to_string(),
                price: Decimal::new(*cents, 2),
                category: (*category).to_string(),
                image_url: None,
            })
            .await?;
        info!(product_id = %product.id, name = %product.name, "seeded product");
    }

    info!(count = SAMPLE_MENU.len(), "catalog seeded");
    Ok(())
}
