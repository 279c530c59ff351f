//! Sample catalog used to seed a fresh instance and in tests.

use databox_core::{ProductId, Sku};

use crate::error::CatalogResult;
use crate::product::{AiStatus, NewProduct, Product, WorkflowStatus};
use crate::workflow::Catalog;

const MOCK_CATEGORIES: [&str; 5] = ["Home", "Electronics", "Garden", "Fashion", "Toys"];
const FIRST_MOCK_ID: u32 = 4;
const LAST_MOCK_ID: u32 = 53;

fn new_product(
    id: u32,
    sku: impl Into<String>,
    title: impl Into<String>,
    description: impl Into<String>,
    buy_price: f64,
    sell_price: f64,
    stock: u32,
) -> NewProduct {
    NewProduct {
        id: ProductId::new(id.to_string()),
        sku: Sku::new(sku),
        raw_title: title.into(),
        raw_description: description.into(),
        buy_price,
        sell_price,
        stock,
    }
}

fn base_products(min_margin_percent: f64) -> CatalogResult<Vec<Product>> {
    let mut shirt = Product::import(
        new_product(
            1,
            "WH-8842-BL",
            "Mens T-Shirt Cotton Bulk Pack 10 Blue",
            "100% Cotton material. Made in Turkey. Wash cold.",
            4.50,
            12.99,
            500,
        ),
        min_margin_percent,
    )?;
    shirt.ai_title = Some("Mens Cotton T-Shirt Bulk Pack (10pcs) - Blue".to_string());
    shirt.ai_category = Some("Clothing > Mens > Tops".to_string());
    shirt.ai_status = AiStatus::Completed;
    shirt.status = WorkflowStatus::Approved;
    shirt.is_online = true;

    let mouse = Product::import(
        new_product(
            2,
            "EL-GAM-MOUSE-RGB",
            "Gaming Mouse 2400DPI RGB Led",
            "Wired USB mouse. 5 buttons. Black color.",
            18.00,
            22.00,
            120,
        ),
        min_margin_percent,
    )?;

    let mixer = Product::import(
        new_product(
            3,
            "KT-MIX-STAND",
            "Kitchen Stand Mixer 5L Bowl",
            "Heavy duty mixer. 3 attachments included. Silver.",
            85.00,
            159.00,
            45,
        ),
        min_margin_percent,
    )?;

    Ok(vec![shirt, mouse, mixer])
}

/// Deterministic stand-in for a supplier feed: markups between 10% and 90%,
/// every fifth item already online.
fn mock_product(i: u32, min_margin_percent: f64) -> CatalogResult<Product> {
    let category = MOCK_CATEGORIES[(i as usize * 3) % MOCK_CATEGORIES.len()];
    let buy = f64::from(10 + (i * 37) % 100);
    let markup = 0.1 + f64::from((i * 53) % 81) / 100.0;
    let sell = (buy * (1.0 + markup) * 100.0).round() / 100.0;
    let prefix: String = category.to_uppercase().chars().take(3).collect();

    let mut product = Product::import(
        new_product(
            i,
            format!("MOCK-{prefix}-{}", 1000 + i),
            format!("{category} Generic Product Model {i} Imported"),
            format!("This is a raw imported description for item {i}. Needs optimization."),
            buy,
            sell,
            (i * 71) % 200,
        ),
        min_margin_percent,
    )?;
    product.is_online = i % 5 == 0;
    Ok(product)
}

/// Three hand-written products followed by 50 generated ones (ids 4..=53).
pub fn sample_catalog(min_margin_percent: f64) -> CatalogResult<Catalog> {
    let mut products = base_products(min_margin_percent)?;
    for i in FIRST_MOCK_ID..=LAST_MOCK_ID {
        products.push(mock_product(i, min_margin_percent)?);
    }
    Catalog::from_products(products)
}
