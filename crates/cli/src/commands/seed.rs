//! Seed the database with starter catalog data.
//!
//! Inserts a handful of categories, products, and delivery zones so a fresh
//! install has something to show. Idempotent: existing rows (matched by
//! name or zone) are left alone.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

struct SeedProduct {
    name_en: &'static str,
    name_ar: &'static str,
    description_en: &'static str,
    price: Decimal,
    category: &'static str,
}

const CATEGORIES: &[(&str, &str)] = &[
    ("Clays", "طين"),
    ("Herbs & Flowers", "أعشاب وزهور"),
    ("Oils & Butters", "زيوت وزبدات"),
];

fn products() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name_en: "Sudanese White Clay",
            name_ar: "طين أبيض سوداني",
            description_en: "Fine white clay for face masks and gentle cleansing.",
            price: dec!(2500),
            category: "Clays",
        },
        SeedProduct {
            name_en: "Hibiscus Petals",
            name_ar: "كركديه",
            description_en: "Dried hibiscus petals for rinses and toners.",
            price: dec!(1200),
            category: "Herbs & Flowers",
        },
        SeedProduct {
            name_en: "Cold-Pressed Sesame Oil",
            name_ar: "زيت سمسم معصور على البارد",
            description_en: "Unrefined sesame oil for skin and hair.",
            price: dec!(3500),
            category: "Oils & Butters",
        },
        SeedProduct {
            name_en: "Shea Butter",
            name_ar: "زبدة الشيا",
            description_en: "Raw shea butter, whipped-ready.",
            price: dec!(4000),
            category: "Oils & Butters",
        },
    ]
}

const DELIVERY_ZONES: &[(&str, &str, i64)] = &[
    ("Sudan", "Khartoum", 2000),
    ("Sudan", "Omdurman", 2500),
    ("Sudan", "Bahri", 2500),
];

/// Seed starter data.
///
/// # Errors
///
/// Returns `SeedError` if `DATABASE_URL` is missing or a query fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| SeedError::MissingEnvVar("DATABASE_URL"))?;

    info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let mut inserted = 0_u32;

    for (name_en, name_ar) in CATEGORIES {
        let result = sqlx::query(
            r"
            INSERT INTO categories (name_en, name_ar)
            SELECT $1, $2
            WHERE NOT EXISTS (SELECT 1 FROM categories WHERE name_en = $1)
            ",
        )
        .bind(name_en)
        .bind(name_ar)
        .execute(&pool)
        .await?;
        inserted += u32::try_from(result.rows_affected()).unwrap_or(0);
    }
    info!("Categories seeded ({inserted} new)");

    inserted = 0;
    for product in products() {
        let result = sqlx::query(
            r"
            INSERT INTO products (name_en, name_ar, description_en, price, category_id)
            SELECT $1, $2, $3, $4, (SELECT id FROM categories WHERE name_en = $5)
            WHERE NOT EXISTS (SELECT 1 FROM products WHERE name_en = $1)
            ",
        )
        .bind(product.name_en)
        .bind(product.name_ar)
        .bind(product.description_en)
        .bind(product.price)
        .bind(product.category)
        .execute(&pool)
        .await?;
        inserted += u32::try_from(result.rows_affected()).unwrap_or(0);
    }
    info!("Products seeded ({inserted} new)");

    inserted = 0;
    for (country, state, price) in DELIVERY_ZONES {
        let result = sqlx::query(
            r"
            INSERT INTO delivery_zones (country, state, price)
            VALUES ($1, $2, $3)
            ON CONFLICT (country, state) DO NOTHING
            ",
        )
        .bind(country)
        .bind(state)
        .bind(Decimal::from(*price))
        .execute(&pool)
        .await?;
        inserted += u32::try_from(result.rows_affected()).unwrap_or(0);
    }
    info!("Delivery zones seeded ({inserted} new)");

    // Create the singleton settings rows so first requests don't have to.
    sqlx::query(
        r"
        INSERT INTO loyalty_settings (min_points_to_unlock, points_per_currency)
        SELECT 500, 1
        WHERE NOT EXISTS (SELECT 1 FROM loyalty_settings)
        ",
    )
    .execute(&pool)
    .await?;
    sqlx::query(
        r"
        INSERT INTO site_settings (support_phone)
        SELECT NULL
        WHERE NOT EXISTS (SELECT 1 FROM site_settings)
        ",
    )
    .execute(&pool)
    .await?;

    info!("Seeding complete!");
    Ok(())
}
