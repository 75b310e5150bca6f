//! Start-up provisioning: the initial admin account and the sample plant catalog.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::config::BootstrapConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::password::hash_password;
use crate::features::users::services::{NewUser, UserService};

struct SampleCategory {
    name: &'static str,
    description: &'static str,
}

struct SampleProduct {
    name: &'static str,
    description: &'static str,
    /// Price in paise (hundredths)
    price_cents: i64,
    image_filename: &'static str,
    stock: i32,
    /// Index into `SAMPLE_CATEGORIES`
    category: usize,
    sku: &'static str,
    tags: &'static str,
    is_featured: bool,
    is_hot: bool,
    is_sale: bool,
}

const SAMPLE_CATEGORIES: [SampleCategory; 5] = [
    SampleCategory {
        name: "Outdoor Plants",
        description: "Plants perfect for outdoor gardens",
    },
    SampleCategory {
        name: "Indoor Plants",
        description: "Plants for indoor decoration",
    },
    SampleCategory {
        name: "Office Plants",
        description: "Low maintenance plants for offices",
    },
    SampleCategory {
        name: "Potted Plants",
        description: "Plants in decorative pots",
    },
    SampleCategory {
        name: "Flowering Plants",
        description: "Beautiful flowering plants",
    },
];

const fn product(
    name: &'static str,
    description: &'static str,
    price_cents: i64,
    image_filename: &'static str,
    stock: i32,
    category: usize,
    sku: &'static str,
    tags: &'static str,
) -> SampleProduct {
    SampleProduct {
        name,
        description,
        price_cents,
        image_filename,
        stock,
        category,
        sku,
        tags,
        is_featured: false,
        is_hot: false,
        is_sale: false,
    }
}

const SAMPLE_PRODUCTS: [SampleProduct; 10] = [
    SampleProduct {
        is_featured: true,
        is_hot: true,
        ..product("Cactus Flower", "Beautiful cactus with colorful flowers", 1099, "img/bg-img/40.png", 50, 0, "CT201801", "cactus, flower, hot")
    },
    SampleProduct {
        is_featured: true,
        ..product("Tulip Flower", "Classic tulip plant", 1199, "img/bg-img/41.png", 30, 4, "CT201802", "tulip, flower")
    },
    SampleProduct {
        is_featured: true,
        ..product("Recuerdos Plant", "Elegant indoor plant", 999, "img/bg-img/34.jpg", 40, 1, "CT201803", "indoor, green")
    },
    product("Succulent Mix", "Mixed succulent arrangement", 1599, "img/bg-img/42.png", 25, 3, "CT201804", "succulent, potted"),
    product("Fern Plant", "Lush green fern", 1250, "img/bg-img/43.png", 35, 1, "CT201805", "fern, indoor, green"),
    product("Aloe Vera", "Medicinal aloe vera plant", 899, "img/bg-img/44.png", 60, 2, "CT201806", "aloe, medicinal"),
    product("Snake Plant", "Low maintenance snake plant", 1499, "img/bg-img/45.png", 45, 2, "CT201807", "snake plant, office"),
    product("Orchid", "Beautiful orchid flower", 2599, "img/bg-img/46.png", 20, 4, "CT201808", "orchid, flower, elegant"),
    SampleProduct {
        is_sale: true,
        ..product("Peace Lily", "Peaceful white lily", 1899, "img/bg-img/47.png", 28, 1, "CT201809", "lily, flower, peace")
    },
    product("Bonsai Tree", "Miniature bonsai tree", 3599, "img/bg-img/48.png", 15, 3, "CT201810", "bonsai, tree, miniature"),
];

/// Run every start-up task enabled by `config`
pub async fn run(pool: &PgPool, users: &UserService, config: &BootstrapConfig) -> Result<()> {
    if let Some((username, email, password)) = config.admin_account() {
        ensure_admin(users, username, email, password).await?;
    } else {
        tracing::debug!("No bootstrap admin configured");
    }

    if config.seed_sample_data {
        seed_sample_catalog(pool).await?;
    }

    Ok(())
}

/// Create the admin account, or promote an existing user with that username
async fn ensure_admin(
    users: &UserService,
    username: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    match users.find_by_username(username).await? {
        Some(user) if user.is_admin => {
            tracing::info!(username = %username, "Admin account already present");
        }
        Some(user) => {
            users.promote_to_admin(user.id).await?;
        }
        None => {
            let user = users
                .create(NewUser {
                    username,
                    email,
                    password_hash: hash_password(password)?,
                    is_admin: true,
                })
                .await?;
            tracing::info!(user_id = %user.id, username = %username, "Admin account created");
        }
    }
    Ok(())
}

/// Insert the sample categories and products into an empty catalog
async fn seed_sample_catalog(pool: &PgPool) -> Result<()> {
    let mut tx = pool.begin().await.map_err(|e| {
        tracing::error!("Failed to begin transaction: {:?}", e);
        AppError::Database(e)
    })?;

    let has_catalog: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM categories) OR EXISTS(SELECT 1 FROM products)",
    )
    .fetch_one(&mut *tx)
    .await
    .map_err(AppError::Database)?;

    if has_catalog {
        tracing::info!("Catalog not empty, skipping sample data");
        return Ok(());
    }

    let mut category_ids = Vec::with_capacity(SAMPLE_CATEGORIES.len());
    for category in &SAMPLE_CATEGORIES {
        let id = Uuid::now_v7();
        sqlx::query("INSERT INTO categories (id, name, description) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(category.name)
            .bind(category.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to seed category {}: {:?}", category.name, e);
                AppError::Database(e)
            })?;
        category_ids.push(id);
    }

    for sample in &SAMPLE_PRODUCTS {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, image_filename, stock,
                                  category_id, sku, tags, is_featured, is_hot, is_sale)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(sample.name)
        .bind(sample.description)
        .bind(Decimal::new(sample.price_cents, 2))
        .bind(sample.image_filename)
        .bind(sample.stock)
        .bind(category_ids.get(sample.category).copied())
        .bind(sample.sku)
        .bind(sample.tags)
        .bind(sample.is_featured)
        .bind(sample.is_hot)
        .bind(sample.is_sale)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to seed product {}: {:?}", sample.name, e);
            AppError::Database(e)
        })?;
    }

    tx.commit().await.map_err(|e| {
        tracing::error!("Failed to commit sample catalog: {:?}", e);
        AppError::Database(e)
    })?;

    tracing::info!(
        categories = SAMPLE_CATEGORIES.len(),
        products = SAMPLE_PRODUCTS.len(),
        "Sample catalog seeded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_sample_products_reference_known_categories() {
        for sample in &SAMPLE_PRODUCTS {
            assert!(sample.category < SAMPLE_CATEGORIES.len(), "{}", sample.name);
        }
    }

    #[test]
    fn test_sample_skus_and_names_are_unique() {
        let skus: HashSet<_> = SAMPLE_PRODUCTS.iter().map(|p| p.sku).collect();
        assert_eq!(skus.len(), SAMPLE_PRODUCTS.len());

        let names: HashSet<_> = SAMPLE_CATEGORIES.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), SAMPLE_CATEGORIES.len());
    }

    #[test]
    fn test_sample_prices_have_two_decimals() {
        let cactus = Decimal::new(SAMPLE_PRODUCTS[0].price_cents, 2);
        assert_eq!(cactus.to_string(), "10.99");

        let featured = SAMPLE_PRODUCTS.iter().filter(|p| p.is_featured).count();
        assert_eq!(featured, 3);
    }
}
