// src/services/vinted.rs

use chrono::{TimeZone, Utc};
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::AppError;
use crate::models::vinted::{VintedProduct, VintedProductResponse, VintedUser};
use crate::store;

use super::hex_suffix;

/// Fixed pool the synthesizer draws stub image lists from.
const IMAGE_POOL: [&str; 4] = [
    "https://images.unsplash.com/photo-1475180098004-ca77a66827be?auto=format&fit=crop&w=600&q=80",
    "https://images.unsplash.com/photo-1483985988355-763728e1935b?auto=format&fit=crop&w=600&q=80",
    "https://images.unsplash.com/photo-1484519332611-516457305ff6?auto=format&fit=crop&w=600&q=80",
    "https://images.unsplash.com/photo-1475180098004-ca77a66827be?auto=format&fit=crop&w=600&q=80",
];

const STUB_BASE_PRICE: f64 = 64.0;

/// Inserts the baseline Vinted catalog once per database lifetime.
///
/// No-op when any user row already exists, so calling it on every process
/// start never duplicates data. Users are inserted before the products that
/// reference them, all inside one transaction.
pub async fn seed_vinted_data(pool: &SqlitePool) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    if store::vinted::any_user_exists(&mut *tx).await? {
        return Ok(());
    }

    for user in baseline_users() {
        store::vinted::insert_user(&mut *tx, &user).await?;
    }
    for product in baseline_products() {
        store::vinted::insert_product(&mut *tx, &product).await?;
    }

    tx.commit().await?;
    tracing::info!("Seeded baseline Vinted catalog");
    Ok(())
}

/// Stores placeholder products for the requested user ids.
///
/// One product per non-blank id, owner resolved or created on the fly. The
/// whole batch commits atomically; any failure rolls the request back.
pub async fn simulate_vinted_scrape(
    pool: &SqlitePool,
    user_ids: &[String],
    max_images: i64,
) -> Result<Vec<VintedProductResponse>, AppError> {
    let mut tx = pool.begin().await?;
    let mut created = Vec::new();

    for (idx, external_id) in user_ids.iter().enumerate() {
        if external_id.trim().is_empty() {
            continue;
        }

        let owner = resolve_user(&mut tx, external_id).await?;
        let product = synthesize_product(&owner.user_id, external_id, idx, max_images);
        store::vinted::insert_product(&mut *tx, &product).await?;

        created.push(VintedProductResponse {
            product,
            owner: Some(owner),
        });
    }

    tx.commit().await?;
    Ok(created)
}

/// Finds the user owning `external_id`, creating a placeholder profile when
/// the id has never been seen. On Vinted the external id is the primary key.
async fn resolve_user(
    conn: &mut SqliteConnection,
    external_id: &str,
) -> Result<VintedUser, AppError> {
    if let Some(user) = store::vinted::find_user_by_id(&mut *conn, external_id).await? {
        return Ok(user);
    }

    let user = VintedUser {
        user_id: external_id.to_string(),
        username: format!("reseller_{}", external_id.to_lowercase()),
        city: Some("Remote".to_string()),
        country_title: Some("Unknown".to_string()),
        verification_email: true,
        created_at: Some(Utc::now()),
        ..VintedUser::default()
    };
    store::vinted::insert_user(&mut *conn, &user).await?;
    Ok(user)
}

fn synthesize_product(
    owner_id: &str,
    external_id: &str,
    ordinal: usize,
    max_images: i64,
) -> VintedProduct {
    // Clamp any caller-supplied cap into [1, pool size].
    let image_count = max_images.clamp(1, IMAGE_POOL.len() as i64) as usize;

    VintedProduct {
        id: format!("vin_stub_{}_{}", external_id, hex_suffix(6)),
        user_id: owner_id.to_string(),
        url: format!("https://example.com/vinted/{}/{}", external_id, ordinal),
        favourite: false,
        gender: Some("unisex".to_string()),
        category: Some("Apparel".to_string()),
        size: Some("M".to_string()),
        state: Some("Great".to_string()),
        brand: Some("Encore Demo".to_string()),
        colors: Some("Multi".to_string()),
        price: Some(STUB_BASE_PRICE + ordinal as f64),
        images: Json(
            IMAGE_POOL[..image_count]
                .iter()
                .map(|url| (*url).to_string())
                .collect(),
        ),
        description: Some(
            "Placeholder record generated for educational scraping stub.".to_string(),
        ),
        title: Some(format!("Sample find #{}", ordinal + 1)),
        platform: "vinted".to_string(),
    }
}

fn baseline_users() -> Vec<VintedUser> {
    vec![
        VintedUser {
            user_id: "vin_001".to_string(),
            username: "northloop".to_string(),
            gender: Some("female".to_string()),
            followers_count: 1280,
            following_count: 320,
            feedback_reputation: Some(4.9),
            city: Some("Portland".to_string()),
            country_title: Some("United States".to_string()),
            verification_email: true,
            verification_phone: true,
            created_at: Some(Utc.with_ymd_and_hms(2022, 5, 1, 0, 0, 0).unwrap()),
            ..VintedUser::default()
        },
        VintedUser {
            user_id: "vin_002".to_string(),
            username: "streetthreadz".to_string(),
            gender: Some("male".to_string()),
            followers_count: 866,
            following_count: 127,
            feedback_reputation: Some(4.7),
            city: Some("Toronto".to_string()),
            country_title: Some("Canada".to_string()),
            verification_email: true,
            verification_google: true,
            created_at: Some(Utc.with_ymd_and_hms(2021, 10, 12, 0, 0, 0).unwrap()),
            ..VintedUser::default()
        },
    ]
}

fn baseline_products() -> Vec<VintedProduct> {
    vec![
        VintedProduct {
            id: "vin_prod_001".to_string(),
            user_id: "vin_001".to_string(),
            url: "https://www.vinted.com/items/vin_prod_001".to_string(),
            favourite: true,
            gender: Some("women".to_string()),
            category: Some("Sneakers".to_string()),
            size: Some("W8".to_string()),
            state: Some("Very good".to_string()),
            brand: Some("New Balance".to_string()),
            colors: Some("Cream".to_string()),
            price: Some(95.0),
            images: Json(vec![
                "https://images.unsplash.com/photo-1528701800489-20be3c2e0e2c?auto=format&fit=crop&w=600&q=80"
                    .to_string(),
            ]),
            description: Some("Limited 990v5 drop sourced from showroom.".to_string()),
            title: Some("New Balance 990v5".to_string()),
            platform: "vinted".to_string(),
        },
        VintedProduct {
            id: "vin_prod_002".to_string(),
            user_id: "vin_002".to_string(),
            url: "https://www.vinted.com/items/vin_prod_002".to_string(),
            favourite: false,
            gender: Some("men".to_string()),
            category: Some("Outerwear".to_string()),
            size: Some("L".to_string()),
            state: Some("Good".to_string()),
            brand: Some("Patagonia".to_string()),
            colors: Some("Navy".to_string()),
            price: Some(120.0),
            images: Json(vec![
                "https://images.unsplash.com/photo-1484519332611-516457305ff6?auto=format&fit=crop&w=600&q=80"
                    .to_string(),
            ]),
            description: Some("Retro Synchilla in excellent condition.".to_string()),
            title: Some("Vintage Patagonia fleece".to_string()),
            platform: "vinted".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_cap_clamps_low() {
        let product = synthesize_product("U1", "U1", 0, 0);
        assert_eq!(product.images.len(), 1);

        let product = synthesize_product("U1", "U1", 0, -3);
        assert_eq!(product.images.len(), 1);
    }

    #[test]
    fn test_image_cap_clamps_high() {
        let product = synthesize_product("U1", "U1", 0, 99);
        assert_eq!(product.images.len(), IMAGE_POOL.len());
    }

    #[test]
    fn test_image_cap_in_range() {
        let product = synthesize_product("U1", "U1", 0, 2);
        assert_eq!(product.images.len(), 2);
    }

    #[test]
    fn test_price_increases_with_ordinal() {
        let first = synthesize_product("U1", "U1", 0, 10);
        let third = synthesize_product("U3", "U3", 2, 10);
        assert_eq!(first.price, Some(64.0));
        assert_eq!(third.price, Some(66.0));
    }

    #[test]
    fn test_stub_id_carries_external_id() {
        let product = synthesize_product("ABC", "ABC", 0, 10);
        assert!(product.id.starts_with("vin_stub_ABC_"));

        let again = synthesize_product("ABC", "ABC", 0, 10);
        assert_ne!(product.id, again.id);
    }
}
