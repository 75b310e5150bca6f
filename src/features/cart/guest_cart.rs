//! Anonymous cart carried by the client as a signed token.
//!
//! The server keeps no state for guests: every guest cart operation decodes the
//! `X-Cart-Token` header, edits the mapping and hands back a freshly signed token.
//! Each token carries its own `jti` so a login can consume it exactly once.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::shared::constants::MAX_LINE_QUANTITY;

pub const GUEST_CART_TOKEN_TYPE: &str = "guest_cart";

/// Product id to quantity; every stored quantity is in `1..=MAX_LINE_QUANTITY`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestCart {
    items: BTreeMap<Uuid, i32>,
}

impl GuestCart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from untrusted input, dropping non-positive quantities
    pub fn from_items(items: BTreeMap<Uuid, i32>) -> Self {
        let mut cart = Self::new();
        for (product_id, quantity) in items {
            cart.set_quantity(product_id, quantity);
        }
        cart
    }

    pub fn items(&self) -> &BTreeMap<Uuid, i32> {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn product_ids(&self) -> Vec<Uuid> {
        self.items.keys().copied().collect()
    }

    /// Add to an existing line or create it; non-positive quantities are ignored
    pub fn add(&mut self, product_id: Uuid, quantity: i32) {
        if quantity <= 0 {
            return;
        }
        let entry = self.items.entry(product_id).or_insert(0);
        *entry = entry.saturating_add(quantity).min(MAX_LINE_QUANTITY);
    }

    /// Overwrite a line; zero or less removes it
    pub fn set_quantity(&mut self, product_id: Uuid, quantity: i32) {
        if quantity <= 0 {
            self.items.remove(&product_id);
        } else {
            self.items
                .insert(product_id, quantity.min(MAX_LINE_QUANTITY));
        }
    }

    pub fn remove(&mut self, product_id: Uuid) -> bool {
        self.items.remove(&product_id).is_some()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GuestCartClaims {
    typ: String,
    iss: String,
    iat: u64,
    exp: u64,
    jti: Uuid,
    items: BTreeMap<Uuid, i32>,
}

/// A verified guest cart together with the id of the token it came from
#[derive(Debug, Clone, Default)]
pub struct OpenedGuestCart {
    pub cart: GuestCart,
    /// `None` when no live token was presented
    pub token_id: Option<Uuid>,
}

/// Signs and verifies guest cart tokens
pub struct GuestCartCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
    leeway: u64,
}

impl GuestCartCodec {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            ttl: config.cart_token_ttl,
            leeway: config.jwt_leeway.as_secs(),
        }
    }

    /// How long a cart token stays acceptable, leeway included
    pub fn lifetime(&self) -> Duration {
        self.ttl + Duration::from_secs(self.leeway)
    }

    /// Sign the cart. An empty cart has no token.
    pub fn encode(&self, cart: &GuestCart) -> Result<Option<String>> {
        if cart.is_empty() {
            return Ok(None);
        }

        let now = Utc::now().timestamp().max(0) as u64;
        let claims = GuestCartClaims {
            typ: GUEST_CART_TOKEN_TYPE.to_string(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.ttl.as_secs(),
            jti: Uuid::now_v7(),
            items: cart.items.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map(Some)
            .map_err(|e| AppError::Internal(format!("Failed to sign cart token: {}", e)))
    }

    /// Verify and open a token. A missing or expired token is an empty cart.
    pub fn decode(&self, token: Option<&str>) -> Result<GuestCart> {
        self.open(token).map(|opened| opened.cart)
    }

    /// Like [`decode`](Self::decode), keeping the token's `jti`
    pub fn open(&self, token: Option<&str>) -> Result<OpenedGuestCart> {
        let Some(token) = token else {
            return Ok(OpenedGuestCart::default());
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.leeway = self.leeway;

        let claims = match decode::<GuestCartClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                tracing::debug!("Guest cart token expired, starting a new cart");
                return Ok(OpenedGuestCart::default());
            }
            Err(e) => {
                tracing::warn!("Rejected guest cart token: {}", e);
                return Err(AppError::BadRequest("Invalid cart token".to_string()));
            }
        };

        if claims.typ != GUEST_CART_TOKEN_TYPE {
            return Err(AppError::BadRequest("Invalid cart token".to_string()));
        }

        Ok(OpenedGuestCart {
            cart: GuestCart::from_items(claims.items),
            token_id: Some(claims.jti),
        })
    }
}
