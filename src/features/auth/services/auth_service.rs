use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    AuthResponseDto, AuthUserDto, LoginRequestDto, RegisterRequestDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::password::{hash_password, verify_password};
use crate::features::auth::services::TokenService;
use crate::features::cart::dtos::CartMergeSummaryDto;
use crate::features::cart::{CartService, OpenedGuestCart};
use crate::features::users::models::User;
use crate::features::users::services::{NewUser, UserService};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Service for registration, login and the login-time cart merge
pub struct AuthService {
    users: Arc<UserService>,
    carts: Arc<CartService>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<UserService>,
        carts: Arc<CartService>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            carts,
            tokens,
        }
    }

    fn token_response(
        &self,
        user: User,
        cart_merge: Option<CartMergeSummaryDto>,
    ) -> Result<AuthResponseDto> {
        let issued = self.tokens.issue_access_token(&user.identity())?;

        Ok(AuthResponseDto {
            access_token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
            user: user.into(),
            cart_merge,
            cart_token: None,
        })
    }

    /// Create a customer account and sign it in
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        let password_hash = hash_password(&dto.password)?;

        let user = self
            .users
            .create(NewUser {
                username: dto.username.trim(),
                email: dto.email.trim(),
                password_hash,
                is_admin: false,
            })
            .await?;

        self.token_response(user, None)
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&user.password_hash, password)? {
            tracing::info!(username = %user.username, "Rejected login with wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        Ok(user)
    }

    /// Opens the guest cart token sent with a login. A token that fails
    /// verification is dropped instead of failing the login.
    fn guest_cart_from_login(&self, token: Option<&str>) -> OpenedGuestCart {
        match self.carts.codec().open(token) {
            Ok(opened) => opened,
            Err(e) => {
                tracing::warn!("Ignoring guest cart token on login: {}", e);
                OpenedGuestCart::default()
            }
        }
    }

    /// Sign in and fold the guest cart, if one was sent, into the account cart
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = self.authenticate(&dto.username, &dto.password).await?;

        let cart_token = dto
            .cart_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let cart_merge = match cart_token {
            Some(token) => {
                let guest = self.guest_cart_from_login(Some(token));
                let summary = self.carts.merge_guest_cart(user.id, &guest).await?;
                Some(summary)
            }
            None => None,
        };

        tracing::info!(user_id = %user.id, "User logged in");
        self.token_response(user, cart_merge)
    }

    /// Back-office sign in; only administrators get a token
    pub async fn admin_login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = self.authenticate(&dto.username, &dto.password).await?;

        if !user.is_admin {
            tracing::warn!(username = %user.username, "Non-admin attempted admin login");
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        tracing::info!(user_id = %user.id, "Admin logged in");
        self.token_response(user, None)
    }

    pub async fn get_current_user(&self, user: &AuthenticatedUser) -> Result<AuthUserDto> {
        let user = self.users.get_by_id(user.user_id).await?;
        Ok(user.into())
    }
}
