use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::categories::dtos::{CategoryRequestDto, CategoryResponseDto};
use crate::features::categories::models::Category;

const CATEGORY_SELECT: &str = r#"
    SELECT c.id, c.name, c.description, c.created_at,
           (SELECT COUNT(*) FROM products p WHERE p.category_id = c.id) AS product_count
    FROM categories c
"#;

const DUPLICATE_NAME: &str = "A category with this name already exists";

/// Service for category operations
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all categories ordered by name
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories =
            sqlx::query_as::<_, Category>(&format!("{} ORDER BY c.name", CATEGORY_SELECT))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to list categories: {:?}", e);
                    AppError::Database(e)
                })?;

        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<CategoryResponseDto> {
        let category =
            sqlx::query_as::<_, Category>(&format!("{} WHERE c.id = $1", CATEGORY_SELECT))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to get category: {:?}", e);
                    AppError::Database(e)
                })?;

        category
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn create(&self, dto: CategoryRequestDto) -> Result<CategoryResponseDto> {
        let id = Uuid::now_v7();

        sqlx::query("INSERT INTO categories (id, name, description) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(&dto.name)
            .bind(&dto.description)
            .execute(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, DUPLICATE_NAME))?;

        tracing::info!(category_id = %id, name = %dto.name, "Category created");
        self.get_by_id(id).await
    }

    pub async fn update(&self, id: Uuid, dto: CategoryRequestDto) -> Result<CategoryResponseDto> {
        let result = sqlx::query("UPDATE categories SET name = $1, description = $2 WHERE id = $3")
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, DUPLICATE_NAME))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Category with id {} not found",
                id
            )));
        }

        self.get_by_id(id).await
    }

    /// Delete a category; its products stay in the catalog without a category
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete category: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Category with id {} not found",
                id
            )));
        }

        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}
