//! Catalog repository.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use kirana_core::{Money, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Product, ProductInput};

const PRODUCT_COLUMNS: &str = "id, name, description, price, original_price, image_url, \
                               category, stock_count, created_by, created_at";

/// Narrowing criteria for catalog listings.
///
/// `q` is a case-insensitive substring match on the name; `category` is an
/// exact match. Both optional, both combinable.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub q: Option<String>,
    pub category: Option<String>,
}

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, optionally narrowed. Insertion (id) order, no
    /// pagination. Zero-stock products stay listed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%') \
               AND ($2::text IS NULL OR category = $2) \
             ORDER BY id"
        ))
        .bind(filter.q.as_deref())
        .bind(filter.category.as_deref())
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(product_from_row).collect()
    }

    /// Get one product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(product_from_row).transpose()
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        input: &ProductInput,
        created_by: UserId,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query(&format!(
            "INSERT INTO products \
             (name, description, price, original_price, image_url, category, stock_count, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(input.description.as_deref())
        .bind(input.price.amount())
        .bind(input.original_price.map(|m| m.amount()))
        .bind(input.image_url.as_deref())
        .bind(input.category.as_deref())
        .bind(input.stock_count)
        .bind(created_by.as_i32())
        .fetch_one(self.pool)
        .await?;

        product_from_row(&row)
    }

    /// Replace a product's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query(&format!(
            "UPDATE products \
             SET name = $2, description = $3, price = $4, original_price = $5, \
                 image_url = $6, category = $7, stock_count = $8 \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(&input.name)
        .bind(input.description.as_deref())
        .bind(input.price.amount())
        .bind(input.original_price.map(|m| m.amount()))
        .bind(input.image_url.as_deref())
        .bind(input.category.as_deref())
        .bind(input.stock_count)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        product_from_row(&row)
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Map a product row to the domain type.
fn product_from_row(row: &PgRow) -> Result<Product, RepositoryError> {
    Ok(Product {
        id: ProductId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: Money::new(row.try_get("price")?),
        original_price: row
            .try_get::<Option<rust_decimal::Decimal>, _>("original_price")?
            .map(Money::new),
        image_url: row.try_get("image_url")?,
        category: row.try_get("category")?,
        stock_count: row.try_get("stock_count")?,
        created_by: UserId::new(row.try_get("created_by")?),
        created_at: row.try_get("created_at")?,
    })
}
