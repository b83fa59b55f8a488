use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::StoreResult;
use crate::products::repo_types::{NewProduct, Product};

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Product>>;
    async fn create(&self, product: NewProduct) -> StoreResult<Product>;
    /// Returns `None` when no row has this id.
    async fn update(&self, id: i64, product: NewProduct) -> StoreResult<Option<Product>>;
    /// Returns `false` when no row has this id.
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}

#[derive(Clone)]
pub struct PgProductStore {
    db: PgPool,
}

impl PgProductStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn list(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, category, price, quantity
            FROM products
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create(&self, p: NewProduct) -> StoreResult<Product> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, category, price, quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, category, price, quantity
            "#,
        )
        .bind(p.name)
        .bind(p.description)
        .bind(p.category)
        .bind(p.price)
        .bind(p.quantity)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, p: NewProduct) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
               SET name = $1, description = $2, category = $3, price = $4, quantity = $5
             WHERE id = $6
            RETURNING id, name, description, category, price, quantity
            "#,
        )
        .bind(p.name)
        .bind(p.description)
        .bind(p.category)
        .bind(p.price)
        .bind(p.quantity)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
