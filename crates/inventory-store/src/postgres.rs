use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    AdjustOutcome, ChangeType, NewProduct, Product, ProductChanges, ProductId, Quantity, Result,
    StockChange, StockChangeId, StoreError, store::InventoryStore,
};

/// PostgreSQL-backed inventory store implementation.
#[derive(Clone)]
pub struct PostgresInventoryStore {
    pool: PgPool,
}

impl PostgresInventoryStore {
    /// Creates a new PostgreSQL inventory store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        tracing::info!("applying inventory migrations");
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            id: ProductId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            stock_quantity: row.try_get("stock_quantity")?,
            low_stock_threshold: row.try_get("low_stock_threshold")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_change(row: PgRow) -> Result<StockChange> {
        let change_type: String = row.try_get("change_type")?;

        Ok(StockChange {
            id: StockChangeId::new(row.try_get("id")?),
            product_id: ProductId::new(row.try_get("product_id")?),
            change_type: change_type.parse().map_err(StoreError::CorruptRow)?,
            quantity: row.try_get("quantity")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl InventoryStore for PostgresInventoryStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, stock_quantity, low_stock_threshold, created_at, updated_at
            FROM products
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, name, description, stock_quantity, low_stock_threshold, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (name, description, stock_quantity, low_stock_threshold)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, stock_quantity, low_stock_threshold, created_at, updated_at
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.stock_quantity)
        .bind(product.low_stock_threshold)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_product(row)
    }

    async fn update_product(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Option<Product>> {
        let mut tx = self.pool.begin().await?;

        // Lock the row so adjustments can't interleave with the merge
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, name, description, stock_quantity, low_stock_threshold, created_at, updated_at
            FROM products
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        let mut product = Self::row_to_product(row)?;
        changes.apply_to(&mut product);

        let row = sqlx::query(
            r#"
            UPDATE products
            SET name = $1, description = $2, stock_quantity = $3, low_stock_threshold = $4,
                updated_at = NOW()
            WHERE id = $5
            RETURNING id, name, description, stock_quantity, low_stock_threshold, created_at, updated_at
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.stock_quantity)
        .bind(product.low_stock_threshold)
        .bind(id.as_i64())
        .fetch_one(&mut *tx)
        .await?;

        let updated = Self::row_to_product(row)?;
        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn adjust_stock(
        &self,
        id: ProductId,
        change_type: ChangeType,
        quantity: Quantity,
    ) -> Result<AdjustOutcome> {
        let mut tx = self.pool.begin().await?;

        // The conditional update takes the row lock and re-checks the
        // predicate against the latest committed quantity, so concurrent
        // decreases cannot both pass the check.
        let row: Option<PgRow> = match change_type {
            ChangeType::Increase => {
                sqlx::query(
                    r#"
                    UPDATE products
                    SET stock_quantity = stock_quantity + $1, updated_at = NOW()
                    WHERE id = $2
                    RETURNING id, name, description, stock_quantity, low_stock_threshold, created_at, updated_at
                    "#,
                )
                .bind(quantity.get())
                .bind(id.as_i64())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    // 22003: numeric_value_out_of_range
                    if let sqlx::Error::Database(ref db_err) = e
                        && db_err.code().as_deref() == Some("22003")
                    {
                        return StoreError::QuantityOverflow(id);
                    }
                    StoreError::Database(e)
                })?
            }
            ChangeType::Decrease => {
                sqlx::query(
                    r#"
                    UPDATE products
                    SET stock_quantity = stock_quantity - $1, updated_at = NOW()
                    WHERE id = $2 AND stock_quantity >= $1
                    RETURNING id, name, description, stock_quantity, low_stock_threshold, created_at, updated_at
                    "#,
                )
                .bind(quantity.get())
                .bind(id.as_i64())
                .fetch_optional(&mut *tx)
                .await?
            }
        };

        let Some(row) = row else {
            let available: Option<i64> =
                sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = $1")
                    .bind(id.as_i64())
                    .fetch_optional(&mut *tx)
                    .await?;
            tx.rollback().await?;

            return Ok(match available {
                Some(available) => AdjustOutcome::InsufficientStock { available },
                None => AdjustOutcome::NotFound,
            });
        };

        let product = Self::row_to_product(row)?;

        sqlx::query(
            r#"
            INSERT INTO stock_history (product_id, change_type, quantity)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(id.as_i64())
        .bind(change_type.as_str())
        .bind(quantity.get())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(AdjustOutcome::Applied(product))
    }

    async fn low_stock_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, stock_quantity, low_stock_threshold, created_at, updated_at
            FROM products
            WHERE low_stock_threshold IS NOT NULL AND stock_quantity <= low_stock_threshold
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn stock_history(&self, id: ProductId) -> Result<Vec<StockChange>> {
        let rows = sqlx::query(
            r#"
            SELECT id, product_id, change_type, quantity, created_at
            FROM stock_history
            WHERE product_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_change).collect()
    }
}
