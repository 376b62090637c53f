//! Cart repository.
//!
//! Every mutation runs in a transaction that locks the cart row, applies a
//! pure [`Cart`] mutation, persists the changed line and recomputes the
//! cart's totals before committing.

use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use tracing::instrument;

use techshop_core::{CartId, CustomerId, Price};

use super::catalog::{ProductSummaryRow, SUMMARY_COLUMNS};
use super::{RepositoryError, is_foreign_key_violation, to_i32, to_u32};
use crate::models::{Cart, CartError, CartLine, LineChange};

/// Errors from a cart mutation: either the database or the cart rules.
#[derive(Debug, Error)]
pub enum CartOperationError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Cart(#[from] CartError),
}

impl From<sqlx::Error> for CartOperationError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

#[derive(sqlx::FromRow)]
struct CartRow {
    id: CartId,
    owner_id: CustomerId,
    total_products: i32,
    final_price: Price,
    in_order: bool,
}

#[derive(sqlx::FromRow)]
struct CartLineRow {
    #[sqlx(flatten)]
    product: ProductSummaryRow,
    qty: i32,
    line_price: Price,
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the customer's open cart, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self))]
    pub async fn open_cart(&self, owner_id: CustomerId) -> Result<Cart, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO shop.cart (owner_id)
            VALUES ($1)
            ON CONFLICT (owner_id) WHERE NOT in_order DO NOTHING
            ",
        )
        .bind(owner_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        let row = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, owner_id, total_products, final_price, in_order
            FROM shop.cart
            WHERE owner_id = $1 AND NOT in_order
            ",
        )
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;

        let cart = load_cart(&mut tx, row).await?;
        tx.commit().await?;

        Ok(cart)
    }

    /// Get a cart by ID with its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, cart_id: CartId) -> Result<Option<Cart>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;

        let row = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, owner_id, total_products, final_price, in_order
            FROM shop.cart
            WHERE id = $1
            ",
        )
        .bind(cart_id)
        .fetch_optional(&mut *conn)
        .await?;

        match row {
            Some(row) => Ok(Some(load_cart(&mut conn, row).await?)),
            None => Ok(None),
        }
    }

    /// Apply a mutation to a cart and persist the result.
    ///
    /// The cart row is locked for the duration of the transaction, so
    /// concurrent mutations of the same cart are serialized. A mutation that
    /// returns an error leaves the cart untouched.
    ///
    /// # Errors
    ///
    /// Returns `CartOperationError::Cart` if the mutation is rejected,
    /// `CartOperationError::Repository` with `RepositoryError::NotFound` if
    /// the cart doesn't exist, or a database error.
    #[instrument(skip(self, mutate))]
    pub async fn update<F>(&self, cart_id: CartId, mutate: F) -> Result<Cart, CartOperationError>
    where
        F: FnOnce(&mut Cart) -> Result<LineChange, CartError> + Send,
    {
        let mut tx = self.pool.begin().await?;

        let mut cart = lock_cart(&mut tx, cart_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let change = mutate(&mut cart)?;
        persist_line(&mut tx, &cart, &change).await?;
        recalc_cart(&mut tx, &mut cart).await?;

        tx.commit().await?;

        tracing::info!(
            cart_id = %cart.id,
            total_products = cart.total_products,
            final_price = %cart.final_price,
            "Cart updated"
        );
        Ok(cart)
    }
}

/// Recompute a cart's totals from its lines and persist them.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the cart row is gone.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn recalc_cart(conn: &mut PgConnection, cart: &mut Cart) -> Result<(), RepositoryError> {
    cart.recalc();

    let result = sqlx::query(
        r"
        UPDATE shop.cart
        SET total_products = $2, final_price = $3
        WHERE id = $1
        ",
    )
    .bind(cart.id)
    .bind(to_i32(cart.total_products))
    .bind(cart.final_price)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}

/// Load a cart by ID and lock its row until the transaction ends.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a query fails.
pub async fn lock_cart(
    conn: &mut PgConnection,
    cart_id: CartId,
) -> Result<Option<Cart>, RepositoryError> {
    let row = sqlx::query_as::<_, CartRow>(
        r"
        SELECT id, owner_id, total_products, final_price, in_order
        FROM shop.cart
        WHERE id = $1
        FOR UPDATE
        ",
    )
    .bind(cart_id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(row) => Ok(Some(load_cart(conn, row).await?)),
        None => Ok(None),
    }
}

async fn load_cart(conn: &mut PgConnection, row: CartRow) -> Result<Cart, RepositoryError> {
    let lines = sqlx::query_as::<_, CartLineRow>(&format!(
        r"
        SELECT {SUMMARY_COLUMNS}, cp.qty, cp.final_price AS line_price
        FROM shop.cart_product cp
        JOIN shop.product p ON p.id = cp.product_id
        WHERE cp.cart_id = $1
        ORDER BY cp.id
        "
    ))
    .bind(row.id)
    .fetch_all(&mut *conn)
    .await?;

    let lines = lines
        .into_iter()
        .map(|line| {
            Ok(CartLine {
                product: line.product.into(),
                qty: to_u32(line.qty, "cart line quantity")?,
                final_price: line.line_price,
            })
        })
        .collect::<Result<Vec<_>, RepositoryError>>()?;

    Ok(Cart {
        id: row.id,
        owner_id: row.owner_id,
        lines,
        total_products: to_u32(row.total_products, "cart total")?,
        final_price: row.final_price,
        in_order: row.in_order,
    })
}

async fn persist_line(
    conn: &mut PgConnection,
    cart: &Cart,
    change: &LineChange,
) -> Result<(), RepositoryError> {
    match change {
        LineChange::Upserted(line) => {
            sqlx::query(
                r"
                INSERT INTO shop.cart_product (cart_id, customer_id, product_id, qty, final_price)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (cart_id, product_id)
                DO UPDATE SET qty = EXCLUDED.qty, final_price = EXCLUDED.final_price
                ",
            )
            .bind(cart.id)
            .bind(cart.owner_id)
            .bind(line.product.id)
            .bind(to_i32(line.qty))
            .bind(line.final_price)
            .execute(&mut *conn)
            .await?;
        }
        LineChange::Removed(product_id) => {
            sqlx::query("DELETE FROM shop.cart_product WHERE cart_id = $1 AND product_id = $2")
                .bind(cart.id)
                .bind(*product_id)
                .execute(&mut *conn)
                .await?;
        }
    }
    Ok(())
}
