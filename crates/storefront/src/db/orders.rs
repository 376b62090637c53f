//! Order repository.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::instrument;

use techshop_core::{BuyingType, CartId, CustomerId, OrderId, OrderStatus, PhoneNumber};

use super::carts::{CartOperationError, lock_cart};
use super::RepositoryError;
use crate::models::{NewOrder, Order};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    customer_id: CustomerId,
    cart_id: CartId,
    first_name: String,
    last_name: String,
    phone: PhoneNumber,
    address: Option<String>,
    status: OrderStatus,
    buying_type: BuyingType,
    comment: Option<String>,
    order_date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            customer_id: row.customer_id,
            cart_id: row.cart_id,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            address: row.address,
            status: row.status,
            buying_type: row.buying_type,
            comment: row.comment,
            order_date: row.order_date,
            created_at: row.created_at,
        }
    }
}

const ORDER_COLUMNS: &str = "id, customer_id, cart_id, first_name, last_name, phone, address, \
                             status, buying_type, comment, order_date, created_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Turn a cart into an order.
    ///
    /// In one transaction: lock the cart, check it is open and non-empty,
    /// insert the order, mark the cart as ordered and store the contact
    /// details on the customer. Either all writes persist or none does.
    ///
    /// # Errors
    ///
    /// Returns `CartOperationError::Cart` if the cart is empty or already
    /// ordered, `RepositoryError::NotFound` if the cart doesn't exist, or a
    /// database error.
    #[instrument(skip(self, order), fields(buying_type = %order.buying_type))]
    pub async fn place_order(
        &self,
        cart_id: CartId,
        order: &NewOrder,
    ) -> Result<Order, CartOperationError> {
        let mut tx = self.pool.begin().await?;

        let cart = lock_cart(&mut tx, cart_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        cart.ensure_orderable()?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO shop.orders
                (customer_id, cart_id, first_name, last_name, phone, address,
                 status, buying_type, comment, order_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(cart.owner_id)
        .bind(cart.id)
        .bind(&order.first_name)
        .bind(&order.last_name)
        .bind(&order.phone)
        .bind(order.address.as_deref())
        .bind(OrderStatus::New)
        .bind(order.buying_type)
        .bind(order.comment.as_deref())
        .bind(order.order_date)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE shop.cart SET in_order = TRUE WHERE id = $1")
            .bind(cart.id)
            .execute(&mut *tx)
            .await?;

        // The guest keeps the latest contact details they ordered with
        sqlx::query(
            r"
            UPDATE shop.customer
            SET phone = $2, address = COALESCE($3, address)
            WHERE id = $1
            ",
        )
        .bind(cart.owner_id)
        .bind(&order.phone)
        .bind(order.address.as_deref())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let order = Order::from(row);
        tracing::info!(
            order_id = %order.id,
            cart_id = %order.cart_id,
            final_price = %cart.final_price,
            "Order placed"
        );
        Ok(order)
    }

    /// Get the order placed from a cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn by_cart(&self, cart_id: CartId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders WHERE cart_id = $1"
        ))
        .bind(cart_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    /// All orders of a customer, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders WHERE customer_id = $1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }
}
