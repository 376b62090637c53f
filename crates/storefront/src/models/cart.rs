//! Shopping cart domain model.
//!
//! A cart holds at most one line per product. The cart's aggregate fields
//! (`total_products`, `final_price`) are derived from its lines and are
//! recomputed with [`Cart::recalc`] after every mutation, never adjusted
//! incrementally.

use thiserror::Error;

use techshop_core::{CartId, CustomerId, Price, ProductId};

use super::catalog::ProductSummary;

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QTY: u32 = 999;

/// Largest cart total in cents; cart prices are `NUMERIC(14, 2)`.
pub const MAX_CART_TOTAL_CENTS: i64 = 99_999_999_999_999;

/// Errors from cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The product has no line in this cart.
    #[error("product {0} is not in the cart")]
    LineNotFound(String),

    /// Quantity outside `1..=MAX_LINE_QTY`.
    #[error("quantity must be between 1 and {MAX_LINE_QTY} (got {0})")]
    InvalidQuantity(i64),

    /// Checkout was attempted with no lines.
    #[error("the cart is empty")]
    EmptyCart,

    /// The cart was already turned into an order.
    #[error("the cart has already been ordered")]
    AlreadyOrdered,

    /// The change would push the cart total past [`MAX_CART_TOTAL_CENTS`].
    #[error("the cart total cannot exceed {}", Price::from_cents(MAX_CART_TOTAL_CENTS))]
    TotalTooLarge,
}

/// One product in a cart with its quantity and line price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product: ProductSummary,
    pub qty: u32,
    /// `qty × product.price`
    pub final_price: Price,
}

impl CartLine {
    /// Create a line for `qty` units of `product`.
    #[must_use]
    pub fn new(product: ProductSummary, qty: u32) -> Self {
        let final_price = product.price.times(qty);
        Self {
            product,
            qty,
            final_price,
        }
    }

    fn set_qty(&mut self, qty: u32) {
        self.qty = qty;
        self.final_price = self.product.price.times(qty);
    }
}

/// A line-level change produced by a cart mutation, to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineChange {
    /// The line was created or its quantity changed.
    Upserted(CartLine),
    /// The line for this product was deleted.
    Removed(ProductId),
}

/// Aggregate totals of a set of cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    /// Sum of line quantities.
    pub total_products: u32,
    /// Sum of line prices.
    pub final_price: Price,
}

impl CartTotals {
    /// Sum quantities and line prices over `lines`.
    #[must_use]
    pub fn compute(lines: &[CartLine]) -> Self {
        Self {
            total_products: lines.iter().map(|line| line.qty).sum(),
            final_price: lines.iter().map(|line| line.final_price).sum(),
        }
    }
}

/// A customer's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub id: CartId,
    pub owner_id: CustomerId,
    pub lines: Vec<CartLine>,
    pub total_products: u32,
    pub final_price: Price,
    /// Set once the cart has been turned into an order.
    pub in_order: bool,
}

impl Cart {
    /// An empty open cart.
    #[must_use]
    pub const fn new(id: CartId, owner_id: CustomerId) -> Self {
        Self {
            id,
            owner_id,
            lines: Vec::new(),
            total_products: 0,
            final_price: Price::ZERO,
            in_order: false,
        }
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line for a product, if present.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == product_id)
    }

    /// Recompute `total_products` and `final_price` from the lines.
    pub fn recalc(&mut self) {
        let totals = CartTotals::compute(&self.lines);
        self.total_products = totals.total_products;
        self.final_price = totals.final_price;
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line's quantity, or creates a line with
    /// quantity 1.
    ///
    /// # Errors
    ///
    /// Returns `CartError::AlreadyOrdered` for a finalized cart,
    /// `CartError::InvalidQuantity` if the line would exceed [`MAX_LINE_QTY`]
    /// and `CartError::TotalTooLarge` if the cart total would overflow.
    pub fn add_product(&mut self, product: ProductSummary) -> Result<LineChange, CartError> {
        self.ensure_open()?;

        let qty = self.line(product.id).map_or(1, |line| line.qty + 1);
        if qty > MAX_LINE_QTY {
            return Err(CartError::InvalidQuantity(i64::from(qty)));
        }
        self.ensure_total_fits(product.id, product.price.times(qty))?;

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product.id == product.id)
        {
            line.set_qty(qty);
            return Ok(LineChange::Upserted(line.clone()));
        }

        let line = CartLine::new(product, 1);
        self.lines.push(line.clone());
        Ok(LineChange::Upserted(line))
    }

    /// Set the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `qty` is outside
    /// `1..=MAX_LINE_QTY`, `CartError::LineNotFound` if the product is not in
    /// the cart, `CartError::TotalTooLarge` if the cart total would overflow
    /// and `CartError::AlreadyOrdered` for a finalized cart.
    pub fn set_quantity(
        &mut self,
        product: &ProductSummary,
        qty: u32,
    ) -> Result<LineChange, CartError> {
        self.ensure_open()?;

        if !(1..=MAX_LINE_QTY).contains(&qty) {
            return Err(CartError::InvalidQuantity(i64::from(qty)));
        }

        let unit_price = self
            .line(product.id)
            .ok_or_else(|| CartError::LineNotFound(product.slug.clone()))?
            .product
            .price;
        self.ensure_total_fits(product.id, unit_price.times(qty))?;

        let line = self
            .lines
            .iter_mut()
            .find(|line| line.product.id == product.id)
            .ok_or_else(|| CartError::LineNotFound(product.slug.clone()))?;
        line.set_qty(qty);
        Ok(LineChange::Upserted(line.clone()))
    }

    /// Remove a product's line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` if the product is not in the cart
    /// and `CartError::AlreadyOrdered` for a finalized cart.
    pub fn remove_product(&mut self, product: &ProductSummary) -> Result<LineChange, CartError> {
        self.ensure_open()?;

        let index = self
            .lines
            .iter()
            .position(|line| line.product.id == product.id)
            .ok_or_else(|| CartError::LineNotFound(product.slug.clone()))?;
        self.lines.remove(index);
        Ok(LineChange::Removed(product.id))
    }

    /// Check that the cart can be turned into an order.
    ///
    /// # Errors
    ///
    /// Returns `CartError::AlreadyOrdered` or `CartError::EmptyCart`.
    pub fn ensure_orderable(&self) -> Result<(), CartError> {
        self.ensure_open()?;
        if self.is_empty() {
            return Err(CartError::EmptyCart);
        }
        Ok(())
    }

    /// Check the cart total with `product_id`'s line priced at `line_price`.
    fn ensure_total_fits(&self, product_id: ProductId, line_price: Price) -> Result<(), CartError> {
        let others: Price = self
            .lines
            .iter()
            .filter(|line| line.product.id != product_id)
            .map(|line| line.final_price)
            .sum();
        if others + line_price > Price::from_cents(MAX_CART_TOTAL_CENTS) {
            return Err(CartError::TotalTooLarge);
        }
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), CartError> {
        if self.in_order {
            return Err(CartError::AlreadyOrdered);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use techshop_core::ProductKind;

    use super::*;
    use crate::models::catalog::MAX_PRODUCT_PRICE_CENTS;
    use crate::models::catalog::fixtures::summary;

    fn empty_cart() -> Cart {
        Cart::new(CartId::new(1), CustomerId::new(1))
    }

    /// Total price must equal Σ price × qty over the lines.
    fn assert_totals_consistent(cart: &Cart) {
        let expected_price: Price = cart
            .lines
            .iter()
            .map(|line| line.product.price.times(line.qty))
            .sum();
        let expected_qty: u32 = cart.lines.iter().map(|line| line.qty).sum();
        assert_eq!(cart.final_price, expected_price);
        assert_eq!(cart.total_products, expected_qty);
    }

    #[test]
    fn test_compute_empty() {
        assert_eq!(CartTotals::compute(&[]), CartTotals::default());
    }

    #[test]
    fn test_compute_sums_lines() {
        let lines = [
            CartLine::new(summary(1, ProductKind::Notebook, "zenbook", 99_900), 2),
            CartLine::new(summary(2, ProductKind::Smartphone, "pixel", 49_950), 1),
        ];
        let totals = CartTotals::compute(&lines);
        assert_eq!(totals.total_products, 3);
        assert_eq!(totals.final_price, Price::from_cents(249_750));
    }

    #[test]
    fn test_add_same_product_twice_increments_quantity() {
        let mut cart = empty_cart();
        let phone = summary(1, ProductKind::Smartphone, "pixel", 50_000);

        cart.add_product(phone.clone()).unwrap();
        let change = cart.add_product(phone.clone()).unwrap();
        cart.recalc();

        assert_eq!(cart.lines.len(), 1);
        let line = cart.line(phone.id).unwrap();
        assert_eq!(line.qty, 2);
        assert_eq!(line.final_price, Price::from_cents(100_000));
        assert_eq!(change, LineChange::Upserted(line.clone()));
        assert_totals_consistent(&cart);
    }

    #[test]
    fn test_add_different_products() {
        let mut cart = empty_cart();
        cart.add_product(summary(1, ProductKind::Smartphone, "pixel", 50_000))
            .unwrap();
        cart.add_product(summary(2, ProductKind::Notebook, "zenbook", 120_000))
            .unwrap();
        cart.recalc();

        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.total_products, 2);
        assert_eq!(cart.final_price, Price::from_cents(170_000));
        assert_totals_consistent(&cart);
    }

    #[test]
    fn test_add_beyond_max_quantity() {
        let mut cart = empty_cart();
        let phone = summary(1, ProductKind::Smartphone, "pixel", 100);
        cart.add_product(phone.clone()).unwrap();
        cart.set_quantity(&phone, MAX_LINE_QTY).unwrap();

        assert_eq!(
            cart.add_product(phone),
            Err(CartError::InvalidQuantity(i64::from(MAX_LINE_QTY + 1)))
        );
    }

    #[test]
    fn test_set_quantity_updates_line_price() {
        let mut cart = empty_cart();
        let notebook = summary(1, ProductKind::Notebook, "zenbook", 99_999);
        cart.add_product(notebook.clone()).unwrap();

        cart.set_quantity(&notebook, 3).unwrap();
        cart.recalc();

        assert_eq!(cart.line(notebook.id).unwrap().qty, 3);
        assert_eq!(cart.final_price, Price::from_cents(299_997));
        assert_totals_consistent(&cart);
    }

    #[test]
    fn test_set_quantity_rejects_zero() {
        let mut cart = empty_cart();
        let notebook = summary(1, ProductKind::Notebook, "zenbook", 100);
        cart.add_product(notebook.clone()).unwrap();

        assert_eq!(
            cart.set_quantity(&notebook, 0),
            Err(CartError::InvalidQuantity(0))
        );
        assert_eq!(cart.line(notebook.id).unwrap().qty, 1);
    }

    #[test]
    fn test_set_quantity_missing_line() {
        let mut cart = empty_cart();
        let notebook = summary(1, ProductKind::Notebook, "zenbook", 100);
        assert_eq!(
            cart.set_quantity(&notebook, 2),
            Err(CartError::LineNotFound("zenbook".to_owned()))
        );
    }

    #[test]
    fn test_remove_product() {
        let mut cart = empty_cart();
        let phone = summary(1, ProductKind::Smartphone, "pixel", 50_000);
        let notebook = summary(2, ProductKind::Notebook, "zenbook", 120_000);
        cart.add_product(phone.clone()).unwrap();
        cart.add_product(notebook.clone()).unwrap();
        cart.recalc();

        let change = cart.remove_product(&phone).unwrap();
        cart.recalc();

        assert_eq!(change, LineChange::Removed(phone.id));
        assert!(cart.line(phone.id).is_none());
        assert_eq!(cart.total_products, 1);
        assert_eq!(cart.final_price, Price::from_cents(120_000));
        assert_totals_consistent(&cart);
    }

    #[test]
    fn test_remove_last_product_zeroes_totals() {
        let mut cart = empty_cart();
        let phone = summary(1, ProductKind::Smartphone, "pixel", 50_000);
        cart.add_product(phone.clone()).unwrap();
        cart.recalc();
        cart.remove_product(&phone).unwrap();
        cart.recalc();

        assert!(cart.is_empty());
        assert_eq!(cart.total_products, 0);
        assert_eq!(cart.final_price, Price::ZERO);
    }

    #[test]
    fn test_remove_missing_line() {
        let mut cart = empty_cart();
        let phone = summary(1, ProductKind::Smartphone, "pixel", 50_000);
        assert_eq!(
            cart.remove_product(&phone),
            Err(CartError::LineNotFound("pixel".to_owned()))
        );
    }

    #[test]
    fn test_ordered_cart_rejects_mutation() {
        let mut cart = empty_cart();
        let phone = summary(1, ProductKind::Smartphone, "pixel", 50_000);
        cart.add_product(phone.clone()).unwrap();
        cart.in_order = true;

        assert_eq!(
            cart.add_product(phone.clone()),
            Err(CartError::AlreadyOrdered)
        );
        assert_eq!(cart.set_quantity(&phone, 2), Err(CartError::AlreadyOrdered));
        assert_eq!(cart.remove_product(&phone), Err(CartError::AlreadyOrdered));
    }

    #[test]
    fn test_max_priced_line_at_max_quantity_fits() {
        let mut cart = empty_cart();
        let server = summary(1, ProductKind::Notebook, "server", MAX_PRODUCT_PRICE_CENTS);
        cart.add_product(server.clone()).unwrap();

        cart.set_quantity(&server, MAX_LINE_QTY).unwrap();
        cart.recalc();

        assert!(cart.final_price <= Price::from_cents(MAX_CART_TOTAL_CENTS));
        assert_totals_consistent(&cart);
    }

    #[test]
    fn test_total_past_limit_is_rejected() {
        let mut cart = empty_cart();
        let products: Vec<_> = (1..=11)
            .map(|id| {
                let slug = format!("server-{id}");
                summary(id, ProductKind::Notebook, &slug, MAX_PRODUCT_PRICE_CENTS)
            })
            .collect();
        for product in &products {
            cart.add_product(product.clone()).unwrap();
        }
        for product in &products[..10] {
            cart.set_quantity(product, MAX_LINE_QTY).unwrap();
        }
        cart.recalc();
        let before = cart.clone();

        assert_eq!(
            cart.set_quantity(&products[10], MAX_LINE_QTY),
            Err(CartError::TotalTooLarge)
        );
        assert_eq!(cart, before);
        assert_totals_consistent(&cart);
    }

    #[test]
    fn test_ensure_orderable() {
        let mut cart = empty_cart();
        assert_eq!(cart.ensure_orderable(), Err(CartError::EmptyCart));

        cart.add_product(summary(1, ProductKind::Smartphone, "pixel", 50_000))
            .unwrap();
        assert_eq!(cart.ensure_orderable(), Ok(()));

        cart.in_order = true;
        assert_eq!(cart.ensure_orderable(), Err(CartError::AlreadyOrdered));
    }
}
