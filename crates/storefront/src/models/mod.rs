//! Domain models for the storefront.
//!
//! These types represent validated domain objects, separate from the
//! database row types in [`crate::db`].

pub mod cart;
pub mod catalog;
pub mod customer;
pub mod order;
pub mod session;

pub use cart::{Cart, CartError, CartLine, CartTotals, LineChange};
pub use catalog::{
    Category, CategoryWithCount, NewProduct, NotebookSpecs, Product, ProductSpecs,
    ProductSummary, SmartphoneSpecs,
};
pub use customer::Customer;
pub use order::{NewOrder, Order, OrderForm, OrderFormError};
pub use session::{FlashLevel, FlashMessage, keys as session_keys};
