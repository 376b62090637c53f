//! Core types for Techshop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod kind;
pub mod phone;
pub mod price;
pub mod status;

pub use id::*;
pub use kind::{ParseKindError, ProductKind};
pub use phone::{PhoneError, PhoneNumber};
pub use price::Price;
pub use status::*;
