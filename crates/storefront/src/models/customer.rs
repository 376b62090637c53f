//! Customer domain type.

use chrono::{DateTime, Utc};

use techshop_core::CustomerId;

/// A guest customer. Contact details are filled in from their latest order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}
