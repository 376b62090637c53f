//! Status enums for orders.

use serde::{Deserialize, Serialize};

/// Order processing status.
///
/// Every order starts as [`OrderStatus::New`]; shop staff move it forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    New,
    InProgress,
    IsReady,
    Completed,
}

impl OrderStatus {
    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::New => "New order",
            Self::InProgress => "Order in progress",
            Self::IsReady => "Order is ready",
            Self::Completed => "Order completed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::InProgress => write!(f, "in_progress"),
            Self::IsReady => write!(f, "is_ready"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "in_progress" => Ok(Self::InProgress),
            "is_ready" => Ok(Self::IsReady),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.buying_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum BuyingType {
    /// Customer picks the order up at the shop.
    #[default]
    #[cfg_attr(feature = "postgres", sqlx(rename = "self"))]
    #[serde(rename = "self")]
    SelfPickup,
    /// The shop delivers to the customer's address.
    Delivery,
}

impl BuyingType {
    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SelfPickup => "Self pickup",
            Self::Delivery => "Delivery",
        }
    }
}

impl std::fmt::Display for BuyingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelfPickup => write!(f, "self"),
            Self::Delivery => write!(f, "delivery"),
        }
    }
}

impl std::str::FromStr for BuyingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "self" => Ok(Self::SelfPickup),
            "delivery" => Ok(Self::Delivery),
            _ => Err(format!("invalid buying type: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_default_is_new() {
        assert_eq!(OrderStatus::default(), OrderStatus::New);
    }

    #[test]
    fn test_order_status_display_parse() {
        for status in [
            OrderStatus::New,
            OrderStatus::InProgress,
            OrderStatus::IsReady,
            OrderStatus::Completed,
        ] {
            assert_eq!(status.to_string().parse::<OrderStatus>(), Ok(status));
        }
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_buying_type_wire_names() {
        assert_eq!("self".parse::<BuyingType>(), Ok(BuyingType::SelfPickup));
        assert_eq!("delivery".parse::<BuyingType>(), Ok(BuyingType::Delivery));
        assert!("courier".parse::<BuyingType>().is_err());
    }

    #[test]
    fn test_buying_type_serde() {
        let json = serde_json::to_string(&BuyingType::SelfPickup).unwrap_or_default();
        assert_eq!(json, "\"self\"");
    }
}
