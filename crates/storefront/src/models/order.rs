//! Order domain types and checkout form validation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;

use techshop_core::{BuyingType, CartId, CustomerId, OrderId, OrderStatus, PhoneError, PhoneNumber};

/// A placed order: a snapshot of the customer's contact and delivery details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub cart_id: CartId,
    pub first_name: String,
    pub last_name: String,
    pub phone: PhoneNumber,
    pub address: Option<String>,
    pub status: OrderStatus,
    pub buying_type: BuyingType,
    pub comment: Option<String>,
    /// Date the customer wants to receive the order.
    pub order_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Errors from checkout form validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderFormError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),

    #[error("unknown buying type: {0}")]
    InvalidBuyingType(String),

    #[error("invalid order date: {0}")]
    InvalidDate(String),

    #[error("order date cannot be in the past")]
    DateInPast,

    #[error("an address is required for delivery")]
    AddressRequired,
}

/// Raw checkout form as submitted by the browser.
///
/// Every field defaults to empty so that missing fields surface as
/// validation errors rather than extractor rejections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub buying_type: String,
    pub order_date: String,
    pub comment: String,
}

/// A validated order, ready to be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub first_name: String,
    pub last_name: String,
    pub phone: PhoneNumber,
    pub address: Option<String>,
    pub buying_type: BuyingType,
    pub comment: Option<String>,
    pub order_date: NaiveDate,
}

impl OrderForm {
    /// Validate the form against today's date.
    ///
    /// # Errors
    ///
    /// Returns the first `OrderFormError` found, checking fields in form order.
    pub fn validate(&self, today: NaiveDate) -> Result<NewOrder, OrderFormError> {
        let first_name = required(&self.first_name, "first name")?;
        let last_name = required(&self.last_name, "last name")?;
        let phone = PhoneNumber::parse(required(&self.phone, "phone")?)?;

        let buying_type = self
            .buying_type
            .trim()
            .parse::<BuyingType>()
            .map_err(|_| OrderFormError::InvalidBuyingType(self.buying_type.clone()))?;

        let address = optional(&self.address);
        if buying_type == BuyingType::Delivery && address.is_none() {
            return Err(OrderFormError::AddressRequired);
        }

        let order_date = required(&self.order_date, "order date")?;
        let order_date = NaiveDate::parse_from_str(order_date, "%Y-%m-%d")
            .map_err(|e| OrderFormError::InvalidDate(e.to_string()))?;
        if order_date < today {
            return Err(OrderFormError::DateInPast);
        }

        Ok(NewOrder {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            phone,
            address,
            buying_type,
            comment: optional(&self.comment),
            order_date,
        })
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, OrderFormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(OrderFormError::MissingField(field));
    }
    Ok(value)
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn valid_form() -> OrderForm {
        OrderForm {
            first_name: " Ada ".to_owned(),
            last_name: "Lovelace".to_owned(),
            phone: "+44 20 7946 0958".to_owned(),
            address: String::new(),
            buying_type: "self".to_owned(),
            order_date: "2026-03-12".to_owned(),
            comment: "  ".to_owned(),
        }
    }

    #[test]
    fn test_valid_pickup_order() {
        let order = valid_form().validate(today()).unwrap();
        assert_eq!(order.first_name, "Ada");
        assert_eq!(order.buying_type, BuyingType::SelfPickup);
        assert_eq!(order.address, None);
        assert_eq!(order.comment, None);
        assert_eq!(order.order_date, NaiveDate::from_ymd_opt(2026, 3, 12).unwrap());
    }

    #[test]
    fn test_order_for_today_is_allowed() {
        let form = OrderForm {
            order_date: "2026-03-10".to_owned(),
            ..valid_form()
        };
        assert!(form.validate(today()).is_ok());
    }

    #[test]
    fn test_missing_names() {
        let form = OrderForm {
            first_name: "   ".to_owned(),
            ..valid_form()
        };
        assert_eq!(
            form.validate(today()),
            Err(OrderFormError::MissingField("first name"))
        );

        let form = OrderForm {
            last_name: String::new(),
            ..valid_form()
        };
        assert_eq!(
            form.validate(today()),
            Err(OrderFormError::MissingField("last name"))
        );
    }

    #[test]
    fn test_invalid_phone() {
        let form = OrderForm {
            phone: "call me".to_owned(),
            ..valid_form()
        };
        assert!(matches!(
            form.validate(today()),
            Err(OrderFormError::InvalidPhone(_))
        ));
    }

    #[test]
    fn test_delivery_requires_address() {
        let form = OrderForm {
            buying_type: "delivery".to_owned(),
            ..valid_form()
        };
        assert_eq!(form.validate(today()), Err(OrderFormError::AddressRequired));

        let form = OrderForm {
            buying_type: "delivery".to_owned(),
            address: "221B Baker Street".to_owned(),
            ..valid_form()
        };
        let order = form.validate(today()).unwrap();
        assert_eq!(order.address.as_deref(), Some("221B Baker Street"));
    }

    #[test]
    fn test_unknown_buying_type() {
        let form = OrderForm {
            buying_type: "drone".to_owned(),
            ..valid_form()
        };
        assert_eq!(
            form.validate(today()),
            Err(OrderFormError::InvalidBuyingType("drone".to_owned()))
        );
    }

    #[test]
    fn test_bad_and_past_dates() {
        let form = OrderForm {
            order_date: "12/03/2026".to_owned(),
            ..valid_form()
        };
        assert!(matches!(
            form.validate(today()),
            Err(OrderFormError::InvalidDate(_))
        ));

        let form = OrderForm {
            order_date: "2026-03-09".to_owned(),
            ..valid_form()
        };
        assert_eq!(form.validate(today()), Err(OrderFormError::DateInPast));
    }

    #[test]
    fn test_missing_fields_deserialize_to_empty() {
        let form: OrderForm = serde_json::from_str(r#"{"first_name":"Ada"}"#).unwrap();
        assert_eq!(form.first_name, "Ada");
        assert!(form.phone.is_empty());
    }
}
