//! Request-boundary validation.
//!
//! Explicit functions instead of declarative annotations; each returns a
//! typed `Validation` error that the error layer maps to a 400.

use rust_decimal::Decimal;

use orderflow_core::domain::{NewItem, NewOrder, NewOrderLine};
use orderflow_core::error::DomainError;

/// Maximum length for an item name.
pub const MAX_ITEM_NAME_LEN: usize = 128;

/// Validates an item create/update body.
///
/// # Errors
///
/// `Validation` if the name is blank or too long, or the price is not
/// strictly positive.
pub fn validate_item(item: &NewItem) -> Result<(), DomainError> {
    if item.name.trim().is_empty() {
        return Err(DomainError::Validation("item name cannot be blank".into()));
    }
    if item.name.chars().count() > MAX_ITEM_NAME_LEN {
        return Err(DomainError::Validation(format!(
            "item name must be at most {MAX_ITEM_NAME_LEN} characters"
        )));
    }
    if item.price <= Decimal::ZERO {
        return Err(DomainError::Validation(
            "item price must be greater than 0".into(),
        ));
    }
    Ok(())
}

/// Validates an order create/update body.
///
/// # Errors
///
/// `Validation` if the order has no lines or any line is invalid.
pub fn validate_order(order: &NewOrder) -> Result<(), DomainError> {
    if order.lines.is_empty() {
        return Err(DomainError::Validation(
            "order must contain at least one line".into(),
        ));
    }
    for line in &order.lines {
        validate_line(*line)?;
    }
    Ok(())
}

/// Validates one order line.
///
/// # Errors
///
/// `Validation` if the quantity is below 1.
pub fn validate_line(line: NewOrderLine) -> Result<(), DomainError> {
    if line.quantity < 1 {
        return Err(DomainError::Validation(
            "line quantity must be at least 1".into(),
        ));
    }
    Ok(())
}

/// Validates the statuses filter of the filtered order listing.
///
/// # Errors
///
/// `Validation` if no status value was supplied.
pub fn validate_statuses(statuses: &[String]) -> Result<(), DomainError> {
    if statuses.is_empty() {
        return Err(DomainError::Validation(
            "statuses list cannot be empty".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, price: &str) -> NewItem {
        NewItem {
            name: name.to_string(),
            price: price.parse().unwrap(),
        }
    }

    #[test]
    fn test_item_name_must_not_be_blank() {
        assert!(validate_item(&item("  ", "1.00")).is_err());
        assert!(validate_item(&item("widget", "1.00")).is_ok());
    }

    #[test]
    fn test_item_name_boundary_is_128_chars() {
        assert!(validate_item(&item(&"x".repeat(128), "1.00")).is_ok());
        assert!(validate_item(&item(&"x".repeat(129), "1.00")).is_err());
    }

    #[test]
    fn test_item_price_must_be_positive() {
        assert!(validate_item(&item("widget", "0.00")).is_err());
        assert!(validate_item(&item("widget", "-1.00")).is_err());
        assert!(validate_item(&item("widget", "0.01")).is_ok());
    }

    #[test]
    fn test_order_requires_lines_with_positive_quantity() {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let empty = NewOrder {
            user_id: 1,
            creation_date: date,
            lines: vec![],
        };
        assert!(validate_order(&empty).is_err());

        let zero_quantity = NewOrder {
            user_id: 1,
            creation_date: date,
            lines: vec![NewOrderLine {
                item_id: 1,
                quantity: 0,
            }],
        };
        assert!(validate_order(&zero_quantity).is_err());

        let valid = NewOrder {
            user_id: 1,
            creation_date: date,
            lines: vec![NewOrderLine {
                item_id: 1,
                quantity: 1,
            }],
        };
        assert!(validate_order(&valid).is_ok());
    }

    #[test]
    fn test_statuses_must_not_be_empty() {
        assert!(validate_statuses(&[]).is_err());
        assert!(validate_statuses(&["PAID".to_string()]).is_ok());
    }
}
