//! Human-readable reference numbers for invoices and purchase orders.
//!
//! Format: a two-letter prefix, the last eight digits of the current unix
//! millisecond timestamp, and two random digits. Uniqueness is enforced by
//! the database; the random suffix keeps same-millisecond collisions rare.

use chrono::Utc;
use rand::Rng;

/// Generate an order invoice number (`SD…`).
#[must_use]
pub fn invoice_number() -> String {
    reference_with_prefix("SD")
}

/// Generate a procurement order number (`PO…`).
#[must_use]
pub fn purchase_order_number() -> String {
    reference_with_prefix("PO")
}

fn reference_with_prefix(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis().to_string();
    let tail = &millis[millis.len().saturating_sub(8)..];
    let suffix: u32 = rand::rng().random_range(0..100);
    format!("{prefix}{tail}{suffix:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_number_format() {
        let n = invoice_number();
        assert!(n.starts_with("SD"));
        assert_eq!(n.len(), 12);
        assert!(n[2..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_purchase_order_number_format() {
        let n = purchase_order_number();
        assert!(n.starts_with("PO"));
        assert_eq!(n.len(), 12);
        assert!(n[2..].chars().all(|c| c.is_ascii_digit()));
    }
}
