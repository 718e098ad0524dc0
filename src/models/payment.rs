use serde::{Deserialize, Serialize};

use crate::utils::format_money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "Pending"),
            PaymentStatus::Completed => write!(f, "Completed"),
            PaymentStatus::Failed => write!(f, "Failed"),
            PaymentStatus::Refunded => write!(f, "Refunded"),
        }
    }
}

/// A payment record attached to a reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    #[serde(rename = "reservationId")]
    pub reservation_id: i64,
    pub amount: f64,
    #[serde(default)]
    pub currency: String,
    pub status: PaymentStatus,
    #[serde(rename = "transactionId", default)]
    pub transaction_id: String,
    #[serde(rename = "paymentMethod", default)]
    pub payment_method: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
}

impl Payment {
    pub fn amount_label(&self) -> String {
        let currency = if self.currency.is_empty() {
            "USD"
        } else {
            &self.currency
        };
        format_money(self.amount, currency)
    }
}

/// Request body for POST /Payment.
#[derive(Debug, Clone, Serialize)]
pub struct NewPayment {
    #[serde(rename = "reservationId")]
    pub reservation_id: i64,
    pub amount: f64,
    pub currency: String,
    #[serde(rename = "paymentMethod")]
    pub payment_method: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payment() {
        let json = r#"{
            "id": 3,
            "reservationId": 42,
            "amount": 50.0,
            "currency": "USD",
            "status": "Completed",
            "transactionId": "txn_8831",
            "paymentMethod": "credit",
            "createdAt": "2026-03-01T10:05:00Z"
        }"#;
        let p: Payment = serde_json::from_str(json).expect("Failed to parse payment");
        assert_eq!(p.status, PaymentStatus::Completed);
        assert_eq!(p.amount_label(), "50.00 USD");
    }

    #[test]
    fn test_amount_label_defaults_currency() {
        let json = r#"{"id": 1, "reservationId": 2, "amount": 9.5, "status": "Pending"}"#;
        let p: Payment = serde_json::from_str(json).expect("parse");
        assert_eq!(p.amount_label(), "9.50 USD");
    }
}
