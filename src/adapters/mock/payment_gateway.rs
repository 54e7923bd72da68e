use crate::domain::value_objects::{PatronId, TransactionId};
use crate::ports::payment_gateway::{
    PaymentDecision, PaymentGateway, PaymentStatus, RefundDecision, Result,
};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Largest amount the gateway accepts in a single payment.
const PAYMENT_AMOUNT_LIMIT: Decimal = dec!(1000);

/// Mock implementation of PaymentGateway
///
/// Simulates a synchronous remote payment service. Validates inputs,
/// synthesizes transaction identifiers, and keeps no transaction ledger:
/// any well-formed transaction id verifies as completed forever.
pub struct MockPaymentGateway;

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MockPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    /// Validate the request and synthesize a transaction id
    async fn process_payment(
        &self,
        patron_id: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<PaymentDecision> {
        let Ok(patron) = PatronId::parse(patron_id) else {
            return Ok(PaymentDecision::Declined {
                message: "Invalid patron ID. Must be exactly 6 digits.".to_string(),
            });
        };

        if amount <= Decimal::ZERO {
            return Ok(PaymentDecision::Declined {
                message: "Payment amount must be greater than 0.".to_string(),
            });
        }

        if amount > PAYMENT_AMOUNT_LIMIT {
            return Ok(PaymentDecision::Declined {
                message: "Payment declined: amount exceeds the $1000 limit.".to_string(),
            });
        }

        let transaction_id =
            TransactionId::synthesize(&patron, Uuid::new_v4().simple().to_string().as_str());
        tracing::debug!(%transaction_id, %amount, description, "payment processed");

        Ok(PaymentDecision::Approved {
            message: format!("Payment of ${:.2} processed successfully.", amount),
            transaction_id,
        })
    }

    /// Validate the refund request; no ledger is consulted
    async fn refund_payment(
        &self,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<RefundDecision> {
        if TransactionId::parse(transaction_id).is_err() {
            return Ok(RefundDecision::Declined {
                message: "Invalid transaction ID format.".to_string(),
            });
        }

        if amount <= Decimal::ZERO {
            return Ok(RefundDecision::Declined {
                message: "Refund amount must be greater than 0.".to_string(),
            });
        }

        tracing::debug!(transaction_id, %amount, "refund processed");

        Ok(RefundDecision::Approved {
            message: format!("Refund of ${:.2} processed successfully.", amount),
        })
    }

    /// Any syntactically valid transaction id reports as completed
    async fn verify_payment_status(&self, transaction_id: &str) -> Result<PaymentStatus> {
        if TransactionId::parse(transaction_id).is_ok() {
            Ok(PaymentStatus::Completed {
                checked_at: Utc::now(),
            })
        } else {
            Ok(PaymentStatus::NotFound {
                message: "Transaction not found.".to_string(),
            })
        }
    }
}
