//! Payout methods and payments

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use kernel::id::{ConversionId, PaymentId, PaymentMethodId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::round2;
use crate::domain::value_object::payment_status::PaymentStatus;
use crate::error::{AffiliateError, AffiliateResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    Paypal,
    BankTransfer,
    Pix,
    Crypto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: PaymentMethodType,
    /// Method specific fields (PIX key, PayPal email, wallet address)
    pub details: BTreeMap<String, String>,
    pub is_default: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub user_id: UserId,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_method_id: PaymentMethodId,

    /// Conversions settled by this payment
    pub conversions: Vec<ConversionId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_fee: Option<f64>,
    pub net_amount: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_response: Option<serde_json::Value>,

    pub requested_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Request a payout
    pub fn request(
        user_id: UserId,
        payment_method_id: PaymentMethodId,
        amount: f64,
        currency: impl Into<String>,
        processing_fee: Option<f64>,
        conversions: Vec<ConversionId>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut payment = Self {
            id: PaymentId::generate(),
            user_id,
            amount,
            currency: currency.into(),
            status: PaymentStatus::Pending,
            payment_method_id,
            conversions,
            processing_fee,
            net_amount: 0.0,
            transaction_id: None,
            gateway_response: None,
            requested_at: now,
            processed_at: None,
            completed_at: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        payment.net_amount = payment.fee_adjusted();
        payment
    }

    /// Amount after the processing fee, never negative
    pub fn fee_adjusted(&self) -> f64 {
        round2((self.amount - self.processing_fee.unwrap_or(0.0)).max(0.0))
    }

    /// Advance the payment; terminal states are final
    pub fn transition_to(&mut self, next: PaymentStatus, now: DateTime<Utc>) -> AffiliateResult<()> {
        if self.status.is_terminal() || self.status == next {
            return Err(AffiliateError::invalid(
                "status",
                format!("Payment cannot move from {} to {}", self.status, next),
            ));
        }

        match next {
            PaymentStatus::Processing => self.processed_at = Some(now),
            PaymentStatus::Completed => {
                self.processed_at.get_or_insert(now);
                self.completed_at = Some(now);
            }
            _ => {}
        }

        self.status = next;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(fee: Option<f64>) -> Payment {
        Payment::request(
            UserId::from_suffix(2),
            PaymentMethodId::from_suffix(1),
            149.74,
            "BRL",
            fee,
            vec![ConversionId::from_suffix(1)],
            Utc::now(),
        )
    }

    #[test]
    fn test_fee_adjusted() {
        assert_eq!(payment(None).net_amount, 149.74);
        assert_eq!(payment(Some(4.5)).net_amount, 145.24);
        assert_eq!(payment(Some(500.0)).net_amount, 0.0);
    }

    #[test]
    fn test_transitions() {
        let mut payment = payment(Some(1.0));
        let now = Utc::now();

        payment.transition_to(PaymentStatus::Processing, now).unwrap();
        assert_eq!(payment.processed_at, Some(now));

        payment.transition_to(PaymentStatus::Completed, now).unwrap();
        assert_eq!(payment.completed_at, Some(now));
        assert!(payment.status.is_terminal());

        assert!(payment.transition_to(PaymentStatus::Failed, now).is_err());
    }

    #[test]
    fn test_method_type_codes() {
        let json = serde_json::to_value(PaymentMethodType::BankTransfer).unwrap();
        assert_eq!(json, "bank_transfer");
        let pix: PaymentMethodType = serde_json::from_str(r#""pix""#).unwrap();
        assert_eq!(pix, PaymentMethodType::Pix);
    }
}
