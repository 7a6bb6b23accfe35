//! Wire messages exchanged over the order and payment topics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event published to the orders topic after every order create or update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderMessage {
    /// The order the event describes.
    pub order_id: i64,
    /// The order's owning user.
    pub user_id: i64,
    /// Total amount over all resolvable lines, in decimal precision.
    pub total_amount: Decimal,
}

/// Inbound payment lifecycle event from the payments topic.
///
/// Not persisted by this service; consumed to drive order status
/// transitions. Producers on the payments topic spell field names in
/// either snake_case or camelCase; both decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMessage {
    /// Identity of the payment record in the payment service.
    #[serde(alias = "paymentId")]
    pub payment_id: Uuid,
    /// The order the payment settles.
    #[serde(alias = "orderId")]
    pub order_id: i64,
    /// The paying user.
    #[serde(alias = "userId")]
    pub user_id: i64,
    /// Payment lifecycle status as spelled by the producer.
    pub status: String,
    /// Amount paid.
    pub amount: Decimal,
}

/// Recognized payment lifecycle stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    /// A payment record was created and awaits resolution.
    Created,
    /// The payment settled.
    Success,
    /// The payment failed.
    Failed,
}

impl PaymentStatus {
    /// Parses the producer's spelling; `None` for anything unrecognized.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CREATED" => Some(Self::Created),
            "SUCCESS" => Some(Self::Success),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}
