use serde::{Deserialize, Serialize};
use tessera_shared::EventSummary;

/// Payment status as reported by the backend for a booking reference.
///
/// `NotApplicable` covers free events and any other case where no payment
/// was required; the resolver treats it exactly like `Completed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
    NotApplicable,
}

impl PaymentStatus {
    /// Statuses after which the booking is settled and polling stops.
    pub fn is_settled(&self) -> bool {
        matches!(self, PaymentStatus::Completed | PaymentStatus::NotApplicable)
    }
}

/// One purchased line as itemized on the confirmation screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketLine {
    pub category: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl TicketLine {
    /// The implicit "1x free ticket" line shown for free-event bookings
    /// when the backend returns no itemization.
    pub fn free_admission() -> Self {
        Self {
            category: "Free ticket".to_string(),
            quantity: 1,
            unit_price: 0.0,
        }
    }
}

/// The resolved booking as the backend reports it.
///
/// `total_amount` is authoritative: the confirmation screen displays it
/// verbatim and never recomputes totals client-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingView {
    pub booking_id: String,
    pub user_name: String,
    pub email: String,
    pub total_amount: f64,
    pub tickets: Vec<TicketLine>,
    pub event: EventSummary,
}

/// One status-fetch response. `booking` is populated once the payment
/// status is settled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub payment_status: PaymentStatus,
    pub booking: Option<BookingView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settled_statuses() {
        assert!(PaymentStatus::Completed.is_settled());
        assert!(PaymentStatus::NotApplicable.is_settled());
        assert!(!PaymentStatus::Pending.is_settled());
        assert!(!PaymentStatus::Failed.is_settled());
    }

    #[test]
    fn test_status_wire_casing() {
        let json = serde_json::to_string(&PaymentStatus::NotApplicable).unwrap();
        assert_eq!(json, "\"NOT_APPLICABLE\"");

        let parsed: PaymentStatus = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(parsed, PaymentStatus::Completed);
    }
}
