use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tessera_pricing::SelectionLine;
use uuid::Uuid;

use crate::status::StatusReport;

pub type GatewayError = Box<dyn std::error::Error + Send + Sync>;

/// The authenticated buyer, passed explicitly into submission rather than
/// read from ambient session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyerInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Outcome of a successful booking submission. Paid events hand back a
/// gateway redirect URL; free events are booked immediately.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SubmissionOutcome {
    Free { booking_id: String },
    Paid { payment_link: String },
}

/// Seam to the REST backend. The resolver and the order flow only ever
/// talk to this trait; `tessera-client` provides the HTTP implementation.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    /// Fetch the current payment status for a booking reference. The
    /// reference is a booking id for free events and a payment-gateway
    /// session id for paid ones.
    async fn fetch_status(
        &self,
        reference: &str,
        free_event: bool,
    ) -> Result<StatusReport, GatewayError>;

    /// Submit an order. Transport errors propagate to the caller, who may
    /// retry manually; there is no automatic resubmission.
    async fn submit_booking(
        &self,
        buyer: &BuyerInfo,
        event_id: Uuid,
        selection: &[SelectionLine],
    ) -> Result<SubmissionOutcome, GatewayError>;
}
