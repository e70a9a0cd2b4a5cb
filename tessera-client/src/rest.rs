use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use tessera_booking::{
    BookingGateway, BookingView, BuyerInfo, GatewayError, PaymentStatus, StatusReport,
    SubmissionOutcome, TicketLine,
};
use tessera_pricing::SelectionLine;
use tessera_shared::EventSummary;

use crate::app_config::Config;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Malformed backend response: {0}")]
    Malformed(String),
}

/// HTTP implementation of the booking gateway against the ticketing
/// REST backend.
pub struct RestGateway {
    http: reqwest::Client,
    base_url: String,
}

impl RestGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(
            config.api.base_url.clone(),
            Duration::from_secs(config.api.timeout_seconds),
        )
    }

    async fn fetch_status_inner(
        &self,
        reference: &str,
        free_event: bool,
    ) -> Result<StatusReport, ClientError> {
        let url = format!("{}/bookings/status", self.base_url);
        debug!("Fetching booking status for {}", reference);

        let free = free_event.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[("reference", reference), ("free", free.as_str())])
            .send()
            .await?;

        let response = check_status(response).await?;
        let payload: StatusResponse = response.json().await?;
        Ok(map_status(payload, free_event))
    }

    async fn submit_booking_inner(
        &self,
        buyer: &BuyerInfo,
        event_id: Uuid,
        selection: &[SelectionLine],
    ) -> Result<SubmissionOutcome, ClientError> {
        let url = format!("{}/bookings", self.base_url);
        let body = SubmitRequest::build(buyer, event_id, selection);

        let response = self.http.post(&url).json(&body).send().await?;
        let response = check_status(response).await?;
        let payload: SubmitResponse = response.json().await?;

        let outcome = map_submission(payload)?;
        info!("Booking submitted for event {}", event_id);
        Ok(outcome)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::UnexpectedStatus {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl BookingGateway for RestGateway {
    async fn fetch_status(
        &self,
        reference: &str,
        free_event: bool,
    ) -> Result<StatusReport, GatewayError> {
        Ok(self.fetch_status_inner(reference, free_event).await?)
    }

    async fn submit_booking(
        &self,
        buyer: &BuyerInfo,
        event_id: Uuid,
        selection: &[SelectionLine],
    ) -> Result<SubmissionOutcome, GatewayError> {
        Ok(self.submit_booking_inner(buyer, event_id, selection).await?)
    }
}

// Wire DTOs. The backend speaks camelCase JSON; domain types stay
// snake_case and are mapped at this boundary.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    payment_status: PaymentStatus,
    booking: Option<BookingPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookingPayload {
    #[serde(default)]
    booking_id: Option<String>,
    user_name: String,
    email: String,
    total_amount: f64,
    #[serde(default)]
    tickets: Vec<TicketPayload>,
    event_info: EventPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TicketPayload {
    category: String,
    quantity: u32,
    unit_price: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventPayload {
    #[serde(default)]
    event_id: Option<Uuid>,
    name: String,
    #[serde(default)]
    image_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest {
    buyer_name: String,
    buyer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    buyer_phone: Option<String>,
    event_id: Uuid,
    selection: Vec<SelectionPayload>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectionPayload {
    offer_name: String,
    quantity: u32,
}

impl SubmitRequest {
    fn build(buyer: &BuyerInfo, event_id: Uuid, selection: &[SelectionLine]) -> Self {
        Self {
            buyer_name: buyer.name.clone(),
            buyer_email: buyer.email.clone(),
            buyer_phone: buyer.phone.clone(),
            event_id,
            selection: selection
                .iter()
                .map(|line| SelectionPayload {
                    offer_name: line.offer_name.clone(),
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    #[allow(dead_code)]
    event_id: Uuid,
    is_free: bool,
    #[serde(default)]
    booking_id: Option<String>,
    #[serde(default)]
    payment_link: Option<String>,
}

fn map_status(payload: StatusResponse, free_event: bool) -> StatusReport {
    let booking = payload.booking.map(|b| {
        let mut tickets: Vec<TicketLine> = b
            .tickets
            .into_iter()
            .map(|t| TicketLine {
                category: t.category,
                quantity: t.quantity,
                unit_price: t.unit_price,
            })
            .collect();

        // Free bookings come back without itemization; show the implicit
        // single admission line.
        if tickets.is_empty() && free_event {
            tickets.push(TicketLine::free_admission());
        }

        BookingView {
            booking_id: b.booking_id.unwrap_or_default(),
            user_name: b.user_name,
            email: b.email,
            total_amount: b.total_amount,
            tickets,
            event: EventSummary {
                event_id: b.event_info.event_id,
                name: b.event_info.name,
                image_url: b.event_info.image_url,
            },
        }
    });

    StatusReport {
        payment_status: payload.payment_status,
        booking,
    }
}

fn map_submission(payload: SubmitResponse) -> Result<SubmissionOutcome, ClientError> {
    if payload.is_free {
        let booking_id = payload
            .booking_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ClientError::Malformed("free booking response without bookingId".to_string())
            })?;
        return Ok(SubmissionOutcome::Free { booking_id });
    }

    let payment_link = payload
        .payment_link
        .filter(|link| !link.is_empty())
        .ok_or_else(|| {
            ClientError::Malformed("paid booking response without paymentLink".to_string())
        })?;
    Ok(SubmissionOutcome::Paid { payment_link })
}
