use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Navigation-state payload carried back from the free-event booking path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeBookingReturn {
    pub booking_id: String,
    pub is_free: bool,
}

/// The inbound payload the confirmation screen mounts with: query
/// parameters from the payment-gateway return URL plus optional navigation
/// state from the in-app free-event path.
#[derive(Debug, Clone, Default)]
pub struct ReturnLeg {
    pub status: Option<String>,
    pub session_id: Option<String>,
    pub booking: Option<FreeBookingReturn>,
}

/// How the return leg classified, decided synchronously before any
/// network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionSeed {
    /// Explicit failure, or nothing recognizable. Terminal without a fetch.
    Failed,
    Free { booking_id: String },
    Paid { session_id: String },
}

impl ResolutionSeed {
    /// `(reference, free_event)` for seeds that start polling.
    pub fn reference(&self) -> Option<(&str, bool)> {
        match self {
            ResolutionSeed::Failed => None,
            ResolutionSeed::Free { booking_id } => Some((booking_id, true)),
            ResolutionSeed::Paid { session_id } => Some((session_id, false)),
        }
    }
}

impl ReturnLeg {
    pub fn from_parts(
        query: &HashMap<String, String>,
        state: Option<FreeBookingReturn>,
    ) -> Self {
        Self {
            status: query.get("status").cloned(),
            session_id: query.get("session_id").cloned(),
            booking: state,
        }
    }

    /// Translate the three gateway return shapes into a seed.
    ///
    /// An explicit failure wins over everything; a free-booking payload
    /// wins over a session id; anything else unrecognizable is a failure,
    /// never a silent retry.
    pub fn classify(&self) -> ResolutionSeed {
        if self.status.as_deref() == Some("failure") {
            return ResolutionSeed::Failed;
        }

        if let Some(booking) = &self.booking {
            if booking.is_free && !booking.booking_id.is_empty() {
                return ResolutionSeed::Free {
                    booking_id: booking.booking_id.clone(),
                };
            }
        }

        if self.status.as_deref() == Some("success") {
            if let Some(session_id) = self.session_id.as_deref() {
                if !session_id.is_empty() {
                    return ResolutionSeed::Paid {
                        session_id: session_id.to_string(),
                    };
                }
            }
        }

        warn!("Unrecognized booking return payload: {:?}", self);
        ResolutionSeed::Failed
    }
}
