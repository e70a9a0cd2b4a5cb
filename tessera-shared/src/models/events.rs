use uuid::Uuid;

/// The slice of an event the booking screens need to render: name and
/// banner image. The full event record stays on the backend.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct EventSummary {
    pub event_id: Option<Uuid>,
    pub name: String,
    pub image_url: Option<String>,
}
