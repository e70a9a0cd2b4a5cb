pub mod models;
pub mod money;

pub use models::events::EventSummary;
