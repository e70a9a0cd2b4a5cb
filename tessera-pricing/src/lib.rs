pub mod offer;
pub mod summary;

pub use offer::{Discount, TicketOffer};
pub use summary::{line_total, OfferSet, PriceSummary, SelectionLine};

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Selection references unknown offer: {0}")]
    UnknownOffer(String),

    #[error("Invalid discount configuration: {0}")]
    InvalidDiscount(String),

    #[error("Requested {requested} tickets for '{offer}' but only {available} are available")]
    QuantityUnavailable {
        offer: String,
        requested: u32,
        available: u32,
    },
}

pub type PricingResult<T> = Result<T, PricingError>;
