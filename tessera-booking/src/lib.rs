pub mod gateway;
pub mod resolver;
pub mod return_leg;
pub mod status;

pub use gateway::{BookingGateway, BuyerInfo, GatewayError, SubmissionOutcome};
pub use resolver::{start_resolution, ResolutionHandle, ResolutionStatus, ResolverConfig};
pub use return_leg::{FreeBookingReturn, ResolutionSeed, ReturnLeg};
pub use status::{BookingView, PaymentStatus, StatusReport, TicketLine};
