use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::gateway::BookingGateway;
use crate::return_leg::ResolutionSeed;
use crate::status::BookingView;

/// Observable state of one resolution attempt.
///
/// `Confirmed`, `Failed` and `StillPending` are terminal; once any of them
/// is published the polling task has exited and no further fetch occurs.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionStatus {
    Resolving { polls: u32 },
    Confirmed(BookingView),
    Failed,
    /// The backend kept answering `Pending` until the configured attempt
    /// cap ran out. Only reachable when `max_attempts` is set.
    StillPending { polls: u32 },
}

impl ResolutionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ResolutionStatus::Resolving { .. })
    }
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Delay between consecutive status fetches.
    pub poll_interval: Duration,
    /// Cap on status fetches while the payment stays `Pending`.
    /// `None` polls indefinitely, matching the original flow.
    pub max_attempts: Option<u32>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(6),
            max_attempts: None,
        }
    }
}

/// Handle to a running resolution, owned by the hosting view.
///
/// Dropping the handle does not stop the task; teardown must call
/// `cancel`, which clears any pending timer so no fetch happens after
/// the view is gone.
pub struct ResolutionHandle {
    rx: watch::Receiver<ResolutionStatus>,
    task: Option<JoinHandle<()>>,
}

impl ResolutionHandle {
    /// Snapshot of the current state.
    pub fn status(&self) -> ResolutionStatus {
        self.rx.borrow().clone()
    }

    /// Watch receiver for callers that want to react to every transition.
    pub fn subscribe(&self) -> watch::Receiver<ResolutionStatus> {
        self.rx.clone()
    }

    /// Wait until the resolution reaches a terminal state.
    pub async fn resolved(&mut self) -> ResolutionStatus {
        loop {
            let current = self.rx.borrow().clone();
            if current.is_terminal() {
                return current;
            }
            // Sender dropped means the task exited; the last published
            // state stands.
            if self.rx.changed().await.is_err() {
                return self.rx.borrow().clone();
            }
        }
    }

    pub fn cancel(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

/// Start resolving a booking reference against the backend.
///
/// A `Failed` seed resolves synchronously: no task is spawned and no fetch
/// is ever issued. Otherwise a polling task runs until a terminal status,
/// fetching strictly sequentially; a new poll is scheduled only after the
/// previous response has been fully processed.
pub fn start_resolution(
    gateway: Arc<dyn BookingGateway>,
    seed: ResolutionSeed,
    config: ResolverConfig,
) -> ResolutionHandle {
    let (reference, free_event) = match seed.reference() {
        Some((r, f)) => (r.to_string(), f),
        None => {
            let (_tx, rx) = watch::channel(ResolutionStatus::Failed);
            return ResolutionHandle { rx, task: None };
        }
    };

    let (tx, rx) = watch::channel(ResolutionStatus::Resolving { polls: 0 });

    let task = tokio::spawn(async move {
        let mut polls: u32 = 0;
        loop {
            let report = match gateway.fetch_status(&reference, free_event).await {
                Ok(report) => report,
                Err(e) => {
                    // Transport failure is terminal; only a Pending payment
                    // status is retried.
                    error!("Status fetch failed for booking {}: {}", reference, e);
                    let _ = tx.send(ResolutionStatus::Failed);
                    return;
                }
            };

            if report.payment_status.is_settled() {
                match report.booking {
                    Some(booking) => {
                        info!("Booking {} confirmed after {} polls", reference, polls);
                        let _ = tx.send(ResolutionStatus::Confirmed(booking));
                    }
                    None => {
                        warn!("Booking {} settled but carried no booking data", reference);
                        let _ = tx.send(ResolutionStatus::Failed);
                    }
                }
                return;
            }

            if report.payment_status == crate::status::PaymentStatus::Failed {
                info!("Payment failed for booking {}", reference);
                let _ = tx.send(ResolutionStatus::Failed);
                return;
            }

            // Pending: schedule the next fetch.
            polls += 1;
            if let Some(max) = config.max_attempts {
                if polls >= max {
                    warn!("Booking {} still pending after {} polls, giving up", reference, polls);
                    let _ = tx.send(ResolutionStatus::StillPending { polls });
                    return;
                }
            }
            let _ = tx.send(ResolutionStatus::Resolving { polls });
            sleep(config.poll_interval).await;
        }
    });

    ResolutionHandle {
        rx,
        task: Some(task),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{BuyerInfo, GatewayError, SubmissionOutcome};
    use crate::status::{BookingView, PaymentStatus, StatusReport, TicketLine};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use tessera_pricing::SelectionLine;
    use tessera_shared::EventSummary;
    use uuid::Uuid;

    /// Gateway double that replays a scripted sequence of responses and
    /// counts fetches.
    struct ScriptedGateway {
        responses: Mutex<VecDeque<Result<StatusReport, String>>>,
        fetches: AtomicU32,
    }

    impl ScriptedGateway {
        fn new(responses: Vec<Result<StatusReport, String>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                fetches: AtomicU32::new(0),
            })
        }

        fn fetch_count(&self) -> u32 {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BookingGateway for ScriptedGateway {
        async fn fetch_status(
            &self,
            _reference: &str,
            _free_event: bool,
        ) -> Result<StatusReport, GatewayError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let next = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("script exhausted");
            next.map_err(GatewayError::from)
        }

        async fn submit_booking(
            &self,
            _buyer: &BuyerInfo,
            _event_id: Uuid,
            _selection: &[SelectionLine],
        ) -> Result<SubmissionOutcome, GatewayError> {
            Err("not used in resolver tests".into())
        }
    }

    fn pending() -> Result<StatusReport, String> {
        Ok(StatusReport {
            payment_status: PaymentStatus::Pending,
            booking: None,
        })
    }

    fn settled(status: PaymentStatus, booking_id: &str) -> Result<StatusReport, String> {
        Ok(StatusReport {
            payment_status: status,
            booking: Some(sample_booking(booking_id)),
        })
    }

    fn sample_booking(booking_id: &str) -> BookingView {
        BookingView {
            booking_id: booking_id.to_string(),
            user_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            total_amount: 240.0,
            tickets: vec![TicketLine {
                category: "Individual".to_string(),
                quantity: 3,
                unit_price: 80.0,
            }],
            event: EventSummary {
                event_id: None,
                name: "RustFest".to_string(),
                image_url: None,
            },
        }
    }

    fn fast_config() -> ResolverConfig {
        ResolverConfig {
            poll_interval: Duration::from_millis(10),
            max_attempts: None,
        }
    }

    #[tokio::test]
    async fn test_failed_seed_makes_no_fetch() {
        let gateway = ScriptedGateway::new(vec![]);
        let handle = start_resolution(gateway.clone(), ResolutionSeed::Failed, fast_config());

        assert_eq!(handle.status(), ResolutionStatus::Failed);
        assert_eq!(gateway.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_pending_then_completed_polls_three_times() {
        let gateway = ScriptedGateway::new(vec![
            pending(),
            pending(),
            settled(PaymentStatus::Completed, "b42"),
        ]);
        let mut handle = start_resolution(
            gateway.clone(),
            ResolutionSeed::Paid {
                session_id: "cs_abc".to_string(),
            },
            fast_config(),
        );

        let status = handle.resolved().await;
        assert_eq!(gateway.fetch_count(), 3);
        match status {
            ResolutionStatus::Confirmed(booking) => {
                assert_eq!(booking.booking_id, "b42");
                assert_eq!(booking.total_amount, 240.0);
            }
            other => panic!("expected Confirmed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_free_event_confirms_on_first_fetch() {
        let gateway =
            ScriptedGateway::new(vec![settled(PaymentStatus::NotApplicable, "b1")]);
        let mut handle = start_resolution(
            gateway.clone(),
            ResolutionSeed::Free {
                booking_id: "b1".to_string(),
            },
            fast_config(),
        );

        let status = handle.resolved().await;
        assert_eq!(gateway.fetch_count(), 1);
        assert!(matches!(status, ResolutionStatus::Confirmed(b) if b.booking_id == "b1"));
    }

    #[tokio::test]
    async fn test_fetch_error_is_terminal_failure() {
        let gateway = ScriptedGateway::new(vec![Err("connection refused".to_string())]);
        let mut handle = start_resolution(
            gateway.clone(),
            ResolutionSeed::Paid {
                session_id: "cs_abc".to_string(),
            },
            fast_config(),
        );

        assert_eq!(handle.resolved().await, ResolutionStatus::Failed);
        assert_eq!(gateway.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_payment_status_is_terminal() {
        let gateway = ScriptedGateway::new(vec![Ok(StatusReport {
            payment_status: PaymentStatus::Failed,
            booking: None,
        })]);
        let mut handle = start_resolution(
            gateway.clone(),
            ResolutionSeed::Paid {
                session_id: "cs_abc".to_string(),
            },
            fast_config(),
        );

        assert_eq!(handle.resolved().await, ResolutionStatus::Failed);
        assert_eq!(gateway.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_settled_without_booking_fails() {
        let gateway = ScriptedGateway::new(vec![Ok(StatusReport {
            payment_status: PaymentStatus::Completed,
            booking: None,
        })]);
        let mut handle = start_resolution(
            gateway.clone(),
            ResolutionSeed::Paid {
                session_id: "cs_abc".to_string(),
            },
            fast_config(),
        );

        assert_eq!(handle.resolved().await, ResolutionStatus::Failed);
    }

    #[tokio::test]
    async fn test_attempt_cap_yields_still_pending() {
        let gateway =
            ScriptedGateway::new(vec![pending(), pending(), pending(), pending()]);
        let mut handle = start_resolution(
            gateway.clone(),
            ResolutionSeed::Paid {
                session_id: "cs_abc".to_string(),
            },
            ResolverConfig {
                poll_interval: Duration::from_millis(1),
                max_attempts: Some(4),
            },
        );

        let status = handle.resolved().await;
        assert_eq!(status, ResolutionStatus::StillPending { polls: 4 });
        assert_eq!(gateway.fetch_count(), 4);
    }

    #[tokio::test]
    async fn test_cancel_stops_polling() {
        // Long interval so the task is parked in its sleep when we cancel.
        let gateway = ScriptedGateway::new(vec![pending(), pending(), pending()]);
        let handle = start_resolution(
            gateway.clone(),
            ResolutionSeed::Paid {
                session_id: "cs_abc".to_string(),
            },
            ResolverConfig {
                poll_interval: Duration::from_secs(60),
                max_attempts: None,
            },
        );

        // Wait for the first fetch to land.
        while gateway.fetch_count() == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        assert_eq!(handle.status(), ResolutionStatus::Resolving { polls: 1 });

        handle.cancel();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(gateway.fetch_count(), 1);
    }
}
