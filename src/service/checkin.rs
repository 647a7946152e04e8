//! Check-in service: token verification and the recent-scan history.
//!
//! Implements the door flow: parse the scanned token, resolve the event
//! and attendee, gate on payment, reject duplicates, and mark the
//! attendee verified exactly once. Every outcome is a value, never an
//! error; only persistence faults propagate as [`ServerError`].

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::domain::{Attendee, Event, EventBus, FeedEvent};
use crate::error::ServerError;
use crate::store::JsonStore;
use crate::ticket::{SignedPayload, TicketCodec, TicketToken};

/// Maximum number of outcomes kept in the scan history.
const HISTORY_LIMIT: usize = 10;

/// Result of verifying one scanned token.
///
/// Ephemeral: appended to the bounded in-memory history but never
/// persisted. `attendee` and `event` are only populated once the token
/// resolved far enough to know them.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct VerificationOutcome {
    /// Whether the attendee was checked in by this scan.
    pub success: bool,
    /// The resolved attendee, post-update on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendee: Option<Attendee>,
    /// The resolved event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<Event>,
    /// Human-readable outcome description.
    pub message: String,
    /// When the scan was processed.
    pub timestamp: DateTime<Utc>,
}

impl VerificationOutcome {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            attendee: None,
            event: None,
            message,
            timestamp: Utc::now(),
        }
    }

    fn failure_for(event: Event, attendee: Attendee, message: String) -> Self {
        Self {
            success: false,
            attendee: Some(attendee),
            event: Some(event),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// How far the attendee lookup got inside the store's write lock.
enum Resolution {
    Unknown { candidates: Vec<String> },
    NotPaid(Attendee),
    AlreadyVerified(Attendee),
    Verified(Attendee),
}

/// Verification engine plus the bounded scan history.
#[derive(Debug)]
pub struct CheckinService {
    store: Arc<JsonStore>,
    codec: TicketCodec,
    event_bus: EventBus,
    history: RwLock<VecDeque<VerificationOutcome>>,
}

impl CheckinService {
    /// Creates a new `CheckinService`.
    #[must_use]
    pub fn new(store: Arc<JsonStore>, codec: TicketCodec, event_bus: EventBus) -> Self {
        Self {
            store,
            codec,
            event_bus,
            history: RwLock::new(VecDeque::with_capacity(HISTORY_LIMIT)),
        }
    }

    /// Verifies one scanned token.
    ///
    /// Rejections (malformed token, unknown event or attendee, unpaid,
    /// already verified) come back as `success == false` outcomes with a
    /// descriptive message. The attendee record is only touched on the
    /// success path, where the paid and not-yet-verified checks and the
    /// verified mark all happen under one store write lock, so two
    /// concurrent scans of the same ticket produce exactly one success.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::PersistenceError`] if writing the updated
    /// attendee fails; the verified mark is rolled back and no outcome
    /// is recorded, so the scan can simply be retried.
    pub async fn verify(&self, raw_token: &str) -> Result<VerificationOutcome, ServerError> {
        let outcome = match self.codec.parse(raw_token) {
            Ok(TicketToken::Legacy {
                event_title,
                attendee_name,
                ..
            }) => self.verify_legacy(&event_title, &attendee_name).await?,
            Ok(TicketToken::Signed(payload)) => self.verify_signed(&payload).await?,
            Err(e) => {
                tracing::debug!(error = %e, "token rejected by parser");
                VerificationOutcome::failure(format!(
                    "Invalid QR code format. Expected format: \
                     EventTitle_AttendeeName_Timestamp. Got: {raw_token}"
                ))
            }
        };
        self.record(&outcome).await;
        Ok(outcome)
    }

    /// Returns the recent outcomes, newest first.
    pub async fn history(&self) -> Vec<VerificationOutcome> {
        self.history.read().await.iter().cloned().collect()
    }

    /// Returns a handle to the live feed bus.
    #[must_use]
    pub fn event_bus(&self) -> EventBus {
        self.event_bus.clone()
    }

    /// Legacy path: resolve by exact title and name equality, first
    /// match in array order.
    async fn verify_legacy(
        &self,
        event_title: &str,
        attendee_name: &str,
    ) -> Result<VerificationOutcome, ServerError> {
        let Some(event) = self.store.events.find(|e| e.title == event_title).await else {
            let titles = self
                .store
                .events
                .read(|items| {
                    items
                        .iter()
                        .map(|e| e.title.clone())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .await;
            return Ok(VerificationOutcome::failure(format!(
                "Event \"{event_title}\" not found. Available events: {titles}"
            )));
        };

        let resolution = self
            .resolve_and_mark(&event, |a| {
                a.name == attendee_name && a.event_id == event.id
            })
            .await?;

        Ok(match resolution {
            Resolution::Unknown { candidates } => VerificationOutcome::failure(format!(
                "Attendee \"{attendee_name}\" not found for event \"{event_title}\". \
                 Available attendees for this event: {}",
                candidates.join(", ")
            )),
            Resolution::NotPaid(attendee) => self.reject(
                event,
                attendee,
                format!("Payment not confirmed for {attendee_name}. Payment status: unpaid"),
            ),
            Resolution::AlreadyVerified(attendee) => self.reject(
                event,
                attendee,
                format!("{attendee_name} has already been verified for {event_title}"),
            ),
            Resolution::Verified(attendee) => self.accept(event, attendee),
        })
    }

    /// Signed path: resolve by the embedded ids. The attendee's current
    /// display name is presentation only; renames and duplicate names
    /// cannot misdirect the scan.
    async fn verify_signed(
        &self,
        payload: &SignedPayload,
    ) -> Result<VerificationOutcome, ServerError> {
        let Some(event) = self.store.events.find(|e| e.id == payload.event_id).await else {
            let titles = self
                .store
                .events
                .read(|items| {
                    items
                        .iter()
                        .map(|e| e.title.clone())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .await;
            return Ok(VerificationOutcome::failure(format!(
                "Event \"{}\" not found. Available events: {titles}",
                payload.event_id
            )));
        };

        let resolution = self
            .resolve_and_mark(&event, |a| {
                a.id == payload.attendee_id && a.event_id == event.id
            })
            .await?;

        Ok(match resolution {
            Resolution::Unknown { candidates } => VerificationOutcome::failure(format!(
                "Attendee \"{}\" not found for event \"{}\". \
                 Available attendees for this event: {}",
                payload.attendee_id,
                event.title,
                candidates.join(", ")
            )),
            Resolution::NotPaid(attendee) => {
                let message = format!(
                    "Payment not confirmed for {}. Payment status: unpaid",
                    attendee.name
                );
                self.reject(event, attendee, message)
            }
            Resolution::AlreadyVerified(attendee) => {
                let message = format!(
                    "{} has already been verified for {}",
                    attendee.name, event.title
                );
                self.reject(event, attendee, message)
            }
            Resolution::Verified(attendee) => self.accept(event, attendee),
        })
    }

    /// Runs the payment and duplicate checks and, when both pass, the
    /// verified mark, all under the attendee collection's write lock.
    ///
    /// The file is only rewritten on the marking path; every refusal
    /// leaves the store untouched.
    async fn resolve_and_mark(
        &self,
        event: &Event,
        matches: impl Fn(&Attendee) -> bool,
    ) -> Result<Resolution, ServerError> {
        let event_id = event.id;
        let now = Utc::now();
        self.store
            .attendees
            .write(|items| {
                let Some(attendee) = items.iter_mut().find(|a| matches(a)) else {
                    let candidates = items
                        .iter()
                        .filter(|a| a.event_id == event_id)
                        .map(|a| a.name.clone())
                        .collect();
                    return (false, Resolution::Unknown { candidates });
                };
                if !attendee.paid {
                    return (false, Resolution::NotPaid(attendee.clone()));
                }
                if attendee.verified {
                    return (false, Resolution::AlreadyVerified(attendee.clone()));
                }
                attendee.mark_verified(now);
                (true, Resolution::Verified(attendee.clone()))
            })
            .await
    }

    /// Builds the success outcome and broadcasts it.
    fn accept(&self, event: Event, attendee: Attendee) -> VerificationOutcome {
        let message = format!(
            "✅ {} successfully verified for {}!",
            attendee.name, event.title
        );
        let _ = self.event_bus.publish(FeedEvent::AttendeeVerified {
            event_id: event.id,
            attendee_id: attendee.id,
            name: attendee.name.clone(),
            verified_at: attendee.verified_at.unwrap_or_else(Utc::now),
            timestamp: Utc::now(),
        });
        tracing::info!(
            attendee_id = %attendee.id,
            event_id = %event.id,
            "attendee verified"
        );
        VerificationOutcome {
            success: true,
            attendee: Some(attendee),
            event: Some(event),
            message,
            timestamp: Utc::now(),
        }
    }

    /// Builds a rejection outcome for a resolved event and broadcasts it.
    fn reject(&self, event: Event, attendee: Attendee, message: String) -> VerificationOutcome {
        let _ = self.event_bus.publish(FeedEvent::CheckInRejected {
            event_id: event.id,
            reason: message.clone(),
            timestamp: Utc::now(),
        });
        tracing::debug!(event_id = %event.id, %message, "check-in rejected");
        VerificationOutcome::failure_for(event, attendee, message)
    }

    /// Appends an outcome to the history, evicting the oldest past the
    /// cap.
    async fn record(&self, outcome: &VerificationOutcome) {
        let mut history = self.history.write().await;
        history.push_front(outcome.clone());
        history.truncate(HISTORY_LIMIT);
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::EventId;
    use crate::ticket::encode_legacy;

    struct Fixture {
        service: Arc<CheckinService>,
        store: Arc<JsonStore>,
        _dir: tempfile::TempDir,
    }

    async fn fixture() -> Fixture {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let Ok(store) = JsonStore::open(dir.path()) else {
            panic!("store open failed");
        };
        let store = Arc::new(store);
        let service = Arc::new(CheckinService::new(
            Arc::clone(&store),
            TicketCodec::new("test-signing-key"),
            EventBus::new(100),
        ));
        Fixture {
            service,
            store,
            _dir: dir,
        }
    }

    async fn seed_event(store: &JsonStore, title: &str) -> Event {
        let event = Event::new(
            title.to_string(),
            Utc::now(),
            "Convention Center".to_string(),
            1500.0,
            "desc".to_string(),
            None,
        );
        let Ok(()) = store.events.insert(event.clone()).await else {
            panic!("event insert failed");
        };
        event
    }

    async fn seed_attendee(store: &JsonStore, name: &str, event_id: EventId, paid: bool) -> Attendee {
        let attendee = Attendee::new(
            name.to_string(),
            format!("{name}@example.com"),
            event_id,
            paid,
        );
        let Ok(()) = store.attendees.insert(attendee.clone()).await else {
            panic!("attendee insert failed");
        };
        attendee
    }

    #[tokio::test]
    async fn concrete_scenario_verifies_john_for_techconf() {
        let fx = fixture().await;
        let event = seed_event(&fx.store, "TechConf").await;
        let _ = seed_attendee(&fx.store, "John", event.id, true).await;

        let Ok(outcome) = fx.service.verify("TechConf_John_1700000000000").await else {
            panic!("verify errored");
        };
        assert!(outcome.success);
        assert!(outcome.message.contains("John"));
        assert!(outcome.message.contains("TechConf"));
        let Some(attendee) = outcome.attendee else {
            panic!("expected attendee in outcome");
        };
        assert!(attendee.verified);
        assert!(attendee.verified_at.is_some());
    }

    #[tokio::test]
    async fn unpaid_attendee_is_rejected_and_stays_unverified() {
        let fx = fixture().await;
        let event = seed_event(&fx.store, "TechConf").await;
        let _ = seed_attendee(&fx.store, "Jane", event.id, false).await;

        let Ok(outcome) = fx.service.verify("TechConf_Jane_1700000000000").await else {
            panic!("verify errored");
        };
        assert!(!outcome.success);
        assert!(outcome.message.contains("Payment not confirmed for Jane"));
        assert!(outcome.attendee.is_some());
        assert!(outcome.event.is_some());

        let stored = fx.store.attendees.find(|a| a.name == "Jane").await;
        let Some(stored) = stored else {
            panic!("attendee lost");
        };
        assert!(!stored.verified);
        assert!(stored.verified_at.is_none());
    }

    #[tokio::test]
    async fn second_scan_reports_already_verified() {
        let fx = fixture().await;
        let event = seed_event(&fx.store, "TechConf").await;
        let _ = seed_attendee(&fx.store, "John", event.id, true).await;

        let Ok(first) = fx.service.verify("TechConf_John_1700000000000").await else {
            panic!("first verify errored");
        };
        assert!(first.success);
        let first_verified_at = fx
            .store
            .attendees
            .find(|a| a.name == "John")
            .await
            .and_then(|a| a.verified_at);

        let Ok(second) = fx.service.verify("TechConf_John_1700000000001").await else {
            panic!("second verify errored");
        };
        assert!(!second.success);
        assert!(second.message.contains("already been verified"));

        // No second update: the stored timestamp is unchanged.
        let after = fx
            .store
            .attendees
            .find(|a| a.name == "John")
            .await
            .and_then(|a| a.verified_at);
        assert_eq!(after, first_verified_at);
    }

    #[tokio::test]
    async fn malformed_tokens_touch_nothing() {
        let fx = fixture().await;
        let event = seed_event(&fx.store, "TechConf").await;
        let _ = seed_attendee(&fx.store, "John", event.id, true).await;

        for raw in ["onlyonepart", "two_parts"] {
            let Ok(outcome) = fx.service.verify(raw).await else {
                panic!("verify errored");
            };
            assert!(!outcome.success);
            assert!(outcome.message.contains("Invalid QR code format"));
            assert!(outcome.message.contains(raw));
            assert!(outcome.attendee.is_none());
        }

        let stored = fx.store.attendees.find(|a| a.name == "John").await;
        assert!(stored.is_some_and(|a| !a.verified));
    }

    #[tokio::test]
    async fn unknown_event_lists_known_titles() {
        let fx = fixture().await;
        let _ = seed_event(&fx.store, "TechConf").await;
        let _ = seed_event(&fx.store, "Pitch Day").await;

        let Ok(outcome) = fx.service.verify("NoSuchEvent_Jane_123").await else {
            panic!("verify errored");
        };
        assert!(!outcome.success);
        assert!(outcome.message.contains("Event \"NoSuchEvent\" not found"));
        assert!(outcome.message.contains("TechConf"));
        assert!(outcome.message.contains("Pitch Day"));
    }

    #[tokio::test]
    async fn unknown_attendee_lists_candidates_for_that_event() {
        let fx = fixture().await;
        let event = seed_event(&fx.store, "TechConf").await;
        let other = seed_event(&fx.store, "Pitch Day").await;
        let _ = seed_attendee(&fx.store, "John", event.id, true).await;
        let _ = seed_attendee(&fx.store, "Jane", other.id, true).await;

        let Ok(outcome) = fx.service.verify("TechConf_Ghost_123").await else {
            panic!("verify errored");
        };
        assert!(!outcome.success);
        assert!(outcome.message.contains("Attendee \"Ghost\" not found"));
        assert!(outcome.message.contains("John"));
        // Jane belongs to another event and is not a candidate.
        assert!(!outcome.message.contains("Jane"));
    }

    #[tokio::test]
    async fn duplicate_names_resolve_to_first_in_array_order() {
        let fx = fixture().await;
        let event = seed_event(&fx.store, "TechConf").await;
        let first = seed_attendee(&fx.store, "John", event.id, true).await;
        let second = seed_attendee(&fx.store, "John", event.id, true).await;

        let Ok(outcome) = fx.service.verify("TechConf_John_123").await else {
            panic!("verify errored");
        };
        assert!(outcome.success);
        let verified_id = outcome.attendee.map(|a| a.id);
        assert_eq!(verified_id, Some(first.id));

        let still_unverified = fx.store.attendees.find(|a| a.id == second.id).await;
        assert!(still_unverified.is_some_and(|a| !a.verified));
    }

    #[tokio::test]
    async fn signed_token_survives_attendee_rename() {
        let fx = fixture().await;
        let event = seed_event(&fx.store, "TechConf").await;
        let attendee = seed_attendee(&fx.store, "John", event.id, true).await;

        let codec = TicketCodec::new("test-signing-key");
        let Ok(token) = codec.issue(attendee.id, event.id, Utc::now()) else {
            panic!("issue failed");
        };

        // Rename after issuance; a legacy token would now dangle.
        let renamed = fx
            .store
            .attendees
            .update_where(|a| a.id == attendee.id, |a| a.name = "Jonathan".to_string())
            .await;
        assert!(matches!(renamed, Ok(Some(_))));

        let Ok(outcome) = fx.service.verify(&token).await else {
            panic!("verify errored");
        };
        assert!(outcome.success);
        assert!(outcome.message.contains("Jonathan"));
    }

    #[tokio::test]
    async fn tampered_signed_token_is_malformed_not_legacy() {
        let fx = fixture().await;
        let event = seed_event(&fx.store, "TechConf").await;
        let attendee = seed_attendee(&fx.store, "John", event.id, true).await;

        let codec = TicketCodec::new("test-signing-key");
        let Ok(token) = codec.issue(attendee.id, event.id, Utc::now()) else {
            panic!("issue failed");
        };
        let tampered = token.replacen("PLV2.ey", "PLV2.fy", 1);

        let Ok(outcome) = fx.service.verify(&tampered).await else {
            panic!("verify errored");
        };
        assert!(!outcome.success);
        assert!(outcome.message.contains("Invalid QR code format"));

        let stored = fx.store.attendees.find(|a| a.id == attendee.id).await;
        assert!(stored.is_some_and(|a| !a.verified));
    }

    #[tokio::test]
    async fn concurrent_scans_yield_exactly_one_success() {
        let fx = fixture().await;
        let event = seed_event(&fx.store, "TechConf").await;
        let _ = seed_attendee(&fx.store, "John", event.id, true).await;

        let raw = encode_legacy("TechConf", "John", Utc::now());
        let s1 = Arc::clone(&fx.service);
        let s2 = Arc::clone(&fx.service);
        let r1 = raw.clone();
        let t1 = tokio::spawn(async move { s1.verify(&r1).await });
        let t2 = tokio::spawn(async move { s2.verify(&raw).await });

        let (a, b) = (t1.await, t2.await);
        let (Ok(Ok(a)), Ok(Ok(b))) = (a, b) else {
            panic!("verify task failed");
        };
        let successes = usize::from(a.success) + usize::from(b.success);
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn history_is_newest_first_and_capped() {
        let fx = fixture().await;
        let _ = seed_event(&fx.store, "TechConf").await;

        for i in 0..12 {
            let Ok(_) = fx.service.verify(&format!("nope-{i}")).await else {
                panic!("verify errored");
            };
        }
        let history = fx.service.history().await;
        assert_eq!(history.len(), HISTORY_LIMIT);
        let Some(newest) = history.first() else {
            panic!("history empty");
        };
        assert!(newest.message.contains("nope-11"));
    }

    #[tokio::test]
    async fn resolved_rejections_are_broadcast() {
        let fx = fixture().await;
        let event = seed_event(&fx.store, "TechConf").await;
        let _ = seed_attendee(&fx.store, "Jane", event.id, false).await;
        let mut rx = fx.service.event_bus().subscribe();

        let Ok(_) = fx.service.verify("TechConf_Jane_123").await else {
            panic!("verify errored");
        };
        let Ok(feed) = rx.recv().await else {
            panic!("expected feed event");
        };
        assert_eq!(feed.event_type_str(), "check_in_rejected");
        assert_eq!(feed.event_id(), event.id);
    }

    #[tokio::test]
    async fn success_is_broadcast() {
        let fx = fixture().await;
        let event = seed_event(&fx.store, "TechConf").await;
        let _ = seed_attendee(&fx.store, "John", event.id, true).await;
        let mut rx = fx.service.event_bus().subscribe();

        let Ok(_) = fx.service.verify("TechConf_John_123").await else {
            panic!("verify errored");
        };
        let Ok(feed) = rx.recv().await else {
            panic!("expected feed event");
        };
        assert_eq!(feed.event_type_str(), "attendee_verified");
    }
}
