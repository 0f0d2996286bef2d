//! Lookup lifecycle state machine
//!
//! A [`LookupController`] owns one form session's lookup: it moves between
//! [`LookupState`] variants only through [`LookupController::trigger`] and
//! [`LookupController::reset`], and publishes every transition on a watch
//! channel so the presentation layer can react to it.
//!
//! Triggers issued while a lookup is in flight are ignored. A reset aborts the
//! in-flight request and bumps a generation counter, so a result that was
//! already on its way back is dropped instead of overwriting `Idle`.

use crate::resolver::{AddressRecord, AddressResolver, LookupError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinError};
use tracing::{debug, info, warn};

/// Current phase of a lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LookupState {
    #[default]
    Idle,
    Loading,
    Resolved(AddressRecord),
    /// Carries the user-facing message, never provider error text
    Failed(String),
}

impl LookupState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn has_error(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn address(&self) -> Option<&AddressRecord> {
        match self {
            Self::Resolved(record) => Some(record),
            _ => None,
        }
    }
}

/// What a call to [`LookupController::trigger`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The lookup finished and moved the controller to this state
    Applied(LookupState),
    /// Another lookup was already in flight; nothing happened
    Ignored,
    /// A reset happened while the lookup was pending; its result was dropped
    Discarded,
}

#[derive(Default)]
struct InFlight {
    generation: u64,
    abort: Option<AbortHandle>,
}

/// Bookkeeping shared with the task that applies a lookup result
struct Shared {
    in_flight: Mutex<InFlight>,
    state: watch::Sender<LookupState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, InFlight> {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish the result of lookup `generation` unless a reset superseded it
    fn apply(
        &self,
        generation: u64,
        postal_code: &str,
        result: Result<Result<AddressRecord, LookupError>, JoinError>,
    ) -> TriggerOutcome {
        let mut in_flight = self.lock();
        if in_flight.generation != generation {
            debug!(postal_code, "Dropping lookup result after reset");
            return TriggerOutcome::Discarded;
        }
        in_flight.abort = None;

        let next = match result {
            Ok(Ok(record)) => {
                info!(postal_code, address = %record.full_address, "Address resolved");
                LookupState::Resolved(record)
            }
            Ok(Err(err)) => {
                warn!(postal_code, error = %err, "Address lookup failed");
                LookupState::Failed(err.user_message().to_string())
            }
            Err(err) => {
                warn!(postal_code, error = %err, "Address lookup task failed");
                LookupState::Failed(LookupError::TRANSPORT_MESSAGE.to_string())
            }
        };

        self.state.send_replace(next.clone());
        TriggerOutcome::Applied(next)
    }
}

pub struct LookupController<R> {
    resolver: Arc<R>,
    shared: Arc<Shared>,
}

impl<R> LookupController<R>
where
    R: AddressResolver + 'static,
{
    pub fn new(resolver: R) -> Self {
        Self::with_resolver(Arc::new(resolver))
    }

    pub fn with_resolver(resolver: Arc<R>) -> Self {
        let (state, _) = watch::channel(LookupState::Idle);
        Self {
            resolver,
            shared: Arc::new(Shared {
                in_flight: Mutex::new(InFlight::default()),
                state,
            }),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> LookupState {
        self.shared.state.borrow().clone()
    }

    /// Receiver that is notified on every transition
    pub fn subscribe(&self) -> watch::Receiver<LookupState> {
        self.shared.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.borrow().is_loading()
    }

    pub fn has_error(&self) -> bool {
        self.shared.state.borrow().has_error()
    }

    /// Look up `postal_code` and move to `Resolved` or `Failed`.
    ///
    /// Returns [`TriggerOutcome::Ignored`] without touching the network when a
    /// lookup is already in flight. The result is applied by a background
    /// task, so dropping the returned future does not leave the controller
    /// stuck in `Loading`.
    pub async fn trigger(&self, postal_code: &str) -> TriggerOutcome {
        let applier = {
            let mut in_flight = self.shared.lock();
            if self.shared.state.borrow().is_loading() {
                debug!(postal_code, "Lookup already in flight, ignoring trigger");
                return TriggerOutcome::Ignored;
            }

            in_flight.generation += 1;
            let generation = in_flight.generation;

            let resolver = Arc::clone(&self.resolver);
            let code = postal_code.to_string();
            let lookup = tokio::spawn(async move { resolver.resolve(&code).await });
            in_flight.abort = Some(lookup.abort_handle());
            self.shared.state.send_replace(LookupState::Loading);

            let shared = Arc::clone(&self.shared);
            let code = postal_code.to_string();
            tokio::spawn(async move {
                let result = lookup.await;
                shared.apply(generation, &code, result)
            })
        };

        // The applier only fails if the runtime is shutting down
        applier.await.unwrap_or(TriggerOutcome::Discarded)
    }

    /// Return to `Idle`, cancelling any in-flight lookup
    pub fn reset(&self) {
        let mut in_flight = self.shared.lock();
        in_flight.generation += 1;
        if let Some(abort) = in_flight.abort.take() {
            abort.abort();
            debug!("Cancelled in-flight lookup");
        }
        self.shared.state.send_replace(LookupState::Idle);
    }
}

impl<R> Drop for LookupController<R> {
    fn drop(&mut self) {
        let mut in_flight = self.shared.lock();
        in_flight.generation += 1;
        if let Some(abort) = in_flight.abort.take() {
            abort.abort();
        }
    }
}
