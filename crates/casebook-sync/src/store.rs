//! The query state store.
//!
//! One [`QueryStore`] backs one mounted list view. It owns the filter
//! criteria, the fetch coordinator, the debounce scheduler, and the observable
//! [`QueryState`]. Every clone of the store counts as a consumer; when the
//! last one is dropped (or [`QueryStore::teardown`] is called) the in-flight
//! read is cancelled and the store stops writing state.
//!
//! # Locking
//!
//! All bookkeeping lives behind one short `parking_lot` mutex that is never
//! held across an `.await`. State application after a response is a single
//! critical section, so reads and mutations interleave only at transport
//! boundaries.
//!
//! Do not hold a `watch::Ref` from [`QueryStore::subscribe`] while calling
//! back into the store; state writes take the watch channel's write lock.

use std::sync::{Arc, Weak};

use casebook_model::{Criteria, FieldClass, Page, Resource};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::config::SyncConfig;
use crate::coordinator::{FetchCoordinator, Generation, Ticket, Verdict};
use crate::debounce::{Arm, DebounceScheduler, TimerPoll};
use crate::error::{Result, SyncError};
use crate::mutation::MutationDispatcher;
use crate::state::QueryState;
use crate::transport::{Request, Transport};

type EntityOf<R> = <R as Resource>::Entity;
type CriteriaOf<R> = <R as Resource>::Criteria;
type UpdateOf<R> = <<R as Resource>::Criteria as Criteria>::Update;

/// Mutable bookkeeping guarded by the store mutex.
struct Control<C> {
    criteria: C,
    last_dispatched: Option<C>,
    fetch: FetchCoordinator,
    debounce: DebounceScheduler,
    torn_down: bool,
}

/// State shared between store handles, read tasks, the debounce timer, and
/// mutation tasks.
pub(crate) struct Shared<R: Resource, T> {
    pub(crate) transport: T,
    control: Mutex<Control<CriteriaOf<R>>>,
    state: watch::Sender<QueryState<EntityOf<R>>>,
}

impl<R: Resource, T: Transport> Shared<R, T> {
    /// Dispatch a list read for the current criteria.
    fn dispatch(self: &Arc<Self>, control: &mut Control<CriteriaOf<R>>) {
        let criteria = control.criteria.clone();
        let ticket = control.fetch.begin();
        control.last_dispatched = Some(criteria.clone());

        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        debug!(
            resource = R::NAME,
            generation = %ticket.generation,
            criteria = ?criteria,
            "dispatching list read"
        );

        let request = Request::get(R::PATH)
            .with_query(criteria.query_pairs())
            .with_signal(ticket.signal.clone());
        let call = self.transport.send(request);

        let shared = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = call
                .await
                .and_then(|envelope| envelope.into_page(R::NAME).map_err(SyncError::from));
            shared.finish_read(&ticket, outcome);
        });
    }

    fn finish_read(&self, ticket: &Ticket, outcome: Result<Page<EntityOf<R>>>) {
        let mut control = self.control.lock();
        if control.torn_down {
            trace!(resource = R::NAME, generation = %ticket.generation, "store torn down, dropping read");
            return;
        }

        let cancelled = matches!(outcome, Err(SyncError::Cancelled));
        match control.fetch.settle(ticket, cancelled) {
            Verdict::Cancelled => {
                trace!(resource = R::NAME, generation = %ticket.generation, "discarding cancelled read");
            }
            Verdict::Stale => {
                debug!(
                    resource = R::NAME,
                    generation = %ticket.generation,
                    current = %control.fetch.current(),
                    "discarding stale read"
                );
            }
            Verdict::Apply => match outcome {
                Ok(page) => {
                    debug!(
                        resource = R::NAME,
                        generation = %ticket.generation,
                        items = page.items.len(),
                        "applying read"
                    );
                    self.state.send_modify(|state| state.apply_page(page));
                }
                Err(error) => {
                    warn!(resource = R::NAME, generation = %ticket.generation, %error, "list read failed");
                    self.state.send_modify(|state| {
                        state.loading = false;
                        state.error = Some(error);
                    });
                }
            },
        }
    }

    fn start_timer(self: &Arc<Self>, deadline: Instant) {
        let weak = Arc::downgrade(self);
        tokio::spawn(run_debounce_timer(weak, deadline));
    }

    /// Timer fired: dispatch unless the criteria match what is already loaded.
    fn fire_debounced(self: &Arc<Self>, control: &mut Control<CriteriaOf<R>>) {
        if control.last_dispatched.as_ref() == Some(&control.criteria) {
            debug!(resource = R::NAME, "debounced criteria unchanged, skipping dispatch");
            return;
        }
        self.dispatch(control);
    }

    /// Apply `write` to the observable state unless the store is torn down.
    ///
    /// Returns `false` when the write was suppressed.
    pub(crate) fn write(&self, write: impl FnOnce(&mut QueryState<EntityOf<R>>)) -> bool {
        let control = self.control.lock();
        if control.torn_down {
            return false;
        }
        self.state.send_modify(write);
        drop(control);
        true
    }

    pub(crate) fn surface_error(&self, error: SyncError) {
        if error.is_cancellation() {
            return;
        }
        warn!(resource = R::NAME, %error, "surfacing error");
        self.write(|state| state.error = Some(error));
    }

    fn teardown(&self) {
        let mut control = self.control.lock();
        if control.torn_down {
            return;
        }
        control.torn_down = true;
        control.debounce.cancel();
        let cancelled = control.fetch.abort();
        debug!(resource = R::NAME, cancelled_read = cancelled, "store torn down");
    }
}

async fn run_debounce_timer<R: Resource, T: Transport>(weak: Weak<Shared<R, T>>, first: Instant) {
    let mut wake = first;
    loop {
        tokio::time::sleep_until(wake).await;
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let mut control = shared.control.lock();
        if control.torn_down {
            return;
        }
        match control.debounce.poll(Instant::now()) {
            TimerPoll::Fire => {
                shared.fire_debounced(&mut control);
                return;
            }
            TimerPoll::Wait(next) => wake = next,
            TimerPoll::Idle => return,
        }
    }
}

/// Tears the store down when the last consumer handle goes away.
struct Lease<R: Resource, T: Transport> {
    shared: Arc<Shared<R, T>>,
}

impl<R: Resource, T: Transport> Drop for Lease<R, T> {
    fn drop(&mut self) {
        self.shared.teardown();
    }
}

/// Synchronized list state for one resource.
///
/// Must be created and used inside a tokio runtime.
pub struct QueryStore<R: Resource, T: Transport> {
    shared: Arc<Shared<R, T>>,
    lease: Arc<Lease<R, T>>,
}

impl<R: Resource, T: Transport> Clone for QueryStore<R, T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            lease: Arc::clone(&self.lease),
        }
    }
}

impl<R: Resource, T: Transport> QueryStore<R, T> {
    /// Create an idle store with the given criteria. Nothing is dispatched.
    pub fn new(transport: T, config: &SyncConfig, criteria: CriteriaOf<R>) -> Self {
        let (state, _) = watch::channel(QueryState::default());
        let shared = Arc::new(Shared {
            transport,
            control: Mutex::new(Control {
                criteria,
                last_dispatched: None,
                fetch: FetchCoordinator::new(),
                debounce: DebounceScheduler::new(config.debounce_window()),
                torn_down: false,
            }),
            state,
        });
        let lease = Arc::new(Lease {
            shared: Arc::clone(&shared),
        });
        Self { shared, lease }
    }

    /// Create a store and dispatch the initial read, as a view does on mount.
    pub fn mount(transport: T, config: &SyncConfig, criteria: CriteriaOf<R>) -> Self {
        let store = Self::new(transport, config, criteria);
        store.refresh();
        store
    }

    /// Re-dispatch the current criteria, bypassing any pending debounce.
    pub fn refresh(&self) {
        let mut control = self.shared.control.lock();
        if control.torn_down {
            debug!(resource = R::NAME, "refresh after teardown ignored");
            return;
        }
        control.debounce.cancel();
        self.shared.dispatch(&mut control);
    }

    /// Merge a partial filter update into the criteria.
    ///
    /// Immediate fields dispatch synchronously (cancelling any armed debounce
    /// and carrying the buffered search text); search edits arm the debounce
    /// timer. An update that leaves the criteria unchanged does nothing.
    pub fn update_filters(&self, partial: impl IntoIterator<Item = UpdateOf<R>>) {
        let mut control = self.shared.control.lock();
        if control.torn_down {
            debug!(resource = R::NAME, "filter update after teardown ignored");
            return;
        }

        let before = control.criteria.clone();
        let mut class: Option<FieldClass> = None;
        for update in partial {
            if let Some(changed) = control.criteria.apply(update) {
                class = Some(class.map_or(changed, |c| c.merge(changed)));
            }
        }
        if control.criteria == before {
            trace!(resource = R::NAME, "filter update left criteria unchanged");
            return;
        }

        match class {
            Some(FieldClass::Immediate) => {
                if control.debounce.cancel() {
                    debug!(resource = R::NAME, "immediate change cancelled pending debounce");
                }
                self.shared.dispatch(&mut control);
            }
            Some(FieldClass::Debounced) => match control.debounce.schedule(Instant::now()) {
                Arm::Start(deadline) => self.shared.start_timer(deadline),
                Arm::Rearmed => trace!(resource = R::NAME, "debounce re-armed"),
            },
            None => {}
        }
    }

    /// Convenience for a single-field update.
    pub fn set_filter(&self, update: UpdateOf<R>) {
        self.update_filters(std::iter::once(update));
    }

    /// Current (possibly not yet dispatched) criteria.
    #[must_use]
    pub fn criteria(&self) -> CriteriaOf<R> {
        self.shared.control.lock().criteria.clone()
    }

    /// Generation of the most recent dispatch.
    #[must_use]
    pub fn generation(&self) -> Generation {
        self.shared.control.lock().fetch.current()
    }

    /// Whether a debounced dispatch is waiting on its timer.
    #[must_use]
    pub fn debounce_pending(&self) -> bool {
        self.shared.control.lock().debounce.is_armed()
    }

    /// Snapshot of the observable state.
    #[must_use]
    pub fn state(&self) -> QueryState<EntityOf<R>> {
        self.shared.state.borrow().clone()
    }

    /// Watch the observable state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<QueryState<EntityOf<R>>> {
        self.shared.state.subscribe()
    }

    /// Mutation handle for this store's resource.
    ///
    /// The handle does not keep the store mounted.
    #[must_use]
    pub fn mutations(&self) -> MutationDispatcher<R, T> {
        MutationDispatcher::new(Arc::clone(&self.shared))
    }

    /// Create an entity and prepend it to the list.
    ///
    /// # Errors
    ///
    /// Returns the normalized transport or validation error; the error is
    /// also surfaced on the store.
    pub async fn create(&self, payload: R::Create) -> Result<EntityOf<R>> {
        self.mutations().create(payload).await
    }

    /// Update an entity and replace it in place.
    ///
    /// # Errors
    ///
    /// See [`QueryStore::create`].
    pub async fn update(&self, id: &str, patch: R::Patch) -> Result<EntityOf<R>> {
        self.mutations().update(id, patch).await
    }

    /// Delete an entity, removing it from the list before confirmation.
    ///
    /// # Errors
    ///
    /// See [`QueryStore::create`]. A failed delete is not reverted locally.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.mutations().delete(id).await
    }

    /// Fetch one entity and refresh its cached copy.
    ///
    /// # Errors
    ///
    /// See [`QueryStore::create`]. On failure the cached copy is kept.
    pub async fn fetch_one(&self, id: &str) -> Result<EntityOf<R>> {
        self.mutations().fetch_one(id).await
    }

    /// Cancel any in-flight read and stop all further state writes.
    ///
    /// Idempotent. Pending mutations still reach the backend.
    pub fn teardown(&self) {
        self.shared.teardown();
    }

    /// Whether the store has been torn down.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.shared.control.lock().torn_down
    }
}
