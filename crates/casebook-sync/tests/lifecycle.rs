mod common;

use casebook_model::{NewTask, TaskFilter, TaskFilters, Tasks};
use casebook_sync::{Method, QueryStore, SyncConfig};
use common::{Reply, ScriptedTransport, advance, task, titled_task};

fn slow_backend() -> ScriptedTransport {
    ScriptedTransport::new(|request, _| match request.method {
        Method::Post => Reply::entity(titled_task("new-1", "Order mulch")).after(50),
        _ => Reply::list(vec![task("a", "todo")]).after(100),
    })
}

#[tokio::test(start_paused = true)]
async fn teardown_cancels_in_flight_read_once() {
    let transport = slow_backend();
    let store = QueryStore::<Tasks, _>::mount(
        transport.clone(),
        &SyncConfig::default(),
        TaskFilters::default(),
    );
    let mut rx = store.subscribe();

    store.teardown();
    store.teardown();
    assert!(store.is_torn_down());

    advance(300).await;
    assert_eq!(transport.cancelled(), 1);
    assert!(!rx.has_changed().unwrap());
    assert!(store.state().items.is_empty());
}

#[tokio::test(start_paused = true)]
async fn teardown_drops_pending_debounce() {
    let transport = slow_backend();
    let store = QueryStore::<Tasks, _>::new(
        transport.clone(),
        &SyncConfig::default(),
        TaskFilters::default(),
    );

    store.set_filter(TaskFilter::Search("mulch".into()));
    store.teardown();
    advance(1000).await;

    assert_eq!(transport.call_count(), 0);
    assert!(!store.debounce_pending());
}

#[tokio::test(start_paused = true)]
async fn calls_after_teardown_are_ignored() {
    let transport = slow_backend();
    let store = QueryStore::<Tasks, _>::new(
        transport.clone(),
        &SyncConfig::default(),
        TaskFilters::default(),
    );
    store.teardown();

    store.refresh();
    store.set_filter(TaskFilter::Page(2));
    assert_eq!(transport.call_count(), 0);
    assert_eq!(store.criteria(), TaskFilters::default());
}

#[tokio::test(start_paused = true)]
async fn dropping_last_clone_tears_down() {
    let transport = slow_backend();
    let store = QueryStore::<Tasks, _>::mount(
        transport.clone(),
        &SyncConfig::default(),
        TaskFilters::default(),
    );
    let other = store.clone();
    let mutations = store.mutations();

    drop(store);
    advance(10).await;
    assert!(!other.is_torn_down());
    assert_eq!(transport.cancelled(), 0);

    drop(other);
    advance(10).await;
    assert_eq!(transport.cancelled(), 1);

    // A dispatcher alone does not keep the store mounted, but can still write.
    let created = mutations.create(NewTask::titled("Order mulch")).await.unwrap();
    assert_eq!(created.id, "new-1");
}

#[tokio::test(start_paused = true)]
async fn mutation_after_teardown_reaches_backend_without_writing() {
    let transport = slow_backend();
    let store = QueryStore::<Tasks, _>::mount(
        transport.clone(),
        &SyncConfig::default(),
        TaskFilters::default(),
    );
    let mut rx = store.subscribe();
    store.teardown();

    let created = store.create(NewTask::titled("Order mulch")).await.unwrap();
    assert_eq!(created.id, "new-1");
    assert_eq!(transport.calls_to(Method::Post, "/api/tasks").len(), 1);
    assert!(!rx.has_changed().unwrap());
    assert!(!store.state().contains("new-1"));
}

#[tokio::test(start_paused = true)]
async fn mutation_in_flight_at_teardown_still_completes() {
    let transport = slow_backend();
    let store = QueryStore::<Tasks, _>::mount(
        transport.clone(),
        &SyncConfig::default(),
        TaskFilters::default(),
    );

    let pending = tokio::spawn({
        let store = store.clone();
        async move { store.create(NewTask::titled("Order mulch")).await }
    });
    advance(10).await;
    store.teardown();

    let created = pending.await.unwrap().unwrap();
    assert_eq!(created.id, "new-1");
    assert_eq!(transport.cancelled(), 1);
    assert!(!store.state().contains("new-1"));
}
