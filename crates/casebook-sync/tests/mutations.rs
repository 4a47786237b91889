mod common;

use casebook_model::{NewTask, TaskFilters, TaskPatch, Tasks};
use casebook_sync::{Method, QueryStore, SyncConfig, SyncError};
use common::{Reply, ScriptedTransport, advance, ids, task, titled_task};

fn mounted(transport: &ScriptedTransport) -> QueryStore<Tasks, ScriptedTransport> {
    QueryStore::mount(
        transport.clone(),
        &SyncConfig::default(),
        TaskFilters::default(),
    )
}

#[tokio::test(start_paused = true)]
async fn create_prepends_and_bumps_total() {
    let transport = ScriptedTransport::new(|request, _| match request.method {
        Method::Post => Reply::entity(titled_task("new-1", "Fix boiler")),
        _ => Reply::list(vec![task("a", "todo")]),
    });
    let store = mounted(&transport);
    advance(20).await;

    let created = store.create(NewTask::titled("Fix boiler")).await.unwrap();
    assert_eq!(created.id, "new-1");

    let state = store.state();
    assert_eq!(ids(&state), vec!["new-1", "a"]);
    assert_eq!(state.pagination.map(|p| p.total), Some(2));

    let post = &transport.calls_to(Method::Post, "/api/tasks")[0];
    assert_eq!(post.body.as_ref().unwrap()["title"], "Fix boiler");
    assert!(post.signal.is_none());
}

#[tokio::test(start_paused = true)]
async fn create_racing_a_read_is_not_duplicated() {
    let transport = ScriptedTransport::new(|request, index| match (request.method, index) {
        (Method::Post, _) => Reply::entity(titled_task("new-1", "Fix boiler")).after(100),
        (_, 0) => Reply::list(vec![task("a", "todo")]),
        _ => Reply::list(vec![titled_task("new-1", "Fix boiler"), task("a", "todo")]).after(20),
    });
    let store = mounted(&transport);
    advance(20).await;

    let pending = tokio::spawn({
        let store = store.clone();
        async move { store.create(NewTask::titled("Fix boiler")).await }
    });
    advance(1).await;
    store.refresh();

    advance(50).await;
    assert_eq!(ids(&store.state()), vec!["new-1", "a"]);

    pending.await.unwrap().unwrap();
    let state = store.state();
    assert_eq!(ids(&state), vec!["new-1", "a"]);
    assert_eq!(state.pagination.map(|p| p.total), Some(2));
}

#[tokio::test(start_paused = true)]
async fn concurrent_updates_last_resolved_wins() {
    let transport = ScriptedTransport::new(|request, _| match request.method {
        Method::Put => {
            let title = request.body.as_ref().unwrap()["title"]
                .as_str()
                .unwrap()
                .to_string();
            let latency = if title == "first" { 100 } else { 50 };
            Reply::entity(titled_task("a", &title)).after(latency)
        }
        _ => Reply::list(vec![titled_task("a", "original"), task("b", "todo")]),
    });
    let store = mounted(&transport);
    advance(20).await;

    let first = TaskPatch {
        title: Some("first".into()),
        ..Default::default()
    };
    let second = TaskPatch {
        title: Some("second".into()),
        ..Default::default()
    };
    let (a, b) = tokio::join!(store.update("a", first), store.update("a", second));
    a.unwrap();
    b.unwrap();

    assert_eq!(transport.calls_to(Method::Put, "/api/tasks/a").len(), 2);
    let state = store.state();
    assert_eq!(ids(&state), vec!["a", "b"]);
    assert_eq!(state.get("a").unwrap().title, "first");
}

#[tokio::test(start_paused = true)]
async fn update_of_unlisted_entity_is_not_inserted() {
    let transport = ScriptedTransport::new(|request, _| match request.method {
        Method::Put => Reply::entity(titled_task("gone", "renamed")),
        _ => Reply::list(vec![task("a", "todo")]),
    });
    let store = mounted(&transport);
    advance(20).await;

    store.update("gone", TaskPatch::default()).await.unwrap();
    assert_eq!(ids(&store.state()), vec!["a"]);
}

#[tokio::test(start_paused = true)]
async fn delete_is_optimistic_and_not_reverted() {
    let transport = ScriptedTransport::new(|request, _| match request.method {
        Method::Delete => Reply::fail(SyncError::Network("gateway timeout".into())).after(50),
        _ => Reply::list(vec![task("a", "todo"), task("b", "todo")]),
    });
    let store = mounted(&transport);
    advance(20).await;

    let pending = tokio::spawn({
        let store = store.clone();
        async move { store.delete("a").await }
    });
    advance(10).await;
    let state = store.state();
    assert_eq!(ids(&state), vec!["b"]);
    assert_eq!(state.pagination.map(|p| p.total), Some(1));

    let result = pending.await.unwrap();
    assert_eq!(result, Err(SyncError::Network("gateway timeout".into())));

    let state = store.state();
    assert_eq!(ids(&state), vec!["b"]);
    assert_eq!(
        state.error,
        Some(SyncError::Network("gateway timeout".into()))
    );
}

#[tokio::test(start_paused = true)]
async fn delete_acknowledged() {
    let transport = ScriptedTransport::new(|request, _| match request.method {
        Method::Delete => Reply::ack(),
        _ => Reply::list(vec![task("a", "todo"), task("b", "todo")]),
    });
    let store = mounted(&transport);
    advance(20).await;

    store.delete("b").await.unwrap();
    let state = store.state();
    assert_eq!(ids(&state), vec!["a"]);
    assert!(state.error.is_none());
    assert_eq!(transport.calls_to(Method::Delete, "/api/tasks/b").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn rejected_create_surfaces_validation_error() {
    let transport = ScriptedTransport::new(|request, _| match request.method {
        Method::Post => Reply::envelope(casebook_model::Envelope::rejected("Title is required")),
        _ => Reply::list(vec![task("a", "todo")]),
    });
    let store = mounted(&transport);
    advance(20).await;

    let result = store.create(NewTask::default()).await;
    let expected = SyncError::Validation("Title is required".into());
    assert_eq!(result, Err(expected.clone()));

    let state = store.state();
    assert_eq!(ids(&state), vec!["a"]);
    assert_eq!(state.error, Some(expected));
    assert_eq!(state.error.unwrap().user_message(), "Title is required");
}

#[tokio::test(start_paused = true)]
async fn mutation_is_not_cancelled_by_a_new_read() {
    let transport = ScriptedTransport::new(|request, _| match request.method {
        Method::Post => Reply::entity(titled_task("new-1", "Paint fence")).after(100),
        _ => Reply::list(vec![task("a", "todo")]).after(10),
    });
    let store = mounted(&transport);

    let pending = tokio::spawn({
        let store = store.clone();
        async move { store.create(NewTask::titled("Paint fence")).await }
    });
    advance(1).await;
    store.refresh();
    store.refresh();

    pending.await.unwrap().unwrap();
    assert_eq!(transport.cancelled(), 2);
    assert!(store.state().contains("new-1"));
}

#[tokio::test(start_paused = true)]
async fn fetch_one_replaces_cached_copy() {
    let transport = ScriptedTransport::new(|request, _| match request.target().as_str() {
        "/api/tasks/a" => Reply::entity(titled_task("a", "refreshed")),
        _ => Reply::list(vec![titled_task("a", "cached"), task("b", "todo")]),
    });
    let store = mounted(&transport);
    advance(20).await;

    let fetched = store.fetch_one("a").await.unwrap();
    assert_eq!(fetched.title, "refreshed");
    assert_eq!(store.state().get("a").unwrap().title, "refreshed");
    assert_eq!(ids(&store.state()), vec!["a", "b"]);
}

#[tokio::test(start_paused = true)]
async fn fetch_one_not_found_keeps_cache() {
    let transport = ScriptedTransport::new(|request, _| match request.target().as_str() {
        "/api/tasks/a" => Reply::fail(SyncError::NotFound("task a".into())),
        _ => Reply::list(vec![titled_task("a", "cached")]),
    });
    let store = mounted(&transport);
    advance(20).await;

    let result = store.fetch_one("a").await;
    assert!(matches!(result, Err(SyncError::NotFound(_))));
    let state = store.state();
    assert_eq!(state.get("a").unwrap().title, "cached");
    assert!(matches!(state.error, Some(SyncError::NotFound(_))));
}
