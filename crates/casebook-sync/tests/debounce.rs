mod common;

use casebook_model::{TaskFilter, TaskFilters, TaskStatus, Tasks};
use casebook_sync::{QueryStore, SyncConfig};
use common::{Reply, ScriptedTransport, advance, ids, task};

fn echo_search() -> ScriptedTransport {
    ScriptedTransport::new(|request, _| {
        let id = request.query_value("search").unwrap_or("all").to_string();
        Reply::list(vec![task(&id, "todo")]).after(20)
    })
}

fn idle_store(transport: &ScriptedTransport) -> QueryStore<Tasks, ScriptedTransport> {
    QueryStore::new(
        transport.clone(),
        &SyncConfig::default(),
        TaskFilters::default(),
    )
}

#[tokio::test(start_paused = true)]
async fn keystrokes_coalesce_into_one_read() {
    let transport = echo_search();
    let store = idle_store(&transport);

    for text in ["a", "ab", "abc", "abcd", "abcde"] {
        store.set_filter(TaskFilter::Search(text.to_string()));
        assert!(store.debounce_pending());
        advance(50).await;
    }
    assert_eq!(transport.call_count(), 0);

    advance(400).await;
    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].query_value("search"), Some("abcde"));
    assert_eq!(ids(&store.state()), vec!["abcde"]);
    assert!(!store.debounce_pending());
}

#[tokio::test(start_paused = true)]
async fn read_fires_one_window_after_last_edit() {
    let transport = echo_search();
    let store = idle_store(&transport);

    store.set_filter(TaskFilter::Search("rent".into()));
    advance(299).await;
    assert_eq!(transport.call_count(), 0);
    advance(2).await;
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn trailing_whitespace_is_not_a_new_search() {
    let transport = echo_search();
    let store = idle_store(&transport);

    store.set_filter(TaskFilter::Search("rent".into()));
    advance(400).await;
    assert_eq!(transport.call_count(), 1);

    store.set_filter(TaskFilter::Search("rent ".into()));
    assert!(!store.debounce_pending());
    advance(400).await;
    assert_eq!(transport.call_count(), 1);
    assert_eq!(store.criteria().search, "rent");
}

#[tokio::test(start_paused = true)]
async fn immediate_change_carries_buffered_search() {
    let transport = echo_search();
    let store = idle_store(&transport);

    store.set_filter(TaskFilter::Search("ren".into()));
    advance(100).await;
    store.set_filter(TaskFilter::Status(Some(TaskStatus::Todo)));

    assert_eq!(transport.call_count(), 1);
    assert!(!store.debounce_pending());
    let call = &transport.calls()[0];
    assert_eq!(call.query_value("search"), Some("ren"));
    assert_eq!(call.query_value("status"), Some("todo"));

    advance(500).await;
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn search_typed_then_erased_skips_dispatch() {
    let transport = echo_search();
    let store = QueryStore::<Tasks, _>::mount(
        transport.clone(),
        &SyncConfig::default(),
        TaskFilters::default(),
    );

    store.set_filter(TaskFilter::Search("x".into()));
    advance(100).await;
    store.set_filter(TaskFilter::Search(String::new()));
    advance(500).await;

    assert_eq!(transport.call_count(), 1);
    assert_eq!(ids(&store.state()), vec!["all"]);
}

#[tokio::test(start_paused = true)]
async fn refresh_cancels_pending_debounce() {
    let transport = echo_search();
    let store = idle_store(&transport);

    store.set_filter(TaskFilter::Search("boiler".into()));
    store.refresh();
    assert!(!store.debounce_pending());
    assert_eq!(transport.calls()[0].query_value("search"), Some("boiler"));

    advance(500).await;
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn custom_window_is_honoured() {
    let transport = echo_search();
    let store = QueryStore::<Tasks, _>::new(
        transport.clone(),
        &SyncConfig::with_debounce_ms(50),
        TaskFilters::default(),
    );

    store.set_filter(TaskFilter::Search("roof".into()));
    advance(60).await;
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn mixed_update_dispatches_immediately() {
    let transport = echo_search();
    let store = idle_store(&transport);

    store.update_filters([
        TaskFilter::Search("gutter".into()),
        TaskFilter::Status(Some(TaskStatus::Done)),
    ]);

    assert_eq!(transport.call_count(), 1);
    assert!(!store.debounce_pending());
    assert_eq!(store.criteria().search, "gutter");
}
