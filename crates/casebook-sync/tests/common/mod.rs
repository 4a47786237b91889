//! Scripted transport for store tests.
//!
//! Tests run on a paused tokio clock, so reply latencies are exact and a test
//! can observe state at any instant by sleeping to it.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use casebook_model::{Envelope, Pagination, Task};
use casebook_sync::{QueryState, Request, Result, SyncError, Transport};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// How the scripted backend answers one request.
#[derive(Debug, Clone)]
pub struct Reply {
    latency: Duration,
    outcome: Result<Envelope>,
    ignore_signal: bool,
}

impl Reply {
    pub fn envelope(envelope: Envelope) -> Self {
        Self {
            latency: Duration::from_millis(10),
            outcome: Ok(envelope),
            ignore_signal: false,
        }
    }

    /// A one-page list response.
    pub fn list(items: Vec<Value>) -> Self {
        let total = items.len() as u64;
        Self::envelope(Envelope::list(
            Value::Array(items),
            Pagination {
                page: 1,
                limit: 20,
                total,
                total_pages: 1,
                has_more: false,
            },
        ))
    }

    pub fn entity(entity: Value) -> Self {
        Self::envelope(Envelope::ok(entity))
    }

    pub fn ack() -> Self {
        Self::envelope(Envelope {
            success: true,
            ..Default::default()
        })
    }

    pub fn fail(error: SyncError) -> Self {
        Self {
            latency: Duration::from_millis(10),
            outcome: Err(error),
            ignore_signal: false,
        }
    }

    pub fn after(mut self, millis: u64) -> Self {
        self.latency = Duration::from_millis(millis);
        self
    }

    /// Resolve normally even after the abort signal fires.
    pub fn ignoring_signal(mut self) -> Self {
        self.ignore_signal = true;
        self
    }
}

type Script = dyn Fn(&Request, usize) -> Reply + Send + Sync;

struct Inner {
    script: Box<Script>,
    calls: Mutex<Vec<Request>>,
    cancelled: AtomicUsize,
}

/// Transport whose replies come from a closure over `(request, call index)`.
#[derive(Clone)]
pub struct ScriptedTransport {
    inner: Arc<Inner>,
}

impl ScriptedTransport {
    pub fn new(script: impl Fn(&Request, usize) -> Reply + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                script: Box::new(script),
                calls: Mutex::new(Vec::new()),
                cancelled: AtomicUsize::new(0),
            }),
        }
    }

    /// Every request sent so far, in order.
    pub fn calls(&self) -> Vec<Request> {
        self.inner.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.calls.lock().len()
    }

    /// Requests with the given method and target (`path/item`).
    pub fn calls_to(&self, method: casebook_sync::Method, path: &str) -> Vec<Request> {
        self.calls()
            .into_iter()
            .filter(|r| r.method == method && r.target() == path)
            .collect()
    }

    /// How many in-flight requests observed their abort signal.
    pub fn cancelled(&self) -> usize {
        self.inner.cancelled.load(Ordering::SeqCst)
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: Request) -> impl Future<Output = Result<Envelope>> + Send + 'static {
        let index = {
            let mut calls = self.inner.calls.lock();
            calls.push(request.clone());
            calls.len() - 1
        };
        let reply = (self.inner.script)(&request, index);
        let inner = Arc::clone(&self.inner);
        let signal = request.signal;

        async move {
            if reply.ignore_signal {
                tokio::time::sleep(reply.latency).await;
                return reply.outcome;
            }
            tokio::select! {
                () = aborted(signal) => {
                    inner.cancelled.fetch_add(1, Ordering::SeqCst);
                    Err(SyncError::Cancelled)
                }
                () = tokio::time::sleep(reply.latency) => reply.outcome,
            }
        }
    }
}

async fn aborted(signal: Option<CancellationToken>) {
    match signal {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

pub fn task(id: &str, status: &str) -> Value {
    json!({ "id": id, "title": format!("Task {id}"), "status": status })
}

pub fn titled_task(id: &str, title: &str) -> Value {
    json!({ "id": id, "title": title, "status": "todo" })
}

pub fn ids(state: &QueryState<Task>) -> Vec<String> {
    state.items.iter().map(|t| t.id.clone()).collect()
}

pub async fn advance(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}
