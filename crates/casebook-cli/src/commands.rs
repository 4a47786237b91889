use std::io::{self, BufRead};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use casebook_cli::render::{entity_table, pager_line};
use casebook_cli::settings::Settings;
use casebook_cli::views::{FilterArgs, ListView, unsupported_flags};
use casebook_client::{HttpTransport, RateLimiter};
use casebook_model::{Donations, FinancialEntries, MentorTeams, Tasks, WorkOrders};
use casebook_sync::{QueryState, QueryStore, SyncConfig};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::{Command, ConfigArgs, ResourceArg};

/// Everything a resource command needs.
pub struct Session {
    transport: HttpTransport,
    sync: SyncConfig,
}

impl Session {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut transport =
            HttpTransport::new(&settings.client).context("configure HTTP transport")?;
        if let Some(limits) = settings.rate_limit {
            debug!(?limits, "client-side rate limiting enabled");
            transport = transport.with_rate_limiter(Arc::new(RateLimiter::new(limits)));
        }
        Ok(Self {
            transport,
            sync: settings.sync.clone(),
        })
    }

    fn store<R: ListView>(&self) -> QueryStore<R, HttpTransport> {
        QueryStore::new(self.transport.clone(), &self.sync, R::Criteria::default())
    }
}

/// Run a resource command against the backend.
pub async fn run_resource(session: &Session, command: &Command) -> Result<()> {
    let resource = match command {
        Command::List(args) => args.resource,
        Command::Show(args) | Command::Delete(args) => args.resource,
        Command::Create(args) => args.resource,
        Command::Update(args) => args.resource,
        Command::Watch(args) => args.resource,
        Command::Config(_) => anyhow::bail!("config does not talk to the backend"),
    };
    match resource {
        ResourceArg::Tasks => run_for::<Tasks>(session, command).await,
        ResourceArg::Donations => run_for::<Donations>(session, command).await,
        ResourceArg::WorkOrders => run_for::<WorkOrders>(session, command).await,
        ResourceArg::FinancialEntries => run_for::<FinancialEntries>(session, command).await,
        ResourceArg::MentorTeams => run_for::<MentorTeams>(session, command).await,
    }
}

async fn run_for<R: ListView>(session: &Session, command: &Command) -> Result<()> {
    match command {
        Command::List(args) => list::<R>(session, &args.filters(), args.json).await,
        Command::Show(args) => {
            let entity = session
                .store::<R>()
                .fetch_one(&args.id)
                .await
                .with_context(|| format!("fetch {} {}", R::NAME, args.id))?;
            print_json(&entity)
        }
        Command::Create(args) => {
            let payload: R::Create =
                serde_json::from_str(&args.data).context("parse --data as a create body")?;
            let entity = session
                .store::<R>()
                .create(payload)
                .await
                .with_context(|| format!("create {}", R::NAME))?;
            info!(resource = R::NAME, "created");
            print_json(&entity)
        }
        Command::Update(args) => {
            let patch: R::Patch =
                serde_json::from_str(&args.data).context("parse --data as a patch")?;
            let entity = session
                .store::<R>()
                .update(&args.id, patch)
                .await
                .with_context(|| format!("update {} {}", R::NAME, args.id))?;
            print_json(&entity)
        }
        Command::Delete(args) => {
            session
                .store::<R>()
                .delete(&args.id)
                .await
                .with_context(|| format!("delete {} {}", R::NAME, args.id))?;
            println!("deleted {} {}", R::NAME, args.id);
            Ok(())
        }
        Command::Watch(_) => watch::<R>(session).await,
        Command::Config(_) => Ok(()),
    }
}

async fn list<R: ListView>(session: &Session, filters: &FilterArgs, json: bool) -> Result<()> {
    let ignored = unsupported_flags::<R>(filters);
    if !ignored.is_empty() {
        warn!(resource = R::NAME, flags = ?ignored, "ignoring filters this resource does not support");
    }

    let store = session.store::<R>();
    store.update_filters(R::filter_updates(filters)?);
    // A one-shot listing has nobody left to type: flush a pending search now.
    if store.debounce_pending() || store.generation().get() == 0 {
        store.refresh();
    }

    let mut rx = store.subscribe();
    let state = rx
        .wait_for(|state| !state.loading)
        .await
        .context("list store closed")?
        .clone();
    if let Some(error) = &state.error {
        return Err(error.clone()).with_context(|| format!("list {}", R::NAME));
    }

    if json {
        print_json(&state.items)
    } else {
        print_state::<R>(&state)
    }
}

async fn watch<R: ListView>(session: &Session) -> Result<()> {
    let store = QueryStore::<R, _>::mount(
        session.transport.clone(),
        &session.sync,
        R::Criteria::default(),
    );
    let mut states = store.subscribe();

    let (tx, mut lines) = mpsc::channel::<String>(16);
    tokio::task::spawn_blocking(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    eprintln!("type to search {}; end input with Ctrl-D", R::NAME);
    loop {
        tokio::select! {
            line = lines.recv() => match line {
                Some(text) => {
                    let filters = FilterArgs {
                        search: Some(text),
                        ..FilterArgs::default()
                    };
                    store.update_filters(R::filter_updates(&filters)?);
                }
                None => break,
            },
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                if !state.loading {
                    print_state::<R>(&state)?;
                }
            }
        }
    }

    if store.debounce_pending() {
        store.refresh();
    }
    let state = states
        .wait_for(|state| !state.loading)
        .await
        .context("watch store closed")?
        .clone();
    print_state::<R>(&state)?;
    store.teardown();
    Ok(())
}

fn print_state<R: ListView>(state: &QueryState<R::Entity>) -> Result<()> {
    if let Some(error) = &state.error {
        eprintln!("error: {}", error.user_message());
        return Ok(());
    }
    let rows: Vec<Value> = state
        .items
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()
        .context("render entities")?;
    println!("{}", entity_table(R::COLUMNS, &rows));
    if let Some(p) = state.pagination {
        println!("{}", pager_line(p.page, p.total_pages, p.total, p.has_more));
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("render JSON")?;
    println!("{text}");
    Ok(())
}

/// Show the effective settings, optionally writing defaults first.
pub fn run_config(path: &Path, settings: &Settings, args: &ConfigArgs) -> Result<()> {
    if args.init {
        if path.exists() {
            println!("settings file already exists: {}", path.display());
        } else {
            Settings::default().save_to(path)?;
            println!("wrote default settings to {}", path.display());
        }
    }
    println!("# {}", path.display());
    print!(
        "{}",
        toml::to_string_pretty(settings).context("render settings")?
    );
    Ok(())
}
