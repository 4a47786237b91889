//! How each resource is listed and filtered from the command line.

use anyhow::{Context, Result};
use casebook_model::{
    Criteria, DonationFilter, Donations, FinancialEntries, FinancialFilter, MentorTeamFilter,
    MentorTeams, Resource, TaskFilter, Tasks, WorkOrderFilter, WorkOrders,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Criteria edit type of a resource.
pub type UpdateOf<R> = <<R as Resource>::Criteria as Criteria>::Update;

/// Filter flags accepted by `list`. Each resource uses the ones it knows.
#[derive(Debug, Clone, Default)]
pub struct FilterArgs {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub kind: Option<String>,
    pub site: Option<String>,
    pub campaign: Option<String>,
    pub program: Option<String>,
    pub period: Option<String>,
    pub active: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl FilterArgs {
    /// Names of the flags that were given.
    #[must_use]
    pub fn given(&self) -> Vec<&'static str> {
        let flags = [
            ("search", self.search.is_some()),
            ("status", self.status.is_some()),
            ("priority", self.priority.is_some()),
            ("category", self.category.is_some()),
            ("kind", self.kind.is_some()),
            ("site", self.site.is_some()),
            ("campaign", self.campaign.is_some()),
            ("program", self.program.is_some()),
            ("period", self.period.is_some()),
            ("active", self.active.is_some()),
            ("page", self.page.is_some()),
            ("limit", self.limit.is_some()),
        ];
        flags
            .into_iter()
            .filter_map(|(name, set)| set.then_some(name))
            .collect()
    }
}

/// A resource the CLI can list, show, create, update and delete.
pub trait ListView:
    Resource<Entity: Serialize, Create: DeserializeOwned, Patch: DeserializeOwned>
{
    /// Entity fields shown as table columns, by wire name.
    const COLUMNS: &'static [&'static str];

    /// Filter flags this resource understands, besides `search`, `page` and `limit`.
    const FILTERS: &'static [&'static str];

    /// Translate flags into criteria edits.
    ///
    /// # Errors
    ///
    /// Fails when a flag value is not a valid choice for this resource.
    fn filter_updates(args: &FilterArgs) -> Result<Vec<UpdateOf<Self>>>;
}

/// Flags given on the command line that `R` ignores.
#[must_use]
pub fn unsupported_flags<R: ListView>(args: &FilterArgs) -> Vec<&'static str> {
    args.given()
        .into_iter()
        .filter(|flag| !matches!(*flag, "search" | "page" | "limit") && !R::FILTERS.contains(flag))
        .collect()
}

/// Parse a flag value into one of the resource's wire enums.
///
/// # Errors
///
/// Fails when `text` is not one of the enum's wire names.
pub fn parse_choice<T: DeserializeOwned>(flag: &str, text: &str) -> Result<T> {
    serde_json::from_value(Value::String(text.to_string()))
        .with_context(|| format!("invalid --{flag} value '{text}'"))
}

/// Search first, then predicates, then limit, then page: limit and predicate
/// edits reset the page, so an explicit page has to come last.
fn finish<U>(
    args: &FilterArgs,
    search: fn(String) -> U,
    mut predicates: Vec<U>,
    limit: fn(u32) -> U,
    page: fn(u32) -> U,
) -> Vec<U> {
    let mut updates = Vec::with_capacity(predicates.len() + 3);
    if let Some(text) = &args.search {
        updates.push(search(text.clone()));
    }
    updates.append(&mut predicates);
    if let Some(value) = args.limit {
        updates.push(limit(value));
    }
    if let Some(value) = args.page {
        updates.push(page(value));
    }
    updates
}

impl ListView for Tasks {
    const COLUMNS: &'static [&'static str] = &["id", "title", "status", "priority", "dueDate"];
    const FILTERS: &'static [&'static str] = &["status", "priority", "category"];

    fn filter_updates(args: &FilterArgs) -> Result<Vec<TaskFilter>> {
        let mut predicates = Vec::new();
        if let Some(status) = &args.status {
            predicates.push(TaskFilter::Status(Some(parse_choice("status", status)?)));
        }
        if let Some(priority) = &args.priority {
            predicates.push(TaskFilter::Priority(Some(parse_choice("priority", priority)?)));
        }
        if let Some(category) = &args.category {
            predicates.push(TaskFilter::Category(Some(category.clone())));
        }
        Ok(finish(args, TaskFilter::Search, predicates, TaskFilter::Limit, TaskFilter::Page))
    }
}

impl ListView for Donations {
    const COLUMNS: &'static [&'static str] =
        &["id", "donorName", "kind", "amountCents", "currency", "receivedOn"];
    const FILTERS: &'static [&'static str] = &["kind", "campaign"];

    fn filter_updates(args: &FilterArgs) -> Result<Vec<DonationFilter>> {
        let mut predicates = Vec::new();
        if let Some(kind) = &args.kind {
            predicates.push(DonationFilter::Kind(Some(parse_choice("kind", kind)?)));
        }
        if let Some(campaign) = &args.campaign {
            predicates.push(DonationFilter::Campaign(Some(campaign.clone())));
        }
        Ok(finish(
            args,
            DonationFilter::Search,
            predicates,
            DonationFilter::Limit,
            DonationFilter::Page,
        ))
    }
}

impl ListView for WorkOrders {
    const COLUMNS: &'static [&'static str] =
        &["id", "title", "status", "priority", "site", "scheduledFor"];
    const FILTERS: &'static [&'static str] = &["status", "priority", "site"];

    fn filter_updates(args: &FilterArgs) -> Result<Vec<WorkOrderFilter>> {
        let mut predicates = Vec::new();
        if let Some(status) = &args.status {
            predicates.push(WorkOrderFilter::Status(Some(parse_choice("status", status)?)));
        }
        if let Some(priority) = &args.priority {
            predicates.push(WorkOrderFilter::Priority(Some(parse_choice(
                "priority", priority,
            )?)));
        }
        if let Some(site) = &args.site {
            predicates.push(WorkOrderFilter::Site(Some(site.clone())));
        }
        Ok(finish(
            args,
            WorkOrderFilter::Search,
            predicates,
            WorkOrderFilter::Limit,
            WorkOrderFilter::Page,
        ))
    }
}

impl ListView for FinancialEntries {
    const COLUMNS: &'static [&'static str] =
        &["id", "label", "entryType", "amountCents", "period", "category"];
    const FILTERS: &'static [&'static str] = &["kind", "category", "period"];

    fn filter_updates(args: &FilterArgs) -> Result<Vec<FinancialFilter>> {
        let mut predicates = Vec::new();
        if let Some(kind) = &args.kind {
            predicates.push(FinancialFilter::EntryType(Some(parse_choice("kind", kind)?)));
        }
        if let Some(category) = &args.category {
            predicates.push(FinancialFilter::Category(Some(category.clone())));
        }
        if let Some(period) = &args.period {
            predicates.push(FinancialFilter::Period(Some(period.clone())));
        }
        Ok(finish(
            args,
            FinancialFilter::Search,
            predicates,
            FinancialFilter::Limit,
            FinancialFilter::Page,
        ))
    }
}

impl ListView for MentorTeams {
    const COLUMNS: &'static [&'static str] = &["id", "name", "program", "menteeCount", "active"];
    const FILTERS: &'static [&'static str] = &["program", "active"];

    fn filter_updates(args: &FilterArgs) -> Result<Vec<MentorTeamFilter>> {
        let mut predicates = Vec::new();
        if let Some(program) = &args.program {
            predicates.push(MentorTeamFilter::Program(Some(program.clone())));
        }
        if let Some(active) = args.active {
            predicates.push(MentorTeamFilter::Active(Some(active)));
        }
        Ok(finish(
            args,
            MentorTeamFilter::Search,
            predicates,
            MentorTeamFilter::Limit,
            MentorTeamFilter::Page,
        ))
    }
}
