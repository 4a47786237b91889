use casebook_cli::views::{FilterArgs, ListView, parse_choice, unsupported_flags};
use casebook_model::{
    Criteria, Donations, EntryType, FinancialEntries, FinancialFilter, MentorTeams, TaskFilter,
    TaskFilters, TaskStatus, Tasks,
};

#[test]
fn explicit_page_survives_predicate_reset() {
    let args = FilterArgs {
        search: Some("boiler".into()),
        status: Some("in_progress".into()),
        limit: Some(50),
        page: Some(3),
        ..FilterArgs::default()
    };
    let updates = Tasks::filter_updates(&args).unwrap();
    assert_eq!(
        updates,
        vec![
            TaskFilter::Search("boiler".into()),
            TaskFilter::Status(Some(TaskStatus::InProgress)),
            TaskFilter::Limit(50),
            TaskFilter::Page(3),
        ]
    );

    let mut filters = TaskFilters::default();
    for update in updates {
        filters.apply(update);
    }
    assert_eq!(filters.cursor.page, 3);
    assert_eq!(filters.cursor.limit, 50);
}

#[test]
fn invalid_choice_names_the_flag() {
    let args = FilterArgs {
        status: Some("urgent".into()),
        ..FilterArgs::default()
    };
    let error = Tasks::filter_updates(&args).unwrap_err();
    assert!(error.to_string().contains("--status"));
}

#[test]
fn kind_maps_to_entry_type() {
    let args = FilterArgs {
        kind: Some("expense".into()),
        ..FilterArgs::default()
    };
    assert_eq!(
        FinancialEntries::filter_updates(&args).unwrap(),
        vec![FinancialFilter::EntryType(Some(EntryType::Expense))]
    );
    assert_eq!(parse_choice::<EntryType>("kind", "income").unwrap(), EntryType::Income);
}

#[test]
fn unsupported_flags_are_reported() {
    let args = FilterArgs {
        search: Some("gala".into()),
        status: Some("todo".into()),
        site: Some("north".into()),
        page: Some(2),
        ..FilterArgs::default()
    };
    assert_eq!(unsupported_flags::<Donations>(&args), vec!["status", "site"]);
    assert_eq!(unsupported_flags::<Tasks>(&args), vec!["site"]);
    assert!(unsupported_flags::<MentorTeams>(&FilterArgs::default()).is_empty());
}

#[test]
fn no_flags_no_updates() {
    assert!(Tasks::filter_updates(&FilterArgs::default()).unwrap().is_empty());
    assert!(Donations::filter_updates(&FilterArgs::default()).unwrap().is_empty());
}
