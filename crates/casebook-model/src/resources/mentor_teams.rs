//! Mentor teams for the youth program (`/api/mentor-teams`).

use serde::{Deserialize, Serialize};

use crate::criteria::{Criteria, FieldClass, PageCursor, apply_predicate, apply_search, push_search};
use crate::resource::{Entity, Resource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorTeam {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub lead_mentor_id: Option<String>,
    #[serde(default)]
    pub mentee_count: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Entity for MentorTeam {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentorTeamFilters {
    pub search: String,
    pub program: Option<String>,
    pub active: Option<bool>,
    pub cursor: PageCursor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MentorTeamFilter {
    Search(String),
    Program(Option<String>),
    Active(Option<bool>),
    Page(u32),
    Limit(u32),
}

impl Criteria for MentorTeamFilters {
    type Update = MentorTeamFilter;

    fn apply(&mut self, update: MentorTeamFilter) -> Option<FieldClass> {
        let cursor = &mut self.cursor;
        match update {
            MentorTeamFilter::Search(text) => {
                apply_search(&mut self.search, &text, cursor)
            }
            MentorTeamFilter::Program(program) => {
                apply_predicate(&mut self.program, program, cursor, FieldClass::Immediate)
            }
            MentorTeamFilter::Active(active) => {
                apply_predicate(&mut self.active, active, cursor, FieldClass::Immediate)
            }
            MentorTeamFilter::Page(page) => cursor.go_to(page).then_some(FieldClass::Immediate),
            MentorTeamFilter::Limit(limit) => {
                cursor.set_limit(limit).then_some(FieldClass::Immediate)
            }
        }
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_search(&mut pairs, &self.search);
        if let Some(program) = &self.program {
            pairs.push(("program", program.clone()));
        }
        if let Some(active) = self.active {
            pairs.push(("active", active.to_string()));
        }
        self.cursor.push_pairs(&mut pairs);
        pairs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMentorTeam {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_mentor_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorTeamPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_mentor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// The mentor-team list resource.
#[derive(Debug, Clone, Copy)]
pub struct MentorTeams;

impl Resource for MentorTeams {
    type Entity = MentorTeam;
    type Criteria = MentorTeamFilters;
    type Create = NewMentorTeam;
    type Patch = MentorTeamPatch;

    const NAME: &'static str = "mentor-teams";
    const PATH: &'static str = "/api/mentor-teams";
}
