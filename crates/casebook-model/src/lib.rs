//! Data model for Casebook list resources.
//!
//! This crate holds everything the request-synchronization layer needs to know
//! about a resource without knowing how it is fetched:
//!
//! - **Entities** keyed by a string id ([`Entity`])
//! - **Filter criteria** with debounced and immediate fields ([`Criteria`])
//! - **Resources** tying an entity to its criteria, payloads and API path ([`Resource`])
//! - **Wire envelope** returned by the backing API, with a parse-or-reject
//!   step into typed data ([`Envelope`])
//!
//! # Resources
//!
//! | Resource            | Path                      |
//! |---------------------|---------------------------|
//! | [`Tasks`]           | `/api/tasks`              |
//! | [`Donations`]       | `/api/donations`          |
//! | [`WorkOrders`]      | `/api/work-orders`        |
//! | [`FinancialEntries`]| `/api/financial-entries`  |
//! | [`MentorTeams`]     | `/api/mentor-teams`       |

pub mod criteria;
pub mod envelope;
pub mod error;
pub mod resource;
pub mod resources;

pub use criteria::{Criteria, FieldClass, PageCursor};
pub use envelope::{Envelope, Page, Pagination};
pub use error::{ModelError, Result};
pub use resource::{Entity, Resource};
pub use resources::donations::{
    Donation, DonationFilter, DonationFilters, DonationKind, DonationPatch, Donations, NewDonation,
};
pub use resources::financial::{
    EntryType, FinancialEntries, FinancialEntry, FinancialEntryPatch, FinancialFilter,
    FinancialFilters, NewFinancialEntry,
};
pub use resources::mentor_teams::{
    MentorTeam, MentorTeamFilter, MentorTeamFilters, MentorTeamPatch, MentorTeams, NewMentorTeam,
};
pub use resources::tasks::{
    NewTask, Task, TaskFilter, TaskFilters, TaskPatch, TaskPriority, TaskStatus, Tasks,
};
pub use resources::work_orders::{
    NewWorkOrder, WorkOrder, WorkOrderFilter, WorkOrderFilters, WorkOrderPatch, WorkOrderStatus,
    WorkOrders,
};
