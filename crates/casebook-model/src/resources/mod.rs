//! List resources exposed by the Casebook API.

pub mod donations;
pub mod financial;
pub mod mentor_teams;
pub mod tasks;
pub mod work_orders;
