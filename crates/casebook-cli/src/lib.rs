//! Library components of the `casebook` command-line client.

pub mod logging;
pub mod render;
pub mod settings;
pub mod views;
