//! Collaborator traits the domain depends on.

pub mod calendar_port;
pub mod config_port;
pub mod data_port;
pub mod report_port;
