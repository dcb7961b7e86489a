//! Studio calendar: tasks with delivery deadlines, clients, staff and a
//! social-media posting plan, kept in JSON tables under the data directory.

pub mod calendar;
pub mod clock;
pub mod commands;
pub mod config;
pub mod deadline;
pub mod error;
pub mod filters;
pub mod locale;
pub mod models;
pub mod schedule;
pub mod session;
pub mod storage;
pub mod tui;

pub use error::{Error, Result};
pub use session::Session;
