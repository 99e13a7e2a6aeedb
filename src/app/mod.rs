// src/app/mod.rs — Screen-level state built on the service layer

pub mod dashboard;

pub use dashboard::{Dashboard, LoadOutcome};
