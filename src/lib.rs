// src/lib.rs — Library root for the ShareTunes client

pub mod api;
pub mod app;
pub mod auth;
pub mod cli;
pub mod client;
pub mod infra;
pub mod util;
