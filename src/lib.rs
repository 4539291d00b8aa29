//! showdesk - catalog administration client
//!
//! Manages a three-level content hierarchy (series, seasons, episodes) against
//! a remote HTTP API: dependent lists that reload and cancel as selections
//! change, and one normalized message for every kind of server error.
//!
//! # Modules
//!
//! - `models` - Series, seasons, episodes and their create drafts
//! - `api` - HTTP gateways and error normalization
//! - `cascade` - Cancellable dependent loading driven by a parent selection
//! - `admin` - The three admin panels over one shared series list
//! - `task` / `runtime` - Deferred work and the single-threaded event loop
//! - `shell` - Line commands for the interactive session
//! - `cli` / `commands` / `config` - The `showdesk` binary

pub mod admin;
pub mod api;
pub mod cascade;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod runtime;
pub mod shell;
pub mod task;

// Re-export commonly used types
pub use models::{Episode, NewEpisode, NewSeason, NewSeries, Season, Series};

pub use admin::AdminWorkflow;
pub use api::{ApiError, Gateway, Gateways, HttpClient};
pub use cascade::{Cascade, LoadState};
pub use config::Config;
pub use runtime::Runtime;
pub use task::Task;
