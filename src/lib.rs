//! chartop - character browser for the Rick and Morty API.
//!
//! This library provides the core functionality behind the `chartop`
//! terminal viewer:
//! - `api` - upstream data model and character sources (HTTP, mock)
//! - `session` - aggregation, local re-pagination, sorting, view state
//! - `tui` - interactive terminal frontend

pub mod api;
pub mod session;
pub mod tui;
pub mod util;
