//! Data models for the FlexTeam attendance planner.
//!
//! Field names serialize in camelCase so the browser client can consume them unchanged.

mod datastore;
mod employee;
mod schedule;

pub use datastore::*;
pub use employee::*;
pub use schedule::*;
