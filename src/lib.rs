//! Arrbridge - keeps Plex, Sonarr and Bazarr in step with files on disk
//!
//! This library crate exposes the core functionality for integration testing.

pub mod clients;
pub mod command;
pub mod config;
pub mod error;
pub mod matcher;
pub mod paths;
pub mod remote;
pub mod resolver;
pub mod title;
pub mod workflow;

#[cfg(test)]
mod test_fixtures;
