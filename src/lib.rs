//! HTTP transport for the notekeep store.

pub mod api;
pub mod config;
