//! The PIM CLI client library.
//!
//! This crate provides a command line client for the REST API of a product
//! information management system: listing, fetching and creating products,
//! categories and attributes, with OAuth2 password grant authentication and
//! a persisted token cache.
//!
//! # Modules
//!
//! - `actions`: What each command does once its arguments are parsed
//! - `api`: Resource gateway over the REST API
//! - `auth`: Token exchange and caching
//! - `cli`: Dispatch of parsed commands to actions
//! - `commands`: CLI command definitions
//! - `configuration`: Credential store and persisted settings
//! - `error`: Error taxonomy and its mapping to exit codes
//! - `format`: Table, JSON and CSV output
//! - `model`: Resources, list filters and create payloads

pub mod actions;
pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod configuration;
pub mod context;
pub mod error;
pub mod exit_codes;
pub mod format;
pub mod http_utils;
pub mod model;
