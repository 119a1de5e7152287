//! # Misc utilities
//!
//! This module contains some utilities that are used but not specific to the Jira proxy.
pub mod http;
