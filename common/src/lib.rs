//! Shared utilities for nactranslate: XDG paths and the HTTP protocol/client.

pub mod client;
pub mod dirs;
pub mod protocol;
