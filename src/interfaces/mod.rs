//! User interfaces besides the HTTP API

pub mod cli;
