//! HTTP API: middleware and route handlers

pub mod middleware;
pub mod services;
