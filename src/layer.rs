//! Middleware for HTTP pipelines.

pub mod redirect;
