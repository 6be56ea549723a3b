//! Core request construction and dispatch for the Mackerel REST API.
//!
//! This crate knows nothing about any particular HTTP library: implement
//! [`client::EndpointClient`] (or use the reqwest-backed client shipped with
//! `mackerel-api-cli`) and hand it to [`action::run`] together with the
//! invocation parameters.

pub mod action;
pub mod client;
pub mod error;
pub mod params;
pub mod request;
