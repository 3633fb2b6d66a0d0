//! Core of the creator-discovery client: the REST API client, parameter
//! normalization, result classification, and the stateful workflow
//! controllers. The binary in `main.rs` adds the CLI shell on top.

pub mod api;
pub mod classify;
pub mod controller;
pub mod model;
pub mod params;
