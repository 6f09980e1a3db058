//! staffgraph-server: HTTP API over the employee/department graph.
//!
//! A thin dispatch layer: handlers parse path, query, and body input, call
//! one `StaffStore` operation, and map the outcome to a status and JSON body.

pub mod config;
pub mod error;
pub mod http;

pub use http::build_router;
