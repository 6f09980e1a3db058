//! staffgraph-graph: stores for the employee/department graph.
//!
//! `GraphClient` is the Neo4j integration: connection pooling, schema
//! constraints, and one parameterized query per business operation.
//! `MemoryStore` implements the same `StaffStore` contract in process.

pub mod client;
pub mod cypher;
pub mod memory;
pub mod mutations;
pub mod queries;
pub mod schema;
pub mod store;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use memory::MemoryStore;
