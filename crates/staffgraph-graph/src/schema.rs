//! Uniqueness constraints for the employee/department graph.
//!
//! Installed once at startup. `MERGE` on a constrained property is serialized
//! by Neo4j, which is what makes employee creation race-free.

use neo4rs::query;

use crate::client::{GraphClient, GraphError};

const CONSTRAINTS: [&str; 2] = [
    "CREATE CONSTRAINT employee_name_unique IF NOT EXISTS
     FOR (e:Employee) REQUIRE e.name IS UNIQUE",
    "CREATE CONSTRAINT department_name_unique IF NOT EXISTS
     FOR (d:Department) REQUIRE d.name IS UNIQUE",
];

impl GraphClient {
    /// Create the schema constraints if they do not exist yet.
    ///
    /// Fails if existing data already violates them (e.g. duplicate names).
    pub async fn ensure_schema(&self) -> Result<(), GraphError> {
        for cypher in CONSTRAINTS {
            self.run(query(cypher)).await?;
        }
        tracing::info!(constraints = CONSTRAINTS.len(), "Graph schema installed");
        Ok(())
    }
}
