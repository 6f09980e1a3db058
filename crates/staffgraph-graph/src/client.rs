//! Neo4j connection management and shared graph client.

use neo4rs::{ConfigBuilder, Graph, Query, Row, Txn};
use serde::Deserialize;
use staffgraph_core::StaffError;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Failed to decode column {column}: {reason}")]
    Decode { column: &'static str, reason: String },
}

const CONSTRAINT_VIOLATION: &str = "Neo.ClientError.Schema.ConstraintValidationFailed";

impl GraphError {
    /// True when the server rejected a write against a uniqueness constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Query(neo4rs::Error::Neo4j(e)) if e.code() == CONSTRAINT_VIOLATION)
    }
}

impl From<GraphError> for StaffError {
    fn from(err: GraphError) -> Self {
        StaffError::Store(err.to_string())
    }
}

/// Configuration for connecting to Neo4j.
///
/// Deserialized from the `[neo4j]` config section; every field is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "test1234".to_string(),
            database: "neo4j".to_string(),
            max_connections: 16,
            fetch_size: 256,
        }
    }
}

/// Thread-safe Neo4j graph client with connection pooling.
///
/// Created once at startup and shared by every request handler.
/// Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, database = %config.database, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Execute a query and discard its result.
    pub async fn run(&self, query: Query) -> Result<(), GraphError> {
        self.graph.run(query).await?;
        Ok(())
    }

    /// Execute a query and collect all rows.
    pub async fn query_rows(&self, query: Query) -> Result<Vec<Row>, GraphError> {
        let mut stream = self.graph.execute(query).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a query and return the first row, if any.
    pub async fn query_one(&self, query: Query) -> Result<Option<Row>, GraphError> {
        let mut stream = self.graph.execute(query).await?;
        Ok(stream.next().await?)
    }

    /// Begin a write transaction.
    pub async fn start_txn(&self) -> Result<Txn, GraphError> {
        Ok(self.graph.start_txn().await?)
    }
}

/// Execute a query inside `txn` and return the first row, if any.
pub(crate) async fn txn_query_one(txn: &mut Txn, query: Query) -> Result<Option<Row>, GraphError> {
    let mut stream = txn.execute(query).await?;
    Ok(stream.next(txn.handle()).await?)
}

/// Read a typed column from a row.
pub(crate) fn column<'de, T: serde::Deserialize<'de>>(
    row: &'de Row,
    column: &'static str,
) -> Result<T, GraphError> {
    row.get::<T>(column).map_err(|e| GraphError::Decode {
        column,
        reason: e.to_string(),
    })
}
