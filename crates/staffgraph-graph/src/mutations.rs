//! Write operations for the employee/department graph.
//!
//! Every operation that needs more than one statement runs in a single
//! explicit transaction; nodes and edges are created with MERGE.

use neo4rs::query;

use staffgraph_core::{DeleteOutcome, EmployeeUpdate, NewEmployee, NodeId, StaffError};

use crate::client::{column, txn_query_one, GraphClient, GraphError};
use crate::cypher;

impl GraphClient {
    /// Create an employee together with its Department and WORKS_IN edge.
    pub async fn add_employee(&self, employee: &NewEmployee) -> Result<NodeId, StaffError> {
        let mut txn = self.start_txn().await?;

        let existing = query("MATCH (e:Employee {name: $name}) RETURN count(e) AS count")
            .param("name", employee.name.clone());
        let count: i64 = match txn_query_one(&mut txn, existing).await? {
            Some(row) => column(&row, "count")?,
            None => 0,
        };
        if count > 0 {
            txn.rollback().await.map_err(GraphError::from)?;
            return Err(duplicate(&employee.name));
        }

        // Only the request whose MERGE created the node gets a row back.
        let create = query(
            "MERGE (e:Employee {name: $name})
             ON CREATE SET e.role = $role, e.department = $department, e._created = true
             WITH e, coalesce(e._created, false) AS created
             REMOVE e._created
             WITH e, created WHERE created
             MERGE (d:Department {name: $department})
             MERGE (e)-[:WORKS_IN]->(d)
             RETURN id(e) AS id",
        )
        .param("name", employee.name.clone())
        .param("role", employee.role.clone())
        .param("department", employee.department.clone());

        // A concurrent creator that commits first surfaces either as an empty
        // MERGE result or as a constraint violation.
        let row = match txn_query_one(&mut txn, create).await {
            Ok(Some(row)) => row,
            Ok(None) => {
                txn.rollback().await.map_err(GraphError::from)?;
                return Err(duplicate(&employee.name));
            }
            Err(e) if e.is_constraint_violation() => return Err(duplicate(&employee.name)),
            Err(e) => return Err(e.into()),
        };
        let id = NodeId(column(&row, "id")?);
        if let Err(e) = txn.commit().await.map_err(GraphError::from) {
            return Err(if e.is_constraint_violation() {
                duplicate(&employee.name)
            } else {
                e.into()
            });
        }

        tracing::info!(
            %id,
            name = %employee.name,
            department = %employee.department,
            "Employee created"
        );
        Ok(id)
    }

    /// Set only the supplied attributes of employee `id`.
    pub async fn update_employee(
        &self,
        id: NodeId,
        update: &EmployeeUpdate,
    ) -> Result<(), StaffError> {
        let mut txn = self.start_txn().await?;

        let exists =
            query("MATCH (e:Employee) WHERE id(e) = $id RETURN id(e) AS id").param("id", id.0);
        if txn_query_one(&mut txn, exists).await?.is_none() {
            txn.rollback().await.map_err(GraphError::from)?;
            return Err(StaffError::employee_not_found());
        }

        if let Some(name) = &update.name {
            let taken = query(
                "MATCH (o:Employee {name: $name}) WHERE id(o) <> $id RETURN count(o) AS count",
            )
            .param("name", name.clone())
            .param("id", id.0);
            let count: i64 = match txn_query_one(&mut txn, taken).await? {
                Some(row) => column(&row, "count")?,
                None => 0,
            };
            if count > 0 {
                txn.rollback().await.map_err(GraphError::from)?;
                return Err(duplicate(name));
            }
        }

        if let Some(stmt) = cypher::update_employee(id, update) {
            if txn_query_one(&mut txn, stmt.into_query()).await?.is_none() {
                txn.rollback().await.map_err(GraphError::from)?;
                return Err(StaffError::employee_not_found());
            }
        }
        txn.commit().await.map_err(GraphError::from)?;

        tracing::info!(%id, ?update, "Employee updated");
        Ok(())
    }

    /// Delete employee `id` and every department it MANAGES, in one statement.
    pub async fn delete_employee(&self, id: NodeId) -> Result<DeleteOutcome, StaffError> {
        let q = query(
            "MATCH (e:Employee) WHERE id(e) = $id
             OPTIONAL MATCH (e)-[:MANAGES]->(d:Department)
             WITH e, collect(d) AS managed
             WITH e, managed, [x IN managed | x.name] AS names
             FOREACH (x IN managed | DETACH DELETE x)
             DETACH DELETE e
             RETURN names",
        )
        .param("id", id.0);

        let Some(row) = self.query_one(q).await? else {
            return Err(StaffError::employee_not_found());
        };
        let outcome = DeleteOutcome {
            removed_departments: column(&row, "names")?,
        };

        tracing::info!(%id, departments = ?outcome.removed_departments, "Employee deleted");
        Ok(outcome)
    }
}

fn duplicate(name: &str) -> StaffError {
    StaffError::DuplicateEmployee {
        name: name.to_string(),
    }
}
