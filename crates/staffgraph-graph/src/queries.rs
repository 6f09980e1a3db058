//! Read operations against the employee/department graph.

use neo4rs::query;

use staffgraph_core::{
    Department, DepartmentFilter, DepartmentMember, Employee, EmployeeFilter, EmployeeSummary,
    NodeId, StaffError, Subordinate,
};

use crate::client::{column, GraphClient, GraphError};
use crate::cypher;

impl GraphClient {
    // ── Employees ────────────────────────────────────────────────

    /// List employees matching every search term in `filter`.
    pub async fn list_employees(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, GraphError> {
        let rows = self
            .query_rows(cypher::list_employees(filter).into_query())
            .await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(Employee {
                name: column(&row, "name")?,
                role: column(&row, "role")?,
                department: column(&row, "department")?,
                id: NodeId(column(&row, "id")?),
            });
        }
        Ok(results)
    }

    /// Everyone with a WORKS_IN edge into a department `id` MANAGES.
    ///
    /// The manager is listed too when they also WORKS_IN that department.
    pub async fn subordinates(&self, id: NodeId) -> Result<Vec<Subordinate>, StaffError> {
        let q = query(
            "MATCH (m:Employee)-[:MANAGES]->(d:Department) WHERE id(m) = $id
             OPTIONAL MATCH (e:Employee)-[:WORKS_IN]->(d)
             RETURN DISTINCT e.name AS name
             ORDER BY name",
        )
        .param("id", id.0);

        let rows = self.query_rows(q).await?;
        if rows.is_empty() {
            return Err(StaffError::NotFound(
                "Employee not found or has no department to manage".to_string(),
            ));
        }

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            // A managed department with no members yields a single null row.
            if let Some(name) = column::<Option<String>>(&row, "name")? {
                results.push(Subordinate { name });
            }
        }
        Ok(results)
    }

    /// Department name, manager, and WORKS_IN headcount for employee `id`.
    pub async fn employee_summary(&self, id: NodeId) -> Result<EmployeeSummary, StaffError> {
        let q = query(
            "MATCH (e:Employee)-[:WORKS_IN]->(d:Department) WHERE id(e) = $id
             WITH d LIMIT 1
             OPTIONAL MATCH (m:Employee)-[:MANAGES]->(d)
             WITH d, head(collect(m.name)) AS manager
             MATCH (:Employee)-[w:WORKS_IN]->(d)
             RETURN d.name AS department_name, manager, count(w) AS number_of_employees",
        )
        .param("id", id.0);

        match self.query_one(q).await? {
            Some(row) => Ok(EmployeeSummary {
                department_name: column(&row, "department_name")?,
                manager: column(&row, "manager")?,
                number_of_employees: column(&row, "number_of_employees")?,
            }),
            None => Err(StaffError::NotFound(
                "Employee not found or has no department".to_string(),
            )),
        }
    }

    // ── Departments ──────────────────────────────────────────────

    pub async fn list_departments(
        &self,
        filter: &DepartmentFilter,
    ) -> Result<Vec<Department>, GraphError> {
        let rows = self
            .query_rows(cypher::list_departments(filter).into_query())
            .await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(Department {
                name: column(&row, "name")?,
                number_of_employees: column(&row, "number_of_employees")?,
                id: NodeId(column(&row, "id")?),
            });
        }
        Ok(results)
    }

    /// Members (WORKS_IN) of department `id`; empty for unknown ids.
    pub async fn department_employees(
        &self,
        id: NodeId,
    ) -> Result<Vec<DepartmentMember>, GraphError> {
        let q = query(
            "MATCH (e:Employee)-[:WORKS_IN]->(d:Department) WHERE id(d) = $id
             RETURN e.name AS name, e.role AS role
             ORDER BY name",
        )
        .param("id", id.0);

        let rows = self.query_rows(q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(DepartmentMember {
                name: column(&row, "name")?,
                role: column(&row, "role")?,
            });
        }
        Ok(results)
    }

    /// Cheap liveness probe.
    pub async fn ping(&self) -> Result<(), GraphError> {
        self.query_one(query("RETURN 1 AS ok")).await?;
        Ok(())
    }
}
