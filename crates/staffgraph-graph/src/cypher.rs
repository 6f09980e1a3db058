//! Parameterized Cypher composition from structured filters.
//!
//! Search terms and attribute values only ever travel as parameters; the
//! query text is assembled from the fixed fragments in this module.

use neo4rs::{query, Query};

use staffgraph_core::{
    DepartmentFilter, DepartmentSort, EmployeeField, EmployeeFilter, EmployeeSort, EmployeeUpdate,
    NodeId,
};

/// A Cypher statement with its parameters, not yet bound to a driver query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub cypher: String,
    pub string_params: Vec<(&'static str, String)>,
    pub id_param: Option<i64>,
}

impl Statement {
    pub fn into_query(self) -> Query {
        let mut q = query(&self.cypher);
        for (key, value) in self.string_params {
            q = q.param(key, value);
        }
        if let Some(id) = self.id_param {
            q = q.param("id", id);
        }
        q
    }
}

/// AND-composed `WHERE` predicates plus the parameters they reference.
#[derive(Debug, Default)]
struct Predicates {
    clauses: Vec<&'static str>,
    params: Vec<(&'static str, String)>,
}

impl Predicates {
    fn push(&mut self, clause: &'static str, param: &'static str, value: &str) {
        self.clauses.push(clause);
        self.params.push((param, value.to_string()));
    }

    fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("\nWHERE {}", self.clauses.join(" AND "))
        }
    }
}

// ── Employees ─────────────────────────────────────────────────────

/// Predicate for one employee search field, bound to `$<field key>`.
fn employee_predicate(field: EmployeeField) -> &'static str {
    match field {
        EmployeeField::Name => "toLower(e.name) CONTAINS toLower($name)",
        EmployeeField::Role => "toLower(e.role) CONTAINS toLower($role)",
        EmployeeField::Department => {
            "EXISTS { MATCH (e)-[:WORKS_IN]->(d:Department) \
             WHERE toLower(d.name) CONTAINS toLower($department) }"
        }
    }
}

pub fn list_employees(filter: &EmployeeFilter) -> Statement {
    let mut predicates = Predicates::default();
    for (field, term) in &filter.terms {
        predicates.push(employee_predicate(*field), field.key(), term);
    }

    let order = match filter.sort {
        Some(EmployeeSort::NameAsc) => "\nORDER BY name",
        Some(EmployeeSort::NameDesc) => "\nORDER BY name DESC",
        None => "",
    };

    Statement {
        cypher: format!(
            "MATCH (e:Employee){}
RETURN e.name AS name, e.role AS role, e.department AS department, id(e) AS id{order}",
            predicates.where_clause()
        ),
        string_params: predicates.params,
        id_param: None,
    }
}

/// Partial update of an employee's attributes.
///
/// Returns `None` when the update carries no fields. A department change also
/// moves the WORKS_IN edge so the attribute and the edge keep agreeing.
pub fn update_employee(id: NodeId, update: &EmployeeUpdate) -> Option<Statement> {
    if update.is_empty() {
        return None;
    }

    let mut assignments = Vec::new();
    let mut params = Vec::new();
    for (key, value) in [
        ("name", &update.name),
        ("role", &update.role),
        ("department", &update.department),
    ] {
        if let Some(value) = value {
            assignments.push(format!("e.{key} = ${key}"));
            params.push((key, value.clone()));
        }
    }

    let relink = if update.department.is_some() {
        "
WITH e
OPTIONAL MATCH (e)-[w:WORKS_IN]->(:Department)
DELETE w
WITH DISTINCT e
MERGE (d:Department {name: $department})
MERGE (e)-[:WORKS_IN]->(d)"
    } else {
        ""
    };

    Some(Statement {
        cypher: format!(
            "MATCH (e:Employee) WHERE id(e) = $id
SET {}{relink}
RETURN id(e) AS id",
            assignments.join(", ")
        ),
        string_params: params,
        id_param: Some(id.0),
    })
}

// ── Departments ───────────────────────────────────────────────────

pub fn list_departments(filter: &DepartmentFilter) -> Statement {
    let mut predicates = Predicates::default();
    if let Some(name) = &filter.name {
        predicates.push("toLower(d.name) CONTAINS toLower($name)", "name", name);
    }

    let order = match filter.sort {
        Some(DepartmentSort::NameAsc) => "\nORDER BY name",
        Some(DepartmentSort::NameDesc) => "\nORDER BY name DESC",
        Some(DepartmentSort::EmployeesAsc) => "\nORDER BY number_of_employees, name",
        Some(DepartmentSort::EmployeesDesc) => "\nORDER BY number_of_employees DESC, name",
        None => "",
    };

    Statement {
        cypher: format!(
            "MATCH (d:Department){}
OPTIONAL MATCH (:Employee)-[w:WORKS_IN]->(d)
RETURN d.name AS name, count(w) AS number_of_employees, id(d) AS id{order}",
            predicates.where_clause()
        ),
        string_params: predicates.params,
        id_param: None,
    }
}
