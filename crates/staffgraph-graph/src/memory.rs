//! In-process employee/department graph.
//!
//! Mirrors the Neo4j queries node-for-node and edge-for-edge so the HTTP
//! layer can be exercised without a database. Ids come from one counter
//! shared by both labels, as with store-assigned internal ids.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use staffgraph_core::filter::contains_ignore_case;
use staffgraph_core::{
    DeleteOutcome, Department, DepartmentFilter, DepartmentMember, DepartmentSort, Employee,
    EmployeeField, EmployeeFilter, EmployeeSort, EmployeeSummary, EmployeeUpdate, NewEmployee,
    NodeId, Result, StaffError, StaffStore, Subordinate,
};

#[derive(Debug, Clone)]
struct EmployeeNode {
    name: String,
    role: String,
    department: String,
}

#[derive(Debug, Default)]
struct MemoryGraph {
    next_id: i64,
    employees: BTreeMap<NodeId, EmployeeNode>,
    departments: BTreeMap<NodeId, String>,
    /// (employee, department)
    works_in: BTreeSet<(NodeId, NodeId)>,
    /// (employee, department)
    manages: BTreeSet<(NodeId, NodeId)>,
}

impl MemoryGraph {
    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn employee_named(&self, name: &str) -> Option<NodeId> {
        self.employees
            .iter()
            .find(|(_, e)| e.name == name)
            .map(|(id, _)| *id)
    }

    fn merge_department(&mut self, name: &str) -> NodeId {
        if let Some((id, _)) = self.departments.iter().find(|(_, n)| n.as_str() == name) {
            return *id;
        }
        let id = self.allocate();
        self.departments.insert(id, name.to_string());
        id
    }

    fn departments_of(&self, employee: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.works_in
            .iter()
            .filter(move |(e, _)| *e == employee)
            .map(|(_, d)| *d)
    }

    fn members_of(&self, department: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.works_in
            .iter()
            .filter(move |(_, d)| *d == department)
            .map(|(e, _)| *e)
    }

    fn managed_by(&self, employee: NodeId) -> Vec<NodeId> {
        self.manages
            .iter()
            .filter(|(e, _)| *e == employee)
            .map(|(_, d)| *d)
            .collect()
    }

    fn matches(&self, id: NodeId, node: &EmployeeNode, field: EmployeeField, term: &str) -> bool {
        match field {
            EmployeeField::Name => contains_ignore_case(&node.name, term),
            EmployeeField::Role => contains_ignore_case(&node.role, term),
            EmployeeField::Department => self
                .departments_of(id)
                .any(|d| contains_ignore_case(&self.departments[&d], term)),
        }
    }

    fn detach_delete_department(&mut self, id: NodeId) -> Option<String> {
        self.works_in.retain(|(_, d)| *d != id);
        self.manages.retain(|(_, d)| *d != id);
        self.departments.remove(&id)
    }
}

/// A `StaffStore` held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    graph: RwLock<MemoryGraph>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a MANAGES edge from `employee` to the (merged) department `department`.
    ///
    /// The HTTP API never creates MANAGES edges; this seeds them.
    pub async fn assign_manager(&self, employee: NodeId, department: &str) -> Result<NodeId> {
        let mut graph = self.graph.write().await;
        if !graph.employees.contains_key(&employee) {
            return Err(StaffError::employee_not_found());
        }
        let dept = graph.merge_department(department);
        graph.manages.insert((employee, dept));
        Ok(dept)
    }

    /// Internal id of the department named `name`, if it exists.
    pub async fn department_id(&self, name: &str) -> Option<NodeId> {
        let graph = self.graph.read().await;
        graph
            .departments
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(id, _)| *id)
    }
}

#[async_trait]
impl StaffStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn list_employees(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>> {
        let graph = self.graph.read().await;
        let mut results: Vec<Employee> = graph
            .employees
            .iter()
            .filter(|(id, node)| {
                filter
                    .terms
                    .iter()
                    .all(|(field, term)| graph.matches(**id, node, *field, term))
            })
            .map(|(id, node)| Employee {
                name: node.name.clone(),
                role: node.role.clone(),
                department: node.department.clone(),
                id: *id,
            })
            .collect();

        match filter.sort {
            Some(EmployeeSort::NameAsc) => results.sort_by(|a, b| a.name.cmp(&b.name)),
            Some(EmployeeSort::NameDesc) => results.sort_by(|a, b| b.name.cmp(&a.name)),
            None => {}
        }
        Ok(results)
    }

    async fn add_employee(&self, employee: &NewEmployee) -> Result<NodeId> {
        let mut graph = self.graph.write().await;
        if graph.employee_named(&employee.name).is_some() {
            return Err(StaffError::DuplicateEmployee {
                name: employee.name.clone(),
            });
        }

        let id = graph.allocate();
        graph.employees.insert(
            id,
            EmployeeNode {
                name: employee.name.clone(),
                role: employee.role.clone(),
                department: employee.department.clone(),
            },
        );
        let dept = graph.merge_department(&employee.department);
        graph.works_in.insert((id, dept));

        tracing::debug!(%id, name = %employee.name, "Employee created in memory");
        Ok(id)
    }

    async fn update_employee(&self, id: NodeId, update: &EmployeeUpdate) -> Result<()> {
        let mut graph = self.graph.write().await;
        if !graph.employees.contains_key(&id) {
            return Err(StaffError::employee_not_found());
        }
        if let Some(name) = &update.name {
            if graph.employee_named(name).is_some_and(|other| other != id) {
                return Err(StaffError::DuplicateEmployee { name: name.clone() });
            }
        }

        if let Some(department) = &update.department {
            graph.works_in.retain(|(e, _)| *e != id);
            let dept = graph.merge_department(department);
            graph.works_in.insert((id, dept));
        }

        let Some(node) = graph.employees.get_mut(&id) else {
            return Err(StaffError::employee_not_found());
        };
        if let Some(name) = &update.name {
            node.name = name.clone();
        }
        if let Some(role) = &update.role {
            node.role = role.clone();
        }
        if let Some(department) = &update.department {
            node.department = department.clone();
        }
        Ok(())
    }

    async fn delete_employee(&self, id: NodeId) -> Result<DeleteOutcome> {
        let mut graph = self.graph.write().await;
        if graph.employees.remove(&id).is_none() {
            return Err(StaffError::employee_not_found());
        }

        let mut removed_departments = Vec::new();
        for dept in graph.managed_by(id) {
            if let Some(name) = graph.detach_delete_department(dept) {
                removed_departments.push(name);
            }
        }
        graph.works_in.retain(|(e, _)| *e != id);
        graph.manages.retain(|(e, _)| *e != id);

        Ok(DeleteOutcome {
            removed_departments,
        })
    }

    async fn subordinates(&self, id: NodeId) -> Result<Vec<Subordinate>> {
        let guard = self.graph.read().await;
        let graph: &MemoryGraph = &guard;
        let managed = if graph.employees.contains_key(&id) {
            graph.managed_by(id)
        } else {
            Vec::new()
        };
        if managed.is_empty() {
            return Err(StaffError::NotFound(
                "Employee not found or has no department to manage".to_string(),
            ));
        }

        let names: BTreeSet<String> = managed
            .into_iter()
            .flat_map(|d| graph.members_of(d))
            .map(|e| graph.employees[&e].name.clone())
            .collect();
        Ok(names.into_iter().map(|name| Subordinate { name }).collect())
    }

    async fn employee_summary(&self, id: NodeId) -> Result<EmployeeSummary> {
        let graph = self.graph.read().await;
        let Some(dept) = graph.departments_of(id).next() else {
            return Err(StaffError::NotFound(
                "Employee not found or has no department".to_string(),
            ));
        };

        let manager = graph
            .manages
            .iter()
            .find(|(_, d)| *d == dept)
            .map(|(m, _)| graph.employees[m].name.clone());

        Ok(EmployeeSummary {
            department_name: graph.departments[&dept].clone(),
            manager,
            number_of_employees: graph.members_of(dept).count() as i64,
        })
    }

    async fn list_departments(&self, filter: &DepartmentFilter) -> Result<Vec<Department>> {
        let graph = self.graph.read().await;
        let mut results: Vec<Department> = graph
            .departments
            .iter()
            .filter(|(_, name)| {
                filter
                    .name
                    .as_deref()
                    .map_or(true, |term| contains_ignore_case(name, term))
            })
            .map(|(id, name)| Department {
                name: name.clone(),
                number_of_employees: graph.members_of(*id).count() as i64,
                id: *id,
            })
            .collect();

        match filter.sort {
            Some(DepartmentSort::NameAsc) => results.sort_by(|a, b| a.name.cmp(&b.name)),
            Some(DepartmentSort::NameDesc) => results.sort_by(|a, b| b.name.cmp(&a.name)),
            Some(DepartmentSort::EmployeesAsc) => results.sort_by(|a, b| {
                a.number_of_employees
                    .cmp(&b.number_of_employees)
                    .then_with(|| a.name.cmp(&b.name))
            }),
            Some(DepartmentSort::EmployeesDesc) => results.sort_by(|a, b| {
                b.number_of_employees
                    .cmp(&a.number_of_employees)
                    .then_with(|| a.name.cmp(&b.name))
            }),
            None => {}
        }
        Ok(results)
    }

    async fn department_employees(&self, id: NodeId) -> Result<Vec<DepartmentMember>> {
        let graph = self.graph.read().await;
        let mut members: Vec<DepartmentMember> = graph
            .members_of(id)
            .map(|e| {
                let node = &graph.employees[&e];
                DepartmentMember {
                    name: node.name.clone(),
                    role: node.role.clone(),
                }
            })
            .collect();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(members)
    }
}
