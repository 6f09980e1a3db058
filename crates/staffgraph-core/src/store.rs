//! The store seam request handlers are written against.

use async_trait::async_trait;

use crate::error::Result;
use crate::filter::{DepartmentFilter, EmployeeFilter};
use crate::types::{
    DeleteOutcome, Department, DepartmentMember, Employee, EmployeeSummary, EmployeeUpdate,
    NewEmployee, NodeId, Subordinate,
};

/// Business queries over the employee/department graph.
///
/// Each call is one request-scoped unit of work against the backing store.
/// Implementations must be cheap to share across request tasks.
#[async_trait]
pub trait StaffStore: Send + Sync {
    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<()>;

    async fn list_employees(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>>;

    /// Create the employee, merge its Department and the WORKS_IN edge.
    ///
    /// Fails with `DuplicateEmployee` if the name is taken, including when a
    /// concurrent request wins the race.
    async fn add_employee(&self, employee: &NewEmployee) -> Result<NodeId>;

    /// Apply only the supplied fields. Fails with `NotFound` for unknown ids.
    async fn update_employee(&self, id: NodeId, update: &EmployeeUpdate) -> Result<()>;

    /// Delete the employee, and every department it MANAGES, with all edges.
    async fn delete_employee(&self, id: NodeId) -> Result<DeleteOutcome>;

    /// Everyone who WORKS_IN the department `id` MANAGES.
    async fn subordinates(&self, id: NodeId) -> Result<Vec<Subordinate>>;

    async fn employee_summary(&self, id: NodeId) -> Result<EmployeeSummary>;

    async fn list_departments(&self, filter: &DepartmentFilter) -> Result<Vec<Department>>;

    async fn department_employees(&self, id: NodeId) -> Result<Vec<DepartmentMember>>;
}
