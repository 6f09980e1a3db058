//! `StaffStore` implementation backed by Neo4j.

use async_trait::async_trait;

use staffgraph_core::{
    DeleteOutcome, Department, DepartmentFilter, DepartmentMember, Employee, EmployeeFilter,
    EmployeeSummary, EmployeeUpdate, NewEmployee, NodeId, Result, StaffStore, Subordinate,
};

use crate::client::GraphClient;

#[async_trait]
impl StaffStore for GraphClient {
    async fn ping(&self) -> Result<()> {
        Ok(GraphClient::ping(self).await?)
    }

    async fn list_employees(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>> {
        Ok(GraphClient::list_employees(self, filter).await?)
    }

    async fn add_employee(&self, employee: &NewEmployee) -> Result<NodeId> {
        GraphClient::add_employee(self, employee).await
    }

    async fn update_employee(&self, id: NodeId, update: &EmployeeUpdate) -> Result<()> {
        GraphClient::update_employee(self, id, update).await
    }

    async fn delete_employee(&self, id: NodeId) -> Result<DeleteOutcome> {
        GraphClient::delete_employee(self, id).await
    }

    async fn subordinates(&self, id: NodeId) -> Result<Vec<Subordinate>> {
        GraphClient::subordinates(self, id).await
    }

    async fn employee_summary(&self, id: NodeId) -> Result<EmployeeSummary> {
        GraphClient::employee_summary(self, id).await
    }

    async fn list_departments(&self, filter: &DepartmentFilter) -> Result<Vec<Department>> {
        Ok(GraphClient::list_departments(self, filter).await?)
    }

    async fn department_employees(&self, id: NodeId) -> Result<Vec<DepartmentMember>> {
        Ok(GraphClient::department_employees(self, id).await?)
    }
}
