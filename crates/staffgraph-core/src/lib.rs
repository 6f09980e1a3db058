//! staffgraph-core: Shared types, filters, and error handling for the staffgraph service.
//!
//! This crate provides the foundational pieces used by the store and HTTP crates:
//! - Employee and Department records as they appear in API responses
//! - Structured list filters parsed from query-string parameters
//! - The `StaffStore` trait every graph backend implements
//! - Common error types

pub mod error;
pub mod filter;
pub mod store;
pub mod types;

pub use error::{Result, StaffError};
pub use filter::{DepartmentFilter, DepartmentSort, EmployeeField, EmployeeFilter, EmployeeSort};
pub use store::StaffStore;
pub use types::{
    DeleteOutcome, Department, DepartmentMember, Employee, EmployeeSummary, EmployeeUpdate,
    NewEmployee, NodeId, Subordinate,
};
