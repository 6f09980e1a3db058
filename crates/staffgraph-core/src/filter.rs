//! Structured list filters parsed from query-string parameters.
//!
//! Every recognized parameter maps to a typed field; anything else is
//! rejected so a typo never silently widens a listing.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{Result, StaffError};

const SORT_KEY: &str = "sort";

// ── Employees ─────────────────────────────────────────────────────

/// Employee attributes that accept a substring search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EmployeeField {
    Name,
    Role,
    /// Name of the department reached over WORKS_IN.
    Department,
}

impl EmployeeField {
    pub const ALL: [EmployeeField; 3] = [Self::Name, Self::Role, Self::Department];

    /// Query-string key (also used as the query parameter name).
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Role => "role",
            Self::Department => "department",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeSort {
    NameAsc,
    NameDesc,
}

impl FromStr for EmployeeSort {
    type Err = StaffError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name_asc" => Ok(Self::NameAsc),
            "name_desc" => Ok(Self::NameDesc),
            other => Err(StaffError::InvalidInput(format!(
                "Invalid sort: {other}. Choose: name_asc, name_desc"
            ))),
        }
    }
}

/// Case-insensitive substring filter over employees, AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub terms: BTreeMap<EmployeeField, String>,
    pub sort: Option<EmployeeSort>,
}

impl EmployeeFilter {
    pub fn from_params<'a, I>(params: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = Self::default();
        for (key, value) in params {
            if key == SORT_KEY {
                filter.sort = parse_sort(value)?;
            } else if let Some(field) = EmployeeField::from_key(key) {
                filter.terms.insert(field, value.to_string());
            } else {
                return Err(StaffError::UnknownParameter(key.to_string()));
            }
        }
        Ok(filter)
    }

    pub fn with_term(mut self, field: EmployeeField, term: impl Into<String>) -> Self {
        self.terms.insert(field, term.into());
        self
    }

    pub fn sorted(mut self, sort: EmployeeSort) -> Self {
        self.sort = Some(sort);
        self
    }
}

// ── Departments ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartmentSort {
    NameAsc,
    NameDesc,
    /// By WORKS_IN headcount.
    EmployeesAsc,
    EmployeesDesc,
}

impl FromStr for DepartmentSort {
    type Err = StaffError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name_asc" => Ok(Self::NameAsc),
            "name_desc" => Ok(Self::NameDesc),
            "e_asc" => Ok(Self::EmployeesAsc),
            "e_desc" => Ok(Self::EmployeesDesc),
            other => Err(StaffError::InvalidInput(format!(
                "Invalid sort: {other}. Choose: name_asc, name_desc, e_asc, e_desc"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentFilter {
    pub name: Option<String>,
    pub sort: Option<DepartmentSort>,
}

impl DepartmentFilter {
    pub fn from_params<'a, I>(params: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = Self::default();
        for (key, value) in params {
            match key {
                SORT_KEY => filter.sort = parse_sort(value)?,
                "name" => filter.name = Some(value.to_string()),
                other => return Err(StaffError::UnknownParameter(other.to_string())),
            }
        }
        Ok(filter)
    }
}

/// An empty `sort=` is the same as leaving it out.
fn parse_sort<S: FromStr<Err = StaffError>>(value: &str) -> Result<Option<S>> {
    if value.is_empty() {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

/// Substring match with both sides lower-cased.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
