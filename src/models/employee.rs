//! Employee roster.
//!
//! The roster is fixed for the lifetime of the process: it is loaded once at
//! startup and every other component reads from it.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A team member whose work location is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub role: String,
    /// Image URL or initials
    pub avatar: String,
}

impl Employee {
    pub fn new(id: &str, name: &str, role: &str, avatar: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            avatar: avatar.to_string(),
        }
    }
}

/// Immutable, ordered list of employees with unique ids.
#[derive(Debug, Clone)]
pub struct Roster {
    employees: Vec<Employee>,
}

impl Roster {
    /// Build a roster, rejecting duplicate ids and blank names.
    pub fn new(employees: Vec<Employee>) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        for employee in &employees {
            if employee.id.trim().is_empty() {
                return Err(AppError::Validation("Employee id is required".to_string()));
            }
            if employee.name.trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "Employee {} has no name",
                    employee.id
                )));
            }
            if !seen.insert(employee.id.as_str()) {
                return Err(AppError::Validation(format!(
                    "Duplicate employee id {}",
                    employee.id
                )));
            }
        }
        Ok(Self { employees })
    }

    /// Load the roster from a JSON file, or fall back to the built-in team.
    pub async fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Internal(format!("Failed to read roster {}: {}", path.display(), e))
        })?;
        let employees: Vec<Employee> = serde_json::from_str(&raw).map_err(|e| {
            AppError::Validation(format!("Invalid roster {}: {}", path.display(), e))
        })?;
        Self::new(employees)
    }

    pub fn all(&self) -> &[Employee] {
        &self.employees
    }

    pub fn get(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Exact, case-sensitive name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.employees.iter().map(|e| e.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            employees: vec![
                Employee::new("1", "David", "Analyst", "D"),
                Employee::new("2", "Enrique", "Analyst", "E"),
                Employee::new("3", "Adrian", "Designer", "A"),
                Employee::new("4", "Jose", "Manager", "J"),
                Employee::new("5", "Edu", "QA Engineer", "Ed"),
                Employee::new("6", "Gustavo", "DevOps", "G"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster() {
        let roster = Roster::default();
        assert_eq!(roster.len(), 6);
        assert_eq!(roster.get("4").map(|e| e.name.as_str()), Some("Jose"));
        assert_eq!(roster.find_by_name("Edu").map(|e| e.id.as_str()), Some("5"));
        assert!(roster.find_by_name("edu").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Roster::new(vec![
            Employee::new("1", "Ann", "Dev", "A"),
            Employee::new("1", "Bob", "Dev", "B"),
        ]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_blank_name_rejected() {
        let result = Roster::new(vec![Employee::new("1", "  ", "Dev", "A")]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("roster.json");
        std::fs::write(
            &path,
            r#"[{"id":"a","name":"Ann","role":"Dev","avatar":"A"},
                {"id":"b","name":"Bob","role":"Ops","avatar":"B"}]"#,
        )
        .unwrap();

        let roster = Roster::load(Some(&path)).await.unwrap();
        assert_eq!(roster.names(), vec!["Ann".to_string(), "Bob".to_string()]);
    }

    #[tokio::test]
    async fn test_load_without_path_uses_default() {
        let roster = Roster::load(None).await.unwrap();
        assert_eq!(roster.len(), 6);
    }
}
