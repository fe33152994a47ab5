use super::filled;
use crate::errors::ServiceError;
use crate::repositories::Identified;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const ALL_FIELDS_REQUIRED: &str = "Todos os campos são obrigatórios.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    pub id: String,
    pub name: String,
    /// Registration number
    pub drt: String,
    pub role: String,
}

impl Identified for Employee {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EmployeeInput {
    pub name: Option<String>,
    pub drt: Option<String>,
    pub role: Option<String>,
}

impl EmployeeInput {
    pub fn into_employee(self, id: String) -> Result<Employee, ServiceError> {
        let name = filled(&self.name)
            .ok_or_else(|| ServiceError::missing_field("name", ALL_FIELDS_REQUIRED))?;
        let drt = filled(&self.drt)
            .ok_or_else(|| ServiceError::missing_field("drt", ALL_FIELDS_REQUIRED))?;
        let role = filled(&self.role)
            .ok_or_else(|| ServiceError::missing_field("role", ALL_FIELDS_REQUIRED))?;

        Ok(Employee { id, name, drt, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn all_fields_are_required() {
        let input = EmployeeInput {
            name: Some("Maria".into()),
            drt: Some(" ".into()),
            role: Some("Eletricista".into()),
        };
        assert_matches!(
            input.into_employee("1".into()),
            Err(ServiceError::MissingField { field: "drt", .. })
        );
    }

    #[test]
    fn values_are_trimmed() {
        let input = EmployeeInput {
            name: Some(" Maria ".into()),
            drt: Some("123".into()),
            role: Some("Eletricista".into()),
        };
        let employee = input.into_employee("1".into()).unwrap();
        assert_eq!(employee.name, "Maria");
    }
}
