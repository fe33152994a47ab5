use super::filled;
use crate::errors::ServiceError;
use crate::repositories::Identified;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Names seeded on first run, with ids "1" through "7"
pub const DEFAULT_INSPECTION_CATEGORIES: [&str; 7] = [
    "RONDA DIÁRIA DE GERADORES",
    "RONDA DIÁRIA DE BOMBAS DE RECALQUE",
    "RONDA DIÁRIA DE BOILER",
    "RONDA DIÁRIA DE ELEVADORES",
    "PREVENTIVA DE AR CONDICIONADO",
    "PREVENTIVA DE QUADROS ELÉTRICOS",
    "RONDA DIÁRIA DE GASES MEDICINAIS",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InspectionCategory {
    pub id: String,
    pub name: String,
}

impl InspectionCategory {
    pub fn defaults() -> Vec<InspectionCategory> {
        DEFAULT_INSPECTION_CATEGORIES
            .iter()
            .enumerate()
            .map(|(i, name)| InspectionCategory {
                id: (i + 1).to_string(),
                name: (*name).to_string(),
            })
            .collect()
    }

    /// Preventive categories are the ones named `PREVENTIVA ...`
    pub fn is_preventive(&self) -> bool {
        self.name.trim_start().to_uppercase().starts_with("PREVENTIVA")
    }
}

impl Identified for InspectionCategory {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct InspectionCategoryInput {
    pub name: Option<String>,
}

impl InspectionCategoryInput {
    pub fn into_category(self, id: String) -> Result<InspectionCategory, ServiceError> {
        let name = filled(&self.name).ok_or_else(|| {
            ServiceError::missing_field("name", "O nome da categoria é obrigatório.")
        })?;
        Ok(InspectionCategory { id, name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_sequential_ids() {
        let defaults = InspectionCategory::defaults();
        assert_eq!(defaults.len(), 7);
        assert_eq!(defaults[0].id, "1");
        assert_eq!(defaults[6].name, "RONDA DIÁRIA DE GASES MEDICINAIS");
        assert_eq!(defaults.iter().filter(|c| c.is_preventive()).count(), 2);
    }
}
