use super::filled;
use crate::errors::ServiceError;
use crate::repositories::Identified;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};
use utoipa::ToSchema;

static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{3}-[A-Za-z0-9]{2}-[0-9]{3}$").expect("valid TAG regex"));

const TAG_FORMAT: &str = "TAG deve seguir o formato AAA-AA-999.";
const LOCATION_REQUIRED: &str = "Local de instalação é obrigatório.";
const MACHINE_FIELDS_REQUIRED: &str = "Todos os campos são obrigatórios, exceto número de série.";
const FLOOR_REQUIRED: &str = "Pavimento é obrigatório.";
const GAS_FIELDS_REQUIRED: &str =
    "Todos os campos são obrigatórios (exceto número de série). O tipo de gás também deve ser informado.";

/// True when `tag` has the `AAA-AA-999` asset-tag shape
pub fn is_valid_tag(tag: &str) -> bool {
    TAG_PATTERN.is_match(tag)
}

/// Fixed set of equipment categories
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EquipmentCategory {
    Generator,
    Elevator,
    Pump,
    Aircon,
    Electrical,
    Bathrooms,
    Gases,
}

impl EquipmentCategory {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Generator => "generator",
            Self::Elevator => "elevator",
            Self::Pump => "pump",
            Self::Aircon => "aircon",
            Self::Electrical => "electrical",
            Self::Bathrooms => "bathrooms",
            Self::Gases => "gases",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Generator => "Gerador",
            Self::Elevator => "Elevador",
            Self::Pump => "Bomba de Recalque",
            Self::Aircon => "Ar Condicionado",
            Self::Electrical => "Quadros Elétricos",
            Self::Bathrooms => "Banheiros",
            Self::Gases => "Gases Medicinais",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        id.parse().ok()
    }

    pub fn all() -> Vec<EquipmentCategory> {
        Self::iter().collect()
    }
}

/// Category as exposed by the read-only category endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EquipmentCategoryView {
    pub id: String,
    pub name: String,
}

impl From<EquipmentCategory> for EquipmentCategoryView {
    fn from(category: EquipmentCategory) -> Self {
        Self {
            id: category.id().to_string(),
            name: category.display_name().to_string(),
        }
    }
}

/// Generators and recalque pumps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineSpec {
    pub name: String,
    pub description: String,
    pub model: String,
    pub brand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AirconSpec {
    pub name: String,
    pub description: String,
    pub model: String,
    pub brand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ElevatorSpec {
    pub name: String,
    pub description: String,
    pub model: String,
    pub brand: String,
    pub capacity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BathroomSpec {
    pub floor: String,
}

/// Electrical panels carry nothing beyond tag and location
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct ElectricalSpec {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GasSpec {
    pub name: String,
    pub description: String,
    pub model: String,
    pub brand: String,
    pub gas_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

/// Category-specific fields, tagged by `category`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum EquipmentDetails {
    Generator(MachineSpec),
    Elevator(ElevatorSpec),
    Pump(MachineSpec),
    Aircon(AirconSpec),
    Electrical(ElectricalSpec),
    Bathrooms(BathroomSpec),
    Gases(GasSpec),
}

impl EquipmentDetails {
    pub fn category(&self) -> EquipmentCategory {
        match self {
            Self::Generator(_) => EquipmentCategory::Generator,
            Self::Elevator(_) => EquipmentCategory::Elevator,
            Self::Pump(_) => EquipmentCategory::Pump,
            Self::Aircon(_) => EquipmentCategory::Aircon,
            Self::Electrical(_) => EquipmentCategory::Electrical,
            Self::Bathrooms(_) => EquipmentCategory::Bathrooms,
            Self::Gases(_) => EquipmentCategory::Gases,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Generator(spec) | Self::Pump(spec) => Some(&spec.name),
            Self::Elevator(spec) => Some(&spec.name),
            Self::Aircon(spec) => Some(&spec.name),
            Self::Gases(spec) => Some(&spec.name),
            Self::Electrical(_) | Self::Bathrooms(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Equipment {
    pub id: String,
    pub tag: String,
    pub location: String,
    #[serde(flatten)]
    pub details: EquipmentDetails,
}

impl Equipment {
    pub fn category(&self) -> EquipmentCategory {
        self.details.category()
    }
}

impl Identified for Equipment {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Flat form input, validated into an [`Equipment`] for its category
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentInput {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub location: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub serial_number: Option<String>,
    pub capacity: Option<String>,
    pub floor: Option<String>,
    pub gas_type: Option<String>,
}

struct MachineFields {
    name: String,
    description: String,
    model: String,
    brand: String,
}

impl EquipmentInput {
    fn machine_fields(&self, message: &'static str) -> Result<MachineFields, ServiceError> {
        let field = |value: &Option<String>, key: &'static str| {
            filled(value).ok_or_else(|| ServiceError::missing_field(key, message))
        };
        Ok(MachineFields {
            name: field(&self.name, "name")?,
            description: field(&self.description, "description")?,
            model: field(&self.model, "model")?,
            brand: field(&self.brand, "brand")?,
        })
    }

    /// Validates in a fixed order (TAG, location, category fields) and reports the
    /// first failure.
    pub fn into_equipment(self, id: String) -> Result<Equipment, ServiceError> {
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .and_then(EquipmentCategory::from_id)
            .ok_or_else(|| {
                ServiceError::missing_field("category", "Categoria de equipamento inválida.")
            })?;

        let tag = self
            .tag
            .as_deref()
            .map(str::trim)
            .filter(|t| is_valid_tag(t))
            .ok_or_else(|| ServiceError::missing_field("tag", TAG_FORMAT))?
            .to_string();

        let location = filled(&self.location)
            .ok_or_else(|| ServiceError::missing_field("location", LOCATION_REQUIRED))?;

        let serial_number = filled(&self.serial_number);

        let details = match category {
            EquipmentCategory::Generator | EquipmentCategory::Pump => {
                let f = self.machine_fields(MACHINE_FIELDS_REQUIRED)?;
                let spec = MachineSpec {
                    name: f.name,
                    description: f.description,
                    model: f.model,
                    brand: f.brand,
                    serial_number,
                };
                if category == EquipmentCategory::Generator {
                    EquipmentDetails::Generator(spec)
                } else {
                    EquipmentDetails::Pump(spec)
                }
            }
            EquipmentCategory::Aircon => {
                let f = self.machine_fields(MACHINE_FIELDS_REQUIRED)?;
                EquipmentDetails::Aircon(AirconSpec {
                    name: f.name,
                    description: f.description,
                    model: f.model,
                    brand: f.brand,
                    serial_number,
                    capacity: filled(&self.capacity),
                })
            }
            EquipmentCategory::Elevator => {
                let f = self.machine_fields(MACHINE_FIELDS_REQUIRED)?;
                let capacity = filled(&self.capacity).ok_or_else(|| {
                    ServiceError::missing_field("capacity", MACHINE_FIELDS_REQUIRED)
                })?;
                EquipmentDetails::Elevator(ElevatorSpec {
                    name: f.name,
                    description: f.description,
                    model: f.model,
                    brand: f.brand,
                    capacity,
                    serial_number,
                })
            }
            EquipmentCategory::Bathrooms => {
                let floor = filled(&self.floor)
                    .ok_or_else(|| ServiceError::missing_field("floor", FLOOR_REQUIRED))?;
                EquipmentDetails::Bathrooms(BathroomSpec { floor })
            }
            EquipmentCategory::Electrical => EquipmentDetails::Electrical(ElectricalSpec {}),
            EquipmentCategory::Gases => {
                let f = self.machine_fields(GAS_FIELDS_REQUIRED)?;
                let gas_type = filled(&self.gas_type)
                    .ok_or_else(|| ServiceError::missing_field("gasType", GAS_FIELDS_REQUIRED))?;
                EquipmentDetails::Gases(GasSpec {
                    name: f.name,
                    description: f.description,
                    model: f.model,
                    brand: f.brand,
                    gas_type,
                    serial_number,
                })
            }
        };

        Ok(Equipment {
            id,
            tag,
            location,
            details,
        })
    }
}
