use crate::repositories::Identified;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How a checklist question is answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnswerKind {
    Text,
    Number {
        #[serde(default)]
        unit: String,
    },
    Radio {
        #[serde(default)]
        options: Vec<String>,
    },
    Checkbox {
        #[serde(default)]
        options: Vec<String>,
    },
}

impl AnswerKind {
    /// Unit or option list appended to the question in printed documents
    pub fn suffix(&self) -> Option<String> {
        match self {
            Self::Text => None,
            Self::Number { unit } if unit.is_empty() => None,
            Self::Number { unit } => Some(format!("({})", unit)),
            Self::Radio { options } | Self::Checkbox { options } if options.is_empty() => None,
            Self::Radio { options } | Self::Checkbox { options } => {
                Some(format!("[{}]", options.join(" / ")))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChecklistItem {
    pub id: String,
    pub question: String,
    #[serde(flatten)]
    pub kind: AnswerKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub id: String,
    pub category_id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

impl Identified for Checklist {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistInput {
    pub category_id: Option<String>,
    pub name: Option<String>,
}
