use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};
use utoipa::ToSchema;
use validator::Validate;

/// Company profile stored in the hosted backend. The remote column for the name is
/// `nome`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Company {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogoPosition {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompanyLogo {
    pub id: String,
    pub company_id: String,
    pub logo_url: String,
    pub logo_position: LogoPosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default, rename = "nome")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CompanyInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub website: Option<String>,
}

/// Company with its logos, as returned by the company endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompanyProfile {
    pub company: Option<Company>,
    pub logos: Vec<CompanyLogo>,
}

impl CompanyProfile {
    pub fn logo_url(&self, position: LogoPosition) -> Option<&str> {
        self.logos
            .iter()
            .find(|logo| logo.logo_position == position)
            .map(|logo| logo.logo_url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_reads_remote_column_names() {
        let company: Company = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "nome": "Hospital Central",
            "phone": "11 5555-0000",
            "updated_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(company.name, "Hospital Central");
        assert_eq!(company.address, None);
    }

    #[test]
    fn logo_lookup_by_position() {
        let profile = CompanyProfile {
            company: None,
            logos: vec![CompanyLogo {
                id: "l1".into(),
                company_id: "c1".into(),
                logo_url: "https://cdn/left.png".into(),
                logo_position: LogoPosition::Left,
            }],
        };
        assert_eq!(profile.logo_url(LogoPosition::Left), Some("https://cdn/left.png"));
        assert_eq!(profile.logo_url(LogoPosition::Right), None);
    }
}
