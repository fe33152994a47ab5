//! Remote company directory hosted on a PostgREST + object storage backend.

pub mod rest;

pub use rest::RestCompanyDirectory;

use crate::errors::ServiceError;
use crate::models::{Company, CompanyInput, CompanyLogo, LogoPosition, UserProfile};
use async_trait::async_trait;
use bytes::Bytes;

/// Largest accepted logo, in bytes
pub const MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Usuário não autenticado")]
    Unauthenticated,

    #[error("Perfil de usuário não encontrado")]
    ProfileNotFound,

    #[error("Por favor, selecione apenas arquivos de imagem")]
    NotAnImage,

    #[error("O tamanho máximo do arquivo é 2MB")]
    FileTooLarge,

    #[error("Remote request timed out")]
    Timeout,

    #[error("Remote request failed: {0}")]
    Remote(String),

    #[error("Unexpected remote response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for DirectoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DirectoryError::Timeout
        } else if err.is_decode() {
            DirectoryError::Decode(err.to_string())
        } else {
            DirectoryError::Remote(err.to_string())
        }
    }
}

impl From<DirectoryError> for ServiceError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Unauthenticated => ServiceError::Unauthorized(err.to_string()),
            DirectoryError::ProfileNotFound => ServiceError::NotFound(err.to_string()),
            DirectoryError::NotAnImage => ServiceError::UnsupportedMediaType(err.to_string()),
            DirectoryError::FileTooLarge => ServiceError::PayloadTooLarge(err.to_string()),
            DirectoryError::Timeout | DirectoryError::Remote(_) | DirectoryError::Decode(_) => {
                ServiceError::ExternalServiceError(err.to_string())
            }
        }
    }
}

/// A logo file received from the client
#[derive(Debug, Clone)]
pub struct LogoUpload {
    pub content_type: String,
    pub filename: Option<String>,
    pub bytes: Bytes,
}

impl LogoUpload {
    /// Only images up to [`MAX_LOGO_BYTES`] are accepted
    pub fn validate(&self) -> Result<(), DirectoryError> {
        if !self.content_type.trim().to_ascii_lowercase().starts_with("image/") {
            return Err(DirectoryError::NotAnImage);
        }
        if self.bytes.len() > MAX_LOGO_BYTES {
            return Err(DirectoryError::FileTooLarge);
        }
        Ok(())
    }

    /// Extension from the original filename, falling back to the image subtype
    pub fn extension(&self) -> String {
        let from_name = self
            .filename
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.trim())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));
        if let Some(ext) = from_name {
            return ext.to_ascii_lowercase();
        }

        let subtype = self
            .content_type
            .split(';')
            .next()
            .and_then(|mime| mime.trim().split_once('/'))
            .map(|(_, sub)| sub.split('+').next().unwrap_or(sub))
            .unwrap_or("bin");
        match subtype.to_ascii_lowercase().as_str() {
            "jpeg" => "jpg".to_string(),
            other => other.to_string(),
        }
    }
}

/// Session-scoped access to profiles, companies and their logos.
///
/// Every call carries the caller's session token.
#[async_trait]
pub trait CompanyDirectory: Send + Sync {
    /// User id behind a session token
    async fn resolve_user(&self, token: &str) -> Result<String, DirectoryError>;

    async fn profile(&self, token: &str, user_id: &str)
        -> Result<Option<UserProfile>, DirectoryError>;

    async fn company(&self, token: &str, company_id: &str)
        -> Result<Option<Company>, DirectoryError>;

    async fn logos(&self, token: &str, company_id: &str)
        -> Result<Vec<CompanyLogo>, DirectoryError>;

    /// Creates the company and links it to the profile, or updates the linked one
    async fn save_company(
        &self,
        token: &str,
        profile: &UserProfile,
        input: &CompanyInput,
    ) -> Result<Company, DirectoryError>;

    /// Stores the file and points the logo row for `position` at it
    async fn upload_logo(
        &self,
        token: &str,
        company_id: &str,
        position: LogoPosition,
        upload: LogoUpload,
    ) -> Result<CompanyLogo, DirectoryError>;

    async fn remove_logo(
        &self,
        token: &str,
        company_id: &str,
        position: LogoPosition,
    ) -> Result<(), DirectoryError>;
}
