use crate::{
    backend::{CompanyDirectory, LogoUpload},
    errors::ServiceError,
    events::{Event, EventSender},
    models::{filled, Company, CompanyInput, CompanyLogo, CompanyProfile, LogoPosition, UserProfile},
};
use std::sync::Arc;
use tracing::{debug, instrument};
use validator::Validate;

const NOT_AUTHENTICATED: &str = "Usuário não autenticado";

/// Company profile of the session user, backed by the remote directory
#[derive(Clone)]
pub struct CompanyService {
    directory: Option<Arc<dyn CompanyDirectory>>,
    event_sender: Arc<EventSender>,
}

impl CompanyService {
    pub fn new(
        directory: Option<Arc<dyn CompanyDirectory>>,
        event_sender: Arc<EventSender>,
    ) -> Self {
        Self {
            directory,
            event_sender,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.directory.is_some()
    }

    fn directory(&self) -> Result<&Arc<dyn CompanyDirectory>, ServiceError> {
        self.directory.as_ref().ok_or_else(|| {
            ServiceError::ExternalServiceError("Company backend is not configured".to_string())
        })
    }

    fn session(token: Option<&str>) -> Result<&str, ServiceError> {
        token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ServiceError::Unauthorized(NOT_AUTHENTICATED.to_string()))
    }

    async fn user_profile(
        directory: &Arc<dyn CompanyDirectory>,
        token: &str,
    ) -> Result<UserProfile, ServiceError> {
        let user_id = directory.resolve_user(token).await?;
        directory
            .profile(token, &user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Perfil de usuário não encontrado".to_string()))
    }

    async fn load(
        directory: &Arc<dyn CompanyDirectory>,
        token: &str,
        profile: &UserProfile,
    ) -> Result<CompanyProfile, ServiceError> {
        let Some(company_id) = profile.company_id.as_deref() else {
            return Ok(CompanyProfile::default());
        };
        let company = directory.company(token, company_id).await?;
        let logos = match &company {
            Some(_) => directory.logos(token, company_id).await?,
            None => Vec::new(),
        };
        Ok(CompanyProfile { company, logos })
    }

    /// Company and logos linked to the session user's profile
    #[instrument(skip(self, token))]
    pub async fn profile(&self, token: Option<&str>) -> Result<CompanyProfile, ServiceError> {
        let directory = self.directory()?;
        let token = Self::session(token)?;
        let profile = Self::user_profile(directory, token).await?;
        Self::load(directory, token, &profile).await
    }

    /// Company data for printed documents.
    ///
    /// `None` without a session, without a backend or without a profile. Remote
    /// failures are returned.
    #[instrument(skip(self, token))]
    pub async fn profile_for_document(
        &self,
        token: Option<&str>,
    ) -> Result<Option<CompanyProfile>, ServiceError> {
        let (Some(directory), Ok(token)) = (self.directory.as_ref(), Self::session(token)) else {
            return Ok(None);
        };
        match Self::user_profile(directory, token).await {
            Ok(profile) => Ok(Some(Self::load(directory, token, &profile).await?)),
            Err(ServiceError::NotFound(_)) => {
                debug!("no profile for session, rendering without company");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Creates the company on first save, then updates it
    #[instrument(skip(self, token))]
    pub async fn save(
        &self,
        token: Option<&str>,
        input: CompanyInput,
    ) -> Result<Company, ServiceError> {
        let directory = self.directory()?;
        let token = Self::session(token)?;
        if filled(&input.name).is_none() {
            return Err(ServiceError::missing_field(
                "name",
                "O nome da empresa é obrigatório",
            ));
        }
        input.validate()?;

        let profile = Self::user_profile(directory, token).await?;
        let company = directory.save_company(token, &profile, &input).await?;

        self.event_sender
            .send_or_log(Event::CompanyUpdated(company.id.clone()))
            .await;
        Ok(company)
    }

    async fn company_id(
        directory: &Arc<dyn CompanyDirectory>,
        token: &str,
    ) -> Result<String, ServiceError> {
        Self::user_profile(directory, token)
            .await?
            .company_id
            .ok_or_else(|| {
                ServiceError::ValidationError(
                    "Salve os dados da empresa antes de enviar logos.".to_string(),
                )
            })
    }

    #[instrument(skip(self, token, upload))]
    pub async fn upload_logo(
        &self,
        token: Option<&str>,
        position: LogoPosition,
        upload: LogoUpload,
    ) -> Result<CompanyLogo, ServiceError> {
        let directory = self.directory()?;
        let token = Self::session(token)?;
        upload.validate()?;

        let company_id = Self::company_id(directory, token).await?;
        let logo = directory
            .upload_logo(token, &company_id, position, upload)
            .await?;

        self.event_sender
            .send_or_log(Event::CompanyLogoUploaded {
                company_id,
                position: position.as_ref().to_string(),
            })
            .await;
        Ok(logo)
    }

    #[instrument(skip(self, token))]
    pub async fn remove_logo(
        &self,
        token: Option<&str>,
        position: LogoPosition,
    ) -> Result<(), ServiceError> {
        let directory = self.directory()?;
        let token = Self::session(token)?;
        let company_id = Self::company_id(directory, token).await?;
        directory.remove_logo(token, &company_id, position).await?;

        self.event_sender
            .send_or_log(Event::CompanyLogoRemoved {
                company_id,
                position: position.as_ref().to_string(),
            })
            .await;
        Ok(())
    }
}
