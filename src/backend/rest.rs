use super::{CompanyDirectory, DirectoryError, LogoUpload};
use crate::config::AppConfig;
use crate::models::{filled, Company, CompanyInput, CompanyLogo, LogoPosition, UserProfile};
use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
}

/// [`CompanyDirectory`] over the backend's REST, auth and storage endpoints
#[derive(Clone)]
pub struct RestCompanyDirectory {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    jwt_secret: Option<String>,
    bucket: String,
}

impl RestCompanyDirectory {
    pub fn new(
        base_url: &str,
        anon_key: &str,
        jwt_secret: Option<String>,
        bucket: &str,
        timeout: Duration,
    ) -> Result<Self, DirectoryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DirectoryError::Remote(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            jwt_secret: jwt_secret.filter(|s| !s.trim().is_empty()),
            bucket: bucket.to_string(),
        })
    }

    /// Client for the configured backend, `None` when it is not configured
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, DirectoryError> {
        if !config.backend_configured() {
            return Ok(None);
        }
        let (Some(url), Some(key)) = (&config.backend_url, &config.backend_anon_key) else {
            return Ok(None);
        };
        Self::new(
            url,
            key,
            config.backend_jwt_secret.clone(),
            &config.logo_bucket,
            config.backend_timeout(),
        )
        .map(Some)
    }

    /// `{base}/storage/v1/object/public/{bucket}/{path}`
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }

    fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    async fn send(request: RequestBuilder) -> Result<reqwest::Response, DirectoryError> {
        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(DirectoryError::Unauthenticated);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "backend request failed");
            return Err(DirectoryError::Remote(format!("backend returned {}", status)));
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, DirectoryError> {
        Ok(Self::send(request).await?.json::<T>().await?)
    }

    /// First row of a PostgREST array response
    async fn first_row<T: DeserializeOwned>(
        request: RequestBuilder,
    ) -> Result<Option<T>, DirectoryError> {
        let rows: Vec<T> = Self::send_json(request).await?;
        Ok(rows.into_iter().next())
    }

    fn decode_session(&self, secret: &str, token: &str) -> Result<String, DirectoryError> {
        let data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            debug!(error = %e, "session token rejected");
            DirectoryError::Unauthenticated
        })?;
        Ok(data.claims.sub)
    }

    async fn logo_at(
        &self,
        token: &str,
        company_id: &str,
        position: LogoPosition,
    ) -> Result<Option<CompanyLogo>, DirectoryError> {
        Ok(self
            .logos(token, company_id)
            .await?
            .into_iter()
            .find(|logo| logo.logo_position == position))
    }
}

fn company_body(input: &CompanyInput) -> serde_json::Value {
    json!({
        "nome": filled(&input.name),
        "address": filled(&input.address),
        "phone": filled(&input.phone),
        "email": filled(&input.email),
        "website": filled(&input.website),
    })
}

#[async_trait]
impl CompanyDirectory for RestCompanyDirectory {
    #[instrument(skip(self, token))]
    async fn resolve_user(&self, token: &str) -> Result<String, DirectoryError> {
        if let Some(secret) = &self.jwt_secret {
            return self.decode_session(secret, token);
        }
        let user: AuthUser =
            Self::send_json(self.request(Method::GET, "/auth/v1/user", token)).await?;
        Ok(user.id)
    }

    #[instrument(skip(self, token))]
    async fn profile(
        &self,
        token: &str,
        user_id: &str,
    ) -> Result<Option<UserProfile>, DirectoryError> {
        Self::first_row(
            self.request(Method::GET, "/rest/v1/profiles", token)
                .query(&[("id", format!("eq.{}", user_id)), ("select", "*".to_string())]),
        )
        .await
    }

    #[instrument(skip(self, token))]
    async fn company(
        &self,
        token: &str,
        company_id: &str,
    ) -> Result<Option<Company>, DirectoryError> {
        Self::first_row(
            self.request(Method::GET, "/rest/v1/companies", token)
                .query(&[("id", format!("eq.{}", company_id)), ("select", "*".to_string())]),
        )
        .await
    }

    #[instrument(skip(self, token))]
    async fn logos(
        &self,
        token: &str,
        company_id: &str,
    ) -> Result<Vec<CompanyLogo>, DirectoryError> {
        Self::send_json(
            self.request(Method::GET, "/rest/v1/company_logos", token).query(&[
                ("company_id", format!("eq.{}", company_id)),
                ("select", "*".to_string()),
            ]),
        )
        .await
    }

    #[instrument(skip(self, token, input))]
    async fn save_company(
        &self,
        token: &str,
        profile: &UserProfile,
        input: &CompanyInput,
    ) -> Result<Company, DirectoryError> {
        let mut body = company_body(input);

        let Some(company_id) = profile.company_id.as_deref() else {
            let company: Company = Self::first_row(
                self.request(Method::POST, "/rest/v1/companies", token)
                    .header("Prefer", "return=representation")
                    .json(&body),
            )
            .await?
            .ok_or_else(|| DirectoryError::Decode("insert returned no rows".to_string()))?;

            Self::send(
                self.request(Method::PATCH, "/rest/v1/profiles", token)
                    .query(&[("id", format!("eq.{}", profile.id))])
                    .json(&json!({ "company_id": company.id })),
            )
            .await?;

            info!(company_id = %company.id, profile_id = %profile.id, "company created and linked");
            return Ok(company);
        };

        body["updated_at"] = json!(chrono::Utc::now().to_rfc3339());
        let company = Self::first_row(
            self.request(Method::PATCH, "/rest/v1/companies", token)
                .query(&[("id", format!("eq.{}", company_id))])
                .header("Prefer", "return=representation")
                .json(&body),
        )
        .await?
        .ok_or_else(|| DirectoryError::Remote(format!("company {} not found", company_id)))?;

        info!(company_id = %company_id, "company updated");
        Ok(company)
    }

    #[instrument(skip(self, token, upload), fields(size = upload.bytes.len()))]
    async fn upload_logo(
        &self,
        token: &str,
        company_id: &str,
        position: LogoPosition,
        upload: LogoUpload,
    ) -> Result<CompanyLogo, DirectoryError> {
        upload.validate()?;

        let path = format!(
            "company-logos/{}/{}.{}",
            company_id,
            uuid::Uuid::new_v4(),
            upload.extension()
        );
        Self::send(
            self.request(
                Method::POST,
                &format!("/storage/v1/object/{}/{}", self.bucket, path),
                token,
            )
            .header(reqwest::header::CONTENT_TYPE, upload.content_type.clone())
            .body(upload.bytes),
        )
        .await?;
        let logo_url = self.public_url(&path);

        let request = match self.logo_at(token, company_id, position).await? {
            Some(existing) => self
                .request(Method::PATCH, "/rest/v1/company_logos", token)
                .query(&[("id", format!("eq.{}", existing.id))])
                .json(&json!({
                    "logo_url": logo_url,
                    "updated_at": chrono::Utc::now().to_rfc3339(),
                })),
            None => self
                .request(Method::POST, "/rest/v1/company_logos", token)
                .json(&json!({
                    "company_id": company_id,
                    "logo_url": logo_url,
                    "logo_position": position,
                })),
        };

        let logo = Self::first_row(request.header("Prefer", "return=representation"))
            .await?
            .ok_or_else(|| DirectoryError::Decode("logo write returned no rows".to_string()))?;
        info!(company_id = %company_id, position = position.as_ref(), "logo stored");
        Ok(logo)
    }

    #[instrument(skip(self, token))]
    async fn remove_logo(
        &self,
        token: &str,
        company_id: &str,
        position: LogoPosition,
    ) -> Result<(), DirectoryError> {
        Self::send(
            self.request(Method::DELETE, "/rest/v1/company_logos", token)
                .query(&[
                    ("company_id", format!("eq.{}", company_id)),
                    ("logo_position", format!("eq.{}", position.as_ref())),
                ]),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    fn directory(secret: Option<&str>) -> RestCompanyDirectory {
        RestCompanyDirectory::new(
            "https://backend.example.com/",
            "anon",
            secret.map(str::to_string),
            "logos",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn public_url_uses_bucket() {
        assert_eq!(
            directory(None).public_url("company-logos/c1/x.png"),
            "https://backend.example.com/storage/v1/object/public/logos/company-logos/c1/x.png"
        );
    }

    #[derive(Serialize)]
    struct Claims<'a> {
        sub: &'a str,
        exp: i64,
    }

    #[tokio::test]
    async fn resolves_user_from_signed_token() {
        let token = encode(
            &Header::default(),
            &Claims {
                sub: "user-1",
                exp: chrono::Utc::now().timestamp() + 600,
            },
            &EncodingKey::from_secret(b"segredo"),
        )
        .unwrap();

        let dir = directory(Some("segredo"));
        assert_eq!(dir.resolve_user(&token).await.unwrap(), "user-1");
        assert!(matches!(
            directory(Some("outro")).resolve_user(&token).await,
            Err(DirectoryError::Unauthenticated)
        ));
    }

    #[test]
    fn disabled_without_backend_settings() {
        let config = AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            8080,
            "development".into(),
        );
        assert!(RestCompanyDirectory::from_config(&config).unwrap().is_none());
    }
}
