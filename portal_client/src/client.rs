use chrono::{DateTime, Utc};
use hierarchy::EntityId;
use hierarchy::normalize::NormalizeError;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Which login endpoint a credential is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginRole {
    SuperAdmin,
    CompanyAdmin,
    Trainer,
}

impl LoginRole {
    pub fn login_path(self) -> &'static str {
        match self {
            LoginRole::SuperAdmin => "/superadmins/login",
            LoginRole::CompanyAdmin => "/companyadmins/login",
            LoginRole::Trainer => "/management/trainers/login",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub company_id: Option<String>,
}

/// A logged-in user and the bearer token for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub role: LoginRole,
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: UserInfo,
    /// The tenant every company-admin and trainer call is scoped to.
    pub company_id: Option<EntityId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
    user: UserInfo,
    token: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

fn tenant_of(role: LoginRole, user: &UserInfo) -> Result<Option<EntityId>, NormalizeError> {
    match (role, user.company_id.as_deref().map(str::trim)) {
        (LoginRole::SuperAdmin, _) => Ok(None),
        (_, None | Some("")) => Err(NormalizeError::MissingField {
            entity: "user",
            field: "companyId",
        }),
        (_, Some(raw)) => EntityId::parse(raw)
            .map(Some)
            .map_err(|source| NormalizeError::InvalidId {
                entity: "user",
                field: "companyId",
                source,
            }),
    }
}

/// HTTP access to the portal API with the current login.
#[derive(Debug)]
pub struct PortalClient {
    http: Client,
    config: ClientConfig,
    session: RwLock<Option<Session>>,
}

impl PortalClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http,
            config,
            session: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> Option<Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    pub fn logout(&self) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Logs in at the endpoint for `role` and stores the session.
    ///
    /// A rejected credential is an [`ClientError::Api`] with status `401`; the
    /// previous session, if any, is dropped either way.
    pub async fn login(&self, role: LoginRole, email: &str, password: &str) -> Result<Session, ClientError> {
        self.logout();
        let request = self
            .http
            .post(self.config.url(role.login_path()))
            .json(&Credentials { email, password });
        let data: LoginData = self.execute(request, false).await?;

        let session = Session {
            company_id: tenant_of(role, &data.user)?,
            role,
            token: data.token,
            expires_at: data.expires_at,
            user: data.user,
        };
        info!(user = %session.user.id, ?role, "logged in");
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(session)
    }

    /// The tenant of the current session.
    pub fn company_id(&self) -> Result<EntityId, ClientError> {
        self.session()
            .ok_or(ClientError::NotLoggedIn)?
            .company_id
            .ok_or(ClientError::NotLoggedIn)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ClientError> {
        let request = self.http.get(self.config.url(path)).query(query);
        self.execute(request, true).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        let request = self.http.post(self.config.url(path)).json(body);
        self.execute(request, true).await
    }

    /// A non-JSON body such as the CSV export.
    pub async fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String, ClientError> {
        let request = self.authorize(self.http.get(self.config.url(path)).query(query))?;
        let response = self.check(request.send().await?).await?;
        Ok(response.text().await?)
    }

    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.session().map(|s| s.token).ok_or(ClientError::NotLoggedIn)?;
        Ok(request.bearer_auth(token))
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder, authenticated: bool) -> Result<T, ClientError> {
        let request = if authenticated { self.authorize(request)? } else { request };
        let response = self.check(request.send().await?).await?;
        let body: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        body.data
            .ok_or_else(|| ClientError::Decode(format!("response has no data: {}", body.message)))
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED && self.is_authenticated() {
            warn!(url = %response.url(), "token rejected, clearing session");
            self.logout();
            return Err(ClientError::AuthExpired);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
            .unwrap_or(text);
        debug!(status = status.as_u16(), %message, "api error");
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(company: Option<&str>) -> UserInfo {
        UserInfo {
            id: "1".into(),
            username: "a".into(),
            email: "a@b.test".into(),
            role: "companyadmin".into(),
            company_id: company.map(str::to_owned),
        }
    }

    #[test]
    fn tenant_is_required_below_super_admin() {
        assert_eq!(tenant_of(LoginRole::SuperAdmin, &user(None)), Ok(None));
        assert_eq!(
            tenant_of(LoginRole::CompanyAdmin, &user(Some("7"))),
            Ok(Some(EntityId::parse("7").unwrap()))
        );
        assert!(matches!(
            tenant_of(LoginRole::Trainer, &user(None)),
            Err(NormalizeError::MissingField { field: "companyId", .. })
        ));
        assert!(matches!(
            tenant_of(LoginRole::Trainer, &user(Some("a b"))),
            Err(NormalizeError::InvalidId { .. })
        ));
    }

    fn envelope<T: DeserializeOwned>(raw: &str) -> Envelope<T> {
        serde_json::from_str(raw).unwrap()
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Stamp {
        at: DateTime<Utc>,
    }

    #[test]
    fn envelope_decodes_payloads_without_default() {
        let full: Envelope<Stamp> = envelope(r#"{"success":true,"data":{"at":"2025-09-01T09:00:00Z"},"message":"ok"}"#);
        assert!(full.data.is_some());
        assert_eq!(full.message, "ok");

        let empty: Envelope<Stamp> = envelope(r#"{"success":false,"message":"nope"}"#);
        assert!(empty.data.is_none());
        assert_eq!(empty.message, "nope");
    }
}
