use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::session::Session;
use crate::storage::config::GoogleConfig;

pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to read token file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse token: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Token has expired")]
    TokenExpired,
    #[error("No refresh token available")]
    NoRefreshToken,
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("OAuth error: {0}")]
    OAuthError(String),
    #[error("Missing OAuth client credentials in config")]
    MissingCredentials,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenInfo {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    #[allow(dead_code)]
    pub token_type: String,
}

impl TokenInfo {
    pub fn new(access_token: String, expires_in_seconds: i64) -> Self {
        Self {
            access_token,
            refresh_token: None,
            expires_at: Utc::now() + chrono::Duration::seconds(expires_in_seconds),
            token_type: "Bearer".to_string(),
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: String) -> Self {
        self.refresh_token = Some(refresh_token);
        self
    }

    pub fn is_valid(&self) -> bool {
        self.expires_at > Utc::now()
    }

    pub fn needs_refresh(&self) -> bool {
        let buffer = chrono::Duration::minutes(5);
        self.expires_at <= Utc::now() + buffer
    }
}

pub struct TokenStorage {
    path: PathBuf,
}

impl TokenStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn save_token(&self, token: &TokenInfo) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(token)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn load_token(&self) -> Result<TokenInfo, AuthError> {
        let content = std::fs::read_to_string(&self.path)?;
        let token: TokenInfo = serde_json::from_str(&content)?;
        Ok(token)
    }

    pub fn clear_token(&self) -> Result<(), AuthError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::ReadError(e)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
    #[allow(dead_code)]
    token_type: String,
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    email: String,
}

/// Identity-provider integration. Owns the token cache and the OAuth
/// endpoints; the rest of the app only sees `Session` values.
pub struct OAuthProvider {
    google: GoogleConfig,
    storage: TokenStorage,
    client: reqwest::Client,
    token_url: String,
    userinfo_url: String,
}

impl OAuthProvider {
    pub fn new(google: GoogleConfig) -> Self {
        let storage = TokenStorage::new(google.token_cache.clone());

        Self {
            google,
            storage,
            client: reqwest::Client::new(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }

    pub fn with_endpoints(mut self, token_url: String, userinfo_url: String) -> Self {
        self.token_url = token_url;
        self.userinfo_url = userinfo_url;
        self
    }

    pub fn sign_in_url(&self) -> Result<String, AuthError> {
        if self.google.client_id.is_empty() || self.google.client_secret.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        Ok(format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
            GOOGLE_AUTH_URL,
            urlencoding::encode(&self.google.client_id),
            urlencoding::encode(&self.google.redirect_uri),
            urlencoding::encode(CALENDAR_SCOPE)
        ))
    }

    pub async fn exchange_code(&self, code: &str) -> Result<TokenInfo, AuthError> {
        let params = [
            ("client_id", self.google.client_id.as_str()),
            ("client_secret", self.google.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.google.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self.client.post(&self.token_url).form(&params).send().await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AuthError::OAuthError(error_text));
        }

        let token_response: TokenResponse = response.json().await?;

        let token = TokenInfo::new(token_response.access_token, token_response.expires_in)
            .with_refresh_token(
                token_response
                    .refresh_token
                    .ok_or(AuthError::NoRefreshToken)?,
            );

        self.storage.save_token(&token)?;

        Ok(token)
    }

    pub async fn refresh_token(&self, token: &TokenInfo) -> Result<TokenInfo, AuthError> {
        let refresh_token = token
            .refresh_token
            .as_ref()
            .ok_or(AuthError::NoRefreshToken)?;

        let params = [
            ("client_id", self.google.client_id.as_str()),
            ("client_secret", self.google.client_secret.as_str()),
            ("refresh_token", refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self.client.post(&self.token_url).form(&params).send().await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AuthError::OAuthError(error_text));
        }

        let token_response: TokenResponse = response.json().await?;

        let new_token = TokenInfo::new(token_response.access_token, token_response.expires_in)
            .with_refresh_token(refresh_token.clone());

        self.storage.save_token(&new_token)?;

        Ok(new_token)
    }

    pub async fn get_valid_token(&self) -> Result<TokenInfo, AuthError> {
        match self.storage.load_token() {
            Ok(token) if !token.needs_refresh() => Ok(token),
            Ok(token) if token.refresh_token.is_some() => self.refresh_token(&token).await,
            _ => Err(AuthError::TokenExpired),
        }
    }

    pub async fn fetch_user_email(&self, access_token: &str) -> Result<String, AuthError> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AuthError::OAuthError(error_text));
        }

        let info: UserInfoResponse = response.json().await?;
        Ok(info.email)
    }

    /// Resolves the initial session from the token cache. Errors mean
    /// "signed out", not a fatal condition.
    pub async fn resolve_session(&self) -> Result<Session, AuthError> {
        let token = self.get_valid_token().await?;
        let user_email = self.fetch_user_email(&token.access_token).await?;

        Ok(Session {
            user_email,
            access_token: token.access_token,
        })
    }

    pub async fn complete_sign_in(&self, code: &str) -> Result<Session, AuthError> {
        let token = self.exchange_code(code).await?;
        let user_email = self.fetch_user_email(&token.access_token).await?;

        Ok(Session {
            user_email,
            access_token: token.access_token,
        })
    }

    /// Fire-and-forget: dropping the cached token is all sign-out means
    /// on this side of the provider boundary.
    pub fn sign_out(&self) {
        if let Err(e) = self.storage.clear_token() {
            tracing::error!("Failed to clear token cache: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn google_config(dir: &TempDir) -> GoogleConfig {
        GoogleConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            token_cache: dir.path().join("token.json"),
            redirect_uri: "http://localhost:8080".to_string(),
        }
    }

    fn create_test_token() -> TokenInfo {
        TokenInfo::new("test_access_token".to_string(), 3600)
    }

    fn create_expired_token() -> TokenInfo {
        TokenInfo {
            access_token: "expired_token".to_string(),
            refresh_token: None,
            expires_at: Utc::now() - chrono::Duration::hours(1),
            token_type: "Bearer".to_string(),
        }
    }

    #[test]
    fn new_token_is_valid() {
        assert!(create_test_token().is_valid());
    }

    #[test]
    fn expired_token_is_not_valid() {
        assert!(!create_expired_token().is_valid());
    }

    #[test]
    fn token_close_to_expiry_needs_refresh() {
        let token = TokenInfo::new("t".to_string(), 120);
        assert!(token.needs_refresh());
    }

    #[test]
    fn fresh_token_does_not_need_refresh() {
        assert!(!create_test_token().needs_refresh());
    }

    #[test]
    fn save_and_load_token_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let storage = TokenStorage::new(temp_dir.path().join("token.json"));
        let original = create_test_token().with_refresh_token("refresh".to_string());

        storage.save_token(&original).unwrap();
        let loaded = storage.load_token().unwrap();

        assert_eq!(loaded.access_token, original.access_token);
        assert_eq!(loaded.refresh_token, original.refresh_token);
    }

    #[test]
    fn clear_token_removes_the_cache_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("token.json");
        let storage = TokenStorage::new(path.clone());
        storage.save_token(&create_test_token()).unwrap();

        storage.clear_token().unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn clear_token_is_a_no_op_without_a_cache_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = TokenStorage::new(temp_dir.path().join("missing.json"));

        assert!(storage.clear_token().is_ok());
    }

    #[test]
    fn sign_in_url_carries_scope_and_redirect() {
        let temp_dir = TempDir::new().unwrap();
        let provider = OAuthProvider::new(google_config(&temp_dir));

        let url = provider.sign_in_url().unwrap();

        assert!(url.contains(&urlencoding::encode(CALENDAR_SCOPE).into_owned()));
        assert!(url.contains(&urlencoding::encode("http://localhost:8080").into_owned()));
    }

    #[test]
    fn sign_in_url_fails_without_credentials() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = google_config(&temp_dir);
        config.client_id = String::new();
        let provider = OAuthProvider::new(config);

        assert!(matches!(
            provider.sign_in_url(),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[tokio::test]
    async fn exchange_code_stores_the_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "fresh_token",
                "expires_in": 3600,
                "refresh_token": "refresh",
                "token_type": "Bearer"
            })))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let provider = OAuthProvider::new(google_config(&temp_dir)).with_endpoints(
            format!("{}/token", server.uri()),
            format!("{}/userinfo", server.uri()),
        );

        let token = provider.exchange_code("auth_code").await.unwrap();

        assert_eq!(token.access_token, "fresh_token");
        let cached = TokenStorage::new(temp_dir.path().join("token.json"))
            .load_token()
            .unwrap();
        assert_eq!(cached.access_token, "fresh_token");
    }

    #[tokio::test]
    async fn failed_exchange_surfaces_oauth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let provider = OAuthProvider::new(google_config(&temp_dir)).with_endpoints(
            format!("{}/token", server.uri()),
            format!("{}/userinfo", server.uri()),
        );

        let result = provider.exchange_code("bad_code").await;

        assert!(matches!(result, Err(AuthError::OAuthError(_))));
    }

    #[tokio::test]
    async fn resolve_session_combines_token_and_email() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(header("authorization", "Bearer test_access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "email": "user@example.com"
            })))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let config = google_config(&temp_dir);
        TokenStorage::new(config.token_cache.clone())
            .save_token(&create_test_token())
            .unwrap();
        let provider = OAuthProvider::new(config).with_endpoints(
            format!("{}/token", server.uri()),
            format!("{}/userinfo", server.uri()),
        );

        let session = provider.resolve_session().await.unwrap();

        assert_eq!(session.user_email, "user@example.com");
        assert_eq!(session.access_token, "test_access_token");
    }

    #[tokio::test]
    async fn resolve_session_without_cached_token_is_signed_out() {
        let temp_dir = TempDir::new().unwrap();
        let provider = OAuthProvider::new(google_config(&temp_dir));

        let result = provider.resolve_session().await;

        assert!(result.is_err());
    }
}
