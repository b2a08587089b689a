//! ONS Integra API client.
//!
//! Three endpoints, all `POST` with JSON bodies:
//!
//! | Endpoint | Body | 200 response |
//! |---|---|---|
//! | `autenticar` | `{usuario, senha}` | `{access_token, refresh_token}` |
//! | `renovar` | `{refresh_token}` | `{access_token, refresh_token}` |
//! | `programacao/usina/ListarGeracaoProposta` | `{Ano, Mes, Dia, CodigosUsinas}` | `{Usinas: [..]}` |
//!
//! The forecast endpoint needs a bearer token, answers 401 once the token
//! has expired and 429 when the caller is rate limited.

use async_trait::async_trait;
use plantcast_core::{Credentials, ForecastRequest, GenerationResponse, TokenPair};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{AuthError, FetchError, HttpError};
use crate::host::http::HttpClient;

// ============================================================================
// Constants
// ============================================================================

/// Production API base URL.
pub const DEFAULT_BASE_URL: &str = "https://integra.ons.org.br/api";

/// Authentication endpoint, relative to the base URL.
const AUTH_PATH: &str = "autenticar";

/// Token renewal endpoint.
const RENEW_PATH: &str = "renovar";

/// Per-plant generation forecast endpoint.
const FORECAST_PATH: &str = "programacao/usina/ListarGeracaoProposta";

// ============================================================================
// Endpoints
// ============================================================================

/// Fully resolved endpoint URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Authentication URL.
    pub auth: String,
    /// Renewal URL.
    pub renew: String,
    /// Forecast URL.
    pub forecast: String,
    host: String,
}

impl Endpoints {
    /// Resolves the endpoint paths against `base`.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::InvalidUrl` if `base` is not an absolute
    /// http(s) URL with a host.
    pub fn from_base(base: &str) -> Result<Self, HttpError> {
        let mut base = Url::parse(base).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(HttpError::InvalidUrl(format!(
                "unsupported scheme: {}",
                base.scheme()
            )));
        }
        let host = base
            .host_str()
            .ok_or_else(|| HttpError::InvalidUrl("No host in URL".to_string()))?
            .to_string();

        // Url::join replaces the last segment unless the path ends with '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let join = |path: &str| -> Result<String, HttpError> {
            base.join(path)
                .map(String::from)
                .map_err(|e| HttpError::InvalidUrl(e.to_string()))
        };

        Ok(Self {
            auth: join(AUTH_PATH)?,
            renew: join(RENEW_PATH)?,
            forecast: join(FORECAST_PATH)?,
            host,
        })
    }

    /// Returns the API host, used to build the domain allowlist.
    pub fn host(&self) -> &str {
        &self.host
    }
}

// ============================================================================
// Forecast Reply
// ============================================================================

/// Outcome of one forecast request, classified by status.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationReply {
    /// 200 with a well-formed body.
    Success(GenerationResponse),
    /// 401: the access token is no longer valid.
    Unauthorized,
    /// 429: too many requests.
    RateLimited,
    /// Any other status.
    Failed(u16),
}

impl GenerationReply {
    /// Returns the HTTP status this reply stands for.
    pub fn status(&self) -> u16 {
        match self {
            Self::Success(_) => 200,
            Self::Unauthorized => 401,
            Self::RateLimited => 429,
            Self::Failed(status) => *status,
        }
    }
}

// ============================================================================
// API Trait
// ============================================================================

/// The three API operations the fetcher depends on.
#[async_trait]
pub trait OnsApi: Send + Sync {
    /// Exchanges credentials for a token pair.
    async fn authenticate(&self, credentials: &Credentials) -> Result<TokenPair, AuthError>;

    /// Exchanges a refresh token for a new token pair.
    async fn renew(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;

    /// Requests the forecast for one batch of plants.
    async fn list_generation(
        &self,
        access_token: &str,
        request: &ForecastRequest,
    ) -> Result<GenerationReply, FetchError>;
}

// ============================================================================
// API Client
// ============================================================================

#[derive(Serialize)]
struct RenewBody<'a> {
    refresh_token: &'a str,
}

/// `reqwest`-backed [`OnsApi`] implementation.
#[derive(Debug, Clone)]
pub struct OnsClient {
    http: HttpClient,
    endpoints: Endpoints,
}

impl OnsClient {
    /// Creates a client for the given endpoints.
    pub fn new(http: HttpClient, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    /// Returns the resolved endpoints.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Parses a token pair out of a 200 auth/renew response.
    async fn read_tokens(response: reqwest::Response) -> Result<TokenPair, AuthError> {
        let body = response.text().await?;
        let tokens: TokenPair = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "Failed to parse token response");
            AuthError::InvalidResponse(e.to_string())
        })?;

        if !tokens.is_complete() {
            return Err(AuthError::InvalidResponse("empty token".to_string()));
        }
        Ok(tokens)
    }
}

#[async_trait]
impl OnsApi for OnsClient {
    #[instrument(skip(self, credentials), fields(login = %credentials.login))]
    async fn authenticate(&self, credentials: &Credentials) -> Result<TokenPair, AuthError> {
        let response = self.http.post_json(&self.endpoints.auth, credentials).await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
            });
        }

        Self::read_tokens(response).await
    }

    #[instrument(skip(self, refresh_token))]
    async fn renew(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let body = RenewBody { refresh_token };
        let response = self.http.post_json(&self.endpoints.renew, &body).await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AuthError::RenewalRejected {
                status: status.as_u16(),
            });
        }

        Self::read_tokens(response).await
    }

    #[instrument(skip(self, access_token, request), fields(plants = request.plants.len()))]
    async fn list_generation(
        &self,
        access_token: &str,
        request: &ForecastRequest,
    ) -> Result<GenerationReply, FetchError> {
        let response = self
            .http
            .post_json_with_bearer(&self.endpoints.forecast, access_token, request)
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                let parsed = GenerationResponse::from_json(&body).map_err(|e| {
                    warn!(error = %e, "Forecast response does not match schema");
                    FetchError::Schema(e.to_string())
                })?;
                debug!(records = parsed.plants.len(), "Forecast batch parsed");
                Ok(GenerationReply::Success(parsed))
            }
            StatusCode::UNAUTHORIZED => Ok(GenerationReply::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => Ok(GenerationReply::RateLimited),
            other => Ok(GenerationReply::Failed(other.as_u16())),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mockito::{Matcher, Server};
    use plantcast_core::PlantCode;
    use serde_json::json;

    fn client_for(server: &Server) -> OnsClient {
        OnsClient::new(
            HttpClient::new().unwrap(),
            Endpoints::from_base(&server.url()).unwrap(),
        )
    }

    fn request() -> ForecastRequest {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        ForecastRequest::new(date, &[PlantCode::new("VLAB2").unwrap()]).unwrap()
    }

    #[test]
    fn test_endpoints_keep_base_path() {
        let endpoints = Endpoints::from_base(DEFAULT_BASE_URL).unwrap();
        assert_eq!(endpoints.auth, "https://integra.ons.org.br/api/autenticar");
        assert_eq!(endpoints.renew, "https://integra.ons.org.br/api/renovar");
        assert_eq!(
            endpoints.forecast,
            "https://integra.ons.org.br/api/programacao/usina/ListarGeracaoProposta"
        );
        assert_eq!(endpoints.host(), "integra.ons.org.br");
    }

    #[test]
    fn test_endpoints_trailing_slash() {
        let endpoints = Endpoints::from_base("https://example.com/api/").unwrap();
        assert_eq!(endpoints.auth, "https://example.com/api/autenticar");
    }

    #[test]
    fn test_endpoints_reject_bad_base() {
        assert!(Endpoints::from_base("not a url").is_err());
        assert!(Endpoints::from_base("ftp://example.com/api").is_err());
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/autenticar")
            .match_body(Matcher::Json(json!({"usuario": "user", "senha": "pass"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"access_token": "acc", "refresh_token": "ref"}).to_string())
            .create_async()
            .await;

        let client = client_for(&server);
        let tokens = client
            .authenticate(&Credentials::new("user", "pass"))
            .await
            .unwrap();

        assert_eq!(tokens, TokenPair::new("acc", "ref"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_authenticate_rejected() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/autenticar")
            .with_status(403)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.authenticate(&Credentials::new("user", "bad")).await;

        assert!(matches!(result, Err(AuthError::Rejected { status: 403 })));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_authenticate_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/autenticar")
            .with_status(200)
            .with_body(r#"{"token": "x"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.authenticate(&Credentials::new("user", "pass")).await;
        assert!(matches!(result, Err(AuthError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_renew_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/renovar")
            .match_body(Matcher::Json(json!({"refresh_token": "old-ref"})))
            .with_status(200)
            .with_body(json!({"access_token": "new-acc", "refresh_token": "new-ref"}).to_string())
            .create_async()
            .await;

        let client = client_for(&server);
        let tokens = client.renew("old-ref").await.unwrap();

        assert_eq!(tokens, TokenPair::new("new-acc", "new-ref"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_renew_rejected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/renovar")
            .with_status(401)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.renew("stale").await;
        assert!(matches!(result, Err(AuthError::RenewalRejected { status: 401 })));
    }

    #[tokio::test]
    async fn test_list_generation_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/programacao/usina/ListarGeracaoProposta")
            .match_header("authorization", "Bearer acc")
            .match_body(Matcher::Json(json!({
                "Ano": 2024, "Mes": 5, "Dia": 17, "CodigosUsinas": ["VLAB2"]
            })))
            .with_status(200)
            .with_body(
                json!({
                    "Usinas": [{
                        "Codigo": "VLAB2",
                        "DadoInsumoPatamar": [{"PatamarHora": "00:30", "PatamarValor_PRE": 4.2}]
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let reply = client.list_generation("acc", &request()).await.unwrap();

        match reply {
            GenerationReply::Success(resp) => {
                assert_eq!(resp.plants.len(), 1);
                assert_eq!(resp.plants[0].value_at("00:30"), Some(4.2));
            }
            other => panic!("unexpected reply: {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_generation_classifies_statuses() {
        for (status, expected) in [
            (401, GenerationReply::Unauthorized),
            (429, GenerationReply::RateLimited),
            (500, GenerationReply::Failed(500)),
        ] {
            let mut server = Server::new_async().await;
            let _mock = server
                .mock("POST", "/programacao/usina/ListarGeracaoProposta")
                .with_status(status)
                .create_async()
                .await;

            let client = client_for(&server);
            let reply = client.list_generation("acc", &request()).await.unwrap();
            assert_eq!(reply, expected);
            assert_eq!(reply.status(), u16::try_from(status).unwrap());
        }
    }

    #[tokio::test]
    async fn test_list_generation_schema_mismatch() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/programacao/usina/ListarGeracaoProposta")
            .with_status(200)
            .with_body(r#"{"Plants": []}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.list_generation("acc", &request()).await;
        assert!(matches!(result, Err(FetchError::Schema(_))));
    }
}
