//! Prometeo banking API client
//!
//! Handles communication with the Prometeo open-banking API: session
//! login/logout, account and credit card listings, and movements.
//!
//! Every request carries the `X-API-Key` header; authenticated calls also
//! pass the session key as the `key` query parameter.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;
use url::Url;

use crate::domain::result::{Error as DomainError, ProviderError, ProviderResult, Result as DomainResult};
use crate::domain::{Account, CreditCard, Credentials, DateWindow, Movement, ProviderInfo, SessionToken};
use crate::ports::BankingApi;

/// Sandbox API URL
pub const PROMETEO_SANDBOX_URL: &str = "https://banking.sandbox.prometeoapi.com";

const API_KEY_HEADER: &str = "X-API-Key";
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Prometeo API client
#[derive(Debug)]
pub struct PrometeoClient {
    client: Client,
    api_key: String,
    base_url: String,
    base: Url,
}

impl PrometeoClient {
    /// Create a client against the sandbox
    pub fn new(api_key: &str) -> DomainResult<Self> {
        Self::new_with_base_url(api_key, PROMETEO_SANDBOX_URL)
    }

    /// Create a client with a custom base URL (staging, local mock server)
    pub fn new_with_base_url(api_key: &str, base_url: &str) -> DomainResult<Self> {
        if api_key.trim().is_empty() {
            return Err(DomainError::config("Prometeo API key cannot be empty"));
        }

        let parsed = Url::parse(base_url)
            .map_err(|e| DomainError::config(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(DomainError::config("Base URL must use http or https"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| DomainError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            base: parsed,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL extended by `segments`, each percent-encoded as one path
    /// segment. A trailing `""` yields a trailing slash.
    fn endpoint(&self, segments: &[&str]) -> ProviderResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Network(format!("cannot build a request URL from {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get(&self, segments: &[&str]) -> ProviderResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!(method = "GET", path = url.path(), "prometeo request");
        Ok(self.client.get(url).header(API_KEY_HEADER, &self.api_key))
    }

    fn post(&self, segments: &[&str]) -> ProviderResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!(method = "POST", path = url.path(), "prometeo request");
        Ok(self.client.post(url).header(API_KEY_HEADER, &self.api_key))
    }

    /// Send a request and require a 2xx status
    fn send(&self, request: RequestBuilder) -> ProviderResult<Response> {
        let response = request.send().map_err(map_request_error)?;
        check_response_status(&response)?;
        Ok(response)
    }

    /// Send a request and pull one field out of the JSON envelope.
    /// A missing or null field yields the type's default (empty list).
    fn fetch_field<T>(&self, request: RequestBuilder, field: &str) -> ProviderResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let response = self.send(request)?;
        let body: JsonValue = response
            .json()
            .map_err(|e| ProviderError::Malformed(format!("response is not JSON: {}", e)))?;

        match body.get(field) {
            None | Some(JsonValue::Null) => Ok(T::default()),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| ProviderError::Malformed(format!("unexpected '{}' payload: {}", field, e))),
        }
    }

    fn fetch_movements(
        &self,
        segments: &[&str],
        number_param: &str,
        number: &str,
        currency: &str,
        token: &SessionToken,
        window: &DateWindow,
    ) -> ProviderResult<Vec<Movement>> {
        let date_start = window.start_param();
        let date_end = window.end_param();
        let request = self.get(segments)?.query(&[
            (number_param, number),
            ("currency", currency),
            ("date_start", date_start.as_str()),
            ("date_end", date_end.as_str()),
            ("key", token.as_str()),
        ]);
        self.fetch_field(request, "movements")
    }
}

impl BankingApi for PrometeoClient {
    fn name(&self) -> &str {
        "prometeo"
    }

    fn login(&self, credentials: &Credentials) -> ProviderResult<SessionToken> {
        let request = self.post(&["login", ""])?.form(&[
            ("provider", credentials.provider.as_str()),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ]);
        let response = self.send(request)?;
        let body: LoginResponse = response
            .json()
            .map_err(|e| ProviderError::Malformed(format!("login response: {}", e)))?;

        body.key.and_then(SessionToken::new).ok_or_else(|| {
            ProviderError::Auth(format!(
                "login returned no session key (status: {})",
                body.status.as_deref().unwrap_or("unknown")
            ))
        })
    }

    fn logout(&self, token: &SessionToken) -> ProviderResult<()> {
        let request = self.get(&["logout", ""])?.query(&[("key", token.as_str())]);
        self.send(request).map(|_| ())
    }

    fn get_providers(&self) -> ProviderResult<Vec<ProviderInfo>> {
        self.fetch_field(self.get(&["provider", ""])?, "providers")
    }

    fn get_info(&self, token: &SessionToken) -> ProviderResult<JsonValue> {
        let request = self.get(&["info", ""])?.query(&[("key", token.as_str())]);
        let info: JsonValue = self.fetch_field(request, "info")?;
        Ok(if info.is_null() { serde_json::json!({}) } else { info })
    }

    fn get_accounts(&self, token: &SessionToken) -> ProviderResult<Vec<Account>> {
        let request = self.get(&["account", ""])?.query(&[("key", token.as_str())]);
        self.fetch_field(request, "accounts")
    }

    fn get_credit_cards(&self, token: &SessionToken) -> ProviderResult<Vec<CreditCard>> {
        let request = self.get(&["credit-card", ""])?.query(&[("key", token.as_str())]);
        self.fetch_field(request, "credit_cards")
    }

    fn get_account_movements(
        &self,
        token: &SessionToken,
        account_number: &str,
        currency: &str,
        window: &DateWindow,
    ) -> ProviderResult<Vec<Movement>> {
        self.fetch_movements(
            &["account", account_number, "movement", ""],
            "accountNumber",
            account_number,
            currency,
            token,
            window,
        )
    }

    fn get_credit_card_movements(
        &self,
        token: &SessionToken,
        card_number: &str,
        currency: &str,
        window: &DateWindow,
    ) -> ProviderResult<Vec<Movement>> {
        self.fetch_movements(
            &["credit-card", card_number, "movements"],
            "card_number",
            card_number,
            currency,
            token,
            window,
        )
    }
}

/// Map transport errors to provider error kinds
fn map_request_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Network(format!(
            "connection timed out after {} seconds",
            REQUEST_TIMEOUT_SECS
        ))
    } else if error.is_connect() {
        ProviderError::Network("unable to connect to Prometeo servers".to_string())
    } else if error.is_decode() {
        ProviderError::Malformed(error.to_string())
    } else {
        ProviderError::Network(format!("request failed: {}", error))
    }
}

fn check_response_status(response: &Response) -> ProviderResult<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ProviderError::from_status(status.as_u16()))
    }
}
