use crate::{
    config::ApiConfig,
    frontend::utils::errors::{FrontendError, FrontendResult},
};
use log::{debug, info};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use url::Url;

pub mod event;
#[cfg(test)]
pub(crate) mod mock;
pub mod notifications;

pub use event::EventApi;
pub use notifications::NotificationApi;

/// Http client for the backend. All requests share one connection pool and cookie store, so
/// the session cookie set at login is sent automatically.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> FrontendResult<Self> {
        let mut builder = reqwest::Client::builder();
        #[cfg(not(target_family = "wasm"))]
        {
            use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
            builder = builder
                .cookie_store(true)
                .timeout(std::time::Duration::from_secs(config.timeout_secs));
            if let Some(session_cookie) = &config.session_cookie {
                let mut headers = HeaderMap::new();
                let value = HeaderValue::from_str(session_cookie)
                    .map_err(|e| FrontendError::RequestSetup(e.to_string()))?;
                headers.insert(COOKIE, value);
                builder = builder.default_headers(headers);
            }
        }
        let client = builder.build()?;
        Ok(Self::with_client(client, Url::parse(&config.base_url)?))
    }

    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get<T>(&self, endpoint: &str) -> FrontendResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        self.send(Method::GET, endpoint, None::<()>).await
    }

    async fn post<T, B>(&self, endpoint: &str, body: Option<B>) -> FrontendResult<T>
    where
        T: for<'de> Deserialize<'de>,
        B: Serialize + Debug,
    {
        self.send(Method::POST, endpoint, body).await
    }

    async fn put<T, B>(&self, endpoint: &str, body: Option<B>) -> FrontendResult<T>
    where
        T: for<'de> Deserialize<'de>,
        B: Serialize + Debug,
    {
        self.send(Method::PUT, endpoint, body).await
    }

    /// For endpoints where only the status matters, the response body is ignored.
    async fn send_empty<B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<B>,
    ) -> FrontendResult<()>
    where
        B: Serialize + Debug,
    {
        let (status, text, url) = self.send_raw(method, endpoint, body).await?;
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::error_response(status, &text, &url))
        }
    }

    async fn send<T, B>(&self, method: Method, endpoint: &str, body: Option<B>) -> FrontendResult<T>
    where
        T: for<'de> Deserialize<'de>,
        B: Serialize + Debug,
    {
        let (status, text, url) = self.send_raw(method, endpoint, body).await?;
        Self::response(status, text, &url)
    }

    async fn send_raw<B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<B>,
    ) -> FrontendResult<(StatusCode, String, String)>
    where
        B: Serialize + Debug,
    {
        let url = self.request_endpoint(endpoint)?;
        debug!("{method} {url} {body:?}");
        let mut req = self.client.request(method, url);
        if let Some(body) = &body {
            req = req.json(body);
        }
        let res = req.send().await?;
        let status = res.status();
        let url = res.url().to_string();
        let text = res.text().await?;
        Ok((status, text, url))
    }

    fn response<T>(status: StatusCode, text: String, url: &str) -> FrontendResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        if !status.is_success() {
            return Err(Self::error_response(status, &text, url));
        }
        serde_json::from_str(&text).map_err(|e| {
            info!("Failed to deserialize api response: {e} from {text} on {url}");
            FrontendError::ErrorResponse {
                status: status.as_u16(),
                message: format!("Invalid response from server: {e}"),
            }
        })
    }

    fn error_response(status: StatusCode, text: &str, url: &str) -> FrontendError {
        info!("API error: {text} on {url} status {status}");
        let message = serde_json::from_str::<ErrorBody>(text)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .or_else(|| (!text.trim().is_empty()).then(|| text.trim().to_string()))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        FrontendError::ErrorResponse {
            status: status.as_u16(),
            message,
        }
    }

    fn request_endpoint(&self, endpoint: &str) -> FrontendResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{endpoint}"))?)
    }
}
