use std::fmt;
use std::future::Future;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

use crate::auth::TokenManager;
use crate::error::{
    AuthFetchError, CatalogError, Result, SchemaViolation, ValidationError,
};

/// When a response should trigger re-authentication and a resend.
#[derive(Clone, Copy)]
pub struct RetryPolicy {
    /// Resends allowed per request; the first attempt is not counted.
    pub max_retries: u8,
    pub reauth_on: fn(StatusCode) -> bool,
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            reauth_on: is_unauthorized,
        }
    }
}

impl RetryPolicy {
    /// Never resend.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

fn is_unauthorized(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED
}

/// Per-request settings passed through to the transport unchanged.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Defaults to `GET`.
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub cancel: Option<CancellationToken>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn cancel_with(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Sends requests with the current bearer token and re-authenticates on
/// rejection.
///
/// Only the retry predicate triggers a resend; every other status, success
/// or not, is handed back for the caller to interpret.
#[derive(Debug, Clone)]
pub struct AuthenticatedFetch {
    client: Client,
    tokens: Arc<TokenManager>,
    retry: RetryPolicy,
}

impl AuthenticatedFetch {
    pub fn new(
        client: Client,
        tokens: Arc<TokenManager>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            tokens,
            retry,
        }
    }

    pub fn tokens(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    pub async fn fetch(&self, url: Url, options: FetchOptions) -> Result<Response> {
        let cancel = options.cancel.clone();
        cancellable(cancel.as_ref(), self.fetch_with_retry(url, &options)).await
    }

    async fn fetch_with_retry(
        &self,
        url: Url,
        options: &FetchOptions,
    ) -> Result<Response> {
        let mut retries = 0u8;
        loop {
            let token = self.tokens.get_token().await?;
            let response = self.send_once(&url, options, &token).await?;
            let status = response.status();

            if retries < self.retry.max_retries && (self.retry.reauth_on)(status) {
                retries += 1;
                info!(%status, %url, retries, "catalog rejected token, re-authenticating");
                self.tokens.invalidate_token();
                continue;
            }

            debug!(%status, %url, "catalog responded");
            return Ok(response);
        }
    }

    async fn send_once(
        &self,
        url: &Url,
        options: &FetchOptions,
        token: &str,
    ) -> Result<Response> {
        let mut headers = options.headers.clone();
        // The managed token always wins over a caller supplied header.
        headers.insert(AUTHORIZATION, bearer(token)?);

        let mut request = self
            .client
            .request(options.method.clone(), url.clone())
            .headers(headers);
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        Ok(request.send().await?)
    }
}

fn bearer(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::try_from(format!("Bearer {token}"))
        .map_err(|_| {
            AuthFetchError::InvalidBody(ValidationError::new(
                "Invalid token response",
                vec![SchemaViolation {
                    path: "token".into(),
                    message: "not usable as a header value".into(),
                }],
            ))
        })?;
    value.set_sensitive(true);
    Ok(value)
}

async fn cancellable<T>(
    cancel: Option<&CancellationToken>,
    work: impl Future<Output = Result<T>>,
) -> Result<T> {
    match cancel {
        Some(token) => tokio::select! {
            biased;
            () = token.cancelled() => Err(CatalogError::Cancelled),
            outcome = work => outcome,
        },
        None => work.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retry_policy_reauths_on_401_only() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 1);
        assert!((policy.reauth_on)(StatusCode::UNAUTHORIZED));
        assert!(!(policy.reauth_on)(StatusCode::FORBIDDEN));
        assert!(!(policy.reauth_on)(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(RetryPolicy::none().max_retries, 0);
    }

    #[test]
    fn test_bearer_header_is_sensitive() {
        let value = bearer("abc").unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer abc");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_bearer_rejects_control_characters() {
        let err = bearer("bad\ntoken").unwrap_err();
        assert!(matches!(err, CatalogError::AuthFetch(AuthFetchError::InvalidBody(_))));
    }

    #[tokio::test]
    async fn test_cancelled_before_work_completes() {
        let token = CancellationToken::new();
        token.cancel();
        let outcome = cancellable(Some(&token), std::future::pending::<Result<()>>()).await;
        assert!(matches!(outcome, Err(CatalogError::Cancelled)));
    }
}
