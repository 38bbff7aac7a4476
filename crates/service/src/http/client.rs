use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::errors::ApiError;
use crate::session::SessionSynchronizer;

/// Supplies the bearer token attached to outgoing requests.
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

impl TokenSource for SessionSynchronizer {
    fn bearer_token(&self) -> Option<String> {
        SessionSynchronizer::bearer_token(self)
    }
}

/// Fixed token, or none. Handy for anonymous clients and tests.
#[derive(Clone, Debug, Default)]
pub struct StaticToken(pub Option<String>);

impl TokenSource for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(Form),
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Empty => f.write_str("Empty"),
            RequestBody::Json(v) => f.debug_tuple("Json").field(v).finish(),
            RequestBody::Multipart(_) => f.write_str("Multipart(..)"),
        }
    }
}

/// Method, body, query and extra headers of one request.
#[derive(Debug)]
pub struct RequestOptions {
    pub method: Method,
    pub body: RequestBody,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { method: Method::GET, body: RequestBody::Empty, query: Vec::new(), headers: Vec::new() }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn delete() -> Self {
        Self { method: Method::DELETE, ..Self::default() }
    }

    /// `POST` without a body.
    pub fn post() -> Self {
        Self { method: Method::POST, ..Self::default() }
    }

    /// `PUT` without a body.
    pub fn put() -> Self {
        Self { method: Method::PUT, ..Self::default() }
    }

    pub fn post_json<T: Serialize>(body: &T) -> Result<Self, ApiError> {
        Self::json(Method::POST, body)
    }

    pub fn put_json<T: Serialize>(body: &T) -> Result<Self, ApiError> {
        Self::json(Method::PUT, body)
    }

    fn json<T: Serialize>(method: Method, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(Self { method, body: RequestBody::Json(value), ..Self::default() })
    }

    pub fn multipart(form: Form) -> Self {
        Self { method: Method::POST, body: RequestBody::Multipart(form), ..Self::default() }
    }

    pub fn with_query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Request builder bound to one backend and one token source.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl ApiClient {
    pub fn new(base_url: &str, user_agent: &str, tokens: Arc<dyn TokenSource>) -> Result<Self, ApiError> {
        let base_url = common::url::normalize_base_url(base_url)?;
        let http = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { http, base_url, tokens })
    }

    pub fn from_config(cfg: &configs::BackendConfig, tokens: Arc<dyn TokenSource>) -> Result<Self, ApiError> {
        Self::new(&cfg.base_url, &cfg.user_agent, tokens)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Prepare a request without sending it.
    ///
    /// Adds `Authorization: Bearer <token>` when the token source has one and
    /// `Content-Type: application/json` unless the body is multipart (the
    /// multipart encoder sets its own boundary header). Caller headers are
    /// applied last.
    pub fn build(&self, path: &str, opts: RequestOptions) -> Result<reqwest::Request, ApiError> {
        let url = common::url::join_url(&self.base_url, path)?;
        let mut headers = HeaderMap::new();
        if let Some(token) = self.tokens.bearer_token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ApiError::InvalidHeader(format!("authorization: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        if !matches!(opts.body, RequestBody::Multipart(_)) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        for (name, value) in &opts.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| ApiError::InvalidHeader(format!("{name}: {e}")))?;
            let value = HeaderValue::from_str(value).map_err(|e| ApiError::InvalidHeader(format!("{name}: {e}")))?;
            headers.insert(name, value);
        }

        let mut req = self.http.request(opts.method, url.as_str()).headers(headers);
        if !opts.query.is_empty() {
            req = req.query(&opts.query);
        }
        req = match opts.body {
            RequestBody::Empty => req,
            RequestBody::Json(value) => req.json(&value),
            RequestBody::Multipart(form) => req.multipart(form),
        };
        Ok(req.build()?)
    }

    /// Build and send. Any HTTP status is returned as a response.
    #[instrument(skip(self, opts), fields(method = %opts.method))]
    pub async fn send(&self, path: &str, opts: RequestOptions) -> Result<reqwest::Response, ApiError> {
        let request = self.build(path, opts)?;
        let resp = self.http.execute(request).await?;
        debug!(status = resp.status().as_u16(), "backend responded");
        Ok(resp)
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(token: Option<&str>) -> ApiClient {
        ApiClient::new("http://localhost:8080/api/", "test", Arc::new(StaticToken(token.map(String::from)))).unwrap()
    }

    #[test]
    fn bearer_and_json_content_type() {
        let req = client(Some("tok123")).build("/jobs", RequestOptions::get()).unwrap();
        assert_eq!(req.url().as_str(), "http://localhost:8080/api/jobs");
        assert_eq!(req.method(), &Method::GET);
        let auth = req.headers().get(AUTHORIZATION).unwrap();
        assert_eq!(auth.to_str().unwrap(), "Bearer tok123");
        assert!(auth.is_sensitive());
        assert_eq!(req.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap(), "application/json");
    }

    #[test]
    fn anonymous_request_has_no_authorization() {
        let req = client(None).build("users/login", RequestOptions::post_json(&json!({"email": "a@b.c"})).unwrap()).unwrap();
        assert!(req.headers().get(AUTHORIZATION).is_none());
        assert_eq!(req.method(), &Method::POST);
        let body = req.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(serde_json::from_slice::<Value>(body).unwrap(), json!({"email": "a@b.c"}));
    }

    #[test]
    fn multipart_keeps_its_own_content_type() {
        let form = Form::new().text("note", "cv");
        let req = client(Some("t")).build("/jobseekers/1/resume", RequestOptions::multipart(form)).unwrap();
        let ct = req.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap();
        assert!(ct.starts_with("multipart/form-data; boundary="));
        assert!(req.headers().get(AUTHORIZATION).is_some());
    }

    #[test]
    fn query_and_extra_headers() {
        let opts = RequestOptions::get().with_query([("keyword", "rust dev"), ("page", "2")]).with_header("x-trace", "abc");
        let req = client(None).build("/jobs/search", opts).unwrap();
        assert_eq!(req.url().query(), Some("keyword=rust+dev&page=2"));
        assert_eq!(req.headers().get("x-trace").unwrap().to_str().unwrap(), "abc");
    }

    #[test]
    fn bad_inputs_are_rejected() {
        assert!(matches!(
            ApiClient::new("localhost", "t", Arc::new(StaticToken::default())),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(client(None).build("/../etc", RequestOptions::get()), Err(ApiError::InvalidUrl(_))));
        assert!(matches!(
            client(Some("bad\ntoken")).build("/jobs", RequestOptions::get()),
            Err(ApiError::InvalidHeader(_))
        ));
    }
}
