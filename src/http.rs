//! Transport primitives for backend calls.
//!
//! [`HttpTransport`] is the crate's only dependency on an HTTP stack. Requests are described by
//! [`ApiRequest`], which stays independent of any transport so the private-mode interceptor can
//! rebuild the exact same request with a rotated bearer token.

// std
use std::ops::Deref;
// crates.io
use reqwest::{
	Request,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::ClientConfig,
	error::{ConfigError, TransportError},
	obs::FlowKind,
};

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Response, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports able to execute a fully built request.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by every
/// clone of a [`Client`](crate::flows::Client). Any response that arrives, whatever its status,
/// is returned as `Ok`; only the absence of a response is an error.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves with the backend's response.
	fn execute(&self, request: Request) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The refresh credential is an httponly cookie set by the token endpoint, so any custom
/// [`ReqwestClient`] handed to [`ReqwestHttpClient::with_client`] must have a cookie store
/// enabled or silent refresh will always be rejected.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a cookie-aware client honoring the configured user agent.
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder().cookie_store(true);

		if let Some(user_agent) = &config.user_agent {
			builder = builder.user_agent(user_agent.clone());
		}

		builder.build().map(Self).map_err(ConfigError::http_client_build)
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl HttpTransport for ReqwestHttpClient {
	fn execute(&self, request: Request) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move { client.execute(request).await.map_err(TransportError::from) })
	}
}

/// Body attached to an [`ApiRequest`].
#[derive(Clone, Debug, Default)]
pub enum RequestBody {
	/// No body.
	#[default]
	Empty,
	/// `application/json` body.
	Json(serde_json::Value),
	/// `application/x-www-form-urlencoded` body.
	Form(Vec<(String, String)>),
}

/// Transport-independent description of a backend call.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Path relative to the configured base URL.
	pub path: String,
	/// Query string pairs, appended in order.
	pub query: Vec<(String, String)>,
	/// Request body.
	pub body: RequestBody,
}
impl ApiRequest {
	/// Creates a body-less request.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self { method, path: path.into(), query: Vec::new(), body: RequestBody::Empty }
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// Shorthand for a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// Shorthand for a `PUT` request.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::PUT, path)
	}

	/// Shorthand for a `DELETE` request.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::DELETE, path)
	}

	/// Appends a query pair.
	pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));

		self
	}

	/// Serializes `body` as the JSON payload.
	pub fn json<T>(mut self, body: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		self.body = RequestBody::Json(serde_json::to_value(body)?);

		Ok(self)
	}

	/// Uses `fields` as a form-encoded payload.
	pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
		self.body = RequestBody::Form(fields);

		self
	}

	/// Builds a transport request, attaching `bearer` when provided.
	pub fn build(
		&self,
		config: &ClientConfig,
		bearer: Option<&TokenSecret>,
	) -> Result<Request, ConfigError> {
		let mut url = config.endpoint_url(&self.path)?;

		if !self.query.is_empty() {
			url.query_pairs_mut().extend_pairs(self.query.iter());
		}

		let mut request = Request::new(self.method.clone(), url);
		let headers = request.headers_mut();

		headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

		if let Some(token) = bearer {
			let mut value = HeaderValue::from_str(&token.bearer())?;

			value.set_sensitive(true);
			headers.insert(AUTHORIZATION, value);
		}

		match &self.body {
			RequestBody::Empty => (),
			RequestBody::Json(value) => {
				headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
				*request.body_mut() = Some(serde_json::to_vec(value)?.into());
			},
			RequestBody::Form(fields) => {
				let encoded = url::form_urlencoded::Serializer::new(String::new())
					.extend_pairs(fields.iter())
					.finish();

				headers.insert(
					CONTENT_TYPE,
					HeaderValue::from_static("application/x-www-form-urlencoded"),
				);
				*request.body_mut() = Some(encoded.into());
			},
		}

		*request.timeout_mut() = config.request_timeout;

		Ok(request)
	}
}

/// Reads the full body and decodes it with path-aware error reporting.
pub(crate) async fn read_json<T>(flow: FlowKind, response: Response) -> Result<T>
where
	T: DeserializeOwned,
{
	let bytes = response.bytes().await.map_err(TransportError::from)?;
	let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

	serde_path_to_error::deserialize(&mut deserializer).map_err(|e| Error::parse(flow, e))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config() -> ClientConfig {
		ClientConfig::builder(Url::parse("http://localhost:8000/api/v1/").expect("URL fixture."))
			.request_timeout(Duration::from_secs(3))
			.build()
			.expect("Config fixture should build.")
	}

	#[test]
	fn bearer_is_injected_and_marked_sensitive() {
		let token = TokenSecret::new("tok1");
		let request = ApiRequest::get("records/2025-01-01")
			.query("limit", "10")
			.build(&config(), Some(&token))
			.expect("Request should build.");
		let auth = request.headers().get(AUTHORIZATION).expect("Authorization header expected.");

		assert_eq!(auth, "Bearer tok1");
		assert!(auth.is_sensitive());
		assert_eq!(
			request.url().as_str(),
			"http://localhost:8000/api/v1/records/2025-01-01?limit=10"
		);
		assert_eq!(request.timeout(), Some(&Duration::from_secs(3)));
	}

	#[test]
	fn public_requests_carry_no_credentials() {
		let request = ApiRequest::post("auth/token")
			.form(vec![("username".into(), "alice".into()), ("password".into(), "a b&c".into())])
			.build(&config(), None)
			.expect("Request should build.");

		assert!(request.headers().get(AUTHORIZATION).is_none());
		assert_eq!(
			request.headers().get(CONTENT_TYPE).expect("Content type expected."),
			"application/x-www-form-urlencoded"
		);

		let body = request
			.body()
			.and_then(|body| body.as_bytes())
			.expect("Form body should be buffered.");

		assert_eq!(body, b"username=alice&password=a+b%26c");
	}

	#[test]
	fn json_bodies_are_serialized() {
		let request = ApiRequest::put("records/7")
			.json(&serde_json::json!({ "weight": 150 }))
			.expect("JSON body should serialize.")
			.build(&config(), None)
			.expect("Request should build.");
		let body = request
			.body()
			.and_then(|body| body.as_bytes())
			.expect("JSON body should be buffered.");

		assert_eq!(body, br#"{"weight":150}"#);
	}
}
