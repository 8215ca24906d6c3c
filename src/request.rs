//! Outbound request composition: header merging, bearer authorization, and URL resolution.

// crates.io
use http::{
	HeaderMap, HeaderName, HeaderValue, Method,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError, transport::HttpRequest};

/// One API call before it is bound to credentials and a token.
///
/// `url` is normally a path relative to the credential's API URL. Absolute URLs are sent
/// unchanged only when they share that URL's origin, so the bearer token never leaves it.
#[derive(Clone, Debug, PartialEq)]
pub struct OutboundRequest {
	/// HTTP method.
	pub method: Method,
	/// Relative path (or absolute URL).
	pub url: String,
	/// Caller-supplied headers.
	pub headers: HeaderMap,
	/// Optional JSON body.
	pub body: Option<serde_json::Value>,
	/// Query parameters appended in order.
	pub query: Vec<(String, String)>,
}
impl OutboundRequest {
	/// Creates a request with no headers, body, or query parameters.
	pub fn new(method: Method, url: impl Into<String>) -> Self {
		Self {
			method,
			url: url.into(),
			headers: HeaderMap::new(),
			body: None,
			query: Vec::new(),
		}
	}

	/// Shorthand for a `GET` request.
	pub fn get(url: impl Into<String>) -> Self {
		Self::new(Method::GET, url)
	}

	/// Shorthand for a `POST` request.
	pub fn post(url: impl Into<String>) -> Self {
		Self::new(Method::POST, url)
	}

	/// Adds JSON `Accept`/`Content-Type` headers unless the caller already set them.
	pub fn json(mut self) -> Self {
		self.headers.entry(ACCEPT).or_insert(HeaderValue::from_static("application/json"));
		self.headers.entry(CONTENT_TYPE).or_insert(HeaderValue::from_static("application/json"));

		self
	}

	/// Sets a header, replacing earlier values.
	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Sets the JSON body.
	pub fn with_body(mut self, body: serde_json::Value) -> Self {
		self.body = Some(body);

		self
	}

	/// Appends a query parameter.
	pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.query.push((key.into(), value.to_string()));

		self
	}

	/// Resolves the final URL against `base`, query string included.
	///
	/// An absolute URL whose scheme, host, or port differs from `base` is rejected with
	/// [`ConfigError::ForeignUrl`].
	pub fn resolve_url(&self, base: &Url) -> Result<Url, ConfigError> {
		let mut url = match Url::parse(&self.url) {
			Ok(absolute) if absolute.origin() == base.origin() => absolute,
			Ok(absolute) => {
				return Err(ConfigError::ForeignUrl {
					url: absolute.to_string(),
					origin: base.origin().ascii_serialization(),
				});
			},
			Err(_) => {
				let joined = join_url(base, &self.url);

				Url::parse(&joined)
					.map_err(|source| ConfigError::InvalidApiUrl { url: joined, source })?
			},
		};

		if !self.query.is_empty() {
			url.query_pairs_mut().extend_pairs(self.query.iter());
		}

		Ok(url)
	}

	/// Converts into a transport request rooted at `base`.
	pub fn into_http(self, base: &Url) -> Result<HttpRequest, ConfigError> {
		let url = self.resolve_url(base)?;

		self.into_http_at(url)
	}

	pub(crate) fn into_http_at(self, url: Url) -> Result<HttpRequest, ConfigError> {
		let body = match &self.body {
			Some(body) => serde_json::to_vec(body)?,
			None => Vec::new(),
		};
		let mut request =
			http::Request::builder().method(self.method).uri(url.as_str()).body(body)?;

		*request.headers_mut() = self.headers;

		Ok(request)
	}
}

/// Sets `Authorization: Bearer {token}`, keeping every other header as the caller left it.
///
/// A caller-provided `Authorization` header is replaced by the fresh token.
pub fn authorize(
	mut request: OutboundRequest,
	token: &TokenSecret,
) -> Result<OutboundRequest, ConfigError> {
	let value = token
		.to_header_value(Some("Bearer"))
		.map_err(|source| ConfigError::InvalidHeader { name: "authorization", source })?;

	request.headers.insert(AUTHORIZATION, value);

	Ok(request)
}

/// Joins `path` onto `base` with exactly one `/` between them.
pub fn join_url(base: &Url, path: &str) -> String {
	format!("{}/{}", base.as_str().trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn base(raw: &str) -> Url {
		Url::parse(raw).expect("Base URL fixture should parse.")
	}

	#[test]
	fn authorize_overwrites_authorization_and_keeps_the_rest() {
		let request = OutboundRequest::get("/api/v1/information/build")
			.json()
			.with_header(AUTHORIZATION, HeaderValue::from_static("Basic stale"))
			.with_header(
				HeaderName::from_static("x-trace-id"),
				HeaderValue::from_static("trace-1"),
			);
		let authorized = authorize(request, &TokenSecret::new("abc123"))
			.expect("Printable tokens should authorize.");

		assert_eq!(authorized.headers[AUTHORIZATION], "Bearer abc123");
		assert!(authorized.headers[AUTHORIZATION].is_sensitive());
		assert_eq!(authorized.headers["x-trace-id"], "trace-1");
		assert_eq!(authorized.headers[ACCEPT], "application/json");
		assert_eq!(authorized.headers[CONTENT_TYPE], "application/json");
		assert_eq!(authorized.headers.len(), 4);
	}

	#[test]
	fn authorize_rejects_unprintable_tokens() {
		let err = authorize(OutboundRequest::get("/"), &TokenSecret::new("abc\n123"))
			.expect_err("Tokens with control characters cannot become header values.");

		assert!(matches!(err, ConfigError::InvalidHeader { name: "authorization", .. }));
	}

	#[test]
	fn json_keeps_caller_content_type() {
		let request = OutboundRequest::post("/x")
			.with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
			.json();

		assert_eq!(request.headers[CONTENT_TYPE], "text/plain");
		assert_eq!(request.headers[ACCEPT], "application/json");
	}

	#[test]
	fn join_uses_a_single_slash() {
		let expected = "https://api.qaction.com/api/v1/information/build";

		assert_eq!(join_url(&base("https://api.qaction.com"), "/api/v1/information/build"), expected);
		assert_eq!(join_url(&base("https://api.qaction.com/"), "api/v1/information/build"), expected);
		assert_eq!(
			join_url(&base("https://api.qaction.com/tenant/"), "/api/v1/information/build"),
			"https://api.qaction.com/tenant/api/v1/information/build"
		);
	}

	#[test]
	fn resolve_appends_query_and_keeps_same_origin_urls() {
		let request = OutboundRequest::get("/api/v1/document/d-1/download")
			.with_query("latestVersion", true)
			.with_query("prohibitPDFConversion", false);
		let url = request
			.resolve_url(&base("https://api.qaction.com/"))
			.expect("Relative paths should resolve.");

		assert_eq!(
			url.as_str(),
			"https://api.qaction.com/api/v1/document/d-1/download?latestVersion=true&prohibitPDFConversion=false"
		);

		let absolute = OutboundRequest::get("https://api.qaction.com/files/blob")
			.resolve_url(&base("https://api.qaction.com/tenant/"))
			.expect("Same-origin absolute URLs should be used as-is.");

		assert_eq!(absolute.as_str(), "https://api.qaction.com/files/blob");
	}

	#[test]
	fn resolve_refuses_other_origins() {
		let api = base("https://api.qaction.com/");

		for foreign in [
			"https://files.qaction.com/blob",
			"http://api.qaction.com/blob",
			"https://api.qaction.com:8443/blob",
		] {
			let err = OutboundRequest::get(foreign)
				.resolve_url(&api)
				.expect_err("Other origins must not receive the token.");

			assert!(matches!(
				err,
				ConfigError::ForeignUrl { ref url, ref origin }
					if url == foreign && origin == "https://api.qaction.com"
			));
		}
	}

	#[test]
	fn into_http_carries_method_headers_and_body() {
		let request = OutboundRequest::post("/api/v1/document/query")
			.json()
			.with_body(serde_json::json!({ "classificationIds": ["a"] }))
			.into_http(&base("https://api.qaction.com"))
			.expect("Request should convert.");

		assert_eq!(request.method(), Method::POST);
		assert_eq!(request.uri(), "https://api.qaction.com/api/v1/document/query");
		assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
		assert_eq!(request.body().as_slice(), br#"{"classificationIds":["a"]}"#);
	}
}
