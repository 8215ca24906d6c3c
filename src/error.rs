//! Broker-level error types shared across authentication, requests, and operations.

// self
use crate::_prelude::*;

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const BODY_PREVIEW_LIMIT: usize = 256;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Login call failed; nothing was cached.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),
	/// API call failed after a token was obtained.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The host returned no credentials for the requested name.
	#[error("No credentials provided for `{name}`.")]
	CredentialsMissing {
		/// Credential name that was looked up.
		name: String,
	},
	/// The host could not package a binary payload.
	#[error("Binary payload could not be packaged: {reason}.")]
	Packaging {
		/// Host-supplied reason string.
		reason: String,
	},
}

/// Configuration and validation failures raised by the broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// Request body could not be encoded as JSON.
	#[error("Request body could not be encoded as JSON.")]
	BodyEncode(#[from] serde_json::Error),
	/// A header value contains characters that cannot be sent.
	#[error("Header `{name}` has an invalid value.")]
	InvalidHeader {
		/// Header name.
		name: &'static str,
		/// Underlying validation failure.
		#[source]
		source: http::header::InvalidHeaderValue,
	},
	/// The API URL cannot be parsed.
	#[error("API URL `{url}` is invalid.")]
	InvalidApiUrl {
		/// Raw URL value.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The API URL does not use HTTPS.
	#[error("API URL must use HTTPS: {url}.")]
	InsecureApiUrl {
		/// Offending URL.
		url: String,
	},
	/// An absolute request URL points outside the credential's API origin.
	#[error("Request URL `{url}` is outside the API origin `{origin}`.")]
	ForeignUrl {
		/// Offending request URL.
		url: String,
		/// Origin of the configured API URL.
		origin: String,
	},
	/// A required field is empty.
	#[error("Field `{field}` is required.")]
	MissingField {
		/// Field name as the host spells it.
		field: &'static str,
	},
	/// A parameter value cannot be placed in a request path.
	#[error("Parameter `{field}` has an invalid value: {value}.")]
	InvalidParameter {
		/// Parameter name as the host spells it.
		field: &'static str,
		/// Offending value.
		value: String,
	},
	/// The resource/operation pair is not implemented.
	#[error("Operation `{operation}` is not supported for resource `{resource}`.")]
	UnsupportedOperation {
		/// Requested resource.
		resource: String,
		/// Requested operation.
		operation: String,
	},
	/// Host-supplied JSON could not be decoded.
	#[error("Host {what} could not be decoded.")]
	Decode {
		/// What was being decoded (credentials, parameters).
		what: &'static str,
		/// Structured decoding failure with the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Login failures. The cache is never written when one of these is raised.
#[derive(Debug, ThisError)]
pub enum AuthenticationError {
	/// The login call did not reach the server or the response could not be read.
	#[error("Authentication failed: {source}.")]
	Network {
		/// Transport-specific failure.
		#[source]
		source: BoxError,
	},
	/// The login endpoint answered with a non-success status.
	#[error("Authentication failed: login endpoint returned HTTP {status}: {body}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Truncated response body.
		body: String,
	},
	/// The login endpoint answered without a usable token.
	#[error("Authentication failed: {reason}.")]
	MalformedToken {
		/// Why the body was rejected.
		reason: &'static str,
	},
}
impl AuthenticationError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	pub(crate) fn rejected(status: u16, body: &[u8]) -> Self {
		Self::Rejected { status, body: body_preview(body) }
	}
}

/// Failures of API calls made with a valid token.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the QAction API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The API answered with a non-success status.
	#[error("QAction API returned HTTP {status}: {body}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Truncated response body.
		body: String,
	},
	/// The API answered with a body that is not valid JSON.
	#[error("QAction API returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code.
		status: u16,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	pub(crate) fn status(status: u16, body: &[u8]) -> Self {
		Self::Status { status, body: body_preview(body) }
	}
}

fn body_preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);
	let trimmed = text.trim();

	if trimmed.is_empty() {
		return "<empty body>".into();
	}

	trimmed.chars().take(BODY_PREVIEW_LIMIT).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn authentication_errors_carry_the_cause() {
		let err: Error = AuthenticationError::rejected(401, b"bad api key").into();

		assert_eq!(
			err.to_string(),
			"Authentication failed: login endpoint returned HTTP 401: bad api key."
		);

		let err: Error = AuthenticationError::network(std::io::Error::other("connection reset"))
			.into();

		assert_eq!(err.to_string(), "Authentication failed: connection reset.");
	}

	#[test]
	fn body_preview_truncates_and_marks_empty() {
		assert_eq!(body_preview(b"  \n"), "<empty body>");
		assert_eq!(body_preview(&[b'x'; 400]).len(), BODY_PREVIEW_LIMIT);
	}

	#[test]
	fn store_error_converts_into_broker_error_with_source() {
		let store_error = crate::store::StoreError::Backend { message: "cache offline".into() };
		let broker_error: Error = store_error.clone().into();

		assert!(matches!(broker_error, Error::Storage(_)));

		let source = StdError::source(&broker_error)
			.expect("Broker error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}
}
