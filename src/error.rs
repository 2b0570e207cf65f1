//! Handler-level error types shared across the exchange, controller, and configuration layers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error type returned by application-implemented consumer callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical handler error exposed by public APIs.
///
/// Every variant is a defect or local problem: expected conditions such as denied consent and
/// rejected exchanges are modeled as [`Outcome`](crate::handler::Outcome) values instead, because
/// the application must render a response for them.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token endpoint answered 2xx with a payload that violates the provider contract.
	#[error("Token endpoint returned a malformed success payload (HTTP {status}).")]
	TokenResponseParse {
		/// Structured parsing failure locating the offending field.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the malformed response.
		status: u16,
	},
	/// Application consumer callback failed; fatal for the request.
	#[error("Consumer callback failed.")]
	Consumer(#[source] BoxError),
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Configuration file could not be read.
	#[error("Configuration file `{path}` could not be read.")]
	Read {
		/// Path handed to the loader.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Configuration file is not valid TOML.
	#[error("Configuration file is not valid TOML.")]
	Parse(#[from] toml::de::Error),
	/// Neither a literal credential nor a resolvable environment variable was provided.
	#[error("Missing `{credential}`: set it in the [notion] section or via the `{env}` environment variable.")]
	MissingCredential {
		/// Name of the missing credential field.
		credential: &'static str,
		/// Environment variable consulted as the fallback.
		env: String,
	},
	/// Requested consumer name is not registered.
	#[error("Unknown consumer `{name}`.")]
	UnknownConsumer {
		/// Requested name.
		name: String,
	},
	/// Requested renderer name is not registered.
	#[error("Unknown renderer `{name}`.")]
	UnknownRenderer {
		/// Requested name.
		name: String,
	},
}

/// Diagnostic value describing a failed access-token exchange.
///
/// Carries the raw outbound request and inbound response so an application can log or display
/// them deliberately. The crate itself never logs this value: the request headers embed the
/// encoded client credentials, and the body carries the authorization code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenRequestFailure {
	/// Form-encoded body sent to the token endpoint.
	pub request_body: String,
	/// Headers sent to the token endpoint.
	pub request_headers: Vec<(String, String)>,
	/// HTTP status of the provider response; `None` when the transport failed before any status
	/// arrived.
	pub response_status: Option<u16>,
	/// Raw response body, or the transport error description when no response arrived.
	pub response_body: String,
}
