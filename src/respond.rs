//! Application-implemented response-rendering contract and the built-in renderers.

// self
use crate::{_prelude::*, error::TokenRequestFailure, token::TokenInfo};

/// Framework-independent HTTP response description produced by renderers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedResponse {
	/// HTTP status code.
	pub status: u16,
	/// Value for the `Content-Type` header.
	pub content_type: String,
	/// Extra headers appended verbatim.
	pub headers: Vec<(String, String)>,
	/// Response body.
	pub body: String,
}
impl RenderedResponse {
	/// Creates a plain-text response with the provided status and body.
	pub fn text(status: u16, body: impl Into<String>) -> Self {
		Self {
			status,
			content_type: "text/plain; charset=utf-8".into(),
			headers: Vec::new(),
			body: body.into(),
		}
	}
}

/// Application-side contract turning controller outcomes into HTTP responses.
///
/// One instance serves every concurrent request.
pub trait ResponseRenderer
where
	Self: Send + Sync,
{
	/// Renders the response for a user-denied-consent outcome.
	fn make_access_denied_response(&self, error_text: &str) -> RenderedResponse;

	/// Renders the response for a failed exchange.
	///
	/// The default hides the diagnostics entirely: the captured failure embeds the encoded
	/// client credentials and the authorization code. Exposing them is an explicit opt-in via an
	/// override such as [`DebugRenderer`].
	fn make_bad_request_response(&self, failure: &TokenRequestFailure) -> RenderedResponse {
		let _ = failure;

		RenderedResponse::text(400, "Token request failed")
	}

	/// Renders the response shown to the end user after a successful exchange.
	fn make_auth_response(&self, token_info: &TokenInfo) -> RenderedResponse;
}

/// Default renderer: terse fixed bodies, no detail leaks.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainRenderer;
impl ResponseRenderer for PlainRenderer {
	fn make_access_denied_response(&self, _error_text: &str) -> RenderedResponse {
		RenderedResponse::text(403, "Error")
	}

	fn make_auth_response(&self, _token_info: &TokenInfo) -> RenderedResponse {
		RenderedResponse::text(200, "OK")
	}
}

/// Renderer that echoes the denial reason and the received token fields back to the user.
#[derive(Clone, Copy, Debug, Default)]
pub struct EchoRenderer;
impl ResponseRenderer for EchoRenderer {
	fn make_access_denied_response(&self, error_text: &str) -> RenderedResponse {
		RenderedResponse::text(403, format!("Error: {error_text}"))
	}

	fn make_auth_response(&self, token_info: &TokenInfo) -> RenderedResponse {
		RenderedResponse::text(200, format!("Token info: {token_info:?}"))
	}
}

/// Renderer for local debugging: like [`PlainRenderer`] on the success and denial paths, but the
/// bad-request response exposes the full exchange diagnostics—encoded credentials included.
/// Never select it for an internet-facing deployment.
#[derive(Clone, Copy, Debug, Default)]
pub struct DebugRenderer;
impl ResponseRenderer for DebugRenderer {
	fn make_access_denied_response(&self, _error_text: &str) -> RenderedResponse {
		RenderedResponse::text(403, "Error")
	}

	fn make_bad_request_response(&self, failure: &TokenRequestFailure) -> RenderedResponse {
		let status =
			failure.response_status.map_or_else(|| "none".to_owned(), |status| status.to_string());

		RenderedResponse::text(
			400,
			format!(
				"Request body: {}\nRequest headers: {:?}\nResponse status: {}\nResponse body: {}",
				failure.request_body, failure.request_headers, status, failure.response_body,
			),
		)
	}

	fn make_auth_response(&self, _token_info: &TokenInfo) -> RenderedResponse {
		RenderedResponse::text(200, "OK")
	}
}
