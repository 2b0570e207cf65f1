//! Token-exchange client: the authenticated server-to-server POST that trades an authorization
//! code for an access token.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use reqwest::{
	Client as ReqwestClient,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	error::TokenRequestFailure,
	token::{RedirectInfo, TokenInfo},
};

/// Default Notion API root used when no base URL override is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com";

const TOKEN_PATH: &str = "v1/oauth/token";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Failure of a single exchange attempt.
#[derive(Debug, ThisError)]
pub enum ExchangeError {
	/// Provider rejected the exchange (non-2xx), or the transport failed outright.
	///
	/// A first-class outcome rather than a defect: the application still has to render a
	/// response for it.
	#[error("Access token request to Notion failed.")]
	Rejected(TokenRequestFailure),
	/// Provider answered 2xx but the payload is missing a required field.
	#[error("Token endpoint returned a malformed success payload (HTTP {status}).")]
	ContractViolation {
		/// Structured parsing failure locating the offending field.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the malformed response.
		status: u16,
	},
}

/// Client performing the authorization-code exchange against Notion's token endpoint.
///
/// One exchange opens one connection and awaits one response. Exchanges happen once per end-user
/// login event, so no retry, caching, or connection reuse is layered on top of the transport
/// defaults—authorization codes are single-use and a retried exchange would only fail again.
#[derive(Clone)]
pub struct TokenExchanger {
	http_client: ReqwestClient,
	client_id: String,
	client_secret: String,
	base_url: String,
}
impl TokenExchanger {
	/// Creates an exchanger with a fresh reqwest client and the default Notion base URL.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self::with_http_client(ReqwestClient::new(), client_id, client_secret)
	}

	/// Creates an exchanger that reuses a caller-provided reqwest client.
	pub fn with_http_client(
		http_client: ReqwestClient,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Self {
		Self {
			http_client,
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			base_url: DEFAULT_BASE_URL.into(),
		}
	}

	/// Overrides the provider base URL (mock servers, proxies).
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();

		self
	}

	fn token_url(&self) -> String {
		format!("{}/{TOKEN_PATH}", self.base_url.trim_end_matches('/'))
	}

	fn authorization(&self) -> String {
		// Notion packs `client_id:client_secret` without the standard `Basic ` prefix. The whole
		// plaintext is encoded as-is; colons inside either credential are not separators here.
		BASE64.encode(format!("{}:{}", self.client_id, self.client_secret))
	}

	fn request_body(&self, redirect_info: &RedirectInfo) -> String {
		form_urlencoded::Serializer::new(String::new())
			.append_pair("grant_type", "authorization_code")
			.append_pair("code", &redirect_info.code)
			.append_pair("redirect_uri", &redirect_info.redirect_uri)
			.finish()
	}

	/// Performs the exchange for one redirect capture.
	///
	/// A non-2xx status or a transport failure yields [`ExchangeError::Rejected`] carrying the
	/// full request/response diagnostics; a 2xx payload missing any of the six required fields
	/// yields [`ExchangeError::ContractViolation`].
	pub async fn exchange(
		&self,
		redirect_info: &RedirectInfo,
	) -> Result<TokenInfo, ExchangeError> {
		let body = self.request_body(redirect_info);
		let authorization = self.authorization();
		let response = match self
			.http_client
			.post(self.token_url())
			.header(AUTHORIZATION, &authorization)
			.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
			.body(body.clone())
			.send()
			.await
		{
			Ok(response) => response,
			Err(err) =>
				return Err(ExchangeError::Rejected(TokenRequestFailure {
					request_body: body,
					request_headers: request_headers(&authorization),
					response_status: None,
					response_body: err.to_string(),
				})),
		};
		let status = response.status();
		let raw = match response.text().await {
			Ok(raw) => raw,
			Err(err) =>
				return Err(ExchangeError::Rejected(TokenRequestFailure {
					request_body: body,
					request_headers: request_headers(&authorization),
					response_status: Some(status.as_u16()),
					response_body: err.to_string(),
				})),
		};

		if !status.is_success() {
			return Err(ExchangeError::Rejected(TokenRequestFailure {
				request_body: body,
				request_headers: request_headers(&authorization),
				response_status: Some(status.as_u16()),
				response_body: raw,
			}));
		}

		let mut deserializer = serde_json::Deserializer::from_str(&raw);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ExchangeError::ContractViolation { source, status: status.as_u16() })
	}
}
impl Debug for TokenExchanger {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenExchanger")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &!self.client_secret.is_empty())
			.field("base_url", &self.base_url)
			.finish()
	}
}

fn request_headers(authorization: &str) -> Vec<(String, String)> {
	vec![
		(AUTHORIZATION.as_str().to_owned(), authorization.to_owned()),
		(CONTENT_TYPE.as_str().to_owned(), FORM_CONTENT_TYPE.to_owned()),
	]
}
