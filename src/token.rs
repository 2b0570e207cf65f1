//! Immutable value types flowing between the controller, consumer, and renderer layers.

// self
use crate::_prelude::*;

/// Capture of one inbound OAuth redirect request.
///
/// Built once per request by the HTTP adapter and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectInfo {
	/// Callback URL registered with the provider, stripped of its query string.
	pub redirect_uri: String,
	/// Authorization code issued by the provider; empty when none was issued.
	pub code: String,
	/// Opaque anti-CSRF correlator set by the application at initiation time; empty when absent.
	pub state: String,
}
impl RedirectInfo {
	/// Builds a redirect capture from the observed request URL, stripping the query string.
	///
	/// The remainder is kept byte-for-byte: Notion validates that the `redirect_uri` sent during
	/// the exchange matches the one used to initiate authorization.
	pub fn new(observed_uri: &str, code: impl Into<String>, state: impl Into<String>) -> Self {
		let redirect_uri = match observed_uri.find('?') {
			Some(idx) => &observed_uri[..idx],
			None => observed_uri,
		};

		Self { redirect_uri: redirect_uri.to_owned(), code: code.into(), state: state.into() }
	}
}

/// Access-token record produced by a successful exchange.
///
/// Only ever constructed from a 2xx token response containing every field; a response missing any
/// of them never yields a partially populated value. The `owner` schema is owned by Notion and
/// passed through uninterpreted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
	/// Bearer token granting access to the authorized workspace.
	pub access_token: String,
	/// Identifier of the workspace the integration was installed into.
	pub workspace_id: String,
	/// Human-readable workspace name.
	pub workspace_name: String,
	/// Workspace icon URL.
	pub workspace_icon: String,
	/// Identifier of the bot user created for the integration.
	pub bot_id: String,
	/// Provider-owned description of the authorizing principal.
	pub owner: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn redirect_uri_is_the_observed_url_without_its_query_string() {
		let info = RedirectInfo::new("https://host/auth?code=X&state=Y", "X", "Y");

		assert_eq!(info.redirect_uri, "https://host/auth");
		assert_eq!(info.code, "X");
		assert_eq!(info.state, "Y");
	}

	#[test]
	fn redirect_uri_without_query_string_is_kept_verbatim() {
		let info = RedirectInfo::new("https://host/auth", "", "");

		assert_eq!(info.redirect_uri, "https://host/auth");
	}

	#[test]
	fn token_info_requires_every_field() {
		let missing_bot_id = r#"{
			"access_token": "t1",
			"workspace_id": "w1",
			"workspace_name": "W",
			"workspace_icon": "i",
			"owner": {}
		}"#;

		assert!(serde_json::from_str::<TokenInfo>(missing_bot_id).is_err());
	}

	#[test]
	fn token_info_tolerates_extra_provider_fields() {
		let with_extras = r#"{
			"access_token": "t1",
			"token_type": "bearer",
			"workspace_id": "w1",
			"workspace_name": "W",
			"workspace_icon": "i",
			"bot_id": "b1",
			"owner": {"type": "user"}
		}"#;
		let info = serde_json::from_str::<TokenInfo>(with_extras)
			.expect("Unknown provider fields should be ignored.");

		assert_eq!(info.access_token, "t1");
		assert_eq!(info.owner.get("type").and_then(|value| value.as_str()), Some("user"));
	}
}
