//! TOML configuration for the redirect server.
//!
//! ```toml
//! [main]
//! consumer = "debug"
//! renderer = "plain"
//!
//! [server]
//! base_path = ""
//! redirect_path = "/auth_redirect"
//!
//! [notion]
//! client_id_env = "NOTION_CLIENT_ID"
//! client_secret_env = "NOTION_CLIENT_SECRET"
//!
//! [custom]
//! # Free-form application settings handed to the consumer factory.
//! ```

// std
use std::{env, fs, path::{Path, PathBuf}};
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	exchange::DEFAULT_BASE_URL,
	registry::CustomSettings,
};

/// Top-level application configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// Implementation selectors.
	pub main: MainSection,
	/// Inbound HTTP server settings.
	pub server: ServerSection,
	/// Notion integration credentials and endpoint.
	pub notion: NotionSection,
	/// Free-form settings handed to the consumer factory.
	pub custom: CustomSettings,
}
impl AppConfig {
	/// Loads configuration from a TOML file; every section and field is optional.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let raw = fs::read_to_string(path)
			.map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;

		Ok(toml::from_str(&raw).map_err(ConfigError::Parse)?)
	}
}

/// Consumer and renderer selection.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MainSection {
	/// Registered consumer name.
	pub consumer: String,
	/// Registered renderer name.
	pub renderer: String,
}
impl Default for MainSection {
	fn default() -> Self {
		Self { consumer: "debug".into(), renderer: "plain".into() }
	}
}

/// Inbound HTTP server settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSection {
	/// Listen host.
	pub host: String,
	/// Listen port.
	pub port: u16,
	/// Base path prefixed to every route.
	pub base_path: String,
	/// Path of the redirect endpoint, relative to the base path.
	pub redirect_path: String,
	/// Scheme used when reconstructing the observed redirect URI; the listener itself usually
	/// sits behind a TLS-terminating proxy.
	pub public_scheme: String,
	/// Optional privacy policy document served at `{base_path}/privacy`.
	pub privacy_file: Option<PathBuf>,
	/// Optional terms-of-use document served at `{base_path}/terms`.
	pub terms_file: Option<PathBuf>,
	/// Content type for the legal-document routes.
	pub document_content_type: String,
}
impl Default for ServerSection {
	fn default() -> Self {
		Self {
			host: "0.0.0.0".into(),
			port: 8000,
			base_path: String::new(),
			redirect_path: "/auth_redirect".into(),
			public_scheme: "https".into(),
			privacy_file: None,
			terms_file: None,
			document_content_type: "text/html; charset=utf-8".into(),
		}
	}
}

/// Notion integration credentials and endpoint.
///
/// Each credential can be given either as a literal or through the environment variable named by
/// the matching `*_env` field; literals win when both are present.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotionSection {
	/// Client ID of the Notion integration.
	pub client_id: String,
	/// Environment variable consulted when `client_id` is empty.
	pub client_id_env: String,
	/// Client secret of the Notion integration.
	pub client_secret: String,
	/// Environment variable consulted when `client_secret` is empty.
	pub client_secret_env: String,
	/// Provider API root.
	pub base_url: String,
}
impl NotionSection {
	/// Resolves the client credentials, preferring literals over environment variables.
	pub fn resolve_credentials(&self) -> Result<(String, String)> {
		let client_id = resolve(&self.client_id, &self.client_id_env, "client_id")?;
		let client_secret = resolve(&self.client_secret, &self.client_secret_env, "client_secret")?;

		Ok((client_id, client_secret))
	}
}
impl Default for NotionSection {
	fn default() -> Self {
		Self {
			client_id: String::new(),
			client_id_env: "NOTION_CLIENT_ID".into(),
			client_secret: String::new(),
			client_secret_env: "NOTION_CLIENT_SECRET".into(),
			base_url: DEFAULT_BASE_URL.into(),
		}
	}
}

fn resolve(literal: &str, env_key: &str, credential: &'static str) -> Result<String> {
	if !literal.is_empty() {
		return Ok(literal.to_owned());
	}

	env::var(env_key).map_err(|_| {
		ConfigError::MissingCredential { credential, env: env_key.to_owned() }.into()
	})
}
