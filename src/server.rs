//! Inbound HTTP adapter: the redirect endpoint, legal-document routes, and listener bootstrap.
//!
//! The adapter receives the controller and renderer by explicit injection—shared state handed to
//! the router—never through request-scoped ambient attributes.

// std
use std::path::PathBuf;
// crates.io
use axum::{
	Router,
	body::Body,
	extract::{Host, OriginalUri, Query, State},
	http::{StatusCode, header::CONTENT_TYPE},
	response::{IntoResponse, Response},
	routing::get,
};
use tokio::net::TcpListener;
// self
use crate::{
	_prelude::*,
	config::ServerSection,
	consumer::OAuthConsumer,
	handler::{OAuthHandler, Outcome, RedirectQuery},
	respond::{RenderedResponse, ResponseRenderer},
};

/// Listener failures raised while serving.
#[derive(Debug, ThisError)]
pub enum ServeError {
	/// Listener could not bind the requested address.
	#[error("Failed to bind {host}:{port}.")]
	Bind {
		/// Requested host.
		host: String,
		/// Requested port.
		port: u16,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Server terminated with an IO failure.
	#[error("Server terminated abnormally.")]
	Serve(#[source] std::io::Error),
}

/// Route and document options consumed when building the router.
#[derive(Clone, Debug)]
pub struct RouterOptions {
	/// Base path prefixed to every route.
	pub base_path: String,
	/// Path of the redirect endpoint, relative to the base path.
	pub redirect_path: String,
	/// Scheme used when reconstructing the observed redirect URI.
	pub public_scheme: String,
	/// Optional privacy policy document served at `{base_path}/privacy`.
	pub privacy_file: Option<PathBuf>,
	/// Optional terms-of-use document served at `{base_path}/terms`.
	pub terms_file: Option<PathBuf>,
	/// Content type for the legal-document routes.
	pub document_content_type: String,
}
impl Default for RouterOptions {
	fn default() -> Self {
		(&ServerSection::default()).into()
	}
}
impl From<&ServerSection> for RouterOptions {
	fn from(section: &ServerSection) -> Self {
		Self {
			base_path: section.base_path.clone(),
			redirect_path: section.redirect_path.clone(),
			public_scheme: section.public_scheme.clone(),
			privacy_file: section.privacy_file.clone(),
			terms_file: section.terms_file.clone(),
			document_content_type: section.document_content_type.clone(),
		}
	}
}

struct ServerState<C>
where
	C: ?Sized + OAuthConsumer,
{
	handler: OAuthHandler<C>,
	renderer: Arc<dyn ResponseRenderer>,
	public_scheme: String,
}

struct DocumentState {
	file: PathBuf,
	content_type: String,
}

/// Builds the redirect-handling router.
///
/// `GET {base_path}{redirect_path}` runs the controller; `{base_path}/privacy` and
/// `{base_path}/terms` serve the configured legal documents when present.
pub fn make_router<C>(
	handler: OAuthHandler<C>,
	renderer: Arc<dyn ResponseRenderer>,
	options: &RouterOptions,
) -> Router
where
	C: ?Sized + OAuthConsumer + 'static,
{
	let base_path = options.base_path.trim_end_matches('/').to_owned();
	let redirect_route =
		format!("{base_path}/{}", options.redirect_path.trim_start_matches('/'));
	let state = Arc::new(ServerState {
		handler,
		renderer,
		public_scheme: options.public_scheme.clone(),
	});
	let mut router =
		Router::new().route(&redirect_route, get(redirect_endpoint::<C>).with_state(state));

	if let Some(file) = &options.privacy_file {
		router = router.route(
			&format!("{base_path}/privacy"),
			get(document_endpoint).with_state(Arc::new(DocumentState {
				file: file.clone(),
				content_type: options.document_content_type.clone(),
			})),
		);
	}
	if let Some(file) = &options.terms_file {
		router = router.route(
			&format!("{base_path}/terms"),
			get(document_endpoint).with_state(Arc::new(DocumentState {
				file: file.clone(),
				content_type: options.document_content_type.clone(),
			})),
		);
	}

	router
}

/// Binds `host:port` and serves the router until the surrounding task is cancelled.
pub async fn serve(router: Router, host: &str, port: u16) -> Result<(), ServeError> {
	let listener = TcpListener::bind((host, port)).await.map_err(|source| ServeError::Bind {
		host: host.to_owned(),
		port,
		source,
	})?;

	tracing::info!(host, port, "Listening for redirect requests");

	axum::serve(listener, router).await.map_err(ServeError::Serve)
}

async fn redirect_endpoint<C>(
	State(state): State<Arc<ServerState<C>>>,
	Host(host): Host,
	OriginalUri(uri): OriginalUri,
	Query(query): Query<RedirectQuery>,
) -> Response
where
	C: ?Sized + OAuthConsumer + 'static,
{
	tracing::info!("Accepted redirect request");

	// The request's own URL, query string removed. The scheme comes from configuration because
	// the provider redirects to the public address, not to whatever this listener terminates.
	let observed_uri = format!("{}://{host}{}", state.public_scheme, uri.path());

	match state.handler.handle_redirect(&query, &observed_uri).await {
		Ok(Outcome::AccessDenied { error }) =>
			state.renderer.make_access_denied_response(&error).into_response(),
		Ok(Outcome::AuthSuccess(token_info)) =>
			state.renderer.make_auth_response(&token_info).into_response(),
		Ok(Outcome::ExchangeFailed(failure)) =>
			state.renderer.make_bad_request_response(&failure).into_response(),
		Err(error) => {
			tracing::error!(error = %error, "Redirect handling failed");

			(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
		},
	}
}

async fn document_endpoint(State(state): State<Arc<DocumentState>>) -> Response {
	match tokio::fs::read_to_string(&state.file).await {
		Ok(body) => ([(CONTENT_TYPE, state.content_type.clone())], body).into_response(),
		Err(error) => {
			tracing::error!(error = %error, file = %state.file.display(), "Document read failed");

			(StatusCode::INTERNAL_SERVER_ERROR, "Document unavailable").into_response()
		},
	}
}

impl IntoResponse for RenderedResponse {
	fn into_response(self) -> Response {
		let mut builder = Response::builder().status(self.status);

		for (name, value) in &self.headers {
			builder = builder.header(name, value);
		}

		match builder.header(CONTENT_TYPE, &self.content_type).body(Body::from(self.body)) {
			Ok(response) => response,
			Err(error) => {
				tracing::error!(error = %error, "Renderer produced an invalid response");

				StatusCode::INTERNAL_SERVER_ERROR.into_response()
			},
		}
	}
}
