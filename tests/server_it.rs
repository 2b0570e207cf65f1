// crates.io
use axum::Router;
use color_eyre::Result;
use httpmock::prelude::*;
use tokio::net::TcpListener;
// self
use notion_oauth_handler::{
	_preludet::*,
	handler::OAuthHandler,
	mock::make_mock_router,
	reqwest,
	respond::{EchoRenderer, PlainRenderer, ResponseRenderer},
	server::{RouterOptions, make_router},
	token::RedirectInfo,
	url,
};

const TOKEN_BODY: &str = "{\"access_token\":\"t1\",\"workspace_id\":\"w1\",\"workspace_name\":\"W\",\"workspace_icon\":\"i\",\"bot_id\":\"b1\",\"owner\":{}}";

async fn spawn(router: Router) -> Result<String> {
	let listener = TcpListener::bind("127.0.0.1:0").await?;
	let addr = listener.local_addr()?;

	tokio::spawn(async move {
		axum::serve(listener, router).await.expect("Test server should not terminate.");
	});

	Ok(format!("http://{addr}"))
}

fn recording_router(
	provider: &MockServer,
	renderer: Arc<dyn ResponseRenderer>,
	options: &RouterOptions,
) -> (Router, Arc<RecordingConsumer>) {
	let consumer = Arc::new(RecordingConsumer::default());
	let handler = OAuthHandler::<RecordingConsumer>::new(
		consumer.clone(),
		test_exchanger(&provider.base_url(), "abc", "xyz"),
	);

	(make_router(handler, renderer, options), consumer)
}

#[tokio::test]
async fn denials_render_through_the_injected_renderer() -> Result<()> {
	let provider = MockServer::start_async().await;
	let (router, consumer) =
		recording_router(&provider, Arc::new(PlainRenderer), &RouterOptions::default());
	let base = spawn(router).await?;
	let response = reqwest::get(format!("{base}/auth_redirect?error=access_denied")).await?;

	assert_eq!(response.status().as_u16(), 403);
	assert_eq!(response.text().await?, "Error");
	assert_eq!(
		consumer.errors.lock().expect("Mutex should not be poisoned.").as_slice(),
		["access_denied"],
	);

	Ok(())
}

#[tokio::test]
async fn base_path_prefixes_the_redirect_route() -> Result<()> {
	let provider = MockServer::start_async().await;
	let options = RouterOptions { base_path: "/app".into(), ..RouterOptions::default() };
	let (router, _consumer) = recording_router(&provider, Arc::new(EchoRenderer), &options);
	let base = spawn(router).await?;
	let response = reqwest::get(format!("{base}/app/auth_redirect?error=access_denied")).await?;

	assert_eq!(response.status().as_u16(), 403);
	assert_eq!(response.text().await?, "Error: access_denied");

	// The unprefixed path no longer exists.
	let response = reqwest::get(format!("{base}/auth_redirect?error=access_denied")).await?;

	assert_eq!(response.status().as_u16(), 404);

	Ok(())
}

#[tokio::test]
async fn successful_redirects_exchange_against_the_observed_public_uri() -> Result<()> {
	let provider = MockServer::start_async().await;
	// The listener is bound up front so the expected redirect URI is known before the provider
	// mock is configured.
	let listener = TcpListener::bind("127.0.0.1:0").await?;
	let addr = listener.local_addr()?;
	let expected_redirect_uri = format!("http://{addr}/auth_redirect");
	let expected_body = url::form_urlencoded::Serializer::new(String::new())
		.append_pair("grant_type", "authorization_code")
		.append_pair("code", "Z9")
		.append_pair("redirect_uri", &expected_redirect_uri)
		.finish();
	let mock = provider
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/oauth/token")
				.header("authorization", "YWJjOnh5eg==")
				.body(&expected_body);
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let options = RouterOptions { public_scheme: "http".into(), ..RouterOptions::default() };
	let (router, consumer) = recording_router(&provider, Arc::new(PlainRenderer), &options);

	tokio::spawn(async move {
		axum::serve(listener, router).await.expect("Test server should not terminate.");
	});

	let response = reqwest::get(format!("http://{addr}/auth_redirect?code=Z9&state=S1")).await?;

	assert_eq!(response.status().as_u16(), 200);
	assert_eq!(response.text().await?, "OK");
	mock.assert_async().await;

	let tokens = consumer.tokens.lock().expect("Mutex should not be poisoned.").clone();

	assert_eq!(tokens.len(), 1);
	assert_eq!(tokens[0].0.access_token, "t1");
	assert_eq!(tokens[0].1, RedirectInfo::new(&expected_redirect_uri, "Z9", "S1"));

	Ok(())
}

#[tokio::test]
async fn rejected_exchanges_render_the_bad_request_response() -> Result<()> {
	let provider = MockServer::start_async().await;
	let _mock = provider
		.mock_async(|when, then| {
			when.method(POST).path("/v1/oauth/token");
			then.status(400).body("{\"error\":\"invalid_grant\"}");
		})
		.await;
	let (router, _consumer) =
		recording_router(&provider, Arc::new(PlainRenderer), &RouterOptions::default());
	let base = spawn(router).await?;
	let response = reqwest::get(format!("{base}/auth_redirect?code=stale")).await?;

	assert_eq!(response.status().as_u16(), 400);

	let body = response.text().await?;

	assert_eq!(body, "Token request failed");
	// The default renderer must never echo the captured credentials.
	assert!(!body.contains("YWJjOnh5eg=="));

	Ok(())
}

#[tokio::test]
async fn internal_failures_render_a_plain_500() -> Result<()> {
	let provider = MockServer::start_async().await;
	// A partial 2xx payload is a provider contract violation, which the endpoint treats as an
	// internal failure rather than a renderable outcome.
	let _mock = provider
		.mock_async(|when, then| {
			when.method(POST).path("/v1/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"t1\"}");
		})
		.await;
	let (router, consumer) =
		recording_router(&provider, Arc::new(PlainRenderer), &RouterOptions::default());
	let base = spawn(router).await?;
	let response = reqwest::get(format!("{base}/auth_redirect?code=Z9")).await?;

	assert_eq!(response.status().as_u16(), 500);
	assert_eq!(response.text().await?, "Internal server error");
	assert!(consumer.tokens.lock().expect("Mutex should not be poisoned.").is_empty());

	Ok(())
}

#[tokio::test]
async fn configured_documents_are_served_under_the_base_path() -> Result<()> {
	let provider = MockServer::start_async().await;
	let file = std::env::temp_dir().join(format!("terms-{}.txt", std::process::id()));

	tokio::fs::write(&file, "Terms of use.").await?;

	let options = RouterOptions {
		terms_file: Some(file.clone()),
		document_content_type: "text/plain; charset=utf-8".into(),
		..RouterOptions::default()
	};
	let (router, _consumer) = recording_router(&provider, Arc::new(PlainRenderer), &options);
	let base = spawn(router).await?;
	let response = reqwest::get(format!("{base}/terms")).await?;

	assert_eq!(response.status().as_u16(), 200);
	assert_eq!(
		response
			.headers()
			.get("content-type")
			.and_then(|value| value.to_str().ok())
			.unwrap_or_default(),
		"text/plain; charset=utf-8",
	);
	assert_eq!(response.text().await?, "Terms of use.");

	let _ = tokio::fs::remove_file(&file).await;

	// Routes without a configured document are absent entirely.
	let response = reqwest::get(format!("{base}/privacy")).await?;

	assert_eq!(response.status().as_u16(), 404);

	Ok(())
}

#[tokio::test]
async fn the_real_exchanger_can_drive_the_bundled_mock_provider() -> Result<()> {
	let base = spawn(make_mock_router()).await?;
	let exchanger = test_exchanger(&base, "abc", "xyz");
	let token = exchanger
		.exchange(&RedirectInfo::new("https://host/auth", "Z9", "S1"))
		.await
		.expect("The bundled mock provider should satisfy the exchange contract.");

	assert!(!token.access_token.is_empty());
	assert!(!token.bot_id.is_empty());
	assert!(token.workspace_icon.ends_with(".png"));
	assert!(token.owner.is_empty());

	Ok(())
}
