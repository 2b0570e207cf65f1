//! Mock Notion provider for local testing: answers the token endpoint with placeholder values so
//! consumers can be exercised without real credentials.

// crates.io
use axum::{Json, Router, routing::get};
use uuid::Uuid;
// self
use crate::token::TokenInfo;

/// Builds the mock provider router exposing `/v1/oauth/token`.
///
/// The route answers GET as well as POST so both a browser and the real
/// [`TokenExchanger`](crate::exchange::TokenExchanger) can drive it.
pub fn make_mock_router() -> Router {
	Router::new().route("/v1/oauth/token", get(mock_token_endpoint).post(mock_token_endpoint))
}

async fn mock_token_endpoint() -> Json<TokenInfo> {
	tracing::info!("Mock: accepted token request");

	Json(TokenInfo {
		access_token: Uuid::new_v4().to_string(),
		workspace_id: Uuid::new_v4().to_string(),
		workspace_name: Uuid::new_v4().to_string(),
		workspace_icon: format!("http://{}.png", Uuid::new_v4()),
		bot_id: Uuid::new_v4().to_string(),
		owner: serde_json::Map::new(),
	})
}
