//! Application-implemented consumer contract receiving OAuth lifecycle callbacks.

// self
use crate::{
	_prelude::*,
	token::{RedirectInfo, TokenInfo},
};

/// Boxed future returned by consumer callbacks.
///
/// Callbacks return boxed futures so the trait stays object-safe and registries can hand out
/// `Arc<dyn OAuthConsumer<State = RedirectInfo>>` singletons.
pub type ConsumerFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BoxError>> + 'a + Send>>;

/// Application-side contract for observing and persisting OAuth outcomes.
///
/// One instance serves every concurrent redirect request. `State` is the correlator threaded from
/// [`consume_redirect_info`](Self::consume_redirect_info) to
/// [`consume_token_info`](Self::consume_token_info) within a single request: an application can
/// look up a pending authorization session keyed by `state` once at redirect time and reuse the
/// result when the token arrives, without a second lookup.
///
/// Callback failures are defects in application code. The controller does not catch them, never
/// retries them, and the request fails with a generic server error.
pub trait OAuthConsumer
where
	Self: Send + Sync,
{
	/// Correlator produced at redirect time and consumed at token time.
	type State: 'static + Send;

	/// Notification that the user denied consent; called before the denial response is rendered.
	///
	/// Defaults to a no-op. Override to log or audit cancelled authorization attempts.
	fn consume_redirect_error<'a>(&'a self, error_text: &'a str) -> ConsumerFuture<'a, ()> {
		let _ = error_text;

		Box::pin(async { Ok(()) })
	}

	/// Accepts the redirect capture and returns the request's correlator.
	fn consume_redirect_info<'a>(
		&'a self,
		redirect_info: &'a RedirectInfo,
	) -> ConsumerFuture<'a, Self::State>;

	/// Receives the exchanged token together with the correlator; persistence happens here.
	fn consume_token_info<'a>(
		&'a self,
		token_info: &'a TokenInfo,
		state: Self::State,
	) -> ConsumerFuture<'a, ()>;
}

/// Built-in consumer that uses the redirect capture itself as the correlator and logs received
/// tokens instead of persisting them. Useful for wiring checks and local runs against the mock
/// provider.
#[derive(Clone, Copy, Debug, Default)]
pub struct DebugConsumer;
impl OAuthConsumer for DebugConsumer {
	type State = RedirectInfo;

	fn consume_redirect_info<'a>(
		&'a self,
		redirect_info: &'a RedirectInfo,
	) -> ConsumerFuture<'a, RedirectInfo> {
		Box::pin(async move { Ok(redirect_info.clone()) })
	}

	fn consume_token_info<'a>(
		&'a self,
		token_info: &'a TokenInfo,
		state: RedirectInfo,
	) -> ConsumerFuture<'a, ()> {
		Box::pin(async move {
			tracing::info!(
				workspace_id = %token_info.workspace_id,
				workspace_name = %token_info.workspace_name,
				bot_id = %token_info.bot_id,
				state = %state.state,
				"Consumed token info",
			);

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn debug_consumer_returns_its_input_as_the_correlator() {
		let consumer = DebugConsumer;
		let info = RedirectInfo::new("https://host/auth?code=X", "X", "Y");
		let state = consumer
			.consume_redirect_info(&info)
			.await
			.expect("Identity correlator should never fail.");

		assert_eq!(state, info);
	}

	#[tokio::test]
	async fn default_error_callback_is_a_no_op() {
		let consumer = DebugConsumer;

		consumer
			.consume_redirect_error("access_denied")
			.await
			.expect("Default error callback should never fail.");
	}
}
