//! OAuth exchange controller: redirect validation, token exchange, and consumer dispatch.

// self
use crate::{
	_prelude::*,
	consumer::OAuthConsumer,
	error::TokenRequestFailure,
	exchange::{ExchangeError, TokenExchanger},
	token::{RedirectInfo, TokenInfo},
};

/// Query parameters extracted from the inbound redirect request.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RedirectQuery {
	/// Consent error reported by the provider, e.g. `access_denied`.
	pub error: Option<String>,
	/// Authorization code issued after successful consent.
	pub code: Option<String>,
	/// Anti-CSRF correlator echoed back by the provider.
	pub state: Option<String>,
}

/// Terminal outcome of one redirect request.
///
/// Every variant must be rendered into an HTTP response by the application's
/// [`ResponseRenderer`](crate::respond::ResponseRenderer); none of them is an error that escapes
/// the controller.
#[derive(Clone, Debug)]
pub enum Outcome {
	/// User denied consent.
	AccessDenied {
		/// Raw `error` query parameter text.
		error: String,
	},
	/// Exchange succeeded and the consumer accepted the token.
	AuthSuccess(TokenInfo),
	/// Provider rejected the exchange, or the transport failed.
	ExchangeFailed(TokenRequestFailure),
}

/// Orchestrates the redirect → exchange → consume sequence.
///
/// Holds the shared consumer and the exchange client; the sequence is strictly linear and needs
/// no internal locking—each request owns its `RedirectInfo`/`TokenInfo` exclusively.
pub struct OAuthHandler<C>
where
	C: ?Sized + OAuthConsumer,
{
	consumer: Arc<C>,
	exchanger: TokenExchanger,
}
impl<C> OAuthHandler<C>
where
	C: ?Sized + OAuthConsumer,
{
	/// Creates a controller around a shared consumer and an exchange client.
	pub fn new(consumer: impl Into<Arc<C>>, exchanger: TokenExchanger) -> Self {
		Self { consumer: consumer.into(), exchanger }
	}

	/// Handles one redirect request and produces its terminal [`Outcome`].
	///
	/// A non-empty `error` parameter always short-circuits the flow before any exchange is
	/// attempted, even when a `code` is also present: providers signal cancelled consent through
	/// `error`, and exchanging whatever code accompanies it would fail anyway.
	///
	/// Consumer callback failures and 2xx contract violations surface as `Err(_)`; rejected
	/// exchanges surface as [`Outcome::ExchangeFailed`] and never invoke the token callback.
	/// Nothing here retries—authorization codes are single-use.
	pub async fn handle_redirect(
		&self,
		query: &RedirectQuery,
		observed_uri: &str,
	) -> Result<Outcome> {
		if let Some(error) = query.error.as_deref().filter(|error| !error.is_empty()) {
			self.consumer.consume_redirect_error(error).await.map_err(Error::Consumer)?;

			return Ok(Outcome::AccessDenied { error: error.to_owned() });
		}

		let redirect_info = RedirectInfo::new(
			observed_uri,
			query.code.clone().unwrap_or_default(),
			query.state.clone().unwrap_or_default(),
		);
		let state = self
			.consumer
			.consume_redirect_info(&redirect_info)
			.await
			.map_err(Error::Consumer)?;
		let token_info = match self.exchanger.exchange(&redirect_info).await {
			Ok(token_info) => token_info,
			Err(ExchangeError::Rejected(failure)) => return Ok(Outcome::ExchangeFailed(failure)),
			Err(ExchangeError::ContractViolation { source, status }) =>
				return Err(Error::TokenResponseParse { source, status }),
		};

		self.consumer.consume_token_info(&token_info, state).await.map_err(Error::Consumer)?;

		Ok(Outcome::AuthSuccess(token_info))
	}
}
impl<C> Clone for OAuthHandler<C>
where
	C: ?Sized + OAuthConsumer,
{
	fn clone(&self) -> Self {
		Self { consumer: self.consumer.clone(), exchanger: self.exchanger.clone() }
	}
}
impl<C> Debug for OAuthHandler<C>
where
	C: ?Sized + OAuthConsumer,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthHandler").field("exchanger", &self.exchanger).finish()
	}
}
