//! Server-side half of the Notion OAuth 2.0 authorization-code handshake—receive the consent
//! redirect, trade the code for an access token, and hand the result to pluggable consumers and
//! response renderers.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod config;
pub mod consumer;
pub mod error;
pub mod exchange;
pub mod handler;
pub mod mock;
pub mod obs;
pub mod registry;
pub mod respond;
pub mod server;
pub mod token;

#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience helpers for integration tests: a callback-recording consumer and a
	//! mock-provider-ready exchanger.

	pub use crate::_prelude::*;

	// std
	use std::sync::Mutex;
	// self
	use crate::{
		consumer::{ConsumerFuture, OAuthConsumer},
		exchange::TokenExchanger,
		token::{RedirectInfo, TokenInfo},
	};

	/// Consumer that records every callback invocation for assertions.
	///
	/// Uses the redirect capture itself as the correlator, matching the default consumer
	/// behavior, so tests can assert the correlator arrives unchanged.
	#[derive(Debug, Default)]
	pub struct RecordingConsumer {
		/// Error texts passed to `consume_redirect_error`.
		pub errors: Mutex<Vec<String>>,
		/// Redirect captures passed to `consume_redirect_info`.
		pub redirects: Mutex<Vec<RedirectInfo>>,
		/// Token/correlator pairs passed to `consume_token_info`.
		pub tokens: Mutex<Vec<(TokenInfo, RedirectInfo)>>,
	}
	impl OAuthConsumer for RecordingConsumer {
		type State = RedirectInfo;

		fn consume_redirect_error<'a>(&'a self, error_text: &'a str) -> ConsumerFuture<'a, ()> {
			Box::pin(async move {
				self.errors
					.lock()
					.expect("Recording consumer mutex should not be poisoned.")
					.push(error_text.to_owned());

				Ok(())
			})
		}

		fn consume_redirect_info<'a>(
			&'a self,
			redirect_info: &'a RedirectInfo,
		) -> ConsumerFuture<'a, RedirectInfo> {
			Box::pin(async move {
				self.redirects
					.lock()
					.expect("Recording consumer mutex should not be poisoned.")
					.push(redirect_info.clone());

				Ok(redirect_info.clone())
			})
		}

		fn consume_token_info<'a>(
			&'a self,
			token_info: &'a TokenInfo,
			state: RedirectInfo,
		) -> ConsumerFuture<'a, ()> {
			Box::pin(async move {
				self.tokens
					.lock()
					.expect("Recording consumer mutex should not be poisoned.")
					.push((token_info.clone(), state));

				Ok(())
			})
		}
	}

	/// Builds a [`TokenExchanger`] pointed at a mock provider base URL.
	pub fn test_exchanger(base_url: &str, client_id: &str, client_secret: &str) -> TokenExchanger {
		TokenExchanger::new(client_id, client_secret).with_base_url(base_url)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;

	pub use crate::error::{BoxError, Error, Result};
}

pub use reqwest;
pub use url;
// CLI-only dependency.
use clap as _;
#[cfg(test)] use {color_eyre as _, httpmock as _, notion_oauth_handler as _};
