//! Explicit name → factory tables for consumer and renderer selection.
//!
//! Implementations register under a name at process startup and configuration selects one by
//! name. There is no reflective plugin discovery; a name that was never registered is a
//! configuration error.

// self
use crate::{
	_prelude::*,
	consumer::{DebugConsumer, OAuthConsumer},
	error::ConfigError,
	respond::{DebugRenderer, EchoRenderer, PlainRenderer, ResponseRenderer},
	token::RedirectInfo,
};

/// Free-form `[custom]` settings table handed to consumer factories.
pub type CustomSettings = BTreeMap<String, String>;
/// Object-safe consumer type stored in the registry.
pub type DynConsumer = dyn OAuthConsumer<State = RedirectInfo>;
/// Factory building a consumer singleton from the custom settings table.
pub type ConsumerFactory = fn(&CustomSettings) -> Arc<DynConsumer>;
/// Factory building a renderer singleton.
pub type RendererFactory = fn() -> Arc<dyn ResponseRenderer>;

/// Registration table of named consumer implementations.
#[derive(Clone, Debug)]
pub struct ConsumerRegistry {
	entries: HashMap<String, ConsumerFactory>,
}
impl ConsumerRegistry {
	/// Creates a registry pre-seeded with the built-in `debug` consumer.
	pub fn with_builtins() -> Self {
		let mut registry = Self { entries: HashMap::new() };

		registry.register("debug", |_| Arc::new(DebugConsumer));

		registry
	}

	/// Registers (or replaces) a named consumer factory.
	pub fn register(&mut self, name: impl Into<String>, factory: ConsumerFactory) {
		self.entries.insert(name.into(), factory);
	}

	/// Builds the consumer registered under `name`.
	pub fn build(&self, name: &str, settings: &CustomSettings) -> Result<Arc<DynConsumer>> {
		self.entries
			.get(name)
			.map(|factory| factory(settings))
			.ok_or_else(|| ConfigError::UnknownConsumer { name: name.to_owned() }.into())
	}

	/// Lists registered names in sorted order.
	pub fn names(&self) -> Vec<&str> {
		let mut names = self.entries.keys().map(String::as_str).collect::<Vec<_>>();

		names.sort_unstable();

		names
	}
}
impl Default for ConsumerRegistry {
	fn default() -> Self {
		Self::with_builtins()
	}
}

/// Registration table of named renderer implementations.
#[derive(Clone, Debug)]
pub struct RendererRegistry {
	entries: HashMap<String, RendererFactory>,
}
impl RendererRegistry {
	/// Creates a registry pre-seeded with the built-in `plain`, `echo`, and `debug` renderers.
	pub fn with_builtins() -> Self {
		let mut registry = Self { entries: HashMap::new() };

		registry.register("plain", || Arc::new(PlainRenderer));
		registry.register("echo", || Arc::new(EchoRenderer));
		registry.register("debug", || Arc::new(DebugRenderer));

		registry
	}

	/// Registers (or replaces) a named renderer factory.
	pub fn register(&mut self, name: impl Into<String>, factory: RendererFactory) {
		self.entries.insert(name.into(), factory);
	}

	/// Builds the renderer registered under `name`.
	pub fn build(&self, name: &str) -> Result<Arc<dyn ResponseRenderer>> {
		self.entries
			.get(name)
			.map(|factory| factory())
			.ok_or_else(|| ConfigError::UnknownRenderer { name: name.to_owned() }.into())
	}

	/// Lists registered names in sorted order.
	pub fn names(&self) -> Vec<&str> {
		let mut names = self.entries.keys().map(String::as_str).collect::<Vec<_>>();

		names.sort_unstable();

		names
	}
}
impl Default for RendererRegistry {
	fn default() -> Self {
		Self::with_builtins()
	}
}
