//! Command-line tool: the redirect-handling server, the mock provider, and offline helpers for
//! inspecting registered implementations and rendered responses.

// std
use std::{path::PathBuf, process::ExitCode};
// crates.io
use clap::{Parser, Subcommand};
// self
use notion_oauth_handler::{
	config::{AppConfig, MainSection, NotionSection, ServerSection},
	exchange::TokenExchanger,
	handler::OAuthHandler,
	mock::make_mock_router,
	obs,
	registry::{ConsumerRegistry, DynConsumer, RendererRegistry},
	respond::RenderedResponse,
	server::{RouterOptions, make_router, serve},
	token::TokenInfo,
};

#[derive(Debug, Parser)]
#[command(name = "notion-oauth-handler", about = "Notion OAuth handler server", version)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Run the redirect-handling HTTP server.
	Serve {
		/// Load configuration from a TOML file; the remaining flags are ignored when set.
		#[arg(long)]
		config_file: Option<PathBuf>,
		/// Server host.
		#[arg(long, default_value = "0.0.0.0")]
		host: String,
		/// Server port.
		#[arg(long, default_value_t = 8000)]
		port: u16,
		/// Registered consumer name.
		#[arg(long, default_value = "debug")]
		consumer: String,
		/// Registered renderer name.
		#[arg(long, default_value = "plain")]
		renderer: String,
		/// Name of the env var holding the Notion client ID.
		#[arg(long, default_value = "NOTION_CLIENT_ID")]
		client_id_env: String,
		/// Name of the env var holding the Notion client secret.
		#[arg(long, default_value = "NOTION_CLIENT_SECRET")]
		client_secret_env: String,
		/// Base path for all endpoints.
		#[arg(long, default_value = "")]
		base_path: String,
		/// Path of the redirect endpoint.
		#[arg(long, default_value = "/auth_redirect")]
		redirect_path: String,
	},
	/// Run the mock Notion provider.
	Mock {
		/// Server host.
		#[arg(long, default_value = "0.0.0.0")]
		host: String,
		/// Server port.
		#[arg(long, default_value_t = 8001)]
		port: u16,
	},
	/// List registered consumer names.
	Consumers,
	/// List registered renderer names.
	Renderers,
	/// Render a server response offline through a named renderer.
	Response {
		/// Registered renderer name.
		#[arg(long, default_value = "plain")]
		renderer: String,
		#[command(subcommand)]
		command: ResponseCommand,
	},
}

#[derive(Debug, Subcommand)]
enum ResponseCommand {
	/// Render the successful-auth response for placeholder token values.
	Auth {
		/// access_token value.
		#[arg(long, default_value = "<access_token>")]
		access_token: String,
		/// workspace_id value.
		#[arg(long, default_value = "<workspace_id>")]
		workspace_id: String,
		/// workspace_name value.
		#[arg(long, default_value = "My Workspace")]
		workspace_name: String,
		/// workspace_icon value.
		#[arg(long, default_value = "workspace.icon")]
		workspace_icon: String,
		/// bot_id value.
		#[arg(long, default_value = "<bot_id>")]
		bot_id: String,
		/// owner value as a JSON object.
		#[arg(long, default_value = "{}")]
		owner: String,
	},
	/// Render the access-denied response.
	Error {
		/// error value.
		#[arg(long, default_value = "Error text")]
		error: String,
	},
}

#[tokio::main]
async fn main() -> ExitCode {
	obs::init_tracing();

	match run(Cli::parse()).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(error) => {
			eprintln!("{error}");

			ExitCode::FAILURE
		},
	}
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
	match cli.command {
		Command::Serve {
			config_file,
			host,
			port,
			consumer,
			renderer,
			client_id_env,
			client_secret_env,
			base_path,
			redirect_path,
		} => {
			let config = match config_file {
				Some(path) => AppConfig::from_file(path)?,
				None => AppConfig {
					main: MainSection { consumer, renderer },
					server: ServerSection {
						host,
						port,
						base_path,
						redirect_path,
						..ServerSection::default()
					},
					notion: NotionSection {
						client_id_env,
						client_secret_env,
						..NotionSection::default()
					},
					custom: Default::default(),
				},
			};
			let (client_id, client_secret) = config.notion.resolve_credentials()?;
			let consumer = ConsumerRegistry::with_builtins()
				.build(&config.main.consumer, &config.custom)?;
			let renderer = RendererRegistry::with_builtins().build(&config.main.renderer)?;
			let exchanger = TokenExchanger::new(client_id, client_secret)
				.with_base_url(&config.notion.base_url);
			let router = make_router(
				OAuthHandler::<DynConsumer>::new(consumer, exchanger),
				renderer,
				&RouterOptions::from(&config.server),
			);

			serve(router, &config.server.host, config.server.port).await?;
		},
		Command::Mock { host, port } => serve(make_mock_router(), &host, port).await?,
		Command::Consumers =>
			for name in ConsumerRegistry::with_builtins().names() {
				println!("{name}");
			},
		Command::Renderers =>
			for name in RendererRegistry::with_builtins().names() {
				println!("{name}");
			},
		Command::Response { renderer, command } => {
			let renderer = RendererRegistry::with_builtins().build(&renderer)?;
			let response = match command {
				ResponseCommand::Auth {
					access_token,
					workspace_id,
					workspace_name,
					workspace_icon,
					bot_id,
					owner,
				} => renderer.make_auth_response(&TokenInfo {
					access_token,
					workspace_id,
					workspace_name,
					workspace_icon,
					bot_id,
					owner: serde_json::from_str(&owner)?,
				}),
				ResponseCommand::Error { error } =>
					renderer.make_access_denied_response(&error),
			};

			print_response(&response);
		},
	}

	Ok(())
}

fn print_response(response: &RenderedResponse) {
	println!("Status: {}", response.status);
	println!("Headers:");
	println!("    content-type: {}", response.content_type);

	for (name, value) in &response.headers {
		println!("    {name}: {value}");
	}

	println!("Body:\n{}", response.body);
}
