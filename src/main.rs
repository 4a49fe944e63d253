use clap::Parser;

use mmchat::app::Application;
use mmchat::cli::Args;
use mmchat::client::ChatClient;
use mmchat::commands::create_command_registry;
use mmchat::config::Config;
use mmchat::error::ChatError;
use mmchat::history::HistoryStore;
use mmchat::models::ModelRegistry;
use mmchat::providers::openrouter::OpenRouterBackend;

#[tokio::main]
async fn main() -> Result<(), ChatError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::load()?;
    let api_key = config.resolve_api_key()?;

    let registry = ModelRegistry::new();
    let store = HistoryStore::open(Config::history_path());

    let backend = match &config.base_url {
        Some(base_url) => OpenRouterBackend::with_endpoint(base_url.clone(), api_key),
        None => OpenRouterBackend::new(api_key),
    };

    let mut client = ChatClient::new(registry, store, Box::new(backend));

    // CLI flag wins over the configured default; unknown ids fall back to
    // the registry default with a notice.
    if let Some(model) = args.model.clone().or_else(|| config.default_model.clone()) {
        if let Err(err) = client.select_model(&model) {
            eprintln!("{}", err);
        }
    }

    let command_dispatcher = create_command_registry();
    let mut app = Application::new(args, client, command_dispatcher)?;
    app.run().await
}
