use clap::Parser;
use ideaspark::cli::handlers;
use ideaspark::cli::Cli;
use ideaspark::cli::Commands;
use ideaspark::config::AppConfig;
use ideaspark::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load_from(cli.config.as_deref())?;

    // Initialize logging: file + console for the server, console only for one-shots
    if cli.verbose {
        ideaspark::logging::init_logging_with_level("debug")?;
    } else if matches!(cli.command, Commands::Serve { .. }) {
        ideaspark::logging::init_logging_with_config(Some(&config))?;
    } else {
        ideaspark::logging::init_simple_logging()?;
    }
    info!("Configuration loaded successfully");

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_cors,
        } => {
            handlers::handle_serve(&config, host, port, no_cors).await?;
        }
        Commands::Ideas { topic, raw } => {
            handlers::handle_ideas(&config, &topic.join(" "), raw).await?;
        }
        Commands::Plan { topic } => {
            handlers::handle_plan(&config, &topic.join(" ")).await?;
        }
        Commands::Similar { query, top_k } => {
            handlers::handle_similar(&config, &query.join(" "), top_k)?;
        }
        Commands::Topic { text } => {
            handlers::handle_topic(&config, &text.join(" ")).await?;
        }
        Commands::Refine { message } => {
            handlers::handle_refine(&config, &message.join(" ")).await?;
        }
        Commands::Check => {
            handlers::handle_check(&config)?;
        }
    }

    Ok(())
}
