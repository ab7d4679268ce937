//! Command handlers for the `ideaspark` binary

use std::sync::Arc;

use tracing::info;

use crate::api::serve_api;
use crate::cli::output::*;
use crate::dataset::Dataset;
use crate::llm::LlmService;
use crate::errors::IdeaSparkError;
use crate::rag::pipeline::require_text;
use crate::rag::IdeaService;
use crate::rag::RefineService;
use crate::AppConfig;
use crate::Result;

/// Load the dataset and connect the completion client
pub fn build_service(config: &AppConfig) -> Result<IdeaService> {
    let dataset = Arc::new(Dataset::load(
        config.dataset_path(),
        config.column_patterns(),
    )?);
    let llm = Arc::new(LlmService::new(config)?);
    Ok(IdeaService::new(dataset, llm))
}

pub async fn handle_serve(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
    no_cors: bool,
) -> Result<()> {
    let mut config = config.clone();
    if no_cors {
        config.server.enable_cors = false;
    }
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    println!("🚀 Starting IdeaSpark API Server");
    println!("===============================\n");
    println!("📍 Host: {host}");
    println!("🔌 Port: {port}");
    println!(
        "🌐 CORS: {}",
        if config.server.enable_cors {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    println!();

    serve_api(&config, host, port).await
}

pub async fn handle_ideas(config: &AppConfig, topic: &str, raw: bool) -> Result<()> {
    let topic = require_text(topic, "No topic provided")?;
    let service = build_service(config)?;
    let topic = if raw {
        topic.to_string()
    } else {
        service.extract_topic(topic).await
    };
    info!("Using topic: {}", topic);

    let ideas = service.generate_ideas(&topic).await?;
    print_generated(&format!("Project ideas for '{topic}'"), &ideas);
    Ok(())
}

pub async fn handle_plan(config: &AppConfig, topic: &str) -> Result<()> {
    let topic = require_text(topic, "No project provided")?;
    let service = build_service(config)?;
    let plan = service.generate_execution_plan(topic).await?;
    print_generated(&format!("Execution plan for '{topic}'"), &plan);
    Ok(())
}

pub fn handle_similar(config: &AppConfig, query: &str, top_k: usize) -> Result<()> {
    let dataset = Dataset::load(config.dataset_path(), config.column_patterns())?;
    let retriever = crate::rag::Retriever::new(Arc::new(dataset));
    print_search_results(query, &retriever.rank(query, top_k));
    Ok(())
}

pub async fn handle_topic(config: &AppConfig, text: &str) -> Result<()> {
    let text = require_text(text, "No text provided")?;
    let service = build_service(config)?;
    match service.try_extract_topic(text).await {
        Ok(topic) => println!("{topic}"),
        Err(e) => {
            println!("{text}");
            eprintln!("⚠️  Topic extraction failed, showing input unchanged: {e}");
        }
    }
    Ok(())
}

pub async fn handle_refine(config: &AppConfig, message: &str) -> Result<()> {
    let message = require_text(message, "No message provided")?;
    let refiner = RefineService::from_config(config)?.ok_or_else(|| {
        IdeaSparkError::ConfigError(
            "Add a [refine] section to the configuration to use refine".to_string(),
        )
    })?;

    let reply = refiner.refine(message).await?;
    if let Some(reasoning) = &reply.reasoning {
        println!("🤔 Reasoning\n\n{}\n", reasoning.trim());
    }
    println!("📝 Draft\n\n{}\n", reply.draft.trim());
    println!("✨ Reply\n\n{}", reply.reply);
    Ok(())
}

pub fn handle_check(config: &AppConfig) -> Result<()> {
    println!("🔍 Checking dataset...");

    match Dataset::load(config.dataset_path(), config.column_patterns()) {
        Ok(dataset) => {
            print_config_summary(config, dataset.len(), &dataset.categories());
            if config.llm_key().is_none() {
                println!("\n⚠️  No LLM key set in config or OPENAI_API_KEY");
            }
            println!("\n🎉 Configuration check completed successfully!");
            Ok(())
        }
        Err(e) => {
            println!("❌ Dataset error: {e}");
            println!("\n💡 To fix this:");
            println!("  1. Point [dataset].path at your CSV file");
            println!("  2. Make sure the header has title-like and description-like columns");
            println!("  3. Or declare custom header patterns under [dataset.columns]");
            Err(e)
        }
    }
}
