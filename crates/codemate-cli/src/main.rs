//! codemate CLI — code completion and generation from the terminal.
//!
//! Usage:
//!   codemate complete <file> --cursor N   — Suggest completions at an offset
//!   codemate generate "<description>"     — Generate code from a description
//!   codemate prompt "<template>"          — Send a raw template with variables
//!   codemate validate                     — Check the configured credentials
//!   codemate onboard                      — Create a default configuration
//!   codemate status                       — Show current configuration

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use codemate_core::client::create_client;
use codemate_core::config::Config;
use codemate_core::provider::transport::ReqwestTransport;
use codemate_core::provider::ProviderAdapter;
use codemate_core::types::{CodeContext, CompletionRequest, GenerationRequest};

#[derive(Parser)]
#[command(
    name = "codemate",
    version,
    about = "Provider-agnostic LLM code completion and generation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest completions for a file at a byte offset
    Complete {
        /// File to complete
        file: PathBuf,

        /// Byte offset of the cursor into the file
        #[arg(short, long)]
        cursor: usize,

        /// Language label (detected from the extension when omitted)
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Generate code from a natural-language description
    Generate {
        /// What to generate
        description: String,

        /// Target language
        #[arg(short, long, default_value = "typescript")]
        language: String,
    },

    /// Send a raw prompt template and print the raw response body
    Prompt {
        /// Template text with {{name}} placeholders
        template: String,

        /// Variable bindings as a JSON object
        #[arg(short, long)]
        vars: Option<String>,
    },

    /// Check that the configured API key is accepted by the provider
    Validate,

    /// Create or reset the default configuration
    Onboard,

    /// Show configuration status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Complete {
            file,
            cursor,
            language,
        } => cmd_complete(&file, cursor, language.as_deref()).await?,
        Commands::Generate {
            description,
            language,
        } => cmd_generate(&description, &language).await?,
        Commands::Prompt { template, vars } => cmd_prompt(&template, vars.as_deref()).await?,
        Commands::Validate => cmd_validate().await?,
        Commands::Onboard => cmd_onboard()?,
        Commands::Status => cmd_status()?,
    }

    Ok(())
}

// ── Shared Setup ────────────────────────────────────────────────────

/// Load config, validate it, and build the configured provider client.
fn setup_client() -> Result<Box<dyn ProviderAdapter>> {
    let config = Config::load()?;
    if let Err(errors) = config.validate() {
        eprintln!("Configuration errors:");
        for e in &errors {
            eprintln!("  - {e}");
        }
        anyhow::bail!("Fix the above {} error(s) in config.json", errors.len());
    }

    let client = create_client(&config.llm, Arc::new(ReqwestTransport::new()))?;
    Ok(client)
}

/// A token that fires on Ctrl-C, so in-flight calls abort cleanly.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let child = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            child.cancel();
        }
    });
    cancel
}

// ── Commands ────────────────────────────────────────────────────────

async fn cmd_complete(file: &Path, cursor: usize, language: Option<&str>) -> Result<()> {
    let source = std::fs::read_to_string(file)?;
    let language = language
        .map(String::from)
        .unwrap_or_else(|| detect_language(file).to_string());

    let client = setup_client()?;
    let request = CompletionRequest {
        source,
        cursor,
        language,
        context: CodeContext::default(),
    };

    let response = client.complete(&cancel_on_ctrl_c(), &request).await?;
    if let Some(error) = &response.error {
        eprintln!("Completion failed: {error}");
        return Ok(());
    }

    println!("Confidence: {:.2}", response.confidence);
    for (i, suggestion) in response.suggestions.iter().enumerate() {
        println!("{}. {suggestion}", i + 1);
    }
    Ok(())
}

async fn cmd_generate(description: &str, language: &str) -> Result<()> {
    let client = setup_client()?;
    let request = GenerationRequest {
        prompt: description.into(),
        language: language.into(),
        context: CodeContext::default(),
    };

    let response = client.generate(&cancel_on_ctrl_c(), &request).await?;
    if let Some(error) = &response.error {
        eprintln!("Generation failed: {error}");
        return Ok(());
    }

    println!("{}", response.code);
    Ok(())
}

async fn cmd_prompt(template: &str, vars: Option<&str>) -> Result<()> {
    let client = setup_client()?;
    let body = client
        .raw_prompt(&cancel_on_ctrl_c(), template, vars.unwrap_or(""))
        .await?;

    // Pretty-print when the body is JSON, pass through otherwise.
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => println!("{body}"),
    }
    Ok(())
}

async fn cmd_validate() -> Result<()> {
    let client = setup_client()?;
    match client.validate_credentials(&cancel_on_ctrl_c()).await {
        Ok(()) => println!("Credentials OK ({})", client.name()),
        Err(e) => {
            eprintln!("Credential check failed: {e}");
            std::process::exit(1);
        }
    }
    Ok(())
}

fn cmd_onboard() -> Result<()> {
    let path = Config::write_default_template()?;
    println!("Wrote default config to {}", path.display());
    println!("Edit it to add your API key, then run `codemate validate`.");
    Ok(())
}

fn cmd_status() -> Result<()> {
    let path = Config::default_path();
    if !path.exists() {
        println!("No config at {} — run `codemate onboard`.", path.display());
        return Ok(());
    }

    let config = Config::load()?;
    println!("Config:      {}", path.display());
    println!("Provider:    {}", config.llm.provider);
    println!(
        "API key:     {}",
        if config.llm.api_key.is_empty() {
            "(not set)"
        } else {
            "(set)"
        }
    );
    println!(
        "Model:       {}",
        if config.llm.model.is_empty() {
            "(provider default)"
        } else {
            &config.llm.model
        }
    );
    match config.validate() {
        Ok(()) => println!("Status:      ready"),
        Err(errors) => {
            println!("Status:      {} problem(s)", errors.len());
            for e in &errors {
                println!("  - {e}");
            }
        }
    }
    Ok(())
}

/// Map a file extension to a language label for the prompt preamble.
fn detect_language(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "rs" => "rust",
        "ts" | "tsx" => "typescript",
        "js" | "jsx" | "mjs" => "javascript",
        "py" => "python",
        "go" => "go",
        "java" => "java",
        "rb" => "ruby",
        "c" | "h" => "c",
        "cpp" | "cc" | "hpp" => "cpp",
        "cs" => "csharp",
        "php" => "php",
        "swift" => "swift",
        "kt" => "kotlin",
        _ => "plaintext",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_language_coverage() {
        assert_eq!(detect_language(Path::new("main.rs")), "rust");
        assert_eq!(detect_language(Path::new("app.tsx")), "typescript");
        assert_eq!(detect_language(Path::new("script")), "plaintext");
    }
}
