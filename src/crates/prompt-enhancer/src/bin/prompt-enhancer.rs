//! prompt-enhancer CLI - improve prompts with a local Ollama model
//!
//! Main entry point for the prompt-enhancer command-line tool.

use clap::{Parser, Subcommand};
use colored::Colorize;
use prompt_enhancer::cli::{self, enhance::EnhanceOptions, CliContext, Overrides};
use prompt_enhancer::config::{ConfigLoader, LoggingConfig};
use prompt_enhancer::{logging, version, EnhancerError};

#[derive(Parser)]
#[command(name = "prompt-enhancer")]
#[command(about = "Improve prompts with a local Ollama model", long_about = None)]
#[command(version = version::VERSION, long_version = version::LONG_VERSION)]
struct Cli {
    /// Ollama base URL or bare host[:port] (overrides server.base_url)
    #[arg(long, global = true, env = "OLLAMA_HOST")]
    base_url: Option<String>,

    /// Model to use (overrides model.default)
    #[arg(short, long, global = true, env = "PROMPT_ENHANCER_MODEL")]
    model: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List models available on the Ollama server
    Models,

    /// Show the pattern catalog
    Patterns,

    /// Show which pattern the selector picks for a prompt
    Choose {
        /// Prompt to classify
        prompt: String,
    },

    /// Enhance a prompt
    Enhance {
        /// Prompt to enhance
        prompt: String,
        /// Pattern to apply instead of choosing one automatically
        #[arg(short, long)]
        pattern: Option<String>,
        /// Template parameter, repeatable
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
        params: Vec<(String, String)>,
        /// Also generate a response from the enhanced prompt
        #[arg(short, long)]
        generate: bool,
    },

    /// Send a prompt to the model as is
    Generate {
        /// Prompt to send
        prompt: String,
    },

    /// Start an interactive session
    Interactive {
        /// Template parameter, repeatable
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },

    /// Print the effective configuration
    Config,

    /// Write a default user configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    cli::parse_param(raw).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    if let Err(err) = run(args).await {
        match err.downcast_ref::<EnhancerError>() {
            Some(e) => {
                eprintln!("{} {}", "✗".red().bold(), cli::render_error(e));
                std::process::exit(cli::exit_code(e));
            }
            None => return Err(err),
        }
    }

    Ok(())
}

async fn run(args: Cli) -> anyhow::Result<()> {
    if let Commands::Init { force } = args.command {
        logging::init_tracing(&LoggingConfig::default(), args.verbose)?;
        cli::config::handle_init(force)?;
        return Ok(());
    }

    let overrides = Overrides {
        base_url: args.base_url,
        model: args.model,
    };
    let loader = ConfigLoader::new();
    let config = cli::context::effective_config(&loader, &overrides).await?;
    logging::init_tracing(&config.logging, args.verbose)?;
    tracing::debug!(version = %version::full_version(), "Starting");

    match args.command {
        Commands::Patterns => cli::catalog::handle_patterns()?,
        Commands::Config => cli::config::handle_show(&loader, &config)?,
        command => {
            let context = CliContext::from_config(config)?;
            match command {
                Commands::Models => cli::catalog::handle_models(&context).await?,
                Commands::Choose { prompt } => cli::enhance::handle_choose(&context, &prompt).await?,
                Commands::Enhance {
                    prompt,
                    pattern,
                    params,
                    generate,
                } => {
                    let options = EnhanceOptions {
                        pattern,
                        params: cli::collect_params(params),
                        generate,
                    };
                    cli::enhance::handle_enhance(&context, &prompt, options).await?
                }
                Commands::Generate { prompt } => cli::enhance::handle_generate(&context, &prompt).await?,
                Commands::Interactive { params } => {
                    cli::interactive::handle_interactive(&context, cli::collect_params(params)).await?
                }
                Commands::Patterns | Commands::Config | Commands::Init { .. } => {}
            }
        }
    }

    Ok(())
}
