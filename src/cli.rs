use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{
    CompletionConfig, ServiceConfig, UiConfig, DEFAULT_API_BASE, DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};

#[derive(Debug, Parser)]
#[command(name = "astrolens", version, about = "Astronomy concepts explained at three levels, with a drawing")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the explain API
    Serve(ServeArgs),
    /// Ask a running service about one concept
    Ask(AskArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, env = "ASTROLENS_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "ASTROLENS_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Allowed CORS origin; repeat for several. None means any origin.
    #[arg(long = "cors-origin")]
    pub cors_origins: Vec<String>,

    #[arg(long, env = "ASTROLENS_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    #[arg(long, env = "OPENAI_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// File holding a replacement system prompt
    #[arg(long)]
    pub system_prompt: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct AskArgs {
    pub concept: String,

    /// Preferred image source passed through to the model
    #[arg(long)]
    pub image_source: Option<String>,

    #[arg(long, env = "ASTROLENS_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Where the visualization PNG is written
    #[arg(long, default_value = "astrolens.png")]
    pub out: PathBuf,

    #[arg(long, default_value_t = 640)]
    pub width: u32,

    #[arg(long, default_value_t = 360)]
    pub height: u32,

    /// Also animate the visualization in an X11 window
    #[arg(long)]
    pub window: bool,
}

impl From<ServeArgs> for ServiceConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            cors_origins: args.cors_origins,
            completion: CompletionConfig {
                api_base: args.api_base,
                model: args.model,
                temperature: args.temperature,
                max_tokens: args.max_tokens,
            },
            system_prompt_path: args.system_prompt,
        }
    }
}

impl From<&AskArgs> for UiConfig {
    fn from(args: &AskArgs) -> Self {
        Self {
            endpoint: args.endpoint.clone(),
            image_source: args.image_source.clone(),
            canvas_width: args.width,
            canvas_height: args.height,
            output: args.out.clone(),
            window: args.window,
        }
    }
}
