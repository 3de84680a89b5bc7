use clap::{ArgAction, Parser, Subcommand};

use dell_ai_client::config::{DEFAULT_API_URL, DEFAULT_IDENTITY_URL, DEFAULT_TIMEOUT_SECS};

#[derive(Debug, Parser)]
#[command(name = "dell-ai")]
#[command(about = "CLI for interacting with the Dell Enterprise Hub", long_about = None)]
#[command(version, disable_version_flag = true)]
pub struct Args {
    /// Hub API base URL
    #[arg(long, global = true, env = "DELL_AI_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Identity provider endpoint used by `auth status`
    #[arg(long, global = true, env = "DELL_AI_IDENTITY_URL", default_value = DEFAULT_IDENTITY_URL)]
    pub identity_url: String,

    /// Per-request timeout in seconds
    #[arg(
        long,
        global = true,
        env = "DELL_AI_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub timeout_secs: u64,

    /// Hugging Face token for this invocation; `auth login` stores it
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Log requests to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Show the application version and exit
    #[arg(short = 'v', long, action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Authentication commands
    Auth {
        #[command(subcommand)]
        subcommand: AuthCommand,
    },
    /// Model commands
    Models {
        #[command(subcommand)]
        subcommand: ModelCommand,
    },
    /// Platform commands
    Platforms {
        #[command(subcommand)]
        subcommand: PlatformCommand,
    },
    /// Application commands
    Apps {
        #[command(subcommand)]
        subcommand: AppCommand,
    },
    /// Deployment snippet commands
    Snippets {
        #[command(subcommand)]
        subcommand: SnippetCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Log in with a Hugging Face token, taken from `--token` or prompted for
    Login,
    /// Show the current authentication status
    Status,
    /// Remove the stored token
    Logout,
}

#[derive(Debug, Subcommand)]
pub enum ModelCommand {
    /// List all available models
    List,
    /// Show details for a model
    Show {
        /// Model ID, e.g. "meta-llama/Llama-3.1-8B-Instruct"
        model_id: String,
        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the configurations a model supports on a platform
    Compat {
        model_id: String,
        sku_id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum PlatformCommand {
    /// List all available platforms
    List,
    /// Show details for a platform
    Show {
        sku_id: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum AppCommand {
    /// List all available applications
    List,
    /// Show details for an application
    Show {
        app_id: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum SnippetCommand {
    /// Render a deployment snippet for a model on a platform
    Get {
        model_id: String,
        sku_id: String,
        /// Container type (docker or kubernetes)
        #[arg(long)]
        container: String,
        /// Number of GPUs to use
        #[arg(long, allow_negative_numbers = true)]
        gpus: i64,
        /// Number of replicas to deploy
        #[arg(long, allow_negative_numbers = true)]
        replicas: i64,
    },
    /// Render a helm install command for an application
    App {
        app_id: String,
        /// Override a chart value (repeatable)
        #[arg(long = "set", value_name = "PATH=VALUE")]
        set: Vec<String>,
    },
}
