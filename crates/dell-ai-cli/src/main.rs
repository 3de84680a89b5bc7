mod args;
mod config;
mod output;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use dell_ai_client::{
    resolver, ClientConfig, CredentialProvider, HubClient, StaticCredentials, TokenFile,
};
use dell_ai_common::telemetry::init_tracing;
use dell_ai_common::HubError;

use crate::args::{
    AppCommand, Args, AuthCommand, Command, ModelCommand, PlatformCommand, SnippetCommand,
};
use crate::config::{build_user_config, positive};
use crate::output::{
    print_app_detail, print_compat, print_ids, print_json, print_model_detail,
    print_platform_detail, print_user_info,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(if args.verbose { "debug" } else { "warn" });

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let store = Arc::new(TokenFile::from_env()?);
    tracing::debug!(
        api_url = %args.api_url,
        token_path = %store.path().display(),
        "starting dell-ai"
    );
    let config = ClientConfig::default()
        .with_base_url(args.api_url)
        .with_identity_url(args.identity_url)
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let client = HubClient::new(config, credentials(args.token.clone(), store.clone()))?;

    match args.command {
        Command::Auth { subcommand } => match subcommand {
            AuthCommand::Login => {
                let token = match args.token {
                    Some(t) => t,
                    None => dialoguer::Password::new()
                        .with_prompt("Enter your Hugging Face token")
                        .interact()?,
                };
                store.save_token(&token)?;
                println!("Successfully logged in");
                if store.from_environment() {
                    println!("Note: HF_TOKEN is set and takes precedence over the saved token");
                }
            }
            AuthCommand::Status => {
                if client.credentials().token()?.is_none() {
                    println!("Not logged in");
                    return Ok(());
                }
                match client.get_user_info().await {
                    Ok(info) => print_user_info(&info)?,
                    Err(HubError::Authentication(_)) => {
                        println!("Token found but validation failed. Please login again.");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            AuthCommand::Logout => {
                store.clear()?;
                println!("Successfully logged out");
                if store.from_environment() {
                    println!("Note: HF_TOKEN is still set in the environment");
                }
            }
        },
        Command::Models { subcommand } => match subcommand {
            ModelCommand::List => {
                let models = client.list_models().await?;
                print_ids("Dell AI Models", &models, "No models found.");
            }
            ModelCommand::Show { model_id, json } => {
                let model = client.get_model(&model_id).await?;
                if json {
                    print_json(&model)?;
                } else {
                    print_model_detail(&model);
                }
            }
            ModelCommand::Compat { model_id, sku_id } => {
                let configs = client.check_compatibility(&model_id, &sku_id).await?;
                print_compat(&model_id, &sku_id, &configs);
            }
        },
        Command::Platforms { subcommand } => match subcommand {
            PlatformCommand::List => {
                let platforms = client.list_platforms().await?;
                print_ids("Dell AI Platforms", &platforms, "No platforms found.");
            }
            PlatformCommand::Show { sku_id, json } => {
                let platform = client.get_platform(&sku_id).await?;
                if json {
                    print_json(&platform)?;
                } else {
                    print_platform_detail(&platform);
                }
            }
        },
        Command::Apps { subcommand } => match subcommand {
            AppCommand::List => {
                let apps = client.list_apps().await?;
                print_ids("Dell AI Applications", &apps, "No applications found.");
            }
            AppCommand::Show { app_id, json } => {
                let app = client.get_app(&app_id).await?;
                if json {
                    print_json(&app)?;
                } else {
                    print_app_detail(&app);
                }
            }
        },
        Command::Snippets { subcommand } => match subcommand {
            SnippetCommand::Get {
                model_id,
                sku_id,
                container,
                gpus,
                replicas,
            } => {
                let gpus = positive("number of GPUs", gpus)?;
                let replicas = positive("number of replicas", replicas)?;
                let snippet = client
                    .get_deployment_snippet(&model_id, &sku_id, &container, gpus, replicas)
                    .await?;
                println!("{snippet}");
            }
            SnippetCommand::App { app_id, set } => {
                let app = client.get_app(&app_id).await?;
                let entries = build_user_config(&app, &set)?;
                let snippet = resolver::render_app_snippet(&app.id, &app.components, &entries)?;
                println!("{snippet}");
            }
        },
    }

    Ok(())
}

/// An explicit `--token` wins over the token file for this invocation.
fn credentials(token: Option<String>, store: Arc<TokenFile>) -> Arc<dyn CredentialProvider> {
    match token {
        Some(t) => Arc::new(StaticCredentials::new(Some(t))),
        None => store,
    }
}

/// Distinct status per error kind; 2 is left to clap for usage errors.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<HubError>() {
        Some(HubError::Api { .. }) | None => 1,
        Some(HubError::Authentication(_)) => 3,
        Some(HubError::ResourceNotFound { .. }) => 4,
        Some(HubError::ModelPlatformIncompatible { .. }) => 5,
        Some(HubError::InvalidGpuCount { .. }) => 6,
        Some(HubError::InvalidContainerType { .. }) => 7,
        Some(HubError::InvalidConfigValue { .. }) => 8,
        Some(HubError::MissingRequiredConfig { .. }) => 9,
        Some(HubError::Validation(_)) => 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = vec![
            HubError::api("down"),
            HubError::auth("no token"),
            HubError::not_found("models", "x"),
            HubError::ModelPlatformIncompatible {
                model_id: "m".into(),
                platform_id: "p".into(),
            },
            HubError::InvalidGpuCount {
                model_id: "m".into(),
                platform_id: "p".into(),
                requested: 3,
                valid: vec![4],
            },
            HubError::InvalidContainerType { value: "podman".into() },
            HubError::InvalidConfigValue {
                path: "a".into(),
                expected: "number".into(),
            },
            HubError::MissingRequiredConfig {
                component: "main".into(),
                parameter: "Model".into(),
            },
            HubError::Validation("bad".into()),
        ];
        let mut codes: Vec<u8> = errors
            .into_iter()
            .map(|e| exit_code(&anyhow::Error::from(e)))
            .collect();
        assert!(codes.iter().all(|c| *c != 0 && *c != 2));
        let n = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), n);
    }

    #[test]
    fn test_explicit_token_overrides_store() {
        let store = Arc::new(TokenFile::at("/nonexistent/dell-ai/token"));
        let creds = credentials(Some("hf_flag".to_string()), store.clone());
        assert_eq!(creds.token().unwrap().as_deref(), Some("hf_flag"));

        let creds = credentials(None, store);
        assert_eq!(creds.token().unwrap(), None);
    }

    #[test]
    fn test_non_hub_error_is_generic_failure() {
        assert_eq!(exit_code(&anyhow::anyhow!("stdout closed")), 1);
    }
}
