//! Command dispatch.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use warden_kratos::{KratosClient, KratosSessionValidator};

use crate::cli::{Cli, Command, ConfigAction, IdentityAction, SessionAction};
use crate::config::WardenConfig;
use crate::{Error, Result, serve};

/// Run a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = WardenConfig::load(cli.config.as_deref())?;
    config.apply(&cli.overrides());

    match cli.command {
        Command::Config { action } => handle_config(cli.config.as_deref(), &config, action),
        Command::Whoami { token } => {
            let validator = KratosSessionValidator::new(KratosClient::new(&config.kratos)?);
            let user = validator.validate_token(&token).await?;
            print_json(&user)
        }
        Command::Identity { action } => {
            let client = KratosClient::new(&config.kratos)?;
            handle_identity(&client, action).await
        }
        Command::Sessions { action } => {
            let client = KratosClient::new(&config.kratos)?;
            handle_sessions(&client, action).await
        }
        Command::Serve { .. } => {
            let validator = KratosSessionValidator::new(KratosClient::new(&config.kratos)?);
            if !config.auth.enabled {
                tracing::warn!(
                    "Authentication is disabled; requests pass through unauthenticated"
                );
            }
            let app = serve::router(Arc::new(validator), config.auth.clone());
            serve::run(&config.server.bind, app).await
        }
    }
}

async fn handle_identity(client: &KratosClient, action: IdentityAction) -> Result<()> {
    match action {
        IdentityAction::Get { id } => print_json(&client.get_user(&id).await?),
        IdentityAction::Update { id, traits } => {
            let traits = parse_traits(&traits)?;
            let user = client.update_user(&id, &traits).await?;
            tracing::info!("Updated traits of identity {id}");
            print_json(&user)
        }
        IdentityAction::Delete { id } => {
            client.delete_identity(&id).await?;
            tracing::info!("Deleted identity {id}");
            Ok(())
        }
    }
}

async fn handle_sessions(client: &KratosClient, action: SessionAction) -> Result<()> {
    match action {
        SessionAction::List { identity_id } => {
            print_json(&client.list_sessions(&identity_id).await?)
        }
        SessionAction::Revoke { session_id } => {
            client.revoke_session(&session_id).await?;
            tracing::info!("Revoked session {session_id}");
            Ok(())
        }
    }
}

fn handle_config(
    explicit: Option<&Path>,
    config: &WardenConfig,
    action: ConfigAction,
) -> Result<()> {
    match action {
        ConfigAction::Path => match WardenConfig::resolve_path(explicit) {
            Some(path) => {
                println!("{}", path.display());
                if !path.exists() {
                    eprintln!("(file does not exist; built-in defaults are in effect)");
                }
                Ok(())
            }
            None => Err(Error::config(
                "Could not determine config directory for this platform",
            )),
        },
        ConfigAction::Show => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

/// Parse `--traits`; must be a JSON object since it replaces the whole bag.
fn parse_traits(raw: &str) -> Result<Value> {
    let traits: Value = serde_json::from_str(raw)?;
    if !traits.is_object() {
        return Err(Error::InvalidInput(
            "--traits must be a JSON object".to_string(),
        ));
    }
    Ok(traits)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
