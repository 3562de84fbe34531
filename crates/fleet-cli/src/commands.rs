use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use fleet_server::{FleetServer, ServerConfig};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => Ok(ServerConfig::default()),
    }
}

fn resolve_serve_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if args.no_postcode_check {
        config.postcode.enabled = false;
    }
    Ok(config)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = resolve_serve_config(&args)?;
    println!(
        "{} fleet server on {} (postcode check {})",
        "✓".green(),
        config.bind_addr.to_string().bold(),
        if config.postcode.enabled { "on".green() } else { "off".yellow() },
    );
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(FleetServer::new(config).serve())?;
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    print!("{}", config.to_toml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn flags_override_defaults() {
        let args = ServeArgs {
            config: None,
            bind: Some("0.0.0.0:9000".parse().unwrap()),
            no_postcode_check: true,
        };
        let config = resolve_serve_config(&args).unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert!(!config.postcode.enabled);
        assert_eq!(config.default_branch_capacity, 10);
    }

    #[test]
    fn missing_config_file_names_the_path() {
        let args = ServeArgs {
            config: Some(PathBuf::from("/nonexistent/fleet.toml")),
            bind: None,
            no_postcode_check: false,
        };
        let err = resolve_serve_config(&args).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/fleet.toml"));
    }
}
