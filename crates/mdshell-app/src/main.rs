mod boot;
mod cli;

use std::path::Path;

use mdshell_config::MdshellConfig;
use tracing_subscriber::EnvFilter;

/// Turn `--log-level` into a filter directive. Bare level names apply to the
/// mdshell crates; anything else is taken as a directive.
fn log_directive(cli_level: Option<&str>, config: &MdshellConfig) -> String {
    match cli_level {
        Some(level @ ("trace" | "debug" | "info" | "warn" | "error")) => format!("mdshell={level}"),
        Some(directive) => directive.to_string(),
        None => config.logging.level.directive().to_string(),
    }
}

fn load_config(path: Option<&str>) -> mdshell_common::Result<MdshellConfig> {
    match path {
        Some(path) => {
            let config = mdshell_config::load_from_path(Path::new(path))?;
            mdshell_config::validation::validate(&config)?;
            Ok(config)
        }
        None => Ok(mdshell_config::load_config()?),
    }
}

fn build_runtime() -> mdshell_common::Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

fn main() {
    let args = cli::parse();

    // Config is read before logging so its level can apply; its errors are reported after.
    let loaded = load_config(args.config.as_deref());
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let directive = log_directive(args.log_level.as_deref(), &config);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| "mdshell=info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("mdshell-preload v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {path}");
    }
    match &loaded {
        Ok(_) => tracing::info!(
            "Config loaded (isolation: {})",
            config.bridge.context_isolation
        ),
        Err(e) => tracing::warn!("Config load failed, using defaults: {e}"),
    }

    if let Err(e) = mdshell_platform::ensure_dirs() {
        tracing::warn!("Failed to create directories: {e}");
    }

    let isolation_active = config.bridge.context_isolation && !args.no_isolation;

    let runtime = match build_runtime() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {e}");
            std::process::exit(1);
        }
    };

    let summary = runtime.block_on(boot::run(&config, isolation_active));
    tracing::info!(
        mode = %summary.exposure.mode,
        exposed = summary.exposure.exposed.len(),
        failed = summary.exposure.failed.len(),
        delivered = summary.delivered,
        routed = summary.routed.len(),
        "Bridge ready"
    );

    if !summary.exposure.is_complete() {
        std::process::exit(2);
    }
    tracing::info!("Shutdown complete");
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdshell_common::{ConfigError, MdshellError};

    #[test]
    fn bare_level_targets_mdshell_crates() {
        let config = MdshellConfig::default();
        assert_eq!(log_directive(Some("debug"), &config), "mdshell=debug");
        assert_eq!(
            log_directive(Some("mdshell_bridge=trace"), &config),
            "mdshell_bridge=trace"
        );
        assert_eq!(log_directive(None, &config), "mdshell=info");
    }

    #[test]
    fn missing_override_file_is_an_error() {
        let dir = std::env::temp_dir().join("mdshell-app-missing-config");
        let path = dir.join("nope.toml");
        assert!(matches!(
            load_config(path.to_str()),
            Err(MdshellError::Config(ConfigError::FileNotFound(_)))
        ));
    }
}
