//! Process startup shared by the vecrag binaries
//!
//! The environment is written here, before logging or the async runtime
//! spawn any thread.

use tokio::runtime::Runtime;

use crate::cli::commands::GlobalArgs;
use crate::proxy::ProxySettings;
use crate::AppConfig;
use crate::Result;

/// Load configuration and export the model host settings.
///
/// Must be called while the process is single-threaded.
pub fn prepare_environment(global: &GlobalArgs) -> Result<AppConfig> {
    let config = AppConfig::load_from(global.config.as_deref())?;
    ProxySettings::from_service_key(&config.gen_ai_hub)?.export_env();
    Ok(config)
}

/// Multi-threaded runtime for the command
pub fn build_runtime() -> Result<Runtime> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    Ok(runtime)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::proxy::ENV_BASE_URL;
    use crate::proxy::ENV_RESOURCE_GROUP;

    #[test]
    fn test_prepare_environment_exports_settings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[database]
host = "localhost"
port = 5432
user = "postgres"
password = "postgres"

[gen_ai_hub]
url = "https://tenant.authentication.example.com"
clientid = "sb-client"
clientsecret = "client-secret"
appname = "startup!b1"

[gen_ai_hub.serviceurls]
AI_API_URL = "https://api.ai.example.com"
"#,
        )
        .unwrap();

        let global = GlobalArgs {
            verbose: false,
            config: Some(file.path().to_path_buf()),
        };
        let config = prepare_environment(&global).unwrap();

        assert_eq!(config.gen_ai_hub.app_name, "startup!b1");
        assert!(std::env::var(ENV_RESOURCE_GROUP).is_ok());
        assert!(std::env::var(ENV_BASE_URL).is_ok());
    }

    #[test]
    fn test_missing_config_fails_before_export() {
        let global = GlobalArgs {
            verbose: false,
            config: Some("does/not/exist.toml".into()),
        };
        assert!(prepare_environment(&global).is_err());
    }

    #[test]
    fn test_build_runtime_runs_futures() {
        let runtime = build_runtime().unwrap();
        assert_eq!(runtime.block_on(async { 2 + 2 }), 4);
    }
}
