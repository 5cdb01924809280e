use std::path::Path;

use anyhow::{Context, Result};

use govern_client::config::GovernAppConfig;

/// Read the governance configuration, using the mainnet deployment when no file is given
pub fn load_app_config(path: Option<&Path>) -> Result<GovernAppConfig> {
    let path = match path {
        Some(path) => path,
        None => return Ok(GovernAppConfig::default()),
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;

    GovernAppConfig::from_json(&json)
        .with_context(|| format!("parsing config file {}", path.display()))
}

/// The first endpoint named in the configuration
pub fn configured_rpc_url(config: &GovernAppConfig) -> Option<String> {
    config.networks.iter().find_map(|info| info.rpc_url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    use govern_client::NetworkKind;

    #[test]
    fn missing_path_uses_default() {
        let config = load_app_config(None).unwrap();

        assert_eq!(config, GovernAppConfig::default());
        assert_eq!(configured_rpc_url(&config), None);
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("govctl-config-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{
                "networks": [
                    {
                        "network": "localnet",
                        "governance": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
                        "rpcUrl": "http://127.0.0.1:8545"
                    }
                ],
                "blockTimeSecs": 2
            }"#,
        )
        .unwrap();

        let config = load_app_config(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.block_time_secs, 2);
        assert!(config.network(NetworkKind::Localnet).is_some());
        assert_eq!(
            configured_rpc_url(&config).as_deref(),
            Some("http://127.0.0.1:8545")
        );
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let error = load_app_config(Some(Path::new("/nonexistent/govctl.json"))).unwrap_err();
        assert!(error.to_string().contains("reading config file"));
    }
}
