//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::blockchain::wallet::PRIVATE_KEY_ENV_VAR;
use crate::config::schema::{NetworkConfig, NetworksFile, SwapConfig};
use crate::config::validation::{validate_config, validate_network, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::path::PathBuf, std::io::Error),
    Parse(std::path::PathBuf, toml::de::Error),
    UnknownNetwork(String),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Cannot read '{}': {}", path.display(), e),
            ConfigError::Parse(path, e) => write!(f, "Malformed '{}': {}", path.display(), e),
            ConfigError::UnknownNetwork(name) => {
                write!(f, "Network '{}' not found in networks file", name)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate the settings file.
///
/// `SWAP_PRIVATE_KEY`, when set, replaces the file's private key.
pub fn load_config(path: &Path) -> Result<SwapConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
    let mut config = parse_config(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;

    apply_env_overrides(&mut config, std::env::var(PRIVATE_KEY_ENV_VAR).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse settings TOML without validation.
pub fn parse_config(content: &str) -> Result<SwapConfig, toml::de::Error> {
    toml::from_str(content)
}

fn apply_env_overrides(config: &mut SwapConfig, private_key: Option<String>) {
    if let Some(key) = private_key.filter(|k| !k.trim().is_empty()) {
        tracing::debug!("Private key taken from {}", PRIVATE_KEY_ENV_VAR);
        config.swap.private_key = key;
    }
}

/// Load the networks file.
pub fn load_networks(path: &Path) -> Result<NetworksFile, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
}

/// Pick and validate the selected network's constants.
pub fn resolve_network(networks: &NetworksFile, name: &str) -> Result<NetworkConfig, ConfigError> {
    let network = networks
        .get(name)
        .cloned()
        .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))?;
    validate_network(name, &network).map_err(ConfigError::Validation)?;
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SETTINGS: &str = r#"
        [swap]
        private_key = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
        network = "Arbitrum"
        proxy = "user:pass@127.0.0.1:3128"
        amount = 0.001
    "#;

    const NETWORKS: &str = r#"
        [Arbitrum]
        rpc_url = "https://arb1.arbitrum.io/rpc"
        chain_id = 42161
        router_address = "0xa669e7a0d4b3e4fa48af2de86bd4cd7126be4e13"
        from_address = "0x82af49447d8a07e3bd95bd0d56f35241523fbab1"
        to_address = "0xaf88d065e77c8cc2239327c5edb3a432268e5831"
        explorer_url = "https://arbiscan.io/"
    "#;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "odos-swapper-{}-{}",
            std::process::id(),
            name
        ));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_config_from_file() {
        let path = write_temp("settings.toml", SETTINGS);
        let config = load_config(&path).unwrap();
        assert_eq!(config.swap.network, "Arbitrum");
        assert_eq!(config.swap.amount, 0.001);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/settings.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
        assert!(err.to_string().contains("Cannot read"));
    }

    #[test]
    fn test_malformed_file() {
        let path = write_temp("broken.toml", "[swap\namount = ");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(..)));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_env_override_replaces_key() {
        let mut config = parse_config(SETTINGS).unwrap();
        apply_env_overrides(&mut config, Some("0x01".to_string()));
        assert_eq!(config.swap.private_key, "0x01");

        apply_env_overrides(&mut config, Some("   ".to_string()));
        assert_eq!(config.swap.private_key, "0x01");
    }

    #[test]
    fn test_resolve_network() {
        let path = write_temp("networks.toml", NETWORKS);
        let networks = load_networks(&path).unwrap();

        let arbitrum = resolve_network(&networks, "Arbitrum").unwrap();
        assert_eq!(arbitrum.chain_id, 42161);

        let err = resolve_network(&networks, "Base").unwrap_err();
        assert_eq!(err.to_string(), "Network 'Base' not found in networks file");
        fs::remove_file(path).ok();
    }
}
