use crate::cli::{Cli, Commands};
use serde::{Deserialize, Serialize};
use spamscan_classifiers::ClassifierConfig;
use std::net::SocketAddr;
use std::path::Path;

/// SpamScan configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Artifact and tokenizer settings
    #[serde(flatten)]
    pub classifiers: ClassifierConfig,

    /// Web server settings
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.address, self.port).parse()?)
    }
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

impl AppConfig {
    /// Load configuration from file (defaults when absent), then apply CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        if let Some(vectorizer) = &cli.vectorizer {
            config.classifiers.artifacts.vectorizer = vectorizer.clone();
        }

        if let Some(classifier) = &cli.classifier {
            config.classifiers.artifacts.classifier = classifier.clone();
        }

        if let Some(tokenizer) = &cli.tokenizer {
            config.classifiers.tokenizer.path = Some(tokenizer.clone());
        }

        if let Commands::Serve { address, port } = &cli.command {
            if let Some(address) = address {
                config.server.address = address.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }

        config.classifiers.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_missing_file_uses_defaults() {
        let cli = Cli::parse_from(["spamscan", "serve"]);
        let config = AppConfig::load("/nonexistent/spamscan.yaml", &cli).unwrap();

        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(
            config.server.socket_addr().unwrap(),
            "127.0.0.1:8501".parse().unwrap()
        );
        assert!(config.classifiers.tokenizer.path.is_none());
    }

    #[test]
    fn test_file_then_cli_overrides() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            temp_file.path(),
            r#"
artifacts:
  vectorizer: /srv/models/vectorizer.json
  classifier: /srv/models/forest.json
tokenizer:
  max_attempts: 1
server:
  address: 0.0.0.0
  port: 9000
"#,
        )
        .unwrap();

        let cli = Cli::parse_from([
            "spamscan",
            "--classifier",
            "/opt/forest.json",
            "--tokenizer",
            "/opt/tokenizer.json",
            "serve",
            "--port",
            "9100",
        ]);
        let config = AppConfig::load(temp_file.path().to_str().unwrap(), &cli).unwrap();

        assert_eq!(
            config.classifiers.artifacts.vectorizer,
            PathBuf::from("/srv/models/vectorizer.json")
        );
        assert_eq!(
            config.classifiers.artifacts.classifier,
            PathBuf::from("/opt/forest.json")
        );
        assert_eq!(
            config.classifiers.tokenizer.path,
            Some(PathBuf::from("/opt/tokenizer.json"))
        );
        assert_eq!(config.classifiers.tokenizer.max_attempts, 1);
        assert_eq!(config.server.address, "0.0.0.0");
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn test_zero_attempts_is_rejected() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "tokenizer:\n  max_attempts: 0\n").unwrap();

        let cli = Cli::parse_from(["spamscan", "serve"]);
        let err = AppConfig::load(temp_file.path().to_str().unwrap(), &cli).unwrap_err();
        assert!(err.to_string().contains("max_attempts"));
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "server: [unclosed").unwrap();

        let cli = Cli::parse_from(["spamscan", "check", "hi"]);
        assert!(AppConfig::load(temp_file.path().to_str().unwrap(), &cli).is_err());
    }
}
