use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub log_level: String,
    pub default_name: String,
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            address: cli.address,
            log_level: cli.log_level,
            default_name: cli.default_name,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8080".to_string(),
            log_level: "info".to_string(),
            default_name: "Unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "server",
            "--address",
            "0.0.0.0:9000",
            "--default-name",
            "Guest",
        ]);
        let config = ServerConfig::from(cli);

        assert_eq!(config.address, "0.0.0.0:9000");
        assert_eq!(config.default_name, "Guest");
    }
}
