//! Configuração passada a `mount_app` pela página hospedeira.

use serde::Deserialize;
use tracing::Level;
use virchow_api::ClientConfig;

/// Configuração do backend e o nível de log do console do navegador.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MountOptions {
    #[serde(flatten)]
    pub client: ClientConfig,
    pub log_level: Option<String>,
}

impl MountOptions {
    /// Nível mais detalhado enviado ao console; `info` a menos que a página
    /// peça outro nível válido.
    pub fn max_level(&self) -> Level {
        self.log_level
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_info_and_default_backend() {
        let options: MountOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.max_level(), Level::INFO);
        assert_eq!(options.client, ClientConfig::default());
    }

    #[test]
    fn reads_level_next_to_backend_settings() {
        let options: MountOptions = serde_json::from_str(
            r#"{"base_url": "http://localhost:5000", "log_level": "Debug"}"#,
        )
        .unwrap();
        assert_eq!(options.max_level(), Level::DEBUG);
        assert_eq!(options.client.base_url, "http://localhost:5000");
        assert_eq!(options.client.print_delay_ms, 1000);
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let options = MountOptions {
            log_level: Some("verbose".into()),
            ..MountOptions::default()
        };
        assert_eq!(options.max_level(), Level::INFO);
    }
}
