use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://virchowlab.com.br/api";

/// Configuração da conexão com o backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Raiz da API REST, sem barra final.
    pub base_url: String,
    /// Espera entre incluir um laudo e buscar o PDF.
    pub print_delay_ms: u64,
    /// Tempo limite das requisições (ignorado no navegador, onde o fetch não tem).
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            print_delay_ms: 1000,
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn print_delay(&self) -> Duration {
        Duration::from_millis(self.print_delay_ms)
    }

    /// Padrões sobrescritos por `VIRCHOW_API_URL`, `VIRCHOW_PRINT_DELAY_MS`
    /// e `VIRCHOW_TIMEOUT_SECS`. Números inválidos são ignorados.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("VIRCHOW_API_URL").filter(|url| !url.trim().is_empty()) {
            config = config.with_base_url(url.trim());
        }
        if let Some(delay) = lookup("VIRCHOW_PRINT_DELAY_MS").and_then(|raw| raw.parse().ok()) {
            config.print_delay_ms = delay;
        }
        if let Some(timeout) = lookup("VIRCHOW_TIMEOUT_SECS").and_then(|raw| raw.parse().ok()) {
            config.timeout_secs = timeout;
        }
        config
    }
}
