//! Cliente REST e fluxos de envio para o backend Virchow.

mod client;
mod config;
mod error;
pub mod workflow;

pub use client::ApiClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use workflow::{create_and_print, CreatedReportOutcome, PrintOutcome};
