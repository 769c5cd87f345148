//! Resultado da validação de campos e as conversões aplicadas antes do envio.
//!
//! O backend espera valores sentinela (`""` ou `null`) em vez de chaves
//! ausentes, então todo payload passa por uma das funções abaixo.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::VirchowError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Todos os erros de campo encontrados numa passada pelo formulário.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Primeira mensagem registrada para `field`.
    pub fn for_field(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn into_result(self) -> Result<(), VirchowError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(VirchowError::Validation(self))
        }
    }

    /// Registra `message` se `value` tiver menos de `min` caracteres.
    pub(crate) fn require_min_chars(
        &mut self,
        field: &'static str,
        value: &str,
        min: usize,
        message: &'static str,
    ) {
        if value.trim().chars().count() < min {
            self.push(field, message);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|error| error.message).collect();
        f.write_str(&messages.join(" "))
    }
}

/// Valor sem espaços nas pontas, ou `None` se estiver em branco.
pub fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Valor ou `""`.
pub fn text_or_empty(value: &str) -> String {
    present(value).unwrap_or_default().to_string()
}

/// Valor ou `null`.
pub fn text_or_null(value: &str) -> Option<String> {
    present(value).map(str::to_string)
}

/// Valor em maiúsculas ou `""`.
pub fn upper_or_empty(value: &str) -> String {
    present(value).unwrap_or_default().to_uppercase()
}

/// `YYYY-MM-DD` → `YYYY-MM-DDT00:00:00.000Z`, ou `null` em branco.
pub fn midnight_utc_or_null(value: &str) -> Option<String> {
    present(value).map(|date| format!("{}T00:00:00.000Z", date.get(..10).unwrap_or(date)))
}

/// Lê um valor `YYYY-MM-DD` completo.
pub fn parse_form_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}
