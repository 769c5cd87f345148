use reqwest::StatusCode;
use serde::Deserialize;
use virchow_core::Notice;

/// Falhas de uma chamada ao backend.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ApiError {
    #[error("Sessão não autorizada")]
    Unauthorized,
    #[error("Conflito: {0}")]
    Conflict(String),
    #[error("Resposta inesperada do servidor ({status}): {body}")]
    Status { status: u16, body: String },
    #[error("Falha de comunicação: {0}")]
    Transport(String),
    #[error("Resposta ilegível: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl ApiError {
    /// Classifica uma resposta sem sucesso.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::CONFLICT => ApiError::Conflict(conflict_message(&body)),
            _ => ApiError::Status {
                status: status.as_u16(),
                body,
            },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// Mensagem do servidor nos conflitos, `fallback` nos demais casos.
    pub fn user_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            ApiError::Conflict(message) if !message.is_empty() => message,
            _ => fallback,
        }
    }

    pub fn notice(&self, fallback: &str) -> Notice {
        Notice::error(self.user_message(fallback))
    }
}

fn conflict_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .error
            .or(parsed.message)
            .unwrap_or_default(),
        Err(_) => body.trim().trim_matches('"').to_string(),
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_surfaces_server_message() {
        let err = ApiError::from_status(
            StatusCode::CONFLICT,
            r#"{"error": "Número de laudo já utilizado"}"#.to_string(),
        );
        assert_eq!(
            err.user_message("Não foi possível processar o laudo!"),
            "Número de laudo já utilizado"
        );
    }

    #[test]
    fn other_failures_use_fallback() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".into());
        assert_eq!(err.user_message("genérico"), "genérico");
        assert!(ApiError::from_status(StatusCode::UNAUTHORIZED, String::new()).is_unauthorized());
    }

    #[test]
    fn plain_text_conflict_is_kept() {
        let err = ApiError::from_status(StatusCode::CONFLICT, "\"Paciente já cadastrado\"".into());
        assert_eq!(err, ApiError::Conflict("Paciente já cadastrado".into()));
    }
}
