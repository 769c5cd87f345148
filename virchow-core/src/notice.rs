//! Avisos temporários (toasts) exibidos ao usuário e seus textos.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub mod msg {
    pub const LOGIN_FAILED: &str = "Erro ao realizar login!";

    pub const EXAM_TYPES_FAILED: &str = "Erro ao listar tipos de laudos!";
    pub const MARITAL_STATUSES_FAILED: &str = "Erro ao listar estados civis!";
    pub const DIAGNOSTICS_FAILED: &str = "Erro ao listar os diagnósticos!";

    pub const REPORT_CREATED: &str = "Laudo criado com sucesso!";
    pub const REPORT_CREATE_FAILED: &str = "Não foi possível processar o laudo!";
    pub const REPORT_UPDATED: &str = "Laudo atualizado com sucesso!";
    pub const REPORT_UPDATE_FAILED: &str = "Não foi possível atualizar o laudo!";
    pub const REPORT_INVALIDATED: &str = "Laudo invalidado com sucesso!";
    pub const REPORT_INVALIDATE_FAILED: &str = "Não foi possível invalidar o laudo!";
    pub const PRINT_FAILED: &str = "Não foi possível gerar a impressão!";
    pub const REPORTS_NOT_FOUND: &str = "Nenhum laudo foi encontrado!";
    pub const REPORTS_SEARCH_FAILED: &str = "Erro ao localizar laudos!";

    pub const PATIENT_CREATED: &str = "Paciente cadastrado com sucesso!";
    pub const PATIENT_DUPLICATE: &str = "Paciente já cadastrado!";
    pub const PATIENT_CREATE_FAILED: &str = "Erro ao cadastrar paciente!";
    pub const PATIENT_UPDATED: &str = "Paciente atualizado com sucesso!";
    pub const PATIENT_UPDATE_FAILED: &str = "Erro ao atualizar paciente!";
    pub const PATIENT_UNCHANGED: &str = "Nenhum dado do paciente foi alterado!";
    pub const PATIENT_NOT_FOUND: &str = "Paciente não encontrado!";
    pub const PATIENT_SEARCH_EMPTY: &str =
        "Não existe paciente com os dados informados! Para cadastrá-lo, clique em INCLUIR PACIENTE";
    pub const PATIENT_SEARCH_FAILED: &str = "Erro ao localizar paciente!";
    pub const SEARCH_NEEDS_CRITERIA: &str = "Preencha no mínimo um campo!";
    pub const BIRTH_DATE_OUT_OF_RANGE: &str = "Insira a data correta!";

    pub const SESSION_EXPIRED: &str = "Sessão expirada. Faça login novamente.";
}
