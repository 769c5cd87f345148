//! Regras de domínio do cliente de laudos Virchow.
//!
//! Nada aqui faz I/O: o cliente REST fica em `virchow-api` e a interface
//! do navegador em `virchow-ui`.

pub mod age;
pub mod form;
pub mod generation;
pub mod model;
pub mod notice;
pub mod patient;
pub mod report;
pub mod route;
pub mod session;
pub mod snippet;
pub mod table;

use chrono::NaiveDate;

pub use age::{Age, AgeUnit};
pub use form::{FieldError, ValidationErrors};
pub use generation::{RequestGeneration, Ticket};
pub use model::{
    CreatedReport, DiagnosticCode, ExamType, InvalidateRequest, LoginRequest, LoginResponse,
    MaritalStatus, Patient, Report, User,
};
pub use notice::{Notice, NoticeLevel};
pub use report::{DiagnosticFetch, ReportDraft};
pub use route::Route;
pub use session::{FallbackStore, KeyValueStore, MemoryStore, Session};
pub use snippet::{Insertion, SnippetInserter, StringSurface, TextSurface};
pub use table::{Cell, SortDirection, TableState, Tabular};

/// Erros da camada de domínio.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum VirchowError {
    #[error("Data de nascimento {birth} posterior à data de referência {reference}")]
    InvalidDateRange {
        birth: NaiveDate,
        reference: NaiveDate,
    },
    #[error("Data inválida: {0}")]
    InvalidDate(String),
    #[error("Formulário inválido: {0}")]
    Validation(ValidationErrors),
    #[error("Falha no armazenamento local: {0}")]
    Storage(String),
    #[error("Falha ao serializar dados: {0}")]
    Serialization(String),
}

impl From<ValidationErrors> for VirchowError {
    fn from(errors: ValidationErrors) -> Self {
        VirchowError::Validation(errors)
    }
}
