//! Registros trocados com o backend Virchow. Os nomes no JSON seguem o
//! camelCase do backend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::age::{parse_birth_date, Age};
use crate::VirchowError;

/// Valor de referência de estado civil (`EstadoCivil`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaritalStatus {
    pub id: i64,
    #[serde(rename = "descricao")]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Patient {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "sexo", default)]
    pub sex: Option<String>,
    #[serde(rename = "datNascimento", default)]
    pub birth_date: Option<String>,
    #[serde(rename = "estadoCivil", default)]
    pub marital_status: Option<MaritalStatus>,
    #[serde(rename = "profissao", default)]
    pub occupation: Option<String>,
    #[serde(rename = "procedencia", default)]
    pub origin: Option<String>,
}

impl Patient {
    pub fn birth_date(&self) -> Result<Option<NaiveDate>, VirchowError> {
        match &self.birth_date {
            Some(raw) => parse_birth_date(raw),
            None => Ok(None),
        }
    }

    /// Idade em `reference`, ou `None` sem data de nascimento cadastrada.
    pub fn age_on(&self, reference: NaiveDate) -> Result<Option<Age>, VirchowError> {
        self.birth_date()?
            .map(|birth| Age::between(birth, reference))
            .transpose()
    }
}

/// Tipo de exame (laudo) com os tópicos que iniciam o corpo de um laudo novo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExamType {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "topicosList", default)]
    pub topics: Vec<String>,
}

/// Trecho de diagnóstico que pode ser inserido no corpo do laudo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnosticCode {
    pub id: i64,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "conteudo")]
    pub content: String,
}

/// Laudo anatomopatológico como devolvido pelo backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Report {
    pub id: i64,
    #[serde(rename = "nroLaudo", default)]
    pub number: Option<i64>,
    #[serde(rename = "nomePaciente", default)]
    pub patient_name: Option<String>,
    #[serde(rename = "idade", default)]
    pub age: Option<String>,
    #[serde(rename = "estadoCivil", default)]
    pub marital_status: Option<String>,
    #[serde(rename = "sexo", default)]
    pub sex: Option<String>,
    #[serde(rename = "profissao", default)]
    pub occupation: Option<String>,
    #[serde(rename = "procedencia", default)]
    pub origin: Option<String>,
    #[serde(rename = "datNascimento", default)]
    pub birth_date: Option<String>,
    #[serde(rename = "resumoClinico", default)]
    pub clinical_summary: Option<String>,
    #[serde(rename = "hipoteseDiagnostica", default)]
    pub diagnostic_hypothesis: Option<String>,
    #[serde(rename = "datUltimaMenstruacao", default)]
    pub last_menstruation: Option<String>,
    #[serde(rename = "medicoRequisitante", default)]
    pub requesting_physician: Option<String>,
    #[serde(rename = "datExame", default)]
    pub exam_date: Option<String>,
    #[serde(rename = "datImpressao", default)]
    pub printed_at: Option<String>,
    #[serde(rename = "datInvalidado", default)]
    pub invalidated_at: Option<String>,
    #[serde(rename = "usuarioInvalidaId", default)]
    pub invalidated_by: Option<i64>,
    #[serde(rename = "tipoLaudoId", alias = "exameId", default)]
    pub exam_type_id: Option<i64>,
    #[serde(rename = "desLaudo", default)]
    pub body: Option<String>,
}

impl Report {
    pub fn is_invalidated(&self) -> bool {
        self.invalidated_at.is_some()
    }
}

/// Resposta de `POST /Laudo`; só o id interessa.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedReport {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub login: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub login: String,
    #[serde(rename = "senha")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "usuario")]
    pub user: User,
}

/// Corpo de `PATCH /Laudo/Invalidar/{id}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvalidateRequest {
    #[serde(rename = "usuarioId")]
    pub user_id: i64,
}
