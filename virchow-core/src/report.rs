//! Edição de laudos: o rascunho em edição, a validação dos formulários e os
//! payloads enviados a `/Laudo`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::age::{parse_birth_date, Age};
use crate::form::{
    midnight_utc_or_null, parse_form_date, present, text_or_empty, text_or_null, ValidationErrors,
};
use crate::generation::{RequestGeneration, Ticket};
use crate::model::{DiagnosticCode, ExamType, MaritalStatus, Patient, Report};
use crate::snippet::{Insertion, SnippetInserter, TextSurface};
use crate::VirchowError;

/// Monta o corpo inicial do laudo a partir dos tópicos do tipo de exame.
pub fn topics_to_html(topics: &[String]) -> String {
    topics
        .iter()
        .map(|topic| format!("<p>{topic}</p><br /><br />"))
        .collect()
}

/// Busca de diagnósticos a disparar depois da escolha do tipo de exame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticFetch {
    pub exam_type_id: i64,
    pub ticket: Ticket,
}

/// Estado do laudo no editor: tipos de exame, seleção, corpo e seletor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportDraft {
    exam_types: Vec<ExamType>,
    selected: Option<ExamType>,
    body: String,
    diagnostics: Vec<DiagnosticCode>,
    generation: RequestGeneration,
    picker: SnippetInserter,
}

impl ReportDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rascunho para editar um laudo salvo; o corpo é mantido.
    pub fn for_report(report: &Report) -> Self {
        Self {
            body: report.body.clone().unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn set_exam_types(&mut self, exam_types: Vec<ExamType>) {
        self.exam_types = exam_types;
    }

    pub fn exam_types(&self) -> &[ExamType] {
        &self.exam_types
    }

    pub fn selected_exam_type(&self) -> Option<&ExamType> {
        self.selected.as_ref()
    }

    /// Seleciona um tipo de exame e troca o corpo pelos seus tópicos.
    ///
    /// Um id desconhecido limpa a seleção e esvazia o corpo. Nos dois casos
    /// as buscas de diagnóstico pendentes ficam obsoletas.
    pub fn select_exam_type(&mut self, exam_type_id: i64) -> Option<DiagnosticFetch> {
        let ticket = self.generation.begin();
        self.diagnostics.clear();

        match self
            .exam_types
            .iter()
            .find(|exam_type| exam_type.id == exam_type_id)
        {
            Some(exam_type) => {
                self.body = topics_to_html(&exam_type.topics);
                self.selected = Some(exam_type.clone());
                Some(DiagnosticFetch {
                    exam_type_id,
                    ticket,
                })
            }
            None => {
                self.selected = None;
                self.body = String::new();
                None
            }
        }
    }

    /// Seleciona o tipo de exame de um laudo salvo sem mexer no corpo.
    pub fn restore_exam_type(&mut self, exam_type_id: i64) -> Option<DiagnosticFetch> {
        let exam_type = self
            .exam_types
            .iter()
            .find(|exam_type| exam_type.id == exam_type_id)?
            .clone();
        let ticket = self.generation.begin();
        self.diagnostics.clear();
        self.selected = Some(exam_type);
        Some(DiagnosticFetch {
            exam_type_id,
            ticket,
        })
    }

    /// Aplica o resultado da busca de diagnósticos se nenhuma mais nova foi feita.
    pub fn accept_diagnostics(&mut self, ticket: Ticket, codes: Vec<DiagnosticCode>) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!("stale diagnostic list discarded");
            return false;
        }
        self.diagnostics = codes;
        true
    }

    pub fn diagnostics(&self) -> &[DiagnosticCode] {
        &self.diagnostics
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn picker(&self) -> &SnippetInserter {
        &self.picker
    }

    pub fn open_picker<S: TextSurface + ?Sized>(&mut self, surface: &S) {
        self.picker.open(surface);
    }

    pub fn dismiss_picker(&mut self) {
        self.picker.dismiss();
    }

    /// Insere o conteúdo do diagnóstico em `surface` como texto, escapado
    /// para o corpo HTML. Quem chama sincroniza o corpo depois.
    pub fn pick_diagnostic<S: TextSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        code: &DiagnosticCode,
    ) -> Insertion {
        self.picker.pick(surface, &escape_html(&code.content))
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Campos do formulário "Incluir laudo", como digitados.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateReportForm {
    pub patient_name: String,
    pub marital_status: Option<MaritalStatus>,
    pub sex: String,
    pub birth_date: String,
    pub occupation: String,
    pub origin: String,
    pub requesting_physician: String,
    pub clinical_summary: String,
    pub last_menstruation: String,
    pub report_number: String,
    pub exam_date: String,
    pub age: String,
}

/// Corpo de `POST /Laudo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReportPayload {
    #[serde(rename = "nomePaciente")]
    pub patient_name: String,
    #[serde(rename = "estadoCivil")]
    pub marital_status: Option<String>,
    #[serde(rename = "sexo")]
    pub sex: String,
    #[serde(rename = "profissao")]
    pub occupation: String,
    #[serde(rename = "procedencia")]
    pub origin: String,
    #[serde(rename = "resumoClinico")]
    pub clinical_summary: String,
    #[serde(rename = "datUltimaMenstruacao")]
    pub last_menstruation: Option<String>,
    #[serde(rename = "datNascimento")]
    pub birth_date: Option<String>,
    #[serde(rename = "medicoRequisitante")]
    pub requesting_physician: Option<String>,
    #[serde(rename = "desLaudo")]
    pub body: String,
    #[serde(rename = "exameId")]
    pub exam_type_id: i64,
    #[serde(rename = "nroLaudo")]
    pub report_number: u32,
    #[serde(rename = "datExame")]
    pub exam_date: String,
    #[serde(rename = "idade")]
    pub age: String,
}

impl CreateReportForm {
    /// Formulário preenchido com o paciente escolhido para o laudo novo.
    pub fn for_patient(patient: &Patient, reference: NaiveDate) -> Self {
        let age = patient
            .age_on(reference)
            .ok()
            .flatten()
            .map(|age| age.value.to_string())
            .unwrap_or_default();

        Self {
            patient_name: patient.name.clone(),
            marital_status: patient.marital_status.clone(),
            sex: patient.sex.clone().unwrap_or_default(),
            birth_date: patient
                .birth_date
                .as_deref()
                .and_then(|raw| raw.get(..10))
                .unwrap_or_default()
                .to_string(),
            occupation: patient.occupation.clone().unwrap_or_default(),
            origin: patient.origin.clone().unwrap_or_default(),
            age,
            ..Self::default()
        }
    }

    pub fn validate(&self, draft: &ReportDraft) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_min_chars(
            "patient_name",
            &self.patient_name,
            10,
            "Insira o nome do paciente.",
        );
        if draft.selected_exam_type().is_none() {
            errors.push("exam_type", "Selecione o tipo de laudo.");
        }
        if parse_report_number(&self.report_number).is_none() {
            errors.push("report_number", "Insira o número do laudo.");
        }
        if self.exam_date.trim().chars().count() < 10 {
            errors.push("exam_date", "Insira a data do exame.");
        } else if parse_form_date(&self.exam_date).is_none() {
            errors.push("exam_date", "Data inválida.");
        }
        errors
    }

    /// Valida o formulário e aplica as conversões de envio.
    pub fn to_payload(&self, draft: &ReportDraft) -> Result<CreateReportPayload, VirchowError> {
        self.validate(draft).into_result()?;

        let (Some(exam_type), Some(report_number)) = (
            draft.selected_exam_type(),
            parse_report_number(&self.report_number),
        ) else {
            return Err(VirchowError::Validation(self.validate(draft)));
        };

        Ok(CreateReportPayload {
            patient_name: text_or_empty(&self.patient_name),
            marital_status: marital_description(self.marital_status.as_ref()),
            sex: text_or_empty(&self.sex),
            occupation: text_or_empty(&self.occupation),
            origin: text_or_empty(&self.origin),
            clinical_summary: text_or_empty(&self.clinical_summary),
            last_menstruation: text_or_null(&self.last_menstruation),
            birth_date: midnight_utc_or_null(&self.birth_date),
            requesting_physician: text_or_null(&self.requesting_physician),
            body: draft.body().to_string(),
            exam_type_id: exam_type.id,
            report_number,
            exam_date: self.exam_date.trim().to_string(),
            age: text_or_empty(&self.age),
        })
    }
}

/// Campos do formulário "Editar laudo".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateReportForm {
    pub patient_name: String,
    pub marital_status: String,
    pub sex: String,
    pub birth_date: String,
    pub occupation: String,
    pub origin: String,
    pub requesting_physician: String,
    pub diagnostic_hypothesis: String,
    pub clinical_summary: String,
    pub last_menstruation: String,
}

/// Corpo de `PUT /Laudo/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReportPayload {
    #[serde(rename = "nomePaciente")]
    pub patient_name: String,
    #[serde(rename = "idade")]
    pub age: String,
    #[serde(rename = "estadoCivil")]
    pub marital_status: Option<String>,
    #[serde(rename = "sexo")]
    pub sex: String,
    #[serde(rename = "profissao")]
    pub occupation: String,
    #[serde(rename = "procedencia")]
    pub origin: String,
    #[serde(rename = "resumoClinico")]
    pub clinical_summary: String,
    #[serde(rename = "hipoteseDiagnostica")]
    pub diagnostic_hypothesis: String,
    #[serde(rename = "datUltimaMenstruacao")]
    pub last_menstruation: Option<String>,
    #[serde(rename = "datNascimento")]
    pub birth_date: Option<String>,
    #[serde(rename = "medicoRequisitante")]
    pub requesting_physician: Option<String>,
    #[serde(rename = "datExame")]
    pub exam_date: String,
    #[serde(rename = "desLaudo")]
    pub body: String,
    #[serde(rename = "exameId")]
    pub exam_type_id: Option<i64>,
    #[serde(rename = "nroLaudo")]
    pub report_number: Option<i64>,
}

impl UpdateReportForm {
    pub fn from_report(report: &Report) -> Self {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            patient_name: field(&report.patient_name),
            marital_status: field(&report.marital_status),
            sex: field(&report.sex),
            birth_date: report
                .birth_date
                .as_deref()
                .and_then(|raw| raw.get(..10))
                .unwrap_or_default()
                .to_string(),
            occupation: field(&report.occupation),
            origin: field(&report.origin),
            requesting_physician: field(&report.requesting_physician),
            diagnostic_hypothesis: field(&report.diagnostic_hypothesis),
            clinical_summary: field(&report.clinical_summary),
            last_menstruation: field(&report.last_menstruation)
                .get(..10)
                .unwrap_or_default()
                .to_string(),
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_min_chars(
            "patient_name",
            &self.patient_name,
            10,
            "Insira o nome do paciente.",
        );
        errors.require_min_chars("sex", &self.sex, 1, "Insira seu sexo.");
        if parse_form_date(&self.birth_date).is_none() {
            errors.push("birth_date", "Insira a data de nascimento.");
        }
        errors.require_min_chars(
            "requesting_physician",
            &self.requesting_physician,
            5,
            "Insira o médico requisitante.",
        );
        errors.require_min_chars(
            "diagnostic_hypothesis",
            &self.diagnostic_hypothesis,
            10,
            "Insira o hipótese diagnóstica.",
        );
        errors.require_min_chars(
            "clinical_summary",
            &self.clinical_summary,
            10,
            "Insira o resumo clínico.",
        );
        errors
    }

    /// Idade exibida ao lado da data de nascimento; `None` enquanto a data
    /// estiver em branco, inválida ou no futuro.
    pub fn age_on(&self, today: NaiveDate) -> Option<Age> {
        let birth = parse_birth_date(&self.birth_date).ok().flatten()?;
        Age::between(birth, today).ok()
    }

    /// Monta o payload de atualização de `stored`.
    ///
    /// A idade é recalculada em `today`; a data do exame continua a salva e,
    /// se faltar, vira `today`.
    pub fn to_payload(
        &self,
        draft: &ReportDraft,
        stored: &Report,
        today: NaiveDate,
    ) -> Result<UpdateReportPayload, VirchowError> {
        self.validate().into_result()?;

        let age = match parse_birth_date(&self.birth_date)? {
            Some(birth) => Age::between(birth, today)?.value.to_string(),
            None => String::new(),
        };
        let exam_date = stored
            .exam_date
            .as_deref()
            .and_then(present)
            .map(str::to_string)
            .unwrap_or_else(|| today.format("%Y-%m-%d").to_string());

        Ok(UpdateReportPayload {
            patient_name: text_or_empty(&self.patient_name),
            age,
            marital_status: text_or_null(&self.marital_status),
            sex: text_or_empty(&self.sex),
            occupation: text_or_empty(&self.occupation),
            origin: text_or_empty(&self.origin),
            clinical_summary: text_or_empty(&self.clinical_summary),
            diagnostic_hypothesis: text_or_empty(&self.diagnostic_hypothesis),
            last_menstruation: text_or_null(&self.last_menstruation),
            birth_date: midnight_utc_or_null(&self.birth_date),
            requesting_physician: text_or_null(&self.requesting_physician),
            exam_date,
            body: draft.body().to_string(),
            exam_type_id: draft
                .selected_exam_type()
                .map(|exam_type| exam_type.id)
                .or(stored.exam_type_id),
            report_number: stored.number,
        })
    }
}

/// Campos da busca na tela de impressão.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSearchForm {
    pub patient_name: String,
    pub report_number: String,
}

/// Corpo de `POST /Laudo/filter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    #[serde(rename = "nomePaciente")]
    pub patient_name: String,
    #[serde(rename = "nroLaudo", skip_serializing_if = "Option::is_none", default)]
    pub report_number: Option<i64>,
}

impl ReportSearchForm {
    pub fn to_filter(&self) -> Result<ReportFilter, VirchowError> {
        let mut errors = ValidationErrors::new();
        errors.require_min_chars(
            "patient_name",
            &self.patient_name,
            3,
            "Insira o nome do paciente.",
        );
        errors.into_result()?;

        Ok(ReportFilter {
            patient_name: self.patient_name.trim().to_uppercase(),
            report_number: present(&self.report_number).and_then(|raw| raw.parse().ok()),
        })
    }
}

fn parse_report_number(raw: &str) -> Option<u32> {
    present(raw)?.parse::<u32>().ok().filter(|number| *number >= 1)
}

fn marital_description(status: Option<&MaritalStatus>) -> Option<String> {
    status
        .filter(|status| status.id != 0)
        .map(|status| status.description.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippet::StringSurface;

    fn exam_types() -> Vec<ExamType> {
        vec![
            ExamType {
                id: 1,
                name: "Citologia".into(),
                description: None,
                topics: vec!["MATERIAL".into(), "CONCLUSÃO".into()],
            },
            ExamType {
                id: 2,
                name: "Biópsia".into(),
                description: Some("Anatomopatológico".into()),
                topics: Vec::new(),
            },
        ]
    }

    fn draft_with_selection(id: i64) -> ReportDraft {
        let mut draft = ReportDraft::new();
        draft.set_exam_types(exam_types());
        draft.select_exam_type(id);
        draft
    }

    fn filled_form() -> CreateReportForm {
        CreateReportForm {
            patient_name: "JOANA PEREIRA LIMA".into(),
            report_number: "42".into(),
            exam_date: "2025-01-10".into(),
            ..CreateReportForm::default()
        }
    }

    #[test]
    fn topics_become_paragraphs() {
        let html = topics_to_html(&["MATERIAL".into(), "CONCLUSÃO".into()]);
        assert_eq!(
            html,
            "<p>MATERIAL</p><br /><br /><p>CONCLUSÃO</p><br /><br />"
        );
    }

    #[test]
    fn empty_topic_list_gives_empty_body() {
        let draft = draft_with_selection(2);
        assert_eq!(draft.body(), "");
        assert!(draft.selected_exam_type().is_some());
    }

    #[test]
    fn unknown_exam_type_clears_selection() {
        let mut draft = draft_with_selection(1);
        assert!(draft.select_exam_type(99).is_none());
        assert!(draft.selected_exam_type().is_none());
        assert_eq!(draft.body(), "");
    }

    #[test]
    fn stale_diagnostics_are_discarded() {
        let mut draft = ReportDraft::new();
        draft.set_exam_types(exam_types());
        let first = draft.select_exam_type(1).unwrap();
        let second = draft.select_exam_type(2).unwrap();

        let late = vec![DiagnosticCode {
            id: 1,
            code: "C1".into(),
            content: "Negativo para malignidade".into(),
        }];
        assert!(!draft.accept_diagnostics(first.ticket, late.clone()));
        assert!(draft.diagnostics().is_empty());
        assert!(draft.accept_diagnostics(second.ticket, late));
        assert_eq!(draft.diagnostics().len(), 1);
    }

    #[test]
    fn picking_a_diagnostic_inserts_its_content() {
        let mut draft = draft_with_selection(2);
        let code = DiagnosticCode {
            id: 3,
            code: "N01".into(),
            content: "XY".into(),
        };
        let mut surface = StringSurface::new("ABCDE").with_cursor(5);
        draft.open_picker(&surface);
        draft.pick_diagnostic(&mut surface, &code);
        draft.set_body(surface.text());
        assert_eq!(draft.body(), "ABCDEXY");
        assert!(!draft.picker().is_open());
    }

    #[test]
    fn diagnostic_markup_is_inserted_as_text() {
        let mut draft = draft_with_selection(2);
        let code = DiagnosticCode {
            id: 4,
            code: "N02".into(),
            content: "Ki-67 <5% & p16 \"negativo\"".into(),
        };
        let mut surface = StringSurface::new("<p></p>").with_cursor(3);
        draft.open_picker(&surface);
        let outcome = draft.pick_diagnostic(&mut surface, &code);
        draft.set_body(surface.text());

        assert_eq!(
            draft.body(),
            "<p>Ki-67 &lt;5% &amp; p16 &quot;negativo&quot;</p>"
        );
        let Insertion::Inserted { cursor, .. } = outcome else {
            panic!("expected an insertion");
        };
        assert_eq!(cursor, 3 + "Ki-67 &lt;5% &amp; p16 &quot;negativo&quot;".chars().count());
    }

    #[test]
    fn create_payload_applies_coercion_table() {
        let draft = draft_with_selection(1);
        let payload = filled_form().to_payload(&draft).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["nomePaciente"], "JOANA PEREIRA LIMA");
        assert!(json["estadoCivil"].is_null());
        assert_eq!(json["sexo"], "");
        assert_eq!(json["profissao"], "");
        assert_eq!(json["procedencia"], "");
        assert_eq!(json["resumoClinico"], "");
        assert!(json["datUltimaMenstruacao"].is_null());
        assert!(json["datNascimento"].is_null());
        assert!(json["medicoRequisitante"].is_null());
        assert_eq!(
            json["desLaudo"],
            "<p>MATERIAL</p><br /><br /><p>CONCLUSÃO</p><br /><br />"
        );
        assert_eq!(json["exameId"], 1);
        assert_eq!(json["nroLaudo"], 42);
        assert_eq!(json["datExame"], "2025-01-10");
        assert_eq!(json["idade"], "");
    }

    #[test]
    fn create_payload_keeps_filled_fields() {
        let draft = draft_with_selection(1);
        let form = CreateReportForm {
            marital_status: Some(MaritalStatus {
                id: 2,
                description: "Casado".into(),
            }),
            birth_date: "1990-03-04".into(),
            requesting_physician: "Dra. Helena".into(),
            age: "34".into(),
            ..filled_form()
        };
        let payload = form.to_payload(&draft).unwrap();
        assert_eq!(payload.marital_status.as_deref(), Some("Casado"));
        assert_eq!(
            payload.birth_date.as_deref(),
            Some("1990-03-04T00:00:00.000Z")
        );
        assert_eq!(payload.requesting_physician.as_deref(), Some("Dra. Helena"));
        assert_eq!(payload.age, "34");
    }

    #[test]
    fn create_payload_is_deterministic() {
        let draft = draft_with_selection(1);
        let form = filled_form();
        assert_eq!(form.to_payload(&draft), form.to_payload(&draft));
    }

    #[test]
    fn create_validation_reports_every_field() {
        let draft = ReportDraft::new();
        let form = CreateReportForm {
            patient_name: "Ana".into(),
            report_number: "0".into(),
            exam_date: "2025-13-40".into(),
            ..CreateReportForm::default()
        };
        let errors = form.validate(&draft);
        assert_eq!(errors.for_field("patient_name"), Some("Insira o nome do paciente."));
        assert_eq!(errors.for_field("exam_type"), Some("Selecione o tipo de laudo."));
        assert_eq!(errors.for_field("report_number"), Some("Insira o número do laudo."));
        assert_eq!(errors.for_field("exam_date"), Some("Data inválida."));
    }

    #[test]
    fn form_prefills_from_patient() {
        let patient = Patient {
            id: 5,
            name: "CARLOS EDUARDO SOUZA".into(),
            sex: Some("M".into()),
            birth_date: Some("2024-06-15T00:00:00".into()),
            ..Patient::default()
        };
        let form = CreateReportForm::for_patient(&patient, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!(form.birth_date, "2024-06-15");
        assert_eq!(form.age, "6");
        assert_eq!(form.sex, "M");
    }

    fn stored_report() -> Report {
        Report {
            id: 10,
            number: Some(42),
            patient_name: Some("JOANA PEREIRA LIMA".into()),
            sex: Some("F".into()),
            birth_date: Some("2000-06-15T00:00:00".into()),
            requesting_physician: Some("Dr. Paulo".into()),
            diagnostic_hypothesis: Some("Lesão intraepitelial".into()),
            clinical_summary: Some("Paciente assintomática".into()),
            exam_date: Some("2025-01-10".into()),
            exam_type_id: Some(1),
            body: Some("<p>MATERIAL</p>".into()),
            ..Report::default()
        }
    }

    #[test]
    fn update_payload_recomputes_age_and_keeps_exam_date() {
        let report = stored_report();
        let draft = ReportDraft::for_report(&report);
        let form = UpdateReportForm::from_report(&report);
        let today = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();

        let payload = form.to_payload(&draft, &report, today).unwrap();
        assert_eq!(payload.age, "24");
        assert_eq!(payload.exam_date, "2025-01-10");
        assert_eq!(payload.exam_type_id, Some(1));
        assert_eq!(payload.body, "<p>MATERIAL</p>");
        assert_eq!(payload.birth_date.as_deref(), Some("2000-06-15T00:00:00.000Z"));
        assert_eq!(payload.marital_status, None);
        assert_eq!(payload.report_number, Some(42));
    }

    #[test]
    fn displayed_age_follows_the_birth_date_field() {
        let mut form = UpdateReportForm::from_report(&stored_report());
        let today = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        assert_eq!(form.age_on(today).unwrap().to_string(), "24 anos");

        form.birth_date = "2024-12-01".into();
        assert_eq!(form.age_on(today).unwrap().to_string(), "6 meses");

        form.birth_date = "2025-07-01".into();
        assert_eq!(form.age_on(today), None);
        form.birth_date = String::new();
        assert_eq!(form.age_on(today), None);
    }

    #[test]
    fn update_requires_clinical_fields() {
        let report = Report {
            id: 1,
            ..Report::default()
        };
        let form = UpdateReportForm::from_report(&report);
        let err = form
            .to_payload(&ReportDraft::new(), &report, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .unwrap_err();
        let VirchowError::Validation(errors) = err else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn report_filter_uppercases_name() {
        let form = ReportSearchForm {
            patient_name: "joana".into(),
            report_number: "".into(),
        };
        let filter = form.to_filter().unwrap();
        assert_eq!(filter.patient_name, "JOANA");
        let json = serde_json::to_value(filter).unwrap();
        assert!(json.get("nroLaudo").is_none());
    }
}
