//! Ponte JavaScript, independente de framework, para as regras de laudo.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use virchow_api::ClientConfig;
use virchow_core::age::parse_birth_date;
use virchow_core::model::ExamType;
use virchow_core::report::{topics_to_html, CreateReportForm, CreateReportPayload};
use virchow_core::{Age, ReportDraft, SnippetInserter, StringSurface, VirchowError};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsClientConfig {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    print_delay_ms: Option<u64>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

impl From<JsClientConfig> for ClientConfig {
    fn from(cfg: JsClientConfig) -> Self {
        let mut base = ClientConfig::default();
        if let Some(url) = cfg.base_url.filter(|url| !url.trim().is_empty()) {
            base = base.with_base_url(url.trim());
        }
        if let Some(delay) = cfg.print_delay_ms {
            base.print_delay_ms = delay;
        }
        if let Some(timeout) = cfg.timeout_secs {
            base.timeout_secs = timeout;
        }
        base
    }
}

#[derive(Debug, Serialize, PartialEq)]
struct AgeSummary {
    value: u32,
    unit: &'static str,
    label: String,
}

#[derive(Deserialize)]
struct JsReportRequest {
    form: CreateReportForm,
    exam_type: Option<ExamType>,
    #[serde(default)]
    body: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
struct SnippetResult {
    text: String,
    offset: Option<usize>,
    cursor: Option<usize>,
}

/// Idade em `reference` (`YYYY-MM-DD`, hoje se omitido).
#[wasm_bindgen]
pub fn calculate_age(birth: String, reference: Option<String>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let summary = age_summary(&birth, reference.as_deref()).map_err(format_error)?;
    to_value(&summary).map_err(|err| JsValue::from_str(&format!("Falha ao serializar idade: {err}")))
}

#[wasm_bindgen]
pub fn scaffold_report_body(topics: JsValue) -> Result<String, JsValue> {
    let topics: Vec<String> = from_value(topics)
        .map_err(|err| JsValue::from_str(&format!("Lista de tópicos inválida: {err}")))?;
    Ok(topics_to_html(&topics))
}

/// Valida o formulário de inclusão e devolve o corpo de `POST /Laudo`.
///
/// Rejeita com a lista de erros de campo quando o formulário está incompleto.
#[wasm_bindgen]
pub fn build_report_payload(request: JsValue) -> Result<JsValue, JsValue> {
    let request: JsReportRequest = from_value(request)
        .map_err(|err| JsValue::from_str(&format!("Formulário ilegível: {err}")))?;

    match report_payload(request) {
        Ok(payload) => to_value(&payload)
            .map_err(|err| JsValue::from_str(&format!("Falha ao serializar laudo: {err}"))),
        Err(VirchowError::Validation(errors)) => Err(to_value(&errors)
            .unwrap_or_else(|_| JsValue::from_str(&errors.to_string()))),
        Err(err) => Err(format_error(err)),
    }
}

/// Insere `snippet` em `text` na posição `offset` (início do texto se ausente).
#[wasm_bindgen]
pub fn insert_snippet(text: String, offset: Option<u32>, snippet: String) -> Result<JsValue, JsValue> {
    let result = snippet_result(text, offset.map(|offset| offset as usize), &snippet);
    to_value(&result).map_err(|err| JsValue::from_str(&format!("Falha ao serializar texto: {err}")))
}

/// Configuração do cliente com os padrões preenchidos.
#[wasm_bindgen]
pub fn resolve_client_config(config: Option<JsValue>) -> Result<JsValue, JsValue> {
    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsClientConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Configuração inválida: {err}")))?;
            ClientConfig::from(cfg)
        }
        None => ClientConfig::default(),
    };
    to_value(&cfg).map_err(|err| JsValue::from_str(&format!("Falha ao serializar configuração: {err}")))
}

fn age_summary(birth: &str, reference: Option<&str>) -> Result<AgeSummary, VirchowError> {
    let birth = parse_birth_date(birth)?.ok_or_else(|| VirchowError::InvalidDate(birth.to_string()))?;
    let reference = match reference {
        Some(raw) => parse_day(raw)?,
        None => Local::now().date_naive(),
    };

    let age = Age::between(birth, reference)?;
    Ok(AgeSummary {
        value: age.value,
        unit: age.unit.code(),
        label: age.to_string(),
    })
}

fn parse_day(raw: &str) -> Result<NaiveDate, VirchowError> {
    parse_birth_date(raw)?.ok_or_else(|| VirchowError::InvalidDate(raw.to_string()))
}

fn report_payload(request: JsReportRequest) -> Result<CreateReportPayload, VirchowError> {
    let mut draft = ReportDraft::new();
    if let Some(exam_type) = request.exam_type {
        let id = exam_type.id;
        draft.set_exam_types(vec![exam_type]);
        draft.select_exam_type(id);
    }
    if let Some(body) = request.body {
        draft.set_body(body);
    }
    request.form.to_payload(&draft)
}

fn snippet_result(text: String, offset: Option<usize>, snippet: &str) -> SnippetResult {
    let mut surface = StringSurface::new(text);
    if let Some(offset) = offset {
        surface = surface.with_cursor(offset);
    }

    let mut inserter = SnippetInserter::new();
    inserter.open(&surface);
    let (offset, cursor) = match inserter.pick(&mut surface, snippet) {
        virchow_core::Insertion::Inserted { offset, cursor } => (Some(offset), Some(cursor)),
        virchow_core::Insertion::Skipped => (None, None),
    };

    SnippetResult {
        text: surface.into_text(),
        offset,
        cursor,
    }
}

fn format_error(err: VirchowError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_uses_months_below_one_year() {
        let summary = age_summary("2024-01-10", Some("2024-07-10")).unwrap();
        assert_eq!(
            summary,
            AgeSummary {
                value: 6,
                unit: "M",
                label: "6 meses".into(),
            }
        );
    }

    #[test]
    fn age_accepts_backend_timestamps() {
        let summary = age_summary("1990-03-15T00:00:00.000Z", Some("2024-03-14")).unwrap();
        assert_eq!(summary.value, 33);
        assert_eq!(summary.unit, "A");
    }

    #[test]
    fn blank_birth_is_rejected() {
        assert!(matches!(
            age_summary("  ", None),
            Err(VirchowError::InvalidDate(_))
        ));
    }

    #[test]
    fn snippet_lands_at_offset() {
        let result = snippet_result("Laudo: .".into(), Some(7), "negativo");
        assert_eq!(result.text, "Laudo: negativo.");
        assert_eq!(result.cursor, Some(15));
    }

    #[test]
    fn snippet_without_offset_goes_first() {
        let result = snippet_result("fim".into(), None, "início ");
        assert_eq!(result.text, "início fim");
        assert_eq!(result.offset, Some(0));
    }

    #[test]
    fn payload_requires_exam_type() {
        let request = JsReportRequest {
            form: CreateReportForm {
                patient_name: "JOANA DARC PEREIRA".into(),
                report_number: "5".into(),
                exam_date: "2024-05-02".into(),
                ..CreateReportForm::default()
            },
            exam_type: None,
            body: None,
        };
        let Err(VirchowError::Validation(errors)) = report_payload(request) else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.for_field("exam_type"), Some("Selecione o tipo de laudo."));
    }

    #[test]
    fn payload_keeps_custom_body() {
        let request = JsReportRequest {
            form: CreateReportForm {
                patient_name: "JOANA DARC PEREIRA".into(),
                report_number: "5".into(),
                exam_date: "2024-05-02".into(),
                ..CreateReportForm::default()
            },
            exam_type: Some(ExamType {
                id: 3,
                name: "Biópsia".into(),
                description: None,
                topics: vec!["Macroscopia".into()],
            }),
            body: Some("<p>editado</p>".into()),
        };
        let payload = report_payload(request).unwrap();
        assert_eq!(payload.exam_type_id, 3);
        assert_eq!(payload.body, "<p>editado</p>");
        assert_eq!(payload.birth_date, None);
    }

    #[test]
    fn js_config_overrides_only_given_fields() {
        let cfg = ClientConfig::from(JsClientConfig {
            base_url: Some("http://localhost:8080/api/".into()),
            print_delay_ms: None,
            timeout_secs: Some(5),
        });
        assert_eq!(cfg.base_url, "http://localhost:8080/api");
        assert_eq!(cfg.print_delay_ms, 1000);
        assert_eq!(cfg.timeout_secs, 5);
    }
}
