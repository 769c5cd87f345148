use std::fs;
use std::time::Duration;

use serde_json::{json, Value};
use virchow_api::workflow::{fetch_diagnostics, load_report_lookups, sign_in, SignInError};
use virchow_api::{create_and_print, ApiClient, ApiError, ClientConfig, PrintOutcome};
use virchow_core::model::{ExamType, MaritalStatus};
use virchow_core::notice::msg;
use virchow_core::report::CreateReportForm;
use virchow_core::session::LoginForm;
use virchow_core::{MemoryStore, NoticeLevel, ReportDraft, Session};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn fixture(name: &str) -> Value {
    let raw = fs::read_to_string(fixture_path(name)).expect("fixture missing");
    serde_json::from_str(&raw).expect("fixture is not valid JSON")
}

fn client_for(server: &MockServer) -> ApiClient {
    let config = ClientConfig::default().with_base_url(server.uri());
    ApiClient::new(&config).expect("client")
}

fn exam_types() -> Vec<ExamType> {
    serde_json::from_value(fixture("exam_types.json")).expect("exam types")
}

fn filled_form() -> CreateReportForm {
    CreateReportForm {
        patient_name: "MARIA DAS DORES SILVA".into(),
        marital_status: Some(MaritalStatus {
            id: 2,
            description: "Casada".into(),
        }),
        sex: "F".into(),
        birth_date: "1980-04-12".into(),
        occupation: "Professora".into(),
        origin: "Recife".into(),
        requesting_physician: "Dr. Paulo".into(),
        report_number: "1024".into(),
        exam_date: "2024-03-15".into(),
        age: "43".into(),
        ..CreateReportForm::default()
    }
}

fn selected_draft() -> ReportDraft {
    let mut draft = ReportDraft::new();
    draft.set_exam_types(exam_types());
    draft.select_exam_type(1);
    draft
}

#[test]
fn create_payload_matches_golden() {
    let payload = filled_form()
        .to_payload(&selected_draft())
        .expect("form should be valid");

    let actual = serde_json::to_value(payload).expect("serialize payload");
    assert_eq!(actual, fixture("create_report_payload.json"));
}

#[tokio::test]
async fn sign_in_stores_token_and_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Auth/login"))
        .and(body_json(json!({ "login": "helena", "senha": "segredo" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture("login_response.json")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = Session::new(MemoryStore::new());
    let form = LoginForm {
        login: " helena ".into(),
        password: "segredo".into(),
    };

    sign_in(&client, &mut session, &form).await.expect("sign in");

    assert_eq!(
        session.token().as_deref(),
        Some("eyJhbGciOiJIUzI1NiJ9.c2Vzc2Fv.assinatura")
    );
    assert_eq!(session.user().map(|user| user.id), Some(7));
}

#[tokio::test]
async fn rejected_login_shows_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Auth/login"))
        .respond_with(ResponseTemplate::new(400).set_body_string("credenciais"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = Session::new(MemoryStore::new());
    let form = LoginForm {
        login: "helena".into(),
        password: "errada".into(),
    };

    let err = sign_in(&client, &mut session, &form).await.unwrap_err();
    assert!(matches!(err, SignInError::Api(_)));
    assert_eq!(err.notice().message, msg::LOGIN_FAILED);
    assert!(!session.is_signed_in());
}

#[tokio::test]
async fn short_credentials_never_reach_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = Session::new(MemoryStore::new());
    let form = LoginForm {
        login: "ab".into(),
        password: "cd".into(),
    };

    let err = sign_in(&client, &mut session, &form).await.unwrap_err();
    assert!(matches!(err, SignInError::Invalid(_)));
}

#[tokio::test]
async fn bearer_token_is_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Exame"))
        .and(header("Authorization", "Bearer abc.def"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture("exam_types.json")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).with_token(Some("abc.def".into()));
    let types = client.exam_types().await.expect("exam types");

    assert_eq!(types.len(), 2);
    assert_eq!(types[0].topics, vec!["Material", "Microscopia", "Conclusão"]);
    assert_eq!(types[1].description, None);
}

#[tokio::test]
async fn null_list_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Laudo/filter"))
        .and(body_json(json!({ "nomePaciente": "MARIA" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let filter = virchow_core::report::ReportSearchForm {
        patient_name: "maria".into(),
        report_number: String::new(),
    }
    .to_filter()
    .expect("filter");

    let reports = client.search_reports(&filter).await.expect("search");
    assert!(reports.is_empty());
}

#[tokio::test]
async fn conflict_keeps_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Paciente"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "error": "Paciente já cadastrado" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let payload = virchow_core::patient::PatientPayload {
        id: None,
        name: "MARIA DAS DORES".into(),
        marital_status: None,
        sex: "F".into(),
        birth_date: Some("1980-04-12T00:00:00.000Z".into()),
        occupation: "PROFESSORA".into(),
        origin: "RECIFE".into(),
    };

    let err = client.create_patient(&payload).await.unwrap_err();
    assert_eq!(err, ApiError::Conflict("Paciente já cadastrado".into()));
    assert_eq!(err.user_message(msg::PATIENT_CREATE_FAILED), "Paciente já cadastrado");
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/EstadoCivil"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Exame"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture("exam_types.json")))
        .mount(&server)
        .await;

    let client = client_for(&server).with_token(Some("expirado".into()));
    let lookups = load_report_lookups(&client).await;

    assert!(lookups.exam_types.is_ok());
    assert!(lookups
        .marital_statuses
        .as_ref()
        .is_err_and(ApiError::is_unauthorized));
    let notices = lookups.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, msg::MARITAL_STATUSES_FAILED);
}

#[tokio::test]
async fn created_report_is_printed_after_delay() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Laudo"))
        .and(body_json(fixture("create_report_payload.json")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 88 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Laudo/88/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let payload = filled_form().to_payload(&selected_draft()).expect("payload");

    let mut waited = None;
    let outcome = create_and_print(&client, &payload, Duration::from_millis(5), |delay| {
        waited = Some(delay);
        tokio::time::sleep(delay)
    })
    .await
    .expect("report created");

    assert_eq!(waited, Some(Duration::from_millis(5)));
    assert_eq!(outcome.report_id, 88);
    assert_eq!(outcome.pdf(), Some(&b"%PDF-1.4"[..]));
    let notices = outcome.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, msg::REPORT_CREATED);
}

#[tokio::test]
async fn print_failure_is_only_a_warning() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Laudo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 89 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Laudo/89/pdf"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let payload = filled_form().to_payload(&selected_draft()).expect("payload");

    let outcome = create_and_print(&client, &payload, Duration::ZERO, tokio::time::sleep)
        .await
        .expect("creation still succeeds");

    assert!(matches!(outcome.print, PrintOutcome::Failed(_)));
    assert!(!outcome.session_expired());
    let levels: Vec<NoticeLevel> = outcome.notices().iter().map(|notice| notice.level).collect();
    assert_eq!(levels, vec![NoticeLevel::Success, NoticeLevel::Warning]);
    assert_eq!(outcome.notices()[1].message, msg::PRINT_FAILED);
}

#[tokio::test]
async fn expired_token_while_printing_ends_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Laudo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 5 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Laudo/5/pdf"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let payload = filled_form().to_payload(&selected_draft()).expect("payload");

    let outcome = create_and_print(&client, &payload, Duration::ZERO, tokio::time::sleep)
        .await
        .expect("the report itself was created");

    assert_eq!(outcome.report_id, 5);
    assert!(matches!(outcome.print, PrintOutcome::Failed(ApiError::Unauthorized)));
    assert!(outcome.session_expired());
    assert!(outcome.pdf().is_none());
}

#[tokio::test]
async fn failed_creation_skips_printing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Laudo"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "error": "Número de laudo já existe" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let payload = filled_form().to_payload(&selected_draft()).expect("payload");

    let err = create_and_print(&client, &payload, Duration::ZERO, tokio::time::sleep)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(msg::REPORT_CREATE_FAILED), "Número de laudo já existe");
}

#[tokio::test]
async fn stale_diagnostics_are_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Diagnostico/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 10, "codigo": "C01", "conteudo": "Negativo para malignidade" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Diagnostico/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 20, "codigo": "A01", "conteudo": "Processo inflamatório crônico" }
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut draft = ReportDraft::new();
    draft.set_exam_types(exam_types());
    let first = draft.select_exam_type(1).expect("known exam type");
    let second = draft.select_exam_type(2).expect("known exam type");

    let (late_ticket, late) = fetch_diagnostics(&client, first).await;
    let (ticket, current) = fetch_diagnostics(&client, second).await;

    assert!(draft.accept_diagnostics(ticket, current.expect("diagnostics")));
    assert!(!draft.accept_diagnostics(late_ticket, late.expect("diagnostics")));
    assert_eq!(draft.diagnostics()[0].code, "A01");
}
