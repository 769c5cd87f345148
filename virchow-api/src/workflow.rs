//! Fluxos de várias etapas por trás das telas de laudo.
//!
//! A espera fica com quem chama (`tokio::time::sleep` no nativo,
//! `yew::platform::time::sleep` no navegador), então o mesmo código roda
//! nos dois lados.

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};
use virchow_core::model::{DiagnosticCode, ExamType, MaritalStatus};
use virchow_core::notice::msg;
use virchow_core::report::{CreateReportPayload, DiagnosticFetch};
use virchow_core::session::{KeyValueStore, LoginForm, Session};
use virchow_core::{Notice, Ticket};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Resultado da impressão que segue uma inclusão bem-sucedida.
#[derive(Debug, PartialEq)]
pub enum PrintOutcome {
    Ready(Vec<u8>),
    /// O laudo foi salvo; só a impressão falhou.
    Failed(ApiError),
}

#[derive(Debug, PartialEq)]
pub struct CreatedReportOutcome {
    pub report_id: i64,
    pub print: PrintOutcome,
}

impl CreatedReportOutcome {
    /// Avisos a exibir, em ordem.
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = vec![Notice::success(msg::REPORT_CREATED)];
        if let PrintOutcome::Failed(_) = self.print {
            notices.push(Notice::warning(msg::PRINT_FAILED));
        }
        notices
    }

    /// A impressão foi recusada por token expirado; o laudo está salvo mas
    /// a sessão precisa terminar.
    pub fn session_expired(&self) -> bool {
        matches!(&self.print, PrintOutcome::Failed(err) if err.is_unauthorized())
    }

    pub fn pdf(&self) -> Option<&[u8]> {
        match &self.print {
            PrintOutcome::Ready(bytes) => Some(bytes),
            PrintOutcome::Failed(_) => None,
        }
    }
}

/// Inclui um laudo, espera `delay` e busca o PDF.
///
/// Só a falha na inclusão é erro; a falha na impressão vem dentro do
/// resultado.
pub async fn create_and_print<S, F>(
    client: &ApiClient,
    payload: &CreateReportPayload,
    delay: Duration,
    sleep: S,
) -> Result<CreatedReportOutcome, ApiError>
where
    S: FnOnce(Duration) -> F,
    F: Future<Output = ()>,
{
    let created = client.create_report(payload).await?;
    info!(report_id = created.id, "report created");

    sleep(delay).await;

    let print = match client.report_pdf(created.id).await {
        Ok(bytes) => PrintOutcome::Ready(bytes),
        Err(err) => {
            warn!(report_id = created.id, %err, "report saved but printing failed");
            PrintOutcome::Failed(err)
        }
    };

    Ok(CreatedReportOutcome {
        report_id: created.id,
        print,
    })
}

/// Tipos de exame e estados civis; cada um pode falhar sozinho.
#[derive(Debug)]
pub struct ReportLookups {
    pub exam_types: Result<Vec<ExamType>, ApiError>,
    pub marital_statuses: Result<Vec<MaritalStatus>, ApiError>,
}

impl ReportLookups {
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();
        if let Err(err) = &self.exam_types {
            notices.push(err.notice(msg::EXAM_TYPES_FAILED));
        }
        if let Err(err) = &self.marital_statuses {
            notices.push(err.notice(msg::MARITAL_STATUSES_FAILED));
        }
        notices
    }
}

pub async fn load_report_lookups(client: &ApiClient) -> ReportLookups {
    let exam_types = client.exam_types().await;
    let marital_statuses = client.marital_statuses().await;
    ReportLookups {
        exam_types,
        marital_statuses,
    }
}

/// Executa a busca pedida pelo rascunho; o ticket volta junto com o
/// resultado para o rascunho descartá-lo se houve seleção mais nova.
pub async fn fetch_diagnostics(
    client: &ApiClient,
    fetch: DiagnosticFetch,
) -> (Ticket, Result<Vec<DiagnosticCode>, ApiError>) {
    (fetch.ticket, client.diagnostics(fetch.exam_type_id).await)
}

/// Valida o formulário, chama `/Auth/login` e grava a sessão.
pub async fn sign_in<S: KeyValueStore>(
    client: &ApiClient,
    session: &mut Session<S>,
    form: &LoginForm,
) -> Result<(), SignInError> {
    let request = form.to_request().map_err(SignInError::Invalid)?;
    let response = client.login(&request).await.map_err(SignInError::Api)?;
    session
        .sign_in(&response)
        .map_err(SignInError::Invalid)?;
    info!(user_id = response.user.id, "signed in");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    #[error(transparent)]
    Invalid(virchow_core::VirchowError),
    #[error(transparent)]
    Api(ApiError),
}

impl SignInError {
    pub fn notice(&self) -> Notice {
        match self {
            SignInError::Invalid(err) => Notice::error(err.to_string()),
            SignInError::Api(_) => Notice::error(msg::LOGIN_FAILED),
        }
    }
}
