//! Chamadas tipadas ao backend REST do Virchow.

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use virchow_core::model::{
    CreatedReport, DiagnosticCode, ExamType, InvalidateRequest, LoginRequest, LoginResponse,
    MaritalStatus, Patient, Report,
};
use virchow_core::patient::{PatientFilter, PatientPayload};
use virchow_core::report::{CreateReportPayload, ReportFilter, UpdateReportPayload};

use crate::config::ClientConfig;
use crate::error::ApiError;

/// Cliente HTTP ligado a uma URL base e, opcionalmente, a um token bearer.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_secs(config.timeout_secs));
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// O mesmo cliente, enviando `Authorization: Bearer {token}` quando houver token.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|token| !token.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = self.send(self.json_request(Method::POST, "/Auth/login", request)).await?;
        read_json(response).await
    }

    pub async fn exam_types(&self) -> Result<Vec<ExamType>, ApiError> {
        self.get_list("/Exame").await
    }

    pub async fn marital_statuses(&self) -> Result<Vec<MaritalStatus>, ApiError> {
        self.get_list("/EstadoCivil").await
    }

    pub async fn diagnostics(&self, exam_type_id: i64) -> Result<Vec<DiagnosticCode>, ApiError> {
        self.get_list(&format!("/Diagnostico/{exam_type_id}")).await
    }

    pub async fn create_patient(&self, payload: &PatientPayload) -> Result<(), ApiError> {
        self.send(self.json_request(Method::POST, "/Paciente", payload))
            .await
            .map(drop)
    }

    pub async fn update_patient(&self, id: i64, payload: &PatientPayload) -> Result<(), ApiError> {
        self.send(self.json_request(Method::PUT, &format!("/Paciente/{id}"), payload))
            .await
            .map(drop)
    }

    pub async fn search_patients(&self, filter: &PatientFilter) -> Result<Vec<Patient>, ApiError> {
        let response = self
            .send(self.json_request(Method::POST, "/Paciente/filter", filter))
            .await?;
        read_list(response).await
    }

    pub async fn create_report(
        &self,
        payload: &CreateReportPayload,
    ) -> Result<CreatedReport, ApiError> {
        let response = self
            .send(self.json_request(Method::POST, "/Laudo", payload))
            .await?;
        read_json(response).await
    }

    pub async fn update_report(
        &self,
        id: i64,
        payload: &UpdateReportPayload,
    ) -> Result<(), ApiError> {
        self.send(self.json_request(Method::PUT, &format!("/Laudo/{id}"), payload))
            .await
            .map(drop)
    }

    /// Invalida (exclusão lógica) um laudo em nome de `user_id`.
    pub async fn invalidate_report(&self, id: i64, user_id: i64) -> Result<(), ApiError> {
        let body = InvalidateRequest { user_id };
        self.send(self.json_request(Method::PATCH, &format!("/Laudo/Invalidar/{id}"), &body))
            .await
            .map(drop)
    }

    pub async fn search_reports(&self, filter: &ReportFilter) -> Result<Vec<Report>, ApiError> {
        let response = self
            .send(self.json_request(Method::POST, "/Laudo/filter", filter))
            .await?;
        read_list(response).await
    }

    /// PDF gerado de um laudo.
    pub async fn report_pdf(&self, id: i64) -> Result<Vec<u8>, ApiError> {
        let response = self
            .send(self.request(Method::GET, &format!("/Laudo/{id}/pdf")))
            .await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        read_list(response).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "backend request");
        let builder = self.http.request(method, format!("{}{path}", self.base_url));
        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }

    fn json_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> RequestBuilder {
        self.request(method, path).json(body)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "backend rejected request");
        Err(ApiError::from_status(status, body))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|err| ApiError::Decode(err.to_string()))
}

/// As listagens respondem `null` em vez de `[]` quando nada é encontrado.
async fn read_list<T: DeserializeOwned>(response: Response) -> Result<Vec<T>, ApiError> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str::<Option<Vec<T>>>(&text)
        .map(Option::unwrap_or_default)
        .map_err(|err| ApiError::Decode(err.to_string()))
}
