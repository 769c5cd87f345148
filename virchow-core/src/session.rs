//! Usuário logado, paciente e laudo selecionados, guardados como JSON num
//! armazenamento chave-valor (o localStorage do navegador na interface).

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::form::ValidationErrors;
use crate::model::{LoginRequest, LoginResponse, Patient, Report, User};
use crate::route::Route;
use crate::VirchowError;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "usuario";
/// Versões antigas guardavam o usuário nesta chave.
pub const LEGACY_USER_KEY: &str = "user";
pub const PATIENT_KEY: &str = "patient";
pub const REPORT_KEY: &str = "laudo";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), VirchowError>;
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), VirchowError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// `primary` quando existe; senão as entradas ficam em memória enquanto o
/// processo durar.
#[derive(Debug, Clone)]
pub struct FallbackStore<S> {
    primary: Option<S>,
    memory: MemoryStore,
}

impl<S: KeyValueStore> FallbackStore<S> {
    pub fn new(primary: Option<S>) -> Self {
        Self {
            primary,
            memory: MemoryStore::new(),
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.primary.is_some()
    }
}

impl<S: KeyValueStore> KeyValueStore for FallbackStore<S> {
    fn get(&self, key: &str) -> Option<String> {
        match &self.primary {
            Some(primary) => primary.get(key),
            None => self.memory.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), VirchowError> {
        match &mut self.primary {
            Some(primary) => primary.set(key, value),
            None => self.memory.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) {
        match &mut self.primary {
            Some(primary) => primary.remove(key),
            None => self.memory.remove(key),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session<S> {
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    pub fn is_signed_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn user(&self) -> Option<User> {
        self.read_json(USER_KEY)
            .or_else(|| self.read_json(LEGACY_USER_KEY))
    }

    pub fn patient(&self) -> Option<Patient> {
        self.read_json(PATIENT_KEY)
    }

    pub fn report(&self) -> Option<Report> {
        self.read_json(REPORT_KEY)
    }

    pub fn sign_in(&mut self, login: &LoginResponse) -> Result<(), VirchowError> {
        self.store.set(TOKEN_KEY, &login.token)?;
        self.write_json(USER_KEY, &login.user)
    }

    pub fn select_patient(&mut self, patient: &Patient) -> Result<(), VirchowError> {
        self.write_json(PATIENT_KEY, patient)
    }

    pub fn select_report(&mut self, report: &Report) -> Result<(), VirchowError> {
        self.write_json(REPORT_KEY, report)
    }

    pub fn clear_report(&mut self) {
        self.store.remove(REPORT_KEY);
    }

    pub fn sign_out(&mut self) {
        for key in [TOKEN_KEY, USER_KEY, LEGACY_USER_KEY, PATIENT_KEY, REPORT_KEY] {
            self.store.remove(key);
        }
        tracing::info!("session cleared");
    }

    /// Resposta a um 401: descarta a sessão e volta ao login.
    pub fn handle_unauthorized(&mut self) -> Route {
        self.sign_out();
        Route::Login
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, %err, "ignoring unreadable session entry");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), VirchowError> {
        let raw = serde_json::to_string(value)
            .map_err(|err| VirchowError::Serialization(err.to_string()))?;
        self.store.set(key, &raw)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub login: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_min_chars("login", &self.login, 4, "Insira seu usuário.");
        errors.require_min_chars("password", &self.password, 4, "Insira sua senha.");
        errors
    }

    pub fn to_request(&self) -> Result<LoginRequest, VirchowError> {
        self.validate().into_result()?;
        Ok(LoginRequest {
            login: self.login.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_response() -> LoginResponse {
        LoginResponse {
            token: "abc.def".into(),
            user: User {
                id: 9,
                name: Some("Ana".into()),
                login: Some("ana".into()),
            },
        }
    }

    #[test]
    fn sign_in_persists_token_and_user() {
        let mut session = Session::new(MemoryStore::new());
        session.sign_in(&login_response()).unwrap();

        assert_eq!(session.token().as_deref(), Some("abc.def"));
        assert_eq!(session.user().unwrap().id, 9);
        assert!(session.is_signed_in());
    }

    #[test]
    fn unauthorized_clears_everything() {
        let mut session = Session::new(MemoryStore::new());
        session.sign_in(&login_response()).unwrap();
        session
            .select_patient(&Patient {
                id: 1,
                name: "X".into(),
                ..Patient::default()
            })
            .unwrap();

        assert_eq!(session.handle_unauthorized(), Route::Login);
        assert!(session.store().is_empty());
        assert!(session.patient().is_none());
    }

    #[test]
    fn corrupt_entries_read_as_absent() {
        let mut store = MemoryStore::new();
        store.set(PATIENT_KEY, "{not json").unwrap();
        let session = Session::new(store);
        assert!(session.patient().is_none());
    }

    #[test]
    fn legacy_user_key_is_still_read() {
        let mut store = MemoryStore::new();
        store.set(LEGACY_USER_KEY, r#"{"id": 4}"#).unwrap();
        let session = Session::new(store);
        assert_eq!(session.user().map(|user| user.id), Some(4));
    }

    #[test]
    fn session_without_primary_store_still_signs_in() {
        let mut session = Session::new(FallbackStore::<MemoryStore>::new(None));
        assert!(!session.store().is_persistent());

        session.sign_in(&login_response()).unwrap();
        assert!(session.is_signed_in());
        assert_eq!(session.user().map(|user| user.id), Some(9));

        session.sign_out();
        assert!(!session.is_signed_in());
    }

    #[test]
    fn fallback_store_prefers_the_primary() {
        let mut store = FallbackStore::new(Some(MemoryStore::new()));
        store.set(TOKEN_KEY, "abc").unwrap();
        let primary = store.primary.as_ref().unwrap();
        assert_eq!(primary.get(TOKEN_KEY).as_deref(), Some("abc"));
        assert!(store.memory.is_empty());
    }

    #[test]
    fn login_form_requires_four_characters() {
        let form = LoginForm {
            login: "ana".into(),
            password: "1234".into(),
        };
        let errors = form.validate();
        assert_eq!(errors.for_field("login"), Some("Insira seu usuário."));
        assert_eq!(errors.for_field("password"), None);
    }
}
