//! Páginas do cliente e seus caminhos de URL.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    PatientSearch,
    PatientRegister,
    PatientEdit,
    ReportInclusion,
    ReportCreate,
    ReportEdit,
    Prints,
    NotFound,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Login,
        Route::PatientSearch,
        Route::PatientRegister,
        Route::PatientEdit,
        Route::ReportInclusion,
        Route::ReportCreate,
        Route::ReportEdit,
        Route::Prints,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::PatientSearch => "/cadastropaciente",
            Route::PatientRegister => "/cadastrarpaciente",
            Route::PatientEdit => "/editarpaciente",
            Route::ReportInclusion => "/incluirlaudo",
            Route::ReportCreate => "/pedidolaudo",
            Route::ReportEdit => "/editarlaudo",
            Route::Prints => "/impressoes",
            Route::NotFound => "/404",
        }
    }

    /// Ignora maiúsculas, barra final, query e fragmento.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Route::Login;
        }
        Route::ALL
            .into_iter()
            .find(|route| route.path().eq_ignore_ascii_case(trimmed))
            .unwrap_or(Route::NotFound)
    }

    pub fn requires_session(self) -> bool {
        !matches!(self, Route::Login | Route::NotFound)
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::PatientSearch => "PACIENTES",
            Route::PatientRegister => "CADASTRAR PACIENTE",
            Route::PatientEdit => "EDITAR PACIENTE",
            Route::ReportInclusion => "INCLUIR LAUDO",
            Route::ReportCreate => "NOVO LAUDO",
            Route::ReportEdit => "EDITAR LAUDO",
            Route::Prints => "IMPRESSOS",
            Route::NotFound => "Página não encontrada",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_round_trips_through_its_path() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }

    #[test]
    fn paths_are_normalized() {
        assert_eq!(Route::from_path("/editarLaudo"), Route::ReportEdit);
        assert_eq!(Route::from_path("/impressoes/?page=2"), Route::Prints);
        assert_eq!(Route::from_path(""), Route::Login);
        assert_eq!(Route::from_path("/admin"), Route::NotFound);
    }

    #[test]
    fn only_login_is_public() {
        assert!(!Route::Login.requires_session());
        assert!(Route::Prints.requires_session());
    }
}
