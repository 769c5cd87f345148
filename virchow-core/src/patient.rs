//! Formulários de cadastro, edição e busca de pacientes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::age::{parse_birth_date, plausible_birth_year};
use crate::form::{midnight_utc_or_null, parse_form_date, present, upper_or_empty, ValidationErrors};
use crate::model::{MaritalStatus, Patient};
use crate::notice::msg;
use crate::VirchowError;

/// Corpo de `POST /Paciente` e `PUT /Paciente/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientPayload {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "estadoCivil")]
    pub marital_status: Option<MaritalStatus>,
    #[serde(rename = "sexo")]
    pub sex: String,
    #[serde(rename = "datNascimento")]
    pub birth_date: Option<String>,
    #[serde(rename = "profissao")]
    pub occupation: String,
    #[serde(rename = "procedencia")]
    pub origin: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterPatientForm {
    pub name: String,
    pub marital_status: Option<MaritalStatus>,
    pub sex: String,
    pub birth_date: String,
    pub occupation: String,
    pub origin: String,
}

impl RegisterPatientForm {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_min_chars("name", &self.name, 8, "Insira o nome do paciente.");
        errors.require_min_chars("sex", &self.sex, 1, "Insira seu sexo.");
        errors.require_min_chars(
            "birth_date",
            &self.birth_date,
            10,
            "Insira a data de nascimento.",
        );
        errors.require_min_chars("occupation", &self.occupation, 10, "Insira a profissão.");
        errors.require_min_chars("origin", &self.origin, 4, "Insira a procedência.");
        errors
    }

    pub fn to_payload(&self, today: NaiveDate) -> Result<PatientPayload, VirchowError> {
        self.validate().into_result()?;
        check_birth_date(&self.birth_date, today)?;

        Ok(PatientPayload {
            id: None,
            name: upper_or_empty(&self.name),
            marital_status: self.marital_status.clone(),
            sex: self.sex.trim().to_string(),
            birth_date: midnight_utc_or_null(&self.birth_date),
            occupation: upper_or_empty(&self.occupation),
            origin: upper_or_empty(&self.origin),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditPatientForm {
    pub name: String,
    pub marital_status: Option<MaritalStatus>,
    pub sex: String,
    pub birth_date: String,
    pub occupation: String,
    pub origin: String,
}

impl EditPatientForm {
    pub fn from_patient(patient: &Patient) -> Self {
        Self {
            name: patient.name.clone(),
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
        }
    }

    /// Se o formulário ainda tem exatamente o que está cadastrado em `patient`.
    pub fn is_unchanged(&self, patient: &Patient) -> bool {
        *self == Self::from_patient(patient)
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require_min_chars("name", &self.name, 10, "Insira o nome do paciente.");
        if self.marital_status.is_none() {
            errors.push("marital_status", "Selecione o estado civil.");
        }
        errors.require_min_chars("sex", &self.sex, 1, "Insira seu sexo.");
        errors
    }

    /// Corpo de `PUT /Paciente/{id}`. A data de nascimento vai como digitada.
    pub fn to_payload(
        &self,
        patient: &Patient,
        today: NaiveDate,
    ) -> Result<PatientPayload, VirchowError> {
        self.validate().into_result()?;
        if self.is_unchanged(patient) {
            let mut errors = ValidationErrors::new();
            errors.push("form", msg::PATIENT_UNCHANGED);
            return Err(errors.into());
        }
        check_birth_date(&self.birth_date, today)?;

        Ok(PatientPayload {
            id: Some(patient.id),
            name: upper_or_empty(&self.name),
            marital_status: self.marital_status.clone(),
            sex: self.sex.trim().to_string(),
            birth_date: present(&self.birth_date).map(str::to_string),
            occupation: upper_or_empty(&self.occupation),
            origin: upper_or_empty(&self.origin),
        })
    }
}

/// Busca de paciente como digitada nas telas de pesquisa e de inclusão de laudo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientSearchForm {
    pub name: String,
    pub birth_date: String,
    pub health_unit: String,
}

/// Corpo de `POST /Paciente/filter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientFilter {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "datNascimento")]
    pub birth_date: Option<String>,
}

impl PatientSearchForm {
    pub fn to_filter(&self) -> PatientFilter {
        PatientFilter {
            name: self.name.trim().to_uppercase(),
            birth_date: present(&self.birth_date).map(str::to_string),
        }
    }

    /// A busca da inclusão de laudo não lista todos os pacientes.
    pub fn to_inclusion_filter(&self) -> Result<PatientFilter, VirchowError> {
        let has_name = self.name.trim().chars().count() > 2;
        if !has_name && present(&self.birth_date).is_none() && present(&self.health_unit).is_none()
        {
            let mut errors = ValidationErrors::new();
            errors.push("form", msg::SEARCH_NEEDS_CRITERIA);
            return Err(errors.into());
        }
        Ok(self.to_filter())
    }
}

fn check_birth_date(raw: &str, today: NaiveDate) -> Result<(), VirchowError> {
    if present(raw).is_none() {
        return Ok(());
    }
    let in_range = parse_form_date(raw)
        .or(parse_birth_date(raw).ok().flatten())
        .is_some_and(|birth| plausible_birth_year(birth, today));
    if in_range {
        Ok(())
    } else {
        let mut errors = ValidationErrors::new();
        errors.push("birth_date", msg::BIRTH_DATE_OUT_OF_RANGE);
        Err(errors.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    fn registration() -> RegisterPatientForm {
        RegisterPatientForm {
            name: "maria das dores".into(),
            marital_status: Some(MaritalStatus {
                id: 1,
                description: "Solteiro".into(),
            }),
            sex: "F".into(),
            birth_date: "1990-03-04".into(),
            occupation: "professora primária".into(),
            origin: "recife".into(),
        }
    }

    #[test]
    fn registration_uppercases_and_suffixes_birth_date() {
        let payload = registration().to_payload(today()).unwrap();
        assert_eq!(payload.name, "MARIA DAS DORES");
        assert_eq!(payload.occupation, "PROFESSORA PRIMÁRIA");
        assert_eq!(payload.origin, "RECIFE");
        assert_eq!(payload.birth_date.as_deref(), Some("1990-03-04T00:00:00.000Z"));

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["estadoCivil"]["descricao"], "Solteiro");
    }

    #[test]
    fn registration_rejects_implausible_birth_year() {
        let form = RegisterPatientForm {
            birth_date: "1850-01-01".into(),
            ..registration()
        };
        let err = form.to_payload(today()).unwrap_err();
        let VirchowError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.for_field("birth_date"), Some(msg::BIRTH_DATE_OUT_OF_RANGE));
    }

    #[test]
    fn edit_refuses_unchanged_patient() {
        let patient = Patient {
            id: 3,
            name: "MARIA DAS DORES".into(),
            sex: Some("F".into()),
            birth_date: Some("1990-03-04T00:00:00".into()),
            marital_status: Some(MaritalStatus {
                id: 1,
                description: "Solteiro".into(),
            }),
            occupation: Some("PROFESSORA".into()),
            origin: Some("RECIFE".into()),
        };
        let mut form = EditPatientForm::from_patient(&patient);
        assert!(form.is_unchanged(&patient));
        assert!(form.to_payload(&patient, today()).is_err());

        form.origin = "olinda".into();
        let payload = form.to_payload(&patient, today()).unwrap();
        assert_eq!(payload.id, Some(3));
        assert_eq!(payload.origin, "OLINDA");
        assert_eq!(payload.birth_date.as_deref(), Some("1990-03-04"));
    }

    #[test]
    fn inclusion_search_needs_a_criterion() {
        let empty = PatientSearchForm {
            name: "ab".into(),
            ..PatientSearchForm::default()
        };
        assert!(empty.to_inclusion_filter().is_err());

        let by_birth = PatientSearchForm {
            birth_date: "1990-03-04".into(),
            ..PatientSearchForm::default()
        };
        let filter = by_birth.to_inclusion_filter().unwrap();
        assert_eq!(filter.name, "");
        assert_eq!(filter.birth_date.as_deref(), Some("1990-03-04"));
    }

    #[test]
    fn filter_sends_null_birth_date_when_blank() {
        let form = PatientSearchForm {
            name: "joana".into(),
            ..PatientSearchForm::default()
        };
        let json = serde_json::to_value(form.to_filter()).unwrap();
        assert_eq!(json["nome"], "JOANA");
        assert!(json["datNascimento"].is_null());
    }
}
