//! Idade do paciente como aparece no laudo: meses até completar um ano, anos completos depois.

use std::fmt;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::VirchowError;

/// Ano de nascimento mais antigo aceito nos formulários de paciente.
pub const MIN_BIRTH_YEAR: i32 = 1900;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AgeUnit {
    Months,
    Years,
}

impl AgeUnit {
    /// Letra usada nos formulários de laudo ("M" para meses, "A" para anos).
    pub fn code(self) -> &'static str {
        match self {
            AgeUnit::Months => "M",
            AgeUnit::Years => "A",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Age {
    pub value: u32,
    pub unit: AgeUnit,
}

impl Age {
    /// Idade em `reference` de quem nasceu em `birth`.
    ///
    /// Depois do primeiro ano completo os meses restantes são descartados:
    /// 24 anos e 11 meses viram 24 anos.
    pub fn between(birth: NaiveDate, reference: NaiveDate) -> Result<Self, VirchowError> {
        if birth > reference {
            return Err(VirchowError::InvalidDateRange { birth, reference });
        }

        let mut years = reference.year() - birth.year();
        let mut months = reference.month() as i32 - birth.month() as i32;

        if months < 0 || (months == 0 && reference.day() < birth.day()) {
            years -= 1;
            months += 12;
        }
        if reference.day() < birth.day() {
            months -= 1;
        }

        let age = if years == 0 {
            Age {
                value: months.max(0) as u32,
                unit: AgeUnit::Months,
            }
        } else {
            Age {
                value: years as u32,
                unit: AgeUnit::Years,
            }
        };
        Ok(age)
    }

    /// Idade na data local de hoje.
    pub fn today(birth: NaiveDate) -> Result<Self, VirchowError> {
        Self::between(birth, Local::now().date_naive())
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.unit {
            AgeUnit::Months => "meses",
            AgeUnit::Years => "anos",
        };
        write!(f, "{} {label}", self.value)
    }
}

/// Lê uma data de nascimento digitada no formulário ou vinda do backend.
///
/// Aceita `YYYY-MM-DD`, com ou sem parte de horário
/// (`2000-06-15T00:00:00.000Z`). Texto em branco devolve `None`.
pub fn parse_birth_date(value: &str) -> Result<Option<NaiveDate>, VirchowError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let day_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| VirchowError::InvalidDate(trimmed.to_string()))
}

/// Se o ano de nascimento está entre 1900 e o ano de referência.
pub fn plausible_birth_year(birth: NaiveDate, reference: NaiveDate) -> bool {
    (MIN_BIRTH_YEAR..=reference.year()).contains(&birth.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn infant_age_is_reported_in_months() {
        let age = Age::between(date(2024, 6, 15), date(2025, 1, 10)).unwrap();
        assert_eq!(
            age,
            Age {
                value: 6,
                unit: AgeUnit::Months
            }
        );
    }

    #[test]
    fn day_before_birthday_keeps_previous_year() {
        let age = Age::between(date(2000, 6, 15), date(2025, 6, 14)).unwrap();
        assert_eq!(
            age,
            Age {
                value: 24,
                unit: AgeUnit::Years
            }
        );
    }

    #[test]
    fn birthday_completes_the_year() {
        let age = Age::between(date(2000, 6, 15), date(2025, 6, 15)).unwrap();
        assert_eq!(age.value, 25);
        assert_eq!(age.unit, AgeUnit::Years);
    }

    #[test]
    fn eleven_months_before_first_birthday() {
        let age = Age::between(date(2023, 6, 15), date(2024, 6, 10)).unwrap();
        assert_eq!(
            age,
            Age {
                value: 11,
                unit: AgeUnit::Months
            }
        );
    }

    #[test]
    fn newborn_is_zero_months() {
        let age = Age::between(date(2025, 3, 1), date(2025, 3, 1)).unwrap();
        assert_eq!(age.value, 0);
        assert_eq!(age.unit, AgeUnit::Months);
    }

    #[test]
    fn unit_is_months_only_without_full_years() {
        let birth = date(2019, 2, 28);
        let mut reference = birth;
        for _ in 0..(6 * 365) {
            let age = Age::between(birth, reference).unwrap();
            let full_years = {
                let mut y = reference.year() - birth.year();
                if (reference.month(), reference.day()) < (birth.month(), birth.day()) {
                    y -= 1;
                }
                y
            };
            assert_eq!(age.unit == AgeUnit::Months, full_years == 0, "{reference}");
            reference = reference.succ_opt().unwrap();
        }
    }

    #[test]
    fn birth_after_reference_is_rejected() {
        let err = Age::between(date(2025, 1, 2), date(2025, 1, 1)).unwrap_err();
        assert!(matches!(err, VirchowError::InvalidDateRange { .. }));
    }

    #[test]
    fn display_uses_portuguese_units() {
        let six = Age {
            value: 6,
            unit: AgeUnit::Months,
        };
        let one = Age {
            value: 1,
            unit: AgeUnit::Years,
        };
        assert_eq!(six.to_string(), "6 meses");
        assert_eq!(one.to_string(), "1 anos");
        assert_eq!(six.unit.code(), "M");
    }

    #[test]
    fn parses_backend_timestamps_and_blank_input() {
        assert_eq!(
            parse_birth_date("2000-06-15T00:00:00.000Z").unwrap(),
            Some(date(2000, 6, 15))
        );
        assert_eq!(parse_birth_date("  ").unwrap(), None);
        assert!(parse_birth_date("15/06/2000").is_err());
    }

    #[test]
    fn birth_year_window() {
        let today = date(2025, 5, 1);
        assert!(plausible_birth_year(date(1900, 1, 1), today));
        assert!(!plausible_birth_year(date(1899, 12, 31), today));
        assert!(!plausible_birth_year(date(2026, 1, 1), today));
    }
}
