//! Filtro, ordenação e paginação das telas de listagem.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::model::{DiagnosticCode, Patient, Report};

/// Valor de célula usado para exibir, filtrar e ordenar.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Cell<'a> {
    Empty,
    Number(i64),
    Text(Cow<'a, str>),
}

impl Cell<'_> {
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Cell::Empty => Cow::Borrowed(""),
            Cell::Number(number) => Cow::Owned(number.to_string()),
            Cell::Text(text) => Cow::Borrowed(text.as_ref()),
        }
    }
}

fn text<'a>(value: &'a str) -> Cell<'a> {
    Cell::Text(Cow::Borrowed(value))
}

fn optional_text(value: &Option<String>) -> Cell<'_> {
    value.as_deref().map(text).unwrap_or(Cell::Empty)
}

/// Linha que pode aparecer numa tabela de listagem.
pub trait Tabular {
    const COLUMNS: &'static [&'static str];

    fn cell(&self, column: &str) -> Cell<'_>;
}

impl Tabular for DiagnosticCode {
    const COLUMNS: &'static [&'static str] = &["codigo", "conteudo"];

    fn cell(&self, column: &str) -> Cell<'_> {
        match column {
            "codigo" => text(&self.code),
            "conteudo" => text(&self.content),
            _ => Cell::Empty,
        }
    }
}

impl Tabular for Patient {
    const COLUMNS: &'static [&'static str] = &["nome", "datNascimento", "sexo"];

    fn cell(&self, column: &str) -> Cell<'_> {
        match column {
            "nome" => text(&self.name),
            "datNascimento" => self
                .birth_date
                .as_deref()
                .map(|raw| text(raw.get(..10).unwrap_or(raw)))
                .unwrap_or(Cell::Empty),
            "sexo" => optional_text(&self.sex),
            _ => Cell::Empty,
        }
    }
}

impl Tabular for Report {
    const COLUMNS: &'static [&'static str] = &["nroLaudo", "nomePaciente", "datExame"];

    fn cell(&self, column: &str) -> Cell<'_> {
        match column {
            "nroLaudo" => self.number.map(Cell::Number).unwrap_or(Cell::Empty),
            "nomePaciente" => optional_text(&self.patient_name),
            "datExame" => self
                .exam_date
                .as_deref()
                .map(|raw| text(raw.get(..10).unwrap_or(raw)))
                .unwrap_or(Cell::Empty),
            _ => Cell::Empty,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableState {
    pub query: String,
    pub sort: Option<SortSpec>,
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self::with_page_size(10)
    }
}

/// Uma página de linhas filtradas e ordenadas.
#[derive(Debug, PartialEq)]
pub struct TablePage<'a, T> {
    pub rows: Vec<&'a T>,
    pub matching: usize,
    pub page_index: usize,
    pub page_count: usize,
}

impl TableState {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            query: String::new(),
            sort: None,
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page_index = 0;
    }

    /// Crescente primeiro; cada clique na mesma coluna inverte.
    pub fn toggle_sort(&mut self, column: &str) {
        let direction = match &self.sort {
            Some(spec) if spec.column == column && spec.direction == SortDirection::Ascending => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortSpec {
            column: column.to_string(),
            direction,
        });
    }

    pub fn sort_direction(&self, column: &str) -> Option<SortDirection> {
        self.sort
            .as_ref()
            .filter(|spec| spec.column == column)
            .map(|spec| spec.direction)
    }

    pub fn next_page(&mut self) {
        self.page_index += 1;
    }

    pub fn previous_page(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    pub fn apply<'a, T: Tabular>(&self, rows: &'a [T]) -> TablePage<'a, T> {
        let needle = self.query.trim().to_lowercase();
        let mut matching: Vec<&T> = rows
            .iter()
            .filter(|row| needle.is_empty() || row_matches(*row, &needle))
            .collect();

        if let Some(spec) = &self.sort {
            matching.sort_by(|a, b| {
                let ordering = a.cell(&spec.column).cmp(&b.cell(&spec.column));
                match spec.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        // Estado desserializado pode vir com página de tamanho zero.
        let page_size = self.page_size.max(1);
        let total = matching.len();
        let page_count = total.div_ceil(page_size).max(1);
        let page_index = self.page_index.min(page_count - 1);
        let rows = matching
            .into_iter()
            .skip(page_index * page_size)
            .take(page_size)
            .collect();

        TablePage {
            rows,
            matching: total,
            page_index,
            page_count,
        }
    }
}

fn row_matches<T: Tabular>(row: &T, needle: &str) -> bool {
    T::COLUMNS.iter().any(|column| {
        row.cell(column)
            .display()
            .to_lowercase()
            .contains(needle)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes() -> Vec<DiagnosticCode> {
        [("B02", "Carcinoma"), ("A01", "Negativo"), ("C10", "Inflamatório")]
            .into_iter()
            .enumerate()
            .map(|(id, (code, content))| DiagnosticCode {
                id: id as i64,
                code: code.into(),
                content: content.into(),
            })
            .collect()
    }

    #[test]
    fn filters_case_insensitively_across_columns() {
        let rows = codes();
        let mut state = TableState::with_page_size(500);
        state.set_query("neg");
        let page = state.apply(&rows);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].code, "A01");

        state.set_query("c10");
        assert_eq!(state.apply(&rows).rows[0].content, "Inflamatório");
    }

    #[test]
    fn sort_toggles_between_directions() {
        let rows = codes();
        let mut state = TableState::with_page_size(500);
        state.toggle_sort("codigo");
        let page = state.apply(&rows);
        let ascending: Vec<&str> = page.rows.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(ascending, ["A01", "B02", "C10"]);

        state.toggle_sort("codigo");
        assert_eq!(state.sort_direction("codigo"), Some(SortDirection::Descending));
        assert_eq!(state.apply(&rows).rows[0].code, "C10");

        state.toggle_sort("conteudo");
        assert_eq!(state.sort_direction("conteudo"), Some(SortDirection::Ascending));
    }

    #[test]
    fn report_numbers_sort_numerically() {
        let rows: Vec<Report> = [10, 9, 100]
            .into_iter()
            .map(|number| Report {
                id: number,
                number: Some(number),
                ..Report::default()
            })
            .collect();
        let mut state = TableState::default();
        state.toggle_sort("nroLaudo");
        let page = state.apply(&rows);
        let numbers: Vec<i64> = page.rows.iter().filter_map(|r| r.number).collect();
        assert_eq!(numbers, [9, 10, 100]);
    }

    #[test]
    fn pagination_clamps_to_last_page() {
        let rows = codes();
        let mut state = TableState::with_page_size(2);
        state.page_index = 7;
        let page = state.apply(&rows);
        assert_eq!(page.page_count, 2);
        assert_eq!(page.page_index, 1);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.matching, 3);
    }

    #[test]
    fn stored_zero_page_size_shows_one_row_per_page() {
        let rows = codes();
        let state: TableState = serde_json::from_str(
            r#"{"query": "", "sort": null, "page_index": 1, "page_size": 0}"#,
        )
        .unwrap();
        let page = state.apply(&rows);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.page_index, 1);
        assert_eq!(page.rows.len(), 1);
    }

    #[test]
    fn empty_table_has_one_page() {
        let rows: Vec<DiagnosticCode> = Vec::new();
        let page = TableState::default().apply(&rows);
        assert_eq!(page.page_count, 1);
        assert!(page.rows.is_empty());
    }
}
