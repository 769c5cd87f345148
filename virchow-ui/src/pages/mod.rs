//! Páginas e as funções de formulário e tabela que compartilham.

mod login;
mod patients;
mod prints;
mod reports;

use virchow_core::model::MaritalStatus;
use virchow_core::table::{SortDirection, TableState, Tabular};
use virchow_core::ValidationErrors;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;
use yew::TargetCast;

use crate::app::AppContext;

pub use login::LoginPage;
pub use patients::{PatientEditPage, PatientRegisterPage, PatientSearchPage};
pub use prints::PrintsPage;
pub use reports::{ReportCreatePage, ReportEditPage, ReportInclusionPage};

#[derive(Properties, PartialEq)]
pub struct PageProps {
    pub ctx: AppContext,
}

fn control_value<E: TargetCast>(event: &E) -> String {
    if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
        return input.value();
    }
    if let Some(area) = event.target_dyn_into::<HtmlTextAreaElement>() {
        return area.value();
    }
    event
        .target_dyn_into::<HtmlSelectElement>()
        .map(|select| select.value())
        .unwrap_or_default()
}

/// Grava o texto digitado num campo do formulário guardado em `form`.
pub(crate) fn bind_input<F: Clone + 'static>(
    form: &UseStateHandle<F>,
    apply: fn(&mut F, String),
) -> Callback<InputEvent> {
    let form = form.clone();
    Callback::from(move |event: InputEvent| {
        let mut next = (*form).clone();
        apply(&mut next, control_value(&event));
        form.set(next);
    })
}

/// Igual a [`bind_input`] para controles que só disparam `change` (selects, datas).
pub(crate) fn bind_change<F: Clone + 'static>(
    form: &UseStateHandle<F>,
    apply: fn(&mut F, String),
) -> Callback<Event> {
    let form = form.clone();
    Callback::from(move |event: Event| {
        let mut next = (*form).clone();
        apply(&mut next, control_value(&event));
        form.set(next);
    })
}

pub(crate) fn bind_marital_status<F: Clone + 'static>(
    form: &UseStateHandle<F>,
    statuses: &[MaritalStatus],
    apply: fn(&mut F, Option<MaritalStatus>),
) -> Callback<Event> {
    let form = form.clone();
    let statuses = statuses.to_vec();
    Callback::from(move |event: Event| {
        let value = control_value(&event);
        let selected = statuses
            .iter()
            .find(|status| status.id.to_string() == value)
            .cloned();
        let mut next = (*form).clone();
        apply(&mut next, selected);
        form.set(next);
    })
}

pub(crate) fn field(label: &str, control: Html, error: Option<&'static str>) -> Html {
    html! {
        <div class="form-field">
            <label>{ label.to_string() }</label>
            { control }
            { error.map(|message| html! { <span class="field-error">{ message }</span> }).unwrap_or_default() }
        </div>
    }
}

pub(crate) fn text_field(
    label: &str,
    value: &str,
    oninput: Callback<InputEvent>,
    errors: &ValidationErrors,
    key: &str,
) -> Html {
    field(
        label,
        html! { <input type="text" value={value.to_string()} {oninput} /> },
        errors.for_field(key),
    )
}

pub(crate) fn date_field(
    label: &str,
    value: &str,
    onchange: Callback<Event>,
    errors: &ValidationErrors,
    key: &str,
) -> Html {
    field(
        label,
        html! { <input type="date" value={value.to_string()} {onchange} /> },
        errors.for_field(key),
    )
}

pub(crate) fn marital_select(
    statuses: &[MaritalStatus],
    selected: Option<&MaritalStatus>,
    onchange: Callback<Event>,
) -> Html {
    let selected_id = selected.map(|status| status.id);
    html! {
        <select {onchange}>
            <option value="" selected={selected_id.is_none()}>{"Selecione"}</option>
            {
                for statuses.iter().map(|status| html! {
                    <option
                        value={status.id.to_string()}
                        selected={selected_id == Some(status.id)}
                    >
                        { status.description.clone() }
                    </option>
                })
            }
        </select>
    }
}

/// Mensagens do formulário (erros que não são de um campo só).
pub(crate) fn form_error(errors: &ValidationErrors) -> Html {
    errors
        .for_field("form")
        .map(|message| html! { <p class="field-error">{ message }</p> })
        .unwrap_or_default()
}

pub(crate) struct Column {
    pub key: &'static str,
    pub label: &'static str,
}

/// Tabela de `rows` com filtro, ordenação e paginação.
///
/// `actions` desenha a última célula de cada linha; `row_class` permite
/// marcar linhas (por exemplo, laudos invalidados).
pub(crate) fn render_table<T, A, C>(
    rows: &[T],
    state: &UseStateHandle<TableState>,
    columns: &[Column],
    actions: A,
    row_class: C,
) -> Html
where
    T: Tabular,
    A: Fn(&T) -> Html,
    C: Fn(&T) -> Classes,
{
    let page = state.apply(rows);

    let on_query = {
        let state = state.clone();
        Callback::from(move |event: InputEvent| {
            let mut next = (*state).clone();
            next.set_query(control_value(&event));
            state.set(next);
        })
    };

    let on_previous = {
        let state = state.clone();
        Callback::from(move |_| {
            let mut next = (*state).clone();
            next.previous_page();
            state.set(next);
        })
    };

    let on_next = {
        let state = state.clone();
        let last = page.page_count - 1;
        Callback::from(move |_| {
            let mut next = (*state).clone();
            next.next_page();
            next.page_index = next.page_index.min(last);
            state.set(next);
        })
    };

    let headers = columns.iter().map(|column| {
        let state = state.clone();
        let key = column.key;
        let sort = state.sort_direction(key).map(|direction| match direction {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        });
        let onclick = Callback::from(move |_| {
            let mut next = (*state).clone();
            next.toggle_sort(key);
            state.set(next);
        });
        html! { <th data-sort={sort} {onclick}>{ column.label }</th> }
    });

    let body = if page.rows.is_empty() {
        html! {
            <tr><td class="table-empty" colspan={(columns.len() + 1).to_string()}>{"Nenhum registro."}</td></tr>
        }
    } else {
        html! {
            for page.rows.iter().map(|row| html! {
                <tr class={row_class(row)}>
                    { for columns.iter().map(|column| html! { <td>{ row.cell(column.key).display().into_owned() }</td> }) }
                    <td>{ actions(row) }</td>
                </tr>
            })
        }
    };

    html! {
        <div class="page-card">
            <div class="table-toolbar">
                <input
                    type="search"
                    placeholder="Filtrar"
                    value={state.query.clone()}
                    oninput={on_query}
                    aria-label="Filtrar resultados"
                />
                <span>{ format!("{} registro(s)", page.matching) }</span>
            </div>
            <table class="data-table">
                <thead>
                    <tr>
                        { for headers }
                        <th></th>
                    </tr>
                </thead>
                <tbody>{ body }</tbody>
            </table>
            <div class="table-pager">
                <button type="button" class="btn is-secondary" onclick={on_previous} disabled={page.page_index == 0}>{"Anterior"}</button>
                <span>{ format!("Página {} de {}", page.page_index + 1, page.page_count) }</span>
                <button type="button" class="btn is-secondary" onclick={on_next} disabled={page.page_index + 1 >= page.page_count}>{"Próxima"}</button>
            </div>
        </div>
    }
}
