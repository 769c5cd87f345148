use std::rc::Rc;

use virchow_core::model::Report;
use virchow_core::notice::msg;
use virchow_core::report::{ReportFilter, ReportSearchForm};
use virchow_core::table::TableState;
use virchow_core::{Notice, Route, ValidationErrors, VirchowError};
use web_sys::console;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::{bind_input, render_table, text_field, Column, PageProps};
use crate::app::AppContext;
use crate::pdf::open_pdf;

const REPORT_COLUMNS: [Column; 3] = [
    Column {
        key: "nroLaudo",
        label: "Nº Laudo",
    },
    Column {
        key: "nomePaciente",
        label: "Paciente",
    },
    Column {
        key: "datExame",
        label: "Data exame",
    },
];

fn search(
    ctx: AppContext,
    filter: ReportFilter,
    results: UseStateHandle<Rc<Vec<Report>>>,
    loading: UseStateHandle<bool>,
) {
    loading.set(true);
    spawn_local(async move {
        match ctx.client().search_reports(&filter).await {
            Ok(found) => {
                if found.is_empty() {
                    ctx.notify(Notice::warning(msg::REPORTS_NOT_FOUND));
                }
                results.set(Rc::new(found));
            }
            Err(err) => ctx.fail(err, msg::REPORTS_SEARCH_FAILED),
        }
        loading.set(false);
    });
}

/// Busca de laudos com as ações imprimir, editar e invalidar.
#[function_component(PrintsPage)]
pub fn prints_page(props: &PageProps) -> Html {
    let ctx = &props.ctx;
    let form = use_state(ReportSearchForm::default);
    let errors = use_state(ValidationErrors::new);
    let last_filter = use_state(|| None::<ReportFilter>);
    let results = use_state(|| Rc::new(Vec::<Report>::new()));
    let table = use_state(TableState::default);
    let loading = use_state(|| false);
    let printing = use_state(|| false);
    let pending_invalidation = use_state(|| None::<Report>);

    let onsubmit = {
        let ctx = ctx.clone();
        let form = form.clone();
        let errors = errors.clone();
        let last_filter = last_filter.clone();
        let results = results.clone();
        let loading = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let filter = match form.to_filter() {
                Ok(filter) => filter,
                Err(VirchowError::Validation(found)) => {
                    errors.set(found);
                    return;
                }
                Err(err) => {
                    ctx.notify(Notice::error(err.to_string()));
                    return;
                }
            };
            errors.set(ValidationErrors::new());
            last_filter.set(Some(filter.clone()));
            search(ctx.clone(), filter, results.clone(), loading.clone());
        })
    };

    let actions = |report: &Report| {
        let on_print = {
            let ctx = ctx.clone();
            let printing = printing.clone();
            let id = report.id;
            Callback::from(move |_| {
                let ctx = ctx.clone();
                let printing = printing.clone();
                printing.set(true);
                spawn_local(async move {
                    match ctx.client().report_pdf(id).await {
                        Ok(pdf) => {
                            if let Err(err) = open_pdf(&pdf) {
                                console::error_1(&err);
                                ctx.notify(Notice::error(msg::PRINT_FAILED));
                            }
                        }
                        Err(err) => ctx.fail(err, msg::PRINT_FAILED),
                    }
                    printing.set(false);
                });
            })
        };

        if report.is_invalidated() {
            return html! {
                <div class="row-actions">
                    <button type="button" class="btn is-secondary" onclick={on_print} disabled={*printing}>{"Imprimir"}</button>
                    <span class="tag">{"Invalidado"}</span>
                </div>
            };
        }

        let on_edit = {
            let ctx = ctx.clone();
            let report = report.clone();
            Callback::from(move |_| {
                let stored = ctx.session.borrow_mut().select_report(&report);
                match stored {
                    Ok(()) => ctx.navigate(Route::ReportEdit),
                    Err(err) => ctx.notify(Notice::error(err.to_string())),
                }
            })
        };
        let on_invalidate = {
            let pending = pending_invalidation.clone();
            let report = report.clone();
            Callback::from(move |_| pending.set(Some(report.clone())))
        };

        html! {
            <div class="row-actions">
                <button type="button" class="btn is-secondary" onclick={on_print} disabled={*printing}>{"Imprimir"}</button>
                <button type="button" class="btn is-secondary" onclick={on_edit}>{"Editar"}</button>
                <button type="button" class="btn is-danger" onclick={on_invalidate}>{"Invalidar"}</button>
            </div>
        }
    };

    let row_class = |report: &Report| {
        if report.is_invalidated() {
            classes!("is-invalidated")
        } else {
            Classes::new()
        }
    };

    let confirm = match pending_invalidation.as_ref() {
        Some(report) => {
            let on_keep = {
                let pending = pending_invalidation.clone();
                Callback::from(move |_| pending.set(None))
            };
            let on_confirm = {
                let ctx = ctx.clone();
                let pending = pending_invalidation.clone();
                let last_filter = last_filter.clone();
                let results = results.clone();
                let loading = loading.clone();
                let id = report.id;
                Callback::from(move |_| {
                    pending.set(None);
                    let Some(user) = ctx.session.borrow().user() else {
                        ctx.navigate(Route::Login);
                        return;
                    };
                    let ctx = ctx.clone();
                    let filter = (*last_filter).clone();
                    let results = results.clone();
                    let loading = loading.clone();
                    spawn_local(async move {
                        match ctx.client().invalidate_report(id, user.id).await {
                            Ok(()) => {
                                tracing::info!(report = id, "report invalidated");
                                ctx.notify(Notice::success(msg::REPORT_INVALIDATED));
                                if let Some(filter) = filter {
                                    search(ctx, filter, results, loading);
                                }
                            }
                            Err(err) => ctx.fail(err, msg::REPORT_INVALIDATE_FAILED),
                        }
                    });
                })
            };
            let number = report
                .number
                .map(|number| number.to_string())
                .unwrap_or_else(|| report.id.to_string());
            html! {
                <div class="modal-backdrop">
                    <div class="modal" role="dialog">
                        <p>{ format!("Tem certeza que deseja invalidar o laudo Nº {number}?") }</p>
                        <div class="form-actions">
                            <button type="button" class="btn is-secondary" onclick={on_keep}>{"Não"}</button>
                            <button type="button" class="btn is-danger" onclick={on_confirm}>{"Sim"}</button>
                        </div>
                    </div>
                </div>
            }
        }
        None => Html::default(),
    };

    html! {
        <div class="virchow-page">
            <div class="page-title">{"IMPRESSÃO"}</div>
            <form class="page-card" {onsubmit}>
                <header>{"Pesquisar laudo"}</header>
                <div class="form-grid">
                    { text_field("Número do laudo", &form.report_number, bind_input(&form, |form, value| form.report_number = value), &errors, "report_number") }
                    { text_field("Nome paciente", &form.patient_name, bind_input(&form, |form, value| form.patient_name = value), &errors, "patient_name") }
                </div>
                <div class="form-actions">
                    <button type="submit" class="btn" disabled={*loading}>
                        { if *loading { "Aguarde" } else { "Pesquisar" } }
                    </button>
                </div>
            </form>
            if !results.is_empty() {
                { render_table(results.as_slice(), &table, &REPORT_COLUMNS, actions, row_class) }
            }
            { confirm }
        </div>
    }
}
