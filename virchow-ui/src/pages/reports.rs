use std::rc::Rc;

use virchow_api::{create_and_print, PrintOutcome};
use virchow_core::model::{Patient, Report};
use virchow_core::notice::msg;
use virchow_core::patient::PatientSearchForm;
use virchow_core::report::{CreateReportForm, UpdateReportForm};
use virchow_core::table::TableState;
use virchow_core::{Notice, Route, ValidationErrors};
use web_sys::console;
use yew::platform::spawn_local;
use yew::platform::time::sleep;
use yew::prelude::*;

use super::patients::{render_form_actions, route_form_error, use_marital_statuses};
use super::{
    bind_change, bind_input, bind_marital_status, date_field, field, form_error, marital_select,
    render_table, text_field, Column, PageProps,
};
use crate::editor::{use_report_draft, ReportBody};
use crate::pdf::open_pdf;

const INCLUSION_COLUMNS: [Column; 3] = [
    Column {
        key: "nome",
        label: "Nome",
    },
    Column {
        key: "datNascimento",
        label: "Data de nascimento",
    },
    Column {
        key: "sexo",
        label: "Sexo",
    },
];

fn text_area(
    label: &str,
    value: &str,
    oninput: Callback<InputEvent>,
    errors: &ValidationErrors,
    key: &str,
) -> Html {
    html! {
        <div class="form-field is-wide">
            <label>{ label.to_string() }</label>
            <textarea value={value.to_string()} {oninput} />
            { errors.for_field(key).map(|message| html! { <span class="field-error">{ message }</span> }).unwrap_or_default() }
        </div>
    }
}

/// Localiza o paciente do laudo novo.
#[function_component(ReportInclusionPage)]
pub fn report_inclusion_page(props: &PageProps) -> Html {
    let ctx = &props.ctx;
    let form = use_state(PatientSearchForm::default);
    let results = use_state(|| Rc::new(Vec::<Patient>::new()));
    let table = use_state(TableState::default);
    let loading = use_state(|| false);

    let onsubmit = {
        let ctx = ctx.clone();
        let form = form.clone();
        let results = results.clone();
        let loading = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let filter = match form.to_inclusion_filter() {
                Ok(filter) => filter,
                Err(_) => {
                    ctx.notify(Notice::warning(msg::SEARCH_NEEDS_CRITERIA));
                    return;
                }
            };
            loading.set(true);

            let ctx = ctx.clone();
            let results = results.clone();
            let loading = loading.clone();
            spawn_local(async move {
                match ctx.client().search_patients(&filter).await {
                    Ok(found) => {
                        if found.is_empty() {
                            ctx.notify(Notice::warning(msg::PATIENT_NOT_FOUND));
                        }
                        results.set(Rc::new(found));
                    }
                    Err(err) => ctx.fail(err, msg::PATIENT_NOT_FOUND),
                }
                loading.set(false);
            });
        })
    };

    let actions = |patient: &Patient| {
        let ctx = ctx.clone();
        let patient = patient.clone();
        let onclick = Callback::from(move |_| {
            let stored = ctx.session.borrow_mut().select_patient(&patient);
            match stored {
                Ok(()) => ctx.navigate(Route::ReportCreate),
                Err(err) => ctx.notify(Notice::error(err.to_string())),
            }
        });
        html! { <button type="button" class="btn" {onclick}>{"Selecionar"}</button> }
    };

    let no_errors = ValidationErrors::new();

    html! {
        <div class="virchow-page">
            <div class="page-title">{"INCLUIR LAUDO"}</div>
            <form class="page-card" {onsubmit}>
                <header>{"Pesquisar paciente"}</header>
                <div class="form-grid">
                    { text_field("Nome", &form.name, bind_input(&form, |form, value| form.name = value), &no_errors, "name") }
                    { date_field("Data de nascimento", &form.birth_date, bind_change(&form, |form, value| form.birth_date = value), &no_errors, "birth_date") }
                    { text_field("Unidade de saúde", &form.health_unit, bind_input(&form, |form, value| form.health_unit = value), &no_errors, "health_unit") }
                </div>
                <div class="form-actions">
                    <button type="submit" class="btn" disabled={*loading}>
                        { if *loading { "Aguarde" } else { "Pesquisar" } }
                    </button>
                </div>
            </form>
            if !results.is_empty() {
                { render_table(results.as_slice(), &table, &INCLUSION_COLUMNS, actions, |_| Classes::new()) }
            }
        </div>
    }
}

#[function_component(ReportCreatePage)]
pub fn report_create_page(props: &PageProps) -> Html {
    let ctx = &props.ctx;
    let draft = use_report_draft(ctx, None);
    let statuses = use_marital_statuses(ctx);
    let form = {
        let patient = ctx.session.borrow().patient();
        let today = ctx.today();
        use_state(move || {
            patient
                .map(|patient| CreateReportForm::for_patient(&patient, today))
                .unwrap_or_default()
        })
    };
    let errors = use_state(ValidationErrors::new);
    let loading = use_state(|| false);
    let confirm_cancel = use_state(|| false);

    let onsubmit = {
        let ctx = ctx.clone();
        let draft = draft.clone();
        let form = form.clone();
        let errors = errors.clone();
        let loading = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let payload = match form.to_payload(&draft.draft.borrow()) {
                Ok(payload) => payload,
                Err(err) => {
                    route_form_error(&ctx, &errors, err);
                    return;
                }
            };
            errors.set(ValidationErrors::new());
            loading.set(true);

            let ctx = ctx.clone();
            let loading = loading.clone();
            spawn_local(async move {
                let client = ctx.client();
                match create_and_print(&client, &payload, ctx.config.print_delay(), sleep).await {
                    Ok(outcome) if outcome.session_expired() => {
                        ctx.notify(Notice::success(msg::REPORT_CREATED));
                        if let PrintOutcome::Failed(err) = outcome.print {
                            ctx.fail(err, msg::PRINT_FAILED);
                        }
                    }
                    Ok(outcome) => {
                        for notice in outcome.notices() {
                            ctx.notify(notice);
                        }
                        if let Some(bytes) = outcome.pdf() {
                            if let Err(err) = open_pdf(bytes) {
                                console::error_1(&err);
                            }
                        }
                        ctx.session.borrow_mut().clear_report();
                        ctx.navigate(Route::Prints);
                    }
                    Err(err) => ctx.fail(err, msg::REPORT_CREATE_FAILED),
                }
                loading.set(false);
            });
        })
    };

    html! {
        <div class="virchow-page">
            <div class="page-title">{"INCLUIR LAUDO"}</div>
            <form class="page-card" {onsubmit}>
                <header>{"* Campos obrigatórios"}</header>
                <div class="form-grid">
                    { text_field("Nome Paciente", &form.patient_name, bind_input(&form, |form, value| form.patient_name = value), &errors, "patient_name") }
                    {
                        field(
                            "Estado Civil",
                            marital_select(
                                &statuses,
                                form.marital_status.as_ref(),
                                bind_marital_status(&form, &statuses, |form, status| form.marital_status = status),
                            ),
                            None,
                        )
                    }
                    { text_field("Sexo", &form.sex, bind_input(&form, |form, value| form.sex = value), &errors, "sex") }
                    { text_field("Idade", &form.age, bind_input(&form, |form, value| form.age = value), &errors, "age") }
                    { text_field("Profissão", &form.occupation, bind_input(&form, |form, value| form.occupation = value), &errors, "occupation") }
                    { text_field("Procedência", &form.origin, bind_input(&form, |form, value| form.origin = value), &errors, "origin") }
                    {
                        field(
                            "Número de laudo",
                            html! { <input type="number" min="1" value={form.report_number.clone()} oninput={bind_input(&form, |form, value| form.report_number = value)} /> },
                            errors.for_field("report_number"),
                        )
                    }
                    { date_field("Data Exame", &form.exam_date, bind_change(&form, |form, value| form.exam_date = value), &errors, "exam_date") }
                    { text_field("Data da última menstruação", &form.last_menstruation, bind_input(&form, |form, value| form.last_menstruation = value), &errors, "last_menstruation") }
                    { date_field("Data de nascimento", &form.birth_date, bind_change(&form, |form, value| form.birth_date = value), &errors, "birth_date") }
                    { text_field("Médico requisitante", &form.requesting_physician, bind_input(&form, |form, value| form.requesting_physician = value), &errors, "requesting_physician") }
                    { text_area("Resumo Clínico", &form.clinical_summary, bind_input(&form, |form, value| form.clinical_summary = value), &errors, "clinical_summary") }
                    <ReportBody handle={draft.clone()} error={errors.for_field("exam_type")} />
                </div>
                { form_error(&errors) }
                { render_form_actions(ctx, &confirm_cancel, *loading, "Tem certeza que deseja cancelar a inclusão do laudo?", Route::Prints) }
            </form>
        </div>
    }
}

#[function_component(ReportEditPage)]
pub fn report_edit_page(props: &PageProps) -> Html {
    let ctx = &props.ctx;
    let stored = use_memo((), {
        let session = ctx.session.clone();
        move |_| session.borrow().report()
    });
    let draft = use_report_draft(ctx, (*stored).clone());
    let form = {
        let stored = stored.clone();
        use_state(move || {
            stored
                .as_ref()
                .as_ref()
                .map(UpdateReportForm::from_report)
                .unwrap_or_default()
        })
    };
    let errors = use_state(ValidationErrors::new);
    let loading = use_state(|| false);
    let confirm_cancel = use_state(|| false);

    {
        let ctx = ctx.clone();
        let missing = stored.is_none();
        use_effect_with((), move |_| {
            if missing {
                ctx.navigate(Route::Prints);
            }
            || ()
        });
    }

    let onsubmit = {
        let ctx = ctx.clone();
        let stored = stored.clone();
        let draft = draft.clone();
        let form = form.clone();
        let errors = errors.clone();
        let loading = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let Some(report) = stored.as_ref().as_ref() else {
                return;
            };
            let payload = match form.to_payload(&draft.draft.borrow(), report, ctx.today()) {
                Ok(payload) => payload,
                Err(err) => {
                    route_form_error(&ctx, &errors, err);
                    return;
                }
            };
            errors.set(ValidationErrors::new());
            loading.set(true);

            let ctx = ctx.clone();
            let loading = loading.clone();
            let id = report.id;
            spawn_local(async move {
                match ctx.client().update_report(id, &payload).await {
                    Ok(()) => {
                        ctx.notify(Notice::success(msg::REPORT_UPDATED));
                        ctx.session.borrow_mut().clear_report();
                        ctx.navigate(Route::Prints);
                    }
                    Err(err) => ctx.fail(err, msg::REPORT_UPDATE_FAILED),
                }
                loading.set(false);
            });
        })
    };

    let title = stored
        .as_ref()
        .as_ref()
        .and_then(|report: &Report| report.number)
        .map(|number| format!("EDITAR LAUDO Nº {number}"))
        .unwrap_or_else(|| "EDITAR LAUDO".to_string());

    let age = form
        .age_on(ctx.today())
        .map(|age| age.to_string())
        .unwrap_or_default();

    html! {
        <div class="virchow-page">
            <div class="page-title">{ title }</div>
            <form class="page-card" {onsubmit}>
                <header>{"* Campos obrigatórios"}</header>
                <div class="form-grid">
                    { text_field("Nome Paciente", &form.patient_name, bind_input(&form, |form, value| form.patient_name = value), &errors, "patient_name") }
                    { text_field("Estado Civil", &form.marital_status, bind_input(&form, |form, value| form.marital_status = value), &errors, "marital_status") }
                    { text_field("Sexo", &form.sex, bind_input(&form, |form, value| form.sex = value), &errors, "sex") }
                    { date_field("Data de nascimento", &form.birth_date, bind_change(&form, |form, value| form.birth_date = value), &errors, "birth_date") }
                    { field("Idade", html! { <input type="text" value={age} disabled=true /> }, None) }
                    { text_field("Profissão", &form.occupation, bind_input(&form, |form, value| form.occupation = value), &errors, "occupation") }
                    { text_field("Procedência", &form.origin, bind_input(&form, |form, value| form.origin = value), &errors, "origin") }
                    { text_field("Médico requisitante", &form.requesting_physician, bind_input(&form, |form, value| form.requesting_physician = value), &errors, "requesting_physician") }
                    { text_field("Data da última menstruação", &form.last_menstruation, bind_input(&form, |form, value| form.last_menstruation = value), &errors, "last_menstruation") }
                    { text_area("Hipótese diagnóstica", &form.diagnostic_hypothesis, bind_input(&form, |form, value| form.diagnostic_hypothesis = value), &errors, "diagnostic_hypothesis") }
                    { text_area("Resumo Clínico", &form.clinical_summary, bind_input(&form, |form, value| form.clinical_summary = value), &errors, "clinical_summary") }
                    <ReportBody handle={draft.clone()} />
                </div>
                { render_form_actions(ctx, &confirm_cancel, *loading, "Tem certeza que deseja cancelar a edição do laudo?", Route::ReportInclusion) }
            </form>
        </div>
    }
}
