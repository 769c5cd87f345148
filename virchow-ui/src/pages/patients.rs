use std::rc::Rc;

use virchow_api::ApiError;
use virchow_core::model::{MaritalStatus, Patient};
use virchow_core::notice::msg;
use virchow_core::patient::{EditPatientForm, PatientSearchForm, RegisterPatientForm};
use virchow_core::table::TableState;
use virchow_core::{Notice, Route, ValidationErrors, VirchowError};
use yew::platform::spawn_local;
use yew::prelude::*;

use super::{
    bind_change, bind_input, bind_marital_status, date_field, field, form_error, marital_select,
    render_table, text_field, Column, PageProps,
};
use crate::app::AppContext;

const PATIENT_PAGE_SIZE: usize = 50;

const PATIENT_COLUMNS: [Column; 3] = [
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

#[hook]
pub(crate) fn use_marital_statuses(ctx: &AppContext) -> Rc<Vec<MaritalStatus>> {
    let statuses = use_state(|| Rc::new(Vec::new()));
    {
        let ctx = ctx.clone();
        let statuses = statuses.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match ctx.client().marital_statuses().await {
                    Ok(found) => statuses.set(Rc::new(found)),
                    Err(err) => ctx.fail(err, msg::MARITAL_STATUSES_FAILED),
                }
            });
            || ()
        });
    }
    (*statuses).clone()
}

/// Separa um erro de domínio em erros de campo (ficam no formulário) e o
/// resto (vira aviso).
pub(crate) fn route_form_error(
    ctx: &AppContext,
    errors: &UseStateHandle<ValidationErrors>,
    err: VirchowError,
) {
    match err {
        VirchowError::Validation(found) => {
            if let Some(message) = found.for_field("form") {
                ctx.notify(Notice::warning(message));
            }
            errors.set(found);
        }
        VirchowError::InvalidDate(_) | VirchowError::InvalidDateRange { .. } => {
            ctx.notify(Notice::error(msg::BIRTH_DATE_OUT_OF_RANGE));
        }
        other => ctx.notify(Notice::error(other.to_string())),
    }
}

#[function_component(PatientSearchPage)]
pub fn patient_search_page(props: &PageProps) -> Html {
    let ctx = &props.ctx;
    let form = use_state(PatientSearchForm::default);
    let results = use_state(|| Rc::new(Vec::<Patient>::new()));
    let table = use_state(|| TableState::with_page_size(PATIENT_PAGE_SIZE));
    let loading = use_state(|| false);

    let onsubmit = {
        let ctx = ctx.clone();
        let form = form.clone();
        let results = results.clone();
        let loading = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let filter = form.to_filter();
            loading.set(true);

            let ctx = ctx.clone();
            let results = results.clone();
            let loading = loading.clone();
            spawn_local(async move {
                match ctx.client().search_patients(&filter).await {
                    Ok(found) => {
                        if found.is_empty() {
                            ctx.notify(Notice::warning(msg::PATIENT_SEARCH_EMPTY));
                        }
                        results.set(Rc::new(found));
                    }
                    Err(err) => ctx.fail(err, msg::PATIENT_SEARCH_FAILED),
                }
                loading.set(false);
            });
        })
    };

    let on_register = {
        let ctx = ctx.clone();
        Callback::from(move |_| ctx.navigate(Route::PatientRegister))
    };

    let actions = |patient: &Patient| {
        let ctx = ctx.clone();
        let patient = patient.clone();
        let onclick = Callback::from(move |_| {
            let stored = ctx.session.borrow_mut().select_patient(&patient);
            match stored {
                Ok(()) => ctx.navigate(Route::PatientEdit),
                Err(err) => ctx.notify(Notice::error(err.to_string())),
            }
        });
        html! { <button type="button" class="btn is-secondary" {onclick}>{"Editar paciente"}</button> }
    };

    let no_errors = ValidationErrors::new();

    html! {
        <div class="virchow-page">
            <div class="page-title">{"CADASTROS DE PACIENTES"}</div>
            <div>
                <button type="button" class="btn" onclick={on_register}>{"INCLUIR PACIENTE"}</button>
            </div>
            <form class="page-card" {onsubmit}>
                <header>{"Pesquisar paciente"}</header>
                <div class="form-grid">
                    { text_field("Nome", &form.name, bind_input(&form, |form, value| form.name = value), &no_errors, "name") }
                    { date_field("Data de nascimento", &form.birth_date, bind_change(&form, |form, value| form.birth_date = value), &no_errors, "birth_date") }
                </div>
                <div class="form-actions">
                    <button type="submit" class="btn" disabled={*loading}>
                        { if *loading { "Aguarde" } else { "Pesquisar" } }
                    </button>
                </div>
            </form>
            { render_table(results.as_slice(), &table, &PATIENT_COLUMNS, actions, |_| Classes::new()) }
        </div>
    }
}

#[function_component(PatientRegisterPage)]
pub fn patient_register_page(props: &PageProps) -> Html {
    let ctx = &props.ctx;
    let statuses = use_marital_statuses(ctx);
    let form = use_state(RegisterPatientForm::default);
    let errors = use_state(ValidationErrors::new);
    let loading = use_state(|| false);
    let confirm_cancel = use_state(|| false);

    let onsubmit = {
        let ctx = ctx.clone();
        let form = form.clone();
        let errors = errors.clone();
        let loading = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let payload = match form.to_payload(ctx.today()) {
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
                match ctx.client().create_patient(&payload).await {
                    Ok(()) => {
                        ctx.notify(Notice::success(msg::PATIENT_CREATED));
                        ctx.navigate(Route::PatientSearch);
                    }
                    Err(ApiError::Conflict(_)) => {
                        ctx.notify(Notice::error(msg::PATIENT_DUPLICATE));
                    }
                    Err(err) => ctx.fail(err, msg::PATIENT_CREATE_FAILED),
                }
                loading.set(false);
            });
        })
    };

    let fields = html! {
        <div class="form-grid">
            { text_field("Nome", &form.name, bind_input(&form, |form, value| form.name = value), &errors, "name") }
            {
                field(
                    "Estado civil",
                    marital_select(
                        &statuses,
                        form.marital_status.as_ref(),
                        bind_marital_status(&form, &statuses, |form, status| form.marital_status = status),
                    ),
                    errors.for_field("marital_status"),
                )
            }
            { text_field("Sexo", &form.sex, bind_input(&form, |form, value| form.sex = value), &errors, "sex") }
            { date_field("Data de nascimento", &form.birth_date, bind_change(&form, |form, value| form.birth_date = value), &errors, "birth_date") }
            { text_field("Profissão", &form.occupation, bind_input(&form, |form, value| form.occupation = value), &errors, "occupation") }
            { text_field("Procedência", &form.origin, bind_input(&form, |form, value| form.origin = value), &errors, "origin") }
        </div>
    };

    html! {
        <div class="virchow-page">
            <div class="page-title">{"INCLUIR PACIENTE"}</div>
            <form class="page-card" {onsubmit}>
                <header>{"* Campos obrigatórios"}</header>
                { fields }
                { form_error(&errors) }
                { render_form_actions(ctx, &confirm_cancel, *loading, "Tem certeza que deseja cancelar o cadastro do paciente?", Route::PatientSearch) }
            </form>
        </div>
    }
}

#[function_component(PatientEditPage)]
pub fn patient_edit_page(props: &PageProps) -> Html {
    let ctx = &props.ctx;
    let patient = use_memo((), {
        let session = ctx.session.clone();
        move |_| session.borrow().patient()
    });
    let statuses = use_marital_statuses(ctx);
    let form = {
        let patient = patient.clone();
        use_state(move || {
            patient
                .as_ref()
                .as_ref()
                .map(EditPatientForm::from_patient)
                .unwrap_or_default()
        })
    };
    let errors = use_state(ValidationErrors::new);
    let loading = use_state(|| false);
    let confirm_cancel = use_state(|| false);

    {
        let ctx = ctx.clone();
        let missing = patient.is_none();
        use_effect_with((), move |_| {
            if missing {
                ctx.navigate(Route::PatientSearch);
            }
            || ()
        });
    }

    let onsubmit = {
        let ctx = ctx.clone();
        let patient = patient.clone();
        let form = form.clone();
        let errors = errors.clone();
        let loading = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let Some(patient) = patient.as_ref().as_ref() else {
                return;
            };
            let payload = match form.to_payload(patient, ctx.today()) {
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
            let id = patient.id;
            spawn_local(async move {
                match ctx.client().update_patient(id, &payload).await {
                    Ok(()) => {
                        ctx.notify(Notice::success(msg::PATIENT_UPDATED));
                        ctx.navigate(Route::PatientSearch);
                    }
                    Err(err) => ctx.fail(err, msg::PATIENT_UPDATE_FAILED),
                }
                loading.set(false);
            });
        })
    };

    html! {
        <div class="virchow-page">
            <div class="page-title">{"EDITAR PACIENTE"}</div>
            <form class="page-card" {onsubmit}>
                <header>{"* Campos obrigatórios"}</header>
                <div class="form-grid">
                    { text_field("Nome", &form.name, bind_input(&form, |form, value| form.name = value), &errors, "name") }
                    {
                        field(
                            "Estado civil",
                            marital_select(
                                &statuses,
                                form.marital_status.as_ref(),
                                bind_marital_status(&form, &statuses, |form, status| form.marital_status = status),
                            ),
                            errors.for_field("marital_status"),
                        )
                    }
                    { text_field("Sexo", &form.sex, bind_input(&form, |form, value| form.sex = value), &errors, "sex") }
                    { date_field("Data de nascimento", &form.birth_date, bind_change(&form, |form, value| form.birth_date = value), &errors, "birth_date") }
                    { text_field("Profissão", &form.occupation, bind_input(&form, |form, value| form.occupation = value), &errors, "occupation") }
                    { text_field("Procedência", &form.origin, bind_input(&form, |form, value| form.origin = value), &errors, "origin") }
                </div>
                { render_form_actions(ctx, &confirm_cancel, *loading, "Tem certeza que deseja cancelar a edição do paciente?", Route::PatientSearch) }
            </form>
        </div>
    }
}

/// Botões Cancelar/Salvar; cancelar pede confirmação antes de sair.
pub(crate) fn render_form_actions(
    ctx: &AppContext,
    confirm_cancel: &UseStateHandle<bool>,
    loading: bool,
    question: &'static str,
    leave_to: Route,
) -> Html {
    let on_cancel = {
        let confirm_cancel = confirm_cancel.clone();
        Callback::from(move |_| confirm_cancel.set(true))
    };
    let on_stay = {
        let confirm_cancel = confirm_cancel.clone();
        Callback::from(move |_| confirm_cancel.set(false))
    };
    let on_leave = {
        let ctx = ctx.clone();
        Callback::from(move |_| ctx.navigate(leave_to))
    };

    html! {
        <>
            <div class="form-actions">
                <button type="button" class="btn is-secondary" onclick={on_cancel}>{"Cancelar"}</button>
                <button type="submit" class="btn" disabled={loading}>
                    { if loading { "Aguarde" } else { "Salvar" } }
                </button>
            </div>
            if **confirm_cancel {
                <div class="modal-backdrop">
                    <div class="modal" role="dialog" aria-label="Confirmação">
                        <header>{"Confirmação"}</header>
                        <p>{ question }</p>
                        <div class="form-actions">
                            <button type="button" class="btn is-secondary" onclick={on_stay}>{"Não"}</button>
                            <button type="button" class="btn" onclick={on_leave}>{"Sim"}</button>
                        </div>
                    </div>
                </div>
            }
        </>
    }
}
