use virchow_core::notice::msg;
use virchow_core::session::LoginForm;
use virchow_core::{Notice, Route, ValidationErrors, VirchowError};
use yew::platform::spawn_local;
use yew::prelude::*;

use super::{bind_input, field, PageProps};

#[function_component(LoginPage)]
pub fn login_page(props: &PageProps) -> Html {
    let ctx = &props.ctx;
    let form = use_state(LoginForm::default);
    let errors = use_state(ValidationErrors::new);
    let loading = use_state(|| false);

    let onsubmit = {
        let ctx = ctx.clone();
        let form = form.clone();
        let errors = errors.clone();
        let loading = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let request = match form.to_request() {
                Ok(request) => request,
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
            loading.set(true);

            let ctx = ctx.clone();
            let loading = loading.clone();
            spawn_local(async move {
                match ctx.client().login(&request).await {
                    Ok(response) => {
                        let stored = ctx.session.borrow_mut().sign_in(&response);
                        loading.set(false);
                        match stored {
                            Ok(()) => ctx.navigate(Route::PatientSearch),
                            Err(err) => ctx.notify(Notice::error(err.to_string())),
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%err, "login rejected");
                        loading.set(false);
                        ctx.notify(Notice::error(msg::LOGIN_FAILED));
                    }
                }
            });
        })
    };

    html! {
        <form class="login-card" {onsubmit}>
            <h1>{"Virchow"}</h1>
            {
                field(
                    "Usuário",
                    html! { <input type="text" autocomplete="username" value={form.login.clone()} oninput={bind_input(&form, |form, value| form.login = value)} /> },
                    errors.for_field("login"),
                )
            }
            {
                field(
                    "Senha",
                    html! { <input type="password" autocomplete="current-password" value={form.password.clone()} oninput={bind_input(&form, |form, value| form.password = value)} /> },
                    errors.for_field("password"),
                )
            }
            <button type="submit" class="btn" disabled={*loading}>
                { if *loading { "Aguarde" } else { "Entrar" } }
            </button>
        </form>
    }
}
