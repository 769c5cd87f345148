#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use serde_wasm_bindgen::from_value;
use virchow_api::{ApiClient, ApiError, ClientConfig};
use virchow_core::notice::msg;
use virchow_core::{Notice, NoticeLevel, Route, Session};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Document, Element, Window};
use yew::platform::spawn_local;
use yew::platform::time::sleep;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_wasm::{WASMLayer, WASMLayerConfigBuilder};
use yew::prelude::*;

use crate::pages::{
    LoginPage, PatientEditPage, PatientRegisterPage, PatientSearchPage, PrintsPage,
    ReportCreatePage, ReportEditPage, ReportInclusionPage,
};
use crate::options::MountOptions;
use crate::storage::{open_local_store, LocalStore};
use crate::styles;

const TOAST_LIFETIME: Duration = Duration::from_millis(2000);

pub type SharedSession = Rc<RefCell<Session<LocalStore>>>;

/// O que uma página precisa da casca da aplicação: backend, sessão,
/// navegação e avisos.
#[derive(Clone)]
pub struct AppContext {
    pub config: Rc<ClientConfig>,
    pub session: SharedSession,
    pub route: Route,
    api: Rc<ApiClient>,
    navigate: Callback<Route>,
    notify: Callback<Notice>,
}

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.config, &other.config)
            && Rc::ptr_eq(&self.session, &other.session)
            && Rc::ptr_eq(&self.api, &other.api)
            && self.route == other.route
            && self.navigate == other.navigate
            && self.notify == other.notify
    }
}

impl AppContext {
    /// Cliente do backend com o token atual.
    pub fn client(&self) -> ApiClient {
        (*self.api).clone().with_token(self.session.borrow().token())
    }

    pub fn navigate(&self, route: Route) {
        self.navigate.emit(route);
    }

    pub fn notify(&self, notice: Notice) {
        self.notify.emit(notice);
    }

    /// Trata uma chamada com falha. Um 401 encerra a sessão e volta ao login.
    pub fn fail(&self, err: ApiError, fallback: &str) {
        if err.is_unauthorized() {
            let route = self.session.borrow_mut().handle_unauthorized();
            self.notify(Notice::warning(msg::SESSION_EXPIRED));
            self.navigate(route);
            return;
        }
        tracing::warn!(%err, "backend call failed");
        self.notify(err.notice(fallback));
    }

    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Clone, Default, PartialEq)]
struct ToastList {
    items: Vec<(u64, Notice)>,
    next_id: u64,
}

enum ToastAction {
    Push(Notice),
    ExpireOldest,
}

impl Reducible for ToastList {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ToastAction::Push(notice) => {
                next.items.push((next.next_id, notice));
                next.next_id += 1;
            }
            ToastAction::ExpireOldest => {
                if !next.items.is_empty() {
                    next.items.remove(0);
                }
            }
        }
        Rc::new(next)
    }
}

#[derive(Properties)]
pub struct AppProps {
    pub config: Rc<ClientConfig>,
    pub api: Rc<ApiClient>,
}

impl PartialEq for AppProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.config, &other.config) && Rc::ptr_eq(&self.api, &other.api)
    }
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let session: SharedSession = use_mut_ref(|| Session::new(open_local_store()));
    let route = {
        let session = session.clone();
        use_state(move || initial_route(&session))
    };
    let toasts = use_reducer(ToastList::default);

    use_effect_with((), |_| {
        if let Some(document) = web_sys::window().and_then(|window| window.document()) {
            if let Err(err) = styles::ensure_styles(&document) {
                console::error_1(&err);
            }
        }
        || ()
    });

    {
        let route = route.clone();
        let session = session.clone();
        use_effect_with((), move |_| {
            let listener = web_sys::window().map(|window| {
                let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
                    route.set(guard(current_route(), &session));
                });
                if let Err(err) = window
                    .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
                {
                    console::error_1(&err);
                }
                (window, closure)
            });
            move || {
                if let Some((window, closure)) = listener {
                    let _ = window.remove_event_listener_with_callback(
                        "popstate",
                        closure.as_ref().unchecked_ref(),
                    );
                }
            }
        });
    }

    use_effect_with(*route, |route| {
        if let Some(document) = web_sys::window().and_then(|window| window.document()) {
            document.set_title(&format!("Virchow | {}", route.title()));
        }
        || ()
    });

    let navigate = {
        let route = route.clone();
        let session = session.clone();
        use_callback((), move |next: Route, _| {
            let next = guard(next, &session);
            push_history(next);
            route.set(next);
        })
    };

    let notify = {
        let toasts = toasts.clone();
        use_callback((), move |notice: Notice, _| {
            toasts.dispatch(ToastAction::Push(notice));
            let toasts = toasts.clone();
            spawn_local(async move {
                sleep(TOAST_LIFETIME).await;
                toasts.dispatch(ToastAction::ExpireOldest);
            });
        })
    };

    let ctx = AppContext {
        config: props.config.clone(),
        session,
        route: *route,
        api: props.api.clone(),
        navigate,
        notify,
    };

    let with_header = !matches!(*route, Route::Login | Route::NotFound);

    html! {
        <div class="virchow-root">
            if with_header {
                <Header ctx={ctx.clone()} />
            }
            { render_page(&ctx) }
            { render_toasts(&toasts.items) }
        </div>
    }
}

fn render_page(ctx: &AppContext) -> Html {
    let ctx = ctx.clone();
    match ctx.route {
        Route::Login => html! { <LoginPage {ctx} /> },
        Route::PatientSearch => html! { <PatientSearchPage {ctx} /> },
        Route::PatientRegister => html! { <PatientRegisterPage {ctx} /> },
        Route::PatientEdit => html! { <PatientEditPage {ctx} /> },
        Route::ReportInclusion => html! { <ReportInclusionPage {ctx} /> },
        Route::ReportCreate => html! { <ReportCreatePage {ctx} /> },
        Route::ReportEdit => html! { <ReportEditPage {ctx} /> },
        Route::Prints => html! { <PrintsPage {ctx} /> },
        Route::NotFound => {
            let onclick = Callback::from(move |_| ctx.navigate(Route::Login));
            html! {
                <div class="not-found">
                    <h1>{"404"}</h1>
                    <p>{"Página não encontrada."}</p>
                    <button type="button" class="btn" {onclick}>{"Voltar ao início"}</button>
                </div>
            }
        }
    }
}

fn render_toasts(items: &[(u64, Notice)]) -> Html {
    html! {
        <div class="toast-stack" aria-live="polite">
            {
                for items.iter().map(|(id, notice)| html! {
                    <div key={*id} class="toast" data-level={notice_level(notice.level)}>
                        { notice.message.clone() }
                    </div>
                })
            }
        </div>
    }
}

fn notice_level(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Success => "success",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    }
}

#[derive(Properties, PartialEq)]
struct HeaderProps {
    ctx: AppContext,
}

#[function_component(Header)]
fn header(props: &HeaderProps) -> Html {
    let ctx = &props.ctx;
    let user_name = ctx
        .session
        .borrow()
        .user()
        .and_then(|user| user.name.or(user.login));

    let links = [
        (Route::PatientSearch, "PACIENTES"),
        (Route::ReportInclusion, "INCLUIR LAUDO"),
        (Route::Prints, "IMPRESSOS"),
    ];

    let on_logout = {
        let ctx = ctx.clone();
        Callback::from(move |_| {
            ctx.session.borrow_mut().sign_out();
            ctx.navigate(Route::Login);
        })
    };

    html! {
        <header class="virchow-header">
            <span class="virchow-brand">{"Virchow"}</span>
            <nav class="virchow-nav">
                {
                    for links.into_iter().map(|(target, label)| {
                        let ctx = ctx.clone();
                        let is_active = ctx.route == target;
                        let onclick = Callback::from(move |_| ctx.navigate(target));
                        html! {
                            <button type="button" class={classes!(is_active.then_some("is-active"))} {onclick}>
                                { label }
                            </button>
                        }
                    })
                }
            </nav>
            <div>
                { user_name.map(|name| html! { <span class="virchow-user">{ name }</span> }).unwrap_or_default() }
                <button type="button" class="virchow-logout" onclick={on_logout}>{"SAIR"}</button>
            </div>
        </header>
    }
}

fn current_route() -> Route {
    web_sys::window()
        .and_then(|window| window.location().pathname().ok())
        .map(|path| Route::from_path(&path))
        .unwrap_or(Route::Login)
}

fn initial_route(session: &SharedSession) -> Route {
    let requested = current_route();
    let route = guard(requested, session);
    if route != requested {
        replace_history(route);
    }
    route
}

/// Páginas protegidas caem no login quando não há token.
fn guard(route: Route, session: &SharedSession) -> Route {
    if route.requires_session() && !session.borrow().is_signed_in() {
        Route::Login
    } else {
        route
    }
}

fn push_history(route: Route) {
    let result = web_sys::window()
        .ok_or_else(|| JsValue::from_str("Sem window"))
        .and_then(|window| window.history())
        .and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(route.path())));
    if let Err(err) = result {
        console::error_1(&err);
    }
}

fn replace_history(route: Route) {
    let result = web_sys::window()
        .ok_or_else(|| JsValue::from_str("Sem window"))
        .and_then(|window| window.history())
        .and_then(|history| {
            history.replace_state_with_url(&JsValue::NULL, "", Some(route.path()))
        });
    if let Err(err) = result {
        console::error_1(&err);
    }
}

/// Encaminha os eventos do `tracing` para o console do navegador.
fn install_console_logging(level: Level) {
    let layer = WASMLayer::new(WASMLayerConfigBuilder::new().set_max_level(level).build());
    // Uma segunda montagem mantém o subscriber instalado pela primeira.
    let _ = tracing::subscriber::set_global_default(tracing_subscriber::registry().with(layer));
}

#[wasm_bindgen]
pub fn mount_app(selector: &str, config: Option<JsValue>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window: Window = web_sys::window().ok_or_else(|| JsValue::from_str("Sem window"))?;
    let document: Document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Documento indisponível"))?;

    let target: Element = document
        .query_selector(selector)
        .map_err(|err| JsValue::from_str(&format!("Seletor inválido: {err:?}")))?
        .ok_or_else(|| JsValue::from_str("Nenhum elemento encontrado para o seletor"))?;

    let options: MountOptions = match config {
        Some(value) => from_value(value)?,
        None => MountOptions::default(),
    };
    install_console_logging(options.max_level());
    let config = options.client;
    let api = ApiClient::new(&config).map_err(|err| JsValue::from_str(&err.to_string()))?;

    yew::Renderer::<App>::with_root_and_props(
        target,
        AppProps {
            config: Rc::new(config),
            api: Rc::new(api),
        },
    )
    .render();
    Ok(())
}
