#![cfg(target_arch = "wasm32")]
//! Editor do corpo do laudo: escolha do tipo de exame, o textarea do corpo e
//! o seletor de diagnósticos do Ctrl+Espaço.
//!
//! O textarea não é controlado; o rascunho é a fonte da verdade e é
//! escrito de volta no elemento sempre que muda o corpo.

use std::cell::RefCell;
use std::rc::Rc;

use virchow_api::workflow::fetch_diagnostics;
use virchow_core::model::{DiagnosticCode, Report};
use virchow_core::notice::msg;
use virchow_core::report::DiagnosticFetch;
use virchow_core::snippet::is_picker_shortcut;
use virchow_core::table::TableState;
use virchow_core::{Insertion, ReportDraft, StringSurface, TextSurface};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, HtmlTextAreaElement, KeyboardEvent};
use yew::platform::spawn_local;
use yew::prelude::*;
use yew::TargetCast;

use crate::app::AppContext;
use crate::offsets::{chars_to_utf16, utf16_to_chars};
use crate::pages::{render_table, Column};

/// As listas do seletor são longas; na prática uma página mostra tudo.
const PICKER_PAGE_SIZE: usize = 500;

/// [`TextSurface`] sobre um textarea do navegador.
pub struct TextAreaSurface<'a> {
    area: &'a HtmlTextAreaElement,
}

impl<'a> TextAreaSurface<'a> {
    pub fn new(area: &'a HtmlTextAreaElement) -> Self {
        Self { area }
    }
}

impl TextSurface for TextAreaSurface<'_> {
    fn selection_offset(&self) -> Option<usize> {
        let start = self.area.selection_start().ok().flatten()?;
        Some(utf16_to_chars(&self.area.value(), start as usize))
    }

    fn insert_at(&mut self, offset: usize, text: &str) -> usize {
        let mut buffer = StringSurface::new(self.area.value());
        let offset = buffer.insert_at(offset, text);
        self.area.set_value(buffer.text());
        offset
    }

    fn set_cursor(&mut self, offset: usize) {
        let position = chars_to_utf16(&self.area.value(), offset) as u32;
        if let Err(err) = self.area.set_selection_range(position, position) {
            console::error_1(&err);
        }
    }
}

/// Rascunho e o textarea que ele controla. Barato de clonar.
#[derive(Clone)]
pub struct DraftHandle {
    pub draft: Rc<RefCell<ReportDraft>>,
    pub editor: NodeRef,
    ctx: AppContext,
    redraw: Callback<()>,
}

impl DraftHandle {
    pub fn body(&self) -> String {
        self.draft.borrow().body().to_string()
    }

    pub fn select_exam_type(&self, exam_type_id: i64) {
        let fetch = self.draft.borrow_mut().select_exam_type(exam_type_id);
        self.sync_editor();
        self.redraw.emit(());
        if let Some(fetch) = fetch {
            self.load_diagnostics(fetch);
        }
    }

    fn load_diagnostics(&self, fetch: DiagnosticFetch) {
        let handle = self.clone();
        let client = self.ctx.client();
        spawn_local(async move {
            let (ticket, result) = fetch_diagnostics(&client, fetch).await;
            match result {
                Ok(codes) => {
                    if handle.draft.borrow_mut().accept_diagnostics(ticket, codes) {
                        handle.redraw.emit(());
                    }
                }
                Err(err) => handle.ctx.fail(err, msg::DIAGNOSTICS_FAILED),
            }
        });
    }

    fn area(&self) -> Option<HtmlTextAreaElement> {
        self.editor.cast::<HtmlTextAreaElement>()
    }

    fn sync_editor(&self) {
        if let Some(area) = self.area() {
            area.set_value(self.draft.borrow().body());
        }
    }

    fn open_picker(&self) {
        let Some(area) = self.area() else {
            return;
        };
        self.draft
            .borrow_mut()
            .open_picker(&TextAreaSurface::new(&area));
        self.redraw.emit(());
    }

    fn pick(&self, code: &DiagnosticCode) {
        let Some(area) = self.area() else {
            return;
        };
        let insertion = self
            .draft
            .borrow_mut()
            .pick_diagnostic(&mut TextAreaSurface::new(&area), code);
        if let Insertion::Inserted { .. } = insertion {
            self.draft.borrow_mut().set_body(area.value());
            let _ = area.focus();
        }
        self.redraw.emit(());
    }

    fn dismiss(&self) {
        self.draft.borrow_mut().dismiss_picker();
        self.redraw.emit(());
    }
}

/// Carrega os tipos de exame, restaura o tipo do laudo salvo se houver e
/// escuta o Ctrl+Espaço.
#[hook]
pub fn use_report_draft(ctx: &AppContext, stored: Option<Report>) -> DraftHandle {
    let draft = {
        let stored = stored.clone();
        use_mut_ref(move || {
            stored
                .as_ref()
                .map(ReportDraft::for_report)
                .unwrap_or_default()
        })
    };
    let editor = use_node_ref();
    let force = use_force_update();
    let redraw = use_callback((), move |_: (), _| force.force_update());

    let handle = DraftHandle {
        draft,
        editor,
        ctx: ctx.clone(),
        redraw,
    };

    {
        let handle = handle.clone();
        let restore = stored.and_then(|report| report.exam_type_id);
        use_effect_with((), move |_| {
            let client = handle.ctx.client();
            spawn_local(async move {
                match client.exam_types().await {
                    Ok(exam_types) => {
                        let fetch = {
                            let mut draft = handle.draft.borrow_mut();
                            draft.set_exam_types(exam_types);
                            restore.and_then(|id| draft.restore_exam_type(id))
                        };
                        handle.redraw.emit(());
                        if let Some(fetch) = fetch {
                            handle.load_diagnostics(fetch);
                        }
                    }
                    Err(err) => handle.ctx.fail(err, msg::EXAM_TYPES_FAILED),
                }
            });
            || ()
        });
    }

    {
        let handle = handle.clone();
        use_effect_with((), move |_| {
            let listener = web_sys::window().map(|window| {
                let closure = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
                    if is_picker_shortcut(event.ctrl_key(), &event.code()) {
                        event.prevent_default();
                        handle.open_picker();
                    }
                });
                if let Err(err) = window
                    .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
                {
                    console::error_1(&err);
                }
                (window, closure)
            });
            move || {
                if let Some((window, closure)) = listener {
                    let _ = window.remove_event_listener_with_callback(
                        "keydown",
                        closure.as_ref().unchecked_ref(),
                    );
                }
            }
        });
    }

    handle
}

#[derive(Properties)]
pub struct ReportBodyProps {
    pub handle: DraftHandle,
    #[prop_or_default]
    pub error: Option<&'static str>,
}

impl PartialEq for ReportBodyProps {
    fn eq(&self, _: &Self) -> bool {
        // Rascunho mutável compartilhado; acompanha toda renderização do pai.
        false
    }
}

/// Select do tipo de exame, textarea do corpo e o modal do seletor.
#[function_component(ReportBody)]
pub fn report_body(props: &ReportBodyProps) -> Html {
    let handle = &props.handle;
    let picker_table = use_state(|| TableState::with_page_size(PICKER_PAGE_SIZE));

    {
        let handle = handle.clone();
        use_effect_with((), move |_| {
            handle.sync_editor();
            || ()
        });
    }

    let draft = handle.draft.borrow();
    let selected_id = draft.selected_exam_type().map(|exam_type| exam_type.id);

    let on_exam_type = {
        let handle = handle.clone();
        Callback::from(move |event: Event| {
            let select: web_sys::HtmlSelectElement = event.target_unchecked_into();
            match select.value().parse::<i64>() {
                Ok(id) => handle.select_exam_type(id),
                Err(_) => handle.select_exam_type(0),
            }
        })
    };

    let on_input = {
        let handle = handle.clone();
        Callback::from(move |event: InputEvent| {
            let area: HtmlTextAreaElement = event.target_unchecked_into();
            handle.draft.borrow_mut().set_body(area.value());
        })
    };

    let picker = if draft.picker().is_open() {
        let on_close = {
            let handle = handle.clone();
            Callback::from(move |_| handle.dismiss())
        };
        let columns = [
            Column {
                key: "codigo",
                label: "Código",
            },
            Column {
                key: "conteudo",
                label: "Conteúdo",
            },
        ];
        let table = render_table(
            draft.diagnostics(),
            &picker_table,
            &columns,
            |code: &DiagnosticCode| {
                let handle = handle.clone();
                let code = code.clone();
                let onclick = Callback::from(move |_| handle.pick(&code));
                html! { <button type="button" class="btn" {onclick}>{"Inserir"}</button> }
            },
            |_| Classes::new(),
        );
        html! {
            <div class="modal-backdrop">
                <div class="modal" role="dialog" aria-label="Listagem de Diagnósticos">
                    <header>
                        <span>{"Listagem de Diagnósticos"}</span>
                        <button type="button" class="btn is-secondary" onclick={on_close}>{"Fechar"}</button>
                    </header>
                    {
                        if draft.selected_exam_type().is_none() {
                            html! { <p>{"Selecione o tipo de laudo para listar os diagnósticos."}</p> }
                        } else {
                            table
                        }
                    }
                </div>
            </div>
        }
    } else {
        Html::default()
    };

    html! {
        <>
            <div class="form-field">
                <label>{"Tipo de laudo"}</label>
                <select onchange={on_exam_type}>
                    <option value="" selected={selected_id.is_none()}>{"Selecione"}</option>
                    {
                        for draft.exam_types().iter().map(|exam_type| html! {
                            <option
                                value={exam_type.id.to_string()}
                                selected={selected_id == Some(exam_type.id)}
                            >
                                { exam_type.name.clone() }
                            </option>
                        })
                    }
                </select>
                { props.error.map(|message| html! { <span class="field-error">{ message }</span> }).unwrap_or_default() }
            </div>
            <div class="form-field is-wide">
                <label>{"Laudo (Ctrl+Espaço insere um diagnóstico)"}</label>
                <textarea ref={handle.editor.clone()} oninput={on_input} />
            </div>
            { picker }
        </>
    }
}
