#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsValue;
use web_sys::Document;

const STYLE_TAG_SELECTOR: &str = "style[data-virchow-ui]";

/// CSS padrão com variáveis de tema que a página hospedeira pode sobrescrever.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --virchow-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --virchow-primary: #0c647c;
  --virchow-primary-strong: #0f6278;
  --virchow-primary-soft: #197791;
  --virchow-bg: #ffffff;
  --virchow-surface: #f3f4f6;
  --virchow-border: #d1d5db;
  --virchow-text: #1f2933;
  --virchow-muted: #52606d;
  --virchow-error: #b42318;
  --virchow-success: #067647;
  --virchow-warning: #b54708;
  --virchow-radius: 4px;
}

.virchow-root {
  font-family: var(--virchow-font-family);
  color: var(--virchow-text);
  background: var(--virchow-bg);
  min-height: 100vh;
}

.virchow-header {
  position: sticky;
  top: 0;
  height: 60px;
  display: flex;
  align-items: center;
  justify-content: space-between;
  padding: 0 32px;
  background: var(--virchow-primary-strong);
  color: #ffffff;
  z-index: 10;
}

.virchow-brand {
  font-size: 1.8rem;
  font-weight: 700;
}

.virchow-nav {
  display: flex;
  gap: 24px;
}

.virchow-nav button,
.virchow-logout {
  background: var(--virchow-primary-soft);
  color: #ffffff;
  border: none;
  font-weight: 700;
  padding: 6px 32px;
  border-radius: var(--virchow-radius);
  cursor: pointer;
}

.virchow-nav button.is-active {
  background: var(--virchow-primary);
  box-shadow: inset 0 -3px 0 #ffffff;
}

.virchow-logout {
  background: transparent;
  padding: 6px 0;
}

.virchow-user {
  font-size: 0.9rem;
  margin-right: 16px;
  opacity: 0.85;
}

.virchow-page {
  width: 90%;
  margin: 24px auto;
  display: flex;
  flex-direction: column;
  gap: 24px;
}

.page-title {
  display: flex;
  align-items: center;
  height: 50px;
  padding-left: 8px;
  font-size: 1.25rem;
  font-weight: 700;
  background: var(--virchow-surface);
  border: 1px solid var(--virchow-border);
  border-radius: var(--virchow-radius);
}

.page-card {
  border: 1px solid var(--virchow-border);
  border-radius: var(--virchow-radius);
}

.page-card > header {
  height: 40px;
  display: flex;
  align-items: center;
  padding-left: 8px;
  font-size: 0.85rem;
  color: var(--virchow-muted);
  background: var(--virchow-surface);
  border-bottom: 1px solid var(--virchow-border);
}

.form-grid {
  display: grid;
  grid-template-columns: repeat(3, minmax(0, 1fr));
  gap: 16px 32px;
  padding: 12px;
}

.form-field {
  display: flex;
  flex-direction: column;
  gap: 4px;
}

.form-field.is-wide {
  grid-column: 1 / -1;
}

.form-field label {
  font-size: 1.05rem;
}

.form-field input,
.form-field select,
.form-field textarea {
  font: inherit;
  padding: 6px 8px;
  border: 1px solid var(--virchow-border);
  border-radius: var(--virchow-radius);
}

.form-field textarea {
  min-height: 320px;
  resize: vertical;
}

.field-error {
  color: var(--virchow-error);
  font-size: 0.85rem;
}

.form-actions {
  display: flex;
  justify-content: flex-end;
  gap: 16px;
  padding: 12px;
}

.btn {
  background: var(--virchow-primary);
  color: #ffffff;
  border: none;
  border-radius: var(--virchow-radius);
  padding: 8px 24px;
  cursor: pointer;
  font-weight: 600;
}

.btn.is-secondary {
  background: #ffffff;
  color: var(--virchow-primary);
  border: 1px solid var(--virchow-primary);
}

.btn.is-danger {
  background: var(--virchow-error);
}

.row-actions {
  display: flex;
  gap: 8px;
  align-items: center;
}

.tag {
  font-size: 0.8rem;
  color: var(--virchow-error);
  font-weight: 600;
}

.btn:disabled {
  opacity: 0.6;
  cursor: progress;
}

.data-table {
  width: 100%;
  border-collapse: collapse;
}

.data-table th,
.data-table td {
  text-align: left;
  padding: 8px;
  border-bottom: 1px solid var(--virchow-border);
}

.data-table th {
  cursor: pointer;
  user-select: none;
  background: var(--virchow-surface);
}

.data-table th[data-sort="ascending"]::after {
  content: " ▲";
}

.data-table th[data-sort="descending"]::after {
  content: " ▼";
}

.data-table tr.is-invalidated td {
  color: var(--virchow-muted);
  text-decoration: line-through;
}

.data-table tr.is-clickable {
  cursor: pointer;
}

.data-table tr.is-clickable:hover td {
  background: rgba(12, 100, 124, 0.08);
}

.table-toolbar,
.table-pager {
  display: flex;
  align-items: center;
  justify-content: space-between;
  gap: 12px;
  padding: 8px;
}

.table-empty {
  text-align: center;
  color: var(--virchow-muted);
  padding: 24px;
}

.modal-backdrop {
  position: fixed;
  inset: 0;
  background: rgba(15, 23, 42, 0.45);
  display: flex;
  align-items: center;
  justify-content: center;
  z-index: 20;
}

.modal {
  background: #ffffff;
  width: min(900px, 92vw);
  max-height: 80vh;
  overflow: auto;
  border-radius: 8px;
  padding: 16px;
  display: flex;
  flex-direction: column;
  gap: 12px;
}

.modal header {
  display: flex;
  justify-content: space-between;
  align-items: center;
  font-weight: 700;
}

.login-card {
  width: min(420px, 90vw);
  margin: 12vh auto;
  padding: 32px;
  border: 1px solid var(--virchow-border);
  border-radius: 8px;
  display: flex;
  flex-direction: column;
  gap: 16px;
}

.login-card h1 {
  margin: 0;
  color: var(--virchow-primary);
  text-align: center;
}

.toast-stack {
  position: fixed;
  top: 72px;
  right: 16px;
  display: flex;
  flex-direction: column;
  gap: 8px;
  z-index: 30;
}

.toast {
  min-width: 260px;
  padding: 12px 16px;
  border-radius: var(--virchow-radius);
  color: #ffffff;
  box-shadow: 0 8px 24px rgba(15, 23, 42, 0.2);
}

.toast[data-level="success"] {
  background: var(--virchow-success);
}

.toast[data-level="warning"] {
  background: var(--virchow-warning);
}

.toast[data-level="error"] {
  background: var(--virchow-error);
}

.not-found {
  text-align: center;
  margin-top: 20vh;
}

@media (max-width: 900px) {
  .form-grid {
    grid-template-columns: minmax(0, 1fr);
  }

  .virchow-nav button {
    padding: 6px 12px;
    font-size: 0.75rem;
  }
}
"#;

/// Adiciona a folha de estilo ao `<head>`, a menos que uma montagem anterior já tenha feito.
pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }
    let Some(head) = document.head() else {
        return Err(JsValue::from_str("Documento sem <head>"));
    };

    let style = document.create_element("style")?;
    style.set_attribute("data-virchow-ui", "v1")?;
    style.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style)?;
    Ok(())
}
