//! Interface web do cliente de laudos Virchow, feita com Yew.
//!
//! Fora as funções de posição de texto e as opções de montagem, tudo aqui
//! só compila para `wasm32`.

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod offsets;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod options;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod editor;
#[cfg(target_arch = "wasm32")]
mod pages;
#[cfg(target_arch = "wasm32")]
mod pdf;
#[cfg(target_arch = "wasm32")]
mod storage;
#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
pub use app::mount_app;

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_app(
    _: &str,
    _: Option<wasm_bindgen::JsValue>,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "virchow-ui só pode ser compilado para wasm32",
    ))
}
