#![cfg(target_arch = "wasm32")]

use js_sys::{Array, Uint8Array};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, Url};

/// Abre `bytes` como PDF numa nova aba.
pub fn open_pdf(bytes: &[u8]) -> Result<(), JsValue> {
    let data = Uint8Array::from(bytes);
    let parts = Array::of1(&data.buffer());
    let options = BlobPropertyBag::new();
    options.set_type("application/pdf");
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Sem window"))?;
    window.open_with_url_and_target(&url, "_blank")?;
    Ok(())
}
