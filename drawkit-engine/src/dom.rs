//! Minimal DOM helpers.

use wasm_bindgen::JsValue;
use web_sys::Element;

/// Create an element with the given attributes.
///
/// # Errors
///
/// Returns an error if there is no document or an attribute is rejected.
pub fn create_element(tag: &str, attributes: &[(&str, &str)]) -> Result<Element, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document available"))?;
    let element = document.create_element(tag)?;
    for (name, value) in attributes {
        element.set_attribute(name, value)?;
    }
    tracing::debug!("Created <{tag}> with {} attributes", attributes.len());
    Ok(element)
}
