//! Decoding a user-chosen image file in the browser.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{File, HtmlImageElement, Url};

/// Decode `file` through an object URL.
///
/// `on_done` runs exactly once: with the image after `onload`, or with
/// `Err(())` after `onerror`. The object URL is revoked either way.
///
/// # Errors
///
/// Returns `Err` if the object URL or the image element cannot be created.
pub fn load(file: &File, on_done: impl FnOnce(Result<HtmlImageElement, ()>) + 'static) -> Result<(), JsValue> {
    let url = Url::create_object_url_with_blob(file)?;
    let img = HtmlImageElement::new()?;

    let slot = Rc::new(Cell::new(Some(on_done)));
    let finish = {
        let url = url.clone();
        move |result: Result<HtmlImageElement, ()>| {
            if let Err(err) = Url::revoke_object_url(&url) {
                tracing::warn!(?err, "failed to revoke object URL");
            }
            if let Some(done) = slot.take() {
                done(result);
            }
        }
    };
    let finish = Rc::new(finish);

    let onload = {
        let finish = Rc::clone(&finish);
        let img = img.clone();
        Closure::once_into_js(move || finish(Ok(img)))
    };
    let onerror = Closure::once_into_js(move || finish(Err(())));

    img.set_onload(Some(onload.unchecked_ref()));
    img.set_onerror(Some(onerror.unchecked_ref()));
    img.set_src(&url);
    tracing::debug!(name = %file.name(), size = file.size(), "decoding image");
    Ok(())
}
