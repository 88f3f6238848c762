//! Loading data files over `fetch`

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::data::{cheats_or_empty, questions_or_default};
use crate::quiz::{CheatList, DataError, QuestionBank};

fn js_error(url: &str, e: JsValue) -> DataError {
    DataError::Fetch(format!("{url}: {e:?}"))
}

/// Fetch a URL and return its body as text
pub async fn fetch_text(url: &str) -> Result<String, DataError> {
    let window = web_sys::window().ok_or_else(|| DataError::Fetch("no window".into()))?;
    let value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| js_error(url, e))?;
    let response: Response = value.dyn_into().map_err(|e| js_error(url, e))?;
    if !response.ok() {
        return Err(DataError::Fetch(format!(
            "{url}: HTTP {}",
            response.status()
        )));
    }
    let body = response.text().map_err(|e| js_error(url, e))?;
    let text = JsFuture::from(body).await.map_err(|e| js_error(url, e))?;
    text.as_string()
        .ok_or_else(|| DataError::Fetch(format!("{url}: body is not text")))
}

pub async fn load_questions(url: &str) -> QuestionBank {
    questions_or_default(url, fetch_text(url).await)
}

pub async fn load_cheats(url: &str) -> CheatList {
    cheats_or_empty(url, fetch_text(url).await)
}
