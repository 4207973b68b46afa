//! Error types for engine construction.
//!
//! Only construction can fail. Everything after that (option parsing, frame
//! ticks, calls on a destroyed engine) is absorbed and logged instead.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum SnowError {
    #[error("failed to get window")]
    NoWindow,

    #[error("failed to get document")]
    NoDocument,

    #[error("no container element and document has no body")]
    NoContainer,

    /// The canvas refused to hand out a 2D context.
    #[error("2D canvas rendering context is not available")]
    ContextUnavailable,

    #[error("DOM call failed: {0}")]
    Dom(String),
}

impl SnowError {
    pub(crate) fn dom(value: JsValue) -> Self {
        SnowError::Dom(format!("{value:?}"))
    }
}

impl From<SnowError> for JsValue {
    fn from(err: SnowError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failure() {
        assert_eq!(
            SnowError::ContextUnavailable.to_string(),
            "2D canvas rendering context is not available"
        );
        assert_eq!(
            SnowError::Dom("boom".into()).to_string(),
            "DOM call failed: boom"
        );
    }
}
