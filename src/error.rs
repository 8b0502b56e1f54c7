use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum SnakeError {
  #[error("no global `window` exists")]
  MissingWindow,
  #[error("window has no document")]
  MissingDocument,
  #[error("element `#{0}` not found or has the wrong type")]
  MissingElement(&'static str),
  #[error("unable to obtain a 2d context from the canvas")]
  MissingContext,
  #[error("high score storage failed: {0}")]
  Storage(String),
  #[error("timer scheduling failed: {0}")]
  Scheduler(String),
  #[error("javascript error: {0}")]
  Js(String),
  #[error(transparent)]
  Config(#[from] ConfigError),
}

impl SnakeError {
  pub(crate) fn describe(value:&JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
  }
}

impl From<JsValue> for SnakeError {
  fn from(value:JsValue) -> Self {
    SnakeError::Js(Self::describe(&value))
  }
}

impl From<SnakeError> for JsValue {
  fn from(err:SnakeError) -> Self {
    JsValue::from_str(&err.to_string())
  }
}
