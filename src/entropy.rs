use wasm_bindgen::prelude::*;

/// Seed for the apple generator, drawn from `Math.random`.
pub fn seed() -> u64 {
  let high = (random() * u32::MAX as f64).floor() as u64;
  let low  = (random() * u32::MAX as f64).floor() as u64;
  (high << 32) | low
}

#[wasm_bindgen]
extern "C" {
  #[wasm_bindgen(js_namespace = Math, js_name = random)]
  fn random() -> f64;
}
