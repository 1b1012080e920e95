pub mod errors;
pub mod formatting;
pub mod notices;
#[cfg(not(target_family = "wasm"))]
pub mod poll;
pub mod sequence;
