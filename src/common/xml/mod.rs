//! XML helpers shared by the storage tokenizer.

mod escape;

pub use escape::{decode_entities, decode_reference, escape_bare_ampersands};
