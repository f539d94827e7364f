// Adapters layer: file formats around the cleaning engine (dictionary CSV, note readers, output writers).

pub mod dictionary_source;
pub mod input;
pub mod output;
