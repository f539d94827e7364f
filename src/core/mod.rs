pub mod cleaning;
pub mod dictionary;
pub mod etl;
pub mod normalizer;
pub mod replacer;

pub use crate::domain::model::{CleaningOutcome, TextUnit};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
