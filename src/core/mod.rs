pub mod encoding;
pub mod etl;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod reader;

pub use crate::domain::model::{ConversionResult, Record};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
