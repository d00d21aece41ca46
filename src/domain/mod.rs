// Domain layer: record models and ports (interfaces) shared by the parser and the pipeline.

pub mod model;
pub mod ports;
