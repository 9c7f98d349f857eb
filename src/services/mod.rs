pub mod file_validator;
pub mod metric_format;
pub mod model_info;
pub mod renderer;
pub mod upload;
