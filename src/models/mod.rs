pub mod classify_types;
pub mod model_types;
pub mod view_types;
