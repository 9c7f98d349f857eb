pub mod classify;
pub mod model_info;
pub mod surface;
