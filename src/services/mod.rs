pub mod api;
pub mod heroes;
pub mod pipeline;
