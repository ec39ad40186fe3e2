pub mod base_case;
pub mod engine;
pub mod summary;
