pub mod context;
pub mod engine;
pub mod event;
pub mod types;
