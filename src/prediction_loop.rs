pub mod core;
pub mod error;
pub mod render;
pub mod run_effect;
pub mod session;
