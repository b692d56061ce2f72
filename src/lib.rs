//! Career copilot: live job aggregation plus LLM-backed career actions behind one chat API

pub mod cli;
pub mod copilot;
pub mod core;
pub mod jobs;
pub mod llm;
pub mod utils;
pub mod web;

pub use copilot::CareerCopilot;
pub use web::{build_rocket, start_web_server};
