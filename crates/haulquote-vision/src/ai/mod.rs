//! AI backends and prompts

pub mod backend;
pub mod gemini;
pub mod prompts;
