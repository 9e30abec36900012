//! Prompt text for panel rounds, the justifier and evidence merging.

mod template;

pub use template::PromptTemplate;
