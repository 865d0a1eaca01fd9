// Continuous mock interview: opening question, follow-ups, final evaluation.

pub mod feedback;
pub mod handlers;
pub mod prompts;
pub mod transcript;
