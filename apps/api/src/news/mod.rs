// Trending tech news generated by the model, with a canned fallback.

pub mod handlers;
pub mod models;
pub mod prompts;
