// Study tools: document upload + summary, URL analysis, contextual chat.
// All LLM calls go through llm_client::ProviderResolver.

pub mod documents;
pub mod handlers;
pub mod markup;
pub mod prompts;
pub mod scraper;
