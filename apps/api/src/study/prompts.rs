// Prompt templates for the study tools: document upload, URL analysis, chat.

/// Characters of extracted document text sent for summarization.
pub const UPLOAD_TEXT_LIMIT: usize = 10_000;
/// Characters of combined scraped content sent for summarization.
pub const URL_CONTENT_LIMIT: usize = 20_000;
/// Characters of chat context sent with a question.
pub const CHAT_CONTEXT_LIMIT: usize = 30_000;

/// Replace `{text}` before sending.
pub const DOCUMENT_SUMMARY_PROMPT: &str =
    "Summarize the following document content into key points:\n\n{text}";

/// Replace `{content}` before sending.
pub const WEBSITE_SUMMARY_PROMPT: &str =
    "Summarize the content from these websites:\n\n{content}";

/// Replace `{context}` and `{question}` before sending.
pub const CHAT_PROMPT: &str = "Context:
{context}

Question: {question}

Answer based on the context if possible. Otherwise use general knowledge, \
but mention that the answer is not in the context.";
