//! Answer prompt construction.

use crate::core::types::ScoredChunk;

/// Prompt sent to the answer model. `{context}` and `{question}` are
/// substituted by [`render`].
pub const PROMPT_TEMPLATE: &str = "\
You are a highly knowledgeable assistant that answers based only on the provided context.

- Answer in a clear and structured way.
- Do not make up answers if the context doesn't contain it.
- Use bullet points where helpful.
- Respond in the same language as the question.

Context:
{context}

Question:
{question}

Answer:
";

/// Join retrieved chunk texts into one context block
pub fn join_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fill the template with a question and its context
///
/// Placeholders are filled by position, so braces inside either input
/// are copied through literally.
pub fn render(question: &str, context: &str) -> String {
    let parts = PROMPT_TEMPLATE
        .split_once("{context}")
        .and_then(|(head, tail)| tail.split_once("{question}").map(|(mid, end)| (head, mid, end)));

    match parts {
        Some((head, mid, end)) => format!("{head}{context}{mid}{question}{end}"),
        None => PROMPT_TEMPLATE.to_string(),
    }
}
