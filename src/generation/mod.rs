//! Source generation from captured payloads.
//!
//! # Data Flow
//! ```text
//! /generate handler
//!     → load bodies from the store
//!     → build_prompt(bodies)
//!     → TextGenerator::generate(prompt)   (gemini.rs in production)
//!     → strip_code_fences(reply)
//! ```
//!
//! The handler depends only on [`TextGenerator`], so any provider (or a test
//! double) can be injected.

pub mod gemini;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiGenerator;

/// Failure of an upstream text generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("network error: {0}")]
    Network(String),

    #[error("upstream returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not decode upstream response: {0}")]
    Decode(String),

    #[error("upstream returned no text")]
    EmptyResponse,

    #[error("generator misconfigured: {0}")]
    Config(String),
}

/// Prompt in, text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Build the handler-generation prompt from example payloads.
pub fn build_prompt<S: AsRef<str>>(bodies: &[S]) -> String {
    let examples = bodies
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Generate a TypeScript function that serves as a handler for multiple webhook events. \
The function should accept a request body containing different webhook events and validate \
the incoming data using Zod. Each webhook event type should have its own schema defined using Zod.

The function should handle the following webhook events with example payloads:

\"\"\"
{examples}
\"\"\"

The generated code should include:

- A main function that takes the webhook request body as input.
- Zod schemas for each event type.
- Logic to handle each event based on the validated data.
- Appropriate error handling for invalid payloads.

Return only the code and do not return ```typescript or any other markdown symbols, \
do not include any introduction or text before or after the code."
    )
}

/// Remove a surrounding markdown code fence, if the model added one anyway.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    // Drop the info string (`typescript`, `ts`, ...) on the opening line.
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => return String::new(),
    };
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_every_body_in_order() {
        let prompt = build_prompt(&["{\"type\":\"a\"}", "{\"type\":\"b\"}"]);
        let a = prompt.find("{\"type\":\"a\"}").unwrap();
        let b = prompt.find("{\"type\":\"b\"}").unwrap();
        assert!(a < b);
        assert!(prompt.contains("{\"type\":\"a\"}\n\n{\"type\":\"b\"}"));
        assert!(prompt.contains("Zod"));
    }

    #[test]
    fn strips_typescript_fence() {
        let reply = "```typescript\nconst x = 1;\n```\n";
        assert_eq!(strip_code_fences(reply), "const x = 1;");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fences("```\nfoo()\n```"), "foo()");
    }

    #[test]
    fn leaves_unfenced_code_alone() {
        assert_eq!(strip_code_fences("  export const h = 1;\n"), "export const h = 1;");
    }

    #[test]
    fn tolerates_missing_closing_fence() {
        assert_eq!(strip_code_fences("```ts\nlet a = 2;"), "let a = 2;");
    }
}
