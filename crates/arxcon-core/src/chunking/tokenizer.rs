use once_cell::sync::Lazy;
use tiktoken_rs::{cl100k_base, CoreBPE};

static TOKENIZER: Lazy<Option<CoreBPE>> = Lazy::new(|| match cl100k_base() {
    Ok(bpe) => Some(bpe),
    Err(e) => {
        tracing::warn!("cl100k tokenizer unavailable, estimating token counts: {}", e);
        None
    }
});

/// Shared cl100k tokenizer, if it loaded
pub fn tokenizer() -> Option<&'static CoreBPE> {
    TOKENIZER.as_ref()
}

pub fn count_tokens(text: &str) -> usize {
    match tokenizer() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len(),
        // Roughly four characters per token for English prose.
        None => text.chars().count().div_ceil(4),
    }
}
