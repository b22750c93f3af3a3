//! Token counting traits and estimators
//!
//! Two strategies are available: a BPE tokenizer ([Tiktoken](crate::utils::token::tiktoken::Tiktoken), behind the
//! default `tiktoken` feature) and a character heuristic. [TokenEstimator::detect] picks one at startup.

use std::fmt;
use lazy_static::lazy_static;
use log::debug;

#[cfg(feature = "tiktoken")]
pub mod tiktoken;

/// Roughly one token per four characters.
pub const CHARS_PER_TOKEN: usize = 4;

/// Trait for counting tokens in a string.
pub trait CountToken {
    fn count_token(&self, string: &str) -> usize;
}

/// Blanket impl of CountToken for Fn(&str) -> usize.
impl<F> CountToken for F where F: Fn(&str) -> usize {
    fn count_token(&self, string: &str) -> usize {
        self(string)
    }
}

/// Estimate the number of tokens as `max(1, chars / 4)`. Never returns 0, not even for an empty string.
#[inline]
pub fn count_tokens_by_chars(string: &str) -> usize {
    (string.chars().count() / CHARS_PER_TOKEN).max(1)
}

/// Token estimation strategy, chosen once and then passed to whoever needs to count.
#[derive(Clone)]
pub enum TokenEstimator {
    /// [count_tokens_by_chars]
    Heuristic,
    /// Exact count with a BPE encoding
    #[cfg(feature = "tiktoken")]
    Bpe(tiktoken::Tiktoken),
}

impl TokenEstimator {
    /// Use the BPE tokenizer if it can be loaded, else fall back to the character heuristic.
    pub fn detect() -> Self {
        load_bpe().unwrap_or(TokenEstimator::Heuristic)
    }

    /// Process-wide estimator, detected on first use and never modified afterwards.
    pub fn shared() -> &'static TokenEstimator {
        &SHARED_ESTIMATOR
    }

    pub fn name(&self) -> &str {
        match self {
            TokenEstimator::Heuristic => "chars/4",
            #[cfg(feature = "tiktoken")]
            TokenEstimator::Bpe(counter) => counter.encoding,
        }
    }
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self::detect()
    }
}

impl fmt::Debug for TokenEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TokenEstimator").field(&self.name()).finish()
    }
}

impl CountToken for TokenEstimator {
    fn count_token(&self, string: &str) -> usize {
        match self {
            TokenEstimator::Heuristic => count_tokens_by_chars(string),
            #[cfg(feature = "tiktoken")]
            TokenEstimator::Bpe(counter) => counter.count_token(string),
        }
    }
}

#[cfg(feature = "tiktoken")]
fn load_bpe() -> Option<TokenEstimator> {
    match tiktoken::Tiktoken::new() {
        Ok(counter) => {
            debug!("token estimator: using tiktoken encoding {}", counter.encoding);
            Some(TokenEstimator::Bpe(counter))
        }
        Err(err) => {
            debug!("token estimator: tiktoken unavailable ({}), using character heuristic", err);
            None
        }
    }
}

#[cfg(not(feature = "tiktoken"))]
fn load_bpe() -> Option<TokenEstimator> {
    debug!("token estimator: built without tiktoken, using character heuristic");
    None
}

lazy_static! {
    static ref SHARED_ESTIMATOR: TokenEstimator = TokenEstimator::detect();
}

/// Approximate token count of `text` with the [shared](TokenEstimator::shared) estimator.
pub fn approx_tokens(text: &str) -> usize {
    TokenEstimator::shared().count_token(text)
}

#[cfg(test)]
mod test_token {
    use super::{approx_tokens, count_tokens_by_chars, CountToken, TokenEstimator};

    #[test]
    fn test_fn_impl() {
        let counter = str::len;
        let size = counter.count_token("");
        assert_eq!(0, size);
    }

    #[test]
    fn test_heuristic() {
        assert_eq!(1, count_tokens_by_chars(""));
        assert_eq!(1, count_tokens_by_chars("abc"));
        assert_eq!(1, count_tokens_by_chars("abcd"));
        assert_eq!(1, count_tokens_by_chars("abcdefg"));
        assert_eq!(2, count_tokens_by_chars("abcdefgh"));
        // counts characters, not bytes
        assert_eq!(1, count_tokens_by_chars("ñññññññ"));
        assert_eq!(25, count_tokens_by_chars(&"x".repeat(100)));
    }

    #[test]
    fn test_heuristic_estimator_ignores_content() {
        let estimator = TokenEstimator::Heuristic;
        for text in ["hola", "destino: Cancún", "{}", "     ", "1234567890123456"] {
            assert_eq!(count_tokens_by_chars(text), estimator.count_token(text));
        }
    }

    #[test]
    fn test_non_empty_text_is_at_least_one_token() {
        let detected = TokenEstimator::detect();
        for text in ["a", " ", "ñ", "¡Hola!", "\n", "adultos: 2"] {
            assert!(TokenEstimator::Heuristic.count_token(text) >= 1);
            assert!(detected.count_token(text) >= 1);
            assert!(approx_tokens(text) >= 1);
        }
    }

    #[test]
    fn test_shared_is_initialized_once() {
        assert!(std::ptr::eq(TokenEstimator::shared(), TokenEstimator::shared()));
    }

    #[cfg(feature = "tiktoken")]
    #[test]
    fn test_detect_prefers_bpe() {
        let estimator = TokenEstimator::detect();
        assert_eq!("cl100k_base", estimator.name());
    }

    #[cfg(not(feature = "tiktoken"))]
    #[test]
    fn test_detect_without_tiktoken() {
        let estimator = TokenEstimator::detect();
        assert_eq!("chars/4", estimator.name());
        assert_eq!(2, estimator.count_token("12345678"));
    }
}
