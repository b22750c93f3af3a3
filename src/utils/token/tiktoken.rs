use anyhow::{bail, Result};
pub use tiktoken_rs::CoreBPE;
use tiktoken_rs::{cl100k_base, o200k_base};
use log::debug;

use crate::utils::token::CountToken;

/// Encoding tried first.
pub const PRIMARY_ENCODING: &str = "cl100k_base";
/// Encoding used when the primary one cannot be loaded.
pub const FALLBACK_ENCODING: &str = "o200k_base";

/// Counter using the Tiktoken tokenizer.
#[derive(Clone)]
#[readonly::make]
pub struct Tiktoken {
    /// The encoding name of the tokenizer. read-only.
    #[readonly]
    pub encoding: &'static str,
    /// The tokenizer. read-only.
    #[readonly]
    pub bpe: CoreBPE,
}

impl Tiktoken {
    /// Create a new Tiktoken counter with [PRIMARY_ENCODING], or [FALLBACK_ENCODING] if that fails.
    pub fn new() -> Result<Self> {
        Self::with_encoding(PRIMARY_ENCODING).or_else(|err| {
            debug!("failed to load {}: {}, trying {}", PRIMARY_ENCODING, err, FALLBACK_ENCODING);
            Self::with_encoding(FALLBACK_ENCODING)
        })
    }

    /// Create a new Tiktoken counter with a named encoding.
    pub fn with_encoding(name: &str) -> Result<Self> {
        let (encoding, bpe) = match name {
            PRIMARY_ENCODING => (PRIMARY_ENCODING, cl100k_base()?),
            FALLBACK_ENCODING => (FALLBACK_ENCODING, o200k_base()?),
            other => bail!("encoding {} is not supported", other),
        };
        Ok(Tiktoken {
            encoding,
            bpe,
        })
    }
}

impl CountToken for Tiktoken {
    fn count_token(&self, string: &str) -> usize {
        self.bpe.encode_with_special_tokens(string).len()
    }
}

#[cfg(test)]
mod test_tiktoken {
    use super::{Tiktoken, FALLBACK_ENCODING, PRIMARY_ENCODING};
    use crate::utils::token::CountToken;

    #[test]
    fn test_named_encodings() {
        let primary = Tiktoken::with_encoding(PRIMARY_ENCODING).unwrap();
        assert_eq!(PRIMARY_ENCODING, primary.encoding);
        let fallback = Tiktoken::with_encoding(FALLBACK_ENCODING).unwrap();
        assert_eq!(FALLBACK_ENCODING, fallback.encoding);
        assert!(Tiktoken::with_encoding("p50k_unknown").is_err());
    }

    #[test]
    fn test_count() {
        let counter = Tiktoken::new().unwrap();
        assert_eq!(0, counter.count_token(""));
        assert_eq!(2, counter.count_token("hello world"));
    }
}
