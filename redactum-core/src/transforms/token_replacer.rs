// File: redactum-core/src/transforms/token_replacer.rs

//! Replaces each span with a deterministic token derived from its value.
//!
//! The token is an HMAC-SHA256 of the span's normalized text keyed by a seed,
//! rendered through a TinyTemplate format. Because the transform sees the
//! whole batch at once and the token depends only on (seed, kind, value), the
//! same value receives the same token in every document of a call.
//!
//! license: MIT OR Apache-2.0

use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use tinytemplate::{format_unescaped, TinyTemplate};

use crate::config::TokenConfig;
use crate::errors::{Result, ScrubError};
use crate::plugin::{Plugin, Transform};
use crate::span::{canonical_sample_hash, Span};

type HmacSha256 = Hmac<Sha256>;

/// Key used when no seed is configured.
const DEFAULT_TOKEN_SEED: &[u8] = b"redactum-token-seed-v1-salt";

#[derive(Serialize)]
struct TokenContext<'a> {
    kind: &'a str,
    shorthash: &'a str,
}

/// Renders `token_fmt` with `kind` and the first eight hex chars of `hash_hex`.
pub fn format_token(token_fmt: &str, kind: &str, hash_hex: &str) -> Result<String> {
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&format_unescaped);
    tt.add_template("t", token_fmt)
        .map_err(|e| ScrubError::Config(format!("Failed to parse token template: {}", e)))?;
    let shorthash = hash_hex.get(0..8).unwrap_or(hash_hex);
    tt.render("t", &TokenContext { kind, shorthash })
        .map_err(|e| ScrubError::Transform {
            name: TokenReplacer::NAME.to_string(),
            message: format!("Failed to render token template: {}", e),
        })
}

#[derive(Debug, Clone)]
pub struct TokenReplacer {
    token_format: String,
    seed: Vec<u8>,
}

impl TokenReplacer {
    pub const NAME: &'static str = "token_replacer";

    pub fn new(token_format: impl Into<String>, seed: Vec<u8>) -> Result<Self> {
        let token_format = token_format.into();
        // Reject malformed templates at construction rather than mid-pipeline.
        format_token(&token_format, "kind", "00000000")?;
        Ok(Self { token_format, seed })
    }

    pub fn from_config(config: &TokenConfig) -> Result<Self> {
        let seed = match &config.seed_hex {
            Some(hex_seed) => hex::decode(hex_seed)
                .map_err(|e| ScrubError::Config(format!("token seed_hex is not valid hex: {}", e)))?,
            None => DEFAULT_TOKEN_SEED.to_vec(),
        };
        Self::new(config.token_format.clone(), seed)
    }

    fn value_hash(&self, span: &Span) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(&self.seed).map_err(|e| ScrubError::Transform {
            name: Self::NAME.to_string(),
            message: format!("Failed to create HMAC from seed: {}", e),
        })?;
        mac.update(canonical_sample_hash(&span.kind, &span.text).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl Default for TokenReplacer {
    fn default() -> Self {
        Self {
            token_format: TokenConfig::default().token_format,
            seed: DEFAULT_TOKEN_SEED.to_vec(),
        }
    }
}

impl Plugin for TokenReplacer {
    fn name(&self) -> &str {
        Self::NAME
    }
}

impl Transform for TokenReplacer {
    fn process(&self, spans: Vec<Span>) -> Result<Vec<Span>> {
        spans
            .into_iter()
            .map(|mut span| {
                let hash = self.value_hash(&span)?;
                let token = format_token(&self.token_format, &span.kind.to_uppercase(), &hash)?;
                span.fixed_replacement = Some(token);
                Ok(span)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_token_is_unescaped() {
        let token = format_token("<{kind}:{shorthash}>", "EMAIL", "0123456789abcdef").unwrap();
        assert_eq!(token, "<EMAIL:01234567>");
    }

    #[test]
    fn test_same_value_same_token_across_documents() {
        let spans = vec![
            Span::new(0, 7, "email", "a@b.com").with_document(Some("x")),
            Span::new(4, 11, "email", "A@B.com").with_document(Some("y")),
            Span::new(0, 7, "email", "c@d.com").with_document(Some("y")),
        ];
        let out = TokenReplacer::default().process(spans).unwrap();
        assert_eq!(out[0].fixed_replacement, out[1].fixed_replacement);
        assert_ne!(out[0].fixed_replacement, out[2].fixed_replacement);
        assert!(out[0].fixed_replacement.as_deref().unwrap().starts_with("EMAIL-"));
    }

    #[test]
    fn test_seed_changes_tokens() {
        let span = vec![Span::new(0, 7, "email", "a@b.com")];
        let a = TokenReplacer::default().process(span.clone()).unwrap();
        let config = TokenConfig { seed_hex: Some("deadbeef".to_string()), ..Default::default() };
        let b = TokenReplacer::from_config(&config).unwrap().process(span).unwrap();
        assert_ne!(a[0].fixed_replacement, b[0].fixed_replacement);
    }

    #[test]
    fn test_bad_seed_is_config_error() {
        let config = TokenConfig { seed_hex: Some("zz".to_string()), ..Default::default() };
        assert!(matches!(TokenReplacer::from_config(&config), Err(ScrubError::Config(_))));
    }
}
