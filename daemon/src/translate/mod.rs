//! Text translation engine boundary.

use std::collections::BTreeSet;

use anyhow::Result;
use async_trait::async_trait;

use crate::language::LanguageCode;

mod libre;

pub use libre::LibreTranslateClient;

/// Maps text from one language to another.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `from` to `to`.
    ///
    /// Returns an empty string when either language is not installed in the
    /// engine. Errors are reserved for the engine itself failing.
    async fn translate(&self, from: &LanguageCode, to: &LanguageCode, text: &str)
    -> Result<String>;

    /// Languages the engine can translate between. Setup-time query only.
    fn installed_languages(&self) -> BTreeSet<LanguageCode>;
}
