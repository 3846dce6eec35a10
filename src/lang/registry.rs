//! Resolves a configured language tag to its [`LanguageProcessor`], and
//! implements the `"auto"` sentinel by trying every registered processor.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::AUTO_LANGUAGE;
use crate::error::{EngineError, Result};

use super::{EnglishProcessor, GermanProcessor, LanguageProcessor};

/// Holds the language processors the engine was configured with, keyed by
/// language tag, and resolves the `"auto"` sentinel to "every registered
/// processor" rather than a single one.
#[derive(Clone)]
pub struct ProcessorRegistry {
    processors: HashMap<String, Arc<dyn LanguageProcessor>>,
}

impl ProcessorRegistry {
    /// Builds a registry containing only the built-in English and German
    /// processors, matching the tags named in `languages`. `"auto"` pulls
    /// in both built-ins.
    pub fn from_language_tags(languages: &[String]) -> Result<Self> {
        let mut registry = ProcessorRegistry { processors: HashMap::new() };

        let wants_auto = languages.iter().any(|tag| tag == AUTO_LANGUAGE);
        let english = || Arc::new(EnglishProcessor::new()) as Arc<dyn LanguageProcessor>;
        let german = || Arc::new(GermanProcessor::new()) as Arc<dyn LanguageProcessor>;

        if wants_auto {
            registry.register(english());
            registry.register(german());
            return Ok(registry);
        }

        for tag in languages {
            match tag.as_str() {
                "english" => registry.register(english()),
                "german" => registry.register(german()),
                other => return Err(EngineError::MissingProcessor(other.to_string())),
            }
        }

        if registry.processors.is_empty() {
            return Err(EngineError::Configuration("no languages configured".to_string()));
        }

        Ok(registry)
    }

    pub fn register(&mut self, processor: Arc<dyn LanguageProcessor>) {
        self.processors.insert(processor.language_tag().to_string(), processor);
    }

    /// Resolves a single tag, or errors with [`EngineError::MissingProcessor`].
    pub fn get(&self, tag: &str) -> Result<&Arc<dyn LanguageProcessor>> {
        self.processors
            .get(tag)
            .ok_or_else(|| EngineError::MissingProcessor(tag.to_string()))
    }

    /// All registered processors, in no particular order. Used by the
    /// `"auto"` search path, which must try every processor.
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn LanguageProcessor>> {
        self.processors.values()
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}
