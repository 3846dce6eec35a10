//! # fuzzy-engine
//!
//! An embeddable, in-memory fuzzy text search engine: typo-, phonetic- and
//! synonym-tolerant ranked retrieval over a corpus of strings or records.
//!
//! ## Example
//!
//! ```
//! use fuzzy_engine::{BuildOptions, Engine, EngineConfig, Item, SearchOptions};
//!
//! let items = vec![Item::text("apple"), Item::text("apricot"), Item::text("banana")];
//! let mut engine = Engine::build(items, EngineConfig::balanced(), BuildOptions::default()).unwrap();
//! let results = engine.search("aple", SearchOptions::default()).unwrap();
//! assert_eq!(results[0].base_id, "apple");
//! ```

pub mod builder;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod filters;
pub mod index;
pub mod item;
pub mod lang;
pub mod phrase_search;
pub mod result;
pub mod scoring;
pub mod snapshot;
pub mod text;

pub use config::{Bm25Config, EngineConfig, MatchTypeScores, PerformanceMode, AUTO_LANGUAGE};
pub use engine::{BuildOptions, Engine, SearchOptions};
pub use error::{EngineError, Result};
pub use filters::{FieldFilter, SortDirection, SortKey};
pub use index::MatchType;
pub use item::Item;
pub use lang::Capability;
pub use result::{HighlightSpan, MatchTypeLabel, SearchResult};

// Tests are defined in their respective modules with #[cfg(test)]
