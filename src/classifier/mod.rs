//! Rarity classification
//!
//! Keyword tables decide first; names with no keyword hit go to the semantic
//! fallback, and any fallback failure degrades to Common. Classification
//! never fails and never blocks the save path on an error.

mod keywords;
mod semantic;

pub use keywords::{KeywordMatcher, KeywordTable};
pub use semantic::{ClassifierError, GeminiClassifier, SemanticClassifier, Unavailable};

use tracing::{debug, warn};

use crate::config::ClassifierSettings;
use crate::domain::RarityTier;

/// Which path decided a classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationSource {
    /// Matched a built-in or configured keyword
    Keyword(String),
    /// Answered by the semantic classifier
    Semantic,
    /// Semantic fallback failed; defaulted to Common
    Defaulted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub tier: RarityTier,
    pub source: ClassificationSource,
}

/// Keyword matcher plus semantic fallback
pub struct RarityClassifier<S> {
    matcher: KeywordMatcher,
    semantic: S,
}

impl<S: SemanticClassifier> RarityClassifier<S> {
    /// Classifier over the built-in keyword tables
    pub fn new(semantic: S) -> Self {
        Self {
            matcher: KeywordMatcher::default(),
            semantic,
        }
    }

    pub fn with_table(table: &KeywordTable, semantic: S) -> Self {
        Self {
            matcher: KeywordMatcher::new(table),
            semantic,
        }
    }

    pub fn classify(&self, car_name: &str) -> RarityTier {
        self.classify_detailed(car_name).tier
    }

    /// Keyword-only lookup. Deterministic; never calls the fallback.
    pub fn keyword_tier(&self, car_name: &str) -> Option<RarityTier> {
        let normalized = car_name.to_lowercase();
        self.matcher.find(&normalized).map(|(tier, _)| tier)
    }

    pub fn classify_detailed(&self, car_name: &str) -> Classification {
        let normalized = car_name.to_lowercase();

        if let Some((tier, keyword)) = self.matcher.find(&normalized) {
            debug!(car = car_name, %tier, keyword, "Classified by keyword");
            return Classification {
                tier,
                source: ClassificationSource::Keyword(keyword.to_string()),
            };
        }

        let answer = self.semantic.classify(car_name).and_then(|text| {
            RarityTier::from_label(text.trim()).ok_or(ClassifierError::UnknownTier(text))
        });

        match answer {
            Ok(tier) => {
                debug!(car = car_name, %tier, "Classified by semantic fallback");
                Classification {
                    tier,
                    source: ClassificationSource::Semantic,
                }
            }
            Err(e) => {
                warn!(car = car_name, error = %e, "Semantic classification unavailable, defaulting to Common");
                Classification {
                    tier: RarityTier::Common,
                    source: ClassificationSource::Defaulted,
                }
            }
        }
    }
}

/// Build the classifier described by the settings: built-in keywords plus
/// configured extras, with the Gemini fallback when it has credentials.
pub fn from_settings(settings: &ClassifierSettings) -> RarityClassifier<Box<dyn SemanticClassifier>> {
    let mut table = KeywordTable::default();
    for (label, words) in &settings.extra_keywords {
        match RarityTier::from_label(label) {
            Some(tier) => table.extend(tier, words),
            None => warn!(tier = %label, "Ignoring extra keywords for unknown tier"),
        }
    }

    let semantic: Box<dyn SemanticClassifier> = match GeminiClassifier::from_settings(settings) {
        Some(gemini) => Box::new(gemini),
        None => {
            debug!("Semantic classifier not configured; keyword misses default to Common");
            Box::new(Unavailable)
        }
    };

    RarityClassifier::with_table(&table, semantic)
}
