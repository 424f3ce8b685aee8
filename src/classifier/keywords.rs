//! Built-in keyword tables and the compiled per-tier matcher
//!
//! Tables are scanned rarest tier first; the first tier with any substring
//! hit wins, so a name carrying both an Uncommon and a Legendary keyword is
//! Legendary. A built-in keyword ending in a space must be followed by
//! whitespace or the end of the name, so "bmw m3 " skips "bmw m340i".

use std::collections::HashMap;

use regex::Regex;
use tracing::warn;

use crate::domain::RarityTier;

const LEGENDARY: &[&str] = &[
    "bugatti",
    "koenigsegg",
    "pagani",
    "rimac",
    "hennessey venom",
    "ssc tuatara",
    "gordon murray",
    "laferrari",
    "ferrari enzo",
    "ferrari f40",
    "ferrari f50",
    "mclaren p1",
    "mclaren senna",
    "mclaren f1",
    "porsche 918",
    "carrera gt",
    "ford gt",
    "aston martin valkyrie",
    "mercedes-amg one",
    "lexus lfa",
    "hypercar",
];

const EXOTIC: &[&str] = &[
    "lamborghini",
    "ferrari",
    "mclaren",
    "rolls-royce",
    "rolls royce",
    "bentley",
    "aston martin",
    "maybach",
    "maserati",
    "lotus",
    "audi r8",
    "gt3 rs",
    "porsche 911 turbo",
    "mercedes-amg gt",
    "acura nsx",
    "honda nsx",
    "supercar",
];

const RARE: &[&str] = &[
    "porsche",
    "corvette",
    "shelby",
    "gt500",
    "hellcat",
    "srt demon",
    "viper",
    "gt-r",
    "supra",
    "amg",
    "bmw m2 ",
    "bmw m3 ",
    "bmw m4 ",
    "bmw m5 ",
    "bmw m8 ",
    "bmw x5 m ",
    "bmw x6 m ",
    "audi rs",
    "cadillac v",
    "range rover",
    "g-class",
    "g-wagon",
    "lucid air",
    "plaid",
    "alpine",
    "hummer ev",
];

const UNCOMMON: &[&str] = &[
    "bmw",
    "mercedes",
    "audi",
    "lexus",
    "tesla",
    "land rover",
    "jaguar",
    "volvo",
    "genesis",
    "cadillac",
    "lincoln",
    "infiniti",
    "acura",
    "alfa romeo",
    "mini cooper",
    "polestar",
    "rivian",
    "mustang",
    "camaro",
    "challenger",
    "charger",
    "wrangler",
    "bronco",
    "wrx",
    "type r",
    "miata",
    "mx-5",
    "gti",
];

const COMMON: &[&str] = &[
    "toyota",
    "honda",
    "ford",
    "chevrolet",
    "chevy",
    "nissan",
    "hyundai",
    "kia",
    "mazda",
    "subaru",
    "volkswagen",
    "jeep",
    "dodge",
    "ram 1500",
    "ram 2500",
    "gmc",
    "chrysler",
    "buick",
    "mitsubishi",
    "fiat",
    "minivan",
];

/// Per-tier keyword lists
#[derive(Debug, Clone)]
pub struct KeywordTable {
    tiers: HashMap<RarityTier, Vec<String>>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        let builtin = [
            (RarityTier::Legendary, LEGENDARY),
            (RarityTier::Exotic, EXOTIC),
            (RarityTier::Rare, RARE),
            (RarityTier::Uncommon, UNCOMMON),
            (RarityTier::Common, COMMON),
        ];
        let tiers = builtin
            .into_iter()
            .map(|(tier, words)| (tier, words.iter().map(|w| w.to_string()).collect()))
            .collect();
        Self { tiers }
    }
}

impl KeywordTable {
    /// Append extra keywords to a tier. Keywords are lowercased; blanks are dropped.
    pub fn extend<I, S>(&mut self, tier: RarityTier, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = self.tiers.entry(tier).or_default();
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if !word.is_empty() && !list.contains(&word) {
                list.push(word);
            }
        }
    }

    pub fn keywords(&self, tier: RarityTier) -> &[String] {
        self.tiers.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Keyword tables compiled to one alternation regex per tier
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    /// Rarest tier first. Tiers with no keywords are absent.
    tiers: Vec<(RarityTier, Regex)>,
}

impl KeywordMatcher {
    pub fn new(table: &KeywordTable) -> Self {
        let tiers = RarityTier::ALL
            .iter()
            .rev()
            .filter_map(|&tier| {
                let words = table.keywords(tier);
                if words.is_empty() {
                    return None;
                }
                let alternation = words
                    .iter()
                    .map(|w| match w.strip_suffix(' ') {
                        Some(word) => format!(r"{}(?:\s|$)", regex::escape(word)),
                        None => regex::escape(w),
                    })
                    .collect::<Vec<_>>()
                    .join("|");
                compile_tier(tier, &alternation).map(|re| (tier, re))
            })
            .collect();
        Self { tiers }
    }

    /// Find the rarest tier with a keyword hit, with the keyword that hit
    pub fn find<'a>(&self, name: &'a str) -> Option<(RarityTier, &'a str)> {
        self.tiers
            .iter()
            .find_map(|(tier, re)| re.find(name).map(|m| (*tier, m.as_str().trim_end())))
    }
}

/// A tier whose pattern does not compile (size limit) is left out
fn compile_tier(tier: RarityTier, pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(%tier, pattern_len = pattern.len(), error = %e, "Keyword table does not compile, tier skipped");
            None
        }
    }
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(&KeywordTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_lowercase() {
        let table = KeywordTable::default();
        for tier in RarityTier::ALL {
            assert!(!table.keywords(tier).is_empty(), "{tier} has no keywords");
            for word in table.keywords(tier) {
                assert_eq!(word, &word.to_lowercase());
            }
        }
    }

    #[test]
    fn test_rarest_tier_wins() {
        let matcher = KeywordMatcher::default();
        // "bmw" is Uncommon, "bugatti" is Legendary
        let (tier, word) = matcher.find("bmw-powered bugatti replica").unwrap();
        assert_eq!(tier, RarityTier::Legendary);
        assert_eq!(word, "bugatti");
    }

    #[test]
    fn test_extend_adds_keywords() {
        let mut table = KeywordTable::default();
        table.extend(RarityTier::Rare, ["  Lada Niva ", ""]);
        let matcher = KeywordMatcher::new(&table);
        assert_eq!(
            matcher.find("1987 lada niva").map(|(t, _)| t),
            Some(RarityTier::Rare)
        );
    }

    #[test]
    fn test_no_match() {
        let matcher = KeywordMatcher::default();
        assert!(matcher.find("1987 lada niva").is_none());
    }

    #[test]
    fn test_word_ending_keywords() {
        let matcher = KeywordMatcher::default();
        assert_eq!(matcher.find("2021 bmw m3"), Some((RarityTier::Rare, "bmw m3")));
        assert_eq!(
            matcher.find("2022 bmw m4 competition"),
            Some((RarityTier::Rare, "bmw m4"))
        );
        assert_eq!(
            matcher.find("2019 bmw m5\tcs"),
            Some((RarityTier::Rare, "bmw m5"))
        );

        for trim in ["2023 bmw m340i xdrive", "2022 bmw m240i", "2021 bmw m550i"] {
            assert_eq!(matcher.find(trim), Some((RarityTier::Uncommon, "bmw")), "{trim}");
        }
    }

    #[test]
    fn test_uncompilable_tier_is_skipped() {
        assert!(compile_tier(RarityTier::Legendary, "bugatti|(").is_none());
        let re = compile_tier(RarityTier::Exotic, "lamborghini|ferrari").unwrap();
        assert!(re.is_match("ferrari roma"));
    }
}
