//! Consolidated keyword heuristics for candidate validation.
//!
//! Both validation passes — the per-place admission check during keyword
//! search and the batch keep/promote pass over the full candidate set —
//! read from one [`Heuristics`] value, so the keyword sets and thresholds
//! cannot drift apart between the two call sites.

/// Keyword sets and thresholds driving both validation passes.
#[derive(Debug, Clone)]
pub struct Heuristics {
    /// Phrases that by themselves identify a substation. A name match
    /// force-keeps the candidate and raises confidence to at least
    /// [`Heuristics::promotion_floor`].
    pub strong_indicators: Vec<&'static str>,
    /// Weaker terms; at least one must appear in the name for a place to
    /// be admitted at search time.
    pub weak_indicators: Vec<&'static str>,
    /// A name containing any of these is rejected outright, regardless of
    /// other matches.
    pub exclusions: Vec<&'static str>,
    /// Provider category tags a candidate must intersect to be admitted.
    pub relevant_types: Vec<&'static str>,
    /// Minimum confidence (exclusive) for keyword-provenance candidates
    /// to survive the batch pass.
    pub keyword_keep_threshold: u8,
    /// Minimum confidence (exclusive) for satellite-provenance candidates
    /// to survive the batch pass.
    pub satellite_keep_threshold: u8,
    /// Confidence floor applied to strong-indicator matches.
    pub promotion_floor: u8,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            strong_indicators: vec![
                "substation",
                "transmission",
                "distribution",
                "switching station",
                "transformer station",
                "electrical substation",
                "power substation",
            ],
            weak_indicators: vec![
                "substation",
                "transmission",
                "distribution",
                "switching",
                "transformer",
                "electrical",
                "power",
                "utility",
                "grid",
                "voltage",
                "electric",
                "station",
                "substtn",
                "sub station",
                "elec",
                "kv",
                "mva",
            ],
            exclusions: vec![
                "restaurant",
                "hotel",
                "store",
                "shop",
                "mall",
                "school",
                "hospital",
                "church",
                "park",
                "gas station",
                "bank",
                "office",
                "apartment",
                "house",
                "street",
                "road",
                "avenue",
                "boulevard",
                "drive",
            ],
            relevant_types: vec![
                "establishment",
                "point_of_interest",
                "premise",
                "subpremise",
            ],
            keyword_keep_threshold: 50,
            satellite_keep_threshold: 60,
            promotion_floor: 90,
        }
    }
}

impl Heuristics {
    #[must_use]
    pub fn has_strong_indicator(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.strong_indicators.iter().any(|kw| lower.contains(kw))
    }

    /// Number of distinct weak indicators appearing in the name.
    #[must_use]
    pub fn weak_indicator_count(&self, name: &str) -> usize {
        let lower = name.to_lowercase();
        self.weak_indicators
            .iter()
            .filter(|kw| lower.contains(*kw))
            .count()
    }

    #[must_use]
    pub fn has_exclusion(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.exclusions.iter().any(|kw| lower.contains(kw))
    }

    /// True when the provider categories intersect the relevant type set.
    #[must_use]
    pub fn types_relevant(&self, types: &[String]) -> bool {
        types
            .iter()
            .any(|t| self.relevant_types.contains(&t.as_str()))
    }

    /// Per-place admission check run during keyword search, before a place
    /// joins the candidate accumulator.
    #[must_use]
    pub fn admits(&self, name: &str, types: &[String]) -> bool {
        self.weak_indicator_count(name) > 0
            && self.types_relevant(types)
            && !self.has_exclusion(name)
    }
}
