use crate::utils::error::{BotError, Result};
use crate::utils::validation::validate_non_empty_string;
use regex::{Regex, RegexBuilder};

/// Berlin district matchers in precedence order. 第一個命中的規則優先。
const BERLIN_PATTERNS: [(&str, &str); 12] = [
    ("charlottenburg|wilmersdorf", "Charlottenburg-Wilm."),
    ("friedrichshain|kreuzberg", "Friedrichshain-Kreuzberg"),
    ("lichtenberg", "Lichtenberg"),
    ("marzahn|hellersdorf", "Marzahn - Hellersdorf"),
    ("mitte", "Mitte"),
    ("neukölln|neukoelln", "Neukölln"),
    ("pankow", "Pankow"),
    ("reinickendorf", "Reinickendorf"),
    ("spandau", "Spandau"),
    ("steglitz|zehlendorf", "Steglitz - Zehlendorf"),
    ("tempelhof|schöneberg|schoeneberg", "Tempelhof - Schöneberg"),
    ("treptow|köpenick|koepenick", "Treptow - Köpenick"),
];

#[derive(Debug, Clone)]
pub struct PatternEntry {
    pub matcher: Regex,
    pub district: String,
}

impl PatternEntry {
    pub fn new(matcher: &str, district: &str) -> Result<Self> {
        validate_non_empty_string("patterns.matcher", matcher)?;
        validate_non_empty_string("patterns.district", district)?;

        // 比對一律不分大小寫（含變音字母），避免表格與輸入的大小寫不一致
        let matcher = RegexBuilder::new(matcher)
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            matcher,
            district: district.to_string(),
        })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }
}

/// Ordered, immutable list of location matchers.
#[derive(Debug, Clone)]
pub struct PatternTable {
    entries: Vec<PatternEntry>,
}

impl PatternTable {
    pub fn berlin() -> Result<Self> {
        Self::from_pairs(BERLIN_PATTERNS)
    }

    pub fn from_pairs<I, M, D>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (M, D)>,
        M: AsRef<str>,
        D: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .map(|(matcher, district)| PatternEntry::new(matcher.as_ref(), district.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        if entries.is_empty() {
            return Err(BotError::ConfigError {
                message: "The location pattern table must contain at least one entry".to_string(),
            });
        }

        tracing::debug!("Built pattern table with {} entries", entries.len());
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    /// District names in declared order, each listed once.
    pub fn districts(&self) -> Vec<&str> {
        let mut districts: Vec<&str> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if !districts.contains(&entry.district.as_str()) {
                districts.push(&entry.district);
            }
        }
        districts
    }
}
