//! Record matching for the two search modes: typo-tolerant global search
//! and the per-field substring filter.
//!
//! The global search scores each query token against the text of every
//! search key with a bounded edit distance, in the spirit of a bitap search:
//! `errors / token_len + |offset - location| / distance`. A token matches
//! when that score stays within `threshold`, and a record matches when all
//! of its tokens do.

use distance::levenshtein;
use serde::Deserialize;
use serde::Serialize;

use crate::model::Record;
use crate::table::TableError;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FuzzyOptions {
    /// 0.0 only accepts exact matches, 1.0 accepts anything.
    pub threshold: f64,
    /// Where in the text a match is expected to start.
    pub location: usize,
    /// How far from `location` a match may drift before it costs a full point.
    pub distance: usize,
    /// Tokens shorter than this are ignored.
    pub min_token_len: usize,
    /// Longer tokens are truncated to this many characters.
    pub max_pattern_len: usize,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            threshold: 0.2,
            location: 0,
            distance: 100,
            min_token_len: 4,
            max_pattern_len: 32,
        }
    }
}

impl FuzzyOptions {
    pub fn validate(&self) -> Result<(), TableError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(TableError::InvalidFuzzyOption {
                name: "threshold",
                message: format!("{} is outside 0.0-1.0", self.threshold),
            });
        }
        if self.min_token_len == 0 {
            return Err(TableError::InvalidFuzzyOption {
                name: "min_token_len",
                message: "expected positive integer".to_string(),
            });
        }
        if self.max_pattern_len < self.min_token_len {
            return Err(TableError::InvalidFuzzyOption {
                name: "max_pattern_len",
                message: format!("must be at least min_token_len ({})", self.min_token_len),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuzzyMatch {
    /// Index of the record in the source sequence.
    pub index: usize,
    /// Mean token score, lower is better.
    pub score: f64,
}

#[derive(Clone, Debug)]
pub struct FuzzySearcher {
    keys: Vec<String>,
    options: FuzzyOptions,
}

impl FuzzySearcher {
    pub fn new(keys: Vec<String>, options: FuzzyOptions) -> Self {
        Self { keys, options }
    }

    /// Lowercased query tokens that take part in matching.
    pub fn tokenize(&self, query: &str) -> Vec<String> {
        query
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .filter(|t| t.chars().count() >= self.options.min_token_len)
            .map(|t| t.chars().take(self.options.max_pattern_len).collect())
            .collect()
    }

    /// Runs the query over `candidates`, given as `(source index, record)`
    /// pairs in view order. Results come back best first; equal scores keep
    /// the candidates' order.
    pub fn search<'a, I>(&self, candidates: I, query: &str) -> Vec<FuzzyMatch>
    where
        I: IntoIterator<Item = (usize, &'a Record)>,
    {
        let tokens = self.tokenize(query);
        if tokens.is_empty() || self.keys.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<FuzzyMatch> = Vec::new();
        for (index, record) in candidates {
            let texts: Vec<String> = self
                .keys
                .iter()
                .map(|k| record.text(k).to_lowercase())
                .collect();
            let mut total = 0.0;
            let mut all = true;
            for token in tokens.iter() {
                let best = texts
                    .iter()
                    .filter_map(|text| token_score(token, text, &self.options))
                    .fold(None, |acc: Option<f64>, s| match acc {
                        Some(a) if a <= s => Some(a),
                        _ => Some(s),
                    });
                match best {
                    Some(score) if score <= self.options.threshold => total += score,
                    _ => {
                        all = false;
                        break;
                    }
                }
            }
            if all {
                matches.push(FuzzyMatch {
                    index,
                    score: total / tokens.len() as f64,
                });
            }
        }

        matches.sort_by(|a, b| a.score.total_cmp(&b.score));
        matches
    }
}

fn proximity(offset: usize, options: &FuzzyOptions) -> f64 {
    let drift = offset.abs_diff(options.location);
    if options.distance == 0 {
        return if drift == 0 { 0.0 } else { 1.0 };
    }
    drift as f64 / options.distance as f64
}

/// Best score of `token` against any window of `text`. Windows one shorter
/// and one longer than the token let a single insertion or deletion cost one
/// edit instead of two.
fn token_score(token: &str, text: &str, options: &FuzzyOptions) -> Option<f64> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return None;
    }
    let n = token.chars().count();
    if n == 0 {
        return None;
    }

    let mut lengths = vec![n, n + 1];
    if n > 1 {
        lengths.push(n - 1);
    }

    let mut best: Option<f64> = None;
    for len in lengths {
        let windows: Vec<(usize, String)> = if chars.len() <= len {
            vec![(0, text.to_string())]
        } else {
            (0..=chars.len() - len)
                .map(|start| (start, chars[start..start + len].iter().collect()))
                .collect()
        };
        for (offset, window) in windows {
            let errors = levenshtein(token, &window);
            let score = errors as f64 / n as f64 + proximity(offset, options);
            if best.map_or(true, |b| score < b) {
                best = Some(score);
            }
            if score == 0.0 {
                return best;
            }
        }
    }
    best
}

/// Case-insensitive substring test on one field. Missing fields read as
/// empty text.
pub fn field_contains(record: &Record, field: &str, query: &str) -> bool {
    record
        .text(field)
        .to_lowercase()
        .contains(&query.to_lowercase())
}
