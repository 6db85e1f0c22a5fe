//! Fuzzy matching via Levenshtein edit distance
//!
//! Approximate string comparison tolerant of small differences: exact and
//! containment matches short-circuit, everything else is measured by
//! normalized edit distance against a similarity threshold.

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Default similarity threshold for a fuzzy hit
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Thresholded fuzzy matcher
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl FuzzyMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Approximate match between query and target.
    ///
    /// Case-insensitive equality or either-contains-the-other is always a
    /// hit; otherwise similarity `1 - distance / max_len` must reach the
    /// threshold.
    pub fn is_match(&self, query: &str, target: &str) -> bool {
        if query.is_empty() || target.is_empty() {
            return false;
        }

        let query = normalize(query);
        let target = normalize(target);

        if query == target {
            return true;
        }

        if target.contains(&query) || query.contains(&target) {
            return true;
        }

        self.similarity(&query, &target) >= self.threshold
    }

    /// Normalized similarity in [0, 1] over already-normalized inputs
    fn similarity(&self, query: &str, target: &str) -> f64 {
        let distance = levenshtein(query, target);
        let max_len = query.graphemes(true).count().max(target.graphemes(true).count());
        if max_len == 0 {
            return 1.0;
        }
        1.0 - (distance as f64 / max_len as f64)
    }

    /// Case-insensitive substring check, no edit-distance tolerance
    pub fn contains(&self, haystack: &str, needle: &str) -> bool {
        if needle.is_empty() {
            return false;
        }
        normalize(haystack).contains(&normalize(needle))
    }
}

/// NFC-normalize, trim, and lowercase for comparison
fn normalize(text: &str) -> String {
    text.nfc().collect::<String>().trim().to_lowercase()
}

/// Classic DP edit distance over grapheme clusters, unit cost per
/// insert/delete/substitute. Two-row formulation, O(len1·len2) time.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<&str> = a.graphemes(true).collect();
    let b: Vec<&str> = b.graphemes(true).collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ga) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, gb) in b.iter().enumerate() {
            let substitute = prev[j] + usize::from(ga != gb);
            let insert = curr[j] + 1;
            let delete = prev[j + 1] + 1;
            curr[j + 1] = substitute.min(insert).min(delete);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
