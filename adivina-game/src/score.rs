//! Similarity scoring: exact-match short circuit, oracle reply parsing, and
//! the local lexical fallback used whenever the oracle degrades.

use std::collections::HashSet;

use crate::SemanticOracle;
use crate::normalize::normalize;

/// Score reserved for an exact normalized match. Only the short-circuit path
/// can produce it; the oracle range and the fallback both top out at 99.
pub const EXACT_SCORE: u8 = 100;

/// Extract the oracle's integer verdict from a free-text reply: strip every
/// non-digit character and accept only values in `[0, 99]`.
#[must_use]
pub fn parse_oracle_reply(raw: &str) -> Option<u8> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let value: u32 = digits.parse().ok()?;
    u8::try_from(value).ok().filter(|v| *v < EXACT_SCORE)
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = if ca == cb { diagonal } else { diagonal + 1 };
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(row[j + 1] + 1);
        }
    }
    row[b.len()]
}

fn bigrams(word: &[char]) -> HashSet<(char, char)> {
    word.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Local lexical approximation of closeness: an even blend of normalized
/// Levenshtein similarity and bigram-set Jaccard overlap, scaled onto
/// `[0, 99]`. Symmetric in its arguments and capped below `EXACT_SCORE`, so
/// the fallback can never claim a win.
#[must_use]
pub fn fallback_score(attempt: &str, target: &str) -> u8 {
    let a: Vec<char> = normalize(attempt).chars().collect();
    let t: Vec<char> = normalize(target).chars().collect();

    let longest = a.len().max(t.len());
    let lev_sim = if longest == 0 {
        1.0
    } else {
        1.0 - levenshtein(&a, &t) as f32 / longest as f32
    };

    let ba = bigrams(&a);
    let bt = bigrams(&t);
    let bigram_sim = if ba.is_empty() && bt.is_empty() {
        0.0
    } else {
        let shared = ba.intersection(&bt).count();
        let union = ba.len() + bt.len() - shared;
        shared as f32 / union as f32
    };

    let combined = 0.5 * lev_sim + 0.5 * bigram_sim;
    let scaled = (combined * 99.0).round();
    scaled.clamp(0.0, 99.0) as u8
}

/// Computes the 0–100 closeness score for a guess against the target. Never
/// fails: oracle trouble of any kind falls through to `fallback_score`.
pub struct SimilarityScorer<O> {
    oracle: O,
}

impl<O> SimilarityScorer<O>
where
    O: SemanticOracle,
{
    #[must_use]
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }

    pub async fn score(&self, attempt: &str, target: &str) -> u8 {
        if normalize(attempt) == normalize(target) {
            return EXACT_SCORE;
        }

        match self.oracle.closeness(attempt, target).await {
            Ok(reply) => match parse_oracle_reply(&reply) {
                Some(score) => score,
                None => {
                    log::warn!("oracle reply {reply:?} unusable, scoring locally");
                    fallback_score(attempt, target)
                }
            },
            Err(err) => {
                log::warn!("oracle unavailable ({err}), scoring locally");
                fallback_score(attempt, target)
            }
        }
    }
}
