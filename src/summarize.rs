//! Short natural-language synopsis of free-text review comments.
//!
//! The synopsis combines an overall sentiment label with the most frequent
//! keywords. Sentiment scoring sits behind [`SentimentModel`] so callers can
//! plug in any polarity scorer; [`LexiconModel`] is the built-in default.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

/// Returned when there is nothing to summarize.
pub const NO_COMMENTS: &str = "No comments available.";

/// Returned when every token was filtered out.
pub const NO_KEYWORDS: &str = "No prominent keywords";

/// Average polarity beyond which feedback counts as positive or negative.
pub const SENTIMENT_THRESHOLD: f64 = 0.2;

/// Number of keywords listed in a summary.
pub const TOP_KEYWORDS: usize = 5;

static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

fn get_stop_words() -> &'static HashSet<&'static str> {
    STOP_WORDS.get_or_init(|| {
        [
            "the", "and", "for", "with", "from", "this", "that", "was", "but", "are", "they",
            "their", "has", "have", "not", "all", "you", "your", "can", "did",
        ]
        .iter()
        .copied()
        .collect()
    })
}

fn get_token_re() -> &'static Regex {
    TOKEN_RE.get_or_init(|| Regex::new(r"\b[a-zA-Z]{3,}\b").expect("static regex"))
}

/// Scores the polarity of one comment.
pub trait SentimentModel {
    /// Returns a polarity in `[-1, 1]`; positive values mean positive sentiment.
    fn polarity(&self, text: &str) -> f64;
}

/// Word-list sentiment scorer.
///
/// Each known word contributes its weight; a negator directly before a word
/// flips it. The comment's polarity is the mean weight of matched words.
#[derive(Debug, Clone)]
pub struct LexiconModel {
    words: HashMap<String, f64>,
}

const POSITIVE: &[(&str, f64)] = &[
    ("excellent", 1.0),
    ("outstanding", 1.0),
    ("great", 0.8),
    ("amazing", 0.9),
    ("fantastic", 0.9),
    ("good", 0.6),
    ("helpful", 0.7),
    ("reliable", 0.7),
    ("dedicated", 0.7),
    ("hardworking", 0.7),
    ("thorough", 0.6),
    ("solid", 0.5),
    ("strong", 0.6),
    ("clear", 0.5),
    ("organized", 0.6),
    ("proactive", 0.7),
    ("responsive", 0.6),
    ("contributed", 0.4),
    ("supportive", 0.7),
    ("impressive", 0.8),
    ("well", 0.4),
    ("nice", 0.5),
    ("quality", 0.4),
    ("leadership", 0.5),
    ("creative", 0.6),
];

const NEGATIVE: &[(&str, f64)] = &[
    ("poor", -0.8),
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("lazy", -0.9),
    ("late", -0.5),
    ("missing", -0.5),
    ("absent", -0.7),
    ("unresponsive", -0.8),
    ("unreliable", -0.8),
    ("minimal", -0.5),
    ("little", -0.3),
    ("lacking", -0.6),
    ("weak", -0.6),
    ("sloppy", -0.7),
    ("confusing", -0.5),
    ("disorganized", -0.6),
    ("ignored", -0.7),
    ("never", -0.4),
    ("problem", -0.4),
    ("issues", -0.3),
    ("disappointing", -0.8),
];

const NEGATORS: &[&str] = &["not", "no", "never", "hardly", "didn't", "didnt", "wasn't", "isn't"];

impl Default for LexiconModel {
    fn default() -> Self {
        let words = POSITIVE
            .iter()
            .chain(NEGATIVE)
            .map(|(w, s)| (w.to_string(), *s))
            .collect();
        Self { words }
    }
}

impl LexiconModel {
    /// Adds or overrides a word's weight, clamped to `[-1, 1]`.
    pub fn insert(&mut self, word: &str, weight: f64) {
        self.words.insert(word.to_lowercase(), weight.clamp(-1.0, 1.0));
    }
}

impl SentimentModel for LexiconModel {
    fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
            .collect();

        let mut total = 0.0;
        let mut matched = 0usize;
        for (i, token) in tokens.iter().enumerate() {
            let Some(weight) = self.words.get(*token) else {
                continue;
            };
            let negated = i > 0 && NEGATORS.contains(&tokens[i - 1]);
            total += if negated { -weight } else { *weight };
            matched += 1;
        }

        if matched == 0 {
            0.0
        } else {
            (total / matched as f64).clamp(-1.0, 1.0)
        }
    }
}

/// Labels the mean polarity of a set of comments.
pub fn sentiment_label(avg: f64) -> &'static str {
    match avg {
        a if a > SENTIMENT_THRESHOLD => "Overall positive feedback",
        a if a < -SENTIMENT_THRESHOLD => "Overall negative feedback",
        _ => "Mixed or neutral feedback",
    }
}

/// The `limit` most frequent non-stop-word tokens of at least three letters.
///
/// Ties keep the order in which the words first appeared.
pub fn top_keywords<S: AsRef<str>>(comments: &[S], limit: usize) -> Vec<String> {
    let stop_words = get_stop_words();
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for comment in comments {
        let lowered = comment.as_ref().to_lowercase();
        for m in get_token_re().find_iter(&lowered) {
            let word = m.as_str();
            if stop_words.contains(word) {
                continue;
            }
            match index.get(word) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(word.to_string(), counts.len());
                    counts.push((word.to_string(), 1));
                }
            }
        }
    }

    // stable sort keeps first-appearance order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(w, _)| w).collect()
}

/// Builds `"<sentiment>; Key points: <keywords>"` for a set of comments.
///
/// Blank comments are ignored; with nothing left the fixed [`NO_COMMENTS`]
/// message is returned.
pub fn summarize_comments<S: AsRef<str>>(comments: &[S], model: &dyn SentimentModel) -> String {
    let comments: Vec<&str> = comments
        .iter()
        .map(|c| c.as_ref().trim())
        .filter(|c| !c.is_empty())
        .collect();
    if comments.is_empty() {
        return NO_COMMENTS.to_string();
    }

    let scores: Vec<f64> = comments.iter().map(|c| model.polarity(c)).collect();
    let avg = scores.iter().sum::<f64>() / scores.len() as f64;
    debug!(comments = comments.len(), avg_polarity = avg, "Comments scored");

    let keywords = top_keywords(&comments, TOP_KEYWORDS);
    let keyword_summary = if keywords.is_empty() {
        NO_KEYWORDS.to_string()
    } else {
        keywords.join(", ")
    };

    format!("{}; Key points: {}", sentiment_label(avg), keyword_summary)
}
