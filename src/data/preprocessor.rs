// ============================================================
// Layer 4 — Tweet Preprocessor
// ============================================================
// Turns a raw tweet into the list of tokens that feeds the
// vocabulary.
//
// Raw tweets carry a lot of noise the classifier should not
// spend vocabulary slots on:
//   - Stock tickers          $GE, $AAPL
//   - Retweet markers        "RT @someone: ..."
//   - Hyperlinks             https://t.co/abc
//   - Hashtag signs          #happy → happy
//   - User handles           @someone
//   - Elongated words        sooooo → sooo
//   - Stopwords/punctuation  "the", "a", "!!!"
//   - Inflections            loving, loved → love
//
// Emoticons such as :) and :( carry sentiment, so they are
// kept as tokens of their own.
//
// Cleaning steps (applied in order):
//   1. Strip tickers, a leading RT, hyperlinks and '#' signs
//   2. Lowercase, strip @handles, shorten character runs to 3
//   3. Split into emoticons and word tokens (letters, digits, apostrophes)
//   4. Drop stopwords and tokens with no word characters
//   5. Porter stem the remaining words

use std::sync::OnceLock;

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

/// Longest run of one repeated character that is kept.
const MAX_CHAR_RUN: usize = 3;

/// English stopwords removed from every tweet.
const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

static PATTERNS: OnceLock<TweetPatterns> = OnceLock::new();

struct TweetPatterns {
    ticker:    Regex,
    retweet:   Regex,
    hyperlink: Regex,
    handle:    Regex,
    token:     Regex,
    emoticon:  Regex,
    stemmer:   Stemmer,
}

/// Western emoticons after lowercasing: eyes, optional nose, mouth.
const EMOTICON: &str = r"[:;=]-?[()\[\]dp/|]";

impl TweetPatterns {
    fn new() -> Self {
        Self {
            ticker:    Regex::new(r"\$\w*").expect("ticker regex must compile"),
            retweet:   Regex::new(r"^RT\s+").expect("retweet regex must compile"),
            hyperlink: Regex::new(r"https?://\S+").expect("hyperlink regex must compile"),
            handle:    Regex::new(r"\B@\w+").expect("handle regex must compile"),
            token:     Regex::new(&format!(r"{EMOTICON}|[\w']+")).expect("token regex must compile"),
            emoticon:  Regex::new(&format!("^{EMOTICON}$")).expect("emoticon regex must compile"),
            stemmer:   Stemmer::create(Algorithm::English),
        }
    }
}

fn patterns() -> &'static TweetPatterns {
    PATTERNS.get_or_init(TweetPatterns::new)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TweetPreprocessor;

impl TweetPreprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean a raw tweet and split it into tokens.
    pub fn process(&self, tweet: &str) -> Vec<String> {
        let p = patterns();

        // ── Step 1: strip Twitter-specific noise ──────────────────────────────
        let text = p.ticker.replace_all(tweet, "");
        let text = p.retweet.replace(&text, "");
        let text = p.hyperlink.replace_all(&text, "");
        let text = text.replace('#', "");

        // ── Step 2: normalise case, handles and elongation ───────────────────
        let text = text.to_lowercase();
        let text = p.handle.replace_all(&text, "");
        let text = shorten_runs(&text, MAX_CHAR_RUN);

        // ── Step 3-5: tokenise, filter, stem ──────────────────────────────────
        p.token
            .find_iter(&text)
            .filter_map(|m| {
                let tok = m.as_str();
                if p.emoticon.is_match(tok) {
                    return Some(tok.to_string());
                }
                let tok = tok.trim_matches('\'');
                if !tok.chars().any(|c| c.is_alphanumeric()) || STOPWORDS.contains(&tok) {
                    return None;
                }
                Some(p.stemmer.stem(tok).into_owned())
            })
            .collect()
    }
}

/// Collapse runs of the same character longer than `max` down to `max`.
fn shorten_runs(text: &str, max: usize) -> String {
    let mut out  = String::with_capacity(text.len());
    let mut last = None;
    let mut run  = 0usize;

    for c in text.chars() {
        if Some(c) == last {
            run += 1;
        } else {
            last = Some(c);
            run  = 1;
        }
        if run <= max {
            out.push(c);
        }
    }
    out
}
