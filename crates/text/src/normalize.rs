use crate::error::{Result, TextError};
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer as SnowballStemmer};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Reduces a token to its stem
pub trait Stemmer: Send + Sync {
    fn stem<'a>(&self, token: &'a str) -> Cow<'a, str>;
}

/// Leaves tokens untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStemmer;

impl Stemmer for NoopStemmer {
    fn stem<'a>(&self, token: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(token)
    }
}

/// Porter step 1a: plural suffixes only
#[derive(Debug, Clone, Copy, Default)]
pub struct PluralStemmer;

impl Stemmer for PluralStemmer {
    fn stem<'a>(&self, token: &'a str) -> Cow<'a, str> {
        if let Some(base) = token.strip_suffix("sses") {
            Cow::Owned(format!("{base}ss"))
        } else if let Some(base) = token.strip_suffix("ies") {
            Cow::Owned(format!("{base}i"))
        } else if token.ends_with("ss") {
            Cow::Borrowed(token)
        } else if let Some(base) = token.strip_suffix('s') {
            if base.is_empty() {
                Cow::Borrowed(token)
            } else {
                Cow::Borrowed(base)
            }
        } else {
            Cow::Borrowed(token)
        }
    }
}

/// English Porter stemmer (Snowball `english`)
pub struct PorterStemmer {
    inner: SnowballStemmer,
}

impl PorterStemmer {
    pub fn new() -> Self {
        Self {
            inner: SnowballStemmer::create(Algorithm::English),
        }
    }
}

impl Default for PorterStemmer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PorterStemmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PorterStemmer")
    }
}

impl Stemmer for PorterStemmer {
    fn stem<'a>(&self, token: &'a str) -> Cow<'a, str> {
        self.inner.stem(token)
    }
}

/// Stemmer selection, as named in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemmerKind {
    None,
    Plural,
    #[default]
    Porter,
}

impl StemmerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Plural => "plural",
            Self::Porter => "porter",
        }
    }

    fn build(self) -> Box<dyn Stemmer> {
        match self {
            Self::None => Box::new(NoopStemmer),
            Self::Plural => Box::new(PluralStemmer),
            Self::Porter => Box::new(PorterStemmer::new()),
        }
    }
}

impl FromStr for StemmerKind {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "plural" => Ok(Self::Plural),
            "porter" => Ok(Self::Porter),
            other => Err(TextError::UnknownStemmer(other.to_string())),
        }
    }
}

impl fmt::Display for StemmerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turns raw query text into the space-joined token stems used for training
pub struct Normalizer {
    separators: Regex,
    stemmer: Box<dyn Stemmer>,
}

impl Normalizer {
    pub fn new(kind: StemmerKind) -> Result<Self> {
        Self::with_stemmer(kind.build())
    }

    pub fn with_stemmer(stemmer: Box<dyn Stemmer>) -> Result<Self> {
        Ok(Self {
            separators: Regex::new("[^0-9a-z]+")?,
            stemmer,
        })
    }

    /// Lowercase, collapse every non-alphanumeric run to one space, then stem each token
    pub fn normalize(&self, raw: &str) -> String {
        let lowered = raw.to_lowercase();
        let collapsed = self.separators.replace_all(&lowered, " ");

        let stems: Vec<Cow<'_, str>> = collapsed
            .split_whitespace()
            .map(|token| self.stemmer.stem(token))
            .collect();
        stems.join(" ")
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("separators", &self.separators.as_str())
            .finish_non_exhaustive()
    }
}
