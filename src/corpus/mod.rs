use include_dir::{include_dir, Dir};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

static TEXTS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/corpus/texts");

/// Selects which list of sample texts a session draws from
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// The next level, wrapping from hard back to easy
    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    fn file_name(self) -> String {
        format!("{self}.json")
    }
}

#[derive(Deserialize, Debug)]
struct CorpusDocument {
    difficulty: Difficulty,
    texts: Vec<String>,
}

/// Static sample texts keyed by difficulty
#[derive(Debug, Clone)]
pub struct Corpus {
    easy: Vec<String>,
    medium: Vec<String>,
    hard: Vec<String>,
}

impl Corpus {
    /// Build a corpus from explicit lists. Every list must hold at least one text.
    pub fn new(easy: Vec<String>, medium: Vec<String>, hard: Vec<String>) -> Result<Self> {
        for (difficulty, texts) in Difficulty::ALL.iter().zip([&easy, &medium, &hard]) {
            if texts.is_empty() {
                return Err(Error::CorpusEmpty(difficulty.file_name()));
            }
        }
        Ok(Self { easy, medium, hard })
    }

    /// Load the texts compiled into the binary
    pub fn embedded() -> Result<Self> {
        let easy = read_document(Difficulty::Easy)?;
        let medium = read_document(Difficulty::Medium)?;
        let hard = read_document(Difficulty::Hard)?;
        Self::new(easy, medium, hard)
    }

    pub fn texts(&self, difficulty: Difficulty) -> &[String] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    /// Draw one text for `difficulty`, uniformly at random
    pub fn select_text<R: Rng + ?Sized>(&self, difficulty: Difficulty, rng: &mut R) -> &str {
        self.texts(difficulty)
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

fn read_document(difficulty: Difficulty) -> Result<Vec<String>> {
    let file_name = difficulty.file_name();
    let file = TEXTS_DIR
        .get_file(&file_name)
        .ok_or_else(|| Error::CorpusMissing(file_name.clone()))?;

    let contents = file
        .contents_utf8()
        .ok_or_else(|| Error::CorpusMissing(file_name.clone()))?;

    let document: CorpusDocument =
        serde_json::from_str(contents).map_err(|source| Error::CorpusMalformed {
            file: file_name.clone(),
            source,
        })?;

    // a document filed under the wrong name would silently swap levels
    if document.difficulty != difficulty {
        return Err(Error::CorpusMissing(file_name));
    }

    Ok(document.texts)
}

/// Where a session's reference text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    Corpus,
    Custom(String),
}
