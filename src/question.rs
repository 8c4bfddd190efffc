use std::{collections::HashSet, fmt, path::Path};

use rand::{Rng, seq::IndexedRandom};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Truth,
    Dare,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Truth, Category::Dare];

    pub fn label(self) -> &'static str {
        match self {
            Category::Truth => "Truth",
            Category::Dare => "Dare",
        }
    }

    /// Fair coin between the two categories.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Category::Truth
        } else {
            Category::Dare
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerCategory<T> {
    pub truth: T,
    pub dare: T,
}

impl<T> PerCategory<T> {
    pub fn get(&self, category: Category) -> &T {
        match category {
            Category::Truth => &self.truth,
            Category::Dare => &self.dare,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut T {
        match category {
            Category::Truth => &mut self.truth,
            Category::Dare => &mut self.dare,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("failed to read question file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed question file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no {0} questions in question file")]
    Empty(Category),
}

#[derive(Deserialize)]
struct QuestionFile {
    #[serde(rename = "truthQuestions")]
    truth: Vec<String>,
    #[serde(rename = "dareQuestions")]
    dare: Vec<String>,
}

/// Immutable prompt lists, one per category.
#[derive(Debug, Clone)]
pub struct QuestionBank(PerCategory<Vec<String>>);

impl QuestionBank {
    pub fn new(truth: Vec<String>, dare: Vec<String>) -> Result<Self, BankError> {
        let mut prompts = PerCategory { truth, dare };

        for category in Category::ALL {
            let list = prompts.get_mut(category);
            let before = list.len();
            let mut seen = HashSet::new();
            list.retain(|prompt| seen.insert(prompt.clone()));

            if list.len() != before {
                tracing::warn!(
                    category = %category,
                    dropped = before - list.len(),
                    "Dropped duplicate prompts"
                );
            }

            if list.is_empty() {
                return Err(BankError::Empty(category));
            }
        }

        Ok(Self(prompts))
    }

    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let file: QuestionFile = serde_json::from_str(json)?;
        Self::new(file.truth, file.dare)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn prompts(&self, category: Category) -> &[String] {
        self.0.get(category)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Pick<'a> {
    Prompt(&'a str),
    /// Every prompt was handed out; the pool has been refilled for the next call.
    Exhausted,
}

/// Hands out prompts without repeats until a category runs dry.
pub struct QuestionTracker {
    bank: QuestionBank,
    asked: PerCategory<HashSet<usize>>,
}

impl QuestionTracker {
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            bank,
            asked: PerCategory::default(),
        }
    }

    pub fn pick<R: Rng + ?Sized>(&mut self, category: Category, rng: &mut R) -> Pick<'_> {
        let prompts = self.bank.prompts(category);
        let asked = self.asked.get_mut(category);

        let unused = (0..prompts.len())
            .filter(|index| !asked.contains(index))
            .collect::<Vec<_>>();

        let Some(&index) = unused.choose(rng) else {
            asked.clear();
            tracing::info!(category = %category, "All prompts asked, starting over");
            return Pick::Exhausted;
        };

        asked.insert(index);
        Pick::Prompt(&prompts[index])
    }

    pub fn remaining_count(&self, category: Category) -> usize {
        self.bank.prompts(category).len() - self.asked.get(category).len()
    }
}
