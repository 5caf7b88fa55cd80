/* Classify words against a validated automaton by walking its transition table one symbol at a
 * time. Evaluation never fails: a symbol outside the alphabet is an outcome, not an error. */

use crate::automaton::Automaton;
use log::{debug, trace};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// The classification of a single word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Every symbol had a transition and the walk ended in a final state
    Accepted,
    /// A transition was missing or the walk ended in a non final state
    Rejected,
    /// The word contains a symbol outside the alphabet
    InvalidSymbol,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Accepted => write!(f, "ACCEPTED"),
            Outcome::Rejected => write!(f, "REJECTED"),
            Outcome::InvalidSymbol => write!(f, "INVALID_SYMBOL"),
        }
    }
}

impl Automaton {
    /// Classify one word. The empty word is accepted iff the initial state is final.
    pub fn classify(&self, word: &str) -> Outcome {
        let mut state = self.start_state();

        for symbol in word.chars() {
            if !self.alphabet().contains(&symbol) {
                trace!("{:?}: {:?} is not in the alphabet", word, symbol);
                return Outcome::InvalidSymbol;
            }

            state = match self.step(state, symbol) {
                Some(next_state) => next_state,
                None => {
                    trace!(
                        "{:?}: no transition from {} on {:?}",
                        word,
                        self.states()[state],
                        symbol
                    );
                    return Outcome::Rejected;
                }
            };
        }

        if self.is_accepting(state) {
            Outcome::Accepted
        } else {
            Outcome::Rejected
        }
    }
}

/// Mapping from each evaluated word to its outcome. Words keep the order in which they were first
/// seen, a repeated word is stored once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationResult {
    entries: Vec<(String, Outcome)>,
    index: HashMap<String, usize>,
}

impl EvaluationResult {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    // Callers skip words that are already present
    fn insert(&mut self, word: &str, outcome: Outcome) {
        self.index.insert(word.to_string(), self.entries.len());
        self.entries.push((word.to_string(), outcome));
    }

    pub fn get(&self, word: &str) -> Option<Outcome> {
        self.index.get(word).map(|position| self.entries[*position].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Outcome)> {
        self.entries
            .iter()
            .map(|(word, outcome)| (word.as_str(), *outcome))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of words with the given outcome
    pub fn count(&self, outcome: Outcome) -> usize {
        self.entries
            .iter()
            .filter(|(_, word_outcome)| *word_outcome == outcome)
            .count()
    }
}

impl Serialize for EvaluationResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut ser_map = serializer.serialize_map(Some(self.entries.len()))?;

        for (word, outcome) in self.entries.iter() {
            ser_map.serialize_entry(word, outcome)?;
        }
        ser_map.end()
    }
}

/// Classify every word against the automaton. Words are independent of each other and the
/// automaton is only read.
pub fn evaluate<I, S>(automaton: &Automaton, words: I) -> EvaluationResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = EvaluationResult::new();

    for word in words {
        let word = word.as_ref();
        if result.get(word).is_some() {
            continue;
        }

        let outcome = automaton.classify(word);
        debug!("{:?} is {}", word, outcome);
        result.insert(word, outcome);
    }

    result
}
