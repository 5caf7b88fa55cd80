/* Read the line oriented automaton description, validate every declared reference and build an
 * immutable Automaton. Construction is all or nothing: the first violation aborts the load. */

use crate::automaton::{Automaton, AutomatonDescription};
use bitvec::prelude::BitVec;
use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

pub(crate) const ALPHABET_LINE: usize = 1;
pub(crate) const STATES_LINE: usize = 2;
pub(crate) const FINAL_STATES_LINE: usize = 3;
pub(crate) const INITIAL_STATE_LINE: usize = 4;
pub(crate) const FIRST_RULE_LINE: usize = 5;

/// Whether an unknown reference named a state or an input symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    State,
    Symbol,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::State => write!(f, "state"),
            ReferenceKind::Symbol => write!(f, "symbol"),
        }
    }
}

/// List of possible errors while loading an automaton. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The description file could not be opened
    SourceNotFound(PathBuf),
    /// The header of the description is incomplete or ill-formed
    MalformedDescription(String),
    /// A transition line does not have exactly 3 fields
    MalformedRule {
        line: usize,
        rule: String,
        fields: usize,
    },
    /// A state or symbol was used without being declared
    UnknownReference {
        line: usize,
        kind: ReferenceKind,
        name: String,
    },
    /// A second rule for an already defined (state, symbol) pair
    NonDeterministic {
        line: usize,
        state: String,
        symbol: String,
    },
    /// Any other failure while reading the description
    UnexpectedLoadFailure(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::SourceNotFound(path) => {
                write!(f, "Automaton description {} not found", path.display())
            }
            LoadError::MalformedDescription(reason) => {
                write!(f, "Malformed automaton description: {}", reason)
            }
            LoadError::MalformedRule { line, rule, fields } => write!(
                f,
                "Malformed transition rule on line {}: {:?} has {} fields, expected `origin symbol destination`",
                line, rule, fields
            ),
            LoadError::UnknownReference { line, kind, name } => {
                write!(f, "Line {} references undeclared {} {:?}", line, kind, name)
            }
            LoadError::NonDeterministic {
                line,
                state,
                symbol,
            } => write!(
                f,
                "Line {} redefines the transition from {:?} on {:?}, a deterministic automaton is required",
                line, state, symbol
            ),
            LoadError::UnexpectedLoadFailure(reason) => {
                write!(f, "Failed to load the automaton: {}", reason)
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// A transition rule exactly as it was written, before validation
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawRule<'a> {
    pub line: usize,
    pub origin: &'a str,
    pub symbol: &'a str,
    pub destination: &'a str,
}

fn check_name(name: &str, line: usize, what: &str) -> Result<(), LoadError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(LoadError::MalformedDescription(format!(
            "{} {:?} on line {} must be a single non-empty token",
            what, name, line
        )));
    }
    Ok(())
}

/// Validate the declared parts of an automaton and build it. Shared by the text loader and the
/// JSON deserializer so both paths enforce the same invariants.
pub(crate) fn build_automaton(
    alphabet_tokens: &[&str],
    state_tokens: &[&str],
    final_tokens: &[&str],
    initial: &str,
    rules: &[RawRule<'_>],
) -> Result<Automaton, LoadError> {
    let mut alphabet: HashSet<char> = HashSet::new();

    for token in alphabet_tokens {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) if !symbol.is_whitespace() => {
                alphabet.insert(symbol);
            }
            _ => {
                return Err(LoadError::MalformedDescription(format!(
                    "alphabet symbol {:?} on line {} must be a single character",
                    token, ALPHABET_LINE
                )))
            }
        }
    }

    for state in state_tokens {
        check_name(state, STATES_LINE, "state")?;
    }

    let mut states: Vec<String> = state_tokens.iter().map(|s| s.to_string()).collect();
    states.sort();
    states.dedup();

    if states.is_empty() {
        return Err(LoadError::MalformedDescription(format!(
            "line {} must declare at least one state",
            STATES_LINE
        )));
    }

    let state_ids: HashMap<&str, usize> = states
        .iter()
        .enumerate()
        .map(|(id, name)| (name.as_str(), id))
        .collect();

    let lookup_state = |name: &str, line: usize| -> Result<usize, LoadError> {
        state_ids
            .get(name)
            .copied()
            .ok_or_else(|| LoadError::UnknownReference {
                line,
                kind: ReferenceKind::State,
                name: name.to_string(),
            })
    };

    let mut accept_states: BitVec<u8> = BitVec::repeat(false, states.len());

    for &final_state in final_tokens {
        let id = lookup_state(final_state, FINAL_STATES_LINE)?;
        accept_states.set(id, true);
    }

    check_name(initial, INITIAL_STATE_LINE, "initial state")?;
    let start_state = lookup_state(initial, INITIAL_STATE_LINE)?;

    if rules.is_empty() {
        return Err(LoadError::MalformedDescription(format!(
            "at least one transition rule is required from line {} on",
            FIRST_RULE_LINE
        )));
    }

    let mut transitions: HashMap<(usize, char), usize> = HashMap::new();

    for rule in rules {
        let origin = lookup_state(rule.origin, rule.line)?;
        let destination = lookup_state(rule.destination, rule.line)?;

        let mut chars = rule.symbol.chars();
        let symbol = match (chars.next(), chars.next()) {
            (Some(symbol), None) if alphabet.contains(&symbol) => symbol,
            _ => {
                return Err(LoadError::UnknownReference {
                    line: rule.line,
                    kind: ReferenceKind::Symbol,
                    name: rule.symbol.to_string(),
                })
            }
        };

        if transitions.insert((origin, symbol), destination).is_some() {
            return Err(LoadError::NonDeterministic {
                line: rule.line,
                state: rule.origin.to_string(),
                symbol: rule.symbol.to_string(),
            });
        }
    }

    Ok(Automaton::new(
        states,
        alphabet,
        transitions,
        start_state,
        accept_states,
    ))
}

/// Split on `\n`, `\r\n` and a lone `\r`. A trailing line break does not start a new line.
fn description_lines(description: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = description;

    while !rest.is_empty() {
        match rest.find(|c: char| c == '\r' || c == '\n') {
            Some(end) => {
                lines.push(&rest[..end]);
                let skip = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + skip..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }

    lines
}

/// Parse an automaton description held in memory.
///
/// The first four lines declare the alphabet, the states, the final states and the initial state.
/// Every following line is a transition rule `origin symbol destination`.
pub fn parse_automaton(description: &str) -> Result<Automaton, LoadError> {
    let lines = description_lines(description);

    if lines.len() < FIRST_RULE_LINE {
        return Err(LoadError::MalformedDescription(format!(
            "expected at least {} lines, found {}",
            FIRST_RULE_LINE,
            lines.len()
        )));
    }

    let alphabet: Vec<&str> = lines[ALPHABET_LINE - 1].split_whitespace().collect();
    let states: Vec<&str> = lines[STATES_LINE - 1].split_whitespace().collect();
    let final_states: Vec<&str> = lines[FINAL_STATES_LINE - 1].split_whitespace().collect();
    let initial: Vec<&str> = lines[INITIAL_STATE_LINE - 1].split_whitespace().collect();

    let initial = match initial.as_slice() {
        [initial] => *initial,
        tokens => {
            return Err(LoadError::MalformedDescription(format!(
                "line {} must hold exactly one initial state, found {} tokens",
                INITIAL_STATE_LINE,
                tokens.len()
            )))
        }
    };

    let mut rules = Vec::with_capacity(lines.len() - INITIAL_STATE_LINE);

    for (offset, text) in lines[INITIAL_STATE_LINE..].iter().enumerate() {
        let line = FIRST_RULE_LINE + offset;
        let fields: Vec<&str> = text.split_whitespace().collect();

        match fields.as_slice() {
            [origin, symbol, destination] => rules.push(RawRule {
                line,
                origin: *origin,
                symbol: *symbol,
                destination: *destination,
            }),
            _ => {
                return Err(LoadError::MalformedRule {
                    line,
                    rule: text.trim().to_string(),
                    fields: fields.len(),
                })
            }
        }
    }

    debug!(
        "Parsed {} alphabet symbols, {} states and {} transition rules",
        alphabet.len(),
        states.len(),
        rules.len()
    );

    build_automaton(&alphabet, &states, &final_states, initial, &rules)
}

/// Read an automaton description file and build the automaton it describes
pub fn load_automaton<P: AsRef<Path>>(file_path: P) -> Result<Automaton, LoadError> {
    let file_path = file_path.as_ref();

    let description = fs::read_to_string(file_path).map_err(|error| match error.kind() {
        io::ErrorKind::NotFound => LoadError::SourceNotFound(file_path.to_path_buf()),
        _ => LoadError::UnexpectedLoadFailure(format!(
            "could not read {}: {}",
            file_path.display(),
            error
        )),
    })?;

    let automaton = parse_automaton(&description)?;

    info!(
        "Loaded automaton from {} with {} states, {} symbols and {} transitions",
        file_path.display(),
        automaton.states().len(),
        automaton.alphabet().len(),
        automaton.num_transitions()
    );

    Ok(automaton)
}

/// Load an automaton previously saved with [`Automaton::save_automaton`]. The saved automaton is
/// validated again exactly like a textual description.
pub fn load_automaton_json<P: AsRef<Path>>(file_path: P) -> Result<Automaton, LoadError> {
    let file_path = file_path.as_ref();

    let file = File::open(file_path).map_err(|error| match error.kind() {
        io::ErrorKind::NotFound => LoadError::SourceNotFound(file_path.to_path_buf()),
        _ => LoadError::UnexpectedLoadFailure(format!(
            "could not open {}: {}",
            file_path.display(),
            error
        )),
    })?;

    let description: AutomatonDescription = serde_json::from_reader(BufReader::new(file))
        .map_err(|error| {
            LoadError::UnexpectedLoadFailure(format!(
                "{} is not a saved automaton: {}",
                file_path.display(),
                error
            ))
        })?;

    let automaton = Automaton::try_from(description)?;

    info!(
        "Loaded saved automaton from {} with {} states",
        file_path.display(),
        automaton.states().len()
    );

    Ok(automaton)
}
