/* The validated, immutable deterministic finite automaton. There is no public constructor: an
 * Automaton only comes out of the loader or out of deserialization, and both run the same
 * validation. */

use crate::fa::FA;
use crate::loader::{self, LoadError, RawRule, FIRST_RULE_LINE};
use bitvec::prelude::BitVec;
use color_eyre::eyre::Result;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AutomatonDescription", into = "AutomatonDescription")]
pub struct Automaton {
    states: Vec<String>, // Sorted, the index is the state id
    state_ids: HashMap<String, usize>,
    alphabet: HashSet<char>,
    transitions: HashMap<(usize, char), usize>,
    start_state: usize,
    accept_states: BitVec<u8>,
}

/// Plain record form of an automaton, used for JSON persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonDescription {
    pub alphabet: Vec<char>,
    pub states: Vec<String>,
    pub final_states: Vec<String>,
    pub initial: String,
    pub transitions: Vec<TransitionRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRule {
    pub origin: String,
    pub symbol: char,
    pub destination: String,
}

impl Automaton {
    pub(crate) fn new(
        states: Vec<String>,
        alphabet: HashSet<char>,
        transitions: HashMap<(usize, char), usize>,
        start_state: usize,
        accept_states: BitVec<u8>,
    ) -> Self {
        let state_ids = states
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();

        Automaton {
            states,
            state_ids,
            alphabet,
            transitions,
            start_state,
            accept_states,
        }
    }

    /// All declared states in sorted order
    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn alphabet(&self) -> &HashSet<char> {
        &self.alphabet
    }

    pub fn initial(&self) -> &str {
        &self.states[self.start_state]
    }

    /// The accepting states in sorted order
    pub fn final_states(&self) -> Vec<&str> {
        self.accept_states
            .iter_ones()
            .map(|id| self.states[id].as_str())
            .collect()
    }

    pub fn is_final(&self, state: &str) -> bool {
        self.state_ids
            .get(state)
            .is_some_and(|id| self.accept_states[*id])
    }

    /// Destination of the transition from `state` on `symbol`, if one is defined
    pub fn transition(&self, state: &str, symbol: char) -> Option<&str> {
        let origin = self.state_ids.get(state)?;
        self.step(*origin, symbol)
            .map(|destination| self.states[destination].as_str())
    }

    pub fn num_transitions(&self) -> usize {
        self.transitions.len()
    }

    pub(crate) fn start_state(&self) -> usize {
        self.start_state
    }

    pub(crate) fn step(&self, state: usize, symbol: char) -> Option<usize> {
        self.transitions.get(&(state, symbol)).copied()
    }

    pub(crate) fn is_accepting(&self, state: usize) -> bool {
        self.accept_states[state]
    }

    fn sorted_alphabet(&self) -> Vec<char> {
        let mut alphabet: Vec<char> = self.alphabet.iter().copied().collect();
        alphabet.sort();
        alphabet
    }

    fn sorted_rules(&self) -> Vec<(usize, char, usize)> {
        let mut rules: Vec<(usize, char, usize)> = self
            .transitions
            .iter()
            .map(|(&(origin, symbol), &destination)| (origin, symbol, destination))
            .collect();
        rules.sort();
        rules
    }

    /// Render the automaton back into the line oriented description format. Loading the result
    /// again yields an equal automaton.
    pub fn to_description(&self) -> String {
        let join = |items: Vec<String>| items.join(" ");

        let mut lines = vec![
            join(self.sorted_alphabet().iter().map(char::to_string).collect()),
            join(self.states.clone()),
            self.final_states().join(" "),
            self.initial().to_string(),
        ];

        for (origin, symbol, destination) in self.sorted_rules() {
            lines.push(format!(
                "{} {} {}",
                self.states[origin], symbol, self.states[destination]
            ));
        }

        let mut description = lines.join("\n");
        description.push('\n');
        description
    }

    /// Save the automaton as pretty printed json
    pub fn save_automaton<P: AsRef<Path>>(&self, file_name: P) -> Result<()> {
        let json_string = serde_json::to_string_pretty(self)?;

        let mut file = File::create(file_name)?;

        writeln!(file, "{}", json_string)?;
        Ok(())
    }
}

impl From<Automaton> for AutomatonDescription {
    fn from(automaton: Automaton) -> Self {
        let transitions = automaton
            .sorted_rules()
            .into_iter()
            .map(|(origin, symbol, destination)| TransitionRule {
                origin: automaton.states[origin].clone(),
                symbol,
                destination: automaton.states[destination].clone(),
            })
            .collect();

        AutomatonDescription {
            alphabet: automaton.sorted_alphabet(),
            final_states: automaton
                .final_states()
                .into_iter()
                .map(str::to_string)
                .collect(),
            initial: automaton.initial().to_string(),
            transitions,
            states: automaton.states,
        }
    }
}

impl TryFrom<AutomatonDescription> for Automaton {
    type Error = LoadError;

    fn try_from(description: AutomatonDescription) -> Result<Self, Self::Error> {
        let alphabet: Vec<String> = description.alphabet.iter().map(char::to_string).collect();
        let symbols: Vec<String> = description
            .transitions
            .iter()
            .map(|rule| rule.symbol.to_string())
            .collect();

        let alphabet: Vec<&str> = alphabet.iter().map(String::as_str).collect();
        let states: Vec<&str> = description.states.iter().map(String::as_str).collect();
        let final_states: Vec<&str> = description
            .final_states
            .iter()
            .map(String::as_str)
            .collect();

        // Rules are numbered as they would appear in the text format
        let rules: Vec<RawRule<'_>> = description
            .transitions
            .iter()
            .zip(symbols.iter())
            .enumerate()
            .map(|(index, (rule, symbol))| RawRule {
                line: FIRST_RULE_LINE + index,
                origin: &rule.origin,
                symbol,
                destination: &rule.destination,
            })
            .collect();

        loader::build_automaton(
            &alphabet,
            &states,
            &final_states,
            &description.initial,
            &rules,
        )
    }
}

impl FA for Automaton {
    fn get_num_states(&self) -> usize {
        self.states.len()
    }

    fn get_start_state(&self) -> usize {
        self.start_state
    }

    fn get_alphabet(&self) -> &HashSet<char> {
        &self.alphabet
    }

    fn get_acceptor_states(&self) -> &BitVec<u8> {
        &self.accept_states
    }

    fn get_state_transitions(&self, state_id: usize) -> Vec<(char, usize)> {
        let mut transition_list: Vec<(char, usize)> = self
            .transitions
            .iter()
            .filter(|((origin, _), _)| *origin == state_id)
            .map(|(&(_, symbol), &destination)| (symbol, destination))
            .collect();
        transition_list.sort();
        transition_list
    }

    fn get_state_name(&self, state_id: usize) -> &str {
        &self.states[state_id]
    }
}
