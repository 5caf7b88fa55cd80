//! # dfacheck
//!
//! Load a textual description of a deterministic finite automaton and classify words with it.
//!
//! This library provides functionality to:
//! - Parse and validate an automaton description (alphabet, states, final states, initial state
//!   and one transition rule per line)
//! - Classify words as accepted, rejected or containing symbols outside the alphabet
//! - Save and reload validated automata as json
//! - Export the automaton as a Graphviz graph

// Re-export the modules
pub mod automaton;
pub mod evaluator;
pub mod fa;
pub mod loader;
pub mod visualizer;

// Re-export commonly used functions for convenience
pub use automaton::Automaton;
pub use evaluator::{evaluate, EvaluationResult, Outcome};
pub use loader::{load_automaton, load_automaton_json, parse_automaton, LoadError};
pub use visualizer::{save_dot, to_dot};
