use bitvec::prelude::BitVec;
use std::collections::HashSet;

/// Read-only view of a finite automaton whose states are numbered `0..get_num_states()`.
pub trait FA {
    fn get_num_states(&self) -> usize;
    fn get_start_state(&self) -> usize;
    fn get_alphabet(&self) -> &HashSet<char>;
    fn get_acceptor_states(&self) -> &BitVec<u8>;
    /// Outgoing transitions of a state as (symbol, destination) pairs, sorted by symbol
    fn get_state_transitions(&self, state_id: usize) -> Vec<(char, usize)>;
    fn get_state_name(&self, state_id: usize) -> &str;
}
