use dfacheck::{evaluate, parse_automaton};

fn main() {
    // Words over {a, b} that end in a final state after alternating a and b
    let description = "a b\nq0 q1\nq1\nq0\nq0 a q1\nq1 b q0\n";

    let automaton = parse_automaton(description).unwrap();

    let words = ["aba", "abc", "aab", "ba", "a"];

    let result = evaluate(&automaton, words);

    for (word, outcome) in result.iter() {
        println!("The word '{}' is {} by the automaton.", word, outcome);
    }
}
