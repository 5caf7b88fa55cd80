use dfacheck::{load_automaton, load_automaton_json, save_dot};

use std::path::Path;

fn main() {
    let root = env!("CARGO_MANIFEST_DIR");
    let path = Path::new(root);

    let automaton = load_automaton(path.join("test_data/even_as.dfa")).unwrap();

    // Save the automaton and reload it just to demonstrate the save and load feature

    let out_dir = tempfile::tempdir().unwrap();
    let json_path = out_dir.path().join("even_as.json");

    let result = automaton.save_automaton(&json_path);

    assert!(result.is_ok());

    let automaton = load_automaton_json(&json_path).unwrap();

    let dot_base = out_dir.path().join("even_as");
    save_dot(&automaton, dot_base.to_str().unwrap(), false).unwrap();

    println!("{}", automaton.to_description());
}
