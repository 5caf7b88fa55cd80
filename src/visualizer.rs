/* Export an automaton as a Graphviz graph. Parallel transitions between two states are merged
 * into a single edge whose label lists every symbol. */

use crate::fa::FA;
use color_eyre::eyre::{eyre, Result};
use log::info;
use petgraph::dot::Dot;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::prelude::StableGraph;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::process::Command;

fn generate_stable_graph<T: FA>(fa: &T) -> StableGraph<String, String> {
    let mut stable_graph = StableGraph::new();

    let num_states = fa.get_num_states();

    let mut edge_map: HashMap<(NodeIndex, NodeIndex), EdgeIndex> = HashMap::new();

    for state_idx in 0..num_states {
        stable_graph.add_node(fa.get_state_name(state_idx).to_string());
    }

    for state_idx in 0..num_states {
        for (symbol, target) in fa.get_state_transitions(state_idx) {
            let key = (NodeIndex::new(state_idx), NodeIndex::new(target));

            match edge_map.get(&key) {
                Some(edge_idx) => {
                    let old_label = &stable_graph[*edge_idx];
                    let new_label = format!("{}, {}", old_label, symbol);
                    stable_graph[*edge_idx] = new_label;
                }
                None => {
                    let edge_idx = stable_graph.add_edge(key.0, key.1, symbol.to_string());
                    edge_map.insert(key, edge_idx);
                }
            }
        }
    }

    stable_graph
}

/// Render the automaton in the Graphviz dot language. Final states are drawn as double circles
/// and the initial state is filled.
pub fn to_dot<T: FA>(fa: &T) -> String {
    let stable_graph = generate_stable_graph(fa);
    let start_state = fa.get_start_state();
    let accept_states = fa.get_acceptor_states();

    let node_attributes = |_, (node, _): (NodeIndex, &String)| {
        let shape = if accept_states[node.index()] {
            "doublecircle"
        } else {
            "circle"
        };

        if node.index() == start_state {
            format!("shape = {} style = filled fillcolor = lightblue", shape)
        } else {
            format!("shape = {}", shape)
        }
    };

    let dot = Dot::with_attr_getters(
        &stable_graph,
        &[],
        &|_, _| String::new(),
        &node_attributes,
    );

    format!("{}", dot)
}

/// Write `<filename>.dot` for the automaton. When `render` is set, Graphviz is also invoked to
/// produce `<filename>.jpg`.
pub fn save_dot<T: FA>(fa: &T, filename: &str, render: bool) -> Result<()> {
    let dot_filename = format!("{}.dot", filename);
    let mut dot_file = File::create(&dot_filename)?;

    dot_file.write_all(to_dot(fa).as_bytes())?;
    info!("Automaton graph saved as {}", dot_filename);

    if render {
        let jpg_filename = format!("{}.jpg", filename);
        let output = Command::new("dot")
            .args(["-Tjpg", &dot_filename, "-o", &jpg_filename])
            .output()
            .map_err(|error| eyre!("Failed to execute Graphviz: {}", error))?;

        if !output.status.success() {
            return Err(eyre!(
                "Graphviz failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        info!("Automaton visualization saved as {}", jpg_filename);
    }

    Ok(())
}

#[cfg(test)]
mod visualizer_tests {
    use super::*;
    use crate::loader::parse_automaton;

    const SAMPLE: &str = "a b c\nq0 q1\nq1\nq0\nq0 a q1\nq0 b q1\nq1 c q1\n";

    #[test]
    fn test_parallel_transitions_share_an_edge() {
        let automaton = parse_automaton(SAMPLE).unwrap();
        let graph = generate_stable_graph(&automaton);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);

        let edge = graph
            .find_edge(NodeIndex::new(0), NodeIndex::new(1))
            .unwrap();
        assert_eq!(graph[edge], "a, b");
    }

    #[test]
    fn test_dot_marks_initial_and_final_states() {
        let automaton = parse_automaton(SAMPLE).unwrap();
        let dot = to_dot(&automaton);

        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("label = \"q0\""));
        assert!(dot.contains("shape = doublecircle"));
        assert!(dot.contains("fillcolor = lightblue"));
        assert!(dot.contains("label = \"a, b\""));

        // q1 is final but not initial
        let q1_line = dot.lines().find(|line| line.contains("\"q1\"")).unwrap();
        assert!(q1_line.contains("shape = doublecircle"));
        assert!(!q1_line.contains("fillcolor"));
    }

    #[test]
    fn test_save_dot_writes_file() {
        let automaton = parse_automaton(SAMPLE).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("graph");
        let base = base.to_str().unwrap();

        save_dot(&automaton, base, false).unwrap();

        let contents = std::fs::read_to_string(format!("{}.dot", base)).unwrap();
        assert_eq!(contents, to_dot(&automaton));
    }
}
