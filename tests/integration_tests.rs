mod integration_tests_helper {

    use dfacheck::{load_automaton, Automaton};
    use std::path::PathBuf;

    pub fn test_data_path(file_name: &str) -> PathBuf {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("test_data");
        path.push(file_name);
        path
    }

    pub fn get_automaton(file_name: &str) -> Automaton {
        let automaton = load_automaton(test_data_path(file_name));

        // assert that loading the description was successful
        assert!(automaton.is_ok(), "{:?}", automaton.err());

        automaton.unwrap()
    }
}

mod integration_tests {
    use crate::integration_tests_helper::{get_automaton, test_data_path};

    use color_eyre::eyre::Report;
    use dfacheck::loader::ReferenceKind;
    use dfacheck::{
        evaluate, load_automaton, load_automaton_json, parse_automaton, save_dot, LoadError,
        Outcome,
    };
    use proptest::prelude::*;

    #[test]
    fn test_sample_words() {
        let automaton = get_automaton("sample.dfa");

        let result = evaluate(&automaton, ["ab", "a", "ac", "aa"]);

        assert_eq!(result.get("ab"), Some(Outcome::Rejected));
        assert_eq!(result.get("a"), Some(Outcome::Accepted));
        assert_eq!(result.get("ac"), Some(Outcome::InvalidSymbol));
        assert_eq!(result.get("aa"), Some(Outcome::Rejected));
    }

    #[test]
    fn test_words_file_against_total_automaton() {
        let automaton = get_automaton("even_as.dfa");

        let words = std::fs::read_to_string(test_data_path("words.txt")).unwrap();
        let result = evaluate(&automaton, words.lines());

        let expected = vec![
            ("aba", Outcome::Accepted),
            ("abc", Outcome::InvalidSymbol),
            ("aab", Outcome::Accepted),
            ("ba", Outcome::Rejected),
            ("", Outcome::Accepted),
        ];
        let found: Vec<(&str, Outcome)> = result.iter().collect();

        assert_eq!(found, expected);
    }

    #[test]
    fn test_load_errors() {
        match load_automaton(test_data_path("nondeterministic.dfa")) {
            Err(LoadError::NonDeterministic { line, state, symbol }) => {
                assert_eq!(line, 6);
                assert_eq!(state, "q0");
                assert_eq!(symbol, "a");
            }
            other => panic!("expected NonDeterministic, got {:?}", other),
        }

        assert!(matches!(
            load_automaton(test_data_path("short.dfa")),
            Err(LoadError::MalformedDescription(_))
        ));

        assert!(matches!(
            load_automaton(test_data_path("malformed_rule.dfa")),
            Err(LoadError::MalformedRule { line: 5, fields: 2, .. })
        ));

        assert_eq!(
            load_automaton(test_data_path("unknown_state.dfa")).unwrap_err(),
            LoadError::UnknownReference {
                line: 5,
                kind: ReferenceKind::State,
                name: "q9".to_string(),
            }
        );

        assert!(matches!(
            load_automaton(test_data_path("does_not_exist.dfa")),
            Err(LoadError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_load_error_survives_report() {
        let err = load_automaton(test_data_path("nondeterministic.dfa")).unwrap_err();
        let report = Report::new(err);

        match report.downcast_ref::<LoadError>() {
            Some(LoadError::NonDeterministic { .. }) => {}
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_json_save_and_reload() {
        let automaton = get_automaton("even_as.dfa");
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("even_as.json");

        automaton.save_automaton(&json_path).unwrap();
        let reloaded = load_automaton_json(&json_path).unwrap();

        assert_eq!(reloaded, automaton);
        assert_eq!(
            evaluate(&reloaded, ["abab", "b"]),
            evaluate(&automaton, ["abab", "b"])
        );
    }

    #[test]
    fn test_save_and_export_outside_the_crate_root() {
        let automaton = get_automaton("even_as.dfa");
        let out_dir = tempfile::tempdir().unwrap();
        let json_path = out_dir.path().join("even_as.json");
        let dot_base = out_dir.path().join("even_as");

        automaton.save_automaton(&json_path).unwrap();
        let reloaded = load_automaton_json(&json_path).unwrap();
        save_dot(&reloaded, dot_base.to_str().unwrap(), false).unwrap();

        assert!(out_dir.path().join("even_as.dot").exists());
        assert_eq!(reloaded, automaton);
    }

    #[test]
    fn test_description_round_trip() {
        let automaton = get_automaton("even_as.dfa");
        let reloaded = parse_automaton(&automaton.to_description()).unwrap();
        assert_eq!(reloaded, automaton);
    }

    fn arb_description() -> impl Strategy<Value = (String, bool)> {
        // Up to 4 states, each (state, symbol) pair gets at most one rule
        (1usize..5)
            .prop_flat_map(|num_states| {
                (
                    Just(num_states),
                    prop::collection::vec(any::<bool>(), num_states),
                    0..num_states,
                    prop::collection::vec(prop::option::of(0..num_states), num_states * 2),
                )
            })
            .prop_map(|(num_states, finals, initial, mut targets)| {
                // The first state always has a rule on 'x' so the description is long enough
                if targets[0].is_none() {
                    targets[0] = Some(initial);
                }

                let states: Vec<String> = (0..num_states).map(|id| format!("s{}", id)).collect();
                let final_states: Vec<&str> = states
                    .iter()
                    .zip(finals.iter())
                    .filter(|(_, is_final)| **is_final)
                    .map(|(state, _)| state.as_str())
                    .collect();

                let mut lines = vec![
                    "x y".to_string(),
                    states.join(" "),
                    final_states.join(" "),
                    states[initial].clone(),
                ];

                for (index, target) in targets.iter().enumerate() {
                    if let Some(target) = target {
                        let symbol = if index % 2 == 0 { 'x' } else { 'y' };
                        lines.push(format!("{} {} {}", states[index / 2], symbol, states[*target]));
                    }
                }

                (lines.join("\n"), finals[initial])
            })
    }

    proptest! {
        #[test]
        fn prop_empty_word_accepted_iff_initial_is_final((description, initial_is_final) in arb_description()) {
            let automaton = parse_automaton(&description).unwrap();
            let expected = if initial_is_final { Outcome::Accepted } else { Outcome::Rejected };
            prop_assert_eq!(automaton.classify(""), expected);
        }

        #[test]
        fn prop_repeated_evaluation_is_identical(
            (description, _) in arb_description(),
            words in prop::collection::vec("[xyz]{0,6}", 0..10),
        ) {
            let automaton = parse_automaton(&description).unwrap();
            prop_assert_eq!(evaluate(&automaton, &words), evaluate(&automaton, &words));
        }
    }
}
