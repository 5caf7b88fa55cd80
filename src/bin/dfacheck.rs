use clap::{Arg, ArgAction, Command};
use color_eyre::eyre::{bail, Result, WrapErr};
use dfacheck::{evaluate, load_automaton, load_automaton_json, save_dot, EvaluationResult};
use log::{info, LevelFilter};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

fn read_words_file(file_path: &PathBuf) -> Result<Vec<String>> {
    let contents = fs::read_to_string(file_path)
        .wrap_err_with(|| format!("Failed to read the words file {}", file_path.display()))?;

    Ok(contents.lines().map(str::to_string).collect())
}

fn write_results<W: Write>(out: &mut W, result: &EvaluationResult, format: &str) -> Result<()> {
    if format == "json" {
        let json_string = serde_json::to_string_pretty(result)?;
        writeln!(out, "{}", json_string)?;
    } else {
        for (word, outcome) in result.iter() {
            writeln!(out, "The word '{}' is {} by the automaton.", word, outcome)?;
        }
    }
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Command::new("dfacheck")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Validate a deterministic finite automaton description and classify words with it")
        .arg(
            Arg::new("automaton")
                .short('a')
                .long("automaton")
                .help("The automaton description file: alphabet, states, final states and initial state on the first four lines, then one `origin symbol destination` rule per line")
                .value_name("AUTOMATON FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Read the automaton file as an automaton previously saved with --save-json")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("word")
                .short('w')
                .long("word")
                .help("A word to classify. Can be repeated")
                .value_name("WORD")
                .action(ArgAction::Append)
                .allow_hyphen_values(true)
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("words-file")
                .short('f')
                .long("words-file")
                .help("A file with one word to classify per line")
                .value_name("WORDS FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Output format of the classification")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("The output file to store the classification in instead of printing it")
                .value_name("OUTPUT RESULT FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("save-dot")
                .short('d')
                .long("save-dot")
                .help("Save a Graphviz rendering of the automaton as <NAME>.dot")
                .value_name("NAME")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("render")
                .long("render")
                .help("Also render <NAME>.jpg with the Graphviz dot executable")
                .requires("save-dot")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("save-json")
                .short('s')
                .long("save-json")
                .help("Save the validated automaton as json")
                .value_name("JSON FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase logging verbosity. RUST_LOG takes precedence")
                .action(ArgAction::Count),
        )
        .get_matches();

    init_logging(args.get_count("verbose"));

    let automaton_path = match args.get_one::<PathBuf>("automaton") {
        Some(file_path) => file_path,
        None => bail!("Automaton description file not provided!"),
    };

    let automaton = if args.get_flag("json") {
        load_automaton_json(automaton_path)?
    } else {
        load_automaton(automaton_path)?
    };

    info!("Automaton loaded successfully");

    if let Some(json_path) = args.get_one::<PathBuf>("save-json") {
        automaton
            .save_automaton(json_path)
            .wrap_err_with(|| format!("Failed to save the automaton to {}", json_path.display()))?;
    }

    if let Some(dot_name) = args.get_one::<String>("save-dot") {
        save_dot(&automaton, dot_name, args.get_flag("render"))?;
    }

    let mut words: Vec<String> = args
        .get_many::<String>("word")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    if let Some(words_path) = args.get_one::<PathBuf>("words-file") {
        words.extend(read_words_file(words_path)?);
    }

    let has_word_source = args.contains_id("word") || args.contains_id("words-file");

    if !has_word_source {
        if args.contains_id("save-json") || args.contains_id("save-dot") {
            return Ok(());
        }
        bail!("Either --word or --words-file should be provided!");
    }

    let result = evaluate(&automaton, &words);

    let format = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");

    match args.get_one::<PathBuf>("output") {
        Some(out_path) => {
            let mut out_file = File::create(out_path)
                .wrap_err_with(|| format!("Failed to create {}", out_path.display()))?;
            write_results(&mut out_file, &result, format)?;
        }
        None => {
            let stdout = io::stdout();
            write_results(&mut stdout.lock(), &result, format)?;
        }
    }

    Ok(())
}
