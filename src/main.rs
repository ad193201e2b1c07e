use clap::{value_parser, Arg, ArgAction, Command};
use gama::{runner, Config, Limits};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let defaults = Limits::default();
    let matches = Command::new("gama")
        .about("Single-pass interpreter for the Gama teaching language")
        .arg(
            Arg::new("file")
                .help("The program to execute (read from stdin when omitted)")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("tokens")
                .short('t')
                .long("tokens")
                .help("Write the classified token list to this file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log to stderr (-v debug, -vv trace)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("max-tokens")
                .long("max-tokens")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Token limit, end of input included (default 2048)"),
        )
        .arg(
            Arg::new("max-variables")
                .long("max-variables")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Distinct variable limit (default 256)"),
        )
        .arg(
            Arg::new("max-identifier-len")
                .long("max-identifier-len")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Longest identifier accepted (default 127)"),
        )
        .get_matches();

    let level = match matches.get_count("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let logger = SimpleLogger::new()
        .with_level(level)
        .with_utc_timestamps();
    if let Err(e) = logger.init() {
        eprintln!("Warning: logger unavailable: {}", e);
    }

    let limits = Limits {
        max_tokens: *matches.get_one::<usize>("max-tokens").unwrap_or(&defaults.max_tokens),
        max_variables: *matches
            .get_one::<usize>("max-variables")
            .unwrap_or(&defaults.max_variables),
        max_identifier_len: *matches
            .get_one::<usize>("max-identifier-len")
            .unwrap_or(&defaults.max_identifier_len),
    };
    let config = Config {
        limits,
        token_dump: matches.get_one::<PathBuf>("tokens").cloned(),
    };

    let ok = match matches.get_one::<PathBuf>("file") {
        Some(path) => run_file(path, &config),
        None => run_stdin(&config),
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_file(path: &Path, config: &Config) -> bool {
    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        return false;
    }

    match fs::read_to_string(path) {
        Ok(source) => {
            let filename = path.display().to_string();
            runner::run(&source, Some(&filename), config)
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            false
        }
    }
}

fn run_stdin(config: &Config) -> bool {
    let mut source = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut source) {
        eprintln!("Error reading program from stdin: {}", e);
        return false;
    }
    runner::run(&source, None, config)
}
