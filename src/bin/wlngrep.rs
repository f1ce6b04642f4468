//! Grep for syntactically valid WLN.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wlncrab::fsm::{self, match_line, whole_line_matches, MatchMode};

/// Match lines against the WLN grammar automaton.
#[derive(Parser, Debug)]
#[command(name = "wlngrep", version, about)]
struct Cli {
    /// Return number of matches instead of strings
    #[arg(short = 'c', long = "only-count")]
    count: bool,

    /// Dump the resultant machine to a dot file
    #[arg(short = 'd', long = "dump")]
    dump: bool,

    /// Print only the matched parts of a line
    #[arg(short = 'o', long = "only-matching")]
    only_matching: bool,

    /// Do not minimise the DFA (debugging only)
    #[arg(short = 'm', long = "not-minimal")]
    not_minimal: bool,

    /// Interpret the argument as a literal string instead of a file
    #[arg(short = 's', long = "string")]
    string: bool,

    /// Return the string only if the whole line matches
    #[arg(short = 'x', long = "exact-matching")]
    exact: bool,

    /// File to scan (or literal string with -s)
    target: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "wlncrab=warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let dfa = fsm::wln_dfa(!cli.not_minimal);

    if cli.dump {
        let name = if cli.not_minimal { "wln-dfa.dot" } else { "wln-minimal.dot" };
        if let Err(e) = std::fs::write(name, fsm::dot::to_dot(&dfa)) {
            eprintln!("Error: could not write {}: {}", name, e);
            return ExitCode::FAILURE;
        }
        eprintln!("machine dumped to {}", name);
        return ExitCode::SUCCESS;
    }

    let mode = if cli.exact {
        MatchMode::Exact
    } else if cli.only_matching {
        MatchMode::MatchOnly
    } else {
        MatchMode::Line
    };

    let text = if cli.string {
        cli.target.clone()
    } else {
        match std::fs::read_to_string(&cli.target) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Error: unable to open file at: {}: {}", cli.target, e);
                return ExitCode::FAILURE;
            }
        }
    };

    let mut total = 0usize;
    for line in text.lines() {
        match mode {
            MatchMode::Exact => {
                if whole_line_matches(&dfa, line) {
                    total += 1;
                    if !cli.count {
                        println!("{}", line);
                    }
                }
            }
            MatchMode::MatchOnly => {
                for m in match_line(&dfa, line) {
                    total += 1;
                    if !cli.count {
                        println!("{}", m);
                    }
                }
            }
            MatchMode::Line => {
                let matches = match_line(&dfa, line);
                total += matches.len();
                if !matches.is_empty() && !cli.count {
                    println!("{}", line);
                }
            }
        }
    }

    if cli.count {
        println!("{} matches", total);
    }

    if total > 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
