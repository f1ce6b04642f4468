//! Grammar-aware compression of WLN/SMILES-notation line streams.

use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wlncrab::fsm::{self, Automaton, MachineKind};
use wlncrab::zip;

/// Compress or decompress a notation stream against a grammar automaton.
///
/// The grammar is loaded from a dot file (see `wlngrep --dump`); encoder
/// and decoder must use the identical machine.
#[derive(Parser, Debug)]
#[command(name = "smizip", version, about)]
struct Cli {
    /// Compress input file to stdout
    #[arg(short = 'c', conflicts_with_all = ["decompress", "string"])]
    compress: bool,

    /// Decompress input file to stdout
    #[arg(short = 'd', conflicts_with_all = ["compress", "string"])]
    decompress: bool,

    /// Round-trip a literal string in memory (debugging)
    #[arg(short = 's', conflicts_with_all = ["compress", "decompress"])]
    string: bool,

    /// Input file (or literal string with -s)
    input: String,

    /// Grammar automaton dot file
    grammar: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "wlncrab=warn".into()))
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn load_machine(path: &PathBuf) -> Result<Automaton, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("could not open grammar file {}: {}", path.display(), e))?;
    let machine = fsm::dot::from_dot(&text).map_err(|e| e.to_string())?;
    if machine.kind() != MachineKind::Dfa {
        return Err("grammar automaton is not deterministic".into());
    }
    Ok(zip::codec_automaton(&machine))
}

fn run(cli: &Cli) -> Result<(), String> {
    if !(cli.compress || cli.decompress || cli.string) {
        return Err("select a mode: -c, -d or -s".into());
    }
    let machine = load_machine(&cli.grammar)?;
    let stdout = std::io::stdout();

    if cli.compress {
        let data = std::fs::read(&cli.input)
            .map_err(|e| format!("could not open file {}: {}", cli.input, e))?;
        let bits = zip::compress(&machine, &data).map_err(|e| e.to_string())?;
        tracing::debug!(input = data.len(), output = bits.len(), "compressed");
        stdout.lock().write_all(&bits).map_err(|e| e.to_string())?;
    } else if cli.decompress {
        let bits = std::fs::read(&cli.input)
            .map_err(|e| format!("could not open file {}: {}", cli.input, e))?;
        let data = zip::decompress(&machine, &bits).map_err(|e| e.to_string())?;
        stdout.lock().write_all(&data).map_err(|e| e.to_string())?;
    } else {
        let bits = zip::compress(&machine, cli.input.as_bytes()).map_err(|e| e.to_string())?;
        let back = zip::decompress(&machine, &bits).map_err(|e| e.to_string())?;
        if back != cli.input.as_bytes() {
            return Err("round trip mismatch".into());
        }
        println!("{}", String::from_utf8_lossy(&back));
        eprintln!("{} bytes -> {} bytes", cli.input.len(), bits.len());
    }
    Ok(())
}
