//! rhprof CLI — dump HPROF heap dumps as text, root census or type statistics.

#[cfg(feature = "fast-alloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, ValueEnum};
use rhprof::handlers::{PrintHandler, RootCounter, TypeStats};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "rhprof", about = "HPROF binary heap dump reader")]
struct Cli {
    /// Heap dump file (as written by jmap -dump or HotSpotDiagnosticMXBean)
    input: PathBuf,

    /// What to do with the records
    #[arg(long, value_enum, default_value_t = Mode::Print)]
    handler: Mode,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Print every record
    Print,
    /// Count GC roots by kind
    Roots,
    /// Instance counts and shallow sizes per type
    Stats,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), rhprof::Error> {
    match cli.handler {
        Mode::Print => {
            let mut handler = PrintHandler::new();
            rhprof::parse(&cli.input, &mut handler)
        }
        Mode::Roots => {
            let mut handler = RootCounter::new();
            rhprof::parse(&cli.input, &mut handler)
        }
        Mode::Stats => {
            let mut handler = TypeStats::new();
            rhprof::parse(&cli.input, &mut handler)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_handler_is_print() {
        let cli = Cli::try_parse_from(["rhprof", "dump.hprof"]).unwrap();
        assert!(matches!(cli.handler, Mode::Print));
    }

    #[test]
    fn handler_flag_selects_mode() {
        let cli = Cli::try_parse_from(["rhprof", "dump.hprof", "--handler", "stats"]).unwrap();
        assert!(matches!(cli.handler, Mode::Stats));
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["rhprof"]).is_err());
    }
}
