//! Interactive alarm console.
//!
//! Wires the coordination core to the raw-mode console: the main thread is
//! the input loop, the dispatcher/handler/display workers run in the
//! background and print through the console sink.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use chime::{parse_command, Config, Console, Core, RuntimeError};

#[derive(Parser, Debug)]
#[command(name = "chime", version, about = "Multi-threaded console alarm manager")]
struct Cli {
    /// Capacity of the request queue between the console and the dispatcher.
    #[arg(long, default_value_t = 4)]
    queue_capacity: usize,

    /// Display scheduler tick in milliseconds.
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,
}

const BANNER: &[&str] = &[
    "Alarm System Initialized. Enter commands in the following formats:",
    "  Start_Alarm(ID): Group(Group_ID) Interval Time Message",
    "  Change_Alarm(ID): Group(Group_ID) Time Message",
    "  Cancel_Alarm(ID)",
    "  Suspend_Alarm(ID)",
    "  Reactivate_Alarm(ID)",
    "  View_Alarms",
    "  quit or exit to terminate the program",
];

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("chime: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), RuntimeError> {
    let cfg = Config {
        queue_capacity: cli.queue_capacity.max(1),
        tick: Duration::from_millis(cli.tick_ms.max(1)),
        ..Config::default()
    };

    let console = Arc::new(Console::new()?);
    for line in BANNER {
        console.print_line(line);
    }

    let core = Core::new(cfg.clone(), console.clone());
    core.spawn_workers()?;

    loop {
        let line = match console.read_line() {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                console.restore();
                return Err(err.into());
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }
        match parse_command(line, cfg.message_limit) {
            Ok(record) => core.submit(record),
            Err(err) => console.print_line(&format!("Error: {err}")),
        }
    }

    console.print_line("Exiting alarm system...");
    console.restore();
    Ok(())
}
