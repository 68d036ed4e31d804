use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, LevelFilter};
use nt_console::{Console, ConsoleConfig, ConsoleError, Interrupt, TextChunk};

/// Shows a progress bar, then a status line that can be interrupted
/// with Ctrl-C and restarted.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of steps of the progress bar
    #[arg(long, default_value_t = 10)]
    steps: u32,
    /// Pause between two progress steps, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,
    /// Length of the wait behind the status line, in milliseconds
    #[arg(long, default_value_t = 5000)]
    wait_ms: u64,
    /// Width of the progress bar, brackets and percentage included
    #[arg(long)]
    bar_length: Option<usize>,
    /// JSON file with console settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print diagnostics (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG still wins when set
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_config(cli: &Cli) -> Result<ConsoleConfig> {
    let mut config = match &cli.config {
        Some(path) => ConsoleConfig::from_file(path)
            .with_context(|| format!("unable to load {}", path.display()))?,
        None => ConsoleConfig::default(),
    };
    if let Some(length) = cli.bar_length {
        config = config.bar_length(length);
    }
    Ok(config)
}

fn demo(console: &mut Console, cli: &Cli, interrupt: &Interrupt) -> Result<()> {
    let palette = console.config().palette.clone();
    let heading = palette.frame.clone();

    console.progress(&[TextChunk::styled(":: progress test", heading.clone())], |bar| {
        for step in 0..=cli.steps {
            interrupt.sleep(Duration::from_millis(cli.delay_ms))?;
            bar.set_value(f64::from(step) / f64::from(cli.steps.max(1)))?;
        }
        Ok::<_, anyhow::Error>(())
    })?;

    let caption = [TextChunk::styled(":: wait ", heading), TextChunk::plain("for something")];
    loop {
        let finished = console.pending(&caption, |status| {
            match interrupt.sleep(Duration::from_millis(cli.wait_ms)) {
                Ok(()) => Ok(true),
                Err(ConsoleError::Interrupted) => {
                    interrupt.take();
                    status.fail(["exception was caught\n"]);
                    Ok(false)
                }
                Err(e) => Err(anyhow::Error::from(e)),
            }
        })?;
        if finished {
            break;
        }

        let restart = [TextChunk::styled("restart", palette.prompt.clone())];
        if !console.ask(&restart, true)? {
            debug!("not restarting");
            break;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut console = Console::with_config(load_config(&cli)?);
    let interrupt = Interrupt::register()?;

    let outcome = console.without_echo(|console| demo(console, &cli, &interrupt));
    match outcome {
        Err(e) if matches!(e.downcast_ref::<ConsoleError>(), Some(ConsoleError::Interrupted)) => {
            console.warning(&["interrupted by user\n".into()])?;
            process::exit(1);
        }
        other => other,
    }
}
