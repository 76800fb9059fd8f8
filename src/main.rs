use clap::{Parser, Subcommand};
use kbmacro::actions::{self, Action};
use kbmacro::controller::{Controller, RunObserver};
use kbmacro::hotkey::HotkeyTrigger;
use kbmacro::input::{InputDriver, RecordingDriver};
use kbmacro::runner::{LoopSpec, RunOutcome};
use kbmacro::settings::Settings;
use kbmacro::store::MacroStore;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "kbmacro",
    about = "Save and replay keyboard and mouse macros",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved macros
    List,

    /// Import a sequence file into the store
    Save {
        name: String,
        /// JSON file holding the action sequence
        file: String,
    },

    /// Delete a saved macro
    Remove { name: String },

    /// Play a macro after a short countdown
    Run {
        name: String,
        /// Number of passes, or `0`/`forever` to replay until stopped
        #[arg(default_value = "1", value_parser = parse_loops)]
        loops: LoopSpec,

        /// Record and log events instead of injecting them
        #[arg(long)]
        dry_run: bool,
    },
}

fn parse_loops(raw: &str) -> Result<LoopSpec, String> {
    if raw == "forever" {
        return Ok(LoopSpec::UntilCancelled);
    }
    raw.parse::<u32>()
        .map(LoopSpec::from_count)
        .map_err(|_| format!("expected a number of passes or 'forever', got '{raw}'"))
}

struct CliObserver;

impl RunObserver for CliObserver {
    fn countdown_tick(&self, seconds_left: u32) {
        println!("starting in {seconds_left}...");
    }

    fn loop_complete(&self, loop_index: u32, elapsed: Duration) {
        tracing::info!(loops_done = loop_index + 1, ?elapsed, "loop complete");
    }

    fn finished(&self, outcome: &RunOutcome) {
        match outcome {
            RunOutcome::Completed => println!("run completed"),
            RunOutcome::Cancelled => println!("run cancelled"),
            RunOutcome::Failed(err) => println!("run failed: {err}"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load("settings.json")?;
    kbmacro::logging::init(settings.debug_logging);
    let store = MacroStore::new(settings.macros_dir());

    match cli.command {
        Commands::List => list(&store),
        Commands::Save { name, file } => save(&store, &name, &file),
        Commands::Remove { name } => remove(&store, &name),
        Commands::Run {
            name,
            loops,
            dry_run,
        } => run(&settings, &store, &name, loops, dry_run),
    }
}

fn list(store: &MacroStore) -> anyhow::Result<()> {
    let names = store.names()?;
    if names.is_empty() {
        println!("no macros saved");
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn save(store: &MacroStore, name: &str, file: &str) -> anyhow::Result<()> {
    let sequence = actions::load_sequence(file)?;
    actions::validate(&sequence)?;
    store.save(name, &sequence)?;
    println!("saved '{name}' ({} actions)", sequence.len());
    Ok(())
}

fn remove(store: &MacroStore, name: &str) -> anyhow::Result<()> {
    store.remove(name)?;
    println!("removed '{name}'");
    Ok(())
}

fn run(
    settings: &Settings,
    store: &MacroStore,
    name: &str,
    loop_spec: LoopSpec,
    dry_run: bool,
) -> anyhow::Result<()> {
    let sequence = store.load(name)?;

    if dry_run {
        let driver = RecordingDriver::new();
        let recorder = driver.clone();
        execute(settings, &sequence, loop_spec, driver)?;
        println!("dry run recorded {} events", recorder.take_events().len());
        Ok(())
    } else {
        #[cfg(target_os = "windows")]
        {
            execute(
                settings,
                &sequence,
                loop_spec,
                kbmacro::input::win::SendInputDriver::new(),
            )
        }
        #[cfg(not(target_os = "windows"))]
        {
            anyhow::bail!(
                "input injection is only supported on Windows; pass --dry-run to log events instead"
            )
        }
    }
}

/// Drive one playback session to completion. With the hotkey enabled the
/// session stays alive after the run ends so the combo can start it again;
/// otherwise it exits as soon as the controller goes idle.
fn execute<D: InputDriver + 'static>(
    settings: &Settings,
    sequence: &[Action],
    loop_spec: LoopSpec,
    driver: D,
) -> anyhow::Result<()> {
    let controller = Controller::new(driver, Arc::new(CliObserver));

    let trigger = if settings.hotkey_enabled {
        let trigger = HotkeyTrigger::new(settings.hotkey());
        match trigger.start_listener() {
            Ok(()) => Some(trigger),
            Err(err) => {
                tracing::warn!("{err}; hotkey toggle disabled");
                None
            }
        }
    } else {
        None
    };

    controller.request_start(sequence, loop_spec)?;
    if trigger.is_some() {
        println!("hotkey toggle active, press ctrl+c to quit");
    }

    loop {
        if let Some(trigger) = &trigger {
            if trigger.take() {
                if let Err(err) = controller.toggle(sequence, loop_spec) {
                    tracing::warn!("hotkey toggle ignored: {err}");
                }
            }
        }
        if trigger.is_none() && controller.state().is_idle() {
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;

    #[test]
    fn loop_argument_accepts_counts_and_forever() {
        assert_eq!(
            parse_loops("3"),
            Ok(LoopSpec::Fixed(NonZeroU32::new(3).unwrap()))
        );
        assert_eq!(parse_loops("0"), Ok(LoopSpec::UntilCancelled));
        assert_eq!(parse_loops("forever"), Ok(LoopSpec::UntilCancelled));
        assert!(parse_loops("lots").is_err());
        assert!(parse_loops("-1").is_err());
    }

    #[test]
    fn every_subcommand_parses() {
        let cli = Cli::try_parse_from(["kbmacro", "list"]).unwrap();
        assert!(matches!(cli.command, Commands::List));

        let cli = Cli::try_parse_from(["kbmacro", "save", "demo", "demo.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Save { name, file } if name == "demo" && file == "demo.json"
        ));

        let cli = Cli::try_parse_from(["kbmacro", "remove", "demo"]).unwrap();
        assert!(matches!(cli.command, Commands::Remove { name } if name == "demo"));
    }

    #[test]
    fn run_defaults_to_one_pass() {
        let cli = Cli::try_parse_from(["kbmacro", "run", "demo"]).unwrap();
        match cli.command {
            Commands::Run {
                name,
                loops,
                dry_run,
            } => {
                assert_eq!(name, "demo");
                assert_eq!(loops, LoopSpec::from_count(1));
                assert!(!dry_run);
            }
            _ => panic!("expected the run subcommand"),
        }
    }

    #[test]
    fn run_accepts_forever_and_dry_run() {
        let cli =
            Cli::try_parse_from(["kbmacro", "run", "demo", "forever", "--dry-run"]).unwrap();
        match cli.command {
            Commands::Run { loops, dry_run, .. } => {
                assert_eq!(loops, LoopSpec::UntilCancelled);
                assert!(dry_run);
            }
            _ => panic!("expected the run subcommand"),
        }
    }

    #[test]
    fn bad_loop_counts_are_rejected_at_parse_time() {
        assert!(Cli::try_parse_from(["kbmacro", "run", "demo", "lots"]).is_err());
        assert!(Cli::try_parse_from(["kbmacro", "run"]).is_err());
        assert!(Cli::try_parse_from(["kbmacro", "bogus"]).is_err());
    }
}
