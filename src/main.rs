use std::path::PathBuf;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use launcher_grid::common::config::{Config, GridSize, Overrides};
use launcher_grid::common::log::init_logging;
use launcher_grid::pipeline::{self, Source};
use launcher_grid::sys::bridge::CommandBridge;

#[derive(Debug, Parser)]
#[command(
    name = "launcher-grid",
    version,
    about = "Render Android launcher home screens from launcher.db",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Log debug output (RUST_LOG overrides this).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    dump: InputArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write <out>/index.html with every screen and the hotseat (default).
    Dump(InputArgs),
    /// Replace all favorites with test apps covering every cell.
    Fill {
        #[command(flatten)]
        input: InputArgs,

        /// Number of home screens to fill.
        #[arg(long, default_value_t = 3)]
        screens: u32,
    },
}

#[derive(Debug, Clone, Default, Args)]
struct InputArgs {
    /// A database file and/or a grid size such as 5x4 (rows x columns), in
    /// either order. Without a file the database is pulled from the device.
    #[arg(value_name = "DB | RxC", num_args = 1..=2)]
    inputs: Vec<String>,

    /// Output directory. Recreated on every dump.
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Config file (default: <config dir>/launcher-grid/config.toml).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Splits positionals into at most one database path and one grid size.
fn classify(inputs: &[String]) -> Result<(Option<PathBuf>, Option<GridSize>), String> {
    let mut db = None;
    let mut grid = None;
    for input in inputs {
        if let Ok(size) = input.parse::<GridSize>() {
            if grid.replace(size).is_some() {
                return Err("the grid size was given twice".to_string());
            }
        } else {
            let path = PathBuf::from(input);
            if !path.is_file() {
                return Err(format!("`{input}` is neither a database file nor a RxC grid size"));
            }
            if db.replace(path).is_some() {
                return Err("only one database file may be given".to_string());
            }
        }
    }
    Ok((db, grid))
}

fn usage_error(kind: ErrorKind, message: impl std::fmt::Display) -> ! {
    Cli::command().error(kind, message).exit()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (input, screens) = match cli.command {
        None => (cli.dump, None),
        Some(Command::Dump(input)) => (input, None),
        Some(Command::Fill { input, screens }) => (input, Some(screens)),
    };
    if screens == Some(0) {
        usage_error(ErrorKind::InvalidValue, "--screens must be at least 1");
    }
    let (db, grid) = classify(&input.inputs)
        .unwrap_or_else(|message| usage_error(ErrorKind::ArgumentConflict, message));

    let config = Config::resolve(input.config.as_deref())
        .context("loading configuration")?
        .with_overrides(&Overrides { grid, output_dir: input.out });
    let source = db.map_or(Source::Device, Source::File);
    let bridge = CommandBridge::new(config.device.bridge.clone());

    match screens {
        None => {
            let outcome = pipeline::dump(&config, &source, &bridge)
                .with_context(|| format!("dumping {}", describe(&source)))?;
            println!(
                "{} ({} screens, {} icons)",
                config.output.index_path().display(),
                outcome.summary.screens,
                outcome.summary.icons
            );
        }
        Some(screens) => {
            let summary = pipeline::fill(&config, &source, screens, &bridge)
                .with_context(|| format!("filling {}", describe(&source)))?;
            println!("filled {} items on {screens} screens", summary.items);
        }
    }
    Ok(())
}

fn describe(source: &Source) -> String {
    match source {
        Source::File(path) => path.display().to_string(),
        Source::Device => "the device database".to_string(),
    }
}
