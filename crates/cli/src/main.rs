//! gunfish command-line interface.
//!
//! ```sh
//! gunfish geometry --frequency 2856 --cells 1.6
//! gunfish analyze E-GUN.SFO --cells 1.6
//! gunfish export OUTSF7.TXT --output e-gun.dat
//! gunfish options tune.toml
//! ```

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gunfish")]
#[command(about = "RF gun cavity geometry, field analysis and tuning options")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cavity geometry for a design as JSON.
    Geometry {
        /// Design name, used as the deck title.
        #[arg(long, default_value = "e-gun")]
        name: String,
        /// Design frequency in MHz.
        #[arg(short, long, default_value_t = 2856.0)]
        frequency: f64,
        /// Cell count, e.g. 1.6 for a half cell plus one full cell.
        #[arg(short, long, default_value_t = 1.6)]
        cells: f64,
        /// Cell radii in cm, half cell first. Defaults to the matched radius.
        #[arg(short, long, num_args = 1.., value_delimiter = ',')]
        radii: Option<Vec<f64>>,
    },
    /// Analyze a Superfish `.SFO` summary and print its observables as JSON.
    Analyze {
        /// Path to the `.SFO` file.
        sfo: PathBuf,
        /// Cell count of the simulated cavity.
        #[arg(short, long)]
        cells: f64,
        /// Tuning options file (for the peak detector settings).
        #[arg(long)]
        options: Option<PathBuf>,
    },
    /// Convert an `OUTSF7.TXT` field listing to a normalized tracking map.
    Export {
        /// Path to the field listing.
        listing: PathBuf,
        /// Output file. Writes to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the resolved tuning options as TOML.
    Options {
        /// Tuning options file. Prints the defaults when omitted.
        file: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Geometry {
            name,
            frequency,
            cells,
            radii,
        } => commands::geometry(&name, frequency, cells, radii.as_deref()),
        Commands::Analyze {
            sfo,
            cells,
            options,
        } => commands::analyze(&sfo, cells, options.as_deref()),
        Commands::Export { listing, output } => commands::export(&listing, output.as_deref()),
        Commands::Options { file } => commands::options(file.as_deref()),
    }
}
