//! Command implementations for the CGD CLI.
//!
//! Provides subcommands for fetching upstream COVID data, generating a
//! synthetic demo dataset and exporting filtered observation files.

use clap::Subcommand;

pub mod export;
pub mod fetch;
pub mod generate;

#[derive(Subcommand)]
pub enum Command {
    /// Download the upstream open dataset and write fixture CSVs
    Fetch {
        /// Output directory for countries.csv and observations.csv
        #[arg(short, long, default_value = "fixtures")]
        output: String,

        /// Comma-separated ISO codes to keep (default: all countries)
        #[arg(long)]
        countries: Option<String>,
    },

    /// Generate a deterministic synthetic dataset (20 demo countries, 2020-2023)
    Generate {
        /// Output directory for countries.csv and observations.csv
        #[arg(short, long, default_value = "fixtures")]
        output: String,

        /// RNG seed; the same seed always yields the same dataset
        #[arg(long, default_value_t = cgd_core::sample::DEFAULT_SEED)]
        seed: u64,
    },

    /// Filter an observations CSV by country set and inclusive date range
    Export {
        /// Input observations CSV path
        #[arg(short = 'i', long)]
        observations: String,

        /// Comma-separated ISO codes to keep
        #[arg(long)]
        countries: String,

        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        end: String,

        /// Output CSV path
        #[arg(short, long)]
        output: String,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Fetch { output, countries } => {
            fetch::run_fetch(&output, countries.as_deref()).await
        }
        Command::Generate { output, seed } => generate::run_generate(&output, seed),
        Command::Export {
            observations,
            countries,
            start,
            end,
            output,
        } => export::run_export(&observations, &countries, &start, &end, &output),
    }
}
