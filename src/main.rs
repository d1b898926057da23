//! purank - rank unlabelled observations by positive-likeness.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use purank::builder::PuRankerBuilder;
use purank::config::{parse_feature_list, PuParams};

#[derive(Parser, Debug)]
#[command(name = "purank")]
#[command(
    version,
    about = "Process the command line input for the PU learning",
    long_about = None,
    after_help = "Setting -b, --outfrac to a value x will cause the top x fraction of the unlabelled \
                  observations to be output as positive, and the others to be output as unlabelled"
)]
struct Cli {
    /// The location containing the dataset (tab separated, with header)
    dataset: PathBuf,

    /// The location to save the results
    output: PathBuf,

    /// The features to remove (comma separated)
    #[arg(short = 'f', long = "features")]
    features: Option<String>,

    /// The fraction of positive similarities to remove (smallest similarities removed)
    #[arg(short = 'a', long = "possim")]
    possim: Option<f64>,

    /// The fraction of unlabelled observations to output as positive
    #[arg(short = 'b', long = "outfrac")]
    outfrac: Option<f64>,

    /// The fraction of unlabelled similarities to remove (smallest similarities removed)
    #[arg(short = 'c', long = "unlabsim")]
    unlabsim: Option<f64>,

    /// TOML file with default parameters; flags given on the command line win
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn params(&self) -> Result<PuParams> {
        let mut params = match &self.config {
            Some(path) => PuParams::from_toml_file(path)
                .with_context(|| format!("loading parameters from {}", path.display()))?,
            None => PuParams::default(),
        };
        if let Some(features) = &self.features {
            params.excluded_features = parse_feature_list(features);
        }
        if let Some(a) = self.possim {
            params.positive_truncation = a;
        }
        if let Some(b) = self.outfrac {
            params.promotion_fraction = b;
        }
        if let Some(c) = self.unlabsim {
            params.unlabelled_truncation = c;
        }
        params.validate()?;
        Ok(params)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let params = cli.params()?;
    let ranking = PuRankerBuilder::new()
        .with_params(params)
        .run(&cli.dataset)
        .with_context(|| format!("ranking {}", cli.dataset.display()))?;

    ranking
        .write_tsv(&cli.output)
        .with_context(|| format!("writing results to {}", cli.output.display()))?;

    if let Some((id, score)) = ranking.ranked().first() {
        info!("Most positive-like unlabelled observation: {} ({:.6})", id, score);
    }
    Ok(())
}
