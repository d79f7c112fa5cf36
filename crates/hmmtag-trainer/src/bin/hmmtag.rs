//! hmmtag command line
//!
//! Trains an HMM tagger on a zipped JSON dataset, reports validation scores,
//! writes test-set predictions and prints dataset summaries.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hmmtag_core::{HmmConfig, stringify_labeled_doc};
use hmmtag_data::{Dataset, DatasetStats, Split, load_dataset};
use hmmtag_trainer::{Trainer, TrainerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Parser)]
#[command(name = "hmmtag")]
#[command(about = "Train and run an add-k smoothed HMM sequence tagger")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Zip archive holding train.json, val.json and test.json
    #[arg(short = 'z', long, env = "HMMTAG_DATA_ZIP")]
    data_zip: Option<PathBuf>,

    /// Directory the archive is extracted into (replaced on every run)
    #[arg(short = 'd', long, env = "HMMTAG_DATA_DIR", default_value = "data")]
    dest: PathBuf,

    /// Read splits from `dest` as-is instead of extracting the archive
    #[arg(long)]
    no_extract: bool,
}

#[derive(Args, Debug, Clone)]
struct ModelArgs {
    /// JSON file with trainer settings; flags below override it
    #[arg(short, long, env = "HMMTAG_CONFIG")]
    config: Option<PathBuf>,

    /// Add-k constant for transitions
    #[arg(long = "k-t")]
    k_transition: Option<f64>,

    /// Add-k constant for emissions
    #[arg(long = "k-e")]
    k_emission: Option<f64>,

    /// Add-k constant for start states
    #[arg(long = "k-s")]
    k_start: Option<f64>,

    /// Minimum training count for a token to get its own emission column
    #[arg(long)]
    min_count: Option<usize>,
}

impl ModelArgs {
    fn trainer_config(&self) -> Result<TrainerConfig> {
        let mut config = match &self.config {
            Some(path) => TrainerConfig::from_file(path)?,
            None => TrainerConfig::default(),
        };
        let mut hmm: HmmConfig = config.hmm;
        if let Some(k) = self.k_transition {
            hmm = hmm.with_k_transition(k);
        }
        if let Some(k) = self.k_emission {
            hmm = hmm.with_k_emission(k);
        }
        if let Some(k) = self.k_start {
            hmm = hmm.with_k_start(k);
        }
        hmm.validate()?;
        config = config.with_hmm(hmm);
        if let Some(n) = self.min_count {
            config = config.with_min_count(n);
        }
        Ok(config)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum SplitName {
    Train,
    Val,
    Test,
}

impl SplitName {
    fn select(self, dataset: &Dataset) -> &Split {
        match self {
            SplitName::Train => &dataset.train,
            SplitName::Val => &dataset.validation,
            SplitName::Test => &dataset.test,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fit on the training split and report validation scores
    Train {
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Fit on the training split and write predictions for a split as JSON
    Predict {
        #[command(flatten)]
        model: ModelArgs,

        /// Split to tag
        #[arg(short, long, value_enum, default_value = "test")]
        split: SplitName,

        /// Output file
        #[arg(short, long, default_value = "predictions.json")]
        output: PathBuf,
    },
    /// Print summary statistics for a split
    Stats {
        #[arg(short, long, value_enum, default_value = "train")]
        split: SplitName,
    },
    /// Print the first sentences of a split with entities bracketed
    Show {
        #[arg(short, long, value_enum, default_value = "train")]
        split: SplitName,

        /// Number of sentences to print
        #[arg(short = 'n', long, default_value_t = 5)]
        limit: usize,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load(cli: &Cli) -> Result<Dataset> {
    if cli.no_extract {
        return Dataset::from_dir(&cli.dest)
            .with_context(|| format!("loading dataset from {}", cli.dest.display()));
    }
    let Some(zip) = &cli.data_zip else {
        bail!("no dataset archive given; pass --data-zip or --no-extract");
    };
    load_dataset(zip, &cli.dest).with_context(|| format!("loading dataset from {}", zip.display()))
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let dataset = load(&cli)?;

    match &cli.command {
        Commands::Train { model } => {
            let trainer = Trainer::new(model.trainer_config()?);
            let report = trainer.run(&dataset)?;
            match report.validation {
                Some(evaluation) => println!("{evaluation}"),
                None => println!("validation split is unlabeled, nothing to score"),
            }
        }
        Commands::Predict {
            model,
            split,
            output,
        } => {
            let trainer = Trainer::new(model.trainer_config()?);
            let hmm = trainer.fit(&dataset.train)?;
            let target = split.select(&dataset);
            let predictions = trainer.predict(&hmm, target)?;

            let tagged = Split::new(target.text.clone(), predictions);
            let json = serde_json::to_string_pretty(&tagged)?;
            std::fs::write(output, json)
                .with_context(|| format!("writing {}", output.display()))?;
            info!(sentences = tagged.len(), output = %output.display(), "predictions written");
        }
        Commands::Stats { split } => {
            println!("{}", DatasetStats::from_split(split.select(&dataset)));
        }
        Commands::Show { split, limit } => {
            let target = split.select(&dataset);
            if !target.is_labeled() {
                bail!("{split:?} split has no labels to show");
            }
            for (text, ner) in target.iter().take(*limit) {
                println!("{}", stringify_labeled_doc(text, ner));
            }
        }
    }

    Ok(())
}
