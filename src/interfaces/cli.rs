use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::application::use_cases::exploration::explore;
use crate::application::use_cases::training_pipeline::{write_outputs, TrainingPipeline};
use crate::domain::error::{AppError, Result};
use crate::domain::pipeline_config::PipelineConfig;
use crate::infrastructure::classifiers::LogisticRegression;
use crate::infrastructure::config::ConfigService;
use crate::infrastructure::csv::CsvParser;

#[derive(Debug, Parser)]
#[command(name = "titanic-lab")]
#[command(version)]
#[command(about = "Titanic survival preprocessing, training and evaluation", long_about = None)]
pub struct Cli {
    /// TOML configuration file (./titanic-lab.toml is read when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit the bundled logistic model and export predictions for the test set
    Train(TrainArgs),
    /// Print column summaries, group survival rates and correlations as JSON
    Explore(ExploreArgs),
}

#[derive(Debug, Args)]
pub struct TrainArgs {
    /// Labelled training CSV
    #[arg(long)]
    pub train: PathBuf,

    /// Unlabelled test CSV
    #[arg(long)]
    pub test: PathBuf,

    /// Output directory for submission.csv, probabilities.csv and report.json
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Append family_size and is_alone features
    #[arg(long, default_value_t = false)]
    pub family_features: bool,

    #[arg(long)]
    pub threshold: Option<f64>,

    #[arg(long)]
    pub epochs: Option<usize>,
}

impl TrainArgs {
    /// Flags given on the command line win over every config layer
    pub fn apply(&self, config: &mut PipelineConfig) {
        if self.family_features {
            config.include_family_features = true;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(epochs) = self.epochs {
            config.epochs = epochs;
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
    }
}

#[derive(Debug, Args)]
pub struct ExploreArgs {
    /// Passenger CSV to describe
    #[arg(long)]
    pub data: PathBuf,

    /// Column whose values define the survival-rate groups
    #[arg(long, default_value = "Sex")]
    pub group_by: String,
}

impl Cli {
    pub fn load_config(&self) -> Result<PipelineConfig> {
        let service = match &self.config {
            Some(path) => ConfigService::with_file(path),
            None => ConfigService::new(),
        };
        let mut config = service.load()?;

        if let Command::Train(args) = &self.command {
            args.apply(&mut config);
            config
                .validate()
                .map_err(|e| AppError::ConfigError(format!("Invalid command line value: {}", e)))?;
        }
        Ok(config)
    }
}

pub async fn execute(cli: Cli, config: PipelineConfig) -> Result<()> {
    match cli.command {
        Command::Train(args) => train(&args, config).await,
        Command::Explore(args) => explore_file(&args, &config),
    }
}

async fn train(args: &TrainArgs, config: PipelineConfig) -> Result<()> {
    let output_dir = config.output_dir.clone();
    let pipeline = TrainingPipeline::new(config)?;
    let mut model = LogisticRegression::new();

    let report = pipeline.run(&args.train, &args.test, &mut model).await?;
    let layout = write_outputs(&report, &output_dir)?;

    if let Some(evaluation) = &report.evaluation {
        let m = &evaluation.metrics;
        println!(
            "validation: accuracy {:.4}  precision {:.4}  recall {:.4}  f1 {:.4}  auc {:.4}",
            m.accuracy, m.precision, m.recall, m.f1, evaluation.roc.auc
        );
    }
    for entry in report.importance.iter().take(5) {
        println!("  {:<12} {:>8.4}  ({:.1}%)", entry.feature, entry.weight, entry.importance * 100.0);
    }
    println!("submission: {}", layout.submission_path().display());

    info!(run_id = %report.run_id, "Training run finished");
    Ok(())
}

fn explore_file(args: &ExploreArgs, config: &PipelineConfig) -> Result<()> {
    let records = CsvParser::new().parse_file(&args.data)?;
    let report = explore(&records, &args.group_by, &config.label_column);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_train_command() {
        let cli = Cli::try_parse_from([
            "titanic-lab",
            "train",
            "--train",
            "train.csv",
            "--test",
            "test.csv",
            "--family-features",
            "--threshold",
            "0.4",
            "--epochs",
            "7",
            "-o",
            "out",
        ])
        .unwrap();

        let Command::Train(args) = cli.command else {
            panic!("expected train command");
        };
        let mut config = PipelineConfig::default();
        args.apply(&mut config);

        assert!(config.include_family_features);
        assert_eq!(config.threshold, 0.4);
        assert_eq!(config.epochs, 7);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.batch_size, 32);
    }

    #[test]
    fn test_parse_explore_command() {
        let cli = Cli::try_parse_from(["titanic-lab", "explore", "--data", "train.csv", "--config", "lab.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("lab.toml")));
        match cli.command {
            Command::Explore(args) => {
                assert_eq!(args.data, PathBuf::from("train.csv"));
                assert_eq!(args.group_by, "Sex");
            }
            Command::Train(_) => panic!("expected explore command"),
        }
    }

    #[test]
    fn test_train_requires_inputs() {
        assert!(Cli::try_parse_from(["titanic-lab", "train", "--train", "train.csv"]).is_err());
    }

    #[test]
    fn test_out_of_range_flag_rejected() {
        let path = std::env::temp_dir().join(format!("titanic-lab-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "epochs = 3\n").unwrap();
        let cli = Cli::try_parse_from([
            "titanic-lab",
            "train",
            "--config",
            path.to_str().unwrap(),
            "--train",
            "a.csv",
            "--test",
            "b.csv",
            "--threshold",
            "2",
        ])
        .unwrap();
        let result = cli.load_config();
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
