// ============================================================
// TRAINING PIPELINE
// ============================================================
// parse -> preprocess -> split -> fit -> evaluate -> predict, with no shared state between stages

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::use_cases::evaluator::evaluate;
use crate::application::use_cases::feature_importance::{feature_importance, FeatureImportance};
use crate::application::use_cases::preprocessing::Preprocessor;
use crate::application::use_cases::splitter::split;
use crate::domain::csv::Record;
use crate::domain::error::{AppError, Result};
use crate::domain::evaluation::EvaluationSummary;
use crate::domain::features::ImputationParameters;
use crate::domain::pipeline_config::PipelineConfig;
use crate::domain::training::{FitConfig, TrainingHistory, Validation};
use crate::infrastructure::classifiers::Classifier;
use crate::infrastructure::csv::{CsvParser, SubmissionWriter};
use crate::infrastructure::storage::{atomic_write_bytes, OutputLayout};

/// Row counts at each stage of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitSizes {
    pub train: usize,
    pub validation: usize,
    pub test: usize,
}

/// Everything one run produced, ready for display or export
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub model: String,
    pub config: PipelineConfig,
    pub params: ImputationParameters,
    pub features: Vec<String>,
    pub sizes: SplitSizes,
    pub history: TrainingHistory,
    /// `None` when the validation subset is empty
    pub evaluation: Option<EvaluationSummary>,
    /// Empty when the classifier exposes no linear weights
    pub importance: Vec<FeatureImportance>,
    pub test_ids: Vec<String>,
    pub test_probabilities: Vec<f64>,
}

pub struct TrainingPipeline {
    config: PipelineConfig,
    parser: CsvParser,
}

impl TrainingPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid pipeline config: {}", e)))?;
        Ok(Self {
            config,
            parser: CsvParser::new(),
        })
    }

    pub async fn run(
        &self,
        train_csv: &Path,
        test_csv: &Path,
        classifier: &mut dyn Classifier,
    ) -> Result<RunReport> {
        let train = self.parser.parse_file(train_csv)?;
        let test = self.parser.parse_file(test_csv)?;
        info!(
            train_rows = train.len(),
            test_rows = test.len(),
            "Parsed {} and {}",
            train_csv.display(),
            test_csv.display()
        );

        self.run_records(&train, &test, classifier).await
    }

    /// Same as `run`, starting from already parsed records
    pub async fn run_records(
        &self,
        train: &[Record],
        test: &[Record],
        classifier: &mut dyn Classifier,
    ) -> Result<RunReport> {
        let data = Preprocessor::from_config(&self.config).preprocess(train, test)?;
        let (fit_set, validation_set) = split(&data.train, self.config.validation_fraction)?;
        info!(
            train = fit_set.len(),
            validation = validation_set.len(),
            features = data.layout.len(),
            "Split training data"
        );

        let fit_config = FitConfig {
            epochs: self.config.epochs,
            batch_size: self.config.batch_size,
            learning_rate: self.config.learning_rate,
            validation: if validation_set.is_empty() {
                Validation::None
            } else {
                Validation::Data(validation_set.clone())
            },
        };
        let history = classifier
            .fit(fit_set.features(), fit_set.labels(), &fit_config)
            .await?;

        let evaluation = if validation_set.is_empty() {
            warn!("Validation subset is empty; skipping evaluation");
            None
        } else {
            let probabilities = classifier.predict(validation_set.features()).await?;
            let summary = evaluate(&probabilities, validation_set.labels(), self.config.threshold)?;
            info!(
                accuracy = summary.metrics.accuracy,
                f1 = summary.metrics.f1,
                auc = summary.roc.auc,
                "Validation metrics at threshold {}",
                self.config.threshold
            );
            Some(summary)
        };

        let importance = match classifier.weights() {
            Some(weights) => feature_importance(&data.layout, weights)?,
            None => Vec::new(),
        };

        let test_probabilities = classifier.predict(data.test.features()).await?;

        Ok(RunReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            model: classifier.name().to_string(),
            config: self.config.clone(),
            params: data.params,
            features: data.layout.names().to_vec(),
            sizes: SplitSizes {
                train: fit_set.len(),
                validation: validation_set.len(),
                test: data.test.len(),
            },
            history,
            evaluation,
            importance,
            test_ids: data.test.ids().to_vec(),
            test_probabilities,
        })
    }
}

/// Write submission.csv, probabilities.csv and report.json into `dir`
pub fn write_outputs(report: &RunReport, dir: &Path) -> Result<OutputLayout> {
    let layout = OutputLayout::new(dir);
    layout.ensure()?;

    let writer = SubmissionWriter::new(report.config.id_column.clone(), report.config.threshold);

    let mut submission = Vec::new();
    writer.write_submission(&mut submission, &report.test_ids, &report.test_probabilities)?;
    atomic_write_bytes(&layout.submission_path(), &submission)?;

    let mut probabilities = Vec::new();
    writer.write_probabilities(&mut probabilities, &report.test_ids, &report.test_probabilities)?;
    atomic_write_bytes(&layout.probabilities_path(), &probabilities)?;

    let json = serde_json::to_vec_pretty(report)?;
    atomic_write_bytes(&layout.report_path(), &json)?;

    info!(run_id = %report.run_id, "Wrote outputs to {}", layout.root().display());
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::features::FeatureVector;
    use crate::infrastructure::classifiers::LogisticRegression;
    use async_trait::async_trait;
    use std::path::PathBuf;

    const TRAIN_CSV: &str = "\
PassengerId,Survived,Pclass,Name,Sex,Age,SibSp,Parch,Ticket,Fare,Cabin,Embarked
1,0,3,\"Braund, Mr. Owen Harris\",male,22,1,0,A/5 21171,7.25,,S
2,1,1,\"Cumings, Mrs. John Bradley\",female,38,1,0,PC 17599,71.2833,C85,C
3,1,3,\"Heikkinen, Miss. Laina\",female,26,0,0,STON/O2. 3101282,7.925,,S
4,1,1,\"Futrelle, Mrs. Jacques Heath\",female,35,1,0,113803,53.1,C123,S
5,0,3,\"Allen, Mr. William Henry\",male,35,0,0,373450,8.05,,S
6,0,3,\"Moran, Mr. James\",male,,0,0,330877,8.4583,,Q
7,0,1,\"McCarthy, Mr. Timothy J\",male,54,0,0,17463,51.8625,E46,S
8,0,3,\"Palsson, Master. Gosta Leonard\",male,2,3,1,349909,21.075,,S
9,1,3,\"Johnson, Mrs. Oscar W\",female,27,0,2,347742,11.1333,,S
10,1,2,\"Nasser, Mrs. Nicholas\",female,14,1,0,237736,30.0708,,C";

    const TEST_CSV: &str = "\
PassengerId,Pclass,Name,Sex,Age,SibSp,Parch,Ticket,Fare,Cabin,Embarked
892,3,\"Kelly, Mr. James\",male,34.5,0,0,330911,7.8292,,Q
893,3,\"Wilkes, Mrs. James\",female,47,1,0,363272,7,,S
894,2,\"Myles, Mr. Thomas Francis\",male,62,0,0,240276,9.6875,,Q";

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("titanic-lab-run-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
        let train = dir.join("train.csv");
        let test = dir.join("test.csv");
        std::fs::write(&train, TRAIN_CSV).unwrap();
        std::fs::write(&test, TEST_CSV).unwrap();
        (train, test)
    }

    /// Predicts 1 for women and 0 for everyone else
    struct SexRule {
        female_slot: usize,
        fitted: bool,
    }

    #[async_trait]
    impl Classifier for SexRule {
        fn name(&self) -> &str {
            "sex_rule"
        }

        async fn fit(
            &mut self,
            _features: &[FeatureVector],
            _labels: &[u8],
            _config: &FitConfig,
        ) -> Result<TrainingHistory> {
            self.fitted = true;
            Ok(TrainingHistory::default())
        }

        async fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>> {
            if !self.fitted {
                return Err(AppError::ModelError("not fitted".to_string()));
            }
            Ok(features.iter().map(|row| row[self.female_slot]).collect())
        }
    }

    #[tokio::test]
    async fn test_run_with_logistic_regression() {
        let dir = temp_dir();
        let (train, test) = write_inputs(&dir);

        let config = PipelineConfig {
            epochs: 20,
            batch_size: 4,
            ..PipelineConfig::default()
        };
        let pipeline = TrainingPipeline::new(config).unwrap();
        let mut model = LogisticRegression::new();
        let report = pipeline.run(&train, &test, &mut model).await.unwrap();

        assert_eq!(report.sizes, SplitSizes { train: 8, validation: 2, test: 3 });
        assert_eq!(report.history.len(), 20);
        assert_eq!(report.features.len(), 12);
        assert_eq!(report.importance.len(), 12);
        assert_eq!(report.test_ids, vec!["892", "893", "894"]);
        assert!(report.test_probabilities.iter().all(|p| (0.0..=1.0).contains(p)));

        let evaluation = report.evaluation.as_ref().unwrap();
        assert_eq!(evaluation.confusion_matrix.total(), 2);

        let layout = write_outputs(&report, &dir.join("out")).unwrap();
        let submission = std::fs::read_to_string(layout.submission_path()).unwrap();
        let probabilities = std::fs::read_to_string(layout.probabilities_path()).unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(layout.report_path()).unwrap()).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        let lines: Vec<&str> = submission.lines().collect();
        assert_eq!(lines[0], "PassengerId,Survived");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("892,"));
        assert!(probabilities.lines().nth(1).unwrap().split(',').nth(1).unwrap().len() == 8);
        assert_eq!(json["model"], "logistic_regression");
        assert_eq!(json["sizes"]["validation"], 2);
    }

    #[tokio::test]
    async fn test_custom_classifier_and_empty_validation() {
        let train = CsvParser::new().parse_content(TRAIN_CSV).unwrap();
        let test = CsvParser::new().parse_content(TEST_CSV).unwrap();

        let config = PipelineConfig {
            validation_fraction: 1.0,
            include_family_features: true,
            ..PipelineConfig::default()
        };
        let pipeline = TrainingPipeline::new(config).unwrap();
        let mut model = SexRule {
            female_slot: 8,
            fitted: false,
        };
        let report = pipeline.run_records(&train, &test, &mut model).await.unwrap();

        assert!(report.evaluation.is_none());
        assert!(report.importance.is_empty());
        assert_eq!(report.features.len(), 14);
        assert_eq!(report.test_probabilities, vec![0.0, 1.0, 0.0]);
    }

    #[tokio::test]
    async fn test_rule_scores_validation_subset() {
        let train = CsvParser::new().parse_content(TRAIN_CSV).unwrap();
        let test = CsvParser::new().parse_content(TEST_CSV).unwrap();

        let config = PipelineConfig {
            validation_fraction: 0.5,
            ..PipelineConfig::default()
        };
        let pipeline = TrainingPipeline::new(config).unwrap();
        let mut model = SexRule {
            female_slot: 8,
            fitted: false,
        };
        let report = pipeline.run_records(&train, &test, &mut model).await.unwrap();

        // Validation rows 6-10: three men who died, two women who survived
        let evaluation = report.evaluation.unwrap();
        assert_eq!(evaluation.metrics.accuracy, 1.0);
        assert_eq!(evaluation.confusion_matrix.true_positive, 2);
        assert_eq!(evaluation.confusion_matrix.true_negative, 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PipelineConfig {
            threshold: 1.5,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            TrainingPipeline::new(config),
            Err(AppError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_input_file() {
        let pipeline = TrainingPipeline::new(PipelineConfig::default()).unwrap();
        let mut model = LogisticRegression::new();
        let missing = std::env::temp_dir().join(format!("absent-{}.csv", Uuid::new_v4()));
        let result = pipeline.run(&missing, &missing, &mut model).await;
        assert!(matches!(result, Err(AppError::IoError(_))));
    }
}
