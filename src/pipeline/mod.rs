//! Pipeline driver
//!
//! A run resets the shelter database, bootstraps it from the CSV sources and
//! reports a fixed series of queries. The series is data, not code: each entry
//! of [`SHELTER_STEPS`] names a SQL file, whether it is a script or a query,
//! and the [`Stage`] it belongs to. The driver walks the list in order over a
//! single connection and always closes that connection before returning.

pub mod runner;

use std::fmt;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::PipelineConfig;
use crate::database::{DuckDbConn, SqlEngine};
use crate::error::Result;
use crate::logging::LogSink;

pub use runner::{format_query_block, run_sql_query, run_sql_script, RULE_WIDTH};

/// Title of the banner logged at the start of a run
pub const PIPELINE_TITLE: &str = "Shelter Analytics Pipeline (DuckDB)";

/// Line logged once every step has succeeded and the connection is closed
pub const COMPLETE_MARKER: &str = "PIPELINE COMPLETE ✓";

/// Stages of a run, in the order they are entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Initializing,
    Cleaning,
    Bootstrapping,
    Querying,
    Complete,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Initializing => "initializing",
            Stage::Cleaning => "cleaning",
            Stage::Bootstrapping => "bootstrapping",
            Stage::Querying => "querying",
            Stage::Complete => "complete",
        };
        write!(f, "{}", name)
    }
}

/// Whether a step mutates the database or reports from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Script,
    Query,
}

/// One entry of the ordered step list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub stage: Stage,
    pub kind: StepKind,
    /// File name inside the SQL directory
    pub file: &'static str,
}

impl Step {
    pub const fn script(stage: Stage, file: &'static str) -> Self {
        Self {
            stage,
            kind: StepKind::Script,
            file,
        }
    }

    pub const fn query(file: &'static str) -> Self {
        Self {
            stage: Stage::Querying,
            kind: StepKind::Query,
            file,
        }
    }
}

pub const CLEAN_SCRIPT: &str = "brandon_shelter_clean.sql";
pub const BOOTSTRAP_SCRIPT: &str = "brandon_shelter_bootstrap.sql";

/// The shelter run: clean, bootstrap, structural counts, aggregates, KPIs
pub const SHELTER_STEPS: [Step; 7] = [
    Step::script(Stage::Cleaning, CLEAN_SCRIPT),
    Step::script(Stage::Bootstrapping, BOOTSTRAP_SCRIPT),
    // structural metrics
    Step::query("brandon_shelter_query_branch_count.sql"),
    Step::query("brandon_shelter_query_adoption_count.sql"),
    // aggregate analysis
    Step::query("brandon_shelter_query_adoptions_summary.sql"),
    Step::query("brandon_shelter_query_adoptions_by_animal.sql"),
    // KPI metrics
    Step::query("brandon_shelter_query_kpi_adoptions.sql"),
];

/// What a successful run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub scripts_run: usize,
    pub queries_run: usize,
    pub elapsed: Duration,
}

/// Drives one run of the step list against one database connection
pub struct Pipeline<'a> {
    config: PipelineConfig,
    steps: &'a [Step],
}

impl Pipeline<'static> {
    /// Pipeline running [`SHELTER_STEPS`]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            steps: &SHELTER_STEPS,
        }
    }
}

impl<'a> Pipeline<'a> {
    /// Pipeline running a custom ordered step list
    pub fn with_steps(config: PipelineConfig, steps: &'a [Step]) -> Self {
        Self { config, steps }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn steps(&self) -> &[Step] {
        self.steps
    }

    /// Run the whole pipeline against the configured DuckDB file
    pub fn run(&self, sink: &dyn LogSink) -> Result<PipelineSummary> {
        debug!("entering stage {}", Stage::Initializing);
        sink.header(PIPELINE_TITLE);
        sink.info(&format!("ROOT_DIR  → {}", self.config.root_dir.display()));
        sink.info(&format!("SQL_DIR   → {}", self.config.sql_dir.display()));
        sink.info(&format!("DB_PATH   → {}", self.config.db_path().display()));

        self.config.ensure_artifacts_dir()?;

        let conn = DuckDbConn::open_path(&self.config.db_path())?;
        self.run_on(conn, sink)
    }

    /// Run every step on an already opened engine, then close it
    ///
    /// The engine is closed exactly once, whether the steps succeed or not.
    /// A step failure takes precedence over a failure to close.
    pub fn run_on<E: SqlEngine>(
        &self,
        mut engine: E,
        sink: &dyn LogSink,
    ) -> Result<PipelineSummary> {
        let started = Instant::now();
        let outcome = self.run_steps(&mut engine, sink);
        let closed = engine.close();

        let mut summary = outcome?;
        closed?;

        debug!("entering stage {}", Stage::Complete);
        summary.elapsed = started.elapsed();
        sink.info(COMPLETE_MARKER);
        Ok(summary)
    }

    fn run_steps<E: SqlEngine>(
        &self,
        engine: &mut E,
        sink: &dyn LogSink,
    ) -> Result<PipelineSummary> {
        let mut summary = PipelineSummary::default();
        let mut stage = Stage::Initializing;

        for step in self.steps {
            if step.stage != stage {
                debug!("entering stage {}", step.stage);
                stage = step.stage;
            }

            let path = self.config.sql_path(step.file);
            match step.kind {
                StepKind::Script => {
                    run_sql_script(engine, &path, sink)?;
                    summary.scripts_run += 1;
                }
                StepKind::Query => {
                    run_sql_query(engine, &path, sink)?;
                    summary.queries_run += 1;
                }
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::QueryResult;
    use crate::error::PipelineError;
    use crate::logging::MemorySink;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;

    /// Engine double that records every call and answers queries with one cell
    struct RecordingEngine {
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl SqlEngine for RecordingEngine {
        fn execute_batch(&mut self, sql: &str) -> Result<()> {
            self.calls.borrow_mut().push(format!("batch:{}", sql));
            Ok(())
        }

        fn query(&mut self, sql: &str) -> Result<QueryResult> {
            self.calls.borrow_mut().push(format!("query:{}", sql));
            Ok(QueryResult::new(
                vec!["value".to_string()],
                vec![vec!["1".to_string()]],
            ))
        }

        fn close(self) -> Result<()> {
            self.calls.borrow_mut().push("close".to_string());
            Ok(())
        }
    }

    fn recording_engine() -> (RecordingEngine, Rc<RefCell<Vec<String>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        (
            RecordingEngine {
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }

    /// Write every step's file with its own name as the SQL text
    fn write_step_files(config: &PipelineConfig, steps: &[Step]) {
        fs::create_dir_all(&config.sql_dir).unwrap();
        for step in steps {
            fs::write(config.sql_path(step.file), step.file).unwrap();
        }
    }

    #[test]
    fn test_step_order() {
        assert_eq!(SHELTER_STEPS[0].file, CLEAN_SCRIPT);
        assert_eq!(SHELTER_STEPS[1].file, BOOTSTRAP_SCRIPT);
        assert!(SHELTER_STEPS[..2].iter().all(|s| s.kind == StepKind::Script));
        assert!(SHELTER_STEPS[2..].iter().all(|s| s.kind == StepKind::Query));
        assert!(SHELTER_STEPS.windows(2).all(|w| w[0].stage <= w[1].stage));
        assert_eq!(
            SHELTER_STEPS.last().map(|s| s.file),
            Some("brandon_shelter_query_kpi_adoptions.sql")
        );
    }

    #[test]
    fn test_runs_steps_in_order_and_closes_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::from_root(dir.path());
        write_step_files(&config, &SHELTER_STEPS);

        let (engine, calls) = recording_engine();
        let sink = MemorySink::new();
        let summary = Pipeline::new(config).run_on(engine, &sink).unwrap();

        assert_eq!(summary.scripts_run, 2);
        assert_eq!(summary.queries_run, 5);

        let mut expected: Vec<String> = SHELTER_STEPS
            .iter()
            .map(|s| match s.kind {
                StepKind::Script => format!("batch:{}", s.file),
                StepKind::Query => format!("query:{}", s.file),
            })
            .collect();
        expected.push("close".to_string());
        assert_eq!(*calls.borrow(), expected);

        assert_eq!(sink.lines().last().map(String::as_str), Some(COMPLETE_MARKER));
    }

    #[test]
    fn test_missing_clean_script_stops_and_closes() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::from_root(dir.path());
        write_step_files(&config, &SHELTER_STEPS[1..]);

        let (engine, calls) = recording_engine();
        let sink = MemorySink::new();
        let err = Pipeline::new(config).run_on(engine, &sink).unwrap_err();

        match err {
            PipelineError::MissingSqlFile { name, .. } => assert_eq!(name, CLEAN_SCRIPT),
            other => panic!("expected MissingSqlFile, got {:?}", other),
        }
        assert_eq!(*calls.borrow(), vec!["close".to_string()]);
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_missing_query_stops_later_steps() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::from_root(dir.path());
        let mut present: Vec<Step> = SHELTER_STEPS.to_vec();
        present.remove(3);
        write_step_files(&config, &present);

        let (engine, calls) = recording_engine();
        let sink = MemorySink::new();
        let err = Pipeline::new(config).run_on(engine, &sink).unwrap_err();

        assert!(err.to_string().contains(SHELTER_STEPS[3].file));
        let calls = calls.borrow();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls.last().map(String::as_str), Some("close"));
        assert!(!sink.lines().contains(&COMPLETE_MARKER.to_string()));
    }

    #[test]
    fn test_custom_steps() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::from_root(dir.path());
        let steps = [Step::query("only.sql")];
        write_step_files(&config, &steps);

        let (engine, calls) = recording_engine();
        let sink = MemorySink::new();
        let pipeline = Pipeline::with_steps(config, &steps);
        let summary = pipeline.run_on(engine, &sink).unwrap();

        assert_eq!(pipeline.steps().len(), 1);
        assert_eq!(summary.scripts_run, 0);
        assert_eq!(summary.queries_run, 1);
        assert_eq!(*calls.borrow(), vec!["query:only.sql", "close"]);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Bootstrapping.to_string(), "bootstrapping");
        assert!(Stage::Cleaning < Stage::Querying);
    }
}
