use std::path::{Path, PathBuf};

use config::Config;
use serde::Deserialize;

use crate::error::{PipelineError, Result};

/// SQL directory, relative to the root directory
pub const DEFAULT_SQL_DIR: &str = "sql/duckdb";

/// Artifacts directory holding the database file, relative to the root directory
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts/duckdb";

/// Database file stem; the file is `<db_name>.duckdb`
pub const DEFAULT_DB_NAME: &str = "brandon_shelter";

/// Optional configuration file looked up in the root directory
pub const CONFIG_FILE_NAME: &str = "shelter.toml";

/// Prefix for environment overrides, e.g. `SHELTER_DB_NAME=demo`
pub const ENV_PREFIX: &str = "SHELTER";

/// Values a configuration source may override
#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    sql_dir: Option<String>,
    artifacts_dir: Option<String>,
    db_name: Option<String>,
}

/// Resolved filesystem layout of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Directory everything else resolves against (the working directory by default)
    pub root_dir: PathBuf,

    /// Directory holding the `.sql` scripts and queries
    pub sql_dir: PathBuf,

    /// Directory holding the database file
    pub artifacts_dir: PathBuf,

    /// Database file stem
    pub db_name: String,
}

impl PipelineConfig {
    /// Default layout under `root_dir`, without reading any configuration source
    pub fn from_root(root_dir: impl Into<PathBuf>) -> Self {
        let root_dir = root_dir.into();
        Self {
            sql_dir: root_dir.join(DEFAULT_SQL_DIR),
            artifacts_dir: root_dir.join(DEFAULT_ARTIFACTS_DIR),
            db_name: DEFAULT_DB_NAME.to_string(),
            root_dir,
        }
    }

    /// Function to create and initialize a new configuration
    ///
    /// The root directory is the current working directory. Settings come from
    /// the file at `path` if given, otherwise from `./shelter.toml` if present,
    /// and finally from `SHELTER_*` environment variables.
    pub fn new(path: &Option<String>) -> Result<PipelineConfig> {
        let root_dir = std::env::current_dir()?;
        Self::load(&root_dir, path.as_deref().map(Path::new))
    }

    /// Build the configuration for an explicit root directory
    pub fn load(root_dir: &Path, path: Option<&Path>) -> Result<PipelineConfig> {
        let mut builder = Config::builder();

        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(PipelineError::config(format!(
                        "config file '{}' does not exist",
                        p.display()
                    )));
                }
                builder = builder.add_source(config::File::from(p.to_path_buf()));
            }
            None => {
                let p = root_dir.join(CONFIG_FILE_NAME);
                if p.exists() {
                    builder = builder.add_source(config::File::from(p));
                }
            }
        }

        // E.g., `SHELTER_DB_NAME=demo ./shelter` would change the database file name
        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));

        let settings = builder
            .build()
            .map_err(|e| PipelineError::config(format!("failed to build configuration: {}", e)))?;

        let overrides = settings.try_deserialize::<ConfigOverrides>().map_err(|e| {
            PipelineError::config(format!("failed to deserialize configuration: {}", e))
        })?;

        Ok(Self::from_root(root_dir).with_overrides(overrides))
    }

    fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(dir) = overrides.sql_dir {
            self.sql_dir = resolve(&self.root_dir, &dir);
        }
        if let Some(dir) = overrides.artifacts_dir {
            self.artifacts_dir = resolve(&self.root_dir, &dir);
        }
        if let Some(name) = overrides.db_name {
            self.db_name = name;
        }
        self
    }

    /// Get the path to the DuckDB database file
    pub fn db_path(&self) -> PathBuf {
        self.artifacts_dir.join(format!("{}.duckdb", self.db_name))
    }

    /// Get the path of a SQL file inside the SQL directory
    pub fn sql_path(&self, file: &str) -> PathBuf {
        self.sql_dir.join(file)
    }

    /// Create the artifacts directory and any missing parents
    pub fn ensure_artifacts_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.artifacts_dir)?;
        Ok(())
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        [
            format!("Root Directory:      {}", self.root_dir.display()),
            format!("SQL Directory:       {}", self.sql_dir.display()),
            format!("Artifacts Directory: {}", self.artifacts_dir.display()),
            format!("Database Path:       {}", self.db_path().display()),
        ]
        .join("\n")
    }
}

fn resolve(root_dir: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root_dir.join(path)
    }
}
