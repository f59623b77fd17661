//! Runtime configuration for the command-line front end.
//!
//! Flags win over environment variables, which win over defaults.

use std::path::PathBuf;

use thiserror::Error;

pub const ENV_PROCESSED_DIR: &str = "TFIDF_LIBRARY_PROCESSED";
pub const ENV_SNAPSHOT_PATH: &str = "TFIDF_LIBRARY_SNAPSHOT";

const DEFAULT_PROCESSED_DIR: &str = "Processed";
const DEFAULT_SNAPSHOT_PATH: &str = "library.snapshot";
const DEFAULT_TOP: usize = 2;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} requires a value")]
    MissingValue(String),

    #[error("invalid value for {flag}: {value}")]
    InvalidValue { flag: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// prompt loop on stdin
    Interactive,
    Query(String),
    /// documents similar to the named one
    Similar(String),
    /// term-frequency string of the named document
    Cloud(String),
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub processed_dir: PathBuf,
    pub snapshot_path: PathBuf,
    /// ignore the snapshot and rebuild from `processed_dir`
    pub rebuild: bool,
    pub top: usize,
    pub mode: Mode,
}

impl Config {
    /// Parse process arguments and environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_args(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Parse `args` (program name excluded), looking up fallbacks through `env`.
    /// The first bare argument is taken as the query; later ones are ignored.
    pub fn from_args<I, F>(args: I, env: F) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut processed_dir = None;
        let mut snapshot_path = None;
        let mut rebuild = false;
        let mut top = DEFAULT_TOP;
        let mut mode = Mode::Interactive;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| args.next().ok_or_else(|| ConfigError::MissingValue(flag.to_string()));
            match arg.as_str() {
                "--processed" => processed_dir = Some(PathBuf::from(value("--processed")?)),
                "--snapshot" => snapshot_path = Some(PathBuf::from(value("--snapshot")?)),
                "--rebuild" => rebuild = true,
                "--query" => mode = Mode::Query(value("--query")?),
                "--similar" => mode = Mode::Similar(value("--similar")?),
                "--cloud" => mode = Mode::Cloud(value("--cloud")?),
                "--top" => {
                    let raw = value("--top")?;
                    top = match raw.parse::<usize>() {
                        Ok(n) if n > 0 => n,
                        _ => {
                            return Err(ConfigError::InvalidValue {
                                flag: "--top".to_string(),
                                value: raw,
                            })
                        }
                    };
                }
                "-h" | "--help" => mode = Mode::Help,
                other => {
                    if mode == Mode::Interactive {
                        mode = Mode::Query(other.to_string());
                    } else {
                        log::warn!("extra argument ignored: {}", other);
                    }
                }
            }
        }

        Ok(Self {
            processed_dir: processed_dir
                .or_else(|| env(ENV_PROCESSED_DIR).map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROCESSED_DIR)),
            snapshot_path: snapshot_path
                .or_else(|| env(ENV_SNAPSHOT_PATH).map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
            rebuild,
            top,
            mode,
        })
    }
}
