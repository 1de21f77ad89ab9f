//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: engine error (bad dimensions, unknown variant, halted divergence)
//! - 11: I/O error (scenario read, snapshot write)
//! - 12: input error (bad `--place`, bad layer, bad scenario document)
//! - 13: serialization error

use instanton_core::EngineError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    Engine(EngineError),
    Io(String),
    Input(String),
    /// JSON output failure.
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Engine(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                f.write_str(msg)
            }
        }
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Io(msg) => CliError::Io(msg),
            other => CliError::Engine(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let errors = [
            CliError::Engine(EngineError::InvalidDimensions),
            CliError::Io("write failed".into()),
            CliError::Input("bad placement".into()),
            CliError::Serialization("json fail".into()),
        ];
        let codes: Vec<i32> = errors.iter().map(CliError::exit_code).collect();
        assert_eq!(codes, vec![10, 11, 12, 13]);
    }

    #[test]
    fn debug_names_the_variant() {
        let err: Result<(), CliError> = Err(CliError::Input("bad placement".into()));
        let shown = format!("{:?}", err.unwrap_err());
        assert!(shown.starts_with("Input("), "{shown}");
    }

    #[test]
    fn from_engine_error_io_routes_to_cli_io() {
        let cli_err = CliError::from(EngineError::Io("disk full".into()));
        assert_eq!(cli_err.exit_code(), 11);
        assert!(cli_err.to_string().contains("disk full"));
    }

    #[test]
    fn from_engine_error_non_io_routes_to_cli_engine() {
        let cli_err = CliError::from(EngineError::UnsupportedVariant {
            kind: "potential family",
            name: "saddle".into(),
        });
        assert_eq!(cli_err.exit_code(), 10);
        assert!(cli_err.to_string().contains("saddle"));
    }

    #[test]
    fn diverged_run_is_an_engine_error() {
        let cli_err = CliError::from(EngineError::Diverged { step: 12, cells: 3 });
        assert_eq!(cli_err.exit_code(), 10);
    }

    #[test]
    fn from_serde_json_error_routes_to_serialization() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{invalid");
        let cli_err = CliError::from(bad_json.unwrap_err());
        assert_eq!(cli_err.exit_code(), 13);
    }
}
