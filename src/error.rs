use std::error::Error;
use std::fmt;

/// Errors raised by the design engine. Every variant aborts the whole
/// design request; a partially converged primer is never returned.
#[derive(Debug)]
pub enum DesignError {
    /// An extension or trimming loop hit its iteration cap without
    /// reaching the target melting temperature.
    ConvergenceFailure { target_tm: f64, iterations: usize },
    /// A linear plasmid ran out of physical bases during extension.
    OutOfBases,
    /// Input contained characters outside the nucleotide alphabet
    /// after sanitization.
    InvalidSequence(String),
    Io(std::io::Error),
    Serde(serde_json::Error),
}

impl Error for DesignError {}

impl fmt::Display for DesignError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DesignError::ConvergenceFailure {
                target_tm,
                iterations,
            } => write!(
                f,
                "primer did not reach {target_tm} degrees C within {iterations} iterations"
            ),
            DesignError::OutOfBases => {
                write!(f, "linear sequence ran out of bases during primer extension")
            }
            DesignError::InvalidSequence(what) => write!(f, "invalid nucleotide sequence: {what}"),
            DesignError::Io(err) => write!(f, "{err}"),
            DesignError::Serde(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for DesignError {
    fn from(err: std::io::Error) -> Self {
        DesignError::Io(err)
    }
}

impl From<serde_json::Error> for DesignError {
    fn from(err: serde_json::Error) -> Self {
        DesignError::Serde(err)
    }
}
