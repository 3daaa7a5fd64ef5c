use std::path::PathBuf;

/// Result type alias for the build pipeline
pub type BuildResult<T> = std::result::Result<T, BuildError>;

/// Reasons the configure/build/run pipeline can stop
#[derive(Debug)]
pub enum BuildError {
    /// The build directory could not be prepared or an output pipe failed
    Io(std::io::Error),
    /// The configure or build tool could not be found
    ToolchainUnavailable { program: String },
    /// The built generator is not where it was expected
    ArtifactMissing { path: PathBuf },
    /// A step ran and exited unsuccessfully
    StepFailed { step: &'static str, code: Option<i32> },
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BuildError::Io(e) => write!(f, "IO error: {}", e),
            BuildError::ToolchainUnavailable { program } => {
                write!(f, "toolchain not available: '{}' is not installed or not in PATH", program)
            }
            BuildError::ArtifactMissing { path } => {
                write!(f, "build artifact not found: {}", path.display())
            }
            BuildError::StepFailed { step, code: Some(code) } => {
                write!(f, "{} step failed with exit code {}", step, code)
            }
            BuildError::StepFailed { step, code: None } => {
                write!(f, "{} step terminated by signal", step)
            }
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BuildError {
    fn from(err: std::io::Error) -> Self {
        BuildError::Io(err)
    }
}
