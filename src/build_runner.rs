//! Configure, build and run the doc generator with CMake.
//!
//! Each step runs as a child process in the build directory. Its stdout and
//! stderr share one pipe and are relayed line by line as they arrive; the next
//! step only starts after the previous one exited successfully.

use crate::config::BuildConfig;
use crate::error::{BuildError, BuildResult};
use log::{error, info};
use std::ffi::OsString;
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl StepCommand {
    pub fn new<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<OsString>,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Drives the configure → build → run sequence.
pub struct BuildRunner {
    config: BuildConfig,
}

impl BuildRunner {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Runs the whole pipeline, relaying child output to stdout.
    ///
    /// Returns `false` if any step failed; the reason is logged. The build
    /// directory is kept after a failure and removed after a success.
    pub fn run(&self) -> bool {
        let stdout = io::stdout();
        let mut sink = stdout.lock();
        match self.try_run(&mut sink) {
            Ok(()) => {
                info!("Build and generation completed successfully");
                true
            }
            Err(e) => {
                error!("Build pipeline failed: {}", e);
                false
            }
        }
    }

    /// Runs the pipeline, relaying child output to `sink`.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step and returns why it failed.
    pub fn try_run<W: Write>(&self, sink: &mut W) -> BuildResult<()> {
        let build_dir = self.config.build_dir();

        if build_dir.exists() {
            info!("Removing previous build directory {}", build_dir.display());
            fs::remove_dir_all(&build_dir)?;
        }
        fs::create_dir_all(&build_dir)?;

        info!("Configuring: {}", self.config.configure.display());
        self.run_step("configure", &self.config.configure, &build_dir, sink)?;

        info!("Building: {}", self.config.build.display());
        self.run_step("build", &self.config.build, &build_dir, sink)?;

        let artifact = build_dir.join(&self.config.artifact);
        if !artifact.is_file() {
            return Err(BuildError::ArtifactMissing { path: artifact });
        }
        let generate = StepCommand::new(artifact.clone(), &self.config.artifact_args);
        info!("Running {}", artifact.display());
        self.run_step("run", &generate, &build_dir, sink)?;

        info!("Cleaning build directory {}", build_dir.display());
        fs::remove_dir_all(&build_dir)?;
        Ok(())
    }

    fn run_step<W: Write>(
        &self,
        step: &'static str,
        command: &StepCommand,
        cwd: &Path,
        sink: &mut W,
    ) -> BuildResult<()> {
        let (reader, writer) = io::pipe()?;

        // The command owns the parent's copies of the write end; dropping it before
        // reading lets the reader see EOF once the child exits.
        let spawned = {
            let mut cmd = Command::new(&command.program);
            cmd.args(&command.args)
                .current_dir(cwd)
                .stdin(Stdio::null())
                .stdout(writer.try_clone()?)
                .stderr(writer);
            cmd.spawn()
        };

        let mut child = match spawned {
            Ok(child) => child,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(if step == "run" {
                    BuildError::ArtifactMissing {
                        path: PathBuf::from(&command.program),
                    }
                } else {
                    BuildError::ToolchainUnavailable {
                        program: command.program.to_string_lossy().into_owned(),
                    }
                });
            }
            Err(err) => return Err(err.into()),
        };

        let mut reader = BufReader::new(reader);
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            sink.write_all(&line)?;
            sink.flush()?;
        }

        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(BuildError::StepFailed {
                step,
                code: status.code(),
            })
        }
    }
}
