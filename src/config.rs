//! Run configuration for both pipelines.
//!
//! Every path and switch a run needs is carried in these values, built once at
//! startup by the CLI and passed into the pipeline entry points.

use crate::build_runner::StepCommand;
use crate::section::{SECTION_END, SECTION_START};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Inputs and output location of the documentation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsConfig {
    /// File holding the `APIServer apiServer(...)` declaration
    pub entry_file: PathBuf,
    /// Directory scanned recursively for module headers
    pub library_dir: PathBuf,
    /// Directory receiving `openapi.json` and `openapi.yaml`
    pub output_dir: PathBuf,
}

impl DocsConfig {
    /// Standard firmware layout: `src/main.cpp`, `lib/`, output into `data/`.
    pub fn for_project(root: &Path) -> Self {
        Self {
            entry_file: root.join("src").join("main.cpp"),
            library_dir: root.join("lib"),
            output_dir: root.join("data"),
        }
    }
}

/// One source file whose marked section is copied into the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSource {
    /// Marker name in the generator, e.g. `@MAIN_COPY`
    pub marker: String,
    pub path: PathBuf,
    pub start: String,
    pub end: String,
}

impl SectionSource {
    /// A source delimited by the standard `//@API_DOC_SECTION_*` markers.
    pub fn new(marker: &str, path: PathBuf) -> Self {
        Self {
            marker: marker.to_string(),
            path,
            start: SECTION_START.to_string(),
            end: SECTION_END.to_string(),
        }
    }
}

/// Toolchain invocation of the build step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Directory holding the generator's CMake project
    pub tools_dir: PathBuf,
    /// Name of the build directory created inside `tools_dir`
    pub build_dir_name: String,
    /// Run inside the build directory
    pub configure: StepCommand,
    /// Run inside the build directory after `configure`
    pub build: StepCommand,
    /// Built executable, relative to the build directory
    pub artifact: PathBuf,
    pub artifact_args: Vec<OsString>,
}

impl BuildConfig {
    /// CMake configuration for the generator in `tools_dir`.
    pub fn cmake(tools_dir: &Path) -> Self {
        Self {
            tools_dir: tools_dir.to_path_buf(),
            ..Self::default()
        }
    }

    pub fn build_dir(&self) -> PathBuf {
        self.tools_dir.join(&self.build_dir_name)
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            tools_dir: PathBuf::from("tools"),
            build_dir_name: "build".to_string(),
            configure: StepCommand::new("cmake", [".."]),
            build: StepCommand::new("cmake", ["--build", "."]),
            artifact: PathBuf::from("gen"),
            artifact_args: Vec::new(),
        }
    }
}

/// Everything the splice-and-build pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceConfig {
    /// Generator source rewritten in place
    pub target: PathBuf,
    /// Sections copied into `target`, in splice order
    pub sources: Vec<SectionSource>,
    pub enable_splice: bool,
    pub enable_build: bool,
    pub build: BuildConfig,
}

impl SpliceConfig {
    /// Standard firmware layout: `src/main.cpp` and the WiFi manager API header
    /// spliced into `tools/gen.cpp`, built in `tools/build`.
    pub fn for_project(root: &Path, tools_dir: Option<&Path>) -> Self {
        let tools_dir = tools_dir.map_or_else(|| root.join("tools"), Path::to_path_buf);
        Self {
            target: tools_dir.join("gen.cpp"),
            sources: vec![
                SectionSource::new("@MAIN_COPY", root.join("src").join("main.cpp")),
                SectionSource::new(
                    "@APIMODULE_COPY",
                    root.join("lib")
                        .join("WiFiManager")
                        .join("src")
                        .join("WiFiManagerAPI.h"),
                ),
            ],
            enable_splice: true,
            enable_build: true,
            build: BuildConfig::cmake(&tools_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docs_config_layout() {
        let config = DocsConfig::for_project(Path::new("/fw"));
        assert_eq!(config.entry_file, PathBuf::from("/fw/src/main.cpp"));
        assert_eq!(config.library_dir, PathBuf::from("/fw/lib"));
        assert_eq!(config.output_dir, PathBuf::from("/fw/data"));
    }

    #[test]
    fn test_splice_config_layout() {
        let config = SpliceConfig::for_project(Path::new("/fw"), None);

        assert_eq!(config.target, PathBuf::from("/fw/tools/gen.cpp"));
        assert_eq!(config.build.build_dir(), PathBuf::from("/fw/tools/build"));
        assert!(config.enable_splice && config.enable_build);

        let markers: Vec<&str> = config.sources.iter().map(|s| s.marker.as_str()).collect();
        assert_eq!(markers, vec!["@MAIN_COPY", "@APIMODULE_COPY"]);
        assert_eq!(
            config.sources[1].path,
            PathBuf::from("/fw/lib/WiFiManager/src/WiFiManagerAPI.h")
        );
        assert_eq!(config.sources[0].start, "//@API_DOC_SECTION_START");
    }

    #[test]
    fn test_splice_config_custom_tools_dir() {
        let config = SpliceConfig::for_project(Path::new("/fw"), Some(Path::new("/gen")));
        assert_eq!(config.target, PathBuf::from("/gen/gen.cpp"));
        assert_eq!(config.build.tools_dir, PathBuf::from("/gen"));
    }

    #[test]
    fn test_default_build_commands() {
        let config = BuildConfig::default();
        assert_eq!(config.configure, StepCommand::new("cmake", [".."]));
        assert_eq!(config.build, StepCommand::new("cmake", ["--build", "."]));
        assert_eq!(config.artifact, PathBuf::from("gen"));
    }
}
