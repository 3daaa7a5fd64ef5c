use crate::model::{ApiInfo, ModuleRegistry};
use crate::parser::{excerpt, DeclarationParser};
use anyhow::Result;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File scanner for traversing the firmware library directory.
///
/// The `FileScanner` recursively walks a directory to find every C/C++ header
/// file, including those in hidden or `build` directories. Entries are visited in
/// file-name order so repeated scans of the same tree produce the same module order.
///
/// # Example
///
/// ```no_run
/// use apidoc_from_source::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./lib"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} header files", result.header_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Result of directory scanning operation.
///
/// Contains the list of discovered headers and any warnings encountered during scanning.
pub struct ScanResult {
    /// List of paths to all discovered `.h` files
    pub header_files: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified root directory.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects all `.h` files.
    ///
    /// If any directories or files cannot be accessed, warnings are logged and added
    /// to the result, but scanning continues.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory does not exist.
    pub fn scan(&self) -> Result<ScanResult> {
        if !self.root_path.exists() {
            anyhow::bail!("Directory does not exist: {}", self.root_path.display());
        }

        let mut header_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path).sort_by_file_name() {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("h") {
                        header_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        Ok(ScanResult {
            header_files,
            warnings,
        })
    }
}

/// Collects the API metadata and module declarations of a firmware project.
///
/// Both operations are best effort: missing files and absent declarations are
/// logged and yield empty results instead of errors.
pub struct SourceScanner;

impl SourceScanner {
    /// Reads the API title/version/description from the entry file.
    pub fn extract_api_info(entry_file: &Path) -> Option<ApiInfo> {
        info!("Parsing API info from {}", entry_file.display());

        let content = match fs::read_to_string(entry_file) {
            Ok(content) => content,
            Err(e) => {
                warn!("Cannot read entry file {}: {}", entry_file.display(), e);
                return None;
            }
        };

        match DeclarationParser::parse_api_info(&content) {
            Some(api_info) => {
                info!(
                    "Found API info: {} v{} ({})",
                    api_info.title, api_info.version, api_info.description
                );
                Some(api_info)
            }
            None => {
                warn!("No API info found in {}", entry_file.display());
                if let Some(index) = content.find("APIServer") {
                    debug!("Context: {}", excerpt(&content, index, 500));
                }
                None
            }
        }
    }

    /// Builds a registry from every header under `library_root` that declares a module.
    pub fn scan_modules(library_root: &Path) -> ModuleRegistry {
        info!("Scanning for API modules in {}", library_root.display());

        let mut registry = ModuleRegistry::new();
        let scan_result = match FileScanner::new(library_root.to_path_buf()).scan() {
            Ok(result) => result,
            Err(e) => {
                warn!("{}", e);
                return registry;
            }
        };

        debug!("Found {} header files", scan_result.header_files.len());

        for path in &scan_result.header_files {
            match DeclarationParser::parse_module_file(path) {
                Ok(Some(module)) => {
                    info!(
                        "Found module '{}' v{} with {} route(s) in {}",
                        module.name,
                        module.version,
                        module.routes.len(),
                        path.display()
                    );
                    registry.insert(module);
                }
                Ok(None) => debug!("No module declaration in {}", path.display()),
                Err(e) => warn!("Skipping {}: {:#}", path.display(), e),
            }
        }

        registry
    }
}
