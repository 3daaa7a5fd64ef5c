//! API doc tooling for a C++ firmware project.
//!
//! The firmware registers its API at runtime: an `APIServer apiServer({...})`
//! declaration names the API, and each module header calls
//! `registerModule("name", "version", "description")` followed by one
//! `registerMethod(..., "route", ...)` per route. This crate reads those calls
//! straight from the sources, without compiling anything.
//!
//! # Pipelines
//!
//! **Docs** - scan the sources and write an OpenAPI 3.1 description:
//!
//! 1. [`scanner`] - finds headers and collects API info and modules
//! 2. [`parser`] - pattern matching on declaration text
//! 3. [`model`] - the scanned [`model::ApiInfo`] and [`model::ModuleRegistry`]
//! 4. [`openapi_builder`] - assembles the document
//! 5. [`serializer`] - writes `openapi.json` and `openapi.yaml`
//!
//! **Splice** - refresh the doc generator (`tools/gen.cpp`) and run it:
//!
//! 1. [`section`] - extracts the `//@API_DOC_SECTION_*` blocks
//! 2. [`sanitizer`] - strips lambda captures and bodies
//! 3. [`splice`] - rewrites the generator's `_START`/`_END` regions
//! 4. [`build_runner`] - CMake configure, build and run
//!
//! # Example Usage
//!
//! ```no_run
//! use apidoc_from_source::{
//!     openapi_builder::OpenApiBuilder,
//!     scanner::SourceScanner,
//!     serializer::serialize_yaml,
//! };
//! use std::path::Path;
//!
//! let api_info = SourceScanner::extract_api_info(Path::new("src/main.cpp"));
//! let registry = SourceScanner::scan_modules(Path::new("lib"));
//! let document = OpenApiBuilder::build(api_info.as_ref(), &registry);
//!
//! println!("{}", serialize_yaml(&document).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! See the [`cli`] module for the `docs` and `splice` subcommands.

pub mod build_runner;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod openapi_builder;
pub mod parser;
pub mod sanitizer;
pub mod scanner;
pub mod section;
pub mod serializer;
pub mod splice;
