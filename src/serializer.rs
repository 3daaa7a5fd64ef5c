//! Serialization module for writing OpenAPI documents as YAML and JSON.
//!
//! Both encodings keep the key order of the document: the fixed top-level order
//! and the insertion order of tags and paths. Nothing is sorted.

use crate::openapi_builder::OpenApiDocument;
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the JSON document inside the output directory
pub const JSON_FILE_NAME: &str = "openapi.json";
/// File name of the YAML document inside the output directory
pub const YAML_FILE_NAME: &str = "openapi.yaml";

/// Serializes an OpenAPI document to block-style YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize OpenAPI document to YAML")
}

/// Serializes an OpenAPI document to JSON, pretty printed with two-space indentation.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize OpenAPI document to JSON")
}

/// Writes string content to a file.
///
/// Creates the file and its parent directories if needed, or overwrites an
/// existing file.
///
/// # Errors
///
/// Returns an error if the directories or the file cannot be written.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Writes `openapi.json` and `openapi.yaml` into `output_dir`, creating it if absent.
///
/// Returns the paths of the JSON and YAML files. A failure part-way leaves
/// whatever was already written in place.
pub fn write_documents(doc: &OpenApiDocument, output_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let json_path = output_dir.join(JSON_FILE_NAME);
    let yaml_path = output_dir.join(YAML_FILE_NAME);

    write_to_file(&serialize_json(doc)?, &json_path)?;
    write_to_file(&serialize_yaml(doc)?, &yaml_path)?;

    info!("OpenAPI files generated in {}", output_dir.display());
    Ok((json_path, yaml_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApiInfo, Module, ModuleRegistry};
    use crate::openapi_builder::OpenApiBuilder;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_document() -> OpenApiDocument {
        let mut registry = ModuleRegistry::new();
        let mut wifi = Module::new(
            "wifi".to_string(),
            "2.0".to_string(),
            "WiFi module".to_string(),
        );
        wifi.routes = vec!["wifi/status".to_string(), "wifi/connect".to_string()];
        registry.insert(wifi);
        let mut sys = Module::new("sys".to_string(), "1.0".to_string(), "System".to_string());
        sys.routes = vec!["sys/info".to_string()];
        registry.insert(sys);

        let api_info = ApiInfo {
            title: "Demo".to_string(),
            version: "1.0".to_string(),
            description: "Test API".to_string(),
        };
        OpenApiBuilder::build(Some(&api_info), &registry)
    }

    #[test]
    fn test_serialize_json_layout() {
        let doc = OpenApiBuilder::build(None, &ModuleRegistry::new());
        let json = serialize_json(&doc).unwrap();

        let expected = r#"{
  "openapi": "3.1.1",
  "info": {},
  "servers": [
    {
      "url": "/"
    }
  ],
  "tags": [],
  "paths": {}
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_serialize_yaml_layout() {
        let doc = create_test_document();
        let yaml = serialize_yaml(&doc).unwrap();

        let expected = r#"openapi: 3.1.1
info:
  title: Demo
  version: '1.0'
  description: Test API
servers:
- url: /
tags:
- name: wifi
  description: WiFi module (v2.0)
- name: sys
  description: System (v1.0)
paths:
  /wifi/status:
    get:
      tags:
      - wifi
      summary: Route wifi/status
      responses:
        '200':
          description: Successful operation
  /wifi/connect:
    get:
      tags:
      - wifi
      summary: Route wifi/connect
      responses:
        '200':
          description: Successful operation
  /sys/info:
    get:
      tags:
      - sys
      summary: Route sys/info
      responses:
        '200':
          description: Successful operation
"#;
        assert_eq!(yaml, expected);
    }

    #[test]
    fn test_json_keeps_insertion_order() {
        let json = serialize_json(&create_test_document()).unwrap();

        let top: Vec<usize> = ["\"openapi\"", "\"info\"", "\"servers\"", "\"tags\"", "\"paths\""]
            .iter()
            .map(|key| json.find(key).unwrap())
            .collect();
        assert!(top.windows(2).all(|w| w[0] < w[1]));

        let status = json.find("\"/wifi/status\"").unwrap();
        let connect = json.find("\"/wifi/connect\"").unwrap();
        let sys = json.find("\"/sys/info\"").unwrap();
        assert!(status < connect && connect < sys);
    }

    #[test]
    fn test_json_and_yaml_are_equivalent() {
        let doc = create_test_document();
        let json = serialize_json(&doc).unwrap();
        let yaml = serialize_yaml(&doc).unwrap();
        let from_json: serde_json::Value = serde_json::from_str(&json).unwrap();
        let from_yaml: serde_json::Value = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn test_roundtrip_json_serialization() {
        let doc = create_test_document();
        let json = serialize_json(&doc).unwrap();

        let deserialized: OpenApiDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, doc);
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("subdir").join("nested").join("test.yaml");

        write_to_file("test content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "test content");
    }

    #[test]
    fn test_write_to_file_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.yaml");

        write_to_file("initial content", &file_path).unwrap();
        write_to_file("new content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");
    }

    #[test]
    fn test_write_documents() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("data");
        let doc = create_test_document();

        let (json_path, yaml_path) = write_documents(&doc, &output_dir).unwrap();

        assert_eq!(json_path, output_dir.join("openapi.json"));
        assert_eq!(yaml_path, output_dir.join("openapi.yaml"));
        let json = fs::read_to_string(&json_path).unwrap();
        let yaml = fs::read_to_string(&yaml_path).unwrap();
        assert_eq!(json, serialize_json(&doc).unwrap());
        assert_eq!(yaml, serialize_yaml(&doc).unwrap());
    }
}
