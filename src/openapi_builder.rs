use crate::model::{ApiInfo, ModuleRegistry};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// OpenAPI version written into every document
pub const OPENAPI_VERSION: &str = "3.1.1";

/// Description of the single documented response of every operation
pub const SUCCESS_DESCRIPTION: &str = "Successful operation";

/// OpenAPI Info object.
///
/// Empty (`{}`) when the entry file carried no API declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(flatten)]
    pub api: Option<ApiInfo>,
}

/// OpenAPI Server object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
}

/// OpenAPI Tag object, one per module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub description: String,
}

/// OpenAPI PathItem object. Routes are always documented as GET.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    pub get: Operation,
}

/// OpenAPI Operation object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Owning module name
    pub tags: Vec<String>,
    pub summary: String,
    /// Responses keyed by status code
    pub responses: IndexMap<String, Response>,
}

/// OpenAPI Response object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
}

/// Complete OpenAPI document.
///
/// Field order is the key order of the serialized output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: Info,
    pub servers: Vec<Server>,
    pub tags: Vec<Tag>,
    /// Paths keyed by `/<route>`, in module then route order
    pub paths: IndexMap<String, PathItem>,
}

/// Builds the OpenAPI document from scanned API metadata.
pub struct OpenApiBuilder;

impl OpenApiBuilder {
    /// Assembles the document for the given API info and module registry.
    ///
    /// Tags follow registry order. Every route of every module becomes one path
    /// (`/` + route, verbatim) with a single `get` operation. When two modules
    /// declare the same route the later module wins and the path keeps the
    /// position of its first occurrence.
    pub fn build(api_info: Option<&ApiInfo>, registry: &ModuleRegistry) -> OpenApiDocument {
        debug!(
            "Building OpenAPI document for {} module(s), {} route(s)",
            registry.len(),
            registry.route_count()
        );

        let tags = registry
            .iter()
            .map(|module| Tag {
                name: module.name.clone(),
                description: format!("{} (v{})", module.description, module.version),
            })
            .collect();

        let mut paths = IndexMap::new();
        for module in registry.iter() {
            for route in &module.routes {
                let path = format!("/{}", route);
                let item = Self::path_item(&module.name, route);
                if let Some(previous) = paths.insert(path.clone(), item) {
                    debug!(
                        "Path {} from module '{}' replaced by module '{}'",
                        path,
                        previous.get.tags.join(", "),
                        module.name
                    );
                }
            }
        }

        OpenApiDocument {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info {
                api: api_info.cloned(),
            },
            servers: vec![Server {
                url: "/".to_string(),
            }],
            tags,
            paths,
        }
    }

    fn path_item(module_name: &str, route: &str) -> PathItem {
        let mut responses = IndexMap::new();
        responses.insert(
            "200".to_string(),
            Response {
                description: SUCCESS_DESCRIPTION.to_string(),
            },
        );

        PathItem {
            get: Operation {
                tags: vec![module_name.to_string()],
                summary: format!("Route {}", route),
                responses,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Module;
    use pretty_assertions::assert_eq;

    fn module(name: &str, version: &str, description: &str, routes: &[&str]) -> Module {
        let mut module = Module::new(
            name.to_string(),
            version.to_string(),
            description.to_string(),
        );
        module.routes = routes.iter().map(|r| r.to_string()).collect();
        module
    }

    fn demo_info() -> ApiInfo {
        ApiInfo {
            title: "Demo".to_string(),
            version: "1.0".to_string(),
            description: "Test API".to_string(),
        }
    }

    #[test]
    fn test_build_fixed_fields() {
        let doc = OpenApiBuilder::build(Some(&demo_info()), &ModuleRegistry::new());

        assert_eq!(doc.openapi, "3.1.1");
        assert_eq!(doc.info.api, Some(demo_info()));
        assert_eq!(doc.servers, vec![Server { url: "/".to_string() }]);
        assert!(doc.tags.is_empty());
        assert!(doc.paths.is_empty());
    }

    #[test]
    fn test_build_tags_in_registry_order() {
        let mut registry = ModuleRegistry::new();
        registry.insert(module("wifi", "2.0", "WiFi module", &[]));
        registry.insert(module("mqtt", "1.1", "MQTT bridge", &[]));

        let doc = OpenApiBuilder::build(None, &registry);

        assert_eq!(
            doc.tags,
            vec![
                Tag {
                    name: "wifi".to_string(),
                    description: "WiFi module (v2.0)".to_string(),
                },
                Tag {
                    name: "mqtt".to_string(),
                    description: "MQTT bridge (v1.1)".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_build_paths() {
        let mut registry = ModuleRegistry::new();
        registry.insert(module("wifi", "2.0", "WiFi module", &["wifi/status", "wifi/connect"]));

        let doc = OpenApiBuilder::build(Some(&demo_info()), &registry);

        let keys: Vec<&str> = doc.paths.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["/wifi/status", "/wifi/connect"]);

        let status = &doc.paths["/wifi/status"].get;
        assert_eq!(status.tags, vec!["wifi"]);
        assert_eq!(status.summary, "Route wifi/status");
        assert_eq!(status.responses.len(), 1);
        assert_eq!(status.responses["200"].description, "Successful operation");
    }

    #[test]
    fn test_build_path_count_matches_routes() {
        let mut registry = ModuleRegistry::new();
        registry.insert(module("a", "1", "A", &["a/1", "a/2", "a/3"]));
        registry.insert(module("b", "1", "B", &["b/1", "b/2"]));

        let doc = OpenApiBuilder::build(None, &registry);
        assert_eq!(doc.paths.len(), registry.route_count());
    }

    #[test]
    fn test_build_route_collision_last_writer_wins() {
        let mut registry = ModuleRegistry::new();
        registry.insert(module("a", "1", "A", &["shared", "a/only"]));
        registry.insert(module("b", "1", "B", &["shared"]));

        let doc = OpenApiBuilder::build(None, &registry);

        assert_eq!(doc.paths.len(), 2);
        assert_eq!(doc.paths.get_index(0).unwrap().0, "/shared");
        assert_eq!(doc.paths["/shared"].get.tags, vec!["b"]);
    }

    #[test]
    fn test_build_route_used_verbatim() {
        let mut registry = ModuleRegistry::new();
        registry.insert(module("a", "1", "A", &["/already/slashed", "with space"]));

        let doc = OpenApiBuilder::build(None, &registry);
        assert!(doc.paths.contains_key("//already/slashed"));
        assert!(doc.paths.contains_key("/with space"));
    }
}
