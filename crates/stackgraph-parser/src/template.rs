//! Template documents and their resources.
//!
//! A [`Template`] is one loaded file: its path, source text and resolved
//! YAML tree. A [`Document`] is the `Resources` section extracted from it, in
//! declaration order. Each [`Resource`] keeps its full entry tree so link
//! discovery can look at every key, not only `Properties`.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;
use serde_yaml::{Mapping, Value};

use crate::error::{Diagnostic, ErrorCode, ParseError, Result};

const RESOURCES_KEY: &str = "Resources";
const TYPE_KEY: &str = "Type";
const NAME_KEY: &str = "Name";
const PROPERTIES_KEY: &str = "Properties";
const TEMPLATE_URL_KEY: &str = "TemplateURL";

/// A loaded template file whose structure has not been checked yet.
#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    source: String,
    value: Value,
}

impl Template {
    pub fn new(path: impl Into<PathBuf>, source: impl Into<String>, value: Value) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
            value,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the resolved tree of the first YAML document.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Extract the [`Document`] of this template.
    ///
    /// # Errors
    ///
    /// The structural errors of [`Document::from_value`], carrying the path
    /// and source of this template.
    pub fn into_document(self) -> Result<Document> {
        let Self {
            path,
            source,
            value,
        } = self;
        Document::from_value(value, path.clone()).map_err(|err| err.with_origin(path, source))
    }
}

/// One declared resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    logical_id: String,
    kind: String,
    display_name: String,
    entry: Value,
}

impl Resource {
    /// Build a resource from its logical id and entry mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::E101`] if `entry` is not a mapping and
    /// [`ErrorCode::E102`] if it has no string `Type`.
    pub fn from_entry(logical_id: impl Into<String>, entry: Value) -> Result<Self> {
        let logical_id = logical_id.into();

        let Some(mapping) = entry.as_mapping() else {
            return Err(Diagnostic::error(format!(
                "resource `{logical_id}` must be a mapping"
            ))
            .with_code(ErrorCode::E101)
            .with_help("declare the resource as `LogicalId: {Type: ..., Properties: ...}`")
            .into());
        };

        let kind = match mapping.get(TYPE_KEY) {
            Some(Value::String(kind)) => kind.clone(),
            Some(_) => {
                return Err(Diagnostic::error(format!(
                    "resource `{logical_id}` has a `Type` that is not a string"
                ))
                .with_code(ErrorCode::E102)
                .into());
            }
            None => {
                return Err(Diagnostic::error(format!(
                    "resource `{logical_id}` has no `Type`"
                ))
                .with_code(ErrorCode::E102)
                .with_help("add a resource type such as `Type: AWS::S3::Bucket`")
                .into());
            }
        };

        let display_name = match mapping.get(NAME_KEY) {
            Some(Value::String(name)) => name.clone(),
            Some(other) => {
                debug!(logical_id, name:? = other; "Ignoring non-string resource name");
                logical_id.clone()
            }
            None => logical_id.clone(),
        };

        Ok(Self {
            logical_id,
            kind,
            display_name,
            entry,
        })
    }

    /// Returns the key identifying the resource within its document.
    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    /// Returns the resource `Type`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns `Name` if it is a plain string, otherwise the logical id.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the full entry tree (`Type`, `Properties`, and any other keys).
    pub fn entry(&self) -> &Value {
        &self.entry
    }

    pub fn properties(&self) -> Option<&Value> {
        self.entry.get(PROPERTIES_KEY)
    }

    /// Returns `Properties.TemplateURL` when it is a string.
    pub fn template_url(&self) -> Option<&str> {
        self.properties()
            .and_then(|properties| properties.get(TEMPLATE_URL_KEY))
            .and_then(Value::as_str)
    }
}

/// The resources declared by one template file.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    resources: IndexMap<String, Resource>,
}

impl Document {
    /// Extract the `Resources` section from a parsed template.
    ///
    /// # Errors
    ///
    /// - [`ErrorCode::E101`] if the root, the `Resources` section or an
    ///   entry is not a mapping
    /// - [`ErrorCode::E100`] if `Resources` is missing
    /// - [`ErrorCode::E102`] if an entry has no string `Type`
    pub fn from_value(value: Value, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let Value::Mapping(mut root) = value else {
            return Err(Diagnostic::error("template root must be a mapping")
                .with_code(ErrorCode::E101)
                .into());
        };

        let resources = match root.remove(RESOURCES_KEY) {
            Some(Value::Mapping(resources)) => resources,
            Some(_) => {
                return Err(Diagnostic::error("`Resources` must be a mapping")
                    .with_code(ErrorCode::E101)
                    .into());
            }
            None => {
                return Err(Diagnostic::error("template has no `Resources` section")
                    .with_code(ErrorCode::E100)
                    .with_help("declare resources under a top-level `Resources:` key")
                    .into());
            }
        };

        Ok(Self {
            resources: collect_resources(resources)?,
            path,
        })
    }

    /// Returns the path the document was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the directory nested template locations are relative to.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    /// Returns the resources in declaration order.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Consume the document, yielding its resources in declaration order.
    pub fn into_resources(self) -> impl Iterator<Item = Resource> {
        self.resources.into_values()
    }
}

/// Collects every entry, reporting all malformed entries together.
fn collect_resources(resources: Mapping) -> Result<IndexMap<String, Resource>> {
    let mut collected = IndexMap::with_capacity(resources.len());
    let mut diagnostics = Vec::new();

    for (key, entry) in resources {
        let resource = logical_id_of(&key)
            .and_then(|logical_id| Resource::from_entry(logical_id, entry));
        match resource {
            Ok(resource) => {
                collected.insert(resource.logical_id().to_string(), resource);
            }
            Err(err) => diagnostics.extend(err.into_diagnostics()),
        }
    }

    if diagnostics.is_empty() {
        Ok(collected)
    } else {
        Err(ParseError::from(diagnostics))
    }
}

fn logical_id_of(key: &Value) -> Result<String> {
    match key {
        Value::String(id) => Ok(id.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        _ => Err(Diagnostic::error("resource logical ids must be scalars")
            .with_code(ErrorCode::E101)
            .into()),
    }
}
