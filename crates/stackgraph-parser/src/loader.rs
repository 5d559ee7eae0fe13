//! Template file loading.
//!
//! [`TemplateLoader`] reads a template, parses the first YAML document of
//! the stream and rewrites intrinsics into canonical form with its
//! [`IntrinsicResolver`]. It does not look at the template structure;
//! [`Template::into_document`] does.

use std::{fs, path::Path};

use log::{debug, info, trace};
use serde::Deserialize;
use serde_yaml::Value;

use crate::{
    error::{Diagnostic, ErrorCode, ParseError, Result},
    intrinsic::IntrinsicResolver,
    span::Span,
    template::Template,
};

/// Loads template files into [`Template`]s.
#[derive(Debug, Clone, Default)]
pub struct TemplateLoader {
    resolver: IntrinsicResolver,
}

impl TemplateLoader {
    /// Create a loader with the default intrinsic resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader sharing an existing resolver.
    pub fn with_resolver(resolver: IntrinsicResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &IntrinsicResolver {
        &self.resolver
    }

    /// Read and parse the template at `path`.
    ///
    /// # Errors
    ///
    /// - [`ErrorCode::E001`] if the file is missing or unreadable
    /// - [`ErrorCode::E002`] if it is not well-formed YAML
    /// - [`ErrorCode::E003`] if it holds no document
    ///
    /// Every error carries `path`, and the source text once it was read.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Template> {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading template");

        let source = fs::read_to_string(path).map_err(|err| {
            ParseError::from(
                Diagnostic::error(format!(
                    "cannot read template `{}`: {err}",
                    path.display()
                ))
                .with_code(ErrorCode::E001),
            )
            .with_path(path)
        })?;

        self.load_str(&source, path)
    }

    /// Parse template `source` as if it had been read from `path`.
    pub fn load_str(&self, source: &str, path: impl AsRef<Path>) -> Result<Template> {
        let path = path.as_ref();

        let value = self
            .parse_value(source)
            .map_err(|err| err.with_origin(path, source))?;

        debug!(path = path.display().to_string(); "Template loaded");
        Ok(Template::new(path, source, value))
    }

    /// Parse the first YAML document of `source` and resolve its intrinsics.
    ///
    /// Later documents in a multi-document stream are ignored.
    pub fn parse_value(&self, source: &str) -> Result<Value> {
        if is_blank(source) {
            return Err(empty_template());
        }
        let Some(first) = serde_yaml::Deserializer::from_str(source).next() else {
            return Err(empty_template());
        };

        let value = Value::deserialize(first).map_err(|err| yaml_error(&err, source))?;
        if value.is_null() {
            return Err(empty_template());
        }
        trace!(value:?; "Parsed template");

        Ok(self.resolver.resolve(value))
    }
}

/// Returns `true` if `source` holds nothing but comments and document markers.
fn is_blank(source: &str) -> bool {
    source.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

fn empty_template() -> ParseError {
    Diagnostic::error("template is empty")
        .with_code(ErrorCode::E003)
        .with_help("a template needs at least a `Resources` section")
        .into()
}

fn yaml_error(err: &serde_yaml::Error, source: &str) -> ParseError {
    let mut diagnostic = Diagnostic::error(format!("invalid YAML: {err}")).with_code(ErrorCode::E002);
    if let Some(location) = err.location() {
        diagnostic = diagnostic.with_label(Span::at(location.index(), source), "here");
    }
    diagnostic.into()
}
