//! Error codes for the Stackgraph diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Loading errors (file access and YAML syntax)
//! - `E1xx` - Structural errors (template shape and nested stack expansion)

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Loading Errors (E0xx)
    // =========================================================================
    /// Template file missing or unreadable.
    ///
    /// Also raised for a nested stack whose `TemplateURL` does not point at
    /// a readable file.
    E001,

    /// Malformed YAML.
    ///
    /// The template is not well-formed YAML.
    E002,

    /// Empty template.
    ///
    /// The file contains no YAML document.
    E003,

    // =========================================================================
    // Structural Errors (E1xx)
    // =========================================================================
    /// Missing `Resources` section.
    ///
    /// Every template must declare its resources under a top-level
    /// `Resources` key.
    E100,

    /// Expected a mapping.
    ///
    /// The template root, the `Resources` section and every resource entry
    /// must be mappings.
    E101,

    /// Missing resource type.
    ///
    /// A resource entry has no `Type`, or its `Type` is not a string.
    E102,

    /// Missing nested template location.
    ///
    /// A nested stack resource has no string `Properties.TemplateURL`.
    E103,

    /// Cyclic nested stack.
    ///
    /// A nested stack points back at a template that is already being
    /// expanded.
    E104,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "template file unreadable",
            ErrorCode::E002 => "malformed yaml",
            ErrorCode::E003 => "empty template",
            ErrorCode::E100 => "missing resources section",
            ErrorCode::E101 => "expected a mapping",
            ErrorCode::E102 => "missing resource type",
            ErrorCode::E103 => "missing nested template location",
            ErrorCode::E104 => "cyclic nested stack",
        }
    }

    /// Returns `true` for errors about the template's shape rather than its
    /// file or syntax.
    pub fn is_structural(&self) -> bool {
        self.as_str().starts_with("E1")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
