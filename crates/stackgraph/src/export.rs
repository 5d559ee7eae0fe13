pub mod dot;

use std::{fmt, str::FromStr};

use stackgraph_core::graph::ResourceGraph;

// A single Exporter trait shared by every output backend
pub trait Exporter {
    /// Render `graph` titled `name` into the bytes of an output file.
    fn export_graph(&self, graph: &ResourceGraph, name: &str) -> Result<Vec<u8>, Error>;
}

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
        }
    }
}

/// File format of a rendered diagram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Graphviz source, produced without the `dot` executable.
    Dot,
    Svg,
    #[default]
    Png,
    Pdf,
    Jpg,
}

impl OutputFormat {
    /// All formats, in declaration order.
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Dot,
        OutputFormat::Svg,
        OutputFormat::Png,
        OutputFormat::Pdf,
        OutputFormat::Jpg,
    ];

    /// Returns the file extension written for this format.
    pub fn extension(self) -> &'static str {
        self.into()
    }

    /// Returns `true` if rendering needs the Graphviz `dot` executable.
    pub fn needs_graphviz(self) -> bool {
        self != OutputFormat::Dot
    }
}

impl FromStr for OutputFormat {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_ascii_lowercase();
        match s.as_str() {
            "jpeg" => Ok(OutputFormat::Jpg),
            "gv" => Ok(OutputFormat::Dot),
            _ => OutputFormat::ALL
                .into_iter()
                .find(|format| format.extension() == s)
                .ok_or("Unsupported output format"),
        }
    }
}

impl From<OutputFormat> for &'static str {
    fn from(val: OutputFormat) -> Self {
        match val {
            OutputFormat::Dot => "dot",
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Jpg => "jpg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("dot".parse(), Ok(OutputFormat::Dot));
        assert_eq!("SVG".parse(), Ok(OutputFormat::Svg));
        assert_eq!("Png".parse(), Ok(OutputFormat::Png));
        assert_eq!("pdf".parse(), Ok(OutputFormat::Pdf));
        assert_eq!("jpeg".parse(), Ok(OutputFormat::Jpg));
        assert!("bmp".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_default_is_png() {
        assert_eq!(OutputFormat::default(), OutputFormat::Png);
        assert!(OutputFormat::Png.needs_graphviz());
        assert!(!OutputFormat::Dot.needs_graphviz());
    }

    #[test]
    fn test_output_format_display_matches_extension() {
        for format in OutputFormat::ALL {
            assert_eq!(format.to_string(), format.extension());
        }
    }
}
