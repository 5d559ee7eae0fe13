//! Intrinsic function recognition.
//!
//! Templates embed expressions in place of plain values. The same expression
//! can be written two ways:
//!
//! ```yaml
//! BucketName: !Ref LogicalBucket          # short-form tag
//! BucketName: { Fn::Ref: LogicalBucket }  # long-form single-key mapping
//! ```
//!
//! [`IntrinsicResolver::resolve`] rewrites both into one canonical
//! value: a YAML tagged value whose tag is the bare function name
//! (`!Ref`) and whose content is the unevaluated argument.
//! [`Intrinsic::from_value`] then reads such a value back as an
//! [`Intrinsic`]. Nothing is evaluated: `!Sub` strings keep their `${}`
//! placeholders and `!If` keeps both branches.
//!
//! Tags outside the recognized set are treated as opaque vendor data: the
//! tag is dropped and its content is kept as an ordinary value. Strings are
//! always data, even when they read like `Fn::Ref Bucket`.

use std::{collections::HashMap, fmt};

use log::trace;
use serde_yaml::{
    Mapping, Value,
    value::{Tag, TaggedValue},
};

/// The closed set of recognized intrinsic functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntrinsicFunction {
    Ref,
    Sub,
    GetAtt,
    Base64,
    Cidr,
    If,
    And,
    Or,
    Equals,
    FindInMap,
    GetAZs,
    ImportValue,
    Join,
    Select,
    Split,
    Transform,
    Not,
}

impl IntrinsicFunction {
    /// All recognized functions.
    pub const ALL: [IntrinsicFunction; 17] = [
        IntrinsicFunction::Ref,
        IntrinsicFunction::Sub,
        IntrinsicFunction::GetAtt,
        IntrinsicFunction::Base64,
        IntrinsicFunction::Cidr,
        IntrinsicFunction::If,
        IntrinsicFunction::And,
        IntrinsicFunction::Or,
        IntrinsicFunction::Equals,
        IntrinsicFunction::FindInMap,
        IntrinsicFunction::GetAZs,
        IntrinsicFunction::ImportValue,
        IntrinsicFunction::Join,
        IntrinsicFunction::Select,
        IntrinsicFunction::Split,
        IntrinsicFunction::Transform,
        IntrinsicFunction::Not,
    ];

    /// Returns the bare function name, e.g. `GetAtt`.
    pub fn name(self) -> &'static str {
        match self {
            IntrinsicFunction::Ref => "Ref",
            IntrinsicFunction::Sub => "Sub",
            IntrinsicFunction::GetAtt => "GetAtt",
            IntrinsicFunction::Base64 => "Base64",
            IntrinsicFunction::Cidr => "Cidr",
            IntrinsicFunction::If => "If",
            IntrinsicFunction::And => "And",
            IntrinsicFunction::Or => "Or",
            IntrinsicFunction::Equals => "Equals",
            IntrinsicFunction::FindInMap => "FindInMap",
            IntrinsicFunction::GetAZs => "GetAZs",
            IntrinsicFunction::ImportValue => "ImportValue",
            IntrinsicFunction::Join => "Join",
            IntrinsicFunction::Select => "Select",
            IntrinsicFunction::Split => "Split",
            IntrinsicFunction::Transform => "Transform",
            IntrinsicFunction::Not => "Not",
        }
    }

    /// Returns the fully qualified name, e.g. `Fn::GetAtt`.
    pub fn qualified_name(self) -> String {
        format!("Fn::{}", self.name())
    }

    /// Parse a function from any of its spellings: `Ref`, `!Ref`, `Fn::Ref`
    /// or `!Fn::Ref`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix('!').unwrap_or(name);
        let name = name.strip_prefix("Fn::").unwrap_or(name);
        Self::ALL.into_iter().find(|function| function.name() == name)
    }

    fn from_tag(tag: &Tag) -> Option<Self> {
        Self::from_name(&tag.to_string())
    }
}

impl fmt::Display for IntrinsicFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An unevaluated intrinsic function call.
///
/// `raw_argument` is the argument as written: scalars verbatim, sequences
/// and mappings in compact flow form. `source_text` is the call in
/// short-form syntax, so every spelling of the same call yields an equal
/// value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intrinsic {
    function: IntrinsicFunction,
    raw_argument: String,
    source_text: String,
}

impl Intrinsic {
    pub fn new(function: IntrinsicFunction, raw_argument: impl Into<String>) -> Self {
        let raw_argument = raw_argument.into();
        let source_text = if raw_argument.is_empty() {
            format!("!{}", function.name())
        } else {
            format!("!{} {}", function.name(), raw_argument)
        };
        Self {
            function,
            raw_argument,
            source_text,
        }
    }

    /// Read a tagged value as an intrinsic.
    ///
    /// Returns `None` for untagged values and for tags outside the
    /// recognized set.
    pub fn from_value(value: &Value) -> Option<Self> {
        let Value::Tagged(tagged) = value else {
            return None;
        };
        let function = IntrinsicFunction::from_tag(&tagged.tag)?;
        Some(Self::new(function, render_argument(&tagged.value)))
    }

    pub fn function(&self) -> IntrinsicFunction {
        self.function
    }

    pub fn raw_argument(&self) -> &str {
        &self.raw_argument
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Returns the referenced logical id if this is a `Ref`.
    pub fn reference(&self) -> Option<&str> {
        match self.function {
            IntrinsicFunction::Ref => Some(&self.raw_argument),
            _ => None,
        }
    }
}

impl fmt::Display for Intrinsic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source_text)
    }
}

/// Rewrites parsed template values into canonical intrinsic form.
///
/// The recognition tables are built once in [`IntrinsicResolver::new`]; a
/// resolver is then shared by every load of a template hierarchy.
#[derive(Debug, Clone)]
pub struct IntrinsicResolver {
    /// Tag names (without `!`): `Ref`, `Fn::Ref`, `Sub`, `Fn::Sub`, ...
    tags: HashMap<String, IntrinsicFunction>,
    /// Long-form mapping keys: `Ref` and `Fn::<Name>`.
    keys: HashMap<String, IntrinsicFunction>,
}

impl IntrinsicResolver {
    pub fn new() -> Self {
        let mut tags = HashMap::new();
        let mut keys = HashMap::new();
        for function in IntrinsicFunction::ALL {
            tags.insert(function.name().to_string(), function);
            tags.insert(function.qualified_name(), function);
            keys.insert(function.qualified_name(), function);
        }
        keys.insert(IntrinsicFunction::Ref.name().to_string(), IntrinsicFunction::Ref);

        Self { tags, keys }
    }

    /// Rewrite `value` and everything below it into canonical form.
    pub fn resolve(&self, value: Value) -> Value {
        match value {
            Value::Tagged(tagged) => {
                let TaggedValue { tag, value } = *tagged;
                let content = self.resolve(value);
                match self.tag_function(&tag) {
                    Some(function) => canonical(function, content),
                    None => {
                        trace!(tag = tag.to_string(); "Dropping unrecognized tag");
                        content
                    }
                }
            }
            Value::Mapping(mapping) => {
                let function = single_key(&mapping).and_then(|key| self.keys.get(key).copied());
                match function {
                    Some(function) => {
                        let argument = mapping
                            .into_iter()
                            .next()
                            .map_or(Value::Null, |(_, argument)| argument);
                        canonical(function, self.resolve(argument))
                    }
                    None => Value::Mapping(
                        mapping
                            .into_iter()
                            .map(|(key, value)| (key, self.resolve(value)))
                            .collect(),
                    ),
                }
            }
            Value::Sequence(sequence) => Value::Sequence(
                sequence
                    .into_iter()
                    .map(|value| self.resolve(value))
                    .collect(),
            ),
            other => other,
        }
    }

    fn tag_function(&self, tag: &Tag) -> Option<IntrinsicFunction> {
        let tag = tag.to_string();
        self.tags
            .get(tag.strip_prefix('!').unwrap_or(&tag))
            .copied()
    }
}

impl Default for IntrinsicResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn canonical(function: IntrinsicFunction, argument: Value) -> Value {
    Value::Tagged(Box::new(TaggedValue {
        tag: Tag::new(function.name()),
        value: argument,
    }))
}

fn single_key(mapping: &Mapping) -> Option<&str> {
    if mapping.len() != 1 {
        return None;
    }
    mapping.keys().next().and_then(Value::as_str)
}

/// Render an argument in compact flow form. Top-level strings are kept
/// verbatim; nested strings are quoted when they would not read back as
/// the same scalar.
fn render_argument(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => {
            let mut out = String::new();
            render_flow(other, &mut out);
            out
        }
    }
}

fn render_flow(value: &Value, out: &mut String) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => out.push_str(&flag.to_string()),
        Value::Number(number) => out.push_str(&number.to_string()),
        Value::String(text) => {
            if needs_quotes(text) {
                out.push_str(&format!("{text:?}"));
            } else {
                out.push_str(text);
            }
        }
        Value::Sequence(sequence) => {
            out.push('[');
            for (idx, item) in sequence.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                render_flow(item, out);
            }
            out.push(']');
        }
        Value::Mapping(mapping) => {
            out.push('{');
            for (idx, (key, item)) in mapping.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                render_flow(key, out);
                out.push_str(": ");
                render_flow(item, out);
            }
            out.push('}');
        }
        Value::Tagged(tagged) => {
            out.push_str(&tagged.tag.to_string());
            if !matches!(tagged.value, Value::Null) {
                out.push(' ');
                render_flow(&tagged.value, out);
            }
        }
    }
}

fn needs_quotes(text: &str) -> bool {
    text.is_empty()
        || text.trim() != text
        || text
            .chars()
            .any(|c| matches!(c, ',' | '[' | ']' | '{' | '}' | ':' | '#' | '"' | '\''))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(source: &str) -> Value {
        let value: Value = serde_yaml::from_str(source).unwrap();
        IntrinsicResolver::new().resolve(value)
    }

    fn intrinsic(source: &str) -> Intrinsic {
        Intrinsic::from_value(&resolve(source)).unwrap()
    }

    #[test]
    fn test_short_and_long_ref_are_identical() {
        let short = intrinsic("!Ref LogicalBucket");
        let qualified = intrinsic("Fn::Ref: LogicalBucket");
        let bare = intrinsic("Ref: LogicalBucket");

        assert_eq!(short, qualified);
        assert_eq!(short, bare);
        assert_eq!(short.function(), IntrinsicFunction::Ref);
        assert_eq!(short.raw_argument(), "LogicalBucket");
        assert_eq!(short.source_text(), "!Ref LogicalBucket");
        assert_eq!(short.reference(), Some("LogicalBucket"));
    }

    #[test]
    fn test_qualified_tag_resolves_to_bare_name() {
        assert_eq!(intrinsic("!Fn::Ref Queue"), intrinsic("!Ref Queue"));
    }

    #[test]
    fn test_every_function_has_short_and_long_form() {
        for function in IntrinsicFunction::ALL {
            let short = intrinsic(&format!("!{} arg", function.name()));
            let long = intrinsic(&format!("{}: arg", function.qualified_name()));
            assert_eq!(short, long, "{function}");
            assert_eq!(short.function(), function);
        }
    }

    #[test]
    fn test_sub_is_not_evaluated() {
        let sub = intrinsic(r#"!Sub "${AWS::StackName}-${Env}""#);

        assert_eq!(sub.function(), IntrinsicFunction::Sub);
        assert_eq!(sub.raw_argument(), "${AWS::StackName}-${Env}");
        assert_eq!(sub.reference(), None);
    }

    #[test]
    fn test_sequence_argument_is_rendered_in_flow_form() {
        let get_att = intrinsic("Fn::GetAtt: [Bucket, Arn]");
        assert_eq!(get_att.raw_argument(), "[Bucket, Arn]");
        assert_eq!(get_att.source_text(), "!GetAtt [Bucket, Arn]");

        let join = intrinsic(r#"!Join [",", [!Ref A, b]]"#);
        assert_eq!(join.raw_argument(), r#"[",", [!Ref A, b]]"#);
    }

    #[test]
    fn test_nested_intrinsics_are_canonical() {
        let value = resolve("!If [IsProd, {Fn::Ref: ProdBucket}, !Ref DevBucket]");
        let Value::Tagged(tagged) = &value else {
            panic!("expected a tagged value");
        };
        let Value::Sequence(branches) = &tagged.value else {
            panic!("expected a sequence argument");
        };

        assert_eq!(
            Intrinsic::from_value(&branches[1]).unwrap().reference(),
            Some("ProdBucket")
        );
        assert_eq!(
            Intrinsic::from_value(&branches[2]).unwrap().reference(),
            Some("DevBucket")
        );
    }

    #[test]
    fn test_strings_that_look_like_calls_stay_strings() {
        assert_eq!(resolve("Fn::Ref Bucket"), Value::String("Fn::Ref Bucket".into()));
        assert_eq!(resolve("\"Fn::Sub x\""), Value::String("Fn::Sub x".into()));
        assert_eq!(resolve("Fn::Ref"), Value::String("Fn::Ref".into()));
        assert_eq!(resolve("Fn::Unknown x"), Value::String("Fn::Unknown x".into()));
        assert_eq!(resolve("Ref Bucket"), Value::String("Ref Bucket".into()));
    }

    #[test]
    fn test_unknown_tag_is_dropped() {
        let value = resolve("!VendorThing {Key: !Ref Queue}");

        let Value::Mapping(mapping) = &value else {
            panic!("expected the tag content to be kept as a mapping");
        };
        let key = mapping.get("Key").unwrap();
        assert_eq!(Intrinsic::from_value(key).unwrap().reference(), Some("Queue"));
    }

    #[test]
    fn test_unknown_long_form_key_is_plain_data() {
        let value = resolve("Fn::Custom: x");
        assert!(Intrinsic::from_value(&value).is_none());
        assert!(matches!(value, Value::Mapping(_)));

        // Only single-key mappings are calls.
        let value = resolve("{Ref: A, Other: B}");
        assert!(Intrinsic::from_value(&value).is_none());

        // Bare names other than Ref are ordinary keys.
        let value = resolve("Join: x");
        assert!(Intrinsic::from_value(&value).is_none());
    }

    #[test]
    fn test_from_value_ignores_plain_values() {
        assert!(Intrinsic::from_value(&Value::String("Bucket".into())).is_none());
        assert!(Intrinsic::from_value(&Value::Null).is_none());
    }

    #[test]
    fn test_from_name_spellings() {
        assert_eq!(IntrinsicFunction::from_name("Ref"), Some(IntrinsicFunction::Ref));
        assert_eq!(IntrinsicFunction::from_name("!Ref"), Some(IntrinsicFunction::Ref));
        assert_eq!(
            IntrinsicFunction::from_name("Fn::GetAZs"),
            Some(IntrinsicFunction::GetAZs)
        );
        assert_eq!(
            IntrinsicFunction::from_name("!Fn::ImportValue"),
            Some(IntrinsicFunction::ImportValue)
        );
        assert_eq!(IntrinsicFunction::from_name("Condition"), None);
        assert_eq!(IntrinsicFunction::from_name("ref"), None);
    }

    #[test]
    fn test_empty_argument_source_text() {
        let azs = Intrinsic::new(IntrinsicFunction::GetAZs, "");
        assert_eq!(azs.source_text(), "!GetAZs");
        assert_eq!(azs.to_string(), "!GetAZs");
    }
}
