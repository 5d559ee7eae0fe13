//! Link discovery.
//!
//! A link is a `Ref` to another logical id. [`discover`] collects them from
//! a resource entry, looking only at mapping values: references inside
//! sequences or inside the arguments of other functions are not links.

use indexmap::IndexSet;
use log::trace;
use serde_yaml::{Mapping, Value};

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    intrinsic::Intrinsic,
};

/// Collect the logical ids referenced with `Ref` below `value`.
///
/// The result is deduplicated and in first-seen order.
///
/// # Errors
///
/// Returns [`ErrorCode::E101`] if `value` is not a mapping.
///
/// # Examples
///
/// ```
/// # use stackgraph_parser::{IntrinsicResolver, discover};
/// let entry: serde_yaml::Value = serde_yaml::from_str(
///     "Properties: {Bucket: !Ref Logs, Policy: {Target: !Ref Logs}}",
/// )
/// .unwrap();
/// let entry = IntrinsicResolver::new().resolve(entry);
///
/// assert_eq!(discover(&entry).unwrap(), vec!["Logs".to_string()]);
/// ```
pub fn discover(value: &Value) -> Result<Vec<String>> {
    let Value::Mapping(mapping) = value else {
        return Err(Diagnostic::error("links can only be discovered in a mapping")
            .with_code(ErrorCode::E101)
            .into());
    };

    let mut found = IndexSet::new();
    walk(mapping, &mut found);
    Ok(found.into_iter().collect())
}

fn walk(mapping: &Mapping, found: &mut IndexSet<String>) {
    for value in mapping.values() {
        if let Some(intrinsic) = Intrinsic::from_value(value) {
            if let Some(reference) = intrinsic.reference() {
                trace!(reference; "Found reference");
                found.insert(reference.to_string());
            }
            continue;
        }
        if let Value::Mapping(inner) = value {
            walk(inner, found);
        }
    }
}
