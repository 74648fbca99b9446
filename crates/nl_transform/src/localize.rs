//! Top-level transform entry points.
//!
//! Takes a parsed module, rewrites every `Namespace.member` read to a bare
//! `member`, and makes sure one `const { ... } = Namespace;` binds them all.

use nl_ast::{InsertionPoint, LocalizeConfig};
use nl_parser::{parse_source, ParseResult};

use crate::declaration::{
    build_declaration, check_declarations, destructuring_props, find_namespace_destructuring,
    insertion_point, place_declaration, shorthand_names,
};
use crate::error::TransformError;
use crate::members::{collect_namespace_members, order_names, rewrite_namespace_members};

/// What the transform did to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to localize. The caller should not touch the file.
    Unchanged,
    Rewritten(String),
}

impl Outcome {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Outcome::Unchanged)
    }

    /// The file's text after the transform.
    pub fn text_or<'a>(&'a self, original: &'a str) -> &'a str {
        match self {
            Outcome::Unchanged => original,
            Outcome::Rewritten(text) => text,
        }
    }
}

/// Summary of a module that was rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localized {
    /// Number of accesses replaced.
    pub accesses: usize,
    /// Names bound by the declaration, in emitted order.
    pub names: Vec<String>,
    pub placement: InsertionPoint,
}

/// Localize namespace members in an already parsed module.
///
/// Returns `Ok(None)` without touching the module when it has no
/// `Namespace.member` reads. On error the module is also untouched.
pub fn localize(
    parsed: &mut ParseResult,
    config: &LocalizeConfig,
) -> Result<Option<Localized>, TransformError> {
    let namespace = config.namespace.as_str();
    let module = &mut parsed.module;

    let members = collect_namespace_members(module, namespace);
    if members.is_empty() {
        tracing::debug!("no `{namespace}.*` reads, leaving module unchanged");
        return Ok(None);
    }

    if let Err(e) = check_declarations(&module.body, namespace) {
        let loc = parsed.source_map.lookup_char_pos(e.span.lo);
        return Err(TransformError::UnsupportedDeclaration {
            filename: loc.file.name.to_string(),
            line: loc.line,
            namespace: namespace.to_string(),
            declarators: e.declarators,
        });
    }

    let accesses = rewrite_namespace_members(module, namespace);

    // Looked up after the rewrite so kept properties carry rewritten defaults.
    let existing = find_namespace_destructuring(&module.body, namespace);
    let names = order_names(
        existing
            .iter()
            .flat_map(shorthand_names)
            .chain(members.into_iter().map(|m| m.name)),
        config.order,
    );
    let props = destructuring_props(&names, existing.as_ref());

    let placement = match &existing {
        Some(existing) => InsertionPoint::Replace(existing.index),
        None => insertion_point(&module.body),
    };
    tracing::debug!(
        "localized {accesses} `{namespace}.*` read(s) into {} binding(s) at {placement:?}",
        names.len()
    );

    let decl = build_declaration(namespace, props, existing.as_ref());
    place_declaration(&mut module.body, placement, decl);

    Ok(Some(Localized {
        accesses,
        names,
        placement,
    }))
}

/// Parse, localize and print one file.
pub fn localize_source(
    source: &str,
    filename: &str,
    config: &LocalizeConfig,
) -> Result<Outcome, TransformError> {
    let mut parsed = parse_source(source, filename)?;

    match localize(&mut parsed, config)? {
        Some(_) => Ok(Outcome::Rewritten(parsed.print()?)),
        None => Ok(Outcome::Unchanged),
    }
}
