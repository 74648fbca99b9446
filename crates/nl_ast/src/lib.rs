//! ECMAScript AST for nslocal.
//!
//! Re-exports the standard SWC AST and adds typed views of the nodes the
//! namespace-localizing transform cares about:
//! - `Namespace.member` accesses
//! - `const { ... } = Namespace;` declarations
//! - where a new declaration goes

pub use swc_ecma_ast::*;

use serde::{Deserialize, Serialize};
use swc_common::Span;

/// Namespace localized when no configuration says otherwise.
pub const DEFAULT_NAMESPACE: &str = "Ember";

/// Order of the properties in the emitted destructuring declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberOrder {
    /// Sorted by code point.
    #[default]
    Lexicographic,
    /// Order of first appearance in the file, existing bindings first.
    FirstSeen,
}

impl std::fmt::Display for MemberOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberOrder::Lexicographic => write!(f, "lexicographic"),
            MemberOrder::FirstSeen => write!(f, "first-seen"),
        }
    }
}

impl std::str::FromStr for MemberOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lexicographic" => Ok(MemberOrder::Lexicographic),
            "first-seen" | "firstSeen" => Ok(MemberOrder::FirstSeen),
            other => Err(format!(
                "unknown member order `{other}` (expected `lexicographic` or `first-seen`)"
            )),
        }
    }
}

/// Settings for one run of the transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocalizeConfig {
    /// Identifier whose members are localized, compared case-sensitively.
    pub namespace: String,
    pub order: MemberOrder,
}

impl Default for LocalizeConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            order: MemberOrder::default(),
        }
    }
}

impl LocalizeConfig {
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }
}

/// A `Namespace.member` access found in the module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceMember {
    pub span: Span,
    /// The `member` part.
    pub name: String,
}

/// A top-level `const { ... } = Namespace;` statement, or its `let`/`var`
/// or `export`ed form.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDestructuring {
    /// Position in `Module::body`.
    pub index: usize,
    pub span: Span,
    pub kind: VarDeclKind,
    /// Wrapped in `export`.
    pub exported: bool,
    /// Properties of the object pattern, as written.
    pub props: Vec<ObjectPatProp>,
    /// TypeScript annotation on the pattern, `{ get }: any`.
    pub type_ann: Option<Box<TsTypeAnn>>,
}

/// Where the rebuilt destructuring declaration lands in `Module::body`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPoint {
    /// Overwrite the existing declaration at this index.
    Replace(usize),
    /// Insert right after the import declaration at this index.
    AfterImport(usize),
    /// No imports: insert at this index, which follows any directive prologue.
    Top(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_targets_ember() {
        let c = LocalizeConfig::default();
        assert_eq!(c.namespace, "Ember");
        assert_eq!(c.order, MemberOrder::Lexicographic);
    }

    #[test]
    fn config_deserializes_partial_json() {
        let c: LocalizeConfig = serde_json::from_str(r#"{"order": "firstSeen"}"#).unwrap();
        assert_eq!(c.namespace, "Ember");
        assert_eq!(c.order, MemberOrder::FirstSeen);

        let c: LocalizeConfig = serde_json::from_str(r#"{"namespace": "DS"}"#).unwrap();
        assert_eq!(c, LocalizeConfig::with_namespace("DS"));
    }

    #[test]
    fn member_order_parses_cli_spelling() {
        assert_eq!("first-seen".parse::<MemberOrder>(), Ok(MemberOrder::FirstSeen));
        assert_eq!("lexicographic".parse::<MemberOrder>(), Ok(MemberOrder::Lexicographic));
        assert!("alphabetical".parse::<MemberOrder>().is_err());
        assert_eq!(MemberOrder::FirstSeen.to_string(), "first-seen");
    }
}
