//! Finding and rewriting `Namespace.member` accesses.
//!
//! `Ember.computed(...)` → `computed(...)`
//!
//! Only reads are rewritten. Assignment targets (`Ember.x = 1`), pattern
//! targets (`[Ember.x] = arr`, `for (Ember.x of arr)`), update operands
//! (`Ember.x++`) and `delete Ember.x` would turn into writes to a `const`
//! binding, so they stay qualified and are not counted.

use std::collections::HashSet;

use nl_ast::{MemberOrder, NamespaceMember};
use swc_ecma_ast::{
    AssignExpr, AssignTarget, Expr, Ident, IdentName, MemberExpr, MemberProp, Module, Pat,
    SimpleAssignTarget, UnaryExpr, UnaryOp, UpdateExpr,
};
use swc_ecma_visit::{Visit, VisitMut, VisitMutWith, VisitWith};

/// The property of `member` if it reads `namespace.<ident>`.
pub fn namespace_property<'a>(member: &'a MemberExpr, namespace: &str) -> Option<&'a IdentName> {
    let Expr::Ident(obj) = member.obj.as_ref() else {
        return None;
    };
    if &*obj.sym != namespace {
        return None;
    }
    match &member.prop {
        MemberProp::Ident(prop) => Some(prop),
        _ => None,
    }
}

fn namespace_access<'a>(expr: &'a Expr, namespace: &str) -> Option<(&'a MemberExpr, &'a IdentName)> {
    match expr {
        Expr::Member(member) => namespace_property(member, namespace).map(|prop| (member, prop)),
        _ => None,
    }
}

/// Read-only query for every matched access, in source order.
pub struct MemberCollector<'a> {
    namespace: &'a str,
    members: Vec<NamespaceMember>,
}

impl<'a> MemberCollector<'a> {
    pub fn new(namespace: &'a str) -> Self {
        Self {
            namespace,
            members: Vec::new(),
        }
    }

    pub fn into_members(self) -> Vec<NamespaceMember> {
        self.members
    }

    fn skip_write(&self, member: &MemberExpr) {
        if let Some(prop) = namespace_property(member, self.namespace) {
            tracing::warn!(
                "leaving `{}.{}` qualified: it is written to, not read",
                self.namespace,
                prop.sym
            );
        }
    }
}

impl Visit for MemberCollector<'_> {
    fn visit_expr(&mut self, node: &Expr) {
        if let Some((member, prop)) = namespace_access(node, self.namespace) {
            self.members.push(NamespaceMember {
                span: member.span,
                name: prop.sym.to_string(),
            });
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_assign_expr(&mut self, node: &AssignExpr) {
        if let AssignTarget::Simple(SimpleAssignTarget::Member(member)) = &node.left {
            self.skip_write(member);
        }
        node.visit_children_with(self);
    }

    fn visit_pat(&mut self, node: &Pat) {
        if let Pat::Expr(expr) = node {
            if let Some((member, _)) = namespace_access(expr, self.namespace) {
                self.skip_write(member);
                return;
            }
        }
        node.visit_children_with(self);
    }

    fn visit_update_expr(&mut self, node: &UpdateExpr) {
        if let Some((member, _)) = namespace_access(&node.arg, self.namespace) {
            self.skip_write(member);
            return;
        }
        node.visit_children_with(self);
    }

    fn visit_unary_expr(&mut self, node: &UnaryExpr) {
        if node.op == UnaryOp::Delete {
            if let Some((member, _)) = namespace_access(&node.arg, self.namespace) {
                self.skip_write(member);
                return;
            }
        }
        node.visit_children_with(self);
    }
}

/// Visitor that replaces each matched access with a bare identifier.
///
/// Matches exactly what `MemberCollector` reports: the check runs before
/// descending, so `Ember.Ember.x` only has its inner access rewritten.
pub struct MemberRewriter<'a> {
    namespace: &'a str,
    rewritten: usize,
}

impl<'a> MemberRewriter<'a> {
    pub fn new(namespace: &'a str) -> Self {
        Self {
            namespace,
            rewritten: 0,
        }
    }

    pub fn rewritten(&self) -> usize {
        self.rewritten
    }
}

impl VisitMut for MemberRewriter<'_> {
    fn visit_mut_expr(&mut self, node: &mut Expr) {
        let local = namespace_access(node, self.namespace)
            .map(|(member, prop)| Ident::new_no_ctxt(prop.sym.clone(), member.span));

        match local {
            Some(ident) => {
                *node = Expr::Ident(ident);
                self.rewritten += 1;
            }
            None => node.visit_mut_children_with(self),
        }
    }

    fn visit_mut_pat(&mut self, node: &mut Pat) {
        if let Pat::Expr(expr) = node {
            if namespace_access(expr, self.namespace).is_some() {
                return;
            }
        }
        node.visit_mut_children_with(self);
    }

    fn visit_mut_update_expr(&mut self, node: &mut UpdateExpr) {
        if namespace_access(&node.arg, self.namespace).is_some() {
            return;
        }
        node.visit_mut_children_with(self);
    }

    fn visit_mut_unary_expr(&mut self, node: &mut UnaryExpr) {
        if node.op == UnaryOp::Delete && namespace_access(&node.arg, self.namespace).is_some() {
            return;
        }
        node.visit_mut_children_with(self);
    }
}

/// Every `namespace.<ident>` read in the module, in source order.
pub fn collect_namespace_members(module: &Module, namespace: &str) -> Vec<NamespaceMember> {
    let mut collector = MemberCollector::new(namespace);
    module.visit_with(&mut collector);
    collector.into_members()
}

/// Rewrite every `namespace.<ident>` read in place. Returns how many were rewritten.
pub fn rewrite_namespace_members(module: &mut Module, namespace: &str) -> usize {
    let mut rewriter = MemberRewriter::new(namespace);
    module.visit_mut_with(&mut rewriter);
    rewriter.rewritten()
}

/// Deduplicate `names`, keeping first occurrences, then apply `order`.
pub fn order_names<I>(names: I, order: MemberOrder) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut unique: Vec<String> = names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect();

    if order == MemberOrder::Lexicographic {
        unique.sort();
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use nl_parser::parse_source;

    fn names(src: &str, namespace: &str) -> Vec<String> {
        let parsed = parse_source(src, "test.js").unwrap();
        collect_namespace_members(&parsed.module, namespace)
            .into_iter()
            .map(|m| m.name)
            .collect()
    }

    #[test]
    fn collects_in_source_order_with_repeats() {
        let src = "Ember.run(); Ember.get(a, 'b'); Ember.run.later();";
        assert_eq!(names(src, "Ember"), ["run", "get", "run"]);
    }

    #[test]
    fn ignores_other_objects_and_computed_props() {
        let src = "ember.get(); this.Ember.get(); Ember['set'](); Ember?.run(); foo().Ember;";
        assert!(names(src, "Ember").is_empty());
    }

    #[test]
    fn nested_namespace_matches_innermost_only() {
        assert_eq!(names("Ember.String.camelize(x);", "Ember"), ["String"]);
        assert_eq!(names("Ember.Ember.x;", "Ember"), ["Ember"]);
    }

    #[test]
    fn write_positions_are_not_collected() {
        let src = "Ember.testing = true; Ember.count++; delete Ember.cache; Ember.x += 1;";
        assert!(names(src, "Ember").is_empty());
    }

    #[test]
    fn pattern_targets_are_not_collected() {
        let src = "[Ember.x] = arr; ({ a: Ember.y, ...Ember.z } = obj); for (Ember.w of arr) {}";
        assert!(names(src, "Ember").is_empty());
    }

    #[test]
    fn pattern_targets_stay_qualified_while_defaults_are_read() {
        let src = "[Ember.x = Ember.K] = arr; for (Ember.w of Ember.A(list)) {}";
        assert_eq!(names(src, "Ember"), ["K", "A"]);

        let mut parsed = parse_source(src, "test.js").unwrap();
        assert_eq!(rewrite_namespace_members(&mut parsed.module, "Ember"), 2);
        let out: String = parsed.print().unwrap().split_whitespace().collect();
        assert!(out.contains("[Ember.x=K]=arr;"));
        assert!(out.contains("for(Ember.wofA(list))"));
    }

    #[test]
    fn reads_inside_assignments_are_collected() {
        let src = "window.testing = Ember.testing; Ember.x = Ember.y;";
        assert_eq!(names(src, "Ember"), ["testing", "y"]);
    }

    #[test]
    fn namespace_is_configurable() {
        let src = "DS.attr('string'); Ember.get();";
        assert_eq!(names(src, "DS"), ["attr"]);
    }

    #[test]
    fn rewriter_counts_match_collector() {
        let src = "Ember.run(Ember.get, Ember.get); Ember.testing = Ember.K;";
        let mut parsed = parse_source(src, "test.js").unwrap();
        let found = collect_namespace_members(&parsed.module, "Ember").len();
        let rewritten = rewrite_namespace_members(&mut parsed.module, "Ember");
        assert_eq!(found, 4);
        assert_eq!(rewritten, found);
        assert!(collect_namespace_members(&parsed.module, "Ember").is_empty());
    }

    #[test]
    fn order_names_dedups_then_sorts() {
        let input = ["set", "computed", "get", "set", "Component"].map(String::from);
        assert_eq!(
            order_names(input.clone(), MemberOrder::Lexicographic),
            ["Component", "computed", "get", "set"]
        );
        assert_eq!(
            order_names(input, MemberOrder::FirstSeen),
            ["set", "computed", "get", "Component"]
        );
    }
}
