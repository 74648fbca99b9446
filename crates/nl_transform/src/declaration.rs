//! The `const { a, b } = Namespace;` declaration: finding the existing one,
//! choosing where a new one goes, and building its replacement.
//!
//! An existing declaration may also be `let`/`var` or `export`ed. It is
//! replaced in place with its kind, `export` and type annotation kept.

use std::collections::HashSet;

use nl_ast::{InsertionPoint, NamespaceDestructuring};
use swc_common::{Span, SyntaxContext, DUMMY_SP};
use swc_ecma_ast::{
    AssignPatProp, Decl, ExportDecl, Expr, ExprStmt, Ident, Lit, ModuleDecl, ModuleItem, ObjectPat,
    ObjectPatProp, Pat, Stmt, VarDecl, VarDeclKind, VarDeclarator,
};

/// A namespace destructuring shares its statement with other declarators,
/// as in `const { get } = Ember, x = 1;`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultipleDeclarators {
    pub span: Span,
    pub declarators: usize,
}

fn is_namespace_destructuring(declarator: &VarDeclarator, namespace: &str) -> bool {
    if !matches!(declarator.name, Pat::Object(_)) {
        return false;
    }
    matches!(declarator.init.as_deref(), Some(Expr::Ident(init)) if &*init.sym == namespace)
}

/// A top-level variable statement, and whether it is `export`ed.
fn top_level_var(item: &ModuleItem) -> Option<(&VarDecl, bool)> {
    match item {
        ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => Some((var, false)),
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
            decl: Decl::Var(var),
            ..
        })) => Some((var, true)),
        _ => None,
    }
}

fn item_span(item: &ModuleItem) -> Span {
    match item {
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => export.span,
        ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => var.span,
        _ => DUMMY_SP,
    }
}

/// Reject any top-level variable statement that destructures `namespace`
/// alongside other declarators.
pub fn check_declarations(items: &[ModuleItem], namespace: &str) -> Result<(), MultipleDeclarators> {
    for (var, _) in items.iter().filter_map(top_level_var) {
        if var.decls.len() > 1
            && var
                .decls
                .iter()
                .any(|d| is_namespace_destructuring(d, namespace))
        {
            return Err(MultipleDeclarators {
                span: var.span,
                declarators: var.decls.len(),
            });
        }
    }
    Ok(())
}

/// The first top-level `{ ... } = namespace` declaration with a single
/// declarator.
pub fn find_namespace_destructuring(
    items: &[ModuleItem],
    namespace: &str,
) -> Option<NamespaceDestructuring> {
    items.iter().enumerate().find_map(|(index, item)| {
        let (var, exported) = top_level_var(item)?;
        let [declarator] = var.decls.as_slice() else {
            return None;
        };
        if !is_namespace_destructuring(declarator, namespace) {
            return None;
        }
        let Pat::Object(pat) = &declarator.name else {
            return None;
        };
        Some(NamespaceDestructuring {
            index,
            span: item_span(item),
            kind: var.kind,
            exported,
            props: pat.props.clone(),
            type_ann: pat.type_ann.clone(),
        })
    })
}

/// Names an existing declaration binds as plain shorthand (`{ get }`).
pub fn shorthand_names(existing: &NamespaceDestructuring) -> Vec<String> {
    existing
        .props
        .iter()
        .filter_map(|prop| match prop {
            ObjectPatProp::Assign(AssignPatProp { key, value: None, .. }) => {
                Some(key.id.sym.to_string())
            }
            _ => None,
        })
        .collect()
}

/// Where a fresh declaration goes when there is none to replace: after the
/// last import, or at the top of the file below any directive prologue.
pub fn insertion_point(items: &[ModuleItem]) -> InsertionPoint {
    let last_import = items
        .iter()
        .rposition(|item| matches!(item, ModuleItem::ModuleDecl(ModuleDecl::Import(_))));

    match last_import {
        Some(index) => InsertionPoint::AfterImport(index),
        None => InsertionPoint::Top(items.iter().take_while(|item| is_directive(item)).count()),
    }
}

fn is_directive(item: &ModuleItem) -> bool {
    matches!(
        item,
        ModuleItem::Stmt(Stmt::Expr(ExprStmt { expr, .. })) if matches!(expr.as_ref(), Expr::Lit(Lit::Str(_)))
    )
}

/// Put `decl` into `items` at `point`.
pub fn place_declaration(items: &mut Vec<ModuleItem>, point: InsertionPoint, decl: ModuleItem) {
    match point {
        InsertionPoint::Replace(index) => items[index] = decl,
        InsertionPoint::AfterImport(index) => items.insert(index + 1, decl),
        InsertionPoint::Top(index) => items.insert(index, decl),
    }
}

fn bound_names(pat: &Pat, out: &mut HashSet<String>) {
    match pat {
        Pat::Ident(binding) => {
            out.insert(binding.id.sym.to_string());
        }
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                bound_names(elem, out);
            }
        }
        Pat::Rest(rest) => bound_names(&rest.arg, out),
        Pat::Object(object) => {
            for prop in &object.props {
                prop_bound_names(prop, out);
            }
        }
        Pat::Assign(assign) => bound_names(&assign.left, out),
        _ => {}
    }
}

fn prop_bound_names(prop: &ObjectPatProp, out: &mut HashSet<String>) {
    match prop {
        ObjectPatProp::KeyValue(kv) => bound_names(&kv.value, out),
        ObjectPatProp::Assign(assign) => {
            out.insert(assign.key.id.sym.to_string());
        }
        ObjectPatProp::Rest(rest) => bound_names(&rest.arg, out),
    }
}

/// `name` as a shorthand pattern property, `{ name }`.
pub fn shorthand_prop(name: &str) -> ObjectPatProp {
    ObjectPatProp::Assign(AssignPatProp {
        span: DUMMY_SP,
        key: Ident::new_no_ctxt(name.into(), DUMMY_SP).into(),
        value: None,
    })
}

/// Properties for the rebuilt declaration.
///
/// One shorthand per name in `names` (already ordered), followed by the
/// existing declaration's other properties as written (`a: b`, `a = 1`,
/// nested patterns), with a rest element last. Names one of those kept
/// properties already binds get no extra shorthand.
pub fn destructuring_props(
    names: &[String],
    existing: Option<&NamespaceDestructuring>,
) -> Vec<ObjectPatProp> {
    let mut kept = Vec::new();
    let mut rest = None;
    let mut bound = HashSet::new();

    for prop in existing.map(|e| e.props.as_slice()).unwrap_or_default() {
        match prop {
            ObjectPatProp::Assign(AssignPatProp { value: None, .. }) => {}
            ObjectPatProp::Rest(_) => {
                prop_bound_names(prop, &mut bound);
                rest = Some(prop.clone());
            }
            _ => {
                prop_bound_names(prop, &mut bound);
                kept.push(prop.clone());
            }
        }
    }

    let mut props: Vec<ObjectPatProp> = names
        .iter()
        .filter(|name| !bound.contains(name.as_str()))
        .map(|name| shorthand_prop(name))
        .collect();
    props.extend(kept);
    props.extend(rest);
    props
}

/// Build `const { ...props } = namespace;`.
///
/// When `replacing` an existing declaration, its span (so attached comments
/// stay put), kind, `export` and type annotation carry over.
pub fn build_declaration(
    namespace: &str,
    props: Vec<ObjectPatProp>,
    replacing: Option<&NamespaceDestructuring>,
) -> ModuleItem {
    let pattern = Pat::Object(ObjectPat {
        span: DUMMY_SP,
        props,
        optional: false,
        type_ann: replacing.and_then(|e| e.type_ann.clone()),
    });
    let init = Expr::Ident(Ident::new_no_ctxt(namespace.into(), DUMMY_SP));
    let span = replacing.map_or(DUMMY_SP, |e| e.span);
    let exported = replacing.is_some_and(|e| e.exported);

    let var = Box::new(VarDecl {
        span: if exported { DUMMY_SP } else { span },
        ctxt: SyntaxContext::empty(),
        kind: replacing.map_or(VarDeclKind::Const, |e| e.kind),
        declare: false,
        decls: vec![VarDeclarator {
            span: DUMMY_SP,
            name: pattern,
            init: Some(Box::new(init)),
            definite: false,
        }],
    });

    if exported {
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
            span,
            decl: Decl::Var(var),
        }))
    } else {
        ModuleItem::Stmt(Stmt::Decl(Decl::Var(var)))
    }
}
