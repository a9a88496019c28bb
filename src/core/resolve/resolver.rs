//! Two-pass name resolution over the syntax tree.
//!
//! Pass one declares types, fields and function signatures so that calls can
//! refer to functions declared later in the file. Pass two walks function
//! bodies with a scope stack, binding identifiers and picking overloads for
//! invocations.

use std::collections::HashMap;

use crate::core::diag::Span;
use crate::core::resolve::{
    AttrRef, ResolveError, ResolveErrorKind as REK, SymbolId, SymbolInfo, SymbolKind,
    SymbolTable, SymbolTableBuilder,
};
use crate::core::tree::{NodeId, SyntaxKind, SyntaxTree};

#[derive(Default)]
struct Scope {
    vars: HashMap<String, SymbolId>,
}

#[derive(Debug, Clone, Copy, Default)]
struct FuncContext {
    owner: Option<SymbolId>,
    this: Option<SymbolId>,
}

pub struct SymbolResolver<'a> {
    tree: &'a SyntaxTree,
    scopes: Vec<Scope>,
    errors: Vec<ResolveError>,
    builder: SymbolTableBuilder,
    types: HashMap<String, SymbolId>,
    globals: HashMap<String, Vec<SymbolId>>,
    func_ctx: FuncContext,
}

pub fn resolve(tree: &SyntaxTree) -> Result<SymbolTable, Vec<ResolveError>> {
    let (table, errors) = resolve_partial(tree);
    if errors.is_empty() {
        Ok(table)
    } else {
        Err(errors)
    }
}

pub fn resolve_partial(tree: &SyntaxTree) -> (SymbolTable, Vec<ResolveError>) {
    let mut resolver = SymbolResolver::new(tree);
    if let Some(root) = tree.root() {
        resolver.populate_decls(root);
        resolver.resolve_bodies(root);
    }
    (resolver.builder.finish(), resolver.errors)
}

impl<'a> SymbolResolver<'a> {
    pub fn new(tree: &'a SyntaxTree) -> Self {
        Self {
            tree,
            scopes: vec![Scope::default()],
            errors: Vec::new(),
            builder: SymbolTableBuilder::new(),
            types: HashMap::new(),
            globals: HashMap::new(),
            func_ctx: FuncContext::default(),
        }
    }

    fn with_scope<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.scopes.push(Scope::default());
        f(self);
        self.scopes.pop();
    }

    fn declare_var(&mut self, name: &str, id: SymbolId, span: Span) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };
        if scope.vars.contains_key(name) {
            self.errors
                .push(REK::SymbolAlreadyDefined(name.to_string()).at(span));
        } else {
            scope.vars.insert(name.to_string(), id);
        }
    }

    fn lookup_var(&self, name: &str) -> Option<SymbolId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.vars.get(name).copied())
    }

    fn collect_attrs(&self, node: NodeId) -> Vec<AttrRef> {
        let tree = self.tree;
        tree.children(node)
            .iter()
            .filter_map(|child| match tree.kind(*child) {
                Some(SyntaxKind::Attribute { path }) => {
                    Some(AttrRef::from_path(path, tree.span(*child)))
                }
                _ => None,
            })
            .collect()
    }

    fn symbol_kind(&self, id: SymbolId) -> Option<&SymbolKind> {
        self.builder.lookup(id).map(|symbol| &symbol.kind)
    }

    fn is_instance_member(&self, id: SymbolId) -> bool {
        self.symbol_kind(id)
            .is_some_and(SymbolKind::is_instance_member)
    }

    // --- Pass 1: declarations ---

    fn populate_decls(&mut self, root: NodeId) {
        let tree = self.tree;
        for item in tree.children(root) {
            match tree.kind(*item) {
                Some(SyntaxKind::TypeDecl { name }) => self.populate_type(*item, name),
                Some(SyntaxKind::FuncDecl { name, .. }) => {
                    let func = self.populate_func(*item, None);
                    self.globals.entry(name.clone()).or_default().push(func);
                }
                _ => {}
            }
        }
    }

    fn populate_type(&mut self, node: NodeId, name: &str) {
        let tree = self.tree;
        let attrs = self.collect_attrs(node);
        let ty = self
            .builder
            .add_symbol(name, SymbolKind::Type, attrs, Some(node), tree.span(node));
        if self.types.contains_key(name) {
            self.errors
                .push(REK::TypeAlreadyDefined(name.to_string()).at(tree.span(node)));
        } else {
            self.types.insert(name.to_string(), ty);
        }

        // Functions may overload each other; fields may not share a name with
        // anything.
        let mut field_names: HashMap<String, bool> = HashMap::new();
        for member in tree.children(node) {
            match tree.kind(*member) {
                Some(SyntaxKind::FieldDecl { name, is_static }) => {
                    if field_names.contains_key(name) {
                        self.errors.push(
                            REK::SymbolAlreadyDefined(name.clone()).at(tree.span(*member)),
                        );
                        continue;
                    }
                    field_names.insert(name.clone(), true);
                    let attrs = self.collect_attrs(*member);
                    let field = self.builder.add_symbol(
                        name,
                        SymbolKind::Field {
                            owner: ty,
                            is_static: *is_static,
                        },
                        attrs,
                        Some(*member),
                        tree.span(*member),
                    );
                    self.builder.add_member(ty, field);
                }
                Some(SyntaxKind::FuncDecl { name, .. }) => {
                    if field_names.get(name) == Some(&true) {
                        self.errors.push(
                            REK::SymbolAlreadyDefined(name.clone()).at(tree.span(*member)),
                        );
                        continue;
                    }
                    field_names.insert(name.clone(), false);
                    let func = self.populate_func(*member, Some(ty));
                    self.builder.add_member(ty, func);
                }
                _ => {}
            }
        }
    }

    fn populate_func(&mut self, node: NodeId, owner: Option<SymbolId>) -> SymbolId {
        let tree = self.tree;
        let (name, is_static) = match tree.kind(node) {
            Some(SyntaxKind::FuncDecl { name, is_static }) => (name.as_str(), *is_static),
            _ => ("", true),
        };
        let attrs = self.collect_attrs(node);

        let param_nodes: Vec<NodeId> = tree
            .children(node)
            .iter()
            .find(|child| matches!(tree.kind(**child), Some(SyntaxKind::ParamList)))
            .map(|list| tree.children(*list).to_vec())
            .unwrap_or_default();

        let mut params = Vec::with_capacity(param_nodes.len());
        let mut seen: HashMap<&str, ()> = HashMap::new();
        for (ordinal, param) in param_nodes.iter().enumerate() {
            let Some(SyntaxKind::Parameter {
                name: param_name,
                variadic,
            }) = tree.kind(*param)
            else {
                continue;
            };
            if *variadic && ordinal + 1 != param_nodes.len() {
                self.errors.push(
                    REK::VariadicParamNotLast(param_name.clone()).at(tree.span(*param)),
                );
            }
            if seen.insert(param_name.as_str(), ()).is_some() {
                self.errors.push(
                    REK::SymbolAlreadyDefined(param_name.clone()).at(tree.span(*param)),
                );
            }
            let attrs = self.collect_attrs(*param);
            params.push(self.builder.add_symbol(
                param_name,
                SymbolKind::Parameter {
                    ordinal: ordinal as u32,
                    variadic: *variadic,
                },
                attrs,
                Some(*param),
                tree.span(*param),
            ));
        }

        let this_param = match owner {
            Some(owner) if !is_static => Some(self.builder.add_symbol(
                "this",
                SymbolKind::This { owner },
                Vec::new(),
                None,
                tree.span(node),
            )),
            _ => None,
        };

        self.builder.add_symbol(
            name,
            SymbolKind::Function {
                owner,
                is_static,
                params,
                this_param,
            },
            attrs,
            Some(node),
            tree.span(node),
        )
    }

    // --- Pass 2: bodies ---

    fn resolve_bodies(&mut self, root: NodeId) {
        let tree = self.tree;
        for item in tree.children(root) {
            match tree.kind(*item) {
                Some(SyntaxKind::TypeDecl { .. }) => {
                    for member in tree.children(*item) {
                        if matches!(tree.kind(*member), Some(SyntaxKind::FuncDecl { .. })) {
                            self.resolve_func(*member);
                        }
                    }
                }
                Some(SyntaxKind::FuncDecl { .. }) => self.resolve_func(*item),
                _ => {}
            }
        }
    }

    fn resolve_func(&mut self, node: NodeId) {
        let tree = self.tree;
        let Some(func) = self.builder.declared_symbol(node) else {
            return;
        };
        let Some(SymbolKind::Function {
            owner,
            params,
            this_param,
            ..
        }) = self.symbol_kind(func).cloned()
        else {
            return;
        };

        let saved = self.func_ctx;
        self.func_ctx = FuncContext {
            owner,
            this: this_param,
        };

        self.with_scope(|resolver| {
            for param in &params {
                if let Some(symbol) = resolver.builder.lookup(*param) {
                    let name = symbol.name.clone();
                    if let Some(scope) = resolver.scopes.last_mut() {
                        // Duplicates were reported in pass one.
                        scope.vars.entry(name).or_insert(*param);
                    }
                }
            }
            if let Some(body) = tree
                .children(node)
                .iter()
                .find(|child| matches!(tree.kind(**child), Some(SyntaxKind::Block)))
            {
                resolver.visit(*body);
            }
        });

        self.func_ctx = saved;
    }

    fn visit_children(&mut self, node: NodeId) {
        let tree = self.tree;
        for child in tree.children(node) {
            self.visit(*child);
        }
    }

    fn visit(&mut self, node: NodeId) {
        let tree = self.tree;
        let Some(kind) = tree.kind(node) else {
            return;
        };
        match kind {
            SyntaxKind::Block => self.with_scope(|resolver| resolver.visit_children(node)),
            SyntaxKind::LocalDecl { name } => {
                // Initializer first: `let x = x;` refers to the outer `x`.
                self.visit_children(node);
                let local = self.builder.add_symbol(
                    name,
                    SymbolKind::Local,
                    Vec::new(),
                    Some(node),
                    tree.span(node),
                );
                self.declare_var(name, local, tree.span(node));
            }
            SyntaxKind::Identifier { name } => self.resolve_identifier(node, name),
            SyntaxKind::ThisExpr => {
                if let Some(this) = self.func_ctx.this {
                    self.builder.record_ref(node, SymbolInfo::resolved(this));
                }
            }
            SyntaxKind::MemberAccess { name } => self.resolve_member_access(node, name),
            SyntaxKind::Invocation => self.resolve_invocation(node),
            SyntaxKind::Assignment => {
                self.visit_children(node);
                let target = tree.children(node).first().and_then(|t| tree.kind(*t));
                if !matches!(
                    target,
                    Some(SyntaxKind::Identifier { .. } | SyntaxKind::MemberAccess { .. })
                ) {
                    self.errors
                        .push(REK::InvalidAssignmentTarget.at(tree.span(node)));
                }
            }
            SyntaxKind::SimpleLambda | SyntaxKind::ParenthesizedLambda => {
                self.resolve_lambda(node)
            }
            _ => self.visit_children(node),
        }
    }

    fn resolve_identifier(&mut self, node: NodeId, name: &str) {
        if let Some(var) = self.lookup_var(name) {
            self.builder.record_ref(node, SymbolInfo::resolved(var));
            return;
        }

        if let Some(owner) = self.func_ctx.owner {
            let members = self.members_named(owner, name);
            if !members.is_empty() {
                self.record_implicit_this(node, &members);
                self.builder.record_ref(node, Self::info_for(members));
                return;
            }
        }

        if let Some(ty) = self.types.get(name).copied() {
            self.builder.record_ref(node, SymbolInfo::resolved(ty));
            return;
        }

        if let Some(funcs) = self.globals.get(name).cloned() {
            self.builder.record_ref(node, Self::info_for(funcs));
        }
    }

    fn resolve_member_access(&mut self, node: NodeId, name: &str) {
        let tree = self.tree;
        let Some(receiver) = tree.children(node).first().copied() else {
            return;
        };
        self.visit(receiver);
        if let Some(owner) = self.receiver_type(receiver) {
            let members = self.members_named(owner, name);
            if !members.is_empty() {
                self.builder.record_ref(node, Self::info_for(members));
            }
        }
    }

    fn resolve_invocation(&mut self, node: NodeId) {
        let tree = self.tree;
        let [callee, args] = tree.children(node) else {
            self.visit_children(node);
            return;
        };
        let (callee, args) = (*callee, *args);

        let arg_names: Vec<Option<String>> = tree
            .children(args)
            .iter()
            .map(|arg| match tree.kind(*arg) {
                Some(SyntaxKind::Argument { name }) => name.clone(),
                _ => None,
            })
            .collect();

        let candidates = match tree.kind(callee) {
            // Calling a variable is an indirect invocation; leave it unresolved.
            Some(SyntaxKind::Identifier { name }) if self.lookup_var(name).is_none() => {
                Some(self.callable_candidates(name))
            }
            Some(SyntaxKind::MemberAccess { name }) => {
                let receiver = tree.children(callee).first().copied();
                if let Some(receiver) = receiver {
                    self.visit(receiver);
                }
                receiver
                    .and_then(|receiver| self.receiver_type(receiver))
                    .map(|owner| self.members_named(owner, name))
            }
            _ => {
                self.visit(callee);
                None
            }
        };

        if let Some(candidates) = candidates
            && !candidates.is_empty()
        {
            let info = self.select_overload(&candidates, &arg_names);
            if matches!(tree.kind(callee), Some(SyntaxKind::Identifier { .. })) {
                let picked = match info.symbol {
                    Some(symbol) => vec![symbol],
                    None => info.candidates.clone(),
                };
                self.record_implicit_this(callee, &picked);
            }
            self.builder.record_ref(callee, info.clone());
            self.builder.record_ref(node, info);
        }

        self.visit(args);
    }

    fn resolve_lambda(&mut self, node: NodeId) {
        let tree = self.tree;
        self.with_scope(|resolver| {
            let children = tree.children(node);
            let Some(head) = children.first().copied() else {
                return;
            };
            let params: Vec<NodeId> = match tree.kind(head) {
                Some(SyntaxKind::ParamList) => tree.children(head).to_vec(),
                Some(SyntaxKind::Parameter { .. }) => vec![head],
                _ => Vec::new(),
            };
            for (ordinal, param) in params.iter().enumerate() {
                let Some(SyntaxKind::Parameter { name, .. }) = tree.kind(*param) else {
                    continue;
                };
                let id = resolver.builder.add_symbol(
                    name,
                    SymbolKind::Parameter {
                        ordinal: ordinal as u32,
                        variadic: false,
                    },
                    Vec::new(),
                    Some(*param),
                    tree.span(*param),
                );
                resolver.declare_var(name, id, tree.span(*param));
            }
            for body in children.iter().skip(1) {
                resolver.visit(*body);
            }
        });
    }

    // --- Lookup helpers ---

    fn members_named(&self, owner: SymbolId, name: &str) -> Vec<SymbolId> {
        self.builder
            .members_of(owner)
            .iter()
            .copied()
            .filter(|member| {
                self.builder
                    .lookup(*member)
                    .is_some_and(|symbol| symbol.name == name)
            })
            .collect()
    }

    fn callable_candidates(&self, name: &str) -> Vec<SymbolId> {
        let in_type: Vec<SymbolId> = self
            .func_ctx
            .owner
            .map(|owner| {
                self.members_named(owner, name)
                    .into_iter()
                    .filter(|member| {
                        matches!(self.symbol_kind(*member), Some(SymbolKind::Function { .. }))
                    })
                    .collect()
            })
            .unwrap_or_default();
        if !in_type.is_empty() {
            return in_type;
        }
        self.globals.get(name).cloned().unwrap_or_default()
    }

    /// Type whose members a receiver expression exposes: `this` or a type
    /// name. Other receivers are untyped in this front end.
    fn receiver_type(&self, receiver: NodeId) -> Option<SymbolId> {
        match self.tree.kind(receiver)? {
            SyntaxKind::ThisExpr => self.func_ctx.owner,
            SyntaxKind::Parenthesized => {
                self.receiver_type(*self.tree.children(receiver).first()?)
            }
            SyntaxKind::Identifier { .. } => {
                let symbol = self.builder.ref_info(receiver)?.symbol?;
                matches!(self.symbol_kind(symbol), Some(SymbolKind::Type)).then_some(symbol)
            }
            _ => None,
        }
    }

    fn record_implicit_this(&mut self, node: NodeId, members: &[SymbolId]) {
        if let Some(this) = self.func_ctx.this
            && members.iter().any(|member| self.is_instance_member(*member))
        {
            self.builder.record_implicit_this(node, this);
        }
    }

    fn info_for(mut symbols: Vec<SymbolId>) -> SymbolInfo {
        if symbols.len() == 1 {
            SymbolInfo::resolved(symbols.remove(0))
        } else {
            SymbolInfo::ambiguous(symbols)
        }
    }

    /// Picks the single applicable overload, if there is exactly one.
    fn select_overload(&self, candidates: &[SymbolId], arg_names: &[Option<String>]) -> SymbolInfo {
        let applicable: Vec<SymbolId> = candidates
            .iter()
            .copied()
            .filter(|candidate| self.is_applicable(*candidate, arg_names))
            .collect();
        match applicable.len() {
            0 => SymbolInfo::ambiguous(candidates.to_vec()),
            1 => SymbolInfo::resolved(applicable[0]),
            _ => SymbolInfo::ambiguous(applicable),
        }
    }

    fn is_applicable(&self, func: SymbolId, arg_names: &[Option<String>]) -> bool {
        let Some(SymbolKind::Function { params, .. }) = self.symbol_kind(func) else {
            return false;
        };
        let param_names: Vec<&str> = params
            .iter()
            .filter_map(|param| self.builder.lookup(*param))
            .map(|symbol| symbol.name.as_str())
            .collect();
        let variadic = params
            .last()
            .and_then(|param| self.symbol_kind(*param))
            .is_some_and(|kind| matches!(kind, SymbolKind::Parameter { variadic: true, .. }));

        let arity_ok = if variadic {
            arg_names.len() + 1 >= params.len()
        } else {
            arg_names.len() == params.len()
        };
        if !arity_ok {
            return false;
        }

        let mut named_seen = Vec::new();
        for name in arg_names.iter().flatten() {
            if !param_names.contains(&name.as_str()) || named_seen.contains(&name) {
                return false;
            }
            named_seen.push(name);
        }
        true
    }
}
