use std::sync::Arc;

use tracing::debug;

use crate::core::diag::{CompileError, Span};
use crate::core::flow::{self, FlowAnalysis, FlowCache};
use crate::core::host::SemanticHost;
use crate::core::lexer::{LexError, Lexer, Token};
use crate::core::parse::Parser;
use crate::core::resolve::{self, Symbol, SymbolId, SymbolInfo, SymbolTable};
use crate::core::tree::{NodeId, SyntaxKind, SyntaxTree};

const GENERATED_ATTR: &str = "generated";

/// A resolved source file: syntax tree, symbol table and memoized flow.
#[derive(Debug)]
pub struct Compilation {
    tree: SyntaxTree,
    symbols: SymbolTable,
    flow_cache: FlowCache,
}

impl Compilation {
    pub fn new(tree: SyntaxTree, symbols: SymbolTable) -> Self {
        let flow_cache = FlowCache::new(tree.len());
        Self {
            tree,
            symbols,
            flow_cache,
        }
    }

    /// Lex, parse and resolve `source`.
    ///
    /// Lex and parse stop at the first error; resolve errors are reported
    /// together.
    pub fn from_source(source: &str) -> Result<Self, Vec<CompileError>> {
        let tokens = Lexer::new(source)
            .tokenize()
            .collect::<Result<Vec<Token>, LexError>>()
            .map_err(|e| vec![e.into()])?;

        let tree = Parser::new(&tokens).parse().map_err(|e| vec![e.into()])?;

        let symbols = resolve::resolve(&tree).map_err(|errs| {
            errs.into_iter()
                .map(CompileError::from)
                .collect::<Vec<CompileError>>()
        })?;

        debug!(
            nodes = tree.len(),
            symbols = symbols.symbols().len(),
            "compilation: front end done"
        );
        Ok(Self::new(tree, symbols))
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    fn is_generated_decl(&self, node: NodeId) -> bool {
        let is_decl = matches!(
            self.tree.kind(node),
            Some(SyntaxKind::TypeDecl { .. } | SyntaxKind::FuncDecl { .. })
        );
        is_decl
            && self.tree.children(node).iter().any(|child| {
                matches!(
                    self.tree.kind(*child),
                    Some(SyntaxKind::Attribute { path })
                        if path.last().is_some_and(|name| name == GENERATED_ATTR)
                )
            })
    }
}

impl SemanticHost for Compilation {
    fn root(&self) -> Option<NodeId> {
        self.tree.root()
    }

    fn kind(&self, node: NodeId) -> Option<&SyntaxKind> {
        self.tree.kind(node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.parent(node)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.tree.children(node)
    }

    fn descendants(&self, node: NodeId, include_self: bool) -> Vec<NodeId> {
        self.tree.descendants(node, include_self)
    }

    fn span(&self, node: NodeId) -> Span {
        self.tree.span(node)
    }

    fn symbol_info(&self, node: NodeId) -> SymbolInfo {
        self.symbols.symbol_info(node)
    }

    fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.lookup(id)
    }

    fn flow_analysis(&self, scope: NodeId) -> Arc<FlowAnalysis> {
        self.flow_cache
            .get_or_compute(scope, || flow::analyze(&self.tree, &self.symbols, scope))
    }

    fn is_generated(&self, node: NodeId) -> bool {
        self.is_generated_decl(node)
            || self
                .tree
                .ancestors(node)
                .any(|ancestor| self.is_generated_decl(ancestor))
    }
}
