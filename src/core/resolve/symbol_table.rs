use std::collections::HashMap;
use std::fmt;

use crate::core::diag::Span;
use crate::core::resolve::{AttrRef, Symbol, SymbolId, SymbolKind};
use crate::core::tree::NodeId;

/// Resolution result for a referencing node.
///
/// `symbol` is set only when resolution picked exactly one symbol. When the
/// name matched several overloads and none (or more than one) applied,
/// `symbol` is `None` and `candidates` lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolInfo {
    pub symbol: Option<SymbolId>,
    pub candidates: Vec<SymbolId>,
}

impl SymbolInfo {
    pub fn resolved(symbol: SymbolId) -> Self {
        Self {
            symbol: Some(symbol),
            candidates: Vec::new(),
        }
    }

    pub fn ambiguous(candidates: Vec<SymbolId>) -> Self {
        Self {
            symbol: None,
            candidates,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        self.symbol.is_none() && self.candidates.is_empty()
    }
}

pub struct SymbolTableBuilder {
    symbols: Vec<Symbol>,
    node_decl: HashMap<NodeId, SymbolId>,
    node_ref: HashMap<NodeId, SymbolInfo>,
    implicit_this: HashMap<NodeId, SymbolId>,
    type_members: HashMap<SymbolId, Vec<SymbolId>>,
}

impl Default for SymbolTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTableBuilder {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            node_decl: HashMap::new(),
            node_ref: HashMap::new(),
            implicit_this: HashMap::new(),
            type_members: HashMap::new(),
        }
    }

    pub fn add_symbol(
        &mut self,
        name: &str,
        kind: SymbolKind,
        attrs: Vec<AttrRef>,
        decl: Option<NodeId>,
        span: Span,
    ) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        if let Some(node_id) = decl {
            self.node_decl.insert(node_id, id);
        }
        self.symbols.push(Symbol {
            id,
            name: name.to_string(),
            kind,
            attrs,
            decl,
            span,
        });
        id
    }

    pub fn add_member(&mut self, owner: SymbolId, member: SymbolId) {
        self.type_members.entry(owner).or_default().push(member);
    }

    pub fn record_ref(&mut self, node_id: NodeId, info: SymbolInfo) {
        self.node_ref.insert(node_id, info);
    }

    pub fn record_implicit_this(&mut self, node_id: NodeId, this: SymbolId) {
        self.implicit_this.insert(node_id, this);
    }

    pub fn lookup(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    pub fn members_of(&self, owner: SymbolId) -> &[SymbolId] {
        self.type_members
            .get(&owner)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn declared_symbol(&self, node_id: NodeId) -> Option<SymbolId> {
        self.node_decl.get(&node_id).copied()
    }

    pub fn ref_info(&self, node_id: NodeId) -> Option<&SymbolInfo> {
        self.node_ref.get(&node_id)
    }

    pub fn finish(self) -> SymbolTable {
        SymbolTable {
            symbols: self.symbols,
            node_decl: self.node_decl,
            node_ref: self.node_ref,
            implicit_this: self.implicit_this,
            type_members: self.type_members,
        }
    }
}

// --- SymbolTable ---

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    node_decl: HashMap<NodeId, SymbolId>,
    node_ref: HashMap<NodeId, SymbolInfo>,
    implicit_this: HashMap<NodeId, SymbolId>,
    type_members: HashMap<SymbolId, Vec<SymbolId>>,
}

impl SymbolTable {
    pub fn lookup(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    /// Symbol declared by a declaration node (parameter, local, member, type).
    pub fn declared_symbol(&self, node_id: NodeId) -> Option<SymbolId> {
        self.node_decl.get(&node_id).copied()
    }

    /// Resolution of a referencing node; unresolved nodes get an empty info.
    pub fn symbol_info(&self, node_id: NodeId) -> SymbolInfo {
        self.node_ref.get(&node_id).cloned().unwrap_or_default()
    }

    pub fn has_ref(&self, node_id: NodeId) -> bool {
        self.node_ref.contains_key(&node_id)
    }

    /// `this` read implicitly by a bare reference to an instance member.
    pub fn implicit_this(&self, node_id: NodeId) -> Option<SymbolId> {
        self.implicit_this.get(&node_id).copied()
    }

    pub fn members_of(&self, owner: SymbolId) -> &[SymbolId] {
        self.type_members
            .get(&owner)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn lookup_by_name(&self, name: &str) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(move |symbol| symbol.name == name)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Symbols:")?;
        for symbol in &self.symbols {
            writeln!(f, "{symbol}")?;
        }

        writeln!(f)?;
        writeln!(f, "Node -> Symbol:")?;
        let mut refs = self.node_ref.iter().collect::<Vec<_>>();
        refs.sort_by_key(|(node, _)| node.0);
        for (node, info) in refs {
            match info.symbol {
                Some(symbol) => writeln!(f, "Node [{node}] -> Symbol [{symbol}]")?,
                None => {
                    let candidates = info
                        .candidates
                        .iter()
                        .map(|c| format!("[{c}]"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    writeln!(f, "Node [{node}] -> ambiguous {candidates}")?;
                }
            }
        }
        Ok(())
    }
}
