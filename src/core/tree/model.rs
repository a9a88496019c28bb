use std::fmt;

use crate::core::diag::Span;
use crate::core::tree::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Gt,
    LtEq,
    GtEq,
    LogicalAnd,
    LogicalOr,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
        };
        write!(f, "{op}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    LogicalNot,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::LogicalNot => write!(f, "!"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Int(u64),
    Bool(bool),
    Str(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(value) => write!(f, "{value}"),
            Literal::Bool(value) => write!(f, "{value}"),
            Literal::Str(value) => write!(f, "{value:?}"),
        }
    }
}

/// Node kinds and their child layout.
///
/// - `TypeDecl`: `Attribute*`, then members.
/// - `FuncDecl`: `Attribute*`, `ParamList`, `Block`.
/// - `Parameter`: `Attribute*`.
/// - `LocalDecl`: optional initializer.
/// - `Invocation`: callee expression, `ArgumentList`.
/// - `Argument`: the argument expression.
/// - `MemberAccess`: receiver expression.
/// - `SimpleLambda`: `Parameter`, body.
/// - `ParenthesizedLambda`: `ParamList`, body.
/// - `Parenthesized`: the inner expression.
/// - `Assignment`: target, value.
/// - `IfStmt`: condition, then block, optional else block.
/// - `WhileStmt`: condition, body block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxKind {
    SourceFile,
    TypeDecl { name: String },
    FieldDecl { name: String, is_static: bool },
    FuncDecl { name: String, is_static: bool },
    Attribute { path: Vec<String> },
    ParamList,
    Parameter { name: String, variadic: bool },
    Block,
    LocalDecl { name: String },
    ExprStmt,
    ReturnStmt,
    IfStmt,
    WhileStmt,
    Identifier { name: String },
    ThisExpr,
    Literal { value: Literal },
    MemberAccess { name: String },
    Invocation,
    ArgumentList,
    Argument { name: Option<String> },
    Binary { op: BinaryOp },
    Unary { op: UnaryOp },
    Assignment,
    Parenthesized,
    SimpleLambda,
    ParenthesizedLambda,
}

impl SyntaxKind {
    pub fn is_lambda(&self) -> bool {
        matches!(
            self,
            SyntaxKind::SimpleLambda | SyntaxKind::ParenthesizedLambda
        )
    }

    pub fn is_expr(&self) -> bool {
        matches!(
            self,
            SyntaxKind::Identifier { .. }
                | SyntaxKind::ThisExpr
                | SyntaxKind::Literal { .. }
                | SyntaxKind::MemberAccess { .. }
                | SyntaxKind::Invocation
                | SyntaxKind::Binary { .. }
                | SyntaxKind::Unary { .. }
                | SyntaxKind::Assignment
                | SyntaxKind::Parenthesized
                | SyntaxKind::SimpleLambda
                | SyntaxKind::ParenthesizedLambda
        )
    }

    pub fn is_stmt(&self) -> bool {
        matches!(
            self,
            SyntaxKind::Block
                | SyntaxKind::LocalDecl { .. }
                | SyntaxKind::ExprStmt
                | SyntaxKind::ReturnStmt
                | SyntaxKind::IfStmt
                | SyntaxKind::WhileStmt
        )
    }

    /// Declared or referenced name carried by the node, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            SyntaxKind::TypeDecl { name }
            | SyntaxKind::FieldDecl { name, .. }
            | SyntaxKind::FuncDecl { name, .. }
            | SyntaxKind::Parameter { name, .. }
            | SyntaxKind::LocalDecl { name }
            | SyntaxKind::Identifier { name }
            | SyntaxKind::MemberAccess { name } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxKind::SourceFile => write!(f, "SourceFile"),
            SyntaxKind::TypeDecl { name } => write!(f, "TypeDecl {name}"),
            SyntaxKind::FieldDecl { name, is_static } => {
                if *is_static {
                    write!(f, "FieldDecl static {name}")
                } else {
                    write!(f, "FieldDecl {name}")
                }
            }
            SyntaxKind::FuncDecl { name, is_static } => {
                if *is_static {
                    write!(f, "FuncDecl static {name}")
                } else {
                    write!(f, "FuncDecl {name}")
                }
            }
            SyntaxKind::Attribute { path } => write!(f, "Attribute {}", path.join(".")),
            SyntaxKind::ParamList => write!(f, "ParamList"),
            SyntaxKind::Parameter { name, variadic } => {
                if *variadic {
                    write!(f, "Parameter ...{name}")
                } else {
                    write!(f, "Parameter {name}")
                }
            }
            SyntaxKind::Block => write!(f, "Block"),
            SyntaxKind::LocalDecl { name } => write!(f, "LocalDecl {name}"),
            SyntaxKind::ExprStmt => write!(f, "ExprStmt"),
            SyntaxKind::ReturnStmt => write!(f, "ReturnStmt"),
            SyntaxKind::IfStmt => write!(f, "IfStmt"),
            SyntaxKind::WhileStmt => write!(f, "WhileStmt"),
            SyntaxKind::Identifier { name } => write!(f, "Identifier {name}"),
            SyntaxKind::ThisExpr => write!(f, "This"),
            SyntaxKind::Literal { value } => write!(f, "Literal {value}"),
            SyntaxKind::MemberAccess { name } => write!(f, "MemberAccess .{name}"),
            SyntaxKind::Invocation => write!(f, "Invocation"),
            SyntaxKind::ArgumentList => write!(f, "ArgumentList"),
            SyntaxKind::Argument { name } => match name {
                Some(name) => write!(f, "Argument {name}:"),
                None => write!(f, "Argument"),
            },
            SyntaxKind::Binary { op } => write!(f, "Binary {op}"),
            SyntaxKind::Unary { op } => write!(f, "Unary {op}"),
            SyntaxKind::Assignment => write!(f, "Assignment"),
            SyntaxKind::Parenthesized => write!(f, "Parenthesized"),
            SyntaxKind::SimpleLambda => write!(f, "SimpleLambda"),
            SyntaxKind::ParenthesizedLambda => write!(f, "ParenthesizedLambda"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub id: NodeId,
    pub kind: SyntaxKind,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Immutable-after-build arena of syntax nodes.
///
/// Nodes are allocated bottom-up: children first, then the parent that
/// adopts them. The root is the last `SourceFile` allocated.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    root: Option<NodeId>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, kind: SyntaxKind, span: Span, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in &children {
            self.nodes[child.index()].parent = Some(id);
        }
        if kind == SyntaxKind::SourceFile {
            self.root = Some(id);
        }
        self.nodes.push(SyntaxNode {
            id,
            kind,
            span,
            parent: None,
            children,
        });
        id
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: NodeId) -> Option<&SyntaxKind> {
        self.node(id).map(|node| &node.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).map(|node| node.span).unwrap_or_default()
    }

    /// Pre-order walk of the subtree rooted at `id`.
    pub fn descendants(&self, id: NodeId, include_self: bool) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = if include_self {
            vec![id]
        } else {
            self.children(id).iter().rev().copied().collect()
        };
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |node| self.parent(*node))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.nodes.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/tree/t_model.rs"]
mod tests;
