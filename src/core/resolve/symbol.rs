use std::fmt;

use serde::Serialize;

use crate::core::diag::Span;
use crate::core::tree::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Attribute metadata attached to a declaration, as written in source.
///
/// `qualified_name` is only known when the attribute was written with a
/// dotted path (`@[Perf.NonCapturing]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrRef {
    pub simple_name: String,
    pub qualified_name: Option<String>,
    pub span: Span,
}

impl AttrRef {
    pub fn from_path(path: &[String], span: Span) -> Self {
        let simple_name = path.last().cloned().unwrap_or_default();
        let qualified_name = (path.len() > 1).then(|| path.join("."));
        Self {
            simple_name,
            qualified_name,
            span,
        }
    }
}

impl fmt::Display for AttrRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualified_name {
            Some(name) => write!(f, "@[{name}]"),
            None => write!(f, "@[{}]", self.simple_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Type,
    Field {
        owner: SymbolId,
        is_static: bool,
    },
    Function {
        owner: Option<SymbolId>,
        is_static: bool,
        params: Vec<SymbolId>,
        this_param: Option<SymbolId>,
    },
    Parameter {
        ordinal: u32,
        variadic: bool,
    },
    Local,
    /// Implicit receiver of an instance function.
    This {
        owner: SymbolId,
    },
}

impl SymbolKind {
    /// Variables are the only symbols flow analysis tracks.
    pub fn is_variable(&self) -> bool {
        matches!(
            self,
            SymbolKind::Parameter { .. } | SymbolKind::Local | SymbolKind::This { .. }
        )
    }

    pub fn is_instance_member(&self) -> bool {
        matches!(
            self,
            SymbolKind::Field {
                is_static: false,
                ..
            } | SymbolKind::Function {
                is_static: false,
                ..
            }
        )
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Type => write!(f, "Type"),
            SymbolKind::Field { owner, is_static } => {
                write!(f, "Field of [{owner}]")?;
                if *is_static {
                    write!(f, " (static)")?;
                }
                Ok(())
            }
            SymbolKind::Function {
                owner,
                is_static,
                params,
                ..
            } => {
                let params = params
                    .iter()
                    .map(|param| format!("[{param}]"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Function({params})")?;
                if let Some(owner) = owner {
                    write!(f, " of [{owner}]")?;
                }
                if *is_static {
                    write!(f, " (static)")?;
                }
                Ok(())
            }
            SymbolKind::Parameter { ordinal, variadic } => {
                write!(f, "Param[{ordinal}]")?;
                if *variadic {
                    write!(f, " (variadic)")?;
                }
                Ok(())
            }
            SymbolKind::Local => write!(f, "Local"),
            SymbolKind::This { owner } => write!(f, "This of [{owner}]"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    pub attrs: Vec<AttrRef>,
    /// Declaring node; `None` for implicit symbols such as `this`.
    pub decl: Option<NodeId>,
    pub span: Span,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol [{}] {}: {}", self.id, self.name, self.kind)?;
        for attr in &self.attrs {
            write!(f, " {attr}")?;
        }
        Ok(())
    }
}
