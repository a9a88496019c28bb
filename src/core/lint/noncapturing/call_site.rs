//! Binding of a lambda argument to the callee's formal parameter.

use tracing::debug;

use crate::core::host::SemanticHost;
use crate::core::resolve::{SymbolId, SymbolKind};
use crate::core::tree::{NodeId, SyntaxKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterBinding {
    pub invocation: NodeId,
    pub callee: SymbolId,
    pub parameter: SymbolId,
}

/// Resolves the parameter a lambda binds to, when the lambda is a direct
/// argument of an invocation with exactly one resolved callee.
pub fn resolve(host: &dyn SemanticHost, lambda: NodeId) -> Option<ParameterBinding> {
    let argument = host.parent(lambda)?;
    let Some(SyntaxKind::Argument { name }) = host.kind(argument) else {
        debug!(node = %lambda, "non-capturing: lambda is not a call argument");
        return None;
    };
    let arg_list = host
        .parent(argument)
        .filter(|node| matches!(host.kind(*node), Some(SyntaxKind::ArgumentList)))?;
    let invocation = host
        .parent(arg_list)
        .filter(|node| matches!(host.kind(*node), Some(SyntaxKind::Invocation)))?;

    let Some(callee) = host.symbol_info(invocation).symbol else {
        debug!(node = %lambda, "non-capturing: callee unresolved or ambiguous");
        return None;
    };
    let Some(SymbolKind::Function { params, .. }) = host.symbol(callee).map(|s| &s.kind) else {
        debug!(node = %lambda, "non-capturing: callee is not a function");
        return None;
    };

    let parameter = match name {
        Some(name) => params
            .iter()
            .copied()
            .find(|param| host.symbol(*param).is_some_and(|p| &p.name == name)),
        None => host
            .children(arg_list)
            .iter()
            .position(|arg| *arg == argument)
            .and_then(|index| bind_positional(params, index)),
    };
    let Some(parameter) = parameter else {
        debug!(node = %lambda, callee = %callee, "non-capturing: argument binds to no parameter");
        return None;
    };

    Some(ParameterBinding {
        invocation,
        callee,
        parameter,
    })
}

/// Parameter at `index`, or the last parameter for overflow arguments.
pub fn bind_positional(params: &[SymbolId], index: usize) -> Option<SymbolId> {
    params.get(index).or_else(|| params.last()).copied()
}
