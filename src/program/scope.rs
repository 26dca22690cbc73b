//! Local variables of the function being compiled
//!
//! - [`FunctionScope`]: the enclosing function's signature, its local variable
//!   table and the chain of scopes currently visible
//! - [`LocalVariable`]: one entry of the local variable table
//!
//! # Scopes
//!
//! The local variable table only grows: a name declared in a block that has
//! since been closed keeps its entry, and a later declaration of the same name
//! and type reuses it. Visibility is tracked separately, one frame per open
//! block, so that a closed block's variables stop resolving.

use super::globals::Function;
use super::types::DataType;

/// Handle of an entry in the local variable table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalVariableId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariable {
    pub name: String,
    pub data_type: DataType,
    pub line_number: u32,
}

#[derive(Debug, Clone)]
pub struct FunctionScope {
    function: Function,
    variables: Vec<LocalVariable>,
    visible: Vec<LocalVariableId>,
    scope_starts: Vec<usize>,
}

impl FunctionScope {
    /// Create the scope for `function`; its parameters become visible locals
    pub fn new(function: Function) -> Self {
        let mut scope = FunctionScope {
            function,
            variables: Vec::new(),
            visible: Vec::new(),
            scope_starts: Vec::new(),
        };
        let parameters = scope.function.parameters.clone();
        for param in parameters {
            scope.declare(&param.name, param.data_type, 0);
        }
        scope
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    /// Enter a nested block
    pub fn push_scope(&mut self) {
        self.scope_starts.push(self.visible.len());
    }

    /// Leave the innermost block, hiding everything declared in it
    pub fn pop_scope(&mut self) {
        if let Some(start) = self.scope_starts.pop() {
            self.visible.truncate(start);
        }
    }

    /// Find a visible local variable by name
    pub fn find_visible(&self, name: &str) -> Option<LocalVariableId> {
        self.visible
            .iter()
            .rev()
            .copied()
            .find(|id| self.variables[id.0].name == name)
    }

    /// Declare `name` in the innermost scope.
    ///
    /// The caller is responsible for rejecting names that are already visible.
    pub fn declare(&mut self, name: &str, data_type: DataType, line_number: u32) -> LocalVariableId {
        let existing = self
            .variables
            .iter()
            .position(|v| v.name == name && v.data_type == data_type)
            .map(LocalVariableId);

        let id = existing.unwrap_or_else(|| {
            self.variables.push(LocalVariable {
                name: name.to_string(),
                data_type,
                line_number,
            });
            LocalVariableId(self.variables.len() - 1)
        });
        self.visible.push(id);
        id
    }

    pub fn variable(&self, id: LocalVariableId) -> &LocalVariable {
        &self.variables[id.0]
    }

    /// The whole local variable table, including variables no longer visible
    pub fn local_variables(&self) -> &[LocalVariable] {
        &self.variables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::globals::Parameter;

    fn scope() -> FunctionScope {
        FunctionScope::new(Function::new(
            "update",
            vec![Parameter::new("dt", DataType::U16)],
            DataType::Void,
        ))
    }

    #[test]
    fn test_parameters_are_visible() {
        let scope = scope();
        let id = scope.find_visible("dt").unwrap();
        assert_eq!(scope.variable(id).data_type, DataType::U16);
    }

    #[test]
    fn test_pop_scope_hides_declarations() {
        let mut scope = scope();
        scope.push_scope();
        scope.declare("tmp", DataType::U8, 3);
        assert!(scope.find_visible("tmp").is_some());
        scope.pop_scope();
        assert!(scope.find_visible("tmp").is_none());
        assert!(scope.find_visible("dt").is_some());
        assert_eq!(scope.local_variables().len(), 2);
    }

    #[test]
    fn test_redeclaration_after_pop_reuses_entry() {
        let mut scope = scope();
        scope.push_scope();
        let first = scope.declare("i", DataType::U32, 4);
        scope.pop_scope();
        scope.push_scope();
        let second = scope.declare("i", DataType::U32, 9);
        assert_eq!(first, second);
        let third = scope.declare("j", DataType::U32, 9);
        assert_ne!(first, third);
    }
}
