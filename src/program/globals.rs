//! Global symbol lookup
//!
//! [`GlobalsLookup`] is the compiler's read-only view of everything declared at
//! script scope: defines, global variables and (possibly overloaded) functions.
//! The registration methods are used by whoever builds the symbol table; the
//! token pipeline itself only queries.

use super::types::DataType;
use crate::compiler::token::Token;
use rustc_hash::FxHashMap;

/// Handle of a registered function overload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(pub usize);

/// Handle of a registered global variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalVariableId(pub usize);

/// Function parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub data_type: DataType,
}

impl Parameter {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Parameter {
            name: name.into(),
            data_type,
        }
    }
}

/// Function signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: DataType,
}

impl Function {
    pub fn new(name: impl Into<String>, parameters: Vec<Parameter>, return_type: DataType) -> Self {
        Function {
            name: name.into(),
            parameters,
            return_type,
        }
    }

    pub fn parameter_types(&self) -> impl Iterator<Item = DataType> + '_ {
        self.parameters.iter().map(|p| p.data_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalVariable {
    pub name: String,
    pub data_type: DataType,
}

/// Textual macro: the identifier is replaced by `content` before structuring
#[derive(Debug, Clone)]
pub struct Define {
    pub name: String,
    pub content: Vec<Token>,
}

#[derive(Debug, Default)]
pub struct GlobalsLookup {
    functions: Vec<Function>,
    functions_by_name: FxHashMap<String, Vec<FunctionId>>,
    variables: Vec<GlobalVariable>,
    variables_by_name: FxHashMap<String, GlobalVariableId>,
    defines: FxHashMap<String, Define>,
}

impl GlobalsLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function overload; overloads share a name
    pub fn add_function(&mut self, function: Function) -> FunctionId {
        let id = FunctionId(self.functions.len());
        self.functions_by_name
            .entry(function.name.clone())
            .or_default()
            .push(id);
        self.functions.push(function);
        id
    }

    /// Register a global variable, replacing any earlier binding of the name
    pub fn add_global_variable(
        &mut self,
        name: impl Into<String>,
        data_type: DataType,
    ) -> GlobalVariableId {
        let name = name.into();
        let id = GlobalVariableId(self.variables.len());
        self.variables.push(GlobalVariable {
            name: name.clone(),
            data_type,
        });
        self.variables_by_name.insert(name, id);
        id
    }

    pub fn add_define(&mut self, name: impl Into<String>, content: Vec<Token>) {
        let name = name.into();
        self.defines.insert(name.clone(), Define { name, content });
    }

    pub fn define_by_name(&self, name: &str) -> Option<&Define> {
        self.defines.get(name)
    }

    pub fn global_variable_by_name(&self, name: &str) -> Option<(GlobalVariableId, &GlobalVariable)> {
        self.variables_by_name
            .get(name)
            .map(|&id| (id, &self.variables[id.0]))
    }

    /// All overloads registered under `name`, in registration order
    pub fn functions_by_name(&self, name: &str) -> &[FunctionId] {
        self.functions_by_name
            .get(name)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.0]
    }

    pub fn global_variable(&self, id: GlobalVariableId) -> &GlobalVariable {
        &self.variables[id.0]
    }
}
