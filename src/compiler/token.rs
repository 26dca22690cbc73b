//! Token nodes and the arena that owns them
//!
//! A statement is compiled by rewriting a [`TokenList`] in place. All token
//! nodes of one statement live in a single [`la_arena::Arena`] and are
//! addressed by [`TokenId`]; a sequence is an ordered list of handles stored in
//! a second arena and addressed by [`SequenceId`]. Replacing a node therefore
//! never invalidates the nodes it refers to, and moving a sub-range of a
//! sequence into a group only moves handles.
//!
//! # Token kinds
//!
//! Raw tokens come from the lexer: [`Token::Identifier`], [`Token::Keyword`],
//! [`Token::Operator`], [`Token::VarType`] and constants. The pipeline
//! replaces them with structural tokens ([`Token::CommaSeparated`]) and
//! value-producing [`Statement`]s until one typed statement remains.

use super::operators::Operator;
use crate::program::globals::{FunctionId, GlobalVariableId};
use crate::program::scope::LocalVariableId;
use crate::program::types::DataType;
use la_arena::{Arena, Idx};
use std::fmt;

pub type TokenId = Idx<Token>;
pub type SequenceId = Idx<Sequence>;

/// Ordered list of token handles
pub type Sequence = Vec<TokenId>;

/// Reserved words that can appear inside a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Function,
    Global,
    Constant,
    Define,
    Return,
    Call,
    Jump,
    Break,
    Continue,
    If,
    Else,
    While,
    For,
}

impl Keyword {
    pub fn from_name(name: &str) -> Option<Keyword> {
        let keyword = match name {
            "function" => Keyword::Function,
            "global" => Keyword::Global,
            "constant" => Keyword::Constant,
            "define" => Keyword::Define,
            "return" => Keyword::Return,
            "call" => Keyword::Call,
            "jump" => Keyword::Jump,
            "break" => Keyword::Break,
            "continue" => Keyword::Continue,
            "if" => Keyword::If,
            "else" => Keyword::Else,
            "while" => Keyword::While,
            "for" => Keyword::For,
            _ => return None,
        };
        Some(keyword)
    }

    pub fn name(self) -> &'static str {
        match self {
            Keyword::Function => "function",
            Keyword::Global => "global",
            Keyword::Constant => "constant",
            Keyword::Define => "define",
            Keyword::Return => "return",
            Keyword::Call => "call",
            Keyword::Jump => "jump",
            Keyword::Break => "break",
            Keyword::Continue => "continue",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::For => "for",
        }
    }
}

/// Which delimiter pair produced a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParenthesisType {
    Parenthesis,
    Bracket,
}

/// Where a resolved variable lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableLocation {
    Local(LocalVariableId),
    Global(GlobalVariableId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableBinding {
    pub name: String,
    pub data_type: DataType,
    pub location: VariableLocation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    Constant(i64),
    Variable(VariableBinding),
    FunctionCall {
        name: String,
        /// Content of the call's parenthesis group
        arguments: SequenceId,
        /// Selected overload; stays `None` for base calls
        function: Option<FunctionId>,
        is_base_call: bool,
    },
    MemoryAccess {
        address: TokenId,
    },
    Parenthesis {
        kind: ParenthesisType,
        content: SequenceId,
    },
    UnaryOperation {
        operator: Operator,
        argument: TokenId,
        is_postfix: bool,
    },
    BinaryOperation {
        operator: Operator,
        left: TokenId,
        right: TokenId,
    },
    ValueCast {
        argument: TokenId,
    },
}

/// A value-producing token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    pub data_type: Option<DataType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Identifier(String),
    Keyword(Keyword),
    Operator(Operator),
    VarType(DataType),
    CommaSeparated(Vec<SequenceId>),
    Statement(Statement),
}

impl Token {
    /// Integer literal, typed as `const_int` until type assignment binds it
    pub fn constant(value: i64) -> Token {
        Token::statement(StatementKind::Constant(value), Some(DataType::ConstInt))
    }

    pub fn statement(kind: StatementKind, data_type: Option<DataType>) -> Token {
        Token::Statement(Statement { kind, data_type })
    }

    pub fn is_statement(&self) -> bool {
        match self {
            Token::Statement(_) => true,
            Token::Identifier(_)
            | Token::Keyword(_)
            | Token::Operator(_)
            | Token::VarType(_)
            | Token::CommaSeparated(_) => false,
        }
    }

    pub fn as_statement(&self) -> Option<&Statement> {
        match self {
            Token::Statement(statement) => Some(statement),
            _ => None,
        }
    }

    pub fn as_operator(&self) -> Option<Operator> {
        match self {
            Token::Operator(op) => Some(*op),
            _ => None,
        }
    }

    /// Value of a constant that has not been bound to a concrete type yet
    pub fn untyped_constant(&self) -> Option<i64> {
        match self {
            Token::Statement(Statement {
                kind: StatementKind::Constant(value),
                data_type: None | Some(DataType::ConstInt),
            }) => Some(*value),
            _ => None,
        }
    }
}

/// A statement's tokens together with the arena owning them
#[derive(Debug, Clone)]
pub struct TokenList {
    tokens: Arena<Token>,
    sequences: Arena<Sequence>,
    root: SequenceId,
}

impl Default for TokenList {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenList {
    pub fn new() -> Self {
        let mut sequences = Arena::new();
        let root = sequences.alloc(Vec::new());
        TokenList {
            tokens: Arena::new(),
            sequences,
            root,
        }
    }

    pub fn from_tokens(tokens: impl IntoIterator<Item = Token>) -> Self {
        let mut list = TokenList::new();
        for token in tokens {
            list.push(token);
        }
        list
    }

    /// Append a token to the root sequence
    pub fn push(&mut self, token: Token) -> TokenId {
        let id = self.tokens.alloc(token);
        self.sequences[self.root].push(id);
        id
    }

    pub fn root(&self) -> SequenceId {
        self.root
    }

    /// The single statement left at the root after processing
    pub fn root_statement(&self) -> Option<TokenId> {
        match self.sequences[self.root].as_slice() {
            [id] if self.tokens[*id].is_statement() => Some(*id),
            _ => None,
        }
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id]
    }

    pub fn token_mut(&mut self, id: TokenId) -> &mut Token {
        &mut self.tokens[id]
    }

    pub fn statement(&self, id: TokenId) -> Option<&Statement> {
        self.tokens[id].as_statement()
    }

    pub fn data_type_of(&self, id: TokenId) -> Option<DataType> {
        self.statement(id).and_then(|s| s.data_type)
    }

    pub fn sequence(&self, id: SequenceId) -> &[TokenId] {
        &self.sequences[id]
    }

    pub fn len(&self, sequence: SequenceId) -> usize {
        self.sequences[sequence].len()
    }

    pub fn is_empty(&self, sequence: SequenceId) -> bool {
        self.sequences[sequence].is_empty()
    }

    /// Token at `position` of `sequence`
    pub fn at(&self, sequence: SequenceId, position: usize) -> &Token {
        &self.tokens[self.sequences[sequence][position]]
    }

    pub fn id_at(&self, sequence: SequenceId, position: usize) -> TokenId {
        self.sequences[sequence][position]
    }

    pub fn alloc(&mut self, token: Token) -> TokenId {
        self.tokens.alloc(token)
    }

    pub fn new_sequence(&mut self, content: Sequence) -> SequenceId {
        self.sequences.alloc(content)
    }

    /// Put a new node at `position`, dropping the old node from the sequence
    pub fn replace_at(&mut self, sequence: SequenceId, position: usize, token: Token) -> TokenId {
        let id = self.tokens.alloc(token);
        self.sequences[sequence][position] = id;
        id
    }

    pub fn insert(&mut self, sequence: SequenceId, position: usize, token: Token) -> TokenId {
        let id = self.tokens.alloc(token);
        self.sequences[sequence].insert(position, id);
        id
    }

    pub fn erase(&mut self, sequence: SequenceId, position: usize) -> TokenId {
        self.sequences[sequence].remove(position)
    }

    /// Move `count` handles starting at `start` out into a new sequence
    pub fn move_range(&mut self, sequence: SequenceId, start: usize, count: usize) -> SequenceId {
        let moved: Sequence = self.sequences[sequence]
            .drain(start..start + count)
            .collect();
        self.sequences.alloc(moved)
    }

    /// Swap the whole content of `sequence`, returning the old content
    pub fn replace_sequence(&mut self, sequence: SequenceId, content: Sequence) -> Sequence {
        std::mem::replace(&mut self.sequences[sequence], content)
    }

    /// Direct children of a statement node, in evaluation order
    pub fn children(&self, id: TokenId) -> Vec<TokenId> {
        let Some(statement) = self.statement(id) else {
            return Vec::new();
        };
        match &statement.kind {
            StatementKind::Constant(_) | StatementKind::Variable(_) => Vec::new(),
            StatementKind::FunctionCall { arguments, .. } => {
                let mut result = Vec::new();
                for &arg in self.sequence(*arguments) {
                    match self.token(arg) {
                        Token::CommaSeparated(items) => {
                            for &item in items {
                                result.extend_from_slice(self.sequence(item));
                            }
                        }
                        _ => result.push(arg),
                    }
                }
                result
            }
            StatementKind::MemoryAccess { address } => vec![*address],
            StatementKind::Parenthesis { content, .. } => self.sequence(*content).to_vec(),
            StatementKind::UnaryOperation { argument, .. } => vec![*argument],
            StatementKind::BinaryOperation { left, right, .. } => vec![*left, *right],
            StatementKind::ValueCast { argument } => vec![*argument],
        }
    }

    /// Whether every statement reachable from the root has a data type
    pub fn is_fully_typed(&self) -> bool {
        let Some(root) = self.root_statement() else {
            return false;
        };
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            match self.statement(id) {
                Some(statement) if statement.data_type.is_some() => {
                    pending.extend(self.children(id));
                }
                _ => return false,
            }
        }
        true
    }

    /// S-expression dump of the root sequence
    pub fn render(&self) -> String {
        self.render_sequence(self.root)
    }

    pub fn render_sequence(&self, sequence: SequenceId) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_sequence(&mut out, sequence);
        out
    }

    pub fn render_token(&self, id: TokenId) -> String {
        let mut out = String::new();
        let _ = self.write_token(&mut out, id);
        out
    }

    fn write_sequence(&self, out: &mut dyn fmt::Write, sequence: SequenceId) -> fmt::Result {
        for (index, &id) in self.sequence(sequence).iter().enumerate() {
            if index > 0 {
                out.write_char(' ')?;
            }
            self.write_token(out, id)?;
        }
        Ok(())
    }

    fn write_token(&self, out: &mut dyn fmt::Write, id: TokenId) -> fmt::Result {
        match self.token(id) {
            Token::Identifier(name) => write!(out, "{}", name),
            Token::Keyword(keyword) => write!(out, "{}", keyword.name()),
            Token::Operator(op) => write!(out, "{}", op),
            Token::VarType(data_type) => write!(out, "{}", data_type),
            Token::CommaSeparated(items) => {
                out.write_char('{')?;
                for (index, &item) in items.iter().enumerate() {
                    if index > 0 {
                        out.write_str(", ")?;
                    }
                    self.write_sequence(out, item)?;
                }
                out.write_char('}')
            }
            Token::Statement(statement) => match &statement.kind {
                StatementKind::Constant(value) => write!(out, "{}", value),
                StatementKind::Variable(binding) => write!(out, "{}", binding.name),
                StatementKind::FunctionCall { name, .. } => {
                    write!(out, "(call {}", name)?;
                    for arg in self.children(id) {
                        out.write_char(' ')?;
                        self.write_token(out, arg)?;
                    }
                    out.write_char(')')
                }
                StatementKind::MemoryAccess { address } => {
                    let data_type = statement.data_type.map(|t| t.name()).unwrap_or("?");
                    write!(out, "{}[", data_type)?;
                    self.write_token(out, *address)?;
                    out.write_char(']')
                }
                StatementKind::Parenthesis { kind, content } => {
                    let label = match kind {
                        ParenthesisType::Parenthesis => "group",
                        ParenthesisType::Bracket => "bracket",
                    };
                    write!(out, "({} ", label)?;
                    self.write_sequence(out, *content)?;
                    out.write_char(')')
                }
                StatementKind::UnaryOperation {
                    operator,
                    argument,
                    is_postfix,
                } => {
                    let prefix = if *is_postfix { "post" } else { "" };
                    write!(out, "({}{} ", prefix, operator)?;
                    self.write_token(out, *argument)?;
                    out.write_char(')')
                }
                StatementKind::BinaryOperation {
                    operator,
                    left,
                    right,
                } => {
                    write!(out, "({} ", operator)?;
                    self.write_token(out, *left)?;
                    out.write_char(' ')?;
                    self.write_token(out, *right)?;
                    out.write_char(')')
                }
                StatementKind::ValueCast { argument } => {
                    let data_type = statement.data_type.map(|t| t.name()).unwrap_or("?");
                    write!(out, "({} ", data_type)?;
                    self.write_token(out, *argument)?;
                    out.write_char(')')
                }
            },
        }
    }
}

impl fmt::Display for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_sequence(f, self.root)
    }
}
