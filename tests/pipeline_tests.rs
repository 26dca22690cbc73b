// Integration tests for the token pipeline

use exprforge::compiler::errors::CompileError;
use exprforge::compiler::operators::Operator;
use exprforge::compiler::processing::TokenProcessor;
use exprforge::compiler::token::{StatementKind, Token, TokenList};
use exprforge::program::globals::{Function, GlobalsLookup, Parameter};
use exprforge::program::scope::FunctionScope;
use exprforge::program::types::DataType;

fn globals() -> GlobalsLookup {
    let mut globals = GlobalsLookup::new();
    globals.add_global_variable("frame", DataType::U32);
    globals.add_global_variable("speed", DataType::S16);
    globals.add_global_variable("flags", DataType::U8);
    globals.add_function(Function::new(
        "clamp",
        vec![
            Parameter::new("value", DataType::S32),
            Parameter::new("low", DataType::S32),
            Parameter::new("high", DataType::S32),
        ],
        DataType::S32,
    ));
    globals.add_function(Function::new("random", vec![], DataType::U32));
    globals
}

fn scope() -> FunctionScope {
    FunctionScope::new(Function::new(
        "onUpdate",
        vec![Parameter::new("delta", DataType::U16)],
        DataType::Void,
    ))
}

fn compile_with(
    globals: &GlobalsLookup,
    scope: &mut FunctionScope,
    source: &str,
    result_type: Option<DataType>,
) -> Result<TokenList, CompileError> {
    let mut tokens = TokenList::parse(source).expect("Lexing failed");
    TokenProcessor::new(globals, scope).process_tokens(&mut tokens, 10, result_type)?;
    Ok(tokens)
}

fn compile(source: &str) -> Result<TokenList, CompileError> {
    compile_with(&globals(), &mut scope(), source, None)
}

fn render(source: &str) -> String {
    let tokens = compile(source).expect("Compilation failed");
    assert!(tokens.is_fully_typed(), "untyped node in {}", tokens.render());
    tokens.render()
}

fn root_type(tokens: &TokenList) -> DataType {
    tokens
        .data_type_of(tokens.root_statement().expect("No root statement"))
        .expect("Root not typed")
}

#[test]
fn test_multiplication_binds_tighter() {
    assert_eq!(render("frame + frame * 3"), "(+ frame (* frame (u32 3)))");
}

#[test]
fn test_assignment_is_right_associative() {
    let rendered = render("u32 a = u32 b = frame");
    assert_eq!(rendered, "(= a (= b frame))");
}

#[test]
fn test_subtraction_is_left_associative() {
    assert_eq!(render("frame - 1 - 2"), "(- (- frame (u32 1)) (u32 2))");
}

#[test]
fn test_constant_folding_wraps_and_ignores_division_by_zero() {
    let tokens = compile("frame = 10 / 0 + 0x7fffffffffffffff + 1").unwrap();
    assert_eq!(tokens.render(), "(= frame -9223372036854775808)");

    assert_eq!(render("frame = 7 % 0"), "(= frame 0)");
    assert_eq!(render("frame = 1 << 4 >> 2"), "(= frame 4)");
}

#[test]
fn test_folded_constant_adopts_expected_type() {
    let globals = globals();
    let mut scope = scope();
    let tokens = compile_with(&globals, &mut scope, "(2 + 3) * 4", Some(DataType::S16)).unwrap();
    assert_eq!(tokens.render(), "(* (group 5) 4)");
    assert_eq!(root_type(&tokens), DataType::S16);
}

#[test]
fn test_mismatched_delimiters() {
    for source in ["(frame]", "(frame", "frame)", "u8[frame)"] {
        let err = compile(source).unwrap_err();
        assert!(
            matches!(err, CompileError::Structure { line: 10, .. }),
            "{}: {:?}",
            source,
            err
        );
    }
}

#[test]
fn test_function_call_with_comma_list() {
    let tokens = compile("s32 x = clamp(speed * 2, -8, delta)").unwrap();
    assert_eq!(root_type(&tokens), DataType::S32);
    assert!(tokens.is_fully_typed());

    let call = tokens
        .sequence(tokens.root())
        .iter()
        .map(|&id| tokens.render_token(id))
        .collect::<Vec<_>>()
        .join(" ");
    assert_eq!(call, "(= x (call clamp (* speed (s16 2)) (- 8) delta))");
}

#[test]
fn test_call_without_arguments() {
    let tokens = compile("random() + 1").unwrap();
    assert_eq!(tokens.render(), "(+ (call random) (u32 1))");
    assert_eq!(root_type(&tokens), DataType::U32);
}

#[test]
fn test_overload_resolution_prefers_smaller_upcast() {
    let mut globals = globals();
    globals.add_function(Function::new(
        "scale",
        vec![Parameter::new("v", DataType::S64)],
        DataType::S64,
    ));
    let narrow = globals.add_function(Function::new(
        "scale",
        vec![Parameter::new("v", DataType::S32)],
        DataType::S32,
    ));

    let tokens = compile_with(&globals, &mut scope(), "scale(delta)", None).unwrap();
    let root = tokens.statement(tokens.root_statement().unwrap()).unwrap();
    match &root.kind {
        StatementKind::FunctionCall {
            function,
            is_base_call,
            ..
        } => {
            assert_eq!(*function, Some(narrow));
            assert!(!is_base_call);
        }
        other => panic!("Expected function call, got {:?}", other),
    }
    assert_eq!(root.data_type, Some(DataType::S32));
}

#[test]
fn test_comma_inside_memory_access_is_rejected() {
    let err = compile("u8[frame, 4]").unwrap_err();
    assert!(matches!(err, CompileError::Grammar { .. }));
    assert_eq!(err.message(), "Expected statement token inside brackets");
}

#[test]
fn test_memory_access_with_computed_address() {
    let tokens = compile("u16[frame + 2] = delta").unwrap();
    assert_eq!(tokens.render(), "(= u16[(+ frame 2)] delta)");
}

#[test]
fn test_explicit_cast() {
    let tokens = compile("u8(frame)").unwrap();
    assert_eq!(root_type(&tokens), DataType::U8);
    assert_eq!(tokens.render(), "(u8 (group frame))");
}

#[test]
fn test_comparison_and_ternary() {
    let tokens = compile("speed < 0 ? flags : 1").unwrap();
    assert_eq!(root_type(&tokens), DataType::U8);

    let tokens = compile("frame >= delta").unwrap();
    assert_eq!(root_type(&tokens), DataType::Bool);
    assert_eq!(tokens.render(), "(>= frame (u32 delta))");

    // Logical operators share the integer signatures
    let tokens = compile("frame == delta && flags != 0").unwrap();
    assert_eq!(root_type(&tokens), DataType::S8);
}

#[test]
fn test_postfix_and_prefix_increment() {
    let tokens = compile("frame++").unwrap();
    let root = tokens.statement(tokens.root_statement().unwrap()).unwrap();
    assert!(matches!(
        root.kind,
        StatementKind::UnaryOperation {
            operator: Operator::UnaryIncrement,
            is_postfix: true,
            ..
        }
    ));

    let tokens = compile("--frame").unwrap();
    let root = tokens.statement(tokens.root_statement().unwrap()).unwrap();
    assert!(matches!(
        root.kind,
        StatementKind::UnaryOperation {
            operator: Operator::UnaryDecrement,
            is_postfix: false,
            ..
        }
    ));
}

#[test]
fn test_defines_are_substituted() {
    let mut globals = globals();
    let limit = TokenList::parse("(frame + 16)").unwrap();
    let content: Vec<Token> = limit
        .sequence(limit.root())
        .iter()
        .map(|&id| limit.token(id).clone())
        .collect();
    globals.add_define("LIMIT", content);

    let tokens = compile_with(&globals, &mut scope(), "LIMIT * 2", None).unwrap();
    assert_eq!(tokens.render(), "(* (group (+ frame (u32 16))) (u32 2))");
}

#[test]
fn test_declarations_and_scopes() {
    let globals = globals();
    let mut scope = scope();

    compile_with(&globals, &mut scope, "s8 step = 1", None).unwrap();
    let err = compile_with(&globals, &mut scope, "s8 step = 2", None).unwrap_err();
    assert_eq!(err.message(), "Variable name already used");

    scope.push_scope();
    compile_with(&globals, &mut scope, "u32 inner = step", None).unwrap();
    scope.pop_scope();

    let err = compile_with(&globals, &mut scope, "inner + 1", None).unwrap_err();
    assert!(matches!(err, CompileError::Resolution { .. }));
    assert_eq!(err.message(), "Unable to resolve identifier: inner");

    let err = compile_with(&globals, &mut scope, "void nothing", None).unwrap_err();
    assert!(matches!(err, CompileError::Declaration { .. }));
}

#[test]
fn test_local_shadows_global() {
    let globals = globals();
    let mut scope = scope();
    let tokens = compile_with(&globals, &mut scope, "u64 frame = 1", None).unwrap();
    assert_eq!(tokens.render(), "(= frame 1)");

    let tokens = compile_with(&globals, &mut scope, "frame", None).unwrap();
    assert_eq!(root_type(&tokens), DataType::U64);
}

#[test]
fn test_base_call() {
    let tokens = compile("base.onUpdate(delta)").unwrap();
    let root = tokens.statement(tokens.root_statement().unwrap()).unwrap();
    assert!(matches!(
        root.kind,
        StatementKind::FunctionCall {
            function: None,
            is_base_call: true,
            ..
        }
    ));
    assert_eq!(root.data_type, Some(DataType::Void));
}

#[test]
fn test_unknown_names() {
    let err = compile("teleport(1)").unwrap_err();
    assert_eq!(err.message(), "Unknown function name 'teleport'");

    let err = compile("frame + ghost").unwrap_err();
    assert_eq!(err.to_string(), "Resolution error at line 10: Unable to resolve identifier: ghost");
}

#[test]
fn test_grammar_errors() {
    assert_eq!(
        compile("frame = ;").unwrap_err().message(),
        "Semicolon ; is only allowed in for-loops"
    );
    assert_eq!(
        compile("frame +").unwrap_err().message(),
        "Binary operator + is not allowed here"
    );
    assert_eq!(
        compile("frame = !").unwrap_err().message(),
        "Unary operator not allowed as last"
    );
    assert_eq!(
        compile("frame flags").unwrap_err().message(),
        "Statement does not form a single expression"
    );
}

#[test]
fn test_type_errors() {
    let mut globals = globals();
    globals.add_function(Function::new("reset", vec![], DataType::Void));

    let err = compile_with(&globals, &mut scope(), "frame = reset()", None).unwrap_err();
    assert!(matches!(err, CompileError::Type { .. }));

    let err = compile_with(&globals, &mut scope(), "clamp(1, 2)", None).unwrap_err();
    assert!(err.message().starts_with("No appropriate function overload found calling 'clamp'"));
}
