// exprforge: typed expression compiler driver

use std::fs;
use std::path::Path;

use exprforge::script::{compile_statement, Script};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        let program_name = args.first().map(|s| s.as_str()).unwrap_or("exprforge");
        eprintln!("Error: No input file provided");
        eprintln!();
        eprintln!("Usage: {} <script>", program_name);
        eprintln!();
        eprintln!("Script lines are either directives or statements:");
        eprintln!("  #define NAME tokens...         textual replacement");
        eprintln!("  #global TYPE NAME              global variable");
        eprintln!("  #function RET NAME(TYPE, ...)  function overload");
        eprintln!("  u16 x = frame + 1              statement, compiled in order");
        std::process::exit(1);
    }

    let script_file = &args[1];

    if !Path::new(script_file).exists() {
        eprintln!("Error: File '{}' not found", script_file);
        std::process::exit(1);
    }

    // Read declarations and statements
    let source = fs::read_to_string(script_file)?;
    eprintln!("Reading {}...", script_file);
    let script = match Script::parse(&source) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    eprintln!("Compiling {} statements...", script.statements.len());

    // Locals declared by one statement stay visible to the following ones
    let mut scope = Script::main_scope();
    let mut failures = 0;
    for statement in &script.statements {
        match compile_statement(&script.globals, &mut scope, statement) {
            Ok(tokens) => {
                let data_type = tokens
                    .root_statement()
                    .and_then(|id| tokens.data_type_of(id))
                    .map(|t| t.name())
                    .unwrap_or("?");
                println!("{:>4}: {} : {}", statement.line, tokens.render(), data_type);
            }
            Err(e) => {
                eprintln!("{}", e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        eprintln!("{} of {} statements failed.", failures, script.statements.len());
        std::process::exit(1);
    }

    eprintln!("All statements compiled successfully.");
    Ok(())
}
