//! `syncc` — the command-line driver for the Syn compiler.
//!
//! ```text
//! syncc build <file> -o <output.ll>
//! syncc test
//! ```
//!
//! This binary is a thin shim: read the file, run lex → parse → lower →
//! emit, and report whichever phase's error type fires first. All
//! language semantics live in the `synlang` library crate.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use clap::{Parser as ClapParser, Subcommand};
use inkwell::context::Context;

use synlang::codegen::{Codegen, CodegenError};
use synlang::diagnostics::report_error;
use synlang::lexer::{LexError, Lexer};
use synlang::parser::{ParseError, Parser};
use synlang::token::Span;

#[derive(ClapParser)]
#[command(name = "syncc")]
#[command(about = "The Syn programming language compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a Syn source file to textual LLVM IR.
    Build {
        /// The source file to compile.
        file: String,
        /// Path of the `.ll` file to write.
        #[arg(short = 'o', long = "output")]
        output: String,
    },
    /// Run the internal scenario test harness.
    Test,
}

/// Unifies the four phases' error types so the driver can report any
/// of them through one diagnostic path.
enum DriverError {
    Io(String),
    Lex(LexError),
    Parse(ParseError),
    Codegen(CodegenError),
}

impl DriverError {
    fn message(&self) -> String {
        match self {
            DriverError::Io(msg) => msg.clone(),
            DriverError::Lex(e) => e.message.clone(),
            DriverError::Parse(e) => e.message.clone(),
            DriverError::Codegen(e) => e.message.clone(),
        }
    }

    fn span(&self) -> Option<&Span> {
        match self {
            DriverError::Io(_) => None,
            DriverError::Lex(e) => Some(&e.span),
            DriverError::Parse(e) => Some(&e.span),
            DriverError::Codegen(e) => e.span.as_ref(),
        }
    }
}

impl From<LexError> for DriverError {
    fn from(e: LexError) -> Self {
        DriverError::Lex(e)
    }
}

impl From<ParseError> for DriverError {
    fn from(e: ParseError) -> Self {
        DriverError::Parse(e)
    }
}

impl From<CodegenError> for DriverError {
    fn from(e: CodegenError) -> Self {
        DriverError::Codegen(e)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { file, output } => match build(&file, &output) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                let source = std::fs::read_to_string(&file).unwrap_or_default();
                report_error(&file, &source, &e.message(), e.span());
                ExitCode::FAILURE
            }
        },
        Commands::Test => {
            if run_test_harness() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

/// Compiles `file` to textual LLVM IR at `output`. No object file is written and nothing is linked: this
/// repository's scope ends at emitted IR text.
fn build(file: &str, output: &str) -> Result<(), DriverError> {
    let source = std::fs::read_to_string(file).map_err(|e| DriverError::Io(format!("cannot open input '{file}': {e}")))?;
    let context = Context::create();
    let output_path = Path::new(output);
    compile_source(&source, file, "syn_module", &context, output_path)
}

/// Runs the full pipeline for one source buffer, writing the resulting
/// IR to `output_path`.
fn compile_source(
    source: &str,
    filename: &str,
    module_name: &str,
    context: &Context,
    output_path: &Path,
) -> Result<(), DriverError> {
    let file_rc = Rc::new(PathBuf::from(filename));
    let file_span = Span::synthetic(file_rc.clone());

    let mut lexer = Lexer::new(source, file_rc);
    let tokens = lexer.tokenize()?;

    let mut parser = Parser::new(tokens);
    let program = parser.parse()?;
    let registry = parser.into_registry();

    let mut codegen = Codegen::new(context, module_name, &registry);
    codegen.compile(&program, &file_span)?;
    codegen.emit(output_path, &file_span)?;
    Ok(())
}

/// One end-to-end scenario or boundary case. `expect_error` is `None`
/// for programs that must compile cleanly, `Some(needle)` for programs
/// whose rejection message must contain `needle`.
struct Scenario {
    name: &'static str,
    source: &'static str,
    expect_error: Option<&'static str>,
}

const SCENARIOS: &[Scenario] = &[
    Scenario { name: "arithmetic precedence", source: "fnc main(): i32 { ret 2 + 3 * 4; }", expect_error: None },
    Scenario {
        name: "while loop counter",
        source: "fnc main(): i32 { x : i32; x = 0; while x < 5 { x = x + 1; } ret x; }",
        expect_error: None,
    },
    Scenario {
        name: "array literal indexing",
        source: "fnc main(): i32 { a : i32[3] = [1, 2, 3]; ret a[2]; }",
        expect_error: None,
    },
    Scenario {
        name: "dynamic allocation through a pointer",
        source: "fnc main(): i32 { p : ptr<i32>; p = alloc_dyn_arr(4); p[0] = 7; ret p[0]; }",
        expect_error: None,
    },
    Scenario {
        name: "if/elif/else over get_num",
        source: "fnc main(): i32 { x : i32 = get_num(); if x > 0 { ret 1; } elif x == 0 { ret 0; } else { ret -1; } }",
        expect_error: None,
    },
    Scenario {
        name: "struct member access",
        source: "struct P { x : i32; y : i32; } fnc main(): i32 { q : P; q.x = 3; q.y = 4; ret q.x + q.y; }",
        expect_error: None,
    },
    Scenario {
        name: "break outside a loop is rejected",
        source: "fnc main(): i32 { brk; ret 0; }",
        expect_error: Some("outside of loop"),
    },
    Scenario {
        name: "calling an undeclared function is rejected",
        source: "fnc main(): i32 { ret nope(); }",
        expect_error: Some("Cannot call undeclared function"),
    },
    Scenario {
        name: "double pointer parameter",
        source: "fnc take(p: ptr<ptr<i32>>): i32 { ret 0; }",
        expect_error: None,
    },
];

/// Compiles every scenario in-memory, discarding the emitted IR, and
/// reports pass/fail for each. Returns `true` iff all scenarios behaved
/// as expected.
fn run_test_harness() -> bool {
    let dir = match tempfile::tempdir() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("cannot create scratch directory for the test harness: {e}");
            return false;
        }
    };

    let mut all_ok = true;
    for (i, scenario) in SCENARIOS.iter().enumerate() {
        let context = Context::create();
        let output_path = dir.path().join(format!("scenario_{i}.ll"));
        let result = compile_source(scenario.source, "<test>", "test_module", &context, &output_path);

        let ok = match (&result, scenario.expect_error) {
            (Ok(()), None) => true,
            (Err(e), Some(needle)) => e.message().contains(needle),
            _ => false,
        };

        println!("[{}] {}", if ok { "ok" } else { "FAIL" }, scenario.name);
        if !ok {
            if let Err(e) = &result {
                println!("    -> {}", e.message());
            }
            all_ok = false;
        }
    }
    all_ok
}
