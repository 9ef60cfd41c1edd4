mod error;
mod test_runner;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use serde::Serialize;

use markdown_flow::block::{Block, BlockType};
use markdown_flow::parser::inline::parse_interaction_block;
use markdown_flow::{Document, Interaction, Variables};

use crate::error::CliError;

const SUBCOMMANDS: &[&str] = &["parse", "check", "render", "test", "help"];

#[derive(Parser)]
#[command(name = "mdflow", version, about = "MarkdownFlow document parser")]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List a document's blocks and the variables it references
    Parse(ParseArgs),

    /// Report authoring problems in a document
    Check(CheckArgs),

    /// Print blocks with variables resolved
    Render(RenderArgs),

    /// Run .test.md test files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct ParseArgs {
    /// MarkdownFlow source file
    file: PathBuf,

    /// Emit JSON instead of a listing
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// MarkdownFlow source file
    file: PathBuf,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// MarkdownFlow source file
    file: PathBuf,

    /// TOML file of variable values (`name = "value"`)
    #[arg(long)]
    vars: Option<PathBuf>,

    /// Set a variable, overriding --vars. Repeatable.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    assignments: Vec<String>,

    /// Render only this block index
    #[arg(long)]
    block: Option<usize>,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.md file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    // `mdflow file.md` works like `mdflow parse file.md`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(pos) = args
        .iter()
        .skip(1)
        .position(|a| !a.starts_with('-'))
        .map(|i| i + 1)
    {
        if !SUBCOMMANDS.contains(&args[pos].as_str()) {
            args.insert(pos, "parse".to_string());
        }
    }

    let cli = Cli::parse_from(&args);
    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let result = match cli.command {
        Command::Parse(parse_args) => do_parse(parse_args),
        Command::Check(check_args) => do_check(check_args, color_choice),
        Command::Render(render_args) => do_render(render_args),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    };

    match result {
        Ok(code) => process::exit(code),
        Err(error) => {
            eprintln!("error: {}", error);
            process::exit(1);
        }
    }
}

fn read_source(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::ReadSource {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_file(path: &Path) -> Result<Document, CliError> {
    let source = read_source(path)?;
    let document = markdown_flow::Parser::new(source, 0).parse();
    log::info!(
        "{}: {} block(s), {} variable(s)",
        path.display(),
        document.blocks.len(),
        document.variables.len()
    );
    Ok(document)
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ParsedBlock<'a> {
    index: usize,
    block_type: BlockType,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    interaction: Option<Interaction>,
}

#[derive(Serialize)]
struct ParseOutput<'a> {
    blocks: Vec<ParsedBlock<'a>>,
    variables: &'a [String],
}

fn do_parse(args: ParseArgs) -> Result<i32, CliError> {
    let document = parse_file(&args.file)?;

    if args.json {
        let output = ParseOutput {
            blocks: document.blocks.iter().map(describe_block).collect(),
            variables: &document.variables,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(0);
    }

    for block in &document.blocks {
        println!("[{}] {:<17} {}", block.index, block.block_type, block.first_line());
    }
    if document.variables.is_empty() {
        println!("variables: (none)");
    } else {
        println!("variables: {}", document.variables.join(", "));
    }
    Ok(0)
}

fn describe_block(block: &Block) -> ParsedBlock<'_> {
    let interaction = (block.block_type == BlockType::Interaction)
        .then(|| parse_interaction_block(&block.content).interaction);
    ParsedBlock {
        index: block.index,
        block_type: block.block_type,
        content: &block.content,
        interaction,
    }
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

fn do_check(args: CheckArgs, color_choice: ColorChoice) -> Result<i32, CliError> {
    let source = read_source(&args.file)?;

    let mut files = SimpleFiles::new();
    let file_id = files.add(args.file.display().to_string(), source.clone());

    let diagnostics = markdown_flow::Parser::new(source, file_id).diagnostics();

    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    for diagnostic in &diagnostics {
        let _ = term::emit_to_write_style(
            &mut writer.lock(),
            &config,
            &files,
            &diagnostic.to_diagnostic(),
        );
    }

    if diagnostics.iter().any(|d| d.is_error()) {
        return Ok(1);
    }
    eprintln!("ok: {} parsed cleanly", args.file.display());
    Ok(0)
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

fn do_render(args: RenderArgs) -> Result<i32, CliError> {
    let document = parse_file(&args.file)?;
    let variables = load_variables(args.vars.as_deref(), &args.assignments)?;

    let rendered: Vec<String> = match args.block {
        Some(index) => {
            let block = document
                .render_block(index, &variables)
                .ok_or(CliError::BlockOutOfRange {
                    index,
                    count: document.blocks.len(),
                })?;
            vec![block]
        }
        None => document
            .blocks
            .iter()
            .map(|block| markdown_flow::process_block_content(block, &variables))
            .collect(),
    };

    println!("{}", rendered.join("\n---\n"));
    Ok(0)
}

/// Variables from the `--vars` file, overlaid with `--set` assignments.
fn load_variables(path: Option<&Path>, assignments: &[String]) -> Result<Variables, CliError> {
    let mut variables = match path {
        Some(path) => {
            let content = read_source(path)?;
            toml::from_str(&content).map_err(|source| CliError::ParseVariables {
                path: path.to_path_buf(),
                source,
            })?
        }
        None => Variables::new(),
    };

    for assignment in assignments {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| CliError::InvalidAssignment(assignment.clone()))?;
        variables.insert(name.trim(), value);
    }

    Ok(variables)
}
