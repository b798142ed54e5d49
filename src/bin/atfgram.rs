//! Command-line interface for atfgram
//!
//! Usage:
//!   atfgram parse `<path>` --flavor `<name>` [--format `<format>`]  - Parse a document line by line
//!   atfgram resolve --flavor `<name>`                             - Print the resolved flavor grammar
//!   atfgram check --flavor `<name>`                               - Run static analysis on a flavor
//!   atfgram flavors                                             - List declared flavors

use atfgram::compiling::{analyze, compile, CompiledGrammar};
use atfgram::composing::{resolve, FlavorManifest, ModuleLoader, ResolvedGrammar};
use atfgram::formats::FormatRegistry;
use atfgram::parsing::{parse_document, LineOutcome};
use clap::{Arg, Command};
use std::path::Path;
use std::process;

fn main() {
    let grammar_dir_arg = Arg::new("grammar-dir")
        .long("grammar-dir")
        .short('g')
        .help("Directory containing .atfg modules and flavors.yaml")
        .default_value("grammars");
    let flavor_arg = Arg::new("flavor")
        .long("flavor")
        .short('F')
        .help("Flavor to resolve from the manifest")
        .required(true);

    let matches = Command::new("atfgram")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Composable grammar tooling for ATF transliteration dialects")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("parse")
                .about("Parse a document line by line against a flavor grammar")
                .arg(
                    Arg::new("path")
                        .help("Path to the document to parse")
                        .required(true)
                        .index(1),
                )
                .arg(flavor_arg.clone())
                .arg(grammar_dir_arg.clone())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Tree output format (tag, treeviz, json)")
                        .default_value("treeviz"),
                ),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve a flavor and print the merged grammar")
                .arg(flavor_arg.clone())
                .arg(grammar_dir_arg.clone())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the resolved grammar as JSON")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Run static analysis on a resolved flavor")
                .arg(flavor_arg)
                .arg(grammar_dir_arg.clone()),
        )
        .subcommand(
            Command::new("flavors")
                .about("List flavors declared in the manifest")
                .arg(grammar_dir_arg),
        )
        .get_matches();

    let result = match matches.subcommand() {
        Some(("parse", sub)) => handle_parse(
            sub.get_one::<String>("path").unwrap(),
            sub.get_one::<String>("flavor").unwrap(),
            sub.get_one::<String>("grammar-dir").unwrap(),
            sub.get_one::<String>("format").unwrap(),
        ),
        Some(("resolve", sub)) => handle_resolve(
            sub.get_one::<String>("flavor").unwrap(),
            sub.get_one::<String>("grammar-dir").unwrap(),
            sub.get_flag("json"),
        ),
        Some(("check", sub)) => handle_check(
            sub.get_one::<String>("flavor").unwrap(),
            sub.get_one::<String>("grammar-dir").unwrap(),
        ),
        Some(("flavors", sub)) => {
            handle_flavors(sub.get_one::<String>("grammar-dir").unwrap())
        }
        _ => unreachable!(),
    };

    if let Err(message) = result {
        eprintln!("error: {message}");
        process::exit(1);
    }
}

/// Resolve a flavor from the grammar directory.
fn load_flavor_grammar(grammar_dir: &str, flavor: &str) -> Result<ResolvedGrammar, String> {
    let manifest_path = Path::new(grammar_dir).join(atfgram::composing::manifest::MANIFEST_FILE);
    let manifest = FlavorManifest::load(&manifest_path).map_err(|error| error.to_string())?;
    let spec = manifest.flavor(flavor).map_err(|error| error.to_string())?;

    let loader = ModuleLoader::new(grammar_dir);
    let modules = loader.load_flavor(spec).map_err(|error| error.to_string())?;
    resolve(&modules).map_err(|error| error.to_string())
}

fn compile_flavor(grammar_dir: &str, flavor: &str) -> Result<CompiledGrammar, String> {
    let resolved = load_flavor_grammar(grammar_dir, flavor)?;
    compile(&resolved).map_err(|error| error.to_string())
}

fn handle_parse(
    path: &str,
    flavor: &str,
    grammar_dir: &str,
    format: &str,
) -> Result<(), String> {
    let grammar = compile_flavor(grammar_dir, flavor)?;
    let registry = FormatRegistry::with_defaults();
    if registry.get(format).is_none() {
        return Err(format!(
            "format '{format}' not found; available: {}",
            registry.list_formats().join(", ")
        ));
    }

    let source = std::fs::read_to_string(path)
        .map_err(|error| format!("failed to read {path}: {error}"))?;
    let document = parse_document(&grammar, &source);

    for line in &document.lines {
        match &line.outcome {
            LineOutcome::Blank => {}
            LineOutcome::Parsed(tree) => {
                println!("line {}: {}", line.number, line.text);
                let rendered = registry
                    .serialize(tree, format)
                    .map_err(|error| error.to_string())?;
                println!("{rendered}");
                println!();
            }
            LineOutcome::Failed(failure) => {
                println!("line {}: {}", line.number, line.text);
                println!("cannot parse: {failure}");
                println!();
            }
        }
    }

    println!(
        "{} lines parsed, {} failed",
        document.parsed_count(),
        document.failed_count()
    );
    Ok(())
}

fn handle_resolve(flavor: &str, grammar_dir: &str, json: bool) -> Result<(), String> {
    let grammar = load_flavor_grammar(grammar_dir, flavor)?;
    if json {
        let rendered =
            serde_json::to_string_pretty(&grammar).map_err(|error| error.to_string())?;
        println!("{rendered}");
    } else {
        print!("{grammar}");
    }
    Ok(())
}

fn handle_check(flavor: &str, grammar_dir: &str) -> Result<(), String> {
    let grammar = load_flavor_grammar(grammar_dir, flavor)?;
    // Compile so bad terminal patterns surface as check failures too.
    compile(&grammar).map_err(|error| error.to_string())?;

    let report = analyze(&grammar);
    if report.is_clean() {
        println!(
            "{flavor}: ok ({} rules, {} terminals)",
            grammar.rules().len(),
            grammar.terminals().len()
        );
    } else {
        for warning in &report.warnings {
            println!("warning: {warning}");
        }
        println!("{flavor}: {} warning(s)", report.warnings.len());
    }
    Ok(())
}

fn handle_flavors(grammar_dir: &str) -> Result<(), String> {
    let manifest_path = Path::new(grammar_dir).join(atfgram::composing::manifest::MANIFEST_FILE);
    let manifest = FlavorManifest::load(&manifest_path).map_err(|error| error.to_string())?;

    for name in manifest.names() {
        let spec = manifest.flavor(name).map_err(|error| error.to_string())?;
        if spec.extensions.is_empty() {
            println!("{name}: base={}", spec.base);
        } else {
            println!("{name}: base={} + {}", spec.base, spec.extensions.join(", "));
        }
    }
    Ok(())
}
