//! Minimal CLI: infer a schema from an example, or check instances against one.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;

use crate::inference;
use crate::matcher::Validator;
use crate::options::ValidatorOptions;
use crate::predicates;
use crate::schema::SchemaNode;
use crate::value::Instance;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer structural schemas from example JSON and check instances against them
#[derive(Parser, Debug)]
#[command(name = "json-shape")]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer a schema document from one example instance
    Schema(SchemaOut),
    /// strict check: each instance must have exactly the schema's shape
    Check(CheckIn),
    /// recursive validation with key reconciliation and predicates
    Validate(ValidateIn),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct OptionSettings {
    /// JSON options file ({"max_size_in_bytes": .., "loosely_typed": ..})
    #[arg(long)]
    config: Option<PathBuf>,

    /// reject payloads larger than this many bytes (0 disables)
    #[arg(long)]
    max_size: Option<usize>,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct CheckIn {
    /// schema document (.json)
    #[arg(short, long)]
    schema: PathBuf,

    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    option_settings: OptionSettings,
}

#[derive(clap::Parser, Debug)]
struct ValidateIn {
    /// schema document (.json); `"@email"`, `"@uri"` and `"@non_empty"` are available
    #[arg(short, long)]
    schema: PathBuf,

    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    option_settings: OptionSettings,

    /// only reconcile key sets; skip type and predicate checks
    #[arg(long, default_value_t = false)]
    loosely_typed: bool,
}

/// One input document, kept as text unless a pointer forced a parse.
struct Loaded {
    label: String,
    source: Source,
}

enum Source {
    Text(String),
    Value(Value),
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Loaded {
    fn instance(&self) -> Instance<'_> {
        match &self.source {
            Source::Text(s) => Instance::Text(s),
            Source::Value(v) => Instance::Value(v),
        }
    }
}

impl InputSettings {
    fn load(&self) -> Result<Vec<Loaded>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut out = Vec::with_capacity(source_paths.len());
        for source_path in source_paths {
            let label = source_path.to_string_lossy().to_string();
            let text = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({label})"))?;
            let source = match self.json_pointer.as_deref() {
                None => Source::Text(text),
                Some(pointer) => {
                    let json_value = serde_json::from_str::<Value>(&text)
                        .with_context(|| format!("failed to parse JSON source file ({label})"))?;
                    let selected = json_value
                        .pointer(pointer)
                        .cloned()
                        .ok_or_else(|| anyhow!("JSON pointer {pointer} selects nothing in {label}"))?;
                    Source::Value(selected)
                }
            };
            tracing::debug!(%label, "loaded input");
            out.push(Loaded { label, source });
        }
        Ok(out)
    }
}

impl OptionSettings {
    fn resolve(&self, loosely_typed: bool) -> Result<ValidatorOptions> {
        let base = match self.config.as_deref() {
            Some(path) => ValidatorOptions::load(path)?,
            None => ValidatorOptions::default(),
        };
        Ok(base.merged(self.max_size, loosely_typed))
    }

    /// Options for `check`, which compares shapes exactly and has no loose mode.
    fn resolve_strict(&self) -> Result<ValidatorOptions> {
        let mut options = self.resolve(false)?;
        if options.loosely_typed {
            tracing::warn!("`loosely_typed` has no effect on `check`; shapes are compared exactly");
            options.loosely_typed = false;
        }
        Ok(options)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Schema(target) => {
                let inputs = target.input_settings.load()?;
                let [input] = inputs.as_slice() else {
                    bail!("schema inference takes exactly one instance, got {}", inputs.len());
                };
                let schema = inference::create_schema(input.instance())
                    .with_context(|| format!("failed to infer a schema from {}", input.label))?;
                let schema_src = serde_json::to_string_pretty(&schema.to_json())?;
                match target.out.as_ref() {
                    Some(out) => write_output(out, &schema_src)?,
                    None => println!("{schema_src}"),
                }
                Ok(ExitCode::SUCCESS)
            }
            Command::Check(target) => {
                let schema = load_schema(&target.schema)?;
                let validator = Validator::new(target.option_settings.resolve_strict()?);
                let inputs = target.input_settings.load()?;
                let instances = inputs.iter().map(Loaded::instance).collect::<Vec<_>>();
                let results = validator.is_valid_all(&instances, &schema);
                let mut all_ok = true;
                for (input, result) in inputs.iter().zip(results) {
                    match result {
                        Ok(true) => report_pass(&input.label),
                        Ok(false) => {
                            all_ok = false;
                            report_fail(&input.label, "shape differs from the schema");
                        }
                        Err(error) => {
                            all_ok = false;
                            report_fail(&input.label, &error.to_string());
                        }
                    }
                }
                Ok(exit_code(all_ok))
            }
            Command::Validate(target) => {
                let schema = load_schema(&target.schema)?;
                let validator = Validator::new(target.option_settings.resolve(target.loosely_typed)?);
                let inputs = target.input_settings.load()?;
                let instances = inputs.iter().map(Loaded::instance).collect::<Vec<_>>();
                let results = validator.validate_all(&instances, &schema);
                let mut all_ok = true;
                for (input, result) in inputs.iter().zip(results) {
                    match result {
                        Ok(()) => report_pass(&input.label),
                        Err(error) => {
                            all_ok = false;
                            report_fail(&input.label, &error.to_string());
                        }
                    }
                }
                Ok(exit_code(all_ok))
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn load_schema(path: &Path) -> Result<SchemaNode> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file ({})", path.display()))?;
    SchemaNode::from_json_str(&src, &predicates::builtin())
        .with_context(|| format!("failed to load schema ({})", path.display()))
}

fn write_output(out: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(out, contents)?;
    Ok(())
}

fn report_pass(label: &str) {
    println!("{} {label}", "✅".green());
}

fn report_fail(label: &str, reason: &str) {
    println!("{} {label}: {}", "❌".red(), reason.red());
}

fn exit_code(all_ok: bool) -> ExitCode {
    if all_ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        CommandLineInterface::command().debug_assert();
    }

    #[test]
    fn literal_paths_pass_through() {
        let paths = resolve_file_path_patterns(["a.json", "dir/b.json"]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("a.json"), PathBuf::from("dir/b.json")]);
    }

    #[test]
    fn empty_globs_are_errors() {
        let err = resolve_file_path_patterns(["/definitely/not/here/*.json"]).unwrap_err();
        assert!(err.to_string().contains("matched no files"));
    }

    #[test]
    fn check_drops_loose_typing_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("options.json");
        std::fs::write(&config, r#"{"loosely_typed": true, "max_size_in_bytes": 64}"#).unwrap();
        let settings = OptionSettings { config: Some(config), max_size: None };
        let options = settings.resolve_strict().unwrap();
        assert!(!options.loosely_typed);
        assert_eq!(options.size_limit(), Some(64));
        assert!(settings.resolve(false).unwrap().loosely_typed);
    }

    #[test]
    fn validate_flags_parse() {
        let cli = CommandLineInterface::try_parse_from([
            "json-shape", "validate", "-s", "schema.json", "-i", "a.json", "b.json",
            "--max-size", "1000", "--loosely-typed",
        ])
        .unwrap();
        let Command::Validate(v) = cli.cmd else { panic!("expected validate") };
        assert_eq!(v.input_settings.input, vec!["a.json", "b.json"]);
        assert_eq!(v.option_settings.max_size, Some(1000));
        assert!(v.loosely_typed);
    }
}
