use crate::core::value::Value;
use crate::frontend::config::Config;
use crate::frontend::prelude;
use crate::infrastructure::logging::{init_logging, LogConfig};
use crate::runtime::{Interpreter, Module};
use std::path::PathBuf;
use tracing::Level;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Print every bound module and function with its signature
    List,
    Call { path: String, args: Vec<Value> },
    Signature { path: String },
    /// Write a default `.dynbindrc.toml` into the current directory
    InitConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    pub command: Command,
    pub config_path: Option<PathBuf>,
    pub verbose: bool,
}

pub struct Cli {
    options: CliConfig,
    config: Config,
}

impl Cli {
    pub fn new(options: CliConfig, config: Config) -> Self {
        Self { options, config }
    }

    pub fn run(&self) -> Result<i32, String> {
        match &self.options.command {
            Command::InitConfig => {
                let path = PathBuf::from(".dynbindrc.toml");
                if path.exists() {
                    return Err(format!("{} already exists", path.display()));
                }
                Config::default().save(&path)?;
                self.print_success(&format!("Wrote {}", path.display()));
                Ok(0)
            }
            Command::List => {
                let interp = self.interpreter();
                self.list_module(interp.kernel(), 0);
                Ok(0)
            }
            Command::Signature { path } => {
                let interp = self.interpreter();
                match interp.signature_of_path(path) {
                    Ok(signature) => {
                        println!("{}{}", path, signature);
                        Ok(0)
                    }
                    Err(err) => {
                        self.print_error(&err.to_string());
                        Ok(1)
                    }
                }
            }
            Command::Call { path, args } => {
                let interp = self.interpreter();
                match interp.call_path(path, args) {
                    Ok(result) => {
                        println!("{}", result);
                        Ok(0)
                    }
                    Err(err) => {
                        self.print_error(&err.to_string());
                        if self.config.errors.show_signatures && err.is_argument_error() {
                            if let Ok(signature) = interp.signature_of_path(path) {
                                eprintln!("  expected: {}{}", path, signature);
                            }
                        }
                        Ok(1)
                    }
                }
            }
        }
    }

    fn interpreter(&self) -> Interpreter {
        let interp = Interpreter::with_config(&self.config);
        prelude::install(&interp);
        interp
    }

    fn list_module(&self, module: &Module, depth: usize) {
        let indent = "  ".repeat(depth);
        println!("{}{}", indent, module.name());
        for name in module.function_names() {
            match module.signature_of(&name) {
                Ok(signature) => println!("{}  {}{}", indent, name, signature),
                Err(_) => println!("{}  {}", indent, name),
            }
        }
        for child in module.modules() {
            self.list_module(&child, depth + 1);
        }
    }

    fn print_error(&self, msg: &str) {
        if self.config.errors.color {
            eprintln!("\x1b[31m{}\x1b[0m", msg);
        } else {
            eprintln!("{}", msg);
        }
    }

    fn print_success(&self, msg: &str) {
        if self.config.errors.color {
            println!("\x1b[32m{}\x1b[0m", msg);
        } else {
            println!("{}", msg);
        }
    }
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {} [OPTIONS] <command>\n\nCommands:\n  \
         list                  List bound modules and functions\n  \
         call <path> [args]    Call a function, e.g. Math::add 1 2\n  \
         signature <path>      Show the signature of a function\n  \
         init-config           Write a default .dynbindrc.toml\n\nOptions:\n  \
         --config <file>       Load configuration from <file>\n  \
         --verbose             Enable debug logging",
        program
    )
}

/// Read a command line literal: `nil`, `true`, `false`, `:symbol`, an
/// integer, a float, or otherwise a string
pub fn parse_literal(text: &str) -> Value {
    match text {
        "nil" => Value::Nil,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Some(name) = text.strip_prefix(':').filter(|n| !n.is_empty()) {
                Value::symbol(name)
            } else if let Ok(i) = text.parse::<i64>() {
                Value::Integer(i)
            } else if let Ok(x) = text.parse::<f64>() {
                Value::Float(x)
            } else {
                Value::str(text)
            }
        }
    }
}

pub fn parse_args(args: &[String]) -> Result<CliConfig, String> {
    let program = args.first().map(String::as_str).unwrap_or("dynbind");
    let mut config_path = None;
    let mut verbose = false;
    let mut positional = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--verbose" | "-v" => verbose = true,
            "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("--config requires an argument".to_string());
                }
                config_path = Some(PathBuf::from(&args[i]));
            }
            "--help" | "-h" => return Err(usage(program)),
            arg if arg.starts_with("--") => {
                return Err(format!("Unknown option: {}", arg));
            }
            arg => positional.push(arg.to_string()),
        }
        i += 1;
    }

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        Some("list") => Command::List,
        Some("init-config") => Command::InitConfig,
        Some("signature") => Command::Signature {
            path: positional.next().ok_or("signature requires a function path")?,
        },
        Some("call") => Command::Call {
            path: positional.next().ok_or("call requires a function path")?,
            args: positional.by_ref().map(|arg| parse_literal(&arg)).collect(),
        },
        Some(other) => return Err(format!("Unknown command: {}\n\n{}", other, usage(program))),
        None => return Err(usage(program)),
    };

    Ok(CliConfig {
        command,
        config_path,
        verbose,
    })
}

/// Entry point for CLI binary
pub fn main() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();
    let options = parse_args(&args)?;

    let config = match &options.config_path {
        Some(path) => Config::load(path)?,
        None => Config::discover(),
    };

    let mut log_config = LogConfig::from(&config.logging);
    if options.verbose {
        log_config = log_config.with_level(Level::DEBUG);
    }
    let guard = init_logging(log_config);

    let exit_code = Cli::new(options, config).run()?;
    if exit_code != 0 {
        drop(guard);
        std::process::exit(exit_code);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(parse_literal("nil"), Value::Nil);
        assert_eq!(parse_literal("42"), Value::Integer(42));
        assert_eq!(parse_literal("-1.5"), Value::Float(-1.5));
        assert_eq!(parse_literal(":ok"), Value::symbol("ok"));
        assert_eq!(parse_literal(":"), Value::str(":"));
        assert_eq!(parse_literal("hello"), Value::str("hello"));
    }

    #[test]
    fn test_parse_call() {
        let options = parse_args(&args(&["dynbind", "--verbose", "call", "Math::add", "1", "2"])).unwrap();
        assert!(options.verbose);
        assert_eq!(
            options.command,
            Command::Call {
                path: "Math::add".to_string(),
                args: vec![Value::Integer(1), Value::Integer(2)],
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&["dynbind"])).unwrap_err().starts_with("Usage:"));
        assert_eq!(
            parse_args(&args(&["dynbind", "signature"])).unwrap_err(),
            "signature requires a function path"
        );
        assert_eq!(
            parse_args(&args(&["dynbind", "--config"])).unwrap_err(),
            "--config requires an argument"
        );
        assert_eq!(
            parse_args(&args(&["dynbind", "--bogus", "list"])).unwrap_err(),
            "Unknown option: --bogus"
        );
    }

    #[test]
    fn test_parse_config_option() {
        let options = parse_args(&args(&["dynbind", "--config", "x.toml", "list"])).unwrap();
        assert_eq!(options.config_path, Some(PathBuf::from("x.toml")));
        assert_eq!(options.command, Command::List);
    }
}
