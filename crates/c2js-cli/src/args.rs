use std::path::PathBuf;

use clap::Parser;

/// CLI arguments for the `c2js` binary (spec.md §6, §6.1).
#[derive(Parser, Debug)]
#[command(name = "c2js", version, about = "C99 to JavaScript whole-program compiler")]
pub struct CliArgs {
    /// The C source file to compile.
    pub input: PathBuf,

    /// Write the generated JavaScript to this file instead of `<input>.js`.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Add a directory to the `#include` search path. Repeatable.
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    pub include: Vec<PathBuf>,

    /// Define a preprocessor macro as `NAME` or `NAME=VALUE`. Repeatable.
    #[arg(short = 'D', long = "define", value_name = "NAME[=VALUE]")]
    pub define: Vec<String>,

    /// Stop after preprocessing and print the preprocessed source to stdout.
    #[arg(short = 'E')]
    pub preprocess_only: bool,

    /// Print the AST after semantic analysis (debug aid).
    #[arg(long = "dump-ast")]
    pub dump_ast: bool,

    /// Enable verbose logging (`-v`, `-vv` for trace). Overridden by `RUST_LOG`.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CliArgs {
    /// Splits a `-D NAME[=VALUE]` argument into its name and value parts.
    pub fn split_define(raw: &str) -> (&str, &str) {
        match raw.split_once('=') {
            Some((name, value)) => (name, value),
            None => (raw, ""),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("js"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_define_separates_name_and_value() {
        assert_eq!(CliArgs::split_define("FOO=1"), ("FOO", "1"));
        assert_eq!(CliArgs::split_define("FOO"), ("FOO", ""));
        assert_eq!(CliArgs::split_define("VERSION=\"1.0\""), ("VERSION", "\"1.0\""));
    }

    #[test]
    fn output_path_defaults_to_input_with_js_extension() {
        let args = CliArgs {
            input: PathBuf::from("prog.c"),
            output: None,
            include: Vec::new(),
            define: Vec::new(),
            preprocess_only: false,
            dump_ast: false,
            verbose: 0,
        };
        assert_eq!(args.output_path(), PathBuf::from("prog.js"));
    }

    #[test]
    fn output_path_honors_explicit_output() {
        let args = CliArgs {
            input: PathBuf::from("prog.c"),
            output: Some(PathBuf::from("out/bundle.js")),
            include: Vec::new(),
            define: Vec::new(),
            preprocess_only: false,
            dump_ast: false,
            verbose: 0,
        };
        assert_eq!(args.output_path(), PathBuf::from("out/bundle.js"));
    }
}
