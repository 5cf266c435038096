use clap::Parser;
use drim::cli::{generate_completions, AppConfig, Args, Commands};
use drim::diagnostic::render_diagnostics;
use drim::interpreter;
use owo_colors::OwoColorize;
use std::io::{self, Read};
use std::path::Path;

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);

    verbose_log(&config, "Starting drim");

    let (source, file_name) = match read_source(&args, &config) {
        Ok(pair) => pair,
        Err(e) => {
            error_message(&config, &e);
            std::process::exit(1);
        }
    };

    verbose_log(&config, &format!("Read {} bytes of source", source.len()));

    if let Err(diagnostics) = interpreter::parse_and_run_with_diagnostics(&source) {
        let rendered = render_diagnostics(&source, &file_name, &diagnostics, config.color_enabled);
        eprint!("{}", rendered);
        std::process::exit(1);
    }

    verbose_log(&config, "Program finished");
}

fn read_source(args: &Args, config: &AppConfig) -> Result<(String, String), String> {
    if let Some(script) = &args.script {
        verbose_log(
            config,
            &format!("Reading script from file: {}", script.display()),
        );
        Ok((read_file(script)?, script.display().to_string()))
    } else if let Some(source) = &args.eval {
        verbose_log(config, "Using source from command-line argument");
        Ok((source.clone(), "<eval>".to_string()))
    } else {
        verbose_log(config, "Reading program from stdin");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;

        if buffer.trim().is_empty() {
            return Err(
                "No program provided. Pass a script path, --eval, or source via stdin".to_string(),
            );
        }

        Ok((buffer, "<stdin>".to_string()))
    }
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn verbose_log(config: &AppConfig, message: &str) {
    if config.verbose {
        eprintln!("[drim:debug] {}", message);
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
