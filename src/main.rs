use clap::Parser;
use std::path::Path;

use tracestat::cli::{Cli, StatsFormat, SummaryFormat};
use tracestat::config::AnalyzerConfig;
use tracestat::config_file::ConfigFile;
use tracestat::platform::{ExitCode, Progress, SafeStderr, SafeStdout};
use tracestat::summary::TraceSummary;

fn main() {
    let mut stderr = SafeStderr::new();

    // Process command line arguments with config file support
    let cli = process_args_with_config(&mut stderr);

    // Invocation errors abort before any worker is spawned
    if let Err(e) = validate_cli_args(&cli) {
        stderr.error(&e.to_string());
        ExitCode::InvalidUsage.exit();
    }

    let config = AnalyzerConfig::from_cli(&cli);
    let mut progress = Progress::new(config.output.quiet);

    let result = match tracestat::run_analysis(&config, &mut progress) {
        Ok(result) => result,
        Err(e) => {
            stderr.error(&format!("{:#}", e));
            ExitCode::GeneralError.exit();
        }
    };

    if let Some(format) = config.output.summary {
        let summary = TraceSummary::from_stats(&result.trace.stats);
        let rendered = match format {
            SummaryFormat::Text => Ok(summary.format_text()),
            SummaryFormat::Json => summary.to_json(),
        };
        let mut stdout = SafeStdout::new();
        if let Err(e) = rendered
            .and_then(|text| stdout.writeln(&text))
            .and_then(|_| stdout.flush())
        {
            stderr.error(&format!("{:#}", e));
            ExitCode::GeneralError.exit();
        }
    }

    if let Some(format) = config.output.stats {
        let scan = &result.trace.scan;
        let rendered = match format {
            StatsFormat::Text => Ok(scan.format_stats()),
            StatsFormat::Json => scan.to_json(),
        };
        match rendered {
            Ok(text) => stderr.writeln(&text).unwrap_or(()),
            Err(e) => {
                stderr.error(&format!("{:#}", e));
                ExitCode::GeneralError.exit();
            }
        }
    }

    ExitCode::Success.exit();
}

fn validate_cli_args(cli: &Cli) -> anyhow::Result<()> {
    // Aliases are expanded before parsing, so any left here were never applied
    if let Some(name) = cli.alias.first() {
        if cli.ignore_config {
            return Err(anyhow::anyhow!(
                "--alias {} cannot be used with --ignore-config",
                name
            ));
        }
        return Err(anyhow::anyhow!(
            "Alias '{}' was not expanded; use '-a {}' or '--alias {}'",
            name,
            name,
            name
        ));
    }

    // Byte-range sharding needs a regular file; pipes and devices report size 0
    match std::fs::metadata(&cli.file) {
        Err(_) => return Err(anyhow::anyhow!("File not found: {}", cli.file)),
        Ok(metadata) if !metadata.is_file() => {
            return Err(anyhow::anyhow!("Not a regular file: {}", cli.file));
        }
        Ok(_) => {}
    }

    if !Path::new(&cli.output_dir).is_dir() {
        return Err(anyhow::anyhow!(
            "Output directory not found: {}",
            cli.output_dir
        ));
    }

    // Validate thread count
    if cli.threads > 1000 {
        return Err(anyhow::anyhow!("Thread count too high (max 1000)"));
    }

    Ok(())
}

/// Extract --config-file argument from raw args
fn extract_config_file_arg(args: &[String]) -> Option<String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config-file" {
            return iter.next().cloned();
        }
        if let Some(path) = arg.strip_prefix("--config-file=") {
            return Some(path.to_string());
        }
    }
    None
}

fn process_args_with_config(stderr: &mut SafeStderr) -> Cli {
    let raw_args: Vec<String> = std::env::args().collect();

    let config_file_path = extract_config_file_arg(&raw_args);

    // --show-config runs before the positional file is required
    if raw_args.iter().any(|arg| arg == "--show-config") {
        ConfigFile::show_config(config_file_path.as_deref());
        ExitCode::Success.exit();
    }

    let processed_args = if raw_args.iter().any(|arg| arg == "--ignore-config") {
        raw_args
    } else {
        let loaded = ConfigFile::load_with_custom_path(config_file_path.as_deref())
            .and_then(|config_file| config_file.process_args(raw_args));
        match loaded {
            Ok(processed) => processed,
            Err(e) => {
                stderr.error(&format!("Config error: {:#}", e));
                ExitCode::InvalidUsage.exit();
            }
        }
    };

    // clap prints usage and exits with status 2 on bad invocations
    Cli::parse_from(processed_args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn extract_config_file_forms() {
        assert_eq!(
            extract_config_file_arg(&args(&["tracestat", "--config-file", "a.ini", "t.log"])),
            Some("a.ini".to_string())
        );
        assert_eq!(
            extract_config_file_arg(&args(&["tracestat", "--config-file=b.ini"])),
            Some("b.ini".to_string())
        );
        assert_eq!(extract_config_file_arg(&args(&["tracestat", "t.log"])), None);
        assert_eq!(extract_config_file_arg(&args(&["tracestat", "--config-file"])), None);
    }

    #[test]
    fn validate_rejects_missing_file() {
        let cli = Cli::parse_from(["tracestat", "/nonexistent/trace.log"]);
        let err = validate_cli_args(&cli).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn validate_rejects_directory_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().to_string();
        let cli = Cli::parse_from(["tracestat", path.as_str()]);
        let err = validate_cli_args(&cli).unwrap_err();
        assert!(err.to_string().starts_with("Not a regular file"));
    }

    #[cfg(unix)]
    #[test]
    fn validate_rejects_device_input() {
        let cli = Cli::parse_from(["tracestat", "/dev/null"]);
        let err = validate_cli_args(&cli).unwrap_err();
        assert_eq!(err.to_string(), "Not a regular file: /dev/null");
    }

    #[test]
    fn validate_rejects_alias_with_ignore_config() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().to_string();
        let cli = Cli::parse_from(["tracestat", "--ignore-config", "-a", "quick", path.as_str()]);
        let err = validate_cli_args(&cli).unwrap_err();
        assert_eq!(
            err.to_string(),
            "--alias quick cannot be used with --ignore-config"
        );
    }

    #[test]
    fn validate_rejects_unexpanded_alias() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().to_string();
        let cli = Cli::parse_from(["tracestat", "--alias=quick", path.as_str()]);
        let err = validate_cli_args(&cli).unwrap_err();
        assert!(err.to_string().contains("was not expanded"));
    }

    #[test]
    fn validate_accepts_regular_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().to_string();
        let cli = Cli::parse_from(["tracestat", path.as_str()]);
        assert!(validate_cli_args(&cli).is_ok());
    }

    #[test]
    fn validate_rejects_missing_output_dir() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().to_string();
        let cli = Cli::parse_from(["tracestat", "-o", "/nonexistent/out", path.as_str()]);
        let err = validate_cli_args(&cli).unwrap_err();
        assert!(err.to_string().contains("Output directory not found"));
    }
}
