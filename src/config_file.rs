use anyhow::{anyhow, Context, Result};
use std::collections::{HashMap, HashSet};
use std::env;
use std::path::{Path, PathBuf};

const PROJECT_CONFIG_NAME: &str = ".tracestatrc";
const MAX_ALIAS_DEPTH: usize = 10;

/// INI-style configuration file holding default arguments and named argument aliases.
///
/// ```ini
/// defaults = --threads 8 --output-dir reports
///
/// [aliases]
/// quick = --top 50 --summary
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub defaults: Option<String>,
    pub aliases: HashMap<String, String>,
}

impl ConfigFile {
    /// Find a project-level `.tracestatrc` by walking up from the current directory
    pub fn find_project_config() -> Option<PathBuf> {
        let mut current = env::current_dir().ok()?;
        loop {
            let candidate = current.join(PROJECT_CONFIG_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// User config locations, most preferred first
    pub fn user_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        let home = env::var("HOME").ok().map(PathBuf::from);
        let xdg_config = env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| home.as_ref().map(|h| h.join(".config")));

        if let Some(dir) = xdg_config {
            paths.push(dir.join("tracestat").join("config.ini"));
        }
        if let Some(home) = home {
            paths.push(home.join(PROJECT_CONFIG_NAME));
        }

        paths
    }

    /// Load with precedence project > user. Missing files are not an error.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::user_config_paths().into_iter().find(|p| p.is_file()) {
            config = config.merged_with(Self::load_from_path(&path)?);
        }

        if let Some(path) = Self::find_project_config() {
            config = config.merged_with(Self::load_from_path(&path)?);
        }

        Ok(config)
    }

    /// Load an explicitly requested file, or fall back to the search order
    pub fn load_with_custom_path(custom_path: Option<&str>) -> Result<Self> {
        match custom_path {
            Some(path) => Self::load_from_path(Path::new(path)),
            None => Self::load(),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse_ini_content(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    fn parse_ini_content(content: &str) -> Result<Self> {
        let mut config = Self::default();
        let mut section = String::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();

            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                section = line[1..line.len() - 1].trim().to_string();
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| anyhow!("line {}: expected 'key = value', got '{}'", idx + 1, line))?;
            let key = key.trim();
            let value = value.trim();

            match section.as_str() {
                "" if key == "defaults" => config.defaults = Some(value.to_string()),
                "aliases" => {
                    config.aliases.insert(key.to_string(), value.to_string());
                }
                // Unknown keys and sections are ignored
                _ => {}
            }
        }

        Ok(config)
    }

    /// Overlay wins for defaults and for conflicting alias names
    fn merged_with(mut self, overlay: Self) -> Self {
        if overlay.defaults.is_some() {
            self.defaults = overlay.defaults;
        }
        self.aliases.extend(overlay.aliases);
        self
    }

    /// Expand one alias into arguments, following nested `-a`/`--alias` references
    pub fn resolve_alias(&self, name: &str, seen: &mut HashSet<String>, depth: usize) -> Result<Vec<String>> {
        if depth > MAX_ALIAS_DEPTH {
            return Err(anyhow!("Alias chain too deep: {} levels", depth));
        }
        if !seen.insert(name.to_string()) {
            return Err(anyhow!("Circular dependency detected in alias: {}", name));
        }

        let value = self
            .aliases
            .get(name)
            .ok_or_else(|| anyhow!("Unknown alias: {}", name))?;
        let words = shell_words::split(value)
            .with_context(|| format!("Invalid alias '{}': failed to parse arguments", name))?;

        let mut expanded = Vec::with_capacity(words.len());
        let mut iter = words.into_iter();
        while let Some(word) = iter.next() {
            if word == "-a" || word == "--alias" {
                if let Some(nested) = iter.next() {
                    expanded.extend(self.resolve_alias(&nested, seen, depth + 1)?);
                    continue;
                }
            }
            expanded.push(word);
        }

        seen.remove(name);
        Ok(expanded)
    }

    /// Prepend configured defaults (after the program name) and expand aliases.
    /// Explicit command-line flags come last so they override the defaults.
    pub fn process_args(&self, args: Vec<String>) -> Result<Vec<String>> {
        let mut args = args.into_iter();
        let mut combined: Vec<String> = args.next().into_iter().collect();

        if let Some(defaults) = &self.defaults {
            let default_args = shell_words::split(defaults)
                .context("Invalid defaults: failed to parse arguments")?;
            combined.extend(default_args);
        }
        combined.extend(args);

        let mut result = Vec::with_capacity(combined.len());
        let mut iter = combined.into_iter();
        while let Some(arg) = iter.next() {
            if arg == "-a" || arg == "--alias" {
                if let Some(name) = iter.next() {
                    result.extend(self.resolve_alias(&name, &mut HashSet::new(), 0)?);
                    continue;
                }
            }
            result.push(arg);
        }

        Ok(result)
    }

    /// Print the search locations and the merged configuration (`--show-config`)
    pub fn show_config(custom_path: Option<&str>) {
        println!("Configuration precedence: CLI > --config-file > project .tracestatrc > user config\n");

        match custom_path {
            Some(path) => println!("Custom config file: {}", path),
            None => {
                println!("Configuration search locations (in precedence order):");
                match Self::find_project_config() {
                    Some(path) => println!("  1. Project: {} (found)", path.display()),
                    None => println!(
                        "  1. Project: {} (searched up directory tree, not found)",
                        PROJECT_CONFIG_NAME
                    ),
                }
                for (i, path) in Self::user_config_paths().iter().enumerate() {
                    let status = if path.is_file() { "(found)" } else { "(not found)" };
                    println!("  {}. User: {} {}", i + 2, path.display(), status);
                }
            }
        }

        match Self::load_with_custom_path(custom_path) {
            Ok(config) => {
                if config.defaults.is_none() && config.aliases.is_empty() {
                    println!("\nNo active configuration. Example {}:", PROJECT_CONFIG_NAME);
                    println!();
                    println!("defaults = --threads 8 --output-dir reports");
                    println!();
                    println!("[aliases]");
                    println!("overview = --summary --stats --top 20");
                    return;
                }
                if let Some(defaults) = &config.defaults {
                    println!("\nActive defaults:");
                    println!("  defaults = {}", defaults);
                }
                if !config.aliases.is_empty() {
                    println!("\nActive aliases:");
                    let mut aliases: Vec<_> = config.aliases.iter().collect();
                    aliases.sort();
                    for (name, value) in aliases {
                        println!("  {} = {}", name, value);
                    }
                }
            }
            Err(e) => eprintln!("Error loading configuration: {:#}", e),
        }
    }
}
