//! Configuration module for termdeck.
//!
//! Handles loading and parsing the .termdeckrc configuration file.

pub mod shell;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub use shell::ShellType;

use crate::logging::LogConfig;
use crate::settings::{CursorStyle, TerminalSettings};

/// Default .termdeckrc file content with all settings documented.
const DEFAULT_TERMDECKRC: &str = r#"# termdeck Configuration File
# ============================
# This file is read on application startup.
# Lines starting with '#' are comments.
#
# Shell
# -----
# Shell for new terminals: system, bash, zsh, fish, sh, powershell, cmd
# Existing terminals keep the shell they were started with.
shell = system

# Appearance
# ----------
# font_family = monospace
# font_size = 14          # Points; also drives the cell size used for fitting
# line_height = 1.2       # Multiple of the font size
# cursor_style = block    # block, underline, bar
# cursor_blink = true
# scrollback = 1000       # Lines kept above the screen

# Keys
# ----
# ctrl+t          New terminal tab
# ctrl+w          Close terminal tab
# ctrl+pageup     Previous tab
# ctrl+pagedown   Next tab
# alt+1..9        Select tab
# alt+h / alt+v   Split side by side / stacked
# alt+x           Close pane
# alt+left/right  Focus previous/next pane
# alt+[ / alt+]   Move the divider left/right
# alt+s           Show the active tab in the focused pane
# ctrl+q          Quit

# Logging Configuration
# ---------------------
# Logs are stored in ~/.termdeck/logs/ with automatic cleanup.
#
# log_enabled = true       # Enable/disable file logging (true/false)
# log_level = info         # Log level: trace, debug, info, warn, error, off
# log_retention = 24       # Hours to keep log files (default: 24)
"#;

/// Smallest accepted font size.
const MIN_FONT_SIZE: f32 = 4.0;

/// Largest accepted font size.
const MAX_FONT_SIZE: f32 = 96.0;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Terminal preferences pushed to every pane.
    pub terminal: TerminalSettings,
    /// Path to config file.
    pub config_path: PathBuf,
    /// Logging configuration.
    pub log_config: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            terminal: TerminalSettings::default(),
            config_path: Self::default_config_path(),
            log_config: LogConfig::default(),
        }
    }
}

impl Config {
    /// Returns the default config file path (~/.termdeckrc).
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".termdeckrc")
    }

    /// Loads configuration from the default path, creating it if it doesn't exist.
    ///
    /// # Errors
    /// Returns error if config cannot be read or created.
    pub fn load() -> io::Result<Self> {
        let path = Self::default_config_path();
        Self::load_from(&path)
    }

    /// Loads configuration from a specific path.
    ///
    /// # Errors
    /// Returns error if config cannot be read or created.
    pub fn load_from(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            Self::create_default_config(path)?;
        }

        let content = fs::read_to_string(path)?;
        Ok(Self::parse_str(&content, path.to_path_buf()))
    }

    /// Builds a configuration from file content.
    #[must_use]
    pub fn parse_str(content: &str, config_path: PathBuf) -> Self {
        let mut config = Self {
            config_path,
            ..Self::default()
        };
        config.parse(content);
        config
    }

    /// Re-reads the configuration from disk.
    ///
    /// # Errors
    /// Returns error if config cannot be read.
    pub fn reload(&mut self) -> io::Result<()> {
        let path = self.config_path.clone();
        *self = Self::load_from(&path)?;
        Ok(())
    }

    /// Returns the terminal preferences.
    #[must_use]
    pub fn terminal_settings(&self) -> TerminalSettings {
        self.terminal.clone()
    }

    fn create_default_config(path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        file.write_all(DEFAULT_TERMDECKRC.as_bytes())?;
        Ok(())
    }

    fn parse(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.split('#').next().unwrap_or(value).trim();
                self.apply_setting(key, value);
            }
        }
    }

    /// Applies a single setting. Malformed values keep the current value.
    fn apply_setting(&mut self, key: &str, value: &str) {
        let terminal = &mut self.terminal;
        match key {
            "shell" => {
                if let Some(shell) = ShellType::from_config(value) {
                    terminal.shell = shell;
                }
            }
            "font_family" | "font-family" => {
                if !value.is_empty() {
                    terminal.font_family = value.to_string();
                }
            }
            "font_size" | "font-size" => {
                if let Ok(size) = value.parse::<f32>() {
                    if size.is_finite() {
                        terminal.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
                    }
                }
            }
            "line_height" | "line-height" => {
                if let Ok(height) = value.parse::<f32>() {
                    if height.is_finite() && height > 0.0 {
                        terminal.line_height = height;
                    }
                }
            }
            "cursor_style" => {
                if let Some(style) = CursorStyle::parse(value) {
                    terminal.cursor_style = style;
                }
            }
            "cursor_blink" => {
                if let Some(flag) = parse_bool(value) {
                    terminal.cursor_blink = flag;
                }
            }
            "scrollback" => {
                if let Ok(lines) = value.parse::<usize>() {
                    terminal.scrollback = lines;
                }
            }
            "log_level" => {
                self.log_config.level = LogConfig::parse_level(value);
            }
            "log_retention" | "log_retention_hours" => {
                self.log_config.retention_hours = LogConfig::parse_retention(value);
            }
            "log_enabled" | "logging" => {
                if let Some(flag) = parse_bool(value) {
                    self.log_config.enabled = flag;
                }
            }
            _ => {}
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
