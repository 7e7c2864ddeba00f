//! Shell selection.
//!
//! Maps the `shell` setting to an executable found on `PATH`.

use std::path::{Path, PathBuf};

/// Shell to spawn for new sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShellType {
    /// Whatever the platform default is.
    #[default]
    System,
    /// Bash
    Bash,
    /// Zsh
    Zsh,
    /// Fish
    Fish,
    /// POSIX sh
    Sh,
    /// PowerShell (pwsh or Windows PowerShell)
    PowerShell,
    /// Command Prompt (Windows only)
    Cmd,
}

impl ShellType {
    /// Returns the display name for this shell.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::System => "System Default",
            Self::Bash => "Bash",
            Self::Zsh => "Zsh",
            Self::Fish => "Fish",
            Self::Sh => "sh",
            Self::PowerShell => "PowerShell",
            Self::Cmd => "Command Prompt",
        }
    }

    /// Returns the config file string for this shell.
    #[must_use]
    pub fn config_name(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Fish => "fish",
            Self::Sh => "sh",
            Self::PowerShell => "powershell",
            Self::Cmd => "cmd",
        }
    }

    /// Parses a shell type from a config string.
    #[must_use]
    pub fn from_config(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "system" | "default" | "" => Some(Self::System),
            "bash" => Some(Self::Bash),
            "zsh" => Some(Self::Zsh),
            "fish" => Some(Self::Fish),
            "sh" => Some(Self::Sh),
            "powershell" | "pwsh" | "ps" => Some(Self::PowerShell),
            "cmd" | "command" => Some(Self::Cmd),
            _ => None,
        }
    }

    /// Executable names to look for, most preferred first.
    fn candidates(&self) -> &'static [&'static str] {
        match self {
            Self::System => &[],
            Self::Bash if cfg!(windows) => &["bash.exe"],
            Self::Bash => &["bash"],
            Self::Zsh => &["zsh"],
            Self::Fish => &["fish"],
            Self::Sh => &["sh"],
            Self::PowerShell if cfg!(windows) => &["pwsh.exe", "powershell.exe"],
            Self::PowerShell => &["pwsh"],
            Self::Cmd if cfg!(windows) => &["cmd.exe"],
            Self::Cmd => &[],
        }
    }

    /// Returns the shell path, or None to use the system default.
    ///
    /// A configured shell that is not installed also yields None.
    #[must_use]
    pub fn resolve_path(&self) -> Option<PathBuf> {
        let path_var = std::env::var_os("PATH")?;
        let dirs: Vec<PathBuf> = std::env::split_paths(&path_var).collect();
        self.resolve_in(&dirs)
    }

    /// Looks for this shell in the given directories.
    #[must_use]
    pub fn resolve_in(&self, dirs: &[PathBuf]) -> Option<PathBuf> {
        self.candidates()
            .iter()
            .find_map(|name| find_in_dirs(dirs, name))
    }

    /// Returns true if this shell can be spawned here.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::System) || self.resolve_path().is_some()
    }
}

fn find_in_dirs(dirs: &[PathBuf], name: &str) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(name))
        .find(|candidate| is_file(candidate))
}

fn is_file(path: &Path) -> bool {
    path.metadata().is_ok_and(|m| m.is_file())
}
