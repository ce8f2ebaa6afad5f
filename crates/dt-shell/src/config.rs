//! Shell configuration: defaults plus `DESKTERM_*` environment overrides.
//!
//! | Variable              | Field            | Default   |
//! |-----------------------|------------------|-----------|
//! | `DESKTERM_PROMPT`     | `prompt`         | `"> "`    |
//! | `DESKTERM_USER`       | `user`           | `lucas`   |
//! | `DESKTERM_HOST`       | `host`           | `lucasos` |
//! | `DESKTERM_BOOT`       | `boot_animation` | `true`    |
//! | `DESKTERM_SHIFTWIDTH` | `shift_width`    | `2`       |
//!
//! Booleans accept `1/0`, `true/false`, `yes/no` and `on/off`.

use thiserror::Error;

pub const PROMPT_VAR: &str = "DESKTERM_PROMPT";
pub const USER_VAR: &str = "DESKTERM_USER";
pub const HOST_VAR: &str = "DESKTERM_HOST";
pub const BOOT_VAR: &str = "DESKTERM_BOOT";
pub const SHIFT_WIDTH_VAR: &str = "DESKTERM_SHIFTWIDTH";

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

// ---------------------------------------------------------------------------
// ShellConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Prompt written before every input line.
    pub prompt: String,
    /// Identity reported by `whoami`.
    pub user: String,
    pub host: String,
    /// Run the startup loader before the first prompt.
    pub boot_animation: bool,
    /// Columns per `>` / `<` step in the editor.
    pub shift_width: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_owned(),
            user: "lucas".to_owned(),
            host: "lucasos".to_owned(),
            boot_animation: true,
            shift_width: dt_editor::editor::DEFAULT_SHIFT_WIDTH,
        }
    }
}

impl ShellConfig {
    /// Defaults overridden by the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a malformed boolean or number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `get` returns for each variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a malformed boolean or number.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(prompt) = get(PROMPT_VAR) {
            config.prompt = prompt;
        }
        if let Some(user) = get(USER_VAR) {
            config.user = user;
        }
        if let Some(host) = get(HOST_VAR) {
            config.host = host;
        }
        if let Some(value) = get(BOOT_VAR) {
            config.boot_animation = parse_bool(BOOT_VAR, &value)?;
        }
        if let Some(value) = get(SHIFT_WIDTH_VAR) {
            config.shift_width = match value.trim().parse::<usize>() {
                Ok(width) if width > 0 => width,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: SHIFT_WIDTH_VAR,
                        value,
                    });
                }
            };
        }

        Ok(config)
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_owned(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
