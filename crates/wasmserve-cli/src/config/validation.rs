use crate::config::ProjectConfig;
use crate::error::{ConfigError, Result};
use regex::Regex;
use std::net::{SocketAddr, ToSocketAddrs};

/// Parse the `http` setting into a bind address.
///
/// A bare port (`8080`) or `:port` listens on all interfaces.
pub fn parse_listen_addr(http: &str) -> Result<SocketAddr> {
    let invalid = |hint: &str| -> crate::error::CliError {
        ConfigError::InvalidValue {
            field: "http".to_string(),
            value: http.to_string(),
            hint: hint.to_string(),
        }
        .into()
    };

    let trimmed = http.trim();
    if trimmed.is_empty() {
        return Err(invalid("Set http to a port such as 8080"));
    }

    let port_only = trimmed.strip_prefix(':').unwrap_or(trimmed);
    if port_only.chars().all(|c| c.is_ascii_digit()) {
        let port: u16 = port_only
            .parse()
            .map_err(|_| invalid("Port must be between 0 and 65535"))?;
        return Ok(SocketAddr::from(([0, 0, 0, 0], port)));
    }

    if let Ok(addr) = trimmed.parse::<SocketAddr>() {
        return Ok(addr);
    }

    trimmed
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| invalid("Use a port (8080), :port, or host:port"))
}

/// Compile the watcher's exclude patterns.
pub fn compile_exclude_regex(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| {
                ConfigError::InvalidValue {
                    field: "build.exclude_regex".to_string(),
                    value: pattern.clone(),
                    hint: e.to_string(),
                }
                .into()
            })
        })
        .collect()
}

impl ProjectConfig {
    /// Validate configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.wasm_file.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "wasm_file".to_string(),
                hint: "Name the compiled module, e.g. wasm_file = \"main.wasm\"".to_string(),
            }
            .into());
        }

        if self.wasm_file.contains('/') || self.wasm_file.contains('\\') {
            return Err(ConfigError::InvalidValue {
                field: "wasm_file".to_string(),
                value: self.wasm_file.clone(),
                hint: "Use a plain file name; the module is written to tmp_dir".to_string(),
            }
            .into());
        }

        if self.enable_tailwind && self.tailwind_exec.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "tailwind_exec".to_string(),
                hint: "Set tailwind_exec (e.g. \"npx tailwindcss\") or enable_tailwind = false"
                    .to_string(),
            }
            .into());
        }

        if self.compiler.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "compiler".to_string(),
                hint: "Set compiler = \"go\"".to_string(),
            }
            .into());
        }

        parse_listen_addr(&self.http)?;
        compile_exclude_regex(&self.build.exclude_regex)?;

        Ok(())
    }

    /// Bind address for the HTTP server.
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        parse_listen_addr(&self.http)
    }
}
