use crate::config::parse_listen_addr;

/// Validate an `--http` value: `8080`, `:8080` or `host:port`.
pub fn parse_http(s: &str) -> Result<String, String> {
    parse_listen_addr(s)
        .map(|_| s.trim().to_string())
        .map_err(|_| format!("'{}' is not a port, :port, or host:port", s))
}

/// Validate an `--allow-origin` value.
///
/// `*` or an origin without path, e.g. `http://localhost:3000`.
pub fn parse_origin(s: &str) -> Result<String, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Origin cannot be empty".to_string());
    }
    if s == "*" {
        return Ok(s.to_string());
    }
    if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(format!("Origin '{}' contains whitespace", s));
    }
    let Some((scheme, host)) = s.split_once("://") else {
        return Err(format!("Origin '{}' must include a scheme, e.g. http://{}", s, s));
    };
    if scheme.is_empty() || host.is_empty() || host.contains('/') {
        return Err(format!("Origin '{}' must look like scheme://host[:port]", s));
    }
    Ok(s.to_string())
}
