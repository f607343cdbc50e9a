//! Files compiled into the binary.

use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Embedded;

/// HTML template for the synthesized `index.html`.
pub fn bootstrap_template() -> Option<String> {
    read("bootstrap.html")
}

/// Default `tailwind.config.js` written by `wasmserve init`.
pub fn tailwind_config() -> Option<String> {
    read("tailwind.config.js")
}

fn read(name: &str) -> Option<String> {
    let file = Embedded::get(name)?;
    Some(String::from_utf8_lossy(file.data.as_ref()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_files_present() {
        let template = bootstrap_template().unwrap();
        assert!(template.contains("{{ARGV}}"));

        let config = tailwind_config().unwrap();
        assert!(config.contains("module.exports"));
        assert!(config.contains("./**/*.{html,go}"));
    }
}
