//! `sift config show` -- display resolved configuration.
//!
//! The API key is shown masked (`gsk_****a1b2`), never in full.

use serde_json::Value;
use sift_types::Config;

/// Render the configuration as pretty JSON with the key masked.
pub fn render_config(config: &Config) -> anyhow::Result<String> {
    let mut value = serde_json::to_value(config)?;
    if let Some(provider) = value.get_mut("provider").and_then(Value::as_object_mut) {
        provider.insert(
            "api_key".into(),
            Value::String(config.provider.api_key.masked()),
        );
    }
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Print the resolved configuration.
pub fn config_show(config: &Config) {
    match render_config(config) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("error: failed to serialize config: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_types::SecretString;

    #[test]
    fn key_is_masked() {
        let mut config = Config::default();
        config.provider.api_key = SecretString::new("gsk_abcdefghijkla1b2");

        let rendered = render_config(&config).unwrap();
        assert!(rendered.contains("gsk_****a1b2"));
        assert!(!rendered.contains("abcdefghijk"));
        assert!(rendered.contains("llama-3.3-70b-versatile"));
    }

    #[test]
    fn unset_key_is_labelled() {
        let rendered = render_config(&Config::default()).unwrap();
        assert!(rendered.contains("(not set)"));
    }
}
