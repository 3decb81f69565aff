use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;

use apexbot::prelude::*;

pub const CONFIG_PATH: &str = "Apexbot.toml";

#[derive(Deserialize)]
pub struct Config {
    #[serde(default = "default_cmdchars")]
    pub cmdchars: String,
    #[serde(default = "default_nick")]
    pub nick: String,

    #[serde(default)]
    pub module: BTreeMap<String, toml::Value>,
}

fn default_cmdchars() -> String {
    "!".to_string()
}

fn default_nick() -> String {
    "console".to_string()
}

pub fn load() -> Result<Config> {
    let text = fs::read_to_string(CONFIG_PATH).with_context(|| format!("reading {CONFIG_PATH}"))?;
    parse(&text)
}

pub fn parse(text: &str) -> Result<Config> {
    Ok(toml::from_str(text)?)
}

#[cfg(test)]
mod test {
    use super::parse;

    #[test]
    fn test_defaults() {
        let c = parse("").unwrap();
        assert_eq!(c.cmdchars, "!");
        assert_eq!(c.nick, "console");
        assert!(c.module.is_empty());
    }

    #[test]
    fn test_modules() {
        let c = parse(
            r#"
cmdchars = "!."

[module.apex]
api_key = "abc"
"#,
        )
        .unwrap();
        assert_eq!(c.cmdchars, "!.");
        assert_eq!(c.module["apex"]["api_key"].as_str(), Some("abc"));
    }
}
