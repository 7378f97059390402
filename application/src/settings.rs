//! User settings read from the INI configuration file.
//!
//! Keys outside any section or in the `[General]` section are top-level
//! keys. Keys in other sections are addressed as `Section/key`.

use log::{debug, warn};

use std::{collections::HashMap, fs, path::Path};

pub const LANGUAGE_KEY: &str = "Language";
pub const FULL_SCREEN_KEY: &str = "FullScreen";
pub const DARK_MODE_KEY: &str = "DarkMode";

pub const DEFAULT_LANGUAGE: &str = "en";

const GENERAL_SECTION: &str = "General";

/// Flat key-value view of an INI document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyValues(HashMap<String, String>);

impl KeyValues {
    pub fn parse(text: &str) -> Self {
        let mut values = HashMap::new();
        let mut section: Option<String> = None;

        for line in text.lines() {
            let line = strip_comment(line).trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim();
                section = if name.is_empty() || name.eq_ignore_ascii_case(GENERAL_SECTION) {
                    None
                } else {
                    Some(name.to_owned())
                };
                continue;
            }

            let (key, value) = match line.split_once('=') {
                Some((key, value)) => (key.trim(), unquote(value.trim())),
                None => {
                    debug!("ignoring settings line without a value: {}", line);
                    continue;
                }
            };
            if key.is_empty() {
                continue;
            }

            let key = match &section {
                Some(section) => format!("{}/{}", section, key),
                None => key.to_owned(),
            };
            values.insert(key, value.to_owned());
        }

        KeyValues(values)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn string_or(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(value) if !value.is_empty() => value.to_owned(),
            _ => default.to_owned(),
        }
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(value) => parse_bool(value).unwrap_or_else(|| {
                warn!("Invalid boolean {:?} for {}, using {}", value, key, default);
                default
            }),
            None => default,
        }
    }
}

/// Removes a `;` comment, unless the `;` is quoted.
fn strip_comment(line: &str) -> &str {
    let mut quoted = false;
    for (idx, c) in line.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ';' if !quoted => return &line[..idx],
            _ => (),
        }
    }

    line
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub language: String,
    pub full_screen: bool,
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            language: DEFAULT_LANGUAGE.to_owned(),
            full_screen: false,
            dark_mode: false,
        }
    }
}

impl Settings {
    pub fn from_key_values(values: &KeyValues) -> Self {
        Settings {
            language: values.string_or(LANGUAGE_KEY, DEFAULT_LANGUAGE),
            full_screen: values.bool_or(FULL_SCREEN_KEY, false),
            dark_mode: values.bool_or(DARK_MODE_KEY, false),
        }
    }

    pub fn parse(text: &str) -> Self {
        Self::from_key_values(&KeyValues::parse(text))
    }

    /// Reads the settings file, falling back to defaults if it can't be read.
    pub fn load(path: &Path) -> Self {
        match fs::read(path) {
            Ok(bytes) => {
                let settings = Self::parse(&String::from_utf8_lossy(&bytes));
                debug!("read settings: {:?}", settings);
                settings
            }
            Err(err) => {
                warn!("Couldn't read settings from {}: {}", path.display(), err);
                Settings::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_for_missing_keys() {
        let lines = ["Language=pt", "FullScreen=true", "DarkMode=true"];

        // every combination of present / absent keys
        for mask in 0..8u8 {
            let text = lines
                .iter()
                .enumerate()
                .filter(|(idx, _)| mask & (1 << idx) != 0)
                .map(|(_, line)| *line)
                .collect::<Vec<_>>()
                .join("\n");

            let settings = Settings::parse(&text);
            let expected_language = if mask & 1 != 0 { "pt" } else { "en" };
            assert_eq!(settings.language, expected_language, "mask {}", mask);
            assert_eq!(settings.full_screen, mask & 2 != 0, "mask {}", mask);
            assert_eq!(settings.dark_mode, mask & 4 != 0, "mask {}", mask);
        }
    }

    #[test]
    fn empty_document() {
        assert_eq!(Settings::parse(""), Settings::default());
        assert_eq!(
            Settings::default(),
            Settings {
                language: "en".to_owned(),
                full_screen: false,
                dark_mode: false,
            }
        );
    }

    #[test]
    fn general_section_and_comments() {
        let settings = Settings::parse(
            "; comment\n\
             # other comment\n\
             [General]\n\
             Language = \"fr\"\n\
             FullScreen=YES\n\
             DarkMode=1\n\
             [Player]\n\
             DarkMode=false\n",
        );
        assert_eq!(settings.language, "fr");
        assert!(settings.full_screen);
        assert!(settings.dark_mode);
    }

    #[test]
    fn trailing_comments() {
        let settings = Settings::parse(
            "[General] ; main settings\n\
             Language=pt ; Portuguese\n\
             FullScreen = on;\n\
             DarkMode=true ; dark\n",
        );
        assert_eq!(settings.language, "pt");
        assert!(settings.full_screen);
        assert!(settings.dark_mode);

        let values = KeyValues::parse("[Player] ; output\nDevice=\"hw:0;1\" ; quoted\n");
        assert_eq!(values.get("Player/Device"), Some("hw:0;1"));
    }

    #[test]
    fn sectioned_keys() {
        let values = KeyValues::parse("Language=en\n[Player]\nVolume=80\n");
        assert_eq!(values.get("Language"), Some("en"));
        assert_eq!(values.get("Player/Volume"), Some("80"));
        assert_eq!(values.get("Volume"), None);
    }

    #[test]
    fn unparseable_values() {
        let settings = Settings::parse("Language=\nFullScreen=maybe\nDarkMode=\n");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn unknown_language_is_kept() {
        assert_eq!(Settings::parse("Language=xx").language, "xx");
    }

    #[test]
    fn unreadable_file() {
        let root = tempfile::tempdir().unwrap();
        assert_eq!(
            Settings::load(&root.path().join("missing.conf")),
            Settings::default()
        );
    }
}
