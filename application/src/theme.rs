//! Color palettes and stylesheets for the dark and light themes.

use log::{debug, warn};

use std::{error::Error, fmt, fs, io, path::PathBuf};

use crate::ResourceDirs;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(0xff, 0, 0);

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorRole {
    Window,
    WindowText,
    Base,
    AlternateBase,
    ToolTipBase,
    ToolTipText,
    Text,
    Button,
    ButtonText,
    BrightText,
    Highlight,
    HighlightedText,
}

impl ColorRole {
    pub const ALL: [ColorRole; 12] = [
        ColorRole::Window,
        ColorRole::WindowText,
        ColorRole::Base,
        ColorRole::AlternateBase,
        ColorRole::ToolTipBase,
        ColorRole::ToolTipText,
        ColorRole::Text,
        ColorRole::Button,
        ColorRole::ButtonText,
        ColorRole::BrightText,
        ColorRole::Highlight,
        ColorRole::HighlightedText,
    ];

    /// Name of the CSS color the stylesheets refer to.
    pub fn css_name(self) -> &'static str {
        use ColorRole::*;

        match self {
            Window => "theme_bg_color",
            WindowText => "theme_fg_color",
            Base => "theme_base_color",
            AlternateBase => "xfb_alternate_base_color",
            ToolTipBase => "theme_tooltip_bg_color",
            ToolTipText => "theme_tooltip_fg_color",
            Text => "theme_text_color",
            Button => "xfb_button_color",
            ButtonText => "xfb_button_text_color",
            BrightText => "error_color",
            Highlight => "theme_selected_bg_color",
            HighlightedText => "theme_selected_fg_color",
        }
    }
}

/// A complete palette: every role has a color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub window: Rgb,
    pub window_text: Rgb,
    pub base: Rgb,
    pub alternate_base: Rgb,
    pub tool_tip_base: Rgb,
    pub tool_tip_text: Rgb,
    pub text: Rgb,
    pub button: Rgb,
    pub button_text: Rgb,
    pub bright_text: Rgb,
    pub highlight: Rgb,
    pub highlighted_text: Rgb,
}

impl Palette {
    pub fn dark() -> Self {
        Palette {
            window: Rgb(30, 30, 46),
            window_text: Rgb(205, 214, 244),
            base: Rgb(24, 24, 37),
            alternate_base: Rgb(30, 30, 46),
            tool_tip_base: Rgb(205, 214, 244),
            tool_tip_text: Rgb(30, 30, 46),
            text: Rgb(205, 214, 244),
            button: Rgb(49, 50, 68),
            button_text: Rgb(205, 214, 244),
            bright_text: Rgb::RED,
            highlight: Rgb(137, 180, 250),
            highlighted_text: Rgb(30, 30, 46),
        }
    }

    pub fn light() -> Self {
        Palette {
            window: Rgb(239, 241, 245),
            window_text: Rgb(76, 79, 105),
            base: Rgb(255, 255, 255),
            alternate_base: Rgb(239, 241, 245),
            tool_tip_base: Rgb(76, 79, 105),
            tool_tip_text: Rgb(255, 255, 255),
            text: Rgb(76, 79, 105),
            button: Rgb(230, 233, 239),
            button_text: Rgb(76, 79, 105),
            bright_text: Rgb::RED,
            highlight: Rgb(30, 102, 245),
            highlighted_text: Rgb(255, 255, 255),
        }
    }

    pub fn color(&self, role: ColorRole) -> Rgb {
        use ColorRole::*;

        match role {
            Window => self.window,
            WindowText => self.window_text,
            Base => self.base,
            AlternateBase => self.alternate_base,
            ToolTipBase => self.tool_tip_base,
            ToolTipText => self.tool_tip_text,
            Text => self.text,
            Button => self.button,
            ButtonText => self.button_text,
            BrightText => self.bright_text,
            Highlight => self.highlight,
            HighlightedText => self.highlighted_text,
        }
    }

    /// Named color definitions for the toolkit's CSS engine,
    /// followed by the base rules which use them.
    ///
    /// The stylesheets refine these rules.
    pub fn to_css(&self) -> String {
        let mut css: String = ColorRole::ALL
            .iter()
            .map(|role| {
                format!(
                    "@define-color {} {};\n",
                    role.css_name(),
                    self.color(*role).to_hex()
                )
            })
            .collect();
        css.push_str(BASE_RULES);
        css
    }
}

const BASE_RULES: &str = "
window, .background {
    background-color: @theme_bg_color;
    color: @theme_fg_color;
}

entry, textview text, treeview, list, iconview {
    background-color: @theme_base_color;
    color: @theme_text_color;
}

list row:nth-child(even) {
    background-color: @xfb_alternate_base_color;
}

button {
    background-image: none;
    background-color: @xfb_button_color;
    color: @xfb_button_text_color;
}

tooltip, tooltip.background {
    background-color: @theme_tooltip_bg_color;
    color: @theme_tooltip_fg_color;
}

*:selected, selection {
    background-color: @theme_selected_bg_color;
    color: @theme_selected_fg_color;
}

.error {
    color: @error_color;
}
";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode {
            ThemeVariant::Dark
        } else {
            ThemeVariant::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeVariant::Dark
    }

    pub fn palette(self) -> Palette {
        match self {
            ThemeVariant::Dark => Palette::dark(),
            ThemeVariant::Light => Palette::light(),
        }
    }

    pub fn stylesheet_name(self) -> &'static str {
        match self {
            ThemeVariant::Dark => "darkstylesheet.css",
            ThemeVariant::Light => "stylesheet.css",
        }
    }
}

#[derive(Debug)]
pub enum StylesheetError {
    NotFound(&'static str),
    Read { path: PathBuf, source: io::Error },
}

impl fmt::Display for StylesheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StylesheetError::NotFound(name) => write!(f, "Theme: stylesheet {} not found", name),
            StylesheetError::Read { path, source } => write!(
                f,
                "Theme: couldn't open stylesheet {}: {}",
                path.display(),
                source
            ),
        }
    }
}

impl Error for StylesheetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StylesheetError::NotFound(_) => None,
            StylesheetError::Read { source, .. } => Some(source),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    pub variant: ThemeVariant,
    pub palette: Palette,
    pub stylesheet: Option<String>,
}

impl Theme {
    /// A missing stylesheet is not fatal: the palette still applies.
    pub fn load(variant: ThemeVariant, resources: &ResourceDirs) -> Self {
        let stylesheet = match Self::read_stylesheet(variant, resources) {
            Ok(stylesheet) => Some(stylesheet),
            Err(err) => {
                warn!("{}", err);
                None
            }
        };

        Theme {
            variant,
            palette: variant.palette(),
            stylesheet,
        }
    }

    fn read_stylesheet(
        variant: ThemeVariant,
        resources: &ResourceDirs,
    ) -> Result<String, StylesheetError> {
        let name = variant.stylesheet_name();
        let path = resources
            .find(name)
            .ok_or(StylesheetError::NotFound(name))?;

        let bytes = fs::read(&path).map_err(|source| StylesheetError::Read {
            path: path.clone(),
            source,
        })?;
        debug!("read stylesheet {}", path.display());

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_background() {
        let dark = ThemeVariant::from_dark_mode(true).palette();
        assert_eq!(dark.color(ColorRole::Window), Rgb(0x1e, 0x1e, 0x2e));

        let light = ThemeVariant::from_dark_mode(false).palette();
        assert_eq!(light.color(ColorRole::Window), Rgb(0xef, 0xf1, 0xf5));
    }

    #[test]
    fn css_defines_every_role() {
        let css = Palette::dark().to_css();
        let definitions = css
            .lines()
            .filter(|line| line.starts_with("@define-color"))
            .count();
        assert_eq!(definitions, ColorRole::ALL.len());
        for role in ColorRole::ALL.iter() {
            assert!(
                css.contains(&format!("@define-color {} ", role.css_name())),
                "{:?}",
                role
            );
        }
        assert!(css.contains("@define-color theme_bg_color #1e1e2e;"));
        assert!(css.contains("@define-color theme_selected_bg_color #89b4fa;"));
        assert!(Palette::light()
            .to_css()
            .contains("@define-color theme_selected_bg_color #1e66f5;"));
    }

    #[test]
    fn palette_applies_without_stylesheet() {
        let css = Palette::light().to_css();
        for rule in [
            "window, .background {",
            "entry, textview text",
            "button {",
            "tooltip, tooltip.background {",
            "*:selected, selection {",
        ] {
            assert!(css.contains(rule), "missing rule {}", rule);
        }

        // every color is used by a rule
        for role in ColorRole::ALL.iter() {
            let reference = format!("@{};", role.css_name());
            assert!(css.contains(&reference), "{:?} unused", role);
        }
    }

    #[test]
    fn stylesheet_selection() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("darkstylesheet.css"), "window {}").unwrap();
        let resources = ResourceDirs::new(vec![root.path().to_owned()]);

        let dark = Theme::load(ThemeVariant::Dark, &resources);
        assert_eq!(dark.stylesheet.as_deref(), Some("window {}"));
        assert_eq!(dark.palette, Palette::dark());

        // missing stylesheet: palette only
        let light = Theme::load(ThemeVariant::Light, &resources);
        assert_eq!(light.stylesheet, None);
        assert_eq!(light.palette, Palette::light());
    }

    #[test]
    fn bundled_stylesheets() {
        let res = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("res");
        let resources = ResourceDirs::new(vec![res]);
        for variant in [ThemeVariant::Dark, ThemeVariant::Light] {
            let theme = Theme::load(variant, &resources);
            let stylesheet = theme.stylesheet.unwrap();
            assert!(stylesheet.contains("@theme_bg_color"));
        }
    }
}
