use once_cell::sync::Lazy;

pub const TLD: &str = "org";
pub const ORGANIZATION: &str = "Netpack - Online Solutions";
pub const APP_NAME: &str = "XFB";

/// Name of the gettext domain and of the installed binary.
pub const TEXT_DOMAIN: &str = "xfb";

pub static APP_ID: Lazy<String> = Lazy::new(|| format!("{}.netpack.{}", TLD, TEXT_DOMAIN));

mod bootstrap;
pub use self::bootstrap::{Bootstrap, Launch, LocaleOutcome, Shell, Stage, Status, StatusKind};

mod command_line;
pub use self::command_line::{command_line, CommandLineArguments};

mod configuration;
pub use self::configuration::{
    project_dirs, ConfigError, ConfigResolver, Resolution, CONFIG_FILENAME, DEFAULT_CONFIG,
    FATAL_EXIT_CODE,
};

mod environment;
pub use self::environment::{init_environment, EnvVar, ENVIRONMENT};

pub mod locale;
pub use self::locale::{Catalog, CatalogError, Language, LocaleDirs};

mod resources;
pub use self::resources::ResourceDirs;

pub mod settings;
pub use self::settings::Settings;

pub mod theme;
pub use self::theme::{ColorRole, Palette, Rgb, StylesheetError, Theme, ThemeVariant};

mod window_state;
pub use self::window_state::{WindowState, WindowStateStore};
