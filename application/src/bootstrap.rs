//! Startup sequence, from the splash screen to the main window.
//!
//! The sequence is strictly linear:
//!
//! `EnvSetup → AppInit → SplashShown → ConfigResolved → SettingsLoaded →
//! LocaleInstalled → ThemeApplied → WindowShown → EventLoop`
//!
//! [`Bootstrap::run`] drives the stages from `SplashShown` to `WindowShown`
//! through a [`Shell`], which abstracts the toolkit. The other stages are
//! driven by the caller.

use gettextrs::gettext;
use log::{debug, info, warn};

use std::{path::PathBuf, time::Duration};

use crate::{
    Catalog, CatalogError, CommandLineArguments, ConfigError, ConfigResolver, Language,
    LocaleDirs, ResourceDirs, Settings, Theme, ThemeVariant, APP_NAME,
};

/// Minimum display duration of the failed translation status.
pub const TRANSLATION_FAILURE_DWELL: Duration = Duration::from_millis(1500);
/// Minimum display duration of the ready status.
pub const READY_DWELL: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    EnvSetup,
    AppInit,
    SplashShown,
    ConfigResolved,
    SettingsLoaded,
    LocaleInstalled,
    ThemeApplied,
    WindowShown,
    EventLoop,
}

impl Stage {
    pub fn next(self) -> Option<Stage> {
        use Stage::*;

        match self {
            EnvSetup => Some(AppInit),
            AppInit => Some(SplashShown),
            SplashShown => Some(ConfigResolved),
            ConfigResolved => Some(SettingsLoaded),
            SettingsLoaded => Some(LocaleInstalled),
            LocaleInstalled => Some(ThemeApplied),
            ThemeApplied => Some(WindowShown),
            WindowShown => Some(EventLoop),
            EventLoop => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
}

/// A message for the splash screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub kind: StatusKind,
    /// The presenter must keep the message visible at least this long.
    pub min_display: Duration,
}

impl Status {
    pub fn info(message: impl ToString) -> Self {
        Status {
            message: message.to_string(),
            kind: StatusKind::Info,
            min_display: Duration::ZERO,
        }
    }

    pub fn warning(message: impl ToString) -> Self {
        Status {
            message: message.to_string(),
            kind: StatusKind::Warning,
            min_display: Duration::ZERO,
        }
    }

    pub fn with_min_display(mut self, min_display: Duration) -> Self {
        self.min_display = min_display;
        self
    }
}

/// What the startup sequence needs from the toolkit.
pub trait Shell {
    fn enter_stage(&mut self, _stage: Stage) {}
    fn show_status(&mut self, status: Status);
    fn install_catalog(&mut self, catalog: &Catalog) -> Result<(), CatalogError>;
    fn apply_theme(&mut self, theme: &Theme);
    fn build_main_window(&mut self);
    /// Shows the main window and retires the splash screen.
    fn show_main_window(&mut self, full_screen: bool);
}

#[derive(Debug)]
pub enum LocaleOutcome {
    Installed(Language),
    /// The catalog couldn't be used: source strings are displayed.
    Fallback(Language, CatalogError),
    SourceStrings(Language),
}

impl LocaleOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, LocaleOutcome::Installed(_))
    }
}

/// Result of a successful startup.
#[derive(Debug)]
pub struct Launch {
    pub config_path: PathBuf,
    pub created_config_dir: bool,
    pub seeded_config: bool,
    pub settings: Settings,
    pub locale: LocaleOutcome,
    pub theme: ThemeVariant,
}

pub struct Bootstrap {
    resolver: ConfigResolver<'static>,
    resources: ResourceDirs,
    locale_dirs: LocaleDirs,
}

impl Bootstrap {
    pub fn new(
        resolver: ConfigResolver<'static>,
        resources: ResourceDirs,
        locale_dirs: LocaleDirs,
    ) -> Self {
        Bootstrap {
            resolver,
            resources,
            locale_dirs,
        }
    }

    /// Platform locations, overridden by the command line where requested.
    pub fn from_args(args: &CommandLineArguments) -> Self {
        let resolver = match args.config_dir.as_ref() {
            Some(config_dir) => ConfigResolver::new(Some(config_dir.clone())),
            None => ConfigResolver::standard(),
        };

        let resources = match args.resource_dir.as_ref() {
            Some(resource_dir) => ResourceDirs::standard().prepend(resource_dir.clone()),
            None => ResourceDirs::standard(),
        };

        Bootstrap::new(resolver, resources, LocaleDirs::standard())
    }

    pub fn resources(&self) -> &ResourceDirs {
        &self.resources
    }

    pub fn run(&self, shell: &mut impl Shell) -> Result<Launch, ConfigError> {
        let mut sequencer = Sequencer::new(shell);

        sequencer.enter(Stage::SplashShown);
        sequencer.status(Status::info(gettext("Initializing...")));

        let resolution = self.resolver.resolve(|| {
            sequencer.status(Status::info(gettext("Setting up default configuration...")))
        })?;
        sequencer.enter(Stage::ConfigResolved);

        sequencer.status(Status::info(gettext("Loading settings...")));
        let settings = Settings::load(&resolution.path);
        debug!(
            "Settings loaded - language: {}, full screen: {}, dark mode: {}",
            settings.language, settings.full_screen, settings.dark_mode,
        );
        sequencer.enter(Stage::SettingsLoaded);

        let locale = self.install_locale(&mut sequencer, &settings.language);
        sequencer.enter(Stage::LocaleInstalled);

        sequencer.status(Status::info(gettext("Applying theme...")));
        let variant = ThemeVariant::from_dark_mode(settings.dark_mode);
        let theme = Theme::load(variant, &self.resources);
        sequencer.shell.apply_theme(&theme);
        debug!("Applied {:?} theme", variant);
        sequencer.enter(Stage::ThemeApplied);

        sequencer.status(Status::info(gettext("Loading main window...")));
        sequencer.shell.build_main_window();

        sequencer.status(
            Status::info(gettext("{} is Ready!").replacen("{}", APP_NAME, 1))
                .with_min_display(READY_DWELL),
        );
        sequencer.shell.show_main_window(settings.full_screen);
        sequencer.enter(Stage::WindowShown);

        Ok(Launch {
            config_path: resolution.path,
            created_config_dir: resolution.created_dir,
            seeded_config: resolution.seeded,
            settings,
            locale,
            theme: variant,
        })
    }

    fn install_locale<S: Shell>(
        &self,
        sequencer: &mut Sequencer<'_, S>,
        code: &str,
    ) -> LocaleOutcome {
        let language = Language::from_code(code);

        let msg = match language {
            Language::Portuguese => gettext("Loading Portuguese GUI..."),
            Language::French => gettext("Loading French GUI..."),
            Language::Source(_) => gettext("Loading English GUI..."),
        };
        sequencer.status(Status::info(msg));

        if !language.has_catalog() {
            debug!("Using source strings for language {}", language.code());
            return LocaleOutcome::SourceStrings(language);
        }

        let res = Catalog::load(&language, &self.locale_dirs)
            .and_then(|catalog| sequencer.shell.install_catalog(&catalog));

        match res {
            Ok(()) => {
                info!("Installed translation for language {}", language.code());
                LocaleOutcome::Installed(language)
            }
            Err(err) => {
                warn!(
                    "Failed to load translation for language {}: {}",
                    language.code(),
                    err
                );
                sequencer.status(
                    Status::warning(gettext("Failed to load translation!"))
                        .with_min_display(TRANSLATION_FAILURE_DWELL),
                );
                LocaleOutcome::Fallback(language, err)
            }
        }
    }
}

/// Forwards to the shell while checking that stages only move forward.
struct Sequencer<'a, S: Shell> {
    shell: &'a mut S,
    stage: Stage,
}

impl<'a, S: Shell> Sequencer<'a, S> {
    fn new(shell: &'a mut S) -> Self {
        Sequencer {
            shell,
            stage: Stage::AppInit,
        }
    }

    fn enter(&mut self, stage: Stage) {
        debug_assert_eq!(self.stage.next(), Some(stage));
        debug!("bootstrap: {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
        self.shell.enter_stage(stage);
    }

    fn status(&mut self, status: Status) {
        self.shell.show_status(status);
    }
}
