use directories::ProjectDirs;
use log::{debug, info, warn};

use std::{
    error::Error,
    fmt,
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::{APP_NAME, ORGANIZATION, TLD};

pub const CONFIG_FILENAME: &str = "xfb.conf";

/// Default configuration, copied to the user's config dir on first run.
pub const DEFAULT_CONFIG: &[u8] = include_bytes!("../../res/xfb.conf");

/// Process exit code when the configuration can't be set up.
pub const FATAL_EXIT_CODE: i32 = 1;

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(TLD, ORGANIZATION, APP_NAME)
}

#[derive(Debug)]
pub enum ConfigError {
    LocationUnavailable,
    CreateDir { path: PathBuf, source: io::Error },
    CopyDefault { path: PathBuf, source: io::Error },
}

impl ConfigError {
    pub fn exit_code(&self) -> i32 {
        FATAL_EXIT_CODE
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ConfigError::*;

        match self {
            LocationUnavailable => write!(f, "Cannot find writable location for configuration"),
            CreateDir { path, .. } => write!(
                f,
                "Could not create configuration directory {}",
                path.display()
            ),
            CopyDefault { path, .. } => write!(
                f,
                "Could not copy default configuration file to {}",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use ConfigError::*;

        match self {
            LocationUnavailable => None,
            CreateDir { source, .. } | CopyDefault { source, .. } => Some(source),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub path: PathBuf,
    pub created_dir: bool,
    pub seeded: bool,
}

/// Locates the user's configuration file, creating it from the bundled
/// default on first run. An existing file is never touched.
pub struct ConfigResolver<'a> {
    dir: Option<PathBuf>,
    default_config: &'a [u8],
}

impl ConfigResolver<'static> {
    pub fn new(dir: Option<PathBuf>) -> Self {
        ConfigResolver {
            dir,
            default_config: DEFAULT_CONFIG,
        }
    }

    /// Uses the platform's per-user configuration directory.
    pub fn standard() -> Self {
        Self::new(project_dirs().map(|dirs| dirs.config_dir().to_owned()))
    }
}

impl<'a> ConfigResolver<'a> {
    pub fn with_default_config(self, default_config: &'a [u8]) -> ConfigResolver<'a> {
        ConfigResolver {
            dir: self.dir,
            default_config,
        }
    }

    pub fn config_dir(&self) -> Result<&Path, ConfigError> {
        match self.dir.as_deref() {
            Some(dir) if !dir.as_os_str().is_empty() => Ok(dir),
            _ => Err(ConfigError::LocationUnavailable),
        }
    }

    /// `before_seeding` is called when the default configuration
    /// is about to be copied.
    pub fn resolve(&self, before_seeding: impl FnOnce()) -> Result<Resolution, ConfigError> {
        let dir = self.config_dir()?;

        let created_dir = if dir.is_dir() {
            false
        } else {
            info!("Creating configuration directory {}", dir.display());
            fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
                path: dir.to_owned(),
                source,
            })?;
            true
        };

        let path = dir.join(CONFIG_FILENAME);
        let seeded = if path.exists() {
            debug!("Using existing configuration file {}", path.display());
            false
        } else {
            before_seeding();
            self.seed(&path)?
        };

        Ok(Resolution {
            path,
            created_dir,
            seeded,
        })
    }

    fn seed(&self, path: &Path) -> Result<bool, ConfigError> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                debug!("Configuration file {} appeared meanwhile", path.display());
                return Ok(false);
            }
            Err(source) => {
                return Err(ConfigError::CopyDefault {
                    path: path.to_owned(),
                    source,
                })
            }
        };

        if let Err(source) = file.write_all(self.default_config) {
            drop(file);
            // don't leave a truncated copy behind, it would be used on next run
            let _ = fs::remove_file(path);
            return Err(ConfigError::CopyDefault {
                path: path.to_owned(),
                source,
            });
        }

        info!("Copied default configuration to {}", path.display());
        set_user_writable(path);

        Ok(true)
    }
}

fn set_user_writable(path: &Path) {
    cfg_if::cfg_if! {
        if #[cfg(target_family = "unix")] {
            use std::os::unix::fs::PermissionsExt;

            if let Err(err) = fs::set_permissions(path, fs::Permissions::from_mode(0o644)) {
                warn!("Couldn't set permissions on {}: {}", path.display(), err);
            }
        } else {
            match fs::metadata(path) {
                Ok(metadata) => {
                    let mut permissions = metadata.permissions();
                    permissions.set_readonly(false);
                    if let Err(err) = fs::set_permissions(path, permissions) {
                        warn!("Couldn't set permissions on {}: {}", path.display(), err);
                    }
                }
                Err(err) => warn!("Couldn't get permissions for {}: {}", path.display(), err),
            }
        }
    }
}
