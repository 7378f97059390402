use gettextrs::gettext;
use log::{debug, error};
use serde_derive::{Deserialize, Serialize};

use std::{
    error::Error,
    fmt,
    fs::{self, File},
    io,
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
};

use crate::project_dirs;

const WINDOW_STATE_FILENAME: &str = "window.ron";

/// Geometry of the main window, restored on next start.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct WindowState {
    pub width: i32,
    pub height: i32,
    pub is_maximized: bool,
}

#[derive(Debug)]
enum SaveError {
    Io(io::Error),
    Serialize(ron::Error),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(err) => err.fmt(f),
            SaveError::Serialize(err) => err.fmt(f),
        }
    }
}

impl Error for SaveError {}

impl From<io::Error> for SaveError {
    fn from(err: io::Error) -> Self {
        SaveError::Io(err)
    }
}

impl From<ron::Error> for SaveError {
    fn from(err: ron::Error) -> Self {
        SaveError::Serialize(err)
    }
}

fn write_state(path: &Path, state: &WindowState) -> Result<(), SaveError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let state_str = ron::ser::to_string_pretty(state, ron::ser::PrettyConfig::default())?;
    fs::write(path, state_str)?;

    Ok(())
}

/// Persistent store owned by the main window.
pub struct WindowStateStore {
    path: Option<PathBuf>,
    last: WindowState,
    current: WindowState,
}

impl WindowStateStore {
    /// Opens the store in the user's data dir.
    pub fn open() -> Self {
        let path = project_dirs().map(|dirs| dirs.data_dir().join(WINDOW_STATE_FILENAME));
        if path.is_none() {
            error!("{}", gettext("couldn't find a data directory for this platform"));
        }
        Self::open_path(path)
    }

    pub fn open_path(path: Option<PathBuf>) -> Self {
        let last = path
            .as_ref()
            .and_then(|path| File::open(path).ok())
            .map(|file| match ron::de::from_reader::<_, WindowState>(file) {
                Ok(state) => {
                    debug!("read window state: {:?}", state);
                    state
                }
                Err(err) => {
                    error!(
                        "{}",
                        &gettext("couldn't load window state: {}").replacen(
                            "{}",
                            &format!("{:?}", err),
                            1
                        ),
                    );
                    WindowState::default()
                }
            })
            .unwrap_or_default();

        WindowStateStore {
            path,
            current: last.clone(),
            last,
        }
    }

    pub fn save(&mut self) {
        if self.last == self.current {
            // unchanged => don't save
            return;
        }

        let path = match self.path.as_ref() {
            Some(path) => path,
            None => return,
        };

        match write_state(path, &self.current) {
            Ok(()) => {
                self.last = self.current.clone();
                debug!("saved window state: {:?}", self.current);
            }
            Err(err) => error!(
                "{}",
                gettext("couldn't save window state: {}").replacen("{}", &err.to_string(), 1),
            ),
        }
    }
}

impl Deref for WindowStateStore {
    type Target = WindowState;

    fn deref(&self) -> &Self::Target {
        &self.current
    }
}

impl DerefMut for WindowStateStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn save_and_restore() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("data").join(WINDOW_STATE_FILENAME);

        let mut store = WindowStateStore::open_path(Some(path.clone()));
        assert_eq!(*store, WindowState::default());

        // unchanged => nothing written
        store.save();
        assert!(!path.exists());

        store.width = 1280;
        store.height = 720;
        store.save();
        assert!(path.exists());

        let store = WindowStateStore::open_path(Some(path));
        assert_eq!(
            *store,
            WindowState {
                width: 1280,
                height: 720,
                is_maximized: false,
            }
        );
    }

    #[test]
    fn invalid_state_falls_back_to_default() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join(WINDOW_STATE_FILENAME);
        fs::write(&path, "not ron at all (").unwrap();

        let store = WindowStateStore::open_path(Some(path));
        assert_eq!(*store, WindowState::default());
    }

    #[test]
    fn failed_save_keeps_changes_pending() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("data");
        fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join(WINDOW_STATE_FILENAME);

        let mut store = WindowStateStore::open_path(Some(path.clone()));
        store.width = 800;
        store.save();
        assert!(!path.exists());
        assert_ne!(store.last, store.current);

        // next attempt succeeds once the location is usable
        fs::remove_file(&blocker).unwrap();
        store.save();
        assert!(path.exists());
        assert_eq!(store.last, store.current);
    }

    #[test]
    fn no_path() {
        let mut store = WindowStateStore::open_path(None);
        store.is_maximized = true;
        store.save();
        assert!(store.is_maximized);
    }
}
