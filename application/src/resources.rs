use log::trace;

use std::path::{Path, PathBuf};

use crate::project_dirs;

/// Ordered list of directories holding the read-only application resources
/// (stylesheets, splash image, icon).
#[derive(Clone, Debug, Default)]
pub struct ResourceDirs(Vec<PathBuf>);

impl ResourceDirs {
    pub fn new(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        ResourceDirs(dirs.into_iter().collect())
    }

    /// Development tree first so that latest changes are reflected,
    /// then the user's data dir and the system install.
    pub fn standard() -> Self {
        let mut dirs = vec![PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("res")];

        if let Some(project_dirs) = project_dirs() {
            dirs.push(project_dirs.data_dir().to_owned());
        }

        // FIXME: figure out macOS bundle conventions
        #[cfg(all(target_family = "unix", not(target_os = "macos")))]
        dirs.push(PathBuf::from("/usr/share").join(crate::TEXT_DOMAIN));

        ResourceDirs(dirs)
    }

    pub fn prepend(mut self, dir: impl Into<PathBuf>) -> Self {
        self.0.insert(0, dir.into());
        self
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.0
    }

    /// Returns the first existing file named `name` in the search path.
    pub fn find(&self, name: impl AsRef<Path>) -> Option<PathBuf> {
        let name = name.as_ref();
        self.0
            .iter()
            .map(|dir| dir.join(name))
            .inspect(|path| trace!("looking for resource {}", path.display()))
            .find(|path| path.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn find_first_match() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(second.path().join("a.css"), "second").unwrap();
        fs::write(second.path().join("b.css"), "second").unwrap();
        fs::write(first.path().join("b.css"), "first").unwrap();

        let dirs = ResourceDirs::new(vec![first.path().to_owned(), second.path().to_owned()]);
        assert_eq!(dirs.find("a.css"), Some(second.path().join("a.css")));
        assert_eq!(dirs.find("b.css"), Some(first.path().join("b.css")));
        assert_eq!(dirs.find("c.css"), None);
    }

    #[test]
    fn prepend_takes_precedence() {
        let dirs = ResourceDirs::new(vec![PathBuf::from("b")]).prepend("a");
        assert_eq!(dirs.dirs(), &[PathBuf::from("a"), PathBuf::from("b")]);
    }

    #[test]
    fn directories_are_not_files() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("stylesheet.css")).unwrap();

        let dirs = ResourceDirs::new(vec![root.path().to_owned()]);
        assert_eq!(dirs.find("stylesheet.css"), None);
    }
}
