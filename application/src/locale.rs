use gettextrs::{
    bind_textdomain_codeset, bindtextdomain, dgettext, setlocale, textdomain, LocaleCategory,
};
use log::{debug, info, warn};

use std::{
    env,
    error::Error,
    fmt, fs, io,
    path::{Path, PathBuf},
};

use crate::{project_dirs, TEXT_DOMAIN};

const MO_MAGIC: u32 = 0x9504_12de;
const MO_HEADER_LEN: usize = 28;

/// Locales under which gettext honors `LANGUAGE` whatever the user's locale.
const MESSAGES_FALLBACK_LOCALES: [&str; 2] = ["C.UTF-8", "C.utf8"];

/// Interface languages. Source strings are in English.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Language {
    Portuguese,
    French,
    /// English or any code without a catalog.
    Source(String),
}

impl Language {
    pub fn from_code(code: &str) -> Self {
        match code {
            "pt" => Language::Portuguese,
            "fr" => Language::French,
            other => Language::Source(other.to_owned()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Language::Portuguese => "pt",
            Language::French => "fr",
            Language::Source(code) => code,
        }
    }

    pub fn has_catalog(&self) -> bool {
        !matches!(self, Language::Source(_))
    }
}

#[derive(Debug)]
pub enum CatalogError {
    NotFound(Language),
    Read { path: PathBuf, source: io::Error },
    Corrupt(PathBuf),
    Install(io::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CatalogError::*;

        match self {
            NotFound(lang) => write!(f, "Locale: no catalog found for {}", lang.code()),
            Read { path, source } => {
                write!(f, "Locale: couldn't read {}: {}", path.display(), source)
            }
            Corrupt(path) => write!(f, "Locale: {} is not a valid catalog", path.display()),
            Install(err) => write!(f, "Locale: couldn't install catalog: {}", err),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CatalogError::Read { source, .. } => Some(source),
            CatalogError::Install(err) => Some(err),
            _ => None,
        }
    }
}

/// Ordered list of directories laid out as `<dir>/<lang>/LC_MESSAGES/xfb.mo`.
#[derive(Clone, Debug, Default)]
pub struct LocaleDirs(Vec<PathBuf>);

impl LocaleDirs {
    pub fn new(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        LocaleDirs(dirs.into_iter().collect())
    }

    /// Search translations under `target` first
    /// in order to reflect latest changes during development.
    pub fn standard() -> Self {
        let mut dirs = vec![PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("target")
            .join("locale")];

        // Add user's data dir in the search path
        if let Some(project_dirs) = project_dirs() {
            let app_data_dir = project_dirs.data_dir();

            // FIXME: figure out macOS conventions
            cfg_if::cfg_if! {
                if #[cfg(all(target_family = "unix", not(target_os = "macos")))] {
                    if let Some(data_dir) = app_data_dir.parent() {
                        dirs.push(data_dir.join("locale"));
                    }
                } else {
                    dirs.push(app_data_dir.join("locale"));
                }
            }
        }

        #[cfg(target_family = "unix")]
        dirs.push(PathBuf::from("/usr/share/locale"));

        LocaleDirs(dirs)
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.0
    }

    fn find(&self, lang: &Language) -> Option<(PathBuf, PathBuf)> {
        self.0.iter().find_map(|dir| {
            let path = dir
                .join(lang.code())
                .join("LC_MESSAGES")
                .join(format!("{}.mo", TEXT_DOMAIN));
            if path.is_file() {
                Some((dir.clone(), path))
            } else {
                None
            }
        })
    }
}

/// A translation catalog which was found and passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    language: Language,
    dir: PathBuf,
    path: PathBuf,
}

impl Catalog {
    pub fn load(language: &Language, dirs: &LocaleDirs) -> Result<Catalog, CatalogError> {
        let (dir, path) = dirs
            .find(language)
            .ok_or_else(|| CatalogError::NotFound(language.clone()))?;

        let bytes = fs::read(&path).map_err(|source| CatalogError::Read {
            path: path.clone(),
            source,
        })?;
        if !is_mo_file(&bytes) {
            return Err(CatalogError::Corrupt(path));
        }

        debug!("found catalog {}", path.display());

        Ok(Catalog {
            language: language.clone(),
            dir,
            path,
        })
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Makes `gettext` use this catalog for the rest of the process.
    ///
    /// Fails if the catalog can't take effect, e.g. when no usable locale is
    /// available for messages.
    pub fn install(&self) -> Result<(), CatalogError> {
        self.bind(TEXT_DOMAIN)?;
        textdomain(TEXT_DOMAIN).map_err(CatalogError::Install)?;

        info!("Installed catalog {}", self.path.display());

        Ok(())
    }

    fn bind(&self, domain: &str) -> Result<(), CatalogError> {
        // LANGUAGE takes precedence over the user's locale for messages
        env::set_var("LANGUAGE", self.language.code());
        let locale = setlocale(LocaleCategory::LcAll, "");
        debug!("`setlocale` returned {:?}", locale);
        set_messages_locale()?;

        bindtextdomain(domain, self.dir.as_path()).map_err(CatalogError::Install)?;
        bind_textdomain_codeset(domain, "UTF-8").map_err(CatalogError::Install)?;

        // The empty msgid yields the catalog header once the catalog is in use
        if dgettext(domain, "").is_empty() {
            return Err(CatalogError::Install(io::Error::new(
                io::ErrorKind::Other,
                format!("{} is not used for messages", self.path.display()),
            )));
        }

        Ok(())
    }
}

/// gettext ignores `LANGUAGE` under the `C` locale, which is what the process
/// gets when `LANG` is unset or names a locale which isn't generated.
fn set_messages_locale() -> Result<(), CatalogError> {
    let current = setlocale(LocaleCategory::LcMessages, "");
    if !is_c_locale(current.as_deref()) {
        return Ok(());
    }

    warn!(
        "Messages locale is {:?}, looking for a UTF-8 locale",
        current.as_deref().map(String::from_utf8_lossy),
    );
    for candidate in MESSAGES_FALLBACK_LOCALES.iter() {
        if let Some(locale) = setlocale(LocaleCategory::LcMessages, *candidate) {
            if !is_c_locale(Some(locale.as_slice())) {
                debug!("messages locale set to {}", String::from_utf8_lossy(&locale));
                return Ok(());
            }
        }
    }

    Err(CatalogError::Install(io::Error::new(
        io::ErrorKind::Other,
        "no locale available for translated messages",
    )))
}

fn is_c_locale(locale: Option<&[u8]>) -> bool {
    matches!(locale, None | Some(b"C") | Some(b"POSIX"))
}

fn is_mo_file(bytes: &[u8]) -> bool {
    if bytes.len() < MO_HEADER_LEN {
        return false;
    }

    let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
    u32::from_le_bytes(magic) == MO_MAGIC || u32::from_be_bytes(magic) == MO_MAGIC
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// An empty but valid little-endian MO file.
    pub(crate) fn empty_mo() -> Vec<u8> {
        let mut bytes = Vec::with_capacity(MO_HEADER_LEN);
        for word in [MO_MAGIC, 0, 0, 28, 28, 0, 28] {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    /// A little-endian MO file with the given entries, sorted by msgid.
    fn mo_with(entries: &[(&str, &str)]) -> Vec<u8> {
        let count = entries.len() as u32;
        let originals = MO_HEADER_LEN as u32;
        let translations = originals + 8 * count;
        let mut offset = translations + 8 * count;

        let mut tables = Vec::new();
        let mut strings = Vec::new();
        let msgids = entries.iter().map(|(msgid, _)| *msgid);
        let msgstrs = entries.iter().map(|(_, msgstr)| *msgstr);
        for string in msgids.chain(msgstrs) {
            tables.push((string.len() as u32, offset));
            strings.extend_from_slice(string.as_bytes());
            strings.push(0);
            offset += string.len() as u32 + 1;
        }

        let mut bytes = Vec::new();
        for word in [MO_MAGIC, 0, count, originals, translations, 0, offset] {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        for (len, offset) in tables {
            bytes.extend_from_slice(&len.to_le_bytes());
            bytes.extend_from_slice(&offset.to_le_bytes());
        }
        bytes.extend_from_slice(&strings);
        bytes
    }

    pub(crate) fn write_catalog(root: &Path, code: &str, bytes: &[u8]) -> PathBuf {
        let dir = root.join(code).join("LC_MESSAGES");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{}.mo", TEXT_DOMAIN));
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn language_codes() {
        assert_eq!(Language::from_code("pt"), Language::Portuguese);
        assert_eq!(Language::from_code("fr"), Language::French);
        assert_eq!(Language::from_code("en"), Language::Source("en".to_owned()));
        assert_eq!(Language::from_code("xx").code(), "xx");
        assert!(Language::French.has_catalog());
        assert!(!Language::from_code("en").has_catalog());
    }

    #[test]
    fn load_valid_catalog() {
        let root = tempfile::tempdir().unwrap();
        let path = write_catalog(root.path(), "pt", &empty_mo());

        let dirs = LocaleDirs::new(vec![root.path().join("nowhere"), root.path().to_owned()]);
        let catalog = Catalog::load(&Language::Portuguese, &dirs).unwrap();
        assert_eq!(catalog.language(), &Language::Portuguese);
        assert_eq!(catalog.path(), path.as_path());
    }

    #[test]
    fn big_endian_magic() {
        let mut bytes = empty_mo();
        bytes[..4].copy_from_slice(&MO_MAGIC.to_be_bytes());
        assert!(is_mo_file(&bytes));
    }

    #[test]
    fn missing_catalog() {
        let root = tempfile::tempdir().unwrap();
        write_catalog(root.path(), "pt", &empty_mo());

        let dirs = LocaleDirs::new(vec![root.path().to_owned()]);
        match Catalog::load(&Language::French, &dirs) {
            Err(CatalogError::NotFound(lang)) => assert_eq!(lang, Language::French),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn installed_catalog_translates() {
        const DOMAIN: &str = "xfb-install-check";
        const MSGID: &str = "Catalog install check";

        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("fr").join("LC_MESSAGES");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{}.mo", DOMAIN));
        fs::write(
            &path,
            mo_with(&[
                ("", "Content-Type: text/plain; charset=UTF-8\n"),
                (MSGID, "Vérification de l'installation"),
            ]),
        )
        .unwrap();

        let catalog = Catalog {
            language: Language::French,
            dir: root.path().to_owned(),
            path,
        };

        // Success means the translation is actually in use,
        // whatever the locale of the test process
        match catalog.bind(DOMAIN) {
            Ok(()) => assert_eq!(dgettext(DOMAIN, MSGID), "Vérification de l'installation"),
            Err(CatalogError::Install(_)) => assert_eq!(dgettext(DOMAIN, MSGID), MSGID),
            Err(other) => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn c_locales() {
        assert!(is_c_locale(None));
        assert!(is_c_locale(Some(&b"C"[..])));
        assert!(is_c_locale(Some(&b"POSIX"[..])));
        assert!(!is_c_locale(Some(&b"C.UTF-8"[..])));
        assert!(!is_c_locale(Some(&b"fr_FR.UTF-8"[..])));
    }

    #[test]
    fn corrupt_catalog() {
        let root = tempfile::tempdir().unwrap();
        write_catalog(root.path(), "fr", b"msgid \"\"\nmsgstr \"\"\n not compiled");

        let dirs = LocaleDirs::new(vec![root.path().to_owned()]);
        assert!(matches!(
            Catalog::load(&Language::French, &dirs),
            Err(CatalogError::Corrupt(_))
        ));
    }
}
