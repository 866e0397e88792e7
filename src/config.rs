use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::debug;

use crate::error::{AppError, AppResult};

pub const CONFIG_SECTION: &str = "fedora-create-review";
pub const CONFIG_FILE_NAME: &str = "fedora-create-review";
pub const DEFAULT_UPLOAD_TARGET: &str = "fedorapeople.org:public_html/";
pub const DEFAULT_BUGZILLA_URL: &str = "https://bugzilla.redhat.com";

const UPLOAD_TARGET_KEY: &str = "upload_target";
const BUGZILLA_URL_KEY: &str = "bugzilla_url";
const API_KEY_KEY: &str = "api_key";
const API_KEY_ENV: &str = "BUGZILLA_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `host:path` handed to scp as the upload destination.
    pub upload_target: String,
    pub bugzilla_url: String,
    pub api_key: Option<String>,
}

/// Values written into the settings file when a key is missing.
#[derive(Debug, Clone)]
pub struct ConfigDefaults {
    pub upload_target: String,
    pub bugzilla_url: String,
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self {
            upload_target: DEFAULT_UPLOAD_TARGET.to_string(),
            bugzilla_url: DEFAULT_BUGZILLA_URL.to_string(),
        }
    }
}

pub struct ConfigStore {
    path: PathBuf,
    defaults: ConfigDefaults,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            defaults: ConfigDefaults::default(),
        }
    }

    /// Store rooted at the per-user config directory.
    pub fn user() -> AppResult<Self> {
        Ok(Self::new(config_file_path()?))
    }

    #[cfg(test)]
    pub fn with_defaults(mut self, defaults: ConfigDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the settings file, creating it on first use and writing back any
    /// defaulted key that the file does not carry yet.
    pub fn load(&self) -> AppResult<Settings> {
        self.load_with_env_key(env::var(API_KEY_ENV).ok())
    }

    /// `env_api_key` wins over the stored `api_key` when it is non-empty.
    fn load_with_env_key(&self, env_api_key: Option<String>) -> AppResult<Settings> {
        let is_new = self.ensure_parent()?;

        let mut ini = if is_new {
            Ini::new()
        } else {
            Ini::load_from_file(&self.path).map_err(|err| {
                AppError::Configuration(format!(
                    "invalid settings file {}: {err}",
                    self.path.display()
                ))
            })?
        };

        let mut dirty = is_new;
        let upload_target = self.value_or_default(
            &mut ini,
            UPLOAD_TARGET_KEY,
            &self.defaults.upload_target,
            &mut dirty,
        );
        let bugzilla_url = self.value_or_default(
            &mut ini,
            BUGZILLA_URL_KEY,
            &self.defaults.bugzilla_url,
            &mut dirty,
        );
        let stored_api_key = ini
            .get_from(Some(CONFIG_SECTION), API_KEY_KEY)
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string);

        if dirty {
            debug!(path = %self.path.display(), "writing settings file");
            ini.write_to_file(&self.path)?;
        }

        let api_key = env_api_key
            .filter(|key| !key.trim().is_empty())
            .or(stored_api_key);

        Ok(Settings {
            upload_target,
            bugzilla_url,
            api_key,
        })
    }

    fn ensure_parent(&self) -> AppResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(true)
    }

    fn value_or_default(
        &self,
        ini: &mut Ini,
        key: &str,
        default: &str,
        dirty: &mut bool,
    ) -> String {
        if let Some(value) = ini.get_from(Some(CONFIG_SECTION), key) {
            return value.to_string();
        }
        ini.with_section(Some(CONFIG_SECTION)).set(key, default);
        *dirty = true;
        default.to_string()
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir().ok_or_else(|| {
        AppError::Configuration("unable to locate the user configuration directory".to_string())
    })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_load_creates_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let store = ConfigStore::new(path.clone());

        let settings = store.load().unwrap();

        assert_eq!(settings.upload_target, DEFAULT_UPLOAD_TARGET);
        assert_eq!(settings.bugzilla_url, DEFAULT_BUGZILLA_URL);
        assert!(path.exists());
        let ini = Ini::load_from_file(&path).unwrap();
        assert_eq!(
            ini.get_from(Some(CONFIG_SECTION), "upload_target"),
            Some(DEFAULT_UPLOAD_TARGET)
        );
        assert_eq!(ini.get_from(Some(CONFIG_SECTION), "api_key"), None);
    }

    #[test]
    fn persisted_value_survives_changed_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        ConfigStore::new(path.clone()).load().unwrap();

        let changed = ConfigDefaults {
            upload_target: "people.example.org:public_html/other/".to_string(),
            bugzilla_url: "https://bugs.example.org".to_string(),
        };
        let settings = ConfigStore::new(path).with_defaults(changed).load().unwrap();

        assert_eq!(settings.upload_target, DEFAULT_UPLOAD_TARGET);
        assert_eq!(settings.bugzilla_url, DEFAULT_BUGZILLA_URL);
    }

    #[test]
    fn missing_key_is_filled_and_written_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "[fedora-create-review]\nupload_target = fedorapeople.org:public_html/review/\n",
        )
        .unwrap();

        let settings = ConfigStore::new(path.clone()).load().unwrap();

        assert_eq!(settings.upload_target, "fedorapeople.org:public_html/review/");
        assert_eq!(settings.bugzilla_url, DEFAULT_BUGZILLA_URL);
        let ini = Ini::load_from_file(&path).unwrap();
        assert_eq!(
            ini.get_from(Some(CONFIG_SECTION), "bugzilla_url"),
            Some(DEFAULT_BUGZILLA_URL)
        );
    }

    fn store_with_api_key(dir: &Path) -> ConfigStore {
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "[fedora-create-review]\nupload_target = a:public_html/\nbugzilla_url = https://b\napi_key = secret\n",
        )
        .unwrap();
        ConfigStore::new(path)
    }

    #[test]
    fn reads_stored_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_api_key(dir.path());

        let settings = store.load_with_env_key(None).unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("secret"));

        let settings = store.load_with_env_key(Some("  ".to_string())).unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn environment_api_key_overrides_stored_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_api_key(dir.path());

        let settings = store.load_with_env_key(Some("from-env".to_string())).unwrap();

        assert_eq!(settings.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn no_api_key_anywhere() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join(CONFIG_FILE_NAME));

        assert_eq!(store.load_with_env_key(None).unwrap().api_key, None);
    }

    #[test]
    fn expands_home_prefix() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_tilde("~/SRPMS/foo.src.rpm"), home.join("SRPMS/foo.src.rpm"));
        assert_eq!(expand_tilde("/tmp/foo.spec"), PathBuf::from("/tmp/foo.spec"));
    }
}
