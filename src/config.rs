use crate::error::{Error, Result};
use ini::Ini;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_INI_FILE_PATH: &str = "~/.htup";
pub const DEFAULT_PROJECT_DIR: &str = "~/.config/htup";
pub const MEDIA_DIR_NAME: &str = "media";

const DEFAULT_SECTION: &str = "default";
const INI_PROJECT_DIR: &str = "project_dir";
const INI_MEDIA_DIR: &str = "media_dir";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    project_dir: PathBuf,
    media_dir: PathBuf,
    media_dir_configured: bool,
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

impl Config {
    /// Configuration rooted at `project_dir`, with media in its `media` subdirectory.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        Config {
            media_dir: project_dir.join(MEDIA_DIR_NAME),
            project_dir,
            media_dir_configured: false,
        }
    }

    /// Reads the `[default]` section of the INI file at `file_path`. A missing
    /// file or missing keys fall back to the defaults.
    pub fn load(file_path: &str) -> Result<Self> {
        let extended_path = expand(file_path);
        if !extended_path.exists() {
            debug!(path = %extended_path.display(), "no configuration file, using defaults");
            return Ok(Self::new(expand(DEFAULT_PROJECT_DIR)));
        }

        let ini = Ini::load_from_file(&extended_path)?;
        let section = ini.section(Some(DEFAULT_SECTION));
        let get = |key: &str| section.and_then(|s| s.get(key)).map(expand);

        let project_dir = get(INI_PROJECT_DIR).unwrap_or_else(|| expand(DEFAULT_PROJECT_DIR));
        let mut config = Self::new(project_dir);
        if let Some(media_dir) = get(INI_MEDIA_DIR) {
            config.media_dir = media_dir;
            config.media_dir_configured = true;
        }
        debug!(?config, "loaded configuration");
        Ok(config)
    }

    /// Replaces the project directory. The media directory follows it unless
    /// it was set explicitly in the configuration file.
    pub fn with_project_dir(mut self, project_dir: &str) -> Self {
        self.project_dir = expand(project_dir);
        if !self.media_dir_configured {
            self.media_dir = self.project_dir.join(MEDIA_DIR_NAME);
        }
        self
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Writes this configuration as the `[default]` section of `file_path`.
    pub fn put(&self, file_path: &str) -> Result<()> {
        let mut conf = Ini::new();
        let mut sect = conf.with_section(Some(DEFAULT_SECTION));
        sect.set(INI_PROJECT_DIR, self.project_dir.to_string_lossy());
        if self.media_dir_configured {
            sect.set(INI_MEDIA_DIR, self.media_dir.to_string_lossy());
        }
        let path = expand(file_path);
        conf.write_to_file(&path).map_err(|e| Error::io(&path, e))?;
        Ok(())
    }
}
