//! Reading and writing endpoint files inside the project directory.
//!
//! Names given by the user are always resolved relative to a directory and
//! may not escape it. Saves go through a temporary file in the destination
//! directory followed by a rename, so readers see either the old or the new
//! content, never a truncated file.

use crate::config::Config;
use crate::endpoint::EndpointDefinition;
use crate::error::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub fn ensure_project_directory(config: &Config) -> Result<()> {
    for dir in [config.project_dir(), config.media_dir()] {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    debug!(project_dir = %config.project_dir().display(), "project directory ready");
    Ok(())
}

/// Joins `name` onto `directory`, refusing names that are empty or could
/// leave `directory` (absolute paths, `..`, `.`).
pub fn resolve(directory: impl AsRef<Path>, name: &str) -> Result<PathBuf> {
    let relative = Path::new(name);
    let valid = !name.trim().is_empty()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if !valid {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(directory.as_ref().join(relative))
}

pub fn save(path: impl AsRef<Path>, definition: &EndpointDefinition) -> Result<()> {
    let path = path.as_ref();
    let content = definition.serialize()?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    tmp.write_all(content.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;

    info!(path = %path.display(), method = %definition.method, "saved endpoint");
    Ok(())
}

pub fn create_new_file(directory: impl AsRef<Path>, name: &str) -> Result<PathBuf> {
    let path = resolve(directory, name)?;
    if path.exists() {
        return Err(Error::AlreadyExists(path));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    save(&path, &EndpointDefinition::default())?;
    Ok(path)
}

/// Creates a subdirectory used to group related endpoints.
pub fn create_project(directory: impl AsRef<Path>, name: &str) -> Result<PathBuf> {
    let path = resolve(directory, name)?;
    if path.exists() {
        return Err(Error::AlreadyExists(path));
    }
    fs::create_dir_all(&path).map_err(|e| Error::io(&path, e))?;
    info!(path = %path.display(), "created project");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Method;
    use tempfile::tempdir;

    #[test]
    fn ensure_project_directory_is_idempotent() -> Result<()> {
        let dir = tempdir().map_err(|e| Error::io("tmp", e))?;
        let config = Config::new(dir.path().join("htup"));

        ensure_project_directory(&config)?;
        ensure_project_directory(&config)?;

        assert!(config.project_dir().is_dir());
        assert!(config.media_dir().is_dir());
        Ok(())
    }

    #[test]
    fn save_then_load_round_trips() -> Result<()> {
        let dir = tempdir().map_err(|e| Error::io("tmp", e))?;
        let path = dir.path().join("ep1.json");
        let def = EndpointDefinition::new(Method::Post, "http://x/y", "{\"a\":1}");

        save(&path, &def)?;
        assert_eq!(EndpointDefinition::load(&path)?, def);
        Ok(())
    }

    #[test]
    fn save_overwrites_and_leaves_no_temp_files() -> Result<()> {
        let dir = tempdir().map_err(|e| Error::io("tmp", e))?;
        let path = dir.path().join("ep1.json");

        save(&path, &EndpointDefinition::new(Method::Get, "http://x/1", ""))?;
        let updated = EndpointDefinition::new(Method::Delete, "http://x/2", "");
        save(&path, &updated)?;

        assert_eq!(EndpointDefinition::load(&path)?, updated);
        let entries = fs::read_dir(dir.path()).map_err(|e| Error::io(dir.path(), e))?;
        assert_eq!(entries.count(), 1);
        Ok(())
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("ep.json");
        let err = save(&path, &EndpointDefinition::default()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn create_new_file_writes_default_definition() -> Result<()> {
        let dir = tempdir().map_err(|e| Error::io("tmp", e))?;
        let path = create_new_file(dir.path(), "foo")?;

        assert_eq!(path, dir.path().join("foo"));
        let raw = fs::read(&path).map_err(|e| Error::io(&path, e))?;
        let def = EndpointDefinition::parse(&raw)?;
        assert_eq!(def, EndpointDefinition::new(Method::Get, "", ""));
        Ok(())
    }

    #[test]
    fn create_new_file_allows_nested_names() -> Result<()> {
        let dir = tempdir().map_err(|e| Error::io("tmp", e))?;
        let path = create_new_file(dir.path(), "users/list.json")?;
        assert_eq!(path, dir.path().join("users").join("list.json"));
        assert!(path.is_file());
        Ok(())
    }

    #[test]
    fn create_new_file_rejects_bad_names() {
        let dir = tempdir().unwrap();
        for name in ["", "   ", "../escape", "a/../../b", "/etc/passwd", "./foo", "."] {
            let err = create_new_file(dir.path(), name).unwrap_err();
            assert!(matches!(err, Error::InvalidName(ref n) if n == name), "{name}: {err}");
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn create_new_file_does_not_clobber() -> Result<()> {
        let dir = tempdir().map_err(|e| Error::io("tmp", e))?;
        let path = dir.path().join("ep");
        let saved = EndpointDefinition::new(Method::Put, "http://x", "{}");
        save(&path, &saved)?;

        let err = create_new_file(dir.path(), "ep").unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
        assert_eq!(EndpointDefinition::load(&path)?, saved);
        Ok(())
    }

    #[test]
    fn create_project_makes_subdirectory() -> Result<()> {
        let dir = tempdir().map_err(|e| Error::io("tmp", e))?;
        let path = create_project(dir.path(), "billing")?;
        assert!(path.is_dir());

        let err = create_project(dir.path(), "billing").unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));

        let err = create_project(dir.path(), "..").unwrap_err();
        assert!(matches!(err, Error::InvalidName(_)));
        Ok(())
    }
}
