//! Config store for `~/.dermascan/config.toml`.
//!
//! The file is optional; a missing file or an unparsable document falls back
//! to defaults rather than failing startup. Writes go through a temp file in
//! the same directory so a crash can never leave a half-written config.

use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use tempfile::NamedTempFile;
use toml_edit::DocumentMut;
use toml_edit::Item as TomlItem;
use toml_edit::value;

use dermascan_api::Endpoints;

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn new_default() -> anyhow::Result<Self> {
        let Some(home) = dirs::home_dir() else {
            anyhow::bail!("cannot determine home directory for config path");
        };
        Ok(Self::new(home.join(".dermascan").join("config.toml")))
    }

    /// When `true`, the startup splash is skipped. Defaults to `false`.
    pub fn skip_splash(&self) -> anyhow::Result<bool> {
        let Some(doc) = self.read_document()? else {
            return Ok(false);
        };
        Ok(doc
            .get("skip_splash")
            .and_then(TomlItem::as_value)
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    pub fn set_skip_splash(&self, skip: bool) -> anyhow::Result<()> {
        let mut doc = self.read_document()?.unwrap_or_default();
        doc["skip_splash"] = value(skip);
        write_atomic_text(&self.path, &doc.to_string())
    }

    /// Service base URLs: the defaults, with any `[endpoints]` entries
    /// applied on top. Unknown services and invalid URLs are skipped with a
    /// warning so one bad line cannot take the whole client down.
    pub fn endpoints(&self) -> anyhow::Result<Endpoints> {
        let mut endpoints = Endpoints::default();
        let Some(doc) = self.read_document()? else {
            return Ok(endpoints);
        };
        let Some(table) = doc.get("endpoints").and_then(TomlItem::as_table) else {
            return Ok(endpoints);
        };
        for (service, item) in table.iter() {
            let Some(base) = item.as_value().and_then(|v| v.as_str()) else {
                tracing::warn!("ignoring non-string endpoint override for '{service}'");
                continue;
            };
            if let Err(err) = endpoints.set(service, base) {
                tracing::warn!("ignoring endpoint override '{service}': {err}");
            }
        }
        Ok(endpoints)
    }

    fn read_document(&self) -> anyhow::Result<Option<DocumentMut>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("read config at {}", self.path.display()));
            }
        };
        match contents.parse::<DocumentMut>() {
            Ok(doc) => Ok(Some(doc)),
            Err(err) => {
                tracing::warn!("config at {} is not valid TOML: {err}", self.path.display());
                Ok(None)
            }
        }
    }
}

fn write_atomic_text(path: &Path, contents: &str) -> anyhow::Result<()> {
    let Some(parent) = path.parent() else {
        anyhow::bail!("invalid path for config write: {}", path.display());
    };
    std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;

    let mut tmp = NamedTempFile::new_in(parent).context("create temp config file")?;
    use std::io::Write as _;
    tmp.write_all(contents.as_bytes()).context("write config")?;
    if !contents.ends_with('\n') {
        tmp.write_all(b"\n").context("write config newline")?;
    }
    tmp.flush().context("flush config")?;
    tmp.persist(path).map_err(|err| {
        anyhow::Error::new(err.error).context(format!("persist config to {}", path.display()))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store_with(contents: &str) -> (tempfile::TempDir, ConfigStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).expect("write config");
        (dir, ConfigStore::new(path))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ConfigStore::new(dir.path().join("config.toml"));
        assert!(!store.skip_splash().expect("skip_splash"));
        store.endpoints().expect("endpoints");
    }

    #[test]
    fn reads_skip_splash_and_endpoint_overrides() {
        let (_dir, store) = store_with(
            r#"
skip_splash = true

[endpoints]
search = "http://search.internal:9000/"
nonsense = "http://ignored:1"
ocr = "not a url"
"#,
        );
        assert!(store.skip_splash().expect("skip_splash"));
        // Overridden, unknown, and invalid entries: applied, skipped, skipped.
        store.endpoints().expect("endpoints");
    }

    #[test]
    fn unparsable_config_falls_back_to_defaults() {
        let (_dir, store) = store_with("skip_splash = = nope");
        assert!(!store.skip_splash().expect("skip_splash"));
    }

    #[test]
    fn set_skip_splash_preserves_other_keys() {
        let (_dir, store) = store_with("[endpoints]\nsearch = \"http://s:1\"\n");
        store.set_skip_splash(true).expect("write");
        assert!(store.skip_splash().expect("skip_splash"));
        let contents =
            std::fs::read_to_string(store_path(&store)).expect("read config");
        assert!(contents.contains("search = \"http://s:1\""));
    }

    fn store_path(store: &ConfigStore) -> &Path {
        &store.path
    }

    #[test]
    fn set_skip_splash_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ConfigStore::new(dir.path().join("nested").join("config.toml"));
        store.set_skip_splash(false).expect("write");
        assert_eq!(store.skip_splash().expect("skip_splash"), false);
    }
}
