use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use scout_app_core::{SessionIdentity, SessionRepo};

const QUALIFIER: &str = "io";
const ORG: &str = "scoutintel";
const APP: &str = "scout";

const SESSION_FILE: &str = "session.json";

/// Credential persisted between runs by `login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedSession {
    pub access_token: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// On-disk session store under the platform config directory.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from(QUALIFIER, ORG, APP)
            .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;
        Ok(Self {
            dir: proj_dirs.config_dir().to_path_buf(),
        })
    }

    /// Store rooted at an explicit directory instead of the platform default.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    pub fn load(&self) -> Result<Option<PersistedSession>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).context("Failed to read session")?;
        let session: PersistedSession = serde_json::from_str(&content)?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &PersistedSession) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        atomic_write(&self.session_path(), json.as_bytes()).context("Failed to write session")?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            fs::remove_file(&path).context("Failed to remove session")?;
        }
        Ok(())
    }
}

impl SessionRepo for FileSessionStore {
    fn current(&self) -> Option<SessionIdentity> {
        match self.load() {
            Ok(session) => session.map(|s| SessionIdentity {
                access_token: s.access_token,
                user_id: s.user_id,
            }),
            Err(e) => {
                warn!("failed to read persisted session: {e:#}");
                None
            }
        }
    }
}

fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp_path = {
        let mut name = path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    };

    let mut file = fs::File::create(&tmp_path)
        .with_context(|| format!("Failed to create temp file {}", tmp_path.to_string_lossy()))?;
    file.write_all(contents)
        .with_context(|| format!("Failed to write temp file {}", tmp_path.to_string_lossy()))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync temp file {}", tmp_path.to_string_lossy()))?;
    drop(file);

    match fs::rename(&tmp_path, path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            fs::remove_file(path).ok();
            fs::rename(&tmp_path, path).with_context(|| {
                format!(
                    "Failed to replace destination file {}",
                    path.to_string_lossy()
                )
            })?;
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!(
                    "Failed to rename temp file {} to {}",
                    tmp_path.to_string_lossy(),
                    path.to_string_lossy()
                )
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_clear_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::at(dir.path());

        assert_eq!(store.load().unwrap(), None);

        let session = PersistedSession {
            access_token: "tok-1".into(),
            user_id: Some("u-1".into()),
        };
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn current_maps_to_identity_and_survives_missing_user_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::at(dir.path());

        fs::create_dir_all(dir.path()).unwrap();
        fs::write(
            dir.path().join(SESSION_FILE),
            r#"{"access_token":"tok-2"}"#,
        )
        .unwrap();

        let identity = store.current().unwrap();
        assert_eq!(identity.access_token, "tok-2");
        assert_eq!(identity.user_id, None);
    }

    #[test]
    fn corrupt_session_file_reads_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::at(dir.path());

        fs::write(dir.path().join(SESSION_FILE), "not json").unwrap();

        assert!(store.load().is_err());
        assert!(store.current().is_none());
    }
}
