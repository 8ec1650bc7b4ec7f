use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::ClientError;

/// Where the access token lives between requests.
pub trait TokenStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: &str) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        MemoryTokenStore {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn set_token(&self, token: &str) -> Result<(), ClientError> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| ClientError::TokenStore("lock poisoned".to_string()))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| ClientError::TokenStore("lock poisoned".to_string()))?;
        *slot = None;
        Ok(())
    }
}

/// Keeps the token in a file so it survives between CLI invocations.
/// The file is read once on open and rewritten on every change.
pub struct FileTokenStore {
    path: PathBuf,
    cached: MemoryTokenStore,
}

impl FileTokenStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref().to_path_buf();
        let cached = match fs::read_to_string(&path) {
            Ok(contents) if !contents.trim().is_empty() => {
                MemoryTokenStore::with_token(contents.trim())
            }
            Ok(_) => MemoryTokenStore::new(),
            Err(err) if err.kind() == ErrorKind::NotFound => MemoryTokenStore::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(FileTokenStore { path, cached })
    }
}

// The token is a bearer credential; keep it readable by the owner only.
fn write_private(path: &Path, contents: &str) -> Result<(), ClientError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())?;
    Ok(())
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        self.cached.token()
    }

    fn set_token(&self, token: &str) -> Result<(), ClientError> {
        write_private(&self.path, token)?;
        self.cached.set_token(token)
    }

    fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        self.cached.clear()
    }
}
