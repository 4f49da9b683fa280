//! ProfileStore — stateless on-disk layout for profile metadata and
//! encrypted credential blobs (spec.md §4.2).
use super::model::{Profile, Provider};
use crate::error::{Result, ToolboxError};
use std::fs;
use std::path::{Path, PathBuf};

pub struct ProfileStore {
    base_dir: PathBuf,
}

impl ProfileStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn provider_dir(&self, provider: Provider) -> PathBuf {
        self.base_dir.join("profiles").join(provider.as_dir())
    }

    fn metadata_path(&self, provider: Provider, name: &str) -> PathBuf {
        self.provider_dir(provider).join(format!("{name}.json"))
    }

    fn credentials_path(&self, provider: Provider, name: &str) -> PathBuf {
        self.provider_dir(provider).join(format!("{name}.enc"))
    }

    pub fn save_profile(&self, profile: &Profile) -> Result<()> {
        let dir = self.provider_dir(profile.provider);
        fs::create_dir_all(&dir)?;
        let path = self.metadata_path(profile.provider, &profile.name);
        fs::write(&path, serde_json::to_string_pretty(profile)?)?;
        set_mode(&path, 0o644)?;
        Ok(())
    }

    pub fn load_profile(&self, provider: Provider, name: &str) -> Result<Profile> {
        let path = self.metadata_path(provider, name);
        let raw = fs::read_to_string(&path)
            .map_err(|_| ToolboxError::NotFound(format!("profile {provider}/{name}")))?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save_credentials(&self, provider: Provider, name: &str, ciphertext: &[u8]) -> Result<()> {
        let dir = self.provider_dir(provider);
        fs::create_dir_all(&dir)?;
        let path = self.credentials_path(provider, name);
        tracing::trace!(path = %path.display(), "writing encrypted credentials blob");
        fs::write(&path, ciphertext)?;
        set_mode(&path, 0o600)?;
        Ok(())
    }

    pub fn load_credentials(&self, provider: Provider, name: &str) -> Result<Vec<u8>> {
        let path = self.credentials_path(provider, name);
        tracing::trace!(path = %path.display(), "reading encrypted credentials blob");
        fs::read(&path).map_err(|_| ToolboxError::NotFound(format!("credentials {provider}/{name}")))
    }

    /// Directory listing of profile names for a provider. An absent
    /// directory yields an empty list, not an error.
    pub fn list_profiles(&self, provider: Provider) -> Result<Vec<String>> {
        let dir = self.provider_dir(provider);
        let entries = match fs::read_dir(&dir) {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let path = e.path();
                if path.extension().and_then(|s| s.to_str()) == Some("json") {
                    path.file_stem().map(|s| s.to_string_lossy().to_string())
                } else {
                    None
                }
            })
            .collect();
        names.sort();
        Ok(names)
    }

    /// Loads every profile for a provider. Entries that fail to parse are
    /// skipped silently (spec.md §4.2).
    pub fn list_all_profiles(&self, provider: Provider) -> Result<Vec<Profile>> {
        let names = self.list_profiles(provider)?;
        Ok(names
            .into_iter()
            .filter_map(|name| self.load_profile(provider, &name).ok())
            .collect())
    }

    /// Removes both the metadata and credentials files. A missing file is
    /// not an error.
    pub fn delete_profile(&self, provider: Provider, name: &str) -> Result<()> {
        remove_if_present(&self.metadata_path(provider, name))?;
        remove_if_present(&self.credentials_path(provider, name))?;
        Ok(())
    }

    pub fn profile_exists(&self, provider: Provider, name: &str) -> bool {
        self.metadata_path(provider, name).exists()
    }
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_profiles_on_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());
        assert_eq!(store.list_profiles(Provider::Aws).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn save_load_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());
        let profile = Profile::draft("prod", Provider::Aws);
        store.save_profile(&profile).unwrap();
        assert!(store.profile_exists(Provider::Aws, "prod"));

        let loaded = store.load_profile(Provider::Aws, "prod").unwrap();
        assert_eq!(loaded.name, "prod");

        store.save_credentials(Provider::Aws, "prod", b"ciphertext").unwrap();
        assert_eq!(store.load_credentials(Provider::Aws, "prod").unwrap(), b"ciphertext");

        store.delete_profile(Provider::Aws, "prod").unwrap();
        assert!(!store.profile_exists(Provider::Aws, "prod"));
        assert!(store.load_credentials(Provider::Aws, "prod").is_err());
    }

    #[test]
    fn delete_missing_profile_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());
        assert!(store.delete_profile(Provider::Gcp, "nope").is_ok());
    }

    #[test]
    fn list_all_profiles_skips_unreadable_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());
        store.save_profile(&Profile::draft("good", Provider::Azure)).unwrap();

        let bad_path = dir.path().join("profiles").join("azure").join("bad.json");
        fs::write(&bad_path, "not json").unwrap();

        let all = store.list_all_profiles(Provider::Azure).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "good");
    }

    #[cfg(unix)]
    #[test]
    fn credentials_file_mode_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());
        store.save_credentials(Provider::Aws, "prod", b"x").unwrap();
        let meta = fs::metadata(dir.path().join("profiles/aws/prod.enc")).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }
}
