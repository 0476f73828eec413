// src/store.rs
//
// The seen set: ids already posted, kept as a JSON array of strings.
// Missing or unreadable content degrades to an empty set (worst case: one
// re-post), never to a failed run.

use std::{
    collections::BTreeSet,
    fs, io,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeenSet {
    ids: BTreeSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns false if the id was already present.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SeenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { ids: iter.into_iter().map(Into::into).collect() }
    }
}

pub struct SeenStore {
    path: PathBuf,
}

impl SeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Never fails: absent file, unreadable file, or bad JSON → empty set.
    pub fn load(&self) -> SeenSet {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                logd!("No seen file at {}; starting empty", self.path.display());
                return SeenSet::new();
            }
            Err(e) => {
                logw!("Could not read {}: {e}; starting empty", self.path.display());
                return SeenSet::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&text) {
            Ok(ids) => {
                let set: SeenSet = ids.into_iter().collect();
                logd!("Loaded {} seen id(s)", set.len());
                set
            }
            Err(e) => {
                logw!("Seen file {} is malformed ({e}); starting empty", self.path.display());
                SeenSet::new()
            }
        }
    }

    /// Overwrite the file with the full set. Written to a sibling temp file
    /// first and renamed into place, so readers never see a partial write.
    pub fn save(&self, seen: &SeenSet) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let ids: Vec<&str> = seen.iter().collect();
        let json = serde_json::to_string_pretty(&ids).map_err(io::Error::other)?;

        let tmp = tmp_path(&self.path);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path).inspect_err(|_| {
            let _ = fs::remove_file(&tmp);
        })?;
        logd!("Saved {} seen id(s) to {}", seen.len(), self.path.display());
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "seen".into());
    name.push(".tmp");
    path.with_file_name(name)
}
