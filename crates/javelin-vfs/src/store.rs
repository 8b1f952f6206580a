//! The workspace file store.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use javelin_core::{last_name, most_name};
use javelin_syntax::search;
use thiserror::Error;
use walkdir::WalkDir;

use crate::document::{ContentChange, Document};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0} is not a java file")]
    NotJavaFile(PathBuf),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Index entry for one on-disk source file.
#[derive(Debug, Clone)]
struct SourceInfo {
    modified: SystemTime,
    /// Extracted lexically; empty string for the default package.
    package_name: String,
}

/// Tracks workspace roots, the source index and open editor documents.
///
/// The index keys are exactly the `.java` files (excluding module
/// descriptors and symbolic-link subtrees) reachable from some workspace
/// root, plus files populated lazily on first query.
#[derive(Debug, Default)]
pub struct FileStore {
    workspace_roots: BTreeSet<PathBuf>,
    sources: BTreeMap<PathBuf, SourceInfo>,
    documents: HashMap<PathBuf, Document>,
}

impl FileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the workspace root set.
    ///
    /// Index entries beneath removed roots are dropped before the added
    /// roots are walked.
    pub fn set_workspace_roots(
        &mut self,
        roots: impl IntoIterator<Item = PathBuf>,
    ) -> Result<(), StoreError> {
        let new_roots: BTreeSet<PathBuf> = roots.into_iter().map(|r| normalize(&r)).collect();

        for old in &self.workspace_roots {
            if !new_roots.contains(old) {
                let old = old.clone();
                self.sources.retain(|path, _| !path.starts_with(&old));
            }
        }
        let added: Vec<PathBuf> = new_roots
            .iter()
            .filter(|root| !self.workspace_roots.contains(*root))
            .cloned()
            .collect();
        for root in added {
            self.walk_root(&root)?;
        }
        self.workspace_roots = new_roots;
        Ok(())
    }

    pub fn workspace_roots(&self) -> impl Iterator<Item = &Path> {
        self.workspace_roots.iter().map(PathBuf::as_path)
    }

    fn walk_root(&mut self, root: &Path) -> Result<(), StoreError> {
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("walk error"));
                StoreError::Io { path, source }
            })?;
            if entry.path_is_symlink() {
                // Never descend into symlinked trees: they create cycles
                // and duplicate entries.
                tracing::warn!(
                    target: "javelin.vfs",
                    path = %entry.path().display(),
                    "skipping symbolic link during workspace walk"
                );
                continue;
            }
            if entry.file_type().is_file() && is_source_file(entry.path()) {
                self.read_info_from_disk(&entry.into_path())?;
            }
        }
        Ok(())
    }

    /// Every indexed source file, in path order.
    pub fn all(&self) -> impl Iterator<Item = &Path> {
        self.sources.keys().map(PathBuf::as_path)
    }

    /// Indexed files whose stored package name equals `package_name`.
    pub fn list(&self, package_name: &str) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|(_, info)| info.package_name == package_name)
            .map(|(path, _)| path.as_path())
            .collect()
    }

    /// Source roots inferred by stripping package components from the tail
    /// of each file's directory chain. Files whose chain does not match
    /// their declared package contribute nothing.
    pub fn source_roots(&self) -> BTreeSet<PathBuf> {
        let mut roots = BTreeSet::new();
        for (path, info) in &self.sources {
            if let Some(root) = source_root(path, &info.package_name) {
                roots.insert(root);
            }
        }
        roots
    }

    pub fn contains(&self, file: &Path) -> bool {
        is_source_file(file) && self.sources.contains_key(&normalize(file))
    }

    /// Last modification instant: the in-memory timestamp when the file is
    /// open, else the indexed disk timestamp, reading through on a miss.
    pub fn modified(&mut self, file: &Path) -> Result<SystemTime, StoreError> {
        let file = normalize(file);
        if let Some(doc) = self.documents.get(&file) {
            return Ok(doc.modified());
        }
        if !self.sources.contains_key(&file) {
            self.read_info_from_disk(&file)?;
        }
        Ok(self.sources[&file].modified)
    }

    /// The file's declared package, reading through on a miss. Empty for
    /// the default package.
    pub fn package_name(&mut self, file: &Path) -> Result<String, StoreError> {
        let file = normalize(file);
        if !self.sources.contains_key(&file) {
            self.read_info_from_disk(&file)?;
        }
        Ok(self.sources[&file].package_name.clone())
    }

    /// Package name from the index only, without reading through.
    ///
    /// Completion uses this while iterating the index; every indexed file
    /// has an entry, so a miss just means the file is unknown.
    pub fn stored_package_name(&self, file: &Path) -> Option<&str> {
        self.sources
            .get(&normalize(file))
            .map(|info| info.package_name.as_str())
    }

    /// Suggests a package name for `file` from its neighbors: the closest
    /// parent directory containing an indexed source with a non-empty
    /// package donates that package, extended with the directory path from
    /// there down to `file`.
    ///
    /// Files whose siblings all live in the default package get no
    /// suggestion.
    pub fn suggested_package_name(&self, file: &Path) -> String {
        let file = normalize(file);
        let mut dir = file.parent();
        while let Some(current) = dir {
            for (sibling, info) in self.sources_under(current) {
                if *sibling == file {
                    continue;
                }
                if info.package_name.is_empty() {
                    continue;
                }
                let mut suggestion = info.package_name.clone();
                if let Some(relative) = file.parent().and_then(|p| p.strip_prefix(current).ok())
                {
                    for component in relative.components() {
                        if let Component::Normal(part) = component {
                            suggestion.push('.');
                            suggestion.push_str(&part.to_string_lossy());
                        }
                    }
                }
                return suggestion;
            }
            dir = current.parent();
        }
        String::new()
    }

    fn sources_under<'a>(
        &'a self,
        dir: &'a Path,
    ) -> impl Iterator<Item = (&'a PathBuf, &'a SourceInfo)> {
        self.sources
            .range(dir.to_path_buf()..)
            .take_while(move |(path, _)| path.starts_with(dir))
    }

    // --- external file events -------------------------------------------

    pub fn external_create(&mut self, file: &Path) -> Result<(), StoreError> {
        if is_source_file(file) {
            self.read_info_from_disk(&normalize(file))?;
        }
        Ok(())
    }

    pub fn external_change(&mut self, file: &Path) -> Result<(), StoreError> {
        if is_source_file(file) {
            self.read_info_from_disk(&normalize(file))?;
        }
        Ok(())
    }

    pub fn external_delete(&mut self, file: &Path) {
        self.sources.remove(&normalize(file));
    }

    // --- active documents -----------------------------------------------

    /// Opens an editor buffer for `file`.
    pub fn open(&mut self, file: &Path, text: impl Into<String>, version: i32) {
        if !is_source_file(file) {
            return;
        }
        self.documents
            .insert(normalize(file), Document::new(text, version));
    }

    /// Applies an ordered list of changes at `version`.
    ///
    /// Changes carrying a version at or below the stored one are logged
    /// and dropped, never partially applied.
    pub fn change(&mut self, file: &Path, version: i32, changes: &[ContentChange]) {
        let file = normalize(file);
        let Some(doc) = self.documents.get_mut(&file) else {
            tracing::warn!(
                target: "javelin.vfs",
                file = %file.display(),
                "change event for a document that is not open"
            );
            return;
        };
        if version <= doc.version() {
            tracing::warn!(
                target: "javelin.vfs",
                file = %file.display(),
                version,
                stored = doc.version(),
                "ignored change with stale version"
            );
            return;
        }
        doc.apply_changes(version, changes);
    }

    pub fn close(&mut self, file: &Path) {
        self.documents.remove(&normalize(file));
    }

    pub fn active_documents(&self) -> impl Iterator<Item = &Path> {
        self.documents.keys().map(PathBuf::as_path)
    }

    /// Version of the open document, or `None` when the file is not open.
    pub fn version(&self, file: &Path) -> Option<i32> {
        self.documents.get(&normalize(file)).map(Document::version)
    }

    // --- content resolution ---------------------------------------------

    /// Authoritative contents: the open document's text when the file is
    /// active, else the on-disk bytes.
    pub fn contents(&self, file: &Path) -> Result<String, StoreError> {
        let file = normalize(file);
        if !is_source_file(&file) {
            return Err(StoreError::NotJavaFile(file));
        }
        if let Some(doc) = self.documents.get(&file) {
            return Ok(doc.text().to_owned());
        }
        std::fs::read_to_string(&file).map_err(|e| StoreError::io(&file, e))
    }

    /// A buffered reader over the authoritative contents, without copying
    /// an open document's text.
    pub fn reader(&self, file: &Path) -> Result<Box<dyn io::BufRead + '_>, StoreError> {
        let file = normalize(file);
        if !is_source_file(&file) {
            return Err(StoreError::NotJavaFile(file));
        }
        if let Some(doc) = self.documents.get(&file) {
            return Ok(Box::new(io::Cursor::new(doc.text().as_bytes())));
        }
        let handle = std::fs::File::open(&file).map_err(|e| StoreError::io(&file, e))?;
        Ok(Box::new(io::BufReader::new(handle)))
    }

    /// Locates the file declaring `qualified`, e.g. `com.example.Foo`.
    ///
    /// Fast path: a file named after the class in the right package. Slow
    /// path: a lexical scan of every file in the package. Unreadable files
    /// are skipped, never fatal.
    pub fn find_declaring_file(&self, qualified: &str) -> Option<PathBuf> {
        let package_name = most_name(qualified);
        let class_name = last_name(qualified);
        let in_package: Vec<&Path> = self.list(package_name);

        let declares = |file: &Path| match self.contents(file) {
            Ok(text) => search::contains_class(&text, class_name),
            Err(err) => {
                tracing::debug!(
                    target: "javelin.vfs",
                    file = %file.display(),
                    error = %err,
                    "skipping unreadable file during declaration search"
                );
                false
            }
        };

        let file_stem = format!("{class_name}.java");
        for file in &in_package {
            if file.file_name().is_some_and(|n| n == file_stem.as_str()) && declares(file) {
                return Some(file.to_path_buf());
            }
        }
        for file in &in_package {
            if declares(file) {
                return Some(file.to_path_buf());
            }
        }
        None
    }

    fn read_info_from_disk(&mut self, file: &Path) -> Result<(), StoreError> {
        let metadata = std::fs::metadata(file).map_err(|e| StoreError::io(file, e))?;
        let modified = metadata.modified().map_err(|e| StoreError::io(file, e))?;
        let text = std::fs::read_to_string(file).map_err(|e| StoreError::io(file, e))?;
        let package_name = search::package_name(&text);
        self.sources.insert(
            file.to_path_buf(),
            SourceInfo {
                modified,
                package_name,
            },
        );
        Ok(())
    }
}

/// Whether `file` is a regular Java source the index should see.
///
/// Module descriptors are hidden: feeding `module-info.java` to the
/// compiler flips it into module mode and breaks sourcepath lookup.
pub(crate) fn is_source_file(file: &Path) -> bool {
    let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".java") && name != "module-info.java"
}

/// Lexically absolutizes and cleans a path, without touching the file
/// system (symlinks are deliberately not resolved).
fn normalize(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Strips the package components off the tail of the file's directory
/// chain; any mismatch yields `None`.
fn source_root(file: &Path, package_name: &str) -> Option<PathBuf> {
    let mut dir = file.parent()?;
    if package_name.is_empty() {
        return Some(dir.to_path_buf());
    }
    for part in package_name.split('.').rev() {
        if dir.file_name().is_some_and(|n| n == part) {
            dir = dir.parent()?;
        } else {
            return None;
        }
    }
    Some(dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_source_files() {
        assert!(is_source_file(Path::new("/w/src/Main.java")));
        assert!(!is_source_file(Path::new("/w/src/module-info.java")));
        assert!(!is_source_file(Path::new("/w/src/Main.kt")));
    }

    #[test]
    fn normalize_cleans_dot_segments() {
        assert_eq!(
            normalize(Path::new("/a/b/../c/./d")),
            PathBuf::from("/a/c/d")
        );
    }

    #[test]
    fn source_root_strips_package_suffix() {
        assert_eq!(
            source_root(Path::new("/w/src/com/example/Foo.java"), "com.example"),
            Some(PathBuf::from("/w/src"))
        );
        assert_eq!(
            source_root(Path::new("/w/src/misplaced/Foo.java"), "com.example"),
            None
        );
        assert_eq!(
            source_root(Path::new("/w/src/Foo.java"), ""),
            Some(PathBuf::from("/w/src"))
        );
    }
}
