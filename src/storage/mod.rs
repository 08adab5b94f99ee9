use std::{
    cell::RefCell,
    collections::HashMap,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    rc::Rc,
};

const FILE_SUFFIX: &str = "_data.txt";
const TMP_EXTENSION: &str = "tmp";

/// Medium holding one serialized document per account number.
pub trait Storage {
    /// `Ok(None)` when nothing has been persisted for the account yet.
    fn read(&self, account_number: &str) -> io::Result<Option<Vec<u8>>>;

    /// Replaces the whole document for the account.
    fn write(&self, account_number: &str, contents: &[u8]) -> io::Result<()>;
}

/// One `<account number>_data.txt` file per account inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, account_number: &str) -> PathBuf {
        self.root.join(format!("{account_number}{FILE_SUFFIX}"))
    }
}

impl Storage for FileStorage {
    fn read(&self, account_number: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(account_number)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Writes a sibling temp file and renames it over the target, so a crash mid-write
    /// leaves the previous document intact.
    fn write(&self, account_number: &str, contents: &[u8]) -> io::Result<()> {
        let path = self.path_for(account_number);
        let tmp = tmp_path(&path);

        let mut file = File::create(&tmp)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&tmp, &path)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(TMP_EXTENSION);
    PathBuf::from(name)
}

/// In-process storage; clones share the same documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    documents: Rc<RefCell<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self, account_number: &str) -> Option<String> {
        self.documents
            .borrow()
            .get(account_number)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn insert(&self, account_number: &str, document: impl Into<Vec<u8>>) {
        self.documents
            .borrow_mut()
            .insert(account_number.to_owned(), document.into());
    }
}

impl Storage for MemoryStorage {
    fn read(&self, account_number: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.documents.borrow().get(account_number).cloned())
    }

    fn write(&self, account_number: &str, contents: &[u8]) -> io::Result<()> {
        self.insert(account_number, contents);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn file_storage_names_files_after_account_number() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        assert_eq!(
            storage.path_for("12345678910"),
            dir.path().join("12345678910_data.txt")
        );
    }

    #[test]
    fn file_storage_reports_missing_file_as_none() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        assert!(storage.read("404").unwrap().is_none());
    }

    #[test]
    fn file_storage_overwrites_whole_file() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested")).unwrap();

        storage.write("1", b"a much longer first document").unwrap();
        storage.write("1", b"short").unwrap();

        assert_eq!(storage.read("1").unwrap().as_deref(), Some(&b"short"[..]));
        assert!(!tmp_path(&storage.path_for("1")).exists());
    }

    #[test]
    fn memory_storage_clones_share_documents() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.write("1", b"doc").unwrap();

        assert_eq!(other.document("1").as_deref(), Some("doc"));
        assert!(other.read("2").unwrap().is_none());
    }
}
