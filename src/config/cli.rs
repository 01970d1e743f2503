use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// 本機檔案系統；相對路徑以 `base_path` 為根（空字串代表目前目錄）
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = fs::read(self.full_path(path))?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }

    async fn is_dir(&self, path: &str) -> bool {
        self.full_path(path).is_dir()
    }

    async fn list_files(&self, dir: &str, extension: &str) -> Result<Vec<String>> {
        let mut files = Vec::new();

        for entry in fs::read_dir(self.full_path(dir))? {
            let path = entry?.path();
            let matches = path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));

            if matches {
                if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                    files.push(Path::new(dir).join(name).to_string_lossy().into_owned());
                }
            }
        }

        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_dirs_and_reads_back() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_string_lossy().into_owned());

        storage.write_file("teamA/eval.json", b"{}").await.unwrap();
        assert_eq!(storage.read_file("teamA/eval.json").await.unwrap(), b"{}");
        assert!(storage.is_dir("teamA").await);
        assert!(!storage.is_dir("teamA/eval.json").await);
    }

    #[tokio::test]
    async fn test_list_files_filters_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_string_lossy().into_owned());

        storage.write_file("subs/teamB_1.csv", b"").await.unwrap();
        storage.write_file("subs/teamA_1.CSV", b"").await.unwrap();
        storage.write_file("subs/notes.txt", b"").await.unwrap();
        storage.write_file("subs/nested/teamC_1.csv", b"").await.unwrap();

        let files = storage.list_files("subs", "csv").await.unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|f| Path::new(f).file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["teamA_1.CSV", "teamB_1.csv"]);
        assert!(files[0].starts_with("subs"));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let storage = LocalStorage::default();
        let err = storage.read_file("/definitely/not/here.csv").await.unwrap_err();
        assert!(matches!(err, crate::utils::error::EvalError::IoError(_)));
    }
}
