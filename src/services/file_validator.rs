use crate::config::MAX_UPLOAD_BYTES;
use crate::error::{AppError, ValidationError};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A file chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size: u64, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            size,
            path: path.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let metadata = std::fs::metadata(path).map_err(|e| AppError {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;

        if !metadata.is_file() {
            return Err(format!("{} is not a file", path.display()).into());
        }

        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        Ok(Self::new(name, metadata.len(), path))
    }
}

/// Acceptance rules checked before anything is sent.
#[derive(Debug, Clone, Copy)]
pub struct FileValidator {
    pub max_bytes: u64,
}

impl Default for FileValidator {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl FileValidator {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn validate<'a>(&self, file: Option<&'a SelectedFile>) -> Result<&'a SelectedFile, ValidationError> {
        let file = file.ok_or(ValidationError::Missing)?;

        if file.size > self.max_bytes {
            return Err(ValidationError::TooLarge {
                size: file.size,
                limit: self.max_bytes,
            });
        }

        if !file.name.to_lowercase().ends_with(".csv") {
            return Err(ValidationError::UnsupportedType {
                name: file.name.clone(),
            });
        }

        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: u64) -> SelectedFile {
        SelectedFile::new(name, size, format!("/tmp/{}", name))
    }

    #[test]
    fn accepts_csv_any_case() {
        let validator = FileValidator::default();
        for name in ["flows.csv", "FLOWS.CSV", "capture.Csv"] {
            let f = file(name, 1024);
            assert_eq!(validator.validate(Some(&f)), Ok(&f));
        }
    }

    #[test]
    fn rejects_missing_file() {
        assert_eq!(
            FileValidator::default().validate(None),
            Err(ValidationError::Missing)
        );
    }

    #[test]
    fn size_limit_is_inclusive() {
        let validator = FileValidator::default();
        let at_limit = file("big.csv", 209_715_200);
        assert!(validator.validate(Some(&at_limit)).is_ok());

        let over = file("big.csv", 209_715_201);
        assert_eq!(
            validator.validate(Some(&over)),
            Err(ValidationError::TooLarge {
                size: 209_715_201,
                limit: 209_715_200
            })
        );
    }

    #[test]
    fn rejects_other_extensions() {
        let validator = FileValidator::default();
        for name in ["flows.txt", "flows.csv.gz", "flows", "csv"] {
            let f = file(name, 10);
            assert!(matches!(
                validator.validate(Some(&f)),
                Err(ValidationError::UnsupportedType { .. })
            ));
        }
    }

    #[test]
    fn size_checked_before_extension() {
        let f = file("huge.parquet", 300 * 1024 * 1024);
        assert!(matches!(
            FileValidator::default().validate(Some(&f)),
            Err(ValidationError::TooLarge { .. })
        ));
    }

    #[test]
    fn from_path_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let selected = SelectedFile::from_path(&path).unwrap();
        assert_eq!(selected.name, "sample.csv");
        assert_eq!(selected.size, 8);
        assert!(SelectedFile::from_path(dir.path()).is_err());
        assert!(SelectedFile::from_path(&dir.path().join("missing.csv")).is_err());
    }
}
