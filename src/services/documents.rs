//! Employee document storage on the local filesystem.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{HrError, HrResult};
use crate::models::{DocumentType, EmployeeDocument};
use crate::store::HrStore;

const MAX_NAME_LEN: usize = 100;

/// Metadata accompanying an upload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDocument {
    /// Document category.
    pub document_type: DocumentType,
    /// File name as supplied by the client.
    pub file_name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Writes uploads under one directory and records them in the store.
#[derive(Debug, Clone)]
pub struct DocumentService {
    store: HrStore,
    upload_dir: PathBuf,
}

impl DocumentService {
    /// Creates the service writing into `upload_dir`.
    pub fn new(store: HrStore, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            upload_dir: upload_dir.into(),
        }
    }

    /// The directory uploads are written to.
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Stores `bytes` for an employee and records the document.
    pub async fn upload(
        &self,
        employee_id: i64,
        new: NewDocument,
        bytes: &[u8],
    ) -> HrResult<EmployeeDocument> {
        self.store
            .read(|tables| tables.employees.require(employee_id).map(|_| ()))?;

        let now = Utc::now();
        let stored_name = format!(
            "{employee_id}_{}_{}_{}",
            now.timestamp(),
            Uuid::new_v4().simple(),
            sanitize_file_name(&new.file_name)
        );
        let path = self.upload_dir.join(stored_name);

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| storage_error(&self.upload_dir, e))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| storage_error(&path, e))?;

        let file_path = path.to_string_lossy().into_owned();
        let document = self.store.write(|tables| {
            tables.employees.require(employee_id)?;
            Ok::<_, HrError>(
                tables
                    .documents
                    .insert_with(|id| EmployeeDocument {
                        id,
                        employee_id,
                        document_type: new.document_type,
                        file_name: new.file_name,
                        file_path: file_path.clone(),
                        upload_date: now,
                        description: new.description,
                    })
                    .clone(),
            )
        })?;

        info!(
            employee_id,
            document_id = document.id,
            size = bytes.len(),
            path = %file_path,
            "Document stored"
        );
        Ok(document)
    }

    /// Lists an employee's documents.
    pub fn list(&self, employee_id: i64) -> HrResult<Vec<EmployeeDocument>> {
        self.store.read(|tables| {
            tables.employees.require(employee_id)?;
            Ok(tables
                .documents
                .filter_cloned(|d| d.employee_id == employee_id))
        })
    }

    /// Fetches one document's metadata.
    pub fn get(&self, document_id: i64) -> HrResult<EmployeeDocument> {
        self.store
            .read(|tables| tables.documents.require(document_id).cloned())
    }

    /// Reads a stored document back from disk.
    ///
    /// A record whose file has vanished is reported as a missing
    /// `document file`.
    pub async fn download(&self, document_id: i64) -> HrResult<(EmployeeDocument, Vec<u8>)> {
        let document = self.get(document_id)?;
        match tokio::fs::read(&document.file_path).await {
            Ok(bytes) => Ok((document, bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    document_id,
                    path = %document.file_path,
                    "Document file missing on disk"
                );
                Err(HrError::NotFound {
                    entity: "document file",
                    id: document_id,
                })
            }
            Err(e) => Err(storage_error(Path::new(&document.file_path), e)),
        }
    }

    /// Deletes the record, then tries to remove the file.
    pub async fn delete(&self, document_id: i64) -> HrResult<EmployeeDocument> {
        let document = self.store.write(|tables| {
            tables.documents.require(document_id)?;
            tables
                .documents
                .remove(document_id)
                .ok_or(HrError::NotFound {
                    entity: "document",
                    id: document_id,
                })
        })?;

        if let Err(e) = tokio::fs::remove_file(&document.file_path).await {
            warn!(
                document_id,
                path = %document.file_path,
                error = %e,
                "Could not remove document file"
            );
        }
        Ok(document)
    }
}

/// Keeps `[A-Za-z0-9._-]`, replaces everything else with `_`, and caps the
/// length.
pub fn sanitize_file_name(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();
    if safe.is_empty() {
        "untitled".to_string()
    } else {
        safe
    }
}

fn storage_error(path: &Path, error: std::io::Error) -> HrError {
    HrError::Storage {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::fixture;

    fn contract(name: &str) -> NewDocument {
        NewDocument {
            document_type: DocumentType::Contract,
            file_name: name.to_string(),
            description: Some("Signed".to_string()),
        }
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("offer letter (v2).pdf"), "offer_letter__v2_.pdf");
        assert_eq!(sanitize_file_name(""), "untitled");
        assert_eq!(sanitize_file_name("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_file_name(&"a".repeat(150)).len(), 100);
    }

    // ==========================================================================
    // DOC-001: upload writes the bytes and records the row
    // ==========================================================================
    #[tokio::test]
    async fn test_doc_001_upload_list_delete() {
        let fx = fixture();
        let dir = tempfile::tempdir().unwrap();
        let documents = DocumentService::new(fx.store.clone(), dir.path().join("uploads"));

        let doc = documents
            .upload(fx.employee_id, contract("contract.pdf"), b"%PDF-1.7")
            .await
            .unwrap();
        assert_eq!(doc.file_name, "contract.pdf");
        assert!(doc.file_path.ends_with("_contract.pdf"));
        let stored_name = Path::new(&doc.file_path)
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert!(stored_name.starts_with(&format!("{}_", fx.employee_id)));
        assert_eq!(tokio::fs::read(&doc.file_path).await.unwrap(), b"%PDF-1.7");

        assert_eq!(documents.list(fx.employee_id).unwrap().len(), 1);

        documents.delete(doc.id).await.unwrap();
        assert!(documents.list(fx.employee_id).unwrap().is_empty());
        assert!(!Path::new(&doc.file_path).exists());
    }

    #[tokio::test]
    async fn test_download_returns_stored_bytes() {
        let fx = fixture();
        let dir = tempfile::tempdir().unwrap();
        let documents = DocumentService::new(fx.store.clone(), dir.path());
        let doc = documents
            .upload(fx.employee_id, contract("contract.pdf"), b"%PDF-1.7")
            .await
            .unwrap();

        let (meta, bytes) = documents.download(doc.id).await.unwrap();
        assert_eq!(meta.file_name, "contract.pdf");
        assert_eq!(bytes, b"%PDF-1.7");

        std::fs::remove_file(&doc.file_path).unwrap();
        let err = documents.download(doc.id).await.unwrap_err();
        assert!(matches!(err, HrError::NotFound { entity: "document file", .. }));

        let err = documents.download(doc.id + 1).await.unwrap_err();
        assert!(matches!(err, HrError::NotFound { entity: "document", .. }));
    }

    #[tokio::test]
    async fn test_download_of_unreadable_path_is_storage_error() {
        let fx = fixture();
        let dir = tempfile::tempdir().unwrap();
        let documents = DocumentService::new(fx.store.clone(), dir.path());
        let doc = documents
            .upload(fx.employee_id, contract("a.txt"), b"a")
            .await
            .unwrap();
        std::fs::remove_file(&doc.file_path).unwrap();
        std::fs::create_dir(&doc.file_path).unwrap();

        let err = documents.download(doc.id).await.unwrap_err();
        assert!(matches!(err, HrError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_same_name_uploads_keep_separate_files() {
        let fx = fixture();
        let dir = tempfile::tempdir().unwrap();
        let documents = DocumentService::new(fx.store.clone(), dir.path());
        let first = documents
            .upload(fx.employee_id, contract("scan.pdf"), b"first")
            .await
            .unwrap();
        let second = documents
            .upload(fx.employee_id, contract("scan.pdf"), b"second")
            .await
            .unwrap();
        assert_ne!(first.file_path, second.file_path);

        documents.delete(first.id).await.unwrap();
        assert_eq!(std::fs::read(&second.file_path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_upload_for_unknown_employee_is_not_found() {
        let fx = fixture();
        let dir = tempfile::tempdir().unwrap();
        let documents = DocumentService::new(fx.store.clone(), dir.path());

        let err = documents
            .upload(999, contract("x.pdf"), b"x")
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::NotFound { entity: "employee", .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_unwritable_directory_is_storage_error() {
        let fx = fixture();
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let documents = DocumentService::new(fx.store.clone(), blocker.join("uploads"));

        let err = documents
            .upload(fx.employee_id, contract("x.pdf"), b"x")
            .await
            .unwrap_err();
        assert!(matches!(err, HrError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_delete_survives_missing_file() {
        let fx = fixture();
        let dir = tempfile::tempdir().unwrap();
        let documents = DocumentService::new(fx.store.clone(), dir.path());
        let doc = documents
            .upload(fx.employee_id, contract("a.txt"), b"a")
            .await
            .unwrap();
        std::fs::remove_file(&doc.file_path).unwrap();

        assert_eq!(documents.delete(doc.id).await.unwrap().id, doc.id);
        assert!(matches!(
            documents.get(doc.id).unwrap_err(),
            HrError::NotFound { .. }
        ));
    }
}
