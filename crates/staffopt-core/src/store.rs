//! JSON persistence for staffing requests

use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::StaffingRequest;

/// Persistence error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read a request from a JSON file
pub fn load_request(path: &Path) -> Result<StaffingRequest, StoreError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Read a request, returning `None` when the file does not exist
pub fn load_request_or_default(path: &Path) -> Result<Option<StaffingRequest>, StoreError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write a request as pretty-printed JSON
pub fn save_request(path: &Path, request: &StaffingRequest) -> Result<(), StoreError> {
    let mut json = serde_json::to_string_pretty(request)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("staffing.json");
        let req = StaffingRequest::new(["Ana"], ["Desk"], [0, 1]).with_requirement("Desk", 1, 1);

        save_request(&path, &req).unwrap();
        let loaded = load_request(&path).unwrap();
        assert_eq!(loaded, req);
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempdir().unwrap();
        let loaded = load_request_or_default(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn malformed_file_is_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_request(&path), Err(StoreError::Json(_))));
    }
}
