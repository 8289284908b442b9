//! Raw response artifacts, one JSON file per code.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde_json::Value;

use snomap_model::SnomedCode;

use crate::error::{CoreError, Result};

/// Directory of `<code>.json` files holding the last raw response per code.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Create the store, making the directory if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| CoreError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Path of the artifact for `code`.
    pub fn path_for(&self, code: &SnomedCode) -> PathBuf {
        self.dir.join(format!("{code}.json"))
    }

    /// Write the payload pretty-printed, replacing any earlier artifact for the code.
    pub fn write(&self, code: &SnomedCode, payload: &Value) -> Result<PathBuf> {
        let path = self.path_for(code);
        let io_err = |source: std::io::Error| CoreError::ArtifactWrite {
            path: path.clone(),
            source,
        };
        let mut writer = BufWriter::new(File::create(&path).map_err(io_err)?);
        serde_json::to_writer_pretty(&mut writer, payload).map_err(|source| {
            CoreError::ArtifactSerialize {
                path: path.clone(),
                source,
            }
        })?;
        writer.write_all(b"\n").map_err(io_err)?;
        writer.flush().map_err(io_err)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_is_keyed_by_code() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::create(dir.path().join("output/json")).unwrap();
        let code = SnomedCode::new("39065001").unwrap();

        let path = store.write(&code, &json!({"resourceType": "Parameters"})).unwrap();
        assert_eq!(path, dir.path().join("output/json/39065001.json"));

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["resourceType"], "Parameters");
    }

    #[test]
    fn test_write_replaces_previous() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::create(dir.path()).unwrap();
        let code = SnomedCode::new("1").unwrap();
        store.write(&code, &json!({"n": 1})).unwrap();
        let path = store.write(&code, &json!({"n": 2})).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("\"n\": 2"));
        assert!(!text.contains("\"n\": 1"));
    }
}
