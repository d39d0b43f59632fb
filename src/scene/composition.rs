use crate::foundation::error::{ComposeError, ComposeResult};
use crate::scene::model::CompositionParams;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

impl CompositionParams {
    /// Parse a parameter document from a JSON reader.
    ///
    /// Missing fields take their defaults; the result is sanitized.
    pub fn from_reader<R: std::io::Read>(r: R) -> ComposeResult<Self> {
        let params: CompositionParams = serde_json::from_reader(r)
            .map_err(|e| ComposeError::validation(format!("parse parameter JSON: {e}")))?;
        Ok(params.sanitized())
    }

    /// Parse a parameter document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ComposeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ComposeError::validation(format!("open parameter JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Pretty-printed JSON form of these parameters.
    pub fn to_json_pretty(&self) -> ComposeResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ComposeError::validation(format!("serialize parameters: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/composition.rs"]
mod tests;
