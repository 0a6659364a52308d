use std::io::Write;

use indexmap::IndexMap;
use serde::Serialize;

use crate::analytics::rows::ResultTable;
use crate::error::{CinestatError, Result};

/// Named result sets in insertion order, serialized as one JSON object.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct JsonSections {
    sections: IndexMap<&'static str, serde_json::Value>,
}

impl JsonSections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `rows` under the analysis name. A repeated name replaces the
    /// earlier rows but keeps its position.
    pub fn push<T: ResultTable + Serialize>(&mut self, rows: &[T]) -> Result<()> {
        let value = serde_json::to_value(rows).map_err(|e| {
            CinestatError::Other(format!("Failed to serialize {}: {}", T::NAME, e))
        })?;
        self.sections.insert(T::NAME, value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Write the sections as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(writer: &mut W, sections: &JsonSections) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, sections).map_err(|e| CinestatError::Export {
        message: "writing JSON".to_string(),
        source: e.into(),
    })?;
    writeln!(writer).map_err(|e| CinestatError::Export {
        message: "writing newline".to_string(),
        source: e,
    })?;
    Ok(())
}
