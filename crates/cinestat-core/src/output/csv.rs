use std::io::Write;

use crate::analytics::rows::ResultTable;
use crate::error::{CinestatError, Result};

/// Write one result table as CSV, preceded by a `# Table: <name>` comment
/// line and followed by a blank line so several tables can share a stream.
pub fn write_csv_section<W: Write, T: ResultTable>(writer: &mut W, rows: &[T]) -> Result<()> {
    writeln!(writer, "# Table: {}", T::NAME).map_err(|e| CinestatError::Export {
        message: format!("writing CSV header for {}", T::NAME),
        source: e,
    })?;
    write_csv_table(writer, rows)?;
    writeln!(writer).map_err(|e| CinestatError::Export {
        message: "writing newline".to_string(),
        source: e,
    })?;
    Ok(())
}

/// Write the header line and every row of a result table. The header is
/// written even when `rows` is empty.
pub fn write_csv_table<W: Write, T: ResultTable>(writer: &mut W, rows: &[T]) -> Result<()> {
    writeln!(
        writer,
        "{}",
        T::headers()
            .iter()
            .map(|c| csv_escape(c))
            .collect::<Vec<_>>()
            .join(",")
    )
    .map_err(|e| CinestatError::Export {
        message: format!("writing CSV columns for {}", T::NAME),
        source: e,
    })?;

    for row in rows {
        let values: Vec<String> = row.cells().iter().map(|v| csv_escape(v)).collect();
        writeln!(writer, "{}", values.join(",")).map_err(|e| CinestatError::Export {
            message: format!("writing CSV row for {}", T::NAME),
            source: e,
        })?;
    }

    Ok(())
}

/// Escape a string for CSV: quote if it contains comma, quote, or newline.
fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::rows::CollaborationRow;

    fn pair(titles: &str) -> CollaborationRow {
        CollaborationRow {
            actor1_id: 3,
            actor2_id: 9,
            actor1: "Viola Davis".to_string(),
            actor2: "Oscar Isaac".to_string(),
            collaborations: 2,
            avg_collab_rating: 6.8,
            movies_together: titles.to_string(),
        }
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("hello"), "hello");
        assert_eq!(csv_escape("hello,world"), "\"hello,world\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_write_csv_table_quotes_title_lists() {
        let mut out = Vec::new();
        write_csv_table(&mut out, &[pair("Okja,Nope")]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), CollaborationRow::headers().join(","));
        assert!(lines.next().unwrap().ends_with(",\"Okja,Nope\""));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_write_csv_section_empty_rows() {
        let mut out = Vec::new();
        write_csv_section::<_, CollaborationRow>(&mut out, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(&format!("# Table: {}\n", CollaborationRow::NAME)));
        assert_eq!(text.lines().count(), 3);
    }
}
