//! Film dataset loading
//!
//! The demo dataset is a headerless CSV, one film per line:
//!
//! ```text
//! id,title,year,"[f0, f1, ..., f7]"
//! ```
//!
//! Titles may not contain commas. The embedding is wrapped in `"[` ... `]"`;
//! inside, floats are comma-separated with an optional single leading space
//! on every token after the first. Exactly [`EMBEDDING_DIM`] elements per
//! row, or the load aborts with an error naming the offending line.

use crate::error::{ClientError, Result};
use crate::results::TitleCatalog;
use crate::schema::{FloatVectorField, Int32Field, Schema};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Dimension of the film embedding vectors.
pub const EMBEDDING_DIM: usize = 8;

/// Field handles for the film collection schema.
#[derive(Debug, Clone)]
pub struct FilmSchema {
    pub release_year: Int32Field,
    pub embedding: FloatVectorField,
}

impl FilmSchema {
    pub fn new() -> Self {
        Self {
            release_year: Int32Field::new("release_year"),
            embedding: FloatVectorField::new("embedding", EMBEDDING_DIM),
        }
    }

    /// The collection schema: one scalar year field, one vector field.
    pub fn schema(&self) -> Schema {
        Schema::new().field(&self.release_year).field(&self.embedding)
    }
}

impl Default for FilmSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// One parsed CSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct FilmRecord {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub embedding: Vec<f32>,
}

/// Parsed rows regrouped into parallel columns, ready for bulk insert.
#[derive(Debug, Clone, Default)]
pub struct FilmColumns {
    pub ids: Vec<i64>,
    pub titles: Vec<String>,
    pub years: Vec<i32>,
    pub embeddings: Vec<Vec<f32>>,
}

impl FilmColumns {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn push(&mut self, record: FilmRecord) {
        self.ids.push(record.id);
        self.titles.push(record.title);
        self.years.push(record.year);
        self.embeddings.push(record.embedding);
    }

    /// Build the id-to-title map used to correlate search hits.
    pub fn title_catalog(&self) -> TitleCatalog {
        self.ids
            .iter()
            .copied()
            .zip(self.titles.iter().cloned())
            .collect()
    }
}

/// Load the whole CSV file into columns. Any malformed line aborts the load.
pub fn load_films(path: &Path) -> Result<FilmColumns> {
    let reader = BufReader::new(File::open(path)?);
    let mut columns = FilmColumns::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        columns.push(parse_film_row(&line, idx + 1)?);
    }
    Ok(columns)
}

/// Parse one CSV row. `line` is the 1-based line number used in errors.
pub fn parse_film_row(text: &str, line: usize) -> Result<FilmRecord> {
    let malformed = |reason: String| ClientError::MalformedRow { line, reason };

    let mut parts = text.splitn(4, ',');
    let id = parts
        .next()
        .ok_or_else(|| malformed("missing id column".to_string()))?;
    let id = id
        .parse::<i64>()
        .map_err(|_| malformed(format!("invalid id '{}'", id)))?;

    let title = parts
        .next()
        .ok_or_else(|| malformed("missing title column".to_string()))?
        .to_string();

    let year = parts
        .next()
        .ok_or_else(|| malformed("missing year column".to_string()))?;
    let year = year
        .parse::<i32>()
        .map_err(|_| malformed(format!("invalid year '{}'", year)))?;

    let raw = parts
        .next()
        .ok_or_else(|| malformed("missing embedding column".to_string()))?;
    let inner = raw
        .strip_prefix("\"[")
        .and_then(|s| s.strip_suffix("]\""))
        .ok_or_else(|| malformed("embedding must be wrapped in \"[...]\"".to_string()))?;

    let embedding = parse_embedding(inner).map_err(malformed)?;

    Ok(FilmRecord {
        id,
        title,
        year,
        embedding,
    })
}

/// Parse the inside of a bracketed embedding list (brackets already
/// stripped): comma-separated floats, optional single leading space on
/// every token after the first.
fn parse_embedding(inner: &str) -> std::result::Result<Vec<f32>, String> {
    let mut values = Vec::with_capacity(EMBEDDING_DIM);
    for (i, token) in inner.split(',').enumerate() {
        let token = if i == 0 {
            token
        } else {
            token.strip_prefix(' ').unwrap_or(token)
        };
        let value = token
            .parse::<f32>()
            .map_err(|_| format!("invalid embedding value '{}'", token))?;
        values.push(value);
    }
    if values.len() != EMBEDDING_DIM {
        return Err(format!(
            "embedding has {} elements, expected {}",
            values.len(),
            EMBEDDING_DIM
        ));
    }
    Ok(values)
}

/// Render an embedding back into its bracketed list form.
pub fn format_embedding(values: &[f32]) -> String {
    let body: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", body.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use std::io::Write;

    const TOY_STORY: &str = "1,Toy Story,1995,\"[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8]\"";

    #[test]
    fn test_parse_row() {
        let record = parse_film_row(TOY_STORY, 1).unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.title, "Toy Story");
        assert_eq!(record.year, 1995);
        assert_eq!(record.embedding.len(), EMBEDDING_DIM);
        assert_relative_eq!(record.embedding[0], 0.1, epsilon = 1e-6);
        assert_relative_eq!(record.embedding[7], 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_parse_row_too_few_elements() {
        let result = parse_film_row("1,Toy Story,1995,\"[0.1, 0.2, 0.3]\"", 1);
        assert!(matches!(
            result,
            Err(ClientError::MalformedRow { line: 1, .. })
        ));
    }

    #[test]
    fn test_parse_row_too_many_elements() {
        let row = "1,Toy Story,1995,\"[1, 2, 3, 4, 5, 6, 7, 8, 9]\"";
        assert!(parse_film_row(row, 3).is_err());
    }

    #[test]
    fn test_parse_row_missing_brackets() {
        let result = parse_film_row("1,Toy Story,1995,0.1, 0.2", 2);
        assert!(matches!(
            result,
            Err(ClientError::MalformedRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_parse_row_bad_year() {
        assert!(parse_film_row("1,Toy Story,droid,\"[0, 0, 0, 0, 0, 0, 0, 0]\"", 1).is_err());
    }

    #[test]
    fn test_parse_row_bad_float() {
        assert!(parse_film_row("1,Toy Story,1995,\"[a, 0, 0, 0, 0, 0, 0, 0]\"", 1).is_err());
    }

    #[test]
    fn test_load_films() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", TOY_STORY).unwrap();
        writeln!(
            file,
            "2,Jumanji,1995,\"[0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 0.1]\""
        )
        .unwrap();

        let columns = load_films(file.path()).unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns.titles, vec!["Toy Story", "Jumanji"]);
        assert_eq!(columns.years, vec![1995, 1995]);

        let catalog = columns.title_catalog();
        assert_eq!(catalog.get(2), Some("Jumanji"));
    }

    #[test]
    fn test_load_films_aborts_on_malformed_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", TOY_STORY).unwrap();
        writeln!(file, "not a film").unwrap();

        let result = load_films(file.path());
        assert!(matches!(
            result,
            Err(ClientError::MalformedRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_format_embedding() {
        assert_eq!(format_embedding(&[0.5, 1.0]), "[0.5, 1]");
    }

    proptest! {
        #[test]
        fn prop_embedding_roundtrip(values in proptest::collection::vec(-1000.0f32..1000.0, EMBEDDING_DIM)) {
            let formatted = format_embedding(&values);
            let inner = formatted
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .unwrap();
            let parsed = parse_embedding(inner).unwrap();
            prop_assert_eq!(parsed.len(), values.len());
            for (a, b) in parsed.iter().zip(values.iter()) {
                prop_assert!((a - b).abs() <= 1e-4 * b.abs().max(1.0));
            }
        }
    }
}
