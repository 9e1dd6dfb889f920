//! Parser for the repository dataset files.
//!
//! Both files use `::` as the field separator:
//! - repos.dat: id::name::owner_user::description::date_pushed::stars::has_wiki::has_discussions
//! - relationships.dat: owner_user::entity_id::f1,f2,...,fn
//!
//! Blank lines and lines starting with `#` are skipped. Every error carries
//! the file name and the 1-based line number.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use chrono::{DateTime, NaiveDateTime};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

const REPO_FIELDS: usize = 8;
const RELATIONSHIP_FIELDS: usize = 3;

/// Formats accepted for `date_pushed` when it isn't RFC 3339
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Read a file and return its lines, mapping a missing file onto `FileNotFound`
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;

    Ok(content.lines().map(|s| s.to_string()).collect())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Lines worth parsing, paired with their 1-based line number
fn data_lines(lines: &[String]) -> impl Iterator<Item = (usize, &str)> {
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Split a line on `::` and check the field count.
///
/// Descriptions are free text, so they may contain `::` or stray colons at
/// either end. Fields before `free_text_at` are split from the left and
/// fields after it from the right; whatever sits between is the free text.
fn split_fields(
    line: &str,
    expected: usize,
    free_text_at: Option<usize>,
    file: &str,
    line_no: usize,
) -> Result<Vec<String>> {
    let mismatch = || DataLoadError::FieldCountMismatch {
        file: file.to_string(),
        expected,
        found: line.split("::").count(),
        line: line_no,
    };

    let Some(at) = free_text_at else {
        let parts: Vec<&str> = line.split("::").collect();
        if parts.len() != expected {
            return Err(mismatch());
        }
        return Ok(parts.into_iter().map(str::to_string).collect());
    };

    let mut fields: Vec<&str> = line.splitn(at + 1, "::").collect();
    let Some(rest) = fields.pop().filter(|_| fields.len() == at) else {
        return Err(mismatch());
    };

    let trailing = expected - at - 1;
    let mut tail: Vec<&str> = rest.rsplitn(trailing + 1, "::").collect();
    if tail.len() != trailing + 1 {
        return Err(mismatch());
    }
    tail.reverse();
    fields.extend(tail);

    Ok(fields.into_iter().map(str::to_string).collect())
}

pub fn parse_bool(field: &str, s: &str) -> Result<bool> {
    match s.trim() {
        "true" | "True" | "TRUE" | "1" => Ok(true),
        "false" | "False" | "FALSE" | "0" => Ok(false),
        other => Err(DataLoadError::InvalidValue {
            field: field.to_string(),
            value: other.to_string(),
        }),
    }
}

/// Parse a push timestamp.
///
/// RFC 3339 values with an offset are converted to UTC before the offset is
/// dropped; naive values are taken as-is.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| DataLoadError::InvalidValue {
            field: "date_pushed".to_string(),
            value: s.to_string(),
        })
}

fn parse_embedding(s: &str, file: &str, line_no: usize) -> Result<Vec<f32>> {
    s.split(',')
        .map(|v| {
            v.trim().parse::<f32>().map_err(|e| DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!("Invalid embedding component '{}': {}", v.trim(), e),
            })
        })
        .collect()
}

/// Parse the repos.dat file into catalog records (in file order)
pub fn parse_repos(path: &Path) -> Result<Vec<EntityRecord>> {
    let lines = read_lines(path)?;
    let file = file_label(path);
    let mut records = Vec::new();

    for (line_no, line) in data_lines(&lines) {
        let fields = split_fields(line, REPO_FIELDS, Some(3), &file, line_no)?;

        let id = fields[0].trim().parse::<EntityId>().map_err(|e| DataLoadError::ParseError {
            file: file.clone(),
            line: line_no,
            reason: format!("Invalid id: {}", e),
        })?;

        let name = fields[1].trim();
        if name.is_empty() {
            return Err(DataLoadError::ParseError {
                file: file.clone(),
                line: line_no,
                reason: "Missing name".to_string(),
            });
        }

        let owner_user = fields[2].trim();
        if owner_user.is_empty() {
            return Err(DataLoadError::ParseError {
                file: file.clone(),
                line: line_no,
                reason: "Missing owner_user".to_string(),
            });
        }

        let description = match fields[3].trim() {
            "" => None,
            text => Some(text.to_string()),
        };

        let stars = fields[5].trim().parse::<u32>().map_err(|e| DataLoadError::ParseError {
            file: file.clone(),
            line: line_no,
            reason: format!("Invalid stars: {}", e),
        })?;

        records.push(EntityRecord {
            id,
            name: name.to_string(),
            owner_user: owner_user.to_string(),
            description,
            date_pushed: parse_timestamp(&fields[4])?,
            stars,
            has_wiki: parse_bool("has_wiki", &fields[6])?,
            has_discussions: parse_bool("has_discussions", &fields[7])?,
        });
    }

    Ok(records)
}

/// Parse the relationships.dat file (in file order)
pub fn parse_relationships(path: &Path) -> Result<Vec<RelationshipRow>> {
    let lines = read_lines(path)?;
    let file = file_label(path);
    let mut rows = Vec::new();

    for (line_no, line) in data_lines(&lines) {
        let fields = split_fields(line, RELATIONSHIP_FIELDS, None, &file, line_no)?;

        let owner_user = fields[0].trim();
        if owner_user.is_empty() {
            return Err(DataLoadError::ParseError {
                file: file.clone(),
                line: line_no,
                reason: "Missing owner_user".to_string(),
            });
        }

        let entity_id = fields[1].trim().parse::<EntityId>().map_err(|e| DataLoadError::ParseError {
            file: file.clone(),
            line: line_no,
            reason: format!("Invalid entity_id: {}", e),
        })?;

        rows.push(RelationshipRow {
            owner_user: owner_user.to_string(),
            entity_id,
            embedding: parse_embedding(&fields[2], &file, line_no)?,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use std::path::PathBuf;

    /// Write `content` to a uniquely named file under the system temp dir
    fn write_temp(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "data-loader-parser-{}-{}",
            std::process::id(),
            name
        ));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();

        assert_eq!(parse_timestamp("2024-03-01T10:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-01 10:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-01T10:00:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-03-01T12:00:00+02:00").unwrap(), expected);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("has_wiki", "True").unwrap());
        assert!(parse_bool("has_wiki", "1").unwrap());
        assert!(!parse_bool("has_wiki", "false").unwrap());
        assert!(matches!(
            parse_bool("has_wiki", "maybe"),
            Err(DataLoadError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_parse_repos() {
        let path = write_temp(
            "repos.dat",
            "# id::name::owner::description::pushed::stars::wiki::discussions\n\
             42::alpha::octo::demo::2024-03-01T10:00:00::5::true::false\n\
             \n\
             43::beta::hubot::::2023-12-31 23:59:59::0::False::0\n\
             44::gamma::octo::uses a::b separator::2024-01-01T00:00:00::7::0::1\n",
        );

        let repos = parse_repos(&path).unwrap();
        assert_eq!(repos.len(), 3);

        assert_eq!(repos[0].id, 42);
        assert_eq!(repos[0].name, "alpha");
        assert_eq!(repos[0].description.as_deref(), Some("demo"));
        assert!(repos[0].has_wiki);
        assert!(!repos[0].has_discussions);

        assert_eq!(repos[1].description, None);
        assert_eq!(repos[1].stars, 0);

        assert_eq!(repos[2].description.as_deref(), Some("uses a::b separator"));
        assert_eq!(repos[2].stars, 7);
        assert!(repos[2].has_discussions);
    }

    #[test]
    fn test_parse_repos_descriptions_with_stray_colons() {
        let path = write_temp(
            "colon_repos.dat",
            "1::one::octo::ends with:::2024-03-01T10:00:00::1::true::false\n\
             2::two::octo:::starts with a colon::2024-03-01T10:00:00::2::false::false\n\
             3::three::octo::a::b:::c::2024-03-01 10:00:00::3::0::0\n",
        );

        let repos = parse_repos(&path).unwrap();
        assert_eq!(repos.len(), 3);
        assert_eq!(repos[0].description.as_deref(), Some("ends with:"));
        assert_eq!(repos[0].stars, 1);
        assert_eq!(repos[1].description.as_deref(), Some(":starts with a colon"));
        assert_eq!(repos[2].description.as_deref(), Some("a::b:::c"));
        assert_eq!(repos[2].stars, 3);
    }

    #[test]
    fn test_parse_repos_too_few_fields() {
        let path = write_temp("short_repos.dat", "1::one::octo::demo::2024-03-01T10:00:00\n");

        assert!(matches!(
            parse_repos(&path),
            Err(DataLoadError::FieldCountMismatch { expected: 8, found: 5, line: 1, .. })
        ));
    }

    #[test]
    fn test_parse_repos_reports_line_numbers() {
        let path = write_temp(
            "bad_repos.dat",
            "1::ok::octo::d::2024-03-01T10:00:00::1::true::true\n\
             x::bad::octo::d::2024-03-01T10:00:00::1::true::true\n",
        );

        match parse_repos(&path) {
            Err(DataLoadError::ParseError { line, file, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(file, "bad_repos.dat");
            }
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_relationships() {
        let path = write_temp(
            "relationships.dat",
            "octo::42::0.1,0.2,0.3\nhubot::43:: 1.0 , 0.0 ,0.5\n",
        );

        let rows = parse_relationships(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].owner_user, "octo");
        assert_eq!(rows[0].entity_id, 42);
        assert_eq!(rows[0].embedding, vec![0.1, 0.2, 0.3]);
        assert_eq!(rows[1].embedding, vec![1.0, 0.0, 0.5]);
    }

    #[test]
    fn test_parse_relationships_field_count() {
        let path = write_temp("short_relationships.dat", "octo::42\n");

        assert!(matches!(
            parse_relationships(&path),
            Err(DataLoadError::FieldCountMismatch { expected: 3, found: 2, line: 1, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = parse_repos(Path::new("/definitely/not/here/repos.dat"));
        assert!(matches!(result, Err(DataLoadError::FileNotFound { .. })));
    }
}
