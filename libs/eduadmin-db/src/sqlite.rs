use std::path::Path;

use crate::{DbError, Result};

pub fn is_memory_dsn(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

/// Normalize a `SQLite` DSN for file databases: create the parent directory when asked and
/// default to read-write-create mode so a fresh path does not fail on first connect.
pub fn prepare_dsn(dsn: &str, create_dirs: bool) -> Result<String> {
    if is_memory_dsn(dsn) {
        return Ok(dsn.to_owned());
    }

    let rest = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))
        .ok_or_else(|| DbError::UnknownDsn(dsn.to_owned()))?;
    let (path, query) = match rest.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (rest, None),
    };
    if path.is_empty() {
        return Err(DbError::InvalidConfig(format!(
            "SQLite DSN has no file path: {dsn}"
        )));
    }

    if create_dirs
        && let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    Ok(match query {
        Some(q) if q.split('&').any(|kv| kv.starts_with("mode=")) => dsn.to_owned(),
        Some(q) => format!("sqlite://{path}?{q}&mode=rwc"),
        None => format!("sqlite://{path}?mode=rwc"),
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn memory_dsn_is_untouched() {
        assert_eq!(prepare_dsn("sqlite::memory:", true).unwrap(), "sqlite::memory:");
    }

    #[test]
    fn file_dsn_gets_create_mode_and_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("db.sqlite");
        let dsn = format!("sqlite://{}", path.display());

        let prepared = prepare_dsn(&dsn, true).unwrap();
        assert!(prepared.ends_with("?mode=rwc"));
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn explicit_mode_is_kept() {
        let dsn = "sqlite://db.sqlite?mode=ro";
        assert_eq!(prepare_dsn(dsn, false).unwrap(), dsn);
        assert_eq!(
            prepare_dsn("sqlite://db.sqlite?cache=shared", false).unwrap(),
            "sqlite://db.sqlite?cache=shared&mode=rwc"
        );
    }

    #[test]
    fn empty_path_is_rejected() {
        assert!(matches!(
            prepare_dsn("sqlite://", false),
            Err(DbError::InvalidConfig(_))
        ));
    }
}
