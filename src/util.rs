use std::io;
use std::path::Path;

/// Creates the directory `dir`. An existing directory (or any existing entry)
/// at `dir` counts as success. The parent must already exist.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    match std::fs::create_dir(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            io::ErrorKind::AlreadyExists => Ok(()),
            _ => Err(e),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_is_idempotent() -> io::Result<()> {
        let tmp = TempDir::new()?;
        let dir = tmp.path().join("build");
        ensure_dir(&dir)?;
        ensure_dir(&dir)?;
        assert!(dir.is_dir());
        Ok(())
    }

    #[test]
    fn test_ensure_dir_missing_parent() -> io::Result<()> {
        let tmp = TempDir::new()?;
        let err = ensure_dir(&tmp.path().join("a").join("b")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        Ok(())
    }
}
