//! Asset output with side effects (writing, cleaning).

use std::fs;
use std::path::Path;

use crate::pipeline::BuildError;

/// Write `bytes` to `class_dir/rel`, creating parent directories.
pub fn write_asset(class_dir: &Path, rel: &str, bytes: &[u8]) -> Result<(), BuildError> {
    let output = class_dir.join(rel);
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|err| BuildError::io(parent, err))?;
    }
    fs::write(&output, bytes).map_err(|err| BuildError::io(&output, err))
}

/// Delete everything inside `root`, keeping `root` itself.
///
/// Returns the number of removed entries. A missing `root` is not an error.
pub fn clean_output(root: &Path) -> Result<usize, BuildError> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(err) => return Err(BuildError::io(root, err)),
    };

    let mut removed = 0;
    for entry in entries {
        let path = entry.map_err(|err| BuildError::io(root, err))?.path();
        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.map_err(|err| BuildError::io(&path, err))?;
        removed += 1;
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_asset_creates_parents() {
        let dir = TempDir::new().unwrap();
        let css = dir.path().join("dist/css");
        write_asset(&css, "app.1a2b3c4d.css", b"a{}").unwrap();
        assert_eq!(fs::read(css.join("app.1a2b3c4d.css")).unwrap(), b"a{}");
    }

    #[test]
    fn test_clean_output_keeps_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("dist");
        write_asset(&root.join("css"), "app.css", b"").unwrap();
        write_asset(&root, "index.html", b"").unwrap();

        assert_eq!(clean_output(&root).unwrap(), 2);
        assert!(root.is_dir());
        assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
    }

    #[test]
    fn test_clean_missing_root() {
        let dir = TempDir::new().unwrap();
        assert_eq!(clean_output(&dir.path().join("nope")).unwrap(), 0);
    }
}
