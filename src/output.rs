use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

const ICS_EXTENSION: &str = "ics";
const FILTERED_SUFFIX: &str = "_filtered.ics";

/// `spring.ics` becomes `spring_filtered.ics`. Only a trailing, case-sensitive
/// `.ics` is replaced; any other name gets `_filtered.ics` appended. The name
/// is handled as an `OsStr`, so non UTF-8 names come out intact.
pub fn output_path(input: &Path) -> PathBuf {
    let name = input.file_name().unwrap_or_default();
    let name_path = Path::new(name);
    let stem = match (name_path.extension(), name_path.file_stem()) {
        (Some(ext), Some(stem)) if ext == ICS_EXTENSION => stem,
        _ => name,
    };
    let mut filtered = OsString::from(stem);
    filtered.push(FILTERED_SUFFIX);
    input.with_file_name(filtered)
}

/// Writes through a temporary file next to `path`, so a failed write leaves
/// no half-written calendar behind.
pub fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let write_error = |source: std::io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(contents.as_bytes()).map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote calendar");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_trailing_extension() {
        assert_eq!(
            output_path(Path::new("spring.ics")),
            PathBuf::from("spring_filtered.ics")
        );
        assert_eq!(
            output_path(Path::new("/home/me/cal/spring.ics")),
            PathBuf::from("/home/me/cal/spring_filtered.ics")
        );
    }

    #[test]
    fn only_the_last_extension_is_replaced() {
        assert_eq!(
            output_path(Path::new("my.ics.backup.ics")),
            PathBuf::from("my.ics.backup_filtered.ics")
        );
        assert_eq!(
            output_path(Path::new("/data/x.ics/term.ics")),
            PathBuf::from("/data/x.ics/term_filtered.ics")
        );
    }

    #[test]
    fn appends_when_extension_is_missing() {
        assert_eq!(
            output_path(Path::new("notes.txt")),
            PathBuf::from("notes.txt_filtered.ics")
        );
        assert_eq!(
            output_path(Path::new("SPRING.ICS")),
            PathBuf::from("SPRING.ICS_filtered.ics")
        );
    }

    #[cfg(unix)]
    #[test]
    fn keeps_non_utf8_names_intact() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let input = Path::new("/tmp").join(OsStr::from_bytes(b"caf\xe9.ics"));
        assert_eq!(
            output_path(&input),
            Path::new("/tmp").join(OsStr::from_bytes(b"caf\xe9_filtered.ics"))
        );

        let input = Path::new("/tmp").join(OsStr::from_bytes(b"caf\xe9"));
        assert_eq!(
            output_path(&input),
            Path::new("/tmp").join(OsStr::from_bytes(b"caf\xe9_filtered.ics"))
        );
    }

    #[test]
    fn writes_and_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ics");
        std::fs::write(&path, "old").unwrap();

        write_atomically(&path, "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n").unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n"
        );
    }

    #[test]
    fn missing_directory_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.ics");
        assert!(matches!(
            write_atomically(&path, "x"),
            Err(Error::Write { .. })
        ));
        assert!(!path.exists());
    }
}
