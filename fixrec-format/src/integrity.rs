//! Pre-flight checks on a record file, run once before any record is
//! scanned.

use std::path::Path;

/// Outcome of the pre-flight check.
///
/// Fatal issues abort the read before scanning; warnings are carried into
/// the read result but do not prevent reading.
#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub fatal: Vec<String>,
    pub warnings: Vec<String>,
    pub file_size: u64,
}

impl IntegrityReport {
    pub fn ok(&self) -> bool {
        self.fatal.is_empty()
    }
}

/// Check that `path` is a readable, non-empty regular file and report
/// whether its size aligns to `record_size`.
///
/// A size that is not an exact multiple of the record size is a warning,
/// not a failure: the scan will encounter and report the trailing short
/// record itself.
pub fn check<P: AsRef<Path>>(path: P, record_size: usize) -> IntegrityReport {
    let path = path.as_ref();
    let mut report = IntegrityReport::default();

    let meta = match std::fs::metadata(path) {
        Ok(meta) => meta,
        Err(_) => {
            report
                .fatal
                .push(format!("file does not exist: {}", path.display()));
            return report;
        }
    };

    if !meta.is_file() {
        report
            .fatal
            .push(format!("path is not a regular file: {}", path.display()));
        return report;
    }

    report.file_size = meta.len();

    if meta.len() == 0 {
        report.fatal.push("file is empty (0 bytes)".to_string());
        return report;
    }

    let remainder = meta.len() % record_size as u64;
    if remainder != 0 {
        report.warnings.push(format!(
            "file size ({} bytes) is not a multiple of record size ({} bytes): \
             {} trailing bytes, largest aligned size is {} bytes",
            meta.len(),
            record_size,
            remainder,
            meta.len() - remainder
        ));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let report = check(dir.path().join("absent.bin"), 22);
        assert!(!report.ok());
        assert!(report.fatal[0].contains("does not exist"));
    }

    #[test]
    fn directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let report = check(dir.path(), 22);
        assert!(!report.ok());
        assert!(report.fatal[0].contains("not a regular file"));
    }

    #[test]
    fn empty_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        std::fs::File::create(&path).unwrap();
        let report = check(&path, 22);
        assert!(!report.ok());
        assert!(report.fatal[0].contains("empty"));
    }

    #[test]
    fn misaligned_size_is_only_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0u8; 54]).unwrap();

        let report = check(&path, 22);
        assert!(report.ok());
        assert_eq!(report.file_size, 54);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("10 trailing bytes"));
        assert!(report.warnings[0].contains("largest aligned size is 44 bytes"));
    }

    #[test]
    fn aligned_file_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0u8; 44]).unwrap();

        let report = check(&path, 22);
        assert!(report.ok());
        assert!(report.warnings.is_empty());
    }
}
