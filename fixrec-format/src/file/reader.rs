use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::integrity;
use crate::layout::RecordLayout;
use crate::policy::{Action, ErrorPolicy};
use crate::process::{Outcome, RecordProcessor};
use crate::report::{ErrorEntry, ErrorKind, ReadResult, RecordError};
use crate::rules::RuleSet;
use crate::text::TextDecoder;
use crate::validate::Validator;

/// A progress observation is emitted every this many records.
const PROGRESS_INTERVAL: u64 = 10_000;

/// Fatal failure of a read call. Non-fatal conditions are only visible in
/// the returned [`ReadResult`] logs.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The pre-flight check failed; nothing was scanned.
    #[error("file integrity check failed: {}", .issues.join("; "))]
    Integrity { issues: Vec<String> },

    /// A record failed under the strict policy.
    #[error("record {} at offset {}: {}", .0.record_number, .0.byte_offset, .0.error)]
    Record(ErrorEntry),

    #[error("failed to read record file")]
    Io(#[source] std::io::Error),
}

/// Sequential reader for files of fixed-size binary records.
///
/// Configured once with a layout, rules and a policy, then reused; every
/// [`read`](RecordFileReader::read) call returns a fresh [`ReadResult`] and
/// shares no state with other calls.
#[derive(Debug)]
pub struct RecordFileReader {
    layout: RecordLayout,
    text: TextDecoder,
    validator: Validator,
    policy: ErrorPolicy,
}

impl RecordFileReader {
    pub fn new(layout: RecordLayout) -> RecordFileReader {
        RecordFileReader {
            layout,
            text: TextDecoder::default(),
            validator: Validator::new(RuleSet::default()),
            policy: ErrorPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> RecordFileReader {
        self.policy = policy;
        self
    }

    pub fn with_rules(mut self, rules: RuleSet) -> RecordFileReader {
        self.validator = Validator::new(rules);
        self
    }

    pub fn with_text_decoder(mut self, text: TextDecoder) -> RecordFileReader {
        self.text = text;
        self
    }

    #[inline(always)]
    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    /// Scan the whole file and return the result snapshot.
    ///
    /// The file is opened for the duration of this call only and released
    /// on every exit path. A short trailing record always ends the scan;
    /// under the strict policy it fails the call instead.
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<ReadResult, ReadError> {
        let path = path.as_ref();
        let record_size = self.layout.record_size();

        tracing::info!(
            path = %path.display(),
            record_size,
            policy = %self.policy,
            "starting record scan"
        );

        let report = integrity::check(path, record_size);
        if !report.ok() {
            tracing::error!(path = %path.display(), issues = ?report.fatal, "integrity check failed");
            return Err(ReadError::Integrity {
                issues: report.fatal,
            });
        }
        for warning in &report.warnings {
            tracing::warn!("{}", warning);
        }

        let file_size = report.file_size;
        let warnings = report.warnings;

        let file = File::open(path).map_err(ReadError::Io)?;
        let mut source = BufReader::new(file);

        let processor = RecordProcessor::new(&self.layout, &self.text, &self.validator, self.policy);

        let mut records = Vec::new();
        let mut errors = Vec::new();
        let mut record_number = 0u64;
        let mut byte_offset = 0u64;
        let mut buf = vec![0u8; record_size];

        loop {
            let received = read_full(&mut source, &mut buf).map_err(ReadError::Io)?;
            if received == 0 {
                break;
            }

            if received < record_size {
                // The fragment occupies the next record slot but is not a
                // scanned record; it always ends the scan.
                let entry = ErrorEntry {
                    record_number: record_number + 1,
                    byte_offset,
                    error: RecordError::Incomplete {
                        expected: record_size,
                        received,
                    },
                };
                tracing::error!(
                    record_number = record_number + 1,
                    byte_offset,
                    received,
                    expected = record_size,
                    "incomplete trailing record"
                );
                if Action::for_error(self.policy, ErrorKind::Incomplete) == Action::Abort {
                    return Err(ReadError::Record(entry));
                }
                errors.push(entry);
                break;
            }

            record_number += 1;

            match processor.process(&buf, record_number, byte_offset) {
                Outcome::Accepted(record) => records.push(record),
                Outcome::Retained(record, entry) => {
                    errors.push(entry);
                    records.push(record);
                }
                Outcome::Rejected(entry) => errors.push(entry),
                Outcome::Aborted(entry) => return Err(ReadError::Record(entry)),
            }

            byte_offset += record_size as u64;

            if record_number % PROGRESS_INTERVAL == 0 {
                tracing::debug!(records = record_number, "scan progress");
            }
        }

        let valid_records = records.len() as u64;
        let result = ReadResult {
            records,
            total_records: record_number,
            valid_records,
            invalid_records: record_number - valid_records,
            errors,
            warnings,
            file_size,
            expected_records: self.layout.expected_records(file_size),
        };

        tracing::info!(
            total = result.total_records,
            valid = result.valid_records,
            invalid = result.invalid_records,
            errors = result.errors.len(),
            "record scan complete"
        );

        Ok(result)
    }
}

/// Read until `buf` is full or the input ends, retrying on interruption.
fn read_full<R: Read>(source: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match source.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}
