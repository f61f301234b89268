use crate::layout::{FieldKind, RecordLayout};
use crate::parse;
use crate::policy::{Action, ErrorPolicy};
use crate::record::{FieldValue, Record};
use crate::report::{ErrorEntry, RecordError};
use crate::text::TextDecoder;
use crate::validate::Validator;

/// What became of one record slot.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// The record decoded and validated cleanly.
    Accepted(Record),
    /// The record was discarded; the entry goes to the error log.
    Rejected(ErrorEntry),
    /// The record failed validation but is kept for inspection.
    Retained(Record, ErrorEntry),
    /// The failure is fatal under the active policy.
    Aborted(ErrorEntry),
}

/// Turns one record's raw bytes into an [`Outcome`]: unpack, decode text,
/// assemble, validate, then apply the continuation policy at a single
/// decision point.
#[derive(Debug)]
pub(crate) struct RecordProcessor<'a> {
    layout: &'a RecordLayout,
    text: &'a TextDecoder,
    validator: &'a Validator,
    policy: ErrorPolicy,
}

impl<'a> RecordProcessor<'a> {
    pub(crate) fn new(
        layout: &'a RecordLayout,
        text: &'a TextDecoder,
        validator: &'a Validator,
        policy: ErrorPolicy,
    ) -> RecordProcessor<'a> {
        RecordProcessor {
            layout,
            text,
            validator,
            policy,
        }
    }

    pub(crate) fn process(&self, raw: &[u8], record_number: u64, byte_offset: u64) -> Outcome {
        let (record, error) = match self.evaluate(raw, record_number, byte_offset) {
            Ok(record) => return Outcome::Accepted(record),
            Err(failure) => failure,
        };

        tracing::error!(
            record_number,
            byte_offset,
            kind = %error.kind(),
            "{}",
            error
        );

        let entry = ErrorEntry {
            record_number,
            byte_offset,
            error,
        };

        match Action::for_error(self.policy, entry.error.kind()) {
            Action::Abort => Outcome::Aborted(entry),
            Action::Drop => Outcome::Rejected(entry),
            Action::Retain => match record {
                Some(record) => Outcome::Retained(record, entry),
                None => Outcome::Rejected(entry),
            },
        }
    }

    /// Decode and validate; on failure, return the error together with the
    /// record if one could still be assembled.
    fn evaluate(
        &self,
        raw: &[u8],
        record_number: u64,
        byte_offset: u64,
    ) -> Result<Record, (Option<Record>, RecordError)> {
        let values = parse::parse_record(self.layout, raw)
            .map_err(|e| (None, RecordError::from(e)))?;

        let record = self.assemble(values, record_number, byte_offset);

        let violations = self.validator.validate(&record);
        if violations.is_empty() {
            Ok(record)
        } else {
            Err((Some(record), RecordError::Validation { violations }))
        }
    }

    fn assemble(&self, values: Vec<FieldValue>, record_number: u64, byte_offset: u64) -> Record {
        let fields = self
            .layout
            .fields()
            .iter()
            .zip(values)
            .map(|(spec, value)| {
                let value = match (spec.kind, value) {
                    (FieldKind::Text(_), FieldValue::Bytes(bytes)) => {
                        FieldValue::Text(self.text.decode(&bytes, record_number))
                    }
                    (_, value) => value,
                };
                (spec.name.clone(), value)
            })
            .collect();

        Record::new(record_number, byte_offset, fields)
    }
}
