use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::encode::{encode_record, EncodeError};
use crate::layout::RecordLayout;
use crate::record::FieldValue;

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("cannot encode record {record_number}")]
    Encode {
        record_number: u64,
        #[source]
        source: EncodeError,
    },

    #[error("failed to write record file")]
    Io(#[source] std::io::Error),
}

/// Append-only writer producing files the reader can scan: a headerless
/// concatenation of fixed-size records.
#[derive(Debug)]
pub struct RecordFileWriter {
    layout: RecordLayout,
    out: BufWriter<File>,
    records_written: u64,
}

impl RecordFileWriter {
    /// Create (or truncate) `path` for writing records under `layout`.
    pub fn create<P: AsRef<Path>>(path: P, layout: RecordLayout) -> std::io::Result<RecordFileWriter> {
        let file = File::create(path.as_ref())?;
        Ok(RecordFileWriter {
            layout,
            out: BufWriter::new(file),
            records_written: 0,
        })
    }

    #[inline(always)]
    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    /// Encode one record's values in layout order and append it.
    pub fn append(&mut self, values: &[FieldValue]) -> Result<(), WriteError> {
        let bytes = encode_record(&self.layout, values).map_err(|source| WriteError::Encode {
            record_number: self.records_written + 1,
            source,
        })?;
        self.out.write_all(&bytes).map_err(WriteError::Io)?;
        self.records_written += 1;
        Ok(())
    }

    /// Flush and close the file, returning the number of records written.
    pub fn finish(mut self) -> std::io::Result<u64> {
        self.out.flush()?;
        Ok(self.records_written)
    }
}
