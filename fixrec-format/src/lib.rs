//! Herein lies the machinery for fixed-size binary record files: a
//! headerless concatenation of records whose layout is declared
//! out-of-band.
//!
//! Use [RecordFileReader][RecordFileReader] to scan files and
//! [RecordFileWriter][RecordFileWriter] to produce them. Reading decodes
//! each record, validates it against a [RuleSet][RuleSet], and aggregates
//! records, statistics and errors into a [ReadResult][ReadResult] under a
//! selectable [ErrorPolicy][ErrorPolicy].

mod encode;
mod file;
pub mod integrity;
mod layout;
pub mod meta;
mod parse;
mod policy;
mod process;
mod record;
mod report;
mod rules;
mod text;
mod validate;

pub use encode::{encode_record, EncodeError};
pub use file::{ReadError, RecordFileReader, RecordFileWriter, WriteError};
pub use integrity::IntegrityReport;
pub use layout::{Endianness, FieldKind, FieldSpec, LayoutError, RecordLayout};
pub use meta::{load_description, parse_description, DescriptionError};
pub use parse::{parse_record, UnpackError};
pub use policy::{Action, ErrorPolicy};
pub use record::{FieldValue, Record};
pub use report::{ErrorEntry, ErrorKind, ReadResult, RecordError};
pub use rules::RuleSet;
pub use text::{TextDecoder, TextEncoding};
pub use validate::Validator;
