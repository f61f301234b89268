pub mod reader;
pub mod writer;

pub use self::reader::{ReadError, RecordFileReader};
pub use self::writer::{RecordFileWriter, WriteError};
