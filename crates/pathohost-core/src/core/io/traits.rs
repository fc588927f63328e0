use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for line-oriented text formats read by the pipeline.
///
/// Readers are configured values (`&self`) so that format quirks, such as the
/// rank-matching rule of the score table, travel with the reader instead of
/// being global.
pub trait TextRecordFile {
    /// The parsed representation of the file.
    type Output;

    /// The error type for I/O and parse failures.
    type Error: Error + From<io::Error>;

    /// Reads the records from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader fails or the format treats a record as fatal.
    fn read_from(&self, reader: &mut impl BufRead) -> Result<Self::Output, Self::Error>;

    /// Reads the records from an in-memory string.
    fn read_from_str(&self, text: &str) -> Result<Self::Output, Self::Error> {
        let mut bytes = text.as_bytes();
        self.read_from(&mut bytes)
    }

    /// Reads the records from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(&self, path: P) -> Result<Self::Output, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        self.read_from(&mut reader)
    }
}
