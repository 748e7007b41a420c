use crate::domain::schedule::ScheduleMutationRequest;
use crate::error::{CatalogError, Result};
use std::io::Read;

/// Reads schedule mutation rows (`weekDay, openingTime, closingTime, operation`)
/// from a CSV source.
///
/// Whitespace around fields is trimmed and short rows are accepted; an empty
/// or missing time column reads as "not given".
pub struct MutationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> MutationReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes one request per row. Rows are not validated here;
    /// see `ScheduleMutation::try_from`.
    pub fn requests(self) -> impl Iterator<Item = Result<ScheduleMutationRequest>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(CatalogError::from))
    }
}
