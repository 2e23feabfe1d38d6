use crate::Error;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};

const UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];

/// Reads the rows of one csv file of the feed, one at a time
pub(crate) struct RecordReader<'a> {
    file_name: &'a str,
    reader: csv::Reader<BufReader<Box<dyn Read + 'a>>>,
    headers: HashMap<String, usize>,
    // Pre-allocated record, reused for each row
    buffer: csv::StringRecord,
    line: u64,
}

/// One row of a csv file, accessed by column name
pub(crate) struct Record<'r> {
    file_name: &'r str,
    headers: &'r HashMap<String, usize>,
    values: &'r csv::StringRecord,
    line: u64,
}

impl<'a> RecordReader<'a> {
    pub(crate) fn new(reader: Box<dyn Read + 'a>, file_name: &'a str) -> Result<Self, Error> {
        let mut reader = BufReader::new(reader);
        let has_bom = reader
            .fill_buf()
            .map_err(|e| Error::NamedFileIO {
                file_name: file_name.to_owned(),
                source: Box::new(e),
            })?
            .starts_with(&UTF8_BOM);
        if has_bom {
            reader.consume(UTF8_BOM.len());
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Fields)
            .from_reader(reader);
        let headers = reader
            .headers()
            .map_err(|e| Error::CSVError {
                file_name: file_name.to_owned(),
                line: 1,
                source: e,
            })?
            .iter()
            .enumerate()
            .map(|(i, h)| (h.to_owned(), i))
            .collect();

        Ok(Self {
            file_name,
            reader,
            headers,
            buffer: csv::StringRecord::new(),
            line: 1,
        })
    }

    /// The next row, `None` at the end of the file
    ///
    /// A malformed row (wrong number of columns, invalid UTF-8…) is always an error
    pub(crate) fn next_record(&mut self) -> Result<Option<Record<'_>>, Error> {
        let has_record = self
            .reader
            .read_record(&mut self.buffer)
            .map_err(|e| Error::CSVError {
                file_name: self.file_name.to_owned(),
                line: e.position().map_or(self.line + 1, |p| p.line()),
                source: e,
            })?;
        if !has_record {
            return Ok(None);
        }
        self.line = self
            .buffer
            .position()
            .map_or(self.line + 1, |p| p.line());

        Ok(Some(Record {
            file_name: self.file_name,
            headers: &self.headers,
            values: &self.buffer,
            line: self.line,
        }))
    }
}

impl<'r> Record<'r> {
    /// The trimmed value of a column, `None` if the column does not exist or if the value is empty
    pub(crate) fn get(&self, field: &str) -> Option<&'r str> {
        self.headers
            .get(field)
            .and_then(|i| self.values.get(*i))
            .filter(|v| !v.is_empty())
    }

    pub(crate) fn line(&self) -> u64 {
        self.line
    }

    pub(crate) fn file_name(&self) -> &'r str {
        self.file_name
    }
}

#[cfg(test)]
pub(crate) fn read_all(content: &str, mut f: impl FnMut(&Record)) -> Result<(), Error> {
    let mut reader = RecordReader::new(Box::new(content.as_bytes()), "test.txt")?;
    while let Some(record) = reader.next_record()? {
        f(&record);
    }
    Ok(())
}
