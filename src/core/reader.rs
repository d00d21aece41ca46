use crate::core::parser::FixedLengthFieldParser;
use crate::domain::model::Record;
use crate::utils::error::{FwfError, Result};
use std::io::BufRead;

/// Iterator over the records of a fixed-width input.
///
/// Lines are split on `\n`, stripped of their terminator and decoded with the
/// parser's encoding before being parsed. Records of skipped types are not
/// yielded.
#[derive(Debug)]
pub struct RecordReader<'p, R> {
    parser: &'p FixedLengthFieldParser,
    reader: R,
    buf: Vec<u8>,
    line_number: usize,
    skipped: usize,
    done: bool,
}

impl<'p, R: BufRead> RecordReader<'p, R> {
    pub fn new(parser: &'p FixedLengthFieldParser, reader: R) -> Self {
        Self {
            parser,
            reader,
            buf: Vec::new(),
            line_number: 0,
            skipped: 0,
            done: false,
        }
    }

    /// Number of lines read so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Lines dropped so far (blank lines or unknown record types).
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn read_line(&mut self) -> Option<std::io::Result<()>> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                self.line_number += 1;
                Some(Ok(()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<'_, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.read_line()? {
                Ok(()) => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(FwfError::IoError(e)));
                }
            }

            let options = self.parser.options();
            if options.skip_blank_lines && self.buf.is_empty() {
                self.skipped += 1;
                continue;
            }

            let line = self.line_number;
            let Some(text) = options.encoding.decode(&self.buf) else {
                return Some(Err(FwfError::Decode {
                    line,
                    encoding: options.encoding.to_string(),
                }));
            };

            match self.parser.parse_record(&text) {
                Ok(Some(mut record)) => {
                    record.line_number = Some(line);
                    return Some(Ok(record));
                }
                Ok(None) => {
                    tracing::debug!("Line {} skipped: unknown record type", line);
                    self.skipped += 1;
                }
                Err(source) => return Some(Err(FwfError::Parse { line, source })),
            }
        }
    }
}

impl FixedLengthFieldParser {
    pub fn records<R: BufRead>(&self, reader: R) -> RecordReader<'_, R> {
        RecordReader::new(self, reader)
    }

    /// Parses a whole in-memory file, stopping at the first error.
    pub fn parse_bytes(&self, data: &[u8]) -> Result<Vec<Record>> {
        self.records(data).collect()
    }
}
