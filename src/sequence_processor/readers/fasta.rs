use crate::error::{Result, StreamClusterError};
use crate::sequence_processor::core::Sequence;
use niffler::get_reader;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// A source of FASTA records that can be opened more than once. Every call to
/// `open` starts a new stream at the first record.
pub trait SequenceSource {
    type Reader: BufRead;

    fn open(&self) -> Result<FastaStream<Self::Reader>>;
}

/// FASTA file on disk, plain or compressed in any format niffler detects.
#[derive(Debug, Clone)]
pub struct FastaFile {
    path: PathBuf,
}

impl FastaFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SequenceSource for FastaFile {
    type Reader = BufReader<Box<dyn Read>>;

    fn open(&self) -> Result<FastaStream<Self::Reader>> {
        let file = File::open(&self.path)?;
        let (inner_reader, _compression) = get_reader(Box::new(file))?;
        Ok(FastaStream::new(BufReader::with_capacity(
            4 * 1024 * 1024,
            inner_reader,
        )))
    }
}

/// Forward-only FASTA record stream.
///
/// Holds one line of lookahead: the header of the following record is read while
/// collecting the body of the current one. Records are numbered from zero in the
/// order they are read. A sequence line before the first header is an
/// [`StreamClusterError::InvalidFormat`] error; after any error the stream is
/// fused and yields `None`.
pub struct FastaStream<R> {
    reader: R,
    line: Vec<u8>,
    line_number: usize,
    pending_header: Option<String>,
    next_index: usize,
    finished: bool,
}

impl<R: BufRead> FastaStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::with_capacity(256),
            line_number: 0,
            pending_header: None,
            next_index: 0,
            finished: false,
        }
    }

    /// Number of records yielded so far.
    pub fn records_read(&self) -> usize {
        self.next_index
    }

    // Loads the next non-blank line into `self.line` without its terminator.
    // Returns false at end of input.
    fn read_line(&mut self) -> Result<bool> {
        loop {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(false);
            }
            self.line_number += 1;
            while matches!(self.line.last(), Some(b'\n' | b'\r')) {
                self.line.pop();
            }
            if !self.line.iter().all(u8::is_ascii_whitespace) {
                return Ok(true);
            }
        }
    }

    fn is_header(&self) -> bool {
        self.line.first() == Some(&b'>')
    }

    fn header_id(&self) -> String {
        String::from_utf8_lossy(&self.line[1..]).trim().to_string()
    }

    fn read_record(&mut self) -> Result<Option<Sequence>> {
        let id = match self.pending_header.take() {
            Some(id) => id,
            None => {
                if !self.read_line()? {
                    return Ok(None);
                }
                if !self.is_header() {
                    return Err(StreamClusterError::InvalidFormat {
                        line: self.line_number,
                    });
                }
                self.header_id()
            }
        };

        let mut data = Vec::new();
        while self.read_line()? {
            if self.is_header() {
                self.pending_header = Some(self.header_id());
                break;
            }
            data.extend(self.line.iter().filter(|b| !b.is_ascii_whitespace()));
        }

        let sequence = Sequence {
            index: self.next_index,
            id,
            data,
        };
        self.next_index += 1;
        Ok(Some(sequence))
    }
}

impl<R: BufRead> Iterator for FastaStream<R> {
    type Item = Result<Sequence>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_record() {
            Ok(Some(sequence)) => Some(Ok(sequence)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
