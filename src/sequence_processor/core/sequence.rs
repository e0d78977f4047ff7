/// One FASTA record, numbered by its position in the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub index: usize,
    pub id: String,
    pub data: Vec<u8>,
}

impl Sequence {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
