//! Block-by-block signature matching against a seekable reader.

use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::block::DataBlock;
use crate::signature::Signature;

/// Tests signatures against one open file.
///
/// The reader's cursor is moved freely while matching; callers must not rely
/// on its position afterwards.
pub struct SignatureMatcher<R> {
    reader: R,
    file_len: u64,
    buffer: Vec<u8>,
}

impl<R: Read + Seek> SignatureMatcher<R> {
    pub fn new(mut reader: R) -> io::Result<Self> {
        let file_len = reader.seek(SeekFrom::End(0))?;
        reader.rewind()?;

        Ok(Self {
            reader,
            file_len,
            buffer: Vec::new(),
        })
    }

    pub fn file_len(&self) -> u64 {
        self.file_len
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Return the first signature, in iteration order, whose blocks all match.
    ///
    /// An I/O error while testing a signature is logged and counts as a
    /// mismatch for that signature only.
    pub fn find<'s, I>(&mut self, signatures: I) -> Option<&'s Arc<Signature>>
    where
        I: IntoIterator<Item = &'s Arc<Signature>>,
    {
        signatures
            .into_iter()
            .find(|signature| match self.matches(signature) {
                Ok(matched) => matched,
                Err(e) => {
                    warn!(
                        "I/O error while testing {} signature: {}",
                        signature.name(),
                        e
                    );
                    false
                }
            })
    }

    /// Test a single signature.
    pub fn matches(&mut self, signature: &Signature) -> io::Result<bool> {
        debug!("Inspecting file using {} signature", signature.name());

        if signature.total_block_size() as u64 > self.file_len {
            debug!(
                "Signature blocks for {} ({} bytes) exceed file size ({} bytes)",
                signature.name(),
                signature.total_block_size(),
                self.file_len
            );
            return Ok(false);
        }

        self.reader.rewind()?;
        for block in signature.blocks() {
            if !self.block_matches(block)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn block_matches(&mut self, block: &DataBlock) -> io::Result<bool> {
        let current = self.reader.stream_position()?;

        let offset = match block.resolve_offset(current, self.file_len) {
            Some(offset) if offset < self.file_len => offset,
            _ => {
                warn!(
                    "{} data block would fall outside the file size boundary at offset {} of seek {}",
                    block.name(),
                    block.offset(),
                    block.seek()
                );
                return Ok(false);
            }
        };

        self.reader.seek(SeekFrom::Start(offset))?;
        self.buffer.resize(block.size(), 0);
        let read = read_up_to(&mut self.reader, &mut self.buffer)?;

        if read != block.size() {
            warn!(
                "{} data block size ({}) did not match actual read bytes ({}) at offset {}",
                block.name(),
                block.size(),
                read,
                offset
            );
            return Ok(false);
        }

        Ok(block.pattern().matches(&self.buffer))
    }
}

/// Fill `buf` as far as the reader allows, returning the number of bytes read.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
