//! Seekable byte sources the decoder reads from.

use std::io::{self, ErrorKind, Read, Seek, SeekFrom};

/// A seekable, length-aware source of raw machine code.
///
/// Implemented for every `Read + Seek`, so files and in-memory cursors
/// work directly.
pub trait ByteSource {
    /// Reads up to `buf.len()` bytes from the current position.
    ///
    /// Returns fewer bytes only at end of stream.
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Moves the read position to an absolute offset.
    fn seek_to(&mut self, offset: u64) -> io::Result<()>;

    /// Returns the total length of the source in bytes.
    fn total_len(&mut self) -> io::Result<u64>;
}

impl<T: Read + Seek + ?Sized> ByteSource for T {
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.seek(SeekFrom::Start(offset)).map(|_| ())
    }

    fn total_len(&mut self) -> io::Result<u64> {
        let pos = self.stream_position()?;
        let len = self.seek(SeekFrom::End(0))?;
        self.seek(SeekFrom::Start(pos))?;
        Ok(len)
    }
}
