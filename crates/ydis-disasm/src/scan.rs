//! Whole-stream scanning: walks addresses, skips zero padding, and feeds
//! every fetched instruction to a listing sink.

use std::io::{self, Cursor};

use log::debug;

use crate::{
    ByteSource, DecodedInstruction, Disassembler, ListingSink, TextListing, Y86Disassembler,
};

/// Scanner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Offset of the first byte to disassemble.
    pub start_offset: u64,
    /// Skip runs of zero bytes at the start and after every `halt`.
    pub skip_padding: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            start_offset: 0,
            skip_padding: true,
        }
    }
}

/// Counters collected over one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Valid instructions listed.
    pub instructions: usize,
    /// Invalid spans recovered.
    pub invalid_spans: usize,
    /// Bytes covered by invalid spans.
    pub invalid_bytes: u64,
    /// Zero bytes skipped as padding.
    pub padding_bytes: u64,
    /// Address the scan stopped at.
    pub end_address: u64,
}

/// Returns the address of the first non-zero byte at or after `address`,
/// or `len` if only zeros remain.
pub fn next_non_zero<S: ByteSource + ?Sized>(
    stream: &mut S,
    address: u64,
    len: u64,
) -> io::Result<u64> {
    let mut address = address;
    let mut byte = [0u8; 1];

    stream.seek_to(address)?;
    while address < len {
        if stream.read_bytes(&mut byte)? == 0 || byte[0] != 0 {
            break;
        }
        address += 1;
    }

    Ok(address)
}

/// Drives a disassembler over a byte source from start to end of stream.
#[derive(Debug, Clone)]
pub struct Scanner<D = Y86Disassembler> {
    disasm: D,
    config: ScanConfig,
}

impl Scanner<Y86Disassembler> {
    /// Creates a scanner with the Y86-64 decoder.
    pub fn new(config: ScanConfig) -> Self {
        Self::with_disassembler(Y86Disassembler::new(), config)
    }
}

impl<D: Disassembler> Scanner<D> {
    /// Creates a scanner around a specific decoder.
    pub fn with_disassembler(disasm: D, config: ScanConfig) -> Self {
        Self { disasm, config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scans `stream` to its end, writing every entry to `sink`.
    ///
    /// Invalid spans reach the sink from the fetch itself; valid
    /// instructions are rendered here once the fetch returns.
    pub fn run<S, K>(&self, stream: &mut S, sink: &mut K) -> io::Result<ScanSummary>
    where
        S: ByteSource + ?Sized,
        K: ListingSink + ?Sized,
    {
        let len = stream.total_len()?;
        let mut summary = ScanSummary::default();
        let mut address = self.config.start_offset;

        if self.config.skip_padding {
            address = self.skip_padding(stream, address, len, &mut summary)?;
        }

        while address < len {
            let decoded = self.disasm.fetch_and_report(stream, address, sink)?;
            match &decoded {
                DecodedInstruction::Valid(inst) => {
                    sink.instruction(inst, address)?;
                    summary.instructions += 1;
                }
                DecodedInstruction::Invalid(span) => {
                    summary.invalid_spans += 1;
                    summary.invalid_bytes += span.len() as u64;
                }
            }
            address += decoded.size() as u64;

            if decoded.is_halt() && self.config.skip_padding {
                address = self.skip_padding(stream, address, len, &mut summary)?;
            }
        }

        summary.end_address = address;
        debug!(
            "scan finished at {address:#x}: {} instructions, {} invalid spans",
            summary.instructions, summary.invalid_spans
        );
        Ok(summary)
    }

    /// Scans an in-memory buffer and returns the text listing.
    pub fn listing(&self, bytes: &[u8]) -> io::Result<String> {
        let mut sink = TextListing::new(Vec::new());
        self.run(&mut Cursor::new(bytes), &mut sink)?;
        String::from_utf8(sink.into_inner())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn skip_padding<S: ByteSource + ?Sized>(
        &self,
        stream: &mut S,
        address: u64,
        len: u64,
        summary: &mut ScanSummary,
    ) -> io::Result<u64> {
        let next = next_non_zero(stream, address, len)?;
        if next > address {
            debug!("skipped {} padding bytes at {address:#x}", next - address);
            summary.padding_bytes += next - address;
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(bytes: &[u8], config: ScanConfig) -> String {
        Scanner::new(config).listing(bytes).unwrap()
    }

    #[test]
    fn test_next_non_zero() {
        let mut stream = Cursor::new(vec![0u8, 0, 0, 0x10, 0]);
        assert_eq!(next_non_zero(&mut stream, 0, 5).unwrap(), 3);
        assert_eq!(next_non_zero(&mut stream, 3, 5).unwrap(), 3);
        assert_eq!(next_non_zero(&mut stream, 4, 5).unwrap(), 5);
        assert_eq!(next_non_zero(&mut stream, 9, 5).unwrap(), 9);
    }

    #[test]
    fn test_leading_padding_is_skipped() {
        let text = listing(&[0, 0, 0, 0x10, 0x90], ScanConfig::default());
        assert_eq!(
            text,
            "0000000000000003: 10                    nop     \n\
             0000000000000004: 90                    ret     \n"
        );
    }

    #[test]
    fn test_padding_after_halt_is_skipped() {
        let bytes = [0x00, 0x00, 0x00, 0x00, 0x10];
        let mut sink = TextListing::new(Vec::new());
        let summary = Scanner::new(ScanConfig {
            start_offset: 0,
            skip_padding: true,
        })
        .run(&mut Cursor::new(&bytes[..]), &mut sink)
        .unwrap();

        // The leading zeros are padding too, so only the nop is listed.
        assert_eq!(summary.instructions, 1);
        assert_eq!(summary.padding_bytes, 4);

        let bytes = [0x10, 0x00, 0x00, 0x00, 0x90];
        let text = listing(&bytes, ScanConfig::default());
        assert_eq!(
            text,
            "0000000000000000: 10                    nop     \n\
             0000000000000001: 00                    halt    \n\
             0000000000000004: 90                    ret     \n"
        );
    }

    #[test]
    fn test_without_padding_skip_every_zero_is_halt() {
        let config = ScanConfig {
            start_offset: 0,
            skip_padding: false,
        };
        let text = listing(&[0x00, 0x00], config);
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().all(|line| line.contains("halt")));
    }

    #[test]
    fn test_start_offset() {
        let config = ScanConfig {
            start_offset: 2,
            skip_padding: true,
        };
        let text = listing(&[0xFF, 0xFF, 0x90], config);
        assert_eq!(text, "0000000000000002: 90                    ret     \n");
    }

    #[test]
    fn test_scan_ends_exactly_at_end_of_stream() {
        let bytes = [0x10, 0xFF, 0x01, 0x02];
        let mut sink = TextListing::new(Vec::new());
        let summary = Scanner::new(ScanConfig::default())
            .run(&mut Cursor::new(&bytes[..]), &mut sink)
            .unwrap();
        assert_eq!(summary.end_address, 4);
        assert_eq!(summary.invalid_spans, 1);
        assert_eq!(summary.invalid_bytes, 3);

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text.lines().filter(|l| l.contains(".byte")).count(), 3);
    }

    #[test]
    fn test_start_past_end_lists_nothing() {
        let config = ScanConfig {
            start_offset: 100,
            skip_padding: true,
        };
        assert_eq!(listing(&[0x10], config), "");
    }
}
