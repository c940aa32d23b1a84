//! Capability interface to the XEM7305 micro-motion detector.
//!
//! The FPGA design exposes four wire-out status registers (photon
//! count at 0x20, time-difference count at 0x21, TTL period at 0x22,
//! FIFO read count at 0x23) and a pipeout endpoint at 0xA0 carrying
//! one byte per measured time difference. Bit-file programming and
//! the FrontPanel register primitives stay behind this trait; the
//! prober and the acquisition loop only depend on the operations
//! below.

use mmdtools::error::DetectorError;

/// One readback of the four status registers, from a single wire-out
/// update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeSample {
    pub photon_count: u32,
    pub tdiff_count: u32,
    pub ttl_period: u32,
    pub fifo_ready_count: u32,
}

pub trait DetectorPort {
    /// Pulse the FIFO and counter resets, then release them so the
    /// circuits restart.
    fn reset(&mut self) -> Result<(), DetectorError>;

    /// Read the four status registers in one wire-out update.
    fn probe(&mut self) -> Result<ProbeSample, DetectorError>;

    /// Number of words ready to pipe out of the FIFO.
    fn fifo_ready_count(&mut self) -> Result<u32, DetectorError>;

    /// Pipe out `len_words` bus words, returning `4 * len_words`
    /// bytes. A zero-length read is valid and returns an empty buffer.
    fn read_words(&mut self, len_words: u32) -> Result<Vec<u8>, DetectorError>;
}

/// Open the first attached detector. Device enumeration goes through
/// the vendor FrontPanel runtime, which the deployment links in; this
/// build carries no backend, so there is never a device to open.
pub fn open_first() -> Result<Box<dyn DetectorPort + Send>, DetectorError> {
    Err(DetectorError::DeviceIo(
        "no Opal Kelly FPGA device".to_string(),
    ))
}
