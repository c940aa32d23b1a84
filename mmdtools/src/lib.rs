pub mod cfg;
pub mod error;
pub mod hist;
pub mod pipe;
pub mod stop;

/// Minimum pipeout transfer size of the FrontPanel USB 3.0 API, in bytes.
pub const MIN_PIPEOUT_LEN_BYTES: u32 = 16;

/// Width of the FIFO read bus, in bytes. One byte per time difference.
pub const PIPEOUT_BUS_WIDTH_BYTES: u32 = 4;

/// Minimum pipeout length in bus words.
pub const MIN_PIPEOUT_LEN_WORDS: u32 = MIN_PIPEOUT_LEN_BYTES / PIPEOUT_BUS_WIDTH_BYTES;

/// Number of status reads the prober attempts before giving up.
pub const N_MAX_PROBE: u32 = 20;

/// Photons per update interval at which a non-growing FIFO read count
/// means the 131072-deep write FIFO filled up within one interval,
/// rather than the detector sitting idle.
pub const FIFO_OVERFLOW_GUARD: i64 = 130_000;

/// Sampling clock period of the detector, in nanoseconds.
pub const SAMPLING_PERIOD_NS: f64 = 2.173913;

/// Fallback bin count: 21.5 MHz drive, one trigger TTL per 5 sine
/// waves, 2.17 ns sampling clock.
pub const SIZE_BINS_DEFAULT: u32 = 107;

/// Fallback pipeout length in words.
pub const PIPEOUT_LEN_DEFAULT: u32 = 1024;
