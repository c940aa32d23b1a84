//! Pipeout length arithmetic.

use crate::{MIN_PIPEOUT_LEN_WORDS, PIPEOUT_BUS_WIDTH_BYTES};

/// Round a FIFO read count down to the pipeout alignment.
///
/// The FrontPanel USB 3.0 API transfers multiples of 16 bytes; with
/// the 4-byte read bus that is 4 words. The photon arrival rate
/// changes, so this is recomputed from the FIFO count on every update.
pub fn aligned_len_words(fifo_ready: u32) -> u32 {
    (fifo_ready / MIN_PIPEOUT_LEN_WORDS) * MIN_PIPEOUT_LEN_WORDS
}

/// Transfer size in bytes for an aligned word count.
pub fn len_bytes(len_words: u32) -> usize {
    (len_words * PIPEOUT_BUS_WIDTH_BYTES) as usize
}
