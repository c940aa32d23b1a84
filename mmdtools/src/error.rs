use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DetectorError {
    #[error("no RF trigger TTL or PMT signals")]
    NoSignalDetected,
    #[error("too many photons arriving in an update interval; try a shorter interval")]
    TooManyPhotons,
    #[error("histogram delta has {got} bins; expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("detector I/O failed: {0}")]
    DeviceIo(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read run config: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse run config: {0}")]
    Parse(#[from] toml::de::Error),
}
