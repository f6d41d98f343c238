//! Stream validation services and the probes they rely on

pub mod stream_prober;
pub mod stream_validator;
pub mod throughput_probe;

pub use stream_prober::{ResolutionProbe, StreamProber};
pub use stream_validator::{StreamValidator, ValidationSettings};
pub use throughput_probe::{HttpThroughputProbe, ThroughputProbe};
