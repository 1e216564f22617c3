use serde::{Deserialize, Serialize};

const fn default_max_samples() -> u32 {
    1000
}

const fn default_max_records() -> u32 {
    1000
}

/// Limits applied to the counts a datagram declares, checked before anything
/// is allocated for them.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DecoderConfig {
    /// Maximum number of samples in one datagram.
    #[serde(default = "default_max_samples")]
    pub max_samples: u32,

    /// Maximum number of records in one sample.
    #[serde(default = "default_max_records")]
    pub max_records: u32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            max_samples: default_max_samples(),
            max_records: default_max_records(),
        }
    }
}
