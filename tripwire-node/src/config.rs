//! Node configuration
//!
//! Set once at startup and handed to [`SerialLink`](crate::SerialLink).

use tripwire_hal::SerialConfig;
use tripwire_protocol::SourceId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-node link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeConfig {
    /// Identity stamped on every outbound line
    pub source_id: SourceId,
    /// Report receive buffer overflows as errors
    ///
    /// When false, an overflow is only logged and counted, matching nodes
    /// that silently drop over-long lines. Recovery is the same either way.
    pub strict_overflow: bool,
    /// Serial line settings, applied by
    /// [`SerialLink::apply_serial_config`](crate::SerialLink::apply_serial_config)
    pub serial: SerialConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            source_id: SourceId::default(),
            strict_overflow: true,
            serial: SerialConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Default configuration for the given node id
    pub fn new(source_id: SourceId) -> Self {
        Self {
            source_id,
            ..Self::default()
        }
    }

    /// Set overflow reporting
    pub fn with_strict_overflow(mut self, strict: bool) -> Self {
        self.strict_overflow = strict;
        self
    }

    /// Set serial line settings
    pub fn with_serial(mut self, serial: SerialConfig) -> Self {
        self.serial = serial;
        self
    }
}
