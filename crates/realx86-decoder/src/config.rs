/// Default operand/address size of the code being decoded (the code segment's D bit).
///
/// Real-mode DOS code is [`CodeWidth::Bits16`]; `66`/`67` prefixes toggle relative to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CodeWidth {
    #[default]
    Bits16,
    Bits32,
}

/// Decoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecoderConfig {
    pub default_width: CodeWidth,
    /// Accept the host callback extension `FE 38 ib`. When disabled, `FE /7` is an invalid
    /// group index like on real hardware.
    pub host_callbacks: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::real_mode()
    }
}

impl DecoderConfig {
    /// 16-bit code with host callbacks enabled.
    #[must_use]
    pub const fn real_mode() -> Self {
        Self {
            default_width: CodeWidth::Bits16,
            host_callbacks: true,
        }
    }

    #[must_use]
    pub const fn with_default_width(mut self, default_width: CodeWidth) -> Self {
        self.default_width = default_width;
        self
    }

    #[must_use]
    pub const fn with_host_callbacks(mut self, enabled: bool) -> Self {
        self.host_callbacks = enabled;
        self
    }
}
