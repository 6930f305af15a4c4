use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire format a value is encoded in.
///
/// The legacy format is canonical for heights before the upgrade, the modern
/// format from the upgrade height onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Format {
    Legacy,
    Modern,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Legacy => "legacy",
            Format::Modern => "modern",
        }
    }

    /// Format that is canonical given the result of an upgrade check.
    pub fn for_upgrade(after_upgrade: bool) -> Self {
        if after_upgrade {
            Format::Modern
        } else {
            Format::Legacy
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats a type declares it can be encoded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capabilities {
    /// Only the pre-upgrade format. Such types cannot be written after the upgrade.
    LegacyOnly,
    /// Only the post-upgrade format.
    ModernOnly,
    /// Both formats; which one is used depends on height.
    Both,
}

impl Capabilities {
    pub fn supports(&self, format: Format) -> bool {
        matches!(
            (self, format),
            (Capabilities::Both, _)
                | (Capabilities::LegacyOnly, Format::Legacy)
                | (Capabilities::ModernOnly, Format::Modern)
        )
    }

    pub fn has_modern(&self) -> bool {
        self.supports(Format::Modern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_support() {
        assert!(Capabilities::Both.supports(Format::Legacy));
        assert!(Capabilities::Both.supports(Format::Modern));
        assert!(Capabilities::LegacyOnly.supports(Format::Legacy));
        assert!(!Capabilities::LegacyOnly.supports(Format::Modern));
        assert!(!Capabilities::ModernOnly.supports(Format::Legacy));
        assert!(Capabilities::ModernOnly.has_modern());
    }

    #[test]
    fn test_format_for_upgrade() {
        assert_eq!(Format::for_upgrade(true), Format::Modern);
        assert_eq!(Format::for_upgrade(false), Format::Legacy);
        assert_eq!(Format::Modern.to_string(), "modern");
    }
}
