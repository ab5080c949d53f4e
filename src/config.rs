//! Page configuration. Defaults reproduce the stock wall: 48 slabs, 8 columns,
//! 2.5 s dummy peek, 2 s cover animation.

use crate::error::ConfigError;
use crate::reveal::RevealMode;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct PageConfig {
    pub total_slabs: usize,
    pub columns: usize,
    /// Delay before a peeking dummy closes on its own (touch has no leave event).
    pub peek_ms: u32,
    pub animation_ms: u32,
    pub mode: RevealMode,
    /// Element the wall mounts into; created under `<body>` when missing.
    pub mount_id: String,
    pub seed: Option<u64>,
    pub debug: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            total_slabs: 48,
            columns: 8,
            peek_ms: 2_500,
            animation_ms: 2_000,
            mode: RevealMode::Flip,
            mount_id: "slab-root".to_string(),
            seed: None,
            debug: false,
        }
    }
}

impl PageConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_slabs == 0 {
            return Err(ConfigError::ZeroSlabs);
        }
        if self.columns == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        if self.peek_ms == 0 {
            return Err(ConfigError::ZeroPeek);
        }
        Ok(())
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: PageConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = PageConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.total_slabs, 48);
        assert_eq!(cfg.peek_ms, 2_500);
    }

    #[test]
    fn test_validate_rejects_zeroes() {
        let cfg = PageConfig {
            total_slabs: 0,
            ..PageConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroSlabs)));
        let cfg = PageConfig {
            columns: 0,
            ..PageConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroColumns)));
        let cfg = PageConfig {
            peek_ms: 0,
            ..PageConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroPeek)));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_from_json_partial_fields() {
        let cfg = PageConfig::from_json(r#"{"total_slabs": 24, "mode": "crumble", "seed": 7}"#)
            .unwrap();
        assert_eq!(cfg.total_slabs, 24);
        assert_eq!(cfg.mode, RevealMode::Crumble);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.columns, 8);
        assert_eq!(cfg.mount_id, "slab-root");
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(
            PageConfig::from_json(r#"{"peek_ms": 0}"#),
            Err(ConfigError::ZeroPeek)
        ));
        assert!(matches!(
            PageConfig::from_json(r#"{"slabs": 3}"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            PageConfig::from_json(r#"{"mode": "melt"}"#),
            Err(ConfigError::Json(_))
        ));
    }
}
