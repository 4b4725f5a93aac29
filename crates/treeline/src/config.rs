//! Configuration types for diagram rendering.
//!
//! This module provides the structures that control how tree diagrams are
//! laid out and which sections are emitted. All types implement
//! [`serde::Deserialize`] for loading from external sources.
//!
//! # Overview
//!
//! - [`RenderConfig`] - Top-level rendering configuration.
//! - [`Sections`] - Independent enable/disable switches per diagram section.
//!
//! # Example
//!
//! ```
//! # use treeline::config::RenderConfig;
//! let config = RenderConfig::default();
//! assert!(config.max_line_length().is_none());
//! assert!(config.sections().module);
//! ```

use serde::Deserialize;

/// Top-level rendering configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderConfig {
    /// Maximum rendered line length in characters. `None` disables
    /// wrapping. Overlong content still renders past the limit when no
    /// split point remains.
    #[serde(default)]
    max_line_length: Option<usize>,

    /// Which diagram sections to emit.
    #[serde(default)]
    sections: Sections,

    /// Recognized but not enforced: sections exceeding this many emitted
    /// linebreaks are reported through the log, never truncated.
    #[serde(default)]
    max_line_breaks: Option<u32>,
}

impl RenderConfig {
    /// Creates a configuration with the given line length and sections.
    pub fn new(max_line_length: Option<usize>, sections: Sections) -> Self {
        Self {
            max_line_length,
            sections,
            max_line_breaks: None,
        }
    }

    /// Returns the configured maximum line length, if any.
    pub fn max_line_length(&self) -> Option<usize> {
        self.max_line_length
    }

    /// Returns the section switches.
    pub fn sections(&self) -> Sections {
        self.sections
    }

    /// Returns the advisory per-section linebreak limit, if any.
    pub fn max_line_breaks(&self) -> Option<u32> {
        self.max_line_breaks
    }

    /// Sets the maximum line length.
    pub fn set_max_line_length(&mut self, max_line_length: Option<usize>) {
        self.max_line_length = max_line_length;
    }

    /// Sets the section switches.
    pub fn set_sections(&mut self, sections: Sections) {
        self.sections = sections;
    }

    /// Sets the advisory per-section linebreak limit.
    pub fn set_max_line_breaks(&mut self, max_line_breaks: Option<u32>) {
        self.max_line_breaks = max_line_breaks;
    }
}

/// Independent enable switches for the diagram sections.
///
/// All sections are enabled by default.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Sections {
    #[serde(default = "enabled")]
    pub module: bool,
    #[serde(default = "enabled")]
    pub augment: bool,
    #[serde(default = "enabled")]
    pub rpcs: bool,
    #[serde(default = "enabled")]
    pub notifications: bool,
    #[serde(default = "enabled")]
    pub grouping: bool,
    #[serde(default = "enabled")]
    pub yang_data: bool,
}

fn enabled() -> bool {
    true
}

impl Default for Sections {
    fn default() -> Self {
        Self::all()
    }
}

impl Sections {
    /// All sections enabled.
    pub fn all() -> Self {
        Sections {
            module: true,
            augment: true,
            rpcs: true,
            notifications: true,
            grouping: true,
            yang_data: true,
        }
    }

    /// All sections disabled.
    pub fn none() -> Self {
        Sections {
            module: false,
            augment: false,
            rpcs: false,
            notifications: false,
            grouping: false,
            yang_data: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_everything() {
        let config = RenderConfig::default();
        let sections = config.sections();
        assert!(sections.module);
        assert!(sections.augment);
        assert!(sections.rpcs);
        assert!(sections.notifications);
        assert!(sections.grouping);
        assert!(sections.yang_data);
        assert!(config.max_line_length().is_none());
        assert!(config.max_line_breaks().is_none());
    }

    #[test]
    fn test_none_disables_everything() {
        let sections = Sections::none();
        assert!(!sections.module);
        assert!(!sections.yang_data);
    }
}
