//! Build constants with validated setters.
//!
//! The defaults are tuned to the campus the tool was written for. The
//! simplification tolerance and the overlap threshold and buffer are the
//! knobs most likely to need retuning elsewhere.

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::classify::CategoryOverrides;
use crate::geometry::LocalProjection;
use crate::zone::ZoneResolver;

/// Default simplification tolerance in metres.
pub const DEFAULT_SIMPLIFY_TOLERANCE_M: f64 = 0.4;
/// Default minimum area for features without a real name.
pub const DEFAULT_MIN_AREA_UNNAMED_M2: f64 = 80.0;
/// Default minimum area for excluded building subtypes.
pub const DEFAULT_MIN_AREA_EXCLUDED_M2: f64 = 120.0;
/// Building subtypes dropped below the excluded-subtype area.
pub const DEFAULT_EXCLUDED_BUILDING_TYPES: [&str; 6] =
    ["hut", "shed", "garage", "kiosk", "tent", "container"];
/// Names that are always dropped, matched case-insensitively.
pub const DEFAULT_NAME_BLACKLIST: [&str; 2] = [r"\bAxiom Apartments\b", r"\bMurdock Plaza\b"];
/// Default share of a child's area that must fall inside its parent.
pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 0.6;
/// Default outward buffer used when a child does not touch a candidate.
pub const DEFAULT_OVERLAP_BUFFER_M: f64 = 0.25;
/// Default minimum area for a feature to be considered as a child.
pub const DEFAULT_MIN_CHILD_AREA_M2: f64 = 1.0;

/// Errors raised while validating a [`BuildConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A blacklist pattern failed to compile.
    #[error("invalid name blacklist pattern {pattern:?}")]
    InvalidBlacklistPattern {
        /// Offending pattern.
        pattern: String,
        /// Compilation failure.
        #[source]
        source: regex::Error,
    },
    /// A length or area was zero, negative or not finite.
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive {
        /// Name of the setting.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A length or area was negative or not finite.
    #[error("{field} must be a non-negative finite number, got {value}")]
    Negative {
        /// Name of the setting.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// The overlap threshold was outside `(0, 1]`.
    #[error("overlap threshold must lie in (0, 1], got {value}")]
    ThresholdOutOfRange {
        /// Rejected value.
        value: f64,
    },
}

fn require_positive(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

/// Case-insensitive name patterns for features that must never be emitted.
///
/// # Examples
/// ```
/// use campusmap_core::NameBlacklist;
///
/// let blacklist = NameBlacklist::default();
/// assert!(blacklist.is_blocked("axiom apartments"));
/// assert!(!blacklist.is_blocked("Axiomatic Hall"));
/// assert!(NameBlacklist::new(["("]).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct NameBlacklist {
    patterns: Vec<Regex>,
}

impl NameBlacklist {
    /// Compile `patterns` case-insensitively.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBlacklistPattern`] for the first pattern
    /// that fails to compile.
    pub fn new<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let compiled = patterns
            .into_iter()
            .map(|pattern| compile(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns: compiled })
    }

    /// Whether `name` matches any pattern.
    #[must_use]
    pub fn is_blocked(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(name))
    }

    /// Source text of each pattern.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ConfigError::InvalidBlacklistPattern {
            pattern: pattern.to_owned(),
            source,
        })
}

impl Default for NameBlacklist {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_NAME_BLACKLIST
                .iter()
                .filter_map(|pattern| compile(pattern).ok())
                .collect(),
        }
    }
}

impl PartialEq for NameBlacklist {
    fn eq(&self, other: &Self) -> bool {
        self.patterns().eq(other.patterns())
    }
}

/// Parameters of parent/child overlap detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapConfig {
    /// Minimum share of a child's area that must fall inside the parent shell.
    pub threshold: f64,
    /// Outward buffer, in metres, applied to a child that touches nothing.
    pub buffer_m: f64,
    /// Children smaller than this area, in square metres, are not nested.
    pub min_child_area_m2: f64,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_OVERLAP_THRESHOLD,
            buffer_m: DEFAULT_OVERLAP_BUFFER_M,
            min_child_area_m2: DEFAULT_MIN_CHILD_AREA_M2,
        }
    }
}

/// Every constant consulted by [`crate::build_features`].
///
/// # Examples
/// ```
/// use campusmap_core::BuildConfig;
///
/// # fn main() -> Result<(), campusmap_core::ConfigError> {
/// let config = BuildConfig::default()
///     .with_simplify_tolerance(0.5)?
///     .with_overlap_threshold(0.75)?;
/// assert_eq!(config.overlap.threshold, 0.75);
/// assert!(BuildConfig::default().with_overlap_threshold(1.5).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    /// Simplification tolerance in metres.
    pub simplify_tolerance_m: f64,
    /// Features with a placeholder name below this area are dropped.
    pub min_area_unnamed_m2: f64,
    /// Excluded building subtypes below this area are dropped.
    pub min_area_excluded_m2: f64,
    /// Lowercase `building` values subject to the excluded-subtype gate.
    pub excluded_building_types: BTreeSet<String>,
    /// Names that are always dropped.
    pub name_blacklist: NameBlacklist,
    /// Parent/child detection parameters.
    pub overlap: OverlapConfig,
    /// Projection used for every metric computation.
    pub projection: LocalProjection,
    /// Zone table.
    pub zones: ZoneResolver,
    /// Manual category assignments.
    pub overrides: CategoryOverrides,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            simplify_tolerance_m: DEFAULT_SIMPLIFY_TOLERANCE_M,
            min_area_unnamed_m2: DEFAULT_MIN_AREA_UNNAMED_M2,
            min_area_excluded_m2: DEFAULT_MIN_AREA_EXCLUDED_M2,
            excluded_building_types: DEFAULT_EXCLUDED_BUILDING_TYPES
                .iter()
                .map(|kind| (*kind).to_owned())
                .collect(),
            name_blacklist: NameBlacklist::default(),
            overlap: OverlapConfig::default(),
            projection: LocalProjection::default(),
            zones: ZoneResolver::default(),
            overrides: CategoryOverrides::default(),
        }
    }
}

impl BuildConfig {
    /// Check every numeric setting.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("simplify_tolerance_m", self.simplify_tolerance_m)?;
        require_non_negative("min_area_unnamed_m2", self.min_area_unnamed_m2)?;
        require_non_negative("min_area_excluded_m2", self.min_area_excluded_m2)?;
        require_threshold(self.overlap.threshold)?;
        require_non_negative("overlap.buffer_m", self.overlap.buffer_m)?;
        require_non_negative("overlap.min_child_area_m2", self.overlap.min_child_area_m2)?;
        Ok(())
    }

    /// Set the simplification tolerance.
    ///
    /// # Errors
    /// Returns [`ConfigError::NotPositive`] unless `metres` is positive.
    pub fn with_simplify_tolerance(mut self, metres: f64) -> Result<Self, ConfigError> {
        self.simplify_tolerance_m = require_positive("simplify_tolerance_m", metres)?;
        Ok(self)
    }

    /// Set the overlap threshold.
    ///
    /// # Errors
    /// Returns [`ConfigError::ThresholdOutOfRange`] outside `(0, 1]`.
    pub fn with_overlap_threshold(mut self, threshold: f64) -> Result<Self, ConfigError> {
        self.overlap.threshold = require_threshold(threshold)?;
        Ok(self)
    }

    /// Set the overlap retry buffer.
    ///
    /// # Errors
    /// Returns [`ConfigError::Negative`] for negative or non-finite input.
    pub fn with_overlap_buffer(mut self, metres: f64) -> Result<Self, ConfigError> {
        self.overlap.buffer_m = require_non_negative("overlap.buffer_m", metres)?;
        Ok(self)
    }

    /// Replace the name blacklist.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBlacklistPattern`] if a pattern is invalid.
    pub fn with_name_blacklist<I, S>(mut self, patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.name_blacklist = NameBlacklist::new(patterns)?;
        Ok(self)
    }

    /// Replace the manual category overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: CategoryOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

fn require_threshold(value: f64) -> Result<f64, ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(ConfigError::ThresholdOutOfRange { value })
    }
}
