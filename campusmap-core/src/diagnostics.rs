//! Structural defects found while assembling topology.
//!
//! Diagnostics are never fatal. The offending element is skipped and the
//! diagnostic is returned alongside the output so callers can report it.

use std::fmt;

use crate::element::ElementRef;

/// A recoverable structural defect in the input topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A way references nodes that are not present in the input.
    MissingNodes {
        /// Offending way.
        way: ElementRef,
        /// Node identifiers that could not be resolved.
        missing: Vec<i64>,
    },
    /// A way closes into a ring that is degenerate or self-intersecting.
    InvalidRing {
        /// Offending way.
        way: ElementRef,
    },
    /// An outer member of a relation is missing or unusable.
    UnassemblableRelation {
        /// Relation that was skipped.
        relation: ElementRef,
        /// Outer member that could not be resolved.
        member: ElementRef,
    },
    /// A relation has no outer way members at all.
    NoOuterMembers {
        /// Relation that was skipped.
        relation: ElementRef,
    },
    /// The outer members of a relation never close into a ring.
    NoClosedOuterRing {
        /// Relation that was skipped.
        relation: ElementRef,
    },
    /// Some line fragments of a relation could not be joined into rings.
    UnclosedFragments {
        /// Relation whose fragments were left over.
        relation: ElementRef,
        /// Number of open chains discarded.
        chains: usize,
    },
    /// An inner member of a relation is missing or unusable; the hole is ignored.
    MissingInnerMember {
        /// Relation being assembled.
        relation: ElementRef,
        /// Inner member that could not be resolved.
        member: ElementRef,
    },
    /// Subtracting the holes of a relation left no area.
    EmptyAfterSubtraction {
        /// Relation that was dropped.
        relation: ElementRef,
    },
}

impl Diagnostic {
    /// Element the diagnostic is about.
    #[must_use]
    pub const fn subject(&self) -> ElementRef {
        match self {
            Self::MissingNodes { way, .. } | Self::InvalidRing { way } => *way,
            Self::UnassemblableRelation { relation, .. }
            | Self::NoOuterMembers { relation }
            | Self::NoClosedOuterRing { relation }
            | Self::UnclosedFragments { relation, .. }
            | Self::MissingInnerMember { relation, .. }
            | Self::EmptyAfterSubtraction { relation } => *relation,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingNodes { way, missing } => {
                write!(f, "{way} references {} missing node(s)", missing.len())
            }
            Self::InvalidRing { way } => write!(f, "{way} does not form a simple ring"),
            Self::UnassemblableRelation { relation, member } => {
                write!(f, "{relation} skipped: outer member {member} is unusable")
            }
            Self::NoOuterMembers { relation } => write!(f, "{relation} has no outer members"),
            Self::NoClosedOuterRing { relation } => {
                write!(f, "{relation} outer members do not close into a ring")
            }
            Self::UnclosedFragments { relation, chains } => {
                write!(f, "{relation} left {chains} open fragment chain(s)")
            }
            Self::MissingInnerMember { relation, member } => {
                write!(f, "{relation} ignores unusable inner member {member}")
            }
            Self::EmptyAfterSubtraction { relation } => {
                write!(f, "{relation} has no area once holes are removed")
            }
        }
    }
}
