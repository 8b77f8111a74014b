//! Decoder configuration.

use serde::{Deserialize, Serialize};

/// How decoded doubles (class 8) are post-processed.
///
/// Some decoders for this format add a tiny fixed epsilon to every double
/// they read. The reference behaviour is to leave the value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FloatPolicy {
    /// Return the decoded value unchanged.
    #[default]
    Exact,
    /// Add [`FloatPolicy::EPSILON`] to every decoded value.
    Nudge,
}

impl FloatPolicy {
    /// `1 / 2^32`.
    pub const EPSILON: f64 = 1.0 / 4_294_967_296.0;

    /// Post-process one decoded double.
    pub fn apply(self, value: f64) -> f64 {
        match self {
            FloatPolicy::Exact => value,
            FloatPolicy::Nudge => value + Self::EPSILON,
        }
    }
}

/// Options accepted by [`crate::SbArchive::parse_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParseOptions {
    /// Applied to every class-8 double.
    pub float_policy: FloatPolicy,
}

impl ParseOptions {
    /// Replace the float policy.
    pub fn with_float_policy(mut self, policy: FloatPolicy) -> Self {
        self.float_policy = policy;
        self
    }
}
