// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Configuration and utilities

#[cfg(test)]
mod tests;

/// Decoding parameters
///
/// Parameters define how conditions that do not follow from a well-formed
/// capture are handled by the [`Tracer`][crate::tracer::Tracer] and the
/// [`pipeline`][crate::pipeline]. They do not affect the wire format itself,
/// which is fixed by the probe.
///
/// With the `serde` feature, parameters may be read from e.g. a TOML file.
/// Missing keys assume their default values.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct Parameters {
    /// Handling of tokens whose header declares an impossible encoding
    pub malformed_token: Policy,
    /// Handling of completions without a matching open issue
    pub orphan_completion: Policy,
}

/// See [PARAMETERS] for default values of individual fields
impl Default for Parameters {
    fn default() -> Self {
        PARAMETERS
    }
}

/// Default [Parameters]
pub const PARAMETERS: Parameters = Parameters {
    malformed_token: Policy::Abort,
    orphan_completion: Policy::Report,
};

/// Policy for a recoverable protocol condition
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Policy {
    /// Treat the condition as an error and stop processing
    Abort,
    /// Report the condition and continue with the next token
    Report,
}

impl Policy {
    /// Determine whether this policy aborts processing
    pub const fn is_abort(self) -> bool {
        matches!(self, Self::Abort)
    }
}
