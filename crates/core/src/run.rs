// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! Run identifiers: `"{subdomain}_{unix_ts}_{random6}"`.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::clock::Clock;

/// Identifies one logical pipeline execution for a site.
///
/// Generated once at the entry `enqueue` call and propagated to every
/// child job and log record. Human-readable and lexically sortable within
/// a subdomain (the timestamp segment is zero-padded... actually unix
/// seconds are already monotonically comparable as decimal strings of
/// equal length for the foreseeable future, so no padding is needed).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(SmolStr);

impl RunId {
    /// Generate a new run id for `subdomain` using `clock` for the epoch
    /// seconds segment and a 6-character random suffix.
    pub fn new(subdomain: &str, clock: &impl Clock) -> Self {
        let ts = clock.epoch_ms() / 1000;
        let suffix = nanoid::nanoid!(6, &nanoid::alphabet::SAFE[2..]);
        Self(SmolStr::new(format!("{subdomain}_{ts}_{suffix}")))
    }

    pub fn from_string(s: impl Into<SmolStr>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Subdomain segment this run belongs to, parsed back out of the id.
    pub fn subdomain(&self) -> &str {
        self.0.rsplit_once('_').and_then(|(rest, _)| rest.rsplit_once('_')).map(|(sub, _)| sub).unwrap_or(&self.0)
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        Self(SmolStr::new(s))
    }
}
