// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Static reference data: the repeatable-activity catalog and the
//! account-wide activity table.
//!
//! The engine never decides which activities exist -- both tables are
//! supplied whole by the caller (as JSON from the frontend bundle) and are
//! read-only thereafter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{Gold, DAYS_PER_CYCLE};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("catalog entry {0:?} has no stages")]
    EmptyStages(String),
}

// ---------------------------------------------------------------------------
// Raid catalog
// ---------------------------------------------------------------------------

/// One completable stage ("gate") of an activity instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaidStage {
    /// Base reward for clearing this stage.
    pub gold: Gold,
    /// Amount subtracted from the base reward when the surcharge is elected.
    pub surcharge: Gold,
}

/// A named, leveled activity instance with one or more ordered stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaidEntry {
    pub name: String,
    /// Minimum character item level for this instance.
    pub required_level: f64,
    pub stages: Vec<RaidStage>,
}

impl RaidEntry {
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

/// The full table of repeatable-activity definitions, keyed by instance name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaidCatalog {
    entries: BTreeMap<String, RaidEntry>,
}

impl RaidCatalog {
    pub fn new(entries: impl IntoIterator<Item = RaidEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| (e.name.clone(), e))
                .collect(),
        }
    }

    /// Parse a catalog supplied as a JSON array of entries.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<RaidEntry> = serde_json::from_str(json)?;
        for entry in &entries {
            if entry.stages.is_empty() {
                return Err(CatalogError::EmptyStages(entry.name.clone()));
            }
        }
        Ok(Self::new(entries))
    }

    pub fn lookup(&self, name: &str) -> Option<&RaidEntry> {
        self.entries.get(name)
    }

    /// Instances the given item level qualifies for.
    pub fn eligible_for(&self, item_level: f64) -> impl Iterator<Item = &RaidEntry> {
        self.entries
            .values()
            .filter(move |e| item_level >= e.required_level)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Account-wide activity table
// ---------------------------------------------------------------------------

/// An account-wide (cross-character) activity with day-of-week availability
/// and an optional weekly cap on simultaneous checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonActivity {
    pub name: String,
    /// Availability per day slot, day 0 being the cycle-boundary day.
    pub days: [bool; DAYS_PER_CYCLE],
    /// Max number of `true` checks bearing this name across all days.
    #[serde(default)]
    pub max_checks: Option<u32>,
}

/// The account-wide activity table, keyed by activity name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommonCatalog {
    activities: BTreeMap<String, CommonActivity>,
}

impl CommonCatalog {
    pub fn new(activities: impl IntoIterator<Item = CommonActivity>) -> Self {
        Self {
            activities: activities
                .into_iter()
                .map(|a| (a.name.clone(), a))
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let activities: Vec<CommonActivity> = serde_json::from_str(json)?;
        Ok(Self::new(activities))
    }

    pub fn lookup(&self, name: &str) -> Option<&CommonActivity> {
        self.activities.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommonActivity> {
        self.activities.values()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
