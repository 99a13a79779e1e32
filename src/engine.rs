// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Weekly Ledger Engine - Engine Facade

//! The stateful facade the application drives.
//!
//! `TrackerEngine` owns the single in-memory copy of the profile, the static
//! catalogs, and the "has unsaved changes" flag. Every mutation routes
//! through here so the dirty flag cannot be forgotten; persistence itself
//! stays with the caller (optimistic, last-writer-wins): export the profile,
//! write it somewhere, then `mark_saved`. A failed write simply never calls
//! `mark_saved`, so the user is not silently desynced.

use chrono::{DateTime, Utc};
use wasm_bindgen::prelude::*;

use crate::catalog::{CatalogError, CommonCatalog, RaidCatalog};
use crate::checklist::{self, SingleContent};
use crate::common_content;
use crate::gold::{self, AccountTotals, GoldError};
use crate::migration;
use crate::reset;
use crate::rest::{self, RestReplay};
use crate::types::{DailyContent, Gold, Profile};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("profile JSON is malformed: {0}")]
    MalformedProfile(#[from] serde_json::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Gold(#[from] GoldError),

    /// The activity name does not resolve in the supplied catalog. Like a
    /// stage-count mismatch, this indicates a stale reference, not user error.
    #[error("unknown activity {0:?}")]
    UnknownActivity(String),
}

// ---------------------------------------------------------------------------
// TrackerEngine
// ---------------------------------------------------------------------------

#[wasm_bindgen]
pub struct TrackerEngine {
    raid_catalog: RaidCatalog,
    common_catalog: CommonCatalog,
    profile: Profile,
    dirty: bool,
    /// Serializes the reset transition within one session; the transition
    /// must never run twice concurrently against the same profile.
    reset_in_flight: bool,
}

impl TrackerEngine {
    pub fn new(raid_catalog: RaidCatalog, common_catalog: CommonCatalog) -> Self {
        Self {
            raid_catalog,
            common_catalog,
            profile: Profile::default(),
            dirty: false,
            reset_in_flight: false,
        }
    }

    /// Build an engine from the two catalog tables as shipped in the
    /// frontend bundle.
    pub fn from_catalog_json(raid_json: &str, common_json: &str) -> Result<Self, EngineError> {
        Ok(Self::new(
            RaidCatalog::from_json(raid_json)?,
            CommonCatalog::from_json(common_json)?,
        ))
    }

    // -----------------------------------------------------------------------
    // Load / persist
    // -----------------------------------------------------------------------

    /// Install a freshly fetched profile: run migrations, then the reset
    /// detection and (if due) the single mutating transition. Returns whether
    /// the cycle rolled. Either change marks the profile dirty.
    pub fn load_profile(
        &mut self,
        profile: Profile,
        now: DateTime<Utc>,
    ) -> Result<bool, EngineError> {
        self.profile = profile;
        self.dirty = false;
        if migration::migrate_profile(&mut self.profile) {
            self.dirty = true;
        }
        self.try_weekly_reset(now)
    }

    pub fn load_profile_json(
        &mut self,
        json: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, EngineError> {
        let profile: Profile = serde_json::from_str(json)?;
        self.load_profile(profile, now)
    }

    /// Run the reset state machine once. Safe to call repeatedly; re-entry
    /// while a transition is being applied is refused.
    pub fn try_weekly_reset(&mut self, now: DateTime<Utc>) -> Result<bool, EngineError> {
        if self.reset_in_flight {
            return Ok(false);
        }
        self.reset_in_flight = true;
        let outcome = reset::apply_weekly_reset(&mut self.profile, &self.raid_catalog, now);
        self.reset_in_flight = false;

        let rolled = outcome?;
        if rolled {
            self.dirty = true;
        }
        Ok(rolled)
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn raid_catalog(&self) -> &RaidCatalog {
        &self.raid_catalog
    }

    pub fn common_catalog(&self) -> &CommonCatalog {
        &self.common_catalog
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The caller persisted the exported profile successfully.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn export_profile_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(&self.profile)?)
    }

    // -----------------------------------------------------------------------
    // Character roster
    // -----------------------------------------------------------------------

    /// Replace the tracked character list wholesale (the refresh collaborator
    /// owns the stats). Checklist entries are kept; new names get state
    /// lazily on first mutation.
    pub fn set_characters(&mut self, characters: Vec<crate::types::Character>) {
        self.profile.characters = characters;
        self.dirty = true;
    }

    // -----------------------------------------------------------------------
    // Checklist mutators
    // -----------------------------------------------------------------------

    pub fn toggle_raid(&mut self, character: &str, activity: &str) -> Result<(), EngineError> {
        let entry = self
            .raid_catalog
            .lookup(activity)
            .ok_or_else(|| EngineError::UnknownActivity(activity.to_string()))?;
        checklist::toggle_raid(
            &mut self.profile.weekly_checklist,
            character,
            activity,
            entry.stage_count(),
        );
        self.dirty = true;
        Ok(())
    }

    pub fn change_raid_difficulty(
        &mut self,
        character: &str,
        old_activity: &str,
        new_activity: &str,
    ) -> Result<(), EngineError> {
        let entry = self
            .raid_catalog
            .lookup(new_activity)
            .ok_or_else(|| EngineError::UnknownActivity(new_activity.to_string()))?
            .clone();
        checklist::change_raid_difficulty(
            &mut self.profile.weekly_checklist,
            character,
            old_activity,
            &entry,
        );
        self.dirty = true;
        Ok(())
    }

    pub fn toggle_surcharge(&mut self, character: &str, activity: &str) {
        checklist::toggle_surcharge(&mut self.profile.weekly_checklist, character, activity);
        self.dirty = true;
    }

    pub fn toggle_daily_check(&mut self, character: &str, field: DailyContent, day: usize) -> bool {
        let changed =
            checklist::toggle_daily_check(&mut self.profile.weekly_checklist, character, field, day);
        if changed {
            self.dirty = true;
        }
        changed
    }

    pub fn set_rest_gauge(&mut self, character: &str, field: DailyContent, value: u32) {
        checklist::set_rest_gauge(&mut self.profile.weekly_checklist, character, field, value);
        self.dirty = true;
    }

    pub fn toggle_single(&mut self, character: &str, field: SingleContent) {
        checklist::toggle_single(&mut self.profile.weekly_checklist, character, field);
        self.dirty = true;
    }

    pub fn set_additional_gold(&mut self, character: &str, value: Gold) {
        checklist::set_additional_gold(&mut self.profile.weekly_checklist, character, value);
        self.dirty = true;
    }

    // -----------------------------------------------------------------------
    // Account-wide content
    // -----------------------------------------------------------------------

    /// Toggle an account-wide check. Refused (returns false) when the
    /// activity is not available that day or its weekly cap is reached.
    pub fn toggle_common_check(&mut self, day: usize, activity: &str) -> bool {
        let (available, cap) = match self.common_catalog.lookup(activity) {
            Some(def) => (day < def.days.len() && def.days[day], def.max_checks),
            // Unknown to the table: no availability or cap data, allow.
            None => (true, None),
        };
        if !available {
            return false;
        }
        let changed =
            common_content::toggle_common_check(&mut self.profile.common_content, day, activity, cap);
        if changed {
            self.dirty = true;
        }
        changed
    }

    pub fn common_checked_count(&self, activity: &str) -> u32 {
        common_content::checked_count(&self.profile.common_content, activity)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn account_totals(&self) -> Result<AccountTotals, EngineError> {
        Ok(gold::account_totals(
            &self.profile.characters,
            &self.profile.weekly_checklist,
            &self.raid_catalog,
        )?)
    }

    pub fn account_gold(&self) -> Result<Gold, EngineError> {
        Ok(self.account_totals()?.total_gold)
    }

    /// A character with no checklist entry yet reads as zero.
    pub fn character_gold(&self, character: &str) -> Result<Gold, EngineError> {
        match self.profile.weekly_checklist.get(character) {
            Some(state) => Ok(gold::character_gold(state, &self.raid_catalog)?),
            None => Ok(Gold::zero()),
        }
    }

    /// Replay a character's rest pool for one daily-cadence field.
    pub fn rest_replay(&self, character: &str, field: DailyContent) -> RestReplay {
        match self.profile.weekly_checklist.get(character) {
            Some(state) => rest::replay_rest(state.daily(field)),
            None => rest::replay_rest(&Default::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
