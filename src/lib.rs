// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Weekly Ledger Engine - Weekly Progress & Gold Accounting

pub mod catalog;
pub mod checklist;
pub mod common_content;
pub mod engine;
pub mod gold;
pub mod history;
pub mod migration;
pub mod reset;
pub mod rest;
pub mod types;

pub use engine::{EngineError, TrackerEngine};
pub use types::*;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use checklist::SingleContent;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_now(now_ms: f64) -> Result<chrono::DateTime<chrono::Utc>, JsValue> {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(now_ms as i64)
        .ok_or_else(|| js_err("timestamp out of range"))
}

fn parse_daily(field: &str) -> Result<DailyContent, JsValue> {
    match field {
        "chaosDungeon" => Ok(DailyContent::ChaosDungeon),
        "guardianRaid" => Ok(DailyContent::GuardianRaid),
        other => Err(js_err(format!("unknown daily field {other:?}"))),
    }
}

fn parse_single(field: &str) -> Result<SingleContent, JsValue> {
    match field {
        "paradise" => Ok(SingleContent::Paradise),
        "sandOfTime" => Ok(SingleContent::SandOfTime),
        other => Err(js_err(format!("unknown toggle field {other:?}"))),
    }
}

#[wasm_bindgen]
impl TrackerEngine {
    /// Both catalog tables come from the frontend bundle as JSON arrays.
    #[wasm_bindgen(constructor)]
    pub fn new_js(raid_catalog_json: &str, common_catalog_json: &str) -> Result<TrackerEngine, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        TrackerEngine::from_catalog_json(raid_catalog_json, common_catalog_json).map_err(js_err)
    }

    /// Install a fetched profile; runs migration and the reset state machine.
    /// Returns true when the cycle rolled (the caller should persist).
    #[wasm_bindgen(js_name = loadProfile)]
    pub fn load_profile_js(&mut self, profile_json: &str, now_ms: f64) -> Result<bool, JsValue> {
        let now = parse_now(now_ms)?;
        let rolled = self.load_profile_json(profile_json, now).map_err(js_err)?;
        if rolled {
            log("ledger-engine: cycle boundary crossed, checklist reset");
        }
        Ok(rolled)
    }

    #[wasm_bindgen(js_name = tryWeeklyReset)]
    pub fn try_weekly_reset_js(&mut self, now_ms: f64) -> Result<bool, JsValue> {
        let now = parse_now(now_ms)?;
        self.try_weekly_reset(now).map_err(js_err)
    }

    #[wasm_bindgen(js_name = setCharacters)]
    pub fn set_characters_js(&mut self, characters: JsValue) -> Result<(), JsValue> {
        let characters: Vec<Character> =
            serde_wasm_bindgen::from_value(characters).map_err(js_err)?;
        self.set_characters(characters);
        Ok(())
    }

    #[wasm_bindgen(js_name = toggleRaid)]
    pub fn toggle_raid_js(&mut self, character: &str, activity: &str) -> Result<(), JsValue> {
        self.toggle_raid(character, activity).map_err(js_err)
    }

    #[wasm_bindgen(js_name = changeRaidDifficulty)]
    pub fn change_raid_difficulty_js(
        &mut self,
        character: &str,
        old_activity: &str,
        new_activity: &str,
    ) -> Result<(), JsValue> {
        self.change_raid_difficulty(character, old_activity, new_activity)
            .map_err(js_err)
    }

    #[wasm_bindgen(js_name = toggleSurcharge)]
    pub fn toggle_surcharge_js(&mut self, character: &str, activity: &str) {
        self.toggle_surcharge(character, activity);
    }

    #[wasm_bindgen(js_name = toggleDailyCheck)]
    pub fn toggle_daily_check_js(
        &mut self,
        character: &str,
        field: &str,
        day: usize,
    ) -> Result<bool, JsValue> {
        Ok(self.toggle_daily_check(character, parse_daily(field)?, day))
    }

    #[wasm_bindgen(js_name = setRestGauge)]
    pub fn set_rest_gauge_js(
        &mut self,
        character: &str,
        field: &str,
        value: u32,
    ) -> Result<(), JsValue> {
        self.set_rest_gauge(character, parse_daily(field)?, value);
        Ok(())
    }

    #[wasm_bindgen(js_name = toggleSingle)]
    pub fn toggle_single_js(&mut self, character: &str, field: &str) -> Result<(), JsValue> {
        self.toggle_single(character, parse_single(field)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = setAdditionalGold)]
    pub fn set_additional_gold_js(&mut self, character: &str, value: f64) {
        let value = Gold::from_decimal(Decimal::from_f64(value).unwrap_or(Decimal::ZERO));
        self.set_additional_gold(character, value);
    }

    #[wasm_bindgen(js_name = toggleCommonCheck)]
    pub fn toggle_common_check_js(&mut self, day: usize, activity: &str) -> bool {
        self.toggle_common_check(day, activity)
    }

    #[wasm_bindgen(js_name = commonCheckedCount)]
    pub fn common_checked_count_js(&self, activity: &str) -> u32 {
        self.common_checked_count(activity)
    }

    #[wasm_bindgen(js_name = accountGold)]
    pub fn account_gold_js(&self) -> Result<f64, JsValue> {
        let gold = self.account_gold().map_err(js_err)?;
        Ok(gold.0.to_f64().unwrap_or(0.0))
    }

    #[wasm_bindgen(js_name = accountTotals)]
    pub fn account_totals_js(&self) -> Result<JsValue, JsValue> {
        let totals = self.account_totals().map_err(js_err)?;
        Ok(serde_wasm_bindgen::to_value(&totals).unwrap_or(JsValue::NULL))
    }

    #[wasm_bindgen(js_name = characterGold)]
    pub fn character_gold_js(&self, character: &str) -> Result<f64, JsValue> {
        let gold = self.character_gold(character).map_err(js_err)?;
        Ok(gold.0.to_f64().unwrap_or(0.0))
    }

    #[wasm_bindgen(js_name = restReplay)]
    pub fn rest_replay_js(&self, character: &str, field: &str) -> Result<JsValue, JsValue> {
        let replay = self.rest_replay(character, parse_daily(field)?);
        Ok(serde_wasm_bindgen::to_value(&replay).unwrap_or(JsValue::NULL))
    }

    #[wasm_bindgen(js_name = eligibleRaids)]
    pub fn eligible_raids_js(&self, item_level: f64) -> JsValue {
        let entries: Vec<_> = self.raid_catalog().eligible_for(item_level).collect();
        serde_wasm_bindgen::to_value(&entries).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = goldHistory)]
    pub fn gold_history_js(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.profile().weekly_gold_history).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = isDirty)]
    pub fn is_dirty_js(&self) -> bool {
        self.is_dirty()
    }

    #[wasm_bindgen(js_name = markSaved)]
    pub fn mark_saved_js(&mut self) {
        self.mark_saved()
    }

    #[wasm_bindgen(js_name = exportProfile)]
    pub fn export_profile_js(&self) -> Result<String, JsValue> {
        self.export_profile_json().map_err(js_err)
    }
}
