//! Dao of Zero セーブ/ロード機能。
//!
//! ## 形式
//!
//! `{ "version": 1, "game": { ...camelCase フィールド... }, "timestamp": <ms> }`
//!
//! `game` の各フィールドはすべて任意。存在するフィールドだけが新規状態に
//! 上書きマージされ、欠けているフィールドは初期値のまま残る。
//! 派生ステータスは保存されていても読み込まず、ロード後に必ず再計算する。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在のセーブ形式バージョン。
//! - `MIN_COMPATIBLE_VERSION`: これ未満のセーブデータは破損扱いにして破棄する。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::{ActionId, Feature, TechniqueId, UpgradeId, ACTIONS, OPENING_LINE, UPGRADES};
use super::error::SaveError;
use super::state::GameState;
use super::stats;

/// セーブデータのフォーマットバージョン。
pub const SAVE_VERSION: u32 = 1;

/// 互換性を維持できる最小バージョン。
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// localStorage のキー。
pub const STORAGE_KEY: &str = "daoOfZeroSave";

pub const LOADED_MESSAGE: &str = "Progress loaded. The cycle continues.";

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameSave,
    #[serde(default)]
    timestamp: u64,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct ActionSave {
    #[serde(rename = "lastUsed")]
    last_used: Option<u64>,
}

/// シリアライズ用の `game` オブジェクト。
/// 派生ステータスも書き出すが、読み込み時は無視する。
#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct GameSave {
    dao_marks: Option<f64>,
    qi: Option<f64>,
    max_qi: Option<f64>,
    insight: Option<f64>,
    prestige: Option<f64>,

    qi_per_click: Option<f64>,
    qi_per_second: Option<f64>,
    marks_per_click: Option<f64>,
    marks_per_second: Option<f64>,
    insight_per_second: Option<f64>,
    tribute_per_second: Option<f64>,
    refine_bonus: Option<f64>,
    refine_cost_reduction: Option<f64>,
    global_multiplier: Option<f64>,
    qi_multiplier: Option<f64>,
    mark_multiplier: Option<f64>,

    phase: Option<u32>,
    realm: Option<String>,
    total_marks_produced: Option<f64>,
    total_clicks: Option<u64>,

    /// アップグレード key → レベル。
    upgrades: Option<BTreeMap<String, u32>>,
    /// テクニック key → 研究済みか。
    techniques: Option<BTreeMap<String, bool>>,
    /// アクション key → 最終使用時刻。
    actions: Option<BTreeMap<String, ActionSave>>,

    autosave_enabled: Option<bool>,
    sound_enabled: Option<bool>,

    last_tick: Option<u64>,
    last_save: Option<u64>,
    game_start_time: Option<u64>,

    #[serde(rename = "phase2Warning")]
    phase_two_warning: Option<bool>,
    unlocked_features: Option<Vec<String>>,
}

/// ロード結果。
#[derive(Debug)]
pub enum LoadOutcome {
    /// セーブなし。新規ゲーム。
    Fresh,
    Loaded,
    /// セーブが壊れていたので新規ゲームで復旧した。
    Recovered(SaveError),
}

#[cfg(any(target_arch = "wasm32", test))]
fn extract_save(state: &GameState) -> GameSave {
    let b = &state.balances;
    let s = &state.stats;
    let p = &state.progression;
    GameSave {
        dao_marks: Some(b.dao_marks),
        qi: Some(b.qi),
        max_qi: Some(s.max_qi),
        insight: Some(b.insight),
        prestige: Some(b.prestige),
        qi_per_click: Some(s.qi_per_click),
        qi_per_second: Some(s.qi_per_second),
        marks_per_click: Some(s.marks_per_click),
        marks_per_second: Some(s.marks_per_second),
        insight_per_second: Some(s.insight_per_second),
        tribute_per_second: Some(s.tribute_per_second),
        refine_bonus: Some(s.refine_bonus),
        refine_cost_reduction: Some(s.refine_cost_reduction),
        global_multiplier: Some(s.global_multiplier),
        qi_multiplier: Some(s.qi_multiplier),
        mark_multiplier: Some(s.mark_multiplier),
        phase: Some(state.phase),
        realm: Some(state.realm.clone()),
        total_marks_produced: Some(state.total_marks_produced),
        total_clicks: Some(state.total_clicks),
        upgrades: Some(
            p.levels
                .iter()
                .filter(|(_, lvl)| **lvl > 0)
                .map(|(id, &lvl)| (id.key().to_string(), lvl))
                .collect(),
        ),
        techniques: Some(
            p.researched
                .iter()
                .map(|id| (id.key().to_string(), true))
                .collect(),
        ),
        actions: Some(
            p.last_used
                .iter()
                .map(|(id, &t)| {
                    (
                        id.key().to_string(),
                        ActionSave {
                            last_used: Some(t),
                        },
                    )
                })
                .collect(),
        ),
        autosave_enabled: Some(state.settings.autosave_enabled),
        sound_enabled: Some(state.settings.sound_enabled),
        last_tick: Some(state.last_tick_ms),
        last_save: Some(state.last_save_ms),
        game_start_time: Some(state.game_start_ms),
        phase_two_warning: Some(state.phase_two_announced),
        unlocked_features: Some(
            state
                .unlocked
                .iter()
                .map(|f| f.key().to_string())
                .collect(),
        ),
    }
}

/// 有限値だけを非負にして書き込む。
fn merge_amount(slot: &mut f64, value: Option<f64>) {
    if let Some(v) = value.filter(|v| v.is_finite()) {
        *slot = v.max(0.0);
    }
}

fn apply_save(state: &mut GameState, save: GameSave) {
    merge_amount(&mut state.balances.dao_marks, save.dao_marks);
    merge_amount(&mut state.balances.qi, save.qi);
    merge_amount(&mut state.balances.insight, save.insight);
    merge_amount(&mut state.balances.prestige, save.prestige);
    merge_amount(&mut state.total_marks_produced, save.total_marks_produced);

    if let Some(phase) = save.phase {
        state.phase = phase;
    }
    if let Some(realm) = save.realm {
        state.realm = realm;
    }
    if let Some(clicks) = save.total_clicks {
        state.total_clicks = clicks;
    }

    // 未知の key は無視、レベルは上限に丸める
    if let Some(upgrades) = save.upgrades {
        for (key, level) in upgrades {
            if let Some(id) = UpgradeId::from_key(&key) {
                let level = level.min(id.def().max_level);
                if level > 0 {
                    state.progression.levels.insert(id, level);
                }
            }
        }
    }
    if let Some(techniques) = save.techniques {
        for (key, done) in techniques {
            if let (Some(id), true) = (TechniqueId::from_key(&key), done) {
                state.progression.researched.insert(id);
            }
        }
    }
    if let Some(actions) = save.actions {
        for (key, action) in actions {
            if let (Some(id), Some(t)) = (ActionId::from_key(&key), action.last_used) {
                state.progression.last_used.insert(id, t);
            }
        }
    }

    if let Some(v) = save.autosave_enabled {
        state.settings.autosave_enabled = v;
    }
    if let Some(v) = save.sound_enabled {
        state.settings.sound_enabled = v;
    }
    if let Some(t) = save.last_tick {
        state.last_tick_ms = t;
    }
    if let Some(t) = save.last_save {
        state.last_save_ms = t;
    }
    if let Some(t) = save.game_start_time {
        state.game_start_ms = t;
    }
    if let Some(v) = save.phase_two_warning {
        state.phase_two_announced = v;
    }

    if let Some(features) = save.unlocked_features {
        state
            .unlocked
            .extend(features.iter().filter_map(|k| Feature::from_key(k)));
    }
    restore_unlocks(state);

    stats::refresh(state);
}

/// 進行状況から解放済み機能を復元する（フィールドが無い古いセーブ用）。
/// イベントは発行しない。
fn restore_unlocks(state: &mut GameState) {
    for def in UPGRADES.iter() {
        if state.progression.level(def.id) > 0 {
            state.unlocked.extend(def.unlocks.iter().copied());
        }
    }
    for def in ACTIONS.iter() {
        if state.progression.last_used(def.id).is_some() {
            state.unlocked.extend(def.unlocks.iter().copied());
        }
    }
    if state.balances.prestige > 0.0 {
        state.unlocked.insert(Feature::PrestigeDisplay);
        state.unlocked.insert(Feature::ActionsSection);
    }
}

/// 状態を JSON 文字列にする。
#[cfg(any(target_arch = "wasm32", test))]
pub fn serialize(state: &GameState, now_ms: u64) -> Result<String, SaveError> {
    let data = SaveData {
        version: SAVE_VERSION,
        game: extract_save(state),
        timestamp: now_ms,
    };
    Ok(serde_json::to_string(&data)?)
}

/// JSON から状態を復元する。`now_ms` は欠けた時刻フィールドの初期値になる。
pub fn deserialize(json: &str, now_ms: u64) -> Result<GameState, SaveError> {
    let data: SaveData = serde_json::from_str(json)?;
    if data.version < MIN_COMPATIBLE_VERSION {
        return Err(SaveError::IncompatibleVersion {
            saved: data.version,
            min_compatible: MIN_COMPATIBLE_VERSION,
        });
    }
    if data.version > SAVE_VERSION {
        tracing::warn!(
            saved = data.version,
            current = SAVE_VERSION,
            "save is newer than this build; loading known fields"
        );
    }
    let mut state = GameState::new(now_ms);
    apply_save(&mut state, data.game);
    Ok(state)
}

/// 保存済み JSON（あれば）から状態を作る。失敗しても必ず遊べる状態を返す。
pub fn load_or_new(json: Option<&str>, now_ms: u64) -> (GameState, LoadOutcome) {
    let Some(json) = json else {
        let mut state = GameState::new(now_ms);
        state.add_log(OPENING_LINE, false);
        return (state, LoadOutcome::Fresh);
    };
    match deserialize(json, now_ms) {
        Ok(mut state) => {
            state.add_log(LOADED_MESSAGE, false);
            tracing::info!(
                upgrades = state.progression.levels.len(),
                clicks = state.total_clicks,
                "save loaded"
            );
            (state, LoadOutcome::Loaded)
        }
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable save");
            let mut state = GameState::new(now_ms);
            state.add_log(OPENING_LINE, false);
            (state, LoadOutcome::Recovered(e))
        }
    }
}

// ── localStorage ────────────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
fn get_storage() -> Result<web_sys::Storage, SaveError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| SaveError::Storage("localStorage unavailable".to_string()))
}

#[cfg(target_arch = "wasm32")]
fn js_error(e: wasm_bindgen::JsValue) -> SaveError {
    SaveError::Storage(format!("{e:?}"))
}

/// 状態を保存してログに記録する。
#[cfg(target_arch = "wasm32")]
pub fn save_game(state: &mut GameState, key: &str, now_ms: u64) -> Result<(), SaveError> {
    let json = serialize(state, now_ms)?;
    get_storage()?.set_item(key, &json).map_err(js_error)?;
    state.last_save_ms = now_ms;
    state.add_log("Progress saved.", false);
    tracing::info!(bytes = json.len(), "progress saved");
    Ok(())
}

/// 保存済みデータを読み込む。壊れたデータは削除して新規ゲームを返す。
#[cfg(target_arch = "wasm32")]
pub fn load_game(key: &str, now_ms: u64) -> (GameState, LoadOutcome) {
    let storage = get_storage().ok();
    let json = storage
        .as_ref()
        .and_then(|s| s.get_item(key).ok().flatten());
    let (state, outcome) = load_or_new(json.as_deref(), now_ms);
    if let (LoadOutcome::Recovered(_), Some(storage)) = (&outcome, &storage) {
        let _ = storage.remove_item(key);
    }
    (state, outcome)
}

#[cfg(target_arch = "wasm32")]
pub fn delete_save(key: &str) {
    if let Ok(storage) = get_storage() {
        let _ = storage.remove_item(key);
    }
}

/// 保存済みデータを JSON ファイルとしてダウンロードさせる。
#[cfg(target_arch = "wasm32")]
pub fn export_save(key: &str, now_ms: u64) -> Result<(), SaveError> {
    use wasm_bindgen::JsCast;

    let json = get_storage()?
        .get_item(key)
        .map_err(js_error)?
        .ok_or(SaveError::NoSave)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| SaveError::Storage("document unavailable".to_string()))?;

    let parts = js_sys::Array::of1(&wasm_bindgen::JsValue::from_str(&json));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("application/json");
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(js_error)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_error)?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| SaveError::Storage("anchor element".to_string()))?;
    anchor.set_href(&url);
    anchor.set_download(&format!("dao-of-zero-save-{now_ms}.json"));
    anchor.click();
    let _ = web_sys::Url::revoke_object_url(&url);
    Ok(())
}

/// 貼り付けられたセーブを検証してからそのまま保存し、読み込んだ状態を返す。
/// 不正なデータは保存しない。
#[cfg(target_arch = "wasm32")]
pub fn import_save(key: &str, raw: &str, now_ms: u64) -> Result<GameState, SaveError> {
    let mut state = deserialize(raw.trim(), now_ms)?;
    get_storage()?.set_item(key, raw.trim()).map_err(js_error)?;
    state.add_log(LOADED_MESSAGE, false);
    tracing::info!("save imported");
    Ok(state)
}
