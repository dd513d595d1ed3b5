//! Dao of Zero: an idle cultivation game.
//!
//! Breathe to gather Qi, refine it into Dao Marks, and rebuild the body one
//! upgrade at a time until the vessel is ready for a sect.

pub mod actions;
pub mod catalog;
pub mod error;
pub mod logic;
pub mod render;
pub mod save;
pub mod state;
pub mod stats;
pub mod view;

#[cfg(test)]
mod simulator;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::config::GameConfig;
use crate::games::Game;
use crate::input::{ClickState, InputEvent};
use crate::time::Schedule;

use catalog::{ActionId, Item, TechniqueId, UpgradeId, OPENING_LINE};
use save::LoadOutcome;
use state::{GameEvent, GameState, Milestone};
use view::ItemView;

/// Ticks an unlock/milestone banner stays up.
const BANNER_TICKS: u32 = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Upgrades,
    Techniques,
    Actions,
    Settings,
}

/// Click ID for a catalog item.
pub fn click_id(item: Item) -> u16 {
    match item {
        Item::Upgrade(id) => actions::BUY_UPGRADE_BASE + id.index() as u16,
        Item::Technique(id) => actions::RESEARCH_BASE + id.index() as u16,
        Item::Action(id) => actions::EXECUTE_ACTION_BASE + id.index() as u16,
    }
}

fn item_from_click(id: u16) -> Option<Item> {
    let offset = |base: u16| {
        (id >= base && id < base + actions::BLOCK_SIZE).then(|| (id - base) as usize)
    };
    if let Some(i) = offset(actions::BUY_UPGRADE_BASE) {
        UpgradeId::from_index(i).map(Item::Upgrade)
    } else if let Some(i) = offset(actions::RESEARCH_BASE) {
        TechniqueId::from_index(i).map(Item::Technique)
    } else if let Some(i) = offset(actions::EXECUTE_ACTION_BASE) {
        ActionId::from_index(i).map(Item::Action)
    } else {
        None
    }
}

pub struct DaoGame {
    pub state: GameState,
    pub tab: Tab,
    pub config: GameConfig,
    /// Host time of the latest frame.
    pub now_ms: u64,
    /// Item rows for the current tab, rebuilt on the refresh cadence and
    /// after every command.
    pub views: Vec<ItemView>,
    /// Message and remaining ticks.
    pub banner: Option<(String, u32)>,
    /// First reset press arms, the second confirms.
    pub reset_armed: bool,
    schedule: Schedule,
}

impl DaoGame {
    /// Start from the stored save (wasm32) or a fresh game.
    pub fn new(config: GameConfig, now_ms: u64) -> Self {
        #[cfg(target_arch = "wasm32")]
        let (state, outcome) = save::load_game(&config.storage_key, now_ms);
        #[cfg(not(target_arch = "wasm32"))]
        let (state, outcome) = save::load_or_new(None, now_ms);

        let mut game = Self::with_state(state, config, now_ms);
        if let LoadOutcome::Recovered(e) = outcome {
            game.state.add_log(
                "Your previous path could not be recalled. The cycle begins anew.",
                true,
            );
            game.banner = Some((format!("Save discarded: {e}"), BANNER_TICKS));
        }
        game
    }

    pub fn with_state(state: GameState, config: GameConfig, now_ms: u64) -> Self {
        let schedule = Schedule::new(&config);
        let mut game = Self {
            state,
            tab: Tab::Upgrades,
            config,
            now_ms,
            views: Vec::new(),
            banner: None,
            reset_armed: false,
            schedule,
        };
        game.refresh_views();
        game
    }

    pub fn techniques_visible(&self) -> bool {
        view::has_techniques(&self.state)
    }

    pub fn refresh_views(&mut self) {
        self.views = match self.tab {
            Tab::Upgrades => view::upgrade_views(&self.state),
            Tab::Techniques => view::technique_views(&self.state),
            Tab::Actions => view::action_views(&self.state, self.now_ms),
            Tab::Settings => Vec::new(),
        };
    }

    fn switch_tab(&mut self, tab: Tab) -> bool {
        if tab == Tab::Techniques && !self.techniques_visible() {
            return false;
        }
        self.tab = tab;
        true
    }

    fn activate(&mut self, item: Item) {
        let done = match item {
            Item::Upgrade(id) => logic::buy_upgrade(&mut self.state, id),
            Item::Technique(id) => logic::research(&mut self.state, id),
            Item::Action(id) => logic::execute_action(&mut self.state, id, self.now_ms),
        };
        if !done {
            tracing::debug!(item = item.key(), "command rejected");
        }
    }

    /// Activate the n-th row (0-based) of the current list.
    fn activate_row(&mut self, n: usize) -> bool {
        match self.views.get(n).map(|v| v.item) {
            Some(item) => {
                self.activate(item);
                true
            }
            None => false,
        }
    }

    fn absorb_events(&mut self) {
        for event in self.state.drain_events() {
            let text = match event {
                GameEvent::FeatureUnlocked(feature) => format!("Revealed: {}", feature.label()),
                GameEvent::MilestoneReached(Milestone::VesselPerfected) => {
                    "The vessel is perfected".to_string()
                }
            };
            tracing::info!(?event, "progress event");
            self.banner = Some((text, BANNER_TICKS));
        }
    }

    fn save(&mut self) {
        #[cfg(target_arch = "wasm32")]
        {
            let result = save::save_game(&mut self.state, &self.config.storage_key, self.now_ms);
            if let Err(e) = result {
                tracing::warn!(error = %e, "save failed");
                self.state.add_log("The record could not be kept.", true);
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        tracing::debug!("no persistent storage on this target");
    }

    fn export(&mut self) {
        self.save();
        #[cfg(target_arch = "wasm32")]
        {
            if let Err(e) = save::export_save(&self.config.storage_key, self.now_ms) {
                tracing::warn!(error = %e, "export failed");
                self.state.add_log("No save data found.", true);
            }
        }
    }

    fn import(&mut self) {
        #[cfg(target_arch = "wasm32")]
        {
            let raw = web_sys::window()
                .and_then(|w| w.prompt_with_message("Paste your Dao of Zero save:").ok())
                .flatten();
            let Some(raw) = raw else { return };
            match save::import_save(&self.config.storage_key, &raw, self.now_ms) {
                Ok(state) => {
                    self.state = state;
                    self.banner = Some(("Save imported".to_string(), BANNER_TICKS));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "import failed");
                    self.state.add_log("Failed to import save data.", true);
                }
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        tracing::debug!("import needs a browser");
    }

    fn reset(&mut self) {
        if !self.reset_armed {
            self.reset_armed = true;
            return;
        }
        #[cfg(target_arch = "wasm32")]
        save::delete_save(&self.config.storage_key);
        tracing::info!("progress reset");
        self.state = GameState::new(self.now_ms);
        self.state.add_log(OPENING_LINE, false);
        self.tab = Tab::Upgrades;
        self.reset_armed = false;
    }

    fn handle_key(&mut self, key: char) -> bool {
        match key {
            'c' | ' ' => {
                logic::cultivate(&mut self.state);
                true
            }
            'u' => self.switch_tab(Tab::Upgrades),
            't' => self.switch_tab(Tab::Techniques),
            'a' => self.switch_tab(Tab::Actions),
            'o' => self.switch_tab(Tab::Settings),
            's' => {
                self.save();
                true
            }
            '1'..='9' if self.tab != Tab::Settings => {
                self.activate_row(key as usize - '1' as usize)
            }
            'g' if self.tab == Tab::Settings => {
                self.state.settings.autosave_enabled = !self.state.settings.autosave_enabled;
                true
            }
            'e' if self.tab == Tab::Settings => {
                self.export();
                true
            }
            'i' if self.tab == Tab::Settings => {
                self.import();
                true
            }
            'r' if self.tab == Tab::Settings => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    fn handle_click(&mut self, id: u16) -> bool {
        if let Some(item) = item_from_click(id) {
            self.activate(item);
            return true;
        }
        match id {
            actions::CULTIVATE => self.handle_key('c'),
            actions::SAVE_NOW => self.handle_key('s'),
            actions::TAB_UPGRADES => self.switch_tab(Tab::Upgrades),
            actions::TAB_TECHNIQUES => self.switch_tab(Tab::Techniques),
            actions::TAB_ACTIONS => self.switch_tab(Tab::Actions),
            actions::TAB_SETTINGS => self.switch_tab(Tab::Settings),
            actions::TOGGLE_AUTOSAVE => self.handle_key('g'),
            actions::EXPORT_SAVE => self.handle_key('e'),
            actions::IMPORT_SAVE => self.handle_key('i'),
            actions::RESET_GAME => self.handle_key('r'),
            _ => false,
        }
    }
}

impl Game for DaoGame {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        let was_armed = self.reset_armed;
        let handled = match event {
            InputEvent::Key(c) => self.handle_key(*c),
            InputEvent::Click(id) => self.handle_click(*id),
        };
        // Anything other than a second reset press cancels the reset.
        if was_armed {
            self.reset_armed = false;
        }
        if handled {
            self.absorb_events();
            self.refresh_views();
        }
        handled
    }

    fn update(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        let due = self.schedule.poll(now_ms as f64);

        if due.tick {
            logic::tick(&mut self.state, now_ms, self.config.max_catch_up_ms);
            if let Some((_, ticks)) = &mut self.banner {
                *ticks = ticks.saturating_sub(1);
            }
            if matches!(self.banner, Some((_, 0))) {
                self.banner = None;
            }
        }
        if due.autosave && self.state.settings.autosave_enabled {
            self.save();
        }
        self.absorb_events();
        if due.refresh {
            self.refresh_views();
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }
}
