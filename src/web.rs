//! Browser bindings
//!
//! Exposes the rules engine to a JavaScript host. Events cross the boundary
//! as a JSON array.
//!
//! Ads and the store live in JS. The host reports readiness with the
//! `set_*_ready` setters, drains `host_requests_json` each frame to learn
//! what to show or buy, and reports results through `rewarded_ad_closed` and
//! `purchase_result`.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::persistence::LocalStoragePrefs;
use crate::services::{AdService, PurchaseOutcome, Services, Store, StoreError};
use crate::sim::{GameRules, PowerupKind};
use crate::tuning::Tuning;

/// Work the JS host has to carry out
#[derive(Debug, Clone, Serialize)]
enum HostRequest {
    ShowInterstitial,
    ShowRewarded,
    Purchase(String),
}

#[derive(Debug, Default)]
struct Bridge {
    interstitial_ready: bool,
    rewarded_ready: bool,
    store_ready: bool,
    requests: Vec<HostRequest>,
}

type SharedBridge = Rc<RefCell<Bridge>>;

struct WebAds(SharedBridge);

impl AdService for WebAds {
    fn is_interstitial_ready(&self) -> bool {
        self.0.borrow().interstitial_ready
    }
    fn show_interstitial(&mut self) {
        let mut bridge = self.0.borrow_mut();
        bridge.interstitial_ready = false;
        bridge.requests.push(HostRequest::ShowInterstitial);
    }
    fn is_rewarded_ready(&self) -> bool {
        self.0.borrow().rewarded_ready
    }
    fn show_rewarded(&mut self) {
        let mut bridge = self.0.borrow_mut();
        bridge.rewarded_ready = false;
        bridge.requests.push(HostRequest::ShowRewarded);
    }
}

struct WebStore(SharedBridge);

impl Store for WebStore {
    fn initiate_purchase(&mut self, product_id: &str) -> Result<(), StoreError> {
        let mut bridge = self.0.borrow_mut();
        if !bridge.store_ready {
            return Err(StoreError::NotInitialized);
        }
        bridge
            .requests
            .push(HostRequest::Purchase(product_id.to_string()));
        Ok(())
    }
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
}

#[wasm_bindgen]
pub struct WebGame {
    rules: GameRules,
    bridge: SharedBridge,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` may be empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: &str) -> WebGame {
        let json = (!tuning_json.trim().is_empty()).then_some(tuning_json);
        let tuning = Tuning::load_or_default(json);
        let bridge = SharedBridge::default();
        let services = Services::default()
            .with_prefs(LocalStoragePrefs::default())
            .with_ads(WebAds(bridge.clone()))
            .with_store(WebStore(bridge.clone()));
        let seed = js_sys::Date::now() as u64;
        log::info!("Keepy-Up starting (seed {})", seed);
        WebGame {
            rules: GameRules::new(seed, tuning, services),
            bridge,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.rules.tick(dt);
    }

    /// Returns the new ball velocity as `[vx, vy]`
    pub fn paddle_contact(&mut self, x: f32, y: f32, vx: f32, vy: f32) -> Vec<f32> {
        let v = self
            .rules
            .on_paddle_contact(Vec2::new(x, y), Vec2::new(vx, vy));
        vec![v.x, v.y]
    }

    pub fn ball_dropped(&mut self, x: f32, y: f32) {
        self.rules.on_ball_dropped(Vec2::new(x, y));
    }

    /// 0 = double score, 1 = slow time, 2 = shield
    pub fn apply_powerup(&mut self, kind: u8, duration: f32) {
        match PowerupKind::ALL.get(kind as usize) {
            Some(&kind) => self.rules.apply_powerup(kind, duration),
            None => log::warn!("Unknown powerup kind {}", kind),
        }
    }

    pub fn revive_direct(&mut self) {
        self.rules.revive_direct();
    }

    /// Returns false if no rewarded ad was ready
    pub fn revive_with_ad(&mut self) -> bool {
        self.rules.revive_with_ad()
    }

    pub fn rewarded_ad_closed(&mut self, rewarded: bool) {
        self.rules.on_rewarded_ad_closed(rewarded);
    }

    pub fn set_interstitial_ready(&mut self, ready: bool) {
        self.bridge.borrow_mut().interstitial_ready = ready;
    }

    pub fn set_rewarded_ready(&mut self, ready: bool) {
        self.bridge.borrow_mut().rewarded_ready = ready;
    }

    pub fn set_store_ready(&mut self, ready: bool) {
        self.bridge.borrow_mut().store_ready = ready;
    }

    pub fn purchase(&mut self, product_id: &str) {
        self.rules.purchase(product_id);
    }

    /// 0 = success, 1 = failed (with `reason`), anything else = cancelled
    pub fn purchase_result(&mut self, product_id: &str, outcome: u8, reason: &str) {
        let outcome = match outcome {
            0 => PurchaseOutcome::Success,
            1 => PurchaseOutcome::Failed(reason.to_string()),
            _ => PurchaseOutcome::Cancelled,
        };
        self.rules.on_purchase_result(product_id, outcome);
    }

    pub fn restart(&mut self) {
        self.rules.request_restart();
    }

    pub fn menu(&mut self) {
        self.rules.request_menu();
    }

    pub fn gravity_multiplier(&self) -> f32 {
        self.rules.gravity_multiplier()
    }

    pub fn time_scale(&self) -> f32 {
        self.rules.time_scale()
    }

    /// Drain pending events as a JSON array
    pub fn events_json(&mut self) -> String {
        let events = self.rules.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("Failed to encode events: {}", e);
            "[]".to_string()
        })
    }

    /// Drain pending ad and store requests as a JSON array
    pub fn host_requests_json(&mut self) -> String {
        let requests = std::mem::take(&mut self.bridge.borrow_mut().requests);
        serde_json::to_string(&requests).unwrap_or_else(|e| {
            log::warn!("Failed to encode host requests: {}", e);
            "[]".to_string()
        })
    }
}
