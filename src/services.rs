//! External collaborators injected into the rules engine
//!
//! Ads, the in-app store and the cheat toggle are owned by the host. The
//! engine only sees these traits; asynchronous completions come back through
//! `GameRules::on_rewarded_ad_closed` and `GameRules::on_purchase_result`.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::persistence::{MemoryPrefs, PrefsStore};

/// Ad network adapter
pub trait AdService {
    fn is_interstitial_ready(&self) -> bool;
    fn show_interstitial(&mut self);
    fn is_rewarded_ready(&self) -> bool;
    /// Start a rewarded ad. The host reports the result later.
    fn show_rewarded(&mut self);
}

/// No ad network; nothing is ever ready
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAds;

impl AdService for NoAds {
    fn is_interstitial_ready(&self) -> bool {
        false
    }
    fn show_interstitial(&mut self) {}
    fn is_rewarded_ready(&self) -> bool {
        false
    }
    fn show_rewarded(&mut self) {}
}

/// Why a purchase could not be started
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store not initialized")]
    NotInitialized,
}

/// Final result of a purchase flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseOutcome {
    Success,
    Failed(String),
    Cancelled,
}

/// In-app purchase adapter. Ownership of non-consumables is persisted by the
/// store, not the engine.
pub trait Store {
    fn initiate_purchase(&mut self, product_id: &str) -> Result<(), StoreError>;
}

/// Store that never initializes
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStore;

impl Store for NoStore {
    fn initiate_purchase(&mut self, _product_id: &str) -> Result<(), StoreError> {
        Err(StoreError::NotInitialized)
    }
}

/// Source of the "no life loss" cheat flag
pub trait CheatSource {
    fn cheat_active(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoCheats;

impl CheatSource for NoCheats {
    fn cheat_active(&self) -> bool {
        false
    }
}

/// Shared toggle; the host keeps a clone and flips it
#[derive(Debug, Clone, Default)]
pub struct CheatSwitch(Rc<Cell<bool>>);

impl CheatSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, active: bool) {
        self.0.set(active);
    }
}

impl CheatSource for CheatSwitch {
    fn cheat_active(&self) -> bool {
        self.0.get()
    }
}

/// Everything the engine talks to outside itself
pub struct Services {
    pub prefs: Box<dyn PrefsStore>,
    pub ads: Box<dyn AdService>,
    pub store: Box<dyn Store>,
    pub cheats: Box<dyn CheatSource>,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            prefs: Box::new(MemoryPrefs::new()),
            ads: Box::new(NoAds),
            store: Box::new(NoStore),
            cheats: Box::new(NoCheats),
        }
    }
}

impl Services {
    pub fn with_prefs(mut self, prefs: impl PrefsStore + 'static) -> Self {
        self.prefs = Box::new(prefs);
        self
    }

    pub fn with_ads(mut self, ads: impl AdService + 'static) -> Self {
        self.ads = Box::new(ads);
        self
    }

    pub fn with_store(mut self, store: impl Store + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn with_cheats(mut self, cheats: impl CheatSource + 'static) -> Self {
        self.cheats = Box::new(cheats);
        self
    }
}
