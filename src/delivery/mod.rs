use std::collections::HashSet;

use tracing::warn;

use crate::advertisement::{manager, AdPosition, AdvertisementId};
use crate::database::Database;

pub mod endpoints;
pub mod render;
pub mod script;

pub use endpoints::*;
pub use render::{render, AdMarkup, AdRole, RenderedAd, DISCLOSURE_LABEL};
pub use script::ScriptGate;

/// State of a slot across one delivery. Transitions are one-way: a session
/// runs Loading into exactly one of the other states and stays there.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// Initial; the caller shows a skeleton placeholder.
    Loading,
    /// The ad fetch failed. Renders nothing; the failure is only logged.
    Failed,
    /// No eligible ads for the position. Renders nothing.
    Empty,
    /// One or more ads delivered; one impression was tracked per ad.
    Ready,
}

/// One delivery of a page slot: fetches the eligible ads for its position,
/// renders them, and tracks an impression per delivered ad on the transition
/// into `Ready`.
#[derive(Debug)]
pub struct SlotSession {
    position: AdPosition,
    state: SlotState,
    payloads: Vec<RenderedAd>,
    initialized: HashSet<AdvertisementId>,
}

impl SlotSession {
    pub fn new(position: AdPosition) -> SlotSession {
        SlotSession {
            position,
            state: SlotState::Loading,
            payloads: vec![],
            initialized: HashSet::new(),
        }
    }

    pub fn position(&self) -> AdPosition {
        self.position
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    pub fn payloads(&self) -> &[RenderedAd] {
        &self.payloads
    }

    /// Runs the delivery. Only the first call does anything; a session never
    /// re-fetches.
    #[tracing::instrument(skip(self, db, gate), fields(position = ?self.position))]
    pub async fn deliver(&mut self, db: &dyn Database, gate: &ScriptGate) {
        if self.state != SlotState::Loading {
            return;
        }

        let advertisements = match manager::active_advertisements(db, Some(self.position)).await
        {
            Ok(advertisements) => advertisements,
            Err(err) => {
                warn!("slot delivery failed for {:?}: {}", self.position, err);
                self.state = SlotState::Failed;
                return;
            }
        };

        if advertisements.is_empty() {
            self.state = SlotState::Empty;
            return;
        }

        for advertisement in &advertisements {
            manager::track_impression(db, advertisement.id).await;
        }

        self.payloads = advertisements.iter().map(render::render).collect();
        self.state = SlotState::Ready;

        if gate.is_ready() {
            self.initialize_scripts(gate);
        }
    }

    /// Initializes third-party script payloads once the gate reports ready.
    /// Each ad is initialized at most once; repeat calls find the marker set
    /// and skip. Returns how many ads were initialized by this call.
    pub fn initialize_scripts(&mut self, gate: &ScriptGate) -> usize {
        if self.state != SlotState::Ready || !gate.is_ready() {
            return 0;
        }

        let mut count = 0;
        for payload in &self.payloads {
            if let AdMarkup::Script { .. } = payload.markup {
                if self.initialized.insert(payload.advertisement_id) {
                    count += 1;
                }
            }
        }
        count
    }
}

/// Defers a slot's delivery until its placeholder first becomes visible.
/// Until then the slot reports `Loading`, the same placeholder state a
/// freshly delivered session starts in, so the two waiting phases look
/// identical to the caller.
#[derive(Debug)]
pub struct LazySlot {
    position: AdPosition,
    session: Option<SlotSession>,
}

impl LazySlot {
    pub fn new(position: AdPosition) -> LazySlot {
        LazySlot {
            position,
            session: None,
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.session.is_some()
    }

    pub fn state(&self) -> SlotState {
        self.session
            .as_ref()
            .map_or(SlotState::Loading, SlotSession::state)
    }

    pub fn payloads(&self) -> &[RenderedAd] {
        self.session
            .as_ref()
            .map_or(&[], SlotSession::payloads)
    }

    /// First visibility signal: mounts the session and delivers. Later
    /// signals are ignored; the slot never unmounts on scroll-out.
    #[tracing::instrument(skip(self, db, gate), fields(position = ?self.position))]
    pub async fn reveal(&mut self, db: &dyn Database, gate: &ScriptGate) {
        if self.session.is_some() {
            return;
        }

        let mut session = SlotSession::new(self.position);
        session.deliver(db, gate).await;
        self.session = Some(session);
    }
}
