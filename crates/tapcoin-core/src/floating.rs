//! Floating "+N" coins spawned by taps.
//!
//! The renderer owns the animation and tells us when a coin is done via
//! [`FloatingEventQueue::expire`], which may arrive at any time, more than
//! once, or after the session moved on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long the float animation runs before the renderer expires a coin.
pub const FLOAT_LIFETIME: Duration = Duration::from_millis(800);

/// Half the coin sprite size; the sprite is centred on the tap.
const SPRITE_HALF_PX: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinId(pub u64);

impl std::fmt::Display for CoinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingCoinEvent {
    pub id: CoinId,
    pub x: f64,
    pub y: f64,
    /// Increment shown on the coin.
    pub amount: u64,
}

impl FloatingCoinEvent {
    /// Top-left corner of the sprite.
    pub fn render_origin(&self) -> (f64, f64) {
        (self.x - SPRITE_HALF_PX, self.y - SPRITE_HALF_PX)
    }

    pub fn label(&self) -> String {
        format!("+{}", self.amount)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FloatingEventQueue {
    live: Vec<FloatingCoinEvent>,
    last_id: Option<u64>,
}

impl FloatingEventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a coin at `(x, y)`.
    ///
    /// Ids come from the spawn time in epoch milliseconds; taps landing in the
    /// same millisecond (or a clock stepping backwards) are bumped past the
    /// last issued id so ids stay unique and increasing.
    pub fn enqueue(&mut self, x: f64, y: f64, amount: u64, now: DateTime<Utc>) -> CoinId {
        let stamp = now.timestamp_millis().max(0) as u64;
        let id = match self.last_id {
            Some(last) if stamp <= last => last + 1,
            _ => stamp,
        };
        self.last_id = Some(id);
        let id = CoinId(id);
        self.live.push(FloatingCoinEvent { id, x, y, amount });
        id
    }

    /// Remove a coin. Returns `false` when it was already gone.
    pub fn expire(&mut self, id: CoinId) -> bool {
        let before = self.live.len();
        self.live.retain(|coin| coin.id != id);
        self.live.len() != before
    }

    pub fn live(&self) -> &[FloatingCoinEvent] {
        &self.live
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn enqueue_then_expire_leaves_queue_empty() {
        let mut queue = FloatingEventQueue::new();
        let id = queue.enqueue(10.0, 20.0, 420, now());
        assert_eq!(queue.len(), 1);
        assert!(queue.expire(id));
        assert!(queue.is_empty());
    }

    #[test]
    fn expire_unknown_id_is_noop() {
        let mut queue = FloatingEventQueue::new();
        let id = queue.enqueue(0.0, 0.0, 1, now());
        assert!(!queue.expire(CoinId(7)));
        assert_eq!(queue.len(), 1);
        assert!(queue.expire(id));
        assert!(!queue.expire(id));
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn same_millisecond_taps_get_distinct_ids() {
        let mut queue = FloatingEventQueue::new();
        let t = now();
        let a = queue.enqueue(1.0, 1.0, 420, t);
        let b = queue.enqueue(2.0, 2.0, 420, t);
        let c = queue.enqueue(3.0, 3.0, 420, t - chrono::Duration::seconds(1));
        assert!(a < b && b < c);
        assert_eq!(queue.len(), 3);

        queue.expire(b);
        let remaining: Vec<CoinId> = queue.live().iter().map(|e| e.id).collect();
        assert_eq!(remaining, vec![a, c]);
    }

    #[test]
    fn id_is_spawn_timestamp() {
        let mut queue = FloatingEventQueue::new();
        let id = queue.enqueue(0.0, 0.0, 1, now());
        assert_eq!(id.0 as i64, now().timestamp_millis());
    }

    #[test]
    fn sprite_is_centred_on_tap() {
        let mut queue = FloatingEventQueue::new();
        queue.enqueue(100.0, 50.0, 420, now());
        let coin = &queue.live()[0];
        assert_eq!(coin.render_origin(), (70.0, 20.0));
        assert_eq!(coin.label(), "+420");
    }
}
