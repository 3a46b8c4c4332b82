use std::collections::{BTreeMap, VecDeque};

use verdure_geom::Vec2;
use verdure_world::TreeKey;
use verdure_world::streaming::Edge;

pub enum Event {
    // Time housekeeping
    Tick,

    // Avatar
    Jumped { anchor: Vec2 },
    EnergyChanged { energy: i32 },
    FruitEaten { tree: TreeKey, index: usize },

    // Streaming
    WindowShifted { edge: Edge, min: f32, max: f32, frontier: bool },

    // Flora
    FruitRegrown { count: usize },
}

pub struct EventEnvelope {
    pub id: u64,
    pub tick: u64,
    pub kind: Event,
}

/// Frame-bucketed FIFO. Events emitted during a frame are drained in the same
/// frame; anything left undrained is served first on the next tick.
pub struct EventQueue {
    // map of tick -> FIFO queue of events
    by_tick: BTreeMap<u64, VecDeque<EventEnvelope>>,
    pub now: u64,
    next_id: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self {
            by_tick: BTreeMap::new(),
            now: 0,
            next_id: 1,
        }
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn emit_now(&mut self, kind: Event) -> u64 {
        let id = self.alloc_id();
        let tick = self.now;
        let env = EventEnvelope { id, tick, kind };
        self.by_tick.entry(tick).or_default().push_back(env);
        id
    }

    pub fn pop_ready(&mut self) -> Option<EventEnvelope> {
        self.by_tick
            .get_mut(&self.now)
            .and_then(|q| q.pop_front())
    }

    pub fn advance_tick(&mut self) {
        // Anything left in the current bucket was never drained; carry it over.
        if let Some(left) = self.by_tick.remove(&self.now) {
            if !left.is_empty() {
                let next = self.now.wrapping_add(1);
                let dst = self.by_tick.entry(next).or_default();
                for env in left.into_iter().rev() {
                    dst.push_front(env);
                }
            }
        }
        self.now = self.now.wrapping_add(1);
    }
}

pub fn log_event(tick: u64, ev: &Event) {
    match ev {
        Event::Tick => {
            log::trace!(target: "events", "[tick {}] Tick", tick);
        }
        Event::Jumped { anchor } => {
            log::debug!(target: "events", "[tick {}] Jumped anchor=({}, {})", tick, anchor.x, anchor.y);
        }
        Event::EnergyChanged { energy } => {
            log::trace!(target: "events", "[tick {}] EnergyChanged energy={}", tick, energy);
        }
        Event::FruitEaten { tree, index } => {
            log::debug!(target: "events", "[tick {}] FruitEaten tree={} index={}", tick, tree, index);
        }
        Event::WindowShifted {
            edge,
            min,
            max,
            frontier,
        } => {
            log::info!(
                target: "events",
                "[tick {}] WindowShifted edge={:?} window=[{}, {}] frontier={}",
                tick,
                edge,
                min,
                max,
                frontier
            );
        }
        Event::FruitRegrown { count } => {
            log::debug!(target: "events", "[tick {}] FruitRegrown count={}", tick, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_current_tick_in_order() {
        let mut q = EventQueue::new();
        q.emit_now(Event::EnergyChanged { energy: 1 });
        q.emit_now(Event::EnergyChanged { energy: 2 });
        let a = q.pop_ready().unwrap();
        let b = q.pop_ready().unwrap();
        assert!(a.id < b.id);
        assert!(matches!(a.kind, Event::EnergyChanged { energy: 1 }));
        assert!(q.pop_ready().is_none());
    }

    #[test]
    fn undrained_events_carry_over_ahead_of_new_ones() {
        let mut q = EventQueue::new();
        q.emit_now(Event::Tick);
        q.emit_now(Event::FruitRegrown { count: 3 });
        assert!(matches!(q.pop_ready().unwrap().kind, Event::Tick));
        q.advance_tick();
        q.emit_now(Event::EnergyChanged { energy: 7 });
        let carried = q.pop_ready().unwrap();
        assert_eq!(carried.tick, 0);
        assert!(matches!(carried.kind, Event::FruitRegrown { count: 3 }));
        let fresh = q.pop_ready().unwrap();
        assert_eq!(fresh.tick, 1);
        assert!(q.pop_ready().is_none());
    }

    #[test]
    fn empty_tick_advances_cleanly() {
        let mut q = EventQueue::new();
        q.advance_tick();
        q.advance_tick();
        assert_eq!(q.now, 2);
        assert!(q.pop_ready().is_none());
    }
}
