use verdure_ambient::JumpListener;

use super::{Game, Handle, format_energy};
use crate::event::{Event, log_event};
use crate::host::{InputSource, ObjectId, SpatialRegistry};

impl<R: SpatialRegistry, I: InputSource> Game<R, I> {
    pub(super) fn dispatch_events(&mut self) {
        while let Some(env) = self.events.pop_ready() {
            log_event(env.tick, &env.kind);
            match env.kind {
                Event::Jumped { anchor } => {
                    self.stats.jumps += 1;
                    self.rain.on_jump(anchor);
                }
                Event::EnergyChanged { energy } => {
                    self.energy_text = format_energy(energy as f32);
                }
                Event::FruitEaten { .. } => {
                    self.stats.fruits_eaten += 1;
                }
                Event::Tick | Event::WindowShifted { .. } | Event::FruitRegrown { .. } => {}
            }
        }
    }

    /// Collision-enter callback from the host: `other` just started touching
    /// the avatar.
    pub fn on_collision_enter(&mut self, other: ObjectId) {
        match self.scene.handle(other) {
            Some(Handle::Fruit { tree, index }) => {
                if self.world.flora_mut().consume_fruit(tree, index) {
                    self.avatar.eat_fruit();
                    self.events.emit_now(Event::FruitEaten { tree, index });
                    if let Some((_, data)) = self.world.flora().tree(tree) {
                        self.scene.sync_tree(tree, data);
                    }
                }
            }
            Some(Handle::Block { column }) => {
                if let Some(col) = self.world.terrain().column(column) {
                    self.avatar.land_on(col.top);
                }
            }
            _ => {}
        }
    }
}
