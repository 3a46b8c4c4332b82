use verdure_geom::{Aabb, Vec2};

/// 2D camera that keeps a fixed offset from the tracked point.
pub struct Camera {
    pub offset: Vec2,
    pub window: Vec2,
    center: Vec2,
}

impl Camera {
    pub fn new(offset: Vec2, window: Vec2, target: Vec2) -> Self {
        Self {
            offset,
            window,
            center: target + offset,
        }
    }

    pub fn follow(&mut self, target: Vec2) {
        self.center = target + self.offset;
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn top_left(&self) -> Vec2 {
        self.center - self.window / 2.0
    }

    pub fn view(&self) -> Aabb {
        Aabb::from_center(self.center, self.window)
    }

    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        p - self.top_left()
    }

    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        p + self.top_left()
    }
}
