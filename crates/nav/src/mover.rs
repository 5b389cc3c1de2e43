use tileworld_common::{RegionCoord, region_of};

/// What happened during one `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepEvent {
    /// Set when the continuous position crossed into a new region; the
    /// caller should feed this into `World::update_streaming`.
    pub crossed_into: Option<RegionCoord>,
    /// The final path tile was reached and the mover returned to idle.
    pub arrived: bool,
}

#[derive(Debug)]
enum MoveState {
    Idle,
    Moving { path: Vec<(i32, i32)>, segment: usize },
}

/// Path-following movement driver with a continuous position.
///
/// State machine: idle -> moving(segment 0..n) -> idle. A new `follow`
/// cancels any in-flight movement and starts from wherever the mover
/// currently is — the position is never snapped to a tile center.
#[derive(Debug)]
pub struct Mover {
    x: f32,
    y: f32,
    /// Movement speed in tiles per second.
    speed: f32,
    state: MoveState,
    region: RegionCoord,
}

impl Mover {
    pub fn new(x: f32, y: f32, speed: f32) -> Self {
        assert!(speed > 0.0, "speed must be positive");
        Self {
            x,
            y,
            speed,
            state: MoveState::Idle,
            region: region_at(x, y),
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.state, MoveState::Moving { .. })
    }

    /// Abandon the current path. Remaining segments are discarded and the
    /// continuous position stays where it is.
    pub fn cancel(&mut self) {
        self.state = MoveState::Idle;
    }

    /// Start following a path (tile coordinates, start tile first). Cancels
    /// any in-flight movement. An empty path is a no-op.
    pub fn follow(&mut self, path: Vec<(i32, i32)>) {
        self.cancel();
        if path.is_empty() {
            return;
        }
        self.state = MoveState::Moving { path, segment: 0 };
    }

    /// Advance the mover by `dt` seconds, walking as many segments as the
    /// time budget covers.
    pub fn advance(&mut self, dt: f32) -> StepEvent {
        let mut event = StepEvent::default();
        let mut budget = dt * self.speed;

        while budget > 0.0 {
            let MoveState::Moving { path, segment } = &mut self.state else {
                break;
            };
            let (tx, ty) = path[*segment];
            let (dx, dy) = (tx as f32 - self.x, ty as f32 - self.y);
            let dist = (dx * dx + dy * dy).sqrt();

            if dist <= budget {
                self.x = tx as f32;
                self.y = ty as f32;
                budget -= dist;
                if *segment + 1 < path.len() {
                    *segment += 1;
                } else {
                    self.state = MoveState::Idle;
                    event.arrived = true;
                }
            } else {
                self.x += dx / dist * budget;
                self.y += dy / dist * budget;
                budget = 0.0;
            }
        }

        let here = region_at(self.x, self.y);
        if here != self.region {
            self.region = here;
            event.crossed_into = Some(here);
        }
        event
    }
}

fn region_at(x: f32, y: f32) -> RegionCoord {
    region_of(x.floor() as i32, y.floor() as i32)
}
