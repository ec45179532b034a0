use std::collections::{HashMap, HashSet, VecDeque};

use fb_core::layout::{FloorPlan, Tile};

/// Static walkability grid computed once from the floor plan's obstacle
/// rectangles.
#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    blocked: HashSet<Tile>,
}

impl Grid {
    pub fn from_plan(plan: &FloorPlan) -> Self {
        let mut blocked = HashSet::new();
        for obstacle in &plan.obstacles {
            blocked.extend(obstacle.tiles());
        }
        Self {
            width: plan.width,
            height: plan.height,
            blocked,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, tile: Tile) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.width && tile.y < self.height
    }

    pub fn is_blocked(&self, tile: Tile) -> bool {
        self.blocked.contains(&tile)
    }

    /// Shortest path from `start` to `goal` by breadth-first search over
    /// 4-directional neighbors, visited in fixed +x, -x, +y, -y order so
    /// ties always break the same way.
    ///
    /// The goal tile is treated as traversable even when blocked, so a
    /// declared destination is always enterable. Returns `[start]` when the
    /// two tiles are equal, and also when no path exists: a single-tile
    /// "path" to a different goal means "unreachable, stay put". Callers
    /// never see an error.
    pub fn find_path(&self, start: Tile, goal: Tile) -> Vec<Tile> {
        if start == goal {
            return vec![start];
        }

        let mut parent: HashMap<Tile, Option<Tile>> = HashMap::new();
        parent.insert(start, None);
        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if current == goal {
                break;
            }
            let neighbors = [
                Tile::new(current.x + 1, current.y),
                Tile::new(current.x - 1, current.y),
                Tile::new(current.x, current.y + 1),
                Tile::new(current.x, current.y - 1),
            ];
            for next in neighbors {
                if !self.in_bounds(next) {
                    continue;
                }
                if self.is_blocked(next) && next != goal {
                    continue;
                }
                if parent.contains_key(&next) {
                    continue;
                }
                parent.insert(next, Some(current));
                queue.push_back(next);
            }
        }

        if !parent.contains_key(&goal) {
            return vec![start];
        }

        let mut path = Vec::new();
        let mut cursor = Some(goal);
        while let Some(tile) = cursor {
            path.push(tile);
            cursor = parent.get(&tile).copied().flatten();
        }
        path.reverse();
        path
    }
}
