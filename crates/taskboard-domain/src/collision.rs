//! Drop target resolution for drag gestures.
//!
//! Strategies are tried from most to least precise: pointer-within first,
//! then rectangle intersection, then closest corners. The two geometric
//! fallbacks prefer column targets over card targets whenever both collide,
//! which keeps a fast drag from flickering between neighbouring cards.

use crate::{BoardStatus, TaskId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right(), self.top),
            Point::new(self.left, self.bottom()),
            Point::new(self.right(), self.bottom()),
        ]
    }

    /// Edges are inclusive.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let width = self.right().min(other.right()) - self.left.max(other.left);
        let height = self.bottom().min(other.bottom()) - self.top.max(other.top);
        if width > 0.0 && height > 0.0 {
            width * height
        } else {
            0.0
        }
    }
}

/// Something a dragged card can be dropped on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DropTargetId {
    Column(BoardStatus),
    Card(TaskId),
}

impl DropTargetId {
    pub fn is_column(&self) -> bool {
        matches!(self, Self::Column(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Droppable {
    pub id: DropTargetId,
    pub rect: Rect,
}

impl Droppable {
    pub fn new(id: DropTargetId, rect: Rect) -> Self {
        Self { id, rect }
    }
}

/// A collision and the strategy-specific score that ranked it.
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    pub id: DropTargetId,
    pub value: f64,
}

/// Geometry of the dragged item at one pointer-over event.
#[derive(Debug, Clone, Copy)]
pub struct CollisionInput<'a> {
    pub active: Rect,
    /// Absent for keyboard-driven drags.
    pub pointer: Option<Point>,
    pub droppables: &'a [Droppable],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionStrategy {
    PointerWithin,
    RectIntersection,
    ClosestCorners,
}

/// The fallback chain, most precise first.
pub const COLLISION_CHAIN: [CollisionStrategy; 3] = [
    CollisionStrategy::PointerWithin,
    CollisionStrategy::RectIntersection,
    CollisionStrategy::ClosestCorners,
];

fn mean_corner_distance(a: &[Point; 4], b: &[Point; 4]) -> f64 {
    a.iter().zip(b.iter()).map(|(p, q)| p.distance(*q)).sum::<f64>() / 4.0
}

impl CollisionStrategy {
    /// All collisions for this strategy, best first. Equal scores keep
    /// input order.
    pub fn detect(&self, input: &CollisionInput<'_>) -> Vec<Collision> {
        let mut collisions: Vec<Collision> = match self {
            Self::PointerWithin => {
                let Some(pointer) = input.pointer else {
                    return Vec::new();
                };
                input
                    .droppables
                    .iter()
                    .filter(|d| d.rect.contains(pointer))
                    .map(|d| Collision {
                        id: d.id.clone(),
                        value: d.rect.corners().iter().map(|c| c.distance(pointer)).sum::<f64>()
                            / 4.0,
                    })
                    .collect()
            }
            Self::RectIntersection => input
                .droppables
                .iter()
                .filter_map(|d| {
                    let overlap = input.active.intersection_area(&d.rect);
                    let union = d.rect.area() + input.active.area() - overlap;
                    if overlap <= 0.0 || union <= 0.0 {
                        return None;
                    }
                    Some(Collision {
                        id: d.id.clone(),
                        value: overlap / union,
                    })
                })
                .collect(),
            Self::ClosestCorners => {
                let active = input.active.corners();
                input
                    .droppables
                    .iter()
                    .map(|d| Collision {
                        id: d.id.clone(),
                        value: mean_corner_distance(&active, &d.rect.corners()),
                    })
                    .collect()
            }
        };

        match self {
            Self::RectIntersection => collisions.sort_by(|a, b| b.value.total_cmp(&a.value)),
            Self::PointerWithin | Self::ClosestCorners => {
                collisions.sort_by(|a, b| a.value.total_cmp(&b.value))
            }
        }
        collisions
    }

    fn narrows_to_columns(&self) -> bool {
        !matches!(self, Self::PointerWithin)
    }
}

/// Keeps only column targets when at least one collided.
pub fn prefer_columns(collisions: Vec<Collision>) -> Vec<Collision> {
    if collisions.iter().any(|c| c.id.is_column()) {
        collisions.into_iter().filter(|c| c.id.is_column()).collect()
    } else {
        collisions
    }
}

/// Runs the fallback chain and returns the first non-empty result.
pub fn detect_collisions(input: &CollisionInput<'_>) -> Vec<Collision> {
    for strategy in COLLISION_CHAIN {
        let mut collisions = strategy.detect(input);
        if strategy.narrows_to_columns() {
            collisions = prefer_columns(collisions);
        }
        if !collisions.is_empty() {
            tracing::trace!(?strategy, hits = collisions.len(), "collision resolved");
            return collisions;
        }
    }
    Vec::new()
}

/// Best drop target, or `None` when nothing collides (treated as a cancel).
pub fn resolve_drop_target(input: &CollisionInput<'_>) -> Option<DropTargetId> {
    detect_collisions(input).into_iter().next().map(|c| c.id)
}
