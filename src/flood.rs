//! Corner-seeded flood fill that erases connected background.
//!
//! Seeds are the four image corners. Propagation is a breadth-first walk over
//! 4-connected neighbors that only continues through pixels the
//! [`Classifier`] accepts, so background-colored islands enclosed by logo
//! pixels survive.

use std::collections::VecDeque;

use image::{Rgba, RgbaImage};

use crate::classifier::Classifier;

/// Value written to every erased pixel.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Pixels already classified during a single run.
///
/// Dense bitmap over the grid; membership only ever grows.
#[derive(Debug, Clone)]
pub struct VisitedSet {
    width: u32,
    cells: Vec<bool>,
    len: usize,
}

impl VisitedSet {
    /// Create an empty set covering a `width x height` grid.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            cells: vec![false; width as usize * height as usize],
            len: 0,
        }
    }

    /// Whether `(x, y)` has been visited.
    #[must_use]
    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.cells[self.index(x, y)]
    }

    /// Mark `(x, y)` visited. Returns `false` if it already was.
    #[inline]
    pub fn insert(&mut self, x: u32, y: u32) -> bool {
        let idx = self.index(x, y);
        if self.cells[idx] {
            return false;
        }
        self.cells[idx] = true;
        self.len += 1;
        true
    }

    /// Number of visited coordinates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been visited yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Counters describing one background removal run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalStats {
    /// Corners accepted as flood seeds (at most 4, fewer for degenerate sizes).
    pub seeds: usize,
    /// Pixels overwritten with full transparency.
    pub erased: usize,
    /// Pixels classified, whether accepted or not.
    pub visited: usize,
}

/// Pick the corner seeds, erasing and marking each accepted one.
///
/// Corners are tried in the order top-left, top-right, bottom-left,
/// bottom-right. A corner that coincides with one already visited (1-pixel
/// wide or tall images) is skipped.
pub fn select_seeds(
    image: &mut RgbaImage,
    classifier: &Classifier,
    visited: &mut VisitedSet,
) -> VecDeque<(u32, u32)> {
    let (width, height) = image.dimensions();
    let mut queue = VecDeque::new();
    if width == 0 || height == 0 {
        return queue;
    }

    let corners = [
        (0, 0),
        (width - 1, 0),
        (0, height - 1),
        (width - 1, height - 1),
    ];

    for (x, y) in corners {
        if visited.contains(x, y) {
            continue;
        }
        if classifier.is_background(image.get_pixel(x, y)) {
            image.put_pixel(x, y, TRANSPARENT);
            visited.insert(x, y);
            queue.push_back((x, y));
        }
    }

    queue
}

/// Breadth-first propagation from the seeds in `queue`.
///
/// Each neighbor is classified against its current value the first time it is
/// reached. Accepted neighbors are erased and enqueued; rejected ones are only
/// marked visited, which stops the walk at logo edges.
///
/// Returns the number of coordinates dequeued.
pub fn propagate(
    image: &mut RgbaImage,
    classifier: &Classifier,
    visited: &mut VisitedSet,
    queue: &mut VecDeque<(u32, u32)>,
) -> usize {
    let (width, height) = image.dimensions();
    let mut processed = 0;

    while let Some((x, y)) = queue.pop_front() {
        processed += 1;

        let neighbors = [
            x.checked_sub(1).map(|nx| (nx, y)),
            (x + 1 < width).then_some((x + 1, y)),
            y.checked_sub(1).map(|ny| (x, ny)),
            (y + 1 < height).then_some((x, y + 1)),
        ];

        for (nx, ny) in neighbors.into_iter().flatten() {
            if !visited.insert(nx, ny) {
                continue;
            }
            if classifier.is_background(image.get_pixel(nx, ny)) {
                image.put_pixel(nx, ny, TRANSPARENT);
                queue.push_back((nx, ny));
            }
        }
    }

    processed
}

/// Erase all background connected to the image corners, in place.
pub fn remove_background(image: &mut RgbaImage, classifier: &Classifier) -> RemovalStats {
    let mut visited = VisitedSet::new(image.width(), image.height());
    let mut queue = select_seeds(image, classifier, &mut visited);
    let seeds = queue.len();
    let erased = propagate(image, classifier, &mut visited, &mut queue);

    RemovalStats {
        seeds,
        erased,
        visited: visited.len(),
    }
}
