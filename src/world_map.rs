use parking_lot::{RwLock, RwLockReadGuard};

use crate::error::{PerceptionError, Result};
use crate::types::WorldCell;

/// Evidence layers of the world map, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapChannel {
    Obstacle = 0,
    Marker = 1,
    Navigable = 2,
}

impl MapChannel {
    pub const ALL: [MapChannel; 3] = [MapChannel::Obstacle, MapChannel::Marker, MapChannel::Navigable];

    /// Per-hit increment. Markers are rare and saturate the display quickly.
    pub const fn weight(self) -> u64 {
        match self {
            MapChannel::Obstacle => 2,
            MapChannel::Marker => 255,
            MapChannel::Navigable => 2,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// World cells hit by one frame, per channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldPoints {
    pub obstacle: Vec<WorldCell>,
    pub marker: Vec<WorldCell>,
    pub navigable: Vec<WorldCell>,
}

impl WorldPoints {
    pub fn channel(&self, channel: MapChannel) -> &[WorldCell] {
        match channel {
            MapChannel::Obstacle => &self.obstacle,
            MapChannel::Marker => &self.marker,
            MapChannel::Navigable => &self.navigable,
        }
    }
}

/// Cumulative `size x size x 3` evidence counters.
///
/// Counters only grow: there is no decay, cap or reset. Any normalization for
/// display happens on the reader side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldGrid {
    size: usize,
    counters: Vec<u64>,
}

impl WorldGrid {
    pub fn new(size: usize) -> WorldGrid {
        WorldGrid {
            size,
            counters: vec![0; size * size * 3],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn offset(&self, cell: WorldCell, channel: MapChannel) -> usize {
        (cell.y * self.size + cell.x) * 3 + channel.index()
    }

    /// Panics if `cell` lies outside the map.
    pub fn get(&self, cell: WorldCell, channel: MapChannel) -> u64 {
        assert!(self.contains(cell), "cell {cell:?} outside map");
        self.counters[self.offset(cell, channel)]
    }

    pub fn contains(&self, cell: WorldCell) -> bool {
        cell.x < self.size && cell.y < self.size
    }

    /// Adds each channel's weight once per point. Repeated cells accumulate.
    ///
    /// Every cell is bounds checked before the first write: a frame with any
    /// cell outside the map is rejected and leaves the counters untouched.
    pub fn accumulate(&mut self, points: &WorldPoints) -> Result<()> {
        let outside = MapChannel::ALL
            .into_iter()
            .flat_map(|channel| points.channel(channel))
            .find(|cell| !self.contains(**cell));
        if let Some(cell) = outside {
            return Err(PerceptionError::CellOutOfBounds {
                cell: *cell,
                size: self.size,
            });
        }
        for channel in MapChannel::ALL {
            let weight = channel.weight();
            for cell in points.channel(channel) {
                let idx = self.offset(*cell, channel);
                self.counters[idx] += weight;
            }
        }
        Ok(())
    }

    pub fn channel_total(&self, channel: MapChannel) -> u64 {
        self.counters.iter().skip(channel.index()).step_by(3).sum()
    }

    pub fn channel_max(&self, channel: MapChannel) -> u64 {
        self.counters
            .iter()
            .skip(channel.index())
            .step_by(3)
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Number of cells with any evidence in `channel`.
    pub fn cells_with_evidence(&self, channel: MapChannel) -> usize {
        self.counters
            .iter()
            .skip(channel.index())
            .step_by(3)
            .filter(|v| **v > 0)
            .count()
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (WorldCell, [u64; 3])> + '_ {
        let size = self.size;
        self.counters.chunks_exact(3).enumerate().map(move |(i, c)| {
            (WorldCell::new(i % size, i / size), [c[0], c[1], c[2]])
        })
    }
}

/// World map shared between the perception loop and its readers.
///
/// Each frame's three-channel update is applied under a single write guard, so
/// readers never see a partially applied frame.
#[derive(Debug)]
pub struct SharedWorldGrid {
    inner: RwLock<WorldGrid>,
}

impl SharedWorldGrid {
    pub fn new(size: usize) -> SharedWorldGrid {
        SharedWorldGrid {
            inner: RwLock::new(WorldGrid::new(size)),
        }
    }

    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    pub fn accumulate(&self, points: &WorldPoints) -> Result<()> {
        let mut grid = self.inner.write();
        grid.accumulate(points)
    }

    pub fn read(&self) -> RwLockReadGuard<'_, WorldGrid> {
        self.inner.read()
    }

    pub fn snapshot(&self) -> WorldGrid {
        self.inner.read().clone()
    }

    pub fn into_inner(self) -> WorldGrid {
        self.inner.into_inner()
    }
}
