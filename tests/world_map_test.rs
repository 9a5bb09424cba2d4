use std::sync::Arc;
use std::thread;

use rover_perception::PerceptionError;
use rover_perception::types::WorldCell;
use rover_perception::world_map::{MapChannel, SharedWorldGrid, WorldGrid, WorldPoints};

#[test]
fn test_new_grid_is_empty() {
    let grid = WorldGrid::new(50);
    assert_eq!(grid.size(), 50);
    for channel in MapChannel::ALL {
        assert_eq!(grid.channel_total(channel), 0);
        assert_eq!(grid.cells_with_evidence(channel), 0);
    }
}

#[test]
fn test_channel_weights() {
    let mut grid = WorldGrid::new(10);
    let cell = WorldCell::new(3, 4);
    let points = WorldPoints {
        obstacle: vec![cell],
        marker: vec![cell],
        navigable: vec![cell],
    };
    grid.accumulate(&points).unwrap();
    assert_eq!(grid.get(cell, MapChannel::Obstacle), 2);
    assert_eq!(grid.get(cell, MapChannel::Marker), 255);
    assert_eq!(grid.get(cell, MapChannel::Navigable), 2);
    assert_eq!(grid.get(WorldCell::new(4, 3), MapChannel::Marker), 0);
}

#[test]
fn test_repeated_hits_accumulate_in_any_order() {
    let a = WorldCell::new(1, 1);
    let b = WorldCell::new(7, 2);
    let forward = vec![a, b, a, a, b];
    let mut reversed = forward.clone();
    reversed.reverse();

    let mut g0 = WorldGrid::new(10);
    g0.accumulate(&WorldPoints {
        navigable: forward,
        ..Default::default()
    })
    .unwrap();
    let mut g1 = WorldGrid::new(10);
    g1.accumulate(&WorldPoints {
        navigable: reversed,
        ..Default::default()
    })
    .unwrap();

    assert_eq!(g0, g1);
    assert_eq!(g0.get(a, MapChannel::Navigable), 3 * 2);
    assert_eq!(g0.get(b, MapChannel::Navigable), 2 * 2);
}

#[test]
fn test_accumulate_twice_doubles() {
    let points = WorldPoints {
        obstacle: vec![WorldCell::new(0, 0), WorldCell::new(9, 9)],
        marker: vec![WorldCell::new(5, 5)],
        navigable: vec![WorldCell::new(2, 3), WorldCell::new(2, 3)],
    };
    let mut grid = WorldGrid::new(10);
    grid.accumulate(&points).unwrap();
    let once = grid.clone();
    grid.accumulate(&points).unwrap();

    assert_ne!(grid, once);
    for (cell, counts) in grid.iter_cells() {
        for channel in MapChannel::ALL {
            assert_eq!(counts[channel.index()], 2 * once.get(cell, channel));
        }
    }
    assert_eq!(grid.get(WorldCell::new(2, 3), MapChannel::Navigable), 8);
    assert_eq!(grid.get(WorldCell::new(5, 5), MapChannel::Marker), 510);
}

#[test]
fn test_counters_are_uncapped() {
    let cell = WorldCell::new(0, 0);
    let mut grid = WorldGrid::new(2);
    let points = WorldPoints {
        marker: vec![cell; 1000],
        ..Default::default()
    };
    grid.accumulate(&points).unwrap();
    assert_eq!(grid.get(cell, MapChannel::Marker), 255_000);
    assert_eq!(grid.channel_max(MapChannel::Marker), 255_000);
}

#[test]
fn test_iter_cells_layout() {
    let mut grid = WorldGrid::new(3);
    grid.accumulate(&WorldPoints {
        obstacle: vec![WorldCell::new(2, 1)],
        ..Default::default()
    })
    .unwrap();
    let hit: Vec<_> = grid.iter_cells().filter(|(_, c)| c[0] > 0).map(|(cell, _)| cell).collect();
    assert_eq!(hit, vec![WorldCell::new(2, 1)]);
}

#[test]
fn test_out_of_bounds_cell_rejects_whole_frame() {
    let mut grid = WorldGrid::new(10);
    let points = WorldPoints {
        obstacle: vec![WorldCell::new(1, 1), WorldCell::new(2, 2)],
        marker: vec![WorldCell::new(4, 4)],
        navigable: vec![WorldCell::new(3, 3), WorldCell::new(10, 3)],
    };
    let err = grid.accumulate(&points).unwrap_err();
    assert!(matches!(
        err,
        PerceptionError::CellOutOfBounds { cell, size: 10 } if cell == WorldCell::new(10, 3)
    ));
    assert_eq!(grid, WorldGrid::new(10));

    let shared = SharedWorldGrid::new(10);
    assert!(shared.accumulate(&points).is_err());
    assert_eq!(shared.snapshot(), WorldGrid::new(10));
}

#[test]
fn test_shared_grid_applies_whole_frames() {
    let shared = Arc::new(SharedWorldGrid::new(20));
    let points = WorldPoints {
        obstacle: vec![WorldCell::new(1, 1); 50],
        marker: vec![WorldCell::new(2, 2); 50],
        navigable: vec![WorldCell::new(3, 3); 50],
    };
    let writer = {
        let shared = Arc::clone(&shared);
        let points = points.clone();
        thread::spawn(move || {
            for _ in 0..200 {
                shared.accumulate(&points).unwrap();
            }
        })
    };
    for _ in 0..200 {
        let grid = shared.read();
        let frames_obstacle = grid.channel_total(MapChannel::Obstacle) / (50 * 2);
        let frames_marker = grid.channel_total(MapChannel::Marker) / (50 * 255);
        let frames_navigable = grid.channel_total(MapChannel::Navigable) / (50 * 2);
        assert_eq!(frames_obstacle, frames_marker);
        assert_eq!(frames_marker, frames_navigable);
    }
    writer.join().unwrap();

    let grid = Arc::try_unwrap(shared).unwrap().into_inner();
    assert_eq!(grid.get(WorldCell::new(2, 2), MapChannel::Marker), 200 * 50 * 255);
}
