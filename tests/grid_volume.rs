#![allow(clippy::unwrap_used)]

mod common;

use approx::assert_relative_eq;
use meshtree::operations::cell::{CellAssembler, CellShape};
use meshtree::operations::orient::{orient_grid_surface, CellSide, Reversion};
use meshtree::operations::query::{CellVolume, GridVolume, SignedVolume, SurfaceArea};
use meshtree::operations::surface::GridSurface;
use meshtree::topology::MeshStore;

use common::{add_grid, init_tracing};

#[test]
fn unit_cube_end_to_end() {
    init_tracing();
    let mut store = MeshStore::new();
    add_grid(&mut store, [0.0; 3], 1.0, [1, 1, 1]);
    let surface = GridSurface::all().execute(&store).unwrap();
    assert_eq!(surface.len(), 6);

    {
        let mut rev = orient_grid_surface(&mut store, &surface, CellSide::Left).unwrap();
        let v = SignedVolume::new(surface.clone()).execute(&rev).unwrap();
        assert_relative_eq!(v, 1.0, epsilon = 1e-12);

        rev.reverse_all().unwrap();
        let v = SignedVolume::new(surface.clone()).execute(&rev).unwrap();
        assert_relative_eq!(v, -1.0, epsilon = 1e-12);
    }

    let cells = CellAssembler::all().execute(&store).unwrap();
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].shape, CellShape::Hexahedron);
    let mut points = cells[0].points.clone();
    points.sort_unstable();
    points.dedup();
    assert_eq!(points.len(), 8);
}

#[test]
fn grid_volume_and_area() {
    let mut store = MeshStore::new();
    let cells = add_grid(&mut store, [-1.0, 2.0, 0.5], 0.25, [4, 2, 3]);
    let v = GridVolume::all().execute(&store).unwrap();
    assert_relative_eq!(v, 1.0 * 0.5 * 0.75, epsilon = 1e-12);

    let per_cell = CellVolume::new(cells).execute(&store).unwrap();
    assert_relative_eq!(per_cell.iter().sum::<f64>(), v, epsilon = 1e-12);

    let surface = GridSurface::all().execute(&store).unwrap();
    let area = SurfaceArea::new(surface).execute(&store).unwrap();
    assert_relative_eq!(area, 2.0 * (0.5 + 0.75 + 0.375), epsilon = 1e-12);
}

#[test]
fn subset_volume_uses_cut_faces() {
    let mut store = MeshStore::new();
    let cells = add_grid(&mut store, [0.0; 3], 1.0, [3, 1, 1]);
    let v = GridVolume::new(cells[1..].to_vec()).execute(&store).unwrap();
    assert_relative_eq!(v, 2.0, epsilon = 1e-12);
}

#[test]
fn separated_grids_orient_together() {
    let mut store = MeshStore::new();
    add_grid(&mut store, [0.0; 3], 1.0, [2, 2, 2]);
    add_grid(&mut store, [5.0; 3], 0.5, [1, 1, 1]);
    let pieces = GridSurface::all().execute_separated(&store).unwrap();
    assert_eq!(pieces.len(), 2);

    let faces: Vec<_> = pieces.iter().flat_map(|p| p.faces.iter().copied()).collect();
    let rev = Reversion::for_grid_surface(&mut store, &faces, CellSide::Right).unwrap();
    for piece in &pieces {
        let v = SignedVolume::new(piece.faces.clone()).execute(&rev).unwrap();
        assert!(v < 0.0);
    }
}
