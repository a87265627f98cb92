/// Fuzzes the search by checking for many random grids that a path is found exactly when the
/// end is reachable by being part of the same connected component, and that every found path
/// only uses moves present in the adjacency.
use grid_astar::{chebyshev_distance, AstarSolver, CellState, Outcome, PathingGrid};
use grid_util::point::Point;
use rand::prelude::*;

fn random_grid(n: usize, rng: &mut StdRng) -> PathingGrid {
    let mut pathing_grid = PathingGrid::new(n, 10).unwrap();
    for x in 0..n as i32 {
        for y in 0..n as i32 {
            if rng.gen_bool(0.4) {
                pathing_grid.set_barrier(Point::new(x, y)).unwrap();
            }
        }
    }
    pathing_grid
}

fn visualize_grid(grid: &PathingGrid) {
    print!("{}", grid);
}

#[test]
fn fuzz() {
    const N: usize = 10;
    const N_GRIDS: usize = 5000;
    let mut rng = StdRng::seed_from_u64(0);
    let solver = AstarSolver::new();
    let start = Point::new(0, 0);
    let end = Point::new(N as i32 - 1, N as i32 - 1);
    for _ in 0..N_GRIDS {
        let mut random_grid = random_grid(N, &mut rng);
        random_grid.set_start(start).unwrap();
        random_grid.set_end(end).unwrap();
        random_grid.recompute_neighbours();
        let reachable = random_grid.reachable(&start, &end);
        let outcome = solver.find_path(&mut random_grid).unwrap();
        // Show the grid if a path is not found
        if outcome.is_found() != reachable {
            visualize_grid(&random_grid);
        }
        assert_eq!(outcome.is_found(), reachable);
        match outcome {
            Outcome::Found(path) => {
                assert_eq!(path[0], start);
                assert_eq!(path[path.len() - 1], end);
                assert!(path.len() as i32 - 1 >= chebyshev_distance(&start, &end));
                for step in path.windows(2) {
                    assert!(random_grid
                        .neighbours(step[0])
                        .unwrap()
                        .any(|n| n == step[1]));
                }
                for p in &path[1..path.len() - 1] {
                    assert_eq!(random_grid.state(*p).unwrap(), CellState::Path);
                }
            }
            Outcome::NoPath => {
                assert!(!random_grid.cell(end).unwrap().is_scored());
            }
            Outcome::Aborted => unreachable!("search was never cancelled"),
        }
    }
}

#[test]
fn fuzz_open_grid_distance() {
    const N: usize = 12;
    const N_PAIRS: usize = 500;
    let mut rng = StdRng::seed_from_u64(1);
    let solver = AstarSolver::new();
    for _ in 0..N_PAIRS {
        let mut grid = PathingGrid::new(N, 10).unwrap();
        let start = Point::new(rng.gen_range(0..N as i32), rng.gen_range(0..N as i32));
        let end = Point::new(rng.gen_range(0..N as i32), rng.gen_range(0..N as i32));
        if start == end {
            continue;
        }
        grid.set_start(start).unwrap();
        grid.set_end(end).unwrap();
        grid.recompute_neighbours();
        let outcome = solver.find_path(&mut grid).unwrap();
        let path = outcome.path().unwrap();
        assert_eq!(path.len() as i32 - 1, chebyshev_distance(&start, &end));
    }
}
