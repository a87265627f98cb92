use grid_astar::{AstarSolver, Outcome, PathingGrid};
use grid_util::point::Point;

// In this example a path is found on a 12x12 grid with shape
//  ____________
// |S           |
// |            |
// |        #   |
// |        #   |
// |        #   |
// |######  #   |
// |     #  #   |
// |     #  #   |
// |     #  #   |
// |     #  #   |
// |     #  #   |
// |     #  #  E|
//  ____________
// where
// - # marks a barrier
// - S marks the start
// - E marks the end
//
// The grid is redrawn after every expansion, showing the frontier (o), the closed set (x)
// and finally the path (*). Run with RUST_LOG=info to see the search log.

const SIZE: i32 = 12;

fn main() {
    env_logger::init();
    let mut pathing_grid = PathingGrid::new(SIZE as usize, 10).expect("grid is not empty");
    for y in 0..6 {
        pathing_grid.set_barrier(Point::new(5, y)).unwrap();
    }
    for x in 5..SIZE {
        pathing_grid.set_barrier(Point::new(x, 5)).unwrap();
    }
    for x in 2..SIZE {
        pathing_grid.set_barrier(Point::new(x, 8)).unwrap();
    }
    pathing_grid.set_start(Point::new(0, 0)).unwrap();
    pathing_grid.set_end(Point::new(SIZE - 1, SIZE - 1)).unwrap();
    pathing_grid.recompute_neighbours();

    let mut frame = 0;
    let outcome = AstarSolver::new()
        .solve(
            &mut pathing_grid,
            || false,
            |grid| {
                frame += 1;
                println!("Frame {frame}:\n{grid}");
            },
        )
        .unwrap();

    match outcome {
        Outcome::Found(path) => {
            println!("Path of {} steps:", path.len() - 1);
            for p in path {
                println!("{:?}", p);
            }
        }
        Outcome::NoPath => println!("No path exists"),
        Outcome::Aborted => println!("Search aborted"),
    }
}
