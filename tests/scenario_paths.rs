use grid_visualizer::solver::{route_is_walkable, solve, GridContext};
use grid_visualizer::{AstarSolver, Board, SearchEvent};
use grid_visualizer_scenarios::{get_maze, get_maze_names};

#[test]
fn verify_solution_distance_astar() {
    let solver = AstarSolver::new();
    let mut ct = GridContext::new();
    for name in get_maze_names() {
        let (walls, scenarios) = get_maze(&name).unwrap();
        let board = Board::from_walls(&walls);
        for scenario in &scenarios {
            println!(
                "{name}: Start: {}; Goal: {}; Distance: {:?}",
                scenario.start, scenario.goal, scenario.distance
            );
            let event = solve(&solver, &board, &mut ct, scenario.start, scenario.goal);
            match (event, scenario.distance) {
                (SearchEvent::PathFound(path), Some(distance)) => {
                    println!("My distance: {}", path.steps());
                    assert!(route_is_walkable(&board, &path.route));
                    assert!(path.steps() >= distance);
                    if distance > 0 {
                        let delta_dist = (path.steps() - distance) as f64 / distance as f64;
                        assert!(delta_dist < 0.1);
                    }
                }
                (SearchEvent::Failed, None) => {
                    assert!(board.unreachable(&scenario.start, &scenario.goal));
                }
                (event, distance) => panic!("{name}: got {:?} for distance {:?}", event, distance),
            }
        }
    }
}
