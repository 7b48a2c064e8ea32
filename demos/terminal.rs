use grid_visualizer::{
    cell, Board, Counters, Marker, Markers, Notice, Renderer, RunOutcome, ThreadTicker, Tool,
    Visualizer, COLS, ROWS,
};
use std::io::{self, Write};

// Animates a search in the terminal. Usage:
//
//     cargo run --example terminal [layout-file] [delay-ms]
//
// The layout file uses one line per row with
// - `.` for an empty cell
// - `#` for a wall
// - `S` for the start
// - `G` for the goal
// Without a layout a built-in maze is painted with the drag tools.

struct AnsiRenderer<W: Write> {
    out: W,
}

impl<W: Write> AnsiRenderer<W> {
    fn frame(&mut self, board: &Board, markers: &Markers, counters: Counters) -> io::Result<()> {
        let mut frame = String::from("\x1b[H");
        for row in 0..board.rows() {
            for col in 0..board.cols() {
                let p = cell(row, col);
                let symbol = match (board.state(&p).map(|s| s.symbol()), markers.get(&p)) {
                    (Some('.'), Marker::Visited) => '\u{b7}',
                    (Some('.'), Marker::Path) => '*',
                    (Some(symbol), _) => symbol,
                    (None, _) => ' ',
                };
                frame.push(symbol);
            }
            frame.push('\n');
        }
        frame.push_str(&format!(
            "explored: {:<6} path length: {:<6}\n",
            counters.explored, counters.path_length
        ));
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for AnsiRenderer<W> {
    fn draw(&mut self, board: &Board, markers: &Markers, counters: Counters) {
        // A closed stdout only loses frames
        let _ = self.frame(board, markers, counters);
    }

    fn notify(&mut self, notice: Notice) {
        let _ = writeln!(self.out, "{}", notice);
    }
}

/// Paints rooms separated by walls with doorways, the way a user would with the drag tools.
fn paint_builtin(vis: &mut Visualizer) {
    vis.set_mode(Tool::Wall);
    for (from, to) in [
        (cell(8, 0), cell(8, COLS - 1)),
        (cell(16, 0), cell(16, COLS - 1)),
        (cell(0, 15), cell(ROWS - 1, 15)),
        (cell(0, 30), cell(ROWS - 1, 30)),
    ] {
        vis.press(from);
        let (dx, dy) = ((to.x - from.x).signum(), (to.y - from.y).signum());
        let mut p = from;
        while p != to {
            p.x += dx;
            p.y += dy;
            vis.enter(p);
        }
        vis.release();
    }
    vis.set_mode(Tool::Erase);
    for door in [
        cell(8, 5),
        cell(8, 38),
        cell(16, 25),
        cell(3, 15),
        cell(20, 15),
        cell(12, 30),
    ] {
        vis.press(door);
        vis.release();
    }
    vis.set_mode(Tool::Start);
    vis.press(cell(2, 2));
    vis.release();
    vis.set_mode(Tool::Goal);
    vis.press(cell(22, 42));
    vis.release();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let mut vis = match args.next() {
        Some(path) => {
            let board: Board = std::fs::read_to_string(path)?.parse()?;
            Visualizer::from_board(board)
        }
        None => {
            let mut vis = Visualizer::new();
            paint_builtin(&mut vis);
            vis
        }
    };
    if let Some(delay) = args.next() {
        vis.set_speed(delay.parse()?);
    }

    let mut renderer = AnsiRenderer { out: io::stdout() };
    print!("\x1b[2J");
    let report = vis.run(&mut ThreadTicker, &mut renderer)?;
    println!("speed: {}", vis.speed().label());
    match report.outcome {
        RunOutcome::Found(path) => println!("Path with {} moves:\n{:?}", path.steps(), path.route),
        RunOutcome::NoPath | RunOutcome::Cancelled => {}
    }
    Ok(())
}
