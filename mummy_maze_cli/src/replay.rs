use std::{
    io::{self, Write},
    sync::mpsc::Receiver,
    thread::{self, JoinHandle},
    time::Duration,
};

use log::debug;
use mummy_maze_core::{Grid, MazeChanged, MazeState, Tile, render_board};

/// Plays back published maze states at a fixed pace.
#[derive(Debug, Clone, Copy)]
pub struct Replay {
    pace: Duration,
}

impl Replay {
    pub fn new(pace: Duration) -> Self {
        Replay { pace }
    }

    /// Prints `initial` and then every state received on `events`, one per
    /// pacing interval, under a header with the total solution cost.
    ///
    /// The thread ends once every sender has hung up and yields the number
    /// of states shown.
    pub fn play(
        self,
        initial: Grid<Tile>,
        cost: u32,
        events: Receiver<MazeChanged>,
    ) -> JoinHandle<io::Result<usize>> {
        thread::spawn(move || {
            let stdout = io::stdout();
            writeln!(stdout.lock(), "Solution cost: {}", cost)?;
            print_frame(&stdout, 0, "start", &initial)?;

            let mut shown = 1;
            for event in events {
                thread::sleep(self.pace);
                let label = format!("{:?}", event.outcome).to_lowercase();
                print_frame(&stdout, shown, &label, &event.board)?;
                shown += 1;
            }
            debug!("replay stream closed after {} states", shown);
            Ok(shown)
        })
    }

    /// Prints a single state without pacing or cost.
    pub fn show(state: &MazeState) -> io::Result<()> {
        let mut out = io::stdout().lock();
        write!(out, "{}", state)?;
        out.flush()
    }
}

fn print_frame(
    stdout: &io::Stdout,
    step: usize,
    label: &str,
    board: &Grid<Tile>,
) -> io::Result<()> {
    let mut out = stdout.lock();
    writeln!(out, "-- step {} ({}) --", step, label)?;
    write!(out, "{}", render_board(board))?;
    out.flush()
}
