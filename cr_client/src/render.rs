//! ASCII board rendering.
//!
//! Rows are printed top to bottom in the pinned row-major order (index 0 at
//! the top-left); empty squares show their index so interactive players can
//! type either notation.

use std::io::{Write, stdout};

use anyhow::Result;
use chess_relay::{
    game::{BOARD_WIDTH, Square},
    messages::Snapshot,
};
use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};

/// Clear the terminal and draw a full snapshot.
pub fn draw(snapshot: &Snapshot) -> Result<()> {
    execute!(stdout(), Clear(ClearType::All))?;

    for row in 0..BOARD_WIDTH {
        let line: Vec<String> = (0..BOARD_WIDTH)
            .map(|col| {
                let index = row * BOARD_WIDTH + col;
                let square = Square::new(index).expect("index in range");
                match snapshot.board.get(square) {
                    Some(piece) => format!(" {}", piece.glyph()),
                    None => format!("{index:02}"),
                }
            })
            .collect();
        let line = line.join(" | ");
        println!(" {line}");
        if row < BOARD_WIDTH - 1 {
            println!("{}", "-".repeat(line.len() + 1));
        }
    }

    println!();
    println!("status: {} | turn: {}", snapshot.status, snapshot.turn);
    stdout().flush()?;
    Ok(())
}
