//! SVG rendering of a projected position.

use std::fmt::{self, Write};

use shakmaty::{Color, File, Piece, Position, Rank, Role, Square};

use crate::projector::Projection;

pub const SQUARE_SIZE: u32 = 60;
pub const BOARD_PIXEL: u32 = SQUARE_SIZE * 8;

const LIGHT_SQUARE: &str = "#e9d2ee";
const DARK_SQUARE: &str = "#7d1336";
const HIGHLIGHT_FROM: &str = "#f7ec6e";
const HIGHLIGHT_TO: &str = "#f1c40f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Highlight the origin square of the last move as well as its destination.
    pub show_origin: bool,
    /// Draw file letters and rank digits along the edges.
    pub coordinates: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_origin: true,
            coordinates: true,
        }
    }
}

fn glyph(piece: Piece) -> char {
    match (piece.color, piece.role) {
        (Color::White, Role::Pawn) => '♙',
        (Color::White, Role::Knight) => '♘',
        (Color::White, Role::Bishop) => '♗',
        (Color::White, Role::Rook) => '♖',
        (Color::White, Role::Queen) => '♕',
        (Color::White, Role::King) => '♔',
        (Color::Black, Role::Pawn) => '♟',
        (Color::Black, Role::Knight) => '♞',
        (Color::Black, Role::Bishop) => '♝',
        (Color::Black, Role::Rook) => '♜',
        (Color::Black, Role::Queen) => '♛',
        (Color::Black, Role::King) => '♚',
    }
}

/// Top-left pixel of `sq`, White at the bottom.
fn square_to_coord(sq: Square) -> (u32, u32) {
    let x = u32::from(sq.file()) * SQUARE_SIZE;
    let y = (7 - u32::from(sq.rank())) * SQUARE_SIZE;
    (x, y)
}

pub fn render_svg(projection: &Projection, options: RenderOptions) -> String {
    let mut out = String::with_capacity(8 * 1024);
    // Writing into a String cannot fail.
    let _ = write_svg(&mut out, projection, options);
    out
}

fn write_svg(out: &mut String, projection: &Projection, options: RenderOptions) -> fmt::Result {
    let board = projection.position.board();
    let (from, to) = match &projection.last_move {
        Some(last) => (last.from.filter(|_| options.show_origin), Some(last.to)),
        None => (None, None),
    };

    write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {BOARD_PIXEL} {BOARD_PIXEL}" width="{BOARD_PIXEL}" height="{BOARD_PIXEL}">"#
    )?;

    for rank in (0..8u32).rev() {
        for file in 0..8u32 {
            let sq = Square::from_coords(File::new(file), Rank::new(rank));
            let (x, y) = square_to_coord(sq);

            let fill = if Some(sq) == to {
                HIGHLIGHT_TO
            } else if Some(sq) == from {
                HIGHLIGHT_FROM
            } else if (file + rank) % 2 == 0 {
                DARK_SQUARE
            } else {
                LIGHT_SQUARE
            };
            write!(
                out,
                r#"<rect class="square square-{sq}" x="{x}" y="{y}" width="{SQUARE_SIZE}" height="{SQUARE_SIZE}" fill="{fill}"/>"#
            )?;

            if let Some(piece) = board.piece_at(sq) {
                write!(
                    out,
                    r#"<text x="{}" y="{}" font-size="{}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
                    x + SQUARE_SIZE / 2,
                    y + SQUARE_SIZE / 2,
                    SQUARE_SIZE * 4 / 5,
                    glyph(piece)
                )?;
            }
        }
    }

    if options.coordinates {
        for i in 0..8u32 {
            let file = File::new(i);
            write!(
                out,
                r#"<text class="coord" x="{}" y="{}" font-size="11">{}</text>"#,
                i * SQUARE_SIZE + SQUARE_SIZE - 10,
                BOARD_PIXEL - 3,
                file.char()
            )?;
            let rank = Rank::new(i);
            write!(
                out,
                r#"<text class="coord" x="2" y="{}" font-size="11">{}</text>"#,
                (7 - i) * SQUARE_SIZE + 12,
                rank.char()
            )?;
        }
    }

    out.push_str("</svg>");
    Ok(())
}
