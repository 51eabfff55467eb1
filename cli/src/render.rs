use sapper_core::{CellView, GameSession, MineLayout, SessionState};

pub fn state_label(state: SessionState) -> &'static str {
    use SessionState::*;
    match state {
        NotStarted => "ready",
        InProgress => "playing",
        Won => "won",
        Lost => "lost",
    }
}

fn cell_symbol(view: CellView) -> char {
    match view {
        CellView::Hidden => '.',
        CellView::Marked => 'F',
        CellView::Mine => '*',
        CellView::Revealed(0) => ' ',
        CellView::Revealed(count) => char::from(b'0' + count),
    }
}

/// Text grid with column numbers on top and row numbers on the left.
pub fn board<L: MineLayout>(session: &GameSession<L>) -> String {
    let (width, height) = session.config().size;
    let mut out = String::new();

    out.push_str("   ");
    for x in 0..width {
        out.push_str(&format!("{x:>3}"));
    }
    out.push('\n');

    for y in 0..height {
        out.push_str(&format!("{y:>3}"));
        for x in 0..width {
            let symbol = session.view((x, y)).map_or('?', cell_symbol);
            out.push_str(&format!("{symbol:>3}"));
        }
        out.push('\n');
    }
    out
}

pub fn status<L: MineLayout>(session: &GameSession<L>) -> String {
    format!(
        "[{}] {} | time {}s | mines left {} | hints {}",
        session.difficulty(),
        state_label(session.state()),
        session.elapsed(),
        session.mines_left(),
        session.hints_used(),
    )
}
