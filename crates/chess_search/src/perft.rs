use crate::{board::Position, movegen::legal_moves_into, moves::Move};

/// Count the leaf nodes of the legal move tree below `pos` at `depth`.
pub fn perft(pos: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut scratch = pos.clone();
    let mut layers = vec![Vec::with_capacity(64); depth as usize];
    count(&mut scratch, &mut layers[..])
}

/// Per-root-move node counts, in generation order.
pub fn perft_divide(pos: &Position, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let mut scratch = pos.clone();
    let mut roots = Vec::with_capacity(64);
    legal_moves_into(&mut scratch, &mut roots);

    let mut layers = vec![Vec::with_capacity(64); depth as usize - 1];
    roots
        .into_iter()
        .map(|mv| {
            let undo = scratch.make_move(mv);
            let nodes = count(&mut scratch, &mut layers[..]);
            scratch.unmake_move(mv, undo);
            (mv, nodes)
        })
        .collect()
}

// One move buffer per remaining ply.
fn count(pos: &mut Position, layers: &mut [Vec<Move>]) -> u64 {
    let Some((buf, rest)) = layers.split_first_mut() else {
        return 1;
    };

    legal_moves_into(pos, buf);
    if rest.is_empty() {
        return buf.len() as u64;
    }

    let mut nodes = 0u64;
    for i in 0..buf.len() {
        let mv = buf[i];
        let undo = pos.make_move(mv);
        nodes += count(pos, rest);
        pos.unmake_move(mv, undo);
    }
    nodes
}
