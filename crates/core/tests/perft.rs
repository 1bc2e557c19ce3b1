//! Cross-checks legal move enumeration against shakmaty's move generator.
//! The positions used here have no promotions within the searched depth, so
//! from/to pairs and shakmaty moves count the same.

use chess_duel_core::{Board, Color, EngineConfig, Game, PieceKind};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess};

fn perft(game: &mut Game, depth: u32) -> u64 {
    let moves = game.all_legal_moves(game.turn());
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        let promotion = game
            .board()
            .get(mv.from)
            .filter(|p| p.kind == PieceKind::Pawn && (mv.to.row == 0 || mv.to.row == 7))
            .map(|_| PieceKind::Queen);
        game.perform_move(mv.from, mv.to, promotion).unwrap();
        nodes += perft(game, depth - 1);
        assert!(game.undo());
    }
    nodes
}

fn reference(fen: &str, depth: u32) -> u64 {
    let pos: Chess = fen
        .parse::<Fen>()
        .unwrap()
        .into_position(CastlingMode::Standard)
        .unwrap();
    shakmaty::perft(&pos, depth)
}

fn game_from(fen: &str) -> Game {
    let turn = match fen.split_whitespace().nth(1) {
        Some("b") => Color::Black,
        _ => Color::White,
    };
    Game::from_board(Board::from_placement(fen).unwrap(), turn, &EngineConfig::default())
}

#[test]
fn test_perft_start_position() {
    let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    let mut game = Game::new();
    for depth in 1..=3 {
        assert_eq!(perft(&mut game, depth), reference(fen, depth), "depth {}", depth);
    }
    assert_eq!(perft(&mut game, 3), 8902);
}

#[test]
fn test_perft_castling_heavy_position() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut game = game_from(fen);
    assert_eq!(perft(&mut game, 1), 48);
    assert_eq!(perft(&mut game, 2), reference(fen, 2));
}

#[test]
fn test_perft_en_passant_endgame() {
    let fen = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    let mut game = game_from(fen);
    for depth in 1..=3 {
        assert_eq!(perft(&mut game, depth), reference(fen, depth), "depth {}", depth);
    }
}
