//! Computer vs computer game on the console

use chess_duel_core::{AiPlayer, Color, Difficulty, Game, MemoryStore, SessionContext};
use rand::rngs::StdRng;
use rand::SeedableRng;

const MAX_PLIES: usize = 300;

fn main() {
    let mut args = std::env::args().skip(1);
    let white = parse_difficulty(args.next(), Difficulty::Hard);
    let black = parse_difficulty(args.next(), Difficulty::Medium);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    println!("Self-play: white={} black={} seed={}", white, black, seed);
    println!();

    let mut rng = StdRng::seed_from_u64(seed);
    let players = [
        AiPlayer::new(Color::White, white),
        AiPlayer::new(Color::Black, black),
    ];
    let mut game = Game::new();
    let mut store = MemoryStore::default();
    let mut session = SessionContext::new();

    while !game.is_over() && game.notation().len() < MAX_PLIES {
        let player = &players[match game.turn() {
            Color::White => 0,
            Color::Black => 1,
        }];
        match player.play(&mut game, &mut rng) {
            Ok(Some(outcome)) => {
                let ply = game.notation().len();
                if ply % 2 == 1 {
                    print!("{:>3}. {:<8}", ply.div_ceil(2), outcome.notation);
                } else {
                    println!("{:<8} ({})", outcome.notation, outcome.quality.as_str());
                }
            }
            Ok(None) => break,
            Err(e) => {
                eprintln!("Engine error: {}", e);
                std::process::exit(1);
            }
        }
        let events = game.drain_events();
        if let Err(e) = session.handle_events(&events, game.is_ranked(), &mut store) {
            eprintln!("Rating error: {}", e);
        }
    }

    println!();
    println!();
    println!("{}", game.board());
    println!();
    match game.winner() {
        Some(winner) => println!("Result: {}", winner),
        None => println!("Stopped after {} plies", game.notation().len()),
    }
    println!(
        "Material: white +{} / black +{}",
        game.score(Color::White),
        game.score(Color::Black)
    );
    if let Some(change) = session.last_change() {
        let record = session.record();
        println!(
            "Ratings: white {} ({:+}), black {} ({:+})",
            record.white_elo, change.white, record.black_elo, change.black
        );
    }
}

fn parse_difficulty(arg: Option<String>, default: Difficulty) -> Difficulty {
    match arg {
        Some(s) => s.parse().unwrap_or_else(|e| {
            eprintln!("{}", e);
            eprintln!("Usage: selfplay [white-difficulty] [black-difficulty] [seed]");
            std::process::exit(1);
        }),
        None => default,
    }
}
