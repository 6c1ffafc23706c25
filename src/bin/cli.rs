use clap::Parser;
use mill_engine::config::{PlacingDepth, SearchConfig};
use mill_engine::engine::Engine;
use mill_engine::game::Game;
use mill_engine::position::Position;
use mill_engine::rules::Rules;
use mill_engine::types::{GameOverReason, GameStatus, Occupant, Side, Square};
use mill_engine::worker::SearchWorker;
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[command(name = "mill-engine-cli", about = "Play the mill game against the engine")]
struct Args {
    /// Play Twelve Men's Morris (diagonal lines, 12 pieces)
    #[arg(long)]
    twelve: bool,

    /// Search depth in the moving phase
    #[arg(long, default_value_t = mill_engine::constants::DEFAULT_MOVING_DEPTH)]
    depth: u8,

    /// Search depth in the placing phase; omit for a depth that grows as pieces run out
    #[arg(long)]
    placing_depth: Option<u8>,

    /// Time limit per engine move in milliseconds
    #[arg(long)]
    movetime: Option<u64>,

    /// Transposition table size in MiB (0 disables it)
    #[arg(long, default_value_t = 16)]
    hash_mb: usize,

    /// Shuffle moves of equal standing
    #[arg(long)]
    randomize: bool,

    /// Seed for the shuffle
    #[arg(long)]
    seed: Option<u64>,

    /// Side the engine plays: white, black or none
    #[arg(long, default_value = "black")]
    computer: String,

    /// Start from a position in text notation
    #[arg(long)]
    position: Option<String>,
}

fn format_with_commas(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let len = s.len();

    for (i, ch) in s.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }

    result
}

#[rustfmt::skip]
const BOARD_TEMPLATE: [&str; 14] = [
    " 7  o-----------o-----------o",
    "    |           |           |",
    " 6  |   o-------o-------o   |",
    "    |   |       |       |   |",
    " 5  |   |   o---o---o   |   |",
    "    |   |   |       |   |   |",
    " 4  o---o---o       o---o---o",
    "    |   |   |       |   |   |",
    " 3  |   |   o---o---o   |   |",
    "    |   |       |       |   |",
    " 2  |   o-------o-------o   |",
    "    |           |           |",
    " 1  o-----------o-----------o",
    "    a   b   c   d   e   f   g",
];

/// Points in the order their markers appear in the template
#[rustfmt::skip]
const TEMPLATE_ORDER: [Square; 24] = [
    Square::A7, Square::D7, Square::G7,
    Square::B6, Square::D6, Square::F6,
    Square::C5, Square::D5, Square::E5,
    Square::A4, Square::B4, Square::C4, Square::E4, Square::F4, Square::G4,
    Square::C3, Square::D3, Square::E3,
    Square::B2, Square::D2, Square::F2,
    Square::A1, Square::D1, Square::G1,
];

fn render_board(position: &Position) -> String {
    let mut points = TEMPLATE_ORDER.iter().map(|&square| {
        match position.board.occupant(square) {
            Some(Occupant::White) => 'W',
            Some(Occupant::Black) => 'B',
            Some(Occupant::Banned) => 'X',
            None => 'o',
        }
    });

    let mut out = String::new();
    for (row, line) in BOARD_TEMPLATE.iter().enumerate() {
        for ch in line.chars() {
            // The file legend on the last row is not a point
            if ch == 'o' && row < BOARD_TEMPLATE.len() - 1 {
                out.push(points.next().unwrap_or('o'));
            } else {
                out.push(ch);
            }
        }
        out.push('\n');
    }

    out
}

fn describe_reason(reason: GameOverReason) -> &'static str {
    match reason {
        GameOverReason::LoseNoLegalMoves => "no legal moves",
        GameOverReason::LoseTimeout => "time forfeit",
        GameOverReason::DrawThreefoldRepetition => "threefold repetition",
        GameOverReason::DrawFiftyMove => "N-move rule",
        GameOverReason::DrawEndgameFiftyMove => "endgame N-move rule",
        GameOverReason::LoseFullBoard => "board full",
        GameOverReason::DrawFullBoard => "board full",
        GameOverReason::DrawStalemateCondition => "no legal moves",
        GameOverReason::LoseFewerThanThree => "fewer than three pieces",
        GameOverReason::LoseResign => "resignation",
    }
}

fn read_line() -> Option<String> {
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input),
    }
}

fn prompt(text: &str) {
    print!("{text}");
    let _ = io::stdout().flush();
}

struct Cli {
    rules: Rules,
    game: Game,
    worker: SearchWorker,
    computer_side: Option<Side>,
    display_enabled: bool,
}

impl Cli {
    fn new(args: &Args) -> Result<Self, String> {
        let rules = if args.twelve {
            Rules::twelve_mens_morris()
        } else {
            Rules::nine_mens_morris()
        };

        let config = SearchConfig {
            placing_depth: args
                .placing_depth
                .map_or(PlacingDepth::Dynamic, PlacingDepth::Fixed),
            moving_depth: args.depth,
            randomize_child_order: args.randomize,
            table_size_bytes: args.hash_mb * 1024 * 1024,
            random_seed: args.seed,
            time_limit_ms: args.movetime,
            ..SearchConfig::default()
        };

        let engine = Engine::new(config).map_err(|e| e.to_string())?;

        let game = match &args.position {
            Some(notation) => {
                Game::from_position(Position::from_notation(notation, rules).map_err(|e| e.to_string())?)
            }
            None => Game::new(rules),
        };

        let computer_side = match args.computer.to_lowercase().as_str() {
            "white" | "w" => Some(Side::White),
            "black" | "b" => Some(Side::Black),
            _ => None,
        };

        Ok(Self {
            rules,
            game,
            worker: SearchWorker::new(engine),
            computer_side,
            display_enabled: true,
        })
    }

    fn show_help(&self) {
        println!("\n======================= INFORMATION ======================");
        println!("h or help - Displays help on the commands");
        println!("d or dd   - Displays board and toggles display setting");
        println!("moves     - Displays the list of legal moves");
        println!("pos       - Displays the current position in text notation");
        println!("q or quit - Quits the program");
        println!("================= CONTROLLING THE ENGINE =================");
        println!("new       - Starts a new game");
        println!("p or play - The computer plays the side to move");
        println!("off       - Turns the computer player off");
        println!("undo      - Takes back the last move");
        println!("resign    - Resigns for the side to move");
        println!("===================== CONFIGURATION ======================");
        println!("pos <notation> - Loads a position");
        println!("sd <depth>     - Sets the search depth");
        println!("st <ms>        - Sets the time limit per move in milliseconds");
        println!("======================== MOVES ===========================");
        println!("d5 places, a1-a4 slides or flies, xg7 removes");
    }

    fn display_board(&self) {
        if self.display_enabled {
            let position = self.game.position();
            println!("\n{}", render_board(position));
            println!(
                "In hand: white {} black {}",
                position.pieces_in_hand(Side::White),
                position.pieces_in_hand(Side::Black)
            );
        }
    }

    fn print_status(&mut self, status: GameStatus) {
        if let GameStatus::Over(outcome) = status {
            self.display_board();
            println!("\nGAME OVER");

            match outcome.winner {
                Some(Side::White) => println!("{{White wins by {}}}", describe_reason(outcome.reason)),
                Some(Side::Black) => println!("{{Black wins by {}}}", describe_reason(outcome.reason)),
                None => println!("{{Draw by {}}}", describe_reason(outcome.reason)),
            }

            self.computer_side = None;
        }
    }

    /// Returns whether the engine accepted the new configuration
    fn update_config(&mut self, update: impl FnOnce(&mut SearchConfig)) -> bool {
        let Some(engine) = self.worker.engine_mut() else {
            return false;
        };

        let mut config = engine.config().clone();
        update(&mut config);

        match engine.set_config(config) {
            Ok(()) => true,
            Err(e) => {
                println!("\n{e}");
                false
            }
        }
    }

    fn run_main_loop(&mut self) {
        self.display_board();

        loop {
            println!("\n-------------------------------");
            println!(
                "*   Ply: {} | To move: {:?}   *",
                self.game.moves().len(),
                self.game.position().side
            );
            println!("-------------------------------");

            if !self.game.is_over() && self.computer_side == Some(self.game.position().side) {
                println!("\nComputer is thinking...");
                self.make_computer_move();
                self.display_board();
                continue;
            }

            prompt("\nMove OR command > ");

            let Some(input) = read_line() else {
                return;
            };

            let command = input.trim().to_lowercase();

            match command.as_str() {
                "" => continue,
                "d" => {
                    let enabled = self.display_enabled;
                    self.display_enabled = true;
                    self.display_board();
                    self.display_enabled = enabled;
                    continue;
                }
                "dd" => {
                    self.display_enabled = !self.display_enabled;

                    if self.display_enabled {
                        println!("\nBoard display enabled");
                        self.display_board();
                    } else {
                        println!("\nBoard display disabled");
                    }
                    continue;
                }
                "h" | "help" => {
                    self.show_help();
                    continue;
                }
                "pos" => {
                    println!("\n{}", self.game.position().to_notation());
                    continue;
                }
                "moves" => {
                    let moves: Vec<String> = self
                        .game
                        .position()
                        .legal_moves()
                        .iter()
                        .map(ToString::to_string)
                        .collect();
                    println!("\nLegal moves: {}", moves.join(" "));
                    continue;
                }
                "new" => {
                    self.game = Game::new(self.rules);
                    if let Some(engine) = self.worker.engine_mut() {
                        engine.clear_table();
                    }
                    self.display_board();
                    continue;
                }
                "p" | "play" => {
                    self.computer_side = Some(self.game.position().side);
                    continue;
                }
                "off" => {
                    self.computer_side = None;
                    continue;
                }
                "q" | "quit" => {
                    println!("\nProgram exiting");
                    break;
                }
                "resign" => {
                    let side = self.game.position().side;
                    match self.game.resign(side) {
                        Ok(status) => self.print_status(status),
                        Err(e) => println!("\n{e}"),
                    }
                    continue;
                }
                "undo" => {
                    match self.game.undo() {
                        Some(mv) => {
                            println!("\nTook back {mv}");
                            self.computer_side = None;
                            self.display_board();
                        }
                        None => println!("\nNo moves to undo"),
                    }
                    continue;
                }
                _ => {}
            }

            if let Some(notation) = command.strip_prefix("pos ") {
                match Position::from_notation(notation, self.rules) {
                    Ok(position) => {
                        self.game = Game::from_position(position);
                        self.display_board();
                        println!("Position loaded successfully");
                    }
                    Err(e) => println!("Error loading position: {e}"),
                }
                continue;
            }

            if let Some(depth) = command.strip_prefix("sd ") {
                match depth.trim().parse::<u8>() {
                    Ok(depth) => {
                        let accepted = self.update_config(|config| {
                            config.placing_depth = PlacingDepth::Fixed(depth);
                            config.moving_depth = depth;
                        });
                        if accepted {
                            println!("\nSearch depth set to {depth}");
                        }
                    }
                    Err(_) => println!("\nINVALID DEPTH!"),
                }
                continue;
            }

            if let Some(time) = command.strip_prefix("st ") {
                match time.trim().parse::<u64>() {
                    Ok(time) => {
                        if self.update_config(|config| config.time_limit_ms = Some(time)) {
                            println!("\nSearch time set to {time} ms");
                        }
                    }
                    Err(_) => println!("\nINVALID TIME!"),
                }
                continue;
            }

            match self.game.play_str(&command) {
                Ok(status) => {
                    self.print_status(status);
                    self.display_board();
                }
                Err(e) => println!("\n{e}"),
            }
        }
    }

    fn make_computer_move(&mut self) {
        let position = *self.game.position();

        if let Err(e) = self.worker.start(position, self.game.history_keys()) {
            println!("\n{e}");
            self.computer_side = None;
            return;
        }

        let Some(report) = self.worker.wait() else {
            println!("\nSearch failed");
            self.computer_side = None;
            return;
        };

        let result = report.result;

        let Some(mv) = result.best_move else {
            println!("(No legal moves)");
            self.computer_side = None;
            return;
        };

        let nodes_per_second = match result.time_ms {
            0 => 0,
            ms => ((result.nodes as f64 / ms as f64) * 1000.0) as u64,
        };

        println!("\n┌─────────────────── SEARCH STATISTICS ───────────────────┐");
        println!(
            "│ Time:   {:>10} ms  │  Depth:     {:>4}  Score: {:>7} │",
            format_with_commas(result.time_ms),
            result.depth,
            result.evaluation
        );
        println!(
            "│ Nodes:  {:>13}  │  β-Cutoffs: {:>19} │",
            format_with_commas(result.nodes as u64),
            format_with_commas(result.beta_cutoffs as u64)
        );
        println!(
            "│ NPS:    {:>13}  │  TT hits:   {:>19} │",
            format_with_commas(nodes_per_second),
            format_with_commas(result.tt_hits as u64)
        );
        println!("└─────────────────────────────────────────────────────────┘");

        if result.aborted {
            println!("(search stopped early)");
        }

        println!("\nComputer plays: \x1b[32m{mv}\x1b[0m");

        match self.game.play(mv) {
            Ok(status) => self.print_status(status),
            Err(e) => {
                println!("\n{e}");
                self.computer_side = None;
            }
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    println!("\n==============================");
    println!("|        Mill Engine         |");
    println!("==============================\n");
    println!("\n\"h or help\" displays a list of commands\n");

    match Cli::new(&args) {
        Ok(mut cli) => cli.run_main_loop(),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    }
}
