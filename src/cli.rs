use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::codec::{self, Replay};
use crate::config::Config;
use crate::movegen::{Move, MoveGenerator};
use crate::notation::{move_list, move_to_notation};

const HELP: &str = "\
commands:
  new              start a fresh game
  load <token>     replay a game token
  play <move>      play a move in coordinate notation, e.g. e2e4 or e7e8q
  random <n>       play up to n random legal moves
  moves            list the moves played so far
  board            show the board and its FEN
  status           show the game status
  link             show the share link
  quit
";

/// Line-oriented front end over the codec: each command reads or extends the
/// current game and answers with text.
pub struct LinkHandler {
    config: Config,
    generator: MoveGenerator,
    token: String,
    replay: Replay,
}

impl LinkHandler {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            generator: MoveGenerator::new(),
            token: String::new(),
            replay: Replay::default(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn replay(&self) -> &Replay {
        &self.replay
    }

    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut line = String::new();

        while stdin.lock().read_line(&mut line)? > 0 {
            let command = line.trim();
            if command == "quit" {
                break;
            }
            match self.handle_command(command) {
                Ok(response) => write!(stdout, "{response}")?,
                Err(err) => writeln!(stdout, "error: {err:#}")?,
            }
            stdout.flush()?;
            line.clear();
        }
        Ok(())
    }

    pub fn handle_command(&mut self, command: &str) -> Result<String> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        let Some((&name, args)) = parts.split_first() else {
            return Ok(String::new());
        };

        match (name, args) {
            ("help", []) => Ok(HELP.to_string()),
            ("new", []) => {
                self.set_token(String::new());
                Ok(self.handle_link())
            }
            ("load", [token]) => Ok(self.handle_load(token)),
            ("play", [text]) => self.handle_play(text),
            ("random", [count]) => {
                let count: usize = count
                    .parse()
                    .with_context(|| format!("`{count}` is not a move count"))?;
                Ok(self.handle_random(count, &mut rand::thread_rng()))
            }
            ("moves", []) => Ok(format!("{}\n", move_list(&self.replay.moves))),
            ("board", []) => Ok(format!(
                "{}\n{}\n",
                self.replay.position.board,
                self.replay.position.to_fen()
            )),
            ("status", []) => Ok(format!("{:?}\n", self.generator.game_status(&self.replay.position))),
            ("link", []) => Ok(self.handle_link()),
            _ => bail!("unrecognised command `{command}`, try `help`"),
        }
    }

    fn set_token(&mut self, token: String) {
        self.replay = codec::decode(&token);
        self.token = token;
    }

    fn handle_link(&self) -> String {
        format!("{}\n", self.config.share_url(&self.token))
    }

    fn handle_load(&mut self, token: &str) -> String {
        // Re-encode so the stored token only carries the accepted prefix.
        let replay = codec::decode(token);
        self.token = codec::encode(&replay.moves);
        self.replay = replay;
        info!(plies = self.replay.moves.len(), "loaded game");
        format!(
            "{} moves accepted\n{}",
            self.replay.moves.len(),
            self.handle_link()
        )
    }

    fn handle_play(&mut self, text: &str) -> Result<String> {
        let mv: Move = text.parse()?;
        let token = codec::try_append_move(&self.token, mv)?;
        let san = move_to_notation(&self.replay.position, &mv);
        self.set_token(token);
        Ok(format!("{san}\n{}", self.handle_link()))
    }

    fn handle_random<R: Rng>(&mut self, count: usize, rng: &mut R) -> String {
        let mut moves = self.replay.moves.clone();
        let mut position = self.replay.position.clone();
        let mut played = 0;
        while played < count && !self.generator.game_status(&position).is_game_over() {
            let Some(&mv) = self.generator.all_legal_moves(&position).choose(rng) else {
                break;
            };
            position = position.apply_move(mv);
            moves.push(mv);
            played += 1;
        }
        self.set_token(codec::encode(&moves));
        format!("played {played} moves\n{}", self.handle_link())
    }
}
