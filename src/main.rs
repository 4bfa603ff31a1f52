//! Headless demo entry point
//!
//! An autopilot plays the game at a fixed simulation step: phase transitions
//! go to the log, finished runs go to the leaderboard file, and the final
//! session state can be dumped as JSON for inspection.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use pixbreak::assets;
use pixbreak::clamp;
use pixbreak::config::{AutopilotSkill, DemoConfig};
use pixbreak::consts::*;
use pixbreak::highscores::HighScores;
use pixbreak::sim::{
    BallState, FrameInput, Game, GamePhase, LevelLayout, LevelManager, Session, tick,
};

/// Display-rate frame the driver pumps; two fixed steps per frame
const FRAME_DT: f32 = 1.0 / 60.0;

/// Fallback level sheet compiled into the binary
static DEFAULT_LEVELS: &[u8] = include_bytes!("../assets/levels.png");

#[derive(Parser, Debug)]
#[command(name = "pixbreak")]
#[command(about = "Headless brick-breaker demo: an autopilot clears image-sampled levels")]
struct Cli {
    /// Demo config JSON; missing file falls back to defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// PNG level sheet (overrides the config and the built-in sheet)
    #[arg(long)]
    levels: Option<PathBuf>,
    /// Autopilot RNG seed
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many fixed steps
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Autopilot skill: sloppy, steady or sharp
    #[arg(long)]
    skill: Option<String>,
    /// Write the final session state as JSON here on exit
    #[arg(long)]
    dump_session: Option<PathBuf>,
}

/// Why the demo loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    GameOver,
    GameWon,
    TickLimit,
}

/// Scripted player: chases a jittered aim point and serves after a short wait
struct Autopilot {
    rng: Pcg32,
    skill: AutopilotSkill,
    /// Offset from the ball the paddle aims for, re-rolled on each serve
    aim_offset: f32,
    idle_ticks: u64,
}

impl Autopilot {
    fn new(seed: u64, skill: AutopilotSkill) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let jitter = skill.aim_jitter();
        let aim_offset = rng.random_range(-jitter..=jitter);
        Self {
            rng,
            skill,
            aim_offset,
            idle_ticks: 0,
        }
    }

    /// Decide this frame's input from what's on the field
    fn drive(&mut self, session: &Session) -> FrameInput {
        let mut input = FrameInput::default();

        // An ended game gets a restart click; the driver decides whether the
        // autopilot ever sees the ended phase at all
        if session.game.phase != GamePhase::Playing {
            input.fire = true;
            return input;
        }

        if session.ball.state == BallState::OnPaddle {
            self.idle_ticks += 1;
            if self.idle_ticks >= self.skill.launch_delay_ticks() {
                input.fire = true;
                self.idle_ticks = 0;
                self.aim_offset = self.roll_offset();
            }
            return input;
        }

        // Chase the ball, deliberately a little off center so the paddle
        // bounce angles vary from serve to serve
        let target = session.ball.pos.x + session.ball.width / 2.0 - session.paddle.width / 2.0
            + self.aim_offset;
        let error = target - session.paddle.pos.x;
        let max_step = self.skill.paddle_speed() * SIM_DT;
        input.pointer_dx = clamp(error, -max_step, max_step);
        input
    }

    fn roll_offset(&mut self) -> f32 {
        let jitter = self.skill.aim_jitter();
        self.rng.random_range(-jitter..=jitter)
    }
}

/// Fixed-timestep demo driver
struct Demo {
    session: Session,
    autopilot: Autopilot,
    accumulator: f32,
    ticks: u64,
    /// Tick the current run started at; restarts open a new run
    run_start: u64,
    level_reached: u32,
    last_phase: GamePhase,
}

impl Demo {
    fn new(session: Session, autopilot: Autopilot) -> Self {
        let level_reached = session.game.levels.current_level();
        Self {
            session,
            autopilot,
            accumulator: 0.0,
            ticks: 0,
            run_start: 0,
            level_reached,
            last_phase: GamePhase::Playing,
        }
    }

    /// Pump frames until something stops the demo
    fn run(&mut self, config: &DemoConfig, scores: &mut HighScores) -> Result<StopReason, String> {
        loop {
            if let Some(reason) = self.frame(config, scores)? {
                // A run cut off mid-play still counts
                if reason == StopReason::TickLimit && self.session.game.phase == GamePhase::Playing
                {
                    self.record_run(scores);
                }
                return Ok(reason);
            }
        }
    }

    /// One display frame: up to MAX_SUBSTEPS fixed steps from the accumulator
    fn frame(
        &mut self,
        config: &DemoConfig,
        scores: &mut HighScores,
    ) -> Result<Option<StopReason>, String> {
        self.accumulator += FRAME_DT;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            if self.ticks >= config.max_ticks {
                return Ok(Some(StopReason::TickLimit));
            }

            let input = self.autopilot.drive(&self.session);
            tick(&mut self.session, &input, SIM_DT)
                .map_err(|e| format!("Simulation error at tick {}: {e}", self.ticks))?;
            self.accumulator -= SIM_DT;
            substeps += 1;
            self.ticks += 1;
            self.level_reached = self
                .level_reached
                .max(self.session.game.levels.current_level());

            if let Some(reason) = self.on_phase_change(config, scores) {
                return Ok(Some(reason));
            }
        }

        Ok(None)
    }

    /// Record finished runs on phase transitions and decide whether to stop
    fn on_phase_change(
        &mut self,
        config: &DemoConfig,
        scores: &mut HighScores,
    ) -> Option<StopReason> {
        let phase = self.session.game.phase;
        if phase == self.last_phase {
            return None;
        }
        self.last_phase = phase;

        match phase {
            GamePhase::GameOver => {
                self.record_run(scores);
                (!config.auto_restart).then_some(StopReason::GameOver)
            }
            GamePhase::GameWon => {
                self.record_run(scores);
                (!config.auto_restart).then_some(StopReason::GameWon)
            }
            GamePhase::Playing => {
                // A restart opened a fresh run
                self.run_start = self.ticks;
                self.level_reached = self.session.game.levels.current_level();
                None
            }
        }
    }

    fn record_run(&self, scores: &mut HighScores) {
        let run_ticks = self.ticks - self.run_start;
        let score = self.session.game.score;
        match scores.add_score(score, self.level_reached, run_ticks, unix_timestamp()) {
            Some(rank) => log::info!("Run over: score {score}, leaderboard rank {rank}"),
            None => log::info!("Run over: score {score}, off the leaderboard"),
        }
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn main() -> Result<(), String> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = DemoConfig::load(cli.config.as_deref());
    if let Some(levels) = cli.levels {
        config.levels = Some(levels);
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(max_ticks) = cli.max_ticks {
        config.max_ticks = max_ticks;
    }
    if let Some(skill) = cli.skill.as_deref() {
        config.skill = AutopilotSkill::from_str(skill)
            .ok_or_else(|| format!("Unknown skill '{skill}' (sloppy, steady or sharp)"))?;
    }
    if let Some(dump) = cli.dump_session {
        config.dump_session = Some(dump);
    }

    log::info!(
        "pixbreak demo starting (seed {}, skill {})",
        config.seed,
        config.skill.as_str()
    );

    let sheet = match config.levels.as_deref() {
        Some(path) => assets::load_level_sheet(path)?,
        None => assets::load_level_sheet_from_bytes(DEFAULT_LEVELS)?,
    };

    let mut levels = LevelManager::new();
    levels.load_levels(sheet, LevelLayout::default());
    if levels.number_of_levels() == 0 {
        return Err("Level sheet holds no complete level".into());
    }
    levels.change_level(1).map_err(|e| e.to_string())?;

    let session = Session::new(Game::new(levels));
    let autopilot = Autopilot::new(config.seed, config.skill);
    let mut scores = HighScores::load(&config.highscores);
    let mut demo = Demo::new(session, autopilot);

    let reason = demo.run(&config, &mut scores)?;
    log::info!(
        "Demo stopped ({:?}) after {} ticks: score {}, level {}/{}",
        reason,
        demo.ticks,
        demo.session.game.score,
        demo.session.game.levels.current_level(),
        demo.session.game.levels.number_of_levels()
    );

    if let Err(e) = scores.save(&config.highscores) {
        log::warn!("{e}");
    }
    if let Some(top) = scores.top_score() {
        log::info!("Leaderboard best: {top}");
    }

    // Dump failures are logged, not fatal
    if let Some(path) = &config.dump_session {
        match serde_json::to_string_pretty(&demo.session) {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => log::info!("Session dumped to '{}'", path.display()),
                Err(e) => log::warn!("Failed to write '{}': {e}", path.display()),
            },
            Err(e) => log::warn!("Failed to encode session: {e}"),
        }
    }

    println!(
        "pixbreak demo: {:?} after {} ticks - score {}, reached level {}",
        reason, demo.ticks, demo.session.game.score, demo.level_reached
    );

    Ok(())
}
