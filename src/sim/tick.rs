//! Per-frame collision resolution
//!
//! One call to [`tick`] advances the session by one frame: input, paddle
//! tracking, axis-separated collision passes, world bounds, then level
//! progression. The X axis is moved and fully resolved before Y is touched.
//! Decoupling the axes this way is a deliberate simplification - it trades a
//! little corner/tunneling accuracy for very simple resolution, and the
//! gameplay is tuned around exactly this behavior.

use super::aabb::{Aabb, intersects};
use super::level::LevelError;
use super::state::{BallState, GamePhase, Session};
use crate::consts::*;
use crate::{clamp, sign};

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Relative pointer motion this frame, in field pixels
    pub pointer_dx: f32,
    /// Click: restarts an ended game, otherwise launches a waiting ball
    pub fire: bool,
}

/// Advance the session by one frame of `dt` seconds
///
/// Runs unconditionally in every phase; an ended game keeps simulating
/// (harmlessly) until a fire input restarts it. The returned error can only
/// come from a level change, and both level-change sites are guarded, so a
/// failure here means the session was built against an unloaded manager.
pub fn tick(session: &mut Session, input: &FrameInput, dt: f32) -> Result<(), LevelError> {
    let mut ball_paddle_collision_handled = false;
    let mut ball_brick_collision_handled = false;

    // Fire: restart an ended game, or launch a waiting ball
    if input.fire {
        match session.game.phase {
            GamePhase::GameOver | GamePhase::GameWon => {
                log::info!("Restarting session");
                session.game.reset()?;
                session.ball.reset();
            }
            GamePhase::Playing => {
                if session.ball.state == BallState::OnPaddle {
                    log::debug!("Ball launched");
                    session.ball.state = BallState::Free;
                }
            }
        }
    }

    // Track the pointer; the paddle can never leave the field
    session.cursor_x = clamp(
        session.cursor_x + input.pointer_dx,
        0.0,
        CANVAS_WIDTH - session.paddle.width,
    );
    session.paddle.pos.x = session.cursor_x;

    // A waiting ball rides the paddle, no physics applied
    if session.ball.state == BallState::OnPaddle {
        session.ball.pos.x = session.paddle.center().x - session.ball.width / 2.0;
        session.ball.pos.y = session.paddle.top() - session.ball.height;
    }

    // Move and resolve collisions in X
    if session.ball.state == BallState::Free {
        session.ball.pos.x += session.ball.vel.x * dt;
    }

    if intersects(&session.ball, &session.paddle) {
        // We know we've collided in X, but which side of the paddle is closer?
        let closest_right = (session.paddle.right() - session.ball.left()).abs()
            < (session.paddle.left() - session.ball.right()).abs();

        // The near side only pushes the ball out; only a far-side approach
        // reflects. Asymmetric, and the game feel depends on it staying so.
        if session.ball.vel.x > 0.0 {
            if closest_right {
                session.ball.pos.x = session.paddle.right();
            } else {
                session.ball.pos.x = session.paddle.left() - session.ball.width;
                session.ball.vel.x = -session.ball.vel.x;
            }
        } else if session.ball.vel.x < 0.0 {
            if !closest_right {
                session.ball.pos.x = session.paddle.left() - session.ball.width;
            } else {
                session.ball.pos.x = session.paddle.right();
                session.ball.vel.x = -session.ball.vel.x;
            }
        }
    }

    // First visible brick the ball overlaps eats the hit; one brick per axis
    // per frame, sequence order, no distance priority
    for brick in session.game.levels.bricks.iter_mut() {
        if !brick.visible {
            continue;
        }

        if intersects(&session.ball, brick) {
            ball_brick_collision_handled = true;
            brick.visible = false;
            session.game.score += BRICK_SCORE;

            if session.ball.vel.x > 0.0 {
                session.ball.pos.x = brick.pos.x - session.ball.width;
            } else if session.ball.vel.x < 0.0 {
                session.ball.pos.x = brick.right();
            }

            session.ball.vel.x = -session.ball.vel.x;
            break;
        }
    }

    // Move and resolve collisions in Y
    if session.ball.state == BallState::Free {
        session.ball.pos.y += session.ball.vel.y * dt;
    }

    // At most one paddle resolution per frame; the X pass above leaves the
    // flag clear, so this Y pass is the only setter
    if !ball_paddle_collision_handled && intersects(&session.ball, &session.paddle) {
        ball_paddle_collision_handled = true;
        session.ball.pos.y = session.paddle.top() - session.ball.height;

        // Each top bounce gains a little vertical speed, capped, then upward
        session.ball.vel.y += sign(session.ball.vel.y) * session.ball.brick_speed_boost.y;
        session.ball.vel.y =
            session.ball.vel.y.abs().min(session.ball.max_vel.y.abs()) * sign(session.ball.vel.y);
        session.ball.vel.y = -session.ball.vel.y;

        // The further off paddle center the strike, the steeper the bounce;
        // this overwrites whatever X velocity the frame had produced
        let half = session.paddle.width / 2.0;
        let difference = session.paddle.center().x - session.ball.pos.x - session.ball.width / 2.0;
        let factor = difference.abs() / half;
        session.ball.vel.x = sign(-difference) * session.ball.paddle_bounce_factor.x * factor;
    }

    if !ball_brick_collision_handled {
        for brick in session.game.levels.bricks.iter_mut() {
            if !brick.visible {
                continue;
            }

            if intersects(&session.ball, brick) {
                brick.visible = false;
                session.game.score += BRICK_SCORE;

                if session.ball.vel.y > 0.0 {
                    session.ball.pos.y = brick.pos.y - session.ball.height;
                } else if session.ball.vel.y < 0.0 {
                    session.ball.pos.y = brick.bottom();
                }

                session.ball.vel.y = -session.ball.vel.y;
                break;
            }
        }
    }

    if ball_paddle_collision_handled {
        log::debug!(
            "Paddle bounce: vel=({:.1}, {:.1})",
            session.ball.vel.x,
            session.ball.vel.y
        );
    }

    // World bounds: side walls and title bar reflect, the floor takes a life
    if session.ball.right() > CANVAS_WIDTH {
        session.ball.pos.x = CANVAS_WIDTH - session.ball.width;
        session.ball.vel.x = -session.ball.vel.x;
    } else if session.ball.left() < 0.0 {
        session.ball.pos.x = 0.0;
        session.ball.vel.x = -session.ball.vel.x;
    }

    if session.ball.bottom() > CANVAS_HEIGHT {
        session.ball.state = BallState::OnPaddle;
        session.ball.pos.y = CANVAS_HEIGHT - session.ball.height;
        session.ball.vel.x = 0.0;
        session.ball.vel.y = -session.ball.vel.y;

        session.game.lives = session.game.lives.saturating_sub(1);
        if session.game.lives == 0 {
            if session.game.phase != GamePhase::GameOver {
                log::info!("Out of lives - game over at score {}", session.game.score);
            }
            session.game.phase = GamePhase::GameOver;
        } else {
            log::info!("Ball lost - {} lives left", session.game.lives);
        }
    } else if session.ball.top() < TITLE_BAR_HEIGHT {
        session.ball.pos.y = TITLE_BAR_HEIGHT;
        session.ball.vel.y = -session.ball.vel.y;
    }

    // Level progression; the ball only resets when another level follows
    if session.game.levels.is_current_level_won() {
        if session.game.levels.has_next_level() {
            session.game.levels.goto_next_level()?;
            session.ball.reset();
        } else {
            if session.game.phase != GamePhase::GameWon {
                log::info!("All levels cleared - final score {}", session.game.score);
            }
            session.game.phase = GamePhase::GameWon;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::{LevelLayout, LevelManager, LevelSheet};
    use crate::sim::state::{Ball, Brick, Game};
    use glam::Vec2;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const GAP: [u8; 4] = [0, 0, 0, 0];

    fn brick(x: f32, y: f32, w: f32, h: f32) -> Brick {
        Brick::new(Vec2::new(x, y), w, h, WHITE)
    }

    /// Session with no sheet loaded; the far-corner sentinel brick keeps the
    /// vacuous level-won check from firing
    fn bare_session() -> Session {
        let mut levels = LevelManager::new();
        levels.bricks.push(brick(760.0, 40.0, 10.0, 10.0));
        Session::new(Game::new(levels))
    }

    /// Two loaded levels: level 1 has one brick, level 2 has two
    ///
    /// 2x1-cell layout, brick cells 40x16 px starting at (100, 100).
    fn loaded_session() -> Session {
        let sheet = LevelSheet::new(2, 2, vec![WHITE, GAP, WHITE, WHITE]);
        let layout = LevelLayout {
            level_width: 2,
            level_height: 1,
            brick_width: 40.0,
            brick_height: 16.0,
            brick_x_offset: 100.0,
            brick_y_offset: 100.0,
        };
        let mut levels = LevelManager::new();
        levels.load_levels(sheet, layout);
        levels.change_level(1).unwrap();
        Session::new(Game::new(levels))
    }

    fn free_ball(session: &mut Session, pos: Vec2, vel: Vec2) {
        session.ball.state = BallState::Free;
        session.ball.pos = pos;
        session.ball.vel = vel;
    }

    #[test]
    fn test_on_paddle_rides_the_paddle() {
        let mut session = bare_session();
        assert_eq!(session.ball.state, BallState::OnPaddle);

        tick(&mut session, &FrameInput::default(), SIM_DT).unwrap();
        let expected_x = session.paddle.center().x - session.ball.width / 2.0;
        let expected_y = session.paddle.pos.y - session.ball.height;
        assert_eq!(session.ball.pos, Vec2::new(expected_x, expected_y));

        // Follows the paddle as the pointer moves
        let input = FrameInput {
            pointer_dx: 40.0,
            ..Default::default()
        };
        tick(&mut session, &input, SIM_DT).unwrap();
        assert_eq!(
            session.ball.pos.x,
            session.paddle.center().x - session.ball.width / 2.0
        );
    }

    #[test]
    fn test_pointer_tracking_is_clamped() {
        let mut session = bare_session();

        let input = FrameInput {
            pointer_dx: -10_000.0,
            ..Default::default()
        };
        tick(&mut session, &input, SIM_DT).unwrap();
        assert_eq!(session.paddle.pos.x, 0.0);

        let input = FrameInput {
            pointer_dx: 10_000.0,
            ..Default::default()
        };
        tick(&mut session, &input, SIM_DT).unwrap();
        assert_eq!(session.paddle.pos.x, CANVAS_WIDTH - session.paddle.width);
    }

    #[test]
    fn test_fire_launches_only_from_paddle() {
        let mut session = bare_session();

        let input = FrameInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut session, &input, SIM_DT).unwrap();
        assert_eq!(session.ball.state, BallState::Free);

        // Ball moves under its launch velocity once free
        let y = session.ball.pos.y;
        tick(&mut session, &FrameInput::default(), SIM_DT).unwrap();
        assert!(session.ball.pos.y < y);
    }

    #[test]
    fn test_brick_hit_from_the_right() {
        // Ball 12 wide moving left at 50 px/s into a 20x10 brick at (90, 100):
        // it ends flush on the brick's right edge with velocity reflected
        let mut session = bare_session();
        session.game.levels.bricks.insert(0, brick(90.0, 100.0, 20.0, 10.0));
        free_ball(
            &mut session,
            Vec2::new(100.0 + 50.0 * SIM_DT, 100.0),
            Vec2::new(-50.0, 0.0),
        );

        tick(&mut session, &FrameInput::default(), SIM_DT).unwrap();

        assert_eq!(session.ball.pos.x, 110.0);
        assert_eq!(session.ball.vel.x, 50.0);
        assert!(!session.game.levels.bricks[0].visible);
        assert_eq!(session.game.score, BRICK_SCORE);
        assert_eq!(session.game.phase, GamePhase::Playing);
    }

    #[test]
    fn test_brick_hit_from_the_left() {
        let mut session = bare_session();
        session.game.levels.bricks.insert(0, brick(200.0, 100.0, 20.0, 10.0));
        // Moving right; after the X step the ball overlaps the brick's left side
        free_ball(
            &mut session,
            Vec2::new(190.0 - 50.0 * SIM_DT, 100.0),
            Vec2::new(50.0, 0.0),
        );

        tick(&mut session, &FrameInput::default(), SIM_DT).unwrap();

        // Flush against the left edge: ball right == brick left
        assert_eq!(session.ball.pos.x, 200.0 - session.ball.width);
        assert_eq!(session.ball.vel.x, -50.0);
        assert_eq!(session.game.score, BRICK_SCORE);
    }

    #[test]
    fn test_x_hit_skips_y_pass_and_stops_at_first_brick() {
        let mut session = bare_session();
        // Both bricks overlap the ball; A is first in sequence
        session.game.levels.bricks.insert(0, brick(90.0, 100.0, 20.0, 10.0));
        session.game.levels.bricks.insert(1, brick(105.0, 108.0, 20.0, 10.0));
        free_ball(
            &mut session,
            Vec2::new(100.0 + 50.0 * SIM_DT, 100.0),
            Vec2::new(-50.0, 80.0),
        );

        tick(&mut session, &FrameInput::default(), SIM_DT).unwrap();

        // A died in the X pass; B survives both the X scan (first hit stops
        // it) and the Y pass (skipped outright after an X-axis brick hit)
        assert!(!session.game.levels.bricks[0].visible);
        assert!(session.game.levels.bricks[1].visible);
        assert_eq!(session.game.score, BRICK_SCORE);
        assert_eq!(session.ball.vel.y, 80.0);
    }

    #[test]
    fn test_y_hit_lands_on_top_and_first_in_sequence_wins() {
        let mut session = bare_session();
        // Adjacent bricks in one row; the ball straddles their boundary
        session.game.levels.bricks.insert(0, brick(100.0, 100.0, 40.0, 16.0));
        session.game.levels.bricks.insert(1, brick(141.0, 100.0, 40.0, 16.0));
        free_ball(&mut session, Vec2::new(132.0, 84.0), Vec2::new(0.0, 150.0));

        tick(&mut session, &FrameInput::default(), 0.1).unwrap();

        assert!(!session.game.levels.bricks[0].visible);
        assert!(session.game.levels.bricks[1].visible);
        assert_eq!(session.ball.pos.y, 100.0 - session.ball.height);
        assert_eq!(session.ball.vel.y, -150.0);
        assert_eq!(session.game.score, BRICK_SCORE);
    }

    #[test]
    fn test_y_hit_from_below_bounces_down() {
        let mut session = bare_session();
        session.game.levels.bricks.insert(0, brick(100.0, 100.0, 40.0, 16.0));
        // Rising into the brick's underside
        free_ball(&mut session, Vec2::new(114.0, 126.0), Vec2::new(0.0, -150.0));

        tick(&mut session, &FrameInput::default(), 0.1).unwrap();

        assert_eq!(session.ball.pos.y, 116.0);
        assert_eq!(session.ball.vel.y, 150.0);
        assert!(!session.game.levels.bricks[0].visible);
    }

    #[test]
    fn test_paddle_bounce_boosts_caps_and_steers() {
        let mut session = bare_session();
        // Falling onto the paddle left of center: paddle spans 348..452,
        // center 400; ball at x=380 gives difference 14, factor 14/52
        free_ball(&mut session, Vec2::new(380.0, 540.0), Vec2::new(0.0, 300.0));

        tick(&mut session, &FrameInput::default(), 0.1).unwrap();

        assert_eq!(session.ball.pos.y, session.paddle.pos.y - session.ball.height);
        assert_eq!(session.ball.vel.y, -310.0);
        let expected_vx = -250.0_f32 * (14.0 / 52.0);
        assert!((session.ball.vel.x - expected_vx).abs() < 1e-3);
    }

    #[test]
    fn test_paddle_bounce_respects_vertical_cap() {
        let mut session = bare_session();
        free_ball(&mut session, Vec2::new(394.0, 540.0), Vec2::new(0.0, 595.0));

        tick(&mut session, &FrameInput::default(), 0.05).unwrap();

        // 595 + 10 boost would exceed the 600 cap
        assert_eq!(session.ball.vel.y, -600.0);
    }

    #[test]
    fn test_near_side_paddle_overlap_repositions_without_reflecting() {
        let mut session = bare_session();
        // Overlapping the paddle's right half while moving right: the near
        // side pushes the ball out but keeps its velocity sign
        free_ball(
            &mut session,
            Vec2::new(445.0 - 50.0 * SIM_DT, 570.0),
            Vec2::new(50.0, 0.0),
        );

        tick(&mut session, &FrameInput::default(), SIM_DT).unwrap();

        assert_eq!(session.ball.pos.x, session.paddle.right());
        assert_eq!(session.ball.vel.x, 50.0);
        // Flush against the side, so the Y pass saw no paddle overlap
        assert_eq!(session.ball.vel.y, 0.0);
    }

    #[test]
    fn test_far_side_paddle_overlap_reflects() {
        let mut session = bare_session();
        // Overlapping the paddle's left half while moving right: far side
        free_ball(
            &mut session,
            Vec2::new(350.0 - 50.0 * SIM_DT, 570.0),
            Vec2::new(50.0, 0.0),
        );

        tick(&mut session, &FrameInput::default(), SIM_DT).unwrap();

        assert_eq!(session.ball.pos.x, session.paddle.pos.x - session.ball.width);
        assert_eq!(session.ball.vel.x, -50.0);
    }

    #[test]
    fn test_side_walls_reflect_and_clamp() {
        let mut session = bare_session();
        free_ball(&mut session, Vec2::new(795.0, 300.0), Vec2::new(200.0, 0.0));
        tick(&mut session, &FrameInput::default(), SIM_DT).unwrap();
        assert_eq!(session.ball.pos.x, CANVAS_WIDTH - session.ball.width);
        assert_eq!(session.ball.vel.x, -200.0);

        free_ball(&mut session, Vec2::new(1.0, 300.0), Vec2::new(-200.0, 0.0));
        tick(&mut session, &FrameInput::default(), SIM_DT).unwrap();
        assert_eq!(session.ball.pos.x, 0.0);
        assert_eq!(session.ball.vel.x, 200.0);
    }

    #[test]
    fn test_title_bar_reflects() {
        let mut session = bare_session();
        free_ball(&mut session, Vec2::new(100.0, 26.0), Vec2::new(0.0, -300.0));

        tick(&mut session, &FrameInput::default(), SIM_DT).unwrap();

        assert_eq!(session.ball.pos.y, TITLE_BAR_HEIGHT);
        assert_eq!(session.ball.vel.y, 300.0);
    }

    #[test]
    fn test_bottom_edge_costs_a_life() {
        let mut session = bare_session();
        session.game.lives = 2;
        free_ball(&mut session, Vec2::new(100.0, 595.0), Vec2::new(30.0, 300.0));

        tick(&mut session, &FrameInput::default(), SIM_DT).unwrap();

        assert_eq!(session.game.lives, 1);
        assert_eq!(session.game.phase, GamePhase::Playing);
        assert_eq!(session.ball.state, BallState::OnPaddle);
        assert_eq!(session.ball.pos.y, CANVAS_HEIGHT - session.ball.height);
        assert_eq!(session.ball.vel.x, 0.0);
        assert_eq!(session.ball.vel.y, -300.0);
    }

    #[test]
    fn test_bottom_edge_on_last_life_is_game_over() {
        let mut session = bare_session();
        session.game.lives = 1;
        free_ball(&mut session, Vec2::new(100.0, 595.0), Vec2::new(0.0, 300.0));

        tick(&mut session, &FrameInput::default(), SIM_DT).unwrap();

        assert_eq!(session.game.lives, 0);
        assert_eq!(session.game.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_resolver_keeps_running_after_game_over() {
        let mut session = bare_session();
        session.game.phase = GamePhase::GameOver;
        session.game.lives = 0;
        free_ball(&mut session, Vec2::new(200.0, 300.0), Vec2::new(120.0, -80.0));

        tick(&mut session, &FrameInput::default(), SIM_DT).unwrap();

        // Physics still applies; phase and saturated lives are undisturbed
        assert_ne!(session.ball.pos, Vec2::new(200.0, 300.0));
        assert_eq!(session.game.phase, GamePhase::GameOver);
        assert_eq!(session.game.lives, 0);
    }

    #[test]
    fn test_clearing_a_level_advances_and_resets_ball() {
        let mut session = loaded_session();
        assert_eq!(session.game.levels.bricks.len(), 1);
        // Drop onto the lone level-1 brick at (100, 100)
        free_ball(&mut session, Vec2::new(114.0, 84.0), Vec2::new(0.0, 150.0));

        tick(&mut session, &FrameInput::default(), 0.1).unwrap();

        assert_eq!(session.game.levels.current_level(), 2);
        assert_eq!(session.game.levels.bricks.len(), 2);
        assert!(session.game.levels.bricks.iter().all(|b| b.visible));
        assert_eq!(session.ball.state, BallState::OnPaddle);
        assert_eq!(session.ball.vel, BALL_LAUNCH_VEL);
        assert_eq!(session.game.score, BRICK_SCORE);
        assert_eq!(session.game.phase, GamePhase::Playing);
    }

    #[test]
    fn test_clearing_the_last_level_wins() {
        let mut session = loaded_session();
        session.game.levels.change_level(2).unwrap();
        // Leave one brick for the ball; clear the other by hand
        session.game.levels.bricks[1].visible = false;
        free_ball(&mut session, Vec2::new(114.0, 84.0), Vec2::new(0.0, 150.0));

        tick(&mut session, &FrameInput::default(), 0.1).unwrap();

        assert_eq!(session.game.phase, GamePhase::GameWon);
        assert_eq!(session.game.levels.current_level(), 2);
        // No next level, so no reset: the ball stays free
        assert_eq!(session.ball.state, BallState::Free);
    }

    #[test]
    fn test_fire_restarts_an_ended_game() {
        let mut session = loaded_session();
        session.game.levels.change_level(2).unwrap();
        session.game.phase = GamePhase::GameWon;
        session.game.score = 750;
        session.game.lives = 1;
        session.ball.state = BallState::Free;
        session.ball.vel = Vec2::new(77.0, 410.0);
        session.ball.pos = Vec2::new(300.0, 300.0);

        let input = FrameInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut session, &input, SIM_DT).unwrap();

        assert_eq!(session.game.phase, GamePhase::Playing);
        assert_eq!(session.game.score, 0);
        assert_eq!(session.game.lives, STARTING_LIVES);
        assert_eq!(session.game.levels.current_level(), 1);
        assert_eq!(session.ball.state, BallState::OnPaddle);
        assert_eq!(session.ball.vel, BALL_LAUNCH_VEL);
    }

    #[test]
    fn test_determinism() {
        let mut a = loaded_session();
        let mut b = loaded_session();

        let inputs = [
            FrameInput {
                fire: true,
                ..Default::default()
            },
            FrameInput {
                pointer_dx: -12.5,
                ..Default::default()
            },
            FrameInput {
                pointer_dx: 31.0,
                ..Default::default()
            },
            FrameInput::default(),
        ];

        for _ in 0..240 {
            for input in &inputs {
                tick(&mut a, input, SIM_DT).unwrap();
                tick(&mut b, input, SIM_DT).unwrap();
            }
        }

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
