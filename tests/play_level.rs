use glam::Vec2;

use polarity::driver::PlaybackSpeed;
use polarity::scene::{MarkedOrb, OrbRecord};
use polarity::{SceneDescription, SceneError, Session, SessionPhase, Settings, Simulation};

const REPEL: &str = include_str!("../levels/repel.json");
const SLINGSHOT: &str = include_str!("../levels/slingshot.json");

fn play_until_success(session: &mut Session, speed: PlaybackSpeed, max_frames: u64) -> Option<u64> {
    for frame in 1..=max_frames {
        session.frame(speed);
        if session.phase() == SessionPhase::Success {
            return Some(frame);
        }
    }
    None
}

#[test]
fn repelled_player_drifts_into_goal() {
    let scene = SceneDescription::from_json(REPEL).unwrap();
    let mut session = Session::new(scene, &Settings::default()).unwrap();

    let frames = play_until_success(&mut session, PlaybackSpeed::Normal, 600);
    assert!(frames.is_some(), "level should be solvable without input");

    let sim = session.simulation();
    let player = sim.orbs().iter().find(|o| o.is_player).unwrap();
    assert!(player.pos.x >= 600.0 && player.pos.x <= 700.0);
    assert_eq!(player.pos.y, 400.0);

    // The fixed repeller never moved
    let anchor = sim.orbs().iter().find(|o| o.is_fixed).unwrap();
    assert_eq!(anchor.pos, Vec2::new(200.0, 400.0));
    assert_eq!(anchor.mass, 2.0);
}

#[test]
fn fast_forward_needs_fewer_frames() {
    let scene = SceneDescription::from_json(REPEL).unwrap();

    let mut normal = Session::new(scene.clone(), &Settings::default()).unwrap();
    let mut fast = Session::new(scene, &Settings::default()).unwrap();

    let normal_frames = play_until_success(&mut normal, PlaybackSpeed::Normal, 600).unwrap();
    let fast_frames = play_until_success(&mut fast, PlaybackSpeed::FastForward, 600).unwrap();
    assert!(fast_frames < normal_frames);

    // Same tick count to the goal, the frames only batch it differently
    assert_eq!(
        normal.simulation().won_at_tick(),
        fast.simulation().won_at_tick()
    );
}

#[test]
fn flipping_turns_repulsion_into_attraction() {
    let scene = SceneDescription::from_json(REPEL).unwrap();
    let mut session = Session::new(scene, &Settings::default()).unwrap();

    assert!(session.flip_polarity());
    session.frame(PlaybackSpeed::Normal);

    let player = session
        .simulation()
        .orbs()
        .iter()
        .find(|o| o.is_player)
        .unwrap();
    assert_eq!(player.charge, -1.0);
    assert!(player.vel.x < 0.0);
}

#[test]
fn explicit_orb_level_loads() {
    let scene = SceneDescription::from_json(SLINGSHOT).unwrap();
    let sim = Simulation::with_tick_rate(&scene, 60.0).unwrap();
    assert_eq!(sim.orbs().len(), 2);
    assert_eq!(sim.orbs()[1].vel, Vec2::new(70.0, 0.0));
    assert_eq!(sim.goals()[0].rect.x, 1000.0);
}

#[test]
fn unknown_tag_prevents_session() {
    let scene = SceneDescription::new()
        .with_orb(OrbRecord::new(Vec2::ZERO, 1.0, 1.0, true, false))
        .with_mark(MarkedOrb {
            pos: Vec2::new(10.0, 0.0),
            mark: "mark/star(sx)".into(),
            stroke: "red".into(),
            size: "normal".into(),
            velocity: Vec2::ZERO,
        });
    let err = Session::new(scene, &Settings::default()).unwrap_err();
    assert!(matches!(err, SceneError::UnknownTag { index: 1, field: "mark", .. }));
    assert!(err.to_string().contains("mark/star(sx)"));
}

#[test]
fn soft_tuning_is_slower() {
    use polarity::settings::ForceTuning;

    let scene = SceneDescription::from_json(REPEL).unwrap();
    let mut classic = Session::new(scene.clone(), &Settings::default()).unwrap();
    let mut soft = Session::new(scene, &Settings::from_tuning(ForceTuning::Soft)).unwrap();

    for _ in 0..10 {
        classic.frame(PlaybackSpeed::Normal);
        soft.frame(PlaybackSpeed::Normal);
    }
    let speed = |s: &Session| s.simulation().orbs()[1].vel.length();
    assert!(speed(&soft) < speed(&classic));
}

#[test]
fn shipped_levels_and_settings_validate() {
    for level in [REPEL, SLINGSHOT] {
        let scene = SceneDescription::from_json(level).unwrap();
        scene.validate().unwrap();
        assert!(!scene.goals.is_empty());
    }
    let settings = Settings::from_json(include_str!("../settings.json")).unwrap();
    settings.physics().validate().unwrap();
}
