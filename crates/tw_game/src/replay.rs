use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tw_core::KeySnapshot;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f64,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(flatten)]
    pub keys: KeySnapshot,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn expanded_keys(&self) -> Vec<KeySnapshot> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(frame.keys);
            }
        }
        out
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(self.fixed_dt)
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if !replay.fixed_dt.is_finite() || replay.fixed_dt <= 0.0 {
        return Err("Replay validation failed: fixed_dt must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt() -> f64 {
    1.0 / 120.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::world::test_world;
    use glam::IVec2;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tw_core::ManualClock;

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "tw_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    const WALK: &str = r#"{
      "fixed_dt": 0.25,
      "frames": [
        { "right": true, "repeat": 30 },
        { "down": true, "repeat": 20 },
        { "left": true, "repeat": 10 },
        { "repeat": 2 }
      ]
    }"#;

    #[derive(Debug, PartialEq)]
    struct RunResult {
        position: IVec2,
        camera: IVec2,
        steps: u64,
        frames: u64,
    }

    fn run(replay: &ReplaySequence) -> RunResult {
        let clock = ManualClock::new();
        let mut world = test_world(&GameConfig::default(), &clock);
        let dt = replay.frame_duration();
        for keys in replay.expanded_keys() {
            clock.advance(dt);
            world.frame(dt, keys, &[], &[]);
        }
        RunResult {
            position: world.player().position(),
            camera: world.camera().offset(),
            steps: world.steps(),
            frames: world.counted_frames(),
        }
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(&path, WALK).expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_keys();
        assert_eq!(expanded.len(), 62);
        assert!(expanded[0].right);
        assert!(expanded[30].down && !expanded[30].right);
        assert!(!expanded[61].any_direction());
        assert_eq!(replay.frame_duration(), Duration::from_millis(250));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_rejects_bad_files() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay");
        assert!(err.contains("frames list is empty"));

        fs::write(&path, r#"{ "fixed_dt": 0.0, "frames": [{}] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("zero dt");
        assert!(err.contains("fixed_dt"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let path = temp_file_path("deterministic");
        fs::write(&path, WALK).expect("write replay file");
        let replay = load_replay_from_path(&path).expect("replay should load");

        let run_a = run(&replay);
        let run_b = run(&replay);
        assert_eq!(run_a, run_b);

        // 30 right, 20 down, 10 left at 5px per frame from the centre.
        assert_eq!(run_a.position, IVec2::new(550, 550));
        assert_eq!(run_a.camera, IVec2::new(164, 164));
        // A quarter second per frame at 4 fps is one step per walking frame.
        assert_eq!(run_a.steps, 60);
        assert_eq!(run_a.frames, 62);

        let _ = fs::remove_file(path);
    }
}
