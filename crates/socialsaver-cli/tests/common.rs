#![allow(dead_code)]
use assert_cmd::Command;
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

pub struct TestEnv {
    _dir: TempDir,
    pub snapshot: PathBuf,
    pub cfg: PathBuf,
}

impl TestEnv {
    /// Isolated config dir plus a snapshot holding four items:
    /// 1 Pasta (youtube, Food, 2d), 2 Gym (instagram, Fitness, 10d),
    /// 3 async Rust (blog, Coding, 40d, seen), 4 untitled (x, just now).
    pub fn new() -> Self {
        let env = Self::empty();
        env.write_snapshot(&fixture_items());
        env
    }

    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = dir.path().join("config");
        std::fs::create_dir_all(&cfg).expect("cfg dir");
        let snapshot = dir.path().join("items.json");
        Self {
            _dir: dir,
            snapshot,
            cfg,
        }
    }

    /// Binary pointed at the snapshot file.
    pub fn bin(&self) -> Command {
        let mut cmd = self.bare();
        cmd.arg("--store").arg("file").arg("--file").arg(&self.snapshot);
        cmd
    }

    /// Binary with only the isolated config dir; store comes from settings.
    pub fn bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("socialsaver-cli").unwrap();
        cmd.env("XDG_CONFIG_HOME", &self.cfg);
        cmd.env_remove("SOCIALSAVER_LOG");
        cmd
    }

    pub fn write_snapshot(&self, items: &Value) {
        std::fs::write(&self.snapshot, serde_json::to_vec_pretty(items).unwrap()).unwrap();
    }

    pub fn read_snapshot(&self) -> Vec<Value> {
        let raw = std::fs::read(&self.snapshot).unwrap();
        serde_json::from_slice::<Vec<Value>>(&raw).unwrap()
    }

    pub fn write_settings(&self, body: &str) {
        let dir = self.cfg.join("socialsaver");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("settings.toml"), body).unwrap();
    }

    /// Runs `list --json` with extra args and returns the ids in output order.
    pub fn list_ids(&self, args: &[&str]) -> Vec<u64> {
        let out = self
            .bin()
            .arg("list")
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        ids(&out)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

pub fn ids(stdout: &[u8]) -> Vec<u64> {
    let v: Value = serde_json::from_slice(stdout).unwrap();
    v.as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_u64().unwrap())
        .collect()
}

fn ts(ago: Duration) -> String {
    (OffsetDateTime::now_utc() - ago).format(&Rfc3339).unwrap()
}

pub fn fixture_items() -> Value {
    json!([
        {
            "id": 1,
            "url": "https://www.youtube.com/watch?v=abc123",
            "item_type": "youtube",
            "title": "Pasta Carbonara",
            "summary": "Creamy pasta in 15 minutes.",
            "caption": "best #pasta ever",
            "category": "Food",
            "hashtags": ["#pasta", "#dinner"],
            "created_at": ts(Duration::days(2))
        },
        {
            "id": 2,
            "url": "https://www.instagram.com/reel/xyz/?igsh=1",
            "item_type": "instagram",
            "title": "Gym Routine",
            "summary": "Push day split.",
            "category": "Fitness",
            "hashtags": ["#gym"],
            "created_at": ts(Duration::days(10))
        },
        {
            "id": 3,
            "url": "https://blog.example.com/async",
            "item_type": "blog",
            "title": "async Rust explained",
            "category": "Coding",
            "hashtags": ["#rust"],
            "created_at": ts(Duration::days(40)),
            "is_seen": true
        },
        {
            "id": 4,
            "url": "https://x.com/user/status/1",
            "item_type": "twitter",
            "title": null,
            "category": null,
            "created_at": ts(Duration::ZERO)
        }
    ])
}
