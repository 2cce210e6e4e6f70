use std::{
    collections::HashMap,
    env, fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use directories::BaseDirs;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(&default_config_path())
    }

    /// Defaults, then the rc file at `config_path`, then environment variables.
    pub fn load_from(config_path: &Path) -> Self {
        let mut map = default_map();

        if let Ok(file) = fs::File::open(config_path) {
            let reader = BufReader::new(file);
            for line in reader.lines().map_while(Result::ok) {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((k, v)) = line.split_once('=') {
                    map.insert(k.trim().to_string(), v.trim().to_string());
                }
            }
        }

        // Environment takes precedence
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self {
            inner: map,
            config_path: config_path.to_path_buf(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), value.into());
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).filter(|v| !v.is_empty()).map(PathBuf::from)
    }

    pub fn curl_binary(&self) -> PathBuf {
        self.get_path("CURL_BINARY")
            .unwrap_or_else(|| PathBuf::from("curl"))
    }

    /// Host-side deadline for one run. `0` or an unparsable value means none.
    pub fn execution_timeout(&self) -> Option<Duration> {
        self.get_u64("EXECUTION_TIMEOUT")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn log_filter(&self) -> String {
        self.get("CURL_RUNNER_LOG")
            .unwrap_or_else(|| "warn".to_string())
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &["CURL_BINARY", "EXECUTION_TIMEOUT"];

    KEYS.contains(&k) || k.starts_with("CURL_RUNNER_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("curl_runner").join(".curlrunnerrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("CURL_BINARY".into(), "curl".into());
    m.insert("EXECUTION_TIMEOUT".into(), "0".into());
    m.insert("CURL_RUNNER_LOG".into(), "warn".into());
    m
}
