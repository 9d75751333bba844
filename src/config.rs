use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::client::{Endpoints, DEFAULT_LOGIN_URL, DEFAULT_REPORTS_URL, DEFAULT_USERS_URL};
use crate::commands::OutputFormat;
use crate::error::{Result, WebtrackError};
use crate::pipeline::{SortMode, DEFAULT_CSV_FILENAME, DEFAULT_PAGE_SIZE, DEFAULT_TOP_LIMIT};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: Option<ServerConfig>,
    #[serde(default)]
    pub session: Option<SessionConfig>,
    #[serde(default)]
    pub view: Option<ViewConfig>,
    #[serde(default)]
    pub export: Option<ExportConfig>,
    #[serde(default)]
    pub top: Option<TopConfig>,
    #[serde(default)]
    pub log: Option<LogConfig>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ServerConfig {
    pub reports_url: Option<String>,
    pub users_url: Option<String>,
    pub login_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SessionConfig {
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ViewConfig {
    pub format: Option<OutputFormat>,
    pub page_size: Option<usize>,
    pub sort_mode: Option<SortMode>,
    pub prune_idle: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ExportConfig {
    pub output: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TopConfig {
    pub format: Option<OutputFormat>,
    pub limit: Option<usize>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LogConfig {
    pub level: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ResolvedConfig {
    pub server: ResolvedServerConfig,
    pub session: ResolvedSessionConfig,
    pub view: ResolvedViewConfig,
    pub export: ResolvedExportConfig,
    pub top: ResolvedTopConfig,
    pub log: ResolvedLogConfig,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedServerConfig {
    pub reports_url: String,
    pub users_url: String,
    pub login_url: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedSessionConfig {
    pub path: PathBuf,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedViewConfig {
    pub format: OutputFormat,
    pub page_size: usize,
    pub sort_mode: SortMode,
    pub prune_idle: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedExportConfig {
    pub output: PathBuf,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedTopConfig {
    pub format: OutputFormat,
    pub limit: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedLogConfig {
    pub level: String,
}

impl Default for ResolvedServerConfig {
    fn default() -> Self {
        Self {
            reports_url: DEFAULT_REPORTS_URL.to_string(),
            users_url: DEFAULT_USERS_URL.to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for ResolvedSessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

impl Default for ResolvedViewConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            page_size: DEFAULT_PAGE_SIZE,
            sort_mode: SortMode::Regroup,
            prune_idle: false,
        }
    }
}

impl Default for ResolvedExportConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_CSV_FILENAME),
        }
    }
}

impl Default for ResolvedTopConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            limit: DEFAULT_TOP_LIMIT,
        }
    }
}

impl Default for ResolvedLogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl ResolvedConfig {
    pub fn from_config(config: &Config) -> Self {
        let mut resolved = Self::default();
        if let Some(cfg) = &config.server {
            resolved.server.apply(cfg);
        }
        if let Some(cfg) = &config.session {
            resolved.session.apply(cfg);
        }
        if let Some(cfg) = &config.view {
            resolved.view.apply(cfg);
        }
        if let Some(cfg) = &config.export {
            resolved.export.apply(cfg);
        }
        if let Some(cfg) = &config.top {
            resolved.top.apply(cfg);
        }
        if let Some(cfg) = &config.log {
            resolved.log.apply(cfg);
        }
        resolved
    }
}

impl ResolvedServerConfig {
    fn apply(&mut self, cfg: &ServerConfig) {
        if let Some(value) = cfg.reports_url.clone() {
            self.reports_url = value;
        }
        if let Some(value) = cfg.users_url.clone() {
            self.users_url = value;
        }
        if let Some(value) = cfg.login_url.clone() {
            self.login_url = value;
        }
        if let Some(value) = cfg.timeout_secs {
            self.timeout_secs = value;
        }
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            reports_url: self.reports_url.clone(),
            users_url: self.users_url.clone(),
            login_url: self.login_url.clone(),
        }
    }
}

impl ResolvedSessionConfig {
    fn apply(&mut self, cfg: &SessionConfig) {
        if let Some(value) = cfg.path.clone() {
            self.path = value;
        }
    }
}

impl ResolvedViewConfig {
    fn apply(&mut self, cfg: &ViewConfig) {
        if let Some(value) = cfg.format {
            self.format = value;
        }
        if let Some(value) = cfg.page_size {
            self.page_size = value;
        }
        if let Some(value) = cfg.sort_mode {
            self.sort_mode = value;
        }
        if let Some(value) = cfg.prune_idle {
            self.prune_idle = value;
        }
    }
}

impl ResolvedExportConfig {
    fn apply(&mut self, cfg: &ExportConfig) {
        if let Some(value) = cfg.output.clone() {
            self.output = value;
        }
    }
}

impl ResolvedTopConfig {
    fn apply(&mut self, cfg: &TopConfig) {
        if let Some(value) = cfg.format {
            self.format = value;
        }
        if let Some(value) = cfg.limit {
            self.limit = value;
        }
    }
}

impl ResolvedLogConfig {
    fn apply(&mut self, cfg: &LogConfig) {
        if let Some(value) = cfg.level.clone() {
            self.level = value;
        }
    }
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_search_paths()?)
}

pub fn load_config_from(paths: &[PathBuf]) -> Result<Config> {
    let mut config = Config::default();
    for path in paths {
        if !path.exists() {
            continue;
        }
        let contents = fs::read_to_string(path)?;
        let parsed: Config = toml::from_str(&contents).map_err(|err| {
            WebtrackError::InvalidArgs(format!(
                "Failed to parse config {}: {}",
                path.display(),
                err
            ))
        })?;
        merge_config(&mut config, parsed);
    }
    Ok(config)
}

fn merge_config(base: &mut Config, other: Config) {
    merge_section(&mut base.server, other.server, ServerConfig::merge);
    merge_section(&mut base.session, other.session, SessionConfig::merge);
    merge_section(&mut base.view, other.view, ViewConfig::merge);
    merge_section(&mut base.export, other.export, ExportConfig::merge);
    merge_section(&mut base.top, other.top, TopConfig::merge);
    merge_section(&mut base.log, other.log, LogConfig::merge);
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
    if let Some(other_section) = other {
        match base {
            Some(existing) => merge(existing, other_section),
            None => *base = Some(other_section),
        }
    }
}

impl ServerConfig {
    fn merge(&mut self, other: ServerConfig) {
        merge_opt(&mut self.reports_url, other.reports_url);
        merge_opt(&mut self.users_url, other.users_url);
        merge_opt(&mut self.login_url, other.login_url);
        merge_opt(&mut self.timeout_secs, other.timeout_secs);
    }
}

impl SessionConfig {
    fn merge(&mut self, other: SessionConfig) {
        merge_opt(&mut self.path, other.path);
    }
}

impl ViewConfig {
    fn merge(&mut self, other: ViewConfig) {
        merge_opt(&mut self.format, other.format);
        merge_opt(&mut self.page_size, other.page_size);
        merge_opt(&mut self.sort_mode, other.sort_mode);
        merge_opt(&mut self.prune_idle, other.prune_idle);
    }
}

impl ExportConfig {
    fn merge(&mut self, other: ExportConfig) {
        merge_opt(&mut self.output, other.output);
    }
}

impl TopConfig {
    fn merge(&mut self, other: TopConfig) {
        merge_opt(&mut self.format, other.format);
        merge_opt(&mut self.limit, other.limit);
    }
}

impl LogConfig {
    fn merge(&mut self, other: LogConfig) {
        merge_opt(&mut self.level, other.level);
    }
}

fn merge_opt<T>(base: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *base = other;
    }
}

fn config_search_paths() -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    if let Some(home) = home_dir() {
        if let Some(config_home) = config_home_dir(&home) {
            paths.push(config_home.join("webtrack").join("webtrack.toml"));
        }
        if let Some(appdata) = env::var_os("APPDATA") {
            paths.push(PathBuf::from(appdata).join("webtrack").join("webtrack.toml"));
        }
        paths.push(home.join(".webtrackrc"));
    }

    if let Ok(cwd) = env::current_dir() {
        let mut dirs = Vec::new();
        let mut current: Option<&Path> = Some(cwd.as_path());
        while let Some(dir) = current {
            dirs.push(dir.to_path_buf());
            current = dir.parent();
        }
        dirs.reverse();
        for dir in dirs {
            paths.push(dir.join(".webtrackrc"));
            paths.push(dir.join("webtrack.toml"));
        }
    }

    Ok(paths)
}

fn config_home_dir(home: &Path) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg));
    }
    Some(home.join(".config"))
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
}

fn default_session_path() -> PathBuf {
    match home_dir().and_then(|home| config_home_dir(&home)) {
        Some(dir) => dir.join("webtrack").join("session.json"),
        None => PathBuf::from(".webtrack-session.json"),
    }
}

pub fn render_config(config: &ResolvedConfig) -> Result<String> {
    toml::to_string_pretty(config)
        .map_err(|err| WebtrackError::InvalidArgs(format!("Failed to render config: {}", err)))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use tempfile::TempDir;

    use super::{load_config_from, render_config, ResolvedConfig};
    use crate::commands::OutputFormat;
    use crate::pipeline::SortMode;

    #[test]
    fn defaults_point_at_local_services() {
        let resolved = ResolvedConfig::default();
        assert_eq!(
            resolved.server.reports_url,
            "http://localhost:9090/api/reports/fetch/all"
        );
        assert_eq!(resolved.view.page_size, 10);
        assert_eq!(resolved.view.sort_mode, SortMode::Regroup);
        assert_eq!(resolved.export.output, PathBuf::from("report.csv"));
        assert_eq!(resolved.top.limit, 10);
    }

    #[test]
    fn later_files_override_earlier_ones_per_field() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("first.toml");
        let second = tmp.path().join("second.toml");
        fs::write(
            &first,
            "[server]\nreports_url = \"http://a/reports\"\ntimeout_secs = 5\n\n[view]\npage_size = 25\n",
        )
        .unwrap();
        fs::write(
            &second,
            "[server]\nreports_url = \"http://b/reports\"\n\n[view]\nsort_mode = \"in-place\"\nformat = \"json\"\n",
        )
        .unwrap();

        let config =
            load_config_from(&[first, tmp.path().join("missing.toml"), second]).unwrap();
        let resolved = ResolvedConfig::from_config(&config);
        assert_eq!(resolved.server.reports_url, "http://b/reports");
        assert_eq!(resolved.server.timeout_secs, 5);
        assert_eq!(resolved.view.page_size, 25);
        assert_eq!(resolved.view.sort_mode, SortMode::InPlace);
        assert!(matches!(resolved.view.format, OutputFormat::Json));
    }

    #[test]
    fn reports_the_offending_file() {
        let tmp = TempDir::new().unwrap();
        let bad = tmp.path().join("bad.toml");
        fs::write(&bad, "[view]\npage_size = \"many\"\n").unwrap();
        let err = load_config_from(&[bad]).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn renders_as_toml() {
        let rendered = render_config(&ResolvedConfig::default()).unwrap();
        assert!(rendered.contains("[server]"));
        assert!(rendered.contains("sort_mode = \"regroup\""));
    }
}
