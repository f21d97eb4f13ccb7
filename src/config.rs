//! 配置
//!
//! 优先级：命令行 > 数据目录下的 config.toml > 内置默认值

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

use crate::theme::Theme;

pub const DEFAULT_API_URL: &str = "https://icanhazdadjoke.com";
pub const DEFAULT_BATCH_SIZE: u32 = 10;
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not locate the user data directory")]
    NoDataDir,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config.toml: {0}")]
    Parse(#[from] toml::de::Error),
}

/// 拖拽笑话进行分类的终端程序
#[derive(Debug, Default, Parser)]
#[command(name = "jokesort", version, about)]
pub struct Cli {
    /// 数据目录（默认 ~/.local/share/jokesort）
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// 笑话 API 地址
    #[arg(long)]
    pub api_url: Option<String>,

    /// 每次抓取的数量
    #[arg(long)]
    pub batch_size: Option<u32>,

    /// 初始主题（默认根据终端背景检测）
    #[arg(long, value_enum)]
    pub theme: Option<Theme>,
}

/// config.toml 文件结构，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub batch_size: Option<u32>,
    pub theme: Option<Theme>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub api_url: String,
    pub batch_size: u32,
    /// 未指定时由终端环境决定
    pub theme: Option<Theme>,
}

impl Config {
    pub fn resolve(cli: Cli) -> Result<Self, ConfigError> {
        let data_dir = match cli.data_dir.clone() {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&data_dir)?;

        let file = FileConfig::load(&data_dir.join(CONFIG_FILE))?;
        Ok(Self::merge(data_dir, cli, file))
    }

    fn merge(data_dir: PathBuf, cli: Cli, file: FileConfig) -> Self {
        Self {
            data_dir,
            api_url: cli
                .api_url
                .or(file.api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            batch_size: cli
                .batch_size
                .or(file.batch_size)
                .unwrap_or(DEFAULT_BATCH_SIZE),
            theme: cli.theme.or(file.theme),
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("jokesort.log")
    }

    pub fn cursor_path(&self) -> PathBuf {
        self.data_dir.join(crate::fetch::CURSOR_FILE)
    }
}

/// 获取数据目录路径 (~/.local/share/jokesort/)
fn default_data_dir() -> Result<PathBuf, ConfigError> {
    Ok(dirs::data_dir().ok_or(ConfigError::NoDataDir)?.join("jokesort"))
}
