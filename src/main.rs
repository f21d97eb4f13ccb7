mod clock;
mod config;
mod drop_target;
mod fetch;
mod gesture;
mod models;
mod storage;
mod store;
mod summary;
mod theme;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Config};
use crate::fetch::{DadJokeClient, Fetcher};
use crate::storage::TomlStorage;
use crate::store::{RestoreOutcome, SortingStore};
use crate::theme::Theme;
use crate::ui::{App, handle_event, render};

/// 事件轮询间隔，同时驱动每秒的计时显示
const TICK: Duration = Duration::from_millis(250);

/// 终端由界面占用，日志写入数据目录下的文件
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
        .with_context(|| format!("cannot open log file {}", config.log_path().display()))?;

    let filter = EnvFilter::try_from_env("JOKESORT_LOG")
        .unwrap_or_else(|_| EnvFilter::new("jokesort=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .compact()
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = Config::resolve(Cli::parse()).context("failed to load configuration")?;
    init_tracing(&config)?;
    info!(data_dir = %config.data_dir.display(), api = %config.api_url, "starting");

    // 恢复上次的状态
    let storage = TomlStorage::in_dir(&config.data_dir);
    info!(snapshot = %storage.path().display(), "restoring");
    let (store, outcome) = SortingStore::restore(Box::new(storage));

    let source = DadJokeClient::new(config.api_url.clone(), config.batch_size)
        .with_cursor_file(config.cursor_path());
    let mut fetcher = Fetcher::new(Arc::new(source));
    if outcome == RestoreOutcome::Empty {
        fetcher.request();
    }

    let theme = config.theme.unwrap_or_else(Theme::detect);
    let mut app = App::new(store, fetcher, theme);

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    info!(
        pending = app.store.pending().len(),
        classified = app.store.history().len(),
        "exiting"
    );
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        app.tick(std::time::Instant::now());
        terminal.draw(|f| render(f, app))?;

        if event::poll(TICK)? && handle_event(app, event::read()?) {
            break;
        }
    }
    Ok(())
}
