//! 笑话抓取
//!
//! `DadJokeClient` 以阻塞方式调用公开 API；`Fetcher` 把每次请求放到
//! 独立线程执行，结果通过 channel 交回事件循环。
//!
//! 翻页游标保存在数据目录里，重启后从上次停下的页继续，
//! 避免把已经分类过的笑话再抓回来。

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::Item;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("could not decode joke response: {0}")]
    Decode(#[from] std::io::Error),

    #[error("fetch worker stopped unexpectedly")]
    Disconnected,
}

/// 抓取协作者
pub trait JokeSource: Send + Sync {
    fn fetch_batch(&self) -> Result<Vec<Item>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<JokeDto>,
    #[serde(default)]
    current_page: u32,
    #[serde(default)]
    total_pages: u32,
}

#[derive(Debug, Deserialize)]
struct JokeDto {
    id: String,
    joke: String,
}

pub const CURSOR_FILE: &str = "fetch_cursor.toml";

/// 没有保存过游标时，从前 20 页里随机挑一页开始
const RANDOM_START_PAGES: u32 = 20;

#[derive(Debug, Serialize, Deserialize)]
struct CursorFile {
    next_page: u32,
}

fn load_cursor(path: &Path) -> Option<u32> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read fetch cursor");
            return None;
        }
    };
    match toml::from_str::<CursorFile>(&content) {
        Ok(cursor) if cursor.next_page > 0 => Some(cursor.next_page),
        Ok(_) => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring corrupt fetch cursor");
            None
        }
    }
}

fn save_cursor(path: &Path, next_page: u32) {
    let saved = toml::to_string_pretty(&CursorFile { next_page })
        .map_err(|e| e.to_string())
        .and_then(|content| fs::write(path, content).map_err(|e| e.to_string()));
    if let Err(error) = saved {
        warn!(path = %path.display(), %error, "could not save fetch cursor");
    }
}

/// icanhazdadjoke.com 的分页搜索接口
pub struct DadJokeClient {
    api_url: String,
    batch_size: u32,
    next_page: AtomicU32,
    cursor_path: Option<PathBuf>,
}

impl DadJokeClient {
    pub fn new(api_url: impl Into<String>, batch_size: u32) -> Self {
        let start = rand::thread_rng().gen_range(1..=RANDOM_START_PAGES);
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            batch_size: batch_size.max(1),
            next_page: AtomicU32::new(start),
            cursor_path: None,
        }
    }

    /// 从游标文件恢复页码，之后每次翻页都写回
    pub fn with_cursor_file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Some(page) = load_cursor(&path) {
            debug!(page, "resuming fetch cursor");
            self.next_page.store(page, Ordering::SeqCst);
        }
        self.cursor_path = Some(path);
        self
    }

    pub fn next_page(&self) -> u32 {
        self.next_page.load(Ordering::SeqCst)
    }

    fn advance(&self, next: u32) {
        self.next_page.store(next, Ordering::SeqCst);
        if let Some(path) = &self.cursor_path {
            save_cursor(path, next);
        }
    }

    fn page_url(&self, page: u32) -> String {
        format!(
            "{}/search?page={}&limit={}",
            self.api_url, page, self.batch_size
        )
    }
}

impl JokeSource for DadJokeClient {
    fn fetch_batch(&self) -> Result<Vec<Item>, FetchError> {
        let page = self.next_page();
        let url = self.page_url(page);
        debug!(%url, "fetching jokes");

        let response = ureq::get(&url)
            .set("Accept", "application/json")
            .set("User-Agent", concat!("jokesort/", env!("CARGO_PKG_VERSION")))
            .call()
            .map_err(|err| FetchError::Request {
                url: url.clone(),
                message: err.to_string(),
            })?;

        let body: SearchResponse = response.into_json()?;

        // 最后一页之后回到第一页
        let current = body.current_page.max(page);
        let next = if body.total_pages == 0 || current >= body.total_pages {
            1
        } else {
            current + 1
        };
        self.advance(next);

        Ok(body
            .results
            .into_iter()
            .map(|dto| Item::new(dto.id, dto.joke))
            .collect())
    }
}

/// 后台抓取；允许并发请求，重复条目由 ingest 去重
pub struct Fetcher {
    source: Arc<dyn JokeSource>,
    tx: Sender<Result<Vec<Item>, FetchError>>,
    rx: Receiver<Result<Vec<Item>, FetchError>>,
    in_flight: usize,
}

impl Fetcher {
    pub fn new(source: Arc<dyn JokeSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn request(&mut self) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.in_flight += 1;
        info!(in_flight = self.in_flight, "requesting joke batch");

        let spawned = thread::Builder::new()
            .name("jokesort-fetch".to_string())
            .spawn(move || {
                let result = source.fetch_batch();
                // 接收端已关闭说明程序正在退出
                let _ = tx.send(result);
            });

        if let Err(e) = spawned {
            warn!(error = %e, "could not spawn fetch worker");
            let _ = self.tx.send(Err(FetchError::Disconnected));
        }
    }

    /// 取出已完成的抓取结果（不阻塞）
    pub fn poll(&mut self) -> Vec<Result<Vec<Item>, FetchError>> {
        let done: Vec<_> = self.rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(done.len());
        done
    }

    /// 阻塞直到所有请求完成，仅用于测试
    #[cfg(test)]
    pub fn wait_all(&mut self) -> Vec<Result<Vec<Item>, FetchError>> {
        let mut done = Vec::new();
        while self.in_flight > 0 {
            match self.rx.recv() {
                Ok(result) => {
                    self.in_flight -= 1;
                    done.push(result);
                }
                Err(_) => break,
            }
        }
        done
    }
}

/// 测试用的固定数据源
#[cfg(test)]
pub struct StaticSource {
    pub batch: Vec<Item>,
    pub fail: bool,
}

#[cfg(test)]
impl JokeSource for StaticSource {
    fn fetch_batch(&self) -> Result<Vec<Item>, FetchError> {
        if self.fail {
            return Err(FetchError::Request {
                url: "static://".to_string(),
                message: "offline".to_string(),
            });
        }
        Ok(self.batch.clone())
    }
}
