//! WHY 日志存储
//!
//! 把对局日志导出为 JSONL 文件，并提供列出、读取、删除

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use protocol::GameLog;
use tracing::info;

/// 日志存储管理器
pub struct LogStorage {
    logs_dir: PathBuf,
}

impl LogStorage {
    /// 创建存储管理器；未指定目录时使用平台数据目录
    pub fn new(dir: Option<PathBuf>) -> Result<Self> {
        let logs_dir = match dir {
            Some(dir) => dir,
            None => get_logs_directory()?,
        };

        // 确保目录存在
        if !logs_dir.exists() {
            fs::create_dir_all(&logs_dir)
                .with_context(|| format!("无法创建日志目录: {:?}", logs_dir))?;
        }

        Ok(Self { logs_dir })
    }

    /// 保存日志，返回文件名（不含路径）
    pub fn save_log(&self, log: &GameLog) -> Result<String> {
        let filename = self.unused_filename(&Utc::now());
        let filepath = self.logs_dir.join(&filename);

        let file = fs::File::create(&filepath)
            .with_context(|| format!("创建文件失败: {:?}", filepath))?;
        log.write_jsonl(std::io::BufWriter::new(file))
            .with_context(|| format!("写入日志失败: {:?}", filepath))?;

        info!(file = %filename, records = log.len(), "WHY log saved");
        Ok(filename)
    }

    /// 读取日志
    pub fn load_log(&self, name: &str) -> Result<GameLog> {
        let filepath = self.logs_dir.join(name);

        if !filepath.exists() {
            anyhow::bail!("日志文件不存在: {}", name);
        }

        let content = fs::read_to_string(&filepath)
            .with_context(|| format!("读取文件失败: {:?}", filepath))?;

        GameLog::from_jsonl(&content).context("解析日志文件失败")
    }

    /// 列出所有日志（最新的在前）
    pub fn list_logs(&self) -> Result<Vec<SavedLogInfo>> {
        let mut logs = Vec::new();

        let entries = fs::read_dir(&self.logs_dir)
            .with_context(|| format!("读取日志目录失败: {:?}", self.logs_dir))?;

        for entry in entries {
            let entry = entry.context("读取目录项失败")?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some("jsonl") {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };

            // 跳过损坏的文件
            let Ok(log) = self.load_log(filename) else {
                continue;
            };

            let saved_at = entry
                .metadata()
                .and_then(|m| m.modified())
                .map(DateTime::from)
                .unwrap_or_else(|_| Utc::now());

            logs.push(SavedLogInfo {
                file_name: filename.to_string(),
                saved_at,
                record_count: log.len(),
            });
        }

        logs.sort_by(|a, b| {
            b.saved_at
                .cmp(&a.saved_at)
                .then_with(|| b.file_name.cmp(&a.file_name))
        });
        Ok(logs)
    }

    /// 删除日志
    pub fn delete_log(&self, name: &str) -> Result<()> {
        let filepath = self.logs_dir.join(name);

        if filepath.exists() {
            fs::remove_file(&filepath)
                .with_context(|| format!("删除文件失败: {:?}", filepath))?;
        }

        Ok(())
    }

    /// 获取日志目录路径
    pub fn logs_directory(&self) -> &Path {
        &self.logs_dir
    }

    /// 同一毫秒内重复保存时追加序号
    fn unused_filename(&self, timestamp: &DateTime<Utc>) -> String {
        let base = generate_filename(timestamp);
        if !self.logs_dir.join(&base).exists() {
            return base;
        }

        let stem = base.trim_end_matches(".jsonl");
        (1..)
            .map(|i| format!("{}_{}.jsonl", stem, i))
            .find(|name| !self.logs_dir.join(name).exists())
            .unwrap_or(base)
    }
}

/// 已保存日志的信息
#[derive(Debug, Clone)]
pub struct SavedLogInfo {
    /// 文件名
    pub file_name: String,
    /// 保存时间
    pub saved_at: DateTime<Utc>,
    /// 记录条数
    pub record_count: usize,
}

/// 获取跨平台日志目录
fn get_logs_directory() -> Result<PathBuf> {
    let app_data_dir = dirs::data_dir().context("无法获取应用数据目录")?;

    Ok(app_data_dir.join("reversi-why").join("logs"))
}

/// 生成文件名
fn generate_filename(timestamp: &DateTime<Utc>) -> String {
    format!("reversi_why_{}.jsonl", timestamp.timestamp_millis())
}
