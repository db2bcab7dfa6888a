use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use config::Config;
use serde::{Deserialize, Serialize};

use crate::error::SumError;

static CONFIG: OnceLock<SumConfig> = OnceLock::new();

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct SumConfig {
    // 读取文件时的缓冲区字节大小
    pub io_buf_size: usize,

    // 同时计算多个文件摘要时使用的最大线程数
    pub threads: usize,
}

impl Default for SumConfig {
    fn default() -> Self {
        Self {
            io_buf_size: 8 * 1024,
            threads: (num_cpus::get() >> 1).max(1),
        }
    }
}

impl SumConfig {
    pub const MIN_IO_BUF_SIZE: usize = 64;
    pub const MAX_IO_BUF_SIZE: usize = 1024 * 1024;
    pub const ENV_PREFIX: &'static str = "SHA2SUM";

    /// 全局配置. 未调用过`SumConfig::init`时, 从默认配置文件和环境变量加载, 加载失败使用默认值.
    pub fn config() -> &'static Self {
        CONFIG.get_or_init(|| {
            Self::load(None).unwrap_or_else(|e| {
                log::warn!("{e}, fallback to default config");
                Self::default()
            })
        })
    }

    /// 从指定的配置文件初始化全局配置, 只有第一次调用生效
    pub fn init(f: Option<&Path>) -> Result<&'static Self, SumError> {
        let config = Self::load(f)?;
        Ok(CONFIG.get_or_init(|| config))
    }

    /// 依次叠加默认值, 配置文件和`SHA2SUM__`前缀的环境变量.
    /// 未指定`f`时使用`~/.sha2sum.json`, 该文件可以不存在.
    pub fn load(f: Option<&Path>) -> Result<Self, SumError> {
        let default_config =
            Config::try_from(&SumConfig::default()).map_err(|e| SumError::Config(e.to_string()))?;

        let mut config = Config::builder().add_source(default_config);

        if let Some(f) = f {
            config = config.add_source(config::File::from(f).required(true));
        } else if let Some(f) = Self::default_file() {
            config = config.add_source(config::File::from(f).required(false));
        }

        let config = config
            .add_source(
                config::Environment::with_prefix(Self::ENV_PREFIX)
                    .try_parsing(true)
                    .separator("__"),
            )
            .build()
            .map_err(|e| SumError::Config(e.to_string()))?;

        let config: SumConfig = config
            .try_deserialize()
            .map_err(|e| SumError::Config(e.to_string()))?;
        let config = config.normalize();

        log::trace!("{:?}", config);

        Ok(config)
    }

    pub fn default_file() -> Option<PathBuf> {
        home::home_dir().map(|h| h.join(".sha2sum.json"))
    }

    fn normalize(mut self) -> Self {
        self.io_buf_size = self
            .io_buf_size
            .clamp(Self::MIN_IO_BUF_SIZE, Self::MAX_IO_BUF_SIZE);
        self.threads = self.threads.max(1);
        self
    }

    pub fn io_buf(&self) -> Vec<u8> {
        vec![0u8; self.io_buf_size]
    }
}

#[cfg(test)]
mod tests {
    use super::SumConfig;

    #[test]
    fn default_config() {
        let c = SumConfig::default();
        assert_eq!(c.io_buf_size, 8192);
        assert!(c.threads >= 1);
        assert_eq!(c.io_buf().len(), 8192);
    }

    #[test]
    fn normalize_config() {
        let c = SumConfig {
            io_buf_size: 1,
            threads: 0,
        }
        .normalize();
        assert_eq!(c.io_buf_size, SumConfig::MIN_IO_BUF_SIZE);
        assert_eq!(c.threads, 1);

        let c = SumConfig {
            io_buf_size: usize::MAX,
            threads: 3,
        }
        .normalize();
        assert_eq!(c.io_buf_size, SumConfig::MAX_IO_BUF_SIZE);
        assert_eq!(c.threads, 3);
    }

    #[test]
    fn load_from_file() {
        let f = std::env::temp_dir().join(format!("sha2sum-config-{}.json", std::process::id()));
        std::fs::write(&f, r#"{ "io_buf_size": 16, "threads": 2 }"#).unwrap();

        let c = SumConfig::load(Some(f.as_path()));
        std::fs::remove_file(&f).unwrap();

        let c = c.unwrap();
        assert_eq!(c.io_buf_size, SumConfig::MIN_IO_BUF_SIZE);
        assert_eq!(c.threads, 2);
    }

    #[test]
    fn load_missing_file() {
        let f = std::env::temp_dir().join("sha2sum-config-not-exist.json");
        assert!(SumConfig::load(Some(f.as_path())).is_err());
    }
}
