use std::io;
use std::path::PathBuf;

/// 扫描过程中可能出现的错误。外部程序的退出状态不在此列，只记录日志。
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("I/O error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed config json: {0}")]
    Json(#[from] json::Error),
    #[error("config key `{key}`: {reason}")]
    Config { key: &'static str, reason: String },
    #[error("rotation spec `{0}` is not of the form `a:b:c`")]
    Rotation(String),
}

impl SweepError {
    #[inline]
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SweepError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SweepError>;
