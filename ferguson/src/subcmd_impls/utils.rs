use std::path::{Path, PathBuf};
use sweep::plan::{SweepConfig, CONFIG_FILE_NAME};
use sweep::Result;

/// 未指定配置文件时使用`<work>/ferguson_config.json`。
pub fn load_config(work_dir: &Path, config: Option<&Path>) -> Result<(PathBuf, SweepConfig)> {
    let path = match config {
        Some(p) => p.to_path_buf(),
        None => work_dir.join(CONFIG_FILE_NAME),
    };
    let loaded = SweepConfig::load(&path)?;
    Ok((path, loaded))
}

pub fn positive_float(s: &str) -> std::result::Result<f64, &'static str> {
    const ERR: &str = "需要一个正的有限浮点数";
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ERR),
    }
}
