use crate::error::{Result, SweepError};
use json::JsonValue;
use std::fs;
use std::path::Path;

/// 默认配置文件名，位于工作目录下。
pub const CONFIG_FILE_NAME: &str = "ferguson_config.json";

/// 测试命令的`-ctype`取值。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TestMode {
    /// 仅使用SVM+HOG，逐切片取最大值。
    MaxSlice,
    /// 动态规划求解中心线。
    Dpdt,
}

impl TestMode {
    #[inline]
    pub fn ctype(self) -> &'static str {
        match self {
            TestMode::MaxSlice => "maxslice",
            TestMode::Dpdt => "dpdt",
        }
    }
}

/// 一次扫描的配置，加载后不再修改。
#[derive(Clone, Debug, PartialEq)]
pub struct SweepConfig {
    pub contrast: String,
    pub nb_image_train: usize,
    pub rot: bool,
    /// 验证集被试编号，去重后保持首次出现的顺序。
    pub valid_subj: Vec<String>,
    pub svm_hog_alone: bool,
}

impl SweepConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| SweepError::io(path, e))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let root = json::parse(text)?;
        if !root.is_object() {
            return Err(config_err("<root>", "expected a json object"));
        }

        let contrast = root["contrast"]
            .as_str()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| config_err("contrast", "expected a non-empty string"))?
            .to_string();
        let nb_image_train = root["nb_image_train"]
            .as_usize()
            .ok_or_else(|| config_err("nb_image_train", "expected a non-negative integer"))?;
        let rot = flag(&root["rot"], "rot")?;
        let svm_hog_alone = flag(&root["svm_hog_alone"], "svm_hog_alone")?;

        let subjects = &root["valid_subj"];
        if !subjects.is_array() {
            return Err(config_err("valid_subj", "expected an array of strings"));
        }
        let mut valid_subj: Vec<String> = Vec::with_capacity(subjects.len());
        for member in subjects.members() {
            let id = member
                .as_str()
                .ok_or_else(|| config_err("valid_subj", "expected an array of strings"))?;
            if !valid_subj.iter().any(|s| s == id) {
                valid_subj.push(id.to_string());
            }
        }

        Ok(Self {
            contrast,
            nb_image_train,
            rot,
            valid_subj,
            svm_hog_alone,
        })
    }

    #[inline]
    pub fn test_mode(&self) -> TestMode {
        if self.svm_hog_alone {
            TestMode::MaxSlice
        } else {
            TestMode::Dpdt
        }
    }
}

fn flag(v: &JsonValue, key: &'static str) -> Result<bool> {
    // 旧配置里的标志位可能是0/1
    if let Some(b) = v.as_bool() {
        return Ok(b);
    }
    match v.as_i64() {
        Some(n) => Ok(n != 0),
        None => Err(config_err(key, "expected a boolean")),
    }
}

#[inline]
fn config_err(key: &'static str, reason: &str) -> SweepError {
    SweepError::Config {
        key,
        reason: reason.to_string(),
    }
}
