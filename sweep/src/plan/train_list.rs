use crate::error::{Result, SweepError};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const CENTER_MARK: &str = "_ctr";

/// 一个训练列表文件：每行一个训练被试（可带路径前缀），附带一个同名的`_ctr.txt`中心线文件。
#[derive(Clone, Debug)]
pub struct TrainingList {
    path: PathBuf,
    base: String,
    subjects: HashSet<String>,
}

impl TrainingList {
    /// 读取列表文件，取每行最后一个`/`之后的部分作为被试编号，忽略空行。
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let base = base_name(path).ok_or_else(|| {
            SweepError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"),
            )
        })?;
        let text = fs::read_to_string(path).map_err(|e| SweepError::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            base,
            subjects: parse_subjects(&text),
        })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// 文件名第一个`.`之前的部分，用于命名模型与输出目录。
    #[inline]
    pub fn base(&self) -> &str {
        self.base.as_str()
    }

    pub fn center_path(&self) -> PathBuf {
        self.path
            .with_file_name(format!("{}{CENTER_MARK}.txt", self.base))
    }

    #[inline]
    pub fn subjects(&self) -> &HashSet<String> {
        &self.subjects
    }

    #[inline]
    pub fn contains(&self, subject: &str) -> bool {
        self.subjects.contains(subject)
    }

    /// 验证集中不属于本列表的被试，保持验证集原有顺序。
    pub fn held_out<'a>(&self, valid_subj: &'a [String]) -> Vec<&'a str> {
        valid_subj
            .iter()
            .map(String::as_str)
            .filter(|s| !self.contains(s))
            .collect()
    }
}

fn base_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    name.split('.').next().map(str::to_string)
}

fn parse_subjects(text: &str) -> HashSet<String> {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.rsplit('/').next())
        .map(str::to_string)
        .collect()
}

/// 是否是训练列表文件名：以`.txt`结尾且不含`_ctr`。
#[inline]
pub fn is_training_list_name(name: &str) -> bool {
    name.ends_with(".txt") && !name.contains(CENTER_MARK)
}

/// 按文件名排序列出目录（不递归）下的训练列表文件。
pub fn discover<P: AsRef<Path>>(train_dir: P) -> Result<Vec<PathBuf>> {
    let train_dir = train_dir.as_ref();
    let mut found = Vec::new();
    for entry in WalkDir::new(train_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(train_dir).to_path_buf();
            SweepError::io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if is_training_list_name(name) {
                found.push(entry.into_path());
            }
        }
    }
    Ok(found)
}
