use super::config::SweepConfig;
use super::rotation::RotationSpec;
use std::env;
use std::path::{Component, Path, PathBuf};

/// 模型描述文件的扩展名。
pub const MODEL_EXT: &str = "yml";

/// 测试命令在输出目录中留下的中间文件后缀。
pub const BYPRODUCT_SUFFIXES: [&str; 3] = ["_ctr.txt", "_svm.hdr", "_svm.img"];

/// 工作目录下的目录结构：
///
/// ```text
/// <work>/input_img/<contrast>/
/// <work>/<contrast>_<n>/
/// <work>/output_img_<contrast>_<a_b_c>/<base>/
/// ```
#[derive(Clone, Debug)]
pub struct Layout {
    work_dir: PathBuf,
    contrast: String,
    nb_image_train: usize,
}

impl Layout {
    /// 相对路径按当前进程目录转为绝对路径，外部程序在其他目录下运行时也能找到文件。
    pub fn new(work_dir: impl Into<PathBuf>, config: &SweepConfig) -> Self {
        Self {
            work_dir: absolutize(work_dir.into()),
            contrast: config.contrast.clone(),
            nb_image_train: config.nb_image_train,
        }
    }

    pub fn input_dir(&self) -> PathBuf {
        let mut p = self.work_dir.clone();
        p.extend(["input_img", self.contrast.as_str()]);
        p
    }

    /// 训练列表所在目录，同时也是模型文件的最终位置。
    pub fn train_dir(&self) -> PathBuf {
        self.work_dir
            .join(format!("{}_{}", self.contrast, self.nb_image_train))
    }

    pub fn result_dir(&self, rot: RotationSpec) -> PathBuf {
        self.work_dir
            .join(format!("output_img_{}_{}", self.contrast, rot.underscored()))
    }

    /// 某个训练列表在某个旋转参数下的测试输出目录。
    pub fn list_result_dir(&self, rot: RotationSpec, base: &str) -> PathBuf {
        self.result_dir(rot).join(base)
    }

    /// 传给测试命令的模型路径（不带扩展名）。
    pub fn model_stem(&self, base: &str) -> PathBuf {
        self.train_dir().join(base)
    }

    pub fn model_file(&self, base: &str) -> PathBuf {
        self.train_dir().join(model_file_name(base))
    }

    pub fn input_image(&self, subject: &str) -> PathBuf {
        self.input_dir().join(subject)
    }
}

/// 相对路径拼接到当前进程目录之下；取不到当前目录时原样返回。
pub fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match env::current_dir() {
        Ok(cwd) => cwd
            .join(&path)
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect(),
        Err(_) => path,
    }
}

#[inline]
pub fn model_file_name(base: &str) -> String {
    format!("{base}.{MODEL_EXT}")
}

/// 某个被试在输出目录中的全部中间文件路径。
pub fn byproducts(list_result_dir: &Path, subject: &str) -> [PathBuf; 3] {
    BYPRODUCT_SUFFIXES.map(|suffix| list_result_dir.join(format!("{subject}{suffix}")))
}
