//! 扫描前检查验证集被试的输入图像。

use crate::plan::Layout;
use nifti::{NiftiError, NiftiHeader};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// 依次尝试的输入图像扩展名。`.hdr`可能是NIfTI-1头文件，也可能是Analyze 7.5头文件。
pub const INPUT_EXTS: [&str; 3] = ["nii.gz", "nii", "hdr"];

#[derive(Clone, Debug, PartialEq)]
pub enum InputStatus {
    /// 读到的图像维度（不含`dim[0]`）。
    Ok { path: PathBuf, dims: Vec<u16> },
    /// `.hdr`存在但没有NIfTI标识，按Analyze 7.5处理，不解析维度。
    Analyze { path: PathBuf },
    Missing,
    Unreadable { path: PathBuf, reason: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct InputReport {
    pub subject: String,
    pub status: InputStatus,
}

impl InputReport {
    #[inline]
    pub fn is_ok(&self) -> bool {
        matches!(
            self.status,
            InputStatus::Ok { .. } | InputStatus::Analyze { .. }
        )
    }
}

/// 检查`subjects`中每个被试在输入目录下是否有可读的图像头。
pub fn inspect<S: AsRef<str>>(layout: &Layout, subjects: &[S]) -> Vec<InputReport> {
    subjects
        .iter()
        .map(|s| {
            let subject = s.as_ref();
            InputReport {
                subject: subject.to_string(),
                status: inspect_one(layout, subject),
            }
        })
        .collect()
}

fn inspect_one(layout: &Layout, subject: &str) -> InputStatus {
    let Some(path) = INPUT_EXTS
        .iter()
        .map(|ext| layout.input_dir().join(format!("{subject}.{ext}")))
        .find(|p| p.is_file())
    else {
        return InputStatus::Missing;
    };
    match NiftiHeader::from_file(&path) {
        Ok(header) => InputStatus::Ok {
            dims: dims_of(&header.dim),
            path,
        },
        Err(NiftiError::InvalidFormat) if is_analyze_header(&path) => {
            InputStatus::Analyze { path }
        }
        Err(e) => InputStatus::Unreadable {
            reason: e.to_string(),
            path,
        },
    }
}

/// Analyze 7.5头与NIfTI-1头同为348字节，区别只在magic字段。
fn is_analyze_header(path: &Path) -> bool {
    const HEADER_LEN: i32 = 348;
    if path.extension().map_or(true, |ext| ext != "hdr") {
        return false;
    }
    let mut sizeof_hdr = [0u8; 4];
    match File::open(path).and_then(|mut f| f.read_exact(&mut sizeof_hdr)) {
        Ok(()) => {
            let len = fs::metadata(path).map_or(0, |m| m.len());
            len >= HEADER_LEN as u64
                && (i32::from_le_bytes(sizeof_hdr) == HEADER_LEN
                    || i32::from_be_bytes(sizeof_hdr) == HEADER_LEN)
        }
        Err(_) => false,
    }
}

fn dims_of(dim: &[u16; 8]) -> Vec<u16> {
    let n = (dim[0] as usize).min(7);
    dim[1..=n].to_vec()
}
