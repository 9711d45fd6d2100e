//! Ernst角计算结果的校验。

use std::fmt;
use std::fs;
use std::path::Path;

/// `-tr 2000 -t1 850`对应的Ernst角真值（度）。
pub const ERNST_ANGLE_GT: f64 = 84.543553255;
pub const ERNST_ANGLE_THRESHOLD: f64 = 0.00001;
pub const ERNST_ANGLE_FILE: &str = "ernst_angle.txt";
/// 生成结果文件时的默认参数。
pub const ERNST_ANGLE_DEFAULT_ARGS: [&str; 6] =
    ["-tr", "2000", "-t1", "850", "-o", ERNST_ANGLE_FILE];
/// 校验失败或出错时的状态码。
pub const FAILURE_STATUS: i32 = 99;

#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    Pass,
    Fail { value: f64 },
    Error,
}

/// 校验结果：状态码为0表示通过；`output`在出错时附带错误信息。
#[derive(Clone, Debug, PartialEq)]
pub struct CheckReport {
    pub verdict: Verdict,
    pub status: i32,
    pub output: String,
}

impl CheckReport {
    #[inline]
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (status {})", self.output, self.status)
    }
}

/// 以绝对误差比较单个浮点结果。
#[derive(Copy, Clone, Debug)]
pub struct ResultCheck {
    pub expected: f64,
    pub threshold: f64,
}

impl Default for ResultCheck {
    fn default() -> Self {
        Self {
            expected: ERNST_ANGLE_GT,
            threshold: ERNST_ANGLE_THRESHOLD,
        }
    }
}

impl ResultCheck {
    #[inline]
    pub fn new(expected: f64, threshold: f64) -> Self {
        Self {
            expected,
            threshold,
        }
    }

    pub fn check_value(&self, value: f64) -> CheckReport {
        if (value - self.expected).abs() < self.threshold {
            CheckReport {
                verdict: Verdict::Pass,
                status: 0,
                output: "PASS".to_string(),
            }
        } else {
            CheckReport {
                verdict: Verdict::Fail { value },
                status: FAILURE_STATUS,
                output: "FAIL".to_string(),
            }
        }
    }

    /// 读取只含一个浮点数的文本文件并校验。读取或解析失败时状态码为99，错误信息写入`output`。
    pub fn check_file<P: AsRef<Path>>(&self, path: P) -> CheckReport {
        let path = path.as_ref();
        let parsed = fs::read_to_string(path)
            .map_err(|e| format!("{}: {e}", path.display()))
            .and_then(|text| {
                let text = text.trim();
                text.parse::<f64>()
                    .map_err(|e| format!("could not convert {text:?} to float: {e}"))
            });
        match parsed {
            Ok(value) => self.check_value(value),
            Err(msg) => CheckReport {
                verdict: Verdict::Error,
                status: FAILURE_STATUS,
                output: msg,
            },
        }
    }
}
