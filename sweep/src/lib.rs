//! 旋转增强参数扫描：对每个训练列表与每个旋转参数训练脊髓检测模型，
//! 并在不属于该训练列表的验证集被试上测试。

pub mod check;
pub mod error;
pub mod exec;
pub mod inputs;
pub mod log;
pub mod plan;
pub mod prelude;

pub use error::{Result, SweepError};
