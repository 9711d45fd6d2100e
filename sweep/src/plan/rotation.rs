use crate::error::SweepError;
use std::fmt;
use std::str::FromStr;

/// 训练时的旋转增强参数，即`--addRot=`接收的三元组`a:b:c`。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct RotationSpec(pub u32, pub u32, pub u32);

/// 固定的扫描列表。
pub const ROTATION_SWEEP: [RotationSpec; 5] = [
    RotationSpec(0, 360, 0),
    RotationSpec(6, 60, 60),
    RotationSpec(12, 60, 60),
    RotationSpec(36, 360, 60),
    RotationSpec(72, 360, 60),
];

impl RotationSpec {
    #[inline]
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }

    /// 目录名使用的形式，如`12_60_60`。
    pub fn underscored(self) -> String {
        format!("{}_{}_{}", self.0, self.1, self.2)
    }
}

impl fmt::Display for RotationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.0, self.1, self.2)
    }
}

impl FromStr for RotationSpec {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || SweepError::Rotation(s.to_string());
        let mut it = s.split(':');
        let mut next = || -> Result<u32, SweepError> {
            it.next().ok_or_else(err)?.trim().parse().map_err(|_| err())
        };
        let spec = RotationSpec(next()?, next()?, next()?);
        if it.next().is_some() {
            return Err(err());
        }
        Ok(spec)
    }
}
