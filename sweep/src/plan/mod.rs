pub mod config;
pub mod layout;
pub mod rotation;
pub mod train_list;

pub use config::{SweepConfig, TestMode, CONFIG_FILE_NAME};
pub use layout::Layout;
pub use rotation::{RotationSpec, ROTATION_SWEEP};
pub use train_list::TrainingList;

use crate::error::Result;

/// 一次（训练列表, 旋转参数）组合。
#[derive(Clone, Debug)]
pub struct Job {
    pub list: TrainingList,
    pub rotation: RotationSpec,
    /// 用本次模型测试的被试，均不在训练列表中。
    pub held_out: Vec<String>,
}

/// 整个扫描的任务列表，外层为训练列表，内层为旋转参数。
#[derive(Clone, Debug, Default)]
pub struct SweepPlan {
    pub jobs: Vec<Job>,
}

impl SweepPlan {
    /// 读取训练目录构建任务列表，不修改文件系统。`rot`关闭时返回空计划。
    ///
    /// 训练列表在任何训练开始之前一次性读入；训练程序不应改写列表文件。
    pub fn build(config: &SweepConfig, layout: &Layout) -> Result<Self> {
        if !config.rot {
            return Ok(Self::default());
        }

        let mut jobs = Vec::new();
        for path in train_list::discover(layout.train_dir())? {
            let list = TrainingList::load(&path)?;
            let held_out: Vec<String> = list
                .held_out(&config.valid_subj)
                .into_iter()
                .map(str::to_string)
                .collect();
            for rotation in ROTATION_SWEEP {
                jobs.push(Job {
                    list: list.clone(),
                    rotation,
                    held_out: held_out.clone(),
                });
            }
        }
        Ok(Self { jobs })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// 计划中的测试命令总数。
    pub fn test_count(&self) -> usize {
        self.jobs.iter().map(|j| j.held_out.len()).sum()
    }
}
