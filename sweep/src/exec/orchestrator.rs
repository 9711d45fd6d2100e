use super::command::{CommandRunner, Invocation, Toolchain};
use crate::error::{Result, SweepError};
use crate::log::StageTimer;
use crate::plan::layout::{byproducts, model_file_name};
use crate::plan::{Job, Layout, SweepConfig, SweepPlan};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// 一次扫描的统计。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub trainings: usize,
    pub tests: usize,
    /// 非零退出、被信号终止或无法启动的命令数。
    pub failed_commands: usize,
    /// 因在训练列表中而未被测试的（被试, 任务）次数。
    pub skipped_subjects: usize,
    pub removed_byproducts: usize,
    pub train_ms: u64,
    pub test_ms: u64,
}

/// 按（训练列表 × 旋转参数）依次训练、测试留出被试并清理中间文件。
pub struct Orchestrator<'a, R> {
    config: &'a SweepConfig,
    layout: Layout,
    tools: Toolchain,
    runner: R,
    summary: SweepSummary,
    train_timer: StageTimer,
    test_timer: StageTimer,
}

impl<'a, R: CommandRunner> Orchestrator<'a, R> {
    pub fn new(config: &'a SweepConfig, layout: Layout, tools: Toolchain, runner: R) -> Self {
        Self {
            config,
            layout,
            tools,
            runner,
            summary: SweepSummary::default(),
            train_timer: StageTimer::new(),
            test_timer: StageTimer::new(),
        }
    }

    #[inline]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    #[inline]
    pub fn into_runner(self) -> R {
        self.runner
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// 构建计划并执行。
    pub fn run(&mut self) -> Result<SweepSummary> {
        if !self.config.rot {
            warn!("配置中`rot`未开启，没有需要扫描的旋转参数");
            return Ok(SweepSummary::default());
        }
        let plan = SweepPlan::build(self.config, &self.layout)?;
        self.execute(&plan)
    }

    /// 计划中每一个任务将依次发出的命令，不执行也不触碰文件系统。
    pub fn preview(&self, plan: &SweepPlan) -> Vec<Invocation> {
        let mode = self.config.test_mode();
        let mut out = Vec::with_capacity(plan.jobs.len() + plan.test_count());
        for job in &plan.jobs {
            out.push(self.tools.train_invocation(job));
            let res_dir = self.layout.list_result_dir(job.rotation, job.list.base());
            for subject in &job.held_out {
                out.push(
                    self.tools
                        .test_invocation(&self.layout, mode, job, subject, &res_dir),
                );
            }
        }
        out
    }

    /// 执行计划。每次调用的统计与计时都从零开始。
    pub fn execute(&mut self, plan: &SweepPlan) -> Result<SweepSummary> {
        self.summary = SweepSummary::default();
        self.train_timer = StageTimer::new();
        self.test_timer = StageTimer::new();
        info!(
            "共{}个任务，{}次测试",
            plan.jobs.len(),
            plan.test_count()
        );
        for (seq, job) in plan.jobs.iter().enumerate() {
            info!(
                "[{}/{}] 训练列表`{}`，旋转参数`{}`",
                seq + 1,
                plan.jobs.len(),
                job.list.base(),
                job.rotation
            );
            self.run_job(job)?;
        }

        self.summary.train_ms = self.train_timer.total_ms();
        self.summary.test_ms = self.test_timer.total_ms();
        if self.summary.failed_commands > 0 {
            warn!("{}条外部命令执行失败", self.summary.failed_commands);
        }
        Ok(std::mem::take(&mut self.summary))
    }

    fn run_job(&mut self, job: &Job) -> Result<()> {
        let base = job.list.base();
        create_dir(self.layout.result_dir(job.rotation))?;

        let train = self.tools.train_invocation(job);
        self.train_timer.start();
        self.issue(&train);
        self.train_timer.stop();
        self.summary.trainings += 1;

        self.relocate_model(base)?;

        let res_dir = self.layout.list_result_dir(job.rotation, base);
        create_dir(&res_dir)?;

        self.summary.skipped_subjects += self
            .config
            .valid_subj
            .len()
            .saturating_sub(job.held_out.len());
        let mode = self.config.test_mode();
        for subject in &job.held_out {
            debug_assert!(!job.list.contains(subject));
            info!("\t测试被试`{subject}`");
            let test = self
                .tools
                .test_invocation(&self.layout, mode, job, subject, &res_dir);
            self.test_timer.start();
            self.issue(&test);
            self.test_timer.stop();
            self.summary.tests += 1;

            for path in byproducts(&res_dir, subject) {
                if remove_if_present(&path)? {
                    self.summary.removed_byproducts += 1;
                }
            }
        }

        remove_if_present(self.layout.model_file(base))?;
        Ok(())
    }

    fn issue(&mut self, invocation: &Invocation) {
        debug!("{invocation}");
        let outcome = self.runner.run(invocation);
        if outcome.is_failure() {
            warn!("`{}`: {outcome}", invocation.program.display());
            self.summary.failed_commands += 1;
        }
    }

    /// 把训练程序在临时目录写出的模型移动到训练目录。模型不存在时只记录警告。
    fn relocate_model(&self, base: &str) -> Result<()> {
        let from = self.tools.scratch_dir.join(model_file_name(base));
        let to = self.layout.model_file(base);
        if same_file(&from, &to) {
            return Ok(());
        }
        match fs::rename(&from, &to) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("训练没有生成模型文件`{}`", from.display());
                Ok(())
            }
            Err(_) => {
                // 跨文件系统时rename失败
                fs::copy(&from, &to).map_err(|e| SweepError::io(&to, e))?;
                fs::remove_file(&from).map_err(|e| SweepError::io(&from, e))
            }
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn create_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| SweepError::io(dir, e))
}

/// 删除文件，文件不存在不算错误。返回是否确实删除了文件。
pub(crate) fn remove_if_present<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(SweepError::io(path, e)),
    }
}
