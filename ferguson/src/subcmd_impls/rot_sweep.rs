use super::utils::load_config;
use clap::Args;
use std::env;
use std::path::PathBuf;
use sweep::exec::command::{DEFAULT_TEST_BIN, DEFAULT_TRAIN_BIN};
use sweep::prelude::{Layout, Orchestrator, ProcessRunner, SweepPlan, Toolchain};
use sweep::{Result, SweepError};
use tracing::info;

#[derive(Args, Debug)]
pub struct RotSweep {
    /// 工作目录根（ferguson工作目录）。
    #[arg(long = "work-dir", short = 'D')]
    work_dir: PathBuf,
    /// 配置文件，默认`<work-dir>/ferguson_config.json`。
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// 训练程序。
    #[arg(long = "train-bin", default_value = DEFAULT_TRAIN_BIN)]
    train_bin: PathBuf,
    /// 测试程序。
    #[arg(long = "test-bin", default_value = DEFAULT_TEST_BIN)]
    test_bin: PathBuf,
    /// 训练程序写出模型文件的目录，默认当前目录。
    #[arg(long = "scratch-dir")]
    scratch_dir: Option<PathBuf>,
    /// 只打印将要执行的命令。
    #[arg(long = "dry-run")]
    dry_run: bool,
}

impl RotSweep {
    pub fn run(&mut self) -> Result<i32> {
        let (config_path, config) = load_config(&self.work_dir, self.config.as_deref())?;
        info!("读取配置`{}`", config_path.display());

        let scratch_dir = match self.scratch_dir.take() {
            Some(d) => d,
            None => env::current_dir().map_err(|e| SweepError::Io {
                path: PathBuf::from("."),
                source: e,
            })?,
        };
        let tools =
            Toolchain::with_binaries(scratch_dir, self.train_bin.clone(), self.test_bin.clone());

        let layout = Layout::new(self.work_dir.as_path(), &config);
        let mut orch = Orchestrator::new(&config, layout, tools, ProcessRunner);

        if self.dry_run {
            let plan = SweepPlan::build(&config, orch.layout())?;
            if plan.is_empty() {
                println!("没有需要执行的任务。");
            }
            for invocation in orch.preview(&plan) {
                println!("{invocation}");
            }
            return Ok(0);
        }

        let summary = orch.run()?;
        println!("----------------------------------------------------------");
        println!(
            "训练: {}次, 共{} ms\n测试: {}次, 共{} ms",
            summary.trainings, summary.train_ms, summary.tests, summary.test_ms
        );
        println!(
            "跳过(训练集内)被试: {}\n删除中间文件: {}\n失败命令: {}",
            summary.skipped_subjects, summary.removed_byproducts, summary.failed_commands
        );
        println!("----------------------------------------------------------");
        Ok(0)
    }
}
