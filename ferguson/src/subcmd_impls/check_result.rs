use super::utils::positive_float;
use clap::Args;
use std::path::PathBuf;
use sweep::check::{
    ResultCheck, ERNST_ANGLE_DEFAULT_ARGS, ERNST_ANGLE_FILE, ERNST_ANGLE_GT,
    ERNST_ANGLE_THRESHOLD, FAILURE_STATUS,
};
use sweep::prelude::{CommandRunner, Invocation, ProcessRunner};
use sweep::Result;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub struct CheckResult {
    /// 结果文件，内容为单个浮点数。
    #[arg(long, short, default_value = ERNST_ANGLE_FILE)]
    file: PathBuf,
    /// 期望值。
    #[arg(long, short, default_value_t = ERNST_ANGLE_GT)]
    expected: f64,
    /// 绝对误差阈值。
    #[arg(long, short, default_value_t = ERNST_ANGLE_THRESHOLD, value_parser = positive_float)]
    threshold: f64,
    /// 校验前先执行的程序；不给参数时使用`-tr 2000 -t1 850 -o ernst_angle.txt`。
    #[arg(long = "command", short = 'C')]
    command: Option<PathBuf>,
    /// 传给`--command`的参数。
    #[arg(last = true)]
    args: Vec<String>,
}

impl CheckResult {
    pub fn run(&mut self) -> Result<i32> {
        if let Some(ref program) = self.command {
            let mut invocation = Invocation::new(program);
            if self.args.is_empty() {
                for a in ERNST_ANGLE_DEFAULT_ARGS {
                    invocation = invocation.arg(a);
                }
            } else {
                for a in &self.args {
                    invocation = invocation.arg(a);
                }
            }
            info!("执行`{invocation}`");
            let outcome = ProcessRunner.run(&invocation);
            if outcome.is_failure() {
                warn!("`{}`: {outcome}", program.display());
            }
        }

        let report = ResultCheck::new(self.expected, self.threshold).check_file(&self.file);
        println!("{}: {report}", self.file.display());
        if report.status != 0 {
            return Ok(FAILURE_STATUS);
        }
        Ok(0)
    }
}
