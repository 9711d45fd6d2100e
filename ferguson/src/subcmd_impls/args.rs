use clap::{Parser, Subcommand};
use sweep::SweepError;

#[derive(Parser, Debug)]
#[command(name = "ferguson")]
#[command(about = "脊髓检测旋转增强参数扫描与结果校验工具集.")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// 子命令。
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// 执行子命令，返回进程退出码。
    pub fn run_program(&mut self) -> Result<i32, SweepError> {
        match self.command {
            Commands::RotSweep(ref mut v) => v.run(),
            Commands::CheckResult(ref mut v) => v.run(),
            Commands::InspectInputs(ref mut v) => v.run(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 对每个训练列表和每个旋转参数训练模型，并在留出被试上测试。
    RotSweep(crate::subcmd_impls::rot_sweep::RotSweep),
    /// 校验Ernst角结果文件，失败时退出码为99。
    CheckResult(crate::subcmd_impls::check_result::CheckResult),
    /// 检查验证集被试的输入图像头。
    InspectInputs(crate::subcmd_impls::inspect_inputs::InspectInputs),
}
