use super::utils::load_config;
use clap::Args;
use std::path::PathBuf;
use sweep::prelude::{inspect, InputStatus, Layout};
use sweep::Result;

#[derive(Args, Debug)]
pub struct InspectInputs {
    /// 工作目录根（ferguson工作目录）。
    #[arg(long = "work-dir", short = 'D')]
    work_dir: PathBuf,
    /// 配置文件，默认`<work-dir>/ferguson_config.json`。
    #[arg(long, short)]
    config: Option<PathBuf>,
}

impl InspectInputs {
    pub fn run(&mut self) -> Result<i32> {
        let (_, config) = load_config(&self.work_dir, self.config.as_deref())?;
        let layout = Layout::new(self.work_dir.as_path(), &config);
        println!("检查目录`{}`...", layout.input_dir().display());

        let reports = inspect(&layout, &config.valid_subj);
        let mut bad = 0;
        for r in &reports {
            match r.status {
                InputStatus::Ok { ref path, ref dims } => {
                    let dims: Vec<String> = dims.iter().map(u16::to_string).collect();
                    println!("\t{}: {} [{}]", r.subject, path.display(), dims.join("x"));
                }
                InputStatus::Analyze { ref path } => {
                    println!("\t{}: {} [Analyze 7.5]", r.subject, path.display());
                }
                InputStatus::Missing => {
                    bad += 1;
                    eprintln!("\t{}: 缺少输入图像", r.subject);
                }
                InputStatus::Unreadable {
                    ref path,
                    ref reason,
                } => {
                    bad += 1;
                    eprintln!("\t{}: `{}`无法读取: {reason}", r.subject, path.display());
                }
            }
        }
        println!("{}/{}个被试可用", reports.len() - bad, reports.len());
        Ok(if bad == 0 { 0 } else { 1 })
    }
}
