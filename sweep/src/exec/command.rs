//! 外部程序调用。所有命令都以参数数组的形式直接执行，不经过shell。

use crate::plan::layout::absolutize;
use crate::plan::{Job, Layout, TestMode};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// 一次外部程序调用。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// 子进程的工作目录，`None`表示继承当前进程。
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// 以字符串形式取第`i`个参数，便于日志与测试。
    pub fn arg_str(&self, i: usize) -> Option<std::borrow::Cow<'_, str>> {
        self.args.get(i).map(|a| a.to_string_lossy())
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for a in &self.args {
            write!(f, " {}", a.to_string_lossy())?;
        }
        Ok(())
    }
}

/// 外部程序的结束方式。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Exited(i32),
    /// 被信号终止（仅unix）。
    Signaled(i32),
    SpawnFailed(String),
}

impl CommandOutcome {
    #[inline]
    pub fn is_failure(&self) -> bool {
        !matches!(self, CommandOutcome::Exited(0))
    }

    fn from_status(status: ExitStatus) -> Self {
        match (status.code(), signal_of(status)) {
            (Some(code), _) => CommandOutcome::Exited(code),
            (None, Some(sig)) => CommandOutcome::Signaled(sig),
            (None, None) => CommandOutcome::Exited(-1),
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        fn signal_of(status: ExitStatus) -> Option<i32> {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        }
    } else {
        fn signal_of(_status: ExitStatus) -> Option<i32> {
            None
        }
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::Exited(code) => write!(f, "exit code {code}"),
            CommandOutcome::Signaled(sig) => write!(f, "killed by signal {sig}"),
            CommandOutcome::SpawnFailed(e) => write!(f, "failed to spawn: {e}"),
        }
    }
}

/// 执行外部程序的接口。扫描本身不关心命令如何被执行。
pub trait CommandRunner {
    fn run(&mut self, invocation: &Invocation) -> CommandOutcome;
}

/// 阻塞地启动子进程并等待其结束，标准输出与错误直接继承。
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation) -> CommandOutcome {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(ref cwd) = invocation.cwd {
            cmd.current_dir(cwd);
        }
        match cmd.status() {
            Ok(status) => CommandOutcome::from_status(status),
            Err(e) => CommandOutcome::SpawnFailed(e.to_string()),
        }
    }
}

/// 训练与测试两个外部程序，以及训练时的工作目录。
#[derive(Clone, Debug)]
pub struct Toolchain {
    pub train_bin: PathBuf,
    pub test_bin: PathBuf,
    /// 训练程序在此目录下写出`<base>.yml`。
    pub scratch_dir: PathBuf,
}

pub const DEFAULT_TRAIN_BIN: &str = "./spine_train_svm";
pub const DEFAULT_TEST_BIN: &str = "./spine_detect";

impl Toolchain {
    /// 所有路径在构造时转为绝对路径，子进程的工作目录不影响它们的含义。
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self::with_binaries(scratch_dir, DEFAULT_TRAIN_BIN, DEFAULT_TEST_BIN)
    }

    pub fn with_binaries(
        scratch_dir: impl Into<PathBuf>,
        train_bin: impl Into<PathBuf>,
        test_bin: impl Into<PathBuf>,
    ) -> Self {
        Self {
            train_bin: resolve_binary(train_bin.into()),
            test_bin: resolve_binary(test_bin.into()),
            scratch_dir: absolutize(scratch_dir.into()),
        }
    }

    /// `<train-bin> -hogsg -incr=20 --addRot=<spec> <base> <list> <center> --list True`
    pub fn train_invocation(&self, job: &Job) -> Invocation {
        Invocation::new(&self.train_bin)
            .arg("-hogsg")
            .arg("-incr=20")
            .arg(format!("--addRot={}", job.rotation))
            .arg(job.list.base())
            .arg(job.list.path())
            .arg(job.list.center_path())
            .arg("--list")
            .arg("True")
            .current_dir(&self.scratch_dir)
    }

    /// `<test-bin> -ctype=<mode> -lambda=1 <model> <input> <output>`
    pub fn test_invocation(
        &self,
        layout: &Layout,
        mode: TestMode,
        job: &Job,
        subject: &str,
        out_dir: &Path,
    ) -> Invocation {
        Invocation::new(&self.test_bin)
            .arg(format!("-ctype={}", mode.ctype()))
            .arg("-lambda=1")
            .arg(layout.model_stem(job.list.base()))
            .arg(layout.input_image(subject))
            .arg(out_dir.join(subject))
            .current_dir(&self.scratch_dir)
    }
}

/// 只含文件名的程序交给`PATH`查找，带目录的相对路径转为绝对路径。
fn resolve_binary(bin: PathBuf) -> PathBuf {
    if bin.components().count() > 1 {
        absolutize(bin)
    } else {
        bin
    }
}
