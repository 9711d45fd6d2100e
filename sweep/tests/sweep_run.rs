//! 使用模拟外部程序的运行器验证整个扫描过程的文件系统效果。

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use sweep::prelude::*;
use tempfile::TempDir;

const TRAIN_BIN: &str = "spine_train_svm";
const TEST_BIN: &str = "spine_detect";

/// 模拟训练程序写出`<base>.yml`，测试程序写出结果与三个中间文件。
#[derive(Default)]
struct FakeTools {
    issued: Vec<Invocation>,
    /// 每次测试时模型文件是否已在训练目录中。
    model_present_at_test: Vec<bool>,
    fail_with: Option<i32>,
    skip_model: bool,
    /// 每次训练耗时。
    train_delay: Option<Duration>,
}

impl CommandRunner for FakeTools {
    fn run(&mut self, invocation: &Invocation) -> CommandOutcome {
        self.issued.push(invocation.clone());
        let cwd = invocation.cwd.clone().unwrap();
        if invocation.program.ends_with(TRAIN_BIN) {
            if let Some(d) = self.train_delay {
                thread::sleep(d);
            }
            if !self.skip_model {
                let base = invocation.arg_str(3).unwrap().into_owned();
                fs::write(cwd.join(format!("{base}.yml")), "svm: {}\n").unwrap();
            }
        } else {
            let model = PathBuf::from(format!("{}.yml", invocation.arg_str(2).unwrap()));
            self.model_present_at_test.push(model.is_file());
            let out = invocation.arg_str(4).unwrap().into_owned();
            for suffix in ["_ctr.txt", "_svm.hdr", "_svm.img", "_seg.txt"] {
                fs::write(format!("{out}{suffix}"), b"").unwrap();
            }
        }
        match self.fail_with {
            Some(code) => CommandOutcome::Exited(code),
            None => CommandOutcome::Exited(0),
        }
    }
}

struct Fixture {
    work: TempDir,
    scratch: TempDir,
    config: SweepConfig,
}

impl Fixture {
    fn new(rot: bool) -> Self {
        let work = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let config = SweepConfig {
            contrast: "t2".to_string(),
            nb_image_train: 3,
            rot,
            valid_subj: ["s1", "s2", "s3", "s4"].map(String::from).to_vec(),
            svm_hog_alone: false,
        };

        let train_dir = work.path().join("t2_3");
        fs::create_dir_all(&train_dir).unwrap();
        fs::write(train_dir.join("list_a.txt"), "/data/t2/s1\n/data/t2/s2\n").unwrap();
        fs::write(train_dir.join("list_a_ctr.txt"), "/data/t2/s1_ctr\n").unwrap();
        fs::write(train_dir.join("list_b.txt"), "s1\ns2\ns3\ns4\n").unwrap();
        fs::write(train_dir.join("list_b_ctr.txt"), "").unwrap();
        fs::write(train_dir.join("notes.md"), "").unwrap();

        Self {
            work,
            scratch,
            config,
        }
    }

    fn layout(&self) -> Layout {
        Layout::new(self.work.path(), &self.config)
    }

    fn tools(&self) -> Toolchain {
        let mut tools = Toolchain::new(self.scratch.path());
        tools.train_bin = PathBuf::from(format!("./{TRAIN_BIN}"));
        tools.test_bin = PathBuf::from(format!("./{TEST_BIN}"));
        tools
    }

    fn run(&self, fake: FakeTools) -> (SweepSummary, FakeTools) {
        let mut orch = Orchestrator::new(&self.config, self.layout(), self.tools(), fake);
        let summary = orch.run().unwrap();
        (summary, orch.into_runner())
    }
}

fn files_under(dir: &Path) -> Vec<String> {
    let mut out = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(d) = stack.pop() {
        for entry in fs::read_dir(&d).unwrap() {
            let p = entry.unwrap().path();
            if p.is_dir() {
                stack.push(p);
            } else {
                out.push(p.file_name().unwrap().to_string_lossy().into_owned());
            }
        }
    }
    out
}

#[test]
fn test_held_out_subjects_only() {
    let fx = Fixture::new(true);
    let (summary, fake) = fx.run(FakeTools::default());

    assert_eq!(summary.trainings, 2 * ROTATION_SWEEP.len());
    assert_eq!(summary.tests, 2 * ROTATION_SWEEP.len());
    assert_eq!(summary.failed_commands, 0);
    assert_eq!(summary.skipped_subjects, (2 + 4) * ROTATION_SWEEP.len());

    let tested: BTreeSet<String> = fake
        .issued
        .iter()
        .filter(|inv| inv.program.ends_with(TEST_BIN))
        .map(|inv| {
            let out = PathBuf::from(inv.arg_str(4).unwrap().into_owned());
            let list = out.parent().unwrap().file_name().unwrap();
            let subject = out.file_name().unwrap();
            format!("{}/{}", list.to_string_lossy(), subject.to_string_lossy())
        })
        .collect();
    let expected: BTreeSet<String> = ["list_a/s3", "list_a/s4"].map(String::from).into();
    assert_eq!(tested, expected);
}

#[test]
fn test_command_lines() {
    let fx = Fixture::new(true);
    let (_, fake) = fx.run(FakeTools::default());
    let layout = fx.layout();

    let train = &fake.issued[0];
    let args: Vec<String> = train
        .args
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        args,
        [
            "-hogsg".to_string(),
            "-incr=20".to_string(),
            "--addRot=0:360:0".to_string(),
            "list_a".to_string(),
            layout.train_dir().join("list_a.txt").to_string_lossy().into_owned(),
            layout.train_dir().join("list_a_ctr.txt").to_string_lossy().into_owned(),
            "--list".to_string(),
            "True".to_string(),
        ]
    );
    assert_eq!(train.cwd.as_deref(), Some(fx.scratch.path()));

    let test = &fake.issued[1];
    assert_eq!(test.arg_str(0).as_deref(), Some("-ctype=dpdt"));
    assert_eq!(test.arg_str(1).as_deref(), Some("-lambda=1"));
    assert_eq!(
        PathBuf::from(test.arg_str(2).unwrap().into_owned()),
        layout.model_stem("list_a")
    );
    assert_eq!(
        PathBuf::from(test.arg_str(3).unwrap().into_owned()),
        layout.input_image("s3")
    );
}

#[test]
fn test_no_intermediate_files_survive() {
    let fx = Fixture::new(true);
    let (summary, fake) = fx.run(FakeTools::default());

    assert!(fake.model_present_at_test.iter().all(|&b| b));
    assert_eq!(summary.removed_byproducts, 3 * summary.tests);

    let files = files_under(fx.work.path());
    for f in &files {
        assert!(!f.ends_with(".yml"), "model left behind: {f}");
        assert!(!f.ends_with("_svm.hdr") && !f.ends_with("_svm.img"), "{f}");
    }
    // 结果文件保留，训练目录中的_ctr.txt不属于中间文件
    let results = files.iter().filter(|f| f.ends_with("_seg.txt")).count();
    assert_eq!(results, summary.tests);
    assert!(files_under(fx.scratch.path()).is_empty());

    let layout = fx.layout();
    for rot in ROTATION_SWEEP {
        for subject in ["s3", "s4"] {
            let dir = layout.list_result_dir(rot, "list_a");
            assert!(!dir.join(format!("{subject}_ctr.txt")).exists());
            assert!(dir.join(format!("{subject}_seg.txt")).exists());
        }
    }
}

#[test]
fn test_directories_created_without_tests() {
    let fx = Fixture::new(true);
    fx.run(FakeTools::default());
    let layout = fx.layout();
    for rot in ROTATION_SWEEP {
        assert!(layout.result_dir(rot).is_dir());
        assert!(layout.list_result_dir(rot, "list_a").is_dir());
        // list_b包含全部验证集被试，不测试但仍建目录
        assert!(layout.list_result_dir(rot, "list_b").is_dir());
    }
}

#[test]
fn test_rotation_disabled_does_nothing() {
    let fx = Fixture::new(false);
    let (summary, fake) = fx.run(FakeTools::default());
    assert_eq!(summary, SweepSummary::default());
    assert!(fake.issued.is_empty());
    assert!(!fx.layout().result_dir(ROTATION_SWEEP[0]).exists());
}

#[test]
fn test_command_failures_are_counted_not_fatal() {
    let fx = Fixture::new(true);
    let fake = FakeTools {
        fail_with: Some(1),
        skip_model: true,
        ..FakeTools::default()
    };
    let (summary, fake) = fx.run(fake);
    assert_eq!(summary.failed_commands, summary.trainings + summary.tests);
    assert_eq!(fake.issued.len(), summary.trainings + summary.tests);
    assert!(fake.model_present_at_test.iter().all(|&b| !b));
}

#[test]
fn test_preview_matches_execution() {
    let fx = Fixture::new(true);
    let plan = SweepPlan::build(&fx.config, &fx.layout()).unwrap();
    assert_eq!(plan.jobs.len(), 2 * ROTATION_SWEEP.len());
    assert_eq!(plan.test_count(), 2 * ROTATION_SWEEP.len());

    let orch = Orchestrator::new(&fx.config, fx.layout(), fx.tools(), FakeTools::default());
    let preview = orch.preview(&plan);
    // 预览不触碰文件系统
    assert!(!fx.layout().result_dir(ROTATION_SWEEP[0]).exists());

    let (_, fake) = fx.run(FakeTools::default());
    assert_eq!(preview, fake.issued);
}

#[test]
fn test_svm_hog_alone_uses_maxslice() {
    let mut fx = Fixture::new(true);
    fx.config.svm_hog_alone = true;
    let (summary, fake) = fx.run(FakeTools::default());

    let ctypes: Vec<String> = fake
        .issued
        .iter()
        .filter(|inv| inv.program.ends_with(TEST_BIN))
        .map(|inv| inv.arg_str(0).unwrap().into_owned())
        .collect();
    assert_eq!(ctypes.len(), summary.tests);
    assert!(ctypes.iter().all(|c| c == "-ctype=maxslice"));
}

#[test]
fn test_repeated_execute_restarts_timers() {
    let fx = Fixture::new(true);
    let plan = SweepPlan::build(&fx.config, &fx.layout()).unwrap();
    let fake = FakeTools {
        train_delay: Some(Duration::from_millis(20)),
        ..FakeTools::default()
    };
    let mut orch = Orchestrator::new(&fx.config, fx.layout(), fx.tools(), fake);

    let first = orch.execute(&plan).unwrap();
    let second = orch.execute(&plan).unwrap();
    let floor = 20 * first.trainings as u64;
    assert!(first.train_ms >= floor);
    assert!(second.train_ms >= floor);
    // 累计计时会让第二次至少翻倍
    assert!(second.train_ms < first.train_ms + floor, "{second:?}");
    assert_eq!(second.trainings, first.trainings);
    assert_eq!(second.tests, first.tests);
}
