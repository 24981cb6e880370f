#![allow(dead_code)]

use assert_cmd::Command;
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const OLD_MARKER: i64 = 2_000_000;
pub const OLD_CACHE: i64 = 1_000_000;

/// A direnv-style project in a temp dir, plus a fake environment manager
pub struct Project {
    _tmp: TempDir,
    pub root: PathBuf,
    pub log: PathBuf,
    config_home: PathBuf,
    scripts: PathBuf,
}

impl Project {
    /// `.envrc` and two `.direnv/*.rc` profiles, all dated in the past
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().join("project");
        let scripts = tmp.path().join("scripts");
        let config_home = tmp.path().join("config");

        fs::create_dir_all(root.join(".direnv")).expect("create cache dir");
        fs::create_dir_all(&scripts).expect("create scripts dir");
        fs::create_dir_all(&config_home).expect("create config home");

        fs::write(root.join(".envrc"), "use flake\n").expect("write marker");
        set_mtime(&root.join(".envrc"), OLD_MARKER);
        for name in ["flake-profile-1.rc", "flake-profile-2.rc"] {
            let path = root.join(".direnv").join(name);
            fs::write(&path, "export IN_NIX_SHELL=impure\n").expect("write profile");
            set_mtime(&path, OLD_CACHE);
        }

        let log = tmp.path().join("invocations.log");

        Self {
            _tmp: tmp,
            root,
            log,
            config_home,
            scripts,
        }
    }

    /// Tool command for a fake manager that records its args and exits with `code`
    pub fn fake_tool(&self, code: i32) -> String {
        let script = self.scripts.join(format!("fake-direnv-{}.sh", code));
        fs::write(
            &script,
            format!(
                "printf '%s\\n' \"$*\" >> '{log}'\n\
                 printf 'force=%s\\n' \"$_nix_direnv_force_reload\" >> '{log}'\n\
                 exit {code}\n",
                log = self.log.display(),
                code = code
            ),
        )
        .expect("write fake tool");
        format!("sh '{}'", script.display())
    }

    /// Binary isolated from the caller's config and environment
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("envreload").expect("binary built");
        cmd.env("XDG_CONFIG_HOME", &self.config_home)
            .env_remove("ENVRELOAD_DIR")
            .env_remove("ENVRELOAD_TOOL")
            .env_remove("ENVRELOAD_CONFIG")
            .env_remove("RUST_LOG")
            .env_remove("_nix_direnv_force_reload");
        cmd
    }

    /// Binary pointed at this project with a fake tool exiting with `code`
    pub fn reload_cmd(&self, code: i32) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("--dir").arg(&self.root).arg("--tool").arg(self.fake_tool(code));
        cmd
    }

    pub fn write_user_config(&self, content: &str) -> PathBuf {
        let dir = self.config_home.join("envreload");
        fs::create_dir_all(&dir).expect("create config dir");
        let path = dir.join("config");
        fs::write(&path, content).expect("write config");
        path
    }

    /// Lines the fake tool recorded, empty if it never ran
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn marker(&self) -> PathBuf {
        self.root.join(".envrc")
    }

    pub fn cache_files(&self) -> Vec<PathBuf> {
        vec![
            self.root.join(".direnv/flake-profile-1.rc"),
            self.root.join(".direnv/flake-profile-2.rc"),
        ]
    }
}

pub fn set_mtime(path: &Path, secs: i64) {
    filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0)).expect("set mtime");
}

pub fn mtime(path: &Path) -> FileTime {
    let meta = fs::metadata(path).expect("stat");
    FileTime::from_last_modification_time(&meta)
}

pub fn atime(path: &Path) -> FileTime {
    let meta = fs::metadata(path).expect("stat");
    FileTime::from_last_access_time(&meta)
}
