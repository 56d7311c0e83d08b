use crate::agent::{AgentDescriptor, LaunchSettings};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Environment variable used as the module search path in tests, so the
/// real `PYTHONPATH` of the test process is never consulted.
pub(crate) const TEST_MODULE_PATH_VAR: &str = "AGENT_DEMO_TEST_SEARCH_PATH";

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // The process working directory is global; serialize every change to it.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Write a script into `dir` and return its path.
pub(crate) fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, body).unwrap();
    path
}

/// Launch settings that run `.sh` scripts with `sh` inside `dir`.
pub(crate) fn sh_settings(dir: &Path) -> LaunchSettings {
    LaunchSettings {
        interpreter: vec!["sh".to_string()],
        script_extension: "sh".to_string(),
        work_dir: dir.to_path_buf(),
        module_path_var: TEST_MODULE_PATH_VAR.to_string(),
        module_dir: dir.to_path_buf(),
        extra_env: BTreeMap::new(),
        timeout: None,
    }
}

/// An agent descriptor pointing at `file` (relative to the work dir).
pub(crate) fn sh_agent(name: &str, file: &str) -> AgentDescriptor {
    AgentDescriptor {
        name: name.to_string(),
        executable_path: PathBuf::from(file),
        description: format!("{} test agent", name),
        demo_scenario: String::new(),
        expected_output: String::new(),
        tag: None,
    }
}

/// Write a config that runs `.sh` scripts with `sh`, plus an agents registry.
pub(crate) fn write_sh_workspace(dir: &Path, agents: &[(&str, &str)]) {
    let state_dir = dir.join(crate::context::STATE_DIR_NAME);
    std::fs::create_dir_all(&state_dir).unwrap();
    std::fs::write(
        state_dir.join("config.yaml"),
        format!(
            "interpreter: sh\nscript_extension: sh\nmodule_path_var: {}\n",
            TEST_MODULE_PATH_VAR
        ),
    )
    .unwrap();

    let mut registry = String::from("agents:\n");
    for (name, file) in agents {
        registry.push_str(&format!(
            "  - name: {}\n    file: {}\n    description: {} test agent\n",
            name, file, name
        ));
    }
    std::fs::write(dir.join(crate::context::AGENTS_FILE_NAME), registry).unwrap();
}
