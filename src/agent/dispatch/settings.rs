//! Launch settings and the child-process environment.

use crate::config::Config;
use crate::context::{DemoContext, resolve_path};
use crate::error::Result;
use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything the runner needs to launch one agent script.
#[derive(Debug, Clone)]
pub struct LaunchSettings {
    /// Interpreter program followed by its own arguments.
    pub interpreter: Vec<String>,

    /// Required script extension (no leading dot).
    pub script_extension: String,

    /// Directory scripts are resolved against and children run in.
    pub work_dir: PathBuf,

    /// Environment variable holding the module search path.
    pub module_path_var: String,

    /// Directory prepended to the module search path.
    pub module_dir: PathBuf,

    /// Extra variables applied after the fixed overrides.
    pub extra_env: BTreeMap<String, String>,

    /// Optional run deadline.
    pub timeout: Option<Duration>,
}

impl LaunchSettings {
    /// Build launch settings from the harness config and context.
    pub fn from_config(config: &Config, ctx: &DemoContext) -> Result<Self> {
        let module_dir = match &config.module_dir {
            Some(dir) => resolve_path(&ctx.work_dir, dir),
            None => ctx.work_dir.clone(),
        };

        Ok(Self {
            interpreter: config.interpreter_command()?,
            script_extension: config.script_extension.clone(),
            work_dir: ctx.work_dir.clone(),
            module_path_var: config.module_path_var.clone(),
            module_dir,
            extra_env: config.environment.clone(),
            timeout: config.timeout(),
        })
    }

    /// Resolve an agent's script path against the working directory.
    pub fn resolve_script(&self, path: &Path) -> PathBuf {
        resolve_path(&self.work_dir, path)
    }

    /// The interpreter as a printable command line.
    pub fn interpreter_display(&self) -> String {
        self.interpreter.join(" ")
    }

    /// Environment overrides for the child, on top of the inherited environment.
    ///
    /// Fails only if the module directory cannot be joined into a search path
    /// (it contains the platform path separator).
    pub fn child_environment(
        &self,
    ) -> std::result::Result<Vec<(OsString, OsString)>, env::JoinPathsError> {
        let mut vars: Vec<(OsString, OsString)> = vec![
            ("PYTHONIOENCODING".into(), "utf-8".into()),
            ("PYTHONHASHSEED".into(), "0".into()),
            ("PYTHONUNBUFFERED".into(), "1".into()),
        ];

        if cfg!(windows) {
            vars.push(("CHCP".into(), "65001".into()));
        }

        let inherited = env::var_os(&self.module_path_var).unwrap_or_default();
        let search_path = env::join_paths(
            std::iter::once(self.module_dir.clone())
                .chain(env::split_paths(&inherited).filter(|p| !p.as_os_str().is_empty())),
        )?;
        vars.push((self.module_path_var.clone().into(), search_path));

        for (key, value) in &self.extra_env {
            vars.push((key.into(), value.into()));
        }

        Ok(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings_for(temp_dir: &TempDir) -> LaunchSettings {
        let ctx = DemoContext::resolve_from(temp_dir.path()).unwrap();
        let config = Config {
            module_path_var: "AGENT_DEMO_TEST_SEARCH_PATH".to_string(),
            ..Default::default()
        };
        LaunchSettings::from_config(&config, &ctx).unwrap()
    }

    fn lookup<'a>(vars: &'a [(OsString, OsString)], key: &str) -> Option<&'a OsString> {
        vars.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[test]
    fn test_from_config_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = DemoContext::resolve_from(temp_dir.path()).unwrap();
        let settings = LaunchSettings::from_config(&Config::default(), &ctx).unwrap();

        assert_eq!(settings.interpreter, vec!["python3"]);
        assert_eq!(settings.script_extension, "py");
        assert_eq!(settings.module_dir, ctx.work_dir);
        assert_eq!(settings.module_path_var, "PYTHONPATH");
        assert!(settings.timeout.is_none());
    }

    #[test]
    fn test_relative_module_dir_is_resolved() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = DemoContext::resolve_from(temp_dir.path()).unwrap();
        let config = Config {
            module_dir: Some(PathBuf::from("lib")),
            ..Default::default()
        };

        let settings = LaunchSettings::from_config(&config, &ctx).unwrap();
        assert_eq!(settings.module_dir, temp_dir.path().join("lib"));
    }

    #[test]
    fn test_fixed_overrides_are_present() {
        let temp_dir = TempDir::new().unwrap();
        let vars = settings_for(&temp_dir).child_environment().unwrap();

        assert_eq!(lookup(&vars, "PYTHONIOENCODING").unwrap(), "utf-8");
        assert_eq!(lookup(&vars, "PYTHONHASHSEED").unwrap(), "0");
        assert_eq!(lookup(&vars, "PYTHONUNBUFFERED").unwrap(), "1");
    }

    #[test]
    fn test_module_dir_is_first_on_search_path() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings_for(&temp_dir);
        let vars = settings.child_environment().unwrap();

        let search_path = lookup(&vars, "AGENT_DEMO_TEST_SEARCH_PATH").unwrap();
        let first = env::split_paths(search_path).next().unwrap();
        assert_eq!(first, settings.module_dir);
    }

    #[test]
    fn test_extra_environment_applies_last() {
        let temp_dir = TempDir::new().unwrap();
        let mut settings = settings_for(&temp_dir);
        settings
            .extra_env
            .insert("PYTHONHASHSEED".to_string(), "42".to_string());

        let vars = settings.child_environment().unwrap();
        assert_eq!(lookup(&vars, "PYTHONHASHSEED").unwrap(), "42");
    }

    #[test]
    fn test_resolve_script_against_work_dir() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings_for(&temp_dir);
        assert_eq!(
            settings.resolve_script(Path::new("fb-agent.py")),
            temp_dir.path().join("fb-agent.py")
        );
    }
}
