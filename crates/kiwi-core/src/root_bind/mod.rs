//! Bind management for an image build root.
//!
//! [`RootBind`] makes host kernel filesystems, the shared package cache, and
//! a few host configuration files visible inside a build root, and records
//! every artifact it creates so [`RootBind::cleanup`] can undo them in
//! reverse order.
//!
//! Setup phases fail loud: any command failure unwinds everything recorded
//! so far and returns a [`BindError`]. Cleanup fails quiet: every failure is
//! reported to the [`WarningSink`] and the unwind carries on.

mod cleanup;
mod path;

#[cfg(test)]
pub(crate) mod fakes;

use std::path::Path;

use kiwi_common::config::BindConfig;
use kiwi_common::error::{KiwiError, Result};
use kiwi_common::types::BuildRoot;
use thiserror::Error;

use crate::command::{CommandOutput, CommandRunner, SystemRunner, argv};
use crate::host::{HostFs, RealFs};
use crate::sink::{TracingSink, WarningSink};

pub use path::move_to_root;

/// Failure of one of the setup phases.
///
/// By the time a caller sees this error, everything the manager had mounted
/// or staged has already been cleaned up.
#[derive(Debug, Error)]
pub enum BindError {
    /// A kernel filesystem bind mount failed.
    #[error("failed to mount kernel file systems: {source}")]
    MountKernelFileSystems {
        /// Underlying command failure.
        #[source]
        source: KiwiError,
    },

    /// Creating or bind-mounting the shared cache directory failed.
    #[error("failed to mount shared directory: {source}")]
    MountSharedDirectory {
        /// Underlying command failure.
        #[source]
        source: KiwiError,
    },

    /// Copying or symlinking a host config file failed.
    #[error("failed to set up intermediate config: {source}")]
    SetupIntermediateConfig {
        /// Underlying command failure.
        #[source]
        source: KiwiError,
    },
}

/// Result alias for the setup phases.
pub type BindResult<T> = std::result::Result<T, BindError>;

/// Owns the bind mounts and staged files of one build root.
///
/// Only one manager may be active per build root directory: mounts are
/// host-global and these stacks are the only record of what was done.
pub struct RootBind {
    root: BuildRoot,
    config: BindConfig,
    runner: Box<dyn CommandRunner>,
    host: Box<dyn HostFs>,
    sink: Box<dyn WarningSink>,
    /// Build-root-relative mount points, in mount order.
    mount_stack: Vec<String>,
    /// Build-root-relative directories created for mount points.
    dir_stack: Vec<String>,
    /// Build-root-relative staged copies and their symlinks.
    cleanup_files: Vec<String>,
}

impl RootBind {
    /// Creates a manager that runs real host commands.
    #[must_use]
    pub fn new(root: BuildRoot, config: BindConfig) -> Self {
        Self {
            root,
            config,
            runner: Box::new(SystemRunner),
            host: Box::new(RealFs),
            sink: Box::new(TracingSink),
            mount_stack: Vec::new(),
            dir_stack: Vec::new(),
            cleanup_files: Vec::new(),
        }
    }

    /// Replaces the command runner.
    #[must_use]
    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// Replaces the host filesystem probe.
    #[must_use]
    pub fn with_host_fs(mut self, host: impl HostFs + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    /// Replaces the warning sink used during cleanup.
    #[must_use]
    pub fn with_sink(mut self, sink: impl WarningSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// The build root this manager operates on.
    #[must_use]
    pub const fn root(&self) -> &BuildRoot {
        &self.root
    }

    /// Mount points currently recorded, in mount order.
    #[must_use]
    pub fn mount_stack(&self) -> &[String] {
        &self.mount_stack
    }

    /// Directories created for mount points, in creation order.
    #[must_use]
    pub fn dir_stack(&self) -> &[String] {
        &self.dir_stack
    }

    /// Staged files and symlinks awaiting removal.
    #[must_use]
    pub fn cleanup_files(&self) -> &[String] {
        &self.cleanup_files
    }

    /// Whether anything is recorded that cleanup would undo.
    #[must_use]
    pub fn has_artifacts(&self) -> bool {
        !(self.mount_stack.is_empty()
            && self.dir_stack.is_empty()
            && self.cleanup_files.is_empty())
    }

    /// Runs all three setup phases in order.
    ///
    /// # Errors
    ///
    /// Returns the error of the first phase that fails; everything set up
    /// by earlier phases has been cleaned up by then.
    pub fn setup(&mut self) -> BindResult<()> {
        self.mount_kernel_file_systems()?;
        self.mount_shared_directory()?;
        self.setup_intermediate_config()
    }

    /// Bind-mounts every configured kernel filesystem into the build root.
    ///
    /// Mount targets must already exist inside the build root. This is
    /// all-or-nothing: on the first failure everything is unwound.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::MountKernelFileSystems`] if any bind mount fails.
    pub fn mount_kernel_file_systems(&mut self) -> BindResult<()> {
        let result = self.try_mount_kernel_file_systems();
        self.unwind_on_error(result, |source| BindError::MountKernelFileSystems { source })?;
        tracing::info!(
            root = %self.root,
            mounts = self.mount_stack.len(),
            "kernel file systems mounted"
        );
        Ok(())
    }

    /// Creates the shared cache directory inside the build root and
    /// bind-mounts the host cache onto it.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::MountSharedDirectory`] if the directory cannot
    /// be created or mounted.
    pub fn mount_shared_directory(&mut self) -> BindResult<()> {
        let result = self.try_mount_shared_directory();
        self.unwind_on_error(result, |source| BindError::MountSharedDirectory { source })?;
        tracing::info!(
            root = %self.root,
            shared = %self.config.shared_location,
            "shared directory mounted"
        );
        Ok(())
    }

    /// Stages every existing host config file into the build root.
    ///
    /// Each file is copied to `<file><suffix>` inside the root and the
    /// original name becomes a relative symlink to the copy. Files missing
    /// on the host are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::SetupIntermediateConfig`] if a copy or symlink
    /// fails.
    pub fn setup_intermediate_config(&mut self) -> BindResult<()> {
        let result = self.try_setup_intermediate_config();
        self.unwind_on_error(result, |source| BindError::SetupIntermediateConfig { source })?;
        tracing::info!(
            root = %self.root,
            staged = self.cleanup_files.len() / 2,
            "intermediate config staged"
        );
        Ok(())
    }

    /// Rewrites host paths under the build root to their in-root form.
    #[must_use]
    pub fn move_to_root<I, S>(&self, paths: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        move_to_root(&self.root, paths)
    }

    fn try_mount_kernel_file_systems(&mut self) -> Result<()> {
        let locations = self.config.bind_locations.clone();
        for location in locations {
            let target = self.root.host_path(&location);
            let mount = argv(["mount", "-n", "--bind", location.as_str(), target.as_str()]);
            let _ = self.run(&mount)?;
            self.mount_stack.push(location);
        }
        Ok(())
    }

    fn try_mount_shared_directory(&mut self) -> Result<()> {
        let shared = self.config.shared_location.clone();
        let target = self.root.host_path(&shared);

        let _ = self.run(&argv(["mkdir", "-p", target.as_str()]))?;
        self.dir_stack.push(shared.clone());

        let mount = argv(["mount", "-n", "--bind", shared.as_str(), target.as_str()]);
        let _ = self.run(&mount)?;
        self.mount_stack.push(shared);
        Ok(())
    }

    fn try_setup_intermediate_config(&mut self) -> Result<()> {
        let files = self.config.config_files.clone();
        let suffix = self.config.config_suffix.clone();
        for file in files {
            if !self.host.exists(Path::new(&file)) {
                tracing::debug!(file = %file, "config file absent on host, skipping");
                continue;
            }
            let staged = format!("{file}{suffix}");
            let link_target = format!("{}{suffix}", file_name(&file)?);

            let copy = self.root.host_path(&staged);
            let _ = self.run(&argv(["cp", file.as_str(), copy.as_str()]))?;
            self.cleanup_files.push(staged);

            let link = self.root.host_path(&file);
            let _ = self.run(&argv(["ln", "-s", "-f", link_target.as_str(), link.as_str()]))?;
            self.cleanup_files.push(file);
        }
        Ok(())
    }

    fn run(&self, argv: &[String]) -> Result<CommandOutput> {
        tracing::debug!(cmd = ?argv, "bind command");
        self.runner.run(argv)
    }

    fn unwind_on_error(
        &mut self,
        result: Result<()>,
        wrap: impl FnOnce(KiwiError) -> BindError,
    ) -> BindResult<()> {
        result.map_err(|source| {
            tracing::error!(root = %self.root, error = %source, "bind setup failed, unwinding");
            self.cleanup();
            wrap(source)
        })
    }
}

impl Drop for RootBind {
    fn drop(&mut self) {
        if self.has_artifacts() {
            self.sink.warning(&format!(
                "bind manager for {} dropped with artifacts still recorded, cleaning up",
                self.root
            ));
            self.cleanup();
        }
    }
}

fn file_name(path: &str) -> Result<String> {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| KiwiError::Config {
            message: format!("config file path has no file name: {path}"),
        })
}

#[cfg(test)]
mod tests {
    use super::fakes::{CollectingSink, FakeHostFs, RecordingRunner};
    use super::*;

    fn test_config() -> BindConfig {
        BindConfig {
            bind_locations: vec!["/proc".into()],
            config_files: vec!["/foo".into()],
            shared_location: "/var/cache/kiwi".into(),
            config_suffix: ".kiwi".into(),
        }
    }

    fn manager(runner: &RecordingRunner, host: FakeHostFs) -> RootBind {
        RootBind::new(BuildRoot::new("root-dir"), test_config())
            .with_runner(runner.clone())
            .with_host_fs(host)
            .with_sink(CollectingSink::default())
    }

    #[test]
    fn mount_kernel_file_systems_binds_proc() {
        let runner = RecordingRunner::new();
        let mut bind = manager(&runner, FakeHostFs::all_present());

        bind.mount_kernel_file_systems().expect("mount");

        assert_eq!(
            runner.calls(),
            vec![argv(["mount", "-n", "--bind", "/proc", "root-dir/proc"])]
        );
        assert_eq!(bind.mount_stack(), ["/proc"]);
    }

    #[test]
    fn mount_kernel_file_systems_mounts_in_list_order() {
        let runner = RecordingRunner::new();
        let mut bind = manager(&runner, FakeHostFs::all_present());
        bind.config.bind_locations = vec!["/proc".into(), "/dev".into(), "/sys".into()];

        bind.mount_kernel_file_systems().expect("mount");

        let sources: Vec<String> = runner.calls().iter().map(|c| c[3].clone()).collect();
        assert_eq!(sources, ["/proc", "/dev", "/sys"]);
        assert_eq!(bind.mount_stack().len(), 3);
    }

    #[test]
    fn mount_kernel_file_systems_stops_and_unwinds_on_failure() {
        let runner =
            RecordingRunner::failing_when(|argv| argv.last().is_some_and(|t| t == "root-dir/dev"));
        let mut bind = manager(&runner, FakeHostFs::all_present());
        bind.config.bind_locations = vec!["/proc".into(), "/dev".into(), "/sys".into()];

        let err = bind.mount_kernel_file_systems().unwrap_err();

        assert!(matches!(err, BindError::MountKernelFileSystems { .. }));
        assert!(err.to_string().contains("root-dir/dev"));
        let calls = runner.calls();
        assert!(!calls.iter().any(|c| c.contains(&"/sys".to_owned())));
        assert_eq!(
            calls[2..],
            [
                argv(["mountpoint", "-q", "root-dir/proc"]),
                argv(["umount", "-l", "root-dir/proc"]),
            ]
        );
        assert!(!bind.has_artifacts());
    }

    #[test]
    fn mount_shared_directory_creates_before_mounting() {
        let runner = RecordingRunner::new();
        let mut bind = manager(&runner, FakeHostFs::all_present());

        bind.mount_shared_directory().expect("mount");

        assert_eq!(
            runner.calls(),
            vec![
                argv(["mkdir", "-p", "root-dir/var/cache/kiwi"]),
                argv(["mount", "-n", "--bind", "/var/cache/kiwi", "root-dir/var/cache/kiwi"]),
            ]
        );
        assert_eq!(bind.dir_stack(), ["/var/cache/kiwi"]);
        assert_eq!(bind.mount_stack(), ["/var/cache/kiwi"]);
    }

    #[test]
    fn mount_shared_directory_failure_removes_created_directory() {
        let runner = RecordingRunner::failing_when(|argv| argv[0] == "mount");
        let mut bind = manager(&runner, FakeHostFs::all_present());

        let err = bind.mount_shared_directory().unwrap_err();

        assert!(matches!(err, BindError::MountSharedDirectory { .. }));
        assert_eq!(
            runner.calls().last(),
            Some(&argv(["rmdir", "--ignore-fail-on-non-empty", "root-dir/var"]))
        );
        assert!(!bind.has_artifacts());
    }

    #[test]
    fn mount_shared_directory_mkdir_failure_is_reported() {
        let runner = RecordingRunner::failing_when(|argv| argv[0] == "mkdir");
        let mut bind = manager(&runner, FakeHostFs::all_present());

        let err = bind.mount_shared_directory().unwrap_err();

        assert!(matches!(err, BindError::MountSharedDirectory { .. }));
        assert_eq!(runner.calls(), vec![argv(["mkdir", "-p", "root-dir/var/cache/kiwi"])]);
    }

    #[test]
    fn setup_intermediate_config_copies_then_links() {
        let runner = RecordingRunner::new();
        let mut bind = manager(&runner, FakeHostFs::all_present());

        bind.setup_intermediate_config().expect("stage");

        assert_eq!(
            runner.calls(),
            vec![
                argv(["cp", "/foo", "root-dir/foo.kiwi"]),
                argv(["ln", "-s", "-f", "foo.kiwi", "root-dir/foo"]),
            ]
        );
        assert_eq!(bind.cleanup_files(), ["/foo.kiwi", "/foo"]);
    }

    #[test]
    fn setup_intermediate_config_links_by_relative_name() {
        let runner = RecordingRunner::new();
        let mut bind = manager(&runner, FakeHostFs::all_present());
        bind.config.config_files = vec!["/etc/resolv.conf".into()];

        bind.setup_intermediate_config().expect("stage");

        assert_eq!(
            runner.calls(),
            vec![
                argv(["cp", "/etc/resolv.conf", "root-dir/etc/resolv.conf.kiwi"]),
                argv(["ln", "-s", "-f", "resolv.conf.kiwi", "root-dir/etc/resolv.conf"]),
            ]
        );
    }

    #[test]
    fn setup_intermediate_config_skips_missing_host_files() {
        let runner = RecordingRunner::new();
        let mut bind = manager(&runner, FakeHostFs::nothing_present());

        bind.setup_intermediate_config().expect("stage");

        assert!(runner.calls().is_empty());
        assert!(bind.cleanup_files().is_empty());
    }

    #[test]
    fn setup_intermediate_config_failure_removes_partial_copy() {
        let runner = RecordingRunner::failing_when(|argv| argv[0] == "ln");
        let mut bind = manager(&runner, FakeHostFs::all_present());

        let err = bind.setup_intermediate_config().unwrap_err();

        assert!(matches!(err, BindError::SetupIntermediateConfig { .. }));
        assert_eq!(runner.calls().last(), Some(&argv(["rm", "-f", "root-dir/foo.kiwi"])));
        assert!(bind.cleanup_files().is_empty());
    }

    #[test]
    fn setup_runs_phases_in_order() {
        let runner = RecordingRunner::new();
        let mut bind = manager(&runner, FakeHostFs::all_present());

        bind.setup().expect("setup");

        let programs: Vec<String> = runner.calls().iter().map(|c| c[0].clone()).collect();
        assert_eq!(programs, ["mount", "mkdir", "mount", "cp", "ln"]);
        assert_eq!(bind.mount_stack(), ["/proc", "/var/cache/kiwi"]);
    }

    #[test]
    fn drop_cleans_up_remaining_artifacts() {
        let runner = RecordingRunner::new();
        let sink = CollectingSink::default();
        {
            let mut bind = manager(&runner, FakeHostFs::all_present()).with_sink(sink.clone());
            bind.mount_kernel_file_systems().expect("mount");
        }
        assert_eq!(
            runner.calls().last(),
            Some(&argv(["umount", "-l", "root-dir/proc"]))
        );
        assert_eq!(sink.messages().len(), 1);
    }

    #[test]
    fn drop_after_cleanup_issues_nothing() {
        let runner = RecordingRunner::new();
        {
            let mut bind = manager(&runner, FakeHostFs::all_present());
            bind.mount_kernel_file_systems().expect("mount");
            bind.cleanup();
        }
        assert_eq!(runner.calls().len(), 3);
    }

    #[test]
    fn file_name_takes_last_component() {
        assert_eq!(file_name("/etc/sysconfig/proxy").expect("name"), "proxy");
    }
}
