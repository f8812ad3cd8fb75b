//! Best-effort teardown of everything a [`RootBind`] recorded.

use std::path::Path;

use crate::command::argv;

use super::RootBind;

impl RootBind {
    /// Unmounts, removes created directories, and deletes staged files.
    ///
    /// Mount points are processed last-mounted first, then created
    /// directories in reverse creation order, then all staged files in one
    /// batch. Directory removal never climbs above the build root. No
    /// failure stops the unwind: each one is reported to the
    /// warning sink. All recorded artifacts are forgotten afterwards, so a
    /// second call is a no-op.
    pub fn cleanup(&mut self) {
        let mounts = std::mem::take(&mut self.mount_stack);
        let dirs = std::mem::take(&mut self.dir_stack);
        let files = std::mem::take(&mut self.cleanup_files);
        tracing::debug!(
            root = %self.root,
            mounts = mounts.len(),
            dirs = dirs.len(),
            files = files.len(),
            "cleaning up build root"
        );

        for mount in mounts.iter().rev() {
            self.unmount(mount);
        }
        for dir in dirs.iter().rev() {
            self.remove_dir_chain(dir);
        }
        self.remove_files(&files);
    }

    fn unmount(&self, mount: &str) {
        let target = self.root.host_path(mount);
        // An unqueryable path is treated as not mounted.
        if let Err(e) = self.run(&argv(["mountpoint", "-q", target.as_str()])) {
            self.warn(&format!(
                "mount point query for {target} failed, not unmounting: {e}"
            ));
            return;
        }
        if let Err(e) = self.run(&argv(["umount", "-l", target.as_str()])) {
            self.warn(&format!("failed to unmount {target}: {e}"));
        }
    }

    /// Removes `dir` and its now-empty parents, never touching the build
    /// root itself or anything above it.
    fn remove_dir_chain(&self, dir: &str) {
        for component in parent_chain(dir) {
            let target = self.root.host_path(&component);
            let rmdir = argv(["rmdir", "--ignore-fail-on-non-empty", target.as_str()]);
            if let Err(e) = self.run(&rmdir) {
                // A child that cannot go keeps every parent non-empty.
                self.warn(&format!("failed to remove directory {target}: {e}"));
                return;
            }
        }
    }

    fn remove_files(&self, files: &[String]) {
        if files.is_empty() {
            return;
        }
        let targets = files.iter().map(|file| self.root.host_path(file));
        let rm = argv(["rm", "-f"].into_iter().map(String::from).chain(targets));
        if let Err(e) = self.run(&rm) {
            self.warn(&format!("failed to remove staged files: {e}"));
        }
    }

    fn warn(&self, message: &str) {
        self.sink.warning(message);
    }
}

/// Build-root-relative `dir` followed by each of its parents, deepest
/// first, excluding `/` (the build root).
fn parent_chain(dir: &str) -> Vec<String> {
    Path::new(dir)
        .ancestors()
        .filter(|ancestor| ancestor.parent().is_some())
        .map(|ancestor| ancestor.to_string_lossy().into_owned())
        .filter(|ancestor| !ancestor.is_empty())
        .collect()
}
