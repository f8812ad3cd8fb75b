//! Host-to-build-root path translation.

use kiwi_common::types::BuildRoot;

/// Rewrites paths under `root` to the path seen from inside the root.
///
/// `<root>/x` becomes `/x` and `<root>` itself becomes `/`. Paths not
/// anchored under `root` are returned unchanged.
pub fn move_to_root<I, S>(root: &BuildRoot, paths: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let root = root.path().to_string_lossy();
    let prefix = root.trim_end_matches('/');
    paths
        .into_iter()
        .map(|path| {
            let path = path.as_ref();
            match path.strip_prefix(prefix) {
                Some("") => "/".to_owned(),
                Some(rest) if rest.starts_with('/') => rest.to_owned(),
                _ => path.to_owned(),
            }
        })
        .collect()
}
