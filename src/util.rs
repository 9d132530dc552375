use std::path::{Component, Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Lexically normalize a path: drop `.` components and fold `name/..` pairs.
///
/// The file system is never consulted, so symlinks are not resolved. A `..` directly below
/// the root is dropped, while leading `..` components of a relative path are kept.
#[must_use]
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts = Vec::<Component<'_>>::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    _ = parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::ParentDir) | None => parts.push(component),
                Some(Component::CurDir) => unreachable!("`.` components are never kept"),
            },
            c => parts.push(c),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }

    parts.iter().collect()
}

/// Append `suffix` to the final component of `path` (`app.ini` -> `app.ini.bak`).
pub(crate) fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

// Every writer leaves the guarded data consistent before it could panic, so a poisoned lock
// still holds usable data.
pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}
