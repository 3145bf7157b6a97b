use std::path::{Component, Path, PathBuf};

use crate::error::{NotepadError, Result};

/// Returns the final component of `path` as a string.
///
/// # Arguments
/// * `path` - Any path produced by the browser
///
/// # Returns
/// * `Ok(String)` - The basename
/// * `Err(NotepadError::InvalidPath)` - If the path is empty or ends in `..`
pub fn basename(path: &Path) -> Result<String> {
    if path.as_os_str().is_empty() {
        return Err(NotepadError::InvalidPath("Path is empty".to_string()));
    }

    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            NotepadError::InvalidPath(format!("Path has no final component: {}", path.display()))
        })
}

/// Returns the lowercased text after the last `.` in `name`, or an empty
/// string when there is none.
pub fn extension(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Joins `name` onto `dir`.
///
/// Leading separators on `name` are dropped so the result always stays
/// under `dir` (a plain `Path::join` would replace `dir` with an absolute
/// `name`).
pub fn join(dir: &Path, name: &str) -> PathBuf {
    dir.join(name.trim_start_matches(['/', '\\']))
}

/// Lexically resolves `.` and `..` components without touching the disk.
///
/// `..` never climbs above a filesystem root; leading `..` on relative paths
/// is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Whether `candidate` lies inside `root` (or is `root` itself).
///
/// Comparison is component-wise on the normalised forms, so `/notes2` is not
/// within `/notes` and `/notes/a/../../etc` is rejected.
pub fn is_within(root: &Path, candidate: &Path) -> bool {
    normalize(candidate).starts_with(normalize(root))
}

/// Strips the last segment of `path`, clamping the result to `root`.
pub fn parent_within(root: &Path, path: &Path) -> PathBuf {
    let root = normalize(root);
    let path = normalize(path);

    match path.parent() {
        Some(parent) if parent.starts_with(&root) => parent.to_path_buf(),
        _ => root,
    }
}

/// Validates a user-supplied item name before it is joined onto a directory.
///
/// Rejects blank names and anything that could address a location other than
/// a direct child: separators, `.` and `..`.
///
/// # Arguments
/// * `name` - The raw name typed by the user
///
/// # Returns
/// * `Ok(String)` - The trimmed name
/// * `Err(NotepadError)` - `EmptyName` or `InvalidPath`
pub fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(NotepadError::EmptyName);
    }

    if name.contains('/') {
        return Err(NotepadError::InvalidPath(
            "Name contains invalid separator '/'".to_string(),
        ));
    }

    if name.contains('\\') {
        return Err(NotepadError::InvalidPath(
            "Name contains invalid separator '\\'".to_string(),
        ));
    }

    if name == "." || name == ".." || name.contains('\0') {
        return Err(NotepadError::InvalidPath(format!("Invalid name '{}'", name)));
    }

    Ok(name.to_string())
}
