//! Path-independent rendering of the invoking command line.

use std::path::{Component, Path, PathBuf};

/// Render a command line for embedding in generated files.
///
/// Arguments naming an existing path are rewritten relative to the current
/// directory so the banner does not depend on where the checkout lives.
/// Everything else is kept verbatim.
pub fn banner_command<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match std::env::current_dir() {
        Ok(cwd) => banner_command_in(args, &cwd),
        Err(_) => join(args.into_iter().map(|a| a.as_ref().to_string())),
    }
}

/// Like [`banner_command`], resolving paths against `cwd`.
pub fn banner_command_in<I, S>(args: I, cwd: &Path) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    join(args.into_iter().map(|a| make_relative(a.as_ref(), cwd)))
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(" ")
}

fn make_relative(arg: &str, cwd: &Path) -> String {
    if arg.is_empty() {
        return String::new();
    }

    let path = Path::new(arg);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    if !absolute.exists() {
        return arg.to_string();
    }

    match relative_to(&normalize(&absolute), &normalize(cwd)) {
        Some(relative) => relative.display().to_string(),
        None => arg.to_string(),
    }
}

/// Lexically resolve `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn relative_to(target: &Path, base: &Path) -> Option<PathBuf> {
    let target: Vec<Component> = target.components().collect();
    let base: Vec<Component> = base.components().collect();

    // Different roots (e.g. Windows drives) have no relative form.
    if target.first() != base.first() {
        return None;
    }

    let common = target
        .iter()
        .zip(&base)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    Some(relative)
}
