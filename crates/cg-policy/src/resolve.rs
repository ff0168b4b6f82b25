//! Symlink-chain-aware command name resolution.
//!
//! Matching a command by name alone is defeated by a chain of links such as
//! `/tmp/innocuous -> /tmp/x -> ... -> /bin/rm`. Resolution walks the chain
//! one hop at a time and records every name the executable could be matched
//! under: the original string, its base name, and the full path and base
//! name of every hop.
//!
//! The walk is fail-open on I/O errors (a path that cannot be inspected ends
//! the chain) but fail-closed on depth: at most `max_depth` paths are
//! inspected, and a link found on the last of them is reported via
//! [`NameVariants::exceeded_depth`]. A chain of `max_depth - 1` links
//! therefore resolves, one of `max_depth` links does not.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

/// Maximum number of paths inspected while walking a chain, matching the
/// usual `SYMLOOP_MAX` on Linux.
pub const MAX_SYMLINK_DEPTH: usize = 40;

/// Filesystem metadata needed to walk a symlink chain.
///
/// Production uses [`OsLinks`]; tests provide an in-memory table.
pub trait LinkSource {
    /// Whether `path` itself is a symbolic link (the link is not followed).
    fn is_symlink(&self, path: &Path) -> io::Result<bool>;

    /// The raw target stored in the link at `path`.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;
}

/// [`LinkSource`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsLinks;

impl LinkSource for OsLinks {
    fn is_symlink(&self, path: &Path) -> io::Result<bool> {
        fs::symlink_metadata(path).map(|meta| meta.file_type().is_symlink())
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        fs::read_link(path)
    }
}

/// Every name under which a command could be invoked or referenced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameVariants {
    names: HashSet<String>,
    exceeded_depth: bool,
}

impl NameVariants {
    /// Exact membership test.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn contains_any(&self, candidates: &[&str]) -> bool {
        candidates.iter().any(|c| self.names.contains(*c))
    }

    /// True when the final permitted inspection still found a symlink.
    pub fn exceeded_depth(&self) -> bool {
        self.exceeded_depth
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Result of inspecting the current position in the chain.
enum Hop {
    /// Not a link, or not inspectable: the chain ends here.
    End,
    /// Still a link on the final permitted inspection.
    Exceeded,
    /// Followed one link to this path.
    Next(PathBuf),
}

/// Resolves command names against a [`LinkSource`], inspecting at most
/// `max_depth` paths per name.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    links: &'a dyn LinkSource,
    max_depth: usize,
}

impl<'a> Resolver<'a> {
    pub fn new(links: &'a dyn LinkSource, max_depth: usize) -> Self {
        Self { links, max_depth }
    }

    /// Collect all name variants for `name`.
    ///
    /// An empty name yields an empty set without a depth violation; callers
    /// reject empty command names separately.
    pub fn resolve(&self, name: &str) -> NameVariants {
        if name.is_empty() {
            return NameVariants::default();
        }

        let mut names = HashSet::new();
        names.insert(name.to_string());
        names.insert(base_name(name).to_string());

        let mut current = PathBuf::from(name);
        let mut remaining = self.max_depth;

        let exceeded_depth = loop {
            match self.step(&current, remaining) {
                Hop::End => break false,
                Hop::Exceeded => {
                    warn!(
                        command = name,
                        max_depth = self.max_depth,
                        "symlink chain exceeds depth limit"
                    );
                    break true;
                }
                Hop::Next(next) => {
                    let full = next.to_string_lossy().into_owned();
                    debug!(from = %current.display(), to = %full, "followed symlink");
                    names.insert(base_name(&full).to_string());
                    names.insert(full);
                    current = next;
                    remaining -= 1;
                }
            }
        };

        NameVariants {
            names,
            exceeded_depth,
        }
    }

    fn step(&self, current: &Path, remaining: usize) -> Hop {
        match self.links.is_symlink(current) {
            Ok(true) => {}
            Ok(false) => return Hop::End,
            Err(e) => {
                debug!(path = %current.display(), error = %e, "cannot inspect path, stopping");
                return Hop::End;
            }
        }

        if remaining <= 1 {
            return Hop::Exceeded;
        }

        match self.links.read_link(current) {
            Ok(target) => Hop::Next(follow(current, &target)),
            Err(e) => {
                debug!(path = %current.display(), error = %e, "cannot read link, stopping");
                Hop::End
            }
        }
    }
}

/// Resolve `name` against the real filesystem with the default depth limit.
pub fn resolve(name: &str) -> NameVariants {
    Resolver::new(&OsLinks, MAX_SYMLINK_DEPTH).resolve(name)
}

/// Extract the final path element (e.g., "/usr/bin/ls" -> "ls").
///
/// Trailing slashes are ignored; an all-slash path yields "/" and an empty
/// path yields ".".
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.is_empty() { "." } else { "/" };
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Relative targets are taken from the link's directory; absolute targets
/// replace the path outright.
fn follow(current: &Path, target: &Path) -> PathBuf {
    if target.is_absolute() {
        return target.to_path_buf();
    }
    let dir = current.parent().unwrap_or_else(|| Path::new(""));
    clean(&dir.join(target))
}

/// Lexically normalize `.` and `..` components.
fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last().copied() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // "/.." is "/"
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.into_iter().collect()
}
