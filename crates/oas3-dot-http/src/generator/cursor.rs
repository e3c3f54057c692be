/// Separator used to climb one level when a relative path leaves a directory.
pub const PARENT_SEGMENT: &str = "..";

/// An immutable position in the output module tree.
///
/// Cursors compare by their segment sequence only; two cursors built
/// independently over the same segments are the same position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PathCursor {
  path: Vec<String>,
}

impl PathCursor {
  #[must_use]
  pub fn root() -> Self {
    Self::default()
  }

  pub fn new<I, S>(segments: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      path: segments.into_iter().map(Into::into).collect(),
    }
  }

  #[must_use]
  pub fn path(&self) -> &[String] {
    &self.path
  }

  #[must_use]
  pub fn is_root(&self) -> bool {
    self.path.is_empty()
  }

  /// The cursor one level up, or `None` at the root.
  #[must_use]
  pub fn parent(&self) -> Option<Self> {
    let (_, rest) = self.path.split_last()?;
    Some(Self { path: rest.to_vec() })
  }

  /// A new cursor with `segments` appended; the receiver is left untouched.
  #[must_use]
  pub fn enter<I, S>(&self, segments: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut path = self.path.clone();
    path.extend(segments.into_iter().map(Into::into));
    Self { path }
  }

  /// Segments that navigate from this cursor to `to`.
  ///
  /// One `up` token is produced for every segment of `self` past the common
  /// prefix, followed by the remainder of `to`. Equal cursors produce an empty
  /// path.
  #[must_use]
  pub fn relative_path(&self, to: &PathCursor, up: &str) -> Vec<String> {
    let common = common_prefix_len(&self.path, &to.path);

    std::iter::repeat_n(up.to_string(), self.path.len() - common)
      .chain(to.path[common..].iter().cloned())
      .collect()
  }
}

fn common_prefix_len(a: &[String], b: &[String]) -> usize {
  a.iter().zip(b).take_while(|(left, right)| left == right).count()
}
