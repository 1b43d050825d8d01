//! Fetch Refspecs
//!
//! git offers no command mapping a ref of a remote to the local
//! remote-tracking ref it is fetched into, so the `remote.<name>.fetch`
//! values are interpreted here.

use crate::error::{GraphError, Result};

/// A parsed `[+]<src>:<dst>` fetch refspec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSpec {
    pub force: bool,
    /// Ref (or prefix, for globs) on the remote side.
    pub source: String,
    /// Ref (or prefix, for globs) on the local side.
    pub destination: String,
    /// Both sides end in `*`; `source` and `destination` hold the prefixes.
    pub glob: bool,
}

impl FetchSpec {
    /// Parse `[+]<src>:<dst>`. A `*` must end both sides or neither.
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = |reason| GraphError::FetchSpec {
            spec: spec.to_string(),
            reason,
        };

        let (force, rest) = match spec.strip_prefix('+') {
            Some(rest) => (true, rest),
            None => (false, spec),
        };
        let (source, destination) = rest.split_once(':').ok_or_else(|| invalid("missing ':'"))?;
        if source.is_empty() {
            return Err(invalid("empty source"));
        }

        let (source, destination, glob) =
            match (source.strip_suffix('*'), destination.strip_suffix('*')) {
                (Some(s), Some(d)) => (s, d, true),
                (None, None) => (source, destination, false),
                _ => return Err(invalid("pattern on one side only")),
            };

        Ok(Self {
            force,
            source: source.to_string(),
            destination: destination.to_string(),
            glob,
        })
    }

    /// Local ref that `remote_ref` is fetched into, if this spec covers it.
    pub fn map(&self, remote_ref: &str) -> Option<String> {
        if self.destination.is_empty() {
            return None;
        }
        if self.glob {
            let rest = remote_ref.strip_prefix(self.source.as_str())?;
            Some(format!("{}{}", self.destination, rest))
        } else if remote_ref == self.source {
            Some(self.destination.clone())
        } else {
            None
        }
    }
}
