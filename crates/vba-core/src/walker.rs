//! Discovery of the documents taking part in one synchronization

use crate::error::{HostError, HostResult};
use crate::handle::DocumentHandle;

/// A document to synchronize and its folder relative to the target root.
#[derive(Debug)]
pub struct WalkEntry<D> {
    pub document: D,
    /// Empty for the root document, the stencil's display name otherwise
    pub subpath: String,
}

/// Produces the root document followed by its docked stencils.
///
/// Recursion stops at depth one: stencil entries are never expanded, even
/// when they are themselves drawings or templates.
pub struct TreeWalker;

impl TreeWalker {
    /// Walk `root`, adding its docked stencils when `include_stencils` is
    /// set and the root is a drawing or template.
    pub fn walk<D: DocumentHandle>(root: D, include_stencils: bool) -> Walk<D> {
        Walk {
            state: WalkState::Root {
                root,
                include_stencils,
            },
        }
    }
}

enum WalkState<D> {
    Root { root: D, include_stencils: bool },
    Docked(std::vec::IntoIter<D>),
    Failed(HostError),
    Done,
}

/// Iterator returned by [`TreeWalker::walk`].
///
/// The docked stencils are enumerated while the root is still untouched, so
/// a later reopen of the root handle does not affect the walk.
pub struct Walk<D> {
    state: WalkState<D>,
}

impl<D: DocumentHandle> Iterator for Walk<D> {
    type Item = HostResult<WalkEntry<D>>;

    fn next(&mut self) -> Option<Self::Item> {
        match std::mem::replace(&mut self.state, WalkState::Done) {
            WalkState::Root {
                root,
                include_stencils,
            } => {
                if include_stencils && root.kind().hosts_stencils() {
                    self.state = match root.docked_sub_documents() {
                        Ok(docked) => WalkState::Docked(docked.into_iter()),
                        Err(e) => WalkState::Failed(e),
                    };
                }
                Some(Ok(WalkEntry {
                    document: root,
                    subpath: String::new(),
                }))
            }
            WalkState::Docked(mut docked) => {
                let document = docked.next()?;
                let subpath = document.display_name();
                self.state = WalkState::Docked(docked);
                Some(Ok(WalkEntry { document, subpath }))
            }
            WalkState::Failed(e) => Some(Err(e)),
            WalkState::Done => None,
        }
    }
}
