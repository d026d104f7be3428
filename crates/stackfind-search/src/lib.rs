//! Live search, navigation, and rename over a layer stack.
//!
//! The engine matches node names against a case-insensitive substring, keeps the matches in
//! stack order (split into layers, content effects, and mask effects), walks them with a
//! wrapping cursor, and renames the find text inside matched names. It stays consistent
//! while the host edits the tree underneath it.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//!
//! use stackfind_search::{SearchSession, SessionSettings};
//! use stackfind_stack::{MemoryHost, StackFile};
//!
//! let yaml = r"
//! documents:
//!   - material: Rock
//!     layers:
//!       - name: Base
//!       - name: Base Detail
//!         effects:
//!           - name: Base Glow
//!       - name: Grime
//! ";
//! let file = StackFile::from_yaml_str(yaml, Path::new("rock.yaml")).unwrap();
//! let mut host = MemoryHost::from_stack_file(&file).unwrap();
//!
//! let mut session = SearchSession::new(SessionSettings::default());
//! session.attach(&mut host);
//!
//! let status = session.set_search_text(&mut host, "base").unwrap();
//! assert_eq!(status.to_string(), "1 out of 3");
//!
//! session.step_prev(&mut host).unwrap();
//! assert_eq!(session.status_text(), "3 out of 3");
//! ```

#![warn(missing_docs)]

mod bridge;
mod cursor;
mod error;
mod identity;
mod matcher;
mod reactor;
mod rename;
mod session;
mod status;
mod store;
mod walker;

pub use bridge::{SelectionAction, SelectionBridge};
pub use cursor::{Direction, NavigationCursor};
pub use error::Skip;
pub use identity::{IdentityMap, NodeId};
pub use matcher::{NameMatcher, best_effort_name, literal_pattern};
pub use reactor::{ChangeReactor, Reaction};
pub use rename::{RenameEngine, Renamed};
pub use session::{SearchSession, SearchState, SessionSettings};
pub use status::Status;
pub use store::{Hit, MatchCategory, Placement, ResultSet, ResultStore};
pub use walker::TreeWalker;
