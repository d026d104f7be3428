//! The search session: state plus the operations a front end drives.

use std::hash::Hash;

use stackfind_config::{Config, CursorRestore, ResultView};
use stackfind_stack::{DocumentKey, LayerStack, StackHost, Subscription};
use tracing::{debug, info};

use crate::{
    ChangeReactor, Direction, Hit, IdentityMap, MatchCategory, NavigationCursor, Reaction,
    RenameEngine, Renamed, ResultSet, ResultStore, SelectionAction, SelectionBridge, Skip, Status,
    matcher::best_effort_name, rename::check_inputs,
};

/// Behaviour switches for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Strip surrounding whitespace from find and replacement text.
    pub trim_input: bool,
    /// View navigation starts in, and returns to after a document switch.
    pub view: ResultView,
    /// How the cursor survives a refresh with unchanged sizes.
    pub cursor_restore: CursorRestore,
    /// Match the find text case-sensitively when renaming.
    pub case_sensitive: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            trim_input: config.search.trim_input,
            view: config.search.view,
            cursor_restore: config.navigation.cursor_restore,
            case_sensitive: config.replace.case_sensitive,
        }
    }
}

/// Everything the session remembers between calls.
#[derive(Debug)]
pub struct SearchState<N> {
    /// The last find text.
    search_text: String,
    /// Matches for the find text.
    store: ResultStore<N>,
    /// Current match.
    cursor: NavigationCursor,
    /// Category memory for effect bridging.
    bridge: SelectionBridge,
    /// Sequence the cursor walks.
    view: ResultView,
    /// Identities for hosts without uids.
    ids: IdentityMap<N>,
}

impl<N: Clone + Eq + Hash> SearchState<N> {
    /// Creates empty state walking `view`.
    pub fn new(view: ResultView) -> Self {
        Self {
            search_text: String::new(),
            store: ResultStore::new(),
            cursor: NavigationCursor::new(),
            bridge: SelectionBridge::new(),
            view,
            ids: IdentityMap::new(),
        }
    }

    /// Drops everything, including the find text.
    pub fn reset(&mut self, view: ResultView) {
        *self = Self::new(view);
    }

    /// Empties the lists but keeps the find text.
    fn clear_results(&mut self) {
        self.store.clear();
        self.cursor.reset();
    }

    /// The sequence the cursor walks.
    fn active(&self) -> &[Hit<N>] {
        self.store.results().view(self.view)
    }

    /// The current match.
    fn current(&self) -> Option<&Hit<N>> {
        self.cursor.index().and_then(|i| self.active().get(i))
    }
}

/// Live search over a host's layer stack.
///
/// Every operation takes the host explicitly; the session owns only its own state.
#[derive(Debug)]
pub struct SearchSession<H: LayerStack> {
    /// Behaviour switches.
    settings: SessionSettings,
    /// Search state.
    state: SearchState<H::Node>,
    /// Document binding.
    reactor: ChangeReactor,
    /// Change feed subscription while attached.
    subscription: Option<Subscription>,
}

impl<H: StackHost> SearchSession<H> {
    /// Creates a detached session.
    pub fn new(settings: SessionSettings) -> Self {
        let state = SearchState::new(settings.view);
        Self {
            settings,
            state,
            reactor: ChangeReactor::new(),
            subscription: None,
        }
    }

    /// Creates a session configured from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(SessionSettings::from(config))
    }

    /// The session's settings.
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Subscribes to the host's changes and binds the active document.
    ///
    /// Re-attaching to a different document drops all state. Re-attaching to the bound document
    /// refreshes the matches without selecting, since edits made while detached went unseen.
    pub fn attach(&mut self, host: &mut H) {
        if let Some(old) = self.subscription.take() {
            host.unsubscribe(&old);
        }
        self.subscription = Some(host.subscribe());
        let key = host.active_document_key();
        info!(document = ?key, "attached");

        let same_document = self.reactor.bound() == key.as_ref();
        self.reactor.bind(key);
        if same_document && host.is_document_open() {
            self.refresh(host, false);
        } else {
            self.state.reset(self.settings.view);
        }
    }

    /// Unsubscribes and forgets all state.
    pub fn detach(&mut self, host: &mut H) {
        if let Some(subscription) = self.subscription.take() {
            host.unsubscribe(&subscription);
        }
        self.reactor.bind(None);
        self.state.reset(self.settings.view);
        info!("detached");
    }

    /// Returns true while subscribed to a host.
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Searches for `text` and selects the current match.
    ///
    /// When the match counts changed the first match becomes current; otherwise the cursor is
    /// kept in range according to the restore policy.
    pub fn set_search_text(&mut self, host: &mut H, text: &str) -> Result<Status, Skip> {
        self.ensure_document(host)?;
        self.state.search_text = self.prepare(text).to_string();
        self.refresh(host, true);
        Ok(self.status())
    }

    /// Moves to the next match, wrapping at the end.
    pub fn step_next(&mut self, host: &mut H) -> Result<Status, Skip> {
        self.step(host, Direction::Next)
    }

    /// Moves to the previous match, wrapping at the start.
    pub fn step_prev(&mut self, host: &mut H) -> Result<Status, Skip> {
        self.step(host, Direction::Prev)
    }

    /// Replaces the find text inside the current match's name.
    pub fn rename_current(&mut self, host: &mut H, replacement: &str) -> Result<Renamed, Skip> {
        self.ensure_document(host)?;
        let Some(hit) = self.state.current().cloned() else {
            return Err(Skip::NoSelection);
        };
        let search = self.state.search_text.clone();
        let replacement = self.prepare(replacement).to_string();

        let renamed = self
            .engine()
            .replace_one(host, &hit.node, &search, &replacement)?;
        match renamed {
            Some(renamed) => {
                self.refresh(host, false);
                Ok(renamed)
            }
            None => Err(Skip::NoOccurrence {
                name: best_effort_name(host, &hit.node),
                search,
            }),
        }
    }

    /// Replaces the find text in every match of the active view.
    ///
    /// Returns the number of nodes renamed.
    pub fn rename_all(&mut self, host: &mut H, replacement: &str) -> Result<usize, Skip> {
        self.ensure_document(host)?;
        let search = self.state.search_text.clone();
        let replacement = self.prepare(replacement).to_string();
        check_inputs(&search, &replacement)?;

        let nodes: Vec<H::Node> = self.state.active().iter().map(|h| h.node.clone()).collect();
        if nodes.is_empty() {
            return Err(Skip::NoResults);
        }

        let count = self
            .engine()
            .replace_all(host, &nodes, &search, &replacement)?;
        info!(count, %search, %replacement, "renamed matches");
        self.refresh(host, false);
        Ok(count)
    }

    /// Switches the sequence navigation walks and selects its first match.
    pub fn set_view(&mut self, host: &mut H, view: ResultView) -> Result<Status, Skip> {
        self.ensure_document(host)?;
        self.state.view = view;
        let len = self.state.active().len();
        self.state.cursor.first(len);
        self.select_current(host);
        Ok(self.status())
    }

    /// Reacts to a change in the host's tree.
    pub fn on_tree_changed(&mut self, host: &mut H) -> Reaction {
        let reaction = self
            .reactor
            .observe(host.is_document_open(), host.active_document_key());
        match &reaction {
            Reaction::NoDocument => self.state.clear_results(),
            Reaction::Reset { .. } => self.state.reset(self.settings.view),
            Reaction::Refresh => self.refresh(host, false),
        }
        reaction
    }

    /// Handles pending change notifications as one batch.
    ///
    /// Returns `None` when nothing changed since the last pump.
    pub fn pump(&mut self, host: &mut H) -> Option<Reaction> {
        let latest = self.subscription.as_ref().and_then(Subscription::drain)?;
        debug!(seq = latest.seq, "tree changed");
        Some(self.on_tree_changed(host))
    }

    /// Cursor position and list sizes.
    pub fn status(&self) -> Status {
        let (layers, content_effects, mask_effects) = self.state.store.results().sizes();
        Status {
            index: self.state.cursor.index(),
            total: self.state.active().len(),
            layers,
            content_effects,
            mask_effects,
        }
    }

    /// The status line, `"{n} out of {total}"` or `"0 out of 0"`.
    pub fn status_text(&self) -> String {
        self.status().to_string()
    }

    /// The current match.
    pub fn current(&self) -> Option<&Hit<H::Node>> {
        self.state.current()
    }

    /// Category of the current match.
    pub fn current_category(&self) -> Option<MatchCategory> {
        self.current()
            .and_then(|hit| self.state.store.results().category(&hit.id))
    }

    /// All matches for the current find text.
    pub fn results(&self) -> &ResultSet<H::Node> {
        self.state.store.results()
    }

    /// The view navigation walks.
    pub fn view(&self) -> ResultView {
        self.state.view
    }

    /// The current find text.
    pub fn search_text(&self) -> &str {
        &self.state.search_text
    }

    /// Category of the last node actually selected.
    pub fn last_category(&self) -> Option<MatchCategory> {
        self.state.bridge.last_category()
    }

    /// The document the state belongs to.
    pub fn bound_document(&self) -> Option<&DocumentKey> {
        self.reactor.bound()
    }

    /// Steps the cursor and selects the match.
    fn step(&mut self, host: &mut H, direction: Direction) -> Result<Status, Skip> {
        self.ensure_document(host)?;
        let len = self.state.active().len();
        if len == 0 {
            return Err(Skip::NoResults);
        }
        self.state.cursor.step(direction, len);
        self.select_current(host);
        Ok(self.status())
    }

    /// Fails when nothing is open; resets when the open document is not the bound one.
    fn ensure_document(&mut self, host: &H) -> Result<(), Skip> {
        let reaction = self
            .reactor
            .observe(host.is_document_open(), host.active_document_key());
        match reaction {
            Reaction::NoDocument => {
                self.state.clear_results();
                Err(Skip::NoDocument)
            }
            Reaction::Reset { .. } => {
                self.state.reset(self.settings.view);
                Ok(())
            }
            Reaction::Refresh => Ok(()),
        }
    }

    /// Recomputes matches for the current find text and repositions the cursor.
    fn refresh(&mut self, host: &mut H, should_select: bool) {
        let previous = self.state.current().map(|hit| hit.id);
        let state = &mut self.state;
        let (sizes_changed, _) = state
            .store
            .recompute(&*host, &state.search_text, &mut state.ids);

        let hits = state.store.results().view(state.view);
        if sizes_changed {
            state.cursor.first(hits.len());
        } else {
            match (self.settings.cursor_restore, previous) {
                (CursorRestore::Identity, Some(id)) => state.cursor.restore(id, hits),
                _ => state.cursor.clamp(hits.len()),
            };
        }

        if should_select {
            self.select_current(host);
        }
    }

    /// Selects the current match through the bridge.
    fn select_current(&mut self, host: &mut H) -> Option<SelectionAction<H::Node>> {
        let hit = self.state.current()?.clone();
        let placement = self.state.store.results().placement(&hit.id).cloned();
        let (category, parent) = placement
            .map(|p| (p.category, p.parent))
            .unwrap_or((MatchCategory::Layer, None));

        let action = self
            .state
            .bridge
            .select(host, &hit.node, category, parent.as_ref());
        debug!(?action, %category, "selected match");
        Some(action)
    }

    /// Applies the trim setting.
    fn prepare<'t>(&self, text: &'t str) -> &'t str {
        if self.settings.trim_input {
            text.trim()
        } else {
            text
        }
    }

    /// Rename engine for the current settings.
    fn engine(&self) -> RenameEngine {
        RenameEngine::new(self.settings.case_sensitive)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use stackfind_stack::{MemoryHost, NameEditor, NodeHandle, StackFile};

    use super::*;

    const ROCK: &str = r"
documents:
  - material: Rock
    layers:
      - name: Base
      - name: Base Detail
        effects:
          - name: Base Glow
      - name: Grime
";

    fn host(yaml: &str) -> MemoryHost {
        let file = StackFile::from_yaml_str(yaml, Path::new("test.yaml")).unwrap();
        MemoryHost::from_stack_file(&file).unwrap()
    }

    fn attached(host: &mut MemoryHost) -> SearchSession<MemoryHost> {
        let mut session = SearchSession::new(SessionSettings::default());
        session.attach(host);
        session
    }

    fn current_name(session: &SearchSession<MemoryHost>, host: &MemoryHost) -> Option<String> {
        session.current().map(|hit| host.label(hit.node))
    }

    #[test]
    fn test_search_selects_first_match() {
        let mut host = host(ROCK);
        let mut session = attached(&mut host);

        let status = session.set_search_text(&mut host, "base").unwrap();
        assert_eq!(status.to_string(), "1 out of 3");
        assert_eq!(current_name(&session, &host).as_deref(), Some("Base"));
        assert_eq!(host.selection(), &[host.find_node("Base").unwrap()]);
    }

    #[test]
    fn test_search_trims_input() {
        let mut host = host(ROCK);
        let mut session = attached(&mut host);

        session.set_search_text(&mut host, "  glow \n").unwrap();
        assert_eq!(session.search_text(), "glow");
        assert_eq!(session.status_text(), "1 out of 1");
    }

    #[test]
    fn test_untrimmed_input_is_literal() {
        let mut host = host(ROCK);
        let settings = SessionSettings {
            trim_input: false,
            ..SessionSettings::default()
        };
        let mut session = SearchSession::new(settings);
        session.attach(&mut host);

        session.set_search_text(&mut host, " detail").unwrap();
        assert_eq!(session.status_text(), "1 out of 1");
    }

    #[test]
    fn test_unchanged_sizes_keep_position() {
        let mut host = host(ROCK);
        let mut session = attached(&mut host);

        session.set_search_text(&mut host, "base").unwrap();
        session.step_next(&mut host).unwrap();
        session.step_next(&mut host).unwrap();
        host.clear_selection_log();

        // Same counts: the cursor stays on the third match, which is selected again
        let status = session.set_search_text(&mut host, "BASE").unwrap();
        assert_eq!(status.index, Some(2));
        assert!(!host.selection_log().is_empty());
        assert_eq!(host.selection(), &[host.find_node("Base Glow").unwrap()]);
    }

    #[test]
    fn test_changed_sizes_jump_to_first() {
        let mut host = host(ROCK);
        let mut session = attached(&mut host);

        session.set_search_text(&mut host, "base").unwrap();
        session.step_prev(&mut host).unwrap();
        let status = session.set_search_text(&mut host, "base d").unwrap();
        assert_eq!(status.index, Some(0));
        assert_eq!(status.total, 1);
    }

    #[test]
    fn test_view_switch() {
        let mut host = host(ROCK);
        let mut session = attached(&mut host);
        session.set_search_text(&mut host, "base").unwrap();
        session.step_next(&mut host).unwrap();

        let status = session
            .set_view(&mut host, ResultView::ContentEffects)
            .unwrap();
        assert_eq!(status.to_string(), "1 out of 1");
        assert_eq!(current_name(&session, &host).as_deref(), Some("Base Glow"));
        assert_eq!(session.current_category(), Some(MatchCategory::ContentEffect));

        let status = session.set_view(&mut host, ResultView::MaskEffects).unwrap();
        assert_eq!(status.index, None);
        assert_eq!(session.step_next(&mut host), Err(Skip::NoResults));
    }

    #[test]
    fn test_rename_current_refreshes_without_selecting() {
        let mut host = host(ROCK);
        let mut session = attached(&mut host);
        session.set_search_text(&mut host, "base").unwrap();
        session.step_next(&mut host).unwrap();
        host.clear_selection_log();

        let renamed = session.rename_current(&mut host, "Rock").unwrap();
        assert_eq!(renamed.old_name, "Base Detail");
        assert_eq!(renamed.new_name, "Rock Detail");

        // One match fewer: cursor back to the first match, nothing selected
        assert_eq!(session.status_text(), "1 out of 2");
        assert!(host.selection_log().is_empty());
    }

    #[test]
    fn test_rename_current_skips() {
        let mut host = host(ROCK);
        let mut session = attached(&mut host);

        assert_eq!(
            session.rename_current(&mut host, "Rock"),
            Err(Skip::NoSelection)
        );

        session.set_search_text(&mut host, "base").unwrap();
        assert_eq!(
            session.rename_current(&mut host, "   "),
            Err(Skip::EmptyReplacement)
        );
    }

    #[test]
    fn test_rename_all() {
        let mut host = host(ROCK);
        let mut session = attached(&mut host);
        session.set_search_text(&mut host, "base").unwrap();

        assert_eq!(session.rename_all(&mut host, "Rock"), Ok(3));
        assert_eq!(session.status_text(), "0 out of 0");
        assert!(host.find_node("Rock Glow").is_some());

        assert_eq!(session.rename_all(&mut host, "Rock"), Err(Skip::NoResults));
    }

    #[test]
    fn test_rename_all_requires_search() {
        let mut host = host(ROCK);
        let mut session = attached(&mut host);
        assert_eq!(session.rename_all(&mut host, "Rock"), Err(Skip::EmptySearch));
    }

    #[test]
    fn test_external_rename_is_picked_up() {
        let mut host = host(ROCK);
        let mut session = attached(&mut host);
        session.set_search_text(&mut host, "grime").unwrap();
        host.clear_selection_log();

        let base = host.find_node("Base").unwrap();
        host.set_node_name(&base, "Old Grime").unwrap();

        assert_eq!(session.pump(&mut host), Some(Reaction::Refresh));
        assert_eq!(session.status_text(), "1 out of 2");
        assert!(host.selection_log().is_empty());
        assert_eq!(session.pump(&mut host), None);
    }

    #[test]
    fn test_identity_restore_follows_node() {
        let mut host = host(
            r"
documents:
  - material: Rock
    layers:
      - name: Dirt A
      - name: Dirt B
      - name: Clean
",
        );
        let settings = SessionSettings {
            cursor_restore: CursorRestore::Identity,
            ..SessionSettings::default()
        };
        let mut session: SearchSession<MemoryHost> = SearchSession::new(settings);
        session.attach(&mut host);
        session.set_search_text(&mut host, "dirt").unwrap();
        session.step_next(&mut host).unwrap();

        // One match renamed out, another renamed in: sizes unchanged
        let a = host.find_node("Dirt A").unwrap();
        let clean = host.find_node("Clean").unwrap();
        host.set_node_name(&a, "Swept").unwrap();
        host.set_node_name(&clean, "Dirt C").unwrap();
        session.pump(&mut host);

        assert_eq!(current_name(&session, &host).as_deref(), Some("Dirt B"));
        assert_eq!(session.status().index, Some(0));
    }

    #[test]
    fn test_no_document() {
        let mut host = host(ROCK);
        let mut session = attached(&mut host);
        session.set_search_text(&mut host, "base").unwrap();

        host.close_document();
        assert_eq!(session.pump(&mut host), Some(Reaction::NoDocument));
        assert_eq!(session.status_text(), "0 out of 0");
        assert_eq!(session.step_next(&mut host), Err(Skip::NoDocument));

        // Reopening the same document resumes the search
        host.open_document(0).unwrap();
        assert_eq!(session.pump(&mut host), Some(Reaction::Refresh));
        assert_eq!(session.status().total, 3);
    }

    #[test]
    fn test_detach() {
        let mut host = host(ROCK);
        let mut session = attached(&mut host);
        assert_eq!(host.subscriber_count(), 1);
        session.set_search_text(&mut host, "base").unwrap();

        session.detach(&mut host);
        assert!(!session.is_attached());
        assert_eq!(host.subscriber_count(), 0);
        assert_eq!(session.search_text(), "");
        assert!(session.bound_document().is_none());
    }

    #[test]
    fn test_bridge_memory_survives_refresh() {
        let mut host = host(
            r"
documents:
  - material: Rock
    layers:
      - name: Wear
        effects:
          - name: Wear Blur
        mask:
          - name: Wear Mask
",
        );
        let mut session = attached(&mut host);
        session.set_search_text(&mut host, "wear").unwrap();
        session.step_next(&mut host).unwrap();
        assert_eq!(session.last_category(), Some(MatchCategory::ContentEffect));

        let layer: NodeHandle = host.find_node("Wear").unwrap();
        host.set_node_name(&layer, "Wear Base").unwrap();
        session.pump(&mut host);
        assert_eq!(session.last_category(), Some(MatchCategory::ContentEffect));
    }
}
