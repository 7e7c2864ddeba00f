//! Session registry: the authoritative tab list, partitioned by project.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::types::{Session, SessionId, SessionStatus, TabInfo};

/// Prefix for generated session names.
pub const DEFAULT_NAME_PREFIX: &str = "Terminal";

/// Result of removing a session.
#[derive(Debug, Clone)]
pub struct Removal {
    /// The removed session.
    pub session: Session,
    /// Position the session held within its project.
    pub index: usize,
    /// True if the removal left the session's project without sessions.
    pub emptied: bool,
}

/// Registry of all terminal sessions.
///
/// Sessions of every project live here; the registry exposes the ones of the
/// active project. Every mutator treats an unknown id as a no-op and reports
/// it through its return value instead of an error.
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    /// All sessions in creation order.
    sessions: Vec<Session>,
    /// Active session per project.
    active: HashMap<PathBuf, SessionId>,
    /// Per-project creation counter used for default names.
    counters: HashMap<PathBuf, usize>,
    /// Active project.
    project: PathBuf,
}

impl SessionRegistry {
    /// Creates an empty registry scoped to `project`.
    #[must_use]
    pub fn new(project: impl Into<PathBuf>) -> Self {
        Self {
            sessions: Vec::new(),
            active: HashMap::new(),
            counters: HashMap::new(),
            project: project.into(),
        }
    }

    /// Returns the active project.
    #[must_use]
    pub fn project(&self) -> &Path {
        &self.project
    }

    /// Switches the active project. Sessions of other projects are kept.
    pub fn set_project(&mut self, project: impl Into<PathBuf>) {
        self.project = project.into();
    }

    /// Iterates the sessions of the active project in display order.
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions
            .iter()
            .filter(move |s| s.project_path == self.project)
    }

    /// Iterates sessions of every project.
    pub fn all_sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }

    /// Returns the number of sessions in the active project.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions().count()
    }

    /// Returns true if the active project has no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions().next().is_none()
    }

    /// Returns true if the active project has no sessions and a default one
    /// must be synthesized.
    #[must_use]
    pub fn needs_default_session(&self) -> bool {
        self.is_empty()
    }

    /// Looks up a session of any project.
    #[must_use]
    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| &s.id == id)
    }

    /// Returns true if `id` is a session of the active project.
    #[must_use]
    pub fn contains(&self, id: &SessionId) -> bool {
        self.get(id).is_some_and(|s| s.project_path == self.project)
    }

    /// Returns the session at `index` in the active project's display order.
    #[must_use]
    pub fn session_at(&self, index: usize) -> Option<&Session> {
        self.sessions().nth(index)
    }

    /// Returns the display position of `id` within the active project.
    #[must_use]
    pub fn index_of(&self, id: &SessionId) -> Option<usize> {
        self.sessions().position(|s| &s.id == id)
    }

    /// Returns the active session id of the active project.
    #[must_use]
    pub fn active_terminal(&self) -> Option<&SessionId> {
        self.active.get(&self.project)
    }

    /// Returns the active session of the active project.
    #[must_use]
    pub fn active_session(&self) -> Option<&Session> {
        self.active_terminal().and_then(|id| self.get(id))
    }

    /// Returns the name the next unnamed session of the active project gets.
    #[must_use]
    pub fn next_default_name(&self) -> String {
        let created = self.counters.get(&self.project).copied().unwrap_or(0);
        format!("{} {}", DEFAULT_NAME_PREFIX, created + 1)
    }

    /// Appends a freshly created session to the active project.
    ///
    /// The new session becomes active; the previous active session is demoted
    /// to idle unless it is busy. Returns false if the id is already known.
    pub fn insert(&mut self, id: SessionId, name: Option<String>) -> bool {
        if self.get(&id).is_some() {
            debug!("Ignoring duplicate session id {}", id);
            return false;
        }

        let name = name.unwrap_or_else(|| self.next_default_name());
        *self.counters.entry(self.project.clone()).or_insert(0) += 1;

        self.demote_active();
        self.sessions.push(Session {
            id: id.clone(),
            name,
            status: SessionStatus::Active,
            project_path: self.project.clone(),
        });
        self.active.insert(self.project.clone(), id);
        true
    }

    /// Removes a session of any project.
    ///
    /// If the removed session was its project's active session, the
    /// index-adjacent survivor (same position, else the previous one) takes
    /// over. When the project is left empty its name counter restarts.
    pub fn remove(&mut self, id: &SessionId) -> Option<Removal> {
        let Some(pos) = self.sessions.iter().position(|s| &s.id == id) else {
            trace!("remove: unknown session {}", id);
            return None;
        };

        let project = self.sessions[pos].project_path.clone();
        let index = self
            .sessions
            .iter()
            .filter(|s| s.project_path == project)
            .position(|s| &s.id == id)
            .unwrap_or(0);

        let session = self.sessions.remove(pos);
        let was_active = self.active.get(&project) == Some(&session.id);

        let remaining: Vec<SessionId> = self
            .sessions
            .iter()
            .filter(|s| s.project_path == project)
            .map(|s| s.id.clone())
            .collect();

        let emptied = remaining.is_empty();
        if emptied {
            self.active.remove(&project);
            self.counters.remove(&project);
        } else if was_active {
            let next = remaining[index.min(remaining.len() - 1)].clone();
            self.promote(&next);
            self.active.insert(project, next);
        }

        Some(Removal {
            session,
            index,
            emptied,
        })
    }

    /// Makes `id` the active session. Unknown ids and ids of other projects
    /// are ignored. Returns true if the active session changed.
    pub fn set_active(&mut self, id: &SessionId) -> bool {
        if !self.contains(id) {
            trace!("set_active: ignoring unknown session {}", id);
            return false;
        }
        if self.active_terminal() == Some(id) {
            return false;
        }

        self.demote_active();
        self.promote(id);
        self.active.insert(self.project.clone(), id.clone());
        true
    }

    /// Renames a session. The name is stored verbatim.
    pub fn rename(&mut self, id: &SessionId, name: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(session) => {
                session.name = name.into();
                true
            }
            None => {
                trace!("rename: ignoring unknown session {}", id);
                false
            }
        }
    }

    /// Sets a session's status directly.
    pub fn set_status(&mut self, id: &SessionId, status: SessionStatus) -> bool {
        match self.get_mut(id) {
            Some(session) => {
                session.status = status;
                true
            }
            None => {
                trace!("set_status: ignoring unknown session {}", id);
                false
            }
        }
    }

    /// Activates the next (or previous) session of the active project,
    /// wrapping around. Returns the newly active id.
    pub fn cycle(&mut self, forward: bool) -> Option<SessionId> {
        let ids: Vec<SessionId> = self.sessions().map(|s| s.id.clone()).collect();
        if ids.is_empty() {
            return None;
        }

        let current = self
            .active_terminal()
            .and_then(|id| ids.iter().position(|i| i == id))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % ids.len()
        } else if current == 0 {
            ids.len() - 1
        } else {
            current - 1
        };

        let id = ids[next].clone();
        self.set_active(&id);
        Some(id)
    }

    /// Returns tab bar rows for the active project.
    #[must_use]
    pub fn tab_info(&self) -> Vec<TabInfo> {
        let active = self.active_terminal();
        self.sessions()
            .enumerate()
            .map(|(index, s)| TabInfo {
                index,
                id: s.id.clone(),
                name: s.name.clone(),
                status: s.status,
                is_active: Some(&s.id) == active,
            })
            .collect()
    }

    fn get_mut(&mut self, id: &SessionId) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| &s.id == id)
    }

    /// Drops the active project's active session back to idle (busy wins).
    fn demote_active(&mut self) {
        let Some(prev) = self.active.get(&self.project).cloned() else {
            return;
        };
        if let Some(session) = self.get_mut(&prev) {
            if session.status == SessionStatus::Active {
                session.status = SessionStatus::Idle;
            }
        }
    }

    fn promote(&mut self, id: &SessionId) {
        if let Some(session) = self.get_mut(id) {
            if session.status != SessionStatus::Busy {
                session.status = SessionStatus::Active;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(ids: &[&str]) -> SessionRegistry {
        let mut registry = SessionRegistry::new("/proj");
        for id in ids {
            registry.insert(SessionId::from(*id), None);
        }
        registry
    }

    #[test]
    fn test_default_names_count_per_project() {
        let mut registry = registry_with(&["a", "b"]);
        assert_eq!(registry.session_at(0).map(|s| s.name.as_str()), Some("Terminal 1"));
        assert_eq!(registry.session_at(1).map(|s| s.name.as_str()), Some("Terminal 2"));

        registry.set_project("/other");
        assert_eq!(registry.next_default_name(), "Terminal 1");
    }

    #[test]
    fn test_insert_demotes_previous_active() {
        let registry = registry_with(&["a", "b"]);
        assert_eq!(registry.get(&"a".into()).map(|s| s.status), Some(SessionStatus::Idle));
        assert_eq!(registry.get(&"b".into()).map(|s| s.status), Some(SessionStatus::Active));
    }

    #[test]
    fn test_insert_keeps_busy_previous_active() {
        let mut registry = registry_with(&["a"]);
        registry.set_status(&"a".into(), SessionStatus::Busy);
        registry.insert("b".into(), None);
        assert_eq!(registry.get(&"a".into()).map(|s| s.status), Some(SessionStatus::Busy));
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut registry = registry_with(&["a"]);
        assert!(!registry.insert("a".into(), Some("dup".into())));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_active_promotes_adjacent() {
        let mut registry = registry_with(&["a", "b", "c"]);
        registry.set_active(&"b".into());

        let removal = registry.remove(&"b".into()).expect("known id");
        assert_eq!(removal.index, 1);
        assert!(!removal.emptied);
        assert_eq!(registry.active_terminal(), Some(&SessionId::from("c")));
    }

    #[test]
    fn test_remove_last_position_falls_back_to_previous() {
        let mut registry = registry_with(&["a", "b"]);
        registry.remove(&"b".into());
        assert_eq!(registry.active_terminal(), Some(&SessionId::from("a")));
        assert_eq!(registry.active_session().map(|s| s.status), Some(SessionStatus::Active));
    }

    #[test]
    fn test_remove_only_session_resets_counter() {
        let mut registry = registry_with(&["a", "b"]);
        registry.remove(&"a".into());
        let removal = registry.remove(&"b".into()).expect("known id");
        assert!(removal.emptied);
        assert!(registry.needs_default_session());
        assert_eq!(registry.active_terminal(), None);
        assert_eq!(registry.next_default_name(), "Terminal 1");
    }

    #[test]
    fn test_remove_unknown_is_none() {
        let mut registry = registry_with(&["a"]);
        assert!(registry.remove(&"zzz".into()).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_set_active_ignores_other_project() {
        let mut registry = registry_with(&["a"]);
        registry.set_project("/other");
        registry.insert("x".into(), None);
        registry.set_project("/proj");

        assert!(!registry.set_active(&"x".into()));
        assert_eq!(registry.active_terminal(), Some(&SessionId::from("a")));
    }

    #[test]
    fn test_cycle_wraps() {
        let mut registry = registry_with(&["a", "b", "c"]);
        assert_eq!(registry.cycle(true), Some(SessionId::from("a")));
        assert_eq!(registry.cycle(false), Some(SessionId::from("c")));
    }

    #[test]
    fn test_tab_info_marks_active() {
        let registry = registry_with(&["a", "b"]);
        let tabs = registry.tab_info();
        assert_eq!(tabs.len(), 2);
        assert!(!tabs[0].is_active);
        assert!(tabs[1].is_active);
        assert_eq!(tabs[1].name, "Terminal 2");
    }
}
