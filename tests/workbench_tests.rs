//! Integration tests for the workbench against the in-memory bridge.
//!
//! Tests cover: tab lifecycle, split and close, focus moves, project
//! isolation, failure handling, status events and workspace restore.

use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use termdeck::bridge::MockPtyBridge;
use termdeck::emulator::{CellMetrics, ContainerSize, TerminalEmulator};
use termdeck::layout::{PaneId, SplitDirection, TOTAL_WEIGHT};
use termdeck::session::{SessionId, SessionStatus};
use termdeck::settings::TerminalSettings;
use termdeck::workbench::{Workbench, WorkbenchError};

type TestBench = Workbench<MockPtyBridge>;

async fn open(project: &str) -> (Arc<MockPtyBridge>, TestBench) {
    let bridge = Arc::new(MockPtyBridge::new());
    let workbench = Workbench::open(Arc::clone(&bridge), project, TerminalSettings::default())
        .await
        .expect("open workbench");
    (bridge, workbench)
}

fn cells(cols: u16, rows: u16) -> ContainerSize {
    ContainerSize::from_cells(
        cols,
        rows,
        CellMetrics::from_settings(&TerminalSettings::default()),
    )
}

fn names(workbench: &TestBench) -> Vec<String> {
    workbench.sessions().map(|s| s.name.clone()).collect()
}

fn pane_sessions(workbench: &TestBench) -> Vec<SessionId> {
    workbench
        .layout()
        .map(|l| l.panes().iter().map(|p| p.terminal_id.clone()).collect())
        .unwrap_or_default()
}

fn lines_of(workbench: &TestBench, pane: PaneId) -> Vec<String> {
    workbench
        .adapter(pane)
        .expect("adapter")
        .emulator()
        .lock()
        .lines()
}

// ============================================================================
// Tabs
// ============================================================================

#[tokio::test]
async fn test_open_seeds_default_session_and_pane() {
    let (_bridge, workbench) = open("/proj").await;

    assert_eq!(names(&workbench), vec!["Terminal 1"]);
    let layout = workbench.layout().expect("layout");
    assert_eq!(layout.direction(), SplitDirection::None);
    assert_eq!(layout.len(), 1);
    assert_eq!(layout.panes()[0].size, TOTAL_WEIGHT);
    assert_eq!(workbench.focused_pane(), Some(layout.panes()[0].id));
    assert_eq!(workbench.adapter_count(), 1);
}

#[tokio::test]
async fn test_create_session_is_active() {
    let (_bridge, mut workbench) = open("/proj").await;
    let first = workbench.active_terminal().cloned().expect("active");

    let id = workbench.create_session(Some("X")).await.expect("create");

    let session = workbench.registry().get(&id).expect("session");
    assert_eq!(session.name, "X");
    assert_eq!(session.status, SessionStatus::Active);
    assert_eq!(workbench.active_terminal(), Some(&id));
    assert_eq!(
        workbench.registry().get(&first).map(|s| s.status),
        Some(SessionStatus::Idle)
    );
}

#[tokio::test]
async fn test_default_names_count_up() {
    let (_bridge, mut workbench) = open("/proj").await;
    workbench.create_session(None).await.expect("create");
    workbench.create_session(None).await.expect("create");

    assert_eq!(names(&workbench), vec!["Terminal 1", "Terminal 2", "Terminal 3"]);
}

#[tokio::test]
async fn test_lone_pane_follows_new_tab() {
    let (bridge, mut workbench) = open("/proj").await;
    let pane = workbench.focused_pane().expect("pane");
    let first = workbench.active_terminal().cloned().expect("active");

    let second = workbench.create_session(None).await.expect("create");

    assert_eq!(pane_sessions(&workbench), vec![second.clone()]);
    assert_eq!(workbench.focused_pane(), Some(pane));
    assert_eq!(workbench.adapter(pane).map(|a| a.session()), Some(&second));

    // Output of the tab no longer shown never reaches the pane.
    bridge.emit_data(&first, b"stale");
    bridge.emit_data(&second, b"fresh");
    let lines = lines_of(&workbench, pane);
    assert!(lines.iter().any(|l| l.contains("fresh")));
    assert!(!lines.iter().any(|l| l.contains("stale")));
    assert_eq!(bridge.data_listener_count(), 1);
}

#[tokio::test]
async fn test_close_only_session_replaces_it() {
    let (bridge, mut workbench) = open("/proj").await;
    let only = workbench.active_terminal().cloned().expect("active");

    workbench.close_session(&only).await.expect("close");

    assert!(bridge.killed(&only));
    assert_eq!(names(&workbench), vec!["Terminal 1"]);
    let replacement = workbench.active_terminal().cloned().expect("active");
    assert_ne!(replacement, only);
    assert_eq!(pane_sessions(&workbench), vec![replacement]);
}

#[tokio::test]
async fn test_close_inactive_keeps_active() {
    let (_bridge, mut workbench) = open("/proj").await;
    let first = workbench.active_terminal().cloned().expect("active");
    let second = workbench.create_session(None).await.expect("create");

    workbench.close_session(&first).await.expect("close");

    assert_eq!(workbench.active_terminal(), Some(&second));
    assert_eq!(workbench.registry().len(), 1);
}

#[tokio::test]
async fn test_close_active_moves_to_survivor() {
    let (_bridge, mut workbench) = open("/proj").await;
    let first = workbench.active_terminal().cloned().expect("active");
    let second = workbench.create_session(None).await.expect("create");
    let third = workbench.create_session(None).await.expect("create");

    workbench.set_active_session(&second);
    workbench.close_session(&second).await.expect("close");

    assert_eq!(workbench.active_terminal(), Some(&third));

    workbench.close_session(&third).await.expect("close");
    assert_eq!(workbench.active_terminal(), Some(&first));
}

#[tokio::test]
async fn test_unknown_ids_are_ignored() {
    let (bridge, mut workbench) = open("/proj").await;
    let active = workbench.active_terminal().cloned().expect("active");
    let ghost = SessionId::new("nonexistent-id");
    let before = names(&workbench);

    workbench.set_active_session(&ghost);
    workbench.rename_session(&ghost, "X");
    workbench.set_status(&ghost, SessionStatus::Busy);
    workbench.close_session(&ghost).await.expect("close");
    workbench.update_pane_terminal(PaneId::new(999), &active);
    workbench.close_pane(PaneId::new(999)).await.expect("close pane");

    assert_eq!(workbench.active_terminal(), Some(&active));
    assert_eq!(names(&workbench), before);
    assert!(!bridge.killed(&ghost));
    assert_eq!(workbench.layout().map(|l| l.len()), Some(1));
}

#[tokio::test]
async fn test_rename_is_verbatim() {
    let (_bridge, mut workbench) = open("/proj").await;
    let id = workbench.active_terminal().cloned().expect("active");

    workbench.rename_session(&id, "  build ☕ ");

    assert_eq!(names(&workbench), vec!["  build ☕ "]);
}

#[tokio::test]
async fn test_set_status_round_trips() {
    let (_bridge, mut workbench) = open("/proj").await;
    let id = workbench.active_terminal().cloned().expect("active");

    for status in [SessionStatus::Idle, SessionStatus::Active, SessionStatus::Busy] {
        workbench.set_status(&id, status);
        assert_eq!(workbench.registry().get(&id).map(|s| s.status), Some(status));
    }
}

#[tokio::test]
async fn test_tab_navigation() {
    let (_bridge, mut workbench) = open("/proj").await;
    let first = workbench.active_terminal().cloned().expect("active");
    workbench.create_session(None).await.expect("create");
    let third = workbench.create_session(None).await.expect("create");

    workbench.next_session();
    assert_eq!(workbench.active_terminal(), Some(&first));

    workbench.prev_session();
    assert_eq!(workbench.active_terminal(), Some(&third));

    workbench.select_session(0);
    assert_eq!(workbench.active_terminal(), Some(&first));
    assert_eq!(workbench.session_at(2).map(|s| &s.id), Some(&third));
    assert!(workbench.session_at(3).is_none());

    // Out of range keeps the active tab.
    workbench.select_session(8);
    assert_eq!(workbench.active_terminal(), Some(&first));

    let tabs = workbench.tab_info();
    assert_eq!(tabs.len(), 3);
    assert!(tabs[0].is_active);
    assert!(!tabs[2].is_active);
}

// ============================================================================
// Panes
// ============================================================================

#[tokio::test]
async fn test_split_scenario() {
    let (bridge, mut workbench) = open("/proj").await;
    let first_pane = workbench.focused_pane().expect("pane");

    let new_pane = workbench.split(SplitDirection::Horizontal).await.expect("split");

    let layout = workbench.layout().expect("layout");
    assert_eq!(layout.direction(), SplitDirection::Horizontal);
    assert_eq!(layout.len(), 2);
    assert_eq!(layout.panes()[0].id, first_pane);
    assert_eq!(layout.panes()[1].id, new_pane);
    for pane in layout.panes() {
        assert!(workbench.registry().contains(&pane.terminal_id));
        assert!((pane.size - TOTAL_WEIGHT / 2.0).abs() < 0.01);
    }
    assert_ne!(layout.panes()[0].terminal_id, layout.panes()[1].terminal_id);
    assert_eq!(workbench.focused_pane(), Some(new_pane));
    assert_eq!(workbench.adapter_count(), 2);
    assert_eq!(bridge.live_count(), 2);
}

#[tokio::test]
async fn test_split_keeps_established_direction() {
    let (_bridge, mut workbench) = open("/proj").await;
    workbench.split(SplitDirection::Vertical).await.expect("split");
    workbench.split(SplitDirection::Horizontal).await.expect("split");

    let layout = workbench.layout().expect("layout");
    assert_eq!(layout.direction(), SplitDirection::Vertical);
    assert_eq!(layout.len(), 3);
    let total: f32 = layout.panes().iter().map(|p| p.size).sum();
    assert!((total - TOTAL_WEIGHT).abs() < 0.01);
}

#[tokio::test]
async fn test_close_active_tab_follows_focus_in_split() {
    let (_bridge, mut workbench) = open("/proj").await;
    let first = workbench.active_terminal().cloned().expect("active");
    let first_pane = workbench.focused_pane().expect("pane");
    let second_pane = workbench.split(SplitDirection::Horizontal).await.expect("split");
    let second = workbench.active_terminal().cloned().expect("active");
    workbench.split(SplitDirection::Horizontal).await.expect("split");

    // Panes show [second, first, third]; tabs stay [first, second, third].
    workbench.update_pane_terminal(first_pane, &second);
    workbench.update_pane_terminal(second_pane, &first);
    workbench.set_focused_pane(first_pane);
    assert_eq!(workbench.active_terminal(), Some(&second));

    workbench.close_session(&second).await.expect("close");

    assert_eq!(workbench.focused_pane(), Some(second_pane));
    assert_eq!(workbench.active_terminal(), Some(&first));
    assert_eq!(workbench.focused_session(), workbench.active_terminal());
}

#[tokio::test]
async fn test_close_down_scenario() {
    let (bridge, mut workbench) = open("/proj").await;
    let first_pane = workbench.focused_pane().expect("pane");
    let first = workbench.active_terminal().cloned().expect("active");
    let new_pane = workbench.split(SplitDirection::Horizontal).await.expect("split");
    let second = workbench.active_terminal().cloned().expect("active");

    workbench.close_pane(new_pane).await.expect("close");

    let layout = workbench.layout().expect("layout");
    assert_eq!(layout.direction(), SplitDirection::None);
    assert_eq!(layout.len(), 1);
    assert_eq!(layout.panes()[0].id, first_pane);
    assert_eq!(layout.panes()[0].size, TOTAL_WEIGHT);
    assert_eq!(workbench.focused_pane(), Some(first_pane));
    assert_eq!(workbench.active_terminal(), Some(&first));
    assert!(bridge.killed(&second));
    assert!(workbench.registry().get(&second).is_none());
    assert_eq!(workbench.adapter_count(), 1);
}

#[tokio::test]
async fn test_close_unfocused_pane_keeps_focus() {
    let (_bridge, mut workbench) = open("/proj").await;
    let first_pane = workbench.focused_pane().expect("pane");
    let second_pane = workbench.split(SplitDirection::Horizontal).await.expect("split");
    let third_pane = workbench.split(SplitDirection::Horizontal).await.expect("split");

    workbench.set_focused_pane(first_pane);
    workbench.close_pane(second_pane).await.expect("close");

    assert_eq!(workbench.focused_pane(), Some(first_pane));
    let ids: Vec<PaneId> = workbench
        .layout()
        .expect("layout")
        .panes()
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![first_pane, third_pane]);
}

#[tokio::test]
async fn test_close_focused_pane_moves_to_adjacent() {
    let (_bridge, mut workbench) = open("/proj").await;
    let first_pane = workbench.focused_pane().expect("pane");
    let second_pane = workbench.split(SplitDirection::Horizontal).await.expect("split");
    let third_pane = workbench.split(SplitDirection::Horizontal).await.expect("split");

    // The pane that slides into the closed slot takes focus.
    workbench.set_focused_pane(second_pane);
    workbench.close_pane(second_pane).await.expect("close");
    assert_eq!(workbench.focused_pane(), Some(third_pane));

    // Past the end, the new last pane does.
    workbench.close_pane(third_pane).await.expect("close");
    assert_eq!(workbench.focused_pane(), Some(first_pane));
}

#[tokio::test]
async fn test_close_last_pane_reseeds() {
    let (_bridge, mut workbench) = open("/proj").await;
    let pane = workbench.focused_pane().expect("pane");

    workbench.close_pane(pane).await.expect("close");

    assert_eq!(names(&workbench), vec!["Terminal 1"]);
    let layout = workbench.layout().expect("layout");
    assert_eq!(layout.len(), 1);
    assert_ne!(layout.panes()[0].id, pane);
    assert_eq!(workbench.focused_pane(), Some(layout.panes()[0].id));
}

#[tokio::test]
async fn test_closing_tab_closes_its_panes() {
    let (bridge, mut workbench) = open("/proj").await;
    let first_pane = workbench.focused_pane().expect("pane");
    workbench.split(SplitDirection::Vertical).await.expect("split");
    let second = workbench.active_terminal().cloned().expect("active");

    workbench.close_session(&second).await.expect("close");

    let layout = workbench.layout().expect("layout");
    assert_eq!(layout.len(), 1);
    assert_eq!(layout.panes()[0].id, first_pane);
    assert_eq!(workbench.focused_pane(), Some(first_pane));
    assert_eq!(bridge.data_listener_count(), 1);
}

#[tokio::test]
async fn test_update_pane_terminal_keeps_id_and_size() {
    let (_bridge, mut workbench) = open("/proj").await;
    let first = workbench.active_terminal().cloned().expect("active");
    let pane = workbench.split(SplitDirection::Horizontal).await.expect("split");
    workbench.resize_panes(0, 10.0);
    let size = workbench.layout().and_then(|l| l.get(pane)).map(|p| p.size);

    workbench.update_pane_terminal(pane, &first);

    let updated = workbench.layout().and_then(|l| l.get(pane)).cloned().expect("pane");
    assert_eq!(updated.terminal_id, first);
    assert_eq!(Some(updated.size), size);
    assert_eq!(workbench.adapter(pane).map(|a| a.session()), Some(&first));
}

#[tokio::test]
async fn test_show_active_in_focused() {
    let (_bridge, mut workbench) = open("/proj").await;
    let first = workbench.active_terminal().cloned().expect("active");
    let pane = workbench.split(SplitDirection::Horizontal).await.expect("split");

    workbench.select_session(0);
    assert_eq!(workbench.active_terminal(), Some(&first));
    // Selecting a tab shown in a pane focuses that pane.
    assert_ne!(workbench.focused_pane(), Some(pane));

    workbench.set_focused_pane(pane);
    workbench.create_session(Some("extra")).await.expect("create");
    let extra = workbench.active_terminal().cloned().expect("active");
    assert!(!pane_sessions(&workbench).contains(&extra));

    workbench.show_active_in_focused();
    assert_eq!(
        workbench.layout().and_then(|l| l.get(pane)).map(|p| p.terminal_id.clone()),
        Some(extra)
    );
}

#[tokio::test]
async fn test_resize_focused_pane() {
    let (_bridge, mut workbench) = open("/proj").await;
    let first_pane = workbench.focused_pane().expect("pane");
    let second_pane = workbench.split(SplitDirection::Horizontal).await.expect("split");

    // The last pane grows by taking from its previous neighbour.
    assert!(workbench.resize_focused_pane(10.0));
    let size_of = |wb: &TestBench, id| wb.layout().and_then(|l| l.get(id)).map(|p| p.size);
    assert_eq!(size_of(&workbench, second_pane), Some(60.0));
    assert_eq!(size_of(&workbench, first_pane), Some(40.0));

    workbench.set_focused_pane(first_pane);
    assert!(workbench.resize_focused_pane(-100.0));
    assert_eq!(size_of(&workbench, first_pane), Some(10.0));
    assert_eq!(size_of(&workbench, second_pane), Some(90.0));
}

#[tokio::test]
async fn test_focus_cycles_and_activates() {
    let (_bridge, mut workbench) = open("/proj").await;
    let first_pane = workbench.focused_pane().expect("pane");
    let first = workbench.active_terminal().cloned().expect("active");
    let second_pane = workbench.split(SplitDirection::Horizontal).await.expect("split");

    workbench.focus_next_pane();
    assert_eq!(workbench.focused_pane(), Some(first_pane));
    assert_eq!(workbench.active_terminal(), Some(&first));

    workbench.focus_prev_pane();
    assert_eq!(workbench.focused_pane(), Some(second_pane));

    workbench.set_focused_pane(PaneId::new(999));
    assert_eq!(workbench.focused_pane(), Some(second_pane));
}

// ============================================================================
// Adapters and input
// ============================================================================

#[tokio::test]
async fn test_fit_resizes_and_output_renders() {
    let (bridge, mut workbench) = open("/proj").await;
    let pane = workbench.focused_pane().expect("pane");
    let id = workbench.active_terminal().cloned().expect("active");

    assert!(workbench.fit_pane(pane, cells(100, 30)));
    assert_eq!(bridge.resizes_for(&id), vec![(100, 30)]);

    bridge.emit_data(&id, b"hello\r\nworld");
    bridge.emit_exit(&id, 3);

    let lines = lines_of(&workbench, pane);
    assert!(lines.iter().any(|l| l == "hello"));
    assert!(lines.iter().any(|l| l == "[process exited with code 3]"));
    // The pane stays open after the process exits.
    assert_eq!(workbench.layout().map(|l| l.len()), Some(1));
}

#[tokio::test]
async fn test_empty_container_suppresses_resize() {
    let (bridge, mut workbench) = open("/proj").await;
    let pane = workbench.focused_pane().expect("pane");
    let id = workbench.active_terminal().cloned().expect("active");

    assert!(!workbench.fit_pane(pane, ContainerSize::new(0.0, 0.0)));
    assert!(bridge.resizes_for(&id).is_empty());
    assert!(!workbench.adapter(pane).expect("adapter").is_ready());
}

#[tokio::test]
async fn test_fit_all_and_input_routing() {
    let (bridge, mut workbench) = open("/proj").await;
    let first_pane = workbench.focused_pane().expect("pane");
    let first = workbench.active_terminal().cloned().expect("active");
    let second_pane = workbench.split(SplitDirection::Horizontal).await.expect("split");
    let second = workbench.active_terminal().cloned().expect("active");

    workbench.fit_all(&[(first_pane, cells(40, 20)), (second_pane, cells(39, 20))]);
    assert_eq!(bridge.resizes_for(&first), vec![(40, 20)]);
    assert_eq!(bridge.resizes_for(&second), vec![(39, 20)]);

    workbench.send_to_focused(b"ls\r");
    workbench.send_input(first_pane, b"pwd\r");
    assert_eq!(bridge.writes_for(&second), b"ls\r");
    assert_eq!(bridge.writes_for(&first), b"pwd\r");
}

#[tokio::test]
async fn test_apply_settings_refits_in_place() {
    let (bridge, mut workbench) = open("/proj").await;
    let pane = workbench.focused_pane().expect("pane");
    let id = workbench.active_terminal().cloned().expect("active");
    workbench.fit_pane(pane, cells(80, 24));
    bridge.emit_data(&id, b"kept");

    let settings = TerminalSettings {
        font_size: 28.0,
        ..TerminalSettings::default()
    };
    workbench.apply_settings(settings.clone());

    assert_eq!(workbench.settings(), &settings);
    // Doubling the font halves the grid for the same container.
    assert_eq!(bridge.resizes_for(&id), vec![(80, 24), (40, 12)]);
    assert!(lines_of(&workbench, pane).iter().any(|l| l == "kept"));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_creation_failure_commits_nothing() {
    let (bridge, mut workbench) = open("/proj").await;
    let before = workbench.layout().cloned();
    let active = workbench.active_terminal().cloned();

    bridge.fail_next_create();
    let result = workbench.create_session(Some("X")).await;
    assert!(matches!(result, Err(WorkbenchError::Creation(_))));

    bridge.fail_next_create();
    let result = workbench.split(SplitDirection::Horizontal).await;
    assert!(matches!(result, Err(WorkbenchError::Creation(_))));

    assert_eq!(names(&workbench), vec!["Terminal 1"]);
    assert_eq!(workbench.layout().cloned(), before);
    assert_eq!(workbench.active_terminal().cloned(), active);
    assert_eq!(workbench.adapter_count(), 1);
}

#[tokio::test]
async fn test_open_failure_is_reported() {
    let bridge = Arc::new(MockPtyBridge::new());
    bridge.fail_next_create();

    let result: Result<TestBench, _> =
        Workbench::open(Arc::clone(&bridge), "/proj", TerminalSettings::default()).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_kill_failure_still_removes() {
    let (bridge, mut workbench) = open("/proj").await;
    let first = workbench.active_terminal().cloned().expect("active");
    workbench.create_session(None).await.expect("create");
    bridge.set_kill_fails(true);

    workbench.close_session(&first).await.expect("close");

    assert!(bridge.killed(&first));
    assert!(workbench.registry().get(&first).is_none());
    assert_eq!(workbench.registry().len(), 1);
}

#[tokio::test]
async fn test_replacement_failure_is_reported() {
    let (bridge, mut workbench) = open("/proj").await;
    let only = workbench.active_terminal().cloned().expect("active");
    bridge.fail_next_create();

    let result = workbench.close_session(&only).await;

    assert!(result.is_err());
    assert!(workbench.registry().is_empty());
    assert!(workbench.visible_panes().is_empty());

    // The next operation recovers.
    workbench.create_session(None).await.expect("create");
    assert_eq!(names(&workbench), vec!["Terminal 1"]);
    assert_eq!(workbench.visible_panes().len(), 1);
}

// ============================================================================
// Status events
// ============================================================================

#[tokio::test]
async fn test_status_events_map_to_registry() {
    let (bridge, mut workbench) = open("/proj").await;
    let first = workbench.active_terminal().cloned().expect("active");
    let second = workbench.create_session(None).await.expect("create");

    bridge.emit_status(&first, true);
    bridge.emit_status(&second, true);
    assert_eq!(workbench.pump_events(), 2);
    assert_eq!(workbench.registry().get(&first).map(|s| s.status), Some(SessionStatus::Busy));
    assert_eq!(workbench.registry().get(&second).map(|s| s.status), Some(SessionStatus::Busy));

    bridge.emit_status(&first, false);
    bridge.emit_status(&second, false);
    bridge.emit_status(&SessionId::new("ghost"), true);
    assert_eq!(workbench.pump_events(), 2);
    assert_eq!(workbench.registry().get(&first).map(|s| s.status), Some(SessionStatus::Idle));
    assert_eq!(workbench.registry().get(&second).map(|s| s.status), Some(SessionStatus::Active));
}

// ============================================================================
// Projects
// ============================================================================

#[tokio::test]
async fn test_project_isolation() {
    let (bridge, mut workbench) = open("/a").await;
    let a_session = workbench.active_terminal().cloned().expect("active");
    workbench.split(SplitDirection::Horizontal).await.expect("split");
    let a_layout = workbench.layout().cloned();

    workbench.switch_project("/b").await.expect("switch");

    assert_eq!(workbench.project(), Path::new("/b"));
    assert_eq!(names(&workbench), vec!["Terminal 1"]);
    assert!(!workbench.registry().contains(&a_session));
    for view in workbench.visible_panes() {
        let session = view.session.expect("session");
        assert_eq!(session.project_path, Path::new("/b"));
    }
    assert_eq!(workbench.layout().map(|l| l.len()), Some(1));
    // Sessions of the project left behind keep running.
    assert!(bridge.is_live(&a_session));
    assert!(!bridge.killed(&a_session));
    assert_eq!(workbench.adapter_count(), 1);

    workbench.switch_project("/a").await.expect("switch");

    assert_eq!(workbench.registry().len(), 2);
    assert_eq!(workbench.layout().cloned(), a_layout);
    assert_eq!(workbench.visible_panes().len(), 2);
    assert_eq!(workbench.adapter_count(), 2);
}

#[tokio::test]
async fn test_switch_to_same_project_is_noop() {
    let (bridge, mut workbench) = open("/a").await;
    let calls = bridge.calls().len();

    workbench.switch_project("/a").await.expect("switch");

    assert_eq!(bridge.calls().len(), calls);
    assert_eq!(workbench.registry().len(), 1);
}

#[tokio::test]
async fn test_switch_restores_focus_per_project() {
    let (_bridge, mut workbench) = open("/a").await;
    let first_pane = workbench.focused_pane().expect("pane");
    workbench.split(SplitDirection::Horizontal).await.expect("split");
    workbench.set_focused_pane(first_pane);

    workbench.switch_project("/b").await.expect("switch");
    assert_ne!(workbench.focused_pane(), Some(first_pane));
    workbench.switch_project("/a").await.expect("switch");

    assert_eq!(workbench.focused_pane(), Some(first_pane));
}

// ============================================================================
// Snapshot and restore
// ============================================================================

#[tokio::test]
async fn test_snapshot_captures_layout() {
    let (_bridge, mut workbench) = open("/proj").await;
    let first_pane = workbench.focused_pane().expect("pane");
    workbench.split(SplitDirection::Vertical).await.expect("split");
    let second = workbench.active_terminal().cloned().expect("active");
    workbench.rename_session(&second, "logs");
    workbench.resize_panes(0, 20.0);
    workbench.set_focused_pane(first_pane);

    let snapshot = workbench.snapshot();

    assert_eq!(snapshot.project_path, Path::new("/proj"));
    assert_eq!(snapshot.direction, SplitDirection::Vertical);
    let saved: Vec<_> = snapshot.sessions.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(saved, vec!["Terminal 1", "logs"]);
    let panes: Vec<_> = snapshot.panes.iter().map(|p| (p.session_index, p.size)).collect();
    assert_eq!(panes, vec![(0, 70.0), (1, 30.0)]);
    assert_eq!(snapshot.focused_pane_index, Some(0));
    assert_eq!(snapshot.active_session_index, Some(0));
}

#[tokio::test]
async fn test_restore_rebuilds_with_new_ids() {
    let (_bridge, mut source) = open("/proj").await;
    source.split(SplitDirection::Horizontal).await.expect("split");
    let second = source.active_terminal().cloned().expect("active");
    source.rename_session(&second, "server");
    source.resize_panes(0, -10.0);
    let snapshot = source.snapshot();

    let bridge = Arc::new(MockPtyBridge::new());
    let mut restored: TestBench =
        Workbench::new(Arc::clone(&bridge), "/elsewhere", TerminalSettings::default());
    restored.restore(&snapshot).await.expect("restore");

    assert_eq!(restored.project(), Path::new("/proj"));
    assert_eq!(names(&restored), vec!["Terminal 1", "server"]);
    assert_eq!(bridge.live_count(), 2);

    let layout = restored.layout().expect("layout");
    assert_eq!(layout.direction(), SplitDirection::Horizontal);
    let sizes: Vec<f32> = layout.panes().iter().map(|p| p.size).collect();
    assert_eq!(sizes, vec![40.0, 60.0]);
    for pane in layout.panes() {
        assert!(restored.registry().contains(&pane.terminal_id));
    }
    assert_eq!(restored.focused_pane(), Some(layout.panes()[1].id));
    assert_eq!(
        restored.registry().active_session().map(|s| s.name.as_str()),
        Some("server")
    );
    assert_eq!(restored.adapter_count(), 2);
    assert_eq!(restored.snapshot().sessions.len(), 2);
}

#[tokio::test]
async fn test_restore_failure_keeps_existing_tabs() {
    let (_bridge, mut source) = open("/proj").await;
    source.split(SplitDirection::Horizontal).await.expect("split");
    let snapshot = source.snapshot();

    let (bridge, mut restored) = open("/proj").await;
    let existing = restored.active_terminal().cloned().expect("active");

    bridge.fail_next_create();
    let result = restored.restore(&snapshot).await;
    assert!(matches!(result, Err(WorkbenchError::Creation(_))));

    assert!(restored.registry().contains(&existing));
    assert_eq!(restored.registry().len(), 1);
    assert_eq!(pane_sessions(&restored), vec![existing]);
    assert_eq!(restored.adapter_count(), 1);
}

#[tokio::test]
async fn test_restore_failure_into_other_project_changes_nothing() {
    let (_bridge, mut source) = open("/b").await;
    source.split(SplitDirection::Vertical).await.expect("split");
    let snapshot = source.snapshot();

    let (bridge, mut workbench) = open("/a").await;
    workbench.split(SplitDirection::Horizontal).await.expect("split");
    let panes_before = pane_sessions(&workbench);
    let focus_before = workbench.focused_pane();
    let live_before = bridge.live_count();

    bridge.fail_next_create();
    let result = workbench.restore(&snapshot).await;

    assert!(matches!(result, Err(WorkbenchError::Creation(_))));
    assert_eq!(workbench.project(), Path::new("/a"));
    assert_eq!(workbench.registry().len(), 2);
    assert!(workbench.active_terminal().is_some());
    assert_eq!(pane_sessions(&workbench), panes_before);
    assert_eq!(workbench.focused_pane(), focus_before);
    assert_eq!(workbench.adapter_count(), 2);
    assert_eq!(bridge.live_count(), live_before);
}

#[tokio::test]
async fn test_partial_restore_keeps_saved_focus() {
    let mut snapshot = termdeck::snapshot::WorkspaceSnapshot::new("/b");
    snapshot.direction = SplitDirection::Horizontal;
    snapshot.sessions = ["one", "two", "three"]
        .iter()
        .enumerate()
        .map(|(i, name)| termdeck::snapshot::SessionEntry {
            id: SessionId::new(format!("old-{i}")),
            name: (*name).to_string(),
        })
        .collect();
    snapshot.panes = [2, 0, 1]
        .iter()
        .map(|&session_index| termdeck::snapshot::PaneEntry {
            session_index,
            size: 100.0 / 3.0,
        })
        .collect();
    // Focus is on the pane showing "one".
    snapshot.focused_pane_index = Some(1);

    let (bridge, mut workbench) = open("/a").await;
    bridge.fail_create_after(2);
    let result = workbench.restore(&snapshot).await;
    assert!(matches!(result, Err(WorkbenchError::Creation(_))));

    assert_eq!(workbench.project(), Path::new("/b"));
    assert_eq!(names(&workbench), vec!["one", "two"]);
    assert_eq!(workbench.layout().map(|l| l.len()), Some(2));
    let focused = workbench.focused_session().expect("focused session");
    let name = workbench.registry().get(focused).map(|s| s.name.clone());
    assert_eq!(name.as_deref(), Some("one"));
}

#[tokio::test]
async fn test_restore_into_other_project_remembers_focus() {
    let (_bridge, source) = open("/b").await;
    let snapshot = source.snapshot();

    let (_bridge, mut workbench) = open("/a").await;
    let first_pane = workbench.focused_pane().expect("pane");
    workbench.split(SplitDirection::Horizontal).await.expect("split");
    workbench.set_focused_pane(first_pane);

    workbench.restore(&snapshot).await.expect("restore");
    assert_eq!(workbench.project(), Path::new("/b"));
    workbench.switch_project("/a").await.expect("switch");

    assert_eq!(workbench.focused_pane(), Some(first_pane));
}

#[tokio::test]
async fn test_restore_empty_snapshot_is_rejected() {
    let bridge = Arc::new(MockPtyBridge::new());
    let mut workbench: TestBench =
        Workbench::new(Arc::clone(&bridge), "/proj", TerminalSettings::default());

    let snapshot = termdeck::snapshot::WorkspaceSnapshot::new("/proj");
    let result = workbench.restore(&snapshot).await;

    assert!(matches!(result, Err(WorkbenchError::NoSessions(_))));
    assert_eq!(bridge.live_count(), 0);
}
