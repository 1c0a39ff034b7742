//! Application state management.

use cb_dashboard::{
    companies, ActiveCallBoard, ApiGuide, CallFeed, GatewayClient, HistoryFilter, HistoryStats,
    ProbePreset, RequestLog, Session,
};
use chrono::{DateTime, Local, Utc};
use crossterm::event::KeyCode;
use shared_types::Recording;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Active tab/view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    ActiveCalls,
    History,
    Requests,
    Guide,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::ActiveCalls, Tab::History, Tab::Requests, Tab::Guide];

    pub fn name(&self) -> &'static str {
        match self {
            Tab::ActiveCalls => "Active Calls",
            Tab::History => "Call History",
            Tab::Requests => "Requests",
            Tab::Guide => "API Guide",
        }
    }

    pub fn hotkey(&self) -> char {
        match self {
            Tab::ActiveCalls => 'a',
            Tab::History => 'h',
            Tab::Requests => 'r',
            Tab::Guide => 'g',
        }
    }
}

/// Whether keystrokes edit the history search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// Work the main loop has to do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Refresh,
    Probe(ProbePreset),
}

/// Application state holding all dashboard data.
pub struct App {
    feed: Box<dyn CallFeed>,
    client: GatewayClient,
    session: Option<Session>,

    /// Current active tab.
    pub active_tab: Tab,
    pub input_mode: InputMode,

    /// Active calls, ticked once a second.
    pub board: Arc<ActiveCallBoard>,
    /// Last recordings snapshot from the feed.
    pub recordings: Vec<Recording>,
    pub filter: HistoryFilter,

    pub log: RequestLog,
    pub guide: ApiGuide,

    pub calls_selected: usize,
    pub history_selected: usize,
    pub requests_selected: usize,
    pub guide_selected: usize,

    /// Whether the app should quit.
    pub should_quit: bool,
    /// Last data refresh time.
    pub last_refresh: Instant,
    /// Whether the last refresh reached the feed.
    pub connected: bool,
    /// Last error message.
    pub last_error: Option<String>,
}

impl App {
    /// Create a new application instance.
    pub fn new(feed: Box<dyn CallFeed>, client: GatewayClient, session: Option<Session>) -> Self {
        let guide = ApiGuide::new(client.base_url());
        Self {
            feed,
            client,
            session,
            active_tab: Tab::ActiveCalls,
            input_mode: InputMode::Normal,
            board: Arc::new(ActiveCallBoard::new()),
            recordings: Vec::new(),
            filter: HistoryFilter::default(),
            log: RequestLog::new(),
            guide,
            calls_selected: 0,
            history_selected: 0,
            requests_selected: 0,
            guide_selected: 0,
            should_quit: false,
            last_refresh: Instant::now(),
            connected: false,
            last_error: None,
        }
    }

    pub fn feed_label(&self) -> String {
        self.feed.describe()
    }

    pub fn username(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user().username.as_str())
    }

    /// Pull calls and recordings from the feed.
    pub async fn refresh(&mut self) {
        self.last_error = None;
        let (calls, recordings) = tokio::join!(self.feed.active_calls(), self.feed.recordings());

        match calls {
            Ok(calls) => {
                self.board.replace(calls);
                self.board.tick(Utc::now());
                self.connected = true;
            }
            Err(e) => {
                warn!(error = %e, "Failed to load active calls");
                self.connected = false;
                self.last_error = Some(format!("Calls: {}", e));
            }
        }

        match recordings {
            Ok(recordings) => self.recordings = recordings,
            Err(e) => {
                warn!(error = %e, "Failed to load call history");
                self.last_error = Some(format!("History: {}", e));
            }
        }

        self.clamp_selections();
        self.last_refresh = Instant::now();
    }

    /// Send a canned request and log the outcome.
    pub async fn fire(&mut self, preset: ProbePreset) {
        let request = preset.request();
        let outcome = match &self.session {
            Some(session) => session.probe(&request).await,
            None => self.client.probe(&request, None).await,
        };
        info!(
            method = %outcome.method,
            endpoint = %outcome.endpoint,
            status = outcome.status,
            "Request sent"
        );
        self.log.record(outcome);
        self.requests_selected = 0;
    }

    pub fn filtered_recordings(&self) -> Vec<Recording> {
        self.filtered_recordings_at(&Local::now())
    }

    pub fn filtered_recordings_at(&self, now: &DateTime<Local>) -> Vec<Recording> {
        self.filter.apply(&self.recordings, now)
    }

    pub fn history_stats(&self) -> HistoryStats {
        HistoryStats::from_recordings(&self.recordings)
    }

    pub fn since_refresh(&self) -> Duration {
        self.last_refresh.elapsed()
    }

    /// Hand the session back for logout.
    pub fn take_session(&mut self) -> Option<Session> {
        self.session.take()
    }

    /// Handle key press events.
    pub fn on_key(&mut self, key: KeyCode) -> Action {
        if self.input_mode == InputMode::Search {
            self.on_search_key(key);
            return Action::None;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('R') => return Action::Refresh,
            // Tab navigation
            KeyCode::Char('a') => self.active_tab = Tab::ActiveCalls,
            KeyCode::Char('h') => self.active_tab = Tab::History,
            KeyCode::Char('r') => self.active_tab = Tab::Requests,
            KeyCode::Char('g') => self.active_tab = Tab::Guide,
            KeyCode::Tab => self.active_tab = self.next_tab(),
            // History filters
            KeyCode::Char('/') => {
                self.active_tab = Tab::History;
                self.input_mode = InputMode::Search;
            }
            KeyCode::Char('s') => {
                self.filter.status = self.filter.status.next();
                self.history_selected = 0;
            }
            KeyCode::Char('c') => {
                self.filter.company = self.filter.company.next(&companies(&self.recordings));
                self.history_selected = 0;
            }
            KeyCode::Char('d') => {
                self.filter.date = self.filter.date.next();
                self.history_selected = 0;
            }
            KeyCode::Char('e') if self.active_tab == Tab::ActiveCalls => self.end_selected_call(),
            // Request presets
            KeyCode::Char('1') => return self.probe(ProbePreset::TelephoneCallback),
            KeyCode::Char('2') => return self.probe(ProbePreset::VerificationCall),
            KeyCode::Char('3') => return self.probe(ProbePreset::FreeForm),
            // List navigation
            KeyCode::Up | KeyCode::Char('k') => {
                let selected = self.selected_mut();
                *selected = selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.list_len().saturating_sub(1);
                let selected = self.selected_mut();
                if *selected < max {
                    *selected += 1;
                }
            }
            _ => {}
        }
        Action::None
    }

    fn on_search_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => self.filter.search.push(c),
            KeyCode::Backspace => {
                self.filter.search.pop();
            }
            KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
            _ => {}
        }
        self.history_selected = 0;
    }

    fn probe(&mut self, preset: ProbePreset) -> Action {
        self.active_tab = Tab::Requests;
        Action::Probe(preset)
    }

    fn end_selected_call(&mut self) {
        let calls = self.board.calls();
        if let Some(call) = calls.get(self.calls_selected) {
            if self.board.end_call(&call.id) {
                info!(call_id = %call.id, client = %call.client_name, "Call ended by operator");
            }
        }
        self.clamp_selections();
    }

    fn next_tab(&self) -> Tab {
        let index = Tab::ALL
            .iter()
            .position(|t| *t == self.active_tab)
            .unwrap_or(0);
        Tab::ALL[(index + 1) % Tab::ALL.len()]
    }

    fn list_len(&self) -> usize {
        match self.active_tab {
            Tab::ActiveCalls => self.board.len(),
            Tab::History => self.filtered_recordings().len(),
            Tab::Requests => self.log.len(),
            Tab::Guide => self.guide.examples().len(),
        }
    }

    fn selected_mut(&mut self) -> &mut usize {
        match self.active_tab {
            Tab::ActiveCalls => &mut self.calls_selected,
            Tab::History => &mut self.history_selected,
            Tab::Requests => &mut self.requests_selected,
            Tab::Guide => &mut self.guide_selected,
        }
    }

    fn clamp_selections(&mut self) {
        let calls_max = self.board.len().saturating_sub(1);
        self.calls_selected = self.calls_selected.min(calls_max);
        let history_max = self.filtered_recordings().len().saturating_sub(1);
        self.history_selected = self.history_selected.min(history_max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cb_dashboard::{
        ClientConfig, CompanyFilter, DateFilter, MockFeed, StatusFilter, DEFAULT_BASE_URL,
    };
    use shared_types::RecordingStatus;

    fn app() -> App {
        let client = GatewayClient::new(&ClientConfig::new(DEFAULT_BASE_URL)).unwrap();
        App::new(Box::new(MockFeed::new()), client, None)
    }

    async fn loaded_app() -> App {
        let mut app = app();
        app.refresh().await;
        app
    }

    #[test]
    fn test_tab_keys() {
        let mut app = app();
        for tab in Tab::ALL {
            assert_eq!(app.on_key(KeyCode::Char(tab.hotkey())), Action::None);
            assert_eq!(app.active_tab, tab);
        }
        app.on_key(KeyCode::Tab);
        assert_eq!(app.active_tab, Tab::ActiveCalls);
    }

    #[test]
    fn test_quit_and_refresh() {
        let mut app = app();
        assert_eq!(app.on_key(KeyCode::Char('R')), Action::Refresh);
        assert!(!app.should_quit);
        app.on_key(KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_refresh_loads_mock_feed() {
        let app = loaded_app().await;
        assert!(app.connected);
        assert_eq!(app.board.len(), 3);
        assert_eq!(app.recordings.len(), 5);
        assert!(app.board.calls().iter().all(|c| c.duration.is_some()));
    }

    #[tokio::test]
    async fn test_search_mode_edits_filter() {
        let mut app = loaded_app().await;
        app.on_key(KeyCode::Char('/'));
        assert_eq!(app.active_tab, Tab::History);
        assert_eq!(app.input_mode, InputMode::Search);

        for c in "wilson".chars() {
            app.on_key(KeyCode::Char(c));
        }
        // 'q' is text while searching
        app.on_key(KeyCode::Char('q'));
        app.on_key(KeyCode::Backspace);
        app.on_key(KeyCode::Enter);

        assert!(!app.should_quit);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.filter.search, "wilson");
        let found = app.filtered_recordings();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "rec_4");
    }

    #[tokio::test]
    async fn test_filter_cycling_keys() {
        let mut app = loaded_app().await;
        app.on_key(KeyCode::Char('s'));
        assert_eq!(
            app.filter.status,
            StatusFilter::Only(RecordingStatus::Available)
        );
        app.on_key(KeyCode::Char('c'));
        assert_eq!(app.filter.company, CompanyFilter::Only("C123456789".into()));
        app.on_key(KeyCode::Char('d'));
        assert_eq!(app.filter.date, DateFilter::Today);

        let ids: Vec<String> = app
            .filter
            .apply(&app.recordings, &Utc::now())
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_end_selected_call() {
        let mut app = loaded_app().await;
        app.on_key(KeyCode::Down);
        app.on_key(KeyCode::Down);
        app.on_key(KeyCode::Down);
        assert_eq!(app.calls_selected, 2);

        app.on_key(KeyCode::Char('e'));
        assert_eq!(app.board.len(), 2);
        assert_eq!(app.calls_selected, 1);
        assert!(app.board.calls().iter().all(|c| c.id != "3"));

        app.refresh().await;
        assert_eq!(app.board.len(), 2);
    }

    #[test]
    fn test_preset_keys_switch_to_requests() {
        let mut app = app();
        assert_eq!(
            app.on_key(KeyCode::Char('2')),
            Action::Probe(ProbePreset::VerificationCall)
        );
        assert_eq!(app.active_tab, Tab::Requests);
    }

    #[test]
    fn test_no_session_without_login() {
        let mut app = app();
        assert!(app.username().is_none());
        assert!(app.take_session().is_none());
        assert_eq!(app.feed_label(), "mock data");
    }
}
