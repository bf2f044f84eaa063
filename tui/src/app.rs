use arxcon_agent::{BuildEvent, Consultant};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;

pub const WELCOME: &str = "Welcome to Arxiv Consultant! Please set the search query and the count of relevant papers to retrieve";
pub const INVALID_SETTINGS: &str = "Provide valid search query and max papers count!";
pub const DEFAULT_MAX_PAPERS: &str = "10";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    MaxPapers,
    Query,
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatLine {
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Busy {
    Idle,
    Building,
    Chatting,
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Quit,
    Build { query: String, max_papers: usize },
    Send(String),
    Reset,
}

/// Results coming back from background tasks
pub enum WorkerEvent {
    Build(BuildEvent),
    Built(Result<Arc<Consultant>, String>),
    Reply(Result<String, String>),
}

pub struct App {
    pub max_papers: String,
    pub query: String,
    pub message: String,
    pub focus: Focus,
    pub transcript: Vec<ChatLine>,
    pub busy: Busy,
    pub consultant: Option<Arc<Consultant>>,
    /// Whether an API context could be created at startup
    pub has_context: bool,
    /// Rows scrolled up from the bottom of the transcript
    pub scroll_back: u16,
}

impl App {
    pub fn new(has_context: bool) -> App {
        App {
            max_papers: DEFAULT_MAX_PAPERS.to_string(),
            query: String::new(),
            message: String::new(),
            focus: Focus::MaxPapers,
            transcript: vec![ChatLine {
                role: Role::Bot,
                text: WELCOME.to_string(),
            }],
            busy: Busy::Idle,
            consultant: None,
            has_context,
            scroll_back: 0,
        }
    }

    pub fn bot(&mut self, text: impl Into<String>) {
        self.transcript.push(ChatLine {
            role: Role::Bot,
            text: text.into(),
        });
        self.scroll_back = 0;
    }

    fn user(&mut self, text: impl Into<String>) {
        self.transcript.push(ChatLine {
            role: Role::User,
            text: text.into(),
        });
        self.scroll_back = 0;
    }

    pub fn can_chat(&self) -> bool {
        self.busy == Busy::Idle && self.consultant.is_some()
    }

    pub fn can_reset(&self) -> bool {
        self.busy == Busy::Idle && self.has_context
    }

    /// Settings are editable until a consultant has been built
    pub fn can_set(&self) -> bool {
        self.busy == Busy::Idle && self.consultant.is_none() && self.has_context
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Char('c') if ctrl => return Action::Quit,
            KeyCode::Char('r') if ctrl => {
                if self.can_reset() {
                    self.reset();
                    return Action::Reset;
                }
                return Action::None;
            }
            KeyCode::Tab => {
                self.next_focus();
                return Action::None;
            }
            KeyCode::PageUp => {
                self.scroll_back = self.scroll_back.saturating_add(5);
                return Action::None;
            }
            KeyCode::PageDown => {
                self.scroll_back = self.scroll_back.saturating_sub(5);
                return Action::None;
            }
            _ => {}
        }

        if self.busy != Busy::Idle {
            return Action::None;
        }

        match (self.focus, key.code) {
            (Focus::MaxPapers | Focus::Query, KeyCode::Enter) => self.try_set(),
            (Focus::Message, KeyCode::Enter) => self.try_send(),
            (_, KeyCode::Backspace) => {
                if let Some(field) = self.focused_field() {
                    field.pop();
                }
                Action::None
            }
            (Focus::MaxPapers, KeyCode::Char(c)) if !c.is_ascii_digit() => Action::None,
            (_, KeyCode::Char(c)) => {
                if let Some(field) = self.focused_field() {
                    field.push(c);
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    fn focused_field(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::MaxPapers if self.can_set() => Some(&mut self.max_papers),
            Focus::Query if self.can_set() => Some(&mut self.query),
            Focus::Message if self.can_chat() => Some(&mut self.message),
            _ => None,
        }
    }

    fn next_focus(&mut self) {
        self.focus = match self.focus {
            Focus::MaxPapers => Focus::Query,
            Focus::Query if self.consultant.is_some() => Focus::Message,
            Focus::Query => Focus::MaxPapers,
            Focus::Message => Focus::MaxPapers,
        };
    }

    fn try_set(&mut self) -> Action {
        if !self.can_set() {
            return Action::None;
        }
        let query = self.query.trim().to_string();
        let max_papers = self.max_papers.trim().parse::<usize>().unwrap_or(0);
        if query.is_empty() || max_papers == 0 {
            self.bot(INVALID_SETTINGS);
            return Action::None;
        }
        self.bot(format!(
            "Building Tools for the setting: Max papers = {}, Search Query = {}",
            max_papers, query
        ));
        self.bot("Please wait, this might take a few minutes");
        self.busy = Busy::Building;
        Action::Build { query, max_papers }
    }

    fn try_send(&mut self) -> Action {
        if !self.can_chat() {
            return Action::None;
        }
        let message = self.message.trim().to_string();
        if message.is_empty() {
            return Action::None;
        }
        self.message.clear();
        self.user(message.clone());
        self.busy = Busy::Chatting;
        Action::Send(message)
    }

    pub fn reset(&mut self) {
        let has_context = self.has_context;
        *self = App::new(has_context);
    }

    pub fn on_worker(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Build(BuildEvent::Building { .. }) => {}
            WorkerEvent::Build(e) => self.bot(e.to_string()),
            WorkerEvent::Built(Ok(consultant)) => {
                let mut listing = String::from("Papers I have knowledge on");
                for title in consultant.papers() {
                    listing.push_str(&format!("\n> {}", title));
                }
                self.bot(listing);
                self.bot("Ask me anything about these papers.");
                self.consultant = Some(consultant);
                self.focus = Focus::Message;
                self.busy = Busy::Idle;
            }
            WorkerEvent::Built(Err(e)) => {
                self.bot(format!("> Not able to download any paper: {}", e));
                self.bot("> Retry using a different search term.");
                self.busy = Busy::Idle;
            }
            WorkerEvent::Reply(Ok(answer)) => {
                self.bot(answer);
                self.busy = Busy::Idle;
            }
            WorkerEvent::Reply(Err(e)) => {
                self.bot(format!("Error: {}. Please try again.", e));
                self.busy = Busy::Idle;
            }
        }
    }

    /// Key bindings and current activity, for the status bar
    pub fn status_line(&self) -> String {
        let activity = match self.busy {
            Busy::Idle if self.consultant.is_some() => "Ready",
            Busy::Idle => "Idle",
            Busy::Building => "Building agents...",
            Busy::Chatting => "Agent is thinking...",
        };
        format!(
            "{} | Enter: set/send  Tab: next field  PgUp/PgDn: scroll  Ctrl-R: reset  Esc: quit",
            activity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.on_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn starts_with_welcome() {
        let app = App::new(true);
        assert_eq!(app.transcript.len(), 1);
        assert_eq!(app.transcript[0].text, WELCOME);
        assert_eq!(app.max_papers, "10");
    }

    #[test]
    fn set_requires_query_and_count() {
        let mut app = App::new(true);
        assert_eq!(app.on_key(key(KeyCode::Enter)), Action::None);
        assert_eq!(app.transcript.last().unwrap().text, INVALID_SETTINGS);

        app.on_key(key(KeyCode::Tab));
        type_text(&mut app, "graph neural networks");
        assert_eq!(
            app.on_key(key(KeyCode::Enter)),
            Action::Build {
                query: "graph neural networks".to_string(),
                max_papers: 10
            }
        );
        assert_eq!(app.busy, Busy::Building);
    }

    #[test]
    fn set_announces_the_settings() {
        let mut app = App::new(true);
        app.query = "robots".to_string();
        app.on_key(key(KeyCode::Enter));
        let texts: Vec<&str> = app.transcript.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(
            texts[texts.len() - 2..],
            [
                "Building Tools for the setting: Max papers = 10, Search Query = robots",
                "Please wait, this might take a few minutes",
            ]
        );
    }

    #[test]
    fn zero_papers_is_rejected() {
        let mut app = App::new(true);
        app.on_key(key(KeyCode::Backspace));
        app.on_key(key(KeyCode::Backspace));
        type_text(&mut app, "0x");
        assert_eq!(app.max_papers, "0");
        app.query = "robots".to_string();
        assert_eq!(app.on_key(key(KeyCode::Enter)), Action::None);
        assert_eq!(app.transcript.last().unwrap().text, INVALID_SETTINGS);
    }

    #[test]
    fn input_ignored_while_building() {
        let mut app = App::new(true);
        app.query = "robots".to_string();
        app.on_key(key(KeyCode::Enter));
        type_text(&mut app, "5");
        assert_eq!(app.max_papers, "10");
        assert_eq!(app.on_key(key(KeyCode::Enter)), Action::None);
    }

    #[test]
    fn failed_build_allows_retry() {
        let mut app = App::new(true);
        app.query = "robots".to_string();
        app.on_key(key(KeyCode::Enter));
        app.on_worker(WorkerEvent::Built(Err("no results".to_string())));
        assert_eq!(app.busy, Busy::Idle);
        assert_eq!(
            app.transcript.last().unwrap().text,
            "> Retry using a different search term."
        );
        assert!(matches!(app.on_key(key(KeyCode::Enter)), Action::Build { .. }));
    }

    #[test]
    fn progress_events_are_shown() {
        let mut app = App::new(true);
        app.on_worker(WorkerEvent::Build(BuildEvent::Fetched { count: 3 }));
        assert_eq!(
            app.transcript.last().unwrap().text,
            "> Successfully fetched 3 papers"
        );
    }

    #[test]
    fn reset_needs_context_and_idle() {
        let mut app = App::new(false);
        let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(app.on_key(ctrl_r), Action::None);

        let mut app = App::new(true);
        app.query = "robots".to_string();
        app.bot("noise");
        assert_eq!(app.on_key(ctrl_r), Action::Reset);
        assert!(app.query.is_empty());
        assert_eq!(app.transcript.len(), 1);

        app.query = "robots".to_string();
        app.on_key(key(KeyCode::Enter));
        assert_eq!(app.on_key(ctrl_r), Action::None);
    }

    #[test]
    fn chat_needs_consultant() {
        let mut app = App::new(true);
        app.focus = Focus::Message;
        type_text(&mut app, "hello");
        assert!(app.message.is_empty());
        assert_eq!(app.on_key(key(KeyCode::Enter)), Action::None);
    }

    #[test]
    fn quit_keys() {
        let mut app = App::new(true);
        assert_eq!(app.on_key(key(KeyCode::Esc)), Action::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.on_key(ctrl_c), Action::Quit);
    }
}
