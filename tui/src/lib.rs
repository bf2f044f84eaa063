use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

mod app;
mod ui;

use app::{Action, App, WorkerEvent};
use arxcon_agent::{BuildEvent, Consultant, ConsultantContext};

type Backend = CrosstermBackend<io::Stdout>;

pub async fn run_tui(config_path: Option<&Path>) -> Result<()> {
    let (ctx, startup_error) = match ConsultantContext::from_env(config_path) {
        Ok(ctx) => (Some(Arc::new(ctx)), None),
        Err(e) => {
            warn!("unable to create consultant context: {:#}", e);
            (None, Some(format!("Unable to start: {:#}", e)))
        }
    };

    let mut app = App::new(ctx.is_some());
    if let Some(msg) = startup_error {
        app.bot(msg);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = event_loop(&mut terminal, &mut app, ctx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

async fn event_loop(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    ctx: Option<Arc<ConsultantContext>>,
) -> Result<()> {
    let (tx, mut rx) = unbounded_channel::<WorkerEvent>();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;
        drain(&mut rx, app);

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.on_key(key) {
            Action::None | Action::Reset => {}
            Action::Quit => break,
            Action::Build { query, max_papers } => match &ctx {
                Some(ctx) => spawn_build(ctx.clone(), query, max_papers, tx.clone()),
                None => debug!("build requested without a context"),
            },
            Action::Send(message) => {
                if let Some(consultant) = app.consultant.clone() {
                    spawn_chat(consultant, message, tx.clone());
                }
            }
        }
    }
    Ok(())
}

fn drain(rx: &mut UnboundedReceiver<WorkerEvent>, app: &mut App) {
    while let Ok(event) = rx.try_recv() {
        app.on_worker(event);
    }
}

fn spawn_build(
    ctx: Arc<ConsultantContext>,
    query: String,
    max_papers: usize,
    tx: UnboundedSender<WorkerEvent>,
) {
    tokio::spawn(async move {
        let persist = ctx.config.core.persist_papers;
        let events = tx.clone();
        let on_event = move |event: BuildEvent| {
            let _ = events.send(WorkerEvent::Build(event));
        };
        let res = Consultant::build(&ctx, &query, max_papers, persist, &on_event)
            .await
            .map(Arc::new)
            .map_err(|e| format!("{:#}", e));
        let _ = tx.send(WorkerEvent::Built(res));
    });
}

fn spawn_chat(consultant: Arc<Consultant>, message: String, tx: UnboundedSender<WorkerEvent>) {
    tokio::spawn(async move {
        let res = consultant
            .chat(&message)
            .await
            .map_err(|e| format!("{:#}", e));
        let _ = tx.send(WorkerEvent::Reply(res));
    });
}
