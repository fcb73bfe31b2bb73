use std::io;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as TermEvent, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use calpane::{
    app::{AppState, AuthPrompt, Mode},
    export::{write_csv, ExportFormat},
    input::{filter_mode, insert_mode},
    remote::CalendarService,
    session::OAuthProvider,
    storage::config::Config,
    ui::theme::Theme,
};

use crate::tui::presentation::ui;

fn export_format(config: &Config) -> ExportFormat {
    ExportFormat {
        date_format: config.ui.date_format.clone(),
        time_format: config.ui.time_format.clone(),
    }
}

/// Fetches the remote event list into the store. The fetch is keyed to
/// the session epoch it was issued under; a response for a stale epoch
/// is discarded. Transport failures are logged and otherwise silent.
async fn refresh_events(app: &mut AppState, service: &CalendarService) {
    let Some(epoch) = app.gate.current_epoch() else {
        return;
    };
    let Some(session) = app.gate.session().cloned() else {
        return;
    };

    app.in_flight = true;
    match service.fetch_events(&session).await {
        Ok(items) => {
            if app.gate.is_current(epoch) {
                app.store.apply_fetch(items);
            } else {
                tracing::info!("Discarding fetch response for stale session epoch {}", epoch);
            }
        }
        Err(e) => {
            tracing::error!("Error fetching events: {}", e);
        }
    }
    app.in_flight = false;
}

pub async fn run_tui() -> Result<(), io::Error> {
    let config = Config::load_or_create().map_err(|e| io::Error::other(e.to_string()))?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let theme = Theme::get_by_name(&config.ui.theme);
    let mut app = AppState::new().with_theme(theme);
    let provider = OAuthProvider::new(config.google.clone());
    let service = CalendarService::new();

    // Gate starts in the resolving state; show it before touching the network.
    terminal.draw(|f| ui(f, &app)).ok();

    match provider.resolve_session().await {
        Ok(session) => {
            app.gate.establish(session);
            terminal.draw(|f| ui(f, &app)).ok();
            refresh_events(&mut app, &service).await;
        }
        Err(e) => {
            tracing::info!("No existing session: {}", e);
            app.gate.clear();
        }
    }

    let res = run_app(&mut terminal, &mut app, &provider, &service, &config).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    provider: &OAuthProvider,
    service: &CalendarService,
    config: &Config,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let TermEvent::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if app.gate.session().is_none() {
                if handle_signed_out_keys(key.code, app, provider, service, terminal).await? {
                    return Ok(());
                }
                continue;
            }

            match app.mode {
                Mode::Normal => {
                    if app.show_help {
                        handle_help_keys(key.code, app);
                    } else if handle_normal_keys(key.code, app, provider, service, config, terminal)
                        .await?
                    {
                        return Ok(());
                    }
                }
                Mode::Filter => handle_filter_keys(key.code, app),
                Mode::Insert => {
                    handle_insert_keys(key.code, app, service, terminal).await?;
                }
            }
        }
    }
}

fn handle_help_keys(code: KeyCode, app: &mut AppState) {
    if matches!(code, KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Esc) {
        app.show_help = false;
    }
}

async fn handle_normal_keys<B: ratatui::backend::Backend>(
    code: KeyCode,
    app: &mut AppState,
    provider: &OAuthProvider,
    service: &CalendarService,
    config: &Config,
    terminal: &mut Terminal<B>,
) -> io::Result<bool> {
    match code {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('a') => {
            app.notice = None;
            app.open_event_form();
        }
        KeyCode::Char('e') => {
            match write_csv(
                app.store.filtered(),
                &config.export.directory,
                &export_format(config),
            ) {
                Ok(path) => app.info(format!("Exported to {}", path.display())),
                Err(e) => {
                    tracing::error!("CSV export failed: {}", e);
                    app.alert(format!("Export failed: {}", e));
                }
            }
        }
        KeyCode::Char('f') | KeyCode::Char('/') => {
            app.notice = None;
            app.mode = Mode::Filter;
        }
        KeyCode::Char('r') => {
            terminal.draw(|f| ui(f, app))?;
            refresh_events(app, service).await;
        }
        KeyCode::Char('s') => {
            provider.sign_out();
            app.gate.clear();
            app.store.clear();
            app.notice = None;
            app.auth_prompt = None;
            app.mode = Mode::Normal;
        }
        _ => {}
    }
    Ok(false)
}

fn handle_filter_keys(code: KeyCode, app: &mut AppState) {
    match code {
        KeyCode::Esc | KeyCode::Enter => {
            app.mode = Mode::Normal;
        }
        other => filter_mode::handle_key(other, app),
    }
}

async fn handle_insert_keys<B: ratatui::backend::Backend>(
    code: KeyCode,
    app: &mut AppState,
    service: &CalendarService,
    terminal: &mut Terminal<B>,
) -> io::Result<()> {
    match code {
        KeyCode::Esc => {
            app.close_event_form();
        }
        KeyCode::Enter => {
            submit_event_form(app, service, terminal).await?;
        }
        other => insert_mode::handle_key(other, app),
    }
    Ok(())
}

/// Submits the open form. The submit control is disabled while a create
/// is in flight; on failure the form stays open with the draft intact.
async fn submit_event_form<B: ratatui::backend::Backend>(
    app: &mut AppState,
    service: &CalendarService,
    terminal: &mut Terminal<B>,
) -> io::Result<()> {
    if app.in_flight {
        return Ok(());
    }
    let Some(form) = app.event_form.clone() else {
        return Ok(());
    };
    let Some(session) = app.gate.session().cloned() else {
        return Ok(());
    };

    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(e) => {
            tracing::error!("Rejecting event form input: {}", e);
            app.alert(e.to_string());
            return Ok(());
        }
    };

    app.in_flight = true;
    terminal.draw(|f| ui(f, app))?;

    match service.create_event(&session, &draft).await {
        Ok(()) => {
            app.in_flight = false;
            app.close_event_form();
            app.info("Event created successfully!");
            terminal.draw(|f| ui(f, app))?;
            refresh_events(app, service).await;
        }
        Err(e) => {
            app.in_flight = false;
            tracing::error!("Failed to create event: {}", e);
            app.alert(format!("Failed to create event: {}", e));
        }
    }

    Ok(())
}

async fn handle_signed_out_keys<B: ratatui::backend::Backend>(
    code: KeyCode,
    app: &mut AppState,
    provider: &OAuthProvider,
    service: &CalendarService,
    terminal: &mut Terminal<B>,
) -> io::Result<bool> {
    match code {
        KeyCode::Char('q') if app.auth_prompt.is_none() => return Ok(true),
        KeyCode::Esc => {
            app.auth_prompt = None;
        }
        KeyCode::Enter => {
            let has_code = app
                .auth_prompt
                .as_ref()
                .is_some_and(|prompt| !prompt.code_input.trim().is_empty());
            if app.auth_prompt.is_none() {
                start_sign_in(app, provider);
            } else if has_code {
                complete_sign_in(app, provider, service, terminal).await?;
            }
        }
        KeyCode::Backspace => {
            if let Some(prompt) = app.auth_prompt.as_mut() {
                prompt.code_input.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(prompt) = app.auth_prompt.as_mut() {
                prompt.code_input.push(c);
            }
        }
        _ => {}
    }
    Ok(false)
}

/// Sign-in initiation: build the consent URL and show it. If initiation
/// itself fails the user sees an alert and can simply retry.
fn start_sign_in(app: &mut AppState, provider: &OAuthProvider) {
    match provider.sign_in_url() {
        Ok(url) => {
            app.notice = None;
            app.auth_prompt = Some(AuthPrompt::new(url));
        }
        Err(e) => {
            tracing::error!("Sign-in initiation failed: {}", e);
            app.alert("Error signing in with the Google identity provider");
        }
    }
}

async fn complete_sign_in<B: ratatui::backend::Backend>(
    app: &mut AppState,
    provider: &OAuthProvider,
    service: &CalendarService,
    terminal: &mut Terminal<B>,
) -> io::Result<()> {
    let code = match app.auth_prompt.as_ref() {
        Some(prompt) => prompt.code_input.trim().to_string(),
        None => return Ok(()),
    };

    app.in_flight = true;
    terminal.draw(|f| ui(f, app))?;

    match provider.complete_sign_in(&code).await {
        Ok(session) => {
            app.in_flight = false;
            app.auth_prompt = None;
            app.notice = None;
            app.gate.establish(session);
            terminal.draw(|f| ui(f, app))?;
            refresh_events(app, service).await;
        }
        Err(e) => {
            app.in_flight = false;
            tracing::error!("Sign-in failed: {}", e);
            app.alert(format!("Sign-in failed: {}", e));
            if let Some(prompt) = app.auth_prompt.as_mut() {
                prompt.code_input.clear();
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use calpane::app::Notice;
    use calpane::calendar::Event;
    use calpane::remote::{ApiError, CalendarApi, EventDraft};
    use calpane::storage::config::GoogleConfig;
    use tempfile::TempDir;

    struct PanicApi;

    #[async_trait]
    impl CalendarApi for PanicApi {
        async fn fetch_events(&self, _access_token: &str) -> Result<Vec<Event>, ApiError> {
            panic!("fetch must not be issued");
        }

        async fn create_event(
            &self,
            _access_token: &str,
            _draft: &EventDraft,
            _time_zone: &str,
        ) -> Result<(), ApiError> {
            panic!("create must not be issued");
        }
    }

    fn provider_without_credentials(dir: &TempDir) -> OAuthProvider {
        OAuthProvider::new(GoogleConfig {
            client_id: String::new(),
            client_secret: String::new(),
            token_cache: dir.path().join("token.json"),
            redirect_uri: "http://localhost:8080".to_string(),
        })
    }

    #[test]
    fn failed_sign_in_initiation_alerts_and_sets_no_session() {
        let dir = TempDir::new().unwrap();
        let provider = provider_without_credentials(&dir);
        let mut app = AppState::new();
        app.gate.clear();

        start_sign_in(&mut app, &provider);

        assert!(matches!(app.notice, Some(Notice::Error(_))));
        assert!(app.auth_prompt.is_none());
        assert!(app.gate.session().is_none());
    }

    #[tokio::test]
    async fn no_fetch_is_issued_without_a_session() {
        let service = CalendarService::with_api(Box::new(PanicApi));
        let mut app = AppState::new();
        app.gate.clear();

        refresh_events(&mut app, &service).await;

        assert!(app.store.events().is_empty());
    }

    #[test]
    fn filter_keys_exit_back_to_normal_mode() {
        let mut app = AppState::new();
        app.mode = Mode::Filter;

        handle_filter_keys(KeyCode::Enter, &mut app);

        assert_eq!(app.mode, Mode::Normal);
    }
}
