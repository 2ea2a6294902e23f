mod app;
mod cli;
mod model;
mod sys;
mod tui;

use anyhow::Result;
use app::App;
use clap::Parser;
use cli::Cli;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use model::Video;
use ratatui::{backend::CrosstermBackend, Terminal};
use ratatui_image::picker::{Picker, ProtocolType};
use std::{
    io,
    time::{Duration, Instant},
};
use sys::config::{self, Config};
use sys::vimeo::VimeoClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::get_config_path);
    let (config, config_error) = match Config::read_from(&config_path) {
        Ok(config) => (config, None),
        Err(e) => {
            eprintln!("{:#}, using defaults", e);
            (Config::default(), Some(e))
        }
    };
    if !config_path.exists() {
        // first run, leave a commented file to edit
        if let Err(e) = config.save_to(&config_path) {
            eprintln!("Could not write default config {}: {}", config_path.display(), e);
        }
    }

    let log_enabled = config.logging.enabled || cli.log;
    if let Err(e) = sys::logging::init_logger(config.log_path(), log_enabled) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::info!("starting loop {}", env!("CARGO_PKG_VERSION"));
    if let Some(e) = config_error {
        log::error!("{:#}, using defaults", e);
    }

    let token = config::resolve_access_token(cli.token.clone());
    if token.is_none() {
        log::warn!("no access token configured, requests will be anonymous");
    }

    let client = VimeoClient::new(
        &config.api_base_url,
        token,
        config.per_page,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    // Setup Terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut picker = Picker::from_query_stdio().unwrap_or_else(|_| Picker::from_fontsize((8, 16)));

    // Explicitly check for Kitty/WezTerm to enable advanced graphics protocol
    let term = std::env::var("TERM").unwrap_or_default();
    let term_program = std::env::var("TERM_PROGRAM").unwrap_or_default();
    if term == "xterm-kitty" || term_program == "WezTerm" {
        picker.set_protocol_type(ProtocolType::Kitty);
    }

    let mut app = App::new(client);
    app.open_explore();
    if let Some(id) = cli.video_id.as_deref().filter(|id| !id.trim().is_empty()) {
        app.open_video(Video {
            uri: format!("/videos/{}", id.trim()),
            ..Default::default()
        });
    }

    let result = run(&mut terminal, &mut app, &mut picker);

    // Restore Terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log::error!("exiting with error: {:#}", e);
    }
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    picker: &mut Picker,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| tui::ui(f, app, picker))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                    app::handlers::handle_key_event(app, key)
                }
                Event::Mouse(mouse) => app::handlers::handle_mouse_event(app, mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app::updates::on_tick(app);
            last_tick = Instant::now();
        }

        if !app.running {
            app.shutdown();
            return Ok(());
        }
    }
}
