//! Ring Demo: drives the widget from the keyboard and draws the ring as a gauge.
//!
//! Keyboard:
//! - `p` → toggle processing
//! - `c` → toggle panel content
//! - `r` → replace panel content (same presence, no retarget)
//! - `g` → toggle chat tab
//! - `1`-`5` → toggle a setting from the context menu
//! - `q` / ESC → tear down and exit
//!
//! Mouse: click the ring to toggle the panel, right-click for the menu.
//!
//! Run with `RUST_LOG=debug` to see edges and retargets.

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use halo::{
    AnimationStyle, Fingerprint, MenuEntry, PointerEvent, RenderUpdate, RingBounds,
    SettingToggle, VisualState, WidgetActor, WidgetRequest,
};
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

const RING_X: u16 = 4;
const RING_Y: u16 = 3;
const RING_WIDTH: u16 = 40;
const RING_HEIGHT: u16 = 3;

struct DemoState {
    processing: bool,
    content: Option<u64>,
    next_content: u64,
    chat: bool,
    panel_open: bool,
    menu: Vec<MenuEntry>,
    visual: Option<VisualState>,
    hovering: bool,
    frames: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

    let result = run(&mut stdout);

    execute!(stdout, cursor::Show, DisableMouseCapture, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(stdout: &mut Stdout) -> Result<(), Box<dyn std::error::Error>> {
    let bounds = RingBounds::new(RING_X, RING_Y, RING_WIDTH, RING_HEIGHT);
    let widget = WidgetActor::spawn_default(bounds)?;
    let handle = widget.handle();

    let mut state = DemoState {
        processing: false,
        content: None,
        next_content: 1,
        chat: false,
        panel_open: false,
        menu: Vec::new(),
        visual: None,
        hovering: false,
        frames: 0,
    };
    let started = Instant::now();

    loop {
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('p') => {
                        state.processing = !state.processing;
                        handle.notify_processing(state.processing);
                    }
                    KeyCode::Char('c') => {
                        state.content = if state.content.is_some() {
                            None
                        } else {
                            Some(state.bump_content())
                        };
                        handle.notify_content_identity(state.content.map(Fingerprint::from_hash));
                    }
                    KeyCode::Char('r') if state.content.is_some() => {
                        state.content = Some(state.bump_content());
                        handle.notify_content_identity(state.content.map(Fingerprint::from_hash));
                    }
                    KeyCode::Char('g') => {
                        state.chat = !state.chat;
                        handle.notify_chat_active(state.chat);
                    }
                    KeyCode::Char(c @ '1'..='5') => {
                        let index = c as usize - '1' as usize;
                        handle.activate_menu_item(SettingToggle::ALL[index]);
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    if let Some(pointer) = PointerEvent::from_crossterm(&mouse) {
                        handle.pointer(pointer);
                    }
                }
                _ => {}
            }
        }

        for update in widget.drain_render() {
            match update {
                RenderUpdate::Ring(visual) => {
                    state.visual = Some(visual);
                    state.frames += 1;
                }
                RenderUpdate::Highlight(highlight) => state.hovering = highlight.hovering,
            }
        }
        for request in widget.request_receiver().try_iter() {
            match request {
                WidgetRequest::TogglePanel => state.panel_open = !state.panel_open,
                WidgetRequest::ShowContextMenu(entries) => state.menu = entries,
                WidgetRequest::SettingsChanged(settings) => {
                    log::info!("settings changed: {settings:?}");
                    state.menu = halo::ContextMenu::entries(&settings);
                }
            }
        }

        draw(stdout, &state, widget.active_drivers(), started.elapsed())?;
    }

    let registry = widget.registry().clone();
    widget.join();
    log::info!(
        "widget stopped: {} drivers started, {} live",
        registry.started(),
        registry.active()
    );
    Ok(())
}

impl DemoState {
    fn bump_content(&mut self) -> u64 {
        let id = self.next_content;
        self.next_content += 1;
        id
    }
}

fn draw(
    stdout: &mut Stdout,
    state: &DemoState,
    drivers: usize,
    elapsed: Duration,
) -> io::Result<()> {
    queue!(stdout, Clear(ClearType::All), cursor::MoveTo(2, 1))?;
    queue!(
        stdout,
        Print(format!(
            "Halo ring demo  [{:>6.1}s]  p:processing c:content r:replace g:chat 1-5:settings q:quit",
            elapsed.as_secs_f32()
        ))
    )?;

    let Some(visual) = state.visual else {
        return stdout.flush();
    };

    // Gauge: one row per ring line, filled proportionally to progress
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = (visual.fill_progress * f32::from(RING_WIDTH)).round() as u16;
    let color = if !visual.ring_visible {
        Color::DarkGrey
    } else if visual.style.is_repeating() {
        Color::Magenta
    } else {
        Color::Cyan
    };
    for row in 0..RING_HEIGHT {
        queue!(stdout, cursor::MoveTo(RING_X, RING_Y + row))?;
        queue!(stdout, SetForegroundColor(color))?;
        queue!(stdout, Print("█".repeat(usize::from(filled))))?;
        queue!(stdout, SetForegroundColor(Color::DarkGrey))?;
        queue!(stdout, Print("░".repeat(usize::from(RING_WIDTH - filled.min(RING_WIDTH)))))?;
    }
    queue!(stdout, ResetColor)?;

    let style = match visual.style {
        AnimationStyle::OneShot { duration } => format!("one-shot {duration:?}"),
        AnimationStyle::Repeating { period, .. } => format!("breathing {period:?}"),
    };
    let lines = [
        format!(
            "progress {:.4}  target {:.2}  stroke {:.1}  scale {:.4}",
            visual.fill_progress,
            visual.target,
            visual.stroke_width,
            visual.scale()
        ),
        format!(
            "style {style}  visible {}  hover {}  drivers {drivers}  frames {}",
            visual.ring_visible, state.hovering, state.frames
        ),
        format!(
            "processing {}  content {:?}  chat {}",
            state.processing, state.content, state.chat
        ),
        format!(
            "panel {}",
            if state.panel_open { "OPEN" } else { "closed" }
        ),
    ];
    for (i, line) in lines.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let y = RING_Y + RING_HEIGHT + 1 + i as u16;
        queue!(stdout, cursor::MoveTo(2, y), Print(line))?;
    }

    for (i, entry) in state.menu.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let y = RING_Y + RING_HEIGHT + 6 + i as u16;
        let mark = if entry.checked { "✓" } else { " " };
        queue!(
            stdout,
            cursor::MoveTo(4, y),
            Print(format!("{} [{mark}] {}", i + 1, entry.label))
        )?;
    }

    stdout.flush()
}
