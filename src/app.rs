use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, warn};

use crate::commands::Command;
use crate::navigator::cache::Resolution;
use crate::navigator::{Effect, Navigator};
use crate::provider::Inventory;
use crate::tui::{Event, Tui};
use crate::ui::Screen;

const FRAME_RATE: f64 = 30.0;
const TICK_RATE: f64 = 8.0;

/// Results posted back into the main loop by background commands.
#[derive(Debug)]
pub enum AppMessage {
    /// A refresh finished. `generation` identifies which refresh.
    InventoryLoaded {
        generation: u64,
        inventory: Inventory,
    },
    InventoryFailed {
        generation: u64,
        error: String,
    },
    SecretResolved(Resolution),
    Copied {
        label: String,
    },
    CopyFailed {
        label: String,
        error: String,
    },
}

pub struct App {
    navigator: Navigator,
    screen: Screen,
    should_quit: bool,
    message_tx: UnboundedSender<AppMessage>,
    message_rx: UnboundedReceiver<AppMessage>,
}

impl App {
    pub fn new(navigator: Navigator, screen: Screen) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        Self {
            navigator,
            screen,
            should_quit: false,
            message_tx,
            message_rx,
        }
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = Tui::new(FRAME_RATE, TICK_RATE)?;
        tui.enter()?;

        let effect = self.navigator.init();
        self.perform(effect);

        loop {
            self.handle_events(&mut tui).await?;
            self.handle_messages();
            if self.should_quit {
                break;
            }
        }

        tui.exit()?;
        Ok(())
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        let Some(event) = tui.next_event().await else {
            self.should_quit = true;
            return Ok(());
        };

        match event {
            Event::Quit => self.should_quit = true,
            Event::Tick => self.screen.tick(),
            Event::Render => self.render(tui)?,
            Event::Resize(width, height) => {
                tui.resize(Rect::new(0, 0, width, height))?;
                self.render(tui)?;
            }
            Event::Key(key) => {
                let effect = self.navigator.handle_key(key);
                self.perform(effect);
            }
            Event::Error(err) => warn!(%err, "Terminal event error"),
            Event::Init => {}
        }
        Ok(())
    }

    fn handle_messages(&mut self) {
        while let Ok(message) = self.message_rx.try_recv() {
            debug!(?message, "Handling message");
            let effect = self.navigator.apply(message);
            self.perform(effect);
        }
    }

    fn perform(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Quit => self.should_quit = true,
            Effect::Run(commands) => {
                for command in commands {
                    self.spawn(command);
                }
            }
        }
    }

    fn spawn(&self, command: Box<dyn Command>) {
        let name = command.name();
        let tx = self.message_tx.clone();
        debug!(command = %name, "Spawning command");
        tokio::spawn(async move {
            if let Err(err) = command.execute(tx).await {
                error!(command = %name, %err, "Command failed");
            }
        });
    }

    fn render(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        let table = self.navigator.frame();
        let screen = &mut self.screen;
        tui.draw(|frame| screen.render(frame, &table))?;
        Ok(())
    }
}
