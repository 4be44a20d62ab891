use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::events::AppEvent;
use crate::llm::OpenAiClient;
use crate::prompts::ResourceUrls;
use crate::store::ConversationStore;
use crate::tui::{self, EventHandler};
use crate::ui::conversation::{ConversationAction, ConversationManager};
use anyhow::Result;
use std::time::Duration;
use tracing::{debug, info};

const TICK_RATE: Duration = Duration::from_millis(300);

/// Build the client from `config`, seed the conversation and run the chat
/// until the user quits.
pub async fn run(config: Config) -> Result<()> {
    let credentials = config.credentials()?;
    let prompt = config
        .prompt_template()?
        .render(&ResourceUrls::from_origin(&config.origin));

    let store = ConversationStore::shared();
    let endpoint = OpenAiClient::new(config.base_url.clone(), credentials);
    let dispatcher = Dispatcher::new(store.clone(), endpoint, config.models.clone(), prompt);
    let mut manager = ConversationManager::new(dispatcher, config.ui.picker_columns);

    let mut events = EventHandler::new(TICK_RATE);
    let redraw = events.sender();
    let subscription = store.lock().subscribe(move |event| {
        let _ = redraw.send(AppEvent::Redraw(event.clone()));
    });

    info!(
        base_url = %config.base_url,
        primary = %config.models.primary,
        fast = %config.models.fast,
        "starting chat"
    );
    manager.dispatcher().spawn_bootstrap();

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = async {
        loop {
            terminal.draw(|frame| manager.render(frame.size(), frame.buffer_mut()))?;

            let Some(event) = events.next().await else {
                break;
            };
            match event {
                AppEvent::Key(key) => {
                    if manager.handle_key(key) == ConversationAction::Exit {
                        break;
                    }
                }
                AppEvent::Paste(text) => manager.handle_paste(&text),
                AppEvent::Redraw(change) => debug!(?change, "store changed"),
                AppEvent::Resize(..) | AppEvent::Tick => {}
            }
        }
        Ok::<_, anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    store.lock().unsubscribe(subscription);
    info!(messages = store.lock().messages().len(), "chat closed");
    result
}
