//! linktext terminal host
//!
//! Loads a page description and runs the extension against it: the
//! controller on the main thread, the page extractor on its own thread, with
//! only channels between them. User gestures are read from stdin:
//!
//! ```text
//! click <id>           click the element with that id
//! menu <id>            right-click it and pick "Copy Link Anchor Text"
//! toggle               click the toolbar icon
//! key <shortcut>       press a keyboard shortcut, e.g. key Alt+Shift+C
//! persistent on|off    change the persistent mode setting
//! quit
//! ```

use anyhow::{bail, Context};
use crossbeam_channel::{select, unbounded, Receiver, Sender};
use linktext::channel::TabRouter;
use linktext::clipboard::{Osc52Copy, SystemClipboard};
use linktext::content::toast::render_toast;
use linktext::content::PageExtractor;
use linktext::controller::menu::{MenuEntry, COPY_LINK_TEXT_ENTRY};
use linktext::controller::{BrowserHost, InstallReason, ModeController};
use linktext::dom::loader::load_page;
use linktext::input::create_keymap;
use linktext::links::closest_anchor;
use linktext::platform::PlatformInfo;
use linktext::protocol::{Message, PageReport, TabId};
use linktext::state::config::{Config, ModeOwnership};
use linktext::state::{FileSettings, SettingsStore};
use log::{debug, error, info};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// The one tab this host simulates
const TAB: TabId = TabId(1);

/// Gestures the host forwards to the page
enum UserInput {
    Click(String),
    /// Right click; replies with the link URL the browser would put in the menu event
    ContextMenu {
        id: String,
        reply: Sender<Option<String>>,
    },
}

/// Host side of the controller's platform APIs
struct TerminalHost {
    settings_path: PathBuf,
}

impl BrowserHost for TerminalHost {
    fn platform_info(&self) -> PlatformInfo {
        PlatformInfo::detect()
    }

    fn open_options_page(&mut self) -> linktext::Result<()> {
        println!("Settings live in {}", self.settings_path.display());
        println!("  persistent on|off   keep copy mode armed after each copy");
        Ok(())
    }

    fn create_context_menu(&mut self, entry: &MenuEntry) -> linktext::Result<()> {
        info!("Context menu entry {:?} ({}) registered", entry.id, entry.title);
        Ok(())
    }

    fn active_tabs(&self) -> Vec<TabId> {
        vec![TAB]
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let debug_mode = args.iter().any(|arg| arg == "--debug" || arg == "-d");

    if debug_mode {
        // Debug mode: write to linktext.log
        use std::fs::OpenOptions;
        match OpenOptions::new().create(true).append(true).open("linktext.log") {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open linktext.log for debug logging: {}", e);
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }
        info!("linktext version {} starting (debug mode)", linktext::VERSION);
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Error)
            .parse_default_env()
            .init();
    }

    if let Err(e) = run() {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args()
        .skip(1)
        .filter(|arg| arg != "--debug" && arg != "-d")
        .collect();
    let Some(page_path) = args.first().map(PathBuf::from) else {
        bail!("usage: {} [--debug] <page.json>", linktext::APP_NAME);
    };

    let config_path = Config::default_path();
    let first_run = !config_path.exists();
    let config = Config::load().context("loading configuration")?;
    let ownership = config.mode_ownership();
    let duration = config.notification_duration();
    let keymap = create_keymap(&config.commands);
    info!("Configuration loaded from {:?} (mode owned by {})", config.path(), ownership.as_str());

    let settings: Arc<dyn SettingsStore> = Arc::new(FileSettings::new(config));
    let router = Arc::new(TabRouter::new());
    let inbox = router.attach(TAB);
    let (report_tx, report_rx) = unbounded::<PageReport>();
    let (input_tx, input_rx) = unbounded::<UserInput>();

    let page_settings = Arc::clone(&settings);
    let page = thread::Builder::new()
        .name("page".into())
        .spawn(move || {
            let reports = (ownership == ModeOwnership::Global).then_some(report_tx);
            run_page(page_path, page_settings, duration, reports, inbox, input_rx)
        })
        .context("spawning page thread")?;

    let mut controller = ModeController::new(
        Box::new(TerminalHost {
            settings_path: config_path,
        }),
        router.clone(),
        ownership,
    )
    .with_keymap(keymap);
    if first_run {
        controller.initialize(InstallReason::Install);
    }
    controller.register_context_action();
    controller.on_startup();
    drain_reports(&mut controller, &report_rx);

    println!("linktext {} ready - type 'quit' to exit", linktext::VERSION);
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("quit"), _) => break,
            (Some("click"), Some(id)) => {
                if input_tx.send(UserInput::Click(id.to_string())).is_err() {
                    break;
                }
            }
            (Some("menu"), Some(id)) => {
                let (reply, link_url) = unbounded();
                if input_tx.send(UserInput::ContextMenu { id: id.to_string(), reply }).is_err() {
                    break;
                }
                let link_url = link_url.recv_timeout(Duration::from_secs(1)).ok().flatten();
                if link_url.is_none() {
                    println!("{} is not inside a link; no context menu entry", id);
                }
                controller.on_context_action_invoked(COPY_LINK_TEXT_ENTRY.id, link_url.as_deref(), Some(TAB));
            }
            (Some("toggle"), _) => controller.on_user_toggle_action(),
            (Some("key"), Some(shortcut)) => {
                if !controller.on_shortcut(shortcut) {
                    println!("{} is not bound", shortcut);
                }
            }
            (Some("persistent"), Some(value)) => {
                settings
                    .set_persistent_mode(value == "on")
                    .context("saving settings")?;
            }
            (None, _) => {}
            _ => println!("unknown command: {}", line.trim()),
        }

        drain_reports(&mut controller, &report_rx);
    }

    drop(input_tx);
    router.detach(TAB);
    match page.join() {
        Ok(result) => result.context("page")?,
        Err(_) => bail!("page thread panicked"),
    }
    Ok(())
}

/// Give the page a moment, then answer anything it asked
fn drain_reports(controller: &mut ModeController, reports: &Receiver<PageReport>) {
    thread::sleep(Duration::from_millis(20));
    while let Ok(report) = reports.try_recv() {
        controller.handle_report(TAB, report);
    }
}

/// Page event loop: controller messages, user gestures, notification expiry
fn run_page(
    path: PathBuf,
    settings: Arc<dyn SettingsStore>,
    duration: Duration,
    reports: Option<Sender<PageReport>>,
    inbox: Receiver<Message>,
    input: Receiver<UserInput>,
) -> linktext::Result<()> {
    let document = load_page(&path)?;
    info!("Loaded page {} with {} links", document.base_url(), document.anchors().len());

    let mut extractor = PageExtractor::new(
        document,
        settings,
        Box::new(SystemClipboard::new()),
        Box::new(Osc52Copy::new(io::stdout())),
    )
    .with_notification_duration(duration);
    if let Some(reports) = reports {
        extractor = extractor.with_controller_mode(reports);
    }

    let cols = std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or(80);

    loop {
        let idle = extractor
            .time_until_next_expiry(Instant::now())
            .unwrap_or(Duration::from_millis(250));
        select! {
            recv(inbox) -> message => match message {
                Ok(message) => extractor.handle_message(message),
                Err(_) => break,
            },
            recv(input) -> gesture => match gesture {
                Ok(gesture) => handle_input(&mut extractor, gesture),
                Err(_) => break,
            },
            default(idle) => {}
        }

        extractor.expire_notifications(Instant::now());
        for text in extractor.take_notifications() {
            eprintln!("{}", render_toast(&text, cols));
        }
    }

    debug!("Page closed");
    Ok(())
}

fn handle_input(extractor: &mut PageExtractor, gesture: UserInput) {
    match gesture {
        UserInput::Click(id) => {
            let Some(target) = extractor.document().get_element_by_id(&id) else {
                eprintln!("no element with id {:?}", id);
                return;
            };
            let before = extractor.document().navigations().len();
            extractor.click(&target);
            if let Some(url) = extractor.document().navigations().get(before) {
                println!("navigated to {}", url);
            }
        }
        UserInput::ContextMenu { id, reply } => {
            let Some(target) = extractor.document().get_element_by_id(&id) else {
                eprintln!("no element with id {:?}", id);
                if reply.send(None).is_err() {
                    debug!("Context menu reply dropped");
                }
                return;
            };
            extractor.context_menu(&target);
            let link_url = closest_anchor(&target)
                .and_then(|a| extractor.document().resolve_href(&a))
                .map(String::from);
            if reply.send(link_url).is_err() {
                debug!("Context menu reply dropped");
            }
        }
    }
}
