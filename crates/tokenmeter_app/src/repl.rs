use std::io::BufRead;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use meter_logging::meter_warn;
use tokenmeter_core::{update, AppState, AppViewModel, Msg, StatsView};

use crate::attachment;
use crate::effects::EffectRunner;

/// Line-oriented driver: every typed line is an input-change event, commands
/// manage the attachment.
pub fn run() -> anyhow::Result<()> {
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(msg_tx.clone());
    let quit = Arc::new(AtomicBool::new(false));

    spawn_tick(msg_tx.clone(), quit.clone());
    spawn_stdin_reader(msg_tx, quit.clone());

    print_help();

    let mut state = AppState::new();
    while !quit.load(Ordering::Relaxed) {
        let msg = match msg_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(msg) => msg,
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };
        let (next, effects) = update(std::mem::take(&mut state), msg);
        state = next;
        runner.enqueue(effects);
        if state.consume_dirty() {
            render(&state.view());
        }
    }
    Ok(())
}

// Background tick to drain engine events between keystrokes.
fn spawn_tick(msg_tx: mpsc::Sender<Msg>, quit: Arc<AtomicBool>) {
    thread::spawn(move || {
        let interval = Duration::from_millis(75);
        while !quit.load(Ordering::Relaxed) && msg_tx.send(Msg::Tick).is_ok() {
            thread::sleep(interval);
        }
    });
}

fn spawn_stdin_reader(msg_tx: mpsc::Sender<Msg>, quit: Arc<AtomicBool>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    meter_warn!("stdin read failed: {err}");
                    break;
                }
            };
            match parse_line(&line) {
                Command::Quit => break,
                Command::Msg(msg) => {
                    if msg_tx.send(msg).is_err() {
                        break;
                    }
                }
                Command::Ignore => {}
            }
        }
        quit.store(true, Ordering::Relaxed);
    });
}

enum Command {
    Msg(Msg),
    Quit,
    Ignore,
}

fn parse_line(line: &str) -> Command {
    if line == ":quit" {
        return Command::Quit;
    }
    if line == ":clear" {
        return Command::Msg(Msg::AttachmentCleared);
    }
    if let Some(path) = line.strip_prefix(":attach ") {
        return match attachment::select(Path::new(path.trim())) {
            Ok(msg) => Command::Msg(msg),
            Err(err) => {
                eprintln!("cannot attach {path}: {err}");
                Command::Ignore
            }
        };
    }
    Command::Msg(Msg::TextEdited(line.to_string()))
}

fn render(view: &AppViewModel) {
    let stats = StatsView::project(&view.stats);
    if let Some(error) = &stats.error {
        println!("error: {error}");
    }
    let attachment = view.attachment_name.as_deref().unwrap_or("none");
    println!(
        "tokens: {}  chars: {}  attachment: {}",
        stats.tokens, stats.chars, attachment
    );
}

fn print_help() {
    println!("tokenmeter - type text to count tokens");
    println!("  :attach <path>   attach an image or PDF");
    println!("  :clear           remove the attachment");
    println!("  :quit            exit");
}
