use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use cutline_core::dispatch::{dispatch_invoke, LocalDispatcher};
use cutline_core::hooks::RefreshHooks;
use cutline_core::scheduler::readiness;
use cutline_core::store::ProjectStore;
use cutline_core::transport::{project_state_payload, Transport, PROJECT_STATE_METHOD};
use cutline_types::{ClipDraft, ProjectSummary, TrackDraft};

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("cutline")
        .join("cutline.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = File::create(&log_path).unwrap_or_else(|_| {
        File::create("/tmp/cutline.log").expect("Cannot create log file")
    });

    WriteLogger::init(log_level, Config::default(), log_file)
        .expect("Failed to initialize logger");

    log::info!("cutline starting (log level: {:?})", log_level);
}

/// Prints every outbound call. State snapshots are summarized.
struct StdoutTransport;

impl Transport for StdoutTransport {
    fn invoke(&self, method: &str, args: Vec<Value>) -> Option<Value> {
        if method == PROJECT_STATE_METHOD {
            let state = project_state_payload(&args);
            println!("[Timeline State] {}", ProjectSummary::from_payload(&state));
            return Some(state);
        }
        println!("[Timeline Event] {} -> {}", method, Value::Array(args));
        None
    }
}

struct LoggingHooks;

impl RefreshHooks for LoggingHooks {
    fn sort_items(&self) {
        log::debug!(target: "store", "sort items");
    }

    fn resize_timeline(&self, duration: f64) {
        log::debug!(target: "store", "resize timeline to {}", duration);
    }

    fn rebuild_index(&self) {
        log::debug!(target: "store", "rebuild index");
    }
}

/// One line of stdin: `{"method": "addClip", "args": [...]}`.
#[derive(Deserialize)]
struct Command {
    method: String,
    #[serde(default)]
    args: Vec<Value>,
}

fn populate_demo(store: &mut ProjectStore) -> Result<(), String> {
    let track: TrackDraft = serde_json::from_value(json!({
        "id": "L1",
        "number": 1,
        "label": "Demo Track",
        "y": 0,
        "lock": false,
        "color": "#d9d9d9",
    }))
    .map_err(|e| e.to_string())?;

    let clip: ClipDraft = serde_json::from_value(json!({
        "id": "clip-demo",
        "layer": 1,
        "image": "./media/images/thumbnail.png",
        "locked": false,
        "duration": 5.0,
        "start": 0.0,
        "end": 5.0,
        "position": 2.0,
        "title": "Demo Clip",
        "effects": [],
        "images": {"start": 1, "end": 1},
        "show_audio": false,
        "alpha": {"Points": []},
        "location_x": {"Points": []},
        "location_y": {"Points": []},
        "scale_x": {"Points": []},
        "scale_y": {"Points": []},
        "rotation": {"Points": []},
        "time": {"Points": []},
        "volume": {"Points": []},
        "reader": {"has_video": true, "has_audio": false},
        "color": "#5b8def",
        "text_color": "#ffffff",
    }))
    .map_err(|e| e.to_string())?;

    store.batch(|s| {
        s.add_track(track);
        s.add_clip(clip);
    });
    Ok(())
}

fn handle_line(store: &mut ProjectStore, line: &str) -> Result<(), String> {
    let command: Command = serde_json::from_str(line).map_err(|e| format!("bad command: {}", e))?;
    match command.method.as_str() {
        "collectTimelineInfo" => {
            let info = store.collect_timeline_info();
            let text = serde_json::to_string(&info).map_err(|e| e.to_string())?;
            println!("{}", text);
        }
        "emitProjectState" => {
            store.emit_project_state();
        }
        method => {
            let mut dispatcher = LocalDispatcher::new(store);
            let outcome = dispatch_invoke(&mut dispatcher, method, &command.args)?;
            if !outcome.applied() {
                eprintln!("{} dropped: timeline not ready", method);
            }
        }
    }
    Ok(())
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    let demo = args.iter().any(|a| a == "--demo");
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1));
    init_logging(verbose);

    let mut config = cutline_core::config::Config::load();
    if let Some(path) = config_path {
        config.merge_file(Path::new(path));
    }

    let (signal, gate) = readiness();
    let mut store = ProjectStore::new(&config, gate, Arc::new(LoggingHooks))
        .with_transport(Box::new(StdoutTransport));
    signal.mark_ready();

    if demo {
        if let Err(e) = populate_demo(&mut store) {
            log::error!("demo population failed: {}", e);
        }
        store.emit_project_state();
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Err(e) = handle_line(&mut store, line) {
            log::warn!(target: "dispatch", "{}", e);
            eprintln!("error: {}", e);
        }
        io::stdout().flush()?;
    }

    store.flush_index();
    Ok(())
}
