// Dendro — interactive tree diagram host.
// Loads a flat record file, builds the hierarchy, and drives the session
// from a line-based command loop with a plain-text render backend.

mod backend;
mod data;
mod settings;

use std::error::Error;
use std::io::{self, BufRead, Write};

use dendro_core::{DataSource, Size, Vec2};
use dendro_session::TreeSession;

use backend::TextBackend;
use data::{JsonFileSource, LoggingInvoker};

const VIEWPORT_SIZE: Size = Size {
    width: 1024.0,
    height: 768.0,
};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let path = match std::env::args().nth(1) {
        Some(p) => p,
        None => {
            eprintln!("usage: dendro <records.json>");
            std::process::exit(2);
        }
    };

    let config = settings::load_settings().to_config();
    let mut source = JsonFileSource::new(path.as_str());
    let mut session =
        TreeSession::fetch(config, TextBackend::new(), &mut source, &path, VIEWPORT_SIZE)?;
    let mut invoker = LoggingInvoker;

    session.backend().print_outline();

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            continue;
        };

        match command {
            "show" => session.backend().print_outline(),
            "click" => with_id(args, |id| {
                session.click(id, &mut invoker);
                session.backend().print_outline();
            }),
            "toggle" => with_id(args, |id| {
                if !session.toggle(id) {
                    println!("nothing to toggle at {}", id);
                }
                session.backend().print_outline();
            }),
            "expand-all" => {
                if !session.expand_all() {
                    println!("expand/collapse all is disabled");
                }
                session.backend().print_outline();
            }
            "collapse-all" => {
                if !session.collapse_all() {
                    println!("expand/collapse all is disabled");
                }
                session.backend().print_outline();
            }
            "zoom" => match parse_f32(args.first()) {
                Some(scale) => {
                    let focal = Vec2::new(VIEWPORT_SIZE.width / 2.0, VIEWPORT_SIZE.height / 2.0);
                    session.zoom(scale, focal);
                    println!("scale {:.2}", session.viewport().scale);
                }
                None => println!("usage: zoom <scale>"),
            },
            "pan" => match (parse_f32(args.first()), parse_f32(args.get(1))) {
                (Some(dx), Some(dy)) => session.pan(Vec2::new(dx, dy)),
                _ => println!("usage: pan <dx> <dy>"),
            },
            "center" => with_id(args, |id| session.center_on(id)),
            "drag" => match (args.first(), args.get(1)) {
                (Some(&id), Some(&target)) => {
                    drag(&mut session, id, target);
                    session.backend().print_outline();
                }
                _ => println!("usage: drag <id> <target>"),
            },
            "changes" => {
                let changes = session.pending_changes();
                if changes.is_empty() {
                    println!("no pending changes");
                }
                for change in changes {
                    println!(
                        "{}: {} -> {}",
                        change.node_id, change.old_parent_id, change.new_parent_id
                    );
                }
            }
            "save" => match session.save(&mut invoker) {
                Ok(changes) => println!("saved {} change(s)", changes.len()),
                Err(e) => println!("save failed: {}", e),
            },
            "settings" => {
                settings::save_settings(&settings::DendroSettings::from_config(session.config()));
                println!("settings written");
            }
            "reload" => {
                let records = source.fetch_records(&path)?;
                session.reload(&records)?;
                session.backend().print_outline();
            }
            "quit" | "exit" => break,
            "help" => print_help(),
            other => println!("unknown command {:?} (try: help)", other),
        }
    }

    Ok(())
}

/// One whole drag gesture: start, hover the target, commit.
fn drag(session: &mut TreeSession<TextBackend>, id: &str, target: &str) {
    if !session.drag_start(id) {
        println!("cannot drag {}", id);
        return;
    }
    session.drag_move(
        Vec2::new(0.0, 0.0),
        Vec2::new(VIEWPORT_SIZE.width / 2.0, VIEWPORT_SIZE.height / 2.0),
    );
    if !session.drag_over(target) {
        println!("{} is not a valid drop target for {}", target, id);
        session.drag_end();
        return;
    }
    if session.drag_end() {
        println!("{} moved under {}", id, target);
    }
}

fn with_id(args: &[&str], mut action: impl FnMut(&str)) {
    match args.first() {
        Some(&id) => action(id),
        None => println!("expected a node id"),
    }
}

fn parse_f32(arg: Option<&&str>) -> Option<f32> {
    arg.and_then(|s| s.parse().ok())
}

fn print_help() {
    println!("commands:");
    println!("  show                 print the current tree");
    println!("  click <id>           click a node (action or toggle)");
    println!("  toggle <id>          expand or collapse a node");
    println!("  expand-all           expand the whole tree");
    println!("  collapse-all         collapse everything below the root");
    println!("  zoom <scale>         zoom about the viewport center");
    println!("  pan <dx> <dy>        pan the viewport");
    println!("  center <id>          center the viewport on a node");
    println!("  drag <id> <target>   move a node under a new parent");
    println!("  changes              list unsaved parent changes");
    println!("  save                 persist parent changes");
    println!("  settings             write the active configuration to disk");
    println!("  reload               re-fetch the record file");
    println!("  quit                 exit");
}
