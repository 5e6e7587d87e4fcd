//! heaplot - Interactive TUI browser for heap dumps.
//!
//! Usage:
//!   heaplot heap.dump                 # parse a raw dump and browse it
//!   heaplot heap.hlsnap               # open a previously exported archive
//!   heaplot heap.dump -e heap.hlsnap  # export an archive and exit

use tikv_jemallocator::Jemalloc;
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Releases unused memory back to the operating system.
/// Uses jemalloc's arena purge to reduce RSS after memory-intensive operations.
fn release_memory_to_os() {
    // SAFETY: mallctl is called with a valid null-terminated command and no
    // in/out buffers. arena.0.purge returns unused pages to the OS.
    unsafe {
        tikv_jemalloc_sys::mallctl(
            c"arena.0.purge".as_ptr().cast(),
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            0,
        );
    }
}

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use heaplot::graph::ObjectGraph;
use heaplot::query::SnapshotQuery;
use heaplot::storage::{self, Archive};
use heaplot::loader;
use heaplot::tui::App;

/// Redraw interval for the TUI.
const TICK_RATE: Duration = Duration::from_millis(250);

/// Interactive heap dump browser.
#[derive(Parser)]
#[command(name = "heaplot", about = "Heap dump browser", version)]
struct Args {
    /// Heap dump or exported archive to open.
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Export the parsed snapshot as a compressed archive and exit.
    #[arg(short, long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("heaplot={}", level).parse().expect("valid directive"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let archive = match storage::is_archive(&args.file) {
        Ok(true) => match storage::read_archive(&args.file) {
            Ok(archive) => archive,
            Err(e) => {
                eprintln!("Error reading archive '{}': {}", args.file.display(), e);
                std::process::exit(1);
            }
        },
        Ok(false) => match loader::load_path(&args.file) {
            Ok((snapshot, interner)) => Archive { interner, snapshot },
            Err(e) => {
                eprintln!("Error parsing dump '{}': {}", args.file.display(), e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error opening '{}': {}", args.file.display(), e);
            std::process::exit(1);
        }
    };

    if let Some(ref export_path) = args.export {
        if let Err(e) = storage::write_archive(export_path, &archive) {
            eprintln!("Error writing archive '{}': {}", export_path.display(), e);
            std::process::exit(1);
        }
        return;
    }

    let title = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());

    info!(
        "Loaded {}: {} objects, {} roots",
        title,
        archive.snapshot.object_count(),
        archive.snapshot.root_count()
    );

    let graph = ObjectGraph::new(archive.snapshot, archive.interner);
    let query = SnapshotQuery::new(graph);
    // Parsing leaves large transient buffers behind; drop them before the
    // long-lived interactive session.
    release_memory_to_os();

    let app = App::new(query, title);
    if let Err(e) = app.run(TICK_RATE) {
        eprintln!("Error running TUI: {}", e);
        std::process::exit(1);
    }
}
