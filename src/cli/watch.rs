//! Watch command implementation

use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::config::loader::CliOverrides;
use crate::reload::{ReloadHandle, ReloadServer};
use crate::watch;

/// Run the watch command
pub fn run_watch(port: Option<u16>, verbose: bool) -> ExitCode {
    let overrides = CliOverrides { port, ..CliOverrides::default() };
    let context = match super::load_context(&overrides, verbose) {
        Ok(context) => context,
        Err(code) => return code,
    };

    // Live-reload is best-effort: a port conflict downgrades to a watch
    // session without reload push.
    let reload_port = context.config().reload.port;
    let server = match ReloadServer::bind(reload_port) {
        Ok(server) => {
            println!("Live-reload listening on {}", server.local_addr());
            Some(server)
        }
        Err(e) => {
            eprintln!("Live-reload disabled (could not bind port {}): {}", reload_port, e);
            None
        }
    };
    let reload = server.as_ref().map(ReloadServer::handle).unwrap_or_else(ReloadHandle::disconnected);

    println!("Press Ctrl+C to stop");
    println!();

    let project_root = context.project_root().to_path_buf();
    let watch_globs = context.watch_globs().to_vec();
    let watch_config = context.config().watch.clone();
    let result = watch::watch_styles(&project_root, &watch_globs, &watch_config, |_changed| {
        super::build::styles_iteration(&context, &reload);
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Watch error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
