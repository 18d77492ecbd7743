use crate::scene::Scene;

use menuboard_core::error::ERROR_MESSAGE;
use std::any::Any;
use std::io::Write;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    // RUST_LOG=menuboard_core=debug,menuboard_net=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries scenes; logs go to stderr.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .compact()
        .try_init();
}

/// Log panics, then tell the surface to drop whatever menu it is showing.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let payload = panic_message(info.payload());
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "<unknown>".to_string());

        tracing::error!(
            display = env!("CARGO_PKG_NAME"),
            version = env!("CARGO_PKG_VERSION"),
            %location,
            %payload,
            "display panicked"
        );

        let mut out = std::io::stdout();
        let _ = writeln!(out, "{}", crash_scene_line());
        let _ = out.flush();
    }));
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(|s| s.as_str()))
        .unwrap_or("<non-string panic payload>")
}

/// The error scene as one JSON line, for the panic hook.
pub fn crash_scene_line() -> String {
    let scene = Scene::Error {
        message: ERROR_MESSAGE.to_string(),
    };
    serde_json::to_string(&scene)
        .unwrap_or_else(|_| format!(r#"{{"scene":"error","message":"{}"}}"#, ERROR_MESSAGE))
}
