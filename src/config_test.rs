use std::sync::{Mutex, MutexGuard};

use super::*;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// # Safety
/// Callers hold `env_lock()` so no other test touches the environment.
unsafe fn clear_flowview_env() {
    unsafe {
        std::env::remove_var("FLOWVIEW_BASE_URL");
        std::env::remove_var("FLOWVIEW_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("FLOWVIEW_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("FLOWVIEW_DEBUGGER");
        std::env::remove_var("FLOWVIEW_SCROLL_SETTLE_MS");
    }
}

#[test]
fn from_env_uses_defaults() {
    let _guard = env_lock();
    unsafe { clear_flowview_env() };

    let cfg = ViewerConfig::from_env().unwrap();
    assert_eq!(cfg, ViewerConfig::default());

    unsafe { clear_flowview_env() };
}

#[test]
fn from_env_parses_overrides() {
    let _guard = env_lock();
    unsafe {
        clear_flowview_env();
        std::env::set_var("FLOWVIEW_BASE_URL", "https://bpm.example.test/app/");
        std::env::set_var("FLOWVIEW_REQUEST_TIMEOUT_SECS", "42");
        std::env::set_var("FLOWVIEW_CONNECT_TIMEOUT_SECS", "7");
        std::env::set_var("FLOWVIEW_DEBUGGER", "TRUE");
        std::env::set_var("FLOWVIEW_SCROLL_SETTLE_MS", "350");
    }

    let cfg = ViewerConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://bpm.example.test/app");
    assert_eq!(cfg.timeouts, RequestTimeouts { request_secs: 42, connect_secs: 7 });
    assert!(cfg.debugger_enabled);
    assert_eq!(cfg.scroll_settle_ms, 350);

    unsafe { clear_flowview_env() };
}

#[test]
fn from_env_ignores_unparseable_numbers() {
    let _guard = env_lock();
    unsafe {
        clear_flowview_env();
        std::env::set_var("FLOWVIEW_REQUEST_TIMEOUT_SECS", "soon");
    }

    let cfg = ViewerConfig::from_env().unwrap();
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_REQUEST_TIMEOUT_SECS);

    unsafe { clear_flowview_env() };
}

#[test]
fn from_env_rejects_bad_debugger_flag() {
    let _guard = env_lock();
    unsafe {
        clear_flowview_env();
        std::env::set_var("FLOWVIEW_DEBUGGER", "maybe");
    }

    let err = ViewerConfig::from_env().unwrap_err();
    assert_eq!(err.error_code(), "E_CONFIG_INVALID");
    assert!(err.to_string().contains("FLOWVIEW_DEBUGGER"));

    unsafe { clear_flowview_env() };
}

#[test]
fn engine_config_carries_debugger_and_settle() {
    let cfg = ViewerConfig { debugger_enabled: true, scroll_settle_ms: 50, ..ViewerConfig::default() };
    let engine = cfg.engine_config(&HostContainer::default());
    assert!(engine.render.debugger_enabled);
    assert_eq!(engine.scroll_settle, Duration::from_millis(50));
}

#[test]
fn container_flag_enables_debugger() {
    let cfg = ViewerConfig::default();
    assert!(!cfg.engine_config(&HostContainer::default()).render.debugger_enabled);

    let container: HostContainer =
        serde_json::from_str(r#"{ "processInstanceId": "pi1", "debuggerEnabled": true }"#).unwrap();
    assert!(cfg.engine_config(&container).render.debugger_enabled);
}
