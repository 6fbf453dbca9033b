//! Global subscriber installation.
//!
//! Every test in this binary shares one process-wide subscriber, so the
//! whole lifecycle is exercised in a single test.

use zsdk_log::{Config, LogError, info};

#[test]
fn install_reload_and_refuse_second_install() {
    let err = zsdk_log::init_with(Config::default().with_level("info,zsdk=notalevel")).unwrap_err();
    assert!(matches!(err, LogError::Filter { .. }), "{err}");

    let guard = zsdk_log::init_with(Config::test().with_level("info").reloadable()).unwrap();
    let handle = guard.reload_handle().expect("reloadable logger");
    assert_eq!(handle.current_filter().as_str(), "info");

    handle.reload("zsdk_action=debug,warn").unwrap();
    assert_eq!(handle.current_filter().as_str(), "zsdk_action=debug,warn");
    assert!(matches!(handle.reload("zsdk=notalevel"), Err(LogError::Filter { .. })));
    assert_eq!(handle.current_filter().as_str(), "zsdk_action=debug,warn");

    info!(attempt = 1, "logger installed");

    let again = zsdk_log::init_with(Config::test());
    assert!(matches!(again, Err(LogError::AlreadyInitialized(_))));

    // test helper tolerates an existing subscriber
    assert!(zsdk_log::init_test().reload_handle().is_none());
}
