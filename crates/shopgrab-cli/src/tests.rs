use super::*;

#[test]
fn parses_extract_command() {
    let cli = Cli::try_parse_from([
        "shopgrab-cli",
        "extract",
        "--platform",
        "aliexpress",
        "--url",
        "https://www.aliexpress.com/item/1.html",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Extract {
            platform,
            url,
            html,
            report,
        } => {
            assert_eq!(platform, Platform::Aliexpress);
            assert_eq!(url, "https://www.aliexpress.com/item/1.html");
            assert!(html.is_none());
            assert!(!report);
        }
        Commands::Platforms => panic!("expected extract"),
    }
}

#[test]
fn parses_html_snapshot_and_report_flags() {
    let cli = Cli::try_parse_from([
        "shopgrab-cli",
        "extract",
        "--platform",
        "noon",
        "--url",
        "https://www.noon.com/p/1",
        "--html",
        "saved/noon.html",
        "--report",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Extract { html: Some(ref p), report: true, .. } if p == &PathBuf::from("saved/noon.html")
    ));
}

#[test]
fn rejects_unknown_platform() {
    let result = Cli::try_parse_from([
        "shopgrab-cli",
        "extract",
        "--platform",
        "amazon",
        "--url",
        "https://www.amazon.com/dp/1",
    ]);
    assert!(result.is_err());
}

#[test]
fn extract_requires_url() {
    let result = Cli::try_parse_from(["shopgrab-cli", "extract", "--platform", "shein"]);
    assert!(result.is_err());
}

#[test]
fn parses_platforms_command() {
    let cli = Cli::try_parse_from(["shopgrab-cli", "platforms"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Platforms));
}

fn broken_endpoint() -> Result<AppConfig, ConfigError> {
    Err(ConfigError::InvalidEnvVar {
        var: "SHOPGRAB_CDP_ENDPOINT".to_string(),
        reason: "expected an http(s) URL, got \"ws://nowhere\"".to_string(),
    })
}

fn live_config() -> AppConfig {
    AppConfig {
        env: shopgrab_core::Environment::Test,
        bind_addr: "127.0.0.1:3000".parse().expect("valid addr"),
        log_level: "info".to_string(),
        cdp_endpoint: "http://127.0.0.1:9222".to_string(),
        navigation_timeout_secs: 45,
        cdp_command_timeout_secs: 30,
    }
}

#[test]
fn snapshot_extraction_ignores_browser_config() {
    let path = std::env::temp_dir().join(format!("shopgrab-cli-{}.html", std::process::id()));
    std::fs::write(&path, "<html><body><h1>Kettle</h1></body></html>").expect("write snapshot");

    let result = session_provider(Some(path.as_path()), broken_endpoint);
    std::fs::remove_file(&path).ok();

    let (_, timeout) = result.expect("snapshot should not need browser config");
    assert_eq!(timeout, SNAPSHOT_NAVIGATION_TIMEOUT);
}

#[test]
fn missing_snapshot_fails_before_config() {
    let path = std::env::temp_dir().join("shopgrab-cli-missing-snapshot.html");
    let err = session_provider(Some(path.as_path()), || -> Result<AppConfig, ConfigError> {
        panic!("config must not be loaded for snapshots")
    })
    .err()
    .expect("missing file should fail");
    assert!(err.to_string().starts_with("failed to read"));
}

#[test]
fn live_extraction_surfaces_config_errors() {
    let err = session_provider(None, broken_endpoint)
        .err()
        .expect("bad endpoint should fail");
    assert!(err.to_string().contains("SHOPGRAB_CDP_ENDPOINT"));
}

#[test]
fn live_extraction_uses_configured_timeout() {
    let (_, timeout) =
        session_provider(None, || Ok(live_config())).expect("valid config should build");
    assert_eq!(timeout, Duration::from_secs(45));
}
