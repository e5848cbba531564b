//! Integration tests running the `weather-report` binary.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run the CLI inside `home`, which doubles as working, home and config directory.
fn run_cli(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_weather-report"))
        .args(args)
        .current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("WEATHER_REPORT_LOG")
        .output()
        .expect("Failed to execute weather-report")
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    let output = run_cli(home.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("report"), "{stdout}");
    assert!(stdout.contains("configure"), "{stdout}");
}

#[test]
fn report_without_any_key_fails_before_network() {
    let home = TempDir::new().unwrap();
    let output = run_cli(
        home.path(),
        &["report", "--city", "Paris", "--country", "FR", "--api-url", "http://127.0.0.1:9"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No API key found"), "{stderr}");
    assert!(home.path().join("Logs").is_dir());
}

#[tokio::test(flavor = "multi_thread")]
async fn report_prints_and_saves_summary() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "Toulouse,FR"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "Lille,FR"))
        .and(query_param("appid", "FILE_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "city": {"name": "Lille", "country": "FR"},
                "list": [
                    {"dt_txt": "2024-05-01 09:00:00", "main": {"temp": 12.0, "humidity": 70},
                     "weather": [{"main": "Clouds"}]},
                    {"dt_txt": "2024-05-01 12:00:00", "main": {"temp": 16.5, "humidity": 55},
                     "weather": [{"main": "Clear"}], "rain": {"3h": 0.2}}
                ]
            }"#,
        ))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("local.conf"), "API_KEY=FILE_KEY\n").unwrap();

    let uri = server.uri();
    let home_path = home.path().to_path_buf();
    let output = tokio::task::spawn_blocking(move || {
        run_cli(
            &home_path,
            &["--api-url", &uri, "report", "-c", "Lille", "-C", "FR", "--output", "lille"],
        )
    })
    .await
    .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "{stderr}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"forecast_location_name\": \"Lille\""), "{stdout}");
    assert!(stdout.contains("\"major_transitions_count\": 1"), "{stdout}");

    let saved = home.path().join("JSON Output").join("lille.json");
    let contents = std::fs::read_to_string(&saved).expect("summary file should exist");
    assert!(contents.contains("\"rain_cumul_mm\": 0.2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_key_stops_the_report() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let uri = server.uri();
    let home_path = home.path().to_path_buf();
    let output = tokio::task::spawn_blocking(move || {
        run_cli(
            &home_path,
            &["-k", "BAD", "--api-url", &uri, "report", "-c", "Lille", "-C", "FR"],
        )
    })
    .await
    .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid or expired"), "{stderr}");
    assert!(!home.path().join("JSON Output").exists());
}

fn write_broken_config(home: &Path) {
    let dir = home.join(".config").join("weather-report");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "api_key = \"unterminated\nlang = [\n").unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn explicit_key_survives_a_broken_config_file() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("appid", "FLAG_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "city": {"name": "Brest", "country": "FR"},
                "list": [
                    {"dt_txt": "2024-05-01 09:00:00", "main": {"temp": 11.0, "humidity": 88},
                     "weather": [{"main": "Rain"}], "rain": {"3h": 1.5}}
                ]
            }"#,
        ))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    write_broken_config(home.path());

    let uri = server.uri();
    let home_path = home.path().to_path_buf();
    let output = tokio::task::spawn_blocking(move || {
        run_cli(
            &home_path,
            &["-k", "FLAG_KEY", "--api-url", &uri, "report", "-c", "Brest", "-C", "FR"],
        )
    })
    .await
    .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "{stderr}");
    assert!(stderr.contains("ignoring unreadable config"), "{stderr}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"forecast_location_name\": \"Brest\""), "{stdout}");
}

#[test]
fn broken_config_file_fails_without_explicit_key() {
    let home = TempDir::new().unwrap();
    write_broken_config(home.path());

    let output = run_cli(
        home.path(),
        &["report", "--city", "Paris", "--country", "FR", "--api-url", "http://127.0.0.1:9"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse config file"), "{stderr}");
}
