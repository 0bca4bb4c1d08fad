use rtc_session::{default_ice_servers, Settings, SettingsError, SignalingTransport};

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let settings = Settings::load(dir.path().join("settings.json")).unwrap();
    assert_eq!(settings.transport, SignalingTransport::Mqtt);
    assert_eq!(settings.ice_servers, default_ice_servers());
    assert_eq!(settings.uuid.len(), 16);
}

#[test]
fn settings_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    // Parent directories are created on save.
    let path = dir.path().join("nested").join("settings.json");

    let settings = Settings {
        transport: SignalingTransport::WebSocket,
        websocket_host: Some("broker.example.org".into()),
        websocket_port: Some(8443),
        mqtt_user_id: Some(42),
        ..Default::default()
    };
    settings.save(&path).unwrap();

    let loaded = Settings::load(&path).unwrap();
    assert_eq!(loaded, settings);
}

#[test]
fn corrupt_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{not json").unwrap();

    assert!(matches!(Settings::load(&path), Err(SettingsError::Parse(_))));
}
