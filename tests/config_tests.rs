use gridmatch::{ConfigError, SessionConfig, Symbol, MAX_PLAYERS};

#[test]
fn test_parse_two_player_session() {
    let input = "3 3 3 2\nX 0 ./player\nO 2 ./player --fast -v\n";
    let session = SessionConfig::parse(input).unwrap();

    assert_eq!(session.grid.width, 3);
    assert_eq!(session.grid.height, 3);
    assert_eq!(session.grid.streak, 3);
    assert_eq!(session.grid.cell_count(), 9);
    assert_eq!(session.players.len(), 2);

    let x = &session.players[0];
    assert_eq!(x.symbol, Symbol::from_char('X').unwrap());
    assert_eq!(x.program(), "./player");
    assert!(x.args().is_empty());

    let o = &session.players[1];
    assert_eq!(o.program(), "./player");
    assert_eq!(o.args(), ["--fast".to_string(), "-v".to_string()]);
}

#[test]
fn test_from_reader_matches_parse() {
    let input = "4 2 2 1 A 1 bot --seed";
    let from_reader = SessionConfig::from_reader(input.as_bytes()).unwrap();
    assert_eq!(from_reader, SessionConfig::parse(input).unwrap());
}

#[test]
fn test_rejects_bad_dimensions_and_streak() {
    assert!(matches!(
        SessionConfig::parse("0 3 3 1 X 0 p"),
        Err(ConfigError::InvalidDimensions { width: 0, height: 3 })
    ));
    assert!(matches!(
        SessionConfig::parse("3 11 3 1 X 0 p"),
        Err(ConfigError::InvalidDimensions { .. })
    ));
    assert!(matches!(
        SessionConfig::parse("3 3 0 1 X 0 p"),
        Err(ConfigError::InvalidStreak(0))
    ));
}

#[test]
fn test_rejects_bad_player_count() {
    assert!(matches!(
        SessionConfig::parse("3 3 3 0"),
        Err(ConfigError::InvalidPlayerCount(0))
    ));
    let too_many = format!("3 3 3 {}", MAX_PLAYERS + 1);
    assert!(matches!(
        SessionConfig::parse(&too_many),
        Err(ConfigError::InvalidPlayerCount(_))
    ));
}

#[test]
fn test_rejects_bad_symbols() {
    assert!(matches!(
        SessionConfig::parse("3 3 3 2 X 0 p X 0 q"),
        Err(ConfigError::DuplicateSymbol('X'))
    ));
    assert!(matches!(
        SessionConfig::parse("3 3 3 1 XY 0 p"),
        Err(ConfigError::InvalidSymbol(_))
    ));
    assert!(matches!(
        SessionConfig::parse("3 3 3 1 * 0 p"),
        Err(ConfigError::ReservedSymbol)
    ));
}

#[test]
fn test_rejects_truncated_and_garbage_input() {
    assert!(matches!(
        SessionConfig::parse("3 3"),
        Err(ConfigError::MissingToken("streak"))
    ));
    assert!(matches!(
        SessionConfig::parse("3 3 3 1 X 2 p a"),
        Err(ConfigError::MissingToken("launch argument"))
    ));
    assert!(matches!(
        SessionConfig::parse("three 3 3 1 X 0 p"),
        Err(ConfigError::InvalidNumber { field: "width", .. })
    ));
    assert!(matches!(
        SessionConfig::parse("3 3 3 1 X 0 p extra"),
        Err(ConfigError::TrailingInput(_))
    ));
}

#[test]
fn test_error_messages_are_readable() {
    let err = SessionConfig::parse("3 3 3 2 X 0 p X 0 q").unwrap_err();
    assert_eq!(err.to_string(), "Player symbol 'X' is used twice");
}
