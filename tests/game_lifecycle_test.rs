//! End-to-end game scenarios through the services.

use std::sync::Arc;
use std::time::Duration;

use connectfour::{
    GameError, GameStatus, GamesService, MemoryRepository, ServiceError, SqliteRepository,
    UserService,
};
use tempfile::NamedTempFile;

fn services_over(repo: Arc<MemoryRepository>) -> GamesService {
    let users = Arc::new(UserService::new(repo.clone(), Duration::from_secs(60)));
    users.register("Sanae", "sanae@x").unwrap();
    users.register("Dick", "dick@x").unwrap();
    GamesService::new(users, repo)
}

fn discs_in_column(games: &GamesService, key: &str, column: usize) -> usize {
    games
        .get_game_state(key)
        .unwrap()
        .board
        .values()
        .filter(|row| row.chars().nth(column - 1) != Some(' '))
        .count()
}

#[test]
fn test_player_one_cannot_move_twice() {
    let games = services_over(Arc::new(MemoryRepository::new()));

    let key = games.new_game("sanae@x", true).unwrap().key;
    assert_eq!(games.get_game_state(&key).unwrap().status, GameStatus::Created);

    let state = games.join_game(&key, "dick@x").unwrap();
    assert_eq!(state.status, GameStatus::Started);
    assert_eq!(state.player_turn, 1);

    games.play_move(&key, "sanae@x", 1).unwrap();
    for _ in 0..3 {
        assert!(matches!(
            games.play_move(&key, "sanae@x", 1),
            Err(ServiceError::Game(GameError::NotYourTurn))
        ));
    }

    assert_eq!(discs_in_column(&games, &key, 1), 1);
    assert_eq!(games.get_game_state(&key).unwrap().player_turn, 2);
}

#[test]
fn test_full_game_to_a_win() {
    let games = services_over(Arc::new(MemoryRepository::new()));
    let key = games.new_game("sanae@x", false).unwrap().key;
    games.join_game(&key, "dick@x").unwrap();

    // Sanae builds a rising diagonal from column 1 to 4.
    let moves = [
        ("sanae@x", 1),
        ("dick@x", 2),
        ("sanae@x", 2),
        ("dick@x", 3),
        ("sanae@x", 3),
        ("dick@x", 4),
        ("sanae@x", 3),
        ("dick@x", 4),
        ("sanae@x", 4),
        ("dick@x", 7),
    ];
    for (email, column) in moves {
        let state = games.play_move(&key, email, column).unwrap();
        assert_eq!(state.status, GameStatus::Started);
    }

    let state = games.play_move(&key, "sanae@x", 4).unwrap();
    assert_eq!(state.status, GameStatus::Finished);
    assert_eq!(state.player_turn_email, "sanae@x");

    let game = games.get_game(&key).unwrap();
    assert_eq!(game.winner().map(|u| u.email.as_str()), Some("sanae@x"));
    assert!(game.finished_at().is_some());

    assert!(matches!(
        games.play_move(&key, "dick@x", 5),
        Err(ServiceError::Game(GameError::GameAlreadyOver))
    ));
}

#[test]
fn test_lifecycle_survives_sqlite_round_trips() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let repo = Arc::new(SqliteRepository::new(
        db_file.path().to_str().expect("Invalid path"),
    ));
    repo.run_migrations().expect("Migrations failed");

    let users = Arc::new(UserService::new(repo.clone(), Duration::ZERO));
    users.register("Sanae", "sanae@x").unwrap();
    users.register("Dick", "dick@x").unwrap();
    let games = GamesService::new(users, repo);

    let key = games.new_game("sanae@x", true).unwrap().key;
    assert_eq!(games.all_open_games("dick@x").unwrap().len(), 1);

    games.join_game(&key, "dick@x").unwrap();
    assert!(games.all_open_games("dick@x").unwrap().is_empty());

    for _ in 0..3 {
        games.play_move(&key, "sanae@x", 1).unwrap();
        games.play_move(&key, "dick@x", 2).unwrap();
    }
    let state = games.play_move(&key, "sanae@x", 1).unwrap();
    assert_eq!(state.status, GameStatus::Finished);
    assert_eq!(state.board[&3], "X      ");

    let mine = games.all_my_games("dick@x").unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].status, GameStatus::Finished);
}
