//! Tests for user registration, lookup caching and authentication.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use connectfour::{
    Cache, DbError, MemoryRepository, ServiceError, User, UserRepository, UserService,
};

/// Wraps a memory store and counts lookups that reach it.
#[derive(Debug, Default)]
struct CountingRepository {
    inner: MemoryRepository,
    lookups: AtomicUsize,
}

impl CountingRepository {
    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl UserRepository for CountingRepository {
    fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_email(email)
    }

    fn create(&self, user: User) -> Result<User, DbError> {
        self.inner.create(user)
    }
}

/// A store that is always down.
#[derive(Debug)]
struct BrokenRepository;

impl UserRepository for BrokenRepository {
    fn find_by_email(&self, _email: &str) -> Result<Option<User>, DbError> {
        Err(DbError::new("database is locked"))
    }

    fn create(&self, _user: User) -> Result<User, DbError> {
        Err(DbError::new("database is locked"))
    }
}

/// A store that loses every registration race: lookups miss, inserts
/// collide with a row written in between.
#[derive(Debug)]
struct RacingRepository;

impl UserRepository for RacingRepository {
    fn find_by_email(&self, _email: &str) -> Result<Option<User>, DbError> {
        Ok(None)
    }

    fn create(&self, user: User) -> Result<User, DbError> {
        Err(DbError::duplicate(format!(
            "UNIQUE constraint failed: users.email ({})",
            user.email
        )))
    }
}

fn seeded(ttl: Duration) -> (Arc<CountingRepository>, UserService) {
    let repo = Arc::new(CountingRepository::default());
    let mut sanae = User::new("Sanae", "sanae@evilnerd.nl");
    sanae.token = "secret".to_string();
    repo.inner.create(sanae).unwrap();
    let service = UserService::new(repo.clone(), ttl);
    (repo, service)
}

#[test]
fn test_lookup_is_cached() {
    let (repo, service) = seeded(Duration::from_secs(60));

    let first = service.find_user_by_email("sanae@evilnerd.nl").unwrap();
    let second = service.find_user_by_email("SANAE@evilnerd.nl").unwrap();

    assert_eq!(first, second);
    assert_eq!(repo.lookups(), 1);
}

#[test]
fn test_zero_ttl_always_hits_store() {
    let (repo, service) = seeded(Duration::ZERO);

    for _ in 0..3 {
        service.find_user_by_email("sanae@evilnerd.nl").unwrap();
    }
    assert_eq!(repo.lookups(), 3);
}

#[test]
fn test_expired_entry_goes_back_to_store() {
    let (repo, service) = seeded(Duration::from_millis(20));

    service.find_user_by_email("sanae@evilnerd.nl").unwrap();
    std::thread::sleep(Duration::from_millis(40));
    service.find_user_by_email("sanae@evilnerd.nl").unwrap();
    assert_eq!(repo.lookups(), 2);
}

#[test]
fn test_misses_are_not_cached() {
    let (repo, service) = seeded(Duration::from_secs(60));

    for _ in 0..2 {
        let err = service.find_user_by_email("nobody@evilnerd.nl").unwrap_err();
        assert!(matches!(err, ServiceError::UserNotFound { .. }));
    }
    assert_eq!(repo.lookups(), 2);
}

#[test]
fn test_remember_skips_store() {
    let repo = Arc::new(CountingRepository::default());
    let service = UserService::with_cache(repo.clone(), Cache::new(Duration::from_secs(60)));

    let mut dick = User::new("Dick", "Dick@evilnerd.nl");
    dick.id = 7;
    service.remember(&dick);

    assert_eq!(service.find_user_by_email("dick@evilnerd.nl").unwrap(), dick);
    assert_eq!(repo.lookups(), 0);
}

#[test]
fn test_create_user() {
    let (_repo, service) = seeded(Duration::from_secs(60));

    let dick = service
        .create_user("Dick@EvilNerd.nl", "Dick", "tok")
        .unwrap();
    assert!(dick.id > 0);
    assert_eq!(dick.email, "dick@evilnerd.nl");
    assert_eq!(dick.token, "tok");
}

#[test]
fn test_create_existing_user() {
    let (_repo, service) = seeded(Duration::from_secs(60));

    let err = service
        .create_user("sanae@evilnerd.nl", "Sanae", "tok")
        .unwrap_err();
    assert!(matches!(err, ServiceError::UserAlreadyExists { email } if email == "sanae@evilnerd.nl"));
}

#[test]
fn test_create_invalid_email() {
    let (_repo, service) = seeded(Duration::from_secs(60));

    let err = service.create_user("not-an-email", "X", "tok").unwrap_err();
    assert!(matches!(err, ServiceError::InvalidEmail { .. }));
}

#[test]
fn test_store_failure_is_propagated() {
    let service = UserService::new(Arc::new(BrokenRepository), Duration::from_secs(60));

    let err = service.find_user_by_email("sanae@evilnerd.nl").unwrap_err();
    assert!(matches!(err, ServiceError::Repository(_)));

    let err = service.create_user("sanae@evilnerd.nl", "Sanae", "tok").unwrap_err();
    assert!(matches!(err, ServiceError::Repository(_)));
}

#[test]
fn test_register_and_authenticate() {
    let service = UserService::new(Arc::new(MemoryRepository::new()), Duration::from_secs(60));

    let lucy = service.register("Lucy", "lucy@evilnerd.nl").unwrap();
    assert_eq!(lucy.token.len(), 32);

    let authenticated = service.authenticate("LUCY@evilnerd.nl", &lucy.token).unwrap();
    assert_eq!(authenticated.id, lucy.id);

    assert!(matches!(
        service.authenticate("lucy@evilnerd.nl", "wrong"),
        Err(ServiceError::InvalidCredentials)
    ));
    assert!(matches!(
        service.authenticate("lucy@evilnerd.nl", ""),
        Err(ServiceError::InvalidCredentials)
    ));
    assert!(matches!(
        service.authenticate("nobody@evilnerd.nl", &lucy.token),
        Err(ServiceError::InvalidCredentials)
    ));
}

#[test]
fn test_lost_registration_race_is_a_conflict() {
    let service = UserService::new(Arc::new(RacingRepository), Duration::from_secs(60));

    let err = service.register("Sanae", "Sanae@evilnerd.nl").unwrap_err();
    assert!(matches!(err, ServiceError::UserAlreadyExists { email } if email == "sanae@evilnerd.nl"));
}

#[test]
fn test_concurrent_registrations_of_one_email() {
    let service = Arc::new(UserService::new(
        Arc::new(MemoryRepository::new()),
        Duration::from_secs(60),
    ));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || service.register(&format!("Sanae {}", i), "sanae@evilnerd.nl"))
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(_) => created += 1,
            Err(err) => assert!(matches!(err, ServiceError::UserAlreadyExists { .. })),
        }
    }
    assert_eq!(created, 1);
}
