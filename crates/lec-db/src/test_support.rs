//! Shared test utilities for lec-db unit tests.

pub(crate) mod helpers {
    use std::ops::Deref;
    use std::time::Duration;

    use lec_core::entities::Topic;
    use tempfile::TempDir;

    use crate::LecDb;
    use crate::service::LedgerService;

    /// A service backed by a database file in a temp dir that lives as long
    /// as the service.
    pub struct TestService {
        svc: LedgerService,
        _dir: TempDir,
    }

    impl Deref for TestService {
        type Target = LedgerService;

        fn deref(&self) -> &LedgerService {
            &self.svc
        }
    }

    /// Create a file-backed service in a fresh temp dir.
    ///
    /// `:memory:` is not usable: each operation opens its own connection.
    pub async fn test_service() -> TestService {
        let dir = tempfile::tempdir().unwrap();
        let db = LecDb::open_local(dir.path().join("ledger.db"), Duration::from_secs(5))
            .await
            .unwrap();
        TestService {
            svc: LedgerService::from_db(db),
            _dir: dir,
        }
    }

    /// Register a subject and one topic under it.
    pub async fn seed_topic(svc: &LedgerService) -> Topic {
        let subject = svc
            .register_subject("Computer Science", None)
            .await
            .unwrap();
        svc.register_topic(&subject.id, "Binary Search Trees", None)
            .await
            .unwrap()
    }
}
