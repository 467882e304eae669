use std::sync::Arc;

use tracing::{debug, info, warn};

use plv_index::IndexManager;
use plv_repo::{
    Authenticator, EntityCodec, EntityRepository, QueryService, RepoError, StatusCounts,
};
use plv_store::Ledger;
use plv_types::{AuthenticationResult, EntityKind, Image, ImageStatus, User};

use crate::bootstrap::{self, BootstrapMode, BootstrapReport};
use crate::config::PlvConfig;
use crate::error::{PlvError, PlvResult};

/// High-level PLV API over a ledger.
///
/// Holds no state of its own beyond configuration: every call reads what it
/// needs from the ledger and writes its result back before returning.
pub struct Plv {
    repo: EntityRepository,
    config: PlvConfig,
}

impl std::fmt::Debug for Plv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plv").field("config", &self.config).finish()
    }
}

impl Plv {
    pub fn new(ledger: Arc<dyn Ledger>, config: PlvConfig) -> Self {
        let indexes = IndexManager::new(ledger.clone(), config.indexes.clone())
            .with_write_mode(config.index_write_mode);
        Self {
            repo: EntityRepository::new(ledger, indexes),
            config,
        }
    }

    pub fn config(&self) -> &PlvConfig {
        &self.config
    }

    pub fn repository(&self) -> &EntityRepository {
        &self.repo
    }

    pub fn query(&self) -> QueryService<'_> {
        QueryService::new(&self.repo)
    }

    // ---- Bootstrap ----

    /// Create the ID indexes. See [`BootstrapMode`] for the guard.
    pub fn bootstrap(&self, mode: BootstrapMode) -> PlvResult<BootstrapReport> {
        bootstrap::run(&self.repo, mode)
    }

    // ---- Users ----

    /// Register `username` with the given serialized user payload.
    ///
    /// The payload must decode as a user record and is stored verbatim; the
    /// username key is authoritative over any `username` field inside it.
    pub fn register_user(&self, username: &str, payload: &str) -> PlvResult<()> {
        if username.is_empty() {
            return Err(PlvError::Argument("username must not be empty".into()));
        }
        let decoded: User = EntityCodec::decode(payload.as_bytes())?;
        if !decoded.username.is_empty() && decoded.username != username {
            debug!(
                username,
                payload_username = %decoded.username,
                "payload username differs from key; key wins"
            );
        }
        self.repo
            .store(EntityKind::User, username, payload.as_bytes())?;
        info!(username, "registered user");
        Ok(())
    }

    /// Check `password` for `username`.
    ///
    /// Unknown users, failed lookups and wrong passwords are all denied;
    /// only the embedded user tells them apart.
    pub fn authenticate_as_user(&self, username: &str, password: &str) -> AuthenticationResult {
        let lookup = self.repo.lookup_user(username);
        if !lookup.is_found() {
            info!(username, "user not found");
        }
        Authenticator::authenticate(lookup, password)
    }

    pub fn users(&self) -> PlvResult<Vec<User>> {
        Ok(self.query().list_all::<User>()?)
    }

    // ---- Images ----

    /// Record a demanded image from its serialized payload.
    ///
    /// The image is stored in the demanded state whatever status the payload
    /// carries.
    pub fn demand_image(&self, payload: &str) -> PlvResult<Image> {
        let mut image: Image = EntityCodec::decode(payload.as_bytes())?;
        if image.status != ImageStatus::Demanded {
            debug!(id = %image.id, status = %image.status, "demanded image forced to demanded state");
            image.status = ImageStatus::Demanded;
        }

        if self.config.validate_image_owner
            && !self
                .repo
                .indexes()
                .id_exists(EntityKind::User, &image.user)?
        {
            warn!(id = %image.id, owner = %image.user, "rejected image with unknown owner");
            return Err(PlvError::UnknownOwner(image.user));
        }

        self.repo.store_entity(&image)?;
        info!(id = %image.id, owner = %image.user, "image demanded");
        Ok(image)
    }

    /// Mark an image as delivered, recording its final name, digest and
    /// purchase date. The index is not touched.
    pub fn deliver_image(
        &self,
        id: &str,
        name: &str,
        md5_hash: &str,
        purchase_date: &str,
    ) -> PlvResult<Image> {
        let mut image: Image = self.repo.fetch_entity(id).map_err(|e| {
            warn!(id, error = %e, "could not fetch image for delivery");
            e
        })?;
        if image.is_delivered() {
            debug!(id, "image already delivered; overwriting delivery fields");
        }
        image.deliver(name, md5_hash, purchase_date);
        self.repo.overwrite_entity(&image)?;
        info!(id, "image delivered");
        Ok(image)
    }

    /// Raw stored bytes of one image.
    pub fn image_bytes(&self, id: &str) -> PlvResult<Vec<u8>> {
        if id.is_empty() {
            return Err(PlvError::Argument("missing image ID".into()));
        }
        self.repo.fetch_by_id(id).map_err(|e| {
            if matches!(e, RepoError::NotFound(_)) {
                debug!(id, "image not found");
            }
            PlvError::from(e)
        })
    }

    pub fn images(&self) -> PlvResult<Vec<Image>> {
        Ok(self.query().list_all::<Image>()?)
    }

    pub fn images_by_user(&self, username: &str) -> PlvResult<Vec<Image>> {
        Ok(self.query().list_by_owner(username)?)
    }

    pub fn status_counts(&self) -> PlvResult<StatusCounts> {
        Ok(self.query().count_by_status()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plv_index::IndexError;
    use plv_store::InMemoryLedger;

    use crate::error::ErrorKind;

    fn plv_with(config: PlvConfig) -> (Arc<InMemoryLedger>, Plv) {
        let ledger = Arc::new(InMemoryLedger::new());
        let plv = Plv::new(ledger.clone(), config);
        plv.bootstrap(BootstrapMode::Fresh).unwrap();
        (ledger, plv)
    }

    fn plv() -> (Arc<InMemoryLedger>, Plv) {
        plv_with(PlvConfig::default())
    }

    fn image_payload(id: &str, owner: &str) -> String {
        format!(
            r#"{{"id":"{id}","name":"draft","author":"Ansel","url":"https://example.org/{id}.jpg","user":"{owner}","md5-hash":"","remarks":"cover","purchase-date":"","status":1}}"#
        )
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    #[test]
    fn register_and_authenticate() {
        let (_, plv) = plv();
        plv.register_user("alice", r#"{"password":"p","participant-type":"Employee"}"#)
            .unwrap();

        let ok = plv.authenticate_as_user("alice", "p");
        assert!(ok.authenticated);
        assert_eq!(ok.user.username, "alice");

        let wrong = plv.authenticate_as_user("alice", "q");
        assert!(!wrong.authenticated);
        assert_eq!(wrong.user.username, "alice");

        let unknown = plv.authenticate_as_user("mallory", "p");
        assert!(!unknown.authenticated);
        assert!(unknown.user.is_empty());
    }

    #[test]
    fn image_id_is_not_a_login() {
        let (_, plv) = plv();
        plv.demand_image(&image_payload("img-1", "alice")).unwrap();

        let result = plv.authenticate_as_user("img-1", "");
        assert!(!result.authenticated);
        assert!(result.user.is_empty());
        assert!(!plv.authenticate_as_user("users", "").authenticated);
    }

    #[test]
    fn empty_user_record_never_authenticates() {
        let (_, plv) = plv();
        plv.register_user("bob", "{}").unwrap();

        let result = plv.authenticate_as_user("bob", "");
        assert!(!result.authenticated);
        assert!(result.user.is_empty());
    }

    #[test]
    fn register_rejects_undecodable_payload_without_writes() {
        let (ledger, plv) = plv();
        let writes = ledger.write_count();
        let err = plv.register_user("alice", "not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(ledger.write_count(), writes);
    }

    #[test]
    fn register_duplicate_username() {
        let (_, plv) = plv();
        plv.register_user("alice", "{}").unwrap();
        let err = plv.register_user("alice", "{}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateId);
    }

    #[test]
    fn register_reserved_username() {
        let (_, plv) = plv();
        let err = plv.register_user("images", "{}").unwrap_err();
        assert!(matches!(
            err,
            PlvError::Repo(RepoError::Index(IndexError::ReservedId(_)))
        ));
    }

    #[test]
    fn users_listed_in_registration_order() {
        let (_, plv) = plv();
        for name in ["carol", "alice", "bob"] {
            plv.register_user(name, r#"{"password":"x"}"#).unwrap();
        }
        let names: Vec<_> = plv.users().unwrap().into_iter().map(|u| u.username).collect();
        assert_eq!(names, vec!["carol", "alice", "bob"]);
    }

    // -----------------------------------------------------------------------
    // Images
    // -----------------------------------------------------------------------

    #[test]
    fn demand_then_deliver() {
        let (_, plv) = plv();
        let demanded = plv.demand_image(&image_payload("img-1", "alice")).unwrap();
        assert_eq!(demanded.status, ImageStatus::Demanded);

        let delivered = plv
            .deliver_image("img-1", "sunset", "9e107d9d372bb6826bd81d3542a419d6", "2017-02-14")
            .unwrap();
        assert_eq!(delivered.status, ImageStatus::Delivered);
        assert_eq!(delivered.name, "sunset");
        assert_eq!(delivered.md5_hash, "9e107d9d372bb6826bd81d3542a419d6");
        assert_eq!(delivered.purchase_date, "2017-02-14");
        assert_eq!(delivered.author, demanded.author);
        assert_eq!(delivered.url, demanded.url);
        assert_eq!(delivered.user, demanded.user);
        assert_eq!(delivered.remarks, demanded.remarks);

        let stored: Image = EntityCodec::decode(&plv.image_bytes("img-1").unwrap()).unwrap();
        assert_eq!(stored, delivered);
        assert_eq!(plv.images().unwrap().len(), 1);
    }

    #[test]
    fn demand_forces_demanded_status() {
        let (_, plv) = plv();
        let payload = image_payload("img-1", "alice").replace(r#""status":1"#, r#""status":2"#);
        assert_eq!(plv.demand_image(&payload).unwrap().status, ImageStatus::Demanded);
    }

    #[test]
    fn demand_duplicate_id() {
        let (_, plv) = plv();
        plv.demand_image(&image_payload("img-1", "alice")).unwrap();
        let err = plv.demand_image(&image_payload("img-1", "bob")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateId);
        let stored: Image = plv.repository().fetch_entity("img-1").unwrap();
        assert_eq!(stored.user, "alice");
    }

    #[test]
    fn demand_without_id_is_argument_error() {
        let (_, plv) = plv();
        let err = plv.demand_image(r#"{"user":"alice"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    #[test]
    fn deliver_unknown_image() {
        let (ledger, plv) = plv();
        let writes = ledger.write_count();
        let err = plv.deliver_image("ghost", "n", "h", "d").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(ledger.write_count(), writes);
    }

    #[test]
    fn deliver_does_not_reindex() {
        let (ledger, plv) = plv();
        plv.demand_image(&image_payload("img-1", "alice")).unwrap();
        let index = ledger.get("images").unwrap();
        plv.deliver_image("img-1", "n", "h", "d").unwrap();
        assert_eq!(ledger.get("images").unwrap(), index);
    }

    #[test]
    fn owner_validation_is_opt_in() {
        let (_, lenient) = plv();
        assert!(lenient.demand_image(&image_payload("img-1", "nobody")).is_ok());

        let (_, strict) = plv_with(PlvConfig {
            validate_image_owner: true,
            ..PlvConfig::default()
        });
        let err = strict.demand_image(&image_payload("img-1", "nobody")).unwrap_err();
        assert!(matches!(err, PlvError::UnknownOwner(ref owner) if owner == "nobody"));

        strict.register_user("alice", "{}").unwrap();
        assert!(strict.demand_image(&image_payload("img-1", "alice")).is_ok());
    }

    #[test]
    fn images_by_user_filters_in_order() {
        let (_, plv) = plv();
        plv.demand_image(&image_payload("1", "a")).unwrap();
        plv.demand_image(&image_payload("2", "b")).unwrap();
        plv.demand_image(&image_payload("3", "a")).unwrap();

        let ids: Vec<_> = plv
            .images_by_user("a")
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(plv.images_by_user("c").unwrap().is_empty());
    }

    #[test]
    fn image_bytes_requires_id() {
        let (_, plv) = plv();
        assert_eq!(plv.image_bytes("").unwrap_err().kind(), ErrorKind::Argument);
        assert_eq!(plv.image_bytes("nope").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn status_counts_follow_deliveries() {
        let (_, plv) = plv();
        plv.demand_image(&image_payload("1", "a")).unwrap();
        plv.demand_image(&image_payload("2", "a")).unwrap();
        plv.deliver_image("2", "n", "h", "d").unwrap();

        let counts = plv.status_counts().unwrap();
        assert_eq!(counts, StatusCounts { demanded: 1, delivered: 1 });
    }
}
