//! In-memory fakes for the repository and service ports

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::watch;
use picbot_core::entities::{
    Alias, CollectionState, CollectionSummary, MediaCollection, MediaItem, NewMediaItem,
    ReactionCount,
};
use picbot_core::traits::{
    AliasRepository, ChatGateway, CollectionRepository, FetchedMedia, ImageRepository,
    MediaFetcher, ObjectStore, PortResult, RepoResult, ServerAssociationRepository, TempScope,
};
use picbot_core::{CollectionName, ContentHash, DomainError, Snowflake};

// ============================================================================
// Database
// ============================================================================

#[derive(Default)]
struct DbState {
    collections: BTreeMap<String, MediaCollection>,
    images: Vec<MediaItem>,
    associations: HashMap<String, Vec<Snowflake>>,
    aliases: HashMap<String, CollectionName>,
    next_image_id: i64,
}

/// All four repositories over one in-memory state
#[derive(Default)]
pub struct MemoryDb {
    state: Mutex<DbState>,
    fail_image_inserts: AtomicBool,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following image insert fail
    pub fn fail_image_inserts(&self) {
        self.fail_image_inserts.store(true, Ordering::SeqCst);
    }

    /// Insert a collection directly, with its origin servers
    pub fn seed_collection(&self, name: &str, owner: i64, servers: &[i64]) {
        let name = CollectionName::parse(name).unwrap();
        let mut state = self.state.lock().unwrap();
        state.associations.insert(
            name.to_string(),
            servers.iter().copied().map(Snowflake::new).collect(),
        );
        state.collections.insert(
            name.to_string(),
            MediaCollection::new(name, Some(Snowflake::new(owner))),
        );
    }

    /// Insert an image row directly
    pub fn seed_image(
        &self,
        collection: &str,
        storage_key: &str,
        hash: ContentHash,
        owner: i64,
        server: Option<i64>,
    ) -> MediaItem {
        let mut state = self.state.lock().unwrap();
        state.next_image_id += 1;
        let image = MediaItem {
            id: state.next_image_id,
            collection: CollectionName::parse(collection).unwrap(),
            storage_key: storage_key.to_string(),
            content_hash: hash,
            user_id: Snowflake::new(owner),
            server_id: server.map(Snowflake::new),
            created_at: Utc::now(),
        };
        state.images.push(image.clone());
        image
    }

    pub fn collection(&self, name: &str) -> Option<MediaCollection> {
        self.state.lock().unwrap().collections.get(name).cloned()
    }

    pub fn images(&self, collection: &str) -> Vec<MediaItem> {
        self.state
            .lock()
            .unwrap()
            .images
            .iter()
            .filter(|image| image.collection.as_str() == collection)
            .cloned()
            .collect()
    }

    pub fn servers(&self, collection: &str) -> Vec<Snowflake> {
        self.state
            .lock()
            .unwrap()
            .associations
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    pub fn alias_target(&self, alias: &str) -> Option<CollectionName> {
        self.state.lock().unwrap().aliases.get(alias).cloned()
    }
}

#[async_trait]
impl CollectionRepository for MemoryDb {
    async fn find_by_name(&self, name: &CollectionName) -> RepoResult<Option<MediaCollection>> {
        Ok(self.collection(name.as_str()))
    }

    async fn get_or_create(&self, collection: &MediaCollection) -> RepoResult<CollectionState> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state.collections.get(collection.name.as_str()) {
            return Ok(CollectionState::Existing(existing.clone()));
        }
        state
            .collections
            .insert(collection.name.to_string(), collection.clone());
        Ok(CollectionState::Created(collection.clone()))
    }

    async fn delete(&self, name: &CollectionName) -> RepoResult<()> {
        let mut state = self.state.lock().unwrap();
        state.collections.remove(name.as_str());
        state.images.retain(|image| &image.collection != name);
        state.associations.remove(name.as_str());
        state.aliases.retain(|_, target| target != name);
        Ok(())
    }

    async fn list_summaries(&self) -> RepoResult<Vec<CollectionSummary>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .collections
            .values()
            .map(|collection| CollectionSummary {
                name: collection.name.clone(),
                image_count: state
                    .images
                    .iter()
                    .filter(|image| image.collection == collection.name)
                    .count() as i64,
            })
            .collect())
    }
}

#[async_trait]
impl ImageRepository for MemoryDb {
    async fn has_hash(&self, collection: &CollectionName, hash: &ContentHash) -> RepoResult<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .images
            .iter()
            .any(|image| &image.collection == collection && &image.content_hash == hash))
    }

    async fn key_exists(&self, collection: &CollectionName, storage_key: &str) -> RepoResult<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .images
            .iter()
            .any(|image| &image.collection == collection && image.storage_key == storage_key))
    }

    async fn create(&self, new: &NewMediaItem) -> RepoResult<MediaItem> {
        if self.fail_image_inserts.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("insert refused".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        let same_collection = state
            .images
            .iter()
            .filter(|image| image.collection == new.collection);
        for image in same_collection {
            if image.content_hash == new.content_hash {
                return Err(DomainError::DuplicateContent(new.collection.to_string()));
            }
            if image.storage_key == new.storage_key {
                return Err(DomainError::StorageKeyTaken(new.storage_key.clone()));
            }
        }
        state.next_image_id += 1;
        let image = MediaItem {
            id: state.next_image_id,
            collection: new.collection.clone(),
            storage_key: new.storage_key.clone(),
            content_hash: new.content_hash.clone(),
            user_id: new.user_id,
            server_id: new.server_id,
            created_at: Utc::now(),
        };
        state.images.push(image.clone());
        Ok(image)
    }

    async fn find_by_key(
        &self,
        collection: &CollectionName,
        storage_key: &str,
    ) -> RepoResult<Option<MediaItem>> {
        Ok(self
            .images(collection.as_str())
            .into_iter()
            .find(|image| image.storage_key == storage_key))
    }

    async fn find_by_collection(&self, collection: &CollectionName) -> RepoResult<Vec<MediaItem>> {
        Ok(self.images(collection.as_str()))
    }

    async fn set_server(&self, id: i64, server_id: Snowflake) -> RepoResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(image) = state.images.iter_mut().find(|image| image.id == id) {
            image.server_id = Some(server_id);
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        self.state.lock().unwrap().images.retain(|image| image.id != id);
        Ok(())
    }

    async fn count(&self, collection: &CollectionName) -> RepoResult<i64> {
        Ok(self.images(collection.as_str()).len() as i64)
    }
}

#[async_trait]
impl ServerAssociationRepository for MemoryDb {
    async fn find_servers(&self, collection: &CollectionName) -> RepoResult<Vec<Snowflake>> {
        Ok(self.servers(collection.as_str()))
    }

    async fn add(&self, collection: &CollectionName, server_id: Snowflake) -> RepoResult<()> {
        let mut state = self.state.lock().unwrap();
        let servers = state.associations.entry(collection.to_string()).or_default();
        if !servers.contains(&server_id) {
            servers.push(server_id);
        }
        Ok(())
    }
}

#[async_trait]
impl AliasRepository for MemoryDb {
    async fn resolve(&self, alias: &CollectionName) -> RepoResult<Option<CollectionName>> {
        Ok(self.alias_target(alias.as_str()))
    }

    async fn create(&self, alias: &Alias) -> RepoResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.aliases.contains_key(alias.alias.as_str()) {
            return Err(DomainError::NameTaken(alias.alias.to_string()));
        }
        state
            .aliases
            .insert(alias.alias.to_string(), alias.target.clone());
        Ok(())
    }

    async fn delete(&self, alias: &CollectionName) -> RepoResult<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .aliases
            .remove(alias.as_str())
            .is_some())
    }
}

// ============================================================================
// Chat platform
// ============================================================================

/// Offset of DM channel ids from the user id they belong to
pub const DM_CHANNEL_BASE: i64 = 900_000;

/// DM channel the fake platform opens for a user
pub fn dm_channel(user_id: i64) -> Snowflake {
    Snowflake::new(DM_CHANNEL_BASE + user_id)
}

/// A message the bot posted
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub content: String,
    /// Local file attached to the message, if any
    pub file: Option<PathBuf>,
}

/// Records outgoing messages and holds scriptable reaction counts
#[derive(Default)]
pub struct FakeChat {
    next_id: AtomicI64,
    sent: Mutex<Vec<SentMessage>>,
    reactions: Mutex<HashMap<Snowflake, Vec<ReactionCount>>>,
    failing_reads: AtomicUsize,
}

impl FakeChat {
    pub fn new() -> Self {
        Self::default()
    }

    fn post(&self, channel_id: Snowflake, content: &str, file: Option<PathBuf>) -> Snowflake {
        let id = Snowflake::new(10_000 + self.next_id.fetch_add(1, Ordering::SeqCst));
        self.sent.lock().unwrap().push(SentMessage {
            id,
            channel_id,
            content: content.to_string(),
            file,
        });
        id
    }

    fn adjust(&self, message_id: Snowflake, emoji: &str, delta: i64, by_bot: bool) {
        let mut reactions = self.reactions.lock().unwrap();
        let entry = reactions.entry(message_id).or_default();
        match entry.iter_mut().find(|r| r.emoji == emoji) {
            Some(reaction) => {
                reaction.count += delta;
                reaction.me |= by_bot;
            }
            None if delta > 0 => entry.push(ReactionCount::new(emoji, delta, by_bot)),
            None => {}
        }
        entry.retain(|r| r.count > 0);
    }

    /// A user reacts to a message
    pub fn react(&self, message_id: Snowflake, emoji: &str) {
        self.adjust(message_id, emoji, 1, false);
    }

    /// A user takes their reaction back
    pub fn unreact(&self, message_id: Snowflake, emoji: &str) {
        self.adjust(message_id, emoji, -1, false);
    }

    /// Fail the next `n` reaction reads as if the platform were unreachable
    pub fn fail_reads(&self, n: usize) {
        self.failing_reads.store(n, Ordering::SeqCst);
    }

    pub fn remaining_failures(&self) -> usize {
        self.failing_reads.load(Ordering::SeqCst)
    }

    pub fn reactions_on(&self, message_id: Snowflake) -> Vec<ReactionCount> {
        self.reactions
            .lock()
            .unwrap()
            .get(&message_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Texts posted to one channel, oldest first
    pub fn messages_in(&self, channel_id: Snowflake) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|m| m.channel_id == channel_id)
            .map(|m| m.content)
            .collect()
    }

    /// Messages that carried a file
    pub fn proposals(&self) -> Vec<SentMessage> {
        self.sent().into_iter().filter(|m| m.file.is_some()).collect()
    }
}

#[async_trait]
impl ChatGateway for FakeChat {
    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PortResult<Snowflake> {
        Ok(self.post(channel_id, content, None))
    }

    async fn send_file(
        &self,
        channel_id: Snowflake,
        content: &str,
        path: &Path,
        _file_name: &str,
    ) -> PortResult<Snowflake> {
        tokio::fs::metadata(path)
            .await
            .map_err(|e| DomainError::GatewayError(format!("{}: {e}", path.display())))?;
        Ok(self.post(channel_id, content, Some(path.to_path_buf())))
    }

    async fn add_reaction(
        &self,
        _channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> PortResult<()> {
        self.adjust(message_id, emoji, 1, true);
        Ok(())
    }

    async fn get_reactions(
        &self,
        _channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PortResult<Vec<ReactionCount>> {
        if self
            .failing_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(DomainError::GatewayUnavailable("connection reset".to_string()));
        }
        Ok(self.reactions_on(message_id))
    }

    async fn open_dm(&self, user_id: Snowflake) -> PortResult<Snowflake> {
        Ok(dm_channel(user_id.into_inner()))
    }
}

// ============================================================================
// Object store
// ============================================================================

/// An uploaded object
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub public_read: bool,
}

pub struct FakeStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    uploads_open: watch::Sender<bool>,
    parked_uploads: AtomicUsize,
    fail_uploads: AtomicBool,
}

impl Default for FakeStore {
    fn default() -> Self {
        Self {
            objects: Mutex::default(),
            uploads_open: watch::Sender::new(true),
            parked_uploads: AtomicUsize::new(0),
            fail_uploads: AtomicBool::new(false),
        }
    }
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, key: &str, bytes: &[u8]) {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: "application/octet-stream".to_string(),
                public_read: true,
            },
        );
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    /// Hold every following upload until [`FakeStore::resume_uploads`]
    pub fn pause_uploads(&self) {
        self.uploads_open.send_replace(false);
    }

    pub fn resume_uploads(&self) {
        self.uploads_open.send_replace(true);
    }

    /// Uploads currently held by [`FakeStore::pause_uploads`]
    pub fn parked_uploads(&self) -> usize {
        self.parked_uploads.load(Ordering::SeqCst)
    }

    /// Make every following upload fail
    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
        public_read: bool,
    ) -> PortResult<()> {
        let bytes = tokio::fs::read(local_path)
            .await
            .map_err(|e| DomainError::StorageError(e.to_string()))?;

        let mut open = self.uploads_open.subscribe();
        self.parked_uploads.fetch_add(1, Ordering::SeqCst);
        let _ = open.wait_for(|open| *open).await;
        self.parked_uploads.fetch_sub(1, Ordering::SeqCst);

        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(DomainError::StorageError("bucket unavailable".to_string()));
        }
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
                public_read,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> PortResult<()> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://cdn.test/{key}")
    }
}

// ============================================================================
// Media fetcher
// ============================================================================

#[derive(Debug)]
struct ScratchDir(tempfile::TempDir);

impl TempScope for ScratchDir {
    fn path(&self) -> &Path {
        self.0.path()
    }
}

/// Serves registered URLs from memory into real scratch directories
#[derive(Default)]
pub struct FakeFetcher {
    media: Mutex<HashMap<String, Vec<u8>>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, bytes: &[u8]) {
        self.media
            .lock()
            .unwrap()
            .insert(url.to_string(), bytes.to_vec());
    }
}

#[async_trait]
impl MediaFetcher for FakeFetcher {
    async fn fetch(&self, url: &str, file_name: Option<&str>) -> PortResult<FetchedMedia> {
        let bytes = self
            .media
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| DomainError::DownloadFailed(format!("{url}: 404 Not Found")))?;

        let file_name = file_name
            .or_else(|| url.rsplit('/').next())
            .unwrap_or("download")
            .to_string();
        let dir = tempfile::tempdir().map_err(|e| DomainError::InternalError(e.to_string()))?;
        let path = dir.path().join(&file_name);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| DomainError::InternalError(e.to_string()))?;

        Ok(FetchedMedia {
            bytes,
            path,
            file_name,
            scope: Box::new(ScratchDir(dir)),
        })
    }
}
