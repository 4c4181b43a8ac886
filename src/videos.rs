//! Videos — in-memory video records with file bytes in a blob store.
//!
//! The record set lives only in process memory (the explicit
//! "no persistence" backend); the uploaded files themselves go to a
//! [`BlobStore`] directory. Integer identities follow the same
//! `max(existing) + 1` policy as events, so a deleted identity is never
//! reused.

use serde::{Deserialize, Serialize};

use crate::blob::BlobStore;
use crate::error::ServiceError;
use crate::store::RecordStore;

/// One video: title plus the blob name its bytes are stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub filename: String,
}

/// Validation, identity assignment, and blob wiring over a video store.
pub struct VideoService {
    store: Box<dyn RecordStore<Video>>,
    blobs: BlobStore,
}

impl VideoService {
    /// Create a service over any video store backend and a blob directory.
    pub fn new(store: impl RecordStore<Video> + 'static, blobs: BlobStore) -> Self {
        Self {
            store: Box::new(store),
            blobs,
        }
    }

    /// Store the file bytes and append a new video record.
    pub fn create(&self, title: &str, filename: &str, bytes: &[u8]) -> Result<Video, ServiceError> {
        require_non_empty("title", title)?;
        require_non_empty("filename", filename)?;

        self.blobs.put(filename, bytes)?;

        let mut videos = self.store.load_all()?;
        let id = videos.iter().map(|v| v.id).max().unwrap_or(0) + 1;
        let video = Video {
            id,
            title: title.to_string(),
            filename: filename.to_string(),
        };
        videos.push(video.clone());
        self.store.save_all(&videos)?;
        Ok(video)
    }

    /// List all videos in insertion order.
    pub fn list(&self) -> Result<Vec<Video>, ServiceError> {
        Ok(self.store.load_all()?)
    }

    /// Fetch a video record and its file bytes.
    pub fn fetch(&self, id: i64) -> Result<(Video, Vec<u8>), ServiceError> {
        let video = self.find(id)?;
        let bytes = self
            .blobs
            .get(&video.filename)?
            .ok_or_else(|| ServiceError::NotFound(format!("video file {}", video.filename)))?;
        Ok((video, bytes))
    }

    /// Update the title and optionally replace the file.
    pub fn update(
        &self,
        id: i64,
        title: &str,
        replacement: Option<(&str, &[u8])>,
    ) -> Result<Video, ServiceError> {
        require_non_empty("title", title)?;
        if let Some((filename, _)) = replacement {
            require_non_empty("filename", filename)?;
        }

        let mut videos = self.store.load_all()?;
        let video = videos
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("video {}", id)))?;

        if let Some((filename, bytes)) = replacement {
            self.blobs.put(filename, bytes)?;
            video.filename = filename.to_string();
        }
        video.title = title.to_string();

        let updated = video.clone();
        self.store.save_all(&videos)?;
        Ok(updated)
    }

    /// Delete a video and its file. Unlike events and contacts, deleting an
    /// absent video is an error — the record is returned on success.
    pub fn delete(&self, id: i64) -> Result<Video, ServiceError> {
        let mut videos = self.store.load_all()?;
        let video = videos
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("video {}", id)))?;

        // A missing blob is fine; the record is authoritative.
        self.blobs.delete(&video.filename)?;

        videos.retain(|v| v.id != id);
        self.store.save_all(&videos)?;
        Ok(video)
    }

    fn find(&self, id: i64) -> Result<Video, ServiceError> {
        let videos = self.store.load_all()?;
        videos
            .into_iter()
            .find(|v| v.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("video {}", id)))
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!(
            "field `{}` must not be empty",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn service() -> (tempfile::TempDir, VideoService) {
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::open(dir.path().join("videos")).unwrap();
        (dir, VideoService::new(InMemoryStore::new(), blobs))
    }

    #[test]
    fn create_stores_record_and_bytes() {
        let (_dir, svc) = service();
        let video = svc.create("intro", "intro.mp4", b"frames").unwrap();
        assert_eq!(video.id, 1);

        let (fetched, bytes) = svc.fetch(video.id).unwrap();
        assert_eq!(fetched, video);
        assert_eq!(bytes, b"frames");
    }

    #[test]
    fn deleted_id_is_not_reused() {
        let (_dir, svc) = service();
        svc.create("a", "a.mp4", b"1").unwrap();
        svc.create("b", "b.mp4", b"2").unwrap();
        svc.delete(2).unwrap();
        assert_eq!(svc.create("c", "c.mp4", b"3").unwrap().id, 3);
    }

    #[test]
    fn update_title_keeps_file() {
        let (_dir, svc) = service();
        let video = svc.create("old", "a.mp4", b"1").unwrap();
        let updated = svc.update(video.id, "new", None).unwrap();
        assert_eq!(updated.title, "new");
        assert_eq!(updated.filename, "a.mp4");
        assert_eq!(svc.fetch(video.id).unwrap().1, b"1");
    }

    #[test]
    fn update_can_replace_file() {
        let (_dir, svc) = service();
        let video = svc.create("t", "a.mp4", b"1").unwrap();
        let updated = svc.update(video.id, "t", Some(("b.mp4", b"2"))).unwrap();
        assert_eq!(updated.filename, "b.mp4");
        assert_eq!(svc.fetch(video.id).unwrap().1, b"2");
    }

    #[test]
    fn delete_removes_record_and_blob() {
        let (_dir, svc) = service();
        let video = svc.create("t", "a.mp4", b"1").unwrap();
        let deleted = svc.delete(video.id).unwrap();
        assert_eq!(deleted.id, video.id);
        assert!(svc.list().unwrap().is_empty());
        assert!(matches!(
            svc.fetch(video.id).unwrap_err(),
            ServiceError::NotFound(_)
        ));
    }

    #[test]
    fn delete_absent_is_not_found() {
        let (_dir, svc) = service();
        assert!(matches!(
            svc.delete(5).unwrap_err(),
            ServiceError::NotFound(_)
        ));
    }
}
