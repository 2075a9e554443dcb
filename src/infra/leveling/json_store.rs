use crate::core::leveling::{LevelDocument, LevelStore, StoreError};
use async_trait::async_trait;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::PathBuf;

/// JSON-based level store. The whole document lives in a single file:
/// { guild_id: { "users": { user_id: { "xp", "level" } }, "blacklist": [...] } }
pub struct JsonLevelStore {
    path: PathBuf,
}

impl JsonLevelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LevelStore for JsonLevelStore {
    async fn load(&self) -> Result<LevelDocument, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No levels file yet, starting empty");
                return Ok(LevelDocument::default());
            }
            Err(e) => return Err(e.into()),
        };

        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    async fn save(&self, document: &LevelDocument) -> Result<(), StoreError> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, document)?;
        std::io::Write::flush(&mut writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::leveling::UserRecord;
    use tempfile::{tempdir, NamedTempFile};

    #[tokio::test]
    async fn missing_file_loads_as_empty_document() {
        let dir = tempdir().unwrap();
        let store = JsonLevelStore::new(dir.path().join("levels.json"));

        let document = store.load().await.unwrap();

        assert!(document.guilds.is_empty());
    }

    #[tokio::test]
    async fn test_json_persistence_roundtrip() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_owned();
        drop(tmp);

        let mut document = LevelDocument::default();
        let guild = document.guild_mut(7);
        *guild.user_mut(5) = UserRecord { xp: 120, level: 4 };
        *guild.user_mut(6) = UserRecord { xp: 0, level: 151 };
        guild.blacklist.extend([300, 100, 200]);
        document.guild_mut(8).blacklist.push(1);

        JsonLevelStore::new(path.clone()).save(&document).await.unwrap();

        // Reload from file
        let reloaded = JsonLevelStore::new(path).load().await.unwrap();
        assert_eq!(reloaded, document);
        assert_eq!(reloaded.guild(7).unwrap().blacklist, vec![300, 100, 200]);
    }

    #[tokio::test]
    async fn reads_hand_written_file() {
        let tmp = NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            r#"{
                "123": {
                    "users": { "456": { "xp": 30, "level": 2 } },
                    "blacklist": [789]
                }
            }"#,
        )
        .unwrap();

        let document = JsonLevelStore::new(tmp.path()).load().await.unwrap();

        let guild = document.guild(123).unwrap();
        assert_eq!(guild.users[&456], UserRecord { xp: 30, level: 2 });
        assert!(guild.is_blacklisted(789));
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let tmp = NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "{ not json").unwrap();

        let result = JsonLevelStore::new(tmp.path()).load().await;

        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn save_overwrites_previous_contents() {
        let tmp = NamedTempFile::new().unwrap();
        let store = JsonLevelStore::new(tmp.path());

        let mut first = LevelDocument::default();
        first.guild_mut(1).user_mut(1).xp = 50;
        store.save(&first).await.unwrap();
        store.save(&LevelDocument::default()).await.unwrap();

        assert!(store.load().await.unwrap().guilds.is_empty());
    }
}
