//! Generation entry point.
//!
//! An [`Engine`] owns the configuration and the playback state of one output
//! directory. Generation produces a [`Draft`]: the program plus an updated
//! copy of the state. Committing the draft persists that copy and swaps it in,
//! so callers can write the program first and commit only once it is on disk.

use chrono::NaiveDate;
use std::path::Path;

use crate::catalog::CategoryResolver;
use crate::config::Config;
use crate::domain::{CategoryPool, FolderMap, MediaItem, Program};
use crate::error::Result;
use crate::output::load_program;
use crate::scheduler::{DailySelector, RecencySelector, TemplateReplay, TimelineScheduler};
use crate::state::{PlaybackState, StateStore};

/// A generated program and the state it leaves behind, not yet persisted.
#[derive(Debug, Clone)]
pub struct Draft {
    program: Program,
    state: PlaybackState,
}

impl Draft {
    pub fn program(&self) -> &Program {
        &self.program
    }
}

pub struct Engine {
    config: Config,
    resolver: CategoryResolver,
    store: StateStore,
    state: PlaybackState,
}

impl Engine {
    /// Create an engine and read the persisted state.
    pub fn open(config: Config) -> Self {
        let store = StateStore::new(config.state_path());
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: StateStore) -> Self {
        let resolver = CategoryResolver::new(&config.categories, config.default_category.as_str());
        let state = store.load();
        Self {
            config,
            resolver,
            store,
            state,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Resolve scanned folders into categories.
    pub fn pool(&self, folders: &FolderMap) -> CategoryPool {
        self.resolver.pool(folders)
    }

    /// Category pool with the identifier clip taken out of rotation.
    fn split_identifier(&self, folders: &FolderMap) -> (CategoryPool, Option<MediaItem>) {
        let mut pool = self.pool(folders);
        let identifier = pool.take_by_filename(&self.config.identifier.file);
        match &identifier {
            Some(item) => log::debug!("Identifier clip: {}", item.path),
            None => log::warn!("Identifier '{}' not found in library", self.config.identifier.file),
        }
        (pool, identifier)
    }

    /// Build a program for `date` by walking the day. Nothing is persisted
    /// until the draft is passed to [`Engine::commit`].
    pub fn draft(&self, folders: &FolderMap, date: NaiveDate) -> Result<Draft> {
        let (pool, identifier) = self.split_identifier(folders);
        let mut state = self.state.clone();

        let selector = RecencySelector::from_config(&self.config.selection);
        let day_start = date.and_time(self.config.schedule.day_start);
        let mut daily = DailySelector::new(&self.config.features, selector).select(&pool, &mut state, date, day_start);

        let scheduler = TimelineScheduler::new(&self.config, &pool, identifier.as_ref())?;
        let items = scheduler.build(&mut state, &mut daily, date);

        Ok(Draft {
            program: Program::new(self.config.channel.as_str(), date, items),
            state,
        })
    }

    /// Like [`Engine::draft`], from a previous program's structure. A missing
    /// or unreadable template falls back to the timeline.
    pub fn draft_from_template(&self, folders: &FolderMap, template: &Path, date: NaiveDate) -> Result<Draft> {
        let template = match load_program(template) {
            Ok(program) => program,
            Err(e) => {
                log::warn!("{}, generating from the timeline instead", e);
                return self.draft(folders, date);
            }
        };

        let (pool, identifier) = self.split_identifier(folders);
        let mut state = self.state.clone();

        let replay = TemplateReplay::new(&self.config, &self.resolver, &pool, identifier.as_ref());
        let items = replay.build(&template, &mut state, date);

        Ok(Draft {
            program: Program::new(self.config.channel.as_str(), date, items),
            state,
        })
    }

    /// Persist the draft's state and hand back its program. On error the
    /// engine keeps its previous state.
    pub fn commit(&mut self, draft: Draft) -> Result<Program> {
        self.store.save(&draft.state)?;
        self.state = draft.state;
        Ok(draft.program)
    }

    /// `draft` then `commit`.
    pub fn generate(&mut self, folders: &FolderMap, date: NaiveDate) -> Result<Program> {
        let draft = self.draft(folders, date)?;
        self.commit(draft)
    }

    /// `draft_from_template` then `commit`.
    pub fn generate_from_template(&mut self, folders: &FolderMap, template: &Path, date: NaiveDate) -> Result<Program> {
        let draft = self.draft_from_template(folders, template, date)?;
        self.commit(draft)
    }

    /// The clip `category` would get next on `date`, without recording it.
    pub fn peek(&self, folders: &FolderMap, category: &str, date: NaiveDate) -> Option<MediaItem> {
        let (pool, _) = self.split_identifier(folders);
        let at = date.and_time(self.config.schedule.day_start);
        RecencySelector::from_config(&self.config.selection)
            .peek(&pool, category, &self.state, None, at)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, day).unwrap()
    }

    fn folders() -> FolderMap {
        let mut folders = FolderMap::new();
        folders.insert(
            "emisije".to_string(),
            vec![MediaItem::new("/m/emisije/SPICA_BlagovestiTV.mp4", 30.0, 0)],
        );
        folders.insert(
            "Muzika".to_string(),
            vec![
                MediaItem::new("/m/Muzika/a.mp4", 600.0, 1),
                MediaItem::new("/m/Muzika/b.mp4", 600.0, 2),
            ],
        );
        folders.insert(
            "Serije".to_string(),
            vec![
                MediaItem::new("/m/Serije/Show_S01E01.mp4", 1500.0, 0),
                MediaItem::new("/m/Serije/Show_S01E02.mp4", 1500.0, 0),
            ],
        );
        folders
    }

    fn config(temp: &TempDir) -> Config {
        let mut config = Config::default();
        config.output_directory = temp.path().to_path_buf();
        config.schedule.target_duration_hours = 3.0;
        config
    }

    #[test]
    fn test_generate_persists_state() {
        let temp = TempDir::new().unwrap();
        let mut engine = Engine::open(config(&temp));

        let program = engine.generate(&folders(), date(1)).unwrap();
        assert_eq!(program.channel, "Channel 1");
        assert!(!program.is_empty());
        assert!(program.program.iter().any(|item| item.source.contains("SPICA")));

        let reopened = Engine::open(config(&temp));
        assert_eq!(reopened.state(), engine.state());
        assert_eq!(
            reopened.state().daily_selection("serije", date(1)),
            Some("/m/Serije/Show_S01E01.mp4")
        );
    }

    #[test]
    fn test_identifier_not_rotated() {
        let temp = TempDir::new().unwrap();
        let engine = Engine::open(config(&temp));
        let (pool, identifier) = engine.split_identifier(&folders());
        assert_eq!(identifier.unwrap().filename, "SPICA_BlagovestiTV.mp4");
        assert!(pool.find_by_filename("SPICA").is_none());
    }

    #[test]
    fn test_peek_does_not_commit() {
        let temp = TempDir::new().unwrap();
        let engine = Engine::open(config(&temp));
        let first = engine.peek(&folders(), "muzika", date(1)).unwrap();
        let second = engine.peek(&folders(), "muzika", date(1)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.filename, "a.mp4");
        assert!(engine.state().last_played.is_empty());
        assert!(!config(&temp).state_path().exists());
    }

    #[test]
    fn test_missing_template_falls_back() {
        let temp = TempDir::new().unwrap();
        let mut engine = Engine::open(config(&temp));
        let program = engine
            .generate_from_template(&folders(), &temp.path().join("missing.json"), date(1))
            .unwrap();
        assert!(!program.is_empty());
    }

    #[test]
    fn test_failed_save_keeps_state() {
        let temp = TempDir::new().unwrap();
        // a directory where the state file should go makes the rename fail
        let blocked = temp.path().join("state.json");
        std::fs::create_dir_all(blocked.join("occupied")).unwrap();
        let mut engine = Engine::with_store(config(&temp), StateStore::new(&blocked));

        assert!(engine.generate(&folders(), date(1)).is_err());
        assert!(engine.state().last_played.is_empty());
    }

    #[test]
    fn test_draft_is_not_persisted_until_commit() {
        let temp = TempDir::new().unwrap();
        let mut engine = Engine::open(config(&temp));

        let draft = engine.draft(&folders(), date(1)).unwrap();
        assert!(!draft.program().is_empty());
        assert!(engine.state().last_played.is_empty());
        assert!(engine.state().series_last_episode("serije").is_none());
        assert!(!config(&temp).state_path().exists());

        let expected = draft.program().clone();
        let program = engine.commit(draft).unwrap();
        assert_eq!(program, expected);
        assert_eq!(engine.state().series_last_episode("serije"), Some("/m/Serije/Show_S01E01.mp4"));
        assert!(config(&temp).state_path().exists());
    }
}
