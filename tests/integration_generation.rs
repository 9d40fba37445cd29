//! End-to-end generation tests
//!
//! Scans a media tree on disk, generates programs across several days and
//! checks what ends up in the output directory.

use chrono::NaiveDate;
use playgen::catalog::{FixedDurationProbe, Scanner};
use playgen::config::Config;
use playgen::domain::{FolderMap, Program};
use playgen::engine::Engine;
use playgen::output::{ProgramWriter, load_program};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SPICA: &str = "SPICA_BlagovestiTV.mp4";

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

/// Library laid out like the station's media share.
fn media_tree(root: &Path) {
    for file in [
        SPICA,
        "Psaltir/psaltir_01.mp4",
        "Psaltir/psaltir_02.mp4",
        "Molitve/molitva_jutarnja.mp4",
        "Molitve/molitva_vecernja.mp4",
        "Serije/Show_S01E01.mp4",
        "Serije/Show_S01E02.mp4",
        "Dokumentarni/dok_01.mp4",
        "Dokumentarni/dok_02.mp4",
        "Dokumentarni/dok_03.mp4",
        "Deciji/crtani_01.mkv",
        "Deciji/crtani_02.mkv",
        "Muzika/pesma_01.mp4",
        "Muzika/pesma_02.mp4",
        "Muzika/pesma_03.mp4",
        "15min/filler_01.mp4",
        "Muzika/cover.jpg",
    ] {
        touch(&root.join(file));
    }
}

struct Station {
    _temp: TempDir,
    config: Config,
}

impl Station {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let media = temp.path().join("emisije");
        media_tree(&media);

        let mut config = Config::default();
        config.video_directory = media;
        config.output_directory = temp.path().join("playlists");
        Self { _temp: temp, config }
    }

    async fn scan(&self) -> FolderMap {
        let probe = FixedDurationProbe::new(600.0);
        Scanner::new(&self.config.probe, &probe)
            .scan(&self.config.video_directory)
            .await
            .unwrap()
    }
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, day).unwrap()
}

fn assert_no_adjacent_identifiers(program: &Program) {
    for pair in program.program.windows(2) {
        assert!(
            !(pair[0].source.ends_with(SPICA) && pair[1].source.ends_with(SPICA)),
            "back-to-back identifiers in program for {}",
            program.date
        );
    }
}

#[tokio::test]
async fn test_scan_finds_library() {
    let station = Station::new();
    let folders = station.scan().await;

    assert_eq!(folders["Muzika"].len(), 3);
    assert_eq!(folders["emisije"].len(), 1);
    let engine = Engine::open(station.config.clone());
    let pool = engine.pool(&folders);
    assert_eq!(pool.items("deciji").len(), 2);
    assert_eq!(pool.items("15min").len(), 1);
}

#[tokio::test]
async fn test_generate_and_write() {
    let station = Station::new();
    let folders = station.scan().await;
    let mut engine = Engine::open(station.config.clone());

    let program = engine.generate(&folders, date(1)).unwrap();
    assert!(program.total_duration() >= station.config.schedule.target_secs());
    assert!(program.program[0].source.contains("/Psaltir/"));
    assert!(program.program[1].source.ends_with(SPICA));
    assert!(!program.program.iter().any(|item| item.source.contains("/15min/")));
    assert_no_adjacent_identifiers(&program);

    let writer = ProgramWriter::new(&station.config.output_directory);
    let path = writer.write(&program).unwrap();
    assert_eq!(path, station.config.output_directory.join("2026/06/2026-06-01.json"));
    assert_eq!(load_program(&path).unwrap(), program);
    assert!(station.config.state_path().exists());
}

#[tokio::test]
async fn test_feature_cap_per_program() {
    let station = Station::new();
    let folders = station.scan().await;
    let mut engine = Engine::open(station.config.clone());
    let program = engine.generate(&folders, date(1)).unwrap();

    for category in &station.config.features.categories {
        let path = engine.state().daily_selection(category, date(1)).unwrap().to_string();
        let airings = program.program.iter().filter(|item| item.source == path).count();
        assert!((1..=3).contains(&airings), "{} aired {} times", category, airings);
    }
}

#[tokio::test]
async fn test_series_progress_across_runs() {
    let station = Station::new();
    let folders = station.scan().await;

    let mut episodes = Vec::new();
    for day in 1..=3 {
        // reopen each day so state goes through the file
        let mut engine = Engine::open(station.config.clone());
        engine.generate(&folders, date(day)).unwrap();
        let path = engine.state().daily_selection("serije", date(day)).unwrap();
        episodes.push(Path::new(path).file_name().unwrap().to_string_lossy().into_owned());
    }

    assert_eq!(episodes, vec!["Show_S01E01.mp4", "Show_S01E02.mp4", "Show_S01E01.mp4"]);
}

#[tokio::test]
async fn test_regenerating_a_date_keeps_features() {
    let station = Station::new();
    let folders = station.scan().await;
    let mut engine = Engine::open(station.config.clone());

    engine.generate(&folders, date(1)).unwrap();
    let first: Vec<_> = station
        .config
        .features
        .categories
        .iter()
        .map(|category| engine.state().daily_selection(category, date(1)).map(str::to_string))
        .collect();

    engine.generate(&folders, date(1)).unwrap();
    let second: Vec<_> = station
        .config
        .features
        .categories
        .iter()
        .map(|category| engine.state().daily_selection(category, date(1)).map(str::to_string))
        .collect();

    assert_eq!(first, second);
    assert_eq!(engine.state().series_last_episode("serije").map(|p| p.ends_with("Show_S01E01.mp4")), Some(true));
}

#[tokio::test]
async fn test_deterministic_for_same_state() {
    let station = Station::new();
    let folders = station.scan().await;

    let other_output = TempDir::new().unwrap();
    let mut other_config = station.config.clone();
    other_config.output_directory = other_output.path().to_path_buf();

    let first = Engine::open(station.config.clone()).generate(&folders, date(1)).unwrap();
    let second = Engine::open(other_config).generate(&folders, date(1)).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_template_replay() {
    let station = Station::new();
    let folders = station.scan().await;
    let writer = ProgramWriter::new(&station.config.output_directory);

    let mut engine = Engine::open(station.config.clone());
    let day1 = engine.generate(&folders, date(1)).unwrap();
    let template = writer.write(&day1).unwrap();

    let day2 = engine.generate_from_template(&folders, &template, date(2)).unwrap();
    assert_eq!(day2.date, date(2));
    assert!(!day2.is_empty());
    assert!(day2.program.iter().any(|item| item.source.ends_with(SPICA)));
    assert_no_adjacent_identifiers(&day2);

    // same clip lengths everywhere, so no gap needs a filler
    assert!(!day2.program.iter().any(|item| item.source.contains("/15min/")));
}

#[tokio::test]
async fn test_corrupt_template_falls_back() {
    let station = Station::new();
    let folders = station.scan().await;
    let template = station.config.output_directory.join("broken.json");
    fs::create_dir_all(&station.config.output_directory).unwrap();
    fs::write(&template, "{\"channel\": 1").unwrap();

    let mut engine = Engine::open(station.config.clone());
    let program = engine.generate_from_template(&folders, &template, date(1)).unwrap();
    assert!(program.total_duration() >= station.config.schedule.target_secs());
}

#[tokio::test]
async fn test_empty_library() {
    let temp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.video_directory = temp.path().join("missing");
    config.output_directory = temp.path().join("playlists");

    let probe = FixedDurationProbe::new(600.0);
    let folders = Scanner::new(&config.probe, &probe).scan(&config.video_directory).await.unwrap();
    assert!(folders.is_empty());

    let program = Engine::open(config).generate(&folders, date(1)).unwrap();
    assert!(program.is_empty());
}
