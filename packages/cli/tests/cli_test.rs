//! Loader, settings and rendering against files on disk

use anyhow::Result;
use hellion_cli::commands::{render_search, render_stats, render_tree};
use hellion_cli::{load_config, load_sources, LoadError};
use hellion_core::{ExplorerConfig, GameSession, View};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn celestial_bodies() -> Value {
    json!([
        {"GUID": 1, "ParentGUID": -1, "Name": "HELLION Star"},
        {"GUID": 2, "ParentGUID": 1, "Name": "PlanetA", "SemiMajorAxis": 100.0},
        {"GUID": 3, "ParentGUID": 1, "Name": "PlanetB", "SemiMajorAxis": 50.0}
    ])
}

fn save() -> Value {
    json!({
        "Ships": [
            {
                "GUID": 10, "Registration": "AM-10", "Name": "ShipA",
                "OrbitData": {"ParentGUID": 2, "SemiMajorAxis": 20.0}
            },
            {
                "GUID": 11, "Registration": "AM-11", "Name": "ShipB",
                "OrbitData": {"ParentGUID": 3, "SemiMajorAxis": 10.0},
                "DockedToShipGUID": 10
            },
            {
                "GUID": 12, "Registration": "OUT-12", "Name": "Outpost",
                "OrbitData": {"ParentGUID": 3, "SemiMajorAxis": 5.0}
            }
        ],
        "Asteroids": [],
        "Players": [{"GUID": 30, "ParentGUID": 10, "Name": "Alpha"}],
        "DynamicObjects": [{"GUID": 41, "ParentGUID": 30}]
    })
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// `save.json` plus a `Data` directory with the celestial bodies, a
/// malformed document and a non-JSON file.
fn write_game_files(dir: &TempDir) -> Result<(PathBuf, PathBuf)> {
    let save_path = dir.path().join("save.json");
    write_json(&save_path, &save())?;

    let data_dir = dir.path().join("Data");
    std::fs::create_dir(&data_dir)?;
    write_json(&data_dir.join("CelestialBodies.json"), &celestial_bodies())?;
    std::fs::write(data_dir.join("Broken.json"), "{ not json")?;
    std::fs::write(data_dir.join("readme.txt"), "ignored")?;

    Ok((save_path, data_dir))
}

// =========================================================================
// Loading
// =========================================================================

#[tokio::test]
async fn test_load_sources_orders_static_documents_by_name() -> Result<()> {
    let dir = TempDir::new()?;
    let (save_path, data_dir) = write_game_files(&dir)?;

    let sources = load_sources(&save_path, Some(data_dir.as_path())).await?;

    assert_eq!(sources.save.name, "save.json");
    assert!(sources.save.value.is_ok());

    let names: Vec<&str> = sources.static_data.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Broken.json", "CelestialBodies.json"]);
    assert!(sources.static_data[0].value.is_err());
    assert!(sources.static_data[1].value.is_ok());
    Ok(())
}

#[tokio::test]
async fn test_missing_save_is_a_failed_document() -> Result<()> {
    let dir = TempDir::new()?;

    let sources = load_sources(&dir.path().join("missing.json"), None).await?;

    assert_eq!(sources.save.name, "missing.json");
    assert!(sources.save.value.is_err());
    assert!(sources.static_data.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_data_dir_is_an_error() -> Result<()> {
    let dir = TempDir::new()?;
    let (save_path, _) = write_game_files(&dir)?;

    let result = load_sources(&save_path, Some(dir.path().join("NoSuchDir").as_path())).await;

    assert!(matches!(result, Err(LoadError::DataDir { .. })));
    Ok(())
}

// =========================================================================
// Settings
// =========================================================================

#[test]
fn test_load_config_from_explicit_path() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"save_depth": 2, "sources": {"asteroids": ""}}"#)?;

    let config = load_config(Some(path.as_path()))?;

    assert_eq!(config.save_depth, 2);
    assert_eq!(config.static_data_depth, 1);
    assert_eq!(config.sources.asteroids, "");
    Ok(())
}

#[test]
fn test_load_config_rejects_missing_or_invalid_files() -> Result<()> {
    let dir = TempDir::new()?;
    assert!(load_config(Some(dir.path().join("absent.json").as_path())).is_err());

    let invalid = dir.path().join("invalid.json");
    std::fs::write(&invalid, r#"{"expansion_depth": 0}"#)?;
    let err = load_config(Some(invalid.as_path())).unwrap_err();
    assert!(format!("{:#}", err).contains("expansion_depth"));

    let malformed = dir.path().join("malformed.json");
    std::fs::write(&malformed, "save_depth = 2")?;
    assert!(load_config(Some(malformed.as_path())).is_err());
    Ok(())
}

// =========================================================================
// Rendering
// =========================================================================

async fn open_session(dir: &TempDir) -> Result<GameSession> {
    let (save_path, data_dir) = write_game_files(dir)?;
    let sources = load_sources(&save_path, Some(data_dir.as_path())).await?;
    Ok(GameSession::open(ExplorerConfig::default(), sources)?)
}

#[tokio::test]
async fn test_render_stats() -> Result<()> {
    let dir = TempDir::new()?;
    let session = open_session(&dir).await?;

    let stats = render_stats(&session)?;

    assert!(stats.contains("Docked ships: 1 moved, 0 already in place"));
    assert!(stats.contains("Unplaced records: 1"));
    assert!(stats.contains("DynamicObjects 41 (parent 30)"));
    Ok(())
}

#[tokio::test]
async fn test_render_tree_outline_and_json() -> Result<()> {
    let dir = TempDir::new()?;
    let session = open_session(&dir).await?;

    let outline = render_tree(&session, View::SolarSystem, 1, false)?;
    let lines: Vec<&str> = outline.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Solar System"));
    assert!(lines[1].starts_with("  HELLION Star"));

    let json: Value = serde_json::from_str(&render_tree(&session, View::GameData, 1, true)?)?;
    assert_eq!(json["name"], "Game Data");
    assert_eq!(json["children"][0]["name"], "Save");
    assert_eq!(json["children"][1]["name"], "Static Data");
    assert!(json["children"][0].get("children").is_none());
    Ok(())
}

#[tokio::test]
async fn test_render_search_lists_paths() -> Result<()> {
    let dir = TempDir::new()?;
    let mut session = open_session(&dir).await?;

    let output = render_search(&mut session, View::SolarSystem, "outpost")?;

    assert_eq!(
        output,
        "Search: \"outpost\" (1 result(s))\n  Solar System > HELLION Star > PlanetB > OUT-12 Outpost\n"
    );
    Ok(())
}
