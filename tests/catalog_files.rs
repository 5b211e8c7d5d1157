use std::fs;
use std::path::Path;

use language_proximity::{
    CatalogError, Level, LoadError, ProximityService, load_config, table_to_view,
};
use tempfile::TempDir;

const WORDS: &str = r#"{
    "dog": {
        "topic": "animal",
        "nodes": [{ "id": "dog_en" }, { "id": "perro_es" }, { "id": "chien_fr" }],
        "edges": [
            { "source": "dog_en", "target": "perro_es", "weight": 0.2 },
            { "source": "chien_fr", "target": "dog_en", "weight": 0.4 }
        ]
    },
    "cat": {
        "topic": "animal",
        "nodes": [{ "id": "cat_en" }, { "id": "gato_es" }],
        "edges": [{ "source": "cat_en", "target": "gato_es", "weight": 0.5 }]
    },
    "carrot": {
        "topic": "vegetables",
        "nodes": [{ "id": "carrot_en" }, { "id": "zanahoria_es" }],
        "edges": [{ "source": "carrot_en", "target": "zanahoria_es", "weight": 0.1 }]
    }
}"#;

const TOPICS: &str = r#"{
    "animal": {
        "nodes": [{ "id": "animal_en" }, { "id": "animal_es" }, { "id": "animal_fr" }],
        "edges": [
            { "source": "animal_en", "target": "animal_es", "weight": 0.35 },
            { "source": "animal_en", "target": "animal_fr", "weight": 0.4 }
        ]
    },
    "vegetables": {
        "nodes": [{ "id": "vegetables_en" }, { "id": "vegetables_es" }],
        "edges": [{ "source": "vegetables_en", "target": "vegetables_es", "weight": 0.1 }]
    }
}"#;

const LANGUAGES: &str = r#"{
    "language": {
        "nodes": [{ "id": "en" }, { "id": "es" }, { "id": "fr" }],
        "edges": [
            { "source": "en", "target": "es", "weight": 0.25 },
            { "source": "en", "target": "fr", "weight": 0.4 },
            { "source": "es", "target": "fr", "weight": 0.6 }
        ]
    }
}"#;

fn write_data(root: &Path, words: &str) {
    let dir = root.join("data/analysis");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("word_distance.json"), words).unwrap();
    fs::write(dir.join("topic_proximity.json"), TOPICS).unwrap();
    fs::write(dir.join("global_proximity.json"), LANGUAGES).unwrap();
}

#[test]
fn test_service_from_default_layout() {
    let tmp = TempDir::new().unwrap();
    write_data(tmp.path(), WORDS);

    let config = load_config(tmp.path()).unwrap();
    let service = ProximityService::from_config(&config).unwrap();

    assert_eq!(
        service.list_graph_ids(Level::Word),
        vec!["dog", "cat", "carrot"]
    );
    assert_eq!(service.list_topics(), vec!["animal", "vegetables"]);

    let table = service.query_proximity("en", None);
    let names: Vec<&str> = table.rows().iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["animal", "vegetables", "AVERAGE"]);
    assert_eq!(table.average().get("es"), Some(0.25));
    assert_eq!(table.average().get("fr"), Some(0.4));
    assert_eq!(table.languages(), vec!["es", "fr"]);

    let table = service.query_proximity("en", Some("Animal"));
    let names: Vec<&str> = table.rows().iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["dog", "cat", "AVERAGE"]);
    assert_eq!(table.entries()[0].get("fr"), Some(0.4));
    assert_eq!(table.entries()[1].get("fr"), None);
    assert_eq!(table.baseline("es"), Some(0.35));

    let view = table_to_view(&table, service.heat_mapper());
    // dog/fr equals the baseline
    assert_eq!(view.rows[0].cells[1].color.as_deref(), Some("rgb(255,255,255)"));
}

#[test]
fn test_config_found_from_subdirectory() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("graphs");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("w.json"), WORDS).unwrap();
    fs::write(data.join("t.json"), TOPICS).unwrap();
    fs::write(data.join("l.json"), LANGUAGES).unwrap();
    fs::write(
        tmp.path().join(".proximity.toml"),
        r#"
            [data]
            word = "graphs/w.json"
            topic = "graphs/t.json"
            language = "graphs/l.json"

            [analysis]
            main_language = "es"

            [heatmap]
            cool_hue = 240.0
        "#,
    )
    .unwrap();

    let nested = tmp.path().join("a/b");
    fs::create_dir_all(&nested).unwrap();

    let config = load_config(&nested).unwrap();
    assert_eq!(config.analysis.main_language, "es");
    assert_eq!(config.base_dir, tmp.path());

    let service = ProximityService::from_config(&config).unwrap();
    assert_eq!(service.heat_mapper().cool_hue(), 240.0);

    let table = service.query_proximity(&config.analysis.main_language, None);
    assert_eq!(table.average().get("en"), Some(0.25));
    assert_eq!(table.average().get("fr"), Some(0.6));
}

#[test]
fn test_missing_file_fails_whole_catalog() {
    let tmp = TempDir::new().unwrap();
    write_data(tmp.path(), WORDS);
    fs::remove_file(tmp.path().join("data/analysis/topic_proximity.json")).unwrap();

    let config = load_config(tmp.path()).unwrap();
    let err = ProximityService::from_config(&config).unwrap_err();
    let CatalogError::Load { level, source } = err;
    assert_eq!(level, Level::Topic);
    assert!(matches!(source, LoadError::Io { .. }));
}

#[test]
fn test_malformed_word_graph_names_key() {
    let tmp = TempDir::new().unwrap();
    write_data(
        tmp.path(),
        r#"{ "dog": { "topic": "animal", "nodes": [{ "id": "dog_en" }] } }"#,
    );

    let config = load_config(tmp.path()).unwrap();
    let err = ProximityService::from_config(&config).unwrap_err();
    assert!(err.to_string().contains("word"), "{}", err);
    let CatalogError::Load { source, .. } = err;
    assert_eq!(source.graph_key(), Some("dog"));
}
