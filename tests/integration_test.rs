// End-to-end tests for morphmatch
use morphmatch::prelude::*;
use morphmatch_api::MatchService;
use morphmatch_core::{CatalogError, MatchCondition, RecordingObserver};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

fn male(id: &str, muscularity: &str, min: f64, max: f64, morph: f64, muscle: f64) -> Archetype {
    Archetype::new(id, Gender::Masculine, BmiRange::new(min, max).unwrap(), morph, muscle)
        .with_labels("Normal", muscularity, "Intermédiaire", "Mésomorphe")
}

fn female(id: &str, muscularity: &str, min: f64, max: f64) -> Archetype {
    Archetype::new(id, Gender::Feminine, BmiRange::new(min, max).unwrap(), 0.0, 0.0)
        .with_labels("Normal", muscularity, "Intermédiaire", "Mésomorphe")
}

fn write_catalog(value: serde_json::Value) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_vec(&value).unwrap().as_slice())
        .unwrap();
    file
}

#[test]
fn test_single_muscular_archetype_strict() {
    let catalog = InMemoryCatalog::from_archetypes(&[male("M-01", "Musclé", 21.0, 25.0, 0.15, 0.35)]);
    let profile = SemanticProfile::new(Sex::Male, 23.0)
        .with_muscularity("musclé")
        .with_indices(0.1, 0.3);

    let result = match_archetypes(&catalog, &profile, None).unwrap();

    assert_eq!(result.strategy_used, BmiStrategy::Strict);
    assert_eq!(result.ids(), vec!["M-01"]);
    assert!(result.selected_archetypes[0].overall_score > 0.8);
    assert_eq!(result.canonical_muscularity, MuscularityLevel::Muscular);
    assert_eq!(result.canonical_muscularity.label(), "Musclé");
}

#[test]
fn test_out_of_range_bmi_returns_empty_selection() {
    let catalog = InMemoryCatalog::from_archetypes(&[
        male("M-01", "Normal", 18.5, 22.0, 0.0, 0.0),
        male("M-02", "Normal", 22.0, 25.0, 0.0, 0.0),
    ]);
    let profile = SemanticProfile::new(Sex::Male, 45.0).with_muscularity("normal");

    let result = match_archetypes(&catalog, &profile, None).unwrap();

    assert!(result.is_empty());
    assert_eq!(result.strategy_used, BmiStrategy::BmiRelaxed);
    assert_eq!(result.filtering_stats.after_bmi_strict, 0);
    assert_eq!(result.filtering_stats.after_bmi_relaxed, Some(0));
    assert_eq!(result.semantic_coherence_score, 0.0);
}

#[test]
fn test_exact_categorical_match_ranks_higher() {
    let plain = Archetype::new("plain", Gender::Masculine, BmiRange::new(21.0, 25.0).unwrap(), 0.1, 0.2)
        .with_labels("Surpoids", "Musclé", "Avancé", "Endomorphe");
    let exact = Archetype::new("exact", Gender::Masculine, BmiRange::new(21.0, 25.0).unwrap(), 0.1, 0.2)
        .with_labels("Normal", "Musclé", "Intermédiaire", "Mésomorphe");
    let catalog = InMemoryCatalog::from_archetypes(&[plain, exact]);

    let profile = SemanticProfile::new(Sex::Male, 23.0)
        .with_muscularity("Musclé")
        .with_obesity("Normal")
        .with_level("Intermédiaire")
        .with_morphotype("Mésomorphe")
        .with_indices(0.1, 0.2);

    let result = match_archetypes(&catalog, &profile, None).unwrap();

    assert_eq!(result.ids(), vec!["exact", "plain"]);
    assert!(result.selected_archetypes[0].overall_score > result.selected_archetypes[1].overall_score);
    assert_eq!(result.selected_archetypes[0].semantic_match, 1.0);
}

#[test]
fn test_relaxed_pass_recovers_candidates() {
    let catalog = InMemoryCatalog::from_archetypes(&[
        male("M-01", "Normal", 22.0, 25.0, 0.25, 0.0),
        male("M-02", "Normal", 25.0, 28.0, 0.0, 0.0),
    ]);
    // 31 misses both strict bands but falls inside both relaxed ones
    let profile = SemanticProfile::new(Sex::Male, 31.0).with_muscularity("Normal");

    let result = match_archetypes(&catalog, &profile, None).unwrap();

    assert_eq!(result.strategy_used, BmiStrategy::BmiRelaxed);
    assert_eq!(result.ids(), vec!["M-02", "M-01"]);
    assert!(result
        .filtering_stats
        .conditions
        .contains(&MatchCondition::InsufficientCandidatesAfterBmiFilter { found: 0, required: 2 }));
}

#[test]
fn test_gender_is_respected() {
    let catalog = InMemoryCatalog::from_archetypes(&[
        male("M-01", "Normal", 20.0, 26.0, 0.0, 0.0),
        female("F-01", "Moyennement musclée", 20.0, 26.0),
        female("F-02", "Plus musclée", 20.0, 26.0),
    ]);
    let profile = SemanticProfile::new(Sex::Female, 23.0).with_muscularity("moyennement musclée");

    let result = match_archetypes(&catalog, &profile, None).unwrap();

    assert!(result
        .selected_archetypes
        .iter()
        .all(|s| s.archetype.gender == Gender::Feminine));
    assert_eq!(result.best().unwrap().archetype.id, "F-01");
}

#[test]
fn test_unmapped_muscularity_is_reported_and_tolerated() {
    let catalog = InMemoryCatalog::from_archetypes(&[
        male("M-01", "Normal", 21.0, 25.0, 0.0, 0.0),
        male("M-02", "Athlétique", 21.0, 25.0, 0.0, 0.0),
    ]);
    let profile = SemanticProfile::new(Sex::Male, 23.0).with_muscularity("xyzzy");
    let observer = RecordingObserver::default();

    let result = Matcher::default()
        .match_archetypes_observed(&catalog, &profile, None, &observer)
        .unwrap();

    assert_eq!(result.canonical_muscularity, MuscularityLevel::Normal);
    assert!(observer.unmapped().contains(&"xyzzy".to_string()));
    assert!(result.filtering_stats.muscularity_gate_applied);
}

#[test]
fn test_limit_caps_selection() {
    let archetypes: Vec<Archetype> = (0..10)
        .map(|i| male(&format!("M-{i:02}"), "Normal", 20.0, 26.0, i as f64 * 0.05, 0.0))
        .collect();
    let catalog = InMemoryCatalog::from_archetypes(&archetypes);
    let profile = SemanticProfile::new(Sex::Male, 23.0).with_muscularity("Normal");

    assert_eq!(match_archetypes(&catalog, &profile, None).unwrap().selected_archetypes.len(), 5);
    assert_eq!(match_archetypes(&catalog, &profile, Some(3)).unwrap().selected_archetypes.len(), 3);
    assert_eq!(match_archetypes(&catalog, &profile, Some(50)).unwrap().selected_archetypes.len(), 10);
}

#[test]
fn test_empty_catalog_is_unavailable() {
    let catalog = InMemoryCatalog::from_archetypes(&[female("F-01", "Plus musclée", 20.0, 26.0)]);
    let profile = SemanticProfile::new(Sex::Male, 23.0);

    let err = match_archetypes(&catalog, &profile, None).unwrap_err();
    assert!(matches!(err, Error::CatalogUnavailable(_)));
}

#[test]
fn test_json_file_catalog_end_to_end() {
    let file = write_catalog(json!({
        "archetypes": [
            {
                "id": 1,
                "gender": "masculine",
                "obesity": "Normal",
                "muscularity": "Musclé",
                "level": "Intermédiaire",
                "morphotype": "Mésomorphe",
                "morph_index": 0.15,
                "muscle_index": 0.35,
                "bmi_range": [21.0, 25.0],
                "payload": {"shoulders": 1.1}
            },
            {
                "id": "broken",
                "gender": "masculine",
                "muscularity": "Musclé",
                "bmi_range": [30.0, 20.0]
            },
            {
                "id": "F-1",
                "gender": "feminine",
                "muscularity": "Plus musclée",
                "bmi_range": {"min": 19.0, "max": 23.0}
            }
        ]
    }));

    let catalog = JsonFileCatalog::open(file.path()).unwrap();
    assert_eq!(catalog.len(), 3);

    let profile: SemanticProfile = serde_json::from_value(json!({
        "sex": "male",
        "bmi": 23.0,
        "muscularity": "musclé",
        "morph_index": 0.1,
        "muscle_index": 0.3
    }))
    .unwrap();

    let result = match_archetypes(&catalog, &profile, None).unwrap();

    assert_eq!(result.ids(), vec!["1"]);
    assert_eq!(result.filtering_stats.total_fetched, 2);
    assert_eq!(result.filtering_stats.invalid_skipped, 1);
    assert!(result.catalog_fingerprint.is_some());
    assert_eq!(
        result.selected_archetypes[0].archetype.payload,
        Some(json!({"shoulders": 1.1}))
    );
}

#[test]
fn test_unknown_gender_row_is_skipped_not_fatal() {
    let file = write_catalog(json!([
        {"id": "M-01", "gender": "masculine", "muscularity": "Normal",
         "morph_index": 0.0, "muscle_index": 0.0, "bmi_range": [20.0, 26.0]},
        {"id": "M-02", "gender": "masculine", "muscularity": "Normal",
         "morph_index": 0.1, "muscle_index": 0.0, "bmi_range": [21.0, 25.0]},
        {"id": "U-01", "gender": "unisex", "muscularity": "Normal",
         "morph_index": 0.0, "muscle_index": 0.0, "bmi_range": [20.0, 26.0]}
    ]));

    let catalog = JsonFileCatalog::open(file.path()).unwrap();
    let profile = SemanticProfile::new(Sex::Male, 23.0).with_muscularity("Normal");
    let observer = RecordingObserver::default();

    let result = Matcher::default()
        .match_archetypes_observed(&catalog, &profile, None, &observer)
        .unwrap();

    assert_eq!(result.ids(), vec!["M-01", "M-02"]);
    assert_eq!(result.strategy_used, BmiStrategy::Strict);
    assert_eq!(result.filtering_stats.invalid_skipped, 1);
    assert!(observer.events().iter().any(|e| matches!(
        e,
        morphmatch_core::ObservedEvent::InvalidArchetype { id, .. } if id == "U-01"
    )));
}

#[test]
fn test_selection_serializes_with_wire_names() {
    let catalog = InMemoryCatalog::from_archetypes(&[male("M-01", "Musclé", 21.0, 25.0, 0.15, 0.35)]);
    let profile = SemanticProfile::new(Sex::Male, 23.0).with_muscularity("musclé");

    let result = match_archetypes(&catalog, &profile, None).unwrap();
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["strategy_used"], "strict");
    assert!(value["filtering_stats"]["totalFetched"].is_number());
    assert_eq!(value["selected_archetypes"][0]["bmi_range"], json!([21.0, 25.0]));
    assert!(value["selected_archetypes"][0]["overall_score"].is_number());
}

struct SlowCatalog(InMemoryCatalog);

impl ArchetypeCatalog for SlowCatalog {
    fn fetch_archetypes(&self, gender: Gender) -> std::result::Result<Vec<ArchetypeRecord>, CatalogError> {
        std::thread::sleep(Duration::from_millis(300));
        self.0.fetch_archetypes(gender)
    }
}

#[tokio::test]
async fn test_service_times_out_slow_catalog() {
    let catalog = SlowCatalog(InMemoryCatalog::from_archetypes(&[male("M-01", "Normal", 20.0, 26.0, 0.0, 0.0)]));
    let service = MatchService::new(Arc::new(catalog), Matcher::default())
        .with_fetch_timeout(Duration::from_millis(20));

    let err = service
        .match_profile(&SemanticProfile::new(Sex::Male, 23.0), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CatalogUnavailable(_)));
}

#[tokio::test]
async fn test_service_matches_within_timeout() {
    let catalog = Arc::new(InMemoryCatalog::from_archetypes(&[
        male("M-01", "Normal", 20.0, 26.0, 0.0, 0.0),
        male("M-02", "Normal", 21.0, 25.0, 0.0, 0.0),
    ]));
    let service = MatchService::new(catalog, Matcher::default());

    let result = service
        .match_profile(&SemanticProfile::new(Sex::Male, 23.0).with_muscularity("Normal"), Some(1))
        .await
        .unwrap();
    assert_eq!(result.selected_archetypes.len(), 1);
    assert_eq!(result.strategy_used, BmiStrategy::Strict);
}

#[test]
fn test_ranking_invariants_on_random_catalogs() {
    use rand::Rng;

    let mut rng = rand::rng();
    let levels = MuscularityLevel::ALL;

    for _ in 0..50 {
        let archetypes: Vec<Archetype> = (0..rng.random_range(1..30))
            .map(|i| {
                let min = rng.random_range(15.0..35.0);
                let level = levels[rng.random_range(0..levels.len())];
                male(
                    &format!("M-{i}"),
                    level.label(),
                    min,
                    min + rng.random_range(0.0..6.0),
                    rng.random_range(-0.5..0.5),
                    rng.random_range(-1.0..1.0),
                )
            })
            .collect();
        let catalog = InMemoryCatalog::from_archetypes(&archetypes);
        let level = levels[rng.random_range(0..levels.len())];
        let profile = SemanticProfile::new(Sex::Male, rng.random_range(14.0..45.0))
            .with_muscularity(level.label())
            .with_indices(rng.random_range(-0.5..0.5), rng.random_range(-1.0..1.0));

        let result = match_archetypes(&catalog, &profile, None).unwrap();

        assert!(result.selected_archetypes.len() <= 5);
        for pair in result.selected_archetypes.windows(2) {
            assert!(pair[0].overall_score >= pair[1].overall_score);
        }
        for scored in &result.selected_archetypes {
            assert!((0.0..=1.0).contains(&scored.overall_score));
        }
        assert!((0.0..=1.0).contains(&result.semantic_coherence_score));
    }
}
