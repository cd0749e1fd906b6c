use std::collections::HashSet;

use quake_feed::codes::TsunamiGrade;
use quake_feed::domain::{ConfidenceTier, Earthquake};
use quake_feed::{normalize_record, CanonicalEvent, NormalizeError, NormalizationRegistry};
use serde_json::json;

fn earthquake(value: serde_json::Value) -> Earthquake {
    match normalize_record(&value).unwrap() {
        CanonicalEvent::Earthquake(eq) => eq,
        other => panic!("expected earthquake, got {:?}", other),
    }
}

fn bulletin() -> serde_json::Value {
    json!({
        "_id": {"$oid": "65927a1b2c3d4e5f60718293"},
        "code": 551,
        "issue": {"time": "2024/01/01 16:12:00", "type": "DetailScale"},
        "earthquake": {
            "time": "2024/01/01 16:10:00",
            "maxScale": 70,
            "domesticTsunami": "Warning",
            "foreignTsunami": "None",
            "hypocenter": {"name": "石川県能登地方", "depth": 0, "magnitude": 7.6}
        },
        "points": [
            {"pref": "石川県", "addr": "輪島市門前町走出", "isArea": false, "scale": 60},
            {"pref": "石川県", "addr": "志賀町香能", "isArea": false, "scale": 70},
            {"pref": "石川県", "addr": "輪島市鳳至町", "isArea": false, "scale": 70},
            {"pref": "新潟県", "addr": "長岡市小国町法坂", "isArea": false, "scale": 50},
            {"pref": "石川県", "addr": "七尾市本府中町", "isArea": false, "scale": 46},
            {"pref": "新潟県", "addr": "長岡市中之島", "isArea": false, "scale": 45}
        ]
    })
}

#[test]
fn test_earthquake_end_to_end() {
    let eq = earthquake(bulletin());

    assert_eq!(eq.object_id.as_deref(), Some("65927a1b2c3d4e5f60718293"));
    assert_eq!(eq.max_scale, "7");
    assert_eq!(eq.issue_type, "DetailScale");
    assert_eq!(eq.issue_time, "01月01日16時12分頃");
    assert_eq!(eq.hypocenter, "石川県能登地方 (ごく浅い深さ) M7.6");
    assert_eq!(eq.tsunami, "津波予報 発表中");
    assert_eq!(eq.foreign_tsunami, "津波の心配なし");

    let ishikawa = &eq.points[0];
    assert_eq!(ishikawa.pref, "石川県");
    assert_eq!(ishikawa.points[0].scale, "7");
    assert_eq!(ishikawa.points[0].joined(), "志賀町、輪島市");
    assert_eq!(ishikawa.points[1].scale, "5弱以上と推定");
    assert_eq!(ishikawa.points[1].points, vec!["七尾市".to_string()]);

    let niigata = &eq.points[1];
    assert_eq!(niigata.points.len(), 1);
    assert_eq!(niigata.points[0].scale, "5強");
}

#[test]
fn test_localities_unique_and_intensity_non_increasing() {
    let eq = earthquake(bulletin());

    for pref in &eq.points {
        let mut seen = HashSet::new();
        let mut previous = i64::MAX;
        for group in &pref.points {
            assert!(group.scale_code <= previous);
            previous = group.scale_code;
            for locality in &group.points {
                assert!(seen.insert(locality.clone()), "duplicate locality {}", locality);
            }
        }
    }
}

#[test]
fn test_estimated_level_matches_forty_four() {
    let with_46 = earthquake(json!({
        "code": 551,
        "points": [{"pref": "P", "addr": "A市", "scale": 46}]
    }));
    let with_44 = earthquake(json!({
        "code": 551,
        "points": [{"pref": "P", "addr": "A市", "scale": 44}]
    }));

    assert_eq!(with_46.points, with_44.points);
    assert_eq!(with_46.points_by_scale, with_44.points_by_scale);
}

#[test]
fn test_normalization_is_deterministic() {
    let record = bulletin();
    assert_eq!(normalize_record(&record).unwrap(), normalize_record(&record).unwrap());
}

#[test]
fn test_unparseable_time_renders_unknown() {
    let eq = earthquake(json!({"code": 551, "earthquake": {"time": "not-a-date"}}));
    assert_eq!(eq.occurred_time, "不明");
    assert_eq!(eq.short_time, "不明");
}

#[test]
fn test_tsunami_summary() {
    let event = normalize_record(&json!({
        "code": 552,
        "issue": {"time": "2024/01/01 16:22:00"},
        "areas": [
            {"name": "新潟県上中下越", "grade": "Warning", "firstHeight": {"condition": "ただちに津波来襲と推測"}},
            {"name": "石川県能登", "grade": "MajorWarning", "immediate": true},
            {"name": "富山県", "grade": "Warning"}
        ]
    }))
    .unwrap();

    let CanonicalEvent::Tsunami(t) = event else {
        panic!("expected tsunami");
    };
    assert_eq!(t.max_grade, Some(TsunamiGrade::MajorWarning));
    assert_eq!(t.area_by_grade.len(), 2);
    assert_eq!(t.area_by_grade[1].areas[0].arrival_time, "ただちに来襲");
    assert_eq!(t.area_by_grade[1].areas[1].name, "富山県");
}

#[test]
fn test_early_warning_regions_are_distinct() {
    let event = normalize_record(&json!({
        "code": 556,
        "issue": {"time": "2024/01/01 16:10:30", "serial": "3"},
        "earthquake": {"hypocenter": {"name": "能登半島沖"}},
        "areas": [{"pref": "石川"}, {"pref": "富山"}, {"pref": "石川"}]
    }))
    .unwrap();

    let CanonicalEvent::EarlyWarning(w) = event else {
        panic!("expected early warning");
    };
    assert_eq!(w.areas, vec!["石川".to_string(), "富山".to_string()]);
    assert_eq!(w.hypocenter, "能登半島沖");
}

#[test]
fn test_felt_report_confidence_floor() {
    let event = normalize_record(&json!({
        "code": 9611,
        "started_at": "2024/01/01 16:10:00",
        "updated_at": "2024/01/01 16:11:00",
        "area_confidences": {"270": {"confidence": 0.05}, "250": {"confidence": 0.1}}
    }))
    .unwrap();

    let CanonicalEvent::FeltReport(f) = event else {
        panic!("expected felt report");
    };
    assert_eq!(f.area_by_confidence.len(), 2);
    assert_eq!(f.area_by_confidence[0].confidence, ConfidenceTier::A);
    assert_eq!(f.area_by_confidence[0].areas, vec!["東京".to_string()]);
    assert_eq!(f.area_by_confidence[1].confidence, ConfidenceTier::C);
    assert_eq!(f.area_by_confidence[1].areas, vec!["神奈川東部".to_string()]);
}

#[test]
fn test_unknown_discriminant_passes_through() {
    let record = json!({"code": 561, "areas": [1, 2]});
    assert_eq!(normalize_record(&record).unwrap(), CanonicalEvent::Unknown(record));
}

#[test]
fn test_bad_discriminants_are_errors() {
    assert!(matches!(
        normalize_record(&json!({"time": "2024/01/01 00:00:00"})),
        Err(NormalizeError::MissingDiscriminant)
    ));
    assert!(matches!(
        normalize_record(&json!({"code": "551"})),
        Err(NormalizeError::InvalidDiscriminant(_))
    ));
}

#[test]
fn test_canonical_event_serializes_with_kind_tag() {
    let registry = NormalizationRegistry::new();
    let event = registry.normalize(&json!({"_id": "x", "code": 556})).unwrap();

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["kind"], "early_warning");
    assert_eq!(value["event"]["object_id"], "x");
    assert_eq!(value["event"]["code"], 556);
}
