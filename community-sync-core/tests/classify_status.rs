mod common;

use chrono::TimeZone;
use chrono::Utc;

use common::{full_analysis, record};
use community_sync_core::classify::classify;
use community_sync_core::config::SyncConfig;
use community_sync_core::contract::{AnalysisResult, InterestGroup, RecordTimestamp};

fn config() -> SyncConfig {
    SyncConfig::default()
}

#[test]
fn missing_record_classifies_as_not_scraped() {
    let row = classify("cars", None, 0, &config());

    assert_eq!(row.community, "cars");
    assert_eq!(row.status, "Not scraped");
    assert_eq!(row.reason, "Not found in \"campaign_results\"");
    assert_eq!(row.interest_group, "");
    assert_eq!(row.documents, 0);
    assert_eq!(row.date, "");
    assert!(!row.publish);
    assert!(!row.topic_model_analysis);
    assert!(!row.market_profile);
    assert!(!row.psych_data);
}

#[test]
fn document_volume_gates_everything_downstream() {
    // Full analysis present, but one document short of the threshold.
    let record = record("cars", Some(full_analysis()));
    let row = classify("cars", Some(&record), 199, &config());

    assert_eq!(row.status, "Not scraped");
    assert_eq!(row.reason, "Documents < 200");
    assert!(!row.publish);
    assert!(!row.topic_model_analysis);
    assert!(!row.market_profile);
    assert!(!row.psych_data);
}

#[test]
fn threshold_is_inclusive_at_200() {
    let record = record("cars", Some(full_analysis()));
    let row = classify("cars", Some(&record), 200, &config());

    assert_eq!(row.status, "Finished");
    assert_eq!(row.reason, "");
    assert!(row.publish);
    assert!(row.topic_model_analysis);
    assert!(row.market_profile);
    assert!(row.psych_data);
}

#[test]
fn missing_analysis_object_classifies_as_not_analysed() {
    let record = record("cars", None);
    let row = classify("cars", Some(&record), 500, &config());

    assert_eq!(row.status, "Not analysed");
    assert_eq!(row.reason, "Not found \"reddit object\"");
    assert!(!row.publish);
    assert!(!row.topic_model_analysis);
}

#[test]
fn missing_topic_model_only() {
    let record = record(
        "cars",
        Some(AnalysisResult {
            topic_model: false,
            market_profile: true,
            psych_data: true,
        }),
    );
    let row = classify("cars", Some(&record), 500, &config());

    assert_eq!(row.status, "Not analysed");
    assert_eq!(row.reason, "Not found: topicModelAnalysis");
    assert!(!row.topic_model_analysis);
    assert!(row.market_profile);
    assert!(row.psych_data);
    assert!(!row.publish);
}

#[test]
fn missing_market_profile_only() {
    let record = record(
        "cars",
        Some(AnalysisResult {
            topic_model: true,
            market_profile: false,
            psych_data: true,
        }),
    );
    let row = classify("cars", Some(&record), 500, &config());

    assert_eq!(row.status, "Not profiled");
    assert_eq!(row.reason, "Not found: marketprofile");
    assert!(row.topic_model_analysis);
    assert!(!row.market_profile);
    assert!(row.psych_data);
}

#[test]
fn missing_both_profile_stages_lists_psych_data_first() {
    let record = record(
        "cars",
        Some(AnalysisResult {
            topic_model: true,
            market_profile: false,
            psych_data: false,
        }),
    );
    let row = classify("cars", Some(&record), 500, &config());

    assert_eq!(row.status, "Not profiled");
    assert_eq!(row.reason, "Not found: psychData,marketprofile");
}

#[test]
fn all_stages_missing_joins_statuses_in_topic_then_profile_order() {
    let record = record("cars", Some(AnalysisResult::default()));
    let row = classify("cars", Some(&record), 500, &config());

    assert_eq!(row.status, "Not analysed,Not profiled");
    assert_eq!(
        row.reason,
        "Not found: topicModelAnalysis,psychData,marketprofile"
    );
    assert!(!row.publish);
}

#[test]
fn publish_flag_set_iff_status_is_exactly_finished() {
    let cases = vec![
        (None, 0),
        (Some(record("cars", None)), 500),
        (Some(record("cars", Some(full_analysis()))), 199),
        (Some(record("cars", Some(AnalysisResult::default()))), 500),
        (Some(record("cars", Some(full_analysis()))), 500),
    ];

    for (record, documents) in cases {
        let row = classify("cars", record.as_ref(), documents, &config());
        assert_eq!(
            row.publish,
            row.status == "Finished",
            "publish flag must track Finished status, got {:?}",
            row
        );
    }
}

#[test]
fn nan_interest_group_normalizes_to_empty() {
    let mut r = record("cars", Some(full_analysis()));
    r.interest_group = Some(InterestGroup::Number(f64::NAN));
    let row = classify("cars", Some(&r), 500, &config());
    assert_eq!(row.interest_group, "");

    r.interest_group = Some(InterestGroup::Number(7.0));
    let row = classify("cars", Some(&r), 500, &config());
    assert_eq!(row.interest_group, "7");

    r.interest_group = Some(InterestGroup::Text("Automotive".to_string()));
    let row = classify("cars", Some(&r), 500, &config());
    assert_eq!(row.interest_group, "Automotive");
}

#[test]
fn structured_timestamps_render_in_the_configured_zone() {
    let mut r = record("cars", Some(full_analysis()));

    // Summer: Bratislava is UTC+2.
    let summer = Utc.with_ymd_and_hms(2023, 6, 15, 10, 0, 0).unwrap();
    r.timestamp = Some(RecordTimestamp::DateTime(summer));
    let row = classify("cars", Some(&r), 500, &config());
    assert_eq!(row.date, "2023-06-15 12:00:00");

    // Winter: UTC+1.
    let winter = Utc.with_ymd_and_hms(2023, 1, 15, 10, 0, 0).unwrap();
    r.timestamp = Some(RecordTimestamp::DateTime(winter));
    let row = classify("cars", Some(&r), 500, &config());
    assert_eq!(row.date, "2023-01-15 11:00:00");
}

#[test]
fn raw_timestamps_pass_through_unchanged() {
    let mut r = record("cars", Some(full_analysis()));
    r.timestamp = Some(RecordTimestamp::Raw("sometime in March".to_string()));
    let row = classify("cars", Some(&r), 500, &config());
    assert_eq!(row.date, "sometime in March");
}

#[test]
fn threshold_is_configuration_and_drives_the_reason_string() {
    let config = SyncConfig {
        document_threshold: 50,
        ..SyncConfig::default()
    };
    let record = record("cars", Some(full_analysis()));

    let row = classify("cars", Some(&record), 49, &config);
    assert_eq!(row.status, "Not scraped");
    assert_eq!(row.reason, "Documents < 50");

    let row = classify("cars", Some(&record), 50, &config);
    assert_eq!(row.status, "Finished");
}
