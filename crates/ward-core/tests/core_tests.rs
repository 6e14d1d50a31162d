use ward_core::{
    Detection, DetectionFrame, EvidenceRef, IncidentDraft, IncidentId, IncidentStatus, IssueKind,
    Location, Transition, WorkerId,
};

#[test]
fn status_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&IncidentStatus::Pending).unwrap(),
        "\"pending\""
    );
    assert_eq!(
        serde_json::from_str::<IncidentStatus>("\"verified\"").unwrap(),
        IncidentStatus::Verified
    );
}

#[test]
fn ids_serialize_transparently() {
    let id = IncidentId(42);
    assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    let w = WorkerId::new("worker_01");
    assert_eq!(serde_json::to_string(&w).unwrap(), "\"worker_01\"");
}

#[test]
fn transition_wire_shape_is_tagged() {
    let t = Transition::Assign {
        worker: WorkerId::new("worker_01"),
    };
    let v: serde_json::Value = serde_json::to_value(&t).unwrap();
    assert_eq!(v["op"], "assign");
    assert_eq!(v["worker"], "worker_01");
}

#[test]
fn incident_json_has_stable_field_names() {
    let incident = IncidentDraft {
        kind: IssueKind::new("pothole"),
        severity: Some("high".into()),
        location: Location {
            lat: 23.2599,
            lng: 77.4126,
            address: "MP Nagar".into(),
        },
        original: EvidenceRef::new("pothole_orig"),
    }
    .into_incident(IncidentId(1), 5_000);

    let v: serde_json::Value = serde_json::to_value(&incident).unwrap();
    assert_eq!(v["id"], 1);
    assert_eq!(v["kind"], "pothole");
    assert_eq!(v["status"], "pending");
    assert_eq!(v["location"]["lat"], 23.2599);
    assert_eq!(v["evidence"]["original"], "pothole_orig");
    assert!(v["evidence"]["resolved"].is_null());
    assert!(v["assigned_worker"].is_null());
}

#[test]
fn detection_frame_round_trips() {
    let frame = DetectionFrame {
        detections: vec![Detection {
            class: IssueKind::new("garbage"),
            confidence: 0.91,
        }],
        location: Location {
            lat: 12.9716,
            lng: 77.5946,
            address: "CAM_SECTOR_4 - Auto Alert".into(),
        },
        image: EvidenceRef::new("garbage_frame1"),
    };
    let json = serde_json::to_string(&frame).unwrap();
    let back: DetectionFrame = serde_json::from_str(&json).unwrap();
    assert_eq!(back.detections[0].class, IssueKind::new("garbage"));
    assert_eq!(back.image, EvidenceRef::new("garbage_frame1"));
}
