//! JsonSchema validation for the wire types accepted and emitted by dbrms.

use std::collections::BTreeMap;

use chrono::Utc;
use schemars::schema_for;
use rms_core::enums::{Affinity, HostStatus, OperationType};
use rms_core::model::*;
use rms_core::responses::Response;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! conforms_to_schema {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn sample_detail() -> ObjectDetail {
    ObjectDetail {
        group_mark: "backend".into(),
        device_class: vec!["SA3.2XLARGE32".into()],
        spec: Spec {
            cpu: MeasureRange::new(8, 16),
            mem: MeasureRange::new(32_000, 0),
        },
        storage_specs: vec![DiskSpec {
            disk_type: "SSD".into(),
            min_size: 100,
            max_size: 0,
            mount_point: "/data1".into(),
        }],
        location_spec: LocationSpec {
            city: "shenzhen".into(),
            sub_zone_ids: vec!["sz-1".into(), "sz-2".into()],
            include_or_exclude: true,
        },
        affinity: Affinity::CrossSubzone,
        count: 2,
        ..ObjectDetail::default()
    }
}

fn sample_host() -> HostRecord {
    let mut storage_device = BTreeMap::new();
    storage_device.insert(
        "/data1".to_string(),
        DiskInfo {
            size: 500,
            disk_type: "SSD".into(),
            disk_id: "disk-01".into(),
        },
    );
    HostRecord {
        bk_host_id: 101,
        ip: "10.0.0.1".into(),
        device_class: "SA3.2XLARGE32".into(),
        cpu_num: 8,
        dram_cap: 32_768,
        storage_device,
        city: "shenzhen".into(),
        sub_zone_id: "sz-1".into(),
        rack_id: "r-1".into(),
        status: HostStatus::Unused,
        ..HostRecord::default()
    }
}

conforms_to_schema!(
    request_conforms,
    RequestInputParam,
    RequestInputParam {
        resource_type: "MySQL".into(),
        for_biz_id: 3,
        details: vec![sample_detail()],
        action: ActionInfo {
            bill_id: "42".into(),
            operator: "admin".into(),
            ..ActionInfo::default()
        },
        ..RequestInputParam::default()
    }
);

conforms_to_schema!(host_conforms, HostRecord, sample_host());

conforms_to_schema!(
    allocation_envelope_conforms,
    Response<Vec<GroupAllocation>>,
    Response::ok(vec![GroupAllocation {
        item: "backend".into(),
        data: vec![sample_host()],
    }])
);

conforms_to_schema!(
    operation_record_conforms,
    OperationRecord,
    OperationRecord {
        request_id: "req-1".into(),
        total_count: 1,
        operation_type: OperationType::Consumed,
        bk_host_ids: vec![101],
        ip_list: vec!["10.0.0.1".into()],
        bill_id: "42".into(),
        bill_type: "MYSQL_HA_APPLY".into(),
        task_id: String::new(),
        operator: "admin".into(),
        status: "consumed".into(),
        description: String::new(),
        create_time: Utc::now(),
        update_time: Utc::now(),
    }
);

#[test]
fn request_roundtrips_through_json() {
    let param = RequestInputParam {
        details: vec![sample_detail()],
        groups_in_same_location: true,
        ..RequestInputParam::default()
    };
    let json = serde_json::to_string_pretty(&param).unwrap();
    let back: RequestInputParam = serde_json::from_str(&json).unwrap();
    pretty_assertions::assert_eq!(back, param);
}
