//! Integration test: reshaping a profile record into view models
//!
//! Exercises the three descriptor shapes, compute steps and nested mappers
//! against a realistic nested source.

use std::cmp::Ordering;

use objmap::compute::{chain, each};
use objmap::{ABSENT, Compute, Error, MappingConfig, Value, map_object, mapper};
use serde_json::json;

fn profile() -> Value {
    json!({
        "name": "Prabu",
        "lastName": "Rajan",
        "age": 39,
        "education": {
            "qualification": "B.E (Mech)",
            "school": { "name": "VHN", "city": "Madurai", "year": 1996 },
            "undergrad": {
                "name": "TCE",
                "city": "Madurai",
                "year": 2000,
                "university": "MKU"
            }
        },
        "experience": [
            {
                "type": "employed",
                "employer": "Wipro Systems",
                "yearOfJoining": 2003,
                "yearOfLeaving": 2004,
                "designation": "SDE"
            },
            {
                "type": "employed",
                "employer": "Zoho Systems",
                "yearOfJoining": 2000,
                "yearOfLeaving": 2003,
                "designation": "SDE"
            },
            {
                "type": "employed",
                "employer": "Oracle India",
                "yearOfJoining": 2004,
                "designation": "SDE"
            }
        ],
        "addresses": [
            {
                "type": "office",
                "city": "bangalore",
                "area": "koramangala",
                "street": "chikka audugodi",
                "number": "29"
            },
            {
                "type": "residence",
                "city": "bangalore",
                "area": "bellandur",
                "street": "Adarsh palm retreat",
                "number": "D002"
            }
        ]
    })
}

fn join(separator: &'static str) -> Compute {
    Compute::new(move |value| {
        let items = value
            .as_array()
            .ok_or_else(|| Error::type_mismatch("array", &value))?;
        let parts: Vec<String> = items
            .iter()
            .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_string))
            .collect();
        Ok(Value::String(parts.join(separator)))
    })
}

fn find_by(key: &'static str, expected: &'static str) -> Compute {
    Compute::new(move |value| {
        let items = value
            .as_array()
            .ok_or_else(|| Error::type_mismatch("array", &value))?;
        Ok(items
            .iter()
            .find(|item| item[key] == expected)
            .cloned()
            .unwrap_or(ABSENT))
    })
}

fn sort_by(key: &'static str) -> Compute {
    Compute::new(move |value| match value {
        Value::Array(mut items) => {
            items.sort_by(|a, b| {
                a[key]
                    .as_f64()
                    .partial_cmp(&b[key].as_f64())
                    .unwrap_or(Ordering::Equal)
            });
            Ok(Value::Array(items))
        }
        other => Err(Error::type_mismatch("array", &other)),
    })
}

fn pluck(key: &'static str) -> Compute {
    each(move |item: Value| -> objmap::Result<Value> { Ok(item[key].clone()) })
}

#[test]
fn maps_simple_property() {
    let config = MappingConfig::new().path("name", "name");
    let result = map_object(&config, &profile()).unwrap();
    assert_eq!(result, json!({ "name": "Prabu" }));
}

#[test]
fn maps_hierarchical_path() {
    let config = MappingConfig::new().path("cityOfSchool", "education.school.city");
    let result = map_object(&config, &profile()).unwrap();
    assert_eq!(result, json!({ "cityOfSchool": "Madurai" }));
}

#[test]
fn maps_mixed_path_list() {
    let config = MappingConfig::new().paths("result", ["name", "education.qualification"]);
    let result = map_object(&config, &profile()).unwrap();
    assert_eq!(result, json!({ "result": ["Prabu", "B.E (Mech)"] }));
}

#[test]
fn maps_computed_property() {
    let config = MappingConfig::new().compute("fullName", ["name", "lastName"], join(" "));
    let result = map_object(&config, &profile()).unwrap();
    assert_eq!(result, json!({ "fullName": "Prabu Rajan" }));
}

#[test]
fn maps_mixed_configuration() {
    let config = MappingConfig::new()
        .path("degree", "education.qualification")
        .compute("residenceAddress", "addresses", find_by("type", "residence"))
        .compute("fullName", ["name", "lastName"], join(" "))
        .compute(
            "employers",
            "experience",
            chain([sort_by("yearOfJoining"), pluck("employer")]),
        );

    let result = map_object(&config, &profile()).unwrap();
    assert_eq!(
        result,
        json!({
            "degree": "B.E (Mech)",
            "residenceAddress": {
                "type": "residence",
                "city": "bangalore",
                "area": "bellandur",
                "street": "Adarsh palm retreat",
                "number": "D002"
            },
            "fullName": "Prabu Rajan",
            "employers": ["Zoho Systems", "Wipro Systems", "Oracle India"]
        })
    );
}

#[test]
fn maps_nested_mapper_over_array() {
    let address_config = MappingConfig::new().path("type", "type").compute(
        "fullAddress",
        ["number", "street", "area", "city"],
        join(", "),
    );
    let config = MappingConfig::new()
        .compute("fullName", ["name", "lastName"], join(" "))
        .compute("addresses", "addresses", each(mapper(address_config)));

    let result = map_object(&config, &profile()).unwrap();
    assert_eq!(
        result,
        json!({
            "fullName": "Prabu Rajan",
            "addresses": [
                {
                    "type": "office",
                    "fullAddress": "29, chikka audugodi, koramangala, bangalore"
                },
                {
                    "type": "residence",
                    "fullAddress": "D002, Adarsh palm retreat, bellandur, bangalore"
                }
            ]
        })
    );
}

#[test]
fn maps_doubly_nested_mappers() {
    let school = MappingConfig::new()
        .path("name", "name")
        .compute("where", ["city", "year"], join(" / "));
    let education = MappingConfig::new()
        .path("degree", "qualification")
        .compute("school", "school", mapper(school))
        .compute("college", "undergrad", mapper(MappingConfig::new().path("name", "name")));
    let config = MappingConfig::new().compute("education", "education", mapper(education));

    let result = map_object(&config, &profile()).unwrap();
    assert_eq!(
        result,
        json!({
            "education": {
                "degree": "B.E (Mech)",
                "school": { "name": "VHN", "where": "Madurai / 1996" },
                "college": { "name": "TCE" }
            }
        })
    );
}

#[test]
fn invalid_property_maps_to_absent() {
    let config = MappingConfig::new().path("name", "fullName");
    let result = map_object(&config, &profile()).unwrap();
    assert_eq!(result, json!({ "name": null }));
    assert!(result.as_object().unwrap().contains_key("name"));
}

#[test]
fn compute_on_invalid_property_fails() {
    let config = MappingConfig::new().compute("name", "fullName", |name: Value| {
        name.as_str()
            .map(|s| Value::String(format!("{s}bomb!")))
            .ok_or_else(|| Error::type_mismatch("string", &name))
    });

    let err = map_object(&config, &profile()).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
    assert_eq!(err.to_string(), "Type mismatch: expected string, found null");
}

#[test]
fn compute_error_variant_is_preserved() {
    let config = MappingConfig::new().compute("age", "age", |_: Value| -> objmap::Result<Value> {
        Err(Error::compute("age is private"))
    });

    let err = map_object(&config, &profile()).unwrap_err();
    assert_eq!(err, Error::Compute("age is private".to_string()));
}

#[test]
fn nested_mapper_failure_propagates() {
    let inner = MappingConfig::new().compute("upper", "missing", |value: Value| {
        value
            .as_str()
            .map(|s| Value::String(s.to_uppercase()))
            .ok_or_else(|| Error::type_mismatch("string", &value))
    });
    let config = MappingConfig::new().compute("addresses", "addresses", each(mapper(inner)));

    let err = map_object(&config, &profile()).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn each_over_absent_array_fails() {
    let inner = MappingConfig::new().path("type", "type");
    let config = MappingConfig::new().compute("phones", "phones", each(mapper(inner)));

    let err = map_object(&config, &profile()).unwrap_err();
    assert_eq!(
        err,
        Error::TypeMismatch {
            expected: "array".to_string(),
            found: "null".to_string(),
        }
    );
}

#[test]
fn repeated_mapping_is_stable() {
    let config = MappingConfig::new()
        .path("degree", "education.qualification")
        .compute("fullName", ["name", "lastName"], join(" "));
    let source = profile();
    assert_eq!(
        map_object(&config, &source).unwrap(),
        map_object(&config, &source).unwrap()
    );
}

#[test]
fn curried_mapper_matches_direct_call() {
    let config = MappingConfig::new()
        .path("degree", "education.qualification")
        .paths("names", ["name", "lastName"])
        .compute("fullName", ["name", "lastName"], join(" "));
    let source = profile();
    let view = mapper(config.clone());
    assert_eq!(view.apply(&source).unwrap(), map_object(&config, &source).unwrap());
}

#[test]
fn untyped_configuration_maps_like_typed() {
    let untyped = MappingConfig::from_value(&json!({
        "degree": "education.qualification",
        "names": ["name", "lastName"],
        "school": { "pick": "education.school.name" },
        "nothing": { "compute": "ignored" }
    }));
    let result = map_object(&untyped, &profile()).unwrap();
    assert_eq!(
        result,
        json!({
            "degree": "B.E (Mech)",
            "names": ["Prabu", "Rajan"],
            "school": "VHN",
            "nothing": null
        })
    );
}

#[test]
fn mapper_is_shareable_across_threads() {
    let view = mapper(
        MappingConfig::new().compute("fullName", ["name", "lastName"], join(" ")),
    );
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let view = view.clone();
            std::thread::spawn(move || view.apply(&profile()).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), json!({ "fullName": "Prabu Rajan" }));
    }
}
