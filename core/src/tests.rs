#![cfg(test)]

use crate::{
    parser::{
        ChannelAddressParser, EnumParser, LocalDateParser, LocalTimeParser, PlainString,
        SemanticVersionParser, UuidParser, ZonedDateTimeParser,
    },
    ArrayPath, ChannelAddress, Descriptor, ElementPath, Error, JsonKind, JsonValue, NamedEnum,
    ObjectPath, ParserRegistry, Result, SemanticVersion, Serializer, StringParser,
};
use rand::{distr::Alphanumeric, rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use time::{
    macros::{date, datetime, time},
    Date, Month,
};
use uuid::Uuid;

macro_rules! set {
    ( $( $value:expr ),* ) => {{
        let mut result = HashSet::new();
        $(
            result.insert($value);
        )*
        result
    }}
}

fn json(content: &str) -> JsonValue {
    content.parse().unwrap()
}

crate::named_enum! {
    enum Phase {
        L1 = "L1",
        L2 = "L2",
        L3 = "L3",
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SampleRecord {
    sample_string: String,
}

fn sample_record_serializer() -> Serializer<SampleRecord> {
    Serializer::object(
        |record: &SampleRecord| JsonValue::object().property("sampleString", &record.sample_string),
        |path| {
            Ok(SampleRecord {
                sample_string: path.get_string("sampleString")?,
            })
        },
    )
}

#[derive(Debug, Clone, PartialEq)]
struct Location {
    latitude: f64,
    longitude: f64,
}

fn location_serializer() -> Serializer<Location> {
    Serializer::object(
        |location: &Location| {
            JsonValue::object()
                .property("latitude", location.latitude)
                .property("longitude", location.longitude)
        },
        |path| {
            Ok(Location {
                latitude: path.get_double("latitude")?,
                longitude: path.get_double("longitude")?,
            })
        },
    )
}

#[derive(Debug, Clone, PartialEq)]
struct Meter {
    id: Uuid,
    name: String,
    active: bool,
    power: i32,
    energy: f64,
    phase: Phase,
    limit: Option<i64>,
    channels: Vec<ChannelAddress>,
    version: SemanticVersion,
    commissioned: Date,
    location: Option<Location>,
}

fn meter_serializer() -> Serializer<Meter> {
    Serializer::object(
        |meter: &Meter| {
            JsonValue::object()
                .property("id", UuidParser.format(&meter.id))
                .property("name", &meter.name)
                .property("active", meter.active)
                .property("power", meter.power)
                .property("energy", meter.energy)
                .property("phase", meter.phase.name())
                .optional_property("limit", meter.limit)
                .property(
                    "channels",
                    JsonValue::array_from(meter.channels.iter().map(|c| c.to_string())),
                )
                .property("version", meter.version.to_string())
                .property(
                    "commissioned",
                    LocalDateParser::new().format(&meter.commissioned),
                )
                .property(
                    "location",
                    meter
                        .location
                        .as_ref()
                        .map(|location| location_serializer().serialize(location)),
                )
        },
        |path| {
            Ok(Meter {
                id: path.get_uuid("id")?,
                name: path.get_string("name")?,
                active: path.get_bool("active")?,
                power: path.get_int("power")?,
                energy: path.get_double("energy")?,
                phase: path.get_enum("phase")?,
                limit: path.get_long_nullable("limit")?,
                channels: path.get_list("channels", |element| {
                    element.get_as_string_parsed(&ChannelAddressParser)
                })?,
                version: path.get_semantic_version("version")?,
                commissioned: path.get_local_date("commissioned")?,
                location: path.get_with_nullable("location", &location_serializer())?,
            })
        },
    )
}

fn generate_meter(rng: &mut StdRng, index: usize) -> Meter {
    let name = (&mut *rng)
        .sample_iter(Alphanumeric)
        .take(8)
        .map(char::from)
        .collect::<String>();
    let channels = (0..rng.random_range(0..4))
        .map(|channel| ChannelAddress::new(format!("meter{}", index), format!("Channel{}", channel)))
        .collect();
    let version = SemanticVersion::new(
        rng.random_range(2020..2030),
        rng.random_range(0..13),
        rng.random_range(0..10),
    );
    let version = if rng.random_bool(0.5) {
        version.additional("SNAPSHOT")
    } else {
        version
    };
    let month = Month::try_from(rng.random_range(1..=12u8)).unwrap();
    Meter {
        id: Uuid::from_u128(rng.random()),
        name,
        active: rng.random_bool(0.5),
        power: rng.random_range(-10_000..10_000),
        energy: rng.random_range(0.0..1_000_000.0),
        phase: Phase::variants()[rng.random_range(0..3)],
        limit: rng.random_bool(0.5).then(|| rng.random_range(0..i64::MAX)),
        channels,
        version,
        commissioned: Date::from_calendar_date(rng.random_range(2000..2030), month, rng.random_range(1..=28))
            .unwrap(),
        location: rng.random_bool(0.5).then(|| Location {
            latitude: rng.random_range(-90.0..90.0),
            longitude: rng.random_range(-180.0..180.0),
        }),
    }
}

#[test]
fn test_boolean_member() {
    let value = json(r#"{"value": false, "nonBooleanValue": 99}"#);
    let path = ObjectPath::new(&value).unwrap();

    assert!(!path.get_bool("value").unwrap());
    assert_eq!(path.get_bool_nullable("value").unwrap(), Some(false));
    assert!(matches!(
        path.get_bool("nonBooleanValue"),
        Err(Error::TypeMismatch {
            expected: JsonKind::Boolean,
            actual: JsonKind::Number,
            ..
        })
    ));
    assert!(matches!(
        path.get_bool_nullable("nonBooleanValue"),
        Err(Error::TypeMismatch { .. })
    ));
    assert_eq!(path.get_bool_nullable("someOtherValue").unwrap(), None);
    assert!(matches!(
        path.get_bool("someOtherValue"),
        Err(Error::MissingMember { .. })
    ));
    assert!(path.get_bool_or_default("someOtherValue", true).unwrap());
}

#[test]
fn test_sample_record() {
    let serializer = sample_record_serializer();
    let input = json(r#"{"sampleString": "expectedString"}"#);

    let record = serializer.deserialize(&input).unwrap();
    assert_eq!(
        record,
        SampleRecord {
            sample_string: "expectedString".to_owned()
        }
    );
    assert_eq!(serializer.serialize(&record), input);
    assert_eq!(
        serializer.descriptor().to_string(),
        r#"{"type":"object","optional":false,"properties":{"sampleString":{"type":"string","optional":false}}}"#
    );
}

#[test]
fn test_array_collections() {
    let value = json(r#"["someValue"]"#);
    let array = ArrayPath::new(&value).unwrap();

    assert_eq!(
        array.get_as_list(|element| element.get_as_string()).unwrap(),
        vec!["someValue".to_owned()]
    );
    assert_eq!(
        array.get_as_set(|element| element.get_as_string()).unwrap(),
        set!["someValue".to_owned()]
    );
    let fixed = array.get_as_array(|element| element.get_as_string()).unwrap();
    assert_eq!(fixed.len(), 1);
    assert_eq!(fixed[0], "someValue");
    assert_eq!(
        array.get_as_list_with(&Serializer::string()).unwrap(),
        vec!["someValue".to_owned()]
    );
}

#[test]
fn test_type_mismatch_ignores_nullability() {
    struct Wrapper {
        inner: Option<Location>,
    }

    let serializer = Serializer::object(
        |wrapper: &Wrapper| {
            JsonValue::object().property(
                "inner",
                wrapper
                    .inner
                    .as_ref()
                    .map(|location| location_serializer().serialize(location)),
            )
        },
        |path| {
            Ok(Wrapper {
                inner: path.get_with_nullable("inner", &location_serializer())?,
            })
        },
    );

    let input = json(r#"{"inner": [1, 2]}"#);
    assert!(matches!(
        serializer.deserialize(&input),
        Err(Error::TypeMismatch {
            expected: JsonKind::Object,
            actual: JsonKind::Array,
            ..
        })
    ));
    assert!(serializer.deserialize(&json(r#"{"inner": null}"#)).is_ok());

    let input = json("[]");
    assert!(matches!(
        location_serializer().deserialize(&input),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
        location_serializer().nullable().deserialize(&input),
        Err(Error::TypeMismatch { .. })
    ));
    assert_eq!(
        location_serializer()
            .nullable()
            .deserialize(&JsonValue::Null)
            .unwrap(),
        None
    );
}

#[test]
fn test_string_parsed() {
    let value = json(r#"{"localDate": "2025-01-01", "broken": "2025-13-01"}"#);
    let path = ObjectPath::new(&value).unwrap();

    assert_eq!(
        path.get_string_parsed("localDate", &LocalDateParser::new())
            .unwrap(),
        date!(2025 - 01 - 01)
    );
    assert_eq!(path.get_local_date("localDate").unwrap(), date!(2025 - 01 - 01));
    assert!(matches!(
        path.get_bool("localDate"),
        Err(Error::TypeMismatch { .. })
    ));
    match path.get_local_date("broken") {
        Err(Error::ParseFailure { locator, raw, .. }) => {
            assert_eq!(locator.as_str(), "broken");
            assert_eq!(raw, "2025-13-01");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(path.get_local_date_nullable("missing").unwrap(), None);
    assert!(matches!(
        path.get_local_date_nullable("broken"),
        Err(Error::ParseFailure { .. })
    ));
}

#[test]
fn test_failure_matrix() {
    let value = json(r#"{"text": "hello", "number": 5, "nothing": null}"#);
    let path = ObjectPath::new(&value).unwrap();

    assert_eq!(path.get_string("text").unwrap(), "hello");
    assert_eq!(path.get_string_nullable("text").unwrap().as_deref(), Some("hello"));
    assert!(matches!(
        path.get_string("missing"),
        Err(Error::MissingMember { .. })
    ));
    assert!(matches!(
        path.get_string("nothing"),
        Err(Error::NullValue { .. })
    ));
    assert_eq!(path.get_string_nullable("missing").unwrap(), None);
    assert_eq!(path.get_string_nullable("nothing").unwrap(), None);
    assert!(matches!(
        path.get_string("number"),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
        path.get_string_nullable("number"),
        Err(Error::TypeMismatch { .. })
    ));
    assert_eq!(path.get_string_or_default("nothing", "fallback").unwrap(), "fallback");

    assert!(matches!(path.get_int("nothing"), Err(Error::NullValue { .. })));
    assert_eq!(path.get_int_nullable("nothing").unwrap(), None);
    assert!(matches!(
        path.get_int_nullable("text"),
        Err(Error::TypeMismatch { .. })
    ));

    assert!(matches!(
        path.get_object("number"),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(path.get_object_nullable("nothing").unwrap().is_none());
    assert!(matches!(
        path.get_array_path_nullable("text"),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(path.get_list_nullable("missing", |e| e.get_as_int()).unwrap().is_none());

    assert!(path.get_json_element_path("nothing").is_ok());
    assert!(matches!(
        path.get_json_element_path("missing"),
        Err(Error::MissingMember { .. })
    ));
    let deferred = path.get_nullable_json_element_path("missing");
    assert!(!deferred.is_present());
    assert_eq!(deferred.get_as_bool_nullable().unwrap(), None);
    assert!(matches!(
        deferred.get_as_bool(),
        Err(Error::MissingMember { .. })
    ));
    assert_eq!(path.get_json_element("number").unwrap(), &JsonValue::from(5));
    assert!(path.get_json_element("nothing").unwrap().is_null());
}

#[test]
fn test_construction() {
    let null = JsonValue::Null;
    let array = JsonValue::array();

    assert!(matches!(
        ObjectPath::new(&null),
        Err(Error::ConstructionFailure { found: "null", .. })
    ));
    assert!(matches!(
        ObjectPath::from_option(None),
        Err(Error::ConstructionFailure { found: "absent", .. })
    ));
    assert!(matches!(
        ElementPath::new(&null),
        Err(Error::ConstructionFailure { .. })
    ));
    assert!(matches!(
        ArrayPath::new(&null),
        Err(Error::ConstructionFailure { .. })
    ));
    assert!(ObjectPath::nullable(Some(&null)).unwrap().is_none());
    assert!(ObjectPath::nullable(None).unwrap().is_none());
    assert!(matches!(
        ObjectPath::new(&array),
        Err(Error::TypeMismatch {
            expected: JsonKind::Object,
            actual: JsonKind::Array,
            ..
        })
    ));
    assert!(matches!(
        ObjectPath::nullable(Some(&array)),
        Err(Error::TypeMismatch { .. })
    ));

    let element = ElementPath::nullable(Some(&null));
    assert!(matches!(element.get_as_string(), Err(Error::NullValue { .. })));
    assert_eq!(element.get_as_string_nullable().unwrap(), None);
    assert!(element.get_as_object_nullable().unwrap().is_none());
    let element = ElementPath::nullable(None);
    assert!(matches!(
        element.get_as_object(),
        Err(Error::MissingMember { .. })
    ));
}

#[test]
fn test_numeric_coercion() {
    let value = json(r#"{"integer": 42, "negative": -7, "fraction": 10.5, "big": 300}"#);
    let path = ObjectPath::new(&value).unwrap();

    for key in ["integer", "negative", "big"] {
        let int = path.get_int(key).unwrap();
        assert_eq!(int as i64, path.get_long(key).unwrap());
        assert_eq!(int as f64, path.get_double(key).unwrap().floor());
        assert_eq!(int as f32, path.get_float(key).unwrap());
    }
    assert_eq!(path.get_short("negative").unwrap(), -7);
    assert_eq!(path.get_byte("negative").unwrap(), -7);

    assert_eq!(path.get_double("fraction").unwrap(), 10.5);
    assert_eq!(path.get_int("fraction").unwrap(), 10);
    assert_eq!(path.get_long("fraction").unwrap(), 10);
    assert_eq!(path.get_short("big").unwrap(), 300);
    assert_eq!(path.get_byte("big").unwrap(), 44);
    assert_eq!(path.get_int_or_default("missing", 5).unwrap(), 5);
    assert_eq!(path.get_double_or_default("integer", 1.0).unwrap(), 42.0);
    assert!(path.get_number("integer").unwrap().is_integer());
    assert!(!path.get_number("fraction").unwrap().is_integer());
}

#[test]
fn test_scalar_paths() {
    let value = json(r#"{"power": 12.75, "name": "meter0", "flag": null}"#);
    let path = ObjectPath::new(&value).unwrap();

    let power = path.get_number_path("power").unwrap();
    assert_eq!(power.get_as_int(), 12);
    assert_eq!(power.get_as_double(), 12.75);
    assert_eq!(power.raw(), &JsonValue::from(12.75));
    assert_eq!(power.locator().as_str(), "power");
    assert_eq!(power.build_path().get_as_double().unwrap(), 12.75);

    let name = path.get_string_path("name").unwrap();
    assert_eq!(name.get(), "meter0");
    assert_eq!(name.into_inner(), "meter0");

    let flag = path.get_bool_path_nullable("flag").unwrap();
    assert!(!flag.is_present());
    assert_eq!(flag.get_or_null(), None);
    assert!(flag.raw().is_none());
    assert!(flag.build_path().value().unwrap().is_null());
    assert!(flag.get_or_default(true));

    let missing = path.get_number_path_nullable("missing").unwrap();
    assert_eq!(missing.get_as_int_or_null(), None);
    assert_eq!(missing.get_as_int_or_default(3), 3);
    let present = path.get_number_path_nullable("power").unwrap();
    assert_eq!(present.get_as_long_or_null(), Some(12));
    assert_eq!(present.get_optional().map(|n| n.as_f64()), Some(12.75));

    assert!(matches!(
        path.get_bool_path("flag"),
        Err(Error::NullValue { .. })
    ));
    assert!(matches!(
        path.get_bool_path_nullable("name"),
        Err(Error::TypeMismatch { .. })
    ));
    let date = path
        .get_string_parsed_path_nullable("missing", &LocalDateParser::new())
        .unwrap();
    assert_eq!(date.get_optional(), None);
}

#[test]
fn test_locators() {
    let value = json(r#"{"interfaces": {"eth0": {"dhcp": "yes"}}}"#);
    let path = ObjectPath::new(&value).unwrap();
    let error = path
        .get_object("interfaces")
        .unwrap()
        .get_object("eth0")
        .unwrap()
        .get_bool("dhcp")
        .unwrap_err();
    assert_eq!(
        error,
        Error::TypeMismatch {
            locator: "interfaces.eth0.dhcp".into(),
            expected: JsonKind::Boolean,
            actual: JsonKind::String,
        }
    );
    assert_eq!(
        error.to_string(),
        "expected boolean at `interfaces.eth0.dhcp` but found string"
    );

    let value = json(r#"{"channels": [{"address": "a/b"}, {"address": "bad"}]}"#);
    let path = ObjectPath::new(&value).unwrap();
    let error = path
        .get_list("channels", |element| {
            element.get_as_object()?.get_channel_address("address")
        })
        .unwrap_err();
    assert_eq!(error.locator().unwrap().to_string(), "channels[1].address");
    assert!(matches!(error, Error::ParseFailure { .. }));

    let error = sample_record_serializer().deserialize(&JsonValue::Null).unwrap_err();
    assert_eq!(error.locator().unwrap().to_string(), "$");
    assert!(matches!(
        error,
        Error::ConstructionFailure { found: "null", .. }
    ));
    assert!(matches!(
        Serializer::string().deserialize(&JsonValue::Null),
        Err(Error::ConstructionFailure { .. })
    ));
    assert_eq!(
        Serializer::string().nullable().deserialize(&JsonValue::Null).unwrap(),
        None
    );
    assert_eq!(
        Error::MissingMember {
            locator: "a.b".into()
        }
        .to_string(),
        "missing member `a.b`"
    );
}

#[test]
fn test_collections() {
    let value = json(r#"{"values": [3, 1, 3, 2, 1], "broken": [1, "x"]}"#);
    let path = ObjectPath::new(&value).unwrap();

    let list = path.get_list("values", |element| element.get_as_int()).unwrap();
    assert_eq!(list, vec![3, 1, 3, 2, 1]);
    assert_eq!(path.get_list_with("values", &Serializer::int()).unwrap(), list);

    let set = path.get_set("values", |element| element.get_as_int()).unwrap();
    assert_eq!(set, set![1, 2, 3]);
    assert_eq!(path.get_set_with("values", &Serializer::int()).unwrap(), set);

    let array = path.get_array("values", |element| element.get_as_long()).unwrap();
    assert_eq!(&*array, &[3i64, 1, 3, 2, 1]);
    assert_eq!(
        &*path.get_array_with("values", &Serializer::long()).unwrap(),
        &*array
    );

    let error = path
        .get_list("broken", |element| element.get_as_int())
        .unwrap_err();
    assert_eq!(error.locator().unwrap().as_str(), "broken[1]");

    let array = path.get_array_path("values").unwrap();
    assert_eq!(array.len(), 5);
    assert_eq!(array.elements().len(), 5);
    assert_eq!(array.element(3).get_as_int().unwrap(), 2);
    assert!(!array.element(5).is_present());
    assert!(matches!(
        array.element(5).get_as_int(),
        Err(Error::MissingMember { .. })
    ));
}

#[test]
fn test_collect_members() {
    let value = json(r#"{"meter0": 10, "meter1": 20, "meter2": 30}"#);
    let path = ObjectPath::new(&value).unwrap();

    assert_eq!(path.len(), 3);
    assert_eq!(
        path.keys().collect::<Vec<_>>(),
        vec!["meter0", "meter1", "meter2"]
    );

    let map: HashMap<String, i32> = path.collect(|element| element.get_as_int()).unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(map["meter1"], 20);

    let ordered: Vec<(String, i32)> = path.collect(|element| element.get_as_int()).unwrap();
    assert_eq!(
        ordered,
        vec![
            ("meter0".to_owned(), 10),
            ("meter1".to_owned(), 20),
            ("meter2".to_owned(), 30),
        ]
    );

    let result: Result<Vec<(String, bool)>> = path.collect(|element| element.get_as_bool());
    assert!(matches!(result, Err(Error::TypeMismatch { .. })));

    let members: Vec<(String, ElementPath)> = path.collect_string_keys();
    let total = members
        .iter()
        .map(|(_, element)| element.get_as_int().unwrap())
        .sum::<i32>();
    assert_eq!(total, 60);
    assert_eq!(members[2].1.locator().as_str(), "meter2");

    let value = json(r#"{"meter0/ActivePower": 1500, "meter1/ActivePower": -200}"#);
    let path = ObjectPath::new(&value).unwrap();
    let channels: BTreeMap<ChannelAddress, ElementPath> =
        path.collect_parsed_keys(&ChannelAddressParser).unwrap();
    assert_eq!(
        channels[&ChannelAddress::new("meter1", "ActivePower")]
            .get_as_int()
            .unwrap(),
        -200
    );

    let value = json(r#"{"invalid": 1}"#);
    let result: Result<Vec<(ChannelAddress, ElementPath)>> = ObjectPath::new(&value)
        .unwrap()
        .collect_parsed_keys(&ChannelAddressParser);
    assert!(matches!(result, Err(Error::ParseFailure { .. })));
}

#[test]
fn test_round_trip() {
    let serializer = meter_serializer();
    let mut rng = StdRng::seed_from_u64(42);

    for index in 0..100 {
        let meter = generate_meter(&mut rng, index);
        let serialized = serializer.serialize(&meter);
        assert_eq!(serializer.deserialize(&serialized).unwrap(), meter);

        let text = serialized.to_string();
        let parsed = text.parse::<JsonValue>().unwrap();
        assert_eq!(parsed, serialized);
        assert_eq!(serializer.deserialize(&parsed).unwrap(), meter);
    }

    let document = json(
        r#"{
            "location": null,
            "commissioned": "2021-06-15",
            "version": "2024.1.0-SNAPSHOT",
            "channels": ["meter7/ActivePower", "meter7/Energy"],
            "phase": "L2",
            "energy": 1200.5,
            "power": -300,
            "active": true,
            "name": "meter7",
            "id": "c48e2e28-09be-41d5-8e58-260d162991cc"
        }"#,
    );
    let meter = serializer.deserialize(&document).unwrap();
    assert_eq!(meter.phase, Phase::L2);
    assert_eq!(meter.limit, None);
    assert_eq!(meter.channels.len(), 2);
    assert_eq!(serializer.serialize(&meter), document);
}

#[test]
fn test_descriptor() {
    let serializer = meter_serializer();
    let descriptor = serializer.descriptor();

    let expected = Descriptor::object()
        .property("id", Descriptor::new(JsonKind::String))
        .property("name", Descriptor::new(JsonKind::String))
        .property("active", Descriptor::new(JsonKind::Boolean))
        .property("power", Descriptor::new(JsonKind::Number))
        .property("energy", Descriptor::new(JsonKind::Number))
        .property("phase", Descriptor::new(JsonKind::String))
        .property("limit", Descriptor::new(JsonKind::Number).optional(true))
        .property("channels", Descriptor::new(JsonKind::Array))
        .property("version", Descriptor::new(JsonKind::String))
        .property("commissioned", Descriptor::new(JsonKind::String))
        .property(
            "location",
            Descriptor::object()
                .optional(true)
                .property("latitude", Descriptor::new(JsonKind::Number))
                .property("longitude", Descriptor::new(JsonKind::Number)),
        );
    assert_eq!(descriptor, expected);
    assert_eq!(serializer.descriptor(), descriptor);
    assert_eq!(
        descriptor.get("location").unwrap().to_string(),
        r#"{"type":"object","optional":true,"properties":{"latitude":{"type":"number","optional":false},"longitude":{"type":"number","optional":false}}}"#
    );

    let parsed = Descriptor::serializer()
        .deserialize(&descriptor.to_json())
        .unwrap();
    assert_eq!(parsed, descriptor);
    assert_eq!(
        serde_json::to_string(&descriptor).unwrap(),
        descriptor.to_string()
    );

    assert_eq!(
        Descriptor::serializer().descriptor().to_string(),
        r#"{"type":"object","optional":false,"properties":{"properties":{"type":"object","optional":true,"properties":{}},"type":{"type":"string","optional":false},"optional":{"type":"boolean","optional":false}}}"#
    );
}

#[test]
fn test_builtin_serializers() {
    assert_eq!(
        Serializer::int().list().descriptor(),
        Descriptor::new(JsonKind::Array)
    );
    assert_eq!(
        Serializer::string().nullable().descriptor().to_string(),
        r#"{"type":"string","optional":true}"#
    );
    assert_eq!(
        Serializer::empty_object(|| ()).descriptor().to_string(),
        r#"{"type":"object","optional":false,"properties":{}}"#
    );
    assert!(Serializer::empty_object(|| ())
        .deserialize(&json("[]"))
        .is_err());

    let list = Serializer::double().list();
    let value = list.serialize(&vec![1.5, 2.0]);
    assert_eq!(value, json("[1.5, 2]"));
    assert_eq!(list.deserialize(&value).unwrap(), vec![1.5, 2.0]);

    let boolean = Serializer::boolean().nullable();
    assert_eq!(boolean.serialize(&None), JsonValue::Null);
    assert_eq!(boolean.deserialize(&json("true")).unwrap(), Some(true));

    let dates = Serializer::string_parsed(LocalDateParser::new());
    assert_eq!(
        dates.serialize(&date!(2025 - 03 - 04)),
        JsonValue::from("2025-03-04")
    );
    assert_eq!(
        dates.deserialize(&json(r#""2025-03-04""#)).unwrap(),
        date!(2025 - 03 - 04)
    );
    assert_eq!(dates.descriptor(), Descriptor::new(JsonKind::String));
    assert!(matches!(
        dates.deserialize(&json("true")),
        Err(Error::TypeMismatch { .. })
    ));

    let number = Serializer::number();
    assert_eq!(number.deserialize(&json("7")).unwrap().as_i32(), 7);
    assert_eq!(Serializer::long().serialize(&-5), json("-5"));
}

#[test]
fn test_dummy_driver() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let serializer = Serializer::object(
        |_: &Vec<i32>| JsonValue::object(),
        move |path| {
            path.get_list("values", |element| {
                counter.fetch_add(1, Ordering::SeqCst);
                element.get_as_int()
            })
        },
    );

    let descriptor = serializer.descriptor();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        descriptor,
        Descriptor::object().property("values", Descriptor::new(JsonKind::Array))
    );

    let input = json(r#"{"values": [1, 2, 3]}"#);
    assert_eq!(serializer.deserialize(&input).unwrap(), vec![1, 2, 3]);
    assert_eq!(calls.load(Ordering::SeqCst), 4);

    let serializer = Serializer::object(
        |_: &(Option<String>, String, usize)| JsonValue::object(),
        |path| {
            let note = path
                .get_nullable_json_element_path("note")
                .get_as_string_nullable()?;
            let raw = path.get_json_element_path("raw")?.get_as_string()?;
            let count = path.collect::<bool, Vec<_>, _>(|element| element.get_as_bool())?;
            Ok((note, raw, count.len()))
        },
    );
    assert_eq!(
        serializer.descriptor(),
        Descriptor::object()
            .property("note", Descriptor::new(JsonKind::String).optional(true))
            .property("raw", Descriptor::new(JsonKind::String))
    );
    assert_eq!(
        serializer
            .deserialize(&json(r#"{"raw": "x", "note": null}"#))
            .unwrap_err(),
        Error::TypeMismatch {
            locator: "raw".into(),
            expected: JsonKind::Boolean,
            actual: JsonKind::String,
        }
    );
}

#[test]
fn test_nullable_serializer_members() {
    let serializer = Serializer::object(
        |value: &(Option<String>, Option<Vec<i32>>)| {
            JsonValue::object()
                .property("x", value.0.as_deref())
                .property("values", value.1.clone())
        },
        |path| {
            Ok((
                path.get_with("x", &Serializer::string().nullable())?,
                path.get_json_element_path("values")?
                    .get_as_array_nullable()?
                    .map(|values| values.get_as_list(|e| e.get_as_int()))
                    .transpose()?,
            ))
        },
    );
    assert_eq!(
        serializer.descriptor().to_string(),
        r#"{"type":"object","optional":false,"properties":{"x":{"type":"string","optional":true},"values":{"type":"array","optional":true}}}"#
    );
    assert_eq!(
        serializer
            .deserialize(&json(r#"{"x": null, "values": null}"#))
            .unwrap(),
        (None, None)
    );
    assert_eq!(
        serializer
            .deserialize(&json(r#"{"x": "a", "values": [1]}"#))
            .unwrap(),
        (Some("a".to_owned()), Some(vec![1]))
    );
    assert!(matches!(
        serializer.deserialize(&json(r#"{"values": null}"#)),
        Err(Error::MissingMember { .. })
    ));
}

#[test]
fn test_primitive_paths() {
    let value = json(
        r#"{"string": "text", "number": 7, "boolean": true, "array": [], "object": {}, "null": null}"#,
    );
    let path = ObjectPath::new(&value).unwrap();

    for key in ["string", "number", "boolean"] {
        assert!(path.get_json_primitive(key).unwrap().kind().is_primitive());
        assert!(path.get_json_primitive_path(key).is_ok());
        assert!(path.get_nullable_json_primitive_path(key).is_ok());
    }
    assert_eq!(path.get_json_primitive("number").unwrap(), &JsonValue::from(7));
    assert_eq!(
        path.get_json_primitive_path("string")
            .unwrap()
            .get_as_string()
            .unwrap(),
        "text"
    );

    for key in ["array", "object"] {
        assert!(matches!(
            path.get_json_primitive(key),
            Err(Error::NotPrimitive { .. })
        ));
        assert!(matches!(
            path.get_json_primitive_path(key),
            Err(Error::NotPrimitive { .. })
        ));
        assert!(matches!(
            path.get_nullable_json_primitive_path(key),
            Err(Error::NotPrimitive { .. })
        ));
    }
    assert!(matches!(
        path.get_json_primitive("null"),
        Err(Error::NullValue { .. })
    ));
    assert!(matches!(
        path.get_json_primitive_path("notExisting"),
        Err(Error::MissingMember { .. })
    ));

    let nothing = path.get_nullable_json_primitive_path("null").unwrap();
    assert_eq!(nothing.get_as_int_nullable().unwrap(), None);
    let missing = path.get_nullable_json_primitive_path("notExisting").unwrap();
    assert!(!missing.is_present());
    assert_eq!(
        path.get_nullable_json_primitive_path("object")
            .unwrap_err()
            .to_string(),
        "expected primitive at `object` but found object"
    );

    let serializer = Serializer::object(
        |_: &Option<bool>| JsonValue::object(),
        |path| path.get_nullable_json_primitive_path("flag")?.get_as_bool_nullable(),
    );
    assert_eq!(
        serializer.descriptor().to_string(),
        r#"{"type":"object","optional":false,"properties":{"flag":{"type":"boolean","optional":true}}}"#
    );
}

#[test]
fn test_iso_date_times() {
    let value = json(
        r#"{
            "zoned": "2025-01-01T01:01Z[UTC]",
            "region": "2025-06-01T10:15:30+02:00[Europe/Berlin]",
            "fraction": "2025-01-01T01:01:02.5-05:00",
            "time": "12:30",
            "precise": "12:30:15.250",
            "broken": "2025-01-01T01:01Z[UTC"
        }"#,
    );
    let path = ObjectPath::new(&value).unwrap();

    assert_eq!(
        path.get_zoned_date_time("zoned").unwrap(),
        datetime!(2025-01-01 1:01 UTC)
    );
    assert_eq!(
        path.get_zoned_date_time("region").unwrap(),
        datetime!(2025-06-01 10:15:30 +2)
    );
    assert_eq!(
        path.get_zoned_date_time("fraction").unwrap(),
        datetime!(2025-01-01 1:01:02.5 -5)
    );
    assert!(matches!(
        path.get_zoned_date_time("broken"),
        Err(Error::ParseFailure { .. })
    ));
    assert_eq!(path.get_local_time("time").unwrap(), time!(12:30));
    assert_eq!(path.get_local_time("precise").unwrap(), time!(12:30:15.25));

    let zoned = ZonedDateTimeParser::new();
    assert_eq!(
        zoned.parse("2025-01-01T01:01Z").unwrap(),
        datetime!(2025-01-01 1:01 UTC)
    );
    assert!(zoned.parse("2025-01-01T01:01Z[]").is_err());
    assert!(zoned.parse("2025-01-01T01:01").is_err());
    assert_eq!(
        zoned.format(&datetime!(2025-01-01 1:01 UTC)),
        "2025-01-01T01:01:00Z"
    );

    let times = LocalTimeParser::new();
    assert!(times.parse("12").is_err());
    assert_eq!(times.format(&time!(12:30)), "12:30:00");
    assert_eq!(times.format(&time!(12:30:15.25)), "12:30:15.25");
    let custom = LocalTimeParser::with_format("[hour][minute]").unwrap();
    assert_eq!(custom.parse("0745").unwrap(), time!(7:45));
}

#[test]
fn test_parsers() {
    assert_eq!(PlainString.parse("anything").unwrap(), "anything");

    assert_eq!(
        SemanticVersionParser.parse("2024.1.0-SNAPSHOT").unwrap(),
        SemanticVersion::new(2024, 1, 0).additional("SNAPSHOT")
    );
    assert_eq!(
        SemanticVersionParser.parse("2").unwrap(),
        SemanticVersion::new(2, 0, 0)
    );
    assert!(SemanticVersionParser.parse("1.2.3.4").is_err());
    assert!(SemanticVersionParser.parse("a.b").is_err());
    assert!(SemanticVersionParser.parse("").is_err());
    assert!(SemanticVersion::new(2024, 2, 0).is_at_least(&SemanticVersion::new(2024, 1, 5)));
    assert!(!SemanticVersion::new(2023, 12, 9).is_at_least(&SemanticVersion::new(2024, 1, 0)));
    assert_eq!(
        SemanticVersionParser.example().raw,
        SemanticVersionParser.format(&SemanticVersionParser.example().value)
    );

    assert_eq!(
        ChannelAddressParser.parse("meter0/ActivePower").unwrap(),
        ChannelAddress::new("meter0", "ActivePower")
    );
    assert!(ChannelAddressParser.parse("meter0").is_err());
    assert!(ChannelAddressParser.parse("/ActivePower").is_err());
    assert_eq!(ChannelAddressParser.example().raw, "component0/Channel");

    let example = UuidParser.example();
    assert_eq!(example.raw, "c48e2e28-09be-41d5-8e58-260d162991cc");
    assert_eq!(UuidParser.parse(&example.raw).unwrap(), example.value);
    assert!(UuidParser.parse("not-a-uuid").is_err());

    let phases = EnumParser::<Phase>::new();
    assert_eq!(phases.parse("L2").unwrap(), Phase::L2);
    assert!(phases.parse("l2").is_err());
    assert_eq!(phases.example().raw, "L1");
    assert_eq!(
        EnumParser::<JsonKind>::new().parse("boolean").unwrap(),
        JsonKind::Boolean
    );

    let zoned = ZonedDateTimeParser::new();
    assert_eq!(
        zoned.parse("2025-01-01T10:00:00+02:00").unwrap(),
        datetime!(2025-01-01 10:00 +2)
    );
    assert_eq!(zoned.example().raw, "2025-01-01T00:00:00Z");
    assert!(zoned.parse("2025-01-01").is_err());

    assert_eq!(
        LocalTimeParser::new().parse("07:45:30").unwrap(),
        time!(7:45:30)
    );
    assert_eq!(LocalTimeParser::new().example().raw, "12:30:00");
    assert_eq!(LocalDateParser::new().example().raw, "2025-01-01");
    assert!(LocalDateParser::with_format("[invalid").is_err());
    let dotted = LocalDateParser::with_format("[day].[month].[year]").unwrap();
    assert_eq!(dotted.parse("04.03.2025").unwrap(), date!(2025 - 03 - 04));
    assert_eq!(dotted.format(&date!(2025 - 03 - 04)), "04.03.2025");
}

#[test]
fn test_registry() {
    let mut registry = ParserRegistry::with_defaults();
    assert!(registry.contains("localDate"));
    assert!(!registry.contains("phase"));

    let value = json(r#"{"day": "2025-03-04"}"#);
    let path = ObjectPath::new(&value).unwrap();
    let parser = registry.require::<LocalDateParser>("localDate").unwrap();
    assert_eq!(
        path.get_string_parsed("day", parser).unwrap(),
        date!(2025 - 03 - 04)
    );
    assert!(registry.get::<UuidParser>("localDate").is_none());
    assert!(matches!(
        registry.require::<UuidParser>("unknown"),
        Err(Error::UnknownParser { .. })
    ));

    registry.register(
        "localDate",
        LocalDateParser::with_format("[day].[month].[year]").unwrap(),
    );
    let parser = registry.require::<LocalDateParser>("localDate").unwrap();
    assert_eq!(parser.parse("04.03.2025").unwrap(), date!(2025 - 03 - 04));

    let examples = registry.examples().collect::<HashMap<_, _>>();
    assert_eq!(examples["localDate"], "01.01.2025");
    assert_eq!(examples["channelAddress"], "component0/Channel");
    assert_eq!(examples["zonedDateTime"], "2025-01-01T00:00:00Z");

    registry.register("phase", EnumParser::<Phase>::new());
    assert_eq!(registry.examples().last(), Some(("phase", "L1")));
    assert_eq!(registry.tags().count(), 8);
    assert!(registry.unregister("phase"));
    assert!(!registry.unregister("phase"));
    assert!(ParserRegistry::new().tags().next().is_none());
}

#[test]
fn test_json_value() {
    let a = json(r#"{"a": 1, "b": [true, null, "x"]}"#);
    let b = json(r#"{"b": [true, null, "x"], "a": 1.0}"#);
    assert_eq!(a, b);
    assert_ne!(a, json(r#"{"a": 1, "b": [null, true, "x"]}"#));
    assert_ne!(a, json(r#"{"a": 1}"#));
    assert_eq!(a.to_string(), r#"{"a":1,"b":[true,null,"x"]}"#);
    assert_eq!(a.member("a").map(JsonValue::kind), Some(JsonKind::Number));
    assert!(matches!("{".parse::<JsonValue>(), Err(Error::Syntax(_))));

    let built = JsonValue::object()
        .property("a", 1)
        .property("a", 2)
        .optional_property("b", None::<bool>)
        .property("c", JsonValue::array().item("x").item(Some(3)));
    assert_eq!(built, json(r#"{"a": 2, "c": ["x", 3]}"#));
    assert_eq!(built.as_object().unwrap().len(), 2);
    assert_eq!(
        JsonValue::object_from([("x", 1), ("y", 2)]).to_string(),
        r#"{"x":1,"y":2}"#
    );
    assert_eq!(JsonValue::from(vec!["a", "b"]), json(r#"["a", "b"]"#));

    let repeated = json(r#"{"a": 1, "b": 2, "a": 3}"#);
    assert_eq!(repeated.to_string(), r#"{"a":3,"b":2}"#);

    let duplicated = JsonValue::Object(vec![
        ("k".to_owned(), JsonValue::from(1)),
        ("k".to_owned(), JsonValue::from(1)),
    ]);
    let distinct = JsonValue::Object(vec![
        ("k".to_owned(), JsonValue::from(1)),
        ("j".to_owned(), JsonValue::from(2)),
    ]);
    assert_ne!(duplicated, distinct);
    assert_ne!(distinct, duplicated);
}

#[test]
fn test_serde_bridge() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    enum Mode {
        Off,
        Limit(i32),
        Schedule { from: String, to: String },
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Settings {
        name: String,
        enabled: bool,
        factor: f64,
        modes: Vec<Mode>,
        limit: Option<u16>,
        version: SemanticVersion,
        address: ChannelAddress,
    }

    let settings = Settings {
        name: "ess0".to_owned(),
        enabled: true,
        factor: 0.5,
        modes: vec![
            Mode::Off,
            Mode::Limit(5000),
            Mode::Schedule {
                from: "08:00".to_owned(),
                to: "18:00".to_owned(),
            },
        ],
        limit: None,
        version: SemanticVersion::new(2024, 1, 0),
        address: ChannelAddress::new("ess0", "Soc"),
    };
    let value = crate::to_value(&settings).unwrap();
    assert_eq!(
        value.to_string(),
        r#"{"name":"ess0","enabled":true,"factor":0.5,"modes":["Off",{"Limit":5000},{"Schedule":{"from":"08:00","to":"18:00"}}],"limit":null,"version":"2024.1.0","address":"ess0/Soc"}"#
    );
    let deserialized = crate::from_value::<Settings>(&value).unwrap();
    assert_eq!(deserialized, settings);

    let path = ObjectPath::new(&value).unwrap();
    assert_eq!(path.get_semantic_version("version").unwrap(), settings.version);
    assert_eq!(path.get_channel_address("address").unwrap(), settings.address);
    assert!(crate::from_value::<Settings>(&json("[]")).is_err());
}
