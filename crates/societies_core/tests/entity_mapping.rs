use rusqlite::types::Value;
use societies_core::entity::RowShapeError;
use societies_core::schema::{columns, SchemaRegistry};
use societies_core::{
    Community, CommunityActivity, Entity, Me, Membership, PeopleActivity, Person, Relationship,
    Service, ServiceActivity, Sharing, SyncStatus, SyncTracked, ValueMap,
};
use std::collections::HashSet;
use std::fmt::Debug;
use uuid::Uuid;

fn sample_community() -> Community {
    let mut community = Community::with_global_id("c-1");
    community.name = Some("Chess club".to_string());
    community.owner_id = Some("p-1".to_string());
    community.community_type = Some("club".to_string());
    community.description = Some("Weekly games".to_string());
    community.creation_date = Some("1325376000000".to_string());
    community.origin = Some("local".to_string());
    community.sync_status = Some(SyncStatus::new("dirty"));
    community
}

fn sample_me() -> Me {
    let mut me = Me::with_global_id("me-1");
    me.name = Some("Ada Lovelace".to_string());
    me.display_name = Some("Ada".to_string());
    me.user_name = Some("ada".to_string());
    me.password = Some("s3cret".to_string());
    me.origin = Some("local".to_string());
    me
}

fn sample_person() -> Person {
    let mut person = Person::with_global_id("p-1");
    person.name = Some("Ada".to_string());
    person.email = Some("ada@example.org".to_string());
    person.description = Some("first member".to_string());
    person.creation_date = Some("1".to_string());
    person.last_modified_date = Some("2".to_string());
    person.origin = Some("remote".to_string());
    person.sync_status = Some(SyncStatus::new("synced"));
    person
}

fn sample_service() -> Service {
    let mut service = Service::with_global_id("s-1");
    service.name = Some("Calendar".to_string());
    service.owner_id = Some("p-1".to_string());
    service.service_type = Some("shared".to_string());
    service.available = Some("true".to_string());
    service.dependency = Some("s-0".to_string());
    service.config = Some("{}".to_string());
    service.url = Some("http://calendar.local/app".to_string());
    service
}

fn sample_relationship() -> Relationship {
    let mut relationship = Relationship::with_global_id("r-1");
    relationship.global_id_p1 = Some("p-1".to_string());
    relationship.global_id_p2 = Some("p-2".to_string());
    relationship.relationship_type = Some("friend".to_string());
    relationship.origin = Some("local".to_string());
    relationship
}

fn sample_membership() -> Membership {
    let mut membership = Membership::with_global_id("m-1", "member");
    membership.global_id_member = Some("p-1".to_string());
    membership.global_id_community = Some("c-1".to_string());
    membership
}

fn sample_sharing() -> Sharing {
    let mut sharing = Sharing::with_global_id("sh-1");
    sharing.owner_global_id = Some("p-1".to_string());
    sharing.global_id_service = Some("s-1".to_string());
    sharing.global_id_community = Some("c-1".to_string());
    sharing.sharing_type = Some("read".to_string());
    sharing
}

fn sample_service_activity() -> ServiceActivity {
    let mut activity = ServiceActivity::with_global_id("sa-1");
    activity.global_id_feed_owner = Some("s-1".to_string());
    activity.global_id_actor = Some("p-1".to_string());
    activity.global_id_object = Some("c-1".to_string());
    activity.global_id_verb = Some("installed".to_string());
    activity.creation_date = Some("1325376000000".to_string());
    activity.sync_status = Some(SyncStatus::new("new"));
    activity
}

fn assert_row_roundtrip<E: Entity + PartialEq + Debug>(entity: E) {
    let values = entity.entity_values();
    assert!(!values.contains(columns::LOCAL_ID));

    let mut row = values.clone();
    row.put_integer(columns::LOCAL_ID, 7);
    let loaded = E::from_row(&row).unwrap();

    assert_eq!(loaded.local_id(), Some(7));
    assert_eq!(loaded.global_id(), entity.global_id());
    assert_eq!(loaded.entity_values(), values);
}

fn assert_columns_registered<E: Entity>(entity: &E) {
    let registered: HashSet<&str> = SchemaRegistry::global()
        .column_names(E::KIND)
        .iter()
        .copied()
        .collect();
    for column in entity.entity_values().columns() {
        assert!(
            registered.contains(column),
            "{} value column `{column}` is not registered",
            E::KIND
        );
    }
}

#[test]
fn every_kind_roundtrips_through_a_stored_row() {
    assert_row_roundtrip(sample_me());
    assert_row_roundtrip(sample_person());
    assert_row_roundtrip(sample_community());
    assert_row_roundtrip(sample_service());
    assert_row_roundtrip(sample_relationship());
    assert_row_roundtrip(sample_membership());
    assert_row_roundtrip(sample_sharing());
    assert_row_roundtrip(sample_service_activity());

    let mut people_activity = PeopleActivity::with_global_id("pa-1");
    people_activity.global_id_feed_owner = Some("p-1".to_string());
    people_activity.global_id_verb = Some("joined".to_string());
    assert_row_roundtrip(people_activity);

    let mut community_activity = CommunityActivity::with_global_id("ca-1");
    community_activity.global_id_feed_owner = Some("c-1".to_string());
    community_activity.global_id_target = Some("s-1".to_string());
    assert_row_roundtrip(community_activity);
}

#[test]
fn value_columns_are_registered_for_their_kind() {
    assert_columns_registered(&sample_me());
    assert_columns_registered(&sample_person());
    assert_columns_registered(&sample_community());
    assert_columns_registered(&sample_service());
    assert_columns_registered(&sample_relationship());
    assert_columns_registered(&sample_membership());
    assert_columns_registered(&sample_sharing());
    assert_columns_registered(&PeopleActivity::new());
    assert_columns_registered(&CommunityActivity::new());
    assert_columns_registered(&sample_service_activity());
}

#[test]
fn from_row_with_no_optional_columns_leaves_fields_unset() {
    let mut row = ValueMap::new();
    row.put_integer(columns::LOCAL_ID, 3);

    let community = Community::from_row(&row).unwrap();
    assert_eq!(community.local_id(), Some(3));
    assert_eq!(community.global_id(), None);
    assert_eq!(community.name, None);
    assert_eq!(community.sync_status(), None);
}

#[test]
fn from_row_rejects_non_positive_local_id() {
    let mut row = ValueMap::new();
    row.put_integer(columns::LOCAL_ID, 0);

    let err = Person::from_row(&row).unwrap_err();
    assert_eq!(err, RowShapeError::InvalidLocalId(0));
}

#[test]
fn from_row_rejects_blob_in_text_column() {
    let mut row = ValueMap::new();
    row.put_integer(columns::LOCAL_ID, 1);
    row.put(columns::NAME, Value::Blob(vec![0xde, 0xad]));

    let err = Person::from_row(&row).unwrap_err();
    assert!(matches!(err, RowShapeError::TypeMismatch { ref column, .. } if column == "name"));
}

#[test]
fn membership_requires_type_column() {
    let mut row = ValueMap::new();
    row.put_integer(columns::LOCAL_ID, 1);
    row.put_text(columns::GLOBAL_ID, Some("m-1"));

    let err = Membership::from_row(&row).unwrap_err();
    assert_eq!(
        err,
        RowShapeError::MissingColumn {
            column: "type".to_string()
        }
    );

    row.put(columns::TYPE, Value::Null);
    let err = Membership::from_row(&row).unwrap_err();
    assert_eq!(
        err,
        RowShapeError::NullColumn {
            column: "type".to_string()
        }
    );
}

#[test]
fn new_entities_get_distinct_uuid_global_ids() {
    let first = Person::new();
    let second = Person::new();

    let first_id = first.global_id().unwrap();
    let second_id = second.global_id().unwrap();
    assert_ne!(first_id, second_id);
    assert!(Uuid::parse_str(first_id).is_ok());
    assert_eq!(first.local_id(), None);
}

#[test]
fn community_serializes_seven_ordered_lines() {
    let text = sample_community().serialize();

    assert_eq!(
        text,
        "global_id=c-1\n\
         name=Chess club\n\
         owner_id=p-1\n\
         type=club\n\
         description=Weekly games\n\
         creation_date=1325376000000\n\
         last_modified_date=\n"
    );
    assert_eq!(text.lines().count(), 7);
}

#[test]
fn serialization_omits_local_bookkeeping() {
    let mut row = sample_person().entity_values();
    row.put_integer(columns::LOCAL_ID, 42);
    let person = Person::from_row(&row).unwrap();

    let text = person.serialize();
    let keys: Vec<&str> = text
        .lines()
        .filter_map(|line| line.split_once('=').map(|(key, _)| key))
        .collect();
    assert!(!keys.contains(&"_id"));
    assert!(!keys.contains(&"origin"));
    assert!(!keys.contains(&"sync_status"));
    assert!(text.starts_with("global_id=p-1\n"));
}

#[test]
fn me_wire_form_leaves_out_the_password() {
    let text = sample_me().serialize();

    assert_eq!(
        text,
        "global_id=me-1\n\
         name=Ada Lovelace\n\
         display_name=Ada\n\
         user_name=ada\n"
    );
    let parsed = Me::deserialize(&text).unwrap();
    assert_eq!(parsed.user_name.as_deref(), Some("ada"));
    assert_eq!(parsed.password, None);
}

#[test]
fn from_row_assigns_the_stored_local_id() {
    let mut row = sample_me().entity_values();
    row.put_integer(columns::LOCAL_ID, 12);
    let me = Me::from_row(&row).unwrap();

    assert_eq!(me.local_id(), Some(12));
    assert_eq!(me.password.as_deref(), Some("s3cret"));
}

#[test]
fn deserialize_builds_unpersisted_entity() {
    let text = "_id=5\nglobal_id=sa-9\nglobal_id_feed_owner=s-1\nglobal_id_verb=a=b\n";

    let activity = ServiceActivity::deserialize(text).unwrap();
    assert_eq!(activity.local_id(), None);
    assert_eq!(activity.global_id(), Some("sa-9"));
    assert_eq!(activity.global_id_feed_owner.as_deref(), Some("s-1"));
    assert_eq!(activity.global_id_verb.as_deref(), Some("a=b"));
    assert_eq!(activity.global_id_actor, None);
}

#[test]
fn deserialize_reads_back_serialized_community() {
    let original = sample_community();
    let parsed = Community::deserialize(&original.serialize()).unwrap();

    assert_eq!(parsed.global_id(), Some("c-1"));
    assert_eq!(parsed.name, original.name);
    assert_eq!(parsed.community_type, original.community_type);
    // Unset values come back as empty text.
    assert_eq!(parsed.last_modified_date.as_deref(), Some(""));
    assert_eq!(parsed.origin, None);
}

#[test]
fn deserialize_rejects_line_without_separator() {
    let err = Relationship::deserialize("global_id=r-1\nbroken\n").unwrap_err();
    assert_eq!(err, RowShapeError::MalformedLine("broken".to_string()));
}

#[test]
fn community_with_empty_description_still_serializes_every_key() {
    let mut community = Community::with_global_id("c1");
    community.name = Some("Test".to_string());
    community.owner_id = Some("u1".to_string());
    community.community_type = Some("open".to_string());
    community.description = Some(String::new());
    community.creation_date = Some("2012-01-01".to_string());
    community.last_modified_date = Some("2012-01-01".to_string());

    let lines: Vec<String> = community.serialize().lines().map(str::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "global_id=c1",
            "name=Test",
            "owner_id=u1",
            "type=open",
            "description=",
            "creation_date=2012-01-01",
            "last_modified_date=2012-01-01",
        ]
    );
}
