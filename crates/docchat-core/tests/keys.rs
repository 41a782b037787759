use docchat_core::keys::{interaction, owner_interactions_prefix, validate_owner};
use jiff::Timestamp;
use uuid::Uuid;

#[test]
fn interaction_key_sorts_chronologically() {
    let owner = "3f1c2a9e-user";
    let earlier = Timestamp::from_second(1_700_000_000).unwrap();
    let later = Timestamp::from_second(1_800_000_000).unwrap();

    let a = interaction(owner, earlier, Uuid::new_v4()).unwrap();
    let b = interaction(owner, later, Uuid::new_v4()).unwrap();

    assert!(a.starts_with("interactions/3f1c2a9e-user/"));
    assert!(a.ends_with(".json"));
    assert!(a < b);
}

#[test]
fn owner_prefix_ends_with_separator() {
    assert_eq!(
        owner_interactions_prefix("alice").unwrap(),
        "interactions/alice/"
    );
}

#[test]
fn owners_that_escape_their_prefix_are_rejected() {
    for owner in ["", "a/b", "..", ".", "bad\nid"] {
        assert!(validate_owner(owner).is_err(), "{owner:?} should be rejected");
    }
    assert!(validate_owner("c0ffee00-1111-2222-3333-444455556666").is_ok());
}
