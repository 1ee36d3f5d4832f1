//! Registration-time validation tests
//!
//! Malformed patterns must abort registration without touching the tree.

use waypoint_core::{Error, Lookup, Params, TreeBuilder};

#[test]
fn test_empty_wildcard_names_rejected() {
    for pattern in ["/user:", "/user:/", "/cmd/:/", "/src/*"] {
        let mut builder = TreeBuilder::new();
        assert_eq!(
            builder.add_route(pattern, ()),
            Err(Error::EmptyWildcardName(pattern.to_string())),
            "pattern {pattern:?}"
        );
    }
}

#[test]
fn test_multiple_wildcards_per_segment_rejected() {
    for pattern in ["/:foo:bar", "/:foo:bar/", "/:foo*bar"] {
        let mut builder = TreeBuilder::new();
        assert_eq!(
            builder.add_route(pattern, ()),
            Err(Error::MultipleWildcards(pattern.to_string())),
            "pattern {pattern:?}"
        );
    }
}

#[test]
fn test_catch_all_must_be_final() {
    let mut builder = TreeBuilder::new();
    assert_eq!(
        builder.add_route("/a/*b/c", ()),
        Err(Error::CatchAllMidPattern("/a/*b/c".to_string()))
    );
}

#[test]
fn test_catch_all_needs_leading_slash() {
    let mut builder = TreeBuilder::new();
    assert_eq!(
        builder.add_route("/user*name", ()),
        Err(Error::CatchAllWithoutSlash("/user*name".to_string()))
    );
}

#[test]
fn test_empty_and_unrooted_patterns_rejected() {
    let mut builder = TreeBuilder::new();
    assert_eq!(builder.add_route("", ()), Err(Error::EmptyPattern));
    assert_eq!(
        builder.add_route("ping", ()),
        Err(Error::NoLeadingSlash("ping".to_string()))
    );
}

#[test]
fn test_failed_registration_leaves_tree_unchanged() {
    let mut builder = TreeBuilder::new();
    builder.add_route("/ok", "ok".to_string()).unwrap();
    assert!(builder.add_route("/bad:", "bad".to_string()).is_err());

    let tree = builder.freeze();
    assert_eq!(tree.len(), 1);

    let mut params = Params::new();
    match tree.find("/ok", &mut params) {
        Lookup::Found { value, .. } => assert_eq!(value, "ok"),
        Lookup::NotFound { .. } => panic!("surviving route must still match"),
    }
    assert!(matches!(
        tree.find("/bad:", &mut params),
        Lookup::NotFound { .. }
    ));
}
