//! Tree registration and lookup tests
//!
//! Scenario coverage for static routes, named parameters, catch-alls,
//! matching priority, backtracking, and duplicate registration.

use waypoint_core::{Error, Lookup, Params, RouteTree, TreeBuilder};

fn build(routes: &[&str]) -> RouteTree<String> {
    let mut builder = TreeBuilder::new();
    for route in routes {
        builder
            .add_route(route, route.to_string())
            .unwrap_or_else(|e| panic!("registering '{route}': {e}"));
    }
    builder.freeze()
}

fn check_match(tree: &RouteTree<String>, path: &str, want: &str, want_params: &[(&str, &str)]) {
    let mut params = Params::with_capacity(tree.max_params());
    match tree.find(path, &mut params) {
        Lookup::Found { value, pattern } => {
            assert_eq!(value, want, "wrong route for '{path}'");
            assert_eq!(pattern, want, "wrong pattern for '{path}'");
            assert_eq!(params.len(), want_params.len(), "param count for '{path}'");
            for (key, val) in want_params {
                assert_eq!(params.get(key), Some(*val), "param '{key}' for '{path}'");
            }
        }
        Lookup::NotFound { .. } => panic!("expected a match for '{path}'"),
    }
}

fn check_miss(tree: &RouteTree<String>, path: &str) {
    let mut params = Params::with_capacity(tree.max_params());
    assert!(
        matches!(tree.find(path, &mut params), Lookup::NotFound { .. }),
        "expected no match for '{path}'"
    );
}

#[test]
fn test_static_routes() {
    let tree = build(&[
        "/hi",
        "/contact",
        "/co",
        "/c",
        "/a",
        "/ab",
        "/doc/",
        "/doc/go_faq.html",
        "/doc/go1.html",
        "/α",
        "/β",
    ]);

    check_miss(&tree, "");
    check_miss(&tree, "a");
    check_miss(&tree, "/");
    check_miss(&tree, "/con");
    check_miss(&tree, "/cona");
    check_miss(&tree, "/no");

    check_match(&tree, "/a", "/a", &[]);
    check_match(&tree, "/hi", "/hi", &[]);
    check_match(&tree, "/contact", "/contact", &[]);
    check_match(&tree, "/co", "/co", &[]);
    check_match(&tree, "/ab", "/ab", &[]);
    check_match(&tree, "/doc/go_faq.html", "/doc/go_faq.html", &[]);
    check_match(&tree, "/α", "/α", &[]);
    check_match(&tree, "/β", "/β", &[]);
}

#[test]
fn test_wildcard_routes() {
    let tree = build(&[
        "/",
        "/cmd/:tool/:sub",
        "/cmd/:tool/",
        "/cmd/xxx/",
        "/src/*filepath",
        "/search/",
        "/search/:query",
        "/user_:name",
        "/user_:name/about",
        "/files/:dir/*filepath",
        "/doc/",
        "/doc/go_faq.html",
        "/doc/go1.html",
        "/info/:user/public",
        "/info/:user/project/:project",
        "/a/b/:c",
        "/a/:b/c/d",
        "/a/*b",
    ]);

    check_miss(&tree, "/cmd/test");
    check_miss(&tree, "/search/someth!ng+in+ünìcodé/");

    check_match(&tree, "/", "/", &[]);
    check_match(&tree, "/cmd/test/", "/cmd/:tool/", &[("tool", "test")]);
    check_match(
        &tree,
        "/cmd/test/3",
        "/cmd/:tool/:sub",
        &[("tool", "test"), ("sub", "3")],
    );
    check_match(&tree, "/src/", "/src/*filepath", &[("filepath", "")]);
    check_match(
        &tree,
        "/src/some/file.png",
        "/src/*filepath",
        &[("filepath", "some/file.png")],
    );
    check_match(&tree, "/search/", "/search/", &[]);
    check_match(
        &tree,
        "/search/someth!ng+in+ünìcodé",
        "/search/:query",
        &[("query", "someth!ng+in+ünìcodé")],
    );
    check_match(&tree, "/user_gopher", "/user_:name", &[("name", "gopher")]);
    check_match(
        &tree,
        "/user_gopher/about",
        "/user_:name/about",
        &[("name", "gopher")],
    );
    check_match(
        &tree,
        "/files/js/inc/framework.js",
        "/files/:dir/*filepath",
        &[("dir", "js"), ("filepath", "inc/framework.js")],
    );
    check_match(
        &tree,
        "/info/gordon/public",
        "/info/:user/public",
        &[("user", "gordon")],
    );
    check_match(
        &tree,
        "/info/gordon/project/go",
        "/info/:user/project/:project",
        &[("user", "gordon"), ("project", "go")],
    );
    check_match(&tree, "/a/b/c", "/a/b/:c", &[("c", "c")]);
    check_match(&tree, "/a/b/c/d", "/a/:b/c/d", &[("b", "b")]);
    check_match(&tree, "/a/b", "/a/*b", &[("b", "b")]);
}

#[test]
fn test_static_beats_param_at_shared_node() {
    let tree = build(&["/a/b/:c", "/a/:b/c/d"]);
    check_match(&tree, "/a/b/c", "/a/b/:c", &[("c", "c")]);
}

#[test]
fn test_param_match_independent_of_registration_order() {
    let tree = build(&["/:parama/start", "/:paramb"]);
    check_match(&tree, "/1", "/:paramb", &[("paramb", "1")]);
    check_match(&tree, "/1/start", "/:parama/start", &[("parama", "1")]);

    let tree = build(&["/:paramb", "/:parama/start"]);
    check_match(&tree, "/1/start", "/:parama/start", &[("parama", "1")]);
    check_match(&tree, "/1", "/:paramb", &[("paramb", "1")]);
}

#[test]
fn test_duplicate_routes_rejected() {
    let routes = ["/", "/doc/", "/src/*filepath", "/search/:query", "/user_:name"];

    let mut builder = TreeBuilder::new();
    for route in routes {
        builder.add_route(route, route.to_string()).unwrap();
        let err = builder.add_route(route, route.to_string()).unwrap_err();
        assert_eq!(err, Error::DuplicateRoute(route.to_string()), "route {route:?}");
    }

    // first registrations survive the rejected duplicates
    let tree = builder.freeze();
    check_match(&tree, "/", "/", &[]);
    check_match(&tree, "/doc/", "/doc/", &[]);
    check_match(
        &tree,
        "/src/some/file.png",
        "/src/*filepath",
        &[("filepath", "some/file.png")],
    );
    check_match(
        &tree,
        "/search/someth!ng+in+ünìcodé",
        "/search/:query",
        &[("query", "someth!ng+in+ünìcodé")],
    );
    check_match(&tree, "/user_gopher", "/user_:name", &[("name", "gopher")]);
}

#[test]
fn test_prefix_only_intermediate_never_conflicts() {
    // "/cmd/:tool/:sub" re-walks the intermediate nodes "/cmd/" and
    // "/cmd/:" created by the first pattern; only exact terminals conflict
    let mut builder = TreeBuilder::new();
    builder.add_route("/cmd/:tool/", "a".to_string()).unwrap();
    builder.add_route("/cmd/:tool/:sub", "b".to_string()).unwrap();
    let tree = builder.freeze();
    check_match(&tree, "/cmd/vet/", "/cmd/:tool/", &[("tool", "vet")]);
    check_match(
        &tree,
        "/cmd/vet/all",
        "/cmd/:tool/:sub",
        &[("tool", "vet"), ("sub", "all")],
    );
}

#[test]
fn test_round_trip_substitution() {
    // substituting literal values into each pattern's wildcards and looking
    // the result up must return that pattern with those exact bindings
    let cases: &[(&str, &str, &[(&str, &str)])] = &[
        ("/users/all", "/users/all", &[]),
        ("/users/:id", "/users/42", &[("id", "42")]),
        (
            "/users/:id/posts/:post",
            "/users/7/posts/99",
            &[("id", "7"), ("post", "99")],
        ),
        (
            "/static/*filepath",
            "/static/css/site.css",
            &[("filepath", "css/site.css")],
        ),
    ];

    let tree = build(&cases.iter().map(|(p, _, _)| *p).collect::<Vec<_>>());
    for (pattern, path, params) in cases {
        check_match(&tree, path, pattern, params);
    }
}

#[test]
fn test_lookup_is_deterministic() {
    let tree = build(&["/a/b/:c", "/a/:b/c/d", "/a/*b", "/doc/"]);
    for _ in 0..3 {
        check_match(&tree, "/a/b/c", "/a/b/:c", &[("c", "c")]);
        check_match(&tree, "/a/x", "/a/*b", &[("b", "x")]);
        check_miss(&tree, "/nope");
    }
}

#[test]
fn test_param_value_with_empty_catch_all() {
    let tree = build(&["/src/*filepath"]);
    check_match(&tree, "/src/", "/src/*filepath", &[("filepath", "")]);
    check_miss(&tree, "/src");
}

#[test]
fn test_deep_backtracking_across_params() {
    let tree = build(&["/book/biz/:name", "/book/biz/abc", "/book/:page/:name"]);
    check_match(&tree, "/book/biz/abc", "/book/biz/abc", &[]);
    check_match(&tree, "/book/biz/xyz", "/book/biz/:name", &[("name", "xyz")]);
    check_match(
        &tree,
        "/book/help/abc",
        "/book/:page/:name",
        &[("page", "help"), ("name", "abc")],
    );
}

#[test]
fn test_different_param_names_share_a_slot() {
    // two patterns collapse onto the same param node; each request resolves
    // names from the terminal it reaches
    let tree = build(&["/w/:a/x", "/w/:b/y"]);
    check_match(&tree, "/w/1/x", "/w/:a/x", &[("a", "1")]);
    check_match(&tree, "/w/1/y", "/w/:b/y", &[("b", "1")]);
}
