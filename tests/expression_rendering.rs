//! Expression Rendering Tests
//!
//! Covers the precedence-aware arithmetic printer, the literal formatter and
//! the composite term forms through the public API, plus serde round-trips
//! of the statement model.

use cql_builder::{
    bind_marker, cast, column, count_all, difference, element, field, function, is_column,
    keyspace_function, list_of, literal, map_of, named_bind_marker, opposite, product, quotient,
    range, raw, remainder, select_from, set_of, star, sum, tuple_of, type_hint, typed_map_of,
    CqlType, Term,
};

// ============================================================================
// Arithmetic parenthesization
// ============================================================================

mod arithmetic {
    use super::*;

    fn add(left: Term, right: Term) -> Term {
        sum(left, right).unwrap()
    }

    fn sub(left: Term, right: Term) -> Term {
        difference(left, right).unwrap()
    }

    fn mul(left: Term, right: Term) -> Term {
        product(left, right).unwrap()
    }

    fn div(left: Term, right: Term) -> Term {
        quotient(left, right).unwrap()
    }

    fn rem(left: Term, right: Term) -> Term {
        remainder(left, right).unwrap()
    }

    fn neg(argument: Term) -> Term {
        opposite(argument).unwrap()
    }

    #[test]
    fn sums_never_need_parentheses() {
        assert_eq!(add(raw("a"), raw("b")).as_cql(), "a+b");
        assert_eq!(
            add(add(raw("a"), raw("b")), add(raw("c"), raw("d"))).as_cql(),
            "a+b+c+d"
        );
    }

    #[test]
    fn subtraction_parenthesizes_its_right_operand() {
        assert_eq!(
            sub(add(raw("a"), raw("b")), add(raw("c"), raw("d"))).as_cql(),
            "a+b-(c+d)"
        );
        assert_eq!(
            sub(add(raw("a"), raw("b")), sub(raw("c"), raw("d"))).as_cql(),
            "a+b-(c-d)"
        );
        assert_eq!(
            sub(literal(1).unwrap(), add(raw("bar"), raw("baz"))).as_cql(),
            "1-(bar+baz)"
        );
    }

    #[test]
    fn negation_parenthesizes_sums_and_differences() {
        assert_eq!(neg(add(raw("a"), raw("b"))).as_cql(), "-(a+b)");
        assert_eq!(neg(sub(raw("a"), raw("b"))).as_cql(), "-(a-b)");
        assert_eq!(neg(mul(raw("a"), raw("b"))).as_cql(), "-a*b");
    }

    #[test]
    fn products_parenthesize_looser_operands() {
        assert_eq!(
            mul(add(raw("a"), raw("b")), add(raw("c"), raw("d"))).as_cql(),
            "(a+b)*(c+d)"
        );
        assert_eq!(
            mul(neg(column("bar")), add(column("baz"), literal(1).unwrap())).as_cql(),
            "-bar*(baz+1)"
        );
    }

    #[test]
    fn division_and_remainder_are_left_associative() {
        assert_eq!(
            rem(mul(raw("a"), raw("b")), mul(raw("c"), raw("d"))).as_cql(),
            "a*b%(c*d)"
        );
        assert_eq!(
            rem(mul(raw("a"), raw("b")), rem(raw("c"), raw("d"))).as_cql(),
            "a*b%(c%d)"
        );
        assert_eq!(
            div(literal(1).unwrap(), add(raw("bar"), raw("baz"))).as_cql(),
            "1/(bar+baz)"
        );
        assert_eq!(
            div(literal(1).unwrap(), mul(raw("bar"), raw("baz"))).as_cql(),
            "1/(bar*baz)"
        );
    }
}

// ============================================================================
// Literal formatting
// ============================================================================

mod literals {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn formats_scalars() {
        assert_eq!(literal(42).unwrap().as_cql(), "42");
        assert_eq!(literal("it's").unwrap().as_cql(), "'it''s'");
        assert_eq!(literal(true).unwrap().as_cql(), "true");
        assert_eq!(literal(2.0).unwrap().as_cql(), "2.0");
    }

    #[test]
    fn formats_collections() {
        assert_eq!(literal(vec![1, 2, 3]).unwrap().as_cql(), "[1,2,3]");

        let mut scores = BTreeMap::new();
        scores.insert("a", 1);
        scores.insert("b", 2);
        assert_eq!(literal(scores).unwrap().as_cql(), "{'a':1,'b':2}");
    }

    #[test]
    fn rejects_unmappable_values() {
        assert!(literal(f64::NAN).is_err());
    }
}

// ============================================================================
// Composite terms
// ============================================================================

mod composites {
    use super::*;

    #[test]
    fn renders_function_calls_in_selects() {
        let cql = select_from("foo")
            .selector(keyspace_function(Some("ks"), "f", [column("a"), column("b")]).unwrap())
            .build();
        assert_eq!(cql, "SELECT ks.f(a,b) FROM foo");
    }

    #[test]
    fn renders_casts_and_type_hints() {
        let cql = select_from("foo")
            .selector(cast(column("k"), CqlType::Int).unwrap())
            .build();
        assert_eq!(cql, "SELECT (int)k FROM foo");

        assert_eq!(
            type_hint(literal(1).unwrap(), CqlType::Bigint).unwrap().as_cql(),
            "(bigint)1"
        );
    }

    #[test]
    fn renders_access_and_range_forms() {
        assert_eq!(
            field(column("user"), "name").unwrap().as_cql(),
            "user.name"
        );
        assert_eq!(
            element(column("m"), literal("k").unwrap()).unwrap().as_cql(),
            "m['k']"
        );
        assert_eq!(
            range(column("s"), Some(literal(4).unwrap()), Some(literal(8).unwrap()))
                .unwrap()
                .as_cql(),
            "s[4..8]"
        );
        assert_eq!(
            range(column("s"), Some(literal(4).unwrap()), None).unwrap().as_cql(),
            "s[4..]"
        );
        assert!(range(column("s"), None, None).is_err());
    }

    #[test]
    fn renders_collection_constructions() {
        assert_eq!(
            list_of([column("a"), column("b")]).unwrap().as_cql(),
            "[a,b]"
        );
        assert_eq!(set_of([column("a")]).unwrap().as_cql(), "{a}");
        assert_eq!(
            tuple_of([column("a"), column("b")]).unwrap().as_cql(),
            "(a,b)"
        );
        assert_eq!(
            map_of([(column("k"), column("v"))]).unwrap().as_cql(),
            "{k:v}"
        );
        assert_eq!(
            typed_map_of(
                [(column("k"), column("v"))],
                Some((CqlType::Text, CqlType::Int)),
            )
            .unwrap()
            .as_cql(),
            "(map<text,int>){k:v}"
        );
    }

    #[test]
    fn rejects_aliased_nested_terms_eagerly() {
        let aliased = || column("a").alias("nope").unwrap();
        assert!(function("f", [aliased()]).is_err());
        assert!(list_of([aliased()]).is_err());
        assert!(cast(aliased(), CqlType::Int).is_err());
        assert!(sum(aliased(), column("b")).is_err());
        assert!(opposite(aliased()).is_err());
        assert!(field(aliased(), "f").is_err());
        assert!(element(column("m"), aliased()).is_err());
        assert!(range(aliased(), Some(literal(1).unwrap()), None).is_err());
        assert!(is_column("k").eq(aliased()).is_err());
    }

    #[test]
    fn pseudo_selectors_cannot_be_aliased() {
        assert!(star().alias("x").is_err());
        assert!(count_all().alias("x").is_err());
        assert!(bind_marker().alias("x").is_err());
    }

    #[test]
    fn renders_named_bind_markers() {
        let cql = select_from("foo")
            .all()
            .where_(is_column("id").eq(named_bind_marker("user_id")).unwrap())
            .build();
        assert_eq!(cql, "SELECT * FROM foo WHERE id=:user_id");
    }
}

// ============================================================================
// Serialization
// ============================================================================

mod serialization {
    use super::*;

    #[test]
    fn terms_round_trip_through_json() {
        let negated = opposite(column("bar")).unwrap();
        let offset = sum(column("baz"), literal(1).unwrap()).unwrap();
        let term = product(negated, offset).unwrap();
        let json = serde_json::to_string(&term).unwrap();
        let back: Term = serde_json::from_str(&json).unwrap();
        assert_eq!(back, term);
        assert_eq!(back.as_cql(), "-bar*(baz+1)");
    }

    #[test]
    fn statements_round_trip_through_json() {
        let select = select_from("foo")
            .columns(["a", "b"])
            .where_(is_column("k").eq(bind_marker()).unwrap())
            .limit(10)
            .unwrap();
        let json = serde_json::to_string(&select).unwrap();
        let back: cql_builder::Select = serde_json::from_str(&json).unwrap();
        assert_eq!(back.build(), select.build());
    }
}
