//! Property-based tests for session history and the validity flag

use super::{ApiValidity, Role, Session, Turn};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Append(Role, String),
    Clear,
    Reset,
    Record(ApiValidity),
}

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::User), Just(Role::Assistant)]
}

fn arb_validity() -> impl Strategy<Value = ApiValidity> {
    prop_oneof![
        Just(ApiValidity::Unknown),
        Just(ApiValidity::Valid),
        Just(ApiValidity::Invalid),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (arb_role(), ".{0,40}").prop_map(|(r, c)| Op::Append(r, c)),
        1 => Just(Op::Clear),
        1 => Just(Op::Reset),
        2 => arb_validity().prop_map(Op::Record),
    ]
}

fn turn(role: Role, content: &str) -> Turn {
    match role {
        Role::User => Turn::user(content),
        Role::Assistant => Turn::assistant(content),
    }
}

proptest! {
    #[test]
    fn appends_preserve_count_and_order(
        entries in proptest::collection::vec((arb_role(), ".{0,40}"), 0..50)
    ) {
        let mut session = Session::new("p");
        for (role, content) in &entries {
            session.append(turn(*role, content));
        }

        prop_assert_eq!(session.len(), entries.len());
        for (t, (role, content)) in session.history().iter().zip(&entries) {
            prop_assert_eq!(t.role, *role);
            prop_assert_eq!(&t.content, content);
        }
    }

    #[test]
    fn clear_always_empties(
        entries in proptest::collection::vec(".{0,20}", 0..30)
    ) {
        let mut session = Session::new("p");
        for content in &entries {
            session.append(Turn::user(content.as_str()));
        }
        session.clear();
        prop_assert_eq!(session.len(), 0);
        prop_assert!(session.history().is_empty());
    }

    /// Validity only returns to Unknown through an explicit reset, and once
    /// resolved it never flips between Valid and Invalid on its own.
    #[test]
    fn validity_changes_only_through_reset(ops in proptest::collection::vec(arb_op(), 0..60)) {
        let mut session = Session::new("p");
        let mut expected_len = 0usize;

        for op in ops {
            let before = session.api_validity();
            match op {
                Op::Append(role, content) => {
                    session.append(turn(role, &content));
                    expected_len += 1;
                    prop_assert_eq!(session.api_validity(), before);
                }
                Op::Clear => {
                    session.clear();
                    expected_len = 0;
                    prop_assert_eq!(session.api_validity(), before);
                }
                Op::Reset => {
                    session.reset_validity();
                    prop_assert_eq!(session.api_validity(), ApiValidity::Unknown);
                }
                Op::Record(v) => {
                    session.record_validity(v);
                    let after = session.api_validity();
                    if before.is_resolved() {
                        prop_assert_eq!(after, before);
                    } else {
                        prop_assert_eq!(after, v);
                    }
                }
            }
            prop_assert_eq!(session.len(), expected_len);
        }
    }
}
