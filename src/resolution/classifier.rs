/// Identifier classification
///
/// Maps a validated identifier onto the lookup sequence it requires. Pure
/// decision logic; no I/O.
use crate::resolution::IdentifierKind;

/// The lookup branches one identifier requires.
///
/// An email-shaped string may denote either an individual user or a group's
/// alias, so both branches must be checked; a username only ever denotes a
/// user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupPlan {
    /// Search users by username; each match is a direct entity result
    UserOnly { username: String },
    /// Search users by email, then attempt group-alias resolution over the
    /// same string; group expansions are appended after direct matches
    UserAndGroupAlias { email: String },
}

/// Classify one identifier into its lookup plan.
///
/// Precondition: the identifier's type tag has already been validated by the
/// orchestrator.
pub fn classify(kind: IdentifierKind, identifier: &str) -> LookupPlan {
    match kind {
        IdentifierKind::Username => LookupPlan::UserOnly {
            username: identifier.to_string(),
        },
        IdentifierKind::Email => LookupPlan::UserAndGroupAlias {
            email: identifier.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_plans_direct_lookup() {
        let plan = classify(IdentifierKind::Username, "bob.smith");
        assert_eq!(
            plan,
            LookupPlan::UserOnly {
                username: "bob.smith".to_string()
            }
        );
    }

    #[test]
    fn test_email_plans_user_and_group_branches() {
        let plan = classify(IdentifierKind::Email, "group1@sample.org");
        assert_eq!(
            plan,
            LookupPlan::UserAndGroupAlias {
                email: "group1@sample.org".to_string()
            }
        );
    }
}
