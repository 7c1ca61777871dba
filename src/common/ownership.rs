// Generic ownership check for account-owned resources

use super::error::ApiError;
use tracing::warn;

/// A resource owned by exactly one user account
pub trait Owned {
    fn owner_id(&self) -> &str;
}

/// Verify that `resource` belongs to the caller.
///
/// Existence must already be established; this only answers the
/// "is it yours" question, so a mismatch is always a 403.
pub fn ensure_owner<R: Owned>(resource: &R, caller_id: &str) -> Result<(), ApiError> {
    if resource.owner_id() != caller_id {
        warn!(
            owner_id = %resource.owner_id(),
            caller_id = %caller_id,
            "Ownership check failed"
        );
        return Err(ApiError::Forbidden(
            "This resource does not belong to you".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Relic {
        user_id: String,
    }

    impl Owned for Relic {
        fn owner_id(&self) -> &str {
            &self.user_id
        }
    }

    #[test]
    fn test_owner_passes() {
        let relic = Relic {
            user_id: "U_AAAAAA".to_string(),
        };
        assert!(ensure_owner(&relic, "U_AAAAAA").is_ok());
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let relic = Relic {
            user_id: "U_AAAAAA".to_string(),
        };
        match ensure_owner(&relic, "U_BBBBBB") {
            Err(ApiError::Forbidden(_)) => {}
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }
}
